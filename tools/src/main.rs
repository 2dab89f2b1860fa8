use std::fs;
use std::net::UdpSocket;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use osc::DecodeLimits;
use tools::{bundle_to_json, format_bundle_pretty};

#[derive(Parser)]
#[command(
    name = "tuiocast-tools",
    version,
    about = "tuiocast bundle inspection tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a captured datagram file and print its messages.
    Dump {
        /// Path to the raw datagram bytes.
        datagram_file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DumpFormat::Pretty)]
        format: DumpFormat,
    },
    /// Listen on a UDP port and dump incoming bundles.
    Listen {
        /// Port to bind on all interfaces.
        #[arg(long, default_value_t = 3333)]
        port: u16,
        /// Stop after this many datagrams; run forever when omitted.
        #[arg(long)]
        count: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DumpFormat::Pretty)]
        format: DumpFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Dump {
            datagram_file,
            format,
        } => {
            let bytes = fs::read(&datagram_file)
                .with_context(|| format!("read datagram {}", datagram_file.display()))?;
            print_bundle(&bytes, format)?;
        }
        Command::Listen {
            port,
            count,
            format,
        } => listen(port, count, format)?,
    }
    Ok(())
}

fn listen(port: u16, count: Option<usize>, format: DumpFormat) -> Result<()> {
    let socket = UdpSocket::bind(("0.0.0.0", port))
        .with_context(|| format!("bind udp port {port}"))?;
    log::info!("listening on {}", socket.local_addr()?);

    // Largest datagram the decoder accepts by default.
    let mut buf = vec![0u8; DecodeLimits::default().max_datagram_bytes];
    let mut received = 0usize;
    loop {
        if let Some(count) = count {
            if received >= count {
                break;
            }
        }
        let (len, peer) = socket.recv_from(&mut buf).context("receive datagram")?;
        received += 1;
        println!("-- datagram {received} from {peer} --");
        if let Err(err) = print_bundle(&buf[..len], format) {
            // Malformed traffic is reported, not fatal; keep listening.
            log::warn!("undecodable datagram from {peer}: {err:#}");
        }
    }
    Ok(())
}

fn print_bundle(datagram: &[u8], format: DumpFormat) -> Result<()> {
    let bundle = bundle_to_json(datagram, &DecodeLimits::default())?;
    match format {
        DumpFormat::Json => {
            let json = serde_json::to_string_pretty(&bundle).context("serialize json")?;
            println!("{json}");
        }
        DumpFormat::Pretty => {
            print!("{}", format_bundle_pretty(&bundle));
        }
    }
    Ok(())
}

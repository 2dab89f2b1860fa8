//! Inspection and debugging tools for tuiocast bundles.
//!
//! This crate turns raw bundle datagrams into structured JSON and
//! human-readable reports:
//!
//! - Decode a captured datagram and print its messages
//! - Summarize a bundle by profile, command, and size
//! - Listen on a UDP port and dump live traffic
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what a receiver would see.

use anyhow::{Context, Result};
use osc::{decode_bundle, DecodeLimits, OscArg, OscBundle};
use serde::Serialize;

/// One decoded argument in JSON-friendly form.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JsonArg {
    Int(i32),
    Float(f32),
    Str(String),
}

impl From<&OscArg<'_>> for JsonArg {
    fn from(arg: &OscArg<'_>) -> Self {
        match arg {
            OscArg::Int(v) => Self::Int(*v),
            OscArg::Float(v) => Self::Float(*v),
            OscArg::Str(s) => Self::Str((*s).to_string()),
        }
    }
}

/// One decoded message in JSON-friendly form.
#[derive(Debug, Serialize)]
pub struct JsonMessage {
    pub address: String,
    /// The sub-command string when the first argument carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub args: Vec<JsonArg>,
}

/// A whole decoded bundle in JSON-friendly form.
#[derive(Debug, Serialize)]
pub struct JsonBundle {
    pub time_tag: u64,
    pub byte_len: usize,
    pub messages: Vec<JsonMessage>,
}

/// Decodes a datagram into the JSON-friendly bundle form.
pub fn bundle_to_json(datagram: &[u8], limits: &DecodeLimits) -> Result<JsonBundle> {
    let bundle = decode_bundle(datagram, limits).context("decode bundle")?;
    Ok(json_bundle(&bundle, datagram.len()))
}

fn json_bundle(bundle: &OscBundle<'_>, byte_len: usize) -> JsonBundle {
    let messages = bundle
        .messages
        .iter()
        .map(|msg| {
            let command = match msg.args.first() {
                Some(OscArg::Str(cmd)) => Some((*cmd).to_string()),
                _ => None,
            };
            JsonMessage {
                address: msg.address.to_string(),
                command,
                args: msg.args.iter().map(JsonArg::from).collect(),
            }
        })
        .collect();
    JsonBundle {
        time_tag: bundle.time_tag,
        byte_len,
        messages,
    }
}

/// Formats a decoded bundle as a compact per-message report.
#[must_use]
pub fn format_bundle_pretty(bundle: &JsonBundle) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "bundle: {} bytes, {} messages, time_tag 0x{:016x}",
        bundle.byte_len,
        bundle.messages.len(),
        bundle.time_tag
    );
    for msg in &bundle.messages {
        let command = msg.command.as_deref().unwrap_or("-");
        let _ = write!(out, "  {} {command}:", msg.address);
        for arg in msg.args.iter().skip(usize::from(msg.command.is_some())) {
            match arg {
                JsonArg::Int(v) => {
                    let _ = write!(out, " {v}");
                }
                JsonArg::Float(v) => {
                    let _ = write!(out, " {v:.4}");
                }
                JsonArg::Str(s) => {
                    let _ = write!(out, " {s:?}");
                }
            }
        }
        out.push('\n');
    }
    out
}

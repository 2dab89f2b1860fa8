//! Fire-and-forget datagram transmission.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::{ServerError, ServerResult};

/// One-way datagram transport.
///
/// `send` takes `&self` so one transmitter can be shared by both channels,
/// from different threads if the caller wants. Implementations must never
/// block the tracking loop and never retry.
pub trait Transmit {
    /// Sends one complete bundle as a single datagram, best effort.
    fn send(&self, datagram: &[u8]) -> ServerResult<()>;
}

/// UDP transmitter bound to a single destination.
///
/// The destination is resolved once at construction; there is no runtime
/// re-binding and no receive path.
#[derive(Debug)]
pub struct UdpTransmitter {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpTransmitter {
    /// Resolves the destination and opens a non-blocking local socket.
    ///
    /// The first address the host resolves to wins. Fails with
    /// [`ServerError::Resolution`] when the host cannot be resolved and
    /// [`ServerError::Transmit`] when the local socket cannot be set up.
    pub fn open(host: &str, port: u16) -> ServerResult<Self> {
        let destination = (host, port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ServerError::Resolution {
                host: host.to_string(),
                port,
            })?;

        let bind_addr: SocketAddr = if destination.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr).map_err(ServerError::Transmit)?;
        socket.set_nonblocking(true).map_err(ServerError::Transmit)?;

        log::debug!("transmitting to {destination} from {:?}", socket.local_addr());
        Ok(Self {
            socket,
            destination,
        })
    }

    /// Returns the resolved destination address.
    #[must_use]
    pub const fn destination(&self) -> SocketAddr {
        self.destination
    }
}

impl Transmit for UdpTransmitter {
    fn send(&self, datagram: &[u8]) -> ServerResult<()> {
        // WouldBlock from the non-blocking socket is a failed send like any
        // other; the caller already dropped the frame.
        self.socket
            .send_to(datagram, self.destination)
            .map_err(ServerError::Transmit)?;
        log::trace!("sent {} byte bundle to {}", datagram.len(), self.destination);
        Ok(())
    }
}

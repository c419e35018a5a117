// File: vivelink-receiver/src/socket.rs

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::debug;

/// Bind a UDP socket with `SO_REUSEADDR` set and hand it to tokio. Must be
/// called from inside a runtime.
pub fn bind_udp(addr: SocketAddr) -> std::io::Result<UdpSocket> {
    let sock2 = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    sock2.set_reuse_address(true)?;
    sock2.set_nonblocking(true)?;
    sock2.bind(&addr.into())?;
    debug!("UDP socket bound to {} (SO_REUSEADDR)", addr);

    let std_socket: std::net::UdpSocket = sock2.into();
    UdpSocket::from_std(std_socket)
}

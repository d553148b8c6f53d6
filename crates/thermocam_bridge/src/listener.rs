//! Socket UDP que recebe os broadcasts dos dispositivos.

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use thermocam_core::protocol::MAX_DATAGRAM;

/// Erros de criação do socket. São sempre fatais.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Falha ao criar socket UDP: {0}")]
    Socket(io::Error),

    #[error("Falha ao bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
}

pub struct Listener {
    socket: UdpSocket,
    buf: [u8; MAX_DATAGRAM],
}

impl Listener {
    /// Escuta em `0.0.0.0:<port>` com SO_REUSEADDR.
    pub fn bind(port: u16) -> Result<Self, ListenerError> {
        Self::bind_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
    }

    pub fn bind_addr(addr: SocketAddr) -> Result<Self, ListenerError> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))
            .map_err(ListenerError::Socket)?;
        socket
            .set_reuse_address(true)
            .map_err(ListenerError::Socket)?;
        socket
            .bind(&SockAddr::from(addr))
            .map_err(|source| ListenerError::Bind { addr, source })?;

        Ok(Self {
            socket: socket.into(),
            buf: [0u8; MAX_DATAGRAM],
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Bloqueia até chegar um datagrama. Excedentes além de
    /// [`MAX_DATAGRAM`] bytes são descartados pelo sistema; no Windows isso
    /// também gera um erro transitório (ver [`is_transient`]).
    pub fn recv(&mut self) -> io::Result<(&[u8], SocketAddr)> {
        let (size, source) = self.socket.recv_from(&mut self.buf)?;
        Ok((&self.buf[..size], source))
    }
}

/// `WSAEMSGSIZE`: no Windows um datagrama maior que o buffer é entregue
/// truncado junto com este erro, em vez de truncado em silêncio.
const WSAEMSGSIZE: i32 = 10040;

/// Erros de recepção que não encerram o loop.
pub fn is_transient(err: &io::Error) -> bool {
    if cfg!(windows) && err.raw_os_error() == Some(WSAEMSGSIZE) {
        return true;
    }
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
    )
}

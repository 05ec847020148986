//! Connection handling abstractions for the API listener.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};

/// Accepted client connection.
#[derive(Debug)]
pub struct ConnectionStream {
    stream: TcpStream,
}

impl ConnectionStream {
    pub(crate) fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Address of the connected client.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is no longer connected.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// Handles accepted connections.
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Serves a single connection until it closes. Implementations should
    /// avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}

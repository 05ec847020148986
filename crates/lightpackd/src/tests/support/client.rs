//! Line-oriented TCP client speaking the remote-control protocol.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Blocking client that sends one request line and reads one reply line.
pub struct LineClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    greeting: String,
}

impl LineClient {
    /// Connects and consumes the greeting line.
    pub fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("connect to API server");
        stream
            .set_read_timeout(Some(READ_TIMEOUT))
            .expect("set read timeout");
        let writer = stream.try_clone().expect("clone client stream");
        let mut client = Self {
            reader: BufReader::new(stream),
            writer,
            greeting: String::new(),
        };
        client.greeting = client.read_line();
        client
    }

    /// Greeting sent by the server on connect.
    #[must_use]
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Sends `line` and returns the reply without its terminator.
    pub fn request(&mut self, line: &str) -> String {
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .expect("write request");
        self.writer.flush().expect("flush request");
        self.read_line()
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("read reply line");
        line.trim_end_matches(['\r', '\n']).to_owned()
    }
}

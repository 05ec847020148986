//! Connection handler that speaks the line protocol.
//!
//! Each connection gets the greeting, then one reply per request line, in
//! order, until the client disconnects. Socket I/O happens outside the engine
//! mutex; only [`ApiEngine::execute`] touches shared state.

use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::API_TARGET;
use super::engine::ApiEngine;
use super::errors::ApiError;
use super::response::{Reply, ResponseWriter};

/// Longest accepted request line in bytes, excluding the terminator.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Serves API connections against a shared [`ApiEngine`].
pub struct ApiConnectionHandler {
    engine: Arc<ApiEngine>,
    max_request_bytes: usize,
}

impl ApiConnectionHandler {
    /// Builds a handler with the default request limit.
    #[must_use]
    pub fn new(engine: Arc<ApiEngine>) -> Self {
        Self {
            engine,
            max_request_bytes: MAX_REQUEST_BYTES,
        }
    }

    /// Overrides the request limit.
    #[must_use]
    pub fn with_max_request_bytes(mut self, max_request_bytes: usize) -> Self {
        self.max_request_bytes = max_request_bytes;
        self
    }

    fn serve(&self, stream: ConnectionStream) -> Result<(), ApiError> {
        let mut session = self.engine.open_session();
        let mut reader = BufReader::new(stream);
        ResponseWriter::new(reader.get_mut()).write_greeting()?;

        while let Some(request) = read_request_line(&mut reader, self.max_request_bytes)? {
            let reply = match std::str::from_utf8(&request) {
                Ok(line) => session.execute(line),
                Err(error) => {
                    debug!(
                        target: API_TARGET,
                        session = %session.session().id(),
                        %error,
                        "request is not UTF-8"
                    );
                    Reply::Error
                }
            };
            ResponseWriter::new(reader.get_mut()).write_reply(&reply)?;
        }
        Ok(())
    }
}

impl ConnectionHandler for ApiConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        let peer = stream
            .peer_addr()
            .map_or_else(|_| "unknown".to_owned(), |addr| addr.to_string());
        match self.serve(stream) {
            Ok(()) => debug!(target: API_TARGET, %peer, "client disconnected"),
            Err(error) => warn!(target: API_TARGET, %peer, %error, "connection closed"),
        }
    }
}

/// Reads one `\n`-terminated request line and strips its terminator and an
/// optional preceding `\r`.
///
/// Returns `Ok(None)` at end of stream. A trailing fragment without a newline
/// is discarded, since the client can no longer read a reply to it.
fn read_request_line<R: Read>(
    reader: &mut BufReader<R>,
    max_size: usize,
) -> Result<Option<Vec<u8>>, ApiError> {
    let mut buffer = Vec::new();
    let limit = u64::try_from(max_size).unwrap_or(u64::MAX).saturating_add(1);
    reader.by_ref().take(limit).read_until(b'\n', &mut buffer)?;

    if buffer.last() != Some(&b'\n') {
        if buffer.len() > max_size {
            return Err(ApiError::RequestTooLarge { max_size });
        }
        return Ok(None);
    }

    buffer.pop();
    if buffer.last() == Some(&b'\r') {
        buffer.pop();
    }
    Ok(Some(buffer))
}

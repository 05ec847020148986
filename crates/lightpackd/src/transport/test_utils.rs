//! Connection handler double that remembers who connected.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{ConnectionHandler, ConnectionStream};

/// Records the peer address of every accepted connection.
#[derive(Debug, Default)]
pub(crate) struct PeerRecorder {
    peers: Mutex<Vec<SocketAddr>>,
}

impl PeerRecorder {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn peers(&self) -> Vec<SocketAddr> {
        self.peers.lock().expect("peer list poisoned").clone()
    }

    /// Polls until at least `expected` peers were handled.
    pub(crate) fn wait_for(&self, expected: usize) -> Vec<SocketAddr> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            let peers = self.peers();
            if peers.len() >= expected {
                return peers;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        self.peers()
    }
}

impl ConnectionHandler for PeerRecorder {
    fn handle(&self, stream: ConnectionStream) {
        let peer = stream.peer_addr().expect("accepted stream has a peer");
        self.peers.lock().expect("peer list poisoned").push(peer);
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::frame::write_frame;
use crate::FrameError;
use region_balancer_core::{Region, TransmitError, Transport};
use std::net::{Shutdown, TcpStream};
use tracing::debug;

/// Sending half of a TCP connection to a worker.
pub struct SocketTransport {
    stream: TcpStream,
    peer: String,
}

impl SocketTransport {
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Self { stream, peer }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl Transport for SocketTransport {
    fn send(&mut self, region: &Region) -> Result<(), TransmitError> {
        write_frame(&mut self.stream, region).map_err(|e| match e {
            FrameError::Io(io) => TransmitError::Io(io),
            other => TransmitError::Encode {
                id: region.id,
                reason: other.to_string(),
            },
        })
    }

    fn close(&mut self) {
        // Also wakes the receive thread sharing this socket
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            debug!(peer = %self.peer, error = %e, "shutdown on already closed socket");
        }
    }
}

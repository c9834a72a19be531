// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Region, RegionId, TransmitError, Transport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Loopback transport that records every region it is handed.
///
/// Clones share the same log, so a caller can keep one clone for inspection
/// while the balancer owns another.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    log: Arc<Mutex<TransportLog>>,
}

#[derive(Default)]
struct TransportLog {
    sent: Vec<Region>,
    reject_sends: bool,
    closed: bool,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, TransportLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes subsequent sends fail with `TransmitError::Rejected`.
    pub fn reject_sends(&self, reject: bool) {
        self.log().reject_sends = reject;
    }

    pub fn sent_ids(&self) -> Vec<RegionId> {
        self.log().sent.iter().map(|r| r.id).collect()
    }

    pub fn sent_count(&self) -> usize {
        self.log().sent.len()
    }

    pub fn is_closed(&self) -> bool {
        self.log().closed
    }
}

impl Transport for InMemoryTransport {
    fn send(&mut self, region: &Region) -> Result<(), TransmitError> {
        let mut log = self.log();
        if log.closed {
            return Err(TransmitError::Closed);
        }
        if log.reject_sends {
            return Err(TransmitError::Rejected(region.id));
        }
        log.sent.push(region.clone());
        Ok(())
    }

    fn close(&mut self) {
        self.log().closed = true;
    }
}

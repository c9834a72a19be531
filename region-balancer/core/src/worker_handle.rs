// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Region, RegionId, TransmitError, Transport};
use std::collections::VecDeque;
use std::fmt;

/// Index of a registered worker inside its balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl WorkerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// A registered worker: its transport plus the regions sent to it that have
/// not been acknowledged yet, oldest first.
pub struct WorkerHandle<T: Transport> {
    id: WorkerId,
    transport: T,
    in_flight: VecDeque<Region>,
    desired_concurrency: Option<usize>,
}

impl<T: Transport> WorkerHandle<T> {
    pub fn new(id: WorkerId, transport: T) -> Self {
        Self {
            id,
            transport,
            in_flight: VecDeque::new(),
            desired_concurrency: None,
        }
    }

    /// Records `region` as in flight and sends it. The region stays recorded
    /// even when the send fails.
    pub fn dispatch(&mut self, region: Region) -> Result<(), TransmitError> {
        let result = self.transport.send(&region);
        self.in_flight.push_back(region);
        result
    }

    /// Acknowledges the oldest in-flight region.
    pub fn retire_oldest(&mut self) -> Option<Region> {
        self.in_flight.pop_front()
    }

    /// Empties the in-flight list, returning it in send order.
    pub fn take_in_flight(&mut self) -> Vec<Region> {
        self.in_flight.drain(..).collect()
    }

    pub fn clear_in_flight(&mut self) {
        self.in_flight.clear();
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn in_flight_ids(&self) -> Vec<RegionId> {
        self.in_flight.iter().map(|r| r.id).collect()
    }

    /// Advisory only; dispatch depth comes from the balancer's configuration.
    pub fn set_desired_concurrency(&mut self, n: usize) {
        self.desired_concurrency = Some(n);
    }

    pub fn desired_concurrency(&self) -> Option<usize> {
        self.desired_concurrency
    }

    pub fn close(&mut self) {
        self.transport.close();
    }
}

impl<T: Transport> fmt::Debug for WorkerHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("id", &self.id)
            .field("in_flight", &self.in_flight_ids())
            .field("desired_concurrency", &self.desired_concurrency)
            .finish()
    }
}

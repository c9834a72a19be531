// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Region, RegionId};
use std::collections::VecDeque;

/// Backlog of regions waiting to be sent to a worker.
///
/// Normal dispatch is FIFO. Work recovered from a failed worker goes back in
/// at the front so it is retried before anything fresh.
#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: VecDeque<Region>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, region: Region) {
        self.pending.push_back(region);
    }

    pub fn pop_front(&mut self) -> Option<Region> {
        self.pending.pop_front()
    }

    /// Inserts `regions` ahead of everything already queued, keeping their
    /// relative order.
    pub fn push_front_all<I>(&mut self, regions: I)
    where
        I: IntoIterator<Item = Region>,
        I::IntoIter: DoubleEndedIterator,
    {
        for region in regions.into_iter().rev() {
            self.pending.push_front(region);
        }
    }

    /// Drops the current backlog and replaces it with `regions`.
    pub fn replace(&mut self, regions: Vec<Region>) {
        self.pending = VecDeque::from(regions);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn ids(&self) -> Vec<RegionId> {
        self.pending.iter().map(|r| r.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, ComplexNumber};

    fn region(id: RegionId) -> Region {
        let mut region = Region::viewport(
            Bounds::Double {
                min: ComplexNumber::new(0.0, 0.0),
                max: ComplexNumber::new(1.0, 1.0),
            },
            10,
            10,
        );
        region.id = id;
        region
    }

    #[test]
    fn fifo_order() {
        let mut queue = WorkQueue::new();
        queue.push_back(region(1));
        queue.push_back(region(2));
        assert_eq!(queue.pop_front().map(|r| r.id), Some(1));
        assert_eq!(queue.pop_front().map(|r| r.id), Some(2));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn push_front_all_keeps_relative_order() {
        let mut queue = WorkQueue::new();
        queue.replace(vec![region(20), region(21)]);
        queue.push_front_all(vec![region(5), region(9)]);
        assert_eq!(queue.ids(), vec![5, 9, 20, 21]);
    }

    #[test]
    fn push_front_all_empty_is_noop() {
        let mut queue = WorkQueue::new();
        queue.push_back(region(3));
        queue.push_front_all(Vec::new());
        assert_eq!(queue.ids(), vec![3]);
    }

    #[test]
    fn replace_discards_previous_backlog() {
        let mut queue = WorkQueue::new();
        queue.push_back(region(1));
        queue.replace(vec![region(7)]);
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert!(queue.is_empty());
    }
}

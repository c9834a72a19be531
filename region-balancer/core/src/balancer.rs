// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    BalancerConfig, PartitionError, Partitioner, Region, RegionId, Transport, WorkQueue,
    WorkerHandle, WorkerId,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Splits viewports into blocks and keeps every registered worker's pipeline
/// full.
///
/// The pending queue and every worker's in-flight list live behind one mutex,
/// so completion and failure signals may arrive from any number of connection
/// threads at once. Each public method runs as a single critical section:
/// retiring a completed region and sending its replacement happen together,
/// and a failure requeue never interleaves with a dispatch to the same worker.
pub struct Balancer<T: Transport> {
    partitioner: Partitioner,
    pipeline_depth: usize,
    state: Mutex<BalancerState<T>>,
}

struct BalancerState<T: Transport> {
    queue: WorkQueue,
    workers: Vec<WorkerHandle<T>>,
    closed: bool,
}

impl<T: Transport> Balancer<T> {
    pub fn new(config: BalancerConfig) -> Self {
        Self {
            partitioner: Partitioner::from_config(&config),
            pipeline_depth: config.pipeline_depth,
            state: Mutex::new(BalancerState {
                queue: WorkQueue::new(),
                workers: Vec::new(),
                closed: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BalancerState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new batch for `viewport`.
    ///
    /// The previous backlog and every worker's in-flight bookkeeping are
    /// discarded, then each worker is sent up to `pipeline_depth` regions,
    /// one per worker per round. Returns the number of regions in the batch.
    /// A malformed viewport leaves the current batch untouched.
    pub fn distribute(&self, viewport: &Region) -> Result<usize, PartitionError> {
        let regions = self.partitioner.partition(viewport)?;
        let count = regions.len();

        let mut state = self.state();
        state.queue.replace(regions);
        for worker in state.workers.iter_mut() {
            worker.clear_in_flight();
        }

        info!(
            regions = count,
            workers = state.workers.len(),
            precise = viewport.is_precise(),
            "starting batch"
        );

        let dispatched = state.saturate(self.pipeline_depth);
        debug!(dispatched, pending = state.queue.len(), "initial saturation done");
        Ok(count)
    }

    /// Sends the next pending region to `worker`, if there is one.
    pub fn dispatch_one(&self, worker: WorkerId) {
        self.state().dispatch_one(worker);
    }

    /// `worker` finished its oldest in-flight region; retire it and refill.
    ///
    /// Completions are matched to sends purely by order.
    pub fn region_completed(&self, worker: WorkerId) {
        let mut state = self.state();
        let Some(handle) = state.workers.get_mut(worker.index()) else {
            warn!(%worker, "completion from unknown worker");
            return;
        };
        let Some(region) = handle.retire_oldest() else {
            debug!(%worker, "completion with nothing in flight");
            return;
        };
        debug!(%worker, region_id = region.id, "region completed");

        if state.closed {
            return;
        }
        state.dispatch_one(worker);
    }

    /// `worker` reported failure: everything it still holds goes back to the
    /// front of the queue in send order. The worker stays registered but is
    /// not sent anything new here. Returns how many regions were requeued.
    pub fn worker_failed(&self, worker: WorkerId) -> usize {
        let mut state = self.state();
        let BalancerState { queue, workers, .. } = &mut *state;
        let Some(handle) = workers.get_mut(worker.index()) else {
            warn!(%worker, "failure from unknown worker");
            return 0;
        };

        let failed = handle.take_in_flight();
        let requeued = failed.len();
        queue.push_front_all(failed);

        info!(%worker, requeued, pending = queue.len(), "requeued work of failed worker");
        requeued
    }

    /// Registers a worker. It takes part from the next `distribute` on.
    pub fn add_worker(&self, transport: T) -> WorkerId {
        match self.try_add_worker(transport, |_| Ok::<_, std::convert::Infallible>(())) {
            Ok((id, ())) => id,
            Err(never) => match never {},
        }
    }

    /// Registers a worker only if `start` succeeds for the id it will get.
    ///
    /// `start` runs while the balancer is locked, so no other worker can take
    /// the id in between. On error the transport is dropped and nothing is
    /// registered.
    pub fn try_add_worker<R, E, F>(&self, transport: T, start: F) -> Result<(WorkerId, R), E>
    where
        F: FnOnce(WorkerId) -> Result<R, E>,
    {
        let mut state = self.state();
        let id = WorkerId(state.workers.len());
        let started = start(id)?;
        state.workers.push(WorkerHandle::new(id, transport));
        info!(worker = %id, workers = state.workers.len(), "worker registered");
        Ok((id, started))
    }

    pub fn set_desired_concurrency(&self, worker: WorkerId, n: usize) {
        match self.state().workers.get_mut(worker.index()) {
            Some(handle) => {
                handle.set_desired_concurrency(n);
                debug!(%worker, desired = n, "desired concurrency updated");
            }
            None => warn!(%worker, "desired concurrency for unknown worker"),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.state().workers.len()
    }

    /// Tells every transport to shut down. Nothing is awaited, and replies
    /// that arrive afterwards only retire bookkeeping.
    pub fn close_all(&self) {
        let mut state = self.state();
        for worker in state.workers.iter_mut() {
            worker.close();
        }
        state.closed = true;
        info!(workers = state.workers.len(), "closed all workers");
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub fn pending_len(&self) -> usize {
        self.state().queue.len()
    }

    pub fn pending_ids(&self) -> Vec<RegionId> {
        self.state().queue.ids()
    }

    pub fn in_flight_len(&self, worker: WorkerId) -> Option<usize> {
        self.state()
            .workers
            .get(worker.index())
            .map(WorkerHandle::in_flight_len)
    }

    pub fn in_flight_ids(&self, worker: WorkerId) -> Option<Vec<RegionId>> {
        self.state()
            .workers
            .get(worker.index())
            .map(WorkerHandle::in_flight_ids)
    }

    pub fn desired_concurrency(&self, worker: WorkerId) -> Option<usize> {
        self.state()
            .workers
            .get(worker.index())
            .and_then(WorkerHandle::desired_concurrency)
    }
}

impl<T: Transport> BalancerState<T> {
    /// Pops the next region for `worker`. Returns whether one was taken, even
    /// if sending it failed.
    fn dispatch_one(&mut self, worker: WorkerId) -> bool {
        let Some(handle) = self.workers.get_mut(worker.index()) else {
            return false;
        };
        let Some(region) = self.queue.pop_front() else {
            return false;
        };

        let region_id = region.id;
        if let Err(e) = handle.dispatch(region) {
            warn!(%worker, region_id, error = %e, "failed to send region");
        }
        true
    }

    fn saturate(&mut self, depth: usize) -> usize {
        let mut dispatched = 0;
        for _ in 0..depth {
            for index in 0..self.workers.len() {
                if self.queue.is_empty() {
                    return dispatched;
                }
                if self.dispatch_one(WorkerId(index)) {
                    dispatched += 1;
                }
            }
        }
        dispatched
    }
}

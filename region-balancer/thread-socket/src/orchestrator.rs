// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::connection::{spawn_receiver, ReplyListener};
use crate::{ImageSink, LocalRenderer, OrchestratorError, SocketTransport};
use region_balancer_core::{Balancer, BalancerConfig, Region, WorkerId, WorkerReply};
use std::collections::BTreeSet;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use tracing::{error, info, warn};

/// How a render request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Rendered in-process because no worker was connected.
    Local,
    /// Split into `regions` blocks and handed to the balancer.
    Distributed { regions: usize },
}

/// Front end over the balancer: owns the worker connections, routes their
/// replies, and picks between distributed and local rendering.
pub struct Orchestrator {
    balancer: Arc<Balancer<SocketTransport>>,
    router: Arc<ReplyRouter>,
    local: Option<Box<dyn LocalRenderer>>,
    receivers: Mutex<Vec<JoinHandle<()>>>,
}

impl Orchestrator {
    pub fn new(config: BalancerConfig, sink: Arc<dyn ImageSink>) -> Self {
        let balancer = Arc::new(Balancer::new(config));
        let router = Arc::new(ReplyRouter {
            balancer: Arc::clone(&balancer),
            sink,
            closed: Mutex::new(BTreeSet::new()),
        });
        Self {
            balancer,
            router,
            local: None,
            receivers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_local_renderer(mut self, renderer: impl LocalRenderer + 'static) -> Self {
        self.local = Some(Box::new(renderer));
        self
    }

    pub fn balancer(&self) -> &Arc<Balancer<SocketTransport>> {
        &self.balancer
    }

    pub fn worker_count(&self) -> usize {
        self.balancer.worker_count()
    }

    /// Dials every `host:port` in `roster`. Unreachable entries are logged
    /// and skipped. Returns how many workers were registered.
    pub fn connect(&self, roster: &[String]) -> usize {
        let mut connected = 0;
        for addr in roster {
            let stream = match TcpStream::connect(addr.as_str()) {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(addr = %addr, error = %e, "could not reach worker");
                    continue;
                }
            };
            match self.add_connection(stream) {
                Ok(_) => connected += 1,
                Err(e) => warn!(addr = %addr, error = %e, "could not register worker"),
            }
        }
        connected
    }

    /// Registers an established connection and starts its receive thread.
    pub fn add_connection(&self, stream: TcpStream) -> Result<WorkerId, OrchestratorError> {
        stream.set_nodelay(true)?;
        let reader = stream.try_clone()?;
        let transport = SocketTransport::new(stream);
        let peer = transport.peer().to_string();

        let (worker, handle) = self.balancer.try_add_worker(transport, |worker| {
            spawn_receiver(worker, reader, Arc::clone(&self.router))
        })?;
        self.receivers().push(handle);

        info!(%worker, peer = %peer, "worker connected");
        Ok(worker)
    }

    /// Renders `viewport`: across the workers when there are any, locally
    /// otherwise.
    pub fn render(&self, viewport: &Region) -> Result<RenderOutcome, OrchestratorError> {
        if self.balancer.worker_count() == 0 {
            let renderer = self.local.as_ref().ok_or(OrchestratorError::NoLocalRenderer)?;
            info!("no workers connected, rendering locally");
            let image = renderer.render(viewport)?;
            self.router.sink.image_ready(image);
            return Ok(RenderOutcome::Local);
        }

        let regions = self.balancer.distribute(viewport)?;
        Ok(RenderOutcome::Distributed { regions })
    }

    /// Workers whose connection has ended.
    pub fn closed_connections(&self) -> Vec<WorkerId> {
        self.router.closed().iter().copied().collect()
    }

    /// Shuts every connection and waits for the receive threads to exit.
    /// Replies still in transit are dropped.
    pub fn close(&self) {
        self.balancer.close_all();
        let handles: Vec<_> = self.receivers().drain(..).collect();
        for handle in handles {
            if handle.join().is_err() {
                error!("receive thread panicked");
            }
        }
    }

    fn receivers(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.receivers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Feeds worker replies into the balancer and completed images into the sink.
struct ReplyRouter {
    balancer: Arc<Balancer<SocketTransport>>,
    sink: Arc<dyn ImageSink>,
    closed: Mutex<BTreeSet<WorkerId>>,
}

impl ReplyRouter {
    fn closed(&self) -> MutexGuard<'_, BTreeSet<WorkerId>> {
        self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReplyListener for ReplyRouter {
    fn reply_received(&self, worker: WorkerId, reply: WorkerReply) {
        match reply {
            WorkerReply::Capacity(n) => self.balancer.set_desired_concurrency(worker, n),
            WorkerReply::Completed(image) => {
                self.balancer.region_completed(worker);
                self.sink.image_ready(image);
            }
            WorkerReply::Failed => {
                self.balancer.worker_failed(worker);
            }
        }
    }

    fn connection_closed(&self, worker: WorkerId) {
        self.closed().insert(worker);

        // Closure alone does not requeue; only a failure reply does
        let stranded = self.balancer.in_flight_len(worker).unwrap_or(0);
        if stranded > 0 && !self.balancer.is_closed() {
            warn!(%worker, stranded, "connection closed with regions outstanding");
        } else {
            info!(%worker, "connection closed");
        }
    }
}

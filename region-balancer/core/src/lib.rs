// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod complex_number;
pub use complex_number::{ComplexNumber, PreciseComplexNumber};

mod region;
pub use region::{Bounds, ColoringAlgorithm, Region, RegionId};

mod error;
pub use error::{PartitionError, TransmitError};

mod config;
pub use config::BalancerConfig;

mod partitioner;
pub use partitioner::Partitioner;

mod work_queue;
pub use work_queue::WorkQueue;

mod transport;
pub use transport::Transport;

mod worker_handle;
pub use worker_handle::{WorkerHandle, WorkerId};

mod worker_reply;
pub use worker_reply::{ImageResult, WorkerReply};

mod balancer;
pub use balancer::Balancer;

pub mod in_memory_transport;
pub use in_memory_transport::InMemoryTransport;

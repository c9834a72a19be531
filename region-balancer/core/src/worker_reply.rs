// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::RegionId;
use serde::{Deserialize, Serialize};

/// A rendered block coming back from a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Id of the region this image was rendered from.
    pub id: RegionId,
    pub x: u32,
    pub y: u32,
    /// Encoded pixel bytes, opaque to the balancer.
    pub image: Vec<u8>,
}

/// Message types sent by workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerReply {
    /// Number of calculators the worker runs in parallel
    Capacity(usize),
    /// The oldest outstanding region finished
    Completed(ImageResult),
    /// The worker gave up on its current region
    Failed,
}

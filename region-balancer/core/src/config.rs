// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};

pub const DEFAULT_BLOCK_WIDTH: u32 = 10;
pub const DEFAULT_BLOCK_HEIGHT: u32 = 10;
pub const DEFAULT_PIPELINE_DEPTH: usize = 4;

/// Knobs of the balancer, passed in explicitly at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Pixel width of every partitioned block.
    pub block_width: u32,
    /// Pixel height of every partitioned block.
    pub block_height: u32,
    /// Regions sent to each worker ahead of any acknowledgement.
    pub pipeline_depth: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            block_width: DEFAULT_BLOCK_WIDTH,
            block_height: DEFAULT_BLOCK_HEIGHT,
            pipeline_depth: DEFAULT_PIPELINE_DEPTH,
        }
    }
}

impl BalancerConfig {
    pub fn with_block_size(mut self, width: u32, height: u32) -> Self {
        self.block_width = width;
        self.block_height = height;
        self
    }

    pub fn with_pipeline_depth(mut self, depth: usize) -> Self {
        self.pipeline_depth = depth;
        self
    }
}

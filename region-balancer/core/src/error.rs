// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::RegionId;
use thiserror::Error;

/// The viewport handed to `distribute` could not be split into blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("viewport has non-positive dimensions {width}x{height}")]
    NonPositiveDimensions { width: u32, height: u32 },

    #[error("block size must be positive, got {width}x{height}")]
    InvalidBlockSize { width: u32, height: u32 },

    #[error("viewport bounds are not finite")]
    NonFiniteBounds,

    #[error("viewport bounds are inverted: min must lie strictly below max on both axes")]
    InvertedBounds,

    #[error("a {blocks_wide}x{blocks_high} block grid is too large to hold in memory")]
    TooManyBlocks { blocks_wide: u32, blocks_high: u32 },
}

/// Sending a region to a worker failed.
#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("connection to worker is closed")]
    Closed,

    #[error("failed to encode region {id}: {reason}")]
    Encode { id: RegionId, reason: String },

    #[error("transport rejected region {0}")]
    Rejected(RegionId),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

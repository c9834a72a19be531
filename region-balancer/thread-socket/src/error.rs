// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use region_balancer_core::PartitionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame body: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("frame of {0} bytes exceeds the size limit")]
    TooLarge(usize),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("local rendering failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("no workers connected and no local renderer configured")]
    NoLocalRenderer,

    #[error("failed to set up connection: {0}")]
    Connection(#[from] std::io::Error),
}

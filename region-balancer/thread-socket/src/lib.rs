// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod error;
pub use error::{ConfigError, FrameError, OrchestratorError, RenderError};

mod config;
pub use config::Config;

pub mod frame;

mod socket_transport;
pub use socket_transport::SocketTransport;

mod connection;
pub use connection::{spawn_receiver, ReplyListener};

mod image_sink;
pub use image_sink::{ImageSink, LocalRenderer};

mod orchestrator;
pub use orchestrator::{Orchestrator, RenderOutcome};

mod tile_writer;
pub use tile_writer::TileWriter;

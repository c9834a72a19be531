// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Region, TransmitError};

/// Outbound half of a connection to one worker.
///
/// Replies arrive on the transport's own receive loop and are fed back into
/// the balancer by whoever owns that loop; this trait only covers sending and
/// shutting the connection down.
pub trait Transport: Send {
    /// Hands `region` to the worker. Failures are reported, never retried.
    fn send(&mut self, region: &Region) -> Result<(), TransmitError>;

    /// Terminates the connection without waiting for the worker.
    fn close(&mut self);
}

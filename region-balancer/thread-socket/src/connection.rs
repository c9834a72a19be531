// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::frame::read_frame;
use crate::FrameError;
use region_balancer_core::{WorkerId, WorkerReply};
use std::io::{self, BufReader};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Receives everything a worker connection reports.
///
/// Called from the connection's own receive thread, so implementations see
/// calls for different workers concurrently.
pub trait ReplyListener: Send + Sync {
    fn reply_received(&self, worker: WorkerId, reply: WorkerReply);

    /// The connection is gone; no further calls for `worker` will follow.
    fn connection_closed(&self, worker: WorkerId);
}

/// Starts the receive thread for one worker connection.
pub fn spawn_receiver<L>(
    worker: WorkerId,
    stream: TcpStream,
    listener: Arc<L>,
) -> io::Result<JoinHandle<()>>
where
    L: ReplyListener + ?Sized + 'static,
{
    thread::Builder::new()
        .name(format!("{}-rx", worker))
        .spawn(move || {
            let mut reader = BufReader::new(stream);
            loop {
                match read_frame::<WorkerReply, _>(&mut reader) {
                    Ok(Some(reply)) => listener.reply_received(worker, reply),
                    Ok(None) => {
                        debug!(%worker, "worker closed the connection");
                        break;
                    }
                    Err(FrameError::Codec(e)) => {
                        warn!(%worker, error = %e, "skipping malformed reply");
                    }
                    Err(e) => {
                        debug!(%worker, error = %e, "receive loop ended");
                        break;
                    }
                }
            }
            listener.connection_closed(worker);
        })
}

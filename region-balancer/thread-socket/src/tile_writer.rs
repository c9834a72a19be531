// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::ImageSink;
use region_balancer_core::{ImageResult, RegionId};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

/// Writes every received tile's raw bytes to a directory and lets a caller
/// block until a batch is complete.
pub struct TileWriter {
    output_dir: PathBuf,
    progress: Mutex<Progress>,
    arrived: Condvar,
}

#[derive(Default)]
struct Progress {
    received: HashSet<RegionId>,
    cancelled: bool,
}

impl TileWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> io::Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            progress: Mutex::new(Progress::default()),
            arrived: Condvar::new(),
        })
    }

    pub fn tile_path(&self, image: &ImageResult) -> PathBuf {
        self.output_dir
            .join(format!("tile-{}-{}-{}.bin", image.id, image.x, image.y))
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of distinct region ids written so far.
    pub fn received(&self) -> usize {
        self.progress().received.len()
    }

    /// Blocks until `expected` distinct tiles have arrived. Returns `false`
    /// if `cancel` was called first.
    pub fn wait_until_complete(&self, expected: usize) -> bool {
        let progress = self
            .arrived
            .wait_while(self.progress(), |p| !p.cancelled && p.received.len() < expected)
            .unwrap_or_else(PoisonError::into_inner);
        progress.received.len() >= expected
    }

    pub fn cancel(&self) {
        self.progress().cancelled = true;
        self.arrived.notify_all();
    }
}

impl ImageSink for TileWriter {
    fn image_ready(&self, image: ImageResult) {
        let path = self.tile_path(&image);
        if let Err(e) = fs::write(&path, &image.image) {
            error!(
                region_id = image.id,
                path = %path.display(),
                error = %e,
                "failed to write tile"
            );
            return;
        }
        debug!(region_id = image.id, path = %path.display(), "tile written");

        self.progress().received.insert(image.id);
        self.arrived.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("region-balancer-{}-{}", name, std::process::id()))
    }

    fn tile(id: RegionId) -> ImageResult {
        ImageResult {
            id,
            x: id as u32 * 10,
            y: 0,
            image: vec![id as u8; 3],
        }
    }

    #[test]
    fn writes_tile_bytes_named_by_id_and_offset() {
        let dir = scratch_dir("write");
        let writer = TileWriter::new(&dir).unwrap();

        writer.image_ready(tile(4));

        let path = dir.join("tile-4-40-0.bin");
        assert_eq!(fs::read(&path).unwrap(), vec![4, 4, 4]);
        assert_eq!(writer.received(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn duplicate_ids_count_once() {
        let dir = scratch_dir("dupes");
        let writer = TileWriter::new(&dir).unwrap();

        writer.image_ready(tile(1));
        writer.image_ready(tile(1));

        assert_eq!(writer.received(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn wait_returns_once_all_tiles_arrive() {
        let dir = scratch_dir("wait");
        let writer = Arc::new(TileWriter::new(&dir).unwrap());

        let producer = {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for id in 0..5 {
                    writer.image_ready(tile(id));
                }
            })
        };

        assert!(writer.wait_until_complete(5));
        producer.join().unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn cancel_wakes_waiter() {
        let dir = scratch_dir("cancel");
        let writer = Arc::new(TileWriter::new(&dir).unwrap());

        let canceller = {
            let writer = Arc::clone(&writer);
            thread::spawn(move || writer.cancel())
        };

        assert!(!writer.wait_until_complete(10));
        canceller.join().unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }
}

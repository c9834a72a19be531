// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::RenderError;
use region_balancer_core::{ImageResult, Region};

/// Consumer of finished sub-images, whether rendered remotely or locally.
pub trait ImageSink: Send + Sync {
    fn image_ready(&self, image: ImageResult);
}

/// Renders a whole viewport in-process, used when no worker is connected.
pub trait LocalRenderer: Send + Sync {
    fn render(&self, viewport: &Region) -> Result<ImageResult, RenderError>;
}

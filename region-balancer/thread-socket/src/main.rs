// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bigdecimal::BigDecimal;
use clap::{Parser, ValueEnum};
use region_balancer_core::{Bounds, ColoringAlgorithm, ComplexNumber, PreciseComplexNumber, Region};
use region_balancer_thread_socket::{Config, Orchestrator, RenderOutcome, TileWriter};
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Coloring {
    Banded,
    Smooth,
}

impl From<Coloring> for ColoringAlgorithm {
    fn from(coloring: Coloring) -> Self {
        match coloring {
            Coloring::Banded => ColoringAlgorithm::Banded,
            Coloring::Smooth => ColoringAlgorithm::Smooth,
        }
    }
}

/// Render a region of the complex plane across a pool of remote workers
#[derive(Debug, Parser)]
#[command(name = "region-balancer-thread-socket")]
struct Args {
    /// JSON file with block size, pipeline depth and worker roster
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Directory receiving one file per rendered tile
    #[arg(long, default_value = "tiles")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = 500)]
    width: u32,

    #[arg(long, default_value_t = 500)]
    height: u32,

    #[arg(long, default_value = "-2", allow_hyphen_values = true)]
    min_re: String,

    #[arg(long, default_value = "-2", allow_hyphen_values = true)]
    min_im: String,

    #[arg(long, default_value = "2", allow_hyphen_values = true)]
    max_re: String,

    #[arg(long, default_value = "2", allow_hyphen_values = true)]
    max_im: String,

    #[arg(long, default_value_t = 10_000)]
    max_iterations: u32,

    #[arg(long, default_value_t = 2)]
    power: u32,

    #[arg(long, value_enum, default_value_t = Coloring::Banded)]
    coloring: Coloring,

    /// Compute block bounds with arbitrary-precision decimals
    #[arg(long)]
    precise: bool,

    #[arg(long, default_value_t = 256)]
    precision_bits: u32,

    /// Julia basis point; renders the Mandelbrot set when omitted
    #[arg(long, requires = "julia_im", allow_hyphen_values = true)]
    julia_re: Option<f64>,

    #[arg(long, requires = "julia_re", allow_hyphen_values = true)]
    julia_im: Option<f64>,
}

impl Args {
    fn viewport(&self) -> Result<Region, Box<dyn Error>> {
        let bounds = if self.precise {
            Bounds::Precise {
                min: PreciseComplexNumber::new(
                    BigDecimal::from_str(&self.min_re)?,
                    BigDecimal::from_str(&self.min_im)?,
                ),
                max: PreciseComplexNumber::new(
                    BigDecimal::from_str(&self.max_re)?,
                    BigDecimal::from_str(&self.max_im)?,
                ),
            }
        } else {
            Bounds::Double {
                min: ComplexNumber::new(self.min_re.parse()?, self.min_im.parse()?),
                max: ComplexNumber::new(self.max_re.parse()?, self.max_im.parse()?),
            }
        };

        let mut viewport = Region::viewport(bounds, self.width, self.height)
            .with_max_iterations(self.max_iterations)
            .with_power(self.power)
            .with_coloring(self.coloring.into())
            .with_precision_bits(self.precision_bits);
        if let (Some(re), Some(im)) = (self.julia_re, self.julia_im) {
            viewport = viewport.with_julia(ComplexNumber::new(re, im));
        }
        Ok(viewport)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let start_time = Instant::now();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "using default configuration");
            Config::default()
        }
    };
    info!(
        block_width = config.balancer.block_width,
        block_height = config.balancer.block_height,
        pipeline_depth = config.balancer.pipeline_depth,
        roster = config.workers.len(),
        "configuration loaded"
    );

    let viewport = args.viewport()?;
    let tiles = Arc::new(TileWriter::new(&args.output_dir)?);
    let orchestrator = Arc::new(Orchestrator::new(config.balancer, tiles.clone()));

    let connected = orchestrator.connect(&config.workers);
    info!(connected, configured = config.workers.len(), "worker roster processed");

    {
        let orchestrator = Arc::clone(&orchestrator);
        let tiles = Arc::clone(&tiles);
        ctrlc::set_handler(move || {
            info!("Ctrl+C received, initiating shutdown");
            orchestrator.close();
            tiles.cancel();
        })?;
    }

    match orchestrator.render(&viewport)? {
        RenderOutcome::Local => info!("viewport rendered locally"),
        RenderOutcome::Distributed { regions } => {
            if tiles.wait_until_complete(regions) {
                info!(regions, output = %args.output_dir.display(), "all tiles received");
            } else {
                warn!(received = tiles.received(), regions, "render interrupted");
            }
        }
    }

    orchestrator.close();
    info!(elapsed_s = start_time.elapsed().as_secs_f64(), "done");
    Ok(())
}

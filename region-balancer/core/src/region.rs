// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{ComplexNumber, PreciseComplexNumber};
use serde::{Deserialize, Serialize};

/// Identifier of a region, unique within one distribution batch.
pub type RegionId = u64;

pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;
pub const DEFAULT_POWER: u32 = 2;
pub const DEFAULT_PRECISION_BITS: u32 = 256;

/// Selects how a worker maps escape iterations to colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColoringAlgorithm {
    #[default]
    Banded,
    Smooth,
}

/// Lower/upper corners of a region on the complex plane.
///
/// The variant doubles as the arbitrary-precision flag: a region is precise
/// exactly when its bounds are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bounds {
    Double {
        min: ComplexNumber,
        max: ComplexNumber,
    },
    Precise {
        min: PreciseComplexNumber,
        max: PreciseComplexNumber,
    },
}

impl Bounds {
    pub fn is_precise(&self) -> bool {
        matches!(self, Bounds::Precise { .. })
    }
}

/// One rectangular unit of work: a slice of the complex plane, where it goes
/// on the canvas, and the parameters a worker needs to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub bounds: Bounds,
    /// Basis point for Julia sets; `None` renders the Mandelbrot set.
    pub julia: Option<ComplexNumber>,
    pub width: u32,
    pub height: u32,
    /// Absolute pixel offset into the full output.
    pub x: u32,
    pub y: u32,
    pub max_iterations: u32,
    pub power: u32,
    pub coloring: ColoringAlgorithm,
    pub precision_bits: u32,
}

impl Region {
    /// A full viewport anchored at the canvas origin, with default render
    /// parameters.
    pub fn viewport(bounds: Bounds, width: u32, height: u32) -> Self {
        Self {
            id: 0,
            bounds,
            julia: None,
            width,
            height,
            x: 0,
            y: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            power: DEFAULT_POWER,
            coloring: ColoringAlgorithm::default(),
            precision_bits: DEFAULT_PRECISION_BITS,
        }
    }

    pub fn with_julia(mut self, julia: ComplexNumber) -> Self {
        self.julia = Some(julia);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    pub fn with_coloring(mut self, coloring: ColoringAlgorithm) -> Self {
        self.coloring = coloring;
        self
    }

    pub fn with_precision_bits(mut self, precision_bits: u32) -> Self {
        self.precision_bits = precision_bits;
        self
    }

    pub fn is_precise(&self) -> bool {
        self.bounds.is_precise()
    }
}

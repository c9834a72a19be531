// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    BalancerConfig, Bounds, ComplexNumber, PartitionError, PreciseComplexNumber, Region,
    RegionId,
};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;

/// Decimal digits used when a precise viewport asks for zero bits.
const FALLBACK_PRECISION_DIGITS: u64 = 34;

/// Extra digits carried through the span division before rounding.
const GUARD_DIGITS: u64 = 20;

/// Splits a viewport into a row-major grid of fixed-size blocks.
///
/// Trailing pixels that do not fill a whole block are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    block_width: u32,
    block_height: u32,
}

impl Partitioner {
    pub fn new(block_width: u32, block_height: u32) -> Self {
        Self {
            block_width,
            block_height,
        }
    }

    pub fn from_config(config: &BalancerConfig) -> Self {
        Self::new(config.block_width, config.block_height)
    }

    /// Number of blocks `partition` would produce for a viewport of this size,
    /// or `None` when the count does not fit in a `usize`.
    pub fn block_count(&self, width: u32, height: u32) -> Option<usize> {
        if self.block_width == 0 || self.block_height == 0 {
            return Some(0);
        }
        let blocks_wide = usize::try_from(width / self.block_width).ok()?;
        let blocks_high = usize::try_from(height / self.block_height).ok()?;
        blocks_wide.checked_mul(blocks_high)
    }

    /// Produces the blocks of `viewport` in row-major order, ids starting at 0.
    pub fn partition(&self, viewport: &Region) -> Result<Vec<Region>, PartitionError> {
        self.validate(viewport)?;

        let blocks_wide = viewport.width / self.block_width;
        let blocks_high = viewport.height / self.block_height;
        let too_many = PartitionError::TooManyBlocks {
            blocks_wide,
            blocks_high,
        };
        let count = self
            .block_count(viewport.width, viewport.height)
            .ok_or_else(|| too_many.clone())?;
        let mut regions = Vec::new();
        regions.try_reserve_exact(count).map_err(|_| too_many)?;

        let grid = BlockGrid::new(viewport, self.block_width, self.block_height);

        for row in 0..blocks_high {
            for col in 0..blocks_wide {
                let id = RegionId::from(row) * RegionId::from(blocks_wide) + RegionId::from(col);
                regions.push(Region {
                    id,
                    bounds: grid.block_bounds(row, col),
                    julia: viewport.julia,
                    width: self.block_width,
                    height: self.block_height,
                    x: col * self.block_width,
                    y: row * self.block_height,
                    max_iterations: viewport.max_iterations,
                    power: viewport.power,
                    coloring: viewport.coloring,
                    precision_bits: viewport.precision_bits,
                });
            }
        }

        Ok(regions)
    }

    fn validate(&self, viewport: &Region) -> Result<(), PartitionError> {
        if self.block_width == 0 || self.block_height == 0 {
            return Err(PartitionError::InvalidBlockSize {
                width: self.block_width,
                height: self.block_height,
            });
        }
        if viewport.width == 0 || viewport.height == 0 {
            return Err(PartitionError::NonPositiveDimensions {
                width: viewport.width,
                height: viewport.height,
            });
        }
        match &viewport.bounds {
            Bounds::Double { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(PartitionError::NonFiniteBounds);
                }
                if min.re >= max.re || min.im >= max.im {
                    return Err(PartitionError::InvertedBounds);
                }
            }
            Bounds::Precise { min, max } => {
                if min.re >= max.re || min.im >= max.im {
                    return Err(PartitionError::InvertedBounds);
                }
            }
        }
        Ok(())
    }
}

/// Per-block spans on the complex plane, in whichever arithmetic the viewport
/// asked for.
enum BlockGrid {
    Double {
        origin: ComplexNumber,
        span_re: f64,
        span_im: f64,
    },
    Precise {
        origin: PreciseComplexNumber,
        span_re: BigDecimal,
        span_im: BigDecimal,
        digits: u64,
    },
}

impl BlockGrid {
    fn new(viewport: &Region, block_width: u32, block_height: u32) -> Self {
        match &viewport.bounds {
            Bounds::Double { min, max } => BlockGrid::Double {
                origin: *min,
                span_re: (max.re - min.re) / f64::from(viewport.width) * f64::from(block_width),
                span_im: (max.im - min.im) / f64::from(viewport.height)
                    * f64::from(block_height),
            },
            Bounds::Precise { min, max } => {
                let digits = precision_digits(viewport.precision_bits);
                let span_re = divide(
                    (&max.re - &min.re) * BigDecimal::from(block_width),
                    viewport.width,
                    digits,
                );
                let span_im = divide(
                    (&max.im - &min.im) * BigDecimal::from(block_height),
                    viewport.height,
                    digits,
                );
                BlockGrid::Precise {
                    origin: min.clone(),
                    span_re,
                    span_im,
                    digits,
                }
            }
        }
    }

    fn block_bounds(&self, row: u32, col: u32) -> Bounds {
        match self {
            BlockGrid::Double {
                origin,
                span_re,
                span_im,
            } => Bounds::Double {
                min: ComplexNumber::new(
                    origin.re + f64::from(col) * span_re,
                    origin.im + f64::from(row) * span_im,
                ),
                max: ComplexNumber::new(
                    origin.re + f64::from(col + 1) * span_re,
                    origin.im + f64::from(row + 1) * span_im,
                ),
            },
            BlockGrid::Precise {
                origin,
                span_re,
                span_im,
                digits,
            } => {
                let offset = |base: &BigDecimal, span: &BigDecimal, steps: u32| {
                    (base + span * BigDecimal::from(steps)).with_prec(*digits)
                };
                Bounds::Precise {
                    min: PreciseComplexNumber::new(
                        offset(&origin.re, span_re, col),
                        offset(&origin.im, span_im, row),
                    ),
                    max: PreciseComplexNumber::new(
                        offset(&origin.re, span_re, col + 1),
                        offset(&origin.im, span_im, row + 1),
                    ),
                }
            }
        }
    }
}

/// `numerator / divisor` carried to at least `digits` significant digits.
///
/// `BigDecimal`'s `/` stops at a fixed 100 digits, so the quotient is taken on
/// the integer mantissa after shifting it left far enough.
fn divide(numerator: BigDecimal, divisor: u32, digits: u64) -> BigDecimal {
    let (mantissa, scale) = numerator.as_bigint_and_exponent();
    let shift = digits + GUARD_DIGITS + u64::from(divisor.max(1).ilog10()) + 1;
    let scaled = mantissa * BigInt::from(10u8).pow(shift as u32);
    BigDecimal::new(scaled / BigInt::from(divisor.max(1)), scale + shift as i64).with_prec(digits)
}

/// Decimal digits needed to carry `bits` binary digits of mantissa.
fn precision_digits(bits: u32) -> u64 {
    if bits == 0 {
        return FALLBACK_PRECISION_DIGITS;
    }
    // log10(2) ~= 0.30103
    (u64::from(bits) * 30_103).div_ceil(100_000)
}

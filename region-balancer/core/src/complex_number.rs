// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the complex plane in double precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexNumber {
    pub re: f64,
    pub im: f64,
}

impl ComplexNumber {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl fmt::Display for ComplexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}i", self.re, self.im)
    }
}

/// A point on the complex plane backed by arbitrary-precision decimals.
///
/// Used for deep zooms where the spacing between neighbouring blocks is
/// smaller than what an `f64` can tell apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreciseComplexNumber {
    pub re: BigDecimal,
    pub im: BigDecimal,
}

impl PreciseComplexNumber {
    pub fn new(re: BigDecimal, im: BigDecimal) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for PreciseComplexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}i", self.re, self.im)
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bigdecimal::BigDecimal;
use region_balancer_core::{
    BalancerConfig, Bounds, ColoringAlgorithm, ComplexNumber, PartitionError, Partitioner,
    PreciseComplexNumber, Region,
};
use std::str::FromStr;

fn double_viewport(width: u32, height: u32) -> Region {
    Region::viewport(
        Bounds::Double {
            min: ComplexNumber::new(-2.0, -2.0),
            max: ComplexNumber::new(2.0, 2.0),
        },
        width,
        height,
    )
}

fn decimal(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

// ============================================================
// grid shape
// ============================================================

#[test]
fn test_block_count_matches_floor_division() {
    let partitioner = Partitioner::new(10, 10);
    let regions = partitioner.partition(&double_viewport(100, 100)).unwrap();
    assert_eq!(regions.len(), 100);

    let partitioner = Partitioner::new(16, 8);
    let regions = partitioner.partition(&double_viewport(100, 50)).unwrap();
    assert_eq!(regions.len(), (100 / 16) * (50 / 8));
}

#[test]
fn test_ids_are_row_major_and_offsets_follow_grid() {
    let partitioner = Partitioner::new(10, 20);
    let regions = partitioner.partition(&double_viewport(30, 40)).unwrap();

    let ids: Vec<u64> = regions.iter().map(|r| r.id).collect();
    assert_eq!(ids, (0..6).collect::<Vec<u64>>());

    for region in &regions {
        let row = region.id / 3;
        let col = region.id % 3;
        assert_eq!(u64::from(region.x), col * 10, "x of block {}", region.id);
        assert_eq!(u64::from(region.y), row * 20, "y of block {}", region.id);
        assert_eq!(region.width, 10);
        assert_eq!(region.height, 20);
    }

    assert_eq!((regions[0].x, regions[0].y), (0, 0));
}

#[test]
fn test_trailing_pixels_are_dropped() {
    let partitioner = Partitioner::new(10, 10);
    let regions = partitioner.partition(&double_viewport(105, 19)).unwrap();
    assert_eq!(regions.len(), 10);
    assert!(regions.iter().all(|r| r.x + r.width <= 100 && r.y + r.height <= 10));
}

#[test]
fn test_viewport_smaller_than_block_yields_nothing() {
    let partitioner = Partitioner::new(10, 10);
    let regions = partitioner.partition(&double_viewport(9, 100)).unwrap();
    assert!(regions.is_empty());
}

// ============================================================
// complex-plane bounds
// ============================================================

#[test]
fn test_double_bounds_interpolate_viewport() {
    let partitioner = Partitioner::new(10, 10);
    let regions = partitioner.partition(&double_viewport(40, 40)).unwrap();

    // 4x4 grid over [-2, 2]; row 1, col 2
    let block = &regions[6];
    match &block.bounds {
        Bounds::Double { min, max } => {
            assert_eq!(*min, ComplexNumber::new(0.0, -1.0));
            assert_eq!(*max, ComplexNumber::new(1.0, 0.0));
        }
        other => panic!("Expected double bounds, got {:?}", other),
    }

    let last = regions.last().unwrap();
    match &last.bounds {
        Bounds::Double { max, .. } => assert_eq!(*max, ComplexNumber::new(2.0, 2.0)),
        other => panic!("Expected double bounds, got {:?}", other),
    }
}

#[test]
fn test_precise_bounds_use_decimal_arithmetic() {
    let viewport = Region::viewport(
        Bounds::Precise {
            min: PreciseComplexNumber::new(decimal("-0.75"), decimal("0.1")),
            max: PreciseComplexNumber::new(
                decimal("-0.7499999999999999999999"),
                decimal("0.1000000000000000000001"),
            ),
        },
        20,
        20,
    )
    .with_precision_bits(256);

    let regions = Partitioner::new(10, 10).partition(&viewport).unwrap();
    assert_eq!(regions.len(), 4);

    // Block spacing is far below f64 resolution at this magnitude
    match &regions[3].bounds {
        Bounds::Precise { min, max } => {
            assert_eq!(min.re, decimal("-0.74999999999999999999995"));
            assert_eq!(min.im, decimal("0.10000000000000000000005"));
            assert_eq!(max.re, decimal("-0.7499999999999999999999"));
            assert_eq!(max.im, decimal("0.1000000000000000000001"));
        }
        other => panic!("Expected precise bounds, got {:?}", other),
    }
    assert!(regions.iter().all(Region::is_precise));
}

#[test]
fn test_precise_bounds_keep_more_than_a_hundred_digits() {
    let viewport = Region::viewport(
        Bounds::Precise {
            min: PreciseComplexNumber::new(decimal("0"), decimal("0")),
            max: PreciseComplexNumber::new(decimal("1"), decimal("1")),
        },
        30,
        30,
    )
    .with_precision_bits(1024);

    let regions = Partitioner::new(10, 10).partition(&viewport).unwrap();
    assert_eq!(regions.len(), 9);

    // A third of the unit span, carried to 1024 bits (309 digits)
    let one = decimal("1");
    let three = decimal("3");
    let tolerance = decimal("1e-300");
    match &regions[0].bounds {
        Bounds::Precise { max, .. } => {
            assert!((&three * &max.re - &one).abs() < tolerance);
            assert!((&three * &max.im - &one).abs() < tolerance);
        }
        other => panic!("Expected precise bounds, got {:?}", other),
    }
    match &regions[4].bounds {
        Bounds::Precise { min, max } => {
            assert!((&three * &min.re - &one).abs() < tolerance);
            assert!((&three * &max.re - decimal("2")).abs() < tolerance);
        }
        other => panic!("Expected precise bounds, got {:?}", other),
    }
}

#[test]
fn test_render_parameters_are_copied_to_every_block() {
    let viewport = double_viewport(20, 10)
        .with_julia(ComplexNumber::new(-0.8, 0.156))
        .with_max_iterations(500)
        .with_power(3)
        .with_coloring(ColoringAlgorithm::Smooth)
        .with_precision_bits(64);

    let regions = Partitioner::from_config(&BalancerConfig::default())
        .partition(&viewport)
        .unwrap();

    assert_eq!(regions.len(), 2);
    for region in regions {
        assert_eq!(region.julia, Some(ComplexNumber::new(-0.8, 0.156)));
        assert_eq!(region.max_iterations, 500);
        assert_eq!(region.power, 3);
        assert_eq!(region.coloring, ColoringAlgorithm::Smooth);
        assert_eq!(region.precision_bits, 64);
        assert!(!region.is_precise());
    }
}

// ============================================================
// malformed viewports
// ============================================================

#[test]
fn test_reject_zero_dimensions() {
    let partitioner = Partitioner::new(10, 10);
    assert_eq!(
        partitioner.partition(&double_viewport(0, 100)),
        Err(PartitionError::NonPositiveDimensions {
            width: 0,
            height: 100
        })
    );
}

#[test]
fn test_reject_inverted_bounds() {
    let viewport = Region::viewport(
        Bounds::Double {
            min: ComplexNumber::new(1.0, -1.0),
            max: ComplexNumber::new(-1.0, 1.0),
        },
        100,
        100,
    );
    assert_eq!(
        Partitioner::new(10, 10).partition(&viewport),
        Err(PartitionError::InvertedBounds)
    );

    let precise = Region::viewport(
        Bounds::Precise {
            min: PreciseComplexNumber::new(decimal("0"), decimal("1")),
            max: PreciseComplexNumber::new(decimal("1"), decimal("1")),
        },
        100,
        100,
    );
    assert_eq!(
        Partitioner::new(10, 10).partition(&precise),
        Err(PartitionError::InvertedBounds)
    );
}

#[test]
fn test_reject_non_finite_bounds() {
    let viewport = Region::viewport(
        Bounds::Double {
            min: ComplexNumber::new(f64::NAN, -1.0),
            max: ComplexNumber::new(1.0, 1.0),
        },
        100,
        100,
    );
    assert_eq!(
        Partitioner::new(10, 10).partition(&viewport),
        Err(PartitionError::NonFiniteBounds)
    );
}

#[test]
fn test_reject_zero_block_size() {
    assert_eq!(
        Partitioner::new(0, 10).partition(&double_viewport(100, 100)),
        Err(PartitionError::InvalidBlockSize {
            width: 0,
            height: 10
        })
    );
}

#[test]
fn test_reject_grid_too_large_to_allocate() {
    let viewport = double_viewport(u32::MAX, u32::MAX);

    assert_eq!(
        Partitioner::new(1, 1).partition(&viewport),
        Err(PartitionError::TooManyBlocks {
            blocks_wide: u32::MAX,
            blocks_high: u32::MAX,
        })
    );
}

//! Conversion Calculator - ordered-window ratios per partition

mod calculator;

pub use calculator::{ConversionCalculator, ConversionRow};

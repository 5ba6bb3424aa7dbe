//! Numeric building blocks shared by the indicators.

pub mod math;

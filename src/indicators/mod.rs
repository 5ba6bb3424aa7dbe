//! Pure indicator computations over price series.

pub mod frame;
pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use frame::{analyze, compute_frame, snapshot};

/// Core wiggle preparation: validation, rescaling and zero insertion.
///
/// Architecture:
/// ```text
///   sample matrix + optional axes
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  validate shapes → trace spacing → rescale by max column std
///   └───────────┘
///        │ NormalizedDataset
///        ▼
///   ┌──────────────┐
///   │ insert_zeros  │  per trace, fill mode only → RefinedTrace
///   └──────────────┘
///        │
///        ▼
///   render::TraceSink (egui / plotters)
/// ```
///
/// Both stages are pure; every call returns fresh data and traces can be
/// processed independently.

pub mod error;
pub mod normalize;
pub mod zeros;

pub use error::WiggleError;
pub use normalize::{column_std, normalize, trace_spacing, NormalizedDataset};
pub use zeros::{insert_zeros, zero_crossings, RefinedTrace};

pub mod ai;
pub mod analysis;
pub mod estimate;
pub mod materials;
pub mod pipeline;

pub use pipeline::{with_cancellation, EstimatePipeline};

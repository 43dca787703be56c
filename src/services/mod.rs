pub mod compute;
pub mod image_io;
pub mod pipeline;
pub mod recompress;

pub use compute::{ComputeBackend, ComputeError, IdentityCompute, RemoteCompute};
pub use pipeline::{PipelineOutcome, WatermarkPipeline};

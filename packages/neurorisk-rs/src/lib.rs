pub mod connectome;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod mmap_utils;
pub mod preprocess;
pub mod scoring;
pub mod spectral;
pub mod types;

pub use engine::{run_fusion, run_network, run_spectral};
pub use error::{EngineError, Result};
pub use ingest::Recording;
pub use types::*;

//! Infrastructure layer for clinicsim
//!
//! Adapters for the application-layer ports: HTTP clients for the backing
//! generation services, the JSONL vignette loader, the JSON result store and
//! the configuration loader.

pub mod config;
pub mod providers;
pub mod results;
pub mod vignettes;

pub use config::{ConfigLoader, FileConfig};
pub use providers::build_client;
pub use results::JsonResultStore;
pub use vignettes::{VignetteError, VignetteLoader};

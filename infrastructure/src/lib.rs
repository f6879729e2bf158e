//! Infrastructure layer for persona-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod archive;
pub mod benchmarks;
pub mod codex;
pub mod config;
pub mod encoder;
pub mod repository;
pub mod seed;

// Re-export commonly used types
pub use archive::SessionArchiver;
pub use benchmarks::{BenchmarkLoadError, load_benchmarks};
pub use codex::{CodexConfig, CodexProtocol, CodexResponder};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use encoder::HashEncoder;
pub use repository::InMemoryPanelRepository;
pub use seed::seed_demo_panel;

//! Repository adapters

pub mod memory;

pub use memory::InMemoryPanelRepository;

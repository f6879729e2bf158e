//! Session archival

pub mod session_archiver;

pub use session_archiver::SessionArchiver;

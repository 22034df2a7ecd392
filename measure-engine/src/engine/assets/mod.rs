//! JSON-backed assets of the measurement tools.
//!
//! Handles the user preferences file and the measurement graph libraries the
//! graph wrappers are built from.

/// Measurement graph definitions and the wrapper service built on them.
pub mod graph_library;

/// Startup loading of preferences and graph libraries.
pub mod config_loader;

pub use config_loader::{ConfigLoader, load_config_system};
pub use graph_library::{MeasurementGraphLibrary, WrapperRegistry};

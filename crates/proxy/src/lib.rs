//! Portico Proxy Library
//!
//! Startup side of the Portico reverse proxy: logging setup and the
//! configuration pipeline that runs before anything is served.
//!
//! - **Logging**: `tracing-subscriber` with text or JSON output
//! - **Startup**: load, default, validate, migrate ACME, freeze
//!
//! # Example
//!
//! ```ignore
//! use portico_proxy::{init_logging, startup, LogFormat};
//!
//! init_logging(false, LogFormat::Text)?;
//! let started = startup::bootstrap(Some("portico.toml".as_ref()))?;
//! println!("{} entry point(s)", started.config.entry_points.len());
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod logging;
pub mod startup;

// ============================================================================
// Public API Re-exports
// ============================================================================

pub use logging::{init_logging, LogFormat};
pub use startup::{bootstrap, check, Started};

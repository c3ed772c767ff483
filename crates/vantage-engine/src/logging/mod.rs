//! Logging utilities.
//!
//! Centralizes logger initialization. The engine itself only uses the `log`
//! facade; frame-level failures are logged here, never propagated (see the
//! render driver's error policy).

mod init;

pub use init::{init_logging, LoggingConfig};

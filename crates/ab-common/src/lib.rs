//! AuthBridge shared infrastructure.
//!
//! Currently hosts the logging bootstrap used by every binary.

pub mod logging;

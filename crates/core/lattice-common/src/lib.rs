//! # Lattice Common
//!
//! Common types and utilities shared across the Lattice ecosystem.
//!
//! ## Features
//!
//! - **Error Handling**: The [`LatticeError`] type and [`LatticeResult`]
//!   alias used throughout the ecosystem
//! - **Strings**: Substring, quoting, casing, hashing and base64 helpers
//!   via [`StrExt`]
//! - **Dates & Durations**: Compact human-readable formatting and an
//!   injectable clock for tests
//! - **Encoding Detection**: BOM and heuristic text encoding detection
//! - **Named Locks**: A process-wide named lock registry with toggleable
//!   enforcement
//! - **Value Graphs**: Field-wise copy, diff and display of structured
//!   values
//! - **Execution Wrappers**: Failure-tolerant wrappers for cleanup paths
//!
//! ## Example
//!
//! ```rust
//! use lattice_common::strings::{StrExt, SubstringOptions};
//! use lattice_common::{LatticeError, LatticeResult};
//!
//! fn head(line: &str) -> LatticeResult<&str> {
//!     let name = line.substring_before(":", SubstringOptions::strict());
//!     if name.is_empty() {
//!         return Err(LatticeError::invalid_input("missing ':' separator"));
//!     }
//!     Ok(name.trim_end())
//! }
//!
//! assert_eq!(head("status: running").unwrap(), "status");
//! ```

pub mod compress;
pub mod crypt;
pub mod datetime;
pub mod encoding;
pub mod enums;
pub mod error;
pub mod exec;
pub mod fsutil;
pub mod graph;
pub mod inspect;
pub mod numeric;
pub mod observed;
pub mod strings;
pub mod sync;
pub mod timestamp;
pub mod wait;

pub use encoding::{Detection, TextEncoding};
pub use error::{LatticeError, LatticeResult};
pub use strings::StrExt;
pub use sync::NamedLock;
pub use timestamp::Timestamp;

/// Version of the lattice-common crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the lattice-common crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_metadata() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "lattice-common");
    }
}

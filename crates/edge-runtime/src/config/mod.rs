//! # Runtime Configuration
//!
//! Both binaries read TOML files in the consensus engine's option naming
//! (`idx`, `replica`, `max-cli-msg`, ...) and let command-line flags
//! override them. Everything is validated before the first socket opens.
//!
//! ```toml
//! idx = 0
//! replica = [
//!     "127.0.0.1:10000;20000",
//!     "127.0.0.1:10001;20001",
//! ]
//! max-cli-msg = 65536
//! ```

pub mod bench;
pub mod file;
pub mod relay;

pub use bench::{BenchArgs, BenchConfig};
pub use file::ConfigFile;
pub use relay::{RelayArgs, RelayConfig};

use shared_types::ConfigError;

/// Convert an option to a strictly positive count.
pub(crate) fn positive(option: &str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ConfigError::InvalidOption {
            option: option.to_string(),
            reason: format!("must be a positive integer, got {value}"),
        })
}

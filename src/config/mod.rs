//! Configuration loading for the shift ledger.
//!
//! The duration caps and their scopes are plain values loaded from a YAML
//! policy file and handed to the validators explicitly.
//!
//! # Example
//!
//! ```no_run
//! use shift_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/policy.yaml").unwrap();
//! println!("Weekly cap: {}h", config.durations().weekly_work.hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AggregateCap, CapScope, DurationPolicy, PolicyConfig, PolicyMetadata, ShiftCaps};

// src/lib.rs
pub mod compare;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod error;
pub mod present;
pub mod project;
pub mod record;
pub mod store;

pub use compare::{ComparisonResolver, ComparisonVector};
pub use config::Config;
pub use dashboard::{Dashboard, Outcome, Phase};
pub use error::{FetchError, GeoError, ResolutionError};
pub use project::{project, NamedValue};
pub use record::{display_name, find_by_name, Record, RecordSet};
pub use store::{CachedSource, HttpRecordSource, MemorySource, RecordSource};

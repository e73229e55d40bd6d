//! Common types and utilities shared across the NWM fetch workspace.

pub mod error;
pub mod source;
pub mod time;

pub use error::{SourceError, SourceResult, TimeParseError};
pub use source::{PositionRead, StreamflowSource, MISSING_RAW_VALUE, NATIVE_SCALE};
pub use time::{ModelCycle, PublicationHour, ValidTime, DISPLAY_FORMAT};

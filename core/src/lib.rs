//! zbind-core
//!
//! Resource and contract layer over the zstd codec.
//! No Python, no PyO3, no host runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod config;

// Components, leaf first
pub mod sizing;
pub mod dictionary;
pub mod context;
pub mod args;
pub mod dispatcher;

pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::args::{CompressOption, HostValue};
    pub use crate::config::BindConfig;
    pub use crate::dictionary::{CompressionDictionary, DecompressionDictionary, DictionaryKind};
    pub use crate::dispatcher::Dispatcher;
    pub use crate::types::{BindError, BindResult, ErrorKind};
}

/// Compression levels accepted by the codec, inclusive.
/// Levels outside the range are clamped by the codec, not rejected.
pub fn level_range() -> std::ops::RangeInclusive<i32> {
    zstd_safe::min_c_level()..=zstd_safe::max_c_level()
}

//! constants.rs
//! Fixed policy values for the binding layer.

/// Compression level used when the caller gives none, or gives a dictionary instead.
pub const DEFAULT_LEVEL: i32 = 1;

/// Largest declared decompressed size served in one shot (32 MiB).
/// Anything above needs chunked decompression, which is not provided.
pub const MAX_DECOMPRESSED_SIZE: usize = 32 * 1024 * 1024;

/// Codec status values reported by the frame-size query.
/// Mirrored here so they can travel as the numeric code of a `CodecError`.
pub mod content_size {
    /// Valid frame that does not declare its size (streaming frame).
    pub const UNKNOWN: u64 = u64::MAX;
    /// Input not recognized as a frame.
    pub const ERROR: u64 = u64::MAX - 1;
}

/// Default capacity for trained dictionaries (110 KiB, the codec CLI default).
pub const DEFAULT_DICT_CAPACITY: usize = 110 * 1024;

/// Codec name exposed to hosts.
pub const CODEC_NAME: &str = "zstd";

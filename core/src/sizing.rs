//! sizing.rs
//! Buffer Sizer: destination capacities from codec bounds and frame metadata.
//!
//! Notes:
//! - `bound_for` only sizes an allocation. The caller always sees the produced length.
//! - The decompression ceiling is checked before anything is allocated.

use tracing::warn;

use crate::constants::content_size;
use crate::types::{BindError, BindResult};

/// Declared decompressed size as read from a frame header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameSize {
    /// Header declares an exact content size.
    Known(u64),
    /// Valid frame without a declared size (streaming frame).
    Unknown,
    /// Input is not a recognizable frame.
    Error,
}

/// Worst-case compressed size for an input of `input_len` bytes.
#[inline]
pub fn bound_for(input_len: usize) -> usize {
    zstd_safe::compress_bound(input_len)
}

/// Read the content size from the frame header without decompressing.
pub fn declared_decompressed_size(frame: &[u8]) -> FrameSize {
    match zstd_safe::get_frame_content_size(frame) {
        Ok(Some(n)) => FrameSize::Known(n),
        Ok(None)    => FrameSize::Unknown,
        Err(_)      => FrameSize::Error,
    }
}

/// Declared size checked against `ceiling`.
///
/// # Errors
/// - `Codec` when the frame is unrecognized or does not declare a size.
/// - `Unsupported` when the declared size exceeds `ceiling`.
pub fn checked_decompressed_size(frame: &[u8], ceiling: usize) -> BindResult<usize> {
    let declared = match declared_decompressed_size(frame) {
        FrameSize::Known(n) => n,
        FrameSize::Unknown => {
            return Err(BindError::Codec {
                code: Some(content_size::UNKNOWN),
                reason: "frame does not declare its decompressed size".into(),
            });
        }
        FrameSize::Error => {
            return Err(BindError::Codec {
                code: Some(content_size::ERROR),
                reason: "input is not a valid frame".into(),
            });
        }
    };

    if declared > ceiling as u64 {
        warn!(declared, ceiling, "rejecting oversized frame");
        return Err(BindError::Unsupported(format!(
            "declared decompressed size {} exceeds {} bytes; \
             oversized output requires chunked/streaming decompression, not supported",
            declared, ceiling
        )));
    }

    // declared <= ceiling <= usize::MAX
    Ok(declared as usize)
}

/// Fresh, exclusively owned buffer with room for exactly `capacity` bytes.
pub fn allocate(capacity: usize) -> BindResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| BindError::Allocation(format!("could not reserve {} bytes for output", capacity)))?;
    Ok(buf)
}

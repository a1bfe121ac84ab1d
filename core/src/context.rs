//! context.rs
//! Codec Context Pool: one compression and one decompression context, reused.
//!
//! Design notes:
//! - Contexts are created once and live as long as their owner.
//! - Every method takes `&mut self`: exclusive use per call is a borrow, not a promise.
//!   Sharing across threads is the owner's job (the dispatcher wraps each in a mutex).
//! - Codec status codes become `BindError::Codec` carrying the codec's error name.

use zstd_safe::{CCtx, DCtx};

use crate::args::CompressOption;
use crate::dictionary::DecompressionDictionary;
use crate::types::{BindError, BindResult};

/// Persistent compression state.
pub struct CompressionContext {
    cctx: CCtx<'static>,
}

/// Persistent decompression state.
pub struct DecompressionContext {
    dctx: DCtx<'static>,
}

impl CompressionContext {
    /// # Errors
    /// - `Allocation` if the codec cannot allocate its working state.
    pub fn new() -> BindResult<Self> {
        let cctx = CCtx::try_create()
            .ok_or_else(|| BindError::Allocation("could not create compression context".into()))?;
        Ok(Self { cctx })
    }

    /// Compress `src` into the spare capacity of `dst`.
    /// On success `dst.len()` equals the produced length.
    pub fn compress(&mut self, dst: &mut Vec<u8>, src: &[u8], option: &CompressOption) -> BindResult<usize> {
        let result = match option {
            CompressOption::Level(level) => self.cctx.compress(dst, src, *level),
            CompressOption::Dictionary(dict) => self.cctx.compress_using_cdict(dst, src, dict.cdict()),
        };
        result.map_err(|code| BindError::codec_status(code, "compression failed"))
    }
}

impl DecompressionContext {
    /// # Errors
    /// - `Allocation` if the codec cannot allocate its working state.
    pub fn new() -> BindResult<Self> {
        let dctx = DCtx::try_create()
            .ok_or_else(|| BindError::Allocation("could not create decompression context".into()))?;
        Ok(Self { dctx })
    }

    /// Decompress `src` into the spare capacity of `dst`, optionally with a dictionary.
    pub fn decompress(
        &mut self,
        dst: &mut Vec<u8>,
        src: &[u8],
        dict: Option<&DecompressionDictionary>,
    ) -> BindResult<usize> {
        let result = match dict {
            Some(d) => self.dctx.decompress_using_ddict(dst, src, d.ddict()),
            None    => self.dctx.decompress(dst, src),
        };
        result.map_err(|code| BindError::codec_status(code, "decompression failed"))
    }
}

/// The two contexts as one owned resource, injected into the dispatcher.
pub struct ContextPool {
    pub compression: CompressionContext,
    pub decompression: DecompressionContext,
}

impl ContextPool {
    pub fn new() -> BindResult<Self> {
        Ok(Self {
            compression: CompressionContext::new()?,
            decompression: DecompressionContext::new()?,
        })
    }
}

//! dictionary.rs
//! Dictionary Store: opaque, immutable dictionary handles.
//!
//! Design notes:
//! - A handle wraps the codec dictionary in an `Arc`; clones share one dictionary.
//! - Equality is identity. Two handles built from the same bytes are not equal.
//! - Dropping the last clone frees the codec dictionary. `release` does the same explicitly.
//! - Compression and decompression handles are distinct types and never interchangeable.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use zstd_safe::{CDict, DDict};

use crate::types::{BindError, BindResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictionaryKind {
    Compression,
    Decompression,
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryKind::Compression   => f.write_str("compression dictionary"),
            DictionaryKind::Decompression => f.write_str("decompression dictionary"),
        }
    }
}

struct CompressionDictInner {
    cdict: CDict<'static>,
    level: i32,
    dict_id: Option<u32>,
    source_len: usize,
}

struct DecompressionDictInner {
    ddict: DDict<'static>,
    dict_id: Option<u32>,
    source_len: usize,
}

/// Compression-side dictionary handle, bound to the level it was built with.
#[derive(Clone)]
pub struct CompressionDictionary {
    inner: Arc<CompressionDictInner>,
}

/// Decompression-side dictionary handle.
#[derive(Clone)]
pub struct DecompressionDictionary {
    inner: Arc<DecompressionDictInner>,
}

/// Build a compression dictionary from raw or trained dictionary bytes.
///
/// # Errors
/// - `Codec` if the codec refuses the dictionary (e.g. a corrupted trained dictionary).
pub fn build_compression_dict(bytes: &[u8], level: i32) -> BindResult<CompressionDictionary> {
    let cdict = CDict::try_create(bytes, level).ok_or_else(|| {
        BindError::codec(format!(
            "could not create compression dictionary from {} bytes at level {}",
            bytes.len(),
            level
        ))
    })?;
    let dict_id = dict_id_of(bytes);
    debug!(len = bytes.len(), level, ?dict_id, "built compression dictionary");

    Ok(CompressionDictionary {
        inner: Arc::new(CompressionDictInner {
            cdict,
            level,
            dict_id,
            source_len: bytes.len(),
        }),
    })
}

/// Build a decompression dictionary from the same bytes used on the compression side.
///
/// # Errors
/// - `Codec` if the codec refuses the dictionary.
pub fn build_decompression_dict(bytes: &[u8]) -> BindResult<DecompressionDictionary> {
    let ddict = DDict::try_create(bytes).ok_or_else(|| {
        BindError::codec(format!(
            "could not create decompression dictionary from {} bytes",
            bytes.len()
        ))
    })?;
    let dict_id = dict_id_of(bytes);
    debug!(len = bytes.len(), ?dict_id, "built decompression dictionary");

    Ok(DecompressionDictionary {
        inner: Arc::new(DecompressionDictInner {
            ddict,
            dict_id,
            source_len: bytes.len(),
        }),
    })
}

/// Train dictionary bytes from sample payloads.
/// The result can be fed to both builders above.
pub fn train_dictionary<S: AsRef<[u8]>>(samples: &[S], capacity: usize) -> BindResult<Vec<u8>> {
    if samples.is_empty() {
        return Err(BindError::argument("dictionary training needs at least one sample"));
    }
    if capacity == 0 {
        return Err(BindError::argument("dictionary capacity must be greater than zero"));
    }

    let dict = zstd::dict::from_samples(samples, capacity)
        .map_err(|e| BindError::codec(format!("dictionary training failed: {}", e)))?;
    debug!(samples = samples.len(), capacity, len = dict.len(), "trained dictionary");
    Ok(dict)
}

// Raw-content dictionaries have no ID.
fn dict_id_of(bytes: &[u8]) -> Option<u32> {
    zstd_safe::get_dict_id_from_dict(bytes).map(|id| id.get())
}

impl CompressionDictionary {
    pub fn kind(&self) -> DictionaryKind {
        DictionaryKind::Compression
    }

    /// Level baked into the dictionary; used for every compress call made with it.
    pub fn level(&self) -> i32 {
        self.inner.level
    }

    pub fn dict_id(&self) -> Option<u32> {
        self.inner.dict_id
    }

    pub fn source_len(&self) -> usize {
        self.inner.source_len
    }

    /// Release this handle. Returns `true` when it was the last one and the
    /// codec dictionary has been freed.
    pub fn release(self) -> bool {
        Arc::into_inner(self.inner).is_some()
    }

    pub(crate) fn cdict(&self) -> &CDict<'static> {
        &self.inner.cdict
    }
}

impl DecompressionDictionary {
    pub fn kind(&self) -> DictionaryKind {
        DictionaryKind::Decompression
    }

    pub fn dict_id(&self) -> Option<u32> {
        self.inner.dict_id
    }

    pub fn source_len(&self) -> usize {
        self.inner.source_len
    }

    /// See [`CompressionDictionary::release`].
    pub fn release(self) -> bool {
        Arc::into_inner(self.inner).is_some()
    }

    pub(crate) fn ddict(&self) -> &DDict<'static> {
        &self.inner.ddict
    }
}

impl PartialEq for CompressionDictionary {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
impl Eq for CompressionDictionary {}

impl PartialEq for DecompressionDictionary {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
impl Eq for DecompressionDictionary {}

// Layout stays opaque: only metadata is printed.
impl fmt::Debug for CompressionDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionDictionary")
            .field("dict_id", &self.inner.dict_id)
            .field("level", &self.inner.level)
            .field("source_len", &self.inner.source_len)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for DecompressionDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressionDictionary")
            .field("dict_id", &self.inner.dict_id)
            .field("source_len", &self.inner.source_len)
            .finish_non_exhaustive()
    }
}

//! dispatcher.rs
//! Operation Dispatcher: the four public operations.
//!
//! Flow per call:
//! 1. validate arity/types (host-argument entry points only)
//! 2. size the destination (Buffer Sizer)
//! 3. transform on the shared context (Codec Context Pool)
//! 4. return the buffer trimmed to the produced length
//!
//! Each context sits behind its own mutex, so at most one compress and one
//! decompress run at any instant even if the host calls from many threads.
//! Dictionary handles need no lock.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::args::{
    parse_compress, parse_compression_dict, parse_decompress, parse_decompression_dict,
    CompressOption, HostValue,
};
use crate::config::BindConfig;
use crate::context::{CompressionContext, ContextPool, DecompressionContext};
use crate::dictionary::{
    build_compression_dict, build_decompression_dict, CompressionDictionary, DecompressionDictionary,
};
use crate::sizing::{allocate, bound_for, checked_decompressed_size};
use crate::telemetry::{Operation, OperationCounters, TelemetrySnapshot};
use crate::types::BindResult;

pub struct Dispatcher {
    compression: Mutex<CompressionContext>,
    decompression: Mutex<DecompressionContext>,
    config: BindConfig,
    counters: OperationCounters,
}

impl Dispatcher {
    /// Dispatcher with fresh contexts and the default policy.
    pub fn new() -> BindResult<Self> {
        Self::with_config(BindConfig::default())
    }

    pub fn with_config(config: BindConfig) -> BindResult<Self> {
        Self::from_pool(ContextPool::new()?, config)
    }

    /// Build around an existing pool; the dispatcher takes ownership of both contexts.
    pub fn from_pool(pool: ContextPool, config: BindConfig) -> BindResult<Self> {
        config.validate()?;
        Ok(Self {
            compression: Mutex::new(pool.compression),
            decompression: Mutex::new(pool.decompression),
            config,
            counters: OperationCounters::new(),
        })
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    pub fn stats(&self) -> TelemetrySnapshot {
        self.counters.snapshot()
    }

    // -------------------------------------------------------------------------
    // Typed operations
    // -------------------------------------------------------------------------

    /// Compress `data` at a level or with a compression dictionary.
    /// `None` uses the configured default level.
    pub fn compress(&self, data: &[u8], option: Option<CompressOption>) -> BindResult<Vec<u8>> {
        let option = option.unwrap_or(CompressOption::Level(self.config.default_level));
        let result = self.compress_inner(data, &option);
        self.finish(Operation::Compress, data.len(), result)
    }

    /// Decompress one frame whose header declares its size.
    pub fn decompress(&self, data: &[u8], dict: Option<&DecompressionDictionary>) -> BindResult<Vec<u8>> {
        let result = self.decompress_inner(data, dict);
        self.finish(Operation::Decompress, data.len(), result)
    }

    pub fn create_compression_dictionary(&self, bytes: &[u8], level: Option<i32>) -> BindResult<CompressionDictionary> {
        let level = level.unwrap_or(self.config.default_level);
        let result = build_compression_dict(bytes, level);
        self.finish_dict(Operation::CreateCompressionDict, result)
    }

    pub fn create_decompression_dictionary(&self, bytes: &[u8]) -> BindResult<DecompressionDictionary> {
        let result = build_decompression_dict(bytes);
        self.finish_dict(Operation::CreateDecompressionDict, result)
    }

    // -------------------------------------------------------------------------
    // Host-argument operations (positional, dynamically typed)
    // -------------------------------------------------------------------------

    pub fn compress_args(&self, args: &[HostValue<'_>]) -> BindResult<Vec<u8>> {
        let req = self.checked(parse_compress(args))?;
        self.compress(req.data, req.option)
    }

    pub fn decompress_args(&self, args: &[HostValue<'_>]) -> BindResult<Vec<u8>> {
        let req = self.checked(parse_decompress(args))?;
        self.decompress(req.data, req.dict.as_ref())
    }

    pub fn create_compression_dictionary_args(&self, args: &[HostValue<'_>]) -> BindResult<CompressionDictionary> {
        let req = self.checked(parse_compression_dict(args))?;
        self.create_compression_dictionary(req.bytes, req.level)
    }

    pub fn create_decompression_dictionary_args(&self, args: &[HostValue<'_>]) -> BindResult<DecompressionDictionary> {
        let req = self.checked(parse_decompression_dict(args))?;
        self.create_decompression_dictionary(req.bytes)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn compress_inner(&self, data: &[u8], option: &CompressOption) -> BindResult<Vec<u8>> {
        let mut out = allocate(bound_for(data.len()))?;
        {
            let mut ctx = self.compression.lock();
            ctx.compress(&mut out, data, option)?;
        }
        // Hand back the produced bytes, not the bound-sized allocation.
        out.shrink_to_fit();
        Ok(out)
    }

    fn decompress_inner(&self, data: &[u8], dict: Option<&DecompressionDictionary>) -> BindResult<Vec<u8>> {
        let size = checked_decompressed_size(data, self.config.max_decompressed_size)?;
        let mut out = allocate(size)?;
        {
            let mut ctx = self.decompression.lock();
            ctx.decompress(&mut out, data, dict)?;
        }
        Ok(out)
    }

    fn finish(&self, op: Operation, bytes_in: usize, result: BindResult<Vec<u8>>) -> BindResult<Vec<u8>> {
        match &result {
            Ok(out) => {
                trace!(?op, bytes_in, bytes_out = out.len(), "operation complete");
                self.counters.record_success(op, bytes_in, out.len());
            }
            Err(e) => {
                debug!(?op, bytes_in, kind = %e.kind(), error = %e, "operation failed");
                self.counters.record_failure(e.kind());
            }
        }
        result
    }

    fn finish_dict<T>(&self, op: Operation, result: BindResult<T>) -> BindResult<T> {
        match &result {
            Ok(_) => self.counters.record_success(op, 0, 0),
            Err(e) => {
                debug!(?op, kind = %e.kind(), error = %e, "dictionary creation failed");
                self.counters.record_failure(e.kind());
            }
        }
        result
    }

    fn checked<T>(&self, parsed: BindResult<T>) -> BindResult<T> {
        if let Err(e) = &parsed {
            debug!(error = %e, "rejected arguments");
            self.counters.record_failure(e.kind());
        }
        parsed
    }
}

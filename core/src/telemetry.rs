//! telemetry.rs
//! Per-dispatcher operation counters and immutable snapshots.
//!
//! Notes:
//! - Counters are relaxed atomics: no locks on the hot path.
//! - Operations only write counters, never read them. Behavior does not depend on history.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::types::ErrorKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Compress,
    Decompress,
    CreateCompressionDict,
    CreateDecompressionDict,
}

#[derive(Default, Debug)]
pub struct OperationCounters {
    compress_calls: AtomicU64,
    decompress_calls: AtomicU64,
    cdicts_built: AtomicU64,
    ddicts_built: AtomicU64,
    bytes_compress_in: AtomicU64,
    bytes_compress_out: AtomicU64,
    bytes_decompress_in: AtomicU64,
    bytes_decompress_out: AtomicU64,
    failures: [AtomicU64; 4],
}

impl OperationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed call. `bytes_in`/`bytes_out` are ignored for dictionary builds.
    pub fn record_success(&self, op: Operation, bytes_in: usize, bytes_out: usize) {
        match op {
            Operation::Compress => {
                self.compress_calls.fetch_add(1, Ordering::Relaxed);
                self.bytes_compress_in.fetch_add(bytes_in as u64, Ordering::Relaxed);
                self.bytes_compress_out.fetch_add(bytes_out as u64, Ordering::Relaxed);
            }
            Operation::Decompress => {
                self.decompress_calls.fetch_add(1, Ordering::Relaxed);
                self.bytes_decompress_in.fetch_add(bytes_in as u64, Ordering::Relaxed);
                self.bytes_decompress_out.fetch_add(bytes_out as u64, Ordering::Relaxed);
            }
            Operation::CreateCompressionDict => {
                self.cdicts_built.fetch_add(1, Ordering::Relaxed);
            }
            Operation::CreateDecompressionDict => {
                self.ddicts_built.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        self.failures[failure_slot(kind)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);

        let bytes_compress_in = load(&self.bytes_compress_in);
        let bytes_compress_out = load(&self.bytes_compress_out);
        let compression_ratio = if bytes_compress_in > 0 {
            bytes_compress_out as f64 / bytes_compress_in as f64
        } else {
            0.0
        };

        TelemetrySnapshot {
            compress_calls: load(&self.compress_calls),
            decompress_calls: load(&self.decompress_calls),
            cdicts_built: load(&self.cdicts_built),
            ddicts_built: load(&self.ddicts_built),
            bytes_compress_in,
            bytes_compress_out,
            bytes_decompress_in: load(&self.bytes_decompress_in),
            bytes_decompress_out: load(&self.bytes_decompress_out),
            argument_errors: load(&self.failures[failure_slot(ErrorKind::Argument)]),
            codec_errors: load(&self.failures[failure_slot(ErrorKind::Codec)]),
            unsupported_errors: load(&self.failures[failure_slot(ErrorKind::Unsupported)]),
            allocation_errors: load(&self.failures[failure_slot(ErrorKind::Allocation)]),
            compression_ratio,
        }
    }
}

fn failure_slot(kind: ErrorKind) -> usize {
    match kind {
        ErrorKind::Argument    => 0,
        ErrorKind::Codec       => 1,
        ErrorKind::Unsupported => 2,
        ErrorKind::Allocation  => 3,
    }
}

/// Point-in-time copy of the counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub compress_calls: u64,
    pub decompress_calls: u64,
    pub cdicts_built: u64,
    pub ddicts_built: u64,
    pub bytes_compress_in: u64,
    pub bytes_compress_out: u64,
    pub bytes_decompress_in: u64,
    pub bytes_decompress_out: u64,
    pub argument_errors: u64,
    pub codec_errors: u64,
    pub unsupported_errors: u64,
    pub allocation_errors: u64,
    /// `bytes_compress_out / bytes_compress_in`, 0.0 before any compression.
    pub compression_ratio: f64,
}

impl TelemetrySnapshot {
    pub fn total_failures(&self) -> u64 {
        self.argument_errors + self.codec_errors + self.unsupported_errors + self.allocation_errors
    }

    pub fn failures_of(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::Argument    => self.argument_errors,
            ErrorKind::Codec       => self.codec_errors,
            ErrorKind::Unsupported => self.unsupported_errors,
            ErrorKind::Allocation  => self.allocation_errors,
        }
    }
}

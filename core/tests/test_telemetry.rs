#[cfg(test)]
mod telemetry_tests {
    use zbind_core::{
        args::CompressOption,
        config::BindConfig,
        constants::{DEFAULT_LEVEL, MAX_DECOMPRESSED_SIZE},
        dispatcher::Dispatcher,
        telemetry::{Operation, OperationCounters, TelemetrySnapshot},
        types::ErrorKind,
    };

    #[test]
    fn fresh_counters_are_zero() {
        let snapshot = OperationCounters::new().snapshot();
        assert_eq!(snapshot.compress_calls, 0);
        assert_eq!(snapshot.total_failures(), 0);
        assert_eq!(snapshot.compression_ratio, 0.0);
    }

    #[test]
    fn counters_accumulate_bytes_and_calls() {
        let counters = OperationCounters::new();
        counters.record_success(Operation::Compress, 1000, 100);
        counters.record_success(Operation::Compress, 1000, 300);
        counters.record_success(Operation::Decompress, 400, 2000);
        counters.record_success(Operation::CreateCompressionDict, 0, 0);
        counters.record_success(Operation::CreateDecompressionDict, 0, 0);

        let s = counters.snapshot();
        assert_eq!(s.compress_calls, 2);
        assert_eq!(s.bytes_compress_in, 2000);
        assert_eq!(s.bytes_compress_out, 400);
        assert_eq!(s.decompress_calls, 1);
        assert_eq!(s.bytes_decompress_out, 2000);
        assert_eq!(s.cdicts_built, 1);
        assert_eq!(s.ddicts_built, 1);
        assert!((s.compression_ratio - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn failures_are_counted_per_kind() {
        let counters = OperationCounters::new();
        counters.record_failure(ErrorKind::Codec);
        counters.record_failure(ErrorKind::Codec);
        counters.record_failure(ErrorKind::Unsupported);

        let s = counters.snapshot();
        for kind in ErrorKind::ALL {
            let expected = match kind {
                ErrorKind::Codec => 2,
                ErrorKind::Unsupported => 1,
                _ => 0,
            };
            assert_eq!(s.failures_of(kind), expected, "{}", kind);
        }
        assert_eq!(s.total_failures(), 3);
    }

    #[test]
    fn dispatcher_records_operations() {
        let d = Dispatcher::new().unwrap();
        let data = vec![1u8; 4096];
        let c = d.compress(&data, Some(CompressOption::Level(3))).unwrap();
        d.decompress(&c, None).unwrap();
        let _ = d.decompress(b"junk", None);

        let s = d.stats();
        assert_eq!(s.compress_calls, 1);
        assert_eq!(s.bytes_compress_in, 4096);
        assert_eq!(s.bytes_compress_out, c.len() as u64);
        assert_eq!(s.decompress_calls, 1);
        assert_eq!(s.bytes_decompress_out, 4096);
        assert_eq!(s.codec_errors, 1);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let counters = OperationCounters::new();
        counters.record_success(Operation::Compress, 10, 5);
        let snapshot = counters.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"compress_calls\":1"));
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    // --- config ---

    #[test]
    fn config_defaults_match_constants() {
        let c = BindConfig::default();
        assert_eq!(c.default_level, DEFAULT_LEVEL);
        assert_eq!(c.max_decompressed_size, MAX_DECOMPRESSED_SIZE);
        c.validate().unwrap();
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let c: BindConfig = serde_json::from_str("{\"default_level\": 5}").unwrap();
        assert_eq!(c.default_level, 5);
        assert_eq!(c.max_decompressed_size, MAX_DECOMPRESSED_SIZE);
    }

    #[test]
    fn default_level_applies_when_omitted() {
        let d = Dispatcher::with_config(BindConfig::default().with_default_level(19)).unwrap();
        let data = b"aaaaaaaaaabbbbbbbbbbaaaaaaaaaabbbbbbbbbb".repeat(200);
        let implicit = d.compress(&data, None).unwrap();
        let explicit = d.compress(&data, Some(CompressOption::Level(19))).unwrap();
        assert_eq!(implicit, explicit);

        let cdict = d.create_compression_dictionary(b"aaaaaaaaaabbbbbbbbbb", None).unwrap();
        assert_eq!(cdict.level(), 19);
    }
}

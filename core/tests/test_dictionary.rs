#[cfg(test)]
mod tests {
    use zbind_core::{
        constants::DEFAULT_DICT_CAPACITY,
        dictionary::{build_compression_dict, build_decompression_dict, train_dictionary, DictionaryKind},
        types::ErrorKind,
    };

    fn raw_dict() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog; ".repeat(32)
    }

    fn samples() -> Vec<Vec<u8>> {
        (0..2000u32)
            .map(|i| {
                format!(
                    "{{\"id\":{},\"user\":\"user-{}\",\"score\":{},\"region\":\"{}\",\"tags\":[\"alpha\",\"beta\"]}}",
                    i,
                    (i * 7) % 13,
                    (i * 31) % 1000,
                    ["eu-west", "us-east", "ap-south"][(i % 3) as usize]
                )
                .into_bytes()
            })
            .collect()
    }

    #[test]
    fn raw_dictionaries_have_no_id() {
        let c = build_compression_dict(&raw_dict(), 3).unwrap();
        let d = build_decompression_dict(&raw_dict()).unwrap();
        assert_eq!(c.dict_id(), None);
        assert_eq!(d.dict_id(), None);
        assert_eq!(c.level(), 3);
        assert_eq!(c.source_len(), raw_dict().len());
        assert_eq!(c.kind(), DictionaryKind::Compression);
        assert_eq!(d.kind(), DictionaryKind::Decompression);
    }

    #[test]
    fn handles_compare_by_identity() {
        let a = build_compression_dict(&raw_dict(), 1).unwrap();
        let b = build_compression_dict(&raw_dict(), 1).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b, "same bytes, different handles");

        let x = build_decompression_dict(&raw_dict()).unwrap();
        let y = build_decompression_dict(&raw_dict()).unwrap();
        assert_eq!(x, x.clone());
        assert_ne!(x, y);
    }

    #[test]
    fn release_frees_only_the_last_handle() {
        let a = build_compression_dict(&raw_dict(), 1).unwrap();
        let b = a.clone();
        assert!(!a.release(), "a clone is still alive");
        assert!(b.release());

        let d = build_decompression_dict(&raw_dict()).unwrap();
        assert!(d.release());
    }

    #[test]
    fn debug_output_hides_layout() {
        let c = build_compression_dict(&raw_dict(), 5).unwrap();
        let s = format!("{:?}", c);
        assert!(s.starts_with("CompressionDictionary"));
        assert!(s.contains("level: 5"));
    }

    #[test]
    fn handles_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<zbind_core::dictionary::CompressionDictionary>();
        assert_send_sync::<zbind_core::dictionary::DecompressionDictionary>();
    }

    #[test]
    fn trained_dictionary_carries_an_id() {
        let dict = train_dictionary(&samples(), 4096).unwrap();
        assert!(!dict.is_empty() && dict.len() <= 4096);

        let c = build_compression_dict(&dict, 3).unwrap();
        let d = build_decompression_dict(&dict).unwrap();
        assert!(c.dict_id().is_some());
        assert_eq!(c.dict_id(), d.dict_id());
    }

    #[test]
    fn training_rejects_empty_input() {
        let none: Vec<Vec<u8>> = Vec::new();
        let err = train_dictionary(&none, DEFAULT_DICT_CAPACITY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);

        let err = train_dictionary(&samples(), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn training_on_too_little_data_is_a_codec_error() {
        let err = train_dictionary(&[b"ab".to_vec()], DEFAULT_DICT_CAPACITY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Codec);
    }
}

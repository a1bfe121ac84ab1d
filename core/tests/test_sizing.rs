#[cfg(test)]
mod tests {
    use zbind_core::{
        constants::{content_size, MAX_DECOMPRESSED_SIZE},
        sizing::{allocate, bound_for, checked_decompressed_size, declared_decompressed_size, FrameSize},
        types::{BindError, ErrorKind},
    };

    const MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

    /// Frame header only: single segment, 8-byte content size field.
    fn header_declaring(size: u64) -> Vec<u8> {
        let mut h = MAGIC.to_vec();
        h.push(0xE0);
        h.extend_from_slice(&size.to_le_bytes());
        h
    }

    /// Frame header without a content size (streaming frame).
    fn header_without_size() -> Vec<u8> {
        let mut h = MAGIC.to_vec();
        h.push(0x00); // no FCS, not single segment
        h.push(0x00); // window descriptor
        h
    }

    fn real_frame(data: &[u8]) -> Vec<u8> {
        zstd::bulk::compress(data, 3).unwrap()
    }

    // --- bound_for ---

    #[test]
    fn bound_is_at_least_input_len() {
        for n in [0usize, 1, 17, 4096, 1 << 20] {
            assert!(bound_for(n) >= n, "bound {} < input {}", bound_for(n), n);
        }
    }

    #[test]
    fn bound_covers_incompressible_input() {
        // xorshift noise does not compress
        let mut x: u32 = 0x9E37_79B9;
        let data: Vec<u8> = (0..64 * 1024)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x as u8
            })
            .collect();
        let frame = real_frame(&data);
        assert!(frame.len() <= bound_for(data.len()));
    }

    // --- declared_decompressed_size ---

    #[test]
    fn declared_size_of_real_frame() {
        let data = vec![7u8; 5000];
        assert_eq!(declared_decompressed_size(&real_frame(&data)), FrameSize::Known(5000));
    }

    #[test]
    fn declared_size_from_bare_header() {
        assert_eq!(declared_decompressed_size(&header_declaring(1234)), FrameSize::Known(1234));
    }

    #[test]
    fn unknown_and_error_are_distinct() {
        assert_eq!(declared_decompressed_size(&header_without_size()), FrameSize::Unknown);
        assert_eq!(declared_decompressed_size(b"not a real frame"), FrameSize::Error);
        assert_eq!(declared_decompressed_size(&[]), FrameSize::Error);
    }

    // --- checked_decompressed_size ---

    #[test]
    fn checked_size_accepts_up_to_ceiling() {
        let n = checked_decompressed_size(&header_declaring(MAX_DECOMPRESSED_SIZE as u64), MAX_DECOMPRESSED_SIZE).unwrap();
        assert_eq!(n, MAX_DECOMPRESSED_SIZE);
    }

    #[test]
    fn checked_size_rejects_oversized_as_unsupported() {
        let frame = header_declaring(33 * 1024 * 1024);
        let err = checked_decompressed_size(&frame, MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(err.to_string().contains("streaming"));
    }

    #[test]
    fn checked_size_collapses_unknown_into_codec_error() {
        let err = checked_decompressed_size(&header_without_size(), MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert!(matches!(err, BindError::Codec { code: Some(content_size::UNKNOWN), .. }));
    }

    #[test]
    fn checked_size_collapses_error_into_codec_error() {
        let err = checked_decompressed_size(b"garbage!", MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert!(matches!(err, BindError::Codec { code: Some(content_size::ERROR), .. }));
    }

    // --- allocate ---

    #[test]
    fn allocate_reserves_exact_capacity_and_is_empty() {
        let buf = allocate(4096).unwrap();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 4096);
    }

    #[test]
    fn allocate_reports_impossible_reservations() {
        let err = allocate(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Allocation);
    }
}

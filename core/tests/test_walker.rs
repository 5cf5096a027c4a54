// Chunk walker coverage:

// * ✅ tag / length / boundary correctness on a PNG-shaped container
// * ✅ views cover length + tag + payload + trailer, payload untouched by the walk
// * ✅ boundary conditions (zero chunks, short preamble, partial header)
// * ✅ truncation does not advance the walker
// * ✅ determinism across fresh walkers
// * ✅ any ByteSource: slice, Arc, Box, Bytes, SeekSource, File, open_source inputs
// * ✅ property: offsets equal the manual running sum

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};
    use std::sync::Arc;
    use std::thread;

    use bytes::Bytes;
    use chunkstream_core::constants::PNG_SIGNATURE;
    use chunkstream_core::container::{ChunkWalker, ContainerProfile, WalkerState};
    use chunkstream_core::source::{open_source, InputSource, SeekSource};
    use chunkstream_core::types::StreamError;
    use proptest::prelude::*;

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    const CRC: [u8; 4] = [0xC0, 0xFF, 0xEE, 0x00];

    fn png_chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + payload.len());
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(tag);
        out.extend_from_slice(payload);
        out.extend_from_slice(&CRC);
        out
    }

    fn sample_png() -> Vec<u8> {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend(png_chunk(b"IHDR", &[1u8; 13]));
        png.extend(png_chunk(b"tEXt", b"hello"));
        png.extend(png_chunk(b"IDAT", &[7u8; 100]));
        png.extend(png_chunk(b"IEND", &[]));
        png
    }

// # ✅ 1. Tags, lengths and offsets in order

    #[test]
    fn walks_png_chunks_in_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let png = sample_png();
        let chunks = ChunkWalker::png(png.as_slice())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let tags: Vec<String> = chunks.iter().map(|c| c.type_tag.to_string()).collect();
        assert_eq!(tags, ["IHDR", "tEXt", "IDAT", "IEND"]);

        let lengths: Vec<u64> = chunks.iter().map(|c| c.declared_length).collect();
        assert_eq!(lengths, [13, 5, 100, 0]);

        let offsets: Vec<u64> = chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, [8, 8 + 25, 8 + 25 + 17, 8 + 25 + 17 + 112]);

        assert_eq!(chunks.last().unwrap().next_offset(), png.len() as u64);
        assert!(chunks[0].type_tag == b"IHDR");
        assert_eq!(chunks[1].summary(), "chunk 'tEXt' (5 bytes) @ 33");
    }

// # ✅ 2. Chunk view spans the whole record

    #[test]
    fn chunk_view_covers_whole_record() {
        let png = sample_png();
        let mut walker = ChunkWalker::png(png.as_slice()).unwrap();
        walker.next_chunk().unwrap().unwrap(); // IHDR
        let text = walker.next_chunk().unwrap().unwrap();

        let mut whole = Vec::new();
        text.view.clone().read_to_end(&mut whole).unwrap();
        assert_eq!(whole, &png[33..33 + 17]);

        assert_eq!(text.payload().unwrap().to_bytes().unwrap().to_vec(), b"hello");
        assert_eq!(text.trailer().unwrap().to_bytes().unwrap().to_vec(), &CRC);

        // Walker moved on without reading the payload
        assert_eq!(walker.offset(), 33 + 17);
        assert_eq!(walker.counters().header_bytes_read, 16);
    }

// # ✅ 3. Chunks can be read out of order after the walk

    #[test]
    fn views_stay_valid_after_walk() {
        let png = sample_png();
        let chunks: Vec<_> = ChunkWalker::png(png.as_slice())
            .unwrap()
            .map(Result::unwrap)
            .collect();

        let mut idat = chunks[2].payload().unwrap();
        let mut ihdr = chunks[0].payload().unwrap();

        let mut buf = Vec::new();
        idat.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![7u8; 100]);

        buf.clear();
        ihdr.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1u8; 13]);
    }

// # ✅ 4. Zero chunks is an empty sequence

    #[test]
    fn signature_only_yields_nothing() {
        let png = PNG_SIGNATURE.to_vec();
        let mut walker = ChunkWalker::png(png.as_slice()).unwrap();

        assert!(walker.next_chunk().unwrap().is_none());
        assert_eq!(walker.state(), WalkerState::Exhausted);
        // Not restartable
        assert!(walker.next().is_none());
    }

// # ❌ 5. Source shorter than the preamble

    #[test]
    fn short_preamble_is_truncation() {
        let data: &[u8] = &[0x89, b'P', b'N'];
        let err = ChunkWalker::png(data).unwrap_err();
        assert!(matches!(
            err,
            StreamError::TruncatedContainer { offset: 0, needed: 8, available: 3 }
        ));
    }

// # ❌ 6. Declared length past end-of-source

    #[test]
    fn oversized_last_chunk_is_truncation_and_walker_stays_put() {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend(png_chunk(b"IHDR", &[0u8; 13]));
        let bad_offset = png.len() as u64;
        // declares 1000 bytes; only 10 bytes remain from the chunk start
        png.extend_from_slice(&1000u32.to_be_bytes());
        png.extend_from_slice(b"IDAT");
        png.extend_from_slice(&[9, 9]);

        let mut walker = ChunkWalker::png(png.as_slice()).unwrap();
        assert!(walker.next_chunk().unwrap().is_some());

        let err = walker.next_chunk().unwrap_err();
        match err {
            StreamError::TruncatedContainer { offset, needed, available } => {
                assert_eq!(offset, bad_offset);
                assert_eq!(needed, 1012);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(walker.offset(), bad_offset);
        assert!(walker.is_exhausted());
        assert!(walker.next_chunk().unwrap().is_none());
        assert_eq!(walker.counters().truncations, 1);
    }

// # ❌ 7. Iterator ends after the first error

    #[test]
    fn iterator_yields_error_then_stops() {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&[0, 0]); // half a length field

        let items: Vec<_> = ChunkWalker::png(png.as_slice()).unwrap().collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(
            items[0],
            Err(StreamError::TruncatedContainer { needed: 8, available: 2, .. })
        ));
    }

// # ✅ 8. Determinism

    #[test]
    fn fresh_walkers_agree() {
        let png = sample_png();
        let a = ChunkWalker::png(png.as_slice()).unwrap().collect_index().unwrap();
        let b = ChunkWalker::png(png.as_slice()).unwrap().collect_index().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

// # ✅ 9. Other sources

    #[test]
    fn walks_a_seek_source() {
        let png = sample_png();
        let source = SeekSource::new(Cursor::new(png.clone()));

        let index = ChunkWalker::png(&source).unwrap().collect_index().unwrap();
        let expected = ChunkWalker::png(png.as_slice()).unwrap().collect_index().unwrap();
        assert_eq!(index, expected);
    }

    #[test]
    fn views_read_concurrently_from_shared_source() {
        let png = Arc::new(sample_png());
        let chunks: Vec<_> = ChunkWalker::png(Arc::clone(&png))
            .unwrap()
            .map(Result::unwrap)
            .collect();

        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                thread::spawn(move || {
                    let mut payload = chunk.payload().unwrap();
                    let mut buf = Vec::new();
                    payload.read_to_end(&mut buf).unwrap();
                    (chunk.type_tag.to_string(), buf.len())
                })
            })
            .collect();

        let seen: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            seen,
            vec![
                ("IHDR".to_string(), 13),
                ("tEXt".to_string(), 5),
                ("IDAT".to_string(), 100),
                ("IEND".to_string(), 0),
            ]
        );
    }

    #[test]
    fn walks_a_file() {
        let path = std::env::temp_dir().join(format!("chunkstream-walk-{}.png", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(&sample_png()).unwrap();
        }

        let source = open_source(InputSource::File(path.clone())).unwrap();
        let index = ChunkWalker::png(source).unwrap().collect_index().unwrap();
        std::fs::remove_file(&path).unwrap();

        let tags: Vec<String> = index.iter().map(|e| e.type_tag.to_string()).collect();
        assert_eq!(tags, ["IHDR", "tEXt", "IDAT", "IEND"]);
    }

    #[test]
    fn memory_and_reader_inputs_match_the_slice_walk() {
        let png = sample_png();
        let expected = ChunkWalker::png(png.as_slice()).unwrap().collect_index().unwrap();

        let memory = open_source(InputSource::Memory(Bytes::from(sample_png()))).unwrap();
        assert_eq!(ChunkWalker::png(memory).unwrap().collect_index().unwrap(), expected);

        let reader = open_source(InputSource::Reader(Box::new(Cursor::new(sample_png())))).unwrap();
        assert_eq!(ChunkWalker::png(reader).unwrap().collect_index().unwrap(), expected);

        let boxed: Box<Vec<u8>> = Box::new(sample_png());
        assert_eq!(ChunkWalker::png(boxed).unwrap().collect_index().unwrap(), expected);

        let bytes = Bytes::from(sample_png());
        assert_eq!(ChunkWalker::png(bytes).unwrap().collect_index().unwrap(), expected);
    }

// # ✅ 10. Configurable layout

    #[test]
    fn custom_profile_without_tag_or_trailer() {
        // 2-byte preamble, u16 lengths, no tag, no trailer
        let profile = ContainerProfile::new(2, 2, 0, 0);
        let data: &[u8] = &[0xFF, 0xFF, 0, 3, b'a', b'b', b'c', 0, 1, b'z'];

        let chunks: Vec<_> = ChunkWalker::new(data, profile)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].payload().unwrap().to_bytes().unwrap().to_vec(), b"abc");
        assert_eq!(chunks[1].offset, 7);
        assert!(chunks[1].type_tag.as_bytes().is_empty());
    }

    #[test]
    fn invalid_length_width_is_rejected() {
        let data: &[u8] = &[];
        for width in [0usize, 9] {
            let profile = ContainerProfile::new(0, width, 4, 4);
            assert!(matches!(
                ChunkWalker::new(data, profile),
                Err(StreamError::InvalidProfile(_))
            ));
        }
    }

    #[test]
    fn profile_roundtrips_through_json() {
        let json = r#"{"preamble_len":8,"length_width":4,"tag_width":4,"trailer_width":4}"#;
        let profile: ContainerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile, ContainerProfile::png());
        assert_eq!(profile, ContainerProfile::default());
    }

// # ✅ 11. Property: the walker never mis-seeks

    proptest! {
        #[test]
        fn offsets_match_running_sum(payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..12)) {
            let mut png = PNG_SIGNATURE.to_vec();
            let mut expected = Vec::new();
            let mut offset = 8u64;
            for p in &payloads {
                expected.push((offset, p.len() as u64));
                png.extend(png_chunk(b"DATA", p));
                offset += 4 + 4 + p.len() as u64 + 4;
            }

            let got: Vec<(u64, u64)> = ChunkWalker::png(png.as_slice())
                .unwrap()
                .map(|c| c.map(|c| (c.offset, c.declared_length)))
                .collect::<Result<_, _>>()
                .unwrap();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn payload_views_return_exact_payloads(payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..8)) {
            let mut png = PNG_SIGNATURE.to_vec();
            for p in &payloads {
                png.extend(png_chunk(b"DATA", p));
            }

            let walker = ChunkWalker::png(png.as_slice()).unwrap();
            for (chunk, p) in walker.zip(payloads.iter()) {
                let bytes = chunk.unwrap().payload().unwrap().to_bytes().unwrap();
                prop_assert_eq!(&bytes[..], p.as_slice());
            }
        }
    }
}

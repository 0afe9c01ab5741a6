/*!
 * File Handle Tests
 * Read/seek offset properties of bundle file handles
 */

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use binfs::vfs::bundle::{BundleFile, Whence};
use binfs::vfs::BundleFS;
use proptest::prelude::*;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn handle_for(content: &[u8]) -> BundleFile {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer.start_file("f.bin", SimpleFileOptions::default()).unwrap();
    writer.write_all(content).unwrap();
    let data = writer.finish().unwrap().into_inner();

    BundleFS::from_bytes(&data)
        .unwrap()
        .resolve(Path::new("f.bin"))
        .unwrap()
}

#[test]
fn test_eof_exactly_at_size() {
    let mut file = handle_for(b"abcdef");
    let mut buf = [0u8; 4];

    assert_eq!(file.read(&mut buf).unwrap(), 4);
    assert!(!file.is_eof());
    assert_eq!(file.read(&mut buf).unwrap(), 2);
    assert!(file.is_eof());
    assert_eq!(file.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_read_after_seek() {
    let mut file = handle_for(b"0123456789");
    file.seek(SeekFrom::End(-4)).unwrap();

    let mut rest = String::new();
    file.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "6789");
}

proptest! {
    #[test]
    fn prop_seek_start_clamps(size in 0usize..256, offset in any::<i64>()) {
        let mut file = handle_for(&vec![7u8; size]);
        let position = file.seek_clamped(offset, Whence::Start);
        prop_assert_eq!(position, offset.clamp(0, size as i64) as u64);
        prop_assert_eq!(file.offset(), position);
    }

    #[test]
    fn prop_relative_seeks_stay_in_range(
        size in 0usize..256,
        moves in proptest::collection::vec((-300i64..300, 0u8..3), 1..20),
    ) {
        let mut file = handle_for(&vec![1u8; size]);
        let mut expected: i64 = 0;

        for (delta, origin) in moves {
            let (whence, base) = match origin {
                0 => (Whence::Start, 0),
                1 => (Whence::Current, expected),
                _ => (Whence::End, size as i64),
            };
            expected = (base + delta).clamp(0, size as i64);
            prop_assert_eq!(file.seek_clamped(delta, whence), expected as u64);
        }
    }

    #[test]
    fn prop_reads_never_exceed_size(size in 0usize..512, chunk in 1usize..64) {
        let content: Vec<u8> = (0..size).map(|i| i as u8).collect();
        let mut file = handle_for(&content);
        let mut collected = Vec::new();
        let mut buf = vec![0u8; chunk];

        loop {
            let n = file.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            collected.extend_from_slice(&buf[..n]);
            prop_assert_eq!(file.is_eof(), file.offset() == size as u64);
        }

        prop_assert!(file.is_eof());
        prop_assert_eq!(collected, content);
    }
}

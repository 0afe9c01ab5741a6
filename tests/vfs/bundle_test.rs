/*!
 * Bundle Filesystem Tests
 * Loading a ZIP bundle from disk and querying it through the FileSystem trait
 */

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use binfs::vfs::{BundleFS, FileSystem, VfsError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_bundle(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join("data.bin");
    let mut writer = ZipWriter::new(std::fs::File::create(&path).unwrap());
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
    path
}

#[test]
fn test_load_scenario() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(
        dir.path(),
        &[("dir/a.txt", b"hello"), ("dir/b.txt", b"world")],
    );

    let fs = BundleFS::from_bundle(&bundle).unwrap();

    assert!(fs.has_dir(Path::new("dir")));
    assert_eq!(fs.read_file(Path::new("dir/a.txt")).unwrap(), &b"hello"[..]);
    assert_eq!(fs.read_file(Path::new("dir/b.txt")).unwrap(), &b"world"[..]);
    assert!(matches!(
        fs.read_file(Path::new("dir/missing.txt")),
        Err(VfsError::NotFound(_))
    ));
    assert_eq!(fs.file_count(), 2);
}

#[test]
fn test_every_entry_round_trips() {
    let dir = TempDir::new().unwrap();
    let large: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    let entries: [(&str, &[u8]); 4] = [
        ("index.html", b"<html></html>"),
        ("css/site.css", b"body{}"),
        ("js/vendor/lib.js", &large),
        ("empty.txt", b""),
    ];
    let bundle = write_bundle(dir.path(), &entries);

    let fs = BundleFS::from_bundle(&bundle).unwrap();
    for (name, data) in &entries {
        assert_eq!(fs.read_file(Path::new(name)).unwrap(), &data[..], "{}", name);
    }

    // Every ancestor directory is registered
    for name in ["css", "js", "js/vendor", "."] {
        assert!(fs.has_dir(Path::new(name)), "{}", name);
        assert!(fs.stat(Path::new(name)).unwrap().is_dir());
    }
}

#[test]
fn test_unknown_paths_not_found() {
    let dir = TempDir::new().unwrap();
    let fs = BundleFS::from_bundle(write_bundle(dir.path(), &[("a/b.txt", b"x")])).unwrap();

    for missing in ["a/c.txt", "b", "a/b.txt/more", "zzz"] {
        let path = Path::new(missing);
        assert!(fs.open(path).is_err(), "{}", missing);
        assert!(fs.stat(path).unwrap_err().is_not_found(), "{}", missing);
        assert!(fs.read_file(path).unwrap_err().is_not_found(), "{}", missing);
        assert!(!fs.exists(path));
    }
}

#[test]
fn test_stat_metadata() {
    let dir = TempDir::new().unwrap();
    let fs = BundleFS::from_bundle(write_bundle(
        dir.path(),
        &[("docs/readme.md", b"# readme"), ("docs/empty.md", b"")],
    ))
    .unwrap();

    let file = fs.stat(Path::new("docs/readme.md")).unwrap();
    assert!(file.is_file());
    assert_eq!(file.size, 8);
    assert_eq!(file.name(), "readme.md");
    assert!(file.permissions.is_readonly());

    // Zero-length file and directory share size 0 but not type
    let empty = fs.stat(Path::new("docs/empty.md")).unwrap();
    let docs = fs.stat(Path::new("docs")).unwrap();
    assert_eq!(empty.size, docs.size);
    assert!(empty.is_file());
    assert!(docs.is_dir());

    // All entries share one synthetic modification time
    assert_eq!(file.modified, docs.modified);
}

#[test]
fn test_open_file_and_directory() {
    let dir = TempDir::new().unwrap();
    let fs = BundleFS::from_bundle(write_bundle(dir.path(), &[("static/app.js", b"run()")]))
        .unwrap();

    let mut file = fs.open(Path::new("/static/app.js")).unwrap();
    let mut content = Vec::new();
    file.read_to_end(&mut content).unwrap();
    assert_eq!(content, b"run()");
    assert_eq!(file.metadata().size, 5);
    file.close().unwrap();

    let handle = fs.open(Path::new("static")).unwrap();
    assert!(handle.is_dir());
    assert_eq!(handle.metadata().size, 0);
}

#[test]
fn test_load_twice_is_noop() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(dir.path(), &[("a.txt", b"first")]);

    let mut fs = BundleFS::new();
    fs.load(&bundle).unwrap();
    let files = fs.file_count();
    let dirs = fs.dir_count();

    // Replace the file on disk; a second load must not pick it up
    write_bundle(dir.path(), &[("b.txt", b"second"), ("c/d.txt", b"third")]);
    fs.load(&bundle).unwrap();

    assert_eq!(fs.file_count(), files);
    assert_eq!(fs.dir_count(), dirs);
    assert_eq!(fs.read_file(Path::new("a.txt")).unwrap(), &b"first"[..]);
    assert!(!fs.exists(Path::new("b.txt")));
}

#[test]
fn test_load_errors() {
    let dir = TempDir::new().unwrap();

    let missing = BundleFS::from_bundle(dir.path().join("nope.bin")).unwrap_err();
    assert!(matches!(missing, VfsError::BundleNotFound(_)));

    let garbage = dir.path().join("garbage.bin");
    std::fs::write(&garbage, b"DATA-not-a-zip").unwrap();
    let invalid = BundleFS::from_bundle(&garbage).unwrap_err();
    assert!(matches!(invalid, VfsError::InvalidArchive(_)));
    assert!(invalid.is_load_error());

    let mut fs = BundleFS::new();
    assert!(fs.load(&garbage).is_err());
    assert!(!fs.is_initialized());
    assert_eq!(fs.file_count(), 0);
    assert_eq!(fs.dir_count(), 0);
}

#[test]
fn test_glob_searches_host_filesystem() {
    let dir = TempDir::new().unwrap();
    let fs = BundleFS::from_bundle(write_bundle(dir.path(), &[("only-in-bundle.txt", b"x")]))
        .unwrap();
    std::fs::write(dir.path().join("on-disk.txt"), b"y").unwrap();

    let pattern = format!("{}/*.txt", dir.path().display());
    let matches = fs.glob(&pattern).unwrap();
    assert_eq!(matches, vec![dir.path().join("on-disk.txt")]);

    assert!(matches!(fs.glob("[unclosed"), Err(VfsError::InvalidPattern(_))));
}

mod common;

use earlyout::files::{open_file, read_from_file};
use earlyout::{Carrier, ErrorCode, invoke};
use std::fs;
use std::io::Read;

#[test]
fn test_existing_file_is_read_completely() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("existing_file.txt");
    // Larger than one read chunk so the loop runs more than once.
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&path, &content).unwrap();

    let carrier = read_from_file(&path);

    assert!(carrier.is_ok());
    assert_eq!(*carrier.value(), content);
}

#[test]
fn test_empty_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, b"").unwrap();

    assert_eq!(read_from_file(&path).into_result(), Ok(Vec::new()));
}

#[test]
fn test_missing_file_reports_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let expected = ErrorCode::from(fs::File::open(&path).unwrap_err());

    let carrier = read_from_file(&path);

    assert!(!carrier.is_ok());
    assert_eq!(carrier.error(), expected);
    assert_eq!(open_file(&path).error(), expected);
}

#[test]
fn test_missing_file_skips_read_logic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let journal = common::Journal::new();
    let inside = journal.clone();

    let carrier: Carrier<String> = invoke("read_text", move |frame| {
        let mut file = frame.propagate(open_file(&path))?;
        inside.record("read");
        let mut text = String::new();
        frame.propagate(file.read_to_string(&mut text))?;
        frame.finish(text)
    });

    assert!(!carrier.is_ok());
    assert!(journal.events().is_empty());
}

#[cfg(unix)]
#[test]
fn test_read_error_is_not_the_open_error() {
    // Opening a directory succeeds on unix; reading it fails with EISDIR.
    let dir = tempfile::tempdir().unwrap();
    let expected = {
        let mut file = fs::File::open(dir.path()).unwrap();
        let mut buffer = [0u8; 16];
        ErrorCode::from(file.read(&mut buffer).unwrap_err())
    };

    let carrier = read_from_file(dir.path());

    assert!(open_file(dir.path()).is_ok());
    assert!(!carrier.is_ok());
    assert_eq!(carrier.error(), expected);
}

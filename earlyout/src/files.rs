//! File reading built on frames.
//!
//! These are ordinary carrier-returning functions: the binary uses them, and
//! they double as the reference for how adopting code is written.

use crate::carrier::Carrier;
use crate::config::FrameConfig;
use crate::error::ErrorCode;
use crate::invoke_with;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

const CHUNK_SIZE: usize = 4096;

/// Opens `path` for reading. The error is the OS error number.
pub fn open_file(path: &Path) -> Carrier<File> {
    open_file_with(&FrameConfig::default(), path)
}

pub fn open_file_with(config: &FrameConfig, path: &Path) -> Carrier<File> {
    let path = path.to_path_buf();
    invoke_with(config, "open_file", move |frame| match File::open(&path) {
        Ok(file) => frame.finish(file),
        Err(error) => {
            debug!(path = %path.display(), %error, "open failed");
            frame.fail(ErrorCode::from(&error))
        }
    })
}

/// Reads the whole content of `path`.
///
/// An open failure is forwarded unchanged and no read is attempted. A read
/// failure finalizes with the read's own error code.
pub fn read_from_file(path: &Path) -> Carrier<Vec<u8>> {
    read_from_file_with(&FrameConfig::default(), path)
}

pub fn read_from_file_with(config: &FrameConfig, path: &Path) -> Carrier<Vec<u8>> {
    let path: PathBuf = path.to_path_buf();
    let config = *config;
    invoke_with(&config, "read_from_file", move |frame| {
        let mut file = frame.propagate(open_file_with(&config, &path))?;

        let mut target = Vec::new();
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let read = file.read(&mut buffer);
            if matches!(&read, Err(error) if error.kind() == io::ErrorKind::Interrupted) {
                continue;
            }
            let size = frame.propagate(read)?;
            if size == 0 {
                break;
            }
            target.extend_from_slice(&buffer[..size]);
        }

        debug!(path = %path.display(), bytes = target.len(), "file read");
        frame.finish(target)
    })
}

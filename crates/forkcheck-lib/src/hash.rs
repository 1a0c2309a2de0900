//! Cheap content fingerprint for files
//!
//! [`hash_file`] packs the file length into the high 32 bits and the djb2
//! hash of its bytes into the low 32 bits. It is meant for tests that need
//! to notice a file changed, not for anything adversarial.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const DJB2_SEED: u32 = 5381;

/// djb2 over `bytes`, 32-bit wrapping
pub fn djb2(bytes: &[u8]) -> u32 {
    bytes.iter().fold(DJB2_SEED, |hash, byte| {
        hash.wrapping_mul(33).wrapping_add(u32::from(*byte))
    })
}

/// Incremental djb2 for streamed input
#[derive(Debug, Clone, Copy)]
struct Djb2 {
    hash: u32,
}

impl Djb2 {
    fn new() -> Self {
        Self { hash: DJB2_SEED }
    }

    fn update(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash = self.hash.wrapping_mul(33).wrapping_add(u32::from(*byte));
        }
    }
}

/// Length plus checksum of a file, as produced by [`hash_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp(u64);

impl FileStamp {
    pub fn from_parts(length: u32, checksum: u32) -> Self {
        Self((u64::from(length) << 32) | u64::from(checksum))
    }

    /// File length, truncated to 32 bits
    pub fn length(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn checksum(&self) -> u32 {
        self.0 as u32
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<FileStamp> for u64 {
    fn from(stamp: FileStamp) -> Self {
        stamp.0
    }
}

/// Read `path` to the end and stamp it.
pub fn stamp_file(path: &Path) -> io::Result<FileStamp> {
    let mut file = File::open(path)?;
    let mut hasher = Djb2::new();
    let mut length: u64 = 0;
    let mut chunk = [0u8; 8192];

    loop {
        let read = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&chunk[..read]);
        length += read as u64;
    }

    Ok(FileStamp::from_parts(length as u32, hasher.hash))
}

/// `(length << 32) | djb2(contents)` for the file at `path`
pub fn hash_file(path: &Path) -> io::Result<u64> {
    stamp_file(path).map(u64::from)
}

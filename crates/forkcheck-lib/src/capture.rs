//! Console capture for one invocation
//!
//! While a [`CaptureGuard`] is alive, file descriptors 1 and 2 point at a
//! private anonymous file. Forked children inherit that redirection, so
//! whatever a test prints, including the panic message of a crash, ends up
//! in the buffer. Finishing the guard puts the original streams back and
//! returns the bytes written since it was opened. The buffer is truncated
//! and reused for the next invocation.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::error::{HarnessError, HarnessResult};

const STDOUT_FD: RawFd = 1;
const STDERR_FD: RawFd = 2;

/// Bytes written to stdout/stderr during one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    bytes: Vec<u8>,
}

impl Transcript {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Non-empty lines, without their terminators
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
    }

    pub fn contains(&self, needle: &[u8]) -> bool {
        !needle.is_empty() && self.bytes.windows(needle.len()).any(|w| w == needle)
    }
}

/// Reusable capture buffer plus the saved original streams.
pub struct OutputCapture {
    buffer: File,
    saved_stdout: OwnedFd,
    saved_stderr: OwnedFd,
}

impl OutputCapture {
    /// Create the buffer and remember where stdout/stderr currently point
    pub fn new() -> HarnessResult<Self> {
        let buffer = tempfile::tempfile().map_err(HarnessError::Capture)?;
        let saved_stdout = dup_fd(STDOUT_FD).map_err(HarnessError::Capture)?;
        let saved_stderr = dup_fd(STDERR_FD).map_err(HarnessError::Capture)?;

        Ok(Self {
            buffer,
            saved_stdout,
            saved_stderr,
        })
    }

    /// Redirect both streams into the buffer until the guard is finished
    /// or dropped.
    pub fn begin(&mut self) -> HarnessResult<CaptureGuard<'_>> {
        flush_std_streams();

        redirect(self.buffer.as_raw_fd(), STDOUT_FD).map_err(HarnessError::Capture)?;
        if let Err(e) = redirect(self.buffer.as_raw_fd(), STDERR_FD) {
            let _ = redirect(self.saved_stdout.as_raw_fd(), STDOUT_FD);
            return Err(HarnessError::Capture(e));
        }

        Ok(CaptureGuard {
            capture: self,
            active: true,
        })
    }

    /// Capture everything `f` prints.
    pub fn capture<T>(&mut self, f: impl FnOnce() -> T) -> HarnessResult<(T, Transcript)> {
        let guard = self.begin()?;
        let value = f();
        let transcript = guard.finish()?;
        Ok((value, transcript))
    }

    fn restore(&mut self) -> io::Result<()> {
        flush_std_streams();
        redirect(self.saved_stdout.as_raw_fd(), STDOUT_FD)?;
        redirect(self.saved_stderr.as_raw_fd(), STDERR_FD)
    }

    /// Read the buffer back and truncate it for the next invocation
    fn drain(&mut self) -> io::Result<Transcript> {
        let mut bytes = Vec::new();
        self.buffer.seek(SeekFrom::Start(0))?;
        self.buffer.read_to_end(&mut bytes)?;
        self.buffer.set_len(0)?;
        self.buffer.seek(SeekFrom::Start(0))?;
        Ok(Transcript::new(bytes))
    }
}

/// An open capture window.
///
/// Dropping the guard without calling [`finish`](Self::finish) restores
/// the original streams and discards what was captured.
pub struct CaptureGuard<'a> {
    capture: &'a mut OutputCapture,
    active: bool,
}

impl CaptureGuard<'_> {
    /// Restore the streams and return the transcript.
    pub fn finish(mut self) -> HarnessResult<Transcript> {
        self.active = false;
        self.capture.restore().map_err(HarnessError::Capture)?;
        self.capture.drain().map_err(HarnessError::Capture)
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.capture.restore();
            let _ = self.capture.drain();
        }
    }
}

fn flush_std_streams() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

fn dup_fd(fd: RawFd) -> io::Result<OwnedFd> {
    // SAFETY: dup only reads the descriptor table; a valid result is a new
    // descriptor owned by nobody else.
    let copy = unsafe { libc::dup(fd) };
    if copy == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { OwnedFd::from_raw_fd(copy) })
}

fn redirect(src: RawFd, dst: RawFd) -> io::Result<()> {
    loop {
        // SAFETY: `src` is kept open by its owner for the whole call and
        // `dst` is one of the standard descriptors.
        if unsafe { libc::dup2(src, dst) } != -1 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

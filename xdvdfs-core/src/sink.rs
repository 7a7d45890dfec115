use std::io::Write;

use crate::layout::DirentAttributes;

/// Readable handle to one file entry's on-disc byte range.
///
/// A listing sink can ignore this entirely (no bytes are read); an extraction
/// sink pulls the payload through it in fixed-size chunks.
pub trait FileData {
    /// Total size of the file, in bytes.
    fn size(&self) -> u64;

    /// Reads the next chunk into `buf`, returning the number of bytes written
    /// (0 once the payload is exhausted).
    fn read_chunk(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

/// Receives every entry visited during a directory walk.
///
/// `path` is the entry's path within the image, using `/` as a separator and
/// with no leading slash (e.g. `"media/audio/intro.wav"`).
pub trait TreeSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn directory(&mut self, path: &str) -> Result<(), Self::Error>;

    fn file(
        &mut self,
        path: &str,
        size: u64,
        attributes: DirentAttributes,
        data: &mut dyn FileData,
    ) -> Result<(), Self::Error>;
}

#[derive(thiserror::Error, Debug, Copy, Clone, Eq, PartialEq)]
#[error("listing sink is infallible")]
pub struct Infallible;

/// Appends one line per entry to an in-memory buffer, truncating (rather than
/// failing) once the buffer is full.
///
/// Format: `"{path}/\n"` for directories, `"{path} ({size} bytes)\n"` for files.
pub struct ListingSink {
    buffer: String,
    capacity: usize,
    truncated: bool,
}

impl ListingSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: String::new(),
            capacity,
            truncated: false,
        }
    }

    pub fn into_inner(self) -> String {
        self.buffer
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn push_line(&mut self, line: &str) {
        if self.truncated {
            return;
        }

        if self.buffer.len() + line.len() > self.capacity {
            self.truncated = true;
            return;
        }

        self.buffer.push_str(line);
    }
}

impl TreeSink for ListingSink {
    type Error = Infallible;

    fn directory(&mut self, path: &str) -> Result<(), Self::Error> {
        self.push_line(&format!("{path}/\n"));
        Ok(())
    }

    fn file(
        &mut self,
        path: &str,
        size: u64,
        _attributes: DirentAttributes,
        _data: &mut dyn FileData,
    ) -> Result<(), Self::Error> {
        self.push_line(&format!("{path} ({size} bytes)\n"));
        Ok(())
    }
}

/// Narrow host-filesystem collaborator an extraction sink drives; implemented
/// concretely (over `std::fs`) by the CLI, not by this crate.
pub trait HostFilesystem {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_dir(&mut self, path: &str) -> Result<(), Self::Error>;

    fn create_file(&mut self, path: &str) -> Result<Box<dyn Write>, Self::Error>;
}

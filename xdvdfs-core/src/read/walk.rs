use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::blockdev::BlockDeviceRead;
use crate::error::{Error, MalformedReason};
use crate::layout::{DirectoryEntryTable, SECTOR_SIZE_U64};
use crate::read::decode_entry;
use crate::sink::{FileData, TreeSink};

/// Recursion cap on nested sub-directories. An adversarial image with a BST
/// cycle through directory entries (not just within one table) would otherwise
/// recurse unboundedly; this caps it the same way the in-table visited-set
/// caps cycles within a single table.
pub const MAX_DIR_DEPTH: u32 = 128;

/// Tunables for a single walk, set once per session.
pub struct WalkOptions {
    /// Checked between entries and between read chunks; set to request
    /// cooperative early termination.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Size of the buffer used to stream file payloads to the sink.
    pub buffer_size: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            cancel: None,
            buffer_size: 2 * 1024 * 1024,
        }
    }
}

/// Walks `root` and every nested sub-directory, dispatching each entry to `sink`.
pub fn walk_tree<D, S>(
    dev: &mut D,
    root: &DirectoryEntryTable,
    sink: &mut S,
    options: &WalkOptions,
) -> Result<(), Error<D::ReadError>>
where
    D: BlockDeviceRead + ?Sized,
    S: TreeSink,
{
    walk_directory(dev, root, "", sink, options, 0)
}

fn walk_directory<D, S>(
    dev: &mut D,
    table: &DirectoryEntryTable,
    prefix: &str,
    sink: &mut S,
    options: &WalkOptions,
    depth: u32,
) -> Result<(), Error<D::ReadError>>
where
    D: BlockDeviceRead + ?Sized,
    S: TreeSink,
{
    if depth > MAX_DIR_DEPTH {
        return Err(MalformedReason::DepthExceeded { depth }.into());
    }

    if table.is_empty() {
        return Ok(());
    }

    let mut visited = HashSet::new();
    let mut stack = vec![table.offset(0).map_err(MalformedReason::from)?];

    while let Some(offset) = stack.pop() {
        check_cancelled(options)?;

        if !visited.insert(offset) {
            return Err(MalformedReason::Cycle { offset }.into());
        }

        let Some(entry) = decode_entry(dev, table, offset)? else {
            continue;
        };

        let name = entry.name_str();
        let path = if prefix.is_empty() {
            name.into_owned()
        } else {
            format!("{prefix}/{name}")
        };

        if entry.node.dirent.is_directory() {
            sink.directory(&path)
                .map_err(|e| Error::Sink(Box::new(e)))?;

            if !entry.node.dirent.is_empty() {
                let child_table = entry
                    .node
                    .dirent
                    .dirent_table()
                    .expect("is_directory() implies dirent_table() is Some");

                #[cfg(feature = "logging")]
                log::trace!("descending into {path} at depth {}", depth + 1);

                walk_directory(dev, &child_table, &path, sink, options, depth + 1)?;
            }
        } else {
            let mut reader = EntryReader {
                dev,
                sector: entry.node.dirent.data.sector,
                total: entry.node.dirent.data.size as u64,
                bytes_read: 0,
            };
            sink.file(
                &path,
                entry.node.dirent.data.size as u64,
                entry.node.dirent.attributes,
                &mut reader,
            )
            .map_err(|e| Error::Sink(Box::new(e)))?;
        }

        for child in [entry.node.left_entry_offset, entry.node.right_entry_offset] {
            if child != 0 && child != 0xffff {
                stack.push(table.offset(4 * child as u64).map_err(MalformedReason::from)?);
            }
        }
    }

    Ok(())
}

fn check_cancelled<E: std::error::Error + Send + Sync + 'static>(
    options: &WalkOptions,
) -> Result<(), Error<E>> {
    match &options.cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
        _ => Ok(()),
    }
}

struct EntryReader<'a, D: BlockDeviceRead + ?Sized> {
    dev: &'a mut D,
    sector: u32,
    total: u64,
    bytes_read: u64,
}

impl<D: BlockDeviceRead + ?Sized> FileData for EntryReader<'_, D> {
    fn size(&self) -> u64 {
        self.total
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.total - self.bytes_read;
        if remaining == 0 {
            return Ok(0);
        }

        let n = remaining.min(buf.len() as u64) as usize;
        let offset = SECTOR_SIZE_U64 * self.sector as u64 + self.bytes_read;
        self.dev
            .read_at(offset, &mut buf[..n])
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

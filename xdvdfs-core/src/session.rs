use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::blockdev::{BlockDeviceRead, OffsetWrapper};
use crate::error::Error;
use crate::layout::{DirectoryEntryTable, DirentAttributes};
use crate::read::{self, walk_tree, WalkOptions};
use crate::sink::{FileData, HostFilesystem, TreeSink};

/// Default size of the buffer used to stream file payloads during extraction.
pub const DEFAULT_BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// A located, ready-to-traverse XDVDFS volume over a byte source.
///
/// Locating the volume (probing the candidate base offsets and validating the
/// dual magic) happens once, in [`Session::open`]; [`Session::list`] and
/// [`Session::extract`] may each be called any number of times afterward.
pub struct Session<D: BlockDeviceRead> {
    dev: OffsetWrapper<D>,
    root: DirectoryEntryTable,
    options: WalkOptions,
}

impl<D: BlockDeviceRead> Session<D> {
    /// Locates the volume on `dev` and opens a session over it.
    pub fn open(dev: D) -> Result<Self, Error<D::ReadError>> {
        let mut dev = OffsetWrapper::new(dev)?;
        let volume = read::read_volume(&mut dev)?;

        #[cfg(feature = "logging")]
        log::debug!(
            "opened xdvdfs volume at base offset {:?}",
            dev.base_offset()
        );

        Ok(Self {
            dev,
            root: volume.root_table,
            options: WalkOptions {
                buffer_size: DEFAULT_BUFFER_SIZE,
                ..WalkOptions::default()
            },
        })
    }

    /// Overrides the read-buffer size used during extraction. Values smaller
    /// than one sector are clamped up to one sector.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.options.buffer_size = size.max(crate::layout::SECTOR_SIZE as usize);
        self
    }

    /// Registers a cooperative cancellation flag, checked between entries and
    /// between read chunks.
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.options.cancel = Some(cancel);
        self
    }

    /// Walks the volume's tree, dispatching every directory and file to `sink`.
    pub fn list<S: TreeSink>(&mut self, sink: &mut S) -> Result<(), Error<D::ReadError>> {
        walk_tree(&mut self.dev, &self.root, sink, &self.options)
    }

    /// Walks the volume's tree, extracting every entry through `fs`.
    pub fn extract<F>(&mut self, fs: &mut F) -> Result<(), Error<D::ReadError>>
    where
        F: HostFilesystem,
        F::Error: From<std::io::Error>,
    {
        let mut sink = ExtractSink {
            fs,
            buffer: vec![0u8; self.options.buffer_size],
        };
        walk_tree(&mut self.dev, &self.root, &mut sink, &self.options)
    }

    /// Releases the underlying byte source.
    pub fn close(self) -> D {
        self.dev.into_inner()
    }
}

/// Adapts a [`HostFilesystem`] into a [`TreeSink`], streaming each file's
/// payload through a reusable buffer sized by the owning [`Session`].
struct ExtractSink<'a, F: HostFilesystem> {
    fs: &'a mut F,
    buffer: Vec<u8>,
}

impl<F> TreeSink for ExtractSink<'_, F>
where
    F: HostFilesystem,
    F::Error: From<std::io::Error>,
{
    type Error = F::Error;

    fn directory(&mut self, path: &str) -> Result<(), Self::Error> {
        self.fs.create_dir(path)
    }

    fn file(
        &mut self,
        path: &str,
        _size: u64,
        _attributes: DirentAttributes,
        data: &mut dyn FileData,
    ) -> Result<(), Self::Error> {
        let mut out = self.fs.create_file(path)?;

        loop {
            let n = data.read_chunk(&mut self.buffer)?;
            if n == 0 {
                break;
            }
            out.write_all(&self.buffer[..n])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::VolumeDescriptor;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn image_with(root_sector: u32, root_size: u32, body: &[(u64, &[u8])]) -> Vec<u8> {
        let volume = VolumeDescriptor::new(DirectoryEntryTable {
            region: crate::layout::DiskRegion {
                sector: root_sector,
                size: root_size,
            },
        });
        let serialized = volume.serialize().expect("serialize should succeed");

        let mut image = vec![0u8; 33 * 2048];
        image[32 * 2048..][..serialized.len()].copy_from_slice(&serialized);

        for (offset, bytes) in body {
            let offset = *offset as usize;
            if image.len() < offset + bytes.len() {
                image.resize(offset + bytes.len(), 0);
            }
            image[offset..offset + bytes.len()].copy_from_slice(bytes);
        }

        image
    }

    #[derive(Default, Clone)]
    struct InMemoryFs {
        dirs: Rc<RefCell<Vec<String>>>,
        files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    }

    struct FileHandle {
        path: String,
        buf: Vec<u8>,
        files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    }

    impl Write for FileHandle {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buf.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Drop for FileHandle {
        fn drop(&mut self) {
            self.files
                .borrow_mut()
                .insert(self.path.clone(), std::mem::take(&mut self.buf));
        }
    }

    impl HostFilesystem for InMemoryFs {
        type Error = std::io::Error;

        fn create_dir(&mut self, path: &str) -> Result<(), Self::Error> {
            self.dirs.borrow_mut().push(path.to_string());
            Ok(())
        }

        fn create_file(&mut self, path: &str) -> Result<Box<dyn Write>, Self::Error> {
            Ok(Box::new(FileHandle {
                path: path.to_string(),
                buf: Vec::new(),
                files: Rc::clone(&self.files),
            }))
        }
    }

    #[test]
    fn test_session_open_rejects_non_xiso() {
        let image = vec![0u8; 64];
        let res = Session::open(image.as_slice());
        assert!(matches!(res, Err(Error::NotAnXiso)));
    }

    #[test]
    fn test_session_list_single_file() {
        #[rustfmt::skip]
        let entry: Vec<u8> = vec![
            0, 0, 0, 0,
            3, 0, 0, 0,
            0xd2, 0x04, 0, 0,
            0, 11, b'd', b'e', b'f', b'a', b'u', b'l', b't', b'.', b'x', b'b', b'e',
        ];
        let image = image_with(40, 2048, &[(40 * 2048, &entry)]);

        let mut session = Session::open(image.as_slice()).expect("should open session");
        let mut sink = crate::sink::ListingSink::new(4096);
        session.list(&mut sink).expect("list should succeed");
        assert_eq!(sink.into_inner(), "default.xbe (1234 bytes)\n");
    }

    #[test]
    fn test_session_close_returns_device() {
        let image = image_with(40, 0, &[]);
        let session = Session::open(image.as_slice()).expect("should open session");
        let dev = session.close();
        assert_eq!(dev.len(), image.len());
    }

    #[test]
    fn test_session_with_buffer_size_clamps_to_sector() {
        let image = image_with(40, 0, &[]);
        let session = Session::open(image.as_slice())
            .expect("should open session")
            .with_buffer_size(1);
        assert_eq!(session.options.buffer_size, crate::layout::SECTOR_SIZE as usize);
    }

    #[test]
    fn test_session_extract_creates_file_and_directory() {
        #[rustfmt::skip]
        let dir_entry: Vec<u8> = vec![
            0, 0, 0, 0,
            41, 0, 0, 0,
            0, 8, 0, 0,
            0x10, 3, b'a', b'b', b'c',
        ];
        #[rustfmt::skip]
        let file_entry: Vec<u8> = vec![
            0, 0, 0, 0,
            50, 0, 0, 0,
            4, 0, 0, 0,
            0, 3, b'x', b'y', b'z',
        ];
        let mut body = vec![(40 * 2048, dir_entry.as_slice())];
        body.push((41 * 2048, file_entry.as_slice()));
        let data = [1u8, 2, 3, 4];
        body.push((50 * 2048, &data));
        let image = image_with(40, 2048, &body);

        let mut session = Session::open(image.as_slice()).expect("should open session");
        let mut fs = InMemoryFs::default();
        session.extract(&mut fs).expect("extract should succeed");

        assert_eq!(*fs.dirs.borrow(), vec!["abc".to_string()]);
        assert_eq!(
            fs.files.borrow().get("abc/xyz"),
            Some(&vec![1u8, 2, 3, 4])
        );
    }
}

use super::BlockDeviceRead;
use crate::error::Error;
use crate::read;

/// Candidate byte offsets at which the XDVDFS volume may begin inside a larger
/// disc image, tried in this order until one yields a valid volume descriptor.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
#[repr(u64)]
pub enum XisoOffset {
    #[default]
    Xiso = 0,
    Xgd2 = 265_879_552,
    Xgd3 = 34_078_720,
}

impl XisoOffset {
    const ALL: [XisoOffset; 3] = [XisoOffset::Xiso, XisoOffset::Xgd2, XisoOffset::Xgd3];
}

impl From<XisoOffset> for u64 {
    fn from(o: XisoOffset) -> Self {
        o as u64
    }
}

/// Wraps a byte source so that every read is transparently shifted by the
/// volume's base offset, located once at construction time.
pub struct OffsetWrapper<T>
where
    T: BlockDeviceRead,
{
    inner: T,
    offset: XisoOffset,
}

impl<T> OffsetWrapper<T>
where
    T: BlockDeviceRead,
{
    /// Probes each candidate offset in turn and keeps the first that decodes
    /// a valid volume descriptor. A read failure while probing (e.g. the
    /// candidate offset runs past the end of a short image) is treated the
    /// same as a magic mismatch: try the next candidate.
    pub fn new(dev: T) -> Result<Self, Error<T::ReadError>> {
        let mut s = Self {
            inner: dev,
            offset: XisoOffset::default(),
        };

        for offset in XisoOffset::ALL {
            s.offset = offset;
            if read::read_volume(&mut s).is_ok() {
                return Ok(s);
            }
        }

        Err(Error::NotAnXiso)
    }

    pub fn base_offset(&self) -> XisoOffset {
        self.offset
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> BlockDeviceRead for OffsetWrapper<T>
where
    T: BlockDeviceRead,
{
    type ReadError = T::ReadError;

    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> Result<(), Self::ReadError> {
        self.inner
            .read_at(offset + u64::from(self.offset), buffer)
    }

    fn size(&mut self) -> Result<u64, Self::ReadError> {
        self.inner.size()
    }
}

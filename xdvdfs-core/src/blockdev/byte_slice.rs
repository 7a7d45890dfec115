use thiserror::Error;

use super::BlockDeviceRead;

#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
#[error("read out of bounds of the backing byte slice")]
pub struct ByteSliceOutOfBounds;

impl BlockDeviceRead for &[u8] {
    type ReadError = ByteSliceOutOfBounds;

    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> Result<(), ByteSliceOutOfBounds> {
        let offset = offset as usize;
        let source_len = self.len();
        let size = buffer.len();
        if offset >= source_len || source_len - offset < size {
            return Err(ByteSliceOutOfBounds);
        }

        buffer.copy_from_slice(&self[offset..(offset + size)]);
        Ok(())
    }

    fn size(&mut self) -> Result<u64, ByteSliceOutOfBounds> {
        Ok(self.len() as u64)
    }
}

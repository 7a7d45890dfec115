/// Random-access byte source backing an XDVDFS session.
///
/// Implementations are read with positioned reads rather than a shared cursor:
/// every call is independent and must not depend on the position left behind
/// by a previous call.
pub trait BlockDeviceRead {
    type ReadError: std::error::Error + Send + Sync + 'static;

    /// Reads exactly `buffer.len()` bytes starting at `offset`.
    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> Result<(), Self::ReadError>;

    /// Total size of the underlying byte source, in bytes.
    fn size(&mut self) -> Result<u64, Self::ReadError>;
}

impl<R> BlockDeviceRead for R
where
    R: std::io::Read + std::io::Seek,
{
    type ReadError = std::io::Error;

    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> Result<(), std::io::Error> {
        self.seek(std::io::SeekFrom::Start(offset))?;
        self.read_exact(buffer)
    }

    fn size(&mut self) -> Result<u64, std::io::Error> {
        let pos = self.stream_position()?;
        let size = self.seek(std::io::SeekFrom::End(0))?;
        self.seek(std::io::SeekFrom::Start(pos))?;
        Ok(size)
    }
}

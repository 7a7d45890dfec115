use crate::blockdev::BlockDeviceRead;
use crate::error::Error;
use crate::layout::{VolumeDescriptor, SECTOR_SIZE_U64};

/// Reads the volume descriptor from sector 32 of `dev` at its current base offset.
///
/// Any I/O failure (including a read past the end of a short image) is folded
/// into [`Error::NotAnXiso`] rather than surfaced as [`Error::Io`]: at this
/// layer we can't yet tell a genuinely broken device from "this candidate
/// offset just isn't where the volume lives".
pub fn read_volume<D: BlockDeviceRead + ?Sized>(
    dev: &mut D,
) -> Result<VolumeDescriptor, Error<D::ReadError>> {
    let mut buffer = [0u8; std::mem::size_of::<VolumeDescriptor>()];

    dev.read_at(32 * SECTOR_SIZE_U64, &mut buffer)
        .map_err(|_| Error::NotAnXiso)?;

    VolumeDescriptor::deserialize(&buffer)
        .ok()
        .filter(VolumeDescriptor::is_valid)
        .ok_or(Error::NotAnXiso)
}

#[cfg(test)]
mod test {
    use super::read_volume;
    use crate::error::Error;
    use crate::layout::{DirectoryEntryTable, DiskRegion, VolumeDescriptor, VOLUME_HEADER_MAGIC};

    #[test]
    fn test_read_volume_not_enough_disk_space() {
        let mut data: &[u8] = &[0u8];
        let res = read_volume(&mut data);
        assert!(matches!(res, Err(Error::NotAnXiso)));
    }

    #[test]
    fn test_read_volume_invalid_magic() {
        let mut volume = [0u8; 0x800];
        volume[0..0x14].copy_from_slice(&VOLUME_HEADER_MAGIC);
        volume[0x7ec..0x800].copy_from_slice(&VOLUME_HEADER_MAGIC);
        volume[0x14] = 10;
        volume[0x18] = 20;
        volume[0] = 0;

        let mut image = vec![0u8; 33 * 2048];
        image[32 * 2048..][..volume.len()].copy_from_slice(&volume);

        let res = read_volume(&mut image.as_slice());
        assert!(matches!(res, Err(Error::NotAnXiso)));
    }

    #[test]
    fn test_read_volume_valid() {
        let volume = VolumeDescriptor::new(DirectoryEntryTable {
            region: DiskRegion {
                sector: 10,
                size: 20,
            },
        });
        let serialized = volume.serialize().expect("serialize should succeed");

        let mut image = vec![0u8; 33 * 2048];
        image[32 * 2048..][..serialized.len()].copy_from_slice(&serialized);

        let res = read_volume(&mut image.as_slice()).expect("volume should be read");
        assert_eq!(res, volume);
    }
}

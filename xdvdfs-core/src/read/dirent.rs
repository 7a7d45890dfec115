use crate::blockdev::BlockDeviceRead;
use crate::error::{Error, MalformedReason};
use crate::layout::{
    DirectoryEntryDiskNode, DirectoryEntryNode, DirectoryEntryTable, SECTOR_SIZE_U64,
};

/// Decodes one directory entry at `offset` (an absolute byte offset) inside
/// `table`, transparently skipping the `0xffff` sector-padding sentinel.
///
/// Returns `Ok(None)` once padding runs to the end of the table without
/// producing another record, which is not an error: the table is simply
/// exhausted there.
pub fn decode_entry<D: BlockDeviceRead + ?Sized>(
    dev: &mut D,
    table: &DirectoryEntryTable,
    mut offset: u64,
) -> Result<Option<DirectoryEntryNode>, Error<D::ReadError>> {
    let table_start = table.start_offset();
    let table_end = table_start + table.size() as u64;

    loop {
        if offset >= table_end {
            return Ok(None);
        }

        let mut head_buf = [0u8; DirectoryEntryDiskNode::ON_DISK_SIZE];
        dev.read_at(offset, &mut head_buf)?;

        if head_buf[0..2] == [0xff, 0xff] {
            let next = next_sector_boundary(offset);

            #[cfg(feature = "logging")]
            log::trace!("pad sentinel at {offset:#x}, skipping to {next:#x}");

            if next >= table_end {
                return Ok(None);
            }
            offset = next;
            continue;
        }

        let Some(mut node) = DirectoryEntryNode::deserialize(&head_buf, offset)
            .ok()
            .flatten()
        else {
            return Ok(None);
        };

        validate_entry(table, &node)?;

        let name_len = node.node.dirent.filename_length as usize;
        let name_offset = offset + DirectoryEntryDiskNode::ON_DISK_SIZE as u64;
        dev.read_at(name_offset, &mut node.name[..name_len])?;
        validate_name(offset, node.name_slice())?;

        if !node.node.dirent.is_empty() {
            let data = node.node.dirent.data;
            let image_size = dev.size()?;
            let data_end = SECTOR_SIZE_U64 * data.sector as u64 + data.size as u64;
            if data_end > image_size {
                return Err(MalformedReason::DataOutOfBounds {
                    offset,
                    sector: data.sector,
                    size: data.size,
                    image_size,
                }
                .into());
            }
        }

        return Ok(Some(node));
    }
}

fn next_sector_boundary(offset: u64) -> u64 {
    (offset / SECTOR_SIZE_U64 + 1) * SECTOR_SIZE_U64
}

fn validate_entry(
    table: &DirectoryEntryTable,
    node: &DirectoryEntryNode,
) -> Result<(), MalformedReason> {
    if node.node.dirent.filename_length == 0 {
        return Err(MalformedReason::EmptyName {
            offset: node.offset,
        });
    }

    for child in [node.node.left_entry_offset, node.node.right_entry_offset] {
        if child != 0 && child != 0xffff {
            table.offset(4 * child as u64)?;
        }
    }

    Ok(())
}

fn validate_name(offset: u64, name: &[u8]) -> Result<(), MalformedReason> {
    if name.contains(&0) || name.contains(&b'/') || name.contains(&b'\\') {
        return Err(MalformedReason::NameHasSeparator {
            offset,
            name: String::from_utf8_lossy(name).into_owned(),
        });
    }
    if name == b"." || name == b".." {
        return Err(MalformedReason::NameIsRelative {
            offset,
            name: String::from_utf8_lossy(name).into_owned(),
        });
    }
    Ok(())
}

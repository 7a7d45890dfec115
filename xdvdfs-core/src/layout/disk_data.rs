use serde::{Deserialize, Serialize};

use super::{DirectoryEntryTable, DirentAttributes, DiskRegion};

/// On-disc representation of a directory entry's data: the region it occupies
/// plus attributes and name length. Excludes the BST child links and the name itself.
#[repr(C)]
#[repr(packed)]
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DirectoryEntryDiskData {
    pub data: DiskRegion,
    pub attributes: DirentAttributes,
    pub filename_length: u8,
}

impl DirectoryEntryDiskData {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.directory()
    }

    pub fn dirent_table(&self) -> Option<DirectoryEntryTable> {
        self.is_directory()
            .then_some(DirectoryEntryTable { region: self.data })
    }
}

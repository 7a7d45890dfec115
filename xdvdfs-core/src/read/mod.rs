mod dirent;
mod volume;
mod walk;

pub use dirent::*;
pub use volume::*;
pub use walk::*;

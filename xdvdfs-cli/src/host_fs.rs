use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use xdvdfs::sink::HostFilesystem;

/// Extracts into a directory tree rooted at `root`, creating it if necessary.
pub struct DirFilesystem {
    root: PathBuf,
}

impl DirFilesystem {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl HostFilesystem for DirFilesystem {
    type Error = std::io::Error;

    fn create_dir(&mut self, path: &str) -> Result<(), Self::Error> {
        let path = self.resolve(path);
        println!("Extracting directory {}", path.display());
        std::fs::create_dir_all(path)
    }

    fn create_file(&mut self, path: &str) -> Result<Box<dyn Write>, Self::Error> {
        let path = self.resolve(path);
        println!("Extracting file {}", path.display());

        if let Some(parent) = Path::new(&path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::options()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        Ok(Box::new(file))
    }
}

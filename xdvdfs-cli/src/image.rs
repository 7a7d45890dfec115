use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use xdvdfs::Session;

/// Opens `path` and locates the XDVDFS volume within it.
pub fn open_session(path: &Path) -> anyhow::Result<Session<BufReader<File>>> {
    let file = File::open(path)?;
    let session = Session::open(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
    Ok(session)
}

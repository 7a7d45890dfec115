use clap::Args;
use std::path::{Path, PathBuf};

use crate::host_fs::DirFilesystem;
use crate::image::open_session;

#[derive(Args)]
#[command(about = "Extract an entire image to a destination directory")]
pub struct ExtractArgs {
    #[arg(help = "Path to XISO image")]
    image_path: String,

    #[arg(help = "Destination directory, created if missing")]
    dest_path: Option<String>,
}

pub fn cmd_extract(args: &ExtractArgs) -> anyhow::Result<()> {
    let dest = match &args.dest_path {
        Some(path) => PathBuf::from(path),
        None => {
            let image_path = Path::new(&args.image_path);
            let name = image_path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("{}: has no file name", args.image_path))?;
            PathBuf::from(name).with_extension("")
        }
    };

    let mut session = open_session(Path::new(&args.image_path))?;
    let mut fs = DirFilesystem::new(dest);
    session.extract(&mut fs)?;

    Ok(())
}

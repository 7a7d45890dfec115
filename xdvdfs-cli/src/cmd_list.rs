use clap::Args;
use std::path::Path;

use xdvdfs::sink::ListingSink;

use crate::image::open_session;

#[derive(Args)]
#[command(about = "List every file and directory in an image")]
pub struct ListArgs {
    #[arg(help = "Path to XISO image")]
    image_path: String,
}

pub fn cmd_list(args: &ListArgs) -> anyhow::Result<()> {
    let mut session = open_session(Path::new(&args.image_path))?;

    let mut sink = ListingSink::new(1024 * 1024 * 1024);
    session.list(&mut sink)?;

    print!("{}", sink.into_inner());
    if sink.truncated() {
        eprintln!("warning: listing truncated");
    }

    Ok(())
}

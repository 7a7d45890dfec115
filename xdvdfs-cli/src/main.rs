use clap::{Parser, Subcommand};

mod cmd_extract;
mod cmd_list;
mod host_fs;
mod image;

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List every file and directory in an XISO image
    List(cmd_list::ListArgs),
    /// Extract every file and directory in an XISO image to a destination directory
    Extract(cmd_extract::ExtractArgs),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let res = match &cli.cmd {
        Cmd::List(args) => cmd_list::cmd_list(args),
        Cmd::Extract(args) => cmd_extract::cmd_extract(args),
    };

    if let Err(err) = res {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

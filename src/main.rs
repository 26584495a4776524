mod args;
mod cli;

use clap::Parser;

use args::Arguments;

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    cli::run(&args)
}

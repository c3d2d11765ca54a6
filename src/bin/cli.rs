// src/bin/cli.rs
use clap::Parser;
use pena::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    log::init_file(&cli::store_options(&args).log_path());
    cli::run(args)
}

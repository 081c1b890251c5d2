// src/bin/cli.rs
use trac_collate::cli;

fn main() -> color_eyre::Result<()> {
    cli::run()
}

//! CLI entry point for the photomosaic builder

use clap::Parser;
use photomosaic::io::cli::Cli;

fn main() -> photomosaic::Result<()> {
    Cli::parse().run()
}

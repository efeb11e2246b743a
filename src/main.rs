// Released under the MIT or Apache-2.0 licenses, at your option.

//! `combinatus` — high-performance enumeration engine for combinations,
//! permutations, and integer partitions. Binary entry point; the domain
//! logic lives in the library crate (`src/lib.rs`).

use clap::Parser;
use color_eyre::eyre::Result;

mod app;

use app::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    combinatus::logging::init();
    let cli = Cli::parse();
    app::actual(cli)
}

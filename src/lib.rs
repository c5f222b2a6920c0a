pub mod action;
pub mod categories;
pub mod cli;
pub mod data;
pub mod dataset;
pub mod filter;
pub mod io_utils;
pub mod loader;
pub mod normalize;
pub mod outcome;
pub mod profile;
pub mod render;
pub mod score;
pub mod sort;
pub mod table;
pub mod view;

use std::{env, io::Write, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    dataset::Dataset,
    loader::LoadOptions,
    profile::Profile,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("article_triage", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::View(args) => view::execute(&args),
        Commands::Categories(args) => categories::execute(&args),
        Commands::Profile(args) => handle_profile(&args),
    }
}

fn handle_profile(args: &cli::ProfileArgs) -> Result<()> {
    let profile = Profile::default();
    match &args.output {
        Some(path) => {
            profile
                .save(path)
                .with_context(|| format!("Writing profile to {path:?}"))?;
            info!("Default profile written to {path:?}");
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(profile.to_yaml()?.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Resolves the profile and loads the snapshot shared by every subcommand.
/// A source that cannot be read yields an empty dataset, not an error.
pub(crate) fn load_snapshot(args: &InputArgs) -> Result<(Profile, Dataset)> {
    let profile = Profile::load_or_default(args.profile.as_deref())?;
    let options = LoadOptions {
        delimiter: io_utils::resolve_input_delimiter(&args.input, args.delimiter),
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(options.delimiter)
    );
    let dataset = loader::load(&args.input, options);
    Ok((profile, dataset))
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}

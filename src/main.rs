use anyhow::Context;
use clap::Parser;
use electplot::{VelloBackend, pipeline, table::Summary};

mod args;

fn main() -> anyhow::Result<()> {
  let args = args::Args::parse();
  let level = if args.verbose { "debug" } else { "info" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

  let config = args.into_config()?;
  let labels = config.labels();

  let raw = pipeline::load(&config)
    .with_context(|| format!("loading {}", config.input.display()))?;
  println!("{}", Summary::of(&raw, config.head_rows)?);

  let table = pipeline::clean(&raw, &config)?;
  let analysis = pipeline::analyze(&table, &config)?;
  println!("{}", analysis.correlation.to_frame(labels)?.head(Some(config.head_rows)));

  let written = pipeline::render(&analysis, &config, &mut VelloBackend)?;
  log::info!("{} charts written to {}", written.len(), config.output_dir.display());

  Ok(())
}

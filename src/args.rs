use std::path::PathBuf;

use clap::Parser;
use electplot::{config::Config, labels::Language};

/// Counts elected mayors and councilors per party and charts how they relate.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// (file path, default `../Data Set/clean_data.csv`) The election results, one row per candidate.
  #[arg(short, long)]
  pub input: Option<PathBuf>,

  /// (directory, default `.`) Where the charts are written.
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Language of chart text, table headers, and file names.
  #[arg(short, long, value_enum, default_value_t = Language::Portuguese)]
  pub language: Language,

  /// (default `,`) Field delimiter of the input file.
  #[arg(long)]
  pub delimiter: Option<char>,

  /// Do not open the interactive 3D view.
  #[arg(long)]
  pub no_show: bool,

  /// Also write the static 3D scatter.
  #[arg(long)]
  pub save_3d: bool,

  // Other arguments
  /// If passed as an argument, will turn on verbose logging to the standard output.
  #[arg(short, long)]
  pub verbose: bool,
}

impl Args {
  pub fn into_config(self) -> anyhow::Result<Config> {
    let mut config = Config { language: self.language, ..Config::default() };
    if let Some(input) = self.input {
      config.input = input;
    }
    if let Some(output_dir) = self.output_dir {
      config.output_dir = output_dir;
    }
    if let Some(delimiter) = self.delimiter {
      anyhow::ensure!(delimiter.is_ascii(), "delimiter {delimiter:?} is not ASCII");
      config.load.delimiter = delimiter as u8;
    }
    config.show_interactive = !self.no_show;
    config.save_static_3d = self.save_3d;
    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_the_original_run() {
    let config = Args::parse_from(["electplot"]).into_config().unwrap();
    assert_eq!(config.input, PathBuf::from("../Data Set/clean_data.csv"));
    assert_eq!(config.language, Language::Portuguese);
    assert!(config.show_interactive);
    assert!(!config.save_static_3d);
  }

  #[test]
  fn flags_override_config() {
    let args = Args::parse_from([
      "electplot",
      "--input",
      "data.csv",
      "--language",
      "en",
      "--delimiter",
      ";",
      "--no-show",
      "--save-3d",
    ]);
    let config = args.into_config().unwrap();
    assert_eq!(config.input, PathBuf::from("data.csv"));
    assert_eq!(config.language, Language::English);
    assert_eq!(config.load.delimiter, b';');
    assert!(!config.show_interactive);
    assert!(config.save_static_3d);
  }

  #[test]
  fn non_ascii_delimiter_is_rejected() {
    let args = Args::parse_from(["electplot", "--delimiter", "€"]);
    assert!(args.into_config().is_err());
  }
}

//! One analysis run: load, clean, aggregate, correlate, render.

use std::path::PathBuf;

use polars::prelude::*;

use crate::{
  Backend, Result, charts,
  config::Config,
  correlation::Correlation,
  table::{
    Aggregate, aggregate::aggregate, clean::drop_index_columns, filter::filter,
    loader::load_table,
  },
};

/// Every table the charts are drawn from.
#[derive(Debug, Clone)]
pub struct Analysis {
  pub mayors:      Aggregate,
  pub councilors:  Aggregate,
  /// Rows per party over the whole dataset, elected or not.
  pub candidates:  Aggregate,
  pub correlation: Correlation,
}

pub fn load(config: &Config) -> Result<DataFrame> { load_table(&config.input, &config.load) }

/// Drops the index columns left by the export, keeping everything else.
pub fn clean(table: &DataFrame, config: &Config) -> Result<DataFrame> {
  drop_index_columns(table, &config.index_columns)
}

pub fn analyze(table: &DataFrame, config: &Config) -> Result<Analysis> {
  let party = &config.columns.party;
  let votes = &config.columns.votes;

  let mayors = aggregate(&filter(table, &config.elected_mayors())?, party, votes)?;
  log::info!("{} mayors elected across {} parties", mayors.total, mayors.len());

  let councilors = aggregate(&filter(table, &config.elected_councilors())?, party, votes)?;
  log::info!("{} councilors elected across {} parties", councilors.total, councilors.len());

  let candidates = aggregate(table, party, votes)?;

  let correlation = Correlation::between(&mayors, &councilors)?.with_candidates(&candidates)?;
  log::debug!("{} parties elected both mayors and councilors", correlation.len());

  Ok(Analysis { mayors, councilors, candidates, correlation })
}

/// Saves the charts into the output directory and returns their paths, then
/// shows the interactive view if enabled.
pub fn render(
  analysis: &Analysis,
  config: &Config,
  backend: &mut dyn Backend,
) -> Result<Vec<PathBuf>> {
  let labels = config.labels();
  let data = charts::ChartData::new(&analysis.mayors, &analysis.councilors, &analysis.correlation)?;
  let path = |name: &str| config.output_dir.join(name);

  let mut written = vec![];

  let mayors = path(labels.files.mayors);
  backend.save(&charts::mayors(&data, labels), &mayors)?;
  written.push(mayors);

  let councilors = path(labels.files.councilors);
  backend.save(&charts::councilors(&data, labels), &councilors)?;
  written.push(councilors);

  let correlation = path(labels.files.correlation);
  backend.save(&charts::correlation(&data, labels), &correlation)?;
  written.push(correlation);

  let scatter_3d = charts::scatter_3d(&data, labels);
  if config.save_static_3d {
    let target = path(labels.files.scatter_3d);
    backend.save(&scatter_3d, &target)?;
    written.push(target);
  } else {
    log::debug!("skipping {}", labels.files.scatter_3d);
  }

  if config.show_interactive {
    backend.show(&mut charts::interactive_3d(&data, labels))?;
  }

  Ok(written)
}

#[cfg(test)]
mod tests {
  use std::{io::Write, path::Path};

  use super::*;
  use crate::{Figure, RenderError, correlation::CorrelationRow, labels::Language};

  #[derive(Default)]
  struct RecordingBackend {
    saved: Vec<(PathBuf, (u32, u32))>,
    shown: Vec<String>,
  }

  impl Backend for RecordingBackend {
    fn save(&mut self, figure: &dyn Figure, path: &Path) -> std::result::Result<(), RenderError> {
      self.saved.push((path.to_path_buf(), figure.preferred_size()));
      Ok(())
    }

    fn show(&mut self, figure: &mut dyn Figure) -> std::result::Result<(), RenderError> {
      self.shown.push(figure.window_title().to_string());
      Ok(())
    }
  }

  fn elections() -> DataFrame {
    df! {
      "job" => &["prefeito", "prefeito", "prefeito", "vereador"],
      "main_party" => &["PT", "PT", "PSDB", "PT"],
      "elector_count" => &["s", "s", "s", "s"],
      "candidate_vote_count" => &[120i64, 80, 95, 12],
    }
    .unwrap()
  }

  #[test]
  fn analysis_of_small_election() {
    let analysis = analyze(&elections(), &Config::default()).unwrap();

    let rows = |agg: &Aggregate| {
      agg.rows.iter().map(|r| (r.key.clone(), r.count, r.percentage)).collect::<Vec<_>>()
    };
    assert_eq!(
      rows(&analysis.mayors),
      [("PT".to_string(), 2, 66.67), ("PSDB".to_string(), 1, 33.33)]
    );
    assert_eq!(rows(&analysis.councilors), [("PT".to_string(), 1, 100.0)]);
    assert_eq!(analysis.candidates.get("PT").map(|r| r.count), Some(3));

    assert_eq!(
      analysis.correlation.rows,
      [CorrelationRow { party: "PT".into(), mayors: 2, councilors: 1, candidates: Some(3) }]
    );
  }

  #[test]
  fn no_councilors_is_an_error() {
    let table = elections();
    let mayors_only = filter(&table, &Config::default().elected_mayors()).unwrap();
    assert!(matches!(
      analyze(&mayors_only, &Config::default()),
      Err(crate::Error::EmptyResult(_))
    ));
  }

  #[test]
  fn renders_localized_files() {
    let analysis = analyze(&elections(), &Config::default()).unwrap();

    let mut config = Config { output_dir: PathBuf::from("out"), ..Config::default() };
    let mut backend = RecordingBackend::default();
    let written = render(&analysis, &config, &mut backend).unwrap();
    assert_eq!(
      written,
      [
        Path::new("out/analise_prefeitos.png"),
        Path::new("out/analise_vereadores.png"),
        Path::new("out/analise_correlacao.png"),
      ]
    );
    assert_eq!(backend.shown.len(), 1);

    config.language = Language::English;
    config.show_interactive = false;
    config.save_static_3d = true;
    let mut backend = RecordingBackend::default();
    render(&analysis, &config, &mut backend).unwrap();
    let names = backend
      .saved
      .iter()
      .map(|(path, _)| path.file_name().unwrap().to_string_lossy().into_owned())
      .collect::<Vec<_>>();
    assert_eq!(
      names,
      [
        "mayors_analysis.png",
        "councilors_analysis.png",
        "correlation_analysis.png",
        "correlation_3d.png"
      ]
    );
    assert_eq!(backend.saved[0].1, (2000, 600));
    assert!(backend.shown.is_empty());
  }

  #[test]
  fn load_and_clean_keep_column_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Unnamed: 0,job,main_party,elector_count,candidate_vote_count").unwrap();
    writeln!(file, "0,prefeito,PT,s,120").unwrap();
    writeln!(file, "1,vereador,PSDB,n,7").unwrap();
    file.flush().unwrap();

    let config = Config { input: file.path().to_path_buf(), ..Config::default() };
    let table = clean(&load(&config).unwrap(), &config).unwrap();
    assert_eq!(
      table.get_column_names_str(),
      ["job", "main_party", "elector_count", "candidate_vote_count"]
    );
    assert_eq!(table.height(), 2);
  }
}

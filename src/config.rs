use std::path::PathBuf;

use crate::{
  labels::{Labels, Language},
  table::{LoadOptions, Predicate},
};

/// Source column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
  pub job:     String,
  pub party:   String,
  pub elected: String,
  /// Column named as the count target of every aggregation.
  pub votes:   String,
}

/// Values matched by the row filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
  pub mayor:     String,
  pub councilor: String,
  pub elected:   String,
}

/// Everything one run needs. The defaults reproduce the original analysis.
#[derive(Debug, Clone)]
pub struct Config {
  pub input:         PathBuf,
  pub output_dir:    PathBuf,
  pub language:      Language,
  pub load:          LoadOptions,
  /// Index columns dropped after loading, whichever exist.
  pub index_columns: Vec<String>,
  pub columns:       Columns,
  pub values:        Values,
  pub head_rows:     usize,

  pub show_interactive: bool,
  pub save_static_3d:   bool,
}

impl Default for Columns {
  fn default() -> Self {
    Columns {
      job:     "job".into(),
      party:   "main_party".into(),
      elected: "elector_count".into(),
      votes:   "candidate_vote_count".into(),
    }
  }
}

impl Default for Values {
  fn default() -> Self {
    Values { mayor: "prefeito".into(), councilor: "vereador".into(), elected: "s".into() }
  }
}

impl Default for Config {
  fn default() -> Self {
    Config {
      input:            PathBuf::from("../Data Set/clean_data.csv"),
      output_dir:       PathBuf::from("."),
      language:         Language::default(),
      load:             LoadOptions::default(),
      index_columns:    vec![String::new(), "Unnamed: 0".into()],
      columns:          Columns::default(),
      values:           Values::default(),
      head_rows:        5,
      show_interactive: true,
      save_static_3d:   false,
    }
  }
}

impl Config {
  pub fn labels(&self) -> &'static Labels { self.language.labels() }

  pub fn elected(&self, job: &str) -> Vec<Predicate> {
    vec![
      Predicate::eq(&self.columns.job, job),
      Predicate::eq(&self.columns.elected, &self.values.elected),
    ]
  }

  pub fn elected_mayors(&self) -> Vec<Predicate> { self.elected(&self.values.mayor) }
  pub fn elected_councilors(&self) -> Vec<Predicate> { self.elected(&self.values.councilor) }
}

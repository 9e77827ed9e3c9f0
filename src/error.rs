use std::path::PathBuf;

use polars::error::PolarsError;

use crate::render::RenderError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("cannot read {}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed table in {}", path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: PolarsError,
  },

  #[error("column `{0}` not found")]
  ColumnNotFound(String),

  /// An aggregation or join produced no rows, so there is nothing to divide by or plot.
  #[error("{0} produced no rows")]
  EmptyResult(String),

  #[error(transparent)]
  Polars(#[from] PolarsError),

  #[error(transparent)]
  Render(#[from] RenderError),
}

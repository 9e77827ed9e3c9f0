use std::{
  fs::File,
  io::{self, ErrorKind},
  path::Path,
};

use polars::prelude::*;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct LoadOptions {
  pub delimiter:           u8,
  pub has_header:          bool,
  /// Rows scanned to infer column types. `None` scans the whole file.
  pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
  fn default() -> Self {
    LoadOptions { delimiter: b',', has_header: true, infer_schema_length: Some(100) }
  }
}

/// Reads a delimited file into memory.
///
/// Opening the file and parsing it are kept apart so a missing file or a
/// directory reports [`Error::Io`] and a malformed one reports [`Error::Parse`].
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DataFrame> {
  let path = path.as_ref();
  let io_error = |source| Error::Io { path: path.to_path_buf(), source };
  let file = File::open(path).map_err(io_error)?;
  if !file.metadata().map_err(io_error)?.is_file() {
    return Err(io_error(io::Error::new(ErrorKind::InvalidInput, "not a regular file")));
  }

  let delimiter = options.delimiter;
  let table = CsvReadOptions::default()
    .with_has_header(options.has_header)
    .with_infer_schema_length(options.infer_schema_length)
    .map_parse_options(|parse| parse.with_separator(delimiter))
    .into_reader_with_file_handle(file)
    .finish()
    .map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;

  log::debug!("loaded {} with shape {:?}", path.display(), table.shape());
  Ok(table)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  #[test]
  fn loads_header_and_rows() {
    let file = write_csv(
      "idx,job,main_party,elector_count,candidate_vote_count\n\
       0,prefeito,PT,s,120\n\
       1,vereador,PSDB,n,30\n",
    );

    let table = load_table(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(table.shape(), (2, 5));
    assert_eq!(
      table.get_column_names_str(),
      ["idx", "job", "main_party", "elector_count", "candidate_vote_count"]
    );
  }

  #[test]
  fn custom_delimiter() {
    let file = write_csv("job;main_party\nprefeito;PT\n");
    let options = LoadOptions { delimiter: b';', ..Default::default() };

    let table = load_table(file.path(), &options).unwrap();
    assert_eq!(table.shape(), (1, 2));
  }

  #[test]
  fn missing_file_is_io_error() {
    let err = load_table("does/not/exist.csv", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "{err:?}");
  }

  #[test]
  fn directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_table(dir.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "{err:?}");
  }

  #[test]
  fn empty_file_is_parse_error() {
    let file = write_csv("");
    let err = load_table(file.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "{err:?}");
  }
}

use polars::prelude::*;

use crate::{Error, Result};

/// What to do when the column to drop is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
  Ignore,
  Error,
}

/// Removes `name` from the table, keeping the remaining columns in order.
pub fn drop_column(table: &DataFrame, name: &str, missing: Missing) -> Result<DataFrame> {
  if table.column(name).is_err() {
    return match missing {
      Missing::Ignore => {
        log::debug!("column `{name}` not present, nothing to drop");
        Ok(table.clone())
      }
      Missing::Error => Err(Error::ColumnNotFound(name.to_string())),
    };
  }

  Ok(table.drop(name)?)
}

/// Drops whichever of the candidate index columns exist.
pub fn drop_index_columns<S: AsRef<str>>(table: &DataFrame, candidates: &[S]) -> Result<DataFrame> {
  candidates
    .iter()
    .try_fold(table.clone(), |table, name| drop_column(&table, name.as_ref(), Missing::Ignore))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> DataFrame {
    df! {
      "Unnamed: 0" => &[0, 1],
      "job" => &["prefeito", "vereador"],
      "main_party" => &["PT", "PSDB"],
      "elector_count" => &["s", "s"],
    }
    .unwrap()
  }

  #[test]
  fn keeps_relative_order() {
    let cleaned = drop_column(&table(), "Unnamed: 0", Missing::Error).unwrap();
    assert_eq!(cleaned.get_column_names_str(), ["job", "main_party", "elector_count"]);

    let cleaned = drop_column(&table(), "main_party", Missing::Error).unwrap();
    assert_eq!(cleaned.get_column_names_str(), ["Unnamed: 0", "job", "elector_count"]);
  }

  #[test]
  fn missing_column() {
    let err = drop_column(&table(), "nope", Missing::Error).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(ref c) if c == "nope"));

    let same = drop_column(&table(), "nope", Missing::Ignore).unwrap();
    assert_eq!(same.shape(), table().shape());
  }

  #[test]
  fn index_candidates() {
    let cleaned = drop_index_columns(&table(), &["", "Unnamed: 0"]).unwrap();
    assert_eq!(cleaned.width(), 3);
    assert_eq!(cleaned.height(), 2);
  }
}

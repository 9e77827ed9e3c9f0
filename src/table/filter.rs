use polars::prelude::*;

use crate::{Result, table::require};

/// Equality test against one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
  pub column: String,
  pub value:  String,
}

impl Predicate {
  pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
    Predicate { column: column.into(), value: value.into() }
  }

  fn expr(&self) -> Expr {
    col(self.column.as_str()).cast(DataType::String).eq(lit(self.value.as_str()))
  }
}

/// Keeps the rows for which every predicate holds.
///
/// An empty predicate set keeps everything. No matching rows is not an error.
pub fn filter(table: &DataFrame, predicates: &[Predicate]) -> Result<DataFrame> {
  for predicate in predicates {
    require(table, &predicate.column)?;
  }

  let Some(condition) = predicates.iter().map(Predicate::expr).reduce(|a, b| a.and(b)) else {
    return Ok(table.clone());
  };

  let filtered = table.clone().lazy().filter(condition).collect()?;
  log::debug!("filter {predicates:?} kept {} of {} rows", filtered.height(), table.height());
  Ok(filtered)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn table() -> DataFrame {
    df! {
      "job" => &["prefeito", "prefeito", "vereador", "prefeito"],
      "main_party" => &["PT", "PSDB", "PT", "PL"],
      "elector_count" => &["s", "s", "s", "n"],
    }
    .unwrap()
  }

  #[test]
  fn all_predicates_must_hold() {
    let elected_mayors = filter(
      &table(),
      &[Predicate::eq("job", "prefeito"), Predicate::eq("elector_count", "s")],
    )
    .unwrap();

    assert_eq!(elected_mayors.height(), 2);
    let parties = elected_mayors.column("main_party").unwrap().as_materialized_series();
    let parties = parties.str().unwrap().into_no_null_iter().collect::<Vec<_>>();
    assert_eq!(parties, ["PT", "PSDB"]);
  }

  #[test]
  fn no_match_is_empty() {
    let none = filter(&table(), &[Predicate::eq("job", "governador")]).unwrap();
    assert_eq!(none.height(), 0);
    assert_eq!(none.width(), 3);
  }

  #[test]
  fn no_predicates_keeps_everything() {
    assert_eq!(filter(&table(), &[]).unwrap().height(), 4);
  }

  #[test]
  fn unknown_column() {
    let err = filter(&table(), &[Predicate::eq("office", "prefeito")]).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(ref c) if c == "office"));
  }
}

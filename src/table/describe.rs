use std::fmt;

use polars::prelude::*;

use crate::Result;

/// Dataset overview printed before the analysis runs.
pub struct Summary {
  pub shape:   (usize, usize),
  pub head:    DataFrame,
  /// `(name, dtype)` per column, in table order.
  pub schema:  Vec<(String, DataType)>,
  pub nulls:   Vec<(String, usize)>,
  /// Distinct non-null values per column.
  pub uniques: Vec<(String, usize)>,
  head_rows:   usize,
}

impl Summary {
  pub fn of(table: &DataFrame, head_rows: usize) -> Result<Self> {
    let mut schema = vec![];
    let mut nulls = vec![];
    let mut uniques = vec![];

    for column in table.get_columns() {
      let name = column.name().to_string();
      schema.push((name.clone(), column.dtype().clone()));
      let null_count = column.null_count();
      let distinct = column.as_materialized_series().n_unique()?;
      nulls.push((name.clone(), null_count));
      uniques.push((name, distinct - usize::from(null_count > 0)));
    }

    Ok(Summary {
      shape: table.shape(),
      head: table.head(Some(head_rows)),
      schema,
      nulls,
      uniques,
      head_rows,
    })
  }
}

fn write_pairs<T: fmt::Display>(f: &mut fmt::Formatter<'_>, pairs: &[(String, T)]) -> fmt::Result {
  let width = pairs.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
  for (name, value) in pairs {
    writeln!(f, "{name:<width$}  {value}")?;
  }
  Ok(())
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Dimensions of imported dataset: {:?}\n", self.shape)?;
    writeln!(f, "First {} lines of the dataset\n{}\n", self.head_rows, self.head)?;
    writeln!(f, "Dataset summary")?;
    write_pairs(f, &self.schema)?;
    writeln!(f, "\nNumber of null values per column")?;
    write_pairs(f, &self.nulls)?;
    writeln!(f, "\nNumber of unique values per column")?;
    write_pairs(f, &self.uniques)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts_nulls_and_uniques() {
    let table = df! {
      "job" => &[Some("prefeito"), Some("vereador"), Some("prefeito"), None],
      "main_party" => &["PT", "PT", "PSDB", "PL"],
    }
    .unwrap();

    let summary = Summary::of(&table, 2).unwrap();

    assert_eq!(summary.shape, (4, 2));
    assert_eq!(summary.head.height(), 2);
    assert_eq!(summary.nulls, vec![("job".to_string(), 1), ("main_party".to_string(), 0)]);
    assert_eq!(summary.uniques, vec![("job".to_string(), 2), ("main_party".to_string(), 3)]);
    assert_eq!(summary.schema[1], ("main_party".to_string(), DataType::String));

    let text = summary.to_string();
    assert!(text.contains("Dimensions of imported dataset: (4, 2)"));
    assert!(text.contains("Number of unique values per column"));
  }
}

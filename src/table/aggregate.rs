use std::cmp::Ordering;

use polars::prelude::*;

use crate::{
  Error, Result,
  table::{counts, require, strings},
};

const COUNT: &str = "__count";

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
  pub key:        String,
  pub count:      u64,
  /// Share of the aggregate total, rounded to two decimals.
  pub percentage: f64,
}

/// Per-key row counts, ordered by count descending and then by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
  pub key_column: String,
  pub rows:       Vec<AggregateRow>,
  pub total:      u64,
}

/// Counts the rows of each distinct `by` value.
///
/// `target` names the counted column the way the source analysis does, but
/// only its presence is checked: every row of a group counts. Rows with a null
/// key belong to no group. An input with no groups is [`Error::EmptyResult`].
pub fn aggregate(table: &DataFrame, by: &str, target: &str) -> Result<Aggregate> {
  require(table, by)?;
  require(table, target)?;

  let grouped = table
    .clone()
    .lazy()
    .filter(col(by).is_not_null())
    .group_by([col(by)])
    .agg([len().alias(COUNT)])
    .collect()?;

  let keys = strings(&grouped, by)?;
  let group_counts = counts(&grouped, COUNT)?;

  let groups = keys
    .into_iter()
    .zip(group_counts)
    .filter_map(|(key, count)| Some((key?, count.unwrap_or(0))))
    .collect::<Vec<_>>();

  if groups.is_empty() {
    return Err(Error::EmptyResult(format!("grouping by `{by}`")));
  }

  let total = groups.iter().map(|(_, count)| count).sum::<u64>();
  let rows = groups
    .into_iter()
    .map(|(key, count)| AggregateRow { key, count, percentage: percentage(count, total) })
    .collect();

  let mut aggregate = Aggregate { key_column: by.to_string(), rows, total };
  aggregate.sort_descending();

  log::debug!("`{by}`: {} groups over {} rows", aggregate.len(), aggregate.total);
  Ok(aggregate)
}

/// `count / total * 100`, rounded half-to-even at two decimals.
pub fn percentage(count: u64, total: u64) -> f64 {
  if total == 0 {
    return 0.0;
  }
  let raw = count as f64 / total as f64 * 100.0;
  (raw * 100.0).round_ties_even() / 100.0
}

fn descending(a: &AggregateRow, b: &AggregateRow) -> Ordering {
  b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key))
}

impl Aggregate {
  pub fn len(&self) -> usize { self.rows.len() }
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn get(&self, key: &str) -> Option<&AggregateRow> { self.rows.iter().find(|r| r.key == key) }

  /// Count-descending, ties by ascending key. Idempotent.
  pub fn sort_descending(&mut self) { self.rows.sort_by(descending); }

  pub fn max_count(&self) -> u64 { self.rows.iter().map(|r| r.count).max().unwrap_or(0) }

  /// Key and count only, under the given names.
  pub fn count_frame(&self, key: &str, count: &str) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
      Column::new(key.into(), self.rows.iter().map(|r| r.key.as_str()).collect::<Vec<_>>()),
      Column::new(count.into(), self.rows.iter().map(|r| r.count).collect::<Vec<_>>()),
    ])
  }

  /// Key, count, and percentage, in row order.
  pub fn to_frame(&self, key: &str, count: &str, percentage: &str) -> PolarsResult<DataFrame> {
    let mut frame = self.count_frame(key, count)?;
    frame.with_column(Column::new(
      percentage.into(),
      self.rows.iter().map(|r| r.percentage).collect::<Vec<_>>(),
    ))?;
    Ok(frame)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::table::filter::{Predicate, filter};

  fn table() -> DataFrame {
    df! {
      "job" => &["prefeito", "prefeito", "prefeito", "vereador", "prefeito", "prefeito"],
      "main_party" => &["PT", "PT", "PSDB", "PT", "MDB", "PL"],
      "elector_count" => &["s", "s", "s", "s", "s", "n"],
      "candidate_vote_count" => &[Some(10), Some(20), None, Some(5), Some(7), Some(1)],
    }
    .unwrap()
  }

  fn elected_mayors() -> DataFrame {
    filter(&table(), &[Predicate::eq("job", "prefeito"), Predicate::eq("elector_count", "s")])
      .unwrap()
  }

  #[test]
  fn counts_and_shares() {
    let agg = aggregate(&elected_mayors(), "main_party", "candidate_vote_count").unwrap();

    assert_eq!(agg.total, 4);
    assert_eq!(
      agg.rows,
      vec![
        AggregateRow { key: "PT".into(), count: 2, percentage: 50.0 },
        AggregateRow { key: "MDB".into(), count: 1, percentage: 25.0 },
        AggregateRow { key: "PSDB".into(), count: 1, percentage: 25.0 },
      ]
    );
  }

  #[test]
  fn total_matches_filtered_rows() {
    let filtered = elected_mayors();
    let agg = aggregate(&filtered, "main_party", "candidate_vote_count").unwrap();

    assert_eq!(agg.rows.iter().map(|r| r.count).sum::<u64>(), filtered.height() as u64);
    let pct = agg.rows.iter().map(|r| r.percentage).sum::<f64>();
    assert!((pct - 100.0).abs() <= 0.01 * agg.len() as f64, "{pct}");
  }

  #[test]
  fn thirds_round_to_two_decimals() {
    let table = df! {
      "main_party" => &["PT", "PT", "PSDB"],
      "candidate_vote_count" => &[1, 1, 1],
    }
    .unwrap();
    let agg = aggregate(&table, "main_party", "candidate_vote_count").unwrap();

    assert_eq!(agg.rows[0].key, "PT");
    assert_eq!(agg.rows[0].percentage, 66.67);
    assert_eq!(agg.rows[1].percentage, 33.33);
  }

  #[test]
  fn rounding_is_half_to_even() {
    // 1/8 = 12.5% exactly, 1/16 = 6.25% exactly, 1/32 = 3.125%.
    assert_eq!(percentage(1, 8), 12.5);
    assert_eq!(percentage(1, 32), 3.12);
    assert_eq!(percentage(3, 32), 9.38);
    assert_eq!(percentage(0, 0), 0.0);
  }

  #[test]
  fn sorting_is_idempotent() {
    let mut agg = aggregate(&elected_mayors(), "main_party", "candidate_vote_count").unwrap();
    let once = agg.clone();
    agg.sort_descending();
    assert_eq!(agg, once);
  }

  #[test]
  fn empty_input_is_an_error() {
    let none = filter(&table(), &[Predicate::eq("job", "governador")]).unwrap();
    let err = aggregate(&none, "main_party", "candidate_vote_count").unwrap_err();
    assert!(matches!(err, Error::EmptyResult(_)), "{err:?}");
  }

  #[test]
  fn null_keys_are_skipped() {
    let table = df! {
      "main_party" => &[Some("PT"), None, Some("PT")],
      "candidate_vote_count" => &[1, 2, 3],
    }
    .unwrap();
    let agg = aggregate(&table, "main_party", "candidate_vote_count").unwrap();
    assert_eq!(agg.total, 2);
    assert_eq!(agg.rows[0].percentage, 100.0);
  }

  #[test]
  fn missing_columns() {
    let err = aggregate(&table(), "party", "candidate_vote_count").unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(ref c) if c == "party"));
    let err = aggregate(&table(), "main_party", "votes").unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(ref c) if c == "votes"));
  }

  #[test]
  fn frames_follow_row_order() {
    let agg = aggregate(&elected_mayors(), "main_party", "candidate_vote_count").unwrap();
    let frame = agg.to_frame("party", "mayors", "pct").unwrap();

    assert_eq!(frame.get_column_names_str(), ["party", "mayors", "pct"]);
    let parties = frame.column("party").unwrap().as_materialized_series();
    let parties = parties.str().unwrap().into_no_null_iter().collect::<Vec<_>>();
    assert_eq!(parties, ["PT", "MDB", "PSDB"]);
  }
}

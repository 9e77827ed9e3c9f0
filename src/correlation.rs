use polars::prelude::*;

use crate::{
  Result,
  labels::Labels,
  table::{Aggregate, counts, join::inner_join, strings},
};

const KEY: &str = "party";
const MAYORS: &str = "mayors";
const COUNCILORS: &str = "councilors";
const COUNCILORS_PCT: &str = "councilors_pct";
const CANDIDATES: &str = "candidates";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationRow {
  pub party:      String,
  pub mayors:     u64,
  pub councilors: u64,
  /// Set once [`Correlation::with_candidates`] has joined the candidate counts.
  pub candidates: Option<u64>,
}

/// Parties present in every joined aggregate, ordered like the mayors
/// aggregate (count descending, then party).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
  pub rows: Vec<CorrelationRow>,
}

impl Correlation {
  /// Inner join of the two aggregates. Parties missing from either side are dropped.
  pub fn between(mayors: &Aggregate, councilors: &Aggregate) -> Result<Self> {
    let joined = inner_join(
      KEY,
      vec![
        mayors.count_frame(KEY, MAYORS)?,
        councilors.to_frame(KEY, COUNCILORS, COUNCILORS_PCT)?,
      ],
    )?;
    // The councilors share means nothing once the rows are restricted to shared parties.
    let joined = joined.drop(COUNCILORS_PCT)?;

    let parties = strings(&joined, KEY)?;
    let mayors = counts(&joined, MAYORS)?;
    let councilors = counts(&joined, COUNCILORS)?;

    let rows = parties
      .into_iter()
      .zip(mayors)
      .zip(councilors)
      .filter_map(|((party, mayors), councilors)| {
        Some(CorrelationRow {
          party:      party?,
          mayors:     mayors?,
          councilors: councilors?,
          candidates: None,
        })
      })
      .collect();

    Ok(Correlation::sorted(rows))
  }

  /// Joins a third per-party count, dropping parties it does not cover.
  pub fn with_candidates(self, candidates: &Aggregate) -> Result<Self> {
    let joined =
      inner_join(KEY, vec![self.pairs_frame()?, candidates.count_frame(KEY, CANDIDATES)?])?;

    let parties = strings(&joined, KEY)?;
    let totals = counts(&joined, CANDIDATES)?;

    let rows = parties
      .into_iter()
      .zip(totals)
      .filter_map(|(party, total)| {
        let party = party?;
        let row = self.rows.iter().find(|r| r.party == party)?;
        Some(CorrelationRow { candidates: total, ..row.clone() })
      })
      .collect();

    Ok(Correlation::sorted(rows))
  }

  fn sorted(mut rows: Vec<CorrelationRow>) -> Self {
    rows.sort_by(|a, b| b.mayors.cmp(&a.mayors).then_with(|| a.party.cmp(&b.party)));
    Correlation { rows }
  }

  pub fn len(&self) -> usize { self.rows.len() }
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  fn pairs_frame(&self) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
      Column::new(KEY.into(), self.rows.iter().map(|r| r.party.as_str()).collect::<Vec<_>>()),
      Column::new(MAYORS.into(), self.rows.iter().map(|r| r.mayors).collect::<Vec<_>>()),
      Column::new(COUNCILORS.into(), self.rows.iter().map(|r| r.councilors).collect::<Vec<_>>()),
    ])
  }

  /// Table with localized headers; the candidates column is present once joined.
  pub fn to_frame(&self, labels: &Labels) -> PolarsResult<DataFrame> {
    let mut frame = self.pairs_frame()?;
    frame.set_column_names([labels.party, labels.mayors, labels.councilors])?;

    if self.rows.iter().all(|r| r.candidates.is_some()) && !self.rows.is_empty() {
      frame.with_column(Column::new(
        labels.candidates.into(),
        self.rows.iter().map(|r| r.candidates.unwrap_or(0)).collect::<Vec<_>>(),
      ))?;
    }
    Ok(frame)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    Error,
    labels::ENGLISH,
    table::{AggregateRow, aggregate::percentage},
  };

  fn agg(rows: &[(&str, u64)]) -> Aggregate {
    let total = rows.iter().map(|(_, c)| c).sum();
    let mut agg = Aggregate {
      key_column: "main_party".into(),
      rows: rows
        .iter()
        .map(|&(key, count)| AggregateRow {
          key: key.into(),
          count,
          percentage: percentage(count, total),
        })
        .collect(),
      total,
    };
    agg.sort_descending();
    agg
  }

  #[test]
  fn keeps_parties_on_both_sides() {
    let mayors = agg(&[("PT", 2), ("PSDB", 1)]);
    let councilors = agg(&[("PT", 1)]);

    let correlation = Correlation::between(&mayors, &councilors).unwrap();
    assert_eq!(
      correlation.rows,
      vec![CorrelationRow { party: "PT".into(), mayors: 2, councilors: 1, candidates: None }]
    );
  }

  #[test]
  fn ordered_like_mayors() {
    let mayors = agg(&[("PT", 5), ("MDB", 5), ("PL", 9), ("NOVO", 1)]);
    let councilors = agg(&[("NOVO", 30), ("PT", 10), ("MDB", 20), ("PL", 1)]);

    let correlation = Correlation::between(&mayors, &councilors).unwrap();
    let parties = correlation.rows.iter().map(|r| r.party.as_str()).collect::<Vec<_>>();
    assert_eq!(parties, ["PL", "MDB", "PT", "NOVO"]);
    assert!(correlation.len() <= mayors.len().min(councilors.len()));
  }

  #[test]
  fn candidates_join() {
    let mayors = agg(&[("PT", 2), ("PSDB", 1), ("MDB", 3)]);
    let councilors = agg(&[("PT", 4), ("PSDB", 2), ("MDB", 1)]);
    let candidates = agg(&[("PT", 40), ("MDB", 25), ("PL", 12)]);

    let correlation =
      Correlation::between(&mayors, &councilors).unwrap().with_candidates(&candidates).unwrap();

    assert_eq!(
      correlation.rows,
      vec![
        CorrelationRow { party: "MDB".into(), mayors: 3, councilors: 1, candidates: Some(25) },
        CorrelationRow { party: "PT".into(), mayors: 2, councilors: 4, candidates: Some(40) },
      ]
    );

    let frame = correlation.to_frame(&ENGLISH).unwrap();
    assert_eq!(frame.get_column_names_str(), ["Party", "Mayors", "Councilors", "Candidates"]);
  }

  #[test]
  fn nothing_shared() {
    let err = Correlation::between(&agg(&[("PT", 1)]), &agg(&[("PL", 1)])).unwrap_err();
    assert!(matches!(err, Error::EmptyResult(_)), "{err:?}");
  }
}

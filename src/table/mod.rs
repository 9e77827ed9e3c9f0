//! Tabular stages of the pipeline.
//!
//! ```text
//!  clean_data.csv
//!        │
//!        ▼
//!   loader ──► clean ──► filter ──► aggregate ──► join
//! ```
//!
//! Every stage takes a materialized `DataFrame` and returns a new one (or an
//! [`Aggregate`]); nothing is streamed or mutated in place.

pub mod aggregate;
pub mod clean;
pub mod describe;
pub mod filter;
pub mod join;
pub mod loader;

pub use aggregate::{Aggregate, AggregateRow};
pub use describe::Summary;
pub use filter::Predicate;
pub use loader::LoadOptions;

use polars::prelude::*;

use crate::{Error, Result};

/// Looks up a column, mapping absence to [`Error::ColumnNotFound`].
pub(crate) fn require<'a>(table: &'a DataFrame, name: &str) -> Result<&'a Column> {
  table.column(name).map_err(|_| Error::ColumnNotFound(name.to_string()))
}

pub(crate) fn strings(table: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
  let column = require(table, name)?.cast(&DataType::String)?;
  let values = column.as_materialized_series().str()?.into_iter().map(|v| v.map(str::to_string));
  Ok(values.collect())
}

pub(crate) fn counts(table: &DataFrame, name: &str) -> Result<Vec<Option<u64>>> {
  let column = require(table, name)?.cast(&DataType::UInt64)?;
  Ok(column.as_materialized_series().u64()?.into_iter().collect())
}

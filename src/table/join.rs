use polars::prelude::*;

use crate::{Error, Result, table::require};

/// Inner-joins every frame on `key`, left to right.
///
/// A non-key column whose name is already taken gets a `_<position>` suffix,
/// `position` being the index of the frame it came from. Row order of the
/// result is unspecified; callers sort what they extract.
pub fn inner_join(key: &str, frames: Vec<DataFrame>) -> Result<DataFrame> {
  let mut frames = frames.into_iter();
  let Some(first) = frames.next() else {
    return Err(Error::EmptyResult(format!("joining on `{key}` with no inputs")));
  };
  require(&first, key)?;

  let mut joined = first.lazy();
  for (position, frame) in frames.enumerate() {
    require(&frame, key)?;
    let args =
      JoinArgs::new(JoinType::Inner).with_suffix(Some(format!("_{}", position + 1).into()));
    joined = joined.join(frame.lazy(), [col(key)], [col(key)], args);
  }

  let joined = joined.collect()?;
  if joined.height() == 0 {
    return Err(Error::EmptyResult(format!("inner join on `{key}`")));
  }
  Ok(joined)
}

use kurbo::Affine;
use polars::prelude::Column;

use crate::{Axis, categories};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

#[derive(Clone, Copy)]
pub(crate) struct DataBounds<'a> {
  pub x: DataRange<'a>,
  pub y: DataRange<'a>,
}

#[derive(Clone, Copy)]
pub(crate) enum DataRange<'a> {
  Continuous { range: Range, margin_min: bool, margin_max: bool },
  Categorical(&'a Column),
}

/// A resolved axis: either a numeric span or an ordered set of categories
/// placed at `0, 1, 2, ...`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Scale {
  Continuous(Range),
  Categorical(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

/// Fraction of the data span added on a side that asks for a margin.
const MARGIN: f64 = 0.1;

impl From<Range> for DataRange<'_> {
  fn from(range: Range) -> Self { DataRange::continuous(range, true, true) }
}

impl Bounds {
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl Default for Range {
  fn default() -> Self { Range::empty() }
}

impl Range {
  pub const fn empty() -> Self { Range { min: 0.0, max: 0.0 } }
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }

  /// Smallest range covering the finite values, if there are any.
  pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Range> {
    values.into_iter().filter(|v| v.is_finite()).fold(None, |range, v| match range {
      None => Some(Range::new(v, v)),
      Some(r) => Some(Range::new(r.min.min(v), r.max.max(v))),
    })
  }

  /// Moves the ends inwards, `start` at `min` and `end` at `max`, following
  /// the range's direction.
  pub const fn inset(self, start: f64, end: f64) -> Self {
    let sign = self.size().signum();
    Range { min: self.min + start * sign, max: self.max - end * sign }
  }

  pub fn lerp(&self, t: f64) -> f64 { self.min + self.size() * t }

  /// Position of `value` in the range, `0.0` at `min` and `1.0` at `max`.
  pub fn normalize(&self, value: f64) -> f64 {
    if self.size() == 0.0 { 0.5 } else { (value - self.min) / self.size() }
  }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  /// Widens a zero-sized range so it can be mapped onto a viewport.
  pub fn non_degenerate(self) -> Range {
    if self.size() == 0.0 { Range::new(self.min - 0.5, self.max + 0.5) } else { self }
  }

  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    let step = (self.max - self.min) / f64::from(count);
    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (self.min / step).floor() * step;
    let hi = (self.max / step).ceil() * step;

    let precision = (-k as i32 + 4).max(0) as usize;
    NiceTicksIter::new(lo, hi, step, precision)
  }
}

impl<'a> DataRange<'a> {
  pub(crate) fn continuous(range: Range, margin_min: bool, margin_max: bool) -> Self {
    DataRange::Continuous { range, margin_min, margin_max }
  }
}

impl Scale {
  /// Merges the ranges every axes reports for one direction. The first
  /// categorical range wins; continuous ranges are unioned, padded, then
  /// clamped by the user's axis limits.
  pub(crate) fn resolve<'a>(ranges: impl IntoIterator<Item = DataRange<'a>>, axis: &Axis) -> Scale {
    let mut continuous: Option<(Range, bool, bool)> = None;

    for range in ranges {
      match range {
        DataRange::Categorical(column) => return Scale::Categorical(categories(column)),
        DataRange::Continuous { range, margin_min, margin_max } => {
          continuous = Some(match continuous {
            None => (range, margin_min, margin_max),
            Some((r, lo, hi)) => {
              let merged = Range::new(r.min.min(range.min), r.max.max(range.max));
              (merged, lo || margin_min, hi || margin_max)
            }
          });
        }
      }
    }

    let (range, margin_min, margin_max) =
      continuous.unwrap_or((Range::new(0.0, 1.0), false, false));
    let pad = range.size() * MARGIN;
    let mut range = Range::new(
      if margin_min { range.min - pad } else { range.min },
      if margin_max { range.max + pad } else { range.max },
    );
    if let Some(min) = axis.min {
      range.min = min;
    }
    if let Some(max) = axis.max {
      range.max = max;
    }
    Scale::Continuous(range.non_degenerate())
  }

  pub(crate) fn range(&self) -> Range {
    match self {
      Scale::Continuous(range) => *range,
      Scale::Categorical(labels) => Range::new(-0.5, labels.len().max(1) as f64 - 0.5),
    }
  }
}

pub struct NiceTicksIter {
  current:   f64,
  step:      f64,
  hi:        f64,
  precision: usize,
}

impl NiceTicksIter {
  fn new(lo: f64, hi: f64, step: f64, precision: usize) -> Self {
    NiceTicksIter { current: lo, step, hi, precision }
  }

  /// Decimal places needed to tell the ticks apart.
  pub fn decimals(&self) -> usize { self.precision.saturating_sub(4) }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.precision as i32);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ticks_cover_the_range() {
    let ticks = Range::new(0.0, 730.0).nice_ticks(10);
    assert_eq!(ticks.decimals(), 0);
    let ticks = ticks.collect::<Vec<_>>();
    assert_eq!(ticks.first(), Some(&0.0));
    assert_eq!(ticks.last(), Some(&800.0));
    assert!(ticks.windows(2).all(|w| (w[1] - w[0] - 100.0).abs() < 1e-9));

    assert_eq!(Range::new(0.0, 2.0).nice_ticks(10).decimals(), 1);
  }

  #[test]
  fn inset_follows_direction() {
    // Screen y grows downwards, so the bottom is `min`.
    let y = Range::new(600.0, 0.0).inset(80.0, 40.0);
    assert_eq!(y, Range::new(520.0, 40.0));
    let x = Range::new(0.0, 1000.0).inset(100.0, 20.0);
    assert_eq!(x, Range::new(100.0, 980.0));
  }

  #[test]
  fn range_of_values() {
    assert_eq!(Range::of([3.0, f64::NAN, -1.0, 2.0]), Some(Range::new(-1.0, 3.0)));
    assert_eq!(Range::of([f64::NAN]), None);
    assert_eq!(Range::new(2.0, 2.0).non_degenerate(), Range::new(1.5, 2.5));
  }

  #[test]
  fn resolve_pads_and_clamps() {
    let bars = DataRange::continuous(Range::new(0.0, 200.0), false, true);
    let Scale::Continuous(range) = Scale::resolve([bars], &Axis::default()) else { panic!() };
    assert!((range.max - 220.0).abs() < 1e-9 && range.min == 0.0);

    let mut axis = Axis::default();
    axis.min(-5.0);
    let Scale::Continuous(range) = Scale::resolve([Range::new(0.0, 10.0).into()], &axis) else {
      panic!()
    };
    assert_eq!(range.min, -5.0);
    assert!((range.max - 11.0).abs() < 1e-9);
  }
}

use kurbo::{Affine, Cap, Circle, Line, Point, Stroke};
use polars::prelude::*;

use crate::{
  MAGMA, Palette, Range,
  bounds::{DataBounds, DataRange},
  render::Render,
  values,
};

pub struct LollipopAxes<'a> {
  labels:  &'a Column,
  values:  &'a Column,
  options: LollipopOptions,
}

pub struct LollipopOptions {
  pub palette:    &'static Palette,
  pub stem_width: f64,
  pub stem_alpha: f32,
  pub dot_radius: f64,
  pub dot_alpha:  f32,
}

impl Default for LollipopOptions {
  fn default() -> Self {
    LollipopOptions {
      palette:    &MAGMA,
      stem_width: 5.0,
      stem_alpha: 0.5,
      dot_radius: 6.0,
      dot_alpha:  0.8,
    }
  }
}

impl<'a> LollipopAxes<'a> {
  pub(crate) fn new(labels: &'a Column, values: &'a Column) -> Self {
    LollipopAxes { labels, values, options: LollipopOptions::default() }
  }

  pub fn dot_radius(&mut self, radius: f64) -> &mut Self {
    self.options.dot_radius = radius;
    self
  }

  pub(crate) fn data_bounds(&self) -> DataBounds<'_> {
    let max = Range::of(values(self.values)).map_or(1.0, |r| r.max.max(0.0));
    DataBounds {
      x: DataRange::continuous(Range::new(0.0, max), false, true),
      y: DataRange::Categorical(self.labels),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let values = values(self.values);
    let colors = self.options.palette.colors(values.len());
    let stroke = Stroke::new(self.options.stem_width).with_caps(Cap::Butt);

    for (i, (&value, &color)) in values.iter().zip(&colors).enumerate() {
      if !value.is_finite() {
        continue;
      }
      let y = i as f64;
      let start = transform * Point::new(0.0, y);
      let end = transform * Point::new(value, y);

      render.stroke(
        &Line::new(start, end),
        Affine::IDENTITY,
        color.with_alpha(self.options.stem_alpha),
        &stroke,
      );
      render.fill(
        &Circle::new(end, self.options.dot_radius),
        Affine::IDENTITY,
        color.with_alpha(self.options.dot_alpha),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bounds::Scale;

  #[test]
  fn stems_start_at_zero() {
    let labels = Column::new("party".into(), ["PT", "PSDB"]);
    let values = Column::new("count".into(), [2u64, 1]);
    let lollipop = LollipopAxes::new(&labels, &values);
    let bounds = lollipop.data_bounds();

    let Scale::Continuous(x) = Scale::resolve([bounds.x], &Default::default()) else { panic!() };
    assert_eq!(x.min, 0.0);
    assert!((x.max - 2.2).abs() < 1e-9);

    let y = Scale::resolve([bounds.y], &Default::default());
    assert_eq!(y, Scale::Categorical(vec!["PT".into(), "PSDB".into()]));
  }
}

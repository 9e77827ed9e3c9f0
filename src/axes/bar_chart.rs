use kurbo::{Affine, Point, Rect, Vec2};
use parley::FontWeight;
use peniko::Brush;
use polars::prelude::*;

use crate::{
  MAGMA, Palette, Range,
  bounds::{DataBounds, DataRange},
  format_value,
  render::{Align, DrawText, Render},
  values,
};

pub struct BarChartAxes<'a> {
  labels:  &'a Column,
  values:  &'a Column,
  options: BarChartOptions,
}

pub struct BarChartOptions {
  /// Bar width in category units.
  pub width:        f64,
  pub palette:      &'static Palette,
  pub value_labels: bool,
}

impl Default for BarChartOptions {
  fn default() -> Self { BarChartOptions { width: 0.9, palette: &MAGMA, value_labels: true } }
}

impl<'a> BarChartAxes<'a> {
  pub(crate) fn new(labels: &'a Column, values: &'a Column) -> Self {
    BarChartAxes { labels, values, options: BarChartOptions::default() }
  }

  pub(crate) fn data_bounds(&self) -> DataBounds<'_> {
    let max = Range::of(values(self.values)).map_or(1.0, |r| r.max.max(0.0));
    DataBounds {
      x: DataRange::Categorical(self.labels),
      y: DataRange::continuous(Range::new(0.0, max), false, true),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let values = values(self.values);
    let colors = self.options.palette.colors(values.len());
    let half = self.options.width / 2.0;

    for (i, (&value, &color)) in values.iter().zip(&colors).enumerate() {
      if !value.is_finite() {
        continue;
      }
      let x = i as f64;
      let bar = Rect::from_points(
        transform * Point::new(x - half, 0.0),
        transform * Point::new(x + half, value),
      );
      render.fill(&bar, Affine::IDENTITY, color);

      if self.options.value_labels {
        let label = format_value(value);
        render.draw_text(DrawText {
          text: &label,
          size: 12.0,
          weight: FontWeight::BOLD,
          brush: Brush::Solid(color),
          position: transform * Point::new(x, value) - Vec2::new(0.0, 4.0),
          horizontal_align: Align::Center,
          vertical_align: Align::End,
          ..Default::default()
        });
      }
    }
  }
}

use std::f64::consts::FRAC_PI_2;

use kurbo::{Affine, Cap, Line, Point, Rect, RoundedRect, Stroke, Vec2};
use parley::FontWeight;
use peniko::{Brush, Color};
use polars::prelude::*;

use crate::{
  axes::Axes,
  bounds::Scale,
  render::DrawText,
};

mod axes;
mod bounds;
mod charts;
pub mod config;
pub mod correlation;
mod error;
pub mod labels;
mod legend;
mod marker;
pub mod pipeline;
mod plot3d;
pub mod regression;
mod render;
pub mod table;
mod theme;

pub use axes::{BarChartAxes, LollipopAxes, ScatterAxes, Trendline};
pub use bounds::{Bounds, Range};
pub use error::{Error, Result};
pub use marker::Marker;
pub use plot3d::Plot3d;
pub use render::{Align, Backend, Figure, Render, RenderError, VelloBackend};
pub use theme::{MAGMA, Palette};

const TEXT_COLOR: Color = Color::from_rgb8(32, 32, 32);
const TITLE_COLOR: Color = Color::from_rgb8(64, 64, 64);
const LINE_COLOR: Color = Color::from_rgb8(128, 128, 128);

/// A 2D chart over polars columns.
pub struct Plot<'a> {
  title:       Option<String>,
  title_align: Align,
  pub x:       Axis,
  pub y:       Axis,
  size:        (u32, u32),

  annotations: Vec<Annotation>,
  axes:        Vec<Axes<'a>>,
}

#[derive(Default)]
pub struct Axis {
  title:         Option<String>,
  min:           Option<f64>,
  max:           Option<f64>,
  tick_rotation: f64,
}

/// Boxed text placed in axes-fraction coordinates, anchored at its right edge.
pub struct Annotation {
  pub text:     String,
  pub position: (f64, f64),
  pub color:    Color,
}

impl Default for Plot<'_> {
  fn default() -> Self {
    Plot {
      title:       None,
      title_align: Align::Center,
      x:           Axis::default(),
      y:           Axis::default(),
      size:        (1024, 1024),
      annotations: vec![],
      axes:        vec![],
    }
  }
}

impl<'a> Plot<'a> {
  pub fn new() -> Plot<'a> { Plot::default() }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn title_align(&mut self, align: Align) -> &mut Self {
    self.title_align = align;
    self
  }

  pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
    self.size = (width.max(1), height.max(1));
    self
  }

  /// Adds boxed text at `position`, where `(0, 0)` is the bottom left of the
  /// axes and `(1, 1)` the top right.
  pub fn annotate(&mut self, text: &str, position: (f64, f64), color: Color) -> &mut Self {
    self.annotations.push(Annotation { text: text.to_string(), position, color });
    self
  }
}

impl Axis {
  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn min(&mut self, min: f64) -> &mut Self {
    self.min = Some(min);
    self
  }

  pub fn max(&mut self, max: f64) -> &mut Self {
    self.max = Some(max);
    self
  }

  /// Rotates tick labels counter-clockwise, in degrees.
  pub fn rotate_ticks(&mut self, degrees: f64) -> &mut Self {
    self.tick_rotation = degrees.to_radians();
    self
  }
}

/// Every value of a column as text, in row order.
pub(crate) fn categories(column: &Column) -> Vec<String> {
  column.as_materialized_series().iter().map(|v| v.str_value().into_owned()).collect()
}

/// Column values as floats; nulls and unconvertible values become NaN.
pub(crate) fn values(column: &Column) -> Vec<f64> {
  column
    .cast(&DataType::Float64)
    .and_then(|c| {
      Ok(c.as_materialized_series().f64()?.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    })
    .log_err()
    .unwrap_or_default()
}

/// Integers without the trailing `.0`, everything else with two decimals.
pub(crate) fn format_value(value: f64) -> String {
  if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.2}") }
}

pub(crate) trait ResultExt<T> {
  fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
  fn log_err(self) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        log::warn!("{e}");
        None
      }
    }
  }
}

impl Figure for Plot<'_> {
  fn preferred_size(&self) -> (u32, u32) { self.size }

  fn window_title(&self) -> &str { self.title.as_deref().unwrap_or("electplot") }

  fn draw(&self, render: &mut Render, width: f64, height: f64) {
    self.draw_plot(render, width, height);
  }
}

impl Plot<'_> {
  fn draw_plot(&self, render: &mut Render, width: f64, height: f64) {
    let x_scale = Scale::resolve(self.axes.iter().map(|ax| ax.data_bounds().x), &self.x);
    let y_scale = Scale::resolve(self.axes.iter().map(|ax| ax.data_bounds().y), &self.y);

    let bottom = 70.0 + if self.x.tick_rotation != 0.0 { 70.0 } else { 0.0 };
    let left = 90.0 + if matches!(y_scale, Scale::Categorical(_)) { 40.0 } else { 0.0 };
    let viewport = Bounds::new(
      Range::new(0.0, width).inset(left, 40.0),
      Range::new(height, 0.0).inset(bottom, 70.0),
    );

    if let Some(title) = &self.title {
      let (x, horizontal_align) = match self.title_align {
        Align::Start => (viewport.x.min, Align::Start),
        Align::Center => ((viewport.x.min + viewport.x.max) / 2.0, Align::Center),
        Align::End => (viewport.x.max, Align::End),
      };
      render.draw_text(DrawText {
        text: title,
        size: 28.0,
        weight: FontWeight::new(600.0),
        brush: Brush::Solid(TITLE_COLOR),
        position: Point { x, y: viewport.y.max - 20.0 },
        horizontal_align,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    if let Some(x_label) = &self.x.title {
      render.draw_text(DrawText {
        text: x_label,
        size: 20.0,
        position: Point { x: (viewport.x.min + viewport.x.max) / 2.0, y: height - 10.0 },
        brush: Brush::Solid(TEXT_COLOR),
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    if let Some(y_label) = &self.y.title {
      render.draw_text(DrawText {
        text: y_label,
        size: 20.0,
        position: Point { x: 12.0, y: (viewport.y.min + viewport.y.max) / 2.0 },
        brush: Brush::Solid(TEXT_COLOR),
        transform: Affine::rotate(-FRAC_PI_2),
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      });
    }

    let border_stroke = Stroke::new(2.0);
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.max, viewport.y.min),
      ),
      Affine::IDENTITY,
      LINE_COLOR,
      &border_stroke,
    );
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.min, viewport.y.max),
      ),
      Affine::IDENTITY,
      LINE_COLOR,
      &border_stroke,
    );

    let data_bounds = Bounds::new(x_scale.range(), y_scale.range());
    let transform = data_bounds.transform_to(viewport);
    let tick_stroke = border_stroke.clone().with_start_cap(Cap::Butt);

    for (value, label) in ticks(&y_scale) {
      let vy = (transform * Point::new(0.0, value)).y;
      if !viewport.y.contains(&vy) {
        continue;
      }
      render.stroke(
        &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.min - 10.0, vy)),
        Affine::IDENTITY,
        LINE_COLOR,
        &tick_stroke,
      );
      render.draw_text(DrawText {
        text: &label,
        size: 12.0,
        position: Point { x: viewport.x.min - 15.0, y: vy },
        brush: Brush::Solid(TEXT_COLOR),
        transform: Affine::rotate(-self.y.tick_rotation),
        horizontal_align: Align::End,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    for (value, label) in ticks(&x_scale) {
      let vx = (transform * Point::new(value, 0.0)).x;
      if !viewport.x.contains(&vx) {
        continue;
      }
      render.stroke(
        &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.min + 10.0)),
        Affine::IDENTITY,
        LINE_COLOR,
        &tick_stroke,
      );
      let rotated = self.x.tick_rotation != 0.0;
      render.draw_text(DrawText {
        text: &label,
        size: 12.0,
        position: Point { x: vx, y: viewport.y.min + 15.0 },
        brush: Brush::Solid(TEXT_COLOR),
        transform: Affine::rotate(-self.x.tick_rotation),
        horizontal_align: if rotated { Align::End } else { Align::Center },
        vertical_align: if rotated { Align::Center } else { Align::Start },
        ..Default::default()
      });
    }

    for ax in &self.axes {
      ax.draw(render, transform);
    }

    for annotation in &self.annotations {
      draw_annotation(render, annotation, viewport);
    }
  }
}

/// Tick positions and labels: nice numbers for continuous scales, one tick
/// per category otherwise.
fn ticks(scale: &Scale) -> Vec<(f64, String)> {
  match scale {
    Scale::Continuous(range) => {
      let iter = range.nice_ticks(10);
      let decimals = iter.decimals();
      iter.map(|v| (v, format!("{v:.decimals$}"))).collect()
    }
    Scale::Categorical(labels) => {
      labels.iter().enumerate().map(|(i, label)| (i as f64, label.clone())).collect()
    }
  }
}

fn draw_annotation(render: &mut Render, annotation: &Annotation, viewport: Bounds) {
  const PADDING: f64 = 6.0;

  let anchor = Point::new(
    viewport.x.lerp(annotation.position.0),
    viewport.y.lerp(annotation.position.1),
  );
  let text = DrawText {
    text: &annotation.text,
    size: 16.0,
    brush: Brush::Solid(annotation.color),
    position: anchor - Vec2::new(PADDING, 0.0),
    horizontal_align: Align::End,
    vertical_align: Align::Center,
    ..Default::default()
  };
  let layout = render.layout_text(&text);
  let (width, height) = (f64::from(layout.width()), f64::from(layout.height()));

  let rect = Rect::new(
    anchor.x - width - PADDING * 2.0,
    anchor.y - height / 2.0 - PADDING,
    anchor.x,
    anchor.y + height / 2.0 + PADDING,
  );
  let background = RoundedRect::from_rect(rect, 5.0);
  render.fill(&background, Affine::IDENTITY, Color::WHITE);
  render.stroke(&background, Affine::IDENTITY, annotation.color, &Stroke::new(1.5));
  render.draw_text_layout(layout, text);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_names_in_row_order() {
    let column = Column::new("party".into(), ["PT", "MDB", "PSDB"]);
    assert_eq!(categories(&column), ["PT", "MDB", "PSDB"]);
  }

  #[test]
  fn values_as_floats() {
    let column = Column::new("count".into(), [Some(3u64), None, Some(7)]);
    let v = values(&column);
    assert_eq!(v[0], 3.0);
    assert!(v[1].is_nan());
    assert_eq!(v[2], 7.0);
  }

  #[test]
  fn value_labels() {
    assert_eq!(format_value(120.0), "120");
    assert_eq!(format_value(66.666), "66.67");
  }

  #[test]
  fn categorical_ticks() {
    let ticks = ticks(&Scale::Categorical(vec!["PT".into(), "PL".into()]));
    assert_eq!(ticks, vec![(0.0, "PT".to_string()), (1.0, "PL".to_string())]);
  }
}

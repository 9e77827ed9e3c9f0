use kurbo::{Affine, BezPath, Circle, Point, Stroke};
use parley::FontWeight;
use peniko::{Brush, Color};
use polars::prelude::*;

use crate::{
  Range, categories,
  bounds::DataBounds,
  regression::LinearFit,
  render::{Align, DrawText, Render},
  values,
};

pub struct ScatterAxes<'a> {
  x:       &'a Column,
  y:       &'a Column,
  options: ScatterOptions,

  labels:    Option<&'a Column>,
  trendline: Option<Trendline>,
}

pub struct ScatterOptions {
  /// Point radius in pixels.
  pub size:  f64,
  pub color: Color,
  pub alpha: f32,
}

/// Least squares line over the points, with an optional confidence band.
pub struct Trendline {
  pub color:      Color,
  pub width:      f64,
  pub alpha:      f32,
  pub band_alpha: f32,
  /// Two-sided level of the band, e.g. `0.95`.
  pub confidence: Option<f64>,
}

/// Band vertices per side.
const BAND_SAMPLES: usize = 64;

/// Horizontal gap between a point and its label, in data units.
const LABEL_OFFSET: f64 = 0.8;

impl Default for ScatterOptions {
  fn default() -> Self {
    ScatterOptions { size: 6.0, color: Color::from_rgb8(0, 0, 255), alpha: 0.5 }
  }
}

impl Trendline {
  pub fn linear() -> Self {
    Trendline {
      color:      Color::from_rgb8(255, 165, 0),
      width:      2.0,
      alpha:      0.8,
      band_alpha: 0.2,
      confidence: None,
    }
  }

  pub fn confidence(mut self, level: f64) -> Self {
    self.confidence = Some(level);
    self
  }
}

impl<'a> ScatterAxes<'a> {
  pub(crate) fn new(x: &'a Column, y: &'a Column) -> Self {
    ScatterAxes { x, y, options: ScatterOptions::default(), labels: None, trendline: None }
  }

  pub fn size(&mut self, size: f64) -> &mut Self {
    self.options.size = size;
    self
  }

  pub fn alpha(&mut self, alpha: f32) -> &mut Self {
    self.options.alpha = alpha;
    self
  }

  /// Writes each row of `labels` to the right of its point.
  pub fn labels(&mut self, labels: &'a Column) -> &mut Self {
    self.labels = Some(labels);
    self
  }

  pub fn trendline(&mut self, trendline: Trendline) -> &mut Self {
    self.trendline = Some(trendline);
    self
  }

  fn points(&self) -> Vec<Point> {
    values(self.x).into_iter().zip(values(self.y)).map(|(x, y)| Point::new(x, y)).collect()
  }

  fn fit(&self) -> Option<LinearFit> { LinearFit::fit(self.points().iter().map(|p| (p.x, p.y))) }

  /// Upper and lower edges of the band, both left to right.
  fn band(&self, fit: &LinearFit, level: f64, x: Range) -> Option<(Vec<Point>, Vec<Point>)> {
    let mut upper = Vec::with_capacity(BAND_SAMPLES);
    let mut lower = Vec::with_capacity(BAND_SAMPLES);
    for i in 0..BAND_SAMPLES {
      let vx = x.lerp(i as f64 / (BAND_SAMPLES - 1) as f64);
      let (lo, hi) = fit.confidence(vx, level)?;
      lower.push(Point::new(vx, lo));
      upper.push(Point::new(vx, hi));
    }
    Some((upper, lower))
  }

  pub(crate) fn data_bounds(&self) -> DataBounds<'_> {
    let points = self.points();
    let x = Range::of(points.iter().map(|p| p.x)).unwrap_or(Range::new(0.0, 1.0));
    let mut y = Range::of(points.iter().map(|p| p.y)).unwrap_or(Range::new(0.0, 1.0));

    if let Some((trendline, fit)) = self.trendline.as_ref().zip(self.fit()) {
      let band = trendline.confidence.and_then(|level| self.band(&fit, level, x));
      let edges = band.map(|(upper, lower)| upper.into_iter().chain(lower).map(|p| p.y));
      let ends = [fit.predict(x.min), fit.predict(x.max)];
      if let Some(r) = Range::of(edges.into_iter().flatten().chain(ends)) {
        y = Range::new(y.min.min(r.min), y.max.max(r.max));
      }
    }

    DataBounds { x: x.into(), y: y.into() }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let points = self.points();

    if let Some((trendline, fit)) = self.trendline.as_ref().zip(self.fit()) {
      let x = Range::of(points.iter().map(|p| p.x)).unwrap_or_default();

      let band = trendline.confidence.and_then(|level| self.band(&fit, level, x));
      if let Some((upper, lower)) = band {
        let mut path = BezPath::new();
        for (i, &p) in upper.iter().enumerate() {
          if i == 0 { path.move_to(p) } else { path.line_to(p) }
        }
        for &p in lower.iter().rev() {
          path.line_to(p);
        }
        path.close_path();
        render.fill(&path, transform, trendline.color.with_alpha(trendline.band_alpha));
      }

      let mut line = BezPath::new();
      line.move_to(transform * Point::new(x.min, fit.predict(x.min)));
      line.line_to(transform * Point::new(x.max, fit.predict(x.max)));
      render.stroke(
        &line,
        Affine::IDENTITY,
        trendline.color.with_alpha(trendline.alpha),
        &Stroke::new(trendline.width),
      );
    }

    let color = self.options.color.with_alpha(self.options.alpha);
    for point in points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
      render.fill(&Circle::new(transform * *point, self.options.size), Affine::IDENTITY, color);
    }

    if let Some(labels) = self.labels {
      for (point, label) in points.iter().zip(categories(labels)) {
        if !(point.x.is_finite() && point.y.is_finite()) {
          continue;
        }
        render.draw_text(DrawText {
          text: &label,
          size: 14.0,
          weight: FontWeight::SEMI_BOLD,
          brush: Brush::Solid(Color::from_rgb8(128, 128, 128)),
          position: transform * Point::new(point.x + LABEL_OFFSET, point.y),
          horizontal_align: Align::Start,
          vertical_align: Align::Center,
          ..Default::default()
        });
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bounds::DataRange;

  #[test]
  fn bounds_cover_the_band() {
    let x = Column::new("mayors".into(), [1u64, 2, 3, 4, 5]);
    let y = Column::new("councilors".into(), [2u64, 3, 7, 8, 11]);

    let mut scatter = ScatterAxes::new(&x, &y);
    let DataBounds { y: DataRange::Continuous { range: plain, .. }, .. } = scatter.data_bounds()
    else {
      panic!()
    };
    assert_eq!(plain, Range::new(2.0, 11.0));

    scatter.trendline(Trendline::linear().confidence(0.95));
    let DataBounds { y: DataRange::Continuous { range: banded, .. }, .. } = scatter.data_bounds()
    else {
      panic!()
    };
    assert!(banded.min < plain.min && banded.max > plain.max);
  }

  #[test]
  fn two_points_have_no_band() {
    let x = Column::new("mayors".into(), [1u64, 2]);
    let y = Column::new("councilors".into(), [1u64, 3]);
    let scatter = ScatterAxes::new(&x, &y);
    let fit = scatter.fit().unwrap();
    assert!(scatter.band(&fit, 0.95, Range::new(1.0, 2.0)).is_none());
  }
}

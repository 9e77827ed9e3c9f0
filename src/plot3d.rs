//! Orthographic 3D scatter.
//!
//! Data is scaled into the cube `[-1, 1]³` and viewed from a camera placed by
//! elevation and azimuth, the same convention as matplotlib's `view_init`.
//! Points are painted back to front.

use kurbo::{Affine, Circle, Line, Point, Stroke, Vec2};
use parley::FontWeight;
use peniko::{Brush, Color};
use polars::prelude::*;

use crate::{
  Marker, Range, categories,
  legend::{Legend, LegendItem},
  render::{Align, DrawText, Figure, Render},
  theme, values,
};

pub struct Plot3d<'a> {
  title:   Option<String>,
  axes:    [Axis3d<'a>; 3],
  hue:     Option<(&'a Column, String)>,
  view:    View,
  size:    (u32, u32),
  options: PointOptions,
}

struct Axis3d<'a> {
  column: &'a Column,
  title:  Option<String>,
}

pub struct PointOptions {
  pub size:  f64,
  pub color: Color,
  pub alpha: f32,
}

/// Camera direction, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct View {
  pub elevation: f64,
  pub azimuth:   f64,
}

/// Degrees of rotation per pixel dragged.
const DRAG_SPEED: f64 = 0.4;

const EDGES: [([f64; 3], [f64; 3]); 12] = [
  ([-1.0, -1.0, -1.0], [1.0, -1.0, -1.0]),
  ([-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]),
  ([-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]),
  ([-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
  ([-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0]),
  ([1.0, -1.0, -1.0], [1.0, 1.0, -1.0]),
  ([-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0]),
  ([1.0, -1.0, 1.0], [1.0, 1.0, 1.0]),
  ([-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]),
  ([1.0, -1.0, -1.0], [1.0, -1.0, 1.0]),
  ([-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]),
  ([1.0, 1.0, -1.0], [1.0, 1.0, 1.0]),
];

impl Default for PointOptions {
  fn default() -> Self { PointOptions { size: 8.0, color: Color::BLACK, alpha: 1.0 } }
}

impl View {
  /// Screen position (y up) and depth, larger depth being closer to the camera.
  pub(crate) fn project(&self, [x, y, z]: [f64; 3]) -> (Point, f64) {
    let (sin_a, cos_a) = self.azimuth.to_radians().sin_cos();
    let (sin_e, cos_e) = self.elevation.to_radians().sin_cos();

    let toward = x * cos_a + y * sin_a;
    let screen = Point::new(-x * sin_a + y * cos_a, z * cos_e - toward * sin_e);
    (screen, toward * cos_e + z * sin_e)
  }

  fn rotate(&mut self, dx: f64, dy: f64) {
    self.azimuth = (self.azimuth - dx * DRAG_SPEED).rem_euclid(360.0);
    self.elevation = (self.elevation + dy * DRAG_SPEED).clamp(-90.0, 90.0);
  }
}

impl<'a> Plot3d<'a> {
  pub fn new(x: &'a Column, y: &'a Column, z: &'a Column) -> Self {
    Plot3d {
      title:   None,
      axes:    [x, y, z].map(|column| Axis3d { column, title: None }),
      hue:     None,
      view:    View { elevation: 30.0, azimuth: -60.0 },
      size:    (1024, 768),
      options: PointOptions::default(),
    }
  }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn axis_titles(&mut self, x: &str, y: &str, z: &str) -> &mut Self {
    for (axis, title) in self.axes.iter_mut().zip([x, y, z]) {
      axis.title = Some(title.to_string());
    }
    self
  }

  /// Colors and marks points by category, with a legend titled `title`.
  pub fn hue(&mut self, column: &'a Column, title: &str) -> &mut Self {
    self.hue = Some((column, title.to_string()));
    self
  }

  pub fn view(&mut self, elevation: f64, azimuth: f64) -> &mut Self {
    self.view = View { elevation, azimuth };
    self
  }

  pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
    self.size = (width.max(1), height.max(1));
    self
  }

  pub fn point_size(&mut self, size: f64) -> &mut Self {
    self.options.size = size;
    self
  }

  pub fn alpha(&mut self, alpha: f32) -> &mut Self {
    self.options.alpha = alpha;
    self
  }

  fn ranges(&self) -> [Range; 3] {
    self
      .axes
      .each_ref()
      .map(|axis| Range::of(values(axis.column)).unwrap_or(Range::new(0.0, 1.0)).non_degenerate())
  }

  /// Points in cube coordinates, each with its row index.
  fn cube_points(&self, ranges: &[Range; 3]) -> Vec<(usize, [f64; 3])> {
    let [xs, ys, zs] = self.axes.each_ref().map(|axis| values(axis.column));
    let to_cube = |range: &Range, v: f64| range.normalize(v) * 2.0 - 1.0;

    (0..xs.len().min(ys.len()).min(zs.len()))
      .filter(|&i| xs[i].is_finite() && ys[i].is_finite() && zs[i].is_finite())
      .map(|i| {
        (i, [to_cube(&ranges[0], xs[i]), to_cube(&ranges[1], ys[i]), to_cube(&ranges[2], zs[i])])
      })
      .collect()
  }

  /// Row indices ordered back to front.
  pub(crate) fn paint_order(&self) -> Vec<usize> {
    let mut points = self
      .cube_points(&self.ranges())
      .into_iter()
      .map(|(i, p)| (i, self.view.project(p).1))
      .collect::<Vec<_>>();
    points.sort_by(|a, b| a.1.total_cmp(&b.1));
    points.into_iter().map(|(i, _)| i).collect()
  }

  /// Category of every row and the distinct categories in first-seen order.
  fn hue_keys(&self) -> Option<(Vec<String>, Vec<String>)> {
    let (column, _) = self.hue.as_ref()?;
    let rows = categories(column);
    let mut keys: Vec<String> = vec![];
    for row in &rows {
      if !keys.contains(row) {
        keys.push(row.clone());
      }
    }
    Some((rows, keys))
  }
}

impl Figure for Plot3d<'_> {
  fn preferred_size(&self) -> (u32, u32) { self.size }

  fn window_title(&self) -> &str { self.title.as_deref().unwrap_or("electplot") }

  fn draw(&self, render: &mut Render, width: f64, height: f64) {
    let center = Point::new(width / 2.0, height / 2.0 + 20.0);
    let scale = width.min(height) * 0.28;
    let to_screen = |p: [f64; 3]| {
      let (s, _) = self.view.project(p);
      Point::new(center.x + s.x * scale, center.y - s.y * scale)
    };

    if let Some(title) = &self.title {
      render.draw_text(DrawText {
        text: title,
        size: 24.0,
        weight: FontWeight::new(600.0),
        brush: Brush::Solid(Color::from_rgb8(64, 64, 64)),
        position: Point::new(40.0, 20.0),
        ..Default::default()
      });
    }

    let stroke = Stroke::new(1.0);
    let edge_color = Color::from_rgb8(180, 180, 180);
    for (a, b) in EDGES {
      render.stroke(&Line::new(to_screen(a), to_screen(b)), Affine::IDENTITY, edge_color, &stroke);
    }

    let ranges = self.ranges();
    for (axis, (axis3d, range)) in self.axes.iter().zip(&ranges).enumerate() {
      self.draw_axis(render, axis, axis3d.title.as_deref(), *range, &to_screen, center);
    }

    let hues = self.hue_keys();
    let palette = hues.as_ref().map(|(_, keys)| theme::categorical(keys.len())).unwrap_or_default();
    let style = |row: usize| -> (Color, Marker) {
      let Some((rows, keys)) = &hues else { return (self.options.color, Marker::Circle) };
      let index = rows.get(row).and_then(|r| keys.iter().position(|k| k == r)).unwrap_or(0);
      (palette.get(index).copied().unwrap_or(self.options.color), Marker::nth(index))
    };

    let points = self.cube_points(&ranges);
    for row in self.paint_order() {
      let Some(&(_, p)) = points.iter().find(|(i, _)| *i == row) else { continue };
      let (color, marker) = style(row);
      let color = color.with_alpha(self.options.alpha);
      let at = to_screen(p);

      if marker == Marker::Circle {
        render.fill(&Circle::new(at, self.options.size / 2.0), Affine::IDENTITY, color);
      } else {
        render.fill(
          &marker.to_path(0.1),
          Affine::translate(at.to_vec2()) * Affine::scale(self.options.size),
          color,
        );
      }
    }

    if let (Some((_, title)), Some((_, keys))) = (&self.hue, &hues) {
      let legend = Legend {
        title: Some(title.clone()),
        items: keys
          .iter()
          .enumerate()
          .map(|(i, key)| LegendItem {
            label:  key.clone(),
            color:  palette.get(i).copied().unwrap_or(self.options.color),
            marker: Marker::nth(i),
          })
          .collect(),
      };
      legend.draw(render, Point::new(width - 20.0, 60.0));
    }
  }

  fn drag(&mut self, dx: f64, dy: f64) -> bool {
    self.view.rotate(dx, dy);
    true
  }
}

impl Plot3d<'_> {
  /// Ticks and title along the cube edge, parallel to `axis`, nearest the camera.
  fn draw_axis(
    &self,
    render: &mut Render,
    axis: usize,
    title: Option<&str>,
    range: Range,
    to_screen: &impl Fn([f64; 3]) -> Point,
    center: Point,
  ) {
    // The other two coordinates of the chosen edge; the vertical axis is
    // labeled on a side edge, the horizontal ones along the floor.
    let corners: &[[f64; 2]] = if axis == 2 {
      &[[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]]
    } else {
      &[[-1.0, -1.0], [1.0, -1.0]]
    };
    let place = |t: f64, [a, b]: [f64; 2]| -> [f64; 3] {
      match axis {
        0 => [t, a, b],
        1 => [a, t, b],
        _ => [a, b, t],
      }
    };
    let Some(&edge) = corners.iter().max_by(|&&p, &&q| {
      let depth = |c: [f64; 2]| self.view.project(place(0.0, c)).1;
      let side = |c: [f64; 2]| to_screen(place(0.0, c)).x;
      if axis == 2 {
        // Side edge furthest to the left.
        side(q).total_cmp(&side(p))
      } else {
        depth(p).total_cmp(&depth(q))
      }
    }) else {
      return;
    };

    let outward = |p: Point, distance: f64| {
      let dir = p - center;
      let dir = if dir.hypot() > 0.0 { dir / dir.hypot() } else { Vec2::new(0.0, 1.0) };
      p + dir * distance
    };

    let ticks = range.nice_ticks(5);
    let decimals = ticks.decimals();
    for tick in ticks.filter(|t| range.contains(t)) {
      let t = range.normalize(tick) * 2.0 - 1.0;
      let label = format!("{tick:.decimals$}");
      render.draw_text(DrawText {
        text: &label,
        size: 11.0,
        brush: Brush::Solid(Color::from_rgb8(32, 32, 32)),
        position: outward(to_screen(place(t, edge)), 18.0),
        horizontal_align: Align::Center,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    if let Some(title) = title {
      render.draw_text(DrawText {
        text: title,
        size: 14.0,
        weight: FontWeight::SEMI_BOLD,
        brush: Brush::Solid(Color::from_rgb8(32, 32, 32)),
        position: outward(to_screen(place(0.0, edge)), 50.0),
        horizontal_align: Align::Center,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  #[test]
  fn front_view() {
    let view = View { elevation: 0.0, azimuth: 0.0 };
    let (screen, depth) = view.project([0.5, 0.25, -1.0]);
    assert!(close(screen.x, 0.25) && close(screen.y, -1.0));
    assert!(close(depth, 0.5));
  }

  #[test]
  fn top_view() {
    let view = View { elevation: 90.0, azimuth: 0.0 };
    let (screen, depth) = view.project([0.5, 0.25, 0.75]);
    assert!(close(screen.x, 0.25) && close(screen.y, -0.5));
    assert!(close(depth, 0.75));
  }

  #[test]
  fn paints_back_to_front() {
    let x = Column::new("mayors".into(), [1u64, 3, 2]);
    let y = Column::new("councilors".into(), [0u64, 0, 0]);
    let z = Column::new("candidates".into(), [0u64, 0, 0]);
    let mut plot = Plot3d::new(&x, &y, &z);

    plot.view(0.0, 0.0);
    assert_eq!(plot.paint_order(), [0, 2, 1]);

    // Looking from the opposite side reverses the order.
    plot.view(0.0, 180.0);
    assert_eq!(plot.paint_order(), [1, 2, 0]);
  }

  #[test]
  fn drag_rotates_and_clamps() {
    let x = Column::new("x".into(), [1.0]);
    let mut plot = Plot3d::new(&x, &x, &x);
    plot.view(30.0, 185.0);

    assert!(plot.drag(10.0, 0.0));
    assert!(close(plot.view.azimuth, 181.0));

    plot.drag(0.0, 1000.0);
    assert_eq!(plot.view.elevation, 90.0);
  }

  #[test]
  fn hue_keys_in_first_seen_order() {
    let x = Column::new("x".into(), [1.0, 2.0, 3.0]);
    let party = Column::new("party".into(), ["PT", "PL", "PT"]);
    let mut plot = Plot3d::new(&x, &x, &x);
    plot.hue(&party, "Party");

    let (rows, keys) = plot.hue_keys().unwrap();
    assert_eq!(rows, ["PT", "PL", "PT"]);
    assert_eq!(keys, ["PT", "PL"]);
  }

  #[test]
  fn draws_from_any_angle() {
    let x = Column::new("x".into(), [1.0, 2.0, 3.0]);
    let mut plot = Plot3d::new(&x, &x, &x);
    for (elevation, azimuth) in [(0.0, 0.0), (30.0, 45.0), (90.0, 180.0), (-20.0, 300.0)] {
      plot.view(elevation, azimuth);
      let mut render = Render::new();
      plot.draw(&mut render, 800.0, 600.0);
      assert!(!render.scene.encoding().is_empty());
    }
  }
}

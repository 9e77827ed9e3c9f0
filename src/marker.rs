use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{BezPath, Circle, Point, Rect, Shape};

/// Point symbol, drawn inside a unit square centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
  Circle,
  Plus,
  Cross,
  Star,

  Square,
  Triangle,
  Diamond,
  Hexagon,
  Octagon,
}

impl Marker {
  /// Symbol order used when each category gets its own marker.
  pub const CYCLE: [Marker; 9] = [
    Marker::Circle,
    Marker::Diamond,
    Marker::Square,
    Marker::Cross,
    Marker::Triangle,
    Marker::Star,
    Marker::Plus,
    Marker::Hexagon,
    Marker::Octagon,
  ];

  pub fn nth(index: usize) -> Marker { Marker::CYCLE[index % Marker::CYCLE.len()] }

  pub(crate) fn to_path(&self, tolerance: f64) -> BezPath {
    match self {
      Marker::Circle => Circle::new(Point::new(0.0, 0.0), 0.5).to_path(tolerance),
      Marker::Plus => {
        const INSET: f64 = 0.15;

        let mut path = BezPath::new();
        path.move_to(Point::new(-INSET, -0.5));
        path.line_to(Point::new(INSET, -0.5));
        path.line_to(Point::new(INSET, -INSET));
        path.line_to(Point::new(0.5, -INSET));
        path.line_to(Point::new(0.5, INSET));
        path.line_to(Point::new(INSET, INSET));
        path.line_to(Point::new(INSET, 0.5));
        path.line_to(Point::new(-INSET, 0.5));
        path.line_to(Point::new(-INSET, 0.5));
        path.line_to(Point::new(-INSET, INSET));
        path.line_to(Point::new(-0.5, INSET));
        path.line_to(Point::new(-0.5, -INSET));
        path.line_to(Point::new(-INSET, -INSET));
        path.line_to(Point::new(-INSET, -0.5));
        path.close_path();
        path
      }
      Marker::Cross => {
        const INSET: f64 = 0.15;

        let mut path = BezPath::new();
        path.move_to(Point::new(-0.5 + INSET, -0.5));
        path.line_to(Point::new(0.0, -INSET));
        path.line_to(Point::new(0.5 - INSET, -0.5));
        path.line_to(Point::new(0.5, -0.5 + INSET));
        path.line_to(Point::new(INSET, 0.0));
        path.line_to(Point::new(0.5, 0.5 - INSET));
        path.line_to(Point::new(0.5 - INSET, 0.5));
        path.line_to(Point::new(0.0, INSET));
        path.line_to(Point::new(-0.5 + INSET, 0.5));
        path.line_to(Point::new(-0.5, 0.5 - INSET));
        path.line_to(Point::new(-INSET, 0.0));
        path.line_to(Point::new(-0.5, -0.5 + INSET));
        path.close_path();
        path
      }
      Marker::Square => Rect::new(-0.5, -0.5, 0.5, 0.5).to_path(tolerance),
      Marker::Triangle => {
        // sqrt(3) / 4.0, using the unstable SQRT_3 constant.
        const Y: f64 = 1.732050807568877293527446341505872367_f64 / 4.0;

        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, -Y));
        path.line_to(Point::new(0.5, Y));
        path.line_to(Point::new(-0.5, Y));
        path.close_path();
        path
      }
      Marker::Diamond => {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, -0.5));
        path.line_to(Point::new(0.5, 0.0));
        path.line_to(Point::new(0.0, 0.5));
        path.line_to(Point::new(-0.5, 0.0));
        path.close_path();
        path
      }
      Marker::Hexagon => {
        // sqrt(3) / 4.0, using the unstable SQRT_3 constant.
        const Y: f64 = 1.732050807568877293527446341505872367_f64 / 4.0;

        let mut path = BezPath::new();
        path.move_to(Point::new(-0.25, -Y));
        path.line_to(Point::new(0.25, -Y));
        path.line_to(Point::new(0.5, 0.0));
        path.line_to(Point::new(0.25, Y));
        path.line_to(Point::new(-0.25, Y));
        path.line_to(Point::new(-0.5, 0.0));
        path.close_path();
        path
      }
      Marker::Star => {
        const INNER: f64 = 0.2;

        let mut path = BezPath::new();
        for i in 0..10 {
          let radius = if i % 2 == 0 { 0.5 } else { INNER };
          let angle = -FRAC_PI_2 + PI * f64::from(i) / 5.0;
          let point = Point::new(radius * angle.cos(), radius * angle.sin());
          if i == 0 {
            path.move_to(point);
          } else {
            path.line_to(point);
          }
        }
        path.close_path();
        path
      }
      Marker::Octagon => {
        let mut path = BezPath::new();
        for i in 0..8 {
          let angle = TAU * (f64::from(i) + 0.5) / 8.0;
          let point = Point::new(0.5 * angle.cos(), 0.5 * angle.sin());
          if i == 0 {
            path.move_to(point);
          } else {
            path.line_to(point);
          }
        }
        path.close_path();
        path
      }
    }
  }
}

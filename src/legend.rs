use kurbo::{Affine, Point, Rect, RoundedRect, Stroke, Vec2};
use peniko::Color;

use crate::{
  Marker,
  render::{Align, DrawText, Render},
};

pub(crate) struct Legend {
  pub title: Option<String>,
  pub items: Vec<LegendItem>,
}

pub(crate) struct LegendItem {
  pub label:  String,
  pub color:  Color,
  pub marker: Marker,
}

const PADDING: f64 = 10.0;
const FONT_SIZE: f32 = 14.0;
const LINE_HEIGHT: f64 = 20.0;
const MARKER_WIDTH: f64 = 24.0;
const MARKER_SIZE: f64 = 10.0;

impl Legend {
  /// Draws the legend with its top right corner at `anchor`.
  pub(crate) fn draw(&self, render: &mut Render, anchor: Point) {
    if self.items.is_empty() {
      return;
    }

    let mut inner_width = 0.0_f64;
    let mut layouts = vec![];
    for item in &self.items {
      let text = DrawText {
        text: &item.label,
        size: FONT_SIZE,
        vertical_align: Align::Center,
        ..Default::default()
      };
      let layout = render.layout_text(&text);
      inner_width = inner_width.max(f64::from(layout.width()));
      layouts.push((layout, text));
    }

    let title = self.title.as_deref().map(|title| {
      let text = DrawText {
        text: title,
        size: FONT_SIZE,
        weight: parley::FontWeight::BOLD,
        vertical_align: Align::Center,
        ..Default::default()
      };
      let layout = render.layout_text(&text);
      inner_width = inner_width.max(f64::from(layout.width()) - MARKER_WIDTH);
      (layout, text)
    });

    inner_width += MARKER_WIDTH;
    let rows = self.items.len() + usize::from(title.is_some());
    let inner_height = rows as f64 * LINE_HEIGHT;

    let rect = Rect::new(
      anchor.x - inner_width - PADDING * 2.0,
      anchor.y,
      anchor.x,
      anchor.y + inner_height + PADDING * 2.0,
    );
    let background = RoundedRect::from_rect(rect, 5.0);
    render.fill(&background, Affine::IDENTITY, Color::from_rgba8(255, 255, 255, 200));
    let border = Color::from_rgb8(128, 128, 128);
    render.stroke(&background, Affine::IDENTITY, border, &Stroke::new(1.0));

    let row = |i: usize| {
      Point::new(rect.x0 + PADDING, rect.y0 + PADDING + i as f64 * LINE_HEIGHT + LINE_HEIGHT / 2.0)
    };

    let offset = usize::from(title.is_some());
    if let Some((layout, mut text)) = title {
      text.position = row(0);
      render.draw_text_layout(layout, text);
    }

    for (i, ((layout, mut text), item)) in layouts.into_iter().zip(&self.items).enumerate() {
      let pos = row(i + offset);

      let marker = item.marker.to_path(0.1);
      let center = pos + Vec2::new(MARKER_SIZE / 2.0, 0.0);
      render.fill(
        &marker,
        Affine::translate(center.to_vec2()) * Affine::scale(MARKER_SIZE),
        item.color,
      );

      text.position = pos + Vec2::new(MARKER_WIDTH, 0.0);
      render.draw_text_layout(layout, text);
    }
  }
}

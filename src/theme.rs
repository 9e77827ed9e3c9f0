use color::{HueDirection, Oklab, Oklch, OpaqueColor, Srgb};
use peniko::Color;

/// Sequential palette interpolated in Oklab between evenly spaced stops.
pub struct Palette {
  stops: &'static [OpaqueColor<Srgb>],
}

const fn rgb(r: u8, g: u8, b: u8) -> OpaqueColor<Srgb> {
  OpaqueColor::new([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

pub const MAGMA: Palette = Palette::new(&[
  rgb(0x00, 0x00, 0x04),
  rgb(0x1c, 0x10, 0x44),
  rgb(0x4f, 0x12, 0x7b),
  rgb(0x81, 0x25, 0x81),
  rgb(0xb5, 0x36, 0x7a),
  rgb(0xe5, 0x50, 0x64),
  rgb(0xfb, 0x87, 0x61),
  rgb(0xfe, 0xc2, 0x87),
  rgb(0xfc, 0xfd, 0xbf),
]);

impl Palette {
  pub const fn new(stops: &'static [OpaqueColor<Srgb>]) -> Self { Self { stops } }

  pub fn sample(&self, t: f32) -> Color {
    let Some(last) = self.stops.len().checked_sub(1) else { return Color::BLACK };
    if last == 0 {
      return self.stops[0].with_alpha(1.0);
    }

    let scaled = t.clamp(0.0, 1.0) * last as f32;
    let index = (scaled as usize).min(last - 1);
    let start = self.stops[index].convert::<Oklab>();
    let end = self.stops[index + 1].convert::<Oklab>();

    start.lerp(end, scaled - index as f32, HueDirection::Shorter).convert::<Srgb>().with_alpha(1.0)
  }

  /// `n` colors, skipping both ends of the palette.
  pub fn colors(&self, n: usize) -> Vec<Color> {
    (0..n).map(|i| self.sample((i + 1) as f32 / (n + 1) as f32)).collect()
  }
}

/// `n` distinct hues at constant lightness and chroma.
pub fn categorical(n: usize) -> Vec<Color> {
  (0..n)
    .map(|i| {
      let hue = 360.0 * i as f32 / n.max(1) as f32;
      OpaqueColor::<Oklch>::new([0.65, 0.15, hue]).convert::<Srgb>().with_alpha(1.0)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn one_color_per_category() {
    assert_eq!(MAGMA.colors(0).len(), 0);
    assert_eq!(MAGMA.colors(7).len(), 7);
    assert_eq!(categorical(12).len(), 12);
  }

  #[test]
  fn endpoints_are_the_stops() {
    let dark = MAGMA.sample(0.0).to_rgba8();
    let light = MAGMA.sample(1.0).to_rgba8();
    assert_eq!((dark.r, dark.g, dark.b), (0x00, 0x00, 0x04));
    assert_eq!((light.r, light.g, light.b), (0xfc, 0xfd, 0xbf));
  }

  #[test]
  fn colors_get_lighter() {
    let colors = MAGMA.colors(5);
    let lightness = colors.iter().map(|c| c.convert::<Oklab>().components[0]).collect::<Vec<_>>();
    assert!(lightness.windows(2).all(|w| w[0] < w[1]), "{lightness:?}");
  }
}

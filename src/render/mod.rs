use std::path::{Path, PathBuf};

use kurbo::{Affine, Point, Shape, Stroke};
use parley::{Alignment, FontWeight, PositionedLayoutItem, StyleProperty};
use peniko::{Brush, BrushRef, Color, Fill};
use vello::wgpu::{self, TextureDescriptor};

mod texture;
mod window;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("no suitable GPU adapter")]
  Adapter(#[from] wgpu::RequestAdapterError),
  #[error("cannot open GPU device")]
  Device(#[from] wgpu::RequestDeviceError),
  #[error("cannot create window surface")]
  Surface(#[from] wgpu::CreateSurfaceError),
  #[error("vello failed to render")]
  Vello(#[from] vello::Error),
  #[error("GPU poll failed")]
  Poll(#[from] wgpu::PollError),
  #[error("cannot map the output buffer")]
  Map(#[from] wgpu::BufferAsyncError),
  #[error("output buffer was dropped before it was mapped")]
  MapCancelled,
  #[error("{width}x{height} pixels do not fit the image buffer")]
  ImageSize { width: u32, height: u32 },
  #[error("cannot write {}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: image::ImageError,
  },
  #[error("cannot create window")]
  Window(#[from] winit::error::OsError),
  #[error("event loop failed")]
  EventLoop(#[from] winit::error::EventLoopError),
}

/// Something that draws itself into a [`Render`] at a given pixel size.
pub trait Figure {
  /// Preferred size in pixels.
  fn preferred_size(&self) -> (u32, u32);

  fn window_title(&self) -> &str { "electplot" }

  fn draw(&self, render: &mut Render, width: f64, height: f64);

  /// Pointer drag in pixels. Returns `true` when the figure changed.
  fn drag(&mut self, _dx: f64, _dy: f64) -> bool { false }
}

/// The only place figures leave the process: as image files or on screen.
pub trait Backend {
  fn save(&mut self, figure: &dyn Figure, path: &Path) -> Result<(), RenderError>;

  /// Blocks until the viewer is closed.
  fn show(&mut self, figure: &mut dyn Figure) -> Result<(), RenderError>;
}

/// Renders with vello on the default wgpu adapter.
#[derive(Default)]
pub struct VelloBackend;

impl Backend for VelloBackend {
  fn save(&mut self, figure: &dyn Figure, path: &Path) -> Result<(), RenderError> {
    let (width, height) = figure.preferred_size();
    let config = RenderConfig { width, height };
    let handle = GpuHandle::new(&config, None)?;

    let mut render = Render::new();
    figure.draw(&mut render, f64::from(width), f64::from(height));

    let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
    renderer.render_to_texture(
      &handle.device,
      &handle.queue,
      &render.scene,
      &handle.view,
      &vello::RenderParams {
        base_color: render.background,
        width,
        height,
        antialiasing_method: vello::AaConfig::Msaa16,
      },
    )?;

    texture::save(&handle, &config, path)?;
    log::info!("wrote {}", path.display());
    Ok(())
  }

  fn show(&mut self, figure: &mut dyn Figure) -> Result<(), RenderError> { window::show(figure) }
}

pub struct Render {
  pub(crate) scene:      vello::Scene,
  pub(crate) background: Color,
  font:                  parley::FontContext,
  layout:                parley::LayoutContext<Brush>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
  Start,
  Center,
  End,
}

#[derive(Clone)]
pub(crate) struct DrawText<'a> {
  pub text:             &'a str,
  pub size:             f32,
  pub weight:           FontWeight,
  pub brush:            Brush,
  pub position:         Point,
  /// Applied around `position`, after alignment.
  pub transform:        Affine,
  pub horizontal_align: Align,
  pub vertical_align:   Align,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             16.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(Color::BLACK),
      position:         Point::ORIGIN,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
    }
  }
}

pub(crate) struct GpuHandle {
  pub device:  wgpu::Device,
  pub queue:   wgpu::Queue,
  pub texture: wgpu::Texture,
  pub view:    wgpu::TextureView,
}

pub(crate) struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

impl Render {
  pub(crate) fn new() -> Self {
    Render {
      scene:      vello::Scene::new(),
      background: Color::WHITE,
      font:       parley::FontContext::new(),
      layout:     parley::LayoutContext::new(),
    }
  }

  pub(crate) fn fill<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
  ) {
    self.scene.fill(Fill::NonZero, transform, brush, None, shape);
  }

  pub(crate) fn stroke<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
    stroke: &Stroke,
  ) {
    self.scene.stroke(stroke, transform, brush, None, shape);
  }

  pub(crate) fn layout_text(&mut self, text: &DrawText) -> parley::Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);
    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));
    builder.push_default(StyleProperty::FontWeight(text.weight));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  pub(crate) fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  pub(crate) fn draw_text_layout(&mut self, layout: parley::Layout<Brush>, text: DrawText) {
    let width = f64::from(layout.width());
    let height = f64::from(layout.height());
    let dx = match text.horizontal_align {
      Align::Start => 0.0,
      Align::Center => -width / 2.0,
      Align::End => -width,
    };
    let dy = match text.vertical_align {
      Align::Start => 0.0,
      Align::Center => -height / 2.0,
      Align::End => -height,
    };
    let transform =
      Affine::translate(text.position.to_vec2()) * text.transform * Affine::translate((dx, dy));

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }
}

impl GpuHandle {
  pub(crate) fn new(
    config: &RenderConfig,
    adapter: Option<wgpu::Adapter>,
  ) -> Result<Self, RenderError> {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?
      }
    };

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::defaults(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))?;

    let texture = create_texture(&device, config);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    Ok(GpuHandle { device, queue, texture, view })
  }

  pub(crate) fn resize(&mut self, config: &RenderConfig) {
    self.texture = create_texture(&self.device, config);
    self.view = self.texture.create_view(&wgpu::TextureViewDescriptor::default());
  }
}

fn create_texture(device: &wgpu::Device, config: &RenderConfig) -> wgpu::Texture {
  device.create_texture(&TextureDescriptor {
    label:           Some("Render Texture"),
    size:            config.extent_3d(),
    mip_level_count: 1,
    sample_count:    1,
    dimension:       wgpu::TextureDimension::D2,
    format:          wgpu::TextureFormat::Rgba8Unorm,
    usage:           wgpu::TextureUsages::STORAGE_BINDING
      | wgpu::TextureUsages::TEXTURE_BINDING
      | wgpu::TextureUsages::COPY_SRC,
    view_formats:    &[],
  })
}

impl RenderConfig {
  fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d {
      width:                 self.width,
      height:                self.height,
      depth_or_array_layers: 1,
    }
  }
}

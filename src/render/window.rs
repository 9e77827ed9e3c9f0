use std::sync::Arc;

use vello::wgpu;
use winit::{
  application::ApplicationHandler,
  dpi::{LogicalSize, PhysicalPosition},
  event::{ElementState, KeyEvent, MouseButton, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::{Key, NamedKey},
  window::{Window, WindowId},
};

use crate::render::{Figure, GpuHandle, Render, RenderConfig, RenderError};

/// Opens a window showing `figure` until it is closed or `q` is pressed.
/// Dragging with the left button forwards the motion to [`Figure::drag`].
pub fn show(figure: &mut dyn Figure) -> Result<(), RenderError> {
  let event_loop = EventLoop::new()?;
  event_loop.set_control_flow(ControlFlow::Wait);

  let mut app =
    App { figure, stale: true, render: None, init: None, drag: None, cursor: None, error: None };
  event_loop.run_app(&mut app)?;

  let error = app.error.take();
  // FIXME: Ideally, we'd drop this. But dropping it segfaults.
  std::mem::forget(app);

  error.map_or(Ok(()), Err)
}

struct App<'a> {
  figure: &'a mut dyn Figure,
  stale:  bool,
  render: Option<Render>,

  init:   Option<Init>,
  drag:   Option<PhysicalPosition<f64>>,
  cursor: Option<PhysicalPosition<f64>>,
  error:  Option<RenderError>,
}

struct Init {
  window:  Arc<Window>,
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:  wgpu::util::TextureBlitter,
  vello: vello::Renderer,
}

impl App<'_> {
  fn init(&self, event_loop: &ActiveEventLoop) -> Result<Init, RenderError> {
    let (width, height) = self.figure.preferred_size();
    let window = Arc::new(
      event_loop.create_window(
        Window::default_attributes()
          .with_title(self.figure.window_title())
          .with_inner_size(LogicalSize::new(width, height))
          .with_min_inner_size(LogicalSize::new(100, 100)),
      )?,
    );
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(window.clone())?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))?;

    let surface_caps = surface.get_capabilities(&adapter);
    // The scene texture is already display-encoded, so avoid a second sRGB conversion.
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| !f.is_srgb())
      .unwrap_or(surface_caps.formats[0]);

    let render_config = RenderConfig { width: size.width.max(1), height: size.height.max(1) };
    let handle = GpuHandle::new(&render_config, Some(adapter))?;

    let config = wgpu::SurfaceConfiguration {
      usage:                         wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::COPY_DST,
      format:                        surface_format,
      width:                         render_config.width,
      height:                        render_config.height,
      present_mode:                  wgpu::PresentMode::AutoNoVsync,
      alpha_mode:                    surface_caps.alpha_modes[0],
      view_formats:                  vec![],
      desired_maximum_frame_latency: 2,
    };
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { window, surface, config, handle, blit, vello })
  }

  fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
    log::error!("viewer: {error}");
    self.error = Some(error);
    event_loop.exit();
  }
}

impl ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match self.init(event_loop) {
      Ok(init) => {
        init.window.request_redraw();
        self.init = Some(init);
      }
      Err(e) => self.fail(event_loop, e),
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => {
        event_loop.exit();
      }

      WindowEvent::KeyboardInput {
        event: KeyEvent { logical_key: Key::Character(c), state: ElementState::Pressed, .. },
        ..
      } if c == "q" => {
        event_loop.exit();
      }

      WindowEvent::KeyboardInput {
        event:
          KeyEvent { logical_key: Key::Named(NamedKey::Escape), state: ElementState::Pressed, .. },
        ..
      } => {
        event_loop.exit();
      }

      WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
        self.drag = match state {
          ElementState::Pressed => self.cursor,
          ElementState::Released => None,
        };
      }

      WindowEvent::CursorMoved { position, .. } => {
        self.cursor = Some(position);
        if let Some(start) = self.drag {
          self.drag = Some(position);
          if self.figure.drag(position.x - start.x, position.y - start.y) {
            self.stale = true;
            if let Some(init) = &self.init {
              init.window.request_redraw();
            }
          }
        }
      }

      WindowEvent::Resized(new_size) => {
        if let Some(init) = &mut self.init {
          if new_size.width > 0 && new_size.height > 0 {
            init.config.width = new_size.width;
            init.config.height = new_size.height;
            init
              .handle
              .resize(&RenderConfig { width: init.config.width, height: init.config.height });
            init.surface.configure(&init.handle.device, &init.config);

            self.stale = true;
            init.window.request_redraw();
          }
        }
      }

      WindowEvent::RedrawRequested => {
        let Some(init) = &mut self.init else { return };

        if self.render.is_none() || self.stale {
          self.stale = false;
          let render = self.render.get_or_insert_with(Render::new);
          render.scene.reset();
          self.figure.draw(render, f64::from(init.config.width), f64::from(init.config.height));

          let result = init.vello.render_to_texture(
            &init.handle.device,
            &init.handle.queue,
            &render.scene,
            &init.handle.view,
            &vello::RenderParams {
              base_color:          render.background,
              width:               init.config.width,
              height:              init.config.height,
              antialiasing_method: vello::AaConfig::Msaa16,
            },
          );
          if let Err(e) = result {
            self.fail(event_loop, e.into());
            return;
          }
        }
        init.redraw();
      }

      _ => (),
    }
  }
}

impl Init {
  fn redraw(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
        self.surface.configure(&self.handle.device, &self.config);
        self.window.request_redraw();
        return;
      }
      Err(e) => {
        log::warn!("dropped frame: {e:?}");
        return;
      }
    };

    let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, &surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    frame.present();
  }
}

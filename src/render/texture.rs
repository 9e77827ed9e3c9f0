use std::{path::Path, sync::mpsc};

use image::{ImageBuffer, Rgba};
use vello::wgpu;

use crate::render::{GpuHandle, RenderConfig, RenderError};

/// Copies the rendered texture back from the GPU and writes it as an image.
pub(crate) fn save(
  handle: &GpuHandle,
  config: &RenderConfig,
  path: &Path,
) -> Result<(), RenderError> {
  let unpadded_row = 4 * config.width;
  let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
    * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded_row) * u64::from(config.height),
    usage:              wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
    mapped_at_creation: false,
  });

  let mut encoder = handle.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
    label: Some("texture_buffer_copy_encoder"),
  });

  encoder.copy_texture_to_buffer(
    wgpu::TexelCopyTextureInfo {
      texture:   &handle.texture,
      mip_level: 0,
      origin:    wgpu::Origin3d::ZERO,
      aspect:    wgpu::TextureAspect::All,
    },
    wgpu::TexelCopyBufferInfo {
      buffer: &buffer,
      layout: wgpu::TexelCopyBufferLayout {
        offset:         0,
        bytes_per_row:  Some(padded_row),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let slice = buffer.slice(..);
  let (sender, receiver) = mpsc::channel();
  slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = sender.send(result);
  });
  handle.device.poll(wgpu::PollType::Wait)?;
  receiver.recv().map_err(|_| RenderError::MapCancelled)??;

  let pixels = {
    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity(unpadded_row as usize * config.height as usize);
    for row in data.chunks(padded_row as usize) {
      pixels.extend_from_slice(&row[..unpadded_row as usize]);
    }
    pixels
  };
  buffer.unmap();

  let image = ImageBuffer::<Rgba<u8>, _>::from_raw(config.width, config.height, pixels)
    .ok_or(RenderError::ImageSize { width: config.width, height: config.height })?;
  image.save(path).map_err(|source| RenderError::Write { path: path.to_path_buf(), source })
}

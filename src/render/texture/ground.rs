//! Repeating ground texture for terrain tiles

use std::path::Path;

use image::RgbaImage;

use crate::core::Result;

/// Side of the generated fallback texture in texels
const FALLBACK_SIZE: u32 = 64;

/// Sampled ground texture (Rgba8UnormSrgb, repeat addressing)
pub struct GroundTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GroundTexture {
    /// Load the image at `path`. A missing or unreadable file falls back to
    /// a generated green texture so the scene still renders.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        let image = match decode(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Ground texture {}: {}, using generated grass color", path.display(), e);
                fallback_image(FALLBACK_SIZE)
            }
        };
        Self::from_image(device, queue, &image)
    }

    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ground_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ground_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!("Ground texture uploaded: {}x{}", width, height);

        Self { texture, view, sampler }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Decode an image file to RGBA8
pub fn decode(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Two-tone green noise pattern
pub fn fallback_image(size: u32) -> RgbaImage {
    let size = size.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        let n = crate::math::noise::hash_2d(x as i32, y as i32, 0x67726173);
        let shade = 0.8 + 0.2 * n;
        image::Rgba([
            (52.0 * shade) as u8,
            (110.0 * shade) as u8,
            (34.0 * shade) as u8,
            255,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_opaque_green() {
        let image = fallback_image(16);
        assert_eq!(image.dimensions(), (16, 16));
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            assert_eq!(a, 255);
            assert!(g > r && g > b);
        }
    }

    #[test]
    fn test_decode_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decode(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_decode_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ground.png");
        fallback_image(8).save(&path).unwrap();

        let image = decode(&path).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
        assert_eq!(image, fallback_image(8));
    }
}

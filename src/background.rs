use std::sync::Arc;

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::error::ImageLoadError;

/// Decode any format the image crate understands into RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, ImageLoadError> {
    if bytes.is_empty() {
        return Err(ImageLoadError::Empty);
    }
    let decoded = image::load_from_memory(bytes)?;
    log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
    Ok(decoded.to_rgba8())
}

/// A raster laid over the photo at partial opacity, e.g. a proposed lot plan.
#[derive(Debug, Clone)]
pub struct ReferenceOverlay {
    image: Arc<RgbaImage>,
    opacity: f32,
}

impl ReferenceOverlay {
    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    /// In `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// The uploaded photo the study is drawn over, stretched across the whole drawing space.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    photo: Arc<RgbaImage>,
    reference: Option<ReferenceOverlay>,
}

impl BackgroundImage {
    pub const DEFAULT_REFERENCE_OPACITY: f32 = 0.5;

    pub fn new(photo: RgbaImage) -> Self {
        Self {
            photo: Arc::new(photo),
            reference: None,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        decode_rgba(bytes).map(Self::new)
    }

    pub fn photo(&self) -> &Arc<RgbaImage> {
        &self.photo
    }

    pub fn size(&self) -> [usize; 2] {
        [self.photo.width() as usize, self.photo.height() as usize]
    }

    pub fn reference(&self) -> Option<&ReferenceOverlay> {
        self.reference.as_ref()
    }

    pub fn set_reference(&mut self, image: RgbaImage) {
        let opacity = self
            .reference
            .as_ref()
            .map_or(Self::DEFAULT_REFERENCE_OPACITY, |r| r.opacity);
        self.reference = Some(ReferenceOverlay {
            image: Arc::new(image),
            opacity,
        });
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    pub fn set_reference_opacity(&mut self, opacity: f32) {
        if let Some(reference) = &mut self.reference {
            reference.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// GPU copies of the background, rebuilt whenever the session generation moves on.
pub struct BackgroundTextures {
    generation: u64,
    photo: TextureHandle,
    reference: Option<TextureHandle>,
}

impl BackgroundTextures {
    pub fn upload(ctx: &Context, background: &BackgroundImage, generation: u64) -> Self {
        let photo = ctx.load_texture("background-photo", to_color_image(background.photo()), TextureOptions::LINEAR);
        let reference = background
            .reference()
            .map(|r| ctx.load_texture("background-reference", to_color_image(r.image()), TextureOptions::LINEAR));
        log::debug!("Uploaded background textures for generation {}", generation);
        Self {
            generation,
            photo,
            reference,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn photo(&self) -> &TextureHandle {
        &self.photo
    }

    pub fn reference(&self) -> Option<&TextureHandle> {
        self.reference.as_ref()
    }
}

use egui::{Align2, Color32, FontId, Id, LayerId, Order};

/// An image file dropped onto the window, read into memory but not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Collect the image files dropped this frame.
    ///
    /// Files that are not images or cannot be read are logged and skipped.
    pub fn take_dropped_images(&mut self, ctx: &egui::Context) -> Vec<DroppedImage> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped
            .iter()
            .filter_map(|file| {
                let name = file_name(file);
                if !is_image_file(file) {
                    log::warn!("Dropped file is not a supported type: {}", name);
                    return None;
                }
                let bytes = read_bytes(file, &name)?;
                log::info!("Received image {} ({} bytes)", name, bytes.len());
                Some(DroppedImage { name, bytes })
            })
            .collect()
    }

    /// Dim the window while files hover over it.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Soltar imagen:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None if !file.mime.is_empty() => text += &format!("\n{}", file.mime),
                    None => text += "\n(archivo)",
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(22.0),
            Color32::WHITE,
        );
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_ref()
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
    matches!(
        name.as_deref(),
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff")
    )
}

fn read_bytes(file: &egui::DroppedFile, name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::error!("Failed to read image file {}: {}", name, err);
                None
            }
        };
    }

    log::warn!("Dropped file has no accessible data: {}", name);
    None
}

//! The boundary to the report form that embeds the exported picture.

use std::sync::Arc;

use parking_lot::Mutex;

/// Form field that receives the flattened study image.
pub const MORPHOLOGICAL_STUDY_FIELD: &str = "estudioMorfologico";

/// A partial form state: one field, one PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormUpdate {
    pub field: &'static str,
    pub image_png: Vec<u8>,
}

impl FormUpdate {
    pub fn study_image(png: Vec<u8>) -> Self {
        Self {
            field: MORPHOLOGICAL_STUDY_FIELD,
            image_png: png,
        }
    }
}

/// Host-side state the editor writes into when the user saves.
pub trait FormStore {
    fn update_form(&mut self, update: FormUpdate);
}

/// A form store shared between the UI and whoever reads the result.
#[derive(Debug, Clone, Default)]
pub struct SharedFormState {
    inner: Arc<Mutex<FormFields>>,
}

#[derive(Debug, Default)]
struct FormFields {
    study_image: Option<Vec<u8>>,
    updates: usize,
}

impl SharedFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn study_image(&self) -> Option<Vec<u8>> {
        self.inner.lock().study_image.clone()
    }

    /// How many times the form has been written.
    pub fn update_count(&self) -> usize {
        self.inner.lock().updates
    }
}

impl FormStore for SharedFormState {
    fn update_form(&mut self, update: FormUpdate) {
        let mut fields = self.inner.lock();
        fields.updates += 1;
        match update.field {
            MORPHOLOGICAL_STUDY_FIELD => fields.study_image = Some(update.image_png),
            other => log::warn!("Ignoring update to unknown form field {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_fields() {
        let state = SharedFormState::new();
        let mut writer = state.clone();
        writer.update_form(FormUpdate::study_image(vec![1, 2, 3]));
        assert_eq!(state.study_image(), Some(vec![1, 2, 3]));
        assert_eq!(state.update_count(), 1);
    }
}

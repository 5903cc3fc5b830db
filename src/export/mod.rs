mod raster;

use std::sync::Arc;

use futures::channel::oneshot;
use image::RgbaImage;

pub use raster::RasterExporter;

use crate::error::ExportError;
use crate::scene::Scene;

/// Background pixels captured when an export starts.
#[derive(Debug, Clone)]
pub struct BackgroundSnapshot {
    pub photo: Arc<RgbaImage>,
    /// Reference overlay and its opacity
    pub reference: Option<(Arc<RgbaImage>, f32)>,
}

/// Everything an export needs, detached from the live session.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Session generation the scene was taken from
    pub generation: u64,
    pub scene: Scene,
    /// Side of the square output, in pixels
    pub size: u32,
    /// `None` when the background is hidden
    pub background: Option<BackgroundSnapshot>,
    /// Solid fill used without a background
    pub fill: [u8; 3],
}

/// The flattened study, PNG encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub generation: u64,
    pub size: u32,
    pub png: Vec<u8>,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub generation: u64,
    pub result: Result<ExportedImage, ExportError>,
}

/// An export running off the UI path.
#[derive(Debug)]
pub struct ExportJob {
    generation: u64,
    receiver: oneshot::Receiver<ExportOutcome>,
}

impl ExportJob {
    /// Start rendering `request` in the background.
    pub fn spawn(request: ExportRequest) -> Self {
        let generation = request.generation;
        let (sender, receiver) = oneshot::channel();
        let work = move || {
            let result = RasterExporter::render(&request);
            if sender.send(ExportOutcome { generation, result }).is_err() {
                log::debug!("Export {} finished after its receiver was dropped", generation);
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Err(err) = std::thread::Builder::new().name("study-export".into()).spawn(work) {
                log::error!("Failed to start export thread: {}", err);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move { work() });
        }

        Self { generation, receiver }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-blocking check for the result. A worker that died reports [`ExportError::WorkerGone`].
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(ExportOutcome {
                generation: self.generation,
                result: Err(ExportError::WorkerGone),
            }),
        }
    }

    /// Wait for the result.
    pub async fn finish(self) -> ExportOutcome {
        let generation = self.generation;
        self.receiver.await.unwrap_or(ExportOutcome {
            generation,
            result: Err(ExportError::WorkerGone),
        })
    }
}

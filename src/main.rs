#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = morpho_study::EditorConfig::from_env();
    let photo = std::env::args().nth(1);

    let viewport = egui::ViewportBuilder::default()
        .with_title("Estudio morfológico")
        .with_inner_size([1280.0, 860.0])
        .with_min_inner_size([640.0, 480.0]);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "morpho_study",
        options,
        Box::new(move |cc| {
            let mut app = morpho_study::StudyApp::new(cc, config);
            if let Some(path) = photo {
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        if let Err(err) = app.editor_mut().load_background_bytes(&bytes) {
                            log::error!("Cannot use {} as background: {}", path, err);
                        }
                    }
                    Err(err) => log::error!("Cannot read {}: {}", path, err),
                }
            }
            Ok(Box::new(app))
        }),
    )
}

// The web build is driven from JavaScript through `StudyApp::new`.
#[cfg(target_arch = "wasm32")]
fn main() {}

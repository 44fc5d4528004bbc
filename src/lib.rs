pub mod activity;
pub mod capture;
pub mod detection;
pub mod error;
pub mod history;
pub mod mood;
pub mod settings;
pub mod utils;

pub use activity::{activity_for_label, Activity};
pub use capture::{Camera, Capabilities, ExpressionClassifier, Frame, FrameChannel, ModelLoader};
pub use detection::{DetectionController, EventSink, MoodSnapshot, Readiness, SessionState};
pub use error::MoodError;
pub use history::{History, MoodSample, HISTORY_CAPACITY};
pub use mood::{rank, ExpressionDistribution, MoodLabel, RankedMood};
pub use settings::{DetectionSettings, SettingsStore};

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use log::info;
    use tauri::Manager;

    use crate::capture::{
        Capabilities, ExternalCamera, FrameChannel, RandomExpressionClassifier,
    };
    use crate::detection::{commands::*, events::TauriSink, DetectionController};
    use crate::settings::SettingsStore;
    use crate::utils::logging;

    pub(crate) struct AppState {
        pub(crate) detection: DetectionController,
        pub(crate) frames: FrameChannel,
        pub(crate) settings: SettingsStore,
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        // Initialize logging (reads RUST_LOG env var)
        logging::init();

        info!("MoodLens starting up...");

        let app = tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let settings_store = SettingsStore::new(app_data_dir.join("settings.json"))?;
                    let settings = settings_store.detection().with_env_overrides();
                    settings.validate()?;

                    let frames = FrameChannel::new();
                    // Stand-in classifier until a real expression model is wired in.
                    let classifier = Arc::new(RandomExpressionClassifier::new());
                    let capabilities = Capabilities {
                        loader: classifier.clone(),
                        camera: Arc::new(ExternalCamera::new(frames.clone())),
                        classifier,
                    };

                    let controller = DetectionController::new(
                        capabilities,
                        Arc::new(TauriSink::new(app.handle().clone())),
                        settings,
                    );

                    // Model loading and camera access run in the background so
                    // the window comes up immediately.
                    {
                        let controller = controller.clone();
                        tauri::async_runtime::spawn(async move {
                            let readiness = controller.initialize().await;
                            info!(
                                "detection ready: models={} camera={}",
                                readiness.models_ready, readiness.camera_ready
                            );
                        });
                    }

                    app.manage(AppState {
                        detection: controller,
                        frames,
                        settings: settings_store,
                    });

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .invoke_handler(tauri::generate_handler![
                get_mood_state,
                start_detection,
                stop_detection,
                reset_session,
                get_mood_palette,
                get_activity_for_mood,
                push_video_frame,
                get_detection_settings,
                update_detection_settings,
            ])
            .build(tauri::generate_context!())
            .expect("error while building tauri application");

        app.run(|handle, event| {
            if let tauri::RunEvent::Exit = event {
                let controller = handle.state::<AppState>().detection.clone();
                tauri::async_runtime::block_on(controller.shutdown());
            }
        });
    }
}

#[cfg(feature = "desktop")]
pub(crate) use desktop::AppState;

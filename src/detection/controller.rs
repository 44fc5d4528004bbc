use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::capture::{Capabilities, VideoStream};
use crate::error::MoodError;
use crate::history::{
    confidence_series, recent_view, session_stats, ChartPoint, MoodSample, SessionStats,
    DEFAULT_RECENT,
};
use crate::settings::DetectionSettings;

use super::events::EventSink;
use super::loop_worker::{detection_loop, TickContext};
use super::state::{Session, SessionState};

/// Read model handed to the UI after every change.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodSnapshot {
    pub state: SessionState,
    pub is_detecting: bool,
    /// Oldest first.
    pub history: Vec<MoodSample>,
    /// Newest first.
    pub recent: Vec<MoodSample>,
    pub chart: Vec<ChartPoint>,
    pub stats: SessionStats,
    pub models_ready: bool,
    pub camera_ready: bool,
    /// A reading is on screen and nothing is running.
    pub detection_complete: bool,
}

impl MoodSnapshot {
    pub(crate) fn capture(
        session: &Session,
        models_ready: bool,
        camera_ready: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let history = session.history.as_slice();
        let state = session.state.clone();
        let is_detecting = state.is_detecting();

        Self {
            is_detecting,
            history: history.to_vec(),
            recent: recent_view(history, DEFAULT_RECENT),
            chart: confidence_series(history),
            stats: session_stats(
                history,
                state.detection_count,
                state.session_start_time,
                now,
            ),
            models_ready,
            camera_ready,
            detection_complete: state.detection_count > 0 && !is_detecting,
            state,
        }
    }
}

/// Outcome of [`DetectionController::initialize`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub models_ready: bool,
    pub camera_ready: bool,
    pub camera_error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct ReadyFlags {
    models: AtomicBool,
    camera: AtomicBool,
}

impl ReadyFlags {
    pub(crate) fn models(&self) -> bool {
        self.models.load(Ordering::Acquire)
    }

    pub(crate) fn camera(&self) -> bool {
        self.camera.load(Ordering::Acquire)
    }
}

/// A live detection loop. Dropping it cancels the loop.
struct DetectionRun {
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl DetectionRun {
    fn cancel(&self) {
        self.cancel_token.cancel();
    }

    async fn finish(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                error!("detection loop task failed to join: {err}");
            }
        }
    }
}

impl Drop for DetectionRun {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[derive(Clone)]
pub struct DetectionController {
    session: Arc<Mutex<Session>>,
    run: Arc<Mutex<Option<DetectionRun>>>,
    video: Arc<Mutex<Option<VideoStream>>>,
    ready: Arc<ReadyFlags>,
    capabilities: Capabilities,
    events: Arc<dyn EventSink>,
    settings: Arc<Mutex<DetectionSettings>>,
}

impl DetectionController {
    pub fn new(
        capabilities: Capabilities,
        events: Arc<dyn EventSink>,
        settings: DetectionSettings,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(Utc::now()))),
            run: Arc::new(Mutex::new(None)),
            video: Arc::new(Mutex::new(None)),
            ready: Arc::new(ReadyFlags::default()),
            capabilities,
            events,
            settings: Arc::new(Mutex::new(settings)),
        }
    }

    /// Loads the expression models, then opens the camera. Neither failure is
    /// fatal: missing models keep `start` disabled, a missing camera leaves the
    /// video empty.
    pub async fn initialize(&self) -> Readiness {
        let models_ready = match self.capabilities.loader.load_models().await {
            Ok(()) => {
                self.ready.models.store(true, Ordering::Release);
                info!("expression models loaded");
                true
            }
            Err(err) => {
                error!("model loading failed: {err:#}");
                false
            }
        };

        let camera_error = match self.capabilities.camera.acquire_stream().await {
            Ok(stream) => {
                info!("camera stream {} acquired", stream.id());
                *self.video.lock().await = Some(stream);
                self.ready.camera.store(true, Ordering::Release);
                None
            }
            Err(err) => {
                let err = MoodError::CameraUnavailable(format!("{err:#}"));
                warn!("{err}");
                Some(err.to_string())
            }
        };

        let snapshot = self.snapshot().await;
        self.events.state_changed(&snapshot);

        Readiness {
            models_ready,
            camera_ready: camera_error.is_none(),
            camera_error,
        }
    }

    pub fn models_ready(&self) -> bool {
        self.ready.models()
    }

    pub async fn snapshot(&self) -> MoodSnapshot {
        let session = self.session.lock().await;
        self.snapshot_of(&session)
    }

    pub async fn settings(&self) -> DetectionSettings {
        self.settings.lock().await.clone()
    }

    /// Takes effect on the next `start`.
    pub async fn update_settings(&self, settings: DetectionSettings) -> anyhow::Result<()> {
        settings.validate()?;
        *self.settings.lock().await = settings;
        Ok(())
    }

    /// Begins one-shot detection: ticks until the first face is read.
    /// Calling it while a run is active changes nothing.
    pub async fn start(&self) -> Result<MoodSnapshot, MoodError> {
        if !self.ready.models() {
            warn!("start requested before expression models were ready");
            return Err(MoodError::ModelsNotReady);
        }

        let settings = self.settings().await;

        let snapshot = {
            let mut session = self.session.lock().await;
            if session.state.is_detecting() {
                return Ok(self.snapshot_of(&session));
            }

            let mut run = self.run.lock().await;
            // A run that auto-stopped has already cancelled itself.
            drop(run.take());

            session.begin_detection();

            let cancel_token = CancellationToken::new();
            let ctx = TickContext {
                session: self.session.clone(),
                video: self.video.clone(),
                classifier: self.capabilities.classifier.clone(),
                events: self.events.clone(),
                ready: self.ready.clone(),
                tick_interval: settings.tick_interval(),
                classifier_timeout: settings.classifier_timeout(),
            };
            let handle = tokio::spawn(detection_loop(ctx, cancel_token.clone()));

            *run = Some(DetectionRun {
                cancel_token,
                handle: Some(handle),
            });

            self.snapshot_of(&session)
        };

        info!("detection started for session {}", snapshot.state.session_id);
        self.events.state_changed(&snapshot);
        Ok(snapshot)
    }

    /// Cancels any running detection; history and the last reading stay.
    pub async fn stop(&self) -> MoodSnapshot {
        let snapshot = self.halt(false).await;
        self.events.state_changed(&snapshot);
        snapshot
    }

    /// Stops and clears history, counters and the current reading. The
    /// session id and start time are kept.
    pub async fn reset(&self) -> MoodSnapshot {
        let snapshot = self.halt(true).await;
        info!("session {} reset", snapshot.state.session_id);
        self.events.state_changed(&snapshot);
        snapshot
    }

    /// Teardown: cancels the loop and waits for it without announcing anything.
    pub async fn shutdown(&self) {
        self.halt(false).await;
    }

    async fn halt(&self, clear: bool) -> MoodSnapshot {
        let (run, snapshot) = {
            let mut session = self.session.lock().await;
            let run = self.run.lock().await.take();
            if let Some(run) = &run {
                run.cancel();
            }

            if clear {
                session.reset();
            } else {
                session.end_detection();
            }

            (run, self.snapshot_of(&session))
        };

        if let Some(run) = run {
            run.finish().await;
        }

        snapshot
    }

    fn snapshot_of(&self, session: &Session) -> MoodSnapshot {
        MoodSnapshot::capture(session, self.ready.models(), self.ready.camera(), Utc::now())
    }
}

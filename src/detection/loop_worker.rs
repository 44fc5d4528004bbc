use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::capture::{ExpressionClassifier, Frame, VideoStream};
use crate::error::MoodError;
use crate::history::MoodSample;
use crate::mood::{rank, RankedMood};

use super::controller::ReadyFlags;
use super::events::EventSink;
use super::state::Session;
use super::MoodSnapshot;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything one detection run needs, cloned out of the controller at start.
pub(crate) struct TickContext {
    pub(crate) session: Arc<Mutex<Session>>,
    pub(crate) video: Arc<Mutex<Option<VideoStream>>>,
    pub(crate) classifier: Arc<dyn ExpressionClassifier>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) ready: Arc<ReadyFlags>,
    pub(crate) tick_interval: Duration,
    pub(crate) classifier_timeout: Duration,
}

#[derive(Debug)]
pub(crate) enum TickOutcome {
    Detected(MoodSample),
    Missed(MoodError),
    Cancelled,
}

/// Samples once per interval until a face is read or the token is cancelled.
/// The first tick fires one full interval after the loop starts.
pub(crate) async fn detection_loop(ctx: TickContext, cancel_token: CancellationToken) {
    let period = ctx.tick_interval;
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!("detection loop started ({}ms interval)", period.as_millis());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_tick(&ctx, &cancel_token).await {
                    TickOutcome::Detected(sample) => {
                        log_info!(
                            "detected {} at {}%, detection loop stopping",
                            sample.mood,
                            sample.confidence
                        );
                        break;
                    }
                    TickOutcome::Missed(err) => log_debug!("tick without a reading: {err}"),
                    TickOutcome::Cancelled => break,
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("detection loop shutting down");
                break;
            }
        }
    }
}

/// One sample: classify the latest frame and fold the result into the session.
///
/// The cancellation check and the state write share the session lock, so once
/// a stop has taken that lock no tick can land afterwards.
pub(crate) async fn run_tick(ctx: &TickContext, cancel_token: &CancellationToken) -> TickOutcome {
    let frame = {
        let video = ctx.video.lock().await;
        video.as_ref().and_then(VideoStream::latest_frame)
    };

    let classified = match frame {
        Some(frame) => tokio::select! {
            _ = cancel_token.cancelled() => return TickOutcome::Cancelled,
            result = classify(ctx, &frame) => result,
        },
        None => {
            log_debug!("no video frame available");
            Err(MoodError::NoFaceDetected)
        }
    };

    let now = Utc::now();
    let (outcome, snapshot) = {
        let mut session = ctx.session.lock().await;
        if cancel_token.is_cancelled() {
            return TickOutcome::Cancelled;
        }

        let outcome = match classified {
            Ok(ranked) => {
                let sample = session.record(ranked, now);
                cancel_token.cancel();
                TickOutcome::Detected(sample)
            }
            Err(err) => {
                session.record_miss();
                TickOutcome::Missed(err)
            }
        };

        let snapshot = MoodSnapshot::capture(&session, ctx.ready.models(), ctx.ready.camera(), now);
        (outcome, snapshot)
    };

    if let TickOutcome::Detected(sample) = &outcome {
        ctx.events.mood_detected(sample);
    }
    ctx.events.state_changed(&snapshot);

    outcome
}

async fn classify(ctx: &TickContext, frame: &Frame) -> Result<RankedMood, MoodError> {
    match time::timeout(ctx.classifier_timeout, ctx.classifier.detect(frame)).await {
        Ok(Ok(Some(distribution))) => rank(&distribution),
        Ok(Ok(None)) => Err(MoodError::NoFaceDetected),
        Ok(Err(err)) => {
            log_error!("expression classifier failed: {err:#}");
            Err(MoodError::ClassifierFailure(format!("{err:#}")))
        }
        Err(_) => {
            log_warn!(
                "expression classifier timed out (> {}ms)",
                ctx.classifier_timeout.as_millis()
            );
            Err(MoodError::ClassifierFailure(format!(
                "timed out after {}ms",
                ctx.classifier_timeout.as_millis()
            )))
        }
    }
}

use tauri::State;

use crate::{
    activity::{activity_for_label, ActivitySuggestion},
    capture::Frame,
    detection::{DetectionController, MoodSnapshot},
    mood::{palette, MoodProfile},
    settings::DetectionSettings,
};

use crate::AppState;

fn controller_from_state(state: &State<'_, AppState>) -> DetectionController {
    state.detection.clone()
}

#[tauri::command]
pub async fn get_mood_state(state: State<'_, AppState>) -> Result<MoodSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn start_detection(state: State<'_, AppState>) -> Result<MoodSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.start().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_detection(state: State<'_, AppState>) -> Result<MoodSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.stop().await)
}

#[tauri::command]
pub async fn reset_session(state: State<'_, AppState>) -> Result<MoodSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.reset().await)
}

#[tauri::command]
pub fn get_mood_palette() -> Vec<MoodProfile> {
    palette()
}

#[tauri::command]
pub fn get_activity_for_mood(mood: String) -> ActivitySuggestion {
    activity_for_label(&mood).into()
}

/// The webview owns the camera; it pushes raw RGBA frames here for the
/// classifier to sample.
#[tauri::command]
pub fn push_video_frame(
    state: State<'_, AppState>,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
) -> Result<(), String> {
    let frame = Frame::from_rgba(width, height, rgba).map_err(|e| e.to_string())?;
    state.frames.publish(frame);
    Ok(())
}

#[tauri::command]
pub async fn get_detection_settings(
    state: State<'_, AppState>,
) -> Result<DetectionSettings, String> {
    Ok(state.settings.detection())
}

#[tauri::command]
pub async fn update_detection_settings(
    state: State<'_, AppState>,
    settings: DetectionSettings,
) -> Result<(), String> {
    state
        .settings
        .update_detection(settings.clone())
        .map_err(|e| e.to_string())?;
    controller_from_state(&state)
        .update_settings(settings)
        .await
        .map_err(|e| e.to_string())
}

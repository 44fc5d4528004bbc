//! Contracts for the capabilities the engine drives but does not implement:
//! model loading, camera access and expression classification.

pub mod synthetic;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use tokio::sync::watch;
use uuid::Uuid;

use crate::mood::ExpressionDistribution;

pub use synthetic::{RandomExpressionClassifier, SyntheticCamera};

/// A single decoded video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Arc<RgbaImage>,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
            captured_at: Utc::now(),
        }
    }

    /// Wraps raw RGBA8 bytes as pushed by a video sink.
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = bytes.len();
        let image = RgbaImage::from_raw(width, height, bytes).ok_or_else(|| {
            anyhow!("frame buffer holds {actual} bytes, {width}x{height} RGBA needs {expected}")
        })?;
        Ok(Self::new(image))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Read side of a live camera stream. Cloning is cheap; every clone sees the
/// latest published frame.
#[derive(Debug, Clone)]
pub struct VideoStream {
    id: String,
    frames: watch::Receiver<Option<Frame>>,
}

impl VideoStream {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn latest_frame(&self) -> Option<Frame> {
        self.frames.borrow().clone()
    }
}

/// Write side of a stream, held by whatever owns the camera.
#[derive(Debug, Clone)]
pub struct FrameChannel {
    tx: Arc<watch::Sender<Option<Frame>>>,
    stream: VideoStream,
}

impl FrameChannel {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            stream: VideoStream {
                id: Uuid::new_v4().to_string(),
                frames: rx,
            },
        }
    }

    pub fn publish(&self, frame: Frame) {
        self.tx.send_replace(Some(frame));
    }

    pub fn stream(&self) -> VideoStream {
        self.stream.clone()
    }
}

impl Default for FrameChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Fails when the model assets cannot be fetched.
    async fn load_models(&self) -> Result<()>;
}

#[async_trait]
pub trait Camera: Send + Sync {
    async fn acquire_stream(&self) -> Result<VideoStream>;
}

#[async_trait]
pub trait ExpressionClassifier: Send + Sync {
    /// `Ok(None)` means the frame holds no face.
    async fn detect(&self, frame: &Frame) -> Result<Option<ExpressionDistribution>>;
}

/// The three capabilities a controller needs, bundled.
#[derive(Clone)]
pub struct Capabilities {
    pub loader: Arc<dyn ModelLoader>,
    pub camera: Arc<dyn Camera>,
    pub classifier: Arc<dyn ExpressionClassifier>,
}

/// A camera whose frames are pushed in from outside, e.g. by a webview that
/// owns the real device.
pub struct ExternalCamera {
    channel: FrameChannel,
}

impl ExternalCamera {
    pub fn new(channel: FrameChannel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Camera for ExternalCamera {
    async fn acquire_stream(&self) -> Result<VideoStream> {
        Ok(self.channel.stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_sees_latest_published_frame() {
        let channel = FrameChannel::new();
        let stream = channel.stream();
        assert!(stream.latest_frame().is_none());

        channel.publish(Frame::from_rgba(2, 1, vec![0; 8]).unwrap());
        channel.publish(Frame::from_rgba(1, 1, vec![255; 4]).unwrap());

        let frame = stream.latest_frame().unwrap();
        assert_eq!(frame.dimensions(), (1, 1));
    }

    #[test]
    fn rejects_short_buffers() {
        let err = Frame::from_rgba(4, 4, vec![0; 10]).unwrap_err();
        assert!(err.to_string().contains("needs 64"));
    }
}

//! Stand-in capabilities for demos and headless runs: a classifier that
//! scores every expression at random and a camera that serves a flat frame.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mood::{ExpressionDistribution, MoodLabel};

use super::{Camera, ExpressionClassifier, Frame, FrameChannel, ModelLoader, VideoStream};

pub struct RandomExpressionClassifier {
    rng: Mutex<StdRng>,
    miss_rate: f64,
    load_delay: Duration,
}

impl RandomExpressionClassifier {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            miss_rate: 0.0,
            load_delay: Duration::ZERO,
        }
    }

    /// Fraction of calls that report no face, clamped to `[0, 1]`.
    pub fn with_miss_rate(mut self, miss_rate: f64) -> Self {
        self.miss_rate = miss_rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }
}

impl Default for RandomExpressionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelLoader for RandomExpressionClassifier {
    async fn load_models(&self) -> Result<()> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl ExpressionClassifier for RandomExpressionClassifier {
    async fn detect(&self, _frame: &Frame) -> Result<Option<ExpressionDistribution>> {
        self.sample()
    }
}

impl RandomExpressionClassifier {
    fn sample(&self) -> Result<Option<ExpressionDistribution>> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("classifier rng poisoned"))?;

        if self.miss_rate > 0.0 && rng.gen_bool(self.miss_rate) {
            return Ok(None);
        }

        let scores = MoodLabel::ALL.map(|label| (label, rng.gen::<f64>()));
        Ok(Some(ExpressionDistribution::from_scores(scores)))
    }
}

/// Serves one solid-color frame, or refuses access when built `offline`.
pub struct SyntheticCamera {
    channel: Option<FrameChannel>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let channel = FrameChannel::new();
        channel.publish(Frame::new(RgbaImage::from_pixel(
            width,
            height,
            Rgba([128, 128, 128, 255]),
        )));
        Self {
            channel: Some(channel),
        }
    }

    pub fn offline() -> Self {
        Self { channel: None }
    }
}

#[async_trait]
impl Camera for SyntheticCamera {
    async fn acquire_stream(&self) -> Result<VideoStream> {
        match &self.channel {
            Some(channel) => Ok(channel.stream()),
            None => bail!("no camera device available"),
        }
    }
}

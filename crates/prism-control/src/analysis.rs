// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame-rate analysis.
//!
//! The `FrameRateMonitor` turns raw frame durations into coarse feedback
//! signals for the [`QualityController`](crate::QualityController). It
//! averages one window of frames at a time and classifies the result
//! against a lower and an upper frame-rate bound.

use crate::metrics::RingBuffer;
use serde::{Deserialize, Serialize};

/// Number of frame-time samples kept for the reported frame rate.
const HISTORY_LEN: usize = 120;

/// A coarse frame-rate event emitted once per sample window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameSignal {
    /// The window averaged below the lower bound.
    Decline,
    /// The window averaged at or above the upper bound.
    Incline,
    /// The window averaged between the bounds.
    Steady,
    /// Extreme stutter: the quality must drop to its emergency level.
    Fallback,
}

/// Thresholds for [`FrameRateMonitor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRateConfig {
    /// Frames averaged per emitted signal.
    pub sample_window: usize,
    /// Below this average the window is a decline.
    pub lower_fps: f32,
    /// At or above this average the window is an incline.
    pub upper_fps: f32,
    /// Below this average the window is a fallback.
    pub fallback_fps: f32,
    /// Consecutive decline/incline alternations tolerated before a fallback.
    pub flipflop_limit: u32,
}

impl Default for FrameRateConfig {
    fn default() -> Self {
        Self {
            sample_window: 30,
            lower_fps: 45.0,
            upper_fps: 57.0,
            fallback_fps: 20.0,
            flipflop_limit: 6,
        }
    }
}

/// Samples frame durations and emits a [`FrameSignal`] every window.
#[derive(Debug, Clone)]
pub struct FrameRateMonitor {
    config: FrameRateConfig,
    history: RingBuffer<f32, HISTORY_LEN>,
    window_sum_ms: f32,
    window_len: usize,
    last_direction: Option<FrameSignal>,
    flipflops: u32,
}

impl FrameRateMonitor {
    /// Creates a monitor with the given thresholds.
    pub fn new(config: FrameRateConfig) -> Self {
        Self {
            config,
            history: RingBuffer::new(),
            window_sum_ms: 0.0,
            window_len: 0,
            last_direction: None,
            flipflops: 0,
        }
    }

    /// Records one frame duration in seconds.
    ///
    /// Non-finite or non-positive durations are ignored. Returns a signal
    /// when the current window is complete.
    pub fn record_frame(&mut self, dt_seconds: f32) -> Option<FrameSignal> {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return None;
        }
        let ms = dt_seconds * 1000.0;
        self.history.push(ms);
        self.window_sum_ms += ms;
        self.window_len += 1;

        if self.window_len < self.config.sample_window.max(1) {
            return None;
        }

        let avg_fps = 1000.0 * self.window_len as f32 / self.window_sum_ms;
        self.window_sum_ms = 0.0;
        self.window_len = 0;
        Some(self.classify(avg_fps))
    }

    fn classify(&mut self, avg_fps: f32) -> FrameSignal {
        if avg_fps < self.config.fallback_fps {
            log::warn!(
                "FrameRate: window averaged {:.1} fps, below fallback threshold {:.0}.",
                avg_fps,
                self.config.fallback_fps
            );
            self.last_direction = None;
            self.flipflops = 0;
            return FrameSignal::Fallback;
        }

        let signal = if avg_fps < self.config.lower_fps {
            FrameSignal::Decline
        } else if avg_fps >= self.config.upper_fps {
            FrameSignal::Incline
        } else {
            FrameSignal::Steady
        };

        // ── Flip-flop detection ──────────────────────────────────────────
        match (self.last_direction, signal) {
            (_, FrameSignal::Steady) => {
                self.flipflops = 0;
                self.last_direction = None;
            }
            (Some(prev), next) if prev != next => {
                self.flipflops += 1;
                self.last_direction = Some(next);
            }
            _ => self.last_direction = Some(signal),
        }

        if self.flipflops >= self.config.flipflop_limit {
            log::warn!(
                "FrameRate: {} decline/incline alternations, treating as stutter.",
                self.flipflops
            );
            self.last_direction = None;
            self.flipflops = 0;
            return FrameSignal::Fallback;
        }

        log::trace!("FrameRate: window averaged {:.1} fps -> {:?}", avg_fps, signal);
        signal
    }

    /// Measured frame rate over the recent history, `0.0` before the first frame.
    pub fn frame_rate(&self) -> f32 {
        let avg_ms = self.history.average();
        if avg_ms > 0.0 {
            1000.0 / avg_ms
        } else {
            0.0
        }
    }

    /// Forgets all samples and any partial window.
    pub fn reset(&mut self) {
        self.history.clear();
        self.window_sum_ms = 0.0;
        self.window_len = 0;
        self.last_direction = None;
        self.flipflops = 0;
    }
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new(FrameRateConfig::default())
    }
}

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

//! The device profiling service.

use crate::profile::DeviceProfile;
use crossbeam_channel::{Receiver, Sender};
use prism_core::platform::EnvironmentProbe;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Configuration for the [`DeviceProfiler`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Quiet period after the last resize/orientation event before re-profiling.
    pub debounce_ms: u64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self { debounce_ms: 150 }
    }
}

/// Detects the device profile at start-up and after debounced environment changes.
///
/// The profiler does not own a timer or a thread: the host forwards its
/// resize/orientation callbacks to [`notify_environment_changed`] and calls
/// [`tick`] once per frame. Subscribers receive every new profile over a
/// channel, independent of any UI lifecycle.
///
/// [`notify_environment_changed`]: DeviceProfiler::notify_environment_changed
/// [`tick`]: DeviceProfiler::tick
pub struct DeviceProfiler<P: EnvironmentProbe> {
    probe: P,
    debounce: Duration,
    current: Option<DeviceProfile>,
    subscribers: Vec<Sender<DeviceProfile>>,
    pending_since: Option<Instant>,
    running: bool,
}

impl<P: EnvironmentProbe> DeviceProfiler<P> {
    /// Creates a stopped profiler reading from `probe`.
    pub fn new(probe: P, config: ProfilerConfig) -> Self {
        Self {
            probe,
            debounce: Duration::from_millis(config.debounce_ms),
            current: None,
            subscribers: Vec::new(),
            pending_since: None,
            running: false,
        }
    }

    /// Starts the service: profiles the device immediately and publishes the result.
    ///
    /// Calling `start` on a running profiler returns the current profile unchanged.
    pub fn start(&mut self) -> DeviceProfile {
        if let (true, Some(profile)) = (self.running, self.current) {
            return profile;
        }
        self.running = true;
        let profile = DeviceProfile::classify(&self.probe.read());
        log::info!(
            "DeviceProfiler started: mobile={}, tablet={}, gpu={:?}, dpr={:.2}",
            profile.mobile,
            profile.tablet,
            profile.gpu_tier,
            profile.pixel_ratio
        );
        self.current = Some(profile);
        self.publish(profile);
        profile
    }

    /// Stops the service. Pending changes are discarded and every
    /// subscription channel is disconnected.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pending_since = None;
        self.subscribers.clear();
        log::info!("DeviceProfiler stopped.");
    }

    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Opens a subscription. The current profile, if any, is delivered first.
    pub fn subscribe(&mut self) -> Receiver<DeviceProfile> {
        let (tx, rx) = crossbeam_channel::unbounded();
        if let Some(profile) = self.current {
            let _ = tx.send(profile);
        }
        self.subscribers.push(tx);
        rx
    }

    /// Records a resize or orientation change. Each call restarts the debounce window.
    pub fn notify_environment_changed(&mut self, now: Instant) {
        if self.running {
            log::trace!("DeviceProfiler: environment change noted.");
            self.pending_since = Some(now);
        }
    }

    /// Re-profiles once the debounce window has elapsed without further changes.
    ///
    /// Returns the new profile when it differs from the previous one.
    pub fn tick(&mut self, now: Instant) -> Option<DeviceProfile> {
        let since = self.pending_since?;
        if !self.running || now.saturating_duration_since(since) < self.debounce {
            return None;
        }
        self.pending_since = None;

        let profile = DeviceProfile::classify(&self.probe.read());
        if self.current == Some(profile) {
            return None;
        }
        log::info!(
            "DeviceProfiler: profile changed (mobile={}, tablet={}, gpu={:?}, {}x{})",
            profile.mobile,
            profile.tablet,
            profile.gpu_tier,
            profile.viewport.width,
            profile.viewport.height
        );
        self.current = Some(profile);
        self.publish(profile);
        Some(profile)
    }

    /// Returns the latest profile, `None` before the first start.
    pub fn current(&self) -> Option<DeviceProfile> {
        self.current
    }

    fn publish(&mut self, profile: DeviceProfile) {
        // Dropped receivers unsubscribe implicitly.
        self.subscribers.retain(|tx| tx.send(profile).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::GpuTier;
    use prism_core::platform::{EnvironmentReading, SharedProbe, Viewport};

    fn desktop_probe() -> SharedProbe {
        SharedProbe::new(EnvironmentReading {
            viewport: Viewport::new(1440.0, 900.0, 2.0),
            ..Default::default()
        })
    }

    #[test]
    fn test_start_publishes_initial_profile() {
        let mut profiler = DeviceProfiler::new(desktop_probe(), ProfilerConfig::default());
        let rx = profiler.subscribe();
        let profile = profiler.start();
        assert_eq!(profile.gpu_tier, GpuTier::High);
        assert_eq!(rx.try_recv().unwrap(), profile);
        assert!(profiler.is_running());
    }

    #[test]
    fn test_resize_is_debounced() {
        let probe = desktop_probe();
        let mut profiler = DeviceProfiler::new(probe.clone(), ProfilerConfig::default());
        profiler.start();
        let rx = profiler.subscribe();
        let _initial = rx.try_recv().unwrap();

        let t0 = Instant::now();
        probe.set_viewport(Viewport::new(390.0, 844.0, 3.0));
        profiler.notify_environment_changed(t0);
        profiler.notify_environment_changed(t0 + Duration::from_millis(100));

        // 150 ms after the first event but only 50 ms after the last one.
        assert!(profiler.tick(t0 + Duration::from_millis(150)).is_none());
        assert!(rx.try_recv().is_err());

        let changed = profiler.tick(t0 + Duration::from_millis(260)).unwrap();
        assert!(changed.mobile);
        assert_eq!(rx.try_recv().unwrap(), changed);
    }

    #[test]
    fn test_unchanged_profile_is_not_republished() {
        let mut profiler = DeviceProfiler::new(desktop_probe(), ProfilerConfig::default());
        profiler.start();
        let rx = profiler.subscribe();
        let _ = rx.try_recv();

        let t0 = Instant::now();
        profiler.notify_environment_changed(t0);
        assert!(profiler.tick(t0 + Duration::from_millis(200)).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_disconnects_and_ignores_changes() {
        let mut profiler = DeviceProfiler::new(desktop_probe(), ProfilerConfig::default());
        profiler.start();
        let rx = profiler.subscribe();
        let _ = rx.try_recv();
        profiler.stop();

        let t0 = Instant::now();
        profiler.notify_environment_changed(t0);
        assert!(profiler.tick(t0 + Duration::from_secs(1)).is_none());
        assert!(matches!(
            rx.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_restart_after_stop_reprofiles() {
        let probe = desktop_probe();
        let mut profiler = DeviceProfiler::new(probe.clone(), ProfilerConfig::default());
        profiler.start();
        profiler.stop();
        probe.set_viewport(Viewport::new(900.0, 1200.0, 2.0));
        let profile = profiler.start();
        assert!(profile.tablet);
    }
}

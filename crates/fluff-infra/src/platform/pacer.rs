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

//! Frame-rate capping and frame-time measurement.

use fluff_core::Stopwatch;
use std::time::Duration;

/// Sleeps at the end of each frame so frames last at least the target
/// duration, and records how long the last frame actually took.
#[derive(Debug, Clone)]
pub struct FramePacer {
    target: Option<Duration>,
    stopwatch: Stopwatch,
    frame_time: Duration,
}

impl FramePacer {
    /// Creates an uncapped pacer.
    pub fn new() -> Self {
        Self {
            target: None,
            stopwatch: Stopwatch::new(),
            frame_time: Duration::ZERO,
        }
    }

    /// Caps the frame rate at `fps`; `0` removes the cap.
    pub fn set_frame_rate_limit(&mut self, fps: u32) {
        self.target = (fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(fps)));
    }

    /// The minimum frame duration, if capped.
    pub fn target(&self) -> Option<Duration> {
        self.target
    }

    /// Ends the current frame: sleeps out the remainder of the target
    /// duration, then starts timing the next frame.
    ///
    /// Returns the duration of the frame that just ended.
    pub fn end_frame(&mut self) -> Duration {
        if let Some(target) = self.target {
            let elapsed = self.stopwatch.elapsed();
            if elapsed < target {
                std::thread::sleep(target - elapsed);
            }
        }
        self.frame_time = self.stopwatch.lap();
        self.frame_time
    }

    /// Restarts timing without ending a frame, e.g. after the surface was
    /// recreated.
    pub fn restart(&mut self) {
        self.stopwatch.lap();
        self.frame_time = Duration::ZERO;
    }

    /// Duration of the last completed frame, in seconds.
    pub fn frame_time_secs(&self) -> f32 {
        self.frame_time.as_secs_f32()
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

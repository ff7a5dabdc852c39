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

//! Timing primitives and the frame clock subsystem.

use crate::registry::RegistryLink;
use crate::subsystem::{Subsystem, SubsystemKind, SystemId};
use std::time::{Duration, Instant};

/// A monotonic stopwatch started on creation.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts counting immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Elapsed time in seconds.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Restarts the stopwatch and returns the time elapsed before the restart.
    pub fn restart(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.start_time;
        self.start_time = now;
        elapsed
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// The frame clock. Ticked first every frame.
#[derive(Debug)]
pub struct FrameTimer {
    registry: RegistryLink,
    clock: Stopwatch,
    since_last_tick: Stopwatch,
    delta: Duration,
    frame_count: u64,
}

impl FrameTimer {
    /// Creates a frame clock starting now.
    pub fn new(registry: RegistryLink) -> Self {
        Self {
            registry,
            clock: Stopwatch::new(),
            since_last_tick: Stopwatch::new(),
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Records the start of a new frame.
    pub fn tick(&mut self) {
        self.delta = self.since_last_tick.restart();
        self.frame_count += 1;
    }

    /// Time between the two most recent ticks.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// [`delta`](Self::delta) in seconds, the unit game logic usually wants.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since the clock was created.
    pub fn total_elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since the clock was created.
    pub fn average_fps(&self) -> f64 {
        let secs = self.clock.elapsed_secs_f64();
        if secs > 0.0 {
            self.frame_count as f64 / secs
        } else {
            0.0
        }
    }
}

impl Subsystem for FrameTimer {
    fn identity(&self) -> SystemId {
        SystemId::Timer
    }

    fn process_frame(&mut self) {
        self.tick();
        log::trace!(
            "Frame {} started ({:.3} ms since previous).",
            self.frame_count,
            self.delta.as_secs_f64() * 1000.0
        );
    }

    fn registry(&self) -> &RegistryLink {
        &self.registry
    }
}

impl SubsystemKind for FrameTimer {
    const ID: SystemId = SystemId::Timer;
}

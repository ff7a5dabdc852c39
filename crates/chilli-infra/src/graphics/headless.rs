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

//! A graphics backend that presents nowhere.
//!
//! Used by the sandbox and by tests that need a full frame loop without a GPU.

use chilli_core::GraphicsBackend;
use std::cell::Cell;
use std::rc::Rc;

/// Counters shared between a [`HeadlessBackend`] and whoever inspects it.
#[derive(Debug, Default)]
pub struct HeadlessStats {
    frames: Cell<u64>,
    resizes: Cell<u64>,
    size: Cell<(u32, u32)>,
}

impl HeadlessStats {
    /// Frames presented.
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    /// Resize calls received.
    pub fn resizes(&self) -> u64 {
        self.resizes.get()
    }

    /// Last surface size.
    pub fn size(&self) -> (u32, u32) {
        self.size.get()
    }
}

/// A [`GraphicsBackend`] that only keeps books.
#[derive(Debug)]
pub struct HeadlessBackend {
    stats: Rc<HeadlessStats>,
    in_frame: bool,
}

impl HeadlessBackend {
    /// Creates a backend with an initial surface size.
    pub fn new(width: u32, height: u32) -> Self {
        let stats = HeadlessStats::default();
        stats.size.set((width, height));
        Self {
            stats: Rc::new(stats),
            in_frame: false,
        }
    }

    /// A handle to the backend's counters, valid after the backend is boxed.
    pub fn stats(&self) -> Rc<HeadlessStats> {
        Rc::clone(&self.stats)
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn begin_frame(&mut self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.in_frame, "begin_frame called twice without end_frame");
        self.in_frame = true;
        Ok(())
    }

    fn end_frame(&mut self) -> anyhow::Result<()> {
        anyhow::ensure!(self.in_frame, "end_frame called without begin_frame");
        self.in_frame = false;
        self.stats.frames.set(self.stats.frames.get() + 1);
        log::trace!("Headless frame {} presented.", self.stats.frames.get());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        anyhow::ensure!(width > 0 && height > 0, "cannot resize surface to {width}x{height}");
        self.stats.size.set((width, height));
        self.stats.resizes.set(self.stats.resizes.get() + 1);
        Ok(())
    }
}

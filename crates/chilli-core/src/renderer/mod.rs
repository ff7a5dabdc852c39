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

//! The presentation subsystem and the graphics backend it drives.
//!
//! The backend is an external collaborator: device creation, swapchains and
//! draw calls all live behind [`GraphicsBackend`]. The [`Renderer`] only owns
//! the per-frame begin/end contract and keeps the backend's surface in sync
//! with window resizes received over the [`EventBus`](crate::EventBus).

use crate::event::{EngineEvent, EventBus, EventKind};
use crate::registry::RegistryLink;
use crate::subsystem::{Subsystem, SubsystemKind, SystemId};
use anyhow::anyhow;
use std::cell::RefCell;
use std::rc::Rc;

/// The boundary between the renderer and a concrete graphics API.
pub trait GraphicsBackend {
    /// Human-readable backend name, for logs.
    fn name(&self) -> &str;

    /// Prepares the back buffer for a new frame.
    fn begin_frame(&mut self) -> anyhow::Result<()>;

    /// Submits and presents the frame.
    fn end_frame(&mut self) -> anyhow::Result<()>;

    /// Resizes the presentation surface.
    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<()>;
}

/// Surface size shared between the renderer and its resize handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Surface {
    width: u32,
    height: u32,
}

/// Presentation subsystem. Ticked last so it observes the settled frame.
pub struct Renderer {
    registry: RegistryLink,
    backend: Rc<RefCell<Box<dyn GraphicsBackend>>>,
    surface: Rc<RefCell<Surface>>,
    frames_presented: u64,
    failed_frames: u64,
}

impl Renderer {
    /// Creates a renderer presenting through `backend` at the given size.
    pub fn new(
        registry: RegistryLink,
        backend: Box<dyn GraphicsBackend>,
        width: u32,
        height: u32,
    ) -> Self {
        log::info!(
            "Renderer created on '{}' backend ({}x{}).",
            backend.name(),
            width,
            height
        );
        Self {
            registry,
            backend: Rc::new(RefCell::new(backend)),
            surface: Rc::new(RefCell::new(Surface { width, height })),
            frames_presented: 0,
            failed_frames: 0,
        }
    }

    /// Current surface size as `(width, height)`.
    pub fn surface_size(&self) -> (u32, u32) {
        let surface = self.surface.borrow();
        (surface.width, surface.height)
    }

    /// Number of frames presented without a backend error.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of frames the backend failed to present.
    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    fn present(&mut self) -> anyhow::Result<()> {
        let mut backend = self.backend.borrow_mut();
        backend.begin_frame()?;
        backend.end_frame()
    }
}

impl Subsystem for Renderer {
    fn identity(&self) -> SystemId {
        SystemId::Renderer
    }

    fn init(&mut self) -> anyhow::Result<()> {
        let bus = self
            .registry
            .resolve::<EventBus>()
            .ok_or_else(|| anyhow!("failed to resolve event system dependency"))?;

        let backend = Rc::clone(&self.backend);
        let surface = Rc::clone(&self.surface);
        bus.borrow_mut()
            .subscribe(&[EventKind::WindowResized], move |event, _| {
                let EngineEvent::WindowResized { width, height } = *event else {
                    return Ok(());
                };
                let mut current = surface.borrow_mut();
                if current.width == width && current.height == height {
                    return Ok(());
                }
                backend.borrow_mut().resize(width, height)?;
                *current = Surface { width, height };
                log::info!("Window resize handled by renderer - width: {width} height: {height}");
                Ok(())
            });
        Ok(())
    }

    fn process_frame(&mut self) {
        match self.present() {
            Ok(()) => self.frames_presented += 1,
            Err(e) => {
                self.failed_frames += 1;
                log::error!("Rendering error: {e:#}");
            }
        }
    }

    fn registry(&self) -> &RegistryLink {
        &self.registry
    }
}

impl SubsystemKind for Renderer {
    const ID: SystemId = SystemId::Renderer;
}

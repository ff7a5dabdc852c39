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

use crate::error::EngineError;
use chilli_core::{
    EngineConfig, EngineEvent, EventBus, EventSender, FrameState, FrameTimer, GraphicsBackend,
    RegistryLink, Renderer, SubsystemKind, SubsystemRegistry, SystemId,
};
use chilli_infra::{HeadlessBackend, WindowBridge};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed; application subsystems may still be registered.
    Uninitialized,
    /// Every subsystem is registered and has run `init`.
    Initialized,
    /// The tick loop is running.
    Running,
    /// Shutdown was observed; `update` keeps returning `false`.
    Terminated,
}

/// A thread-safe flag that stops the engine before its next tick.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Asks the engine to stop.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The frame driver.
///
/// Each tick runs every registered subsystem once, ordered by
/// [`FrameStage`](chilli_core::FrameStage): the clock advances, the event bus
/// drains, logic runs, and the renderer presents last.
pub struct Engine {
    config: EngineConfig,
    state: EngineState,
    registry: Rc<SubsystemRegistry>,
    event_bus: Option<Rc<RefCell<EventBus>>>,
    shutdown: ShutdownHandle,
    degraded: Vec<SystemId>,
    frame_count: u64,
}

impl Engine {
    /// Creates an uninitialized engine with an empty registry.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
            registry: Rc::new(SubsystemRegistry::new()),
            event_bus: None,
            shutdown: ShutdownHandle::default(),
            degraded: Vec::new(),
            frame_count: 0,
        }
    }

    /// A link application subsystems keep to resolve their dependencies.
    pub fn registry_link(&self) -> RegistryLink {
        self.registry.link()
    }

    /// The registry owned by this engine.
    pub fn registry(&self) -> &SubsystemRegistry {
        &self.registry
    }

    /// Registers an application-defined subsystem.
    ///
    /// Only allowed before [`init`](Self::init), so every subsystem exists by
    /// the time dependencies are resolved.
    pub fn register<T: SubsystemKind>(
        &mut self,
        subsystem: Rc<RefCell<T>>,
    ) -> Result<(), EngineError> {
        self.expect_state(EngineState::Uninitialized)?;
        self.registry.add(subsystem)?;
        Ok(())
    }

    /// Builds and registers the core subsystems, then initialises everything.
    ///
    /// Subsystems are registered as timer, event bus, renderer, after any
    /// application subsystems. `init` then runs on each in registration
    /// order. A failing `init` leaves the subsystem degraded unless its
    /// identity is listed in [`EngineConfig::critical_systems`].
    ///
    /// If registration or a critical `init` fails, the engine moves to
    /// [`EngineState::Terminated`]: the registry is partially populated and
    /// cannot be initialized again.
    pub fn init(&mut self, backend: Box<dyn GraphicsBackend>) -> Result<(), EngineError> {
        self.expect_state(EngineState::Uninitialized)?;
        let result = self.init_subsystems(backend);
        if let Err(e) = &result {
            self.terminate(&format!("initialization failed: {e}"));
        }
        result
    }

    fn init_subsystems(&mut self, backend: Box<dyn GraphicsBackend>) -> Result<(), EngineError> {
        let window = &self.config.window;
        log::info!(
            "Initializing engine for '{}' ({}x{})...",
            window.title,
            window.width,
            window.height
        );

        let timer = Rc::new(RefCell::new(FrameTimer::new(self.registry.link())));
        let event_bus = Rc::new(RefCell::new(
            EventBus::new(self.registry.link()).with_screen_size(window.width, window.height),
        ));
        let renderer = Rc::new(RefCell::new(Renderer::new(
            self.registry.link(),
            backend,
            window.width,
            window.height,
        )));

        self.registry.add(timer)?;
        self.registry.add(Rc::clone(&event_bus))?;
        self.registry.add(renderer)?;
        self.event_bus = Some(event_bus);

        for (id, subsystem) in self.registry.registration_order() {
            let outcome = subsystem.borrow_mut().init();
            match outcome {
                Ok(()) => log::debug!("{id} initialized."),
                Err(e) if self.config.is_critical(id) => {
                    log::error!("Critical subsystem {id} failed to initialize: {e:#}");
                    return Err(EngineError::CriticalInitFailure {
                        id,
                        reason: format!("{e:#}"),
                    });
                }
                Err(e) => {
                    log::error!("{id} failed to initialize, running degraded: {e:#}");
                    self.degraded.push(id);
                }
            }
        }

        self.state = EngineState::Initialized;
        log::info!(
            "Chilli Engine initialized successfully ({} subsystems, {} degraded).",
            self.registry.len(),
            self.degraded.len()
        );
        Ok(())
    }

    /// [`init`](Self::init) with a [`HeadlessBackend`] sized from the config.
    pub fn init_headless(&mut self) -> Result<(), EngineError> {
        let window = &self.config.window;
        let backend = HeadlessBackend::new(window.width, window.height);
        self.init(Box::new(backend))
    }

    /// Runs one frame. Returns `false` once the engine should stop.
    ///
    /// The engine stops after a [`ShutdownHandle::request`], after a drained
    /// [`EngineEvent::WindowClosed`], or once `max_frames` frames have run.
    pub fn update(&mut self) -> bool {
        match self.state {
            EngineState::Uninitialized => {
                log::error!("Engine::update called before init.");
                return false;
            }
            EngineState::Terminated => return false,
            EngineState::Initialized => {
                log::info!("Engine starting main loop...");
                self.state = EngineState::Running;
            }
            EngineState::Running => {}
        }

        if self.shutdown.is_requested() {
            self.terminate("shutdown requested");
            return false;
        }
        if self.frame_limit_reached() {
            self.terminate("frame limit reached");
            return false;
        }

        self.tick();

        if self.close_requested() {
            self.terminate("window closed");
            false
        } else if self.frame_limit_reached() {
            self.terminate("frame limit reached");
            false
        } else {
            true
        }
    }

    /// Runs frames until [`update`](Self::update) returns `false`.
    pub fn run(&mut self) -> u64 {
        while self.update() {}
        self.frame_count
    }

    /// Queues an event on the bus, as the window layer does for native input.
    ///
    /// Events raised before `init` are dropped with a warning.
    pub fn raise_event(&self, event: EngineEvent) {
        match &self.event_bus {
            Some(bus) => bus.borrow().push(event),
            None => log::warn!("Dropping {} event raised before init.", event.kind()),
        }
    }

    /// A producer handle onto the bus, available after `init`.
    pub fn event_sender(&self) -> Option<EventSender> {
        self.event_bus.as_ref().map(|bus| bus.borrow().sender())
    }

    /// A bridge translating `winit` window events onto the bus.
    pub fn window_bridge(&self) -> Option<WindowBridge> {
        self.event_sender().map(WindowBridge::new)
    }

    /// A snapshot of the bus's shared frame state, available after `init`.
    pub fn frame_state(&self) -> Option<FrameState> {
        self.event_bus
            .as_ref()
            .map(|bus| bus.borrow().frame_state().clone())
    }

    /// A handle that stops the engine before its next tick.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Stops the engine before its next tick.
    pub fn request_shutdown(&self) {
        self.shutdown.request();
    }

    /// The current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Subsystems whose `init` failed.
    pub fn degraded(&self) -> &[SystemId] {
        &self.degraded
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn tick(&mut self) {
        for (id, subsystem) in self.registry.frame_order() {
            match subsystem.try_borrow_mut() {
                Ok(mut subsystem) => subsystem.process_frame(),
                Err(_) => log::error!("{id} is borrowed elsewhere, skipping its frame."),
            }
        }
        self.frame_count += 1;
    }

    fn frame_limit_reached(&self) -> bool {
        self.config
            .max_frames
            .is_some_and(|max| self.frame_count >= max)
    }

    fn close_requested(&self) -> bool {
        self.event_bus
            .as_ref()
            .is_some_and(|bus| bus.borrow().frame_state().close_requested())
    }

    fn terminate(&mut self, reason: &str) {
        log::info!(
            "Engine loop finished after {} frames: {reason}.",
            self.frame_count
        );
        self.state = EngineState::Terminated;
    }

    fn expect_state(&self, expected: EngineState) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                current: self.state,
                expected,
            })
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        log::info!("Engine is being dropped. Releasing subsystems...");
    }
}

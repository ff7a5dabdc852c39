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

use super::types::{EngineEvent, EventKind, MouseButton};
use crate::registry::RegistryLink;
use crate::subsystem::{Subsystem, SubsystemKind, SystemId};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

type Handler = Rc<RefCell<dyn FnMut(&EngineEvent, &FrameState) -> anyhow::Result<()>>>;

/// Scratch state owned by the bus and refreshed as events are drained.
///
/// The bus applies each event to this state *before* invoking that event's
/// subscribers, so handlers always see it up to date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameState {
    screen_width: u32,
    screen_height: u32,
    mouse_x: f32,
    mouse_y: f32,
    close_requested: bool,
    pressed_buttons: HashSet<MouseButton>,
}

impl FrameState {
    /// Latest known client size as `(width, height)`.
    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Latest known cursor position as `(x, y)`.
    pub fn cursor_position(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }

    /// Whether a [`EngineEvent::WindowClosed`] has been drained.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Whether `button` is currently held down.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    fn apply(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::WindowResized { width, height } => {
                self.screen_width = *width;
                self.screen_height = *height;
            }
            EngineEvent::WindowClosed => self.close_requested = true,
            EngineEvent::MouseMoved { x, y } => {
                self.mouse_x = *x;
                self.mouse_y = *y;
            }
            EngineEvent::MouseButtonPressed { button } => {
                self.pressed_buttons.insert(*button);
            }
            EngineEvent::MouseButtonReleased { button } => {
                self.pressed_buttons.remove(button);
            }
            EngineEvent::MouseWheelScrolled { .. }
            | EngineEvent::KeyPressed { .. }
            | EngineEvent::KeyReleased { .. } => {}
        }
    }
}

/// What a single drain did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Events taken off the queue.
    pub events: usize,
    /// Handler invocations, successful or not.
    pub invocations: usize,
    /// Handlers that returned an error or panicked.
    pub failures: usize,
}

/// A cloneable producer handle onto an [`EventBus`] queue.
///
/// This is how the windowing layer feeds native input into the engine, and
/// how handlers raise follow-up events while a drain is running.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: flume::Sender<EngineEvent>,
}

impl EventSender {
    /// Queues an event for the next drain, logging an error if the bus is gone.
    pub fn push(&self, event: EngineEvent) {
        log::trace!("Queueing {} event.", event.kind());
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to queue event: {e}. EventBus likely dropped.");
        }
    }

    /// Returns `true` while the owning bus is alive.
    pub fn is_connected(&self) -> bool {
        !self.sender.is_disconnected()
    }
}

/// The engine's frame-synchronous event bus.
///
/// Events are queued on an unbounded channel and dispatched when the bus is
/// drained, once per frame. For each event, in push order, every handler
/// subscribed to the event's kind runs in subscription order. A handler that
/// fails is logged and skipped; the rest of the drain carries on.
///
/// Handlers run while the bus is mutably borrowed, so they must not reach back
/// into it. To raise an event from a handler, capture an [`EventSender`].
pub struct EventBus {
    registry: RegistryLink,
    sender: flume::Sender<EngineEvent>,
    receiver: flume::Receiver<EngineEvent>,
    subscribers: HashMap<EventKind, Vec<Handler>>,
    frame_state: FrameState,
    last_report: DrainReport,
}

impl EventBus {
    /// Creates an empty bus with an unbounded queue.
    pub fn new(registry: RegistryLink) -> Self {
        let (sender, receiver) = flume::unbounded();
        log::info!("EventBus initialized.");
        Self {
            registry,
            sender,
            receiver,
            subscribers: HashMap::new(),
            frame_state: FrameState::default(),
            last_report: DrainReport::default(),
        }
    }

    /// Seeds the shared screen size, usually from the window configuration.
    #[must_use]
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.frame_state.screen_width = width;
        self.frame_state.screen_height = height;
        self
    }

    /// Registers `handler` for every kind in `kinds`.
    ///
    /// The same handler instance is shared across the listed kinds. Nothing is
    /// deduplicated: listing a kind twice delivers its events twice.
    pub fn subscribe<F>(&mut self, kinds: &[EventKind], handler: F)
    where
        F: FnMut(&EngineEvent, &FrameState) -> anyhow::Result<()> + 'static,
    {
        let handler: Handler = Rc::new(RefCell::new(handler));
        for kind in kinds {
            self.subscribers
                .entry(*kind)
                .or_default()
                .push(Rc::clone(&handler));
            log::debug!("EventBus: new subscriber for {kind}.");
        }
    }

    /// Queues an event for the next drain.
    pub fn push(&self, event: EngineEvent) {
        log::trace!("Queueing {} event.", event.kind());
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to queue event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a producer handle for code outside the frame loop.
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Dispatches every event queued before this call.
    ///
    /// Events queued by handlers during the drain are left for the next call.
    pub fn drain(&mut self) -> DrainReport {
        // `drain` snapshots the channel, later sends stay queued.
        let batch: Vec<EngineEvent> = self.receiver.drain().collect();
        let mut report = DrainReport::default();

        for event in &batch {
            report.events += 1;
            self.frame_state.apply(event);

            let Some(handlers) = self.subscribers.get(&event.kind()) else {
                continue;
            };
            for handler in handlers {
                report.invocations += 1;
                if let Err(reason) = invoke(handler, event, &self.frame_state) {
                    report.failures += 1;
                    log::error!("EventBus: {} handler failed: {reason}", event.kind());
                }
            }
        }

        if report.events > 0 {
            log::trace!(
                "EventBus drained {} events ({} handler calls, {} failures).",
                report.events,
                report.invocations,
                report.failures
            );
        }
        self.last_report = report;
        report
    }

    /// Returns the shared frame state.
    pub fn frame_state(&self) -> &FrameState {
        &self.frame_state
    }

    /// Returns the report of the most recent drain.
    pub fn last_report(&self) -> DrainReport {
        self.last_report
    }

    /// Returns the number of events waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the number of handlers subscribed to `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending())
            .field("subscribed_kinds", &self.subscribers.len())
            .field("frame_state", &self.frame_state)
            .finish()
    }
}

impl Subsystem for EventBus {
    fn identity(&self) -> SystemId {
        SystemId::EventSystem
    }

    fn process_frame(&mut self) {
        self.drain();
    }

    fn registry(&self) -> &RegistryLink {
        &self.registry
    }
}

impl SubsystemKind for EventBus {
    const ID: SystemId = SystemId::EventSystem;
}

fn invoke(handler: &Handler, event: &EngineEvent, state: &FrameState) -> Result<(), String> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut callback = handler.borrow_mut();
        (&mut *callback)(event, state)
    }));
    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

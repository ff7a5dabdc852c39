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

// Chilli Engine Sandbox
// Runs the frame loop headless, with a scripted window feeding input.

use anyhow::{Context, Result};
use chilli_sdk::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Stands in for the native message pump: raises window events from outside
/// the frame loop.
struct SimulatedWindow {
    sender: EventSender,
    width: u32,
    height: u32,
    close_after: u64,
}

impl SimulatedWindow {
    fn pump(&mut self, frame: u64) {
        let t = frame as f32 * 0.05;
        self.sender.push(EngineEvent::MouseMoved {
            x: self.width as f32 * (0.5 + 0.4 * t.cos()),
            y: self.height as f32 * (0.5 + 0.4 * t.sin()),
        });

        if frame % 90 == 0 {
            self.sender.push(EngineEvent::MouseButtonPressed {
                button: MouseButton::Left,
            });
        } else if frame % 90 == 10 {
            self.sender.push(EngineEvent::MouseButtonReleased {
                button: MouseButton::Left,
            });
        }

        if frame % 150 == 0 {
            self.width += 64;
            self.height += 36;
            self.sender.push(EngineEvent::WindowResized {
                width: self.width,
                height: self.height,
            });
        }

        if frame == self.close_after {
            log::info!("Simulated window closing.");
            self.sender.push(EngineEvent::WindowClosed);
        }
    }
}

/// Application subsystem reporting what the cursor does.
struct CursorTracker {
    registry: RegistryLink,
    clicks: Rc<Cell<u32>>,
    report_every: u64,
}

impl Subsystem for CursorTracker {
    fn identity(&self) -> SystemId {
        SystemId::Input
    }

    fn init(&mut self) -> anyhow::Result<()> {
        let bus = self
            .registry
            .resolve::<EventBus>()
            .context("cursor tracker needs the event system")?;

        let clicks = Rc::clone(&self.clicks);
        bus.borrow_mut()
            .subscribe(&[EventKind::MouseButtonPressed], move |event, state| {
                clicks.set(clicks.get() + 1);
                let (x, y) = state.cursor_position();
                log::info!("{event:?} at ({x:.0}, {y:.0})");
                Ok(())
            });
        Ok(())
    }

    fn process_frame(&mut self) {
        let Some(timer) = self.registry.resolve::<FrameTimer>() else {
            return;
        };
        let frame = timer.borrow().frame_count();
        if frame % self.report_every != 0 {
            return;
        }
        if let Some(bus) = self.registry.resolve::<EventBus>() {
            let bus = bus.borrow();
            let state = bus.frame_state();
            let (x, y) = state.cursor_position();
            let (w, h) = state.screen_size();
            log::info!(
                "Frame {frame}: cursor ({x:.0}, {y:.0}) in {w}x{h}, left button down: {}, clicks: {}",
                state.is_button_down(MouseButton::Left),
                self.clicks.get()
            );
        }
    }

    fn registry(&self) -> &RegistryLink {
        &self.registry
    }
}

impl SubsystemKind for CursorTracker {
    const ID: SystemId = SystemId::Input;
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig {
            max_frames: Some(600),
            ..EngineConfig::default()
        },
    };

    Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str())).init();

    let mut engine = Engine::new(config);
    let tracker = CursorTracker {
        registry: engine.registry_link(),
        clicks: Rc::new(Cell::new(0)),
        report_every: 60,
    };
    engine.register(Rc::new(RefCell::new(tracker)))?;
    engine.init_headless()?;

    let window_config = &engine.config().window;
    let mut window = SimulatedWindow {
        sender: engine
            .event_sender()
            .context("event system missing after init")?,
        width: window_config.width,
        height: window_config.height,
        close_after: 480,
    };

    while engine.update() {
        window.pump(engine.frame_count());
    }

    if let Some(timer) = engine.registry().resolve::<FrameTimer>() {
        let timer = timer.borrow();
        log::info!(
            "Ran {} frames in {:.2?} ({:.1} FPS average).",
            timer.frame_count(),
            timer.total_elapsed(),
            timer.average_fps()
        );
    }
    Ok(())
}

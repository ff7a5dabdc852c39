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

//! Integration tests for the frame driver.
//!
//! These tests run the full init → update → terminate cycle with a headless
//! backend and a observer subsystem that inspects its neighbours every frame.

use chilli_core::RegistryError;
use chilli_sdk::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

/// What the observer saw during one of its frames.
#[derive(Debug, Clone, PartialEq)]
struct Observation {
    timer_frame: u64,
    frames_presented: u64,
    pending_events: usize,
    cursor: (f32, f32),
}

/// An `Input`-stage subsystem that records the state of the core subsystems.
struct Observer {
    registry: RegistryLink,
    seen: Rc<RefCell<Vec<Observation>>>,
    fail_init: bool,
}

impl Observer {
    fn new(
        engine: &Engine,
        fail_init: bool,
    ) -> (Rc<RefCell<Self>>, Rc<RefCell<Vec<Observation>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let observer = Observer {
            registry: engine.registry_link(),
            seen: Rc::clone(&seen),
            fail_init,
        };
        (Rc::new(RefCell::new(observer)), seen)
    }
}

impl Subsystem for Observer {
    fn identity(&self) -> SystemId {
        SystemId::Input
    }

    fn init(&mut self) -> anyhow::Result<()> {
        if self.fail_init {
            anyhow::bail!("input device missing");
        }
        Ok(())
    }

    fn process_frame(&mut self) {
        let timer = self.registry.resolve::<FrameTimer>().unwrap();
        let bus = self.registry.resolve::<EventBus>().unwrap();
        let renderer = self.registry.resolve::<Renderer>().unwrap();

        let bus = bus.borrow();
        self.seen.borrow_mut().push(Observation {
            timer_frame: timer.borrow().frame_count(),
            frames_presented: renderer.borrow().frames_presented(),
            pending_events: bus.pending(),
            cursor: bus.frame_state().cursor_position(),
        });
    }

    fn registry(&self) -> &RegistryLink {
        &self.registry
    }
}

impl SubsystemKind for Observer {
    const ID: SystemId = SystemId::Input;
}

/// Claims the Timer identity, colliding with the engine's own clock.
struct RogueTimer {
    registry: RegistryLink,
}

impl Subsystem for RogueTimer {
    fn identity(&self) -> SystemId {
        SystemId::Timer
    }
    fn process_frame(&mut self) {}
    fn registry(&self) -> &RegistryLink {
        &self.registry
    }
}

impl SubsystemKind for RogueTimer {
    const ID: SystemId = SystemId::Timer;
}

fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.window.width = 640;
    config.window.height = 480;
    config
}

#[test]
fn test_subsystems_tick_in_stage_order() {
    let mut engine = Engine::new(config());
    let (observer, seen) = Observer::new(&engine, false);
    engine.register(observer).unwrap();
    engine.init_headless().unwrap();

    // The observer registered first but still runs after the clock and before
    // presentation.
    assert_eq!(engine.registry().identities()[0], SystemId::Input);
    for _ in 0..3 {
        assert!(engine.update());
    }

    let frames: Vec<(u64, u64)> = seen
        .borrow()
        .iter()
        .map(|o| (o.timer_frame, o.frames_presented))
        .collect();
    assert_eq!(frames, vec![(1, 0), (2, 1), (3, 2)]);
}

#[test]
fn test_events_are_drained_before_logic_runs() {
    let mut engine = Engine::new(config());
    let (observer, seen) = Observer::new(&engine, false);
    engine.register(observer).unwrap();
    engine.init_headless().unwrap();

    engine.raise_event(EngineEvent::MouseMoved { x: 5.0, y: 7.0 });
    assert!(engine.update());

    let seen = seen.borrow();
    assert_eq!(seen[0].pending_events, 0);
    assert_eq!(seen[0].cursor, (5.0, 7.0));
}

#[test]
fn test_window_resize_reaches_renderer_and_frame_state() {
    let mut engine = Engine::new(config());
    let backend = HeadlessBackend::new(640, 480);
    let stats = backend.stats();
    engine.init(Box::new(backend)).unwrap();

    engine.raise_event(EngineEvent::WindowResized {
        width: 800,
        height: 600,
    });
    assert!(engine.update());

    assert_eq!(stats.size(), (800, 600));
    assert_eq!(stats.resizes(), 1);
    assert_eq!(stats.frames(), 1);
    assert_eq!(engine.frame_state().unwrap().screen_size(), (800, 600));

    let renderer = engine.registry().resolve::<Renderer>().unwrap();
    assert_eq!(renderer.borrow().surface_size(), (800, 600));
}

#[test]
fn test_window_close_terminates_after_the_frame() {
    let mut engine = Engine::new(config());
    engine.init_headless().unwrap();

    let sender = engine.event_sender().unwrap();
    assert!(engine.update());
    sender.push(EngineEvent::WindowClosed);

    assert!(!engine.update());
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.frame_count(), 2);
}

#[test]
fn test_max_frames_bounds_the_run() {
    let mut config = config();
    config.max_frames = Some(5);
    let mut engine = Engine::new(config);
    engine.init_headless().unwrap();

    assert_eq!(engine.run(), 5);
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn test_zero_max_frames_runs_nothing() {
    let mut config = config();
    config.max_frames = Some(0);
    let mut engine = Engine::new(config);
    let backend = HeadlessBackend::new(640, 480);
    let stats = backend.stats();
    engine.init(Box::new(backend)).unwrap();

    assert_eq!(engine.run(), 0);
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(stats.frames(), 0);
    let timer = engine.registry().resolve::<FrameTimer>().unwrap();
    assert_eq!(timer.borrow().frame_count(), 0);
}

#[test]
fn test_shutdown_from_another_thread() {
    let mut engine = Engine::new(config());
    engine.init_headless().unwrap();
    assert!(engine.update());

    let handle = engine.shutdown_handle();
    thread::spawn(move || handle.request())
        .join()
        .expect("Thread join failed");

    assert!(!engine.update());
    assert_eq!(engine.frame_count(), 1);
}

#[test]
fn test_failed_init_degrades_but_keeps_running() {
    let mut engine = Engine::new(config());
    let (observer, seen) = Observer::new(&engine, true);
    engine.register(observer).unwrap();
    engine.init_headless().unwrap();

    assert_eq!(engine.degraded(), &[SystemId::Input]);
    assert!(engine.update());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_failed_init_of_critical_subsystem_aborts() {
    let mut config = config();
    config.critical_systems = vec![SystemId::Input];
    let mut engine = Engine::new(config);
    let (observer, _) = Observer::new(&engine, true);
    engine.register(observer).unwrap();

    let err = engine.init_headless().unwrap_err();
    assert!(matches!(
        err,
        EngineError::CriticalInitFailure {
            id: SystemId::Input,
            ..
        }
    ));
    assert_eq!(engine.state(), EngineState::Terminated);
    assert!(!engine.update());

    // A second attempt reports the state, not the leftover registrations.
    assert!(matches!(
        engine.init_headless(),
        Err(EngineError::InvalidState {
            current: EngineState::Terminated,
            expected: EngineState::Uninitialized,
        })
    ));
}

#[test]
fn test_duplicate_identity_fails_init() {
    let mut engine = Engine::new(config());
    let rogue = Rc::new(RefCell::new(RogueTimer {
        registry: engine.registry_link(),
    }));
    engine.register(rogue).unwrap();

    let err = engine.init_headless().unwrap_err();
    assert!(matches!(
        err,
        EngineError::Registry(RegistryError::DuplicateIdentity(SystemId::Timer))
    ));
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn test_register_after_init_is_rejected() {
    let mut engine = Engine::new(config());
    engine.init_headless().unwrap();

    let (observer, _) = Observer::new(&engine, false);
    assert!(matches!(
        engine.register(observer),
        Err(EngineError::InvalidState {
            current: EngineState::Initialized,
            ..
        })
    ));
}

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

//! A type-indexed dependency registry for engine subsystems.
//!
//! The [`SubsystemRegistry`] lets subsystems that were constructed
//! independently discover each other by capability. The renderer, for
//! instance, can be built before the event bus and still find it during
//! [`Subsystem::init`].
//!
//! # Ownership
//!
//! The registry holds the only long-lived strong references to its
//! subsystems. Each subsystem points back at the registry through a
//! [`RegistryLink`], which is a [`Weak`] reference, so the two never keep
//! each other alive.

use crate::error::RegistryError;
use crate::subsystem::{Subsystem, SubsystemKind, SystemId};
use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A shared handle to a registered subsystem, erased to the common contract.
pub type SubsystemHandle = Rc<RefCell<dyn Subsystem>>;

struct Entry {
    id: SystemId,
    subsystem: SubsystemHandle,
    // Same allocation as `subsystem`, kept for typed downcasts.
    instance: Rc<dyn Any>,
}

/// Registry of live subsystems keyed by [`SystemId`].
///
/// Insertion order is preserved. It drives `init` order and breaks ties
/// inside a [`FrameStage`](crate::FrameStage), but has no influence on
/// resolution.
///
/// # Example
///
/// ```rust
/// use chilli_core::{EventBus, SubsystemRegistry};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let registry = Rc::new(SubsystemRegistry::new());
/// let bus = Rc::new(RefCell::new(EventBus::new(registry.link())));
/// registry.add(bus).unwrap();
///
/// assert!(registry.resolve::<EventBus>().is_some());
/// ```
#[derive(Default)]
pub struct SubsystemRegistry {
    entries: RefCell<Vec<Entry>>,
}

impl SubsystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Returns a non-owning link to this registry for a subsystem to keep.
    pub fn link(self: &Rc<Self>) -> RegistryLink {
        RegistryLink(Rc::downgrade(self))
    }

    /// Registers a subsystem under the identity it reports.
    ///
    /// Registering a second subsystem under an identity that is already taken
    /// is rejected with [`RegistryError::DuplicateIdentity`]; the first
    /// registration stays in place.
    pub fn add<T: SubsystemKind>(&self, subsystem: Rc<RefCell<T>>) -> Result<(), RegistryError> {
        let reported = subsystem.borrow().identity();
        if reported != T::ID {
            log::error!(
                "SubsystemRegistry: {} reports {} but is declared as {}",
                std::any::type_name::<T>(),
                reported,
                T::ID
            );
            return Err(RegistryError::IdentityMismatch {
                expected: T::ID,
                reported,
            });
        }

        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|entry| entry.id == reported) {
            log::error!("SubsystemRegistry: {reported} is already registered, rejecting duplicate");
            return Err(RegistryError::DuplicateIdentity(reported));
        }

        let handle: SubsystemHandle = subsystem.clone();
        let instance: Rc<dyn Any> = subsystem;
        entries.push(Entry {
            id: reported,
            subsystem: handle,
            instance,
        });
        log::info!(
            "SubsystemRegistry: Registered {} (stage={:?})",
            reported,
            reported.stage()
        );
        Ok(())
    }

    /// Looks up the subsystem registered under `T`'s identity.
    ///
    /// Returns `None` when nothing is registered under that identity or when
    /// the stored instance is not a `T`. Callers are expected to degrade
    /// rather than abort.
    #[must_use]
    pub fn resolve<T: SubsystemKind>(&self) -> Option<Rc<RefCell<T>>> {
        let entries = self.entries.borrow();
        let Some(entry) = entries.iter().find(|entry| entry.id == T::ID) else {
            log::error!("Failed to resolve {} dependency: not registered", T::ID);
            return None;
        };

        match Rc::clone(&entry.instance).downcast::<RefCell<T>>() {
            Ok(subsystem) => Some(subsystem),
            Err(_) => {
                log::error!(
                    "Failed to resolve {} dependency: registered instance is not a {}",
                    T::ID,
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    /// Returns `true` if a subsystem is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: SystemId) -> bool {
        self.entries.borrow().iter().any(|entry| entry.id == id)
    }

    /// Returns the registered identities in registration order.
    pub fn identities(&self) -> Vec<SystemId> {
        self.entries.borrow().iter().map(|entry| entry.id).collect()
    }

    /// Returns every subsystem handle in registration order.
    pub fn registration_order(&self) -> Vec<(SystemId, SubsystemHandle)> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| (entry.id, Rc::clone(&entry.subsystem)))
            .collect()
    }

    /// Returns every subsystem handle in the order they are ticked.
    ///
    /// Handles are sorted by [`FrameStage`](crate::FrameStage); subsystems in
    /// the same stage keep their registration order.
    pub fn frame_order(&self) -> Vec<(SystemId, SubsystemHandle)> {
        let mut ordered = self.registration_order();
        ordered.sort_by_key(|(id, _)| id.stage());
        ordered
    }

    /// Returns the number of registered subsystems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if no subsystems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Non-owning back-reference from a subsystem to its registry.
///
/// Resolving through a link whose registry has been dropped yields `None`.
#[derive(Debug, Clone, Default)]
pub struct RegistryLink(Weak<SubsystemRegistry>);

impl RegistryLink {
    /// A link that is not attached to any registry.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Resolves a dependency through the linked registry.
    #[must_use]
    pub fn resolve<T: SubsystemKind>(&self) -> Option<Rc<RefCell<T>>> {
        match self.0.upgrade() {
            Some(registry) => registry.resolve::<T>(),
            None => {
                log::error!(
                    "Failed to resolve {} dependency: registry is no longer alive",
                    T::ID
                );
                None
            }
        }
    }

    /// Returns `true` while the linked registry is alive.
    pub fn is_attached(&self) -> bool {
        self.0.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTimer {
        registry: RegistryLink,
        ticks: u32,
    }

    impl Subsystem for FakeTimer {
        fn identity(&self) -> SystemId {
            SystemId::Timer
        }
        fn process_frame(&mut self) {
            self.ticks += 1;
        }
        fn registry(&self) -> &RegistryLink {
            &self.registry
        }
    }

    impl SubsystemKind for FakeTimer {
        const ID: SystemId = SystemId::Timer;
    }

    // Shares the Timer identity with `FakeTimer` but is a different type.
    struct OtherTimer {
        registry: RegistryLink,
    }

    impl Subsystem for OtherTimer {
        fn identity(&self) -> SystemId {
            SystemId::Timer
        }
        fn process_frame(&mut self) {}
        fn registry(&self) -> &RegistryLink {
            &self.registry
        }
    }

    impl SubsystemKind for OtherTimer {
        const ID: SystemId = SystemId::Timer;
    }

    // Declared as Input but claims to be the Renderer at runtime.
    struct Liar {
        registry: RegistryLink,
    }

    impl Subsystem for Liar {
        fn identity(&self) -> SystemId {
            SystemId::Renderer
        }
        fn process_frame(&mut self) {}
        fn registry(&self) -> &RegistryLink {
            &self.registry
        }
    }

    impl SubsystemKind for Liar {
        const ID: SystemId = SystemId::Input;
    }

    fn fake_timer(registry: &Rc<SubsystemRegistry>) -> Rc<RefCell<FakeTimer>> {
        Rc::new(RefCell::new(FakeTimer {
            registry: registry.link(),
            ticks: 0,
        }))
    }

    #[test]
    fn test_add_and_resolve() {
        let registry = Rc::new(SubsystemRegistry::new());
        let timer = fake_timer(&registry);
        registry.add(Rc::clone(&timer)).unwrap();

        let resolved = registry.resolve::<FakeTimer>().unwrap();
        assert!(Rc::ptr_eq(&resolved, &timer));
    }

    #[test]
    fn test_resolve_missing_returns_none() {
        let registry = SubsystemRegistry::new();
        assert!(registry.resolve::<FakeTimer>().is_none());
    }

    #[test]
    fn test_resolve_wrong_type_returns_none() {
        let registry = Rc::new(SubsystemRegistry::new());
        registry.add(fake_timer(&registry)).unwrap();
        assert!(registry.resolve::<OtherTimer>().is_none());
    }

    #[test]
    fn test_duplicate_identity_is_rejected() {
        let registry = Rc::new(SubsystemRegistry::new());
        let first = fake_timer(&registry);
        registry.add(Rc::clone(&first)).unwrap();

        let second = Rc::new(RefCell::new(OtherTimer {
            registry: registry.link(),
        }));
        assert_eq!(
            registry.add(second),
            Err(RegistryError::DuplicateIdentity(SystemId::Timer))
        );
        assert_eq!(registry.len(), 1);
        assert!(Rc::ptr_eq(
            &registry.resolve::<FakeTimer>().unwrap(),
            &first
        ));
    }

    #[test]
    fn test_identity_mismatch_is_rejected() {
        let registry = Rc::new(SubsystemRegistry::new());
        let liar = Rc::new(RefCell::new(Liar {
            registry: registry.link(),
        }));
        assert_eq!(
            registry.add(liar),
            Err(RegistryError::IdentityMismatch {
                expected: SystemId::Input,
                reported: SystemId::Renderer,
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_link_resolves_through_registry() {
        let registry = Rc::new(SubsystemRegistry::new());
        let timer = fake_timer(&registry);
        registry.add(Rc::clone(&timer)).unwrap();

        let link = timer.borrow().registry().clone();
        assert!(link.is_attached());
        assert!(link.resolve::<FakeTimer>().is_some());
    }

    #[test]
    fn test_link_outliving_registry_resolves_none() {
        let registry = Rc::new(SubsystemRegistry::new());
        let link = registry.link();
        registry.add(fake_timer(&registry)).unwrap();
        drop(registry);

        assert!(!link.is_attached());
        assert!(link.resolve::<FakeTimer>().is_none());
        assert!(RegistryLink::detached().resolve::<FakeTimer>().is_none());
    }

    #[test]
    fn test_dropping_registry_releases_subsystems() {
        let registry = Rc::new(SubsystemRegistry::new());
        let timer = fake_timer(&registry);
        let weak = Rc::downgrade(&timer);
        registry.add(timer).unwrap();
        assert!(weak.upgrade().is_some());

        drop(registry);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_handles_share_one_instance() {
        let registry = Rc::new(SubsystemRegistry::new());
        let timer = fake_timer(&registry);
        registry.add(Rc::clone(&timer)).unwrap();

        for (_, handle) in registry.frame_order() {
            handle.borrow_mut().process_frame();
        }
        assert_eq!(timer.borrow().ticks, 1);
    }

    #[test]
    fn test_default_is_empty() {
        let registry = SubsystemRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.contains(SystemId::Timer));
        assert!(registry.identities().is_empty());
    }
}

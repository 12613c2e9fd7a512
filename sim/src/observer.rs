//! Event fan-out to external listeners.
//!
//! Renderers, audio and score keeping implement [`SimObserver`] and register
//! with `SimWorld::add_observer`. Notifications are synchronous: they fire in
//! registration order, inside the step that causes them.

use crate::components::{Orientation, Position, UnitId};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Read-only view of the unit an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub position: Position,
    pub orientation: Orientation,
}

/// Listener for simulation events. Both hooks default to doing nothing.
pub trait SimObserver: Send + Sync + 'static {
    /// A projectile destroyed `unit`.
    fn on_unit_destroyed(&mut self, _unit: &UnitView) {}

    /// `unit` fired a projectile.
    fn on_projectile_fired(&mut self, _unit: &UnitView) {}
}

/// Registered observers, kept in registration order.
#[derive(Resource, Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn SimObserver>>,
}

impl ObserverRegistry {
    pub fn add(&mut self, observer: Box<dyn SimObserver>) {
        self.observers.push(observer);
    }

    pub fn notify_unit_destroyed(&mut self, unit: &UnitView) {
        for observer in &mut self.observers {
            observer.on_unit_destroyed(unit);
        }
    }

    pub fn notify_projectile_fired(&mut self, unit: &UnitView) {
        for observer in &mut self.observers {
            observer.on_projectile_fired(unit);
        }
    }
}

/// An event as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    UnitDestroyed(UnitView),
    ProjectileFired(UnitView),
}

/// Observer that appends every event to a shared log.
///
/// The log is an `Arc<Mutex<..>>` so the host keeps a handle after handing the
/// observer to the simulation.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: std::sync::Arc<std::sync::Mutex<Vec<SimEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all recorded events.
    pub fn drain(&self) -> Vec<SimEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, event: SimEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl SimObserver for EventLog {
    fn on_unit_destroyed(&mut self, unit: &UnitView) {
        self.push(SimEvent::UnitDestroyed(*unit));
    }

    fn on_projectile_fired(&mut self, unit: &UnitView) {
        self.push(SimEvent::ProjectileFired(*unit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Tagged {
        tag: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl SimObserver for Tagged {
        fn on_unit_destroyed(&mut self, _unit: &UnitView) {
            self.seen.lock().unwrap().push(self.tag);
        }
    }

    fn view() -> UnitView {
        UnitView {
            id: UnitId(1),
            position: Position::new(2.0, 3.0),
            orientation: Orientation::UP,
        }
    }

    #[test]
    fn test_notifies_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::default();
        for tag in ["first", "second", "third"] {
            registry.add(Box::new(Tagged { tag, seen: seen.clone() }));
        }

        registry.notify_unit_destroyed(&view());

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::default();
        registry.add(Box::new(Tagged { tag: "only", seen: seen.clone() }));

        registry.notify_projectile_fired(&view());

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_event_log_records_and_drains() {
        let log = EventLog::new();
        let mut registry = ObserverRegistry::default();
        registry.add(Box::new(log.clone()));

        registry.notify_projectile_fired(&view());
        registry.notify_unit_destroyed(&view());

        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SimEvent::ProjectileFired(_)));
        assert!(matches!(events[1], SimEvent::UnitDestroyed(unit) if unit.id == UnitId(1)));
        assert!(log.drain().is_empty());
    }
}

//! Core-emitted events.
//!
//! The UI collaborator renders exclusively from this stream: every store
//! mutation, mode transition and simulation step is reported here. Events
//! are delivered over an mpsc channel so that simulation tasks running on
//! their own threads can emit onto the same stream the synchronous
//! interaction controller uses.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::CoreError;
use crate::interaction::Mode;
use crate::simulation::SimulationReport;
use crate::topology::{ConnectionId, DeviceType, LinkType, Point};

/// Everything the core reports to the UI collaborator
#[derive(Debug, Clone)]
pub enum CoreEvent {
    DeviceAdded {
        id: String,
        device_type: DeviceType,
        position: Point,
    },
    DeviceMoved {
        id: String,
        position: Point,
    },
    DeviceRemoved {
        id: String,
    },
    ConnectionAdded {
        id: ConnectionId,
        a: String,
        b: String,
        link_type: LinkType,
    },
    ConnectionRemoved {
        id: ConnectionId,
    },
    SelectionChanged {
        id: Option<String>,
    },
    ModeChanged {
        mode: Mode,
    },
    /// One animation frame of a packet-send session
    SimulationStep {
        session: u64,
        position: Point,
    },
    /// Terminal outcome of a simulation session
    SimulationResult {
        session: u64,
        result: Result<SimulationReport, CoreError>,
    },
}

/// Cloneable sending half of the core event stream.
///
/// A dropped receiver is not an error from the core's perspective (the UI
/// may have shut down while a simulation task was still emitting); sends
/// into the void are logged at debug level and otherwise ignored.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Sender<CoreEvent>,
}

impl EventBus {
    /// Create a bus together with the receiving end the UI drains
    pub fn channel() -> (EventBus, Receiver<CoreEvent>) {
        let (sender, receiver) = mpsc::channel();
        (EventBus { sender }, receiver)
    }

    pub fn emit(&self, event: CoreEvent) {
        if self.sender.send(event).is_err() {
            log::debug!("Event receiver dropped; discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_emission_order() {
        let (bus, rx) = EventBus::channel();
        bus.emit(CoreEvent::DeviceRemoved { id: "Router_1".to_string() });
        bus.emit(CoreEvent::SelectionChanged { id: None });
        assert!(matches!(rx.recv().unwrap(), CoreEvent::DeviceRemoved { .. }));
        assert!(matches!(rx.recv().unwrap(), CoreEvent::SelectionChanged { id: None }));
    }

    #[test]
    fn test_emit_survives_dropped_receiver() {
        let (bus, rx) = EventBus::channel();
        drop(rx);
        bus.emit(CoreEvent::SelectionChanged { id: None });
    }
}

//! # NetDesigner - topology core for an interactive network diagram tool
//!
//! This library provides the data model, interaction protocol and mock
//! simulation engine behind a network diagram designer. The UI layer is an
//! external collaborator: it sends commands (place a device, connect two
//! devices, run a ping) into the core and renders from the events the core
//! emits. The core holds no rendering handles and performs no real network
//! I/O; addresses are syntactically valid mock values and diagnostics are
//! resolved against the diagram's graph structure.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `address`: mock IPv4/MAC generation and address field validation
//! - `topology`: the device/connection store and its invariants
//! - `interaction`: the mode-based editing state machine over pointer input
//! - `path`: BFS reachability and shortest path over the diagram graph
//! - `simulation`: ping and packet-send sessions with timed animation steps
//! - `snapshot`: JSON snapshot serialization and loading
//! - `events`: the event stream consumed by the UI collaborator
//! - `error`: the recoverable error taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use netdesigner::events::EventBus;
//! use netdesigner::interaction::InteractionController;
//! use netdesigner::simulation::{Simulator, TransportMode};
//! use netdesigner::topology::{DeviceType, Point};
//!
//! let (bus, events) = EventBus::channel();
//! let mut controller = InteractionController::new(bus.clone());
//!
//! // Build a two-device diagram and wire it up
//! let a = controller.add_device(DeviceType::Computer, Point::new(50.0, 50.0));
//! let b = controller.add_device(DeviceType::Server, Point::new(250.0, 50.0));
//! controller.begin_connect();
//! controller.pointer_down(Point::new(50.0, 50.0));
//! controller.pointer_down(Point::new(250.0, 50.0));
//! controller.end_connect();
//!
//! // Fire a packet across it; steps and the result arrive as events
//! let mut simulator = Simulator::new(bus);
//! let handle = simulator
//!     .send_packet(controller.topology(), &a, &b, None, TransportMode::Udp)
//!     .unwrap();
//! handle.join();
//! ```
//!
//! ## Concurrency
//!
//! The interaction loop is single threaded; every store mutation and mode
//! transition is synchronous. Simulation sessions run on their own threads,
//! read a snapshot of the route at submission time, and report back through
//! the shared event channel. Cancelling a session silently drops its
//! remaining steps.

pub mod address;
pub mod error;
pub mod events;
pub mod interaction;
pub mod path;
pub mod simulation;
pub mod snapshot;
pub mod topology;

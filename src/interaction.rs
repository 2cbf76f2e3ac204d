//! Interaction mode controller.
//!
//! A finite state machine over the editing modes that translates raw
//! pointer events into topology store mutations. Exactly one mode is
//! active at a time; the tagged variants make invalid combinations (e.g.
//! placing and deleting simultaneously) unrepresentable. Every side
//! effect is reported to the UI collaborator through the event bus.

use crate::error::CoreError;
use crate::events::{CoreEvent, EventBus};
use crate::snapshot::{self, SnapshotDocument};
use crate::topology::{ConnectionId, DeviceType, Hit, LinkType, Point, Topology};

/// Current interpretation of pointer input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Clicks select, drags move the selection
    Idle,
    /// The next canvas click places a device of this type
    PlacingDevice(DeviceType),
    /// Connect mode, waiting for the first endpoint
    ConnectingFirst,
    /// Connect mode, first endpoint recorded
    ConnectingSecond(String),
    /// Clicks delete the nearest device or connection
    Deleting,
}

impl Mode {
    /// Whether either connect sub-state is active
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::ConnectingFirst | Self::ConnectingSecond(_))
    }
}

/// Pre-populated field values for the device edit dialog.
/// Committing the dialog calls [`InteractionController::edit_device`].
#[derive(Debug, Clone)]
pub struct DeviceEditDraft {
    pub id: String,
    pub display_name: String,
    pub ip: String,
    pub mac: String,
    pub subnet_mask: String,
}

/// Owns the topology and mediates all mutations of it.
///
/// The controller runs on the single-threaded interaction loop; all
/// transitions and store mutations here are synchronous.
#[derive(Debug)]
pub struct InteractionController {
    topology: Topology,
    mode: Mode,
    link_type: LinkType,
    selection: Option<String>,
    dragging: bool,
    bus: EventBus,
}

impl InteractionController {
    pub fn new(bus: EventBus) -> Self {
        Self {
            topology: Topology::new(),
            mode: Mode::Idle,
            link_type: LinkType::default(),
            selection: None,
            dragging: false,
            bus,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Set the link type applied to subsequently created connections
    pub fn set_link_type(&mut self, link_type: LinkType) {
        log::debug!("Connection type set to {}", link_type.label());
        self.link_type = link_type;
    }

    fn transition(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode.clone();
            self.bus.emit(CoreEvent::ModeChanged { mode });
        }
    }

    fn set_selection(&mut self, id: Option<String>) {
        if self.selection != id {
            self.selection = id.clone();
            self.bus.emit(CoreEvent::SelectionChanged { id });
        }
    }

    /// Arm placement: the next pointer-down places a device of `device_type`
    pub fn request_place(&mut self, device_type: DeviceType) {
        self.transition(Mode::PlacingDevice(device_type));
    }

    /// Enter connect mode, clearing any pending first endpoint
    pub fn begin_connect(&mut self) {
        self.transition(Mode::ConnectingFirst);
    }

    /// Leave connect mode
    pub fn end_connect(&mut self) {
        if self.mode.is_connecting() {
            self.transition(Mode::Idle);
        }
    }

    /// Toggle connect mode on or off
    pub fn toggle_connect(&mut self) {
        if self.mode.is_connecting() {
            self.end_connect();
        } else {
            self.begin_connect();
        }
    }

    pub fn begin_delete(&mut self) {
        self.transition(Mode::Deleting);
    }

    pub fn end_delete(&mut self) {
        if self.mode == Mode::Deleting {
            self.transition(Mode::Idle);
        }
    }

    /// Toggle delete mode on or off
    pub fn toggle_delete(&mut self) {
        if self.mode == Mode::Deleting {
            self.end_delete();
        } else {
            self.begin_delete();
        }
    }

    /// Create a device directly, bypassing placement mode
    pub fn add_device(&mut self, device_type: DeviceType, position: Point) -> String {
        let device = self.topology.add_device(device_type, position);
        let id = device.id.clone();
        self.bus.emit(CoreEvent::DeviceAdded {
            id: id.clone(),
            device_type,
            position,
        });
        id
    }

    /// Dispatch a pointer-down according to the active mode
    pub fn pointer_down(&mut self, point: Point) {
        match self.mode.clone() {
            Mode::PlacingDevice(device_type) => {
                self.add_device(device_type, point);
                self.transition(Mode::Idle);
            }
            Mode::ConnectingFirst => {
                if let Some(Hit::Device(id)) = self.topology.hit_test(point) {
                    self.transition(Mode::ConnectingSecond(id));
                }
            }
            Mode::ConnectingSecond(pending) => {
                if let Some(Hit::Device(id)) = self.topology.hit_test(point) {
                    // Clicking the pending device again is a no-op
                    if id != pending {
                        self.connect(&pending, &id);
                        self.transition(Mode::ConnectingFirst);
                    }
                }
            }
            Mode::Deleting => match self.topology.hit_test(point) {
                Some(Hit::Connection(id)) => {
                    self.remove_connection_with_event(id);
                }
                Some(Hit::Device(id)) => {
                    self.remove_device_with_events(&id);
                }
                None => {}
            },
            Mode::Idle => match self.topology.hit_test(point) {
                Some(Hit::Device(id)) => {
                    self.set_selection(Some(id));
                    self.dragging = true;
                }
                _ => self.set_selection(None),
            },
        }
    }

    /// Drag the actively selected device. The UI is expected to redraw
    /// incident connections from the emitted `DeviceMoved`.
    pub fn pointer_drag(&mut self, point: Point) {
        if !self.dragging {
            return;
        }
        if let Some(id) = self.selection.clone() {
            if self.topology.move_device(&id, point).is_ok() {
                self.bus.emit(CoreEvent::DeviceMoved { id, position: point });
            }
        }
    }

    /// End the active drag; the selection itself persists
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Double-click on a device opens the edit dialog; returns the values
    /// to pre-populate it with
    pub fn double_click(&mut self, point: Point) -> Option<DeviceEditDraft> {
        match self.topology.hit_test(point) {
            Some(Hit::Device(id)) => {
                let device = self.topology.device(&id)?;
                Some(DeviceEditDraft {
                    id: device.id.clone(),
                    display_name: device.display_name.clone(),
                    ip: device.ip.clone(),
                    mac: device.mac.clone(),
                    subnet_mask: device.subnet_mask.clone(),
                })
            }
            _ => None,
        }
    }

    /// Atomic edit commit; a single invalid field rejects the whole edit
    pub fn edit_device(
        &mut self,
        id: &str,
        display_name: &str,
        ip: &str,
        mac: &str,
        subnet_mask: &str,
    ) -> Result<(), CoreError> {
        self.topology.edit_device(id, display_name, ip, mac, subnet_mask)
    }

    /// Move a device by command rather than drag
    pub fn move_device(&mut self, id: &str, position: Point) -> Result<(), CoreError> {
        self.topology.move_device(id, position)?;
        self.bus.emit(CoreEvent::DeviceMoved {
            id: id.to_string(),
            position,
        });
        Ok(())
    }

    /// Delete a device by command, cascading to incident connections
    pub fn delete_device(&mut self, id: &str) -> Result<(), CoreError> {
        if self.remove_device_with_events(id) {
            Ok(())
        } else {
            Err(CoreError::InvalidDevice(id.to_string()))
        }
    }

    /// Delete a connection by command. Unknown ids are an idempotent no-op.
    pub fn delete_connection(&mut self, id: ConnectionId) {
        self.remove_connection_with_event(id);
    }

    fn connect(&mut self, a: &str, b: &str) {
        match self.topology.add_connection(a, b, self.link_type) {
            Ok(id) => self.bus.emit(CoreEvent::ConnectionAdded {
                id,
                a: a.to_string(),
                b: b.to_string(),
                link_type: self.link_type,
            }),
            // Both endpoints came from hit tests; a failure here means the
            // UI raced a deletion, which the protocol treats as a no-op
            Err(error) => log::warn!("Connection between {} and {} rejected: {}", a, b, error),
        }
    }

    fn remove_connection_with_event(&mut self, id: ConnectionId) {
        if self.topology.remove_connection(id).is_some() {
            self.bus.emit(CoreEvent::ConnectionRemoved { id });
        } else {
            log::warn!("Delete of unknown connection {} ignored", id);
        }
    }

    fn remove_device_with_events(&mut self, id: &str) -> bool {
        let Some((device, cascaded)) = self.topology.remove_device(id) else {
            log::warn!("Delete of unknown device {} ignored", id);
            return false;
        };
        for conn in &cascaded {
            self.bus.emit(CoreEvent::ConnectionRemoved { id: conn.id });
        }
        self.bus.emit(CoreEvent::DeviceRemoved {
            id: device.id.clone(),
        });
        if self.selection.as_deref() == Some(id) {
            self.set_selection(None);
        }
        // A pending connect endpoint that no longer exists is discarded
        if matches!(&self.mode, Mode::ConnectingSecond(pending) if pending == id) {
            self.transition(Mode::ConnectingFirst);
        }
        true
    }

    /// Serialize the current topology to a snapshot document
    pub fn save(&self) -> SnapshotDocument {
        snapshot::serialize(&self.topology)
    }

    /// Replace the current topology with the one described by `document`.
    ///
    /// The replacement is all-or-nothing: a malformed document leaves the
    /// current topology untouched. On success the controller resets to
    /// `Idle` with no selection and replays the restored entities as
    /// `DeviceAdded`/`ConnectionAdded` events so an event-driven UI can
    /// rebuild its canvas.
    pub fn load(&mut self, document: &SnapshotDocument) -> Result<(), CoreError> {
        let topology = snapshot::deserialize(document)?;
        self.topology = topology;
        self.dragging = false;
        self.set_selection(None);
        self.transition(Mode::Idle);

        let mut view = self.topology.graph_view();
        // Replay in a stable order
        for node in view.nodes.drain(..) {
            let device = self
                .topology
                .device(&node.id)
                .expect("graph view node exists in store");
            self.bus.emit(CoreEvent::DeviceAdded {
                id: device.id.clone(),
                device_type: device.device_type,
                position: device.position,
            });
        }
        let mut connections: Vec<_> = self.topology.connections().cloned().collect();
        connections.sort_by_key(|c| c.id);
        for conn in connections {
            self.bus.emit(CoreEvent::ConnectionAdded {
                id: conn.id,
                a: conn.endpoints.0,
                b: conn.endpoints.1,
                link_type: conn.link_type,
            });
        }
        log::info!(
            "Loaded topology: {} device(s), {} connection(s)",
            self.topology.device_count(),
            self.topology.connection_count()
        );
        Ok(())
    }
}

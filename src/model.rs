//! The closed set of network-object kinds the engine links together.
//!
//! The real exchange schema runs to hundreds of kinds; this crate carries a
//! deliberately small set that still exercises every relationship shape the
//! resolver registry supports (1:1, 1:N, N:N, forward-only). Adding a kind
//! is one struct, one enum variant, and catalogue entries.
//!
//! Relationship fields hold mRIDs, not object pointers: a single-valued
//! field is `Option<Mrid>`, a multi-valued field is an ordered `Vec<Mrid>`
//! deduplicated by identity. Consumers follow them through the store. A
//! field stays unset/empty until the resolution engine wires it, which is
//! how a deferred reference remains invisible until its target arrives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mrid::Mrid;

/// Kind tag for a [`NetworkObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A connection point of a piece of conducting equipment.
    Terminal,
    /// Equipment that carries current (lines, switches, transformers...).
    ConductingEquipment,
    /// A node where terminals are electrically connected.
    ConnectivityNode,
    /// A radial section of network fed from one head terminal.
    Feeder,
    /// A substation containing feeders.
    Substation,
    /// A nominal voltage level shared by equipment.
    BaseVoltage,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal => write!(f, "Terminal"),
            Self::ConductingEquipment => write!(f, "ConductingEquipment"),
            Self::ConnectivityNode => write!(f, "ConnectivityNode"),
            Self::Feeder => write!(f, "Feeder"),
            Self::Substation => write!(f, "Substation"),
            Self::BaseVoltage => write!(f, "BaseVoltage"),
        }
    }
}

/// Overwrites a single-valued reference field, warning when it re-targets.
///
/// Policy for a 1:1/N:1 field wired twice with two *different* targets:
/// last write wins. The stale reverse link on the old target is not
/// retracted; sessions have no partial rollback.
fn set_single(field: &mut Option<Mrid>, owner: &Mrid, name: &'static str, target: Mrid) {
    if let Some(existing) = field.as_ref() {
        if *existing == target {
            return;
        }
        tracing::warn!(
            owner = %owner,
            field = name,
            old = %existing,
            new = %target,
            "single-valued reference re-targeted; keeping the new value"
        );
    }
    *field = Some(target);
}

/// Appends to a multi-valued reference field, deduplicating by identity.
fn add_to_collection(field: &mut Vec<Mrid>, target: Mrid) {
    if !field.contains(&target) {
        field.push(target);
    }
}

/// A connection point between conducting equipment and a connectivity node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    /// Stable identifier.
    pub mrid: Mrid,
    /// Free-form name from the wire record.
    #[serde(default)]
    pub name: String,
    /// The equipment this terminal belongs to.
    pub conducting_equipment: Option<Mrid>,
    /// The connectivity node this terminal attaches to.
    pub connectivity_node: Option<Mrid>,
    /// The feeder whose normal head terminal this is, if any.
    pub normal_feeder: Option<Mrid>,
}

impl Terminal {
    /// Creates a terminal with no relationships wired.
    #[must_use]
    pub fn new(mrid: impl Into<Mrid>) -> Self {
        Self {
            mrid: mrid.into(),
            name: String::new(),
            conducting_equipment: None,
            connectivity_node: None,
            normal_feeder: None,
        }
    }

    /// Wires the owning conducting equipment.
    pub fn set_conducting_equipment(&mut self, target: Mrid) {
        set_single(
            &mut self.conducting_equipment,
            &self.mrid,
            "conducting_equipment",
            target,
        );
    }

    /// Wires the attached connectivity node.
    pub fn set_connectivity_node(&mut self, target: Mrid) {
        set_single(
            &mut self.connectivity_node,
            &self.mrid,
            "connectivity_node",
            target,
        );
    }

    /// Wires the feeder this terminal heads.
    pub fn set_normal_feeder(&mut self, target: Mrid) {
        set_single(&mut self.normal_feeder, &self.mrid, "normal_feeder", target);
    }
}

/// Current-carrying equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConductingEquipment {
    /// Stable identifier.
    pub mrid: Mrid,
    /// Free-form name from the wire record.
    #[serde(default)]
    pub name: String,
    /// Terminals of this equipment, in declaration order.
    pub terminals: Vec<Mrid>,
    /// The nominal voltage level. Forward-only: `BaseVoltage` keeps no
    /// back-references.
    pub base_voltage: Option<Mrid>,
    /// Equipment containers (feeders) this equipment belongs to.
    pub containers: Vec<Mrid>,
}

impl ConductingEquipment {
    /// Creates equipment with no relationships wired.
    #[must_use]
    pub fn new(mrid: impl Into<Mrid>) -> Self {
        Self {
            mrid: mrid.into(),
            name: String::new(),
            terminals: Vec::new(),
            base_voltage: None,
            containers: Vec::new(),
        }
    }

    /// Adds a terminal, ignoring one already present.
    pub fn add_terminal(&mut self, target: Mrid) {
        add_to_collection(&mut self.terminals, target);
    }

    /// Wires the base voltage.
    pub fn set_base_voltage(&mut self, target: Mrid) {
        set_single(&mut self.base_voltage, &self.mrid, "base_voltage", target);
    }

    /// Adds a containing feeder, ignoring one already present.
    pub fn add_container(&mut self, target: Mrid) {
        add_to_collection(&mut self.containers, target);
    }
}

/// An electrical junction of terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityNode {
    /// Stable identifier.
    pub mrid: Mrid,
    /// Free-form name from the wire record.
    #[serde(default)]
    pub name: String,
    /// Terminals attached to this node, in declaration order.
    pub terminals: Vec<Mrid>,
}

impl ConnectivityNode {
    /// Creates a node with no terminals attached.
    #[must_use]
    pub fn new(mrid: impl Into<Mrid>) -> Self {
        Self {
            mrid: mrid.into(),
            name: String::new(),
            terminals: Vec::new(),
        }
    }

    /// Attaches a terminal, ignoring one already present.
    pub fn add_terminal(&mut self, target: Mrid) {
        add_to_collection(&mut self.terminals, target);
    }
}

/// A radial section of network with a normal head terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feeder {
    /// Stable identifier.
    pub mrid: Mrid,
    /// Free-form name from the wire record.
    #[serde(default)]
    pub name: String,
    /// Equipment contained in this feeder.
    pub equipment: Vec<Mrid>,
    /// The terminal the feeder is normally fed from.
    pub normal_head_terminal: Option<Mrid>,
    /// The substation this feeder originates from.
    pub substation: Option<Mrid>,
}

impl Feeder {
    /// Creates a feeder with no relationships wired.
    #[must_use]
    pub fn new(mrid: impl Into<Mrid>) -> Self {
        Self {
            mrid: mrid.into(),
            name: String::new(),
            equipment: Vec::new(),
            normal_head_terminal: None,
            substation: None,
        }
    }

    /// Adds contained equipment, ignoring one already present.
    pub fn add_equipment(&mut self, target: Mrid) {
        add_to_collection(&mut self.equipment, target);
    }

    /// Wires the normal head terminal.
    pub fn set_normal_head_terminal(&mut self, target: Mrid) {
        set_single(
            &mut self.normal_head_terminal,
            &self.mrid,
            "normal_head_terminal",
            target,
        );
    }

    /// Wires the originating substation.
    pub fn set_substation(&mut self, target: Mrid) {
        set_single(&mut self.substation, &self.mrid, "substation", target);
    }
}

/// A substation containing feeders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substation {
    /// Stable identifier.
    pub mrid: Mrid,
    /// Free-form name from the wire record.
    #[serde(default)]
    pub name: String,
    /// Feeders originating from this substation.
    pub feeders: Vec<Mrid>,
}

impl Substation {
    /// Creates a substation with no feeders.
    #[must_use]
    pub fn new(mrid: impl Into<Mrid>) -> Self {
        Self {
            mrid: mrid.into(),
            name: String::new(),
            feeders: Vec::new(),
        }
    }

    /// Adds an originating feeder, ignoring one already present.
    pub fn add_feeder(&mut self, target: Mrid) {
        add_to_collection(&mut self.feeders, target);
    }
}

/// A nominal voltage level. Referenced by equipment, never references back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseVoltage {
    /// Stable identifier.
    pub mrid: Mrid,
    /// Free-form name from the wire record.
    #[serde(default)]
    pub name: String,
    /// Nominal voltage in volts.
    pub nominal_voltage: u32,
}

impl BaseVoltage {
    /// Creates a base voltage level.
    #[must_use]
    pub fn new(mrid: impl Into<Mrid>, nominal_voltage: u32) -> Self {
        Self {
            mrid: mrid.into(),
            name: String::new(),
            nominal_voltage,
        }
    }
}

/// Any object the engine can materialize and link.
///
/// One variant per [`ObjectKind`]. Wire decoders build the concrete struct
/// from a record and convert it with `into()` before adding it to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkObject {
    /// See [`Terminal`].
    Terminal(Terminal),
    /// See [`ConductingEquipment`].
    ConductingEquipment(ConductingEquipment),
    /// See [`ConnectivityNode`].
    ConnectivityNode(ConnectivityNode),
    /// See [`Feeder`].
    Feeder(Feeder),
    /// See [`Substation`].
    Substation(Substation),
    /// See [`BaseVoltage`].
    BaseVoltage(BaseVoltage),
}

impl NetworkObject {
    /// Returns the object's stable identifier.
    #[must_use]
    pub fn mrid(&self) -> &Mrid {
        match self {
            Self::Terminal(o) => &o.mrid,
            Self::ConductingEquipment(o) => &o.mrid,
            Self::ConnectivityNode(o) => &o.mrid,
            Self::Feeder(o) => &o.mrid,
            Self::Substation(o) => &o.mrid,
            Self::BaseVoltage(o) => &o.mrid,
        }
    }

    /// Returns the object's kind tag.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Terminal(_) => ObjectKind::Terminal,
            Self::ConductingEquipment(_) => ObjectKind::ConductingEquipment,
            Self::ConnectivityNode(_) => ObjectKind::ConnectivityNode,
            Self::Feeder(_) => ObjectKind::Feeder,
            Self::Substation(_) => ObjectKind::Substation,
            Self::BaseVoltage(_) => ObjectKind::BaseVoltage,
        }
    }

    /// Borrows as a terminal if that is the kind.
    #[must_use]
    pub const fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Self::Terminal(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrows as a terminal if that is the kind.
    pub fn as_terminal_mut(&mut self) -> Option<&mut Terminal> {
        match self {
            Self::Terminal(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows as conducting equipment if that is the kind.
    #[must_use]
    pub const fn as_conducting_equipment(&self) -> Option<&ConductingEquipment> {
        match self {
            Self::ConductingEquipment(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrows as conducting equipment if that is the kind.
    pub fn as_conducting_equipment_mut(&mut self) -> Option<&mut ConductingEquipment> {
        match self {
            Self::ConductingEquipment(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows as a connectivity node if that is the kind.
    #[must_use]
    pub const fn as_connectivity_node(&self) -> Option<&ConnectivityNode> {
        match self {
            Self::ConnectivityNode(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrows as a connectivity node if that is the kind.
    pub fn as_connectivity_node_mut(&mut self) -> Option<&mut ConnectivityNode> {
        match self {
            Self::ConnectivityNode(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows as a feeder if that is the kind.
    #[must_use]
    pub const fn as_feeder(&self) -> Option<&Feeder> {
        match self {
            Self::Feeder(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrows as a feeder if that is the kind.
    pub fn as_feeder_mut(&mut self) -> Option<&mut Feeder> {
        match self {
            Self::Feeder(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows as a substation if that is the kind.
    #[must_use]
    pub const fn as_substation(&self) -> Option<&Substation> {
        match self {
            Self::Substation(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrows as a substation if that is the kind.
    pub fn as_substation_mut(&mut self) -> Option<&mut Substation> {
        match self {
            Self::Substation(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows as a base voltage if that is the kind.
    #[must_use]
    pub const fn as_base_voltage(&self) -> Option<&BaseVoltage> {
        match self {
            Self::BaseVoltage(o) => Some(o),
            _ => None,
        }
    }
}

impl From<Terminal> for NetworkObject {
    fn from(o: Terminal) -> Self {
        Self::Terminal(o)
    }
}

impl From<ConductingEquipment> for NetworkObject {
    fn from(o: ConductingEquipment) -> Self {
        Self::ConductingEquipment(o)
    }
}

impl From<ConnectivityNode> for NetworkObject {
    fn from(o: ConnectivityNode) -> Self {
        Self::ConnectivityNode(o)
    }
}

impl From<Feeder> for NetworkObject {
    fn from(o: Feeder) -> Self {
        Self::Feeder(o)
    }
}

impl From<Substation> for NetworkObject {
    fn from(o: Substation) -> Self {
        Self::Substation(o)
    }
}

impl From<BaseVoltage> for NetworkObject {
    fn from(o: BaseVoltage) -> Self {
        Self::BaseVoltage(o)
    }
}

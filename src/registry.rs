//! The catalogue of relationship descriptors.
//!
//! A [`RelationshipDescriptor`] is a reusable, typed specification of how to
//! wire one named relationship once both endpoints exist: a forward wiring
//! function, an optional reverse function for bidirectional relationships,
//! and a cardinality marker. Descriptors are pure configuration; nothing is
//! constructed per call.
//!
//! The registry is built once per catalogue and passed by reference into
//! each load session, so independent sessions never share mutable state. It
//! is keyed by (source kind, relationship name), replacing reflective
//! dispatch with a typed lookup.

use std::collections::HashMap;

use crate::error::WireError;
use crate::model::{
    ConductingEquipment, ConnectivityNode, Feeder, NetworkObject, ObjectKind, Substation, Terminal,
};
use crate::mrid::Mrid;

/// Cardinality of the forward reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one related object (`Option<Mrid>` field).
    Single,
    /// An ordered collection of related objects (`Vec<Mrid>` field).
    Many,
}

/// A wiring function: apply one side of a relationship to an object,
/// recording the other endpoint's mRID.
pub type WireFn = fn(&mut NetworkObject, &Mrid) -> Result<(), WireError>;

/// Typed specification of one named relationship between two object kinds.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipDescriptor {
    /// Relationship name, unique per source kind.
    pub name: &'static str,
    /// Kind of the object declaring the reference.
    pub source_kind: ObjectKind,
    /// Kind of the referenced object.
    pub target_kind: ObjectKind,
    /// Cardinality of the forward field.
    pub cardinality: Cardinality,
    forward: WireFn,
    reverse: Option<WireFn>,
}

impl RelationshipDescriptor {
    /// Creates a forward-only descriptor.
    #[must_use]
    pub const fn new(
        name: &'static str,
        source_kind: ObjectKind,
        target_kind: ObjectKind,
        cardinality: Cardinality,
        forward: WireFn,
    ) -> Self {
        Self {
            name,
            source_kind,
            target_kind,
            cardinality,
            forward,
            reverse: None,
        }
    }

    /// Adds the reverse wiring function, making the relationship
    /// bidirectional.
    #[must_use]
    pub const fn with_reverse(mut self, reverse: WireFn) -> Self {
        self.reverse = Some(reverse);
        self
    }

    /// Returns true if this relationship wires both endpoints.
    #[must_use]
    pub const fn is_bidirectional(&self) -> bool {
        self.reverse.is_some()
    }

    /// Records the target on the source object.
    pub fn apply_forward(&self, source: &mut NetworkObject, target: &Mrid) -> Result<(), WireError> {
        (self.forward)(source, target)
    }

    /// Records the source on the target object. A no-op for forward-only
    /// relationships.
    pub fn apply_reverse(&self, target: &mut NetworkObject, source: &Mrid) -> Result<(), WireError> {
        match self.reverse {
            Some(reverse) => reverse(target, source),
            None => Ok(()),
        }
    }
}

/// Relationship names of the built-in network catalogue.
pub mod rel {
    /// Terminal → its owning conducting equipment (N:1 child side).
    pub const TERMINAL_CONDUCTING_EQUIPMENT: &str = "Terminal.conductingEquipment";
    /// ConductingEquipment → its terminals (1:N owner side).
    pub const CONDUCTING_EQUIPMENT_TERMINALS: &str = "ConductingEquipment.terminals";
    /// Terminal → its connectivity node (N:1 child side).
    pub const TERMINAL_CONNECTIVITY_NODE: &str = "Terminal.connectivityNode";
    /// ConnectivityNode → its terminals (1:N owner side).
    pub const CONNECTIVITY_NODE_TERMINALS: &str = "ConnectivityNode.terminals";
    /// ConductingEquipment → its base voltage (forward-only).
    pub const CONDUCTING_EQUIPMENT_BASE_VOLTAGE: &str = "ConductingEquipment.baseVoltage";
    /// Feeder → its normal head terminal (1:1).
    pub const FEEDER_NORMAL_HEAD_TERMINAL: &str = "Feeder.normalHeadTerminal";
    /// Terminal → the feeder it heads (1:1).
    pub const TERMINAL_NORMAL_FEEDER: &str = "Terminal.normalFeeder";
    /// Feeder → contained equipment (N:N).
    pub const FEEDER_EQUIPMENT: &str = "Feeder.equipment";
    /// ConductingEquipment → containing feeders (N:N).
    pub const CONDUCTING_EQUIPMENT_CONTAINERS: &str = "ConductingEquipment.containers";
    /// Substation → its feeders (1:N owner side).
    pub const SUBSTATION_FEEDERS: &str = "Substation.feeders";
    /// Feeder → its substation (N:1 child side).
    pub const FEEDER_SUBSTATION: &str = "Feeder.substation";
}

/// Constructed-once catalogue of descriptors, keyed by
/// (source kind, relationship name).
#[derive(Debug, Default)]
pub struct ResolverRegistry {
    by_kind: HashMap<ObjectKind, HashMap<&'static str, RelationshipDescriptor>>,
}

impl ResolverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in electrical-network catalogue.
    ///
    /// Covers every relationship shape: 1:1 (feeder head terminal), 1:N
    /// (equipment/node terminals, substation feeders), N:N (feeder
    /// equipment containment), and forward-only (base voltage).
    #[must_use]
    pub fn network() -> Self {
        use Cardinality::{Many, Single};
        use ObjectKind as K;

        let mut registry = Self::new();
        let descriptors = [
            RelationshipDescriptor::new(
                rel::TERMINAL_CONDUCTING_EQUIPMENT,
                K::Terminal,
                K::ConductingEquipment,
                Single,
                wire::terminal_set_conducting_equipment,
            )
            .with_reverse(wire::conducting_equipment_add_terminal),
            RelationshipDescriptor::new(
                rel::CONDUCTING_EQUIPMENT_TERMINALS,
                K::ConductingEquipment,
                K::Terminal,
                Many,
                wire::conducting_equipment_add_terminal,
            )
            .with_reverse(wire::terminal_set_conducting_equipment),
            RelationshipDescriptor::new(
                rel::TERMINAL_CONNECTIVITY_NODE,
                K::Terminal,
                K::ConnectivityNode,
                Single,
                wire::terminal_set_connectivity_node,
            )
            .with_reverse(wire::connectivity_node_add_terminal),
            RelationshipDescriptor::new(
                rel::CONNECTIVITY_NODE_TERMINALS,
                K::ConnectivityNode,
                K::Terminal,
                Many,
                wire::connectivity_node_add_terminal,
            )
            .with_reverse(wire::terminal_set_connectivity_node),
            RelationshipDescriptor::new(
                rel::CONDUCTING_EQUIPMENT_BASE_VOLTAGE,
                K::ConductingEquipment,
                K::BaseVoltage,
                Single,
                wire::conducting_equipment_set_base_voltage,
            ),
            RelationshipDescriptor::new(
                rel::FEEDER_NORMAL_HEAD_TERMINAL,
                K::Feeder,
                K::Terminal,
                Single,
                wire::feeder_set_normal_head_terminal,
            )
            .with_reverse(wire::terminal_set_normal_feeder),
            RelationshipDescriptor::new(
                rel::TERMINAL_NORMAL_FEEDER,
                K::Terminal,
                K::Feeder,
                Single,
                wire::terminal_set_normal_feeder,
            )
            .with_reverse(wire::feeder_set_normal_head_terminal),
            RelationshipDescriptor::new(
                rel::FEEDER_EQUIPMENT,
                K::Feeder,
                K::ConductingEquipment,
                Many,
                wire::feeder_add_equipment,
            )
            .with_reverse(wire::conducting_equipment_add_container),
            RelationshipDescriptor::new(
                rel::CONDUCTING_EQUIPMENT_CONTAINERS,
                K::ConductingEquipment,
                K::Feeder,
                Many,
                wire::conducting_equipment_add_container,
            )
            .with_reverse(wire::feeder_add_equipment),
            RelationshipDescriptor::new(
                rel::SUBSTATION_FEEDERS,
                K::Substation,
                K::Feeder,
                Many,
                wire::substation_add_feeder,
            )
            .with_reverse(wire::feeder_set_substation),
            RelationshipDescriptor::new(
                rel::FEEDER_SUBSTATION,
                K::Feeder,
                K::Substation,
                Single,
                wire::feeder_set_substation,
            )
            .with_reverse(wire::substation_add_feeder),
        ];

        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Registers a descriptor, returning false if the (source kind, name)
    /// slot is already taken.
    pub fn register(&mut self, descriptor: RelationshipDescriptor) -> bool {
        let slots = self.by_kind.entry(descriptor.source_kind).or_default();
        if slots.contains_key(descriptor.name) {
            return false;
        }
        slots.insert(descriptor.name, descriptor);
        true
    }

    /// Looks up the descriptor registered under (source kind, name).
    #[must_use]
    pub fn descriptor(&self, source_kind: ObjectKind, name: &str) -> Option<&RelationshipDescriptor> {
        self.by_kind.get(&source_kind)?.get(name)
    }

    /// Total number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_kind.values().map(HashMap::len).sum()
    }

    /// Returns true if no descriptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

/// The wiring functions behind the built-in catalogue.
///
/// Each function narrows the object to the kind it expects and applies the
/// corresponding setter or adder from [`crate::model`]. The session checks
/// both endpoint kinds before wiring, so a mismatch here means the
/// catalogue itself is inconsistent; it is still reported, never panicked
/// on.
mod wire {
    use super::{
        ConductingEquipment, ConnectivityNode, Feeder, Mrid, NetworkObject, ObjectKind, Substation,
        Terminal, WireError,
    };

    fn mismatch(
        relationship: &'static str,
        expected: ObjectKind,
        obj: &NetworkObject,
    ) -> WireError {
        WireError::KindMismatch {
            relationship,
            expected,
            found: obj.kind(),
            mrid: obj.mrid().clone(),
        }
    }

    fn as_terminal<'a>(
        obj: &'a mut NetworkObject,
        relationship: &'static str,
    ) -> Result<&'a mut Terminal, WireError> {
        match obj {
            NetworkObject::Terminal(t) => Ok(t),
            other => Err(mismatch(relationship, ObjectKind::Terminal, other)),
        }
    }

    fn as_conducting_equipment<'a>(
        obj: &'a mut NetworkObject,
        relationship: &'static str,
    ) -> Result<&'a mut ConductingEquipment, WireError> {
        match obj {
            NetworkObject::ConductingEquipment(ce) => Ok(ce),
            other => Err(mismatch(relationship, ObjectKind::ConductingEquipment, other)),
        }
    }

    fn as_connectivity_node<'a>(
        obj: &'a mut NetworkObject,
        relationship: &'static str,
    ) -> Result<&'a mut ConnectivityNode, WireError> {
        match obj {
            NetworkObject::ConnectivityNode(cn) => Ok(cn),
            other => Err(mismatch(relationship, ObjectKind::ConnectivityNode, other)),
        }
    }

    fn as_feeder<'a>(
        obj: &'a mut NetworkObject,
        relationship: &'static str,
    ) -> Result<&'a mut Feeder, WireError> {
        match obj {
            NetworkObject::Feeder(f) => Ok(f),
            other => Err(mismatch(relationship, ObjectKind::Feeder, other)),
        }
    }

    fn as_substation<'a>(
        obj: &'a mut NetworkObject,
        relationship: &'static str,
    ) -> Result<&'a mut Substation, WireError> {
        match obj {
            NetworkObject::Substation(s) => Ok(s),
            other => Err(mismatch(relationship, ObjectKind::Substation, other)),
        }
    }

    pub(super) fn terminal_set_conducting_equipment(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_terminal(obj, super::rel::TERMINAL_CONDUCTING_EQUIPMENT)?
            .set_conducting_equipment(other.clone());
        Ok(())
    }

    pub(super) fn conducting_equipment_add_terminal(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_conducting_equipment(obj, super::rel::CONDUCTING_EQUIPMENT_TERMINALS)?
            .add_terminal(other.clone());
        Ok(())
    }

    pub(super) fn terminal_set_connectivity_node(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_terminal(obj, super::rel::TERMINAL_CONNECTIVITY_NODE)?
            .set_connectivity_node(other.clone());
        Ok(())
    }

    pub(super) fn connectivity_node_add_terminal(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_connectivity_node(obj, super::rel::CONNECTIVITY_NODE_TERMINALS)?
            .add_terminal(other.clone());
        Ok(())
    }

    pub(super) fn conducting_equipment_set_base_voltage(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_conducting_equipment(obj, super::rel::CONDUCTING_EQUIPMENT_BASE_VOLTAGE)?
            .set_base_voltage(other.clone());
        Ok(())
    }

    pub(super) fn feeder_set_normal_head_terminal(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_feeder(obj, super::rel::FEEDER_NORMAL_HEAD_TERMINAL)?
            .set_normal_head_terminal(other.clone());
        Ok(())
    }

    pub(super) fn terminal_set_normal_feeder(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_terminal(obj, super::rel::TERMINAL_NORMAL_FEEDER)?.set_normal_feeder(other.clone());
        Ok(())
    }

    pub(super) fn feeder_add_equipment(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_feeder(obj, super::rel::FEEDER_EQUIPMENT)?.add_equipment(other.clone());
        Ok(())
    }

    pub(super) fn conducting_equipment_add_container(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_conducting_equipment(obj, super::rel::CONDUCTING_EQUIPMENT_CONTAINERS)?
            .add_container(other.clone());
        Ok(())
    }

    pub(super) fn substation_add_feeder(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_substation(obj, super::rel::SUBSTATION_FEEDERS)?.add_feeder(other.clone());
        Ok(())
    }

    pub(super) fn feeder_set_substation(
        obj: &mut NetworkObject,
        other: &Mrid,
    ) -> Result<(), WireError> {
        as_feeder(obj, super::rel::FEEDER_SUBSTATION)?.set_substation(other.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_catalogue_contents() {
        let registry = ResolverRegistry::network();
        assert_eq!(registry.len(), 11);

        let desc = registry
            .descriptor(ObjectKind::Terminal, rel::TERMINAL_CONDUCTING_EQUIPMENT)
            .unwrap();
        assert_eq!(desc.source_kind, ObjectKind::Terminal);
        assert_eq!(desc.target_kind, ObjectKind::ConductingEquipment);
        assert_eq!(desc.cardinality, Cardinality::Single);
        assert!(desc.is_bidirectional());
    }

    #[test]
    fn test_base_voltage_is_forward_only() {
        let registry = ResolverRegistry::network();
        let desc = registry
            .descriptor(
                ObjectKind::ConductingEquipment,
                rel::CONDUCTING_EQUIPMENT_BASE_VOLTAGE,
            )
            .unwrap();
        assert!(!desc.is_bidirectional());

        // apply_reverse is a no-op rather than an error
        let mut bv: NetworkObject = crate::model::BaseVoltage::new("bv1", 415).into();
        desc.apply_reverse(&mut bv, &Mrid::new("ce1")).unwrap();
        assert_eq!(bv, NetworkObject::from(crate::model::BaseVoltage::new("bv1", 415)));
    }

    #[test]
    fn test_lookup_is_kind_scoped() {
        let registry = ResolverRegistry::network();
        assert!(registry
            .descriptor(ObjectKind::Feeder, rel::TERMINAL_CONDUCTING_EQUIPMENT)
            .is_none());
        assert!(registry.descriptor(ObjectKind::Terminal, "no-such").is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_slot() {
        let mut registry = ResolverRegistry::network();
        let dup = *registry
            .descriptor(ObjectKind::Terminal, rel::TERMINAL_CONDUCTING_EQUIPMENT)
            .unwrap();
        assert!(!registry.register(dup));
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn test_forward_wiring_records_target() {
        let registry = ResolverRegistry::network();
        let desc = registry
            .descriptor(ObjectKind::Terminal, rel::TERMINAL_CONDUCTING_EQUIPMENT)
            .unwrap();

        let mut terminal: NetworkObject = crate::model::Terminal::new("t1").into();
        desc.apply_forward(&mut terminal, &Mrid::new("ce1")).unwrap();
        assert_eq!(
            terminal.as_terminal().unwrap().conducting_equipment,
            Some(Mrid::new("ce1"))
        );
    }

    #[test]
    fn test_wiring_wrong_kind_is_reported() {
        let registry = ResolverRegistry::network();
        let desc = registry
            .descriptor(ObjectKind::Terminal, rel::TERMINAL_CONDUCTING_EQUIPMENT)
            .unwrap();

        let mut feeder: NetworkObject = crate::model::Feeder::new("f1").into();
        let err = desc
            .apply_forward(&mut feeder, &Mrid::new("ce1"))
            .unwrap_err();
        assert!(matches!(err, WireError::KindMismatch { .. }));
    }
}

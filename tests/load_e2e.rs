use std::collections::BTreeSet;

use gridlink::{
    rel, BaseVoltage, ConductingEquipment, ConnectivityNode, Feeder, LoadSession, Mrid,
    NetworkObject, ResolverRegistry, Substation, Terminal,
};

/// One decoded wire record: the materialized object plus the relationship
/// references its flat representation declared.
#[derive(Clone)]
struct Record {
    object: NetworkObject,
    refs: Vec<(&'static str, &'static str)>,
}

impl Record {
    fn new(object: impl Into<NetworkObject>) -> Self {
        Self {
            object: object.into(),
            refs: Vec::new(),
        }
    }

    fn with_ref(mut self, relationship: &'static str, target: &'static str) -> Self {
        self.refs.push((relationship, target));
        self
    }
}

/// Drives a session the way a decoder does: add the object, then declare
/// each of its reference fields.
fn load<'r>(registry: &'r ResolverRegistry, records: &[Record]) -> LoadSession<'r> {
    let mut session = LoadSession::new(registry);
    for record in records {
        let source = record.object.mrid().clone();
        session.add(record.object.clone()).unwrap();
        for (relationship, target) in &record.refs {
            session
                .resolve_or_defer(&source, relationship, Some(target))
                .unwrap();
        }
    }
    session
}

/// Flattens every wired relationship in the finished graph into
/// (source, field, target) entries, ignoring arrival-order effects.
fn wired_pairs(session: &LoadSession<'_>) -> BTreeSet<(String, &'static str, String)> {
    let mut pairs = BTreeSet::new();
    let mut single = |source: &Mrid, field: &'static str, value: &Option<Mrid>| {
        if let Some(target) = value {
            pairs.insert((source.to_string(), field, target.to_string()));
        }
    };
    for object in session.store().iter() {
        match object {
            NetworkObject::Terminal(t) => {
                single(&t.mrid, "conducting_equipment", &t.conducting_equipment);
                single(&t.mrid, "connectivity_node", &t.connectivity_node);
                single(&t.mrid, "normal_feeder", &t.normal_feeder);
            }
            NetworkObject::ConductingEquipment(ce) => {
                single(&ce.mrid, "base_voltage", &ce.base_voltage);
            }
            NetworkObject::Feeder(f) => {
                single(&f.mrid, "normal_head_terminal", &f.normal_head_terminal);
                single(&f.mrid, "substation", &f.substation);
            }
            _ => {}
        }
    }
    // Collections, re-expressed from the single side or as sets.
    for object in session.store().iter() {
        match object {
            NetworkObject::ConductingEquipment(ce) => {
                for t in &ce.terminals {
                    pairs.insert((ce.mrid.to_string(), "terminals", t.to_string()));
                }
                for c in &ce.containers {
                    pairs.insert((ce.mrid.to_string(), "containers", c.to_string()));
                }
            }
            NetworkObject::ConnectivityNode(cn) => {
                for t in &cn.terminals {
                    pairs.insert((cn.mrid.to_string(), "terminals", t.to_string()));
                }
            }
            NetworkObject::Feeder(f) => {
                for e in &f.equipment {
                    pairs.insert((f.mrid.to_string(), "equipment", e.to_string()));
                }
            }
            NetworkObject::Substation(s) => {
                for f in &s.feeders {
                    pairs.insert((s.mrid.to_string(), "feeders", f.to_string()));
                }
            }
            _ => {}
        }
    }
    pairs
}

/// A small but fully connected network: one substation, one feeder, two
/// pieces of equipment, terminals, a shared connectivity node, and a base
/// voltage, with references declared from both ends of most relationships.
fn sample_records() -> Vec<Record> {
    vec![
        Record::new(Substation::new("sub")).with_ref(rel::SUBSTATION_FEEDERS, "fdr"),
        Record::new(Feeder::new("fdr"))
            .with_ref(rel::FEEDER_SUBSTATION, "sub")
            .with_ref(rel::FEEDER_NORMAL_HEAD_TERMINAL, "t1")
            .with_ref(rel::FEEDER_EQUIPMENT, "line")
            .with_ref(rel::FEEDER_EQUIPMENT, "switch"),
        Record::new(ConductingEquipment::new("line"))
            .with_ref(rel::CONDUCTING_EQUIPMENT_TERMINALS, "t1")
            .with_ref(rel::CONDUCTING_EQUIPMENT_TERMINALS, "t2")
            .with_ref(rel::CONDUCTING_EQUIPMENT_BASE_VOLTAGE, "bv11")
            .with_ref(rel::CONDUCTING_EQUIPMENT_CONTAINERS, "fdr"),
        Record::new(ConductingEquipment::new("switch"))
            .with_ref(rel::CONDUCTING_EQUIPMENT_TERMINALS, "t3")
            .with_ref(rel::CONDUCTING_EQUIPMENT_BASE_VOLTAGE, "bv11"),
        Record::new(Terminal::new("t1"))
            .with_ref(rel::TERMINAL_CONDUCTING_EQUIPMENT, "line")
            .with_ref(rel::TERMINAL_NORMAL_FEEDER, "fdr"),
        Record::new(Terminal::new("t2"))
            .with_ref(rel::TERMINAL_CONDUCTING_EQUIPMENT, "line")
            .with_ref(rel::TERMINAL_CONNECTIVITY_NODE, "cn"),
        Record::new(Terminal::new("t3"))
            .with_ref(rel::TERMINAL_CONDUCTING_EQUIPMENT, "switch")
            .with_ref(rel::TERMINAL_CONNECTIVITY_NODE, "cn"),
        Record::new(ConnectivityNode::new("cn"))
            .with_ref(rel::CONNECTIVITY_NODE_TERMINALS, "t2")
            .with_ref(rel::CONNECTIVITY_NODE_TERMINALS, "t3"),
        Record::new(BaseVoltage::new("bv11", 11_000)),
    ]
}

#[test]
fn order_independence_across_permutations() {
    let registry = ResolverRegistry::network();
    let records = sample_records();

    let baseline = load(&registry, &records);
    assert!(baseline.report().is_complete());
    let expected = wired_pairs(&baseline);
    assert!(!expected.is_empty());

    // Reversed stream, and a couple of interleavings that split owners
    // from their children.
    let mut reversed = records.clone();
    reversed.reverse();

    let mut rotated = records.clone();
    rotated.rotate_left(4);

    let mut swapped = records.clone();
    swapped.swap(0, 8);
    swapped.swap(1, 5);

    for permutation in [reversed, rotated, swapped] {
        let session = load(&registry, &permutation);
        assert!(session.report().is_complete());
        assert_eq!(wired_pairs(&session), expected);
        assert!(session.unresolved_reference_ids().is_empty());
    }
}

#[test]
fn drain_completeness_over_reverse_reference_chain() {
    let registry = ResolverRegistry::network();
    let mut session = LoadSession::new(&registry);

    // Alternating terminals and connectivity nodes, each referencing the
    // next object before it exists: t0 -> cn0 -> t1 -> cn1 -> ... -> t5.
    const LINKS: usize = 5;
    for i in 0..LINKS {
        let terminal = format!("t{i}");
        let node = format!("cn{i}");
        session.add(Terminal::new(terminal.as_str())).unwrap();
        session
            .resolve_or_defer(
                &Mrid::new(terminal.as_str()),
                rel::TERMINAL_CONNECTIVITY_NODE,
                Some(node.as_str()),
            )
            .unwrap();
        session.add(ConnectivityNode::new(node.as_str())).unwrap();
        session
            .resolve_or_defer(
                &Mrid::new(node.as_str()),
                rel::CONNECTIVITY_NODE_TERMINALS,
                Some(format!("t{}", i + 1).as_str()),
            )
            .unwrap();
    }
    session.add(Terminal::new("t5")).unwrap();

    // Every deferred entry drained, every link wired in both directions.
    assert_eq!(session.pending_reference_count(), 0);
    assert!(session.unresolved_reference_ids().is_empty());
    for i in 0..LINKS {
        let terminal = session
            .get(&format!("t{i}"))
            .unwrap()
            .as_terminal()
            .unwrap();
        assert_eq!(terminal.connectivity_node, Some(Mrid::new(format!("cn{i}"))));

        let node = session
            .get(&format!("cn{i}"))
            .unwrap()
            .as_connectivity_node()
            .unwrap();
        assert!(node.terminals.contains(&Mrid::new(format!("t{i}"))));
        assert!(node.terminals.contains(&Mrid::new(format!("t{}", i + 1))));
    }
}

#[test]
fn terminal_before_equipment_scenario() {
    let registry = ResolverRegistry::network();
    let mut session = LoadSession::new(&registry);

    // Terminal T1 arrives first, referencing equipment that does not exist.
    session.add(Terminal::new("T1")).unwrap();
    session
        .resolve_or_defer(
            &Mrid::new("T1"),
            rel::TERMINAL_CONDUCTING_EQUIPMENT,
            Some("CE1"),
        )
        .unwrap();

    let t1 = session.get("T1").unwrap().as_terminal().unwrap();
    assert!(t1.conducting_equipment.is_none());
    assert_eq!(session.pending_reference_count(), 1);
    assert_eq!(
        session.unresolved_reference_ids(),
        [Mrid::new("CE1")].into_iter().collect()
    );

    // CE1 arrives declaring its own terminal list.
    session.add(ConductingEquipment::new("CE1")).unwrap();
    session
        .resolve_or_defer(
            &Mrid::new("CE1"),
            rel::CONDUCTING_EQUIPMENT_TERMINALS,
            Some("T1"),
        )
        .unwrap();

    let t1 = session.get("T1").unwrap().as_terminal().unwrap();
    assert_eq!(t1.conducting_equipment, Some(Mrid::new("CE1")));
    let ce1 = session
        .get("CE1")
        .unwrap()
        .as_conducting_equipment()
        .unwrap();
    assert_eq!(ce1.terminals, vec![Mrid::new("T1")]);
    assert_eq!(session.pending_reference_count(), 0);
    assert!(session.unresolved_reference_ids().is_empty());
}

#[test]
fn dangling_references_reported_not_failed() {
    let registry = ResolverRegistry::network();
    let records = [
        Record::new(Terminal::new("t1"))
            .with_ref(rel::TERMINAL_CONDUCTING_EQUIPMENT, "missing-ce")
            .with_ref(rel::TERMINAL_CONNECTIVITY_NODE, "missing-cn"),
        Record::new(Terminal::new("t2")).with_ref(rel::TERMINAL_CONDUCTING_EQUIPMENT, "missing-ce"),
    ];
    let session = load(&registry, &records);

    let ids: Vec<String> = session
        .unresolved_reference_ids()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(ids, vec!["missing-ce", "missing-cn"]);

    let report = session.report();
    assert!(!report.is_complete());
    assert_eq!(report.dangling_reference_count(), 3);
    assert_eq!(report.stats.objects_added, 2);
    assert_eq!(report.stats.references_deferred, 3);
    assert_eq!(report.stats.references_resolved, 0);

    // Both waiters on the shared target, in declaration order.
    let missing_ce = &report.unresolved[0];
    assert_eq!(missing_ce.target, Mrid::new("missing-ce"));
    let sources: Vec<&str> = missing_ce
        .waiting
        .iter()
        .map(|w| w.source.as_str())
        .collect();
    assert_eq!(sources, vec!["t1", "t2"]);

    // The load itself carried on; fields just stayed unset.
    let t1 = session.get("t1").unwrap().as_terminal().unwrap();
    assert!(t1.conducting_equipment.is_none());
    assert!(t1.connectivity_node.is_none());
}

#[test]
fn report_counts_full_load() {
    let registry = ResolverRegistry::network();
    let session = load(&registry, &sample_records());

    let report = session.report();
    assert!(report.is_complete());
    assert_eq!(report.stats.objects_added, 9);
    assert_eq!(report.stats.duplicate_objects, 0);
    // All 19 declared references wired, immediately or on a drain.
    assert_eq!(report.stats.references_resolved, 19);
    assert_eq!(report.stats.references_skipped, 0);
    assert_eq!(report.stats.references_duplicated, 0);
}

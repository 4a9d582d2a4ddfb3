use otter::{
    CenterForce, CollideForce, Error, Forces, GraphData, LinkForce, LinkSpec, ManyBodyForce,
    NodeId, NodeSpec, Simulation, SimulationOptions,
};

fn node(id: u64) -> NodeSpec {
    NodeSpec::new(NodeId(id))
}

fn link(source: u64, target: u64) -> LinkSpec {
    LinkSpec::new(NodeId(source), NodeId(target))
}

fn forces() -> Forces {
    Forces::none()
        .with_center(CenterForce::new(0.0, 0.0))
        .with_many_body(ManyBodyForce::new())
        .with_collide(CollideForce::new())
        .with_link(LinkForce::new())
}

fn running(ids: &[u64], links: &[(u64, u64)]) -> Simulation {
    let data = GraphData::new(
        ids.iter().copied().map(node).collect(),
        links.iter().map(|&(s, t)| link(s, t)).collect(),
    );
    let mut sim = Simulation::new(data, forces(), SimulationOptions::default()).expect("sim");
    sim.tick_n(20).expect("ticks");
    sim
}

#[test]
fn retained_nodes_keep_state_when_one_node_is_swapped() {
    let mut sim = running(&[1, 2, 3], &[(1, 2), (2, 3)]);
    let a = sim.node(NodeId(1)).expect("a");
    let b = sim.node(NodeId(2)).expect("b");
    let c = sim.node(NodeId(3)).expect("c");

    let report = sim
        .update(GraphData::new(
            vec![node(1), node(2), node(4)],
            vec![link(1, 2), link(2, 4)],
        ))
        .expect("update");

    assert_eq!(report.added, vec![NodeId(4)]);
    assert_eq!(report.removed, vec![NodeId(3)]);
    assert_eq!(report.links_added, 1);
    assert_eq!(report.links_removed, 1);

    // bit-for-bit preservation
    assert_eq!(sim.node(NodeId(1)), Some(a));
    assert_eq!(sim.node(NodeId(2)), Some(b));

    assert!(!sim.contains(NodeId(3)));
    assert_eq!(sim.node(NodeId(3)), None);

    let d = sim.node(NodeId(4)).expect("d");
    assert!(d.position.is_finite());
    assert_ne!(d.position, c.position);
    assert_eq!(d.velocity.x, 0.0);
    assert_eq!(d.velocity.y, 0.0);
}

#[test]
fn identical_update_is_a_noop_and_does_not_reheat() {
    let mut sim = running(&[1, 2], &[(1, 2)]);
    sim.run_to_convergence().expect("converge");
    let alpha = sim.alpha();

    let report = sim
        .update(GraphData::new(vec![node(1), node(2)], vec![link(1, 2)]))
        .expect("update");
    assert!(report.is_noop());
    assert_eq!(sim.alpha(), alpha);
    assert!(sim.is_idle());
}

#[test]
fn topology_change_reheats_a_converged_simulation() {
    let mut sim = running(&[1, 2], &[(1, 2)]);
    sim.run_to_convergence().expect("converge");
    assert!(sim.is_idle());

    sim.update(GraphData::new(vec![node(1), node(2), node(3)], vec![link(1, 2)]))
        .expect("update");
    assert!(!sim.is_idle());
    assert!(sim.alpha() >= sim.options().reheat_alpha);
}

#[test]
fn changed_link_strength_counts_as_a_change() {
    let mut sim = running(&[1, 2], &[(1, 2)]);
    let report = sim
        .update(GraphData::new(
            vec![node(1), node(2)],
            vec![link(1, 2).with_strength(0.25)],
        ))
        .expect("update");
    assert_eq!(report.links_changed, 1);
    assert_eq!(sim.links()[0].strength, 0.25);
}

#[test]
fn reversed_link_is_a_different_link() {
    let mut sim = running(&[1, 2], &[(1, 2)]);
    let report = sim
        .update(GraphData::new(vec![node(1), node(2)], vec![link(2, 1)]))
        .expect("update");
    assert_eq!(report.links_added, 1);
    assert_eq!(report.links_removed, 1);
}

#[test]
fn failed_update_leaves_the_simulation_untouched() {
    let mut sim = running(&[1, 2], &[(1, 2)]);
    let before = sim.snapshot();

    let err = sim
        .update(GraphData::new(vec![node(1)], vec![link(1, 2)]))
        .unwrap_err();
    assert!(matches!(err, Error::MissingEndpoint { .. }));
    assert_eq!(sim.snapshot(), before);
    assert_eq!(sim.len(), 2);
}

#[test]
fn failed_force_initialization_leaves_the_simulation_untouched() {
    let data = GraphData::new(vec![node(1), node(2)], vec![link(1, 2)]);
    let forces = Forces::none().with_link(LinkForce::new().with_distance(otter::LinkParam::computed(
        |l, _, _| if l.target == NodeId(3) { f64::NAN } else { 30.0 },
    )));
    let mut sim = Simulation::new(data, forces, SimulationOptions::default()).expect("sim");
    sim.tick_n(3).expect("ticks");
    let before = sim.snapshot();

    let err = sim
        .update(GraphData::new(
            vec![node(1), node(2), node(3)],
            vec![link(1, 2), link(2, 3)],
        ))
        .unwrap_err();
    assert!(matches!(err, Error::NonFinite { .. }));
    assert_eq!(sim.snapshot(), before);
    assert!(!sim.contains(NodeId(3)));
}

#[test]
fn caller_collections_are_not_mutated() {
    let data = GraphData::new(vec![node(1), node(2)], vec![link(1, 2)]);
    let copy = data.clone();
    let mut sim = Simulation::new(data.clone(), forces(), SimulationOptions::default()).expect("sim");
    sim.tick_n(10).expect("ticks");
    sim.update(data.clone()).expect("update");
    assert_eq!(data, copy);
}

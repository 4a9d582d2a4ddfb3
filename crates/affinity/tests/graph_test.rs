use affinity::graph::{NEUTRAL_COLOR, node_id};
use affinity::otter::{self, ForceOptions, SimulationOptions};
use affinity::{Action, Coloring, GraphOptions, SeedOptions, Session, Weights, generate, project};

fn session(size: usize) -> Session {
    let roster = generate(
        11,
        &SeedOptions {
            size,
            ..Default::default()
        },
    )
    .unwrap();
    Session::from_roster(roster, Weights::default()).unwrap()
}

#[test]
fn without_focus_every_ordered_pair_is_linked() {
    let s = session(6);
    let data = project(&s, &GraphOptions::default()).unwrap();
    assert_eq!(data.nodes.len(), 6);
    assert_eq!(data.links.len(), 6 * 5);
    assert!(data.nodes.iter().all(|n| n.fixed.is_none()));
    data.validate().unwrap();
}

#[test]
fn focal_entity_is_pinned_and_links_fan_out_from_it() {
    let mut s = session(6);
    let focal = s.population().keys().nth(2).unwrap();
    s.dispatch(Action::Select { key: focal }).unwrap();

    let options = GraphOptions::default();
    let data = project(&s, &options).unwrap();
    let pinned: Vec<_> = data.nodes.iter().filter(|n| n.fixed.is_some()).collect();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].id, node_id(focal));
    assert_eq!(pinned[0].fixed, Some(options.center));

    assert_eq!(data.links.len(), 5);
    assert!(data.links.iter().all(|l| l.source == node_id(focal)));
}

#[test]
fn links_are_drawn_for_connections_and_weighted_by_similarity() {
    let mut s = session(8);
    let focal = s.population().keys().next().unwrap();
    s.dispatch(Action::Select { key: focal }).unwrap();
    let options = GraphOptions::default();
    let data = project(&s, &options).unwrap();

    let scorer = s.scorer().unwrap();
    let source = s.population().get(focal).unwrap();
    let best = s
        .population()
        .iter()
        .filter(|e| e.key != focal)
        .map(|e| scorer.similarity(source, e).unwrap())
        .fold(0.0, f64::max);
    let strongest = data.links.iter().map(|l| l.strength).fold(0.0, f64::max);
    assert_eq!(strongest, 1.0);
    for link in &data.links {
        let target = s
            .population()
            .iter()
            .find(|e| node_id(e.key) == link.target)
            .unwrap();
        assert_eq!(link.visible, source.is_connected_to(target.key));
        let expected = (scorer.similarity(source, target).unwrap() / best).powf(32.0);
        assert!((link.strength - expected).abs() < 1e-12);
    }
}

#[test]
fn coloring_follows_the_selected_attribute() {
    let s = session(10);

    let plain = GraphOptions {
        coloring: Coloring::None,
        ..Default::default()
    };
    let data = project(&s, &plain).unwrap();
    assert!(data
        .nodes
        .iter()
        .all(|n| n.color.as_deref() == Some(NEUTRAL_COLOR)));

    let by_location = project(&s, &GraphOptions::default()).unwrap();
    assert_eq!(by_location.nodes[0].color.as_deref(), Some("#8cb4d6"));
    for (node, entity) in by_location.nodes.iter().zip(s.population().iter()) {
        for (other_node, other) in by_location.nodes.iter().zip(s.population().iter()) {
            if entity.location == other.location {
                assert_eq!(node.color, other_node.color);
            } else {
                assert_ne!(node.color, other_node.color);
            }
        }
    }

    let by_department = GraphOptions {
        coloring: Coloring::Department,
        ..Default::default()
    };
    let data = project(&s, &by_department).unwrap();
    for (node, entity) in data.nodes.iter().zip(s.population().iter()) {
        if entity.departments.is_empty() {
            assert_eq!(node.color.as_deref(), Some(NEUTRAL_COLOR));
        } else {
            assert_ne!(node.color.as_deref(), Some(NEUTRAL_COLOR));
        }
    }
}

#[test]
fn unscorable_sessions_do_not_project() {
    let mut s = session(4);
    for d in affinity::Dimension::ALL {
        s.dispatch(Action::UpdateWeight {
            dimension: d,
            value: 0.0,
        })
        .unwrap();
    }
    assert!(project(&s, &GraphOptions::default()).is_err());
}

#[test]
fn similar_entities_settle_nearer_the_focal_entity() {
    let mut s = session(12);
    let focal = s.population().keys().nth(3).unwrap();
    s.dispatch(Action::Select { key: focal }).unwrap();
    let options = GraphOptions::default();
    let data = project(&s, &options).unwrap();

    let scorer = s.scorer().unwrap();
    let source = s.population().get(focal).unwrap();
    let mut others: Vec<_> = s
        .population()
        .iter()
        .filter(|e| e.key != focal)
        .map(|e| (e.key, scorer.similarity(source, e).unwrap()))
        .collect();
    others.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (least, most) = (others[0].0, others[others.len() - 1].0);

    let forces = options.forces(&ForceOptions::default());
    let snapshot = otter::layout(data, forces, SimulationOptions::default()).unwrap();
    let from_center = |key| {
        let p = snapshot.nodes[&node_id(key)];
        (p.x - options.center.x).hypot(p.y - options.center.y)
    };
    assert_eq!(from_center(focal), 0.0);
    assert!(
        from_center(most) < from_center(least),
        "most similar at {}, least similar at {}",
        from_center(most),
        from_center(least)
    );
}

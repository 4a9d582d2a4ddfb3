use affinity_core::{AffinityConfig, Error, Weights};
use serde_json::json;

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg = AffinityConfig::default();
    assert_eq!(cfg.weights().unwrap(), Weights::default());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let cfg = AffinityConfig::from_json_str(r#"{"weights":{"interests":2.5}}"#).unwrap();
    let w = cfg.weights().unwrap();
    assert_eq!(w.interests, 2.5);
    assert_eq!(w.connected, Weights::default().connected);
}

#[test]
fn weights_above_the_bound_are_clamped_and_negatives_rejected() {
    let mut cfg = AffinityConfig::default();
    cfg.set_value("weights.locations", json!(10));
    assert_eq!(cfg.weights().unwrap().locations, Weights::MAX);

    cfg.set_value("weights.locations", json!(-1));
    assert!(matches!(cfg.weights(), Err(Error::InvalidWeight { .. })));
}

#[test]
fn malformed_sections_name_their_path() {
    let cfg = AffinityConfig::from_value(json!({"weights": {"connected": "lots"}}));
    match cfg.weights() {
        Err(Error::InvalidConfig { path, .. }) => assert_eq!(path, "weights"),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
    assert!(matches!(
        AffinityConfig::from_json_str("[1, 2]"),
        Err(Error::InvalidConfig { .. })
    ));
    assert!(matches!(
        AffinityConfig::from_json_str("{"),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn deep_merge_overrides_leaves_and_keeps_siblings() {
    let mut cfg = AffinityConfig::from_value(json!({
        "simulation": {"alphaMin": 0.001, "velocityDecay": 0.4},
        "graph": {"exponent": 32}
    }));
    cfg.deep_merge(&json!({"simulation": {"velocityDecay": 0.2}, "seed": {"size": 12}}));
    assert_eq!(cfg.get("simulation.alphaMin"), Some(&json!(0.001)));
    assert_eq!(cfg.get("simulation.velocityDecay"), Some(&json!(0.2)));
    assert_eq!(cfg.get("graph.exponent"), Some(&json!(32)));
    assert_eq!(cfg.get("seed.size"), Some(&json!(12)));
}

#[test]
fn set_value_replaces_non_object_roots_and_segments() {
    let mut cfg = AffinityConfig::from_value(json!(3));
    cfg.set_value("graph.coloring", json!("location"));
    assert_eq!(cfg.get("graph.coloring"), Some(&json!("location")));

    cfg.set_value("graph.coloring.kind", json!(true));
    assert_eq!(cfg.get("graph.coloring"), Some(&json!({"kind": true})));
}

#[test]
fn file_sections_merge_over_serialized_defaults() {
    let mut cfg = AffinityConfig::default();
    cfg.set_section("weights", &Weights::default()).unwrap();
    let file = AffinityConfig::from_json_str(r#"{"weights":{"interests":2}}"#).unwrap();
    cfg.deep_merge(file.as_value());

    assert_eq!(cfg.get("weights.interests"), Some(&json!(2)));
    assert_eq!(cfg.get("weights.locations"), Some(&json!(0.2)));
    let w = cfg.weights().unwrap();
    assert_eq!(w.interests, 2.0);
    assert_eq!(w.departments, Weights::default().departments);
}

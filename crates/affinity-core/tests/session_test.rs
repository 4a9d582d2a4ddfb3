mod common;

use affinity_core::{Action, Dimension, Error, Mutation, Session, Weights};
use common::{catalog, k, population};

fn session() -> Session {
    let c = catalog();
    let p = population(&c);
    Session::new(c, p, Weights::default()).unwrap()
}

#[test]
fn select_and_clear_focus() {
    let mut s = session();
    s.dispatch(Action::Select { key: k(1) }).unwrap();
    assert_eq!(s.focal(), Some(k(1)));
    assert_eq!(
        s.dispatch(Action::Select { key: k(42) }),
        Err(Error::UnknownEntity { key: k(42) })
    );
    assert_eq!(s.focal(), Some(k(1)));
    s.dispatch(Action::Clear).unwrap();
    assert_eq!(s.focal(), None);
}

#[test]
fn deleting_the_focal_entity_clears_focus() {
    let mut s = session();
    s.dispatch(Action::Select { key: k(0) }).unwrap();
    s.dispatch(Action::Mutate {
        mutation: Mutation::Delete { key: k(0) },
    })
    .unwrap();
    assert_eq!(s.focal(), None);
    assert_eq!(s.population().len(), 3);
    // N shrank to 3.
    let w = Weights::default();
    let expected = w.connected * 3.0
        + w.connections * 9.0
        + w.departments * 9.0
        + w.interests * 4.0
        + w.locations * 2.0;
    assert!((s.scorer().unwrap().maximum() - expected).abs() < 1e-9);
}

#[test]
fn zeroing_every_weight_makes_the_session_unscorable_until_restored() {
    let mut s = session();
    for d in Dimension::ALL {
        s.dispatch(Action::UpdateWeight {
            dimension: d,
            value: 0.0,
        })
        .unwrap();
    }
    assert!(matches!(
        s.scorer(),
        Err(Error::DegenerateNormalizer { .. })
    ));
    assert!(s.ranking().is_err());

    s.dispatch(Action::UpdateWeight {
        dimension: Dimension::Locations,
        value: 1.0,
    })
    .unwrap();
    assert!(s.scorer().is_ok());
}

#[test]
fn invalid_weight_leaves_session_untouched() {
    let mut s = session();
    let before = *s.weights();
    assert!(matches!(
        s.dispatch(Action::UpdateWeight {
            dimension: Dimension::Interests,
            value: -1.0,
        }),
        Err(Error::InvalidWeight { .. })
    ));
    assert_eq!(*s.weights(), before);
}

#[test]
fn ranking_orders_by_descending_similarity() {
    let mut s = session();
    s.dispatch(Action::Select { key: k(0) }).unwrap();
    let rows = s.ranking().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.key != k(0)));
    // Bob shares a connection, department, interest and location with Ada.
    assert_eq!(rows[0].key, k(1));
    let scores: Vec<f64> = rows.iter().map(|r| r.similarity.unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
}

#[test]
fn ranking_without_focus_is_alphabetical() {
    let mut s = session();
    s.dispatch(Action::Mutate {
        mutation: Mutation::Create {
            name: "Abe Able".to_string(),
            location: common::l(0),
        },
    })
    .unwrap();
    let names: Vec<String> = s.ranking().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        ["Abe Able", "Ada Lovelace", "Bob Marley", "Cy Twombly", "Dee Dee"]
    );
    assert!(s.ranking().unwrap().iter().all(|r| r.similarity.is_none()));
}

#[test]
fn actions_deserialize_from_tagged_json() {
    let action: Action = serde_json::from_str(
        r#"{"type":"mutate","mutation":{"type":"toggleConnection","a":0,"b":3}}"#,
    )
    .unwrap();
    assert_eq!(
        action,
        Action::Mutate {
            mutation: Mutation::ToggleConnection { a: k(0), b: k(3) }
        }
    );
    let action: Action =
        serde_json::from_str(r#"{"type":"updateWeight","dimension":"interests","value":1.5}"#)
            .unwrap();
    assert_eq!(
        action,
        Action::UpdateWeight {
            dimension: Dimension::Interests,
            value: 1.5
        }
    );
}

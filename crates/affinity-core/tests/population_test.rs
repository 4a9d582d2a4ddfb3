mod common;

use affinity_core::{Entity, Error, Mutation, Population, Roster};
use common::{Lcg, catalog, d, i, k, l, population};

fn assert_symmetric(p: &Population) {
    for e in p.iter() {
        assert!(!e.connections.contains(&e.key), "{} is connected to itself", e.key);
        for other in &e.connections {
            let peer = p.get(*other).expect("connection to a live entity");
            assert!(
                peer.connections.contains(&e.key),
                "{} -> {} has no reverse edge",
                e.key,
                other
            );
        }
    }
}

#[test]
fn toggling_connections_keeps_them_symmetric() {
    let c = catalog();
    let mut p = population(&c);
    let mut rng = Lcg::new(3);
    for _ in 0..200 {
        let a = k(rng.below(4) as u32);
        let b = k(rng.below(4) as u32);
        let result = p.apply(&c, Mutation::ToggleConnection { a, b });
        if a == b {
            assert_eq!(result, Err(Error::SelfConnection { key: a }));
        } else {
            assert_eq!(result, Ok(a));
        }
        assert_symmetric(&p);
    }
}

#[test]
fn toggle_adds_then_removes() {
    let c = catalog();
    let mut p = population(&c);
    p.apply(&c, Mutation::ToggleConnection { a: k(3), b: k(0) })
        .unwrap();
    assert!(p.get(k(0)).unwrap().is_connected_to(k(3)));
    assert!(p.get(k(3)).unwrap().is_connected_to(k(0)));
    p.apply(&c, Mutation::ToggleConnection { a: k(0), b: k(3) })
        .unwrap();
    assert!(!p.get(k(0)).unwrap().is_connected_to(k(3)));
    assert!(!p.get(k(3)).unwrap().is_connected_to(k(0)));
}

#[test]
fn deleting_an_entity_removes_it_from_every_connection_set() {
    let c = catalog();
    let mut p = population(&c);
    assert_eq!(p.apply(&c, Mutation::Delete { key: k(2) }), Ok(k(2)));
    assert_eq!(p.len(), 3);
    assert!(p.iter().all(|e| !e.connections.contains(&k(2))));
    assert_symmetric(&p);

    assert_eq!(
        p.apply(&c, Mutation::Delete { key: k(2) }),
        Err(Error::UnknownEntity { key: k(2) })
    );
}

#[test]
fn created_entities_get_fresh_keys() {
    let c = catalog();
    let mut p = population(&c);
    p.apply(&c, Mutation::Delete { key: k(1) }).unwrap();
    let key = p
        .apply(
            &c,
            Mutation::Create {
                name: "Eve Online".to_string(),
                location: l(1),
            },
        )
        .unwrap();
    assert_eq!(key, k(4));
    let eve = p.get(key).unwrap();
    assert_eq!(eve.initials, "EO");
    assert!(eve.connections.is_empty());
}

#[test]
fn deleting_the_newest_entity_does_not_recycle_its_key() {
    let c = catalog();
    let mut p = population(&c);
    let create = |name: &str| Mutation::Create {
        name: name.to_string(),
        location: l(0),
    };
    p.apply(&c, Mutation::Delete { key: k(3) }).unwrap();
    assert_eq!(p.apply(&c, create("Eve Online")).unwrap(), k(4));

    p.apply(&c, Mutation::Delete { key: k(4) }).unwrap();
    assert_eq!(p.next_key(), k(5));
    assert_eq!(p.apply(&c, create("Fay Wray")).unwrap(), k(5));
    assert!(!p.contains(k(3)) && !p.contains(k(4)));
}

#[test]
fn attribute_mutations_validate_against_the_catalog() {
    let c = catalog();
    let mut p = population(&c);
    let before = p.clone();

    let cases = [
        (
            Mutation::SetDepartment {
                key: k(0),
                department: d(9),
                member: true,
            },
            Error::UnknownDepartment { key: d(9) },
        ),
        (
            Mutation::SetInterest {
                key: k(0),
                interest: i(9),
                member: true,
            },
            Error::UnknownInterest { key: i(9) },
        ),
        (
            Mutation::SetLocation {
                key: k(0),
                location: l(9),
            },
            Error::UnknownLocation { key: l(9) },
        ),
        (
            Mutation::SetLocation {
                key: k(9),
                location: l(0),
            },
            Error::UnknownEntity { key: k(9) },
        ),
    ];
    for (mutation, expected) in cases {
        assert_eq!(p.apply(&c, mutation), Err(expected));
        assert_eq!(p, before);
    }

    p.apply(
        &c,
        Mutation::SetDepartment {
            key: k(2),
            department: d(2),
            member: true,
        },
    )
    .unwrap();
    p.apply(
        &c,
        Mutation::SetDepartment {
            key: k(0),
            department: d(1),
            member: false,
        },
    )
    .unwrap();
    assert!(p.get(k(2)).unwrap().departments.contains(&d(2)));
    assert!(!p.get(k(0)).unwrap().departments.contains(&d(1)));
}

#[test]
fn from_entities_rejects_asymmetric_connections() {
    let c = catalog();
    let mut a = Entity::new(k(0), "A", l(0));
    let b = Entity::new(k(1), "B", l(0));
    a.connections.insert(k(1));
    assert_eq!(
        Population::from_entities(&c, vec![a.clone(), b.clone()]),
        Err(Error::AsymmetricConnection {
            from: k(0),
            to: k(1)
        })
    );
    assert_eq!(
        Population::from_entities(&c, vec![b.clone(), b]),
        Err(Error::DuplicateEntity { key: k(1) })
    );
    let mut selfish = Entity::new(k(5), "S", l(0));
    selfish.connections.insert(k(5));
    assert_eq!(
        Population::from_entities(&c, vec![selfish]),
        Err(Error::SelfConnection { key: k(5) })
    );
}

#[test]
fn roster_json_is_validated_on_load() {
    let c = catalog();
    let roster = Roster {
        catalog: c.clone(),
        population: population(&c),
    };
    let json = serde_json::to_value(&roster).unwrap();
    assert_eq!(json["entities"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["entities"][0]["initials"], "AL");

    let back: Roster = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back, roster);

    let mut broken = json;
    broken["entities"][3]["connections"] = serde_json::json!([0]);
    let err = serde_json::from_value::<Roster>(broken).unwrap_err();
    assert!(err.to_string().contains("no reverse edge"), "{err}");
}

//! Tests for the construction strategies

use std::collections::HashMap;

use rstest::{fixture, rstest};
use valtree::util::testing;
use valtree::{Tree, TreeError, TreeOptions};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

//        org
//      /  |  \
//    eng ops  hr
//    / \   |
//  web db  it
#[fixture]
fn relations() -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        ("org", None),
        ("eng", Some("org")),
        ("ops", Some("org")),
        ("hr", Some("org")),
        ("web", Some("eng")),
        ("db", Some("eng")),
        ("it", Some("ops")),
    ]
}

fn children_map(relations: &[(&'static str, Option<&'static str>)]) -> HashMap<&'static str, Vec<&'static str>> {
    let mut map: HashMap<_, Vec<_>> = HashMap::new();
    for &(child, parent) in relations {
        if let Some(parent) = parent {
            map.entry(parent).or_default().push(child);
        }
    }
    map
}

/// (parent value, child value) pairs, sorted
fn edges<T: Ord + Clone>(tree: &Tree<T>) -> Vec<(T, T)> {
    let mut edges: Vec<(T, T)> = tree
        .nodes()
        .filter_map(|(_, node)| {
            let parent = tree.value(node.parent()?)?;
            Some((parent.clone(), node.value().clone()))
        })
        .collect();
    edges.sort();
    edges
}

// ============================================================
// Strategy equivalence
// ============================================================

#[rstest]
fn given_same_relation_when_building_top_down_and_bottom_up_then_edges_match(
    relations: Vec<(&'static str, Option<&'static str>)>,
) {
    let children = children_map(&relations);
    let parents: HashMap<_, _> = relations.iter().copied().collect();

    let top_down = Tree::from_children_selector(
        vec!["org"],
        |v: &&str| children.get(v).cloned().unwrap_or_default(),
        TreeOptions::default(),
    )
    .unwrap();
    let bottom_up = Tree::from_parent_selector(
        relations.iter().map(|(v, _)| *v),
        |v: &&str| parents.get(v).copied().flatten(),
        TreeOptions::default(),
    )
    .unwrap();

    assert_eq!(top_down.len(), relations.len());
    assert_eq!(bottom_up.len(), relations.len());
    assert_eq!(edges(&top_down), edges(&bottom_up));
    assert_eq!(top_down.depth(), 3);
}

#[rstest]
fn given_same_relation_when_building_incrementally_then_edges_match(
    relations: Vec<(&'static str, Option<&'static str>)>,
) {
    let children = children_map(&relations);
    let mut incremental = Tree::new();
    let org = incremental.add_value("org");
    let mut pending = vec![org];
    while let Some(parent) = pending.pop() {
        let value = *incremental.value(parent).unwrap();
        let kids = children.get(value).cloned().unwrap_or_default();
        pending.extend(incremental.add_children(parent, kids).unwrap());
    }

    let from_values = Tree::from_values_with_children(
        relations.iter().map(|(v, _)| *v),
        |v: &&str| children.get(v).cloned().unwrap_or_default(),
        TreeOptions::default(),
    )
    .unwrap();

    assert_eq!(edges(&incremental), edges(&from_values));
    assert_eq!(from_values.roots().len(), 1);
}

// ============================================================
// Top-down example
// ============================================================

#[test]
fn given_children_selector_when_building_then_levels_and_offspring_match() {
    let tree = Tree::from_children_selector(
        vec!["A"],
        |v: &&str| match *v {
            "A" => vec!["B", "C"],
            "B" => vec!["D"],
            _ => vec![],
        },
        TreeOptions::default(),
    )
    .unwrap();

    assert_eq!(tree.len(), 4);
    let level = |value: &'static str| tree.get(tree.find(&value)[0]).unwrap().level();
    assert_eq!(level("A"), 0);
    assert_eq!(level("B"), 1);
    assert_eq!(level("C"), 1);
    assert_eq!(level("D"), 2);

    let a = tree.roots()[0];
    let offspring: Vec<&str> = tree.offspring(a).iter().map(|&i| *tree.value(i).unwrap()).collect();
    assert_eq!(offspring, vec!["B", "D", "C"]);
}

#[test]
fn given_values_without_explicit_roots_when_building_then_infers_roots() {
    let tree = Tree::from_values_with_children(
        vec![3, 1, 2, 10],
        |v: &i32| if *v == 1 { vec![2, 3] } else { vec![] },
        TreeOptions::default(),
    )
    .unwrap();

    let roots: Vec<i32> = tree.roots().iter().map(|&r| *tree.value(r).unwrap()).collect();
    assert_eq!(roots, vec![1, 10]);
    assert_eq!(tree.len(), 4);
}

#[test]
fn given_existing_tree_when_filling_from_children_then_appends_new_roots() {
    let mut tree = Tree::from_values(vec![0], TreeOptions::default());

    let created = tree.fill_from_children(vec![1], |v: &u8| if *v < 3 { vec![v + 1] } else { vec![] }).unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(tree.roots().len(), 2);
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.depth(), 3);
}

// ============================================================
// Cyclic input
// ============================================================

#[test]
fn given_cyclic_children_when_strict_then_fails() {
    let result = Tree::from_children_selector(
        vec!["a"],
        |v: &&str| match *v {
            "a" => vec!["b"],
            "b" => vec!["a"],
            _ => vec![],
        },
        TreeOptions::strict(),
    );

    assert!(matches!(result, Err(TreeError::InvalidChild { value: "a", .. })));
}

#[test]
fn given_cyclic_children_when_lenient_then_cuts_cycle() {
    let tree = Tree::from_children_selector(
        vec!["a"],
        |v: &&str| match *v {
            "a" => vec!["b", "c"],
            "b" => vec!["a", "d"],
            _ => vec![],
        },
        TreeOptions::lenient(),
    )
    .unwrap();

    let mut values: Vec<&str> = tree.values().copied().collect();
    values.sort();
    assert_eq!(values, vec!["a", "b", "c", "d"]);
}

#[test]
fn given_cycle_below_root_when_building_bottom_up_lenient_then_cuts_cycle() {
    // r <- x, x <- y, y <- x: x reachable from r, y points back at x
    let tree = Tree::from_parent_selector(
        vec!["r", "x", "y"],
        |v: &&str| match *v {
            "x" => vec!["r", "y"],
            "y" => vec!["x"],
            _ => vec![],
        },
        TreeOptions::lenient(),
    )
    .unwrap();

    assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec!["r", "x", "y"]);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn given_multi_parent_value_when_building_bottom_up_then_places_under_each_parent() {
    let tree = Tree::from_parent_selector(
        vec!["p", "q", "shared"],
        |v: &&str| if *v == "shared" { vec!["p", "q"] } else { vec![] },
        TreeOptions::default(),
    )
    .unwrap();

    assert_eq!(tree.find(&"shared").len(), 2);
    assert_eq!(tree.roots().len(), 2);
}

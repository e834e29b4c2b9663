//! Tests for TreeBuilder: flattening scenarios and structural laws

use rstest::rstest;

use taxotree::domain::{
    build_tree, DomainError, TermId, TermRecord, TreeBuilder, TreeNode, UNBOUNDED, VIRTUAL_ROOT,
};
use taxotree::util::testing;

const VID: u64 = 1;

fn term(id: TermId, name: &str, parents: &[TermId]) -> TermRecord {
    TermRecord::new(id, VID, name).with_parents(parents.iter().copied())
}

/// A(1) -> B(2), C(3); D(4) under both B and C
fn diamond() -> Vec<TermRecord> {
    vec![
        term(1, "A", &[]),
        term(2, "B", &[1]),
        term(3, "C", &[1]),
        term(4, "D", &[2, 3]),
    ]
}

/// Two roots, shared subtree with children, uneven depth
fn forest() -> Vec<TermRecord> {
    vec![
        term(1, "animals", &[]),
        term(2, "plants", &[]),
        term(3, "mammals", &[1]),
        term(4, "edible", &[1, 2]),
        term(5, "fruit", &[4]),
        term(6, "apple", &[5]),
        term(7, "cat", &[3]),
        term(8, "trees", &[2]),
    ]
}

fn shape(tree: &[TreeNode]) -> Vec<(&str, usize)> {
    tree.iter().map(|n| (n.name.as_str(), n.depth)).collect()
}

#[test]
fn given_linear_chain_when_building_then_depth_increases_by_one() {
    // Arrange
    testing::init_test_setup();
    let terms = vec![term(1, "A", &[]), term(2, "B", &[1]), term(3, "C", &[2])];

    // Act
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    // Assert
    assert_eq!(shape(&tree), vec![("A", 0), ("B", 1), ("C", 2)]);
}

#[test]
fn given_diamond_when_building_then_shared_node_appears_per_path() {
    // Arrange
    let terms = diamond();

    // Act
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    // Assert
    assert_eq!(
        shape(&tree),
        vec![("A", 0), ("B", 1), ("D", 2), ("C", 1), ("D", 2)]
    );
    assert_eq!(tree[2].via_parent, 2);
    assert_eq!(tree[4].via_parent, 3);
}

#[test]
fn given_diamond_and_depth_bound_when_building_then_shared_node_is_truncated() {
    // Arrange: the bound is exclusive, depth 2 is cut off
    let terms = diamond();

    // Act
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, 2).unwrap();
    let shallow = build_tree(VID, &terms, VIRTUAL_ROOT, 1).unwrap();

    // Assert
    assert_eq!(shape(&tree), vec![("A", 0), ("B", 1), ("C", 1)]);
    assert_eq!(shape(&shallow), vec![("A", 0)]);
}

#[test]
fn given_hidden_middle_node_when_building_then_path_through_it_vanishes() {
    // Arrange: B filtered out upstream, D still points at it
    let terms: Vec<TermRecord> = diamond().into_iter().filter(|t| t.id != 2).collect();

    // Act
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    // Assert
    assert_eq!(shape(&tree), vec![("A", 0), ("C", 1), ("D", 2)]);
    assert_eq!(tree[2].via_parent, 3);
}

#[test]
fn given_empty_input_when_building_then_returns_empty() {
    let tree = build_tree(VID, &[], VIRTUAL_ROOT, UNBOUNDED).unwrap();
    assert!(tree.is_empty());
}

#[rstest]
#[case::unknown_root(99, UNBOUNDED)]
#[case::leaf_root(4, UNBOUNDED)]
#[case::zero_depth(VIRTUAL_ROOT, 0)]
fn given_nothing_to_expand_when_building_then_returns_empty(
    #[case] root: TermId,
    #[case] max_depth: usize,
) {
    let tree = build_tree(VID, &diamond(), root, max_depth).unwrap();
    assert!(tree.is_empty());
}

#[test]
fn given_subtree_root_when_building_then_depths_are_relative() {
    // Arrange
    let terms = forest();

    // Act
    let tree = TreeBuilder::new(VID).root(2).build(&terms).unwrap();

    // Assert
    assert_eq!(
        shape(&tree),
        vec![("edible", 0), ("fruit", 1), ("apple", 2), ("trees", 0)]
    );
}

#[test]
fn given_shared_subtree_when_building_then_whole_subtree_repeats() {
    // Act
    let tree = build_tree(VID, &forest(), VIRTUAL_ROOT, UNBOUNDED).unwrap();

    // Assert
    assert_eq!(
        shape(&tree),
        vec![
            ("animals", 0),
            ("mammals", 1),
            ("cat", 2),
            ("edible", 1),
            ("fruit", 2),
            ("apple", 3),
            ("plants", 0),
            ("edible", 1),
            ("fruit", 2),
            ("apple", 3),
            ("trees", 1),
        ]
    );
}

#[rstest]
#[case::diamond(diamond())]
#[case::forest(forest())]
fn given_hierarchy_when_building_then_structural_laws_hold(#[case] terms: Vec<TermRecord>) {
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    for (i, node) in tree.iter().enumerate() {
        if node.via_parent == VIRTUAL_ROOT {
            assert_eq!(node.depth, 0, "top-level node {} must be at depth 0", node.id);
            continue;
        }
        // Pre-order and depth law: the parent occurrence is the closest
        // earlier node one level up, and it is the node we came through.
        let parent = tree[..i]
            .iter()
            .rev()
            .find(|p| p.depth + 1 == node.depth)
            .expect("parent occurrence precedes child");
        assert_eq!(parent.id, node.via_parent);
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn given_depth_bound_when_building_then_no_node_reaches_it(#[case] max_depth: usize) {
    let tree = build_tree(VID, &forest(), VIRTUAL_ROOT, max_depth).unwrap();

    assert!(!tree.is_empty());
    assert!(tree.iter().all(|n| n.depth < max_depth));
}

#[test]
fn given_multi_parent_node_when_mutating_one_occurrence_then_others_unchanged() {
    // Arrange
    let mut tree = build_tree(VID, &diamond(), VIRTUAL_ROOT, UNBOUNDED).unwrap();

    // Act
    tree[2].depth = 42;
    tree[2].attributes.insert("marked".into(), "yes".into());

    // Assert
    assert_eq!(tree[4].id, 4);
    assert_eq!(tree[4].depth, 2);
    assert!(tree[4].attributes.is_empty());
}

#[test]
fn given_same_input_when_building_twice_then_output_is_identical() {
    let terms = forest();

    let first = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();
    let second = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_attributes_when_building_then_passed_through_and_parents_dropped() {
    // Arrange
    let terms = vec![term(1, "A", &[]).with_attribute("slug", "a")];

    // Act
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    // Assert
    assert_eq!(tree[0].attributes.get("slug").map(String::as_str), Some("a"));
    assert_eq!(tree[0].vocabulary_id, VID);
}

#[test]
fn given_cycle_when_building_then_errors() {
    // Arrange: 2 -> 3 -> 2
    let terms = vec![term(1, "A", &[]), term(2, "B", &[1, 3]), term(3, "C", &[2])];

    // Act
    let result = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED);

    // Assert
    assert!(matches!(result, Err(DomainError::CycleDetected { .. })));
}

#[rstest]
#[case::cycle_hidden(2, vec![("A", 0), ("B", 1)])]
#[case::cycle_at_leaf_level(3, vec![("A", 0), ("B", 1), ("C", 2)])]
#[case::cycle_closes_on_last_level(4, vec![("A", 0), ("B", 1), ("C", 2), ("B", 3)])]
fn given_cycle_within_depth_bound_when_building_then_walk_is_truncated(
    #[case] max_depth: usize,
    #[case] expected: Vec<(&str, usize)>,
) {
    // Arrange: 2 -> 3 -> 2
    let terms = vec![term(1, "A", &[]), term(2, "B", &[1, 3]), term(3, "C", &[2])];

    // Act
    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, max_depth).unwrap();

    // Assert
    assert_eq!(shape(&tree), expected);
}

#[test]
fn given_term_with_reserved_root_id_when_building_then_it_is_skipped() {
    let terms = vec![term(0, "zero", &[]), term(1, "A", &[])];

    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    assert_eq!(shape(&tree), vec![("A", 0)]);
}

#[test]
fn given_unreachable_cycle_when_building_then_succeeds() {
    // 5 <-> 6 never hangs below the virtual root
    let terms = vec![term(1, "A", &[]), term(5, "X", &[6]), term(6, "Y", &[5])];

    let tree = build_tree(VID, &terms, VIRTUAL_ROOT, UNBOUNDED).unwrap();

    assert_eq!(shape(&tree), vec![("A", 0)]);
}

#[test]
fn given_small_step_budget_when_building_then_errors() {
    let result = TreeBuilder::new(VID).max_steps(Some(3)).build(&forest());

    assert_eq!(result, Err(DomainError::StepBudgetExceeded { budget: 3 }));
}

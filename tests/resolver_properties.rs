//! Behavioural properties of geometry, placement and displacement resolution

use block_layout::layout::config::OVERLAP_EPSILON;
use block_layout::layout::{
    is_directly_above, overlaps, Block, BlockId, DimensionChange, Dimensions, LayoutConfig,
    LayoutStore, Placement, Position, Resolver,
};
use pretty_assertions::assert_eq;

fn store_of(blocks: &[(&str, [f64; 3])]) -> LayoutStore {
    let mut store = LayoutStore::new();
    for (id, pos) in blocks {
        store.upsert(Block::unit(*id, Position::from(*pos))).unwrap();
    }
    store
}

fn pos(store: &LayoutStore, id: &str) -> Position {
    store.get(&id.into()).unwrap().position
}

fn dims(w: f64, h: f64, d: f64) -> Dimensions {
    Dimensions::new(w, h, d).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

fn column(len: usize) -> LayoutStore {
    let blocks: Vec<(String, [f64; 3])> = (0..len)
        .map(|i| (format!("c{}", i), [0.0, i as f64, 0.0]))
        .collect();
    let refs: Vec<(&str, [f64; 3])> = blocks.iter().map(|(id, p)| (id.as_str(), *p)).collect();
    store_of(&refs)
}

fn resolver() -> Resolver {
    Resolver::new(&LayoutConfig::default())
}

#[test]
fn test_overlap_is_symmetric() {
    let cases = [
        ([0.0, 0.0, 0.0], [0.5, 0.5, 0.5]),
        ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, 0.0], [3.0, 0.0, 0.0]),
        ([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
    ];
    for (pa, pb) in cases {
        let a = Block::unit("a", Position::from(pa));
        let b = Block::unit("b", Position::from(pb));
        assert_eq!(
            overlaps(&a, &b, OVERLAP_EPSILON),
            overlaps(&b, &a, OVERLAP_EPSILON),
            "asymmetric for {:?} / {:?}",
            pa,
            pb
        );
    }
}

#[test]
fn test_block_never_overlaps_itself() {
    let a = Block::new("a", Position::new(2.0, 3.0, 4.0), dims(2.0, 2.0, 2.0));
    assert!(!overlaps(&a, &a, OVERLAP_EPSILON));
}

#[test]
fn test_flush_stack_is_directly_above() {
    let lower = Block::unit("lower", Position::origin());
    let upper = Block::unit("upper", Position::new(0.0, 1.0, 0.0));
    let gapped = Block::unit("gapped", Position::new(0.0, 1.2, 0.0));

    assert!(is_directly_above(&upper, &lower, OVERLAP_EPSILON));
    assert!(!is_directly_above(&gapped, &lower, OVERLAP_EPSILON));
}

#[test]
fn test_three_stack_growth() {
    let mut store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [0.0, 1.0, 0.0]), ("c", [0.0, 2.0, 0.0])]);

    let res = resolver()
        .resize(&mut store, &"a".into(), dims(1.0, 2.0, 1.0))
        .unwrap();

    assert!(res.converged);
    assert_eq!(pos(&store, "a").y, 0.0);
    assert_eq!(pos(&store, "b").y, 2.0);
    assert_eq!(pos(&store, "c").y, 3.0);
}

#[test]
fn test_no_spurious_movement() {
    // Left, behind, raised-but-apart and far-away blocks must stay put
    let mut store = store_of(&[
        ("a", [1.0, 0.0, 1.0]),
        ("left", [0.0, 0.0, 1.0]),
        ("behind", [1.0, 0.0, 0.0]),
        ("apart", [3.0, 1.0, 1.0]),
        ("far", [5.0, 0.0, 5.0]),
    ]);
    let before = store.all();

    let res = resolver()
        .resize(&mut store, &"a".into(), dims(1.0, 2.0, 1.0))
        .unwrap();

    assert!(res.displacements.is_empty());
    let after: Vec<_> = store.iter().filter(|b| b.id.as_str() != "a").cloned().collect();
    let expected: Vec<_> = before.into_iter().filter(|b| b.id.as_str() != "a").collect();
    assert_eq!(after, expected);
}

#[test]
fn test_row_widening() {
    let mut store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [1.0, 0.0, 0.0]), ("c", [2.0, 0.0, 0.0])]);

    resolver()
        .resize(&mut store, &"a".into(), dims(2.0, 1.0, 1.0))
        .unwrap();

    assert_eq!(pos(&store, "b").x, 2.0);
    assert_eq!(pos(&store, "c").x, 3.0);
}

#[test]
fn test_noop_resize_displaces_nothing() {
    let store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [0.0, 1.0, 0.0])]);
    let change = DimensionChange {
        block: "a".into(),
        old: Dimensions::unit(),
        new: Dimensions::unit(),
        position: Position::origin(),
    };

    let res = resolver().resolve(&store, &change);

    assert!(res.displacements.is_empty());
    assert_eq!(res.passes, 0);
    assert!(res.converged);
}

#[test]
fn test_dense_grid_terminates() {
    let mut blocks = Vec::new();
    for x in 0..4 {
        for y in 0..4 {
            for z in 0..4 {
                blocks.push((format!("g{}{}{}", x, y, z), [x as f64, y as f64, z as f64]));
            }
        }
    }
    let refs: Vec<(&str, [f64; 3])> = blocks.iter().map(|(id, p)| (id.as_str(), *p)).collect();
    let mut store = store_of(&refs);

    let res = resolver()
        .resize(&mut store, &"g000".into(), dims(2.0, 2.0, 2.0))
        .unwrap();

    let config = LayoutConfig::default();
    assert!(res.passes <= config.max_iterations);
    assert!(!res.displacements.contains(&BlockId::new("g000")));
    assert_eq!(pos(&store, "g000"), Position::origin());
}

#[test]
fn test_tall_column_hits_iteration_cap() {
    let mut store = column(15);

    let res = resolver()
        .resize(&mut store, &"c0".into(), dims(1.0, 2.0, 1.0))
        .unwrap();

    assert!(!res.converged);
    assert_eq!(res.passes, 10);
    // c1 by the resize, c2..=c11 by ten passes
    assert_eq!(res.displacements.len(), 11);
    assert_eq!(pos(&store, "c11").y, 12.0);
    assert_eq!(pos(&store, "c12").y, 12.0);
}

#[test]
fn test_column_finished_on_last_pass_converges() {
    // c11 is pushed by the tenth pass and has nothing on top of it
    let mut store = column(12);

    let res = resolver()
        .resize(&mut store, &"c0".into(), dims(1.0, 2.0, 1.0))
        .unwrap();

    assert_eq!(res.passes, 10);
    assert_eq!(res.displacements.len(), 11);
    assert!(res.converged);
    assert_eq!(pos(&store, "c11").y, 12.0);
}

#[test]
fn test_cyclic_contact_terminates() {
    // Two thin slabs within touch tolerance of each other: each counts as
    // resting on the other. Only t1 sits on the base.
    let mut store = LayoutStore::new();
    store.upsert(Block::unit("base", Position::origin())).unwrap();
    store
        .upsert(Block::new("t1", Position::new(0.5, 1.0, 0.0), dims(1.0, 0.05, 1.0)))
        .unwrap();
    store
        .upsert(Block::new("t2", Position::new(1.2, 1.02, 0.0), dims(1.0, 0.05, 1.0)))
        .unwrap();

    let res = resolver()
        .resize(&mut store, &"base".into(), dims(1.0, 2.0, 1.0))
        .unwrap();

    assert!(res.passes <= LayoutConfig::default().max_iterations);
    assert!(res.converged);
    assert_eq!(res.displacements.len(), 2);
    // Each slab moved exactly once, by the resize delta
    assert_close(pos(&store, "t1").y, 2.0);
    assert_close(pos(&store, "t2").y, 2.02);
    assert_eq!(pos(&store, "base"), Position::origin());
}

#[test]
fn test_placement_deduplicates() {
    let mut store = LayoutStore::new();
    let placement = Placement::new(&LayoutConfig::default());

    assert!(placement.add_block_at(&mut store, Position::new(1.0, 0.0, 0.0)).is_some());
    assert!(placement.add_block_at(&mut store, Position::new(1.05, 0.0, 0.0)).is_none());
    assert_eq!(store.len(), 1);
}

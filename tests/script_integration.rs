//! End-to-end script runs: parse, execute, lint and snapshot

use block_layout::layout::{LayoutConfig, LintCategory};
use block_layout::{run_script, run_script_with_config, LayoutSnapshot, RunConfig, RunError};
use pretty_assertions::assert_eq;

fn reports(source: &str) -> String {
    run_script(source)
        .expect("Should run")
        .reports
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

const TOWER: &str = r#"
    // ground floor shop with two flats stacked on it
    block lobby at (0, 0, 0) size (2, 1, 1) [kind: store, name: "Lobby"]
    add next_to lobby face +y
    add next_to b1 face +y
    add at (0, 1, 0)
    resize lobby height 2
"#;

#[test]
fn test_tower_reports() {
    insta::assert_snapshot!(reports(TOWER), @r###"
    added lobby at (0, 0, 0)
    added b1 at (0, 1, 0)
    added b2 at (0, 2, 0)
    skipped (0, 1, 0)
    resized lobby to 2x2x1, displaced b1, b2 (2 passes)
    "###);
}

#[test]
fn test_tower_layout() {
    let outcome = run_script(TOWER).expect("Should run");
    insta::assert_snapshot!(LayoutSnapshot::from_store(&outcome.layout).to_text(), @r###"
    lobby store at (0, 0, 0) size 2x2x1 "Lobby"
    b1 apartment at (0, 2, 0) size 1x1x1
    b2 apartment at (0, 3, 0) size 1x1x1
    "###);
}

#[test]
fn test_shrink_policy_from_config() {
    let source = "block a at (0, 0, 0) size (1, 2, 1) block b at (0, 2, 0) resize a height 1";

    let follow = run_script(source).expect("Should run");
    assert_eq!(follow.layout.get(&"b".into()).unwrap().position.y, 1.0);

    let layout = LayoutConfig::from_str("[resolver]\nshrink = \"push_away\"\n").unwrap();
    let push_away =
        run_script_with_config(source, &RunConfig::new().with_layout(layout)).expect("Should run");
    assert_eq!(push_away.layout.get(&"b".into()).unwrap().position.y, 3.0);
}

#[test]
fn test_capped_run_is_caught_by_lint() {
    let source = "
        block r0 at (0, 0, 0)
        block r1 at (1, 0, 0)
        block r2 at (2, 0, 0)
        block r3 at (3, 0, 0)
        block r4 at (4, 0, 0)
        block r5 at (5, 0, 0)
        resize r0 width 2
    ";
    let layout = LayoutConfig::from_str("[resolver]\nmax_iterations = 2\n").unwrap();
    let config = RunConfig::new().with_layout(layout).with_lint(true);

    let outcome = run_script_with_config(source, &config).expect("Should run");

    let categories: Vec<LintCategory> = outcome.warnings.iter().map(|w| w.category).collect();
    assert_eq!(categories, vec![LintCategory::Duplicate]);
    assert!(outcome.warnings[0].message.contains("'r3' and 'r4'"));
}

#[test]
fn test_face_placement_underground_is_skipped() {
    let outcome = run_script("block a at (0, 0, 0) add next_to a face -y").expect("Should run");
    assert_eq!(outcome.layout.len(), 1);
}

#[test]
fn test_json_snapshot_reloads() {
    let outcome = run_script(TOWER).expect("Should run");
    let json = LayoutSnapshot::from_store(&outcome.layout).to_json().unwrap();
    let reloaded = LayoutSnapshot::from_json(&json).unwrap().into_store().unwrap();
    assert_eq!(reloaded.all(), outcome.layout.all());
}

#[test]
fn test_command_error_carries_span() {
    let source = "block a at (0, 0, 0)\nresize b height 2";
    match run_script(source).unwrap_err() {
        RunError::Command(e) => {
            assert_eq!(&source[e.span.clone()], "resize b height 2");
            assert_eq!(e.error.suggestions(), Some(&["a".to_string()][..]));
        }
        other => panic!("Expected command error, got {:?}", other),
    }
}

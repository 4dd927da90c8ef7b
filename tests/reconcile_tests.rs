/// Behavioral tests for datafile-set reconciliation: plan computation over
/// existing/target sets, action ordering, per-content-type DDL rendering,
/// and change summaries.

use orastate::{ContentType, Datafile, DatafileAction, PlanSummary, ReconcilePlan, Size};

fn plain(path: &str, size: &str) -> Datafile {
    Datafile::new(path, Size::parse(size))
}

#[test]
fn test_grow_one_add_one() {
    let existing = vec![plain("/u01/a.dbf", "512")];
    let target = vec![plain("/u01/a.dbf", "1024"), plain("/u01/b.dbf", "512")];

    let plan = ReconcilePlan::compute(&existing, &target);
    assert_eq!(plan.actions.len(), 2);

    match &plan.actions[0] {
        DatafileAction::Resize(df) => assert_eq!(df.path(), "/u01/a.dbf"),
        other => panic!("expected a resize first, got {:?}", other),
    }
    match &plan.actions[1] {
        DatafileAction::Add(df) => assert_eq!(df.path(), "/u01/b.dbf"),
        other => panic!("expected an add second, got {:?}", other),
    }

    assert_eq!(
        plan.ddl("TBS_DATA", ContentType::Permanent),
        vec![
            "alter database datafile '/u01/a.dbf' resize 1K",
            "alter tablespace TBS_DATA add datafile '/u01/b.dbf' size 512 reuse  autoextend off",
        ]
    );
}

#[test]
fn test_resize_renders_canonical_size() {
    // 1024 bytes collapse to 1K; sizes off the 1024 grid stay in bytes
    let plan = ReconcilePlan::compute(
        &[plain("/u01/a.dbf", "512")],
        &[plain("/u01/a.dbf", "1024")],
    );
    assert_eq!(
        plan.ddl("TBS_DATA", ContentType::Permanent),
        vec!["alter database datafile '/u01/a.dbf' resize 1K"]
    );

    let plan = ReconcilePlan::compute(
        &[plain("/u01/a.dbf", "512")],
        &[plain("/u01/a.dbf", "1500")],
    );
    assert_eq!(
        plan.ddl("TBS_DATA", ContentType::Permanent),
        vec!["alter database datafile '/u01/a.dbf' resize 1500"]
    );
}

#[test]
fn test_matched_file_can_need_resize_and_autoextend_change() {
    let existing = vec![plain("/u01/a.dbf", "512M")];
    let target = vec![plain("/u01/a.dbf", "1G")
        .autoextend(true)
        .maxsize(Size::parse("10G"))];

    let plan = ReconcilePlan::compute(&existing, &target);

    // Autoextend targets are not resized, only switched
    assert_eq!(plan.actions.len(), 1);
    assert!(matches!(plan.actions[0], DatafileAction::ChangeAutoextend(_)));
    assert_eq!(
        plan.ddl("TBS_DATA", ContentType::Permanent),
        vec!["alter database datafile '/u01/a.dbf'  autoextend on maxsize 10G"]
    );

    // A fixed-size target that also turns autoextend off gets both
    let existing = vec![plain("/u01/a.dbf", "512M").autoextend(true)];
    let target = vec![plain("/u01/a.dbf", "1G")];

    let plan = ReconcilePlan::compute(&existing, &target);
    assert_eq!(plan.actions.len(), 2);
    assert!(matches!(plan.actions[0], DatafileAction::Resize(_)));
    assert!(matches!(plan.actions[1], DatafileAction::ChangeAutoextend(_)));
    assert_eq!(
        plan.ddl("TBS_DATA", ContentType::Permanent),
        vec![
            "alter database datafile '/u01/a.dbf' resize 1G",
            "alter database datafile '/u01/a.dbf'  autoextend off",
        ]
    );
}

#[test]
fn test_files_absent_from_target_are_removed_last() {
    let existing = vec![plain("/u01/a.dbf", "1G"), plain("/u01/b.dbf", "1G")];
    let target = vec![plain("/u01/c.dbf", "1G"), plain("/u01/a.dbf", "1G")];

    let plan = ReconcilePlan::compute(&existing, &target);
    assert_eq!(plan.actions.len(), 2);
    assert!(matches!(&plan.actions[0], DatafileAction::Add(df) if df.path() == "/u01/c.dbf"));
    assert!(matches!(&plan.actions[1], DatafileAction::Remove(df) if df.path() == "/u01/b.dbf"));

    assert_eq!(
        plan.ddl("TBS_DATA", ContentType::Permanent)[1],
        "alter tablespace TBS_DATA drop datafile '/u01/b.dbf'"
    );
}

#[test]
fn test_identical_sides_produce_an_empty_plan() {
    let existing = vec![
        plain("/u01/a.dbf", "1G"),
        plain("/u01/b.dbf", "512M")
            .autoextend(true)
            .nextsize(Size::parse("100M"))
            .maxsize(Size::parse("10G")),
    ];

    let plan = ReconcilePlan::compute(&existing, &existing.clone());
    assert!(plan.is_empty());
    assert!(plan.ddl("TBS_DATA", ContentType::Permanent).is_empty());
    assert_eq!(plan.summary(), PlanSummary::default());
}

#[test]
fn test_temp_content_uses_tempfile_keyword() {
    let existing = vec![plain("/u01/temp01.dbf", "1G").autoextend(true)];
    let target = vec![
        plain("/u01/temp01.dbf", "1G"),
        plain("/u01/temp02.dbf", "2G"),
    ];

    let plan = ReconcilePlan::compute(&existing, &target);
    let statements = plan.ddl("TEMP", ContentType::Temp);
    assert_eq!(
        statements,
        vec![
            // No size growth recorded yet, only the autoextend flip
            "alter database tempfile '/u01/temp01.dbf'  autoextend off",
            "alter tablespace TEMP add tempfile '/u01/temp02.dbf' size 2G reuse  autoextend off",
        ]
    );

    // Resize goes through the datafile keyword regardless of content
    let plan = ReconcilePlan::compute(
        &[plain("/u01/temp01.dbf", "1G")],
        &[plain("/u01/temp01.dbf", "2G")],
    );
    assert_eq!(
        plan.ddl("TEMP", ContentType::Temp),
        vec!["alter database datafile '/u01/temp01.dbf' resize 2G"]
    );
}

#[test]
fn test_undo_content_keeps_datafile_keyword() {
    let plan = ReconcilePlan::compute(&[], &[plain("/u01/undo01.dbf", "4G")]);
    assert_eq!(
        plan.ddl("UNDOTBS1", ContentType::Undo),
        vec!["alter tablespace UNDOTBS1 add datafile '/u01/undo01.dbf' size 4G reuse  autoextend off"]
    );
}

#[test]
fn test_summary_counts_by_action_kind() {
    let existing = vec![
        plain("/u01/a.dbf", "512M"),
        plain("/u01/b.dbf", "1G").autoextend(true),
        plain("/u01/gone.dbf", "1G"),
    ];
    let target = vec![
        plain("/u01/a.dbf", "1G"),
        plain("/u01/b.dbf", "2G"),
        plain("/u01/new.dbf", "1G"),
    ];

    let plan = ReconcilePlan::compute(&existing, &target);
    let summary = plan.summary();
    assert_eq!(summary.resized, 2);
    assert_eq!(summary.autoextend_changed, 1);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.removed, 1);

    let rendered = serde_json::to_value(&summary).unwrap();
    assert_eq!(
        rendered,
        serde_json::json!({
            "resized": 2,
            "autoextend_changed": 1,
            "added": 1,
            "removed": 1,
        })
    );
}

// tests/reconcile.rs
//
// Pages whose numbers never add up, or whose tables never appear, must fail
// within the configured budget instead of returning partial counts.

use trac_collate::core::FakePage;
use trac_collate::engine::{AxisPermutation, Collator, CollateError, Tuning};
use trac_collate::progress::NullProgress;
use trac_collate::specs::LayoutKind;

fn page(kind: LayoutKind) -> FakePage {
    FakePage::builder(kind)
        .axis("Court", &["Boston", "Denver"])
        .axis("Decision", &["Granted", "Denied"])
        .axis("Age", &["Minor", "Adult"])
        .record(&["Boston", "Granted", "Adult"], 40)
        .record(&["Boston", "Denied", "Minor"], 2)
        .record(&["Denver", "Denied", "Adult"], 17)
        .build()
}

fn axes() -> [String; 3] {
    ["Court".into(), "Decision".into(), "Age".into()]
}

fn run(doc: &mut FakePage, tuning: Tuning) -> Result<(), CollateError> {
    let kind = doc.kind();
    let mut c = Collator::attach(doc, kind, tuning)?;
    c.run_traversal(&AxisPermutation::IDENTITY, &axes(), &mut NullProgress)?;
    Ok(())
}

#[test]
fn misprinted_child_table_fails_reconciliation() {
    let mut doc = page(LayoutKind::Object).skew(1, 1);
    let err = run(&mut doc, Tuning::fast().with_attempt_cap(3)).unwrap_err();

    match err {
        CollateError::Reconciliation { table, expected, observed, attempts } => {
            assert_eq!(table, 2);
            assert_eq!(expected, 42);
            assert_eq!(observed, 43);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected Reconciliation, got {other:?}"),
    }
}

#[test]
fn misprinted_parent_row_fails_on_the_leaf_level() {
    let mut doc = page(LayoutKind::Link).skew(2, -1);
    let err = run(&mut doc, Tuning::fast().with_attempt_cap(2)).unwrap_err();
    assert!(matches!(err, CollateError::Reconciliation { table: 3, attempts: 2, .. }));
}

#[test]
fn missing_tables_give_up_after_exactly_the_cap() {
    for cap in [1, 4, 7] {
        let mut doc = page(LayoutKind::Object).hide_tables();
        let err = run(&mut doc, Tuning::fast().with_attempt_cap(cap)).unwrap_err();
        match err {
            CollateError::ElementNotFound { what, attempts } => {
                assert_eq!(what, "table 1");
                assert_eq!(attempts, cap);
            }
            other => panic!("expected ElementNotFound, got {other:?}"),
        }
    }
}

#[test]
fn consistent_page_needs_no_retries() {
    let mut doc = page(LayoutKind::Link);
    let kind = doc.kind();
    let mut c = Collator::attach(&mut doc, kind, Tuning::fast().with_attempt_cap(1)).unwrap();
    let counts = c.run_traversal(&AxisPermutation::IDENTITY, &axes(), &mut NullProgress).unwrap();

    assert_eq!(counts["Boston"]["Granted"]["Adult"], 40);
    assert_eq!(counts["Denver"]["Denied"]["Adult"], 17);
    assert!(!counts["Denver"].contains_key("Granted"));
}

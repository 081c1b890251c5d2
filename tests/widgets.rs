// tests/widgets.rs
//
// Selection widgets: option listing, committing, and validation up front.

use rstest::rstest;
use trac_collate::core::FakePage;
use trac_collate::engine::{AxisPermutation, Collator, CollateError, Tuning};
use trac_collate::progress::NullProgress;
use trac_collate::specs::LayoutKind;

fn page(kind: LayoutKind) -> FakePage {
    FakePage::builder(kind)
        .axis("Nationality", &["Mexico", "China", "India"])
        .axis("Decision", &["Granted", "Denied"])
        .axis("Custody", &["Detained", "Released"])
        .record(&["Mexico", "Denied", "Detained"], 120)
        .record(&["China", "Granted", "Released"], 85)
        .record(&["India", "Granted", "Detained"], 9)
        .build()
}

fn names(c: &Collator<&mut FakePage>, widget: usize) -> Vec<String> {
    c.widget_options(widget).iter().map(|o| o.name.clone()).collect()
}

#[rstest]
fn every_widget_lists_every_axis(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    let mut doc = page(kind);
    let c = Collator::attach(&mut doc, kind, Tuning::fast()).unwrap();
    for w in 0..3 {
        assert_eq!(names(&c, w), ["Nationality", "Decision", "Custody"]);
    }
    assert!(names(&c, 3).is_empty());
}

#[rstest]
fn commits_land_in_widget_order(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    let mut doc = page(kind);
    let mut c = Collator::attach(&mut doc, kind, Tuning::fast()).unwrap();
    assert_eq!(c.committed(0), None);
    c.commit_axes(&["Custody".into(), "Nationality".into(), "Decision".into()]).unwrap();
    assert_eq!(c.committed(0), Some("Custody"));
    assert_eq!(c.committed(2), Some("Decision"));

    let doc = c.into_document();
    assert_eq!(doc.assignment(), ["Custody", "Nationality", "Decision"]);
}

#[test]
fn unknown_axis_is_rejected_before_any_commit() {
    let mut doc = page(LayoutKind::Object);
    let mut c = Collator::attach(&mut doc, LayoutKind::Object, Tuning::fast()).unwrap();
    let clicks = c.document().clicks();

    let axes = ["Nationality".into(), "Decision".into(), "Gender".into()];
    let err = c.run_traversal(&AxisPermutation::IDENTITY, &axes, &mut NullProgress).unwrap_err();

    match err {
        CollateError::AxisNotFound { axis, widget } => {
            assert_eq!(axis, "Gender");
            assert_eq!(widget, 0);
        }
        other => panic!("expected AxisNotFound, got {other:?}"),
    }
    assert_eq!(c.document().clicks(), clicks);
}

#[rstest]
fn stale_option_reads_are_retried(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    let mut doc = page(kind).stale_option_reads(3);
    let mut c = Collator::attach(&mut doc, kind, Tuning::fast()).unwrap();
    assert_eq!(names(&c, 0), ["Nationality", "Decision", "Custody"]);

    c.commit_axes(&["Decision".into(), "Custody".into(), "Nationality".into()]).unwrap();
    drop(c);
    assert_eq!(doc.assignment(), ["Decision", "Custody", "Nationality"]);
}

#[test]
fn option_reads_that_never_settle_exhaust_the_budget() {
    let mut doc = page(LayoutKind::Link).stale_option_reads(u32::MAX);
    let err = Collator::attach(&mut doc, LayoutKind::Link, Tuning::fast().with_attempt_cap(6))
        .err()
        .unwrap();
    assert!(matches!(err, CollateError::StaleReference { attempts: 6, .. }));
}

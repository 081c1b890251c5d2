// tests/traversal.rs
//
// Full walks over the in-memory page, both layouts.

use std::collections::BTreeMap;

use rstest::rstest;
use trac_collate::config::options::CollateOptions;
use trac_collate::core::FakePage;
use trac_collate::engine::{AxisPermutation, Collator, CollateError, NestedCounts, Tuning};
use trac_collate::progress::{NullProgress, Progress};
use trac_collate::runner;
use trac_collate::specs::LayoutKind;

const URL: &str = "https://tracreports.org/phptools/immigration/asylum/";

fn axes() -> [String; 3] {
    ["First".into(), "Second".into(), "Third".into()]
}

/// Table 1 `A:2, B:3`; under A `X:1, Y:1`; under B `Z:3`; leaves p, q, r.
fn page(kind: LayoutKind) -> FakePage {
    FakePage::builder(kind)
        .axis("First", &["A", "B"])
        .axis("Second", &["X", "Y", "Z"])
        .axis("Third", &["p", "q", "r"])
        .record(&["A", "X", "p"], 1)
        .record(&["A", "Y", "q"], 1)
        .record(&["B", "Z", "r"], 3)
        .build()
}

fn leaf(name: &str, count: u64) -> BTreeMap<String, u64> {
    BTreeMap::from([(name.to_string(), count)])
}

fn expected() -> NestedCounts {
    BTreeMap::from([
        (
            "A".to_string(),
            BTreeMap::from([("X".to_string(), leaf("p", 1)), ("Y".to_string(), leaf("q", 1))]),
        ),
        ("B".to_string(), BTreeMap::from([("Z".to_string(), leaf("r", 3))])),
    ])
}

fn walk(doc: &mut FakePage, tuning: Tuning) -> Result<(NestedCounts, usize), CollateError> {
    let kind = doc.kind();
    let mut c = Collator::open(doc, URL, kind, tuning)?;
    let counts = c.run_traversal(&AxisPermutation::IDENTITY, &axes(), &mut NullProgress)?;
    Ok((counts, c.anomalies()))
}

#[rstest]
fn three_level_walk_matches_page(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    let mut doc = page(kind);
    let (counts, anomalies) = walk(&mut doc, Tuning::fast()).unwrap();

    assert_eq!(counts, expected());
    assert_eq!(anomalies, 0);
    assert_eq!(doc.navigated(), [URL.to_string()]);
    assert_eq!(doc.assignment(), ["First", "Second", "Third"]);
}

#[rstest]
fn lagging_tables_are_waited_out(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    let mut doc = page(kind).lag(1, 2);
    let (counts, anomalies) = walk(&mut doc, Tuning::fast()).unwrap();

    assert_eq!(counts, expected());
    // stale text never lines up with the re-rendered row elements
    assert!(anomalies > 0);
}

#[rstest]
fn table_one_is_reread_until_text_matches_rows(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    // table 1 keeps showing the First axis for one read after the swap
    let mut doc = page(kind).lag(0, 1);
    let swapped = ["Second".to_string(), "First".to_string(), "Third".to_string()];
    let mut c = Collator::open(&mut doc, URL, kind, Tuning::fast()).unwrap();
    let counts = c.run_traversal(&AxisPermutation::IDENTITY, &swapped, &mut NullProgress).unwrap();

    let under = |outer: &str, leaves: BTreeMap<String, u64>| BTreeMap::from([(outer.to_string(), leaves)]);
    assert_eq!(
        counts,
        BTreeMap::from([
            ("X".to_string(), under("A", leaf("p", 1))),
            ("Y".to_string(), under("A", leaf("q", 1))),
            ("Z".to_string(), under("B", leaf("r", 3))),
        ])
    );
    assert_eq!(c.anomalies(), 0);
}

#[rstest]
fn stale_row_clicks_are_retried(
    #[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind,
    // 25 runs out the first click budget of 20 and recovers after a re-read
    #[values(1, 2, 19, 25)] stale: u32,
) {
    let mut doc = page(kind).fail_clicks(stale);
    let (counts, _) = walk(&mut doc, Tuning::fast()).unwrap();
    assert_eq!(counts, expected());
}

#[test]
fn row_that_stays_stale_aborts_with_position() {
    let mut doc = page(LayoutKind::Object).fail_clicks(u32::MAX);
    let err = walk(&mut doc, Tuning::fast()).unwrap_err();

    match err {
        CollateError::RowClick { table, row, name, cursor, source } => {
            assert_eq!(table, 1);
            assert_eq!(row, 0);
            assert_eq!(name, "A");
            assert_eq!(cursor, "(0, -)");
            assert!(matches!(*source, CollateError::StaleReference { attempts: 20, .. }));
        }
        other => panic!("expected RowClick, got {other:?}"),
    }
}

#[rstest]
fn repeated_child_name_keeps_the_later_read(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    // Y is printed as a second X under A
    let mut doc = page(kind).alias(1, "Y", "X");
    let (counts, _) = walk(&mut doc, Tuning::fast()).unwrap();

    assert_eq!(counts["A"], BTreeMap::from([("X".to_string(), leaf("q", 1))]));
    assert_eq!(counts["B"], expected()["B"]);
}

#[rstest]
#[case::table_one(0, "A")]
#[case::table_two(1, "X")]
fn row_lost_mid_walk_is_walked_again(
    #[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind,
    #[case] table: usize,
    #[case] name: &str,
) {
    let mut doc = page(kind).vanishing_row(table, name, 1);
    let (counts, _) = walk(&mut doc, Tuning::fast()).unwrap();
    assert_eq!(counts, expected());
}

#[rstest]
#[case::table_one(0, "A", 1, 5, 3)]
#[case::table_two(1, "X", 2, 2, 1)]
fn row_that_keeps_vanishing_ends_in_walk_mismatch(
    #[case] table: usize,
    #[case] name: &str,
    #[case] want_level: usize,
    #[case] want_expected: u64,
    #[case] want_observed: u64,
) {
    let mut doc = page(LayoutKind::Object).vanishing_row(table, name, u32::MAX);
    let err = walk(&mut doc, Tuning::fast()).unwrap_err();

    match err {
        CollateError::WalkMismatch { level, expected, observed, passes } => {
            assert_eq!(level, want_level);
            assert_eq!(expected, want_expected);
            assert_eq!(observed, want_observed);
            assert_eq!(passes, 5);
        }
        other => panic!("expected WalkMismatch, got {other:?}"),
    }
}

#[test]
fn stray_row_elements_do_not_shift_clicks() {
    let mut doc = page(LayoutKind::Object).extra_row_elements(0, 3);
    let (counts, anomalies) = walk(&mut doc, Tuning::fast()).unwrap();

    assert_eq!(counts, expected());
    assert_eq!(anomalies, 1);
}

#[rstest]
fn full_rerender_on_every_click(#[values(LayoutKind::Object, LayoutKind::Link)] kind: LayoutKind) {
    let mut doc = page(kind).rerender_on_click();
    let (counts, _) = walk(&mut doc, Tuning::fast()).unwrap();
    assert_eq!(counts, expected());
}

#[derive(Default)]
struct Recorder {
    totals: Vec<usize>,
    rows: Vec<(String, usize)>,
    cells: Vec<(String, String)>,
    finished: usize,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.totals.push(total);
    }
    fn row_begin(&mut self, name: &str, children: usize) {
        self.rows.push((name.to_string(), children));
    }
    fn cell_done(&mut self, outer: &str, inner: &str) {
        self.cells.push((outer.to_string(), inner.to_string()));
    }
    fn finish(&mut self) {
        self.finished += 1;
    }
}

#[test]
fn progress_sees_every_pair_once() {
    let mut doc = page(LayoutKind::Link);
    let mut c = Collator::open(&mut doc, URL, LayoutKind::Link, Tuning::fast()).unwrap();
    let mut rec = Recorder::default();
    c.run_traversal(&AxisPermutation::IDENTITY, &axes(), &mut rec).unwrap();

    assert_eq!(rec.totals, vec![2]);
    assert_eq!(rec.rows, vec![("A".to_string(), 2), ("B".to_string(), 1)]);
    assert_eq!(
        rec.cells,
        vec![
            ("A".to_string(), "X".to_string()),
            ("A".to_string(), "Y".to_string()),
            ("B".to_string(), "Z".to_string()),
        ]
    );
    assert_eq!(rec.finished, 1);
    assert_eq!(c.cursor().map(|p| p.to_string()), Some("(1, 0)".to_string()));
}

#[test]
fn collect_assembles_user_ordered_crosstab() {
    let mut doc = page(LayoutKind::Object);
    let opts = CollateOptions {
        url: URL.into(),
        axes: axes(),
        attempt_cap: Some(5),
        ..Default::default()
    };
    let got = runner::collect(&mut doc, &opts, LayoutKind::Object, &mut NullProgress).unwrap();

    assert!(got.assignment.is_identity());
    let t = &got.table;
    assert_eq!(t.columns, vec!["p", "q", "r"]);
    assert_eq!(t.index.len(), 2 * 3);
    assert_eq!(t.get("A", "X", "p"), 1);
    assert_eq!(t.get("B", "Z", "r"), 3);
    assert_eq!(t.get("B", "X", "p"), 0);
    assert_eq!(t.grand_total(), 5);

    let ds = t.to_dataset();
    assert_eq!(
        ds.headers.as_deref(),
        Some(&["First", "Second", "p", "q", "r", "Total"].map(String::from)[..])
    );
    assert_eq!(ds.rows[0], ["A", "X", "1", "0", "0", "1"].map(String::from));
}

#[test]
fn collect_rejects_duplicate_axes_before_touching_the_page() {
    let mut doc = page(LayoutKind::Object);
    let opts = CollateOptions {
        url: URL.into(),
        axes: ["First".into(), "First".into(), "Third".into()],
        ..Default::default()
    };
    let err = runner::collect(&mut doc, &opts, LayoutKind::Object, &mut NullProgress).unwrap_err();

    assert!(matches!(err, CollateError::InvalidAxes(_)));
    assert!(doc.navigated().is_empty());
}

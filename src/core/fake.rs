// src/core/fake.rs
//! In-memory TRAC page.
//!
//! Renders the three cascading tables from a list of `(categories, count)`
//! records, answers the layout queries of either style, and re-renders on
//! widget commits and row clicks the way the real pages do. Handles carry a
//! generation stamp; using one after the element it names was re-rendered
//! yields `StaleReference`.
//!
//! Knobs simulate the misbehaviour collation has to survive: text that lags
//! behind a re-render, clicks that hit detached elements, option lists that
//! re-render while being read, stray row elements, tables that never show up,
//! rows printed under another row's name and rows that drop out of a re-read.

use super::document::{DocError, Document, Query};
use crate::specs::rows::fmt_count;
use crate::specs::{LayoutKind, LayoutSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FakeHandle {
    Widget { index: usize },
    OptionList { widget: usize, generation: u64 },
    Option { widget: usize, index: usize, generation: u64 },
    Table { index: usize, generation: u64 },
    Row { table: usize, index: usize, generation: u64 },
    Anchor { table: usize, index: usize, generation: u64 },
}

#[derive(Clone, Debug)]
struct Axis {
    name: String,
    categories: Vec<String>,
}

/// Row `name` of `table` whose clicks go stale until the table is re-read;
/// that re-read comes back without it.
#[derive(Clone, Debug)]
struct Vanish {
    table: usize,
    name: String,
    times: u32,
}

#[derive(Clone, Debug)]
struct Record {
    /// One category per axis, in axis declaration order.
    cats: Vec<String>,
    count: u64,
}

pub struct FakePageBuilder {
    kind: LayoutKind,
    axes: Vec<Axis>,
    records: Vec<Record>,
}

impl FakePageBuilder {
    /// Declare an axis. Category order is the order rows render in.
    pub fn axis(mut self, name: &str, categories: &[&str]) -> Self {
        self.axes.push(Axis {
            name: s!(name),
            categories: categories.iter().map(|c| s!(*c)).collect(),
        });
        self
    }

    /// One count for a combination of categories, one per declared axis.
    /// Repeated combinations add up.
    pub fn record(mut self, cats: &[&str], count: u64) -> Self {
        self.records.push(Record {
            cats: cats.iter().map(|c| s!(*c)).collect(),
            count,
        });
        self
    }

    pub fn build(self) -> FakePage {
        FakePage {
            kind: self.kind,
            spec: self.kind.spec(),
            axes: self.axes,
            records: self.records,
            assignment: [0, 1, 2],
            sel1: None,
            sel2: None,
            open_widget: None,
            option_gen: 0,
            table_gen: [0; 3],
            lagged: [None, None, None],
            lag: [0; 3],
            fail_clicks: 0,
            stale_option_reads: 0,
            hidden_tables: false,
            skew: [0; 3],
            extra_rows: [0; 3],
            rerender_on_click: false,
            aliases: Vec::new(),
            vanish: None,
            vanish_pending: false,
            vanished: false,
            clicks: 0,
            queries: 0,
            navigated: Vec::new(),
        }
    }
}

pub struct FakePage {
    kind: LayoutKind,
    spec: &'static LayoutSpec,
    axes: Vec<Axis>,
    records: Vec<Record>,

    /// Axis index shown by each widget/table.
    assignment: [usize; 3],
    sel1: Option<String>,
    sel2: Option<String>,
    open_widget: Option<usize>,
    option_gen: u64,
    table_gen: [u64; 3],

    /// Text still on screen after a re-render, with reads left before it clears.
    lagged: [Option<(String, u32)>; 3],
    lag: [u32; 3],
    fail_clicks: u32,
    stale_option_reads: u32,
    hidden_tables: bool,
    skew: [i64; 3],
    extra_rows: [usize; 3],
    rerender_on_click: bool,
    /// (table, category, printed name)
    aliases: Vec<(usize, String, String)>,
    vanish: Option<Vanish>,
    vanish_pending: bool,
    /// The vanishing row is left out until the table's next text read.
    vanished: bool,

    clicks: usize,
    queries: usize,
    navigated: Vec<String>,
}

impl FakePage {
    pub fn builder(kind: LayoutKind) -> FakePageBuilder {
        FakePageBuilder { kind, axes: Vec::new(), records: Vec::new() }
    }

    /* ---------- knobs ---------- */

    /// Table `table` keeps showing its previous text for `reads` text reads
    /// after every re-render.
    pub fn lag(mut self, table: usize, reads: u32) -> Self {
        if let Some(l) = self.lag.get_mut(table) { *l = reads; }
        self
    }

    /// The next `n` row clicks hit a detached element.
    pub fn fail_clicks(mut self, n: u32) -> Self {
        self.fail_clicks = n;
        self
    }

    /// The next `n` option text reads hit a detached element.
    pub fn stale_option_reads(mut self, n: u32) -> Self {
        self.stale_option_reads = n;
        self
    }

    /// Tables never appear.
    pub fn hide_tables(mut self) -> Self {
        self.hidden_tables = true;
        self
    }

    /// Misprint the first data row of `table` by `delta`.
    pub fn skew(mut self, table: usize, delta: i64) -> Self {
        if let Some(s) = self.skew.get_mut(table) { *s = delta; }
        self
    }

    /// `n` trailing row elements with no text line behind them.
    pub fn extra_row_elements(mut self, table: usize, n: usize) -> Self {
        if let Some(e) = self.extra_rows.get_mut(table) { *e = n; }
        self
    }

    /// Every row click re-renders all three tables.
    pub fn rerender_on_click(mut self) -> Self {
        self.rerender_on_click = true;
        self
    }

    /// Print category `category` of `table` as `shown`. Selection still
    /// goes by the real category.
    pub fn alias(mut self, table: usize, category: &str, shown: &str) -> Self {
        self.aliases.push((table, s!(category), s!(shown)));
        self
    }

    /// Clicks on row `name` of `table` fail until the table is re-read, and
    /// the re-read leaves the row out. Happens `times` times.
    pub fn vanishing_row(mut self, table: usize, name: &str, times: u32) -> Self {
        self.vanish = Some(Vanish { table, name: s!(name), times });
        self
    }

    /* ---------- inspection ---------- */

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Axis names currently shown by the three widgets.
    pub fn assignment(&self) -> [&str; 3] {
        self.assignment.map(|a| self.axes.get(a).map_or("", |x| x.name.as_str()))
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    /// `find_all` calls so far.
    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn navigated(&self) -> &[String] {
        &self.navigated
    }

    /* ---------- rendering ---------- */

    /// Data rows of `table` under the current selections: declared order, zero counts omitted.
    fn data_rows(&self, table: usize) -> Vec<(String, i64)> {
        let Some(axis) = self.axes.get(self.assignment[table]) else {
            return Vec::new();
        };
        let a0 = self.assignment[0];
        let a1 = self.assignment[1];
        let filter1 = if table >= 1 { self.sel1.as_deref() } else { None };
        let filter2 = if table >= 2 { self.sel2.as_deref() } else { None };

        let mut rows: Vec<(String, i64)> = Vec::new();
        for cat in &axis.categories {
            let total: u64 = self
                .records
                .iter()
                .filter(|r| r.cats.get(self.assignment[table]) == Some(cat))
                .filter(|r| filter1.is_none_or(|f| r.cats.get(a0).map(String::as_str) == Some(f)))
                .filter(|r| filter2.is_none_or(|f| r.cats.get(a1).map(String::as_str) == Some(f)))
                .map(|r| r.count)
                .sum();
            if total > 0 && !self.is_vanished(table, cat) {
                rows.push((cat.clone(), total as i64));
            }
        }
        if let Some(first) = rows.first_mut() {
            first.1 += self.skew[table];
        }
        rows
    }

    fn is_vanished(&self, table: usize, cat: &str) -> bool {
        self.vanished && self.vanish.as_ref().is_some_and(|v| v.table == table && v.name == cat)
    }

    /// Name `table` prints for category `cat`.
    fn printed<'a>(&'a self, table: usize, cat: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(t, c, _)| *t == table && c == cat)
            .map_or(cat, |(_, _, shown)| shown.as_str())
    }

    fn render(&self, table: usize) -> String {
        let axis = self
            .axes
            .get(self.assignment[table])
            .map_or("", |a| a.name.as_str());
        let rows = self.data_rows(table);
        let body: Vec<String> = rows
            .iter()
            .map(|(name, v)| format!("{} {}", self.printed(table, name), fmt_count((*v).max(0) as u64)))
            .collect();
        let sum: i64 = rows.iter().map(|(_, v)| *v).sum();

        let mut lines: Vec<String> = Vec::new();
        match self.kind {
            LayoutKind::Object => {
                lines.extend([s!(), s!(), s!()]);
                lines.push(format!("{axis} Count"));
                lines.extend(body);
                lines.push(format!("All {}", fmt_count(sum.max(0) as u64)));
            }
            LayoutKind::Link => {
                lines.push(format!("{axis} by count"));
                lines.push(format!("{axis} Number"));
                lines.extend(body);
                lines.push(format!("Total {}", fmt_count(sum.max(0) as u64)));
            }
        }
        lines.join("\n")
    }

    /// Text the page currently shows for `table`.
    fn shown(&mut self, table: usize) -> String {
        if self.vanish.as_ref().is_some_and(|v| v.table == table) {
            self.vanished = std::mem::take(&mut self.vanish_pending);
            if self.vanished {
                if let Some(v) = self.vanish.as_mut() {
                    v.times = v.times.saturating_sub(1);
                }
            }
        }
        if let Some((text, left)) = self.lagged[table].take() {
            if left > 1 {
                self.lagged[table] = Some((text.clone(), left - 1));
            }
            return text;
        }
        self.render(table)
    }

    /// Row element count for `table`: offset rows, data rows, stray rows.
    fn row_elements(&self, table: usize) -> usize {
        self.spec.row_offset + self.data_rows(table).len() + self.extra_rows[table]
    }

    /// Apply `change`, then re-render tables `from..3`.
    fn mutate(&mut self, from: usize, change: impl FnOnce(&mut Self)) {
        let before: Vec<String> = (0..3).map(|t| self.render(t)).collect();
        change(self);
        if self.vanish.as_ref().is_some_and(|v| v.table >= from) {
            self.vanished = false;
        }
        for t in from..3 {
            self.table_gen[t] += 1;
            if self.lag[t] > 0 && self.lagged[t].is_none() {
                self.lagged[t] = Some((before[t].clone(), self.lag[t]));
            }
        }
    }

    /// True (and arms the re-read) if the click on `elem` should go stale.
    fn vanishing_click(&mut self, table: usize, elem: usize) -> bool {
        let Some(v) = &self.vanish else { return false };
        if v.table != table || v.times == 0 {
            return false;
        }
        let hit = elem
            .checked_sub(self.spec.row_offset)
            .and_then(|d| self.data_rows(table).into_iter().nth(d))
            .is_some_and(|(name, _)| name == v.name);
        if hit {
            self.vanish_pending = true;
        }
        hit
    }

    fn select_row(&mut self, table: usize, elem: usize) {
        let Some(data) = elem.checked_sub(self.spec.row_offset) else { return };
        let Some((name, _)) = self.data_rows(table).into_iter().nth(data) else { return };
        let from = if self.rerender_on_click { 0 } else { table + 1 };
        match table {
            0 => self.mutate(from, |p| { p.sel1 = Some(name); p.sel2 = None; }),
            1 => self.mutate(from, |p| p.sel2 = Some(name)),
            _ => self.mutate(from.min(3), |_| {}),
        }
    }

    fn commit_option(&mut self, widget: usize, option: usize) {
        if option >= self.axes.len() {
            return;
        }
        self.mutate(widget, |p| {
            p.assignment[widget] = option;
            match widget {
                0 => { p.sel1 = None; p.sel2 = None; }
                1 => { p.sel2 = None; }
                _ => {}
            }
        });
    }

    /* ---------- staleness ---------- */

    fn check(&self, h: &FakeHandle) -> Result<(), DocError> {
        let fresh = match *h {
            FakeHandle::Widget { index } => index < 3,
            FakeHandle::OptionList { widget, generation } => {
                self.option_gen == generation && self.open_widget == Some(widget)
            }
            FakeHandle::Option { widget, generation, .. } => match self.kind {
                LayoutKind::Object => self.option_gen == generation && self.open_widget == Some(widget),
                LayoutKind::Link => self.option_gen == generation,
            },
            FakeHandle::Table { index, generation } => !self.hidden_tables && self.table_gen[index] == generation,
            FakeHandle::Row { table, generation, .. } | FakeHandle::Anchor { table, generation, .. } => {
                self.table_gen[table] == generation
            }
        };
        if fresh { Ok(()) } else { Err(DocError::StaleReference) }
    }

    fn options(&self, widget: usize) -> Vec<FakeHandle> {
        (0..self.axes.len())
            .map(|index| FakeHandle::Option { widget, index, generation: self.option_gen })
            .collect()
    }

    fn unsupported(q: Query) -> DocError {
        DocError::Session(format!("fake page cannot answer {q}"))
    }
}

impl Document for FakePage {
    type Handle = FakeHandle;

    fn navigate(&mut self, url: &str) -> Result<(), DocError> {
        self.navigated.push(s!(url));
        Ok(())
    }

    fn find_all(
        &mut self,
        scope: Option<&FakeHandle>,
        query: Query,
    ) -> Result<Vec<FakeHandle>, DocError> {
        self.queries += 1;
        let spec = self.spec;

        let Some(scope) = scope else {
            if query == spec.widget {
                return Ok((0..3).map(|index| FakeHandle::Widget { index }).collect());
            }
            if Some(query) == spec.option_list {
                return Ok(self
                    .open_widget
                    .map(|widget| FakeHandle::OptionList { widget, generation: self.option_gen })
                    .into_iter()
                    .collect());
            }
            if query == spec.table {
                if self.hidden_tables {
                    return Ok(Vec::new());
                }
                return Ok((0..3)
                    .map(|index| FakeHandle::Table { index, generation: self.table_gen[index] })
                    .collect());
            }
            return Err(Self::unsupported(query));
        };

        self.check(scope)?;
        match *scope {
            FakeHandle::OptionList { widget, .. } if query == spec.option => Ok(self.options(widget)),
            FakeHandle::Widget { index } if query == spec.option && spec.option_list.is_none() => {
                Ok(self.options(index))
            }
            FakeHandle::Table { index, generation } if query == spec.row => Ok((0..self.row_elements(index))
                .map(|i| FakeHandle::Row { table: index, index: i, generation })
                .collect()),
            FakeHandle::Row { table, index, generation } if Some(query) == spec.click_target => {
                let data = index
                    .checked_sub(spec.row_offset)
                    .filter(|d| *d < self.data_rows(table).len());
                Ok(data
                    .map(|_| FakeHandle::Anchor { table, index, generation })
                    .into_iter()
                    .collect())
            }
            _ => Err(Self::unsupported(query)),
        }
    }

    fn text(&mut self, el: &FakeHandle) -> Result<String, DocError> {
        self.check(el)?;
        match *el {
            FakeHandle::Widget { index } => Ok(s!(self.assignment()[index])),
            FakeHandle::Option { index, .. } => {
                if self.stale_option_reads > 0 {
                    self.stale_option_reads -= 1;
                    return Err(DocError::StaleReference);
                }
                Ok(self.axes.get(index).map_or_else(String::new, |a| a.name.clone()))
            }
            FakeHandle::Table { index, .. } => Ok(self.shown(index)),
            FakeHandle::Row { table, index, .. } | FakeHandle::Anchor { table, index, .. } => {
                Ok(self.render(table).lines().nth(index).map(String::from).unwrap_or_default())
            }
            FakeHandle::OptionList { .. } => Ok(s!()),
        }
    }

    fn click(&mut self, el: &FakeHandle) -> Result<(), DocError> {
        self.clicks += 1;
        self.check(el)?;
        match *el {
            FakeHandle::Widget { index } => {
                self.open_widget = Some(index);
                if self.kind == LayoutKind::Object {
                    // listbox renders fresh every time it opens
                    self.option_gen += 1;
                }
            }
            FakeHandle::Option { widget, index, .. } => {
                self.open_widget = None;
                self.commit_option(widget, index);
            }
            FakeHandle::Row { table, index, .. } => {
                if self.kind == LayoutKind::Object {
                    if self.vanishing_click(table, index) {
                        return Err(DocError::StaleReference);
                    }
                    if self.fail_clicks > 0 {
                        self.fail_clicks -= 1;
                        return Err(DocError::StaleReference);
                    }
                    self.select_row(table, index);
                }
            }
            FakeHandle::Anchor { table, index, .. } => {
                if self.vanishing_click(table, index) {
                    return Err(DocError::StaleReference);
                }
                if self.fail_clicks > 0 {
                    self.fail_clicks -= 1;
                    return Err(DocError::StaleReference);
                }
                self.select_row(table, index);
            }
            FakeHandle::Table { .. } | FakeHandle::OptionList { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(kind: LayoutKind) -> FakePage {
        FakePage::builder(kind)
            .axis("A", &["a1", "a2"])
            .axis("B", &["b1", "b2"])
            .axis("C", &["c1"])
            .record(&["a1", "b1", "c1"], 1500)
            .record(&["a2", "b2", "c1"], 7)
            .build()
    }

    #[test]
    fn object_tables_lead_with_blank_and_header_rows() {
        let mut p = page(LayoutKind::Object);
        let t = p.find_nth(None, LayoutKind::Object.spec().table, 0).unwrap();
        let text = p.text(&t).unwrap();
        assert_eq!(text, "\n\n\nA Count\na1 1,500\na2 7\nAll 1,507");
        let rows = p.find_all(Some(&t), LayoutKind::Object.spec().row).unwrap();
        assert_eq!(rows.len(), 4 + 2);
    }

    #[test]
    fn link_row_click_goes_through_anchor_and_filters_downstream() {
        let spec = LayoutKind::Link.spec();
        let mut p = page(LayoutKind::Link);
        let t = p.find_nth(None, spec.table, 0).unwrap();
        let rows = p.find_all(Some(&t), spec.row).unwrap();
        assert!(p.find_all(Some(&rows[0]), spec.click_target.unwrap()).unwrap().is_empty());

        let a = p.find(Some(&rows[3]), spec.click_target.unwrap()).unwrap();
        p.click(&a).unwrap();

        let t2 = p.find_nth(None, spec.table, 1).unwrap();
        assert_eq!(p.text(&t2).unwrap(), "B by count\nB Number\nb2 7\nTotal 7");
    }

    #[test]
    fn handles_go_stale_after_rerender() {
        let spec = LayoutKind::Object.spec();
        let mut p = page(LayoutKind::Object);
        let t2 = p.find_nth(None, spec.table, 1).unwrap();
        let t1 = p.find_nth(None, spec.table, 0).unwrap();
        let row = p.find_nth(Some(&t1), spec.row, 4).unwrap();
        p.click(&row).unwrap();
        assert_eq!(p.text(&t2), Err(DocError::StaleReference));
        // table 1 itself was not re-rendered
        assert!(p.text(&t1).is_ok());
    }

    #[test]
    fn lag_shows_previous_text_for_a_few_reads() {
        let spec = LayoutKind::Object.spec();
        let mut p = page(LayoutKind::Object).lag(1, 2);
        let t1 = p.find_nth(None, spec.table, 0).unwrap();
        let before = {
            let t2 = p.find_nth(None, spec.table, 1).unwrap();
            p.text(&t2).unwrap()
        };
        let row = p.find_nth(Some(&t1), spec.row, 5).unwrap();
        p.click(&row).unwrap();

        let t2 = p.find_nth(None, spec.table, 1).unwrap();
        assert_eq!(p.text(&t2).unwrap(), before);
        assert_eq!(p.text(&t2).unwrap(), before);
        assert_ne!(p.text(&t2).unwrap(), before);
    }

    #[test]
    fn object_options_exist_only_while_open() {
        let spec = LayoutKind::Object.spec();
        let mut p = page(LayoutKind::Object);
        let list_q = spec.option_list.unwrap();
        assert!(p.find_all(None, list_q).unwrap().is_empty());

        let w = p.find_nth(None, spec.widget, 2).unwrap();
        p.click(&w).unwrap();
        let list = p.find(None, list_q).unwrap();
        let opts = p.find_all(Some(&list), spec.option).unwrap();
        assert_eq!(opts.len(), 3);

        // reopening renders a new list
        p.click(&w).unwrap();
        assert_eq!(p.text(&opts[0]), Err(DocError::StaleReference));

        let list = p.find(None, list_q).unwrap();
        let opts = p.find_all(Some(&list), spec.option).unwrap();
        p.click(&opts[0]).unwrap();
        assert_eq!(p.assignment(), ["A", "B", "A"]);
    }
}

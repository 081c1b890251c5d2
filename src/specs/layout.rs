// src/specs/layout.rs
//! Per-style queries and offsets.
//!
//! Object style (headless UI listboxes over `div` tables):
//! - widget: `button#headlessui-listbox-button-*`; options only exist while open,
//!   inside `ul#headlessui-listbox-options-*`
//! - table: `.table-fixed`, rows `.flex-row`; three blank rows and a header precede data
//!
//! Link style (plain `<select>` over HTML tables):
//! - widget: `select#dimension_pick*` with `<option>` children
//! - table: `.Table`, rows `<tr>`; a title row and a header precede data;
//!   a row is selected through its `td.Data.l > a` link

use std::fmt;

use crate::core::Query;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Object,
    Link,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSpec {
    /// All three selection widgets, in document order.
    pub widget: Query,
    /// Container the options are rendered into while a widget is open.
    /// `None` when options live under the widget itself.
    pub option_list: Option<Query>,
    /// Option elements, relative to the option list or the widget.
    pub option: Query,
    /// All three result tables, in document order.
    pub table: Query,
    /// Row elements, relative to a table.
    pub row: Query,
    /// Clickable element inside a row. `None` = click the row.
    pub click_target: Option<Query>,
    /// Row elements preceding the first data row.
    pub row_offset: usize,
}

static OBJECT: LayoutSpec = LayoutSpec {
    widget: Query::XPath("//button[starts-with(@id, 'headlessui-listbox-button')]"),
    option_list: Some(Query::XPath("//ul[starts-with(@id, 'headlessui-listbox-options')]")),
    option: Query::XPath(".//*[@role='option']/li/span"),
    table: Query::Css(".table-fixed"),
    row: Query::Css(".flex-row"),
    click_target: None,
    row_offset: 4,
};

static LINK: LayoutSpec = LayoutSpec {
    widget: Query::XPath("//select[starts-with(@id, 'dimension_pick')]"),
    option_list: None,
    option: Query::XPath(".//option"),
    table: Query::Css(".Table"),
    row: Query::XPath(".//tr"),
    click_target: Some(Query::XPath(".//td[@class='Data l']/a")),
    row_offset: 2,
};

impl LayoutKind {
    pub const ALL: [LayoutKind; 2] = [LayoutKind::Object, LayoutKind::Link];

    pub fn spec(self) -> &'static LayoutSpec {
        match self {
            LayoutKind::Object => &OBJECT,
            LayoutKind::Link => &LINK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Object => "object",
            LayoutKind::Link => "link",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// src/config/registry.rs
//! Known TRAC pages and how well the collator supports each one.

use std::collections::BTreeMap;

use crate::engine::CollateError;
use crate::specs::LayoutKind;

const HOSTS: [&str; 2] = ["https://trac.syr.edu", "https://tracreports.org"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageType {
    ObjectWhole,
    LinkWhole,
    ObjectBroken,
    LinkBroken,
    MapTable,
    TableOnly,
    TableTab,
}

impl PageType {
    /// Layout the collator drives the page with, if it can drive it at all.
    pub fn layout(self) -> Option<LayoutKind> {
        match self {
            Self::ObjectWhole | Self::ObjectBroken => Some(LayoutKind::Object),
            Self::LinkWhole | Self::LinkBroken => Some(LayoutKind::Link),
            Self::MapTable | Self::TableOnly | Self::TableTab => None,
        }
    }

    pub fn is_partial(self) -> bool {
        matches!(self, Self::ObjectBroken | Self::LinkBroken)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ObjectWhole  => "object-whole",
            Self::LinkWhole    => "link-whole",
            Self::ObjectBroken => "object-broken",
            Self::LinkBroken   => "link-broken",
            Self::MapTable     => "map-table",
            Self::TableOnly    => "table-only",
            Self::TableTab     => "table-tab",
        }
    }
}

/// Outcome of looking a URL up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub kind: LayoutKind,
    pub page: PageType,
    /// Known to misbehave in places; collation proceeds anyway.
    pub partial: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    pages: BTreeMap<String, PageType>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every page under both TRAC hosts.
    pub fn builtin() -> Self {
        use PageType::*;
        const PATHS: &[(&str, PageType)] = &[
            ("/phptools/immigration/ntanew/", ObjectWhole),
            ("/phptools/immigration/closure/", ObjectWhole),
            ("/phptools/immigration/asyfile/", ObjectWhole),
            ("/phptools/immigration/asylum/", ObjectWhole),
            ("/phptools/immigration/mpp4/", LinkWhole),
            ("/phptools/immigration/juvenile/", LinkWhole),
            ("/phptools/immigration/mwc/", LinkWhole),
            ("/phptools/immigration/cbparrest/", LinkWhole),
            ("/phptools/immigration/cbpinadmiss/", LinkWhole),
            ("/phptools/immigration/arrest/", LinkWhole),
            ("/phptools/immigration/detainhistory/", LinkWhole),
            ("/phptools/immigration/remove/", LinkWhole),
            ("/phptools/immigration/removehistory/", LinkWhole),
            ("/phptools/immigration/secure/", LinkWhole),
            ("/phptools/immigration/backlog/", ObjectBroken),
            ("/phptools/immigration/asylumbl/", ObjectBroken),
            ("/phptools/immigration/detention/", LinkBroken),
            ("/phptools/immigration/addressrep/", MapTable),
            ("/immigration/reports/judgereports/", TableOnly),
            ("/phptools/immigration/bond/", TableTab),
            ("/immigration/detentionstats/facilities.html", TableOnly),
            ("/immigration/detentionstats/atd_pop_table.html", TableOnly),
        ];

        let mut reg = Self::empty();
        for host in HOSTS {
            for (path, page) in PATHS {
                reg.insert(&join!(host, path), *page);
            }
        }
        reg
    }

    pub fn insert(&mut self, url: &str, page: PageType) {
        self.pages.insert(normalize(url), page);
    }

    pub fn get(&self, url: &str) -> Option<PageType> {
        self.pages.get(&normalize(url)).copied()
    }

    /// All registered URLs with their page type, sorted by URL.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PageType)> {
        self.pages.iter().map(|(u, p)| (u.as_str(), *p))
    }

    pub fn resolve(&self, url: &str) -> Result<Resolved, CollateError> {
        let page = self
            .get(url)
            .ok_or_else(|| CollateError::UrlNotRecognized(s!(url)))?;
        let kind = page
            .layout()
            .ok_or_else(|| CollateError::UrlNotSupported(s!(url)))?;

        if page.is_partial() {
            logw!("{url} is not fully supported ({}); collating anyway", page.label());
        }
        Ok(Resolved { kind, page, partial: page.is_partial() })
    }
}

/// Trailing slash and surrounding whitespace don't distinguish pages.
fn normalize(url: &str) -> String {
    s!(url.trim().trim_end_matches('/'))
}

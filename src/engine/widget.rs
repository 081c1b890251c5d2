// src/engine/widget.rs
//! One of the three cascading selection widgets.
//!
//! Holds its position and cached option names only; the element is re-located
//! on every access.

use super::error::CollateError;
use super::retry::retry;
use super::Tuning;
use crate::core::{DocError, Document};
use crate::core::sanitize::normalize_ws;
use crate::specs::LayoutKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOption {
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct SelectionWidget {
    index: usize,
    kind: LayoutKind,
    options: Vec<CategoryOption>,
    committed: Option<String>,
}

impl SelectionWidget {
    /// Locate widget `index` and read its options.
    pub fn attach<D: Document>(
        doc: &mut D,
        index: usize,
        kind: LayoutKind,
        tuning: &Tuning,
    ) -> Result<Self, CollateError> {
        let mut w = Self { index, kind, options: Vec::new(), committed: None };
        w.list_options(doc, tuning)?;
        logd!("widget {index}: {} options", w.options.len());
        Ok(w)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Options as of the last read.
    pub fn options(&self) -> &[CategoryOption] {
        &self.options
    }

    pub fn offers(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    pub fn committed(&self) -> Option<&str> {
        self.committed.as_deref()
    }

    /// Re-read the option list from the page.
    pub fn list_options<D: Document>(
        &mut self,
        doc: &mut D,
        tuning: &Tuning,
    ) -> Result<&[CategoryOption], CollateError> {
        let (index, kind) = (self.index, self.kind);
        let found = retry(&tuning.element, &format!("options of widget {index}"), |_| {
            read_options(doc, index, kind)
        })?;
        self.options = found
            .into_iter()
            .map(|(_, name)| CategoryOption { name })
            .collect();
        Ok(&self.options)
    }

    /// Select `name`. The whole open/read/click sequence is retried, since
    /// option elements go stale whenever the list re-renders.
    pub fn commit<D: Document>(
        &mut self,
        doc: &mut D,
        name: &str,
        tuning: &Tuning,
    ) -> Result<(), CollateError> {
        let (index, kind) = (self.index, self.kind);
        let spec = kind.spec();

        let seen = retry(&tuning.click, &format!("commit {name:?} on widget {index}"), |_| {
            if spec.option_list.is_none() {
                // opens the native dropdown
                let widget = doc.find_nth(None, spec.widget, index)?;
                doc.click(&widget)?;
            }
            let options = read_options(doc, index, kind)?;
            if let Some((handle, _)) = options.iter().find(|(_, n)| n == name) {
                doc.click(handle)?;
            }
            Ok(options)
        })?;

        self.options = seen
            .into_iter()
            .map(|(_, name)| CategoryOption { name })
            .collect();
        if !self.offers(name) {
            return Err(CollateError::AxisNotFound { axis: s!(name), widget: index });
        }
        self.committed = Some(s!(name));
        logd!("widget {index} → {name:?}");
        Ok(())
    }
}

/// Options with their live handles. Object listboxes only exist while open,
/// so the widget is clicked first.
fn read_options<D: Document>(
    doc: &mut D,
    index: usize,
    kind: LayoutKind,
) -> Result<Vec<(D::Handle, String)>, DocError> {
    let spec = kind.spec();
    let widget = doc.find_nth(None, spec.widget, index)?;
    let elements = match spec.option_list {
        Some(list_query) => {
            doc.click(&widget)?;
            let list = doc.find(None, list_query)?;
            doc.find_all(Some(&list), spec.option)?
        }
        None => doc.find_all(Some(&widget), spec.option)?,
    };
    if elements.is_empty() {
        return Err(DocError::NotFound(spec.option));
    }

    let mut out = Vec::with_capacity(elements.len());
    for el in elements {
        let name = normalize_ws(&doc.text(&el)?);
        out.push((el, name));
    }
    Ok(out)
}

// src/core/document.rs
//! The page capability the engine drives. A real browser session and the
//! in-memory fake both implement it.

use std::fmt;

/// Element query. Layout queries are compile-time constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Query {
    Css(&'static str),
    XPath(&'static str),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Css(q) => write!(f, "css `{q}`"),
            Query::XPath(q) => write!(f, "xpath `{q}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("no element matches {0}")]
    NotFound(Query),
    #[error("element is no longer attached to the page")]
    StaleReference,
    #[error("browser session: {0}")]
    Session(String),
}

impl DocError {
    /// Worth retrying: the page may still be rendering or just re-rendered.
    pub fn is_transient(&self) -> bool {
        matches!(self, DocError::NotFound(_) | DocError::StaleReference)
    }
}

pub trait Document {
    /// Opaque reference to a live element. May go stale on re-render.
    type Handle: Clone;

    fn navigate(&mut self, url: &str) -> Result<(), DocError>;

    /// All matches in document order, searching under `scope` when given.
    /// No match is an empty vector, not an error.
    fn find_all(
        &mut self,
        scope: Option<&Self::Handle>,
        query: Query,
    ) -> Result<Vec<Self::Handle>, DocError>;

    /// Rendered text, lines separated by `\n`.
    fn text(&mut self, el: &Self::Handle) -> Result<String, DocError>;

    fn click(&mut self, el: &Self::Handle) -> Result<(), DocError>;

    /// First match or `NotFound`.
    fn find(
        &mut self,
        scope: Option<&Self::Handle>,
        query: Query,
    ) -> Result<Self::Handle, DocError> {
        self.find_all(scope, query)?
            .into_iter()
            .next()
            .ok_or(DocError::NotFound(query))
    }

    /// The `index`-th match or `NotFound`.
    fn find_nth(
        &mut self,
        scope: Option<&Self::Handle>,
        query: Query,
        index: usize,
    ) -> Result<Self::Handle, DocError> {
        self.find_all(scope, query)?
            .into_iter()
            .nth(index)
            .ok_or(DocError::NotFound(query))
    }
}

impl<D: Document + ?Sized> Document for &mut D {
    type Handle = D::Handle;

    fn navigate(&mut self, url: &str) -> Result<(), DocError> {
        (**self).navigate(url)
    }
    fn find_all(
        &mut self,
        scope: Option<&Self::Handle>,
        query: Query,
    ) -> Result<Vec<Self::Handle>, DocError> {
        (**self).find_all(scope, query)
    }
    fn text(&mut self, el: &Self::Handle) -> Result<String, DocError> {
        (**self).text(el)
    }
    fn click(&mut self, el: &Self::Handle) -> Result<(), DocError> {
        (**self).click(el)
    }
}

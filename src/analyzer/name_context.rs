use std::cell::Cell;

use crate::ast::{ExprList, SrcList};

/// One level of the scope chain used while resolving names.
///
/// Counters live in `Cell`s so that inner scopes can update outer ones
/// through the shared `parent` reference.
#[derive(Debug)]
pub struct NameContext<'a> {
    pub src: &'a SrcList,
    /// Result list whose `AS` names bare identifiers may refer to.
    pub result: Option<&'a ExprList>,
    pub parent: Option<&'a NameContext<'a>>,
    n_ref: Cell<usize>,
    n_err: Cell<usize>,
    allow_agg: Cell<bool>,
    has_agg: Cell<bool>,
}

impl<'a> NameContext<'a> {
    pub fn new(src: &'a SrcList) -> Self {
        Self {
            src,
            result: None,
            parent: None,
            n_ref: Cell::new(0),
            n_err: Cell::new(0),
            allow_agg: Cell::new(true),
            has_agg: Cell::new(false),
        }
    }

    pub fn with_result(mut self, result: &'a ExprList) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_parent(mut self, parent: &'a NameContext<'a>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn allowing_aggregates(self, allow: bool) -> Self {
        self.allow_agg.set(allow);
        self
    }

    /// Carries counters over from a previous context for the same query block.
    pub fn continuing(self, previous: &NameContext) -> Self {
        self.n_ref.set(previous.n_ref());
        self.n_err.set(previous.n_err());
        self.has_agg.set(previous.has_agg());
        self
    }

    /// This context followed by its ancestors, innermost first.
    pub fn scopes(&self) -> impl Iterator<Item = &NameContext<'a>> {
        std::iter::successors(Some(self), |nc| nc.parent)
    }

    pub fn n_ref(&self) -> usize { self.n_ref.get() }

    pub fn n_err(&self) -> usize { self.n_err.get() }

    pub fn has_agg(&self) -> bool { self.has_agg.get() }

    pub fn allow_agg(&self) -> bool { self.allow_agg.get() }

    pub(crate) fn count_ref(&self) {
        self.n_ref.set(self.n_ref.get() + 1);
    }

    pub(crate) fn count_error(&self) {
        self.n_err.set(self.n_err.get() + 1);
    }

    pub(crate) fn add_errors(&self, n: usize) {
        self.n_err.set(self.n_err.get() + n);
    }

    pub(crate) fn mark_has_agg(&self) {
        self.has_agg.set(true);
    }

    /// Sets `allow_agg`, returning the previous value.
    pub(crate) fn set_allow_agg(&self, allow: bool) -> bool {
        self.allow_agg.replace(allow)
    }
}

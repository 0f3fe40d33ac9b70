use std::sync::Arc;

use super::models::{FilterCriteria, Report};
use super::pipeline;
use super::selection::{self, Selection};
use crate::shared::types::PaginationQuery;

/// A report collection together with its criteria, selection and derived list.
///
/// The derived (filtered + sorted) list is cached and only recomputed after the
/// collection or the criteria actually change.
#[derive(Debug, Default)]
pub struct ReportView {
    collection: Vec<Report>,
    criteria: FilterCriteria,
    selection: Selection,
    derived: Option<Arc<Vec<Report>>>,
    recomputations: u64,
}

impl ReportView {
    pub fn new(collection: Vec<Report>) -> Self {
        Self {
            collection,
            ..Default::default()
        }
    }

    pub fn collection(&self) -> &[Report] {
        &self.collection
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn contains(&self, id: &str) -> bool {
        self.collection.iter().any(|r| r.id == id)
    }

    /// Swap in a freshly fetched collection.
    ///
    /// The selection is cleared: ids from the old collection may no longer exist.
    pub fn replace_collection(&mut self, collection: Vec<Report>) {
        self.collection = collection;
        self.selection.clear();
        self.derived = None;
    }

    /// Returns whether the criteria changed
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if self.criteria == criteria {
            return false;
        }
        self.criteria = criteria;
        self.derived = None;
        true
    }

    /// Toggle selection of a report that is part of the collection
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        self.contains(id).then(|| self.selection.toggle(id))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drop reports confirmed deleted upstream, and deselect them
    pub fn remove(&mut self, ids: &[String]) -> usize {
        let before = self.collection.len();
        self.collection = selection::bulk_delete(ids, &self.collection);
        let removed = before - self.collection.len();
        for id in ids {
            if self.selection.contains(id) {
                self.selection.toggle(id);
            }
        }
        if removed > 0 {
            self.derived = None;
        }
        removed
    }

    /// Replace a report in place after an update. Returns false if it is not in this view.
    pub fn upsert(&mut self, report: &Report) -> bool {
        match self.collection.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => {
                *existing = report.clone();
                self.derived = None;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn is_stale(&self) -> bool {
        self.derived.is_none()
    }

    #[cfg(test)]
    fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// The filtered and sorted list, recomputed synchronously when stale
    pub fn derived(&mut self) -> Arc<Vec<Report>> {
        if let Some(derived) = &self.derived {
            return Arc::clone(derived);
        }
        let derived = Arc::new(pipeline::apply(&self.collection, &self.criteria));
        self.recomputations += 1;
        tracing::trace!(
            recomputations = self.recomputations,
            matches = derived.len(),
            "Recomputed derived report list"
        );
        self.derived = Some(Arc::clone(&derived));
        derived
    }

    /// One page of the derived list plus the total number of matches
    pub fn page(&mut self, pagination: &PaginationQuery) -> (Vec<Report>, usize) {
        let derived = self.derived();
        (pagination.window(&derived).to_vec(), derived.len())
    }
}

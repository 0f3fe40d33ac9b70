use std::collections::HashSet;

use super::models::Report;

/// Multi-select state layered over a report list.
///
/// Ids are kept in the order they were selected. The set is independent of the
/// current filter, so hiding a report does not deselect it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    /// Add the id if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|selected| selected == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The collection without any report whose id is in `ids`.
///
/// Unknown ids simply have no effect; relative order is preserved.
pub fn bulk_delete(ids: &[String], collection: &[Report]) -> Vec<Report> {
    let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
    collection
        .iter()
        .filter(|report| !doomed.contains(report.id.as_str()))
        .cloned()
        .collect()
}

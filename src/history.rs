//! Upload history list state.
//!
//! Holds the fetched datasets, the search term, the pending delete
//! confirmation and a single in-flight action marker. Filtering makes no
//! assumption about how many datasets the backend returns.

use std::fmt;

use tracing::info;

use crate::models::DatasetSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Download,
    Delete,
}

impl RowAction {
    fn as_str(&self) -> &'static str {
        match self {
            RowAction::View => "view",
            RowAction::Download => "pdf",
            RowAction::Delete => "delete",
        }
    }
}

/// Which row action is pending, displayed as `<action>-<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionKey {
    pub action: RowAction,
    pub id: u64,
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.action.as_str(), self.id)
    }
}

/// Substring match of `term` against the dataset id and equipment count.
/// A blank term matches everything.
pub fn matches_term(dataset: &DatasetSummary, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    dataset.id.to_string().contains(term) || dataset.total_equipment.to_string().contains(term)
}

pub fn filter_datasets<'a>(datasets: &'a [DatasetSummary], term: &str) -> Vec<&'a DatasetSummary> {
    datasets.iter().filter(|d| matches_term(d, term)).collect()
}

#[derive(Debug, Clone, Default)]
pub struct HistoryList {
    datasets: Vec<DatasetSummary>,
    search_term: String,
    confirm_delete: Option<u64>,
    in_flight: Option<ActionKey>,
}

impl HistoryList {
    pub fn new(datasets: Vec<DatasetSummary>) -> Self {
        Self {
            datasets,
            ..Self::default()
        }
    }

    /// Replace the list after a (re)fetch. Pending confirmation for an id
    /// that no longer exists is dropped.
    pub fn load(&mut self, datasets: Vec<DatasetSummary>) {
        info!("History loaded with {} datasets", datasets.len());
        self.datasets = datasets;
        if let Some(id) = self.confirm_delete {
            if !self.contains(id) {
                self.confirm_delete = None;
            }
        }
    }

    pub fn datasets(&self) -> &[DatasetSummary] {
        &self.datasets
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.datasets.iter().any(|d| d.id == id)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn filtered(&self) -> Vec<DatasetSummary> {
        filter_datasets(&self.datasets, &self.search_term)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Badge text, e.g. `1 dataset` / `3 datasets`.
    pub fn count_label(&self) -> String {
        let n = self.len();
        format!("{} {}", n, if n == 1 { "dataset" } else { "datasets" })
    }

    pub fn in_flight(&self) -> Option<ActionKey> {
        self.in_flight
    }

    pub fn is_pending(&self, action: RowAction, id: u64) -> bool {
        self.in_flight == Some(ActionKey { action, id })
    }

    /// Mark `action` on `id` as in flight. The marker is single: starting a
    /// new action replaces the previous one.
    pub fn begin(&mut self, action: RowAction, id: u64) -> ActionKey {
        let key = ActionKey { action, id };
        self.in_flight = Some(key);
        key
    }

    /// Clear the marker if it still belongs to `key`.
    pub fn end(&mut self, key: ActionKey) {
        if self.in_flight == Some(key) {
            self.in_flight = None;
        }
    }

    pub fn pending_delete(&self) -> Option<u64> {
        self.confirm_delete
    }

    /// First step of a delete: ask for confirmation.
    pub fn request_delete(&mut self, id: u64) {
        self.confirm_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Second step: the user confirmed. Returns the id to delete and marks
    /// it in flight, or `None` if nothing was awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Option<u64> {
        let id = self.confirm_delete?;
        self.begin(RowAction::Delete, id);
        Some(id)
    }

    /// The backend deleted `id`: evict exactly that entry.
    pub fn delete_succeeded(&mut self, id: u64) {
        self.datasets.retain(|d| d.id != id);
        self.confirm_delete = None;
        self.end(ActionKey {
            action: RowAction::Delete,
            id,
        });
    }

    /// The delete failed: keep the entry, dismiss the confirmation.
    pub fn delete_failed(&mut self, id: u64) {
        self.confirm_delete = None;
        self.end(ActionKey {
            action: RowAction::Delete,
            id,
        });
    }

    /// Escape: dismiss a pending confirmation first, otherwise clear the
    /// search term. Returns whether anything changed.
    pub fn escape(&mut self) -> bool {
        if self.confirm_delete.take().is_some() {
            return true;
        }
        if !self.search_term.is_empty() {
            self.search_term.clear();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(id: u64, total: u64) -> DatasetSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "uploaded_at": "2026-01-27T10:30:00Z",
            "total_equipment": total,
        }))
        .unwrap()
    }

    fn sample() -> HistoryList {
        HistoryList::new(vec![dataset(7, 15), dataset(12, 8), dataset(3, 71)])
    }

    fn ids(list: &[DatasetSummary]) -> Vec<u64> {
        list.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_filter_matches_id_and_count() {
        let mut list = sample();

        list.set_search_term("7");
        assert_eq!(ids(&list.filtered()), vec![7, 3]);

        list.set_search_term("12");
        assert_eq!(ids(&list.filtered()), vec![12]);

        list.set_search_term("8");
        assert_eq!(ids(&list.filtered()), vec![12]);
    }

    #[test]
    fn test_filter_no_match_then_clear_restores() {
        let mut list = sample();
        list.set_search_term("999");
        assert!(list.filtered().is_empty());

        list.set_search_term("");
        assert_eq!(ids(&list.filtered()), vec![7, 12, 3]);

        list.set_search_term("   ");
        assert_eq!(list.filtered().len(), 3);
    }

    #[test]
    fn test_filter_is_independent_of_list_size() {
        let many: Vec<_> = (1..=40).map(|i| dataset(i, i * 2)).collect();
        let list = HistoryList::new(many);
        assert_eq!(filter_datasets(list.datasets(), "").len(), 40);
        assert_eq!(ids(&filter_datasets(list.datasets(), "40").into_iter().cloned().collect::<Vec<_>>()), vec![20, 40]);
    }

    #[test]
    fn test_action_key_format() {
        let key = ActionKey {
            action: RowAction::Delete,
            id: 7,
        };
        assert_eq!(key.to_string(), "delete-7");
        assert_eq!(
            ActionKey {
                action: RowAction::Download,
                id: 3
            }
            .to_string(),
            "pdf-3"
        );
    }

    #[test]
    fn test_in_flight_marker_only_matches_its_button() {
        let mut list = sample();
        let key = list.begin(RowAction::Download, 7);

        assert!(list.is_pending(RowAction::Download, 7));
        assert!(!list.is_pending(RowAction::Delete, 7));
        assert!(!list.is_pending(RowAction::Download, 12));

        list.end(key);
        assert!(list.in_flight().is_none());
    }

    #[test]
    fn test_stale_end_does_not_clear_newer_marker() {
        let mut list = sample();
        let first = list.begin(RowAction::View, 7);
        list.begin(RowAction::View, 12);
        list.end(first);
        assert!(list.is_pending(RowAction::View, 12));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut list = sample();
        assert_eq!(list.confirm_delete(), None);

        list.request_delete(7);
        assert_eq!(list.pending_delete(), Some(7));
        assert_eq!(list.confirm_delete(), Some(7));
        assert!(list.is_pending(RowAction::Delete, 7));
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut list = sample();
        list.request_delete(7);
        let id = list.confirm_delete().unwrap();
        list.delete_succeeded(id);

        assert_eq!(ids(list.datasets()), vec![12, 3]);
        assert!(list.pending_delete().is_none());
        assert!(list.in_flight().is_none());
    }

    #[test]
    fn test_failed_delete_keeps_list() {
        let mut list = sample();
        list.request_delete(42);
        let id = list.confirm_delete().unwrap();
        list.delete_failed(id);

        assert_eq!(ids(list.datasets()), vec![7, 12, 3]);
        assert!(list.pending_delete().is_none());
        assert!(list.in_flight().is_none());
    }

    #[test]
    fn test_escape_order() {
        let mut list = sample();
        list.set_search_term("7");
        list.request_delete(7);

        assert!(list.escape());
        assert!(list.pending_delete().is_none());
        assert_eq!(list.search_term(), "7");

        assert!(list.escape());
        assert_eq!(list.search_term(), "");
        assert!(!list.escape());
    }

    #[test]
    fn test_reload_drops_confirmation_for_missing_id() {
        let mut list = sample();
        list.request_delete(12);
        list.load(vec![dataset(7, 15)]);
        assert!(list.pending_delete().is_none());
    }

    #[test]
    fn test_count_label() {
        assert_eq!(HistoryList::new(vec![dataset(1, 1)]).count_label(), "1 dataset");
        assert_eq!(sample().count_label(), "3 datasets");
        assert_eq!(HistoryList::default().count_label(), "0 datasets");
    }
}

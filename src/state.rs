use std::sync::Arc;

use chrono::{DateTime, Local};

pub type SharedState = Arc<tokio::sync::Mutex<AppState>>;

/// In-memory state shared by all handlers. Lives for the lifetime of the
/// process; a restart starts from an empty registry and log.
#[derive(Debug, Default)]
pub struct AppState {
    pub subscribers: SubscriberRegistry,
    pub requests: RequestLog,
}

/// Users who opted into broadcasts, in subscription order.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    ids: Vec<i64>,
}

impl SubscriberRegistry {
    /// Returns true if the id was newly added. Subscribing twice keeps a
    /// single entry.
    pub fn subscribe(&mut self, id: i64) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns true if the id was present and got removed.
    pub fn unsubscribe(&mut self, id: i64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&known| known != id);
        self.ids.len() != before
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership copy for a broadcast run. Later subscribes/unsubscribes
    /// do not affect an already taken snapshot.
    pub fn snapshot(&self) -> Vec<i64> {
        self.ids.clone()
    }

    /// Last `n` subscriber ids, most recent last.
    pub fn last(&self, n: usize) -> &[i64] {
        &self.ids[self.ids.len().saturating_sub(n)..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    New,
    InProgress,
}

/// One recorded client message awaiting the engineer's response.
#[derive(Debug, Clone)]
pub struct Request {
    pub user_id: i64,
    pub user_name: String,
    pub username: String,
    pub created_at: DateTime<Local>,
    pub status: RequestStatus,
    pub message: String,
    pub taken_at: Option<DateTime<Local>>,
}

/// Append-only log of client requests, in arrival order.
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: Vec<Request>,
}

impl RequestLog {
    pub fn record(&mut self, user_id: i64, user_name: String, username: String, message: String) {
        self.entries.push(Request {
            user_id,
            user_name,
            username,
            created_at: Local::now(),
            status: RequestStatus::New,
            message,
            taken_at: None,
        });
    }

    /// Marks the first request of this user (in arrival order) as in
    /// progress and stamps the take time. Returns false without touching
    /// the log when the user has no recorded request.
    pub fn take(&mut self, user_id: i64) -> bool {
        match self.entries.iter_mut().find(|r| r.user_id == user_id) {
            Some(request) => {
                request.status = RequestStatus::InProgress;
                request.taken_at = Some(Local::now());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `n` requests, most recent last.
    pub fn last(&self, n: usize) -> &[Request] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with(ids: &[i64]) -> RequestLog {
        let mut log = RequestLog::default();
        for &id in ids {
            log.record(id, format!("User {id}"), format!("user{id}"), "Здравствуйте".to_string());
        }
        log
    }

    #[test]
    fn subscribe_is_idempotent() {
        let mut registry = SubscriberRegistry::default();
        assert!(registry.subscribe(100));
        assert!(!registry.subscribe(100));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unsubscribe_removes_only_known_ids() {
        let mut registry = SubscriberRegistry::default();
        registry.subscribe(100);
        assert!(registry.unsubscribe(100));
        assert!(!registry.unsubscribe(100));
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut registry = SubscriberRegistry::default();
        registry.subscribe(1);
        registry.subscribe(2);
        let snapshot = registry.snapshot();
        registry.subscribe(3);
        registry.unsubscribe(1);
        assert_eq!(snapshot, vec![1, 2]);
    }

    #[test]
    fn last_keeps_insertion_order_most_recent_last() {
        let mut registry = SubscriberRegistry::default();
        for id in 1..=7 {
            registry.subscribe(id);
        }
        assert_eq!(registry.last(5), &[3, 4, 5, 6, 7]);
        assert_eq!(registry.last(10), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn record_appends_new_entries_in_arrival_order() {
        let log = log_with(&[10, 20]);
        let entries = log.last(10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_id, 10);
        assert_eq!(entries[1].user_id, 20);
        assert!(entries.iter().all(|r| r.status == RequestStatus::New));
        assert!(entries.iter().all(|r| r.taken_at.is_none()));
    }

    #[test]
    fn take_stamps_time_within_execution_window() {
        let mut log = log_with(&[10]);
        let before = Local::now();
        assert!(log.take(10));
        let after = Local::now();

        let request = &log.last(1)[0];
        assert_eq!(request.status, RequestStatus::InProgress);
        let taken_at = request.taken_at.expect("taken_at must be stamped");
        assert!(taken_at >= before && taken_at <= after);
    }

    #[test]
    fn take_twice_stays_in_progress() {
        let mut log = log_with(&[10]);
        assert!(log.take(10));
        assert!(log.take(10));
        assert_eq!(log.last(1)[0].status, RequestStatus::InProgress);
    }

    #[test]
    fn take_on_unknown_id_mutates_nothing() {
        let mut log = log_with(&[10]);
        assert!(!log.take(999));
        let request = &log.last(1)[0];
        assert_eq!(request.status, RequestStatus::New);
        assert!(request.taken_at.is_none());
    }

    #[test]
    fn take_picks_first_match_when_user_has_several_requests() {
        let mut log = log_with(&[10, 20, 10]);
        assert!(log.take(10));
        let entries = log.last(10);
        assert_eq!(entries[0].status, RequestStatus::InProgress);
        assert_eq!(entries[1].status, RequestStatus::New);
        assert_eq!(entries[2].status, RequestStatus::New);
    }
}

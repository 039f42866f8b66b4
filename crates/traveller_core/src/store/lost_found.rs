//! crates/traveller_core/src/store/lost_found.rs
//!
//! The Lost & Found resource store. It owns the single authoritative copy of
//! the list and serializes every call that touches it through a FIFO queue,
//! so a refresh and a mutation can never interleave.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::domain::{ItemStatus, LostFoundItem, NewLostFoundItem};
use crate::notify::{Notifier, Operation};
use crate::ports::LostFoundGateway;

const FETCH_FAILED: &str = "Failed to fetch items. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LostFoundState {
    pub items: Vec<LostFoundItem>,
    /// True only while `fetch_items` runs.
    pub loading: bool,
    pub error: Option<String>,
}

pub struct LostFoundStore {
    gateway: Arc<dyn LostFoundGateway>,
    notifier: Notifier,
    state: RwLock<LostFoundState>,
    // tokio's Mutex hands out the lock in request order.
    queue: Mutex<()>,
}

impl LostFoundStore {
    pub fn new(gateway: Arc<dyn LostFoundGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            state: RwLock::new(LostFoundState::default()),
            queue: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> LostFoundState {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<LostFoundItem> {
        self.state.read().await.items.clone()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Replaces the whole list with the gateway's. On failure the last
    /// confirmed list is kept and the error is recorded.
    pub async fn fetch_items(&self) -> bool {
        let _turn = self.queue.lock().await;
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.gateway.list_items().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(items) => {
                info!(count = items.len(), "Fetched lost & found items.");
                state.items = items;
                true
            }
            Err(e) => {
                error!("Error fetching items: {}", e);
                state.error = Some(FETCH_FAILED.to_string());
                self.notifier.error(Operation::FetchItems, FETCH_FAILED);
                false
            }
        }
    }

    /// Submits a new report. It only appears in the list once the gateway
    /// has confirmed it and assigned a `report_id`.
    pub async fn add_item(&self, item: NewLostFoundItem) -> bool {
        if item.location.trim().is_empty() || item.item_description.trim().is_empty() {
            self.notifier
                .error(Operation::AddItem, "Please fill in all required fields");
            return false;
        }
        if item.status == ItemStatus::Recovered {
            self.notifier
                .error(Operation::AddItem, "New reports must be either Lost or Found");
            return false;
        }

        let item = NewLostFoundItem {
            date_found: (item.status == ItemStatus::Found).then(Utc::now),
            ..item
        };

        let _turn = self.queue.lock().await;
        match self.gateway.add_item(&item).await {
            Ok(record) => {
                info!(report_id = record.report_id, "Lost & found item added.");
                upsert(&mut self.state.write().await.items, record);
                self.notifier
                    .success(Operation::AddItem, "Item added successfully!");
                true
            }
            Err(e) => {
                warn!("Failed to add item: {}", e);
                self.notifier.error(
                    Operation::AddItem,
                    e.user_message().unwrap_or("Failed to add item"),
                );
                false
            }
        }
    }

    /// Moves a record to `new_status`. Transitions the state machine forbids
    /// are refused locally; ids missing from the list are still sent, and
    /// leave the list as it is.
    pub async fn update_item_status(&self, report_id: i64, new_status: ItemStatus) -> bool {
        let _turn = self.queue.lock().await;

        let current = self
            .state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.report_id == report_id)
            .map(|item| item.status);
        if let Some(current) = current {
            if !current.can_transition_to(new_status) {
                self.notifier.error(
                    Operation::UpdateItemStatus,
                    format!("Cannot change status from {} to {}", current, new_status),
                );
                return false;
            }
        }

        match self.gateway.update_item_status(report_id, new_status).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                // First match only; report ids are assumed unique.
                match state.items.iter_mut().find(|item| item.report_id == report_id) {
                    Some(item) => item.status = new_status,
                    None => debug!(report_id, "Updated item is not in the local list."),
                }
                self.notifier
                    .success(Operation::UpdateItemStatus, "Status updated successfully!");
                true
            }
            Err(e) => {
                warn!(report_id, "Failed to update status: {}", e);
                self.notifier.error(
                    Operation::UpdateItemStatus,
                    "Failed to update status. Please try again.",
                );
                false
            }
        }
    }

    pub async fn delete_item(&self, report_id: i64) -> bool {
        let _turn = self.queue.lock().await;
        match self.gateway.delete_item(report_id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                let position = state.items.iter().position(|item| item.report_id == report_id);
                if let Some(index) = position {
                    state.items.remove(index);
                }
                self.notifier
                    .success(Operation::DeleteItem, "Item deleted successfully");
                true
            }
            Err(e) => {
                warn!(report_id, "Failed to delete item: {}", e);
                self.notifier.error(
                    Operation::DeleteItem,
                    e.user_message()
                        .unwrap_or("Failed to delete item. Please try again."),
                );
                false
            }
        }
    }
}

/// A confirmed record replaces any stale copy with the same id.
fn upsert(items: &mut Vec<LostFoundItem>, record: LostFoundItem) {
    match items.iter_mut().find(|item| item.report_id == record.report_id) {
        Some(existing) => *existing = record,
        None => items.push(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::ports::{PortError, PortResult};
    use crate::testing::{count, shown};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    fn record(report_id: i64, status: ItemStatus) -> LostFoundItem {
        LostFoundItem {
            report_id,
            user_id: 1,
            location: "Station".into(),
            item_description: "Blue backpack".into(),
            status,
            report_date: None,
            date_found: None,
        }
    }

    fn new_item(status: ItemStatus) -> NewLostFoundItem {
        NewLostFoundItem {
            user_id: 1,
            location: "Airport".into(),
            item_description: "Passport".into(),
            status,
            date_found: None,
        }
    }

    /// In-memory stand-in for the gateway, with switches for failure and a
    /// gate that holds `list_items` until released.
    #[derive(Default)]
    struct StubGateway {
        server_items: StdMutex<Vec<LostFoundItem>>,
        next_id: AtomicI64,
        fail: AtomicBool,
        gate: Option<Arc<Notify>>,
        log: StdMutex<Vec<&'static str>>,
        last_new: StdMutex<Option<NewLostFoundItem>>,
    }

    impl StubGateway {
        fn check(&self) -> PortResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(PortError::rejected("User not found"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl LostFoundGateway for StubGateway {
        async fn list_items(&self) -> PortResult<Vec<LostFoundItem>> {
            self.log.lock().unwrap().push("list:start");
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.log.lock().unwrap().push("list:end");
            self.check()?;
            Ok(self.server_items.lock().unwrap().clone())
        }

        async fn add_item(&self, item: &NewLostFoundItem) -> PortResult<LostFoundItem> {
            self.log.lock().unwrap().push("add");
            self.check()?;
            *self.last_new.lock().unwrap() = Some(item.clone());
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
            let created = LostFoundItem {
                report_id: id,
                user_id: item.user_id,
                location: item.location.clone(),
                item_description: item.item_description.clone(),
                status: item.status,
                report_date: Some(Utc::now()),
                date_found: item.date_found,
            };
            self.server_items.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update_item_status(&self, _report_id: i64, _status: ItemStatus) -> PortResult<()> {
            self.check()
        }

        async fn delete_item(&self, _report_id: i64) -> PortResult<()> {
            self.check()
        }
    }

    async fn seeded(gateway: Arc<StubGateway>, items: Vec<LostFoundItem>) -> LostFoundStore {
        *gateway.server_items.lock().unwrap() = items;
        let store = LostFoundStore::new(gateway, Notifier::default());
        assert!(store.fetch_items().await);
        store
    }

    #[tokio::test]
    async fn recovering_one_record_leaves_the_other_untouched() {
        let store = seeded(
            Arc::new(StubGateway::default()),
            vec![record(42, ItemStatus::Lost), record(43, ItemStatus::Lost)],
        )
        .await;

        assert!(store.update_item_status(42, ItemStatus::Recovered).await);

        assert_eq!(
            store.items().await,
            vec![record(42, ItemStatus::Recovered), record(43, ItemStatus::Lost)]
        );
    }

    #[tokio::test]
    async fn unknown_report_id_leaves_list_unchanged() {
        let store = seeded(
            Arc::new(StubGateway::default()),
            vec![record(42, ItemStatus::Lost)],
        )
        .await;

        store.update_item_status(999, ItemStatus::Recovered).await;
        assert_eq!(store.items().await, vec![record(42, ItemStatus::Lost)]);
    }

    #[tokio::test]
    async fn backward_transitions_are_refused_locally() {
        let notifier = Notifier::default();
        let gateway = Arc::new(StubGateway::default());
        *gateway.server_items.lock().unwrap() = vec![record(7, ItemStatus::Recovered)];
        let store = LostFoundStore::new(gateway.clone(), notifier.clone());
        store.fetch_items().await;
        let mut rx = notifier.subscribe();

        assert!(!store.update_item_status(7, ItemStatus::Lost).await);
        assert_eq!(store.items().await, vec![record(7, ItemStatus::Recovered)]);
        assert_eq!(shown(&mut rx)[0].message, "Cannot change status from Recovered to Lost");
    }

    #[tokio::test]
    async fn failed_update_keeps_list_and_notifies() {
        let notifier = Notifier::default();
        let gateway = Arc::new(StubGateway::default());
        *gateway.server_items.lock().unwrap() = vec![record(1, ItemStatus::Lost)];
        let store = LostFoundStore::new(gateway.clone(), notifier.clone());
        store.fetch_items().await;
        gateway.fail.store(true, Ordering::SeqCst);
        let mut rx = notifier.subscribe();

        assert!(!store.update_item_status(1, ItemStatus::Recovered).await);
        assert_eq!(store.items().await, vec![record(1, ItemStatus::Lost)]);
        let notes = shown(&mut rx);
        assert_eq!(count(&notes, NotificationKind::Error), 1);
        assert_eq!(notes[0].message, "Failed to update status. Please try again.");
    }

    #[tokio::test]
    async fn added_record_appears_exactly_once() {
        let gateway = Arc::new(StubGateway::default());
        let store = LostFoundStore::new(gateway, Notifier::default());

        assert!(store.add_item(new_item(ItemStatus::Lost)).await);

        let items = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items.iter().filter(|i| i.report_id == 100).count(), 1);
    }

    #[tokio::test]
    async fn confirmation_replaces_a_stale_copy() {
        let gateway = Arc::new(StubGateway::default());
        let store = seeded(gateway.clone(), vec![record(100, ItemStatus::Lost)]).await;

        assert!(store.add_item(new_item(ItemStatus::Found)).await);

        let items = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, ItemStatus::Found);
    }

    #[tokio::test]
    async fn failed_add_leaves_length_unchanged() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();
        let gateway = Arc::new(StubGateway::default());
        gateway.fail.store(true, Ordering::SeqCst);
        let store = LostFoundStore::new(gateway, notifier);

        assert!(!store.add_item(new_item(ItemStatus::Lost)).await);
        assert!(store.items().await.is_empty());
        assert_eq!(shown(&mut rx)[0].message, "User not found");
    }

    #[tokio::test]
    async fn found_reports_are_stamped_and_lost_ones_are_not() {
        let gateway = Arc::new(StubGateway::default());
        let store = LostFoundStore::new(gateway.clone(), Notifier::default());

        store.add_item(new_item(ItemStatus::Found)).await;
        assert!(gateway.last_new.lock().unwrap().as_ref().unwrap().date_found.is_some());

        store.add_item(new_item(ItemStatus::Lost)).await;
        assert!(gateway.last_new.lock().unwrap().as_ref().unwrap().date_found.is_none());
    }

    #[tokio::test]
    async fn incomplete_reports_are_rejected_before_sending() {
        let gateway = Arc::new(StubGateway::default());
        let store = LostFoundStore::new(gateway.clone(), Notifier::default());

        let mut blank = new_item(ItemStatus::Lost);
        blank.location = "  ".into();
        assert!(!store.add_item(blank).await);
        assert!(!store.add_item(new_item(ItemStatus::Recovered)).await);
        assert!(gateway.log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_last_confirmed_list() {
        let gateway = Arc::new(StubGateway::default());
        let store = seeded(gateway.clone(), vec![record(1, ItemStatus::Lost)]).await;
        gateway.fail.store(true, Ordering::SeqCst);

        assert!(!store.fetch_items().await);
        let state = store.snapshot().await;
        assert_eq!(state.items, vec![record(1, ItemStatus::Lost)]);
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn delete_removes_first_match() {
        let store = seeded(
            Arc::new(StubGateway::default()),
            vec![record(1, ItemStatus::Lost), record(2, ItemStatus::Found)],
        )
        .await;

        assert!(store.delete_item(1).await);
        assert_eq!(store.items().await, vec![record(2, ItemStatus::Found)]);
    }

    #[tokio::test]
    async fn mutations_wait_for_an_in_flight_fetch() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(StubGateway {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let store = Arc::new(LostFoundStore::new(gateway.clone(), Notifier::default()));

        let fetch = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_items().await }
        });
        while gateway.log.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(store.loading().await);

        let add = tokio::spawn({
            let store = store.clone();
            async move { store.add_item(new_item(ItemStatus::Lost)).await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(*gateway.log.lock().unwrap(), vec!["list:start"]);

        gate.notify_one();
        let (fetched, added) = futures::future::join(fetch, add).await;
        assert!(fetched.unwrap());
        assert!(added.unwrap());

        assert_eq!(*gateway.log.lock().unwrap(), vec!["list:start", "list:end", "add"]);
        assert_eq!(store.items().await.len(), 1);
        assert!(!store.loading().await);
    }
}

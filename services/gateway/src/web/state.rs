//! services/gateway/src/web/state.rs
//!
//! Defines the mock gateway's shared, in-memory state.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;
use traveller_core::domain::{LostFoundItem, User};

//=========================================================================================
// Records
//=========================================================================================

/// A registered account. The password is stored as an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password_hash: String,
}

/// Everything the mock persists, guarded by a single lock.
#[derive(Debug, Default)]
pub struct Directory {
    accounts: HashMap<i64, Account>,
    items: Vec<LostFoundItem>,
    next_user_id: i64,
    next_report_id: i64,
}

impl Directory {
    pub fn account(&self, user_id: i64) -> Option<&Account> {
        self.accounts.get(&user_id)
    }

    pub fn account_mut(&mut self, user_id: i64) -> Option<&mut Account> {
        self.accounts.get_mut(&user_id)
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .values()
            .find(|account| account.user.email.eq_ignore_ascii_case(email))
    }

    /// Stores a new account and returns its id, or `None` if the email is taken.
    pub fn create_account(&mut self, mut user: User, password_hash: String) -> Option<i64> {
        if self.account_by_email(&user.email).is_some() {
            return None;
        }
        self.next_user_id += 1;
        user.id = self.next_user_id;
        user.created_at = Some(Utc::now());
        self.accounts.insert(
            user.id,
            Account {
                user,
                password_hash,
            },
        );
        Some(self.next_user_id)
    }

    pub fn items(&self) -> &[LostFoundItem] {
        &self.items
    }

    /// Assigns the next sequential `report_id` and stamps the report date.
    pub fn insert_item(&mut self, mut item: LostFoundItem) -> LostFoundItem {
        self.next_report_id += 1;
        item.report_id = self.next_report_id;
        item.report_date = Some(Utc::now());
        self.items.push(item.clone());
        item
    }

    pub fn item_mut(&mut self, report_id: i64) -> Option<&mut LostFoundItem> {
        self.items.iter_mut().find(|item| item.report_id == report_id)
    }

    pub fn remove_item(&mut self, report_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.report_id != report_id);
        self.items.len() != before
    }
}

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Debug, Default)]
pub struct AppState {
    pub directory: Mutex<Directory>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

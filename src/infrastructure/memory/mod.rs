//! In-process repository implementations.
//!
//! Used when no database is configured, and by tests. State lives behind a
//! `tokio::sync::RwLock`; every trait method takes the lock once, so each
//! operation is atomic with respect to the others, including the
//! compare-and-swap on refresh tokens. Data is lost on restart.

mod short_url_repository;
mod todo_repository;
mod user_repository;

use std::collections::BTreeMap;

pub use short_url_repository::MemoryShortUrlRepository;
pub use todo_repository::MemoryTodoRepository;
pub use user_repository::MemoryUserRepository;

/// Rows keyed by a sequential id, starting at 1 like `BIGSERIAL`.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

//! Chat history list cache

mod cache;

pub use cache::{HistoryCache, HistorySource, DEFAULT_PAGE_SIZE};

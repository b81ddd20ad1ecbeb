//! Single-slot cache of the current user's chat list
//!
//! Constructed once and shared by reference. The cache never detects
//! staleness on its own: callers invalidate it after every local mutation
//! (chat saved, renamed or deleted).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::CoreResult;
use crate::types::{ChatPage, ChatSummary};

/// Page size used when callers have no preference
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Where chat pages come from
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_page(&self, offset: usize, limit: usize) -> CoreResult<ChatPage>;
}

#[async_trait]
impl<T: HistorySource + ?Sized> HistorySource for Arc<T> {
    async fn fetch_page(&self, offset: usize, limit: usize) -> CoreResult<ChatPage> {
        (**self).fetch_page(offset, limit).await
    }
}

#[derive(Debug, Default)]
struct CacheState {
    chats: Vec<ChatSummary>,
    next_offset: Option<usize>,
    fetched_once: bool,
}

impl CacheState {
    fn snapshot(&self) -> ChatPage {
        ChatPage {
            chats: self.chats.clone(),
            next_offset: self.next_offset,
        }
    }
}

/// Lazily populated chat-list cache
pub struct HistoryCache<S> {
    source: S,
    state: Mutex<CacheState>,
}

impl<S: HistorySource> HistoryCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Cached list plus cursor
    ///
    /// A cold cache fetches `offset..offset+limit` and stores it. A warm cache
    /// fetches only when `offset` is the stored cursor, appending the page;
    /// any other request is served from memory. The lock is held across the
    /// fetch, so pages are applied in the order they were requested.
    ///
    /// A failed fetch marks the cursor terminal and returns the error. A
    /// cold cache stays unfetched.
    pub async fn get(&self, offset: usize, limit: usize) -> CoreResult<ChatPage> {
        let mut state = self.state.lock().await;

        if state.fetched_once && state.next_offset != Some(offset) {
            return Ok(state.snapshot());
        }

        match self.source.fetch_page(offset, limit).await {
            Ok(page) => {
                debug!(
                    offset,
                    fetched = page.chats.len(),
                    next_offset = ?page.next_offset,
                    "Fetched chat history page"
                );
                if state.fetched_once {
                    state.chats.extend(page.chats);
                } else {
                    state.chats = page.chats;
                    state.fetched_once = true;
                }
                state.next_offset = page.next_offset;
                Ok(state.snapshot())
            }
            Err(err) => {
                warn!(offset, error = %err, "Failed to fetch chat history");
                state.next_offset = None;
                Err(err)
            }
        }
    }

    /// Fetch the page at the cursor, if there is one
    pub async fn load_more(&self, limit: usize) -> CoreResult<ChatPage> {
        let cursor = self.state.lock().await.next_offset;
        match cursor {
            Some(offset) => self.get(offset, limit).await,
            None => self.get(0, limit).await,
        }
    }

    /// Whether another page exists beyond the cached list
    pub async fn has_more(&self) -> bool {
        self.state.lock().await.next_offset.is_some()
    }

    /// Drop the cached list, cursor and fetched flag; idempotent
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        *state = CacheState::default();
        debug!("Chat history cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeSource {
        total: usize,
        fetches: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                fetches: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl HistorySource for FakeSource {
        async fn fetch_page(&self, offset: usize, limit: usize) -> CoreResult<ChatPage> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(CoreError::Upstream("offline".to_string()));
            }
            let end = (offset + limit).min(self.total);
            let chats = (offset..end)
                .map(|i| ChatSummary {
                    id: format!("c{i}"),
                    title: format!("Chat {i}"),
                    created_at: Utc::now(),
                    path: format!("/search/c{i}"),
                })
                .collect();
            Ok(ChatPage {
                chats,
                next_offset: (end < self.total).then_some(end),
            })
        }
    }

    #[tokio::test]
    async fn test_second_get_is_served_from_cache() {
        let source = Arc::new(FakeSource::new(5));
        let cache = HistoryCache::new(source.clone());

        let first = cache.get(0, 20).await.unwrap();
        let second = cache.get(0, 20).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = Arc::new(FakeSource::new(5));
        let cache = HistoryCache::new(source.clone());

        cache.get(0, 20).await.unwrap();
        cache.invalidate().await;
        cache.invalidate().await;
        cache.get(0, 20).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_pages_append_and_advance_cursor() {
        let source = Arc::new(FakeSource::new(5));
        let cache = HistoryCache::new(source.clone());

        let page = cache.get(0, 2).await.unwrap();
        assert_eq!(page.next_offset, Some(2));
        let page = cache.load_more(2).await.unwrap();
        assert_eq!(page.chats.len(), 4);
        let page = cache.load_more(2).await.unwrap();
        assert_eq!(page.chats.len(), 5);
        assert_eq!(page.next_offset, None);
        assert!(!cache.has_more().await);
    }

    #[tokio::test]
    async fn test_failed_cold_fetch_stays_unfetched() {
        let source = Arc::new(FakeSource::new(5));
        source.fail.store(true, Ordering::SeqCst);
        let cache = HistoryCache::new(source.clone());

        assert!(cache.get(0, 20).await.is_err());
        assert!(!cache.has_more().await);

        source.fail.store(false, Ordering::SeqCst);
        let page = cache.get(0, 20).await.unwrap();
        assert_eq!(page.chats.len(), 5);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_page_stops_pagination() {
        let source = Arc::new(FakeSource::new(5));
        let cache = HistoryCache::new(source.clone());
        cache.get(0, 2).await.unwrap();

        source.fail.store(true, Ordering::SeqCst);
        assert!(cache.get(2, 2).await.is_err());
        assert!(!cache.has_more().await);

        let page = cache.get(2, 2).await.unwrap();
        assert_eq!(page.chats.len(), 2);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }
}

//! Shipped [`crate::traits::ChatStore`] implementations

mod memory;

pub use memory::InMemoryChatStore;

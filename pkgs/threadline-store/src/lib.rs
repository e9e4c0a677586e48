//! Threadline Store - local caches for the Threadline messaging client
//!
//! This crate holds the client-side view of the remote message store. It does
//! no I/O; the messaging client fills and mutates these caches from API
//! responses, user actions and poll ticks.
//!
//! # Architecture
//!
//! - **ConversationCache**: the "all", "unread" and "archived" partitions, the
//!   active filter, and ephemeral search results
//! - **MessageThread**: the ordered messages of the one open conversation
//! - **day_groups**: calendar-day projection of a thread for display
//!
//! # Invariants
//!
//! - An archived conversation never sits in "all" or "unread"
//! - Promotion moves a conversation to the front of the partitions it is in;
//!   it never adds it to a partition, and drops it from one its new snapshot
//!   no longer matches
//! - Appending a message whose id is already in the thread is a no-op
//! - A message's read flag never goes back from read to unread
//!
//! # Example Usage
//!
//! ```rust
//! use threadline_store::{ConversationCache, Filter, MessageThread};
//!
//! let mut cache = ConversationCache::new();
//! cache.set_active_filter(Filter::Unread);
//! assert!(cache.active().is_empty());
//!
//! let thread = MessageThread::new();
//! assert!(thread.conversation().is_none());
//! ```

pub mod conversation_cache;
pub mod day_groups;
pub mod filter;
pub mod message_thread;
pub mod models;

pub use conversation_cache::{
    group_search_results, ConversationCache, DisplayedList, Partitions, SearchGroup,
};
pub use day_groups::{group_by_day, group_by_local_day, DayGroup, DayLabel};
pub use filter::{Filter, ParseFilterError};
pub use message_thread::MessageThread;
pub use models::{
    Conversation, ConversationId, LastMessage, Message, MessageId, MessagePatch, Participant,
    Sender, UserId, UserType,
};

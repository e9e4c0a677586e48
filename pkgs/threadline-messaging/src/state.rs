//! Client state owned by the messaging client
//!
//! Every cache mutation goes through [`crate::MessagingClient`], which holds
//! this state behind a single lock.

use threadline_store::{ConversationCache, MessageId, MessageThread};

/// Message composer: input field, edit mode and delete confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub draft: String,
    pub editing: Option<MessageId>,
    pub pending_delete: Option<MessageId>,
}

impl Composer {
    pub fn reset(&mut self) {
        self.editing = None;
        self.pending_delete = None;
    }
}

#[derive(Debug, Default)]
pub struct ClientState {
    pub conversations: ConversationCache,
    pub thread: MessageThread,
    pub composer: Composer,

    /// Persistent errors shown in place of panel content
    pub list_error: Option<String>,
    pub search_error: Option<String>,
    pub thread_error: Option<String>,

    pub loading_conversations: bool,
    pub loading_thread: bool,

    // Bumped on every open/close and every search so late responses can be
    // recognised and dropped.
    pub(crate) open_generation: u64,
    pub(crate) search_generation: u64,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }
}

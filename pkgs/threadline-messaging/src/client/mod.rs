//! Messaging client - the single owner of the conversation and thread caches

mod conversations;
mod mutations;
mod sync;
mod thread;

pub use sync::{PollHandle, PollOutcome};

use std::sync::Arc;

use parking_lot::Mutex;
use threadline_api::MessageApi;
use threadline_store::{
    Conversation, ConversationId, DayGroup, Filter, Message, MessageId, SearchGroup,
};
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::events::MessagingEvent;
use crate::state::{ClientState, Composer};

/// Owned copy of what the conversation panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayedConversations {
    Partition(Filter, Vec<Conversation>),
    Search(Vec<SearchGroup>),
}

struct Inner {
    api: Arc<dyn MessageApi>,
    config: ClientConfig,
    state: Mutex<ClientState>,
    events: mpsc::UnboundedSender<MessagingEvent>,
}

/// Conversation synchronization client
///
/// Cheap to clone; clones share the same state. State changes are announced
/// on the event channel returned by [`MessagingClient::new`].
#[derive(Clone)]
pub struct MessagingClient {
    inner: Arc<Inner>,
}

impl MessagingClient {
    pub fn new(
        api: Arc<dyn MessageApi>,
        config: ClientConfig,
    ) -> (Self, mpsc::UnboundedReceiver<MessagingEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let client = Self {
            inner: Arc::new(Inner {
                api,
                config,
                state: Mutex::new(ClientState::new()),
                events,
            }),
        };
        (client, receiver)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn api(&self) -> &dyn MessageApi {
        self.inner.api.as_ref()
    }

    /// Run `f` with the state locked. Never called across an `.await`.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> R {
        let mut state = self.inner.state.lock();
        f(&mut state)
    }

    /// Read-only access to the current state
    pub fn with_state<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        let state = self.inner.state.lock();
        f(&state)
    }

    pub(crate) fn emit(&self, event: MessagingEvent) {
        // A dropped receiver only means nobody renders anymore
        let _ = self.inner.events.send(event);
    }

    pub fn active_filter(&self) -> Filter {
        self.with_state(|s| s.conversations.active_filter())
    }

    pub fn partition(&self, filter: Filter) -> Vec<Conversation> {
        self.with_state(|s| s.conversations.partition(filter).to_vec())
    }

    pub fn displayed(&self) -> DisplayedConversations {
        self.with_state(|s| {
            if s.conversations.is_searching() {
                DisplayedConversations::Search(s.conversations.search_results().to_vec())
            } else {
                DisplayedConversations::Partition(
                    s.conversations.active_filter(),
                    s.conversations.active().to_vec(),
                )
            }
        })
    }

    pub fn unread_total(&self) -> u32 {
        self.with_state(|s| s.conversations.unread_total())
    }

    pub fn open_conversation(&self) -> Option<ConversationId> {
        self.with_state(|s| s.thread.conversation())
    }

    pub fn thread_messages(&self) -> Vec<Message> {
        self.with_state(|s| s.thread.messages().to_vec())
    }

    /// The open thread grouped by local calendar day
    pub fn day_groups(&self) -> Vec<DayGroup> {
        self.with_state(|s| threadline_store::group_by_local_day(s.thread.messages()))
    }

    pub fn composer(&self) -> Composer {
        self.with_state(|s| s.composer.clone())
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| s.composer.draft = text);
    }

    /// Enter edit mode for a message of the open thread
    pub fn begin_edit(&self, message: MessageId) -> bool {
        self.update(|s| {
            if !s.thread.contains(message) {
                return false;
            }
            s.composer.editing = Some(message);
            true
        })
    }

    pub fn cancel_edit(&self) {
        self.update(|s| s.composer.editing = None);
    }

    /// Ask for delete confirmation of a message of the open thread
    pub fn request_delete(&self, message: MessageId) -> bool {
        self.update(|s| {
            if !s.thread.contains(message) {
                return false;
            }
            s.composer.pending_delete = Some(message);
            true
        })
    }

    pub fn cancel_delete(&self) {
        self.update(|s| s.composer.pending_delete = None);
    }
}

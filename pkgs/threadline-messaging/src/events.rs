//! Events emitted to the view layer

use threadline_store::{ConversationId, MessageId};

/// Panel an error message is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    ConversationList,
    Search,
    Thread,
}

/// Notification that part of the client state changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingEvent {
    // Conversation list
    ConversationsUpdated,
    SearchResultsUpdated {
        term: String,
        conversations: usize,
    },

    // Thread
    ThreadLoaded {
        conversation: ConversationId,
        messages: usize,
    },
    ThreadUpdated {
        conversation: ConversationId,
    },
    ThreadClosed,
    NewMessage {
        conversation: ConversationId,
        message: MessageId,
    },
    ScrollToLatest {
        conversation: ConversationId,
    },

    // Composer
    DraftRestored {
        content: String,
    },
    EditFinished {
        message: MessageId,
    },

    /// `persistent` errors replace the panel content until the next
    /// successful load; the others are transient notices.
    Error {
        panel: Panel,
        message: String,
        persistent: bool,
    },
}

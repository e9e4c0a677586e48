//! Message thread cache - messages of the one open conversation

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

use crate::day_groups::{group_by_day, DayGroup};
use crate::models::{ConversationId, Message, MessageId, MessagePatch, UserId};

/// Ordered messages of the currently open conversation
#[derive(Debug, Clone, Default)]
pub struct MessageThread {
    conversation: Option<ConversationId>,
    messages: Vec<Message>,
}

impl MessageThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> Option<ConversationId> {
        self.conversation
    }

    pub fn is_open(&self, conversation: ConversationId) -> bool {
        self.conversation == Some(conversation)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Replace the thread with freshly fetched messages.
    ///
    /// When reloading the same conversation, messages already known as read
    /// stay read even if the fetched copy says otherwise.
    pub fn replace(&mut self, conversation: ConversationId, mut messages: Vec<Message>) {
        if self.conversation == Some(conversation) {
            let read: HashSet<MessageId> = self
                .messages
                .iter()
                .filter(|m| m.is_read)
                .map(|m| m.id)
                .collect();
            for message in messages.iter_mut().filter(|m| read.contains(&m.id)) {
                message.mark_read();
            }
        }
        debug!(
            "Thread for conversation {} replaced with {} message(s)",
            conversation,
            messages.len()
        );
        self.conversation = Some(conversation);
        self.messages = messages;
    }

    /// Append a message unless one with the same id is already present.
    /// Returns whether the thread changed.
    pub fn append_local(&mut self, message: Message) -> bool {
        if self.contains(message.id) {
            debug!("Message {} already in thread, skipping", message.id);
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn remove_local(&mut self, id: MessageId) -> Option<Message> {
        let pos = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(pos))
    }

    pub fn update_local(&mut self, id: MessageId, patch: &MessagePatch) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Mark every message not sent by `local_user` as read.
    pub fn mark_incoming_read(&mut self, local_user: UserId) -> usize {
        let mut marked = 0;
        for message in self
            .messages
            .iter_mut()
            .filter(|m| !m.is_read && !m.is_from(local_user))
        {
            message.mark_read();
            marked += 1;
        }
        marked
    }

    /// Timestamp of the newest message in the thread
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.iter().map(|m| m.created_at).max()
    }

    pub fn close(&mut self) {
        self.conversation = None;
        self.messages.clear();
    }

    /// Calendar-day grouping of the thread in the given time zone
    pub fn day_groups<Tz: TimeZone>(&self, tz: &Tz, today: NaiveDate) -> Vec<DayGroup> {
        group_by_day(&self.messages, tz, today)
    }
}

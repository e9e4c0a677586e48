//! Periodic synchronization with the remote store

use threadline_store::{Filter, Message, MessageId};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::MessagingClient;
use crate::events::MessagingEvent;

/// Result of a single poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The fresh "all" list equals the cached one
    Unchanged,
    /// Partitions were replaced; `new_message` is set when the open thread
    /// received a message
    Updated { new_message: Option<MessageId> },
    /// A request failed; the caches are untouched
    Failed,
}

/// Handle to a running poll loop. Dropping it stops the loop.
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for the current tick to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Poll task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl MessagingClient {
    /// Run one synchronization tick.
    ///
    /// Refetches "all" and "unread". When the open conversation's fresh
    /// last-message is newer than anything in the thread, that message is
    /// appended and the conversation promoted. Failures are logged and leave
    /// the caches as they were.
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> PollOutcome {
        let api = self.api();
        let fetched = futures::try_join!(
            api.list_conversations(Filter::All),
            api.list_conversations(Filter::Unread),
        );
        let (all, unread) = match fetched {
            Ok(lists) => lists,
            Err(e) => {
                warn!("Poll failed: {}", e);
                return PollOutcome::Failed;
            }
        };

        let outcome = self.update(|s| {
            if !s.conversations.merge_poll(all, unread) {
                return None;
            }

            let Some(open) = s.thread.conversation() else {
                return Some((None, None));
            };
            let fresh = s.conversations.partition(Filter::All);
            let Some(snapshot) = fresh.iter().find(|c| c.id == open).cloned() else {
                return Some((None, None));
            };
            let Some(last) = snapshot.last_message.as_ref() else {
                return Some((None, None));
            };

            let newer = s
                .thread
                .latest_timestamp()
                .map_or(true, |latest| last.created_at > latest);
            if !newer || !s.thread.append_local(Message::from_snapshot(open, last)) {
                return Some((None, None));
            }
            s.conversations.promote(open, Some(&snapshot));
            Some((Some(open), Some(last.id)))
        });

        match outcome {
            None => {
                debug!("Poll: no changes");
                PollOutcome::Unchanged
            }
            Some((conversation, new_message)) => {
                self.emit(MessagingEvent::ConversationsUpdated);
                if let (Some(conversation), Some(message)) = (conversation, new_message) {
                    info!("New message {} in conversation {}", message, conversation);
                    self.emit(MessagingEvent::NewMessage {
                        conversation,
                        message,
                    });
                    self.emit(MessagingEvent::ThreadUpdated { conversation });
                    self.emit(MessagingEvent::ScrollToLatest { conversation });
                }
                PollOutcome::Updated { new_message }
            }
        }
    }

    /// Start the synchronization loop. The first tick runs immediately.
    pub fn start_polling(&self) -> PollHandle {
        let token = CancellationToken::new();
        let client = self.clone();
        let cancelled = token.clone();
        let period = self.config().poll_interval;

        let task = tokio::spawn(async move {
            info!("Polling every {:?}", period);
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        client.poll_once().await;
                    }
                }
            }
            debug!("Polling stopped");
        });

        PollHandle {
            token,
            task: Some(task),
        }
    }
}

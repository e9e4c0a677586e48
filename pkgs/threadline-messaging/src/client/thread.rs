//! Opening, reloading and closing the message thread

use threadline_store::ConversationId;
use tracing::{debug, error, info, instrument, warn};

use super::MessagingClient;
use crate::error::MessagingError;
use crate::events::{MessagingEvent, Panel};

impl MessagingClient {
    /// Open a conversation: load its messages, mark them read remotely, then
    /// refresh the unread counters.
    ///
    /// Opening another conversation while this one is loading supersedes it;
    /// the late response is dropped and `Superseded` is returned.
    #[instrument(skip(self))]
    pub async fn open(&self, conversation: ConversationId) -> Result<(), MessagingError> {
        let generation = self.update(|s| {
            s.open_generation += 1;
            s.thread_error = None;
            s.loading_thread = true;
            s.composer.reset();
            s.open_generation
        });
        info!("Opening conversation {}", conversation);

        let fetched = self.api().list_messages(conversation).await;
        let local_user = self.config().local_user_id;

        let loaded = self.update(|s| {
            if s.open_generation != generation {
                return None;
            }
            s.loading_thread = false;
            Some(match fetched {
                Ok(messages) => {
                    s.thread.replace(conversation, messages);
                    s.thread.mark_incoming_read(local_user);
                    Ok(s.thread.len())
                }
                Err(e) => {
                    s.thread.replace(conversation, Vec::new());
                    s.thread_error = Some(e.to_string());
                    Err(e)
                }
            })
        });

        match loaded {
            None => {
                debug!("Discarding messages for superseded open of {}", conversation);
                return Err(MessagingError::Superseded);
            }
            Some(Ok(messages)) => {
                self.emit(MessagingEvent::ThreadLoaded {
                    conversation,
                    messages,
                });
            }
            Some(Err(e)) => {
                error!("Failed to load messages for {}: {}", conversation, e);
                self.emit(MessagingEvent::Error {
                    panel: Panel::Thread,
                    message: e.to_string(),
                    persistent: true,
                });
                return Err(e.into());
            }
        }

        if let Err(e) = self.api().mark_conversation_read(conversation).await {
            warn!("Failed to mark conversation {} as read: {}", conversation, e);
            self.emit(MessagingEvent::Error {
                panel: Panel::Thread,
                message: e.to_string(),
                persistent: false,
            });
        }

        tokio::time::sleep(self.config().read_refresh_delay).await;

        if !self.is_current_open(generation) {
            return Err(MessagingError::Superseded);
        }
        if let Err(e) = self.refresh_counters().await {
            debug!("Counter refresh after open failed: {}", e);
        }

        self.emit(MessagingEvent::ScrollToLatest { conversation });
        Ok(())
    }

    /// Close the open thread and drop anything still loading for it.
    pub fn close_thread(&self) {
        let closed = self.update(|s| {
            s.open_generation += 1;
            s.loading_thread = false;
            s.thread_error = None;
            s.composer.reset();
            let closed = s.thread.conversation();
            s.thread.close();
            closed
        });
        if let Some(id) = closed {
            debug!("Closed conversation {}", id);
        }
        self.emit(MessagingEvent::ThreadClosed);
    }

    /// Refetch the thread of `conversation` if it is still the open one.
    #[instrument(skip(self))]
    pub async fn reload_thread(&self, conversation: ConversationId) -> Result<(), MessagingError> {
        if self.open_conversation() != Some(conversation) {
            return Ok(());
        }
        let generation = self.with_state(|s| s.open_generation);
        let messages = self.api().list_messages(conversation).await?;

        let replaced = self.update(|s| {
            if s.open_generation != generation || !s.thread.is_open(conversation) {
                return false;
            }
            s.thread.replace(conversation, messages);
            true
        });
        if replaced {
            self.emit(MessagingEvent::ThreadUpdated { conversation });
        }
        Ok(())
    }

    fn is_current_open(&self, generation: u64) -> bool {
        self.with_state(|s| s.open_generation == generation)
    }
}

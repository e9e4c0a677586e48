//! Optimistic mutations: apply locally, call the API, then confirm or roll back

use threadline_store::{ConversationId, MessageId, MessagePatch};
use tracing::{debug, error, info};

use super::MessagingClient;
use crate::command::{
    Command, CommandFailure, CommandKind, CommandOutput, CommandResult, Rollback,
};
use crate::error::MessagingError;
use crate::events::{MessagingEvent, Panel};

impl MessagingClient {
    /// Run a command through the optimistic pipeline.
    pub async fn dispatch(&self, command: Command) -> CommandResult {
        self.apply_optimistic(&command);

        match command.execute(self.api()).await {
            Ok(output) => {
                self.confirm(&output).await;
                Ok(output)
            }
            Err(failure) => {
                self.roll_back(&failure).await;
                Err(failure)
            }
        }
    }

    /// Send text that did not come from the composer. The draft is left alone.
    pub async fn send(&self, conversation: ConversationId, content: &str) -> CommandResult {
        self.send_command(Command::Send {
            conversation,
            content: content.to_string(),
            from_draft: false,
        })
        .await
    }

    /// Send the composer draft to the open conversation.
    pub async fn send_draft(&self) -> CommandResult {
        let (conversation, draft) =
            self.with_state(|s| (s.thread.conversation(), s.composer.draft.clone()));
        let Some(conversation) = conversation else {
            return Err(Command::Send {
                conversation: 0,
                content: draft,
                from_draft: false,
            }
            .fail(MessagingError::NoConversationOpen.to_string()));
        };
        self.send_command(Command::Send {
            conversation,
            content: draft,
            from_draft: true,
        })
        .await
    }

    async fn send_command(&self, command: Command) -> CommandResult {
        if let Command::Send { content, .. } = &command {
            if content.trim().is_empty() {
                return Err(command.fail("Message is empty"));
            }
        }
        self.dispatch(command).await
    }

    pub async fn edit(&self, message: MessageId, content: &str) -> CommandResult {
        let command = Command::Edit {
            message,
            content: content.to_string(),
        };
        if content.trim().is_empty() {
            return Err(command.fail("Message is empty"));
        }
        self.dispatch(command).await
    }

    /// Delete a message of the open conversation.
    pub async fn delete_message(&self, message: MessageId) -> CommandResult {
        match self.open_conversation() {
            Some(conversation) => {
                self.dispatch(Command::DeleteMessage {
                    conversation,
                    message,
                })
                .await
            }
            None => Err(Command::DeleteMessage {
                conversation: 0,
                message,
            }
            .fail(MessagingError::NoConversationOpen.to_string())),
        }
    }

    /// Delete the message awaiting confirmation, if any.
    pub async fn confirm_delete(&self) -> Option<CommandResult> {
        let pending = self.with_state(|s| s.composer.pending_delete)?;
        Some(self.delete_message(pending).await)
    }

    pub async fn archive(&self, conversation: ConversationId) -> CommandResult {
        self.dispatch(Command::Archive(conversation)).await
    }

    pub async fn unarchive(&self, conversation: ConversationId) -> CommandResult {
        self.dispatch(Command::Unarchive(conversation)).await
    }

    /// Hide a conversation for the local user.
    pub async fn delete_conversation(&self, conversation: ConversationId) -> CommandResult {
        self.dispatch(Command::DeleteConversation(conversation)).await
    }

    fn apply_optimistic(&self, command: &Command) {
        match command {
            Command::Send {
                from_draft: true, ..
            } => self.update(|s| s.composer.draft.clear()),
            Command::DeleteMessage {
                conversation,
                message,
            } => {
                let removed = self.update(|s| {
                    s.composer.pending_delete = None;
                    if s.thread.is_open(*conversation) {
                        s.thread.remove_local(*message).is_some()
                    } else {
                        false
                    }
                });
                if removed {
                    self.emit(MessagingEvent::ThreadUpdated {
                        conversation: *conversation,
                    });
                }
            }
            _ => {}
        }
    }

    async fn confirm(&self, output: &CommandOutput) {
        match output {
            CommandOutput::Sent(message) => {
                let conversation = message.conversation;
                info!("Message {} sent to {}", message.id, conversation);
                self.update(|s| {
                    if s.thread.is_open(conversation) {
                        s.thread.append_local(message.clone());
                    }
                });

                let snapshot = match self.api().get_conversation(conversation).await {
                    Ok(c) => Some(c),
                    Err(e) => {
                        debug!("Snapshot of {} unavailable: {}", conversation, e);
                        None
                    }
                };
                self.update(|s| s.conversations.promote(conversation, snapshot.as_ref()));

                if let Err(e) = self.refresh_search().await {
                    debug!("Search refresh after send failed: {}", e);
                }
                self.emit(MessagingEvent::ThreadUpdated { conversation });
                self.emit(MessagingEvent::ConversationsUpdated);
                self.emit(MessagingEvent::ScrollToLatest { conversation });
            }
            CommandOutput::Edited(message) => {
                let patch = MessagePatch::edited(message.content.clone());
                let conversation = self.update(|s| {
                    s.composer.editing = None;
                    s.thread.update_local(message.id, &patch);
                    s.thread.conversation()
                });
                if let Some(conversation) = conversation {
                    self.emit(MessagingEvent::ThreadUpdated { conversation });
                }
                self.emit(MessagingEvent::EditFinished {
                    message: message.id,
                });
            }
            CommandOutput::MessageDeleted(_)
            | CommandOutput::Archived(_)
            | CommandOutput::Unarchived(_) => {
                if let Err(e) = self.refresh_counters().await {
                    debug!("Counter refresh after {:?} failed: {}", output, e);
                }
            }
            CommandOutput::ConversationDeleted(id) => {
                if self.open_conversation() == Some(*id) {
                    self.close_thread();
                }
                if let Err(e) = self.refresh_counters().await {
                    debug!("Counter refresh after hiding {} failed: {}", id, e);
                }
            }
        }
    }

    async fn roll_back(&self, failure: &CommandFailure) {
        error!("{}", failure);
        let panel = match failure.kind {
            CommandKind::Archive | CommandKind::Unarchive | CommandKind::DeleteConversation => {
                Panel::ConversationList
            }
            _ => Panel::Thread,
        };
        self.emit(MessagingEvent::Error {
            panel,
            message: failure.to_string(),
            persistent: false,
        });

        match &failure.rollback {
            Rollback::None => {}
            Rollback::RestoreDraft(content) => {
                self.update(|s| s.composer.draft = content.clone());
                self.emit(MessagingEvent::DraftRestored {
                    content: content.clone(),
                });
            }
            Rollback::ResyncThread(conversation) => {
                if let Err(e) = self.reload_thread(*conversation).await {
                    error!("Failed to resync conversation {}: {}", conversation, e);
                }
            }
        }
    }
}

//! User-initiated mutations as command objects
//!
//! A [`Command`] performs only the remote call. Its [`CommandResult`] tells the
//! caller what happened, and a failure carries the [`Rollback`] the client
//! applies to its local state.

use std::fmt;

use thiserror::Error;
use threadline_api::MessageApi;
use threadline_store::{ConversationId, Message, MessageId};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send {
        conversation: ConversationId,
        content: String,
        /// The text was taken from the composer and is put back on failure
        from_draft: bool,
    },
    Edit {
        message: MessageId,
        content: String,
    },
    DeleteMessage {
        conversation: ConversationId,
        message: MessageId,
    },
    Archive(ConversationId),
    Unarchive(ConversationId),
    DeleteConversation(ConversationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Send,
    Edit,
    DeleteMessage,
    Archive,
    Unarchive,
    DeleteConversation,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Send => "Send",
            CommandKind::Edit => "Edit",
            CommandKind::DeleteMessage => "Delete message",
            CommandKind::Archive => "Archive",
            CommandKind::Unarchive => "Unarchive",
            CommandKind::DeleteConversation => "Delete conversation",
        };
        f.write_str(name)
    }
}

/// Confirmed result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Sent(Message),
    Edited(Message),
    MessageDeleted(MessageId),
    Archived(ConversationId),
    Unarchived(ConversationId),
    ConversationDeleted(ConversationId),
}

/// How local state is restored after a failed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollback {
    /// Nothing was applied before confirmation
    None,
    /// Put the unsent text back into the input field
    RestoreDraft(String),
    /// Reload the whole thread from the remote store
    ResyncThread(ConversationId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failed: {reason}")]
pub struct CommandFailure {
    pub kind: CommandKind,
    pub reason: String,
    pub rollback: Rollback,
}

pub type CommandResult = Result<CommandOutput, CommandFailure>;

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Send { .. } => CommandKind::Send,
            Command::Edit { .. } => CommandKind::Edit,
            Command::DeleteMessage { .. } => CommandKind::DeleteMessage,
            Command::Archive(_) => CommandKind::Archive,
            Command::Unarchive(_) => CommandKind::Unarchive,
            Command::DeleteConversation(_) => CommandKind::DeleteConversation,
        }
    }

    pub fn rollback(&self) -> Rollback {
        match self {
            Command::Send {
                content,
                from_draft: true,
                ..
            } => Rollback::RestoreDraft(content.clone()),
            Command::DeleteMessage { conversation, .. } => Rollback::ResyncThread(*conversation),
            _ => Rollback::None,
        }
    }

    /// A failure of this command that never reached the remote store
    pub fn fail(&self, reason: impl Into<String>) -> CommandFailure {
        CommandFailure {
            kind: self.kind(),
            reason: reason.into(),
            rollback: self.rollback(),
        }
    }

    /// Perform the remote call.
    #[instrument(skip(api), fields(kind = %self.kind()))]
    pub async fn execute(&self, api: &dyn MessageApi) -> CommandResult {
        let outcome = match self {
            Command::Send {
                conversation,
                content,
                ..
            } => api
                .send_message(*conversation, content)
                .await
                .map(CommandOutput::Sent),
            Command::Edit { message, content } => api
                .edit_message(*message, content)
                .await
                .map(CommandOutput::Edited),
            Command::DeleteMessage { message, .. } => api
                .delete_message(*message)
                .await
                .map(|_| CommandOutput::MessageDeleted(*message)),
            Command::Archive(id) => api
                .archive_conversation(*id)
                .await
                .map(|_| CommandOutput::Archived(*id)),
            Command::Unarchive(id) => api
                .unarchive_conversation(*id)
                .await
                .map(|_| CommandOutput::Unarchived(*id)),
            Command::DeleteConversation(id) => api
                .hide_conversation(*id)
                .await
                .map(|_| CommandOutput::ConversationDeleted(*id)),
        };
        outcome.map_err(|e| self.fail(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_policy() {
        let send = Command::Send {
            conversation: 4,
            content: "Is it still available?".to_string(),
            from_draft: true,
        };
        assert_eq!(
            send.rollback(),
            Rollback::RestoreDraft("Is it still available?".to_string())
        );

        let direct = Command::Send {
            conversation: 4,
            content: "Is it still available?".to_string(),
            from_draft: false,
        };
        assert_eq!(direct.rollback(), Rollback::None);

        let delete = Command::DeleteMessage {
            conversation: 4,
            message: 12,
        };
        assert_eq!(delete.rollback(), Rollback::ResyncThread(4));

        assert_eq!(Command::Archive(4).rollback(), Rollback::None);
        assert_eq!(
            Command::Edit {
                message: 12,
                content: "x".to_string()
            }
            .rollback(),
            Rollback::None
        );
    }

    #[test]
    fn test_failure_message() {
        let failure = Command::DeleteConversation(4).fail("HTTP 403: Forbidden");
        assert_eq!(failure.kind, CommandKind::DeleteConversation);
        assert_eq!(
            failure.to_string(),
            "Delete conversation failed: HTTP 403: Forbidden"
        );
    }
}

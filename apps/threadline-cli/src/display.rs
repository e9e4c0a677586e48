//! Terminal rendering of conversations, threads and events

use threadline_messaging::{DisplayedConversations, MessagingClient, MessagingEvent, Panel};
use threadline_store::{Conversation, Message};

const PREVIEW_LEN: usize = 40;

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LEN {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_LEN).collect();
    format!("{}…", cut)
}

fn conversation_line(conversation: &Conversation, local_user: u64) -> String {
    let name = conversation
        .other_participant(local_user)
        .map(|p| p.name.as_str())
        .unwrap_or("unknown");
    let last = conversation
        .last_message
        .as_ref()
        .map(|m| preview(&m.content))
        .unwrap_or_default();
    let unread = if conversation.has_unread() {
        format!(" ({} unread)", conversation.unread_count)
    } else {
        String::new()
    };
    format!("  [{}] {}{}: {}", conversation.id, name, unread, last)
}

fn message_line(message: &Message, local_user: u64) -> String {
    let who = if message.is_from(local_user) {
        "you"
    } else {
        message.sender.name.as_str()
    };
    let edited = if message.is_edited { " (edited)" } else { "" };
    format!(
        "    {} #{} {}: {}{}",
        message.created_at.format("%H:%M"),
        message.id,
        who,
        message.content,
        edited
    )
}

pub fn print_conversations(client: &MessagingClient) {
    let local_user = client.config().local_user_id;
    match client.displayed() {
        DisplayedConversations::Partition(filter, list) => {
            println!(
                "Conversations ({}, {} unread messages):",
                filter,
                client.unread_total()
            );
            if list.is_empty() {
                println!("  (none)");
            }
            for conversation in &list {
                println!("{}", conversation_line(conversation, local_user));
            }
        }
        DisplayedConversations::Search(groups) => {
            println!("Search results:");
            if groups.is_empty() {
                println!("  (no matches)");
            }
            for group in &groups {
                println!("  conversation {}", group.conversation);
                for message in &group.messages {
                    println!("{}", message_line(message, local_user));
                }
            }
        }
    }
}

pub fn print_thread(client: &MessagingClient) {
    let Some(conversation) = client.open_conversation() else {
        println!("No conversation open");
        return;
    };
    let local_user = client.config().local_user_id;
    println!("Conversation {}:", conversation);
    for group in client.day_groups() {
        println!("  -- {} --", group.label);
        for message in &group.messages {
            println!("{}", message_line(message, local_user));
        }
    }
}

/// Print an event. Returns whether anything was written.
pub fn print_event(client: &MessagingClient, event: &MessagingEvent) -> bool {
    let local_user = client.config().local_user_id;
    match event {
        MessagingEvent::ThreadLoaded { .. } => print_thread(client),
        MessagingEvent::ThreadClosed => println!("\nConversation closed"),
        MessagingEvent::NewMessage {
            conversation,
            message,
        } => {
            let line = client
                .thread_messages()
                .iter()
                .find(|m| m.id == *message)
                .map(|m| message_line(m, local_user));
            match line {
                Some(line) => println!("\n[{}]{}", conversation, line),
                None => return false,
            }
        }
        MessagingEvent::SearchResultsUpdated { .. } => print_conversations(client),
        MessagingEvent::DraftRestored { content } => {
            println!("\nNot sent, your text was kept: {}", content)
        }
        MessagingEvent::EditFinished { message } => println!("\nMessage {} edited", message),
        MessagingEvent::Error {
            panel,
            message,
            persistent,
        } => {
            let place = match panel {
                Panel::ConversationList => "conversations",
                Panel::Search => "search",
                Panel::Thread => "conversation",
            };
            let kind = if *persistent { "error" } else { "warning" };
            eprintln!("\n[{} {}] {}", place, kind, message);
        }
        MessagingEvent::ConversationsUpdated
        | MessagingEvent::ThreadUpdated { .. }
        | MessagingEvent::ScrollToLatest { .. } => return false,
    }
    true
}

//! Slash commands typed at the prompt

use threadline_messaging::MessagingClient;
use threadline_store::Filter;

use crate::display;

fn parse_id(arg: Option<&&str>, usage: &str) -> Option<u64> {
    match arg.and_then(|s| s.parse().ok()) {
        Some(id) => Some(id),
        None => {
            println!("Usage: {}", usage);
            None
        }
    }
}

/// Send plain input to the open conversation.
pub async fn send_text(client: &MessagingClient, text: &str) {
    if client.open_conversation().is_none() {
        println!("No conversation open. Use /open <id> first.");
        return;
    }
    client.set_draft(text);
    if let Err(e) = client.send_draft().await {
        eprintln!("{}", e);
    }
}

/// Run one command. Returns `false` when the user asked to quit.
pub async fn handle(client: &MessagingClient, command: &str) -> bool {
    let parts: Vec<&str> = command.split_whitespace().collect();

    match parts.first() {
        Some(&"list") => {
            if let Some(name) = parts.get(1) {
                match name.parse::<Filter>() {
                    Ok(filter) => client.set_active_filter(filter),
                    Err(e) => {
                        println!("{}", e);
                        return true;
                    }
                }
            }
            display::print_conversations(client);
        }
        Some(&"refresh") => {
            if let Err(e) = client.load_all().await {
                eprintln!("Refresh failed: {}", e);
            }
        }
        Some(&"open") => {
            let Some(id) = parse_id(parts.get(1), "/open <conversation id>") else {
                return true;
            };
            if let Err(e) = client.open(id).await {
                eprintln!("Could not open conversation {}: {}", id, e);
            }
        }
        Some(&"close") => client.close_thread(),
        Some(&"show") => display::print_thread(client),
        Some(&"edit") => {
            let Some(id) = parse_id(parts.get(1), "/edit <message id> <text>") else {
                return true;
            };
            if parts.len() < 3 {
                println!("Usage: /edit <message id> <text>");
                return true;
            }
            if !client.begin_edit(id) {
                println!("Message {} is not in the open conversation", id);
                return true;
            }
            let content = parts[2..].join(" ");
            match client.edit(id, &content).await {
                Ok(_) => {}
                Err(e) => {
                    eprintln!("{}", e);
                    client.cancel_edit();
                }
            }
        }
        Some(&"delete") => {
            let Some(id) = parse_id(parts.get(1), "/delete <message id>") else {
                return true;
            };
            if !client.request_delete(id) {
                println!("Message {} is not in the open conversation", id);
                return true;
            }
            if let Some(Err(e)) = client.confirm_delete().await {
                eprintln!("{}", e);
            }
        }
        Some(&"archive") | Some(&"unarchive") | Some(&"hide") => {
            let action = parts[0];
            let Some(id) = parse_id(parts.get(1), &format!("/{} <conversation id>", action))
            else {
                return true;
            };
            let result = match action {
                "archive" => client.archive(id).await,
                "unarchive" => client.unarchive(id).await,
                _ => client.delete_conversation(id).await,
            };
            match result {
                Ok(_) => display::print_conversations(client),
                Err(e) => eprintln!("{}", e),
            }
        }
        Some(&"search") => {
            if parts.len() < 2 {
                println!("Usage: /search <text>");
                return true;
            }
            client.search(&parts[1..].join(" "));
        }
        Some(&"clear") => {
            client.search("");
        }
        Some(&"quit") | Some(&"exit") => return false,
        Some(&"help") => {
            println!("Available commands:");
            println!("  /list [all|unread|archived]  - Show conversations, optionally filtered");
            println!("  /refresh                     - Reload all conversation lists");
            println!("  /open <id>                   - Open a conversation");
            println!("  /show                        - Print the open conversation");
            println!("  /close                       - Close the open conversation");
            println!("  /edit <message id> <text>    - Edit one of your messages");
            println!("  /delete <message id>         - Delete one of your messages");
            println!("  /archive <id>                - Archive a conversation");
            println!("  /unarchive <id>              - Move a conversation back to the inbox");
            println!("  /hide <id>                   - Delete a conversation for yourself");
            println!("  /search <text>               - Search messages");
            println!("  /clear                       - Clear the search");
            println!("  /quit                        - Exit");
            println!("\nAny other text is sent to the open conversation.");
        }
        _ => {
            println!("Unknown command. Type /help for available commands.");
        }
    }
    true
}

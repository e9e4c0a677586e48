//! Threadline Messaging - conversation synchronization client
//!
//! Keeps a local view of the user's conversations and the open message thread
//! consistent with the remote message store.
//!
//! # Architecture
//!
//! - **MessagingClient**: owns the caches behind one lock and announces every
//!   change as a [`MessagingEvent`]
//! - **Sync loop**: refetches "all" and "unread" on a fixed interval and
//!   appends newly arrived messages to the open thread
//! - **Commands**: send, edit, delete, archive, unarchive and hide run
//!   optimistically; a failed [`Command`] carries its [`Rollback`]
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use threadline_api::{HttpMessageApi, StaticToken};
//! use threadline_messaging::{ClientConfig, MessagingClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::resolve(None)?;
//! let api = HttpMessageApi::new(
//!     &config.base_url,
//!     Arc::new(StaticToken::new("token")),
//!     config.request_timeout,
//! )?;
//! let (client, mut events) = MessagingClient::new(Arc::new(api), config);
//!
//! client.load_all().await?;
//! let poller = client.start_polling();
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! poller.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod state;

pub use client::{DisplayedConversations, MessagingClient, PollHandle, PollOutcome};
pub use command::{Command, CommandFailure, CommandKind, CommandOutput, CommandResult, Rollback};
pub use config::{ClientConfig, FileConfig};
pub use error::MessagingError;
pub use events::{MessagingEvent, Panel};
pub use state::{ClientState, Composer};

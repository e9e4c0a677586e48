//! Conversation list: partition loads, filter switching and search

use threadline_api::ApiError;
use threadline_store::{group_search_results, Filter, Partitions};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::MessagingClient;
use crate::error::MessagingError;
use crate::events::{MessagingEvent, Panel};

impl MessagingClient {
    /// Fetch the three partitions in parallel and replace the cached lists.
    ///
    /// All-or-nothing: if any partition fails nothing is replaced and the
    /// conversation list shows a persistent error.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), MessagingError> {
        info!("Loading conversations");
        self.reload_partitions().await
    }

    /// Refetch all partitions after an action whose effect on counts and
    /// membership is not computed locally.
    #[instrument(skip(self))]
    pub async fn refresh_counters(&self) -> Result<(), MessagingError> {
        debug!("Refreshing conversation counters");
        self.reload_partitions().await
    }

    pub(crate) async fn fetch_partitions(&self) -> Result<Partitions, ApiError> {
        let api = self.api();
        let (all, unread, archived) = futures::try_join!(
            api.list_conversations(Filter::All),
            api.list_conversations(Filter::Unread),
            api.list_conversations(Filter::Archived),
        )?;
        Ok(Partitions::new(all, unread, archived))
    }

    async fn reload_partitions(&self) -> Result<(), MessagingError> {
        self.update(|s| s.loading_conversations = true);
        let fetched = self.fetch_partitions().await;

        match fetched {
            Ok(partitions) => {
                self.update(|s| {
                    s.loading_conversations = false;
                    s.list_error = None;
                    s.conversations.replace_partitions(partitions);
                });
                self.emit(MessagingEvent::ConversationsUpdated);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                error!("Failed to load conversations: {}", message);
                self.update(|s| {
                    s.loading_conversations = false;
                    s.list_error = Some(message.clone());
                });
                self.emit(MessagingEvent::Error {
                    panel: Panel::ConversationList,
                    message,
                    persistent: true,
                });
                Err(e.into())
            }
        }
    }

    /// Show another cached partition. No request is made.
    pub fn set_active_filter(&self, filter: Filter) {
        self.update(|s| s.conversations.set_active_filter(filter));
        debug!("Active filter set to {}", filter);
        self.emit(MessagingEvent::ConversationsUpdated);
    }

    /// Update the search term.
    ///
    /// A non-empty term schedules a server-side search after the debounce
    /// delay; any keystroke in between supersedes it. An empty term drops the
    /// results and the list reverts to the active partition.
    pub fn search(&self, term: &str) -> Option<JoinHandle<()>> {
        let (term, generation) = self.update(|s| {
            s.conversations.set_search_term(term);
            s.search_error = None;
            s.search_generation += 1;
            (
                s.conversations.search_term().to_string(),
                s.search_generation,
            )
        });

        if term.is_empty() {
            self.emit(MessagingEvent::ConversationsUpdated);
            return None;
        }

        let client = self.clone();
        let debounce = self.config().search_debounce;
        Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !client.is_current_search(generation) {
                debug!("Search for '{}' superseded before it was sent", term);
                return;
            }
            if let Err(e) = client.run_search(term, generation).await {
                debug!("Search ended: {}", e);
            }
        }))
    }

    /// Re-run the active search immediately, if there is one.
    pub async fn refresh_search(&self) -> Result<(), MessagingError> {
        let pending = self.update(|s| {
            if !s.conversations.is_searching() {
                return None;
            }
            s.search_generation += 1;
            Some((
                s.conversations.search_term().to_string(),
                s.search_generation,
            ))
        });
        match pending {
            Some((term, generation)) => self.run_search(term, generation).await,
            None => Ok(()),
        }
    }

    fn is_current_search(&self, generation: u64) -> bool {
        self.with_state(|s| s.search_generation == generation)
    }

    #[instrument(skip(self))]
    async fn run_search(&self, term: String, generation: u64) -> Result<(), MessagingError> {
        let result = self.api().search_messages(&term).await;

        let applied = self.update(|s| {
            if s.search_generation != generation {
                return None;
            }
            Some(match result {
                Ok(messages) => {
                    let groups = group_search_results(messages);
                    let count = groups.len();
                    s.conversations.replace_search_results(groups);
                    Ok(count)
                }
                Err(e) => {
                    s.conversations.clear_search_results();
                    s.search_error = Some(e.to_string());
                    Err(e)
                }
            })
        });

        match applied {
            None => {
                debug!("Discarding results for superseded search '{}'", term);
                Err(MessagingError::Superseded)
            }
            Some(Ok(conversations)) => {
                debug!("Search '{}' matched {} conversation(s)", term, conversations);
                self.emit(MessagingEvent::SearchResultsUpdated {
                    term,
                    conversations,
                });
                Ok(())
            }
            Some(Err(e)) => {
                warn!("Search '{}' failed: {}", term, e);
                self.emit(MessagingEvent::Error {
                    panel: Panel::Search,
                    message: e.to_string(),
                    persistent: true,
                });
                Err(e.into())
            }
        }
    }
}

//! Conversation list cache - partitioned conversation lists and search results

use tracing::debug;

use crate::filter::Filter;
use crate::models::{Conversation, ConversationId, Message};

/// The three cached partitions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions {
    pub all: Vec<Conversation>,
    pub unread: Vec<Conversation>,
    pub archived: Vec<Conversation>,
}

impl Partitions {
    /// Build partitions from fetched lists, dropping entries that do not
    /// belong to the partition they were delivered in.
    pub fn new(
        all: Vec<Conversation>,
        unread: Vec<Conversation>,
        archived: Vec<Conversation>,
    ) -> Self {
        Self {
            all: retain_matching(Filter::All, all),
            unread: retain_matching(Filter::Unread, unread),
            archived: retain_matching(Filter::Archived, archived),
        }
    }

    pub fn get(&self, filter: Filter) -> &[Conversation] {
        match filter {
            Filter::All => &self.all,
            Filter::Unread => &self.unread,
            Filter::Archived => &self.archived,
        }
    }

    fn get_mut(&mut self, filter: Filter) -> &mut Vec<Conversation> {
        match filter {
            Filter::All => &mut self.all,
            Filter::Unread => &mut self.unread,
            Filter::Archived => &mut self.archived,
        }
    }
}

fn retain_matching(filter: Filter, mut list: Vec<Conversation>) -> Vec<Conversation> {
    let before = list.len();
    list.retain(|c| filter.matches(c));
    if list.len() != before {
        debug!(
            "Dropped {} conversation(s) outside the {} partition",
            before - list.len(),
            filter
        );
    }
    list
}

/// Search hits belonging to one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
    pub conversation: ConversationId,
    pub messages: Vec<Message>,
}

/// Group message search results by conversation, in first-seen order.
pub fn group_search_results(messages: Vec<Message>) -> Vec<SearchGroup> {
    let mut groups: Vec<SearchGroup> = Vec::new();
    for message in messages {
        match groups
            .iter_mut()
            .find(|g| g.conversation == message.conversation)
        {
            Some(group) => group.messages.push(message),
            None => groups.push(SearchGroup {
                conversation: message.conversation,
                messages: vec![message],
            }),
        }
    }
    groups
}

/// What the conversation panel currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayedList<'a> {
    Partition(Filter, &'a [Conversation]),
    Search(&'a [SearchGroup]),
}

/// Conversation list cache
///
/// Holds the "all", "unread" and "archived" partitions, the active filter
/// and an ephemeral list of search results. While a search term is set the
/// search results are displayed instead of the active partition.
#[derive(Debug, Clone, Default)]
pub struct ConversationCache {
    partitions: Partitions,
    active_filter: Filter,
    search_term: String,
    search_results: Vec<SearchGroup>,
}

impl ConversationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all three partitions wholesale
    pub fn replace_partitions(&mut self, partitions: Partitions) {
        debug!(
            all = partitions.all.len(),
            unread = partitions.unread.len(),
            archived = partitions.archived.len(),
            "Replacing conversation partitions"
        );
        self.partitions = partitions;
    }

    /// Merge a poll result for the "all" and "unread" partitions.
    ///
    /// Returns `false` without touching the cache when the fresh "all" list is
    /// deep-equal to the cached one. Conversations present in the fresh "all"
    /// are dropped from "archived".
    pub fn merge_poll(&mut self, all: Vec<Conversation>, unread: Vec<Conversation>) -> bool {
        let all = retain_matching(Filter::All, all);
        if all == self.partitions.all {
            return false;
        }
        let before = self.partitions.archived.len();
        self.partitions
            .archived
            .retain(|c| !all.iter().any(|fresh| fresh.id == c.id));
        if self.partitions.archived.len() != before {
            debug!(
                "Dropped {} unarchived conversation(s) from archived",
                before - self.partitions.archived.len()
            );
        }
        self.partitions.all = all;
        self.partitions.unread = retain_matching(Filter::Unread, unread);
        true
    }

    pub fn partitions(&self) -> &Partitions {
        &self.partitions
    }

    pub fn partition(&self, filter: Filter) -> &[Conversation] {
        self.partitions.get(filter)
    }

    pub fn active_filter(&self) -> Filter {
        self.active_filter
    }

    /// Re-point the active list to an already cached partition
    pub fn set_active_filter(&mut self, filter: Filter) {
        self.active_filter = filter;
    }

    /// The cached partition for the active filter
    pub fn active(&self) -> &[Conversation] {
        self.partitions.get(self.active_filter)
    }

    pub fn displayed(&self) -> DisplayedList<'_> {
        if self.is_searching() {
            DisplayedList::Search(&self.search_results)
        } else {
            DisplayedList::Partition(self.active_filter, self.active())
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_searching(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// Set the search term; an empty term also drops the previous results.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_string();
        if self.search_term.is_empty() {
            self.search_results.clear();
        }
    }

    pub fn search_results(&self) -> &[SearchGroup] {
        &self.search_results
    }

    pub fn replace_search_results(&mut self, results: Vec<SearchGroup>) {
        self.search_results = results;
    }

    pub fn clear_search_results(&mut self) {
        self.search_results.clear();
    }

    /// Move a conversation to the front of every partition it belongs to,
    /// optionally replacing its snapshot. Returns whether it was found.
    ///
    /// A partition the new snapshot no longer matches loses the entry instead.
    pub fn promote(&mut self, id: ConversationId, snapshot: Option<&Conversation>) -> bool {
        let mut found = false;
        for filter in Filter::ALL {
            let list = self.partitions.get_mut(filter);
            if let Some(pos) = list.iter().position(|c| c.id == id) {
                let existing = list.remove(pos);
                found = true;
                let entry = match snapshot {
                    Some(fresh) if !filter.matches(fresh) => {
                        debug!("Conversation {} left the {} partition", id, filter);
                        continue;
                    }
                    Some(fresh) => fresh.clone(),
                    None => existing,
                };
                list.insert(0, entry);
            }
        }
        if found {
            debug!("Promoted conversation {}", id);
        }
        found
    }

    /// Latest cached snapshot of a conversation
    pub fn find(&self, id: ConversationId) -> Option<&Conversation> {
        Filter::ALL
            .iter()
            .find_map(|f| self.partitions.get(*f).iter().find(|c| c.id == id))
    }

    pub fn contains(&self, filter: Filter, id: ConversationId) -> bool {
        self.partitions.get(filter).iter().any(|c| c.id == id)
    }

    /// Badge count: unread messages across non-archived conversations
    pub fn unread_total(&self) -> u32 {
        self.partitions.all.iter().map(|c| c.unread_count).sum()
    }
}

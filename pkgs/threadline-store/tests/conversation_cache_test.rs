//! Tests for ConversationCache: partitions, promotion, filters and search

use chrono::{TimeZone, Utc};
use threadline_store::{
    group_search_results, Conversation, ConversationCache, DisplayedList, Filter, LastMessage,
    Message, Participant, Partitions, Sender, UserType,
};

const ME: u64 = 1;

fn conversation(id: u64, unread: u32, archived: bool) -> Conversation {
    Conversation {
        id,
        participants: vec![
            Participant {
                id: ME,
                name: "Ines".to_string(),
                user_type: UserType::Professional,
            },
            Participant {
                id: 100 + id,
                name: format!("Client {}", id),
                user_type: UserType::Client,
            },
        ],
        is_archived: archived,
        is_hidden: false,
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        last_message: Some(LastMessage {
            id: id * 10,
            sender: Sender {
                id: 100 + id,
                name: format!("Client {}", id),
            },
            content: format!("hello from {}", id),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, id as u32 % 60, 0).unwrap(),
        }),
        unread_count: unread,
    }
}

fn message(id: u64, conversation: u64, content: &str) -> Message {
    Message {
        id,
        conversation,
        sender: Sender {
            id: ME,
            name: "Ines".to_string(),
        },
        content: content.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        is_read: true,
        is_edited: false,
    }
}

fn seeded_cache() -> ConversationCache {
    let c1 = conversation(1, 0, false);
    let c2 = conversation(2, 3, false);
    let c3 = conversation(3, 1, false);
    let c4 = conversation(4, 0, true);

    let mut cache = ConversationCache::new();
    cache.replace_partitions(Partitions::new(
        vec![c1, c2.clone(), c3.clone()],
        vec![c2, c3],
        vec![c4],
    ));
    cache
}

fn ids(list: &[Conversation]) -> Vec<u64> {
    list.iter().map(|c| c.id).collect()
}

#[test]
fn test_partitions_drop_misplaced_entries() {
    let archived = conversation(7, 2, true);
    let mut hidden = conversation(8, 0, false);
    hidden.is_hidden = true;

    let partitions = Partitions::new(
        vec![conversation(1, 0, false), archived.clone(), hidden.clone()],
        vec![conversation(1, 0, false), archived.clone()],
        vec![archived, hidden],
    );

    assert_eq!(ids(&partitions.all), vec![1]);
    assert!(partitions.unread.is_empty());
    assert_eq!(ids(&partitions.archived), vec![7]);
}

#[test]
fn test_archived_partition_is_disjoint() {
    let cache = seeded_cache();
    for c in cache.partition(Filter::Archived) {
        assert!(!cache.contains(Filter::All, c.id));
        assert!(!cache.contains(Filter::Unread, c.id));
    }
}

#[test]
fn test_set_active_filter_repoints_without_refetch() {
    let mut cache = seeded_cache();
    assert_eq!(cache.active_filter(), Filter::All);
    assert_eq!(ids(cache.active()), vec![1, 2, 3]);

    cache.set_active_filter(Filter::Unread);
    assert_eq!(ids(cache.active()), vec![2, 3]);

    cache.set_active_filter(Filter::Archived);
    assert_eq!(ids(cache.active()), vec![4]);
}

#[test]
fn test_promote_moves_to_front_of_member_partitions() {
    let mut cache = seeded_cache();
    let before: Vec<usize> = Filter::ALL
        .iter()
        .map(|f| cache.partition(*f).len())
        .collect();

    assert!(cache.promote(3, None));

    assert_eq!(ids(cache.partition(Filter::All)), vec![3, 1, 2]);
    assert_eq!(ids(cache.partition(Filter::Unread)), vec![3, 2]);
    assert_eq!(ids(cache.partition(Filter::Archived)), vec![4]);

    let after: Vec<usize> = Filter::ALL
        .iter()
        .map(|f| cache.partition(*f).len())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_promote_replaces_snapshot() {
    let mut cache = seeded_cache();
    let mut fresh = conversation(2, 4, false);
    fresh.last_message.as_mut().unwrap().content = "new fitting date".to_string();

    cache.promote(2, Some(&fresh));

    assert_eq!(cache.partition(Filter::All)[0], fresh);
    assert_eq!(cache.partition(Filter::Unread)[0], fresh);
    assert_eq!(cache.find(2).unwrap().unread_count, 4);
}

#[test]
fn test_promote_unknown_conversation_is_noop() {
    let mut cache = seeded_cache();
    assert!(!cache.promote(99, None));
    assert_eq!(ids(cache.partition(Filter::All)), vec![1, 2, 3]);
}

#[test]
fn test_merge_poll_skips_identical_lists() {
    let mut cache = seeded_cache();
    let all = cache.partition(Filter::All).to_vec();
    let unread = cache.partition(Filter::Unread).to_vec();

    assert!(!cache.merge_poll(all, Vec::new()));
    // Unread is left alone when "all" did not change
    assert_eq!(ids(cache.partition(Filter::Unread)), vec![2, 3]);

    let mut changed = cache.partition(Filter::All).to_vec();
    changed.insert(0, conversation(5, 1, false));
    let mut fresh_unread = unread;
    fresh_unread.insert(0, conversation(5, 1, false));

    assert!(cache.merge_poll(changed, fresh_unread));
    assert_eq!(ids(cache.partition(Filter::All)), vec![5, 1, 2, 3]);
    assert_eq!(ids(cache.partition(Filter::Unread)), vec![5, 2, 3]);
    assert_eq!(ids(cache.partition(Filter::Archived)), vec![4]);
}

#[test]
fn test_merge_poll_drops_unarchived_from_archived() {
    let mut cache = seeded_cache();
    let mut all = cache.partition(Filter::All).to_vec();
    all.insert(0, conversation(4, 0, false));
    let unread = cache.partition(Filter::Unread).to_vec();

    assert!(cache.merge_poll(all, unread));

    assert_eq!(ids(cache.partition(Filter::All)), vec![4, 1, 2, 3]);
    assert!(cache.partition(Filter::Archived).is_empty());
}

#[test]
fn test_promote_drops_partitions_snapshot_no_longer_matches() {
    let mut cache = seeded_cache();

    // Conversation 3 was archived remotely and its unread messages were read
    let fresh = conversation(3, 0, true);
    assert!(cache.promote(3, Some(&fresh)));

    assert!(!cache.contains(Filter::All, 3));
    assert!(!cache.contains(Filter::Unread, 3));
    // promotion never adds membership
    assert!(!cache.contains(Filter::Archived, 3));

    let unarchived = conversation(4, 0, false);
    assert!(cache.promote(4, Some(&unarchived)));
    assert!(!cache.contains(Filter::Archived, 4));
    assert!(!cache.contains(Filter::All, 4));
}

#[test]
fn test_search_clear_reverts_to_partition() {
    let mut cache = seeded_cache();
    cache.set_active_filter(Filter::Unread);
    let before = cache.active().to_vec();

    cache.set_search_term("fit");
    cache.replace_search_results(group_search_results(vec![
        message(1, 2, "fitting on friday"),
        message(2, 3, "refit the jacket"),
        message(3, 2, "fitting moved"),
    ]));

    match cache.displayed() {
        DisplayedList::Search(groups) => {
            assert_eq!(groups.len(), 2);
            assert_eq!(groups[0].conversation, 2);
            assert_eq!(groups[0].messages.len(), 2);
            assert_eq!(groups[1].conversation, 3);
        }
        other => panic!("expected search results, got {:?}", other),
    }

    cache.set_search_term("");
    assert!(cache.search_results().is_empty());
    match cache.displayed() {
        DisplayedList::Partition(filter, list) => {
            assert_eq!(filter, Filter::Unread);
            assert_eq!(list, before.as_slice());
        }
        other => panic!("expected partition, got {:?}", other),
    }
}

#[test]
fn test_unread_total_counts_non_archived() {
    let cache = seeded_cache();
    assert_eq!(cache.unread_total(), 4);
}

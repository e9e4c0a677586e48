//! Calendar-day grouping of a thread for display

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDate, TimeZone};

use crate::models::Message;

/// Heading shown above a day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Yesterday,
    Date(NaiveDate),
}

impl DayLabel {
    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        if date == today {
            DayLabel::Today
        } else if today.pred_opt() == Some(date) {
            DayLabel::Yesterday
        } else {
            DayLabel::Date(date)
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => f.write_str("Today"),
            DayLabel::Yesterday => f.write_str("Yesterday"),
            DayLabel::Date(date) => write!(f, "{}", date.format("%d/%m/%Y")),
        }
    }
}

/// Messages sent on one calendar day, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub label: DayLabel,
    pub messages: Vec<Message>,
}

/// Group messages by calendar day in `tz`.
///
/// Buckets are ordered oldest day first and each bucket is sorted oldest
/// message first. The input is not modified.
pub fn group_by_day<Tz: TimeZone>(
    messages: &[Message],
    tz: &Tz,
    today: NaiveDate,
) -> Vec<DayGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Message>> = BTreeMap::new();
    for message in messages {
        let date = message.created_at.with_timezone(tz).date_naive();
        buckets.entry(date).or_default().push(message.clone());
    }

    buckets
        .into_iter()
        .map(|(date, mut messages)| {
            messages.sort_by_key(|m| m.created_at);
            DayGroup {
                date,
                label: DayLabel::for_date(date, today),
                messages,
            }
        })
        .collect()
}

/// [`group_by_day`] in the machine's local time zone
pub fn group_by_local_day(messages: &[Message]) -> Vec<DayGroup> {
    group_by_day(messages, &Local, Local::now().date_naive())
}

use crate::dataset::Record;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Distinct ids among the records whose action is the comment label.
    pub comment_count: usize,
    /// Saturates at `u64::MAX`.
    pub total_votes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeekCount {
    pub year: i32,
    pub month_number: u32,
    pub week_of_month: u32,
    pub week_label: String,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub is_empty: bool,
    pub summary: Summary,
    pub topic_counts: Vec<TopicCount>,
    pub weekly_counts: Vec<WeekCount>,
    pub rows: Vec<Record>,
}

pub fn summarize(rows: &[&Record], comment_action: &str) -> Summary {
    let comment_ids: HashSet<&str> = rows
        .iter()
        .filter(|r| r.action == comment_action)
        .filter_map(|r| r.id.as_deref())
        .collect();
    Summary {
        comment_count: comment_ids.len(),
        total_votes: rows
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.vote_count)),
    }
}

fn id_count(row: &Record) -> usize {
    usize::from(row.id.is_some())
}

/// Records with an id per topic, most frequent first, ties alphabetical.
/// A topic whose rows all lack an id is listed with a zero count.
pub fn count_by_topic(rows: &[&Record]) -> Vec<TopicCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.topic.as_str()).or_default() += id_count(row);
    }
    let mut counts: Vec<TopicCount> = counts
        .into_iter()
        .map(|(topic, count)| TopicCount {
            topic: topic.to_owned(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
    counts
}

/// Records with an id per calendar week, chronological.
pub fn count_by_week(rows: &[&Record]) -> Vec<WeekCount> {
    let mut counts: BTreeMap<(i32, u32, u32), (&str, usize)> = BTreeMap::new();
    for row in rows {
        counts
            .entry(row.bucket.week_key())
            .or_insert((row.bucket.week_label.as_str(), 0))
            .1 += id_count(row);
    }
    counts
        .into_iter()
        .map(
            |((year, month_number, week_of_month), (week_label, count))| WeekCount {
                year,
                month_number,
                week_of_month,
                week_label: week_label.to_owned(),
                count,
            },
        )
        .collect()
}

impl Report {
    pub fn build(rows: &[&Record], comment_action: &str) -> Report {
        if rows.is_empty() {
            return Report {
                is_empty: true,
                ..Default::default()
            };
        }
        Report {
            is_empty: false,
            summary: summarize(rows, comment_action),
            topic_counts: count_by_topic(rows),
            weekly_counts: count_by_week(rows),
            rows: rows.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

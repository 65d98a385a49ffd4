use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dataset::Record;

/// One of the five selectable dimensions of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Dimension {
    Network,
    Topic,
    Year,
    Month,
    Week,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dimension::Network => "network",
            Dimension::Topic => "topic",
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::Week => "week",
        };
        write!(f, "{}", name)
    }
}

/// What the user asked for. A `None` dimension means "everything available",
/// an empty list means "nothing selected".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRequest {
    pub networks: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub years: Option<Vec<i32>>,
    pub months: Option<Vec<String>>,
    pub weeks: Option<Vec<String>>,
}

impl SelectionRequest {
    /// Replaces the requested values of `dimension`, `None` restores the default.
    pub fn set(&mut self, dimension: Dimension, values: Option<Vec<String>>) -> Result<()> {
        match dimension {
            Dimension::Network => self.networks = values,
            Dimension::Topic => self.topics = values,
            Dimension::Month => self.months = values,
            Dimension::Week => self.weeks = values,
            Dimension::Year => {
                self.years = match values {
                    None => None,
                    Some(values) => Some(
                        values
                            .iter()
                            .map(|v| {
                                v.trim()
                                    .parse::<i32>()
                                    .with_context(|| format!("Invalid year \"{}\"", v))
                            })
                            .collect::<Result<Vec<_>>>()?,
                    ),
                }
            }
        }
        Ok(())
    }
}

/// Candidate values of every dimension, in presentation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub networks: Vec<String>,
    pub topics: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub weeks: Vec<String>,
}

/// Effective selection after cascading, always a subset of the matching `FilterOptions`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub networks: Vec<String>,
    pub topics: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub weeks: Vec<String>,
}

impl Selection {
    pub fn has_empty_dimension(&self) -> bool {
        self.networks.is_empty()
            || self.topics.is_empty()
            || self.years.is_empty()
            || self.months.is_empty()
            || self.weeks.is_empty()
    }

    pub(super) fn matcher(&self) -> SelectionMatcher<'_> {
        SelectionMatcher {
            networks: self.networks.iter().map(String::as_str).collect(),
            topics: self.topics.iter().map(String::as_str).collect(),
            years: self.years.iter().copied().collect(),
            months: self.months.iter().map(String::as_str).collect(),
            weeks: self.weeks.iter().map(String::as_str).collect(),
        }
    }
}

/// Hash-indexed view of a `Selection` for per-record checks.
pub(super) struct SelectionMatcher<'a> {
    networks: HashSet<&'a str>,
    topics: HashSet<&'a str>,
    years: HashSet<i32>,
    months: HashSet<&'a str>,
    weeks: HashSet<&'a str>,
}

impl SelectionMatcher<'_> {
    /// All five dimensions must match, there is no partial match.
    pub(super) fn matches(&self, record: &Record) -> bool {
        self.networks.contains(record.network.as_str())
            && self.topics.contains(record.topic.as_str())
            && self.years.contains(&record.bucket.year)
            && self.months.contains(record.bucket.month_name)
            && self.weeks.contains(record.bucket.week_label.as_str())
    }
}

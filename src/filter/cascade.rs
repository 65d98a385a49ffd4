//! Cascading candidate computation and the final conjunctive filter.
//!
//! Network, topic and year candidates always come from the whole dataset.
//! Month candidates are narrowed by the selected years only, and week
//! candidates by the selected years and months. Network and topic never
//! narrow other candidates, they only take part in the final filter.

use super::{FilterOptions, Selection, SelectionRequest};
use crate::dataset::{Dataset, Record};
use std::collections::{BTreeMap, BTreeSet};

pub struct FilterEngine<'a> {
    dataset: &'a Dataset,
}

/// Keeps the candidates the request asked for, in candidate order.
fn narrow<T: Clone + PartialEq>(requested: Option<&Vec<T>>, candidates: &[T]) -> Vec<T> {
    match requested {
        None => candidates.to_vec(),
        Some(requested) => candidates
            .iter()
            .filter(|c| requested.contains(c))
            .cloned()
            .collect(),
    }
}

impl<'a> FilterEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        FilterEngine { dataset }
    }

    pub fn network_candidates(&self) -> Vec<String> {
        self.dataset
            .distinct_networks()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn topic_candidates(&self) -> Vec<String> {
        self.dataset
            .distinct_topics()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Most recent year first.
    pub fn year_candidates(&self) -> Vec<i32> {
        self.dataset.distinct_years().into_iter().rev().collect()
    }

    /// Months present in the selected years, chronological.
    pub fn month_candidates(&self, years: &[i32]) -> Vec<String> {
        let months: BTreeMap<u32, &'static str> = self
            .dataset
            .records()
            .iter()
            .filter(|r| years.contains(&r.bucket.year))
            .map(|r| (r.bucket.month_number, r.bucket.month_name))
            .collect();
        months.into_values().map(str::to_owned).collect()
    }

    /// Week labels present in the selected years and months, ordered by month then week.
    pub fn week_candidates(&self, years: &[i32], months: &[String]) -> Vec<String> {
        let weeks: BTreeSet<(u32, u32, &str)> = self
            .dataset
            .records()
            .iter()
            .filter(|r| {
                years.contains(&r.bucket.year)
                    && months.iter().any(|m| m == r.bucket.month_name)
            })
            .map(|r| {
                (
                    r.bucket.month_number,
                    r.bucket.week_of_month,
                    r.bucket.week_label.as_str(),
                )
            })
            .collect();
        weeks
            .into_iter()
            .map(|(_, _, label)| label.to_owned())
            .collect()
    }

    /// Recomputes every candidate list in dependency order and the effective selection.
    pub fn resolve(&self, request: &SelectionRequest) -> (FilterOptions, Selection) {
        let networks = self.network_candidates();
        let topics = self.topic_candidates();
        let years = self.year_candidates();

        let selected_networks = narrow(request.networks.as_ref(), &networks);
        let selected_topics = narrow(request.topics.as_ref(), &topics);
        let selected_years = narrow(request.years.as_ref(), &years);

        let months = self.month_candidates(&selected_years);
        let selected_months = narrow(request.months.as_ref(), &months);

        let weeks = self.week_candidates(&selected_years, &selected_months);
        let selected_weeks = narrow(request.weeks.as_ref(), &weeks);

        let options = FilterOptions {
            networks,
            topics,
            years,
            months,
            weeks,
        };
        let selection = Selection {
            networks: selected_networks,
            topics: selected_topics,
            years: selected_years,
            months: selected_months,
            weeks: selected_weeks,
        };
        (options, selection)
    }

    /// Everything selected, the state before any user interaction.
    pub fn default_state(&self) -> (FilterOptions, Selection) {
        self.resolve(&SelectionRequest::default())
    }

    /// Records matching the selection on all five dimensions, in source order.
    pub fn apply(&self, selection: &Selection) -> Vec<&'a Record> {
        if selection.has_empty_dimension() {
            return Vec::new();
        }
        let matcher = selection.matcher();
        self.dataset
            .records()
            .iter()
            .filter(|r| matcher.matches(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ColumnSchema, RawDate, RawRecord};

    fn raw(row: usize, date: &str, network: &str, topic: &str) -> RawRecord {
        RawRecord {
            row,
            date: RawDate::Text(date.to_owned()),
            id: Some(format!("r{}", row)),
            network: network.to_owned(),
            topic: topic.to_owned(),
            action: "Comment".to_owned(),
            link: String::new(),
            vote_count: 1,
        }
    }

    fn dataset(rows: &[(&str, &str, &str)]) -> Dataset {
        let raw_records = rows
            .iter()
            .enumerate()
            .map(|(i, (date, network, topic))| raw(i, date, network, topic))
            .collect();
        Dataset::from_raw_records(ColumnSchema::default(), raw_records)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn independent_candidates_are_sorted() {
        let ds = dataset(&[
            ("2023-05-01", "Twitter", "Odds"),
            ("2024-01-01", "Instagram", "Promo"),
            ("2022-03-01", "Facebook", "News"),
            ("2024-02-01", "Instagram", "News"),
        ]);
        let engine = FilterEngine::new(&ds);

        assert_eq!(
            engine.network_candidates(),
            strings(&["Facebook", "Instagram", "Twitter"])
        );
        assert_eq!(engine.topic_candidates(), strings(&["News", "Odds", "Promo"]));
        assert_eq!(engine.year_candidates(), vec![2024, 2023, 2022]);
    }

    #[test]
    fn months_are_narrowed_by_years_only() {
        let ds = dataset(&[
            ("2024-03-10", "A", "X"),
            ("2024-01-10", "B", "Y"),
            ("2023-02-10", "A", "X"),
        ]);
        let engine = FilterEngine::new(&ds);

        assert_eq!(engine.month_candidates(&[2024]), strings(&["Jan", "Mar"]));
        assert_eq!(
            engine.month_candidates(&[2024, 2023]),
            strings(&["Jan", "Feb", "Mar"])
        );
        assert!(engine.month_candidates(&[]).is_empty());

        // Narrowing networks must not change month candidates.
        let request = SelectionRequest {
            networks: Some(strings(&["B"])),
            years: Some(vec![2024]),
            ..Default::default()
        };
        let (options, _) = engine.resolve(&request);
        assert_eq!(options.months, strings(&["Jan", "Mar"]));
    }

    #[test]
    fn weeks_are_narrowed_by_year_and_month() {
        let ds = dataset(&[
            ("2024-01-03", "A", "X"),
            ("2024-01-20", "A", "X"),
            ("2023-01-10", "A", "X"),
            ("2023-01-30", "A", "X"),
            ("2024-02-02", "A", "X"),
        ]);
        let engine = FilterEngine::new(&ds);

        assert_eq!(
            engine.week_candidates(&[2024], &strings(&["Jan"])),
            strings(&["S1-Jan", "S3-Jan"])
        );
        assert_eq!(
            engine.week_candidates(&[2024, 2023], &strings(&["Jan", "Feb"])),
            strings(&["S1-Jan", "S2-Jan", "S3-Jan", "S5-Jan", "S1-Feb"])
        );
    }

    #[test]
    fn weeks_are_ordered_by_month_then_week() {
        let ds = dataset(&[
            ("2024-03-01", "A", "X"),
            ("2024-01-30", "A", "X"),
            ("2024-01-02", "A", "X"),
            ("2024-03-15", "A", "X"),
        ]);
        let engine = FilterEngine::new(&ds);
        let (options, selection) = engine.default_state();

        assert_eq!(options.months, strings(&["Jan", "Mar"]));
        assert_eq!(options.weeks, strings(&["S1-Jan", "S5-Jan", "S1-Mar", "S3-Mar"]));
        assert_eq!(selection.weeks, options.weeks);
    }

    #[test]
    fn default_state_selects_everything() {
        let ds = dataset(&[
            ("2024-01-05", "A", "Promo"),
            ("2023-06-12", "B", "News"),
        ]);
        let engine = FilterEngine::new(&ds);
        let (options, selection) = engine.default_state();

        assert_eq!(selection.networks, options.networks);
        assert_eq!(selection.topics, options.topics);
        assert_eq!(selection.years, options.years);
        assert_eq!(selection.months, options.months);
        assert_eq!(selection.weeks, options.weeks);
        assert_eq!(engine.apply(&selection).len(), 2);
    }

    #[test]
    fn stale_requested_values_are_discarded() {
        let ds = dataset(&[("2024-01-05", "A", "X"), ("2023-02-05", "A", "X")]);
        let engine = FilterEngine::new(&ds);
        let request = SelectionRequest {
            years: Some(vec![2024]),
            months: Some(strings(&["Jan", "Feb"])),
            weeks: Some(strings(&["S1-Jan", "S1-Feb", "S9-Nope"])),
            ..Default::default()
        };
        let (_, selection) = engine.resolve(&request);

        assert_eq!(selection.months, strings(&["Jan"]));
        assert_eq!(selection.weeks, strings(&["S1-Jan"]));
    }

    #[test]
    fn filter_is_conjunctive_on_all_dimensions() {
        let ds = dataset(&[("2024-01-05", "X", "Y"), ("2024-01-05", "Z", "Y")]);
        let engine = FilterEngine::new(&ds);
        let (_, full) = engine.default_state();
        let target = &ds.records()[0];

        let included = |selection: &Selection| {
            engine
                .apply(selection)
                .iter()
                .any(|r| std::ptr::eq(*r, target))
        };
        assert!(included(&full));

        let mut without_network = full.clone();
        without_network.networks.retain(|n| n != "X");
        assert!(!included(&without_network));

        let mut without_topic = full.clone();
        without_topic.topics.retain(|t| t != "Y");
        assert!(!included(&without_topic));

        let mut without_year = full.clone();
        without_year.years.retain(|y| *y != 2024);
        assert!(!included(&without_year));

        let mut without_month = full.clone();
        without_month.months.retain(|m| m != "Jan");
        assert!(!included(&without_month));

        let mut without_week = full.clone();
        without_week.weeks.retain(|w| w != "S1-Jan");
        assert!(!included(&without_week));
    }

    #[test]
    fn week_label_from_another_year_does_not_leak() {
        let ds = dataset(&[("2024-01-03", "A", "X"), ("2023-01-04", "A", "X")]);
        let engine = FilterEngine::new(&ds);
        let request = SelectionRequest {
            years: Some(vec![2024]),
            months: Some(strings(&["Jan"])),
            ..Default::default()
        };
        let (_, selection) = engine.resolve(&request);
        let rows = engine.apply(&selection);

        assert_eq!(selection.weeks, strings(&["S1-Jan"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket.year, 2024);
    }

    #[test]
    fn empty_selection_yields_nothing() {
        let ds = dataset(&[("2024-01-05", "A", "X")]);
        let engine = FilterEngine::new(&ds);
        let request = SelectionRequest {
            networks: Some(vec![]),
            ..Default::default()
        };
        let (options, selection) = engine.resolve(&request);

        assert_eq!(options.networks, strings(&["A"]));
        assert!(selection.networks.is_empty());
        assert!(engine.apply(&selection).is_empty());
    }

    #[test]
    fn empty_years_empty_the_cascade() {
        let ds = dataset(&[("2024-01-05", "A", "X")]);
        let engine = FilterEngine::new(&ds);
        let request = SelectionRequest {
            years: Some(vec![]),
            ..Default::default()
        };
        let (options, selection) = engine.resolve(&request);

        assert!(options.months.is_empty());
        assert!(options.weeks.is_empty());
        assert!(selection.weeks.is_empty());
        assert!(engine.apply(&selection).is_empty());
    }

    #[test]
    fn empty_dataset_has_no_candidates() {
        let ds = dataset(&[]);
        let engine = FilterEngine::new(&ds);
        let (options, selection) = engine.default_state();
        assert_eq!(options, FilterOptions::default());
        assert!(engine.apply(&selection).is_empty());
    }
}

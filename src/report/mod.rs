mod aggregate;

pub use aggregate::{count_by_topic, count_by_week, summarize, Report, Summary, TopicCount, WeekCount};

use crate::dataset::Dataset;
use crate::filter::{FilterEngine, FilterOptions, Selection, SelectionRequest};
use serde::Serialize;

/// Everything a rendering surface needs for one interaction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView {
    pub options: FilterOptions,
    pub selection: Selection,
    pub report: Report,
}

impl DashboardView {
    /// Runs one full pass: cascade the selectors, filter, aggregate.
    pub fn compute(dataset: &Dataset, request: &SelectionRequest) -> DashboardView {
        let engine = FilterEngine::new(dataset);
        let (options, selection) = engine.resolve(request);
        let rows = engine.apply(&selection);
        let report = Report::build(&rows, &dataset.schema().comment_action);
        DashboardView {
            options,
            selection,
            report,
        }
    }
}

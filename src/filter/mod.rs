mod cascade;
mod selection;

pub use cascade::FilterEngine;
pub use selection::{Dimension, FilterOptions, Selection, SelectionRequest};

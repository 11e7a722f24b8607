//! Annotations, the layer directory, and the paging and mutation algorithms.

mod mutator;
mod pager;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use mutator::AnnotationMutator;
pub use pager::{AnnotationPager, DEFAULT_PAGE_SIZE, PagedAnnotations};

/// Annotation layer directory: layer name to current record count.
pub type LayerCounts = BTreeMap<String, u64>;

/// A labelled time span on one layer of a dataset.
///
/// Offsets are microseconds from the dataset's time origin. `start <= end`
/// is expected but not checked here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(rename = "creator")]
    pub author: String,
    #[serde(rename = "type")]
    pub annotation_type: String,
    #[serde(default)]
    pub description: String,
    pub layer: String,
    pub start_time_offset_usec: i64,
    pub end_time_offset_usec: i64,
}

impl Annotation {
    pub fn new(
        author: impl Into<String>,
        annotation_type: impl Into<String>,
        description: impl Into<String>,
        layer: impl Into<String>,
        start_time_offset_usec: i64,
        end_time_offset_usec: i64,
    ) -> Self {
        Self {
            author: author.into(),
            annotation_type: annotation_type.into(),
            description: description.into(),
            layer: layer.into(),
            start_time_offset_usec,
            end_time_offset_usec,
        }
    }

    /// Span length in usec. Negative if the server handed back end < start.
    pub fn duration_usec(&self) -> i64 {
        self.end_time_offset_usec - self.start_time_offset_usec
    }
}

/// Renders as `(start, end)` in usec.
impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            self.start_time_offset_usec, self.end_time_offset_usec
        )
    }
}

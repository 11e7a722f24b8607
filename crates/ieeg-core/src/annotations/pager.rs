//! Fetching a whole annotation layer in bounded pages.

use tracing::{debug, instrument, warn};

use crate::dataset::Dataset;
use crate::error::{Error, NotFoundError};

use super::Annotation;

/// Records requested per call once a layer is at least this large.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Assembles one layer's full annotation set from repeated page fetches.
///
/// The expected count is read from the layer directory once, before the
/// first fetch. Layers smaller than the page size are fetched in one call
/// with no limit; larger layers are fetched `page_size` records at a time,
/// each call starting where the records received so far end. Records are
/// returned in the order the server delivered them.
///
/// Nothing isolates the loop from concurrent writers. If the layer changes
/// while paging, the result can be short or long; check
/// [`PagedAnnotations::is_complete`] and re-read the directory if that
/// matters.
#[derive(Debug)]
pub struct AnnotationPager<'d, 's> {
    dataset: &'d Dataset<'s>,
    layer: String,
    page_size: u64,
    max_calls: Option<usize>,
}

/// The outcome of a full-layer fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct PagedAnnotations {
    pub annotations: Vec<Annotation>,
    /// The layer's count in the directory when paging started.
    pub expected_count: u64,
    /// Number of page fetches issued.
    pub calls: usize,
    /// Records received by each call, in call order.
    pub page_sizes: Vec<usize>,
}

impl PagedAnnotations {
    /// True if exactly the expected number of records came back.
    pub fn is_complete(&self) -> bool {
        self.annotations.len() as u64 == self.expected_count
    }

    /// The annotations split back into the pages they arrived in.
    pub fn pages(&self) -> impl Iterator<Item = &[Annotation]> {
        let mut rest = self.annotations.as_slice();
        self.page_sizes.iter().map(move |&size| {
            let (page, tail) = rest.split_at(size.min(rest.len()));
            rest = tail;
            page
        })
    }
}

impl<'d, 's> AnnotationPager<'d, 's> {
    pub fn new(dataset: &'d Dataset<'s>, layer: impl Into<String>) -> Self {
        Self {
            dataset,
            layer: layer.into(),
            page_size: DEFAULT_PAGE_SIZE,
            max_calls: None,
        }
    }

    /// Records per call for large layers. Zero is treated as one.
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Stop after this many fetches even if the expected count is not reached.
    pub fn max_calls(mut self, max_calls: usize) -> Self {
        self.max_calls = Some(max_calls);
        self
    }

    /// Fetch the whole layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the layer is not in the directory, or
    /// the first error raised by any page fetch.
    #[instrument(skip(self), fields(snapshot = %self.dataset.snapshot_id(), layer = %self.layer))]
    pub fn fetch_all(&self) -> Result<PagedAnnotations, Error> {
        let directory = self.dataset.annotation_layers()?;
        let expected_count = *directory
            .get(&self.layer)
            .ok_or_else(|| NotFoundError::Layer {
                name: self.layer.clone(),
            })?;

        let max_results = if expected_count < self.page_size {
            None
        } else {
            Some(self.page_size)
        };

        let mut annotations: Vec<Annotation> = Vec::new();
        let mut calls = 0usize;
        let mut page_sizes = Vec::new();

        while (annotations.len() as u64) < expected_count {
            if let Some(limit) = self.max_calls
                && calls >= limit
            {
                warn!(
                    calls,
                    received = annotations.len(),
                    expected_count,
                    "call limit reached before layer was fully fetched"
                );
                break;
            }

            let first_result = annotations.len() as u64;
            let page = self
                .dataset
                .get_annotations(&self.layer, Some(first_result), max_results)?;
            calls += 1;
            page_sizes.push(page.len());

            let (Some(first), Some(last)) = (page.first(), page.last()) else {
                warn!(
                    calls,
                    first_result,
                    expected_count,
                    "empty page before reaching expected count; layer shrank while paging"
                );
                break;
            };

            debug!(
                call = calls,
                received = page.len(),
                from_usec = first.start_time_offset_usec,
                to_usec = last.end_time_offset_usec,
                "fetched annotation page"
            );
            annotations.extend(page);
        }

        if annotations.len() as u64 > expected_count {
            warn!(
                received = annotations.len(),
                expected_count, "received more annotations than the directory reported"
            );
        }

        Ok(PagedAnnotations {
            annotations,
            expected_count,
            calls,
            page_sizes,
        })
    }
}

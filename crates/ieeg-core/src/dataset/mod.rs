//! Parsed, queryable view of one dataset snapshot.

pub mod metadata;
pub mod samples;

use tracing::{debug, instrument};

use crate::annotations::{
    Annotation, AnnotationMutator, AnnotationPager, LayerCounts, PagedAnnotations,
};
use crate::api::ApiClient;
use crate::error::{Error, ValidationError};

pub use metadata::{Channel, Montage, MontagePair, TimeSeriesDetails};
pub use samples::RawSampleBlock;

/// One opened dataset.
///
/// The snapshot id and channel list are fixed at open time. The annotation
/// layer directory is queried fresh on every call and may reflect changes
/// made after the dataset was opened.
///
/// A `Dataset` borrows its [`Session`](crate::Session) and is not meant to be
/// shared between threads without external synchronization.
#[derive(Debug)]
pub struct Dataset<'s> {
    client: &'s ApiClient,
    name: String,
    snapshot_id: String,
    details: TimeSeriesDetails,
}

impl<'s> Dataset<'s> {
    pub(crate) fn new(
        client: &'s ApiClient,
        name: String,
        snapshot_id: String,
        details: TimeSeriesDetails,
    ) -> Self {
        Self {
            client,
            name,
            snapshot_id,
            details,
        }
    }

    /// The name the dataset was opened by.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    pub(crate) fn client(&self) -> &'s ApiClient {
        self.client
    }

    pub fn channels(&self) -> &[Channel] {
        &self.details.channels
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.details.channels.get(index)
    }

    /// Channel labels in channel index order.
    pub fn channel_labels(&self) -> Vec<&str> {
        self.details
            .channels
            .iter()
            .map(|c| c.label.as_str())
            .collect()
    }

    /// Indices of the given labels, in the order given.
    pub fn channel_indices<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, Error> {
        labels
            .iter()
            .map(|label| {
                self.time_series_details(label.as_ref())
                    .map(|channel| channel.index)
            })
            .collect()
    }

    /// Metadata of the channel with this label.
    pub fn time_series_details(&self, label: &str) -> Result<&Channel, Error> {
        self.details
            .channels
            .iter()
            .find(|c| c.label == label)
            .ok_or_else(|| {
                ValidationError::UnknownChannel {
                    label: label.to_string(),
                }
                .into()
            })
    }

    /// The layer directory as it was embedded in the details document at
    /// open time. Use [`annotation_layers`](Self::annotation_layers) for the
    /// current state.
    pub fn layer_directory_at_open(&self) -> &LayerCounts {
        &self.details.layers
    }

    /// The current layer directory, queried from the server.
    #[instrument(skip(self), fields(snapshot = %self.snapshot_id))]
    pub fn annotation_layers(&self) -> Result<LayerCounts, Error> {
        self.client.fetch_layer_counts(&self.snapshot_id)
    }

    pub fn get_current_montage(&self) -> Option<&Montage> {
        self.details.montage.as_ref()
    }

    /// Fetch a window of raw samples.
    ///
    /// Columns follow `channel_indices` in the order given. The server may
    /// still reject windows it considers too large; that surfaces as
    /// [`Error::Api`].
    ///
    /// # Errors
    ///
    /// Returns a validation error, without contacting the server, if the
    /// duration is zero, no channels are given, or an index is out of range.
    #[instrument(skip(self), fields(snapshot = %self.snapshot_id))]
    pub fn get_data(
        &self,
        start_usec: u64,
        duration_usec: u64,
        channel_indices: &[usize],
    ) -> Result<RawSampleBlock, Error> {
        if duration_usec == 0 {
            return Err(ValidationError::ZeroDuration.into());
        }
        if channel_indices.is_empty() {
            return Err(ValidationError::NoChannels.into());
        }
        let count = self.details.channels.len();
        if let Some(&index) = channel_indices.iter().find(|&&i| i >= count) {
            return Err(ValidationError::ChannelOutOfRange { index, count }.into());
        }

        let block =
            self.client
                .fetch_samples(&self.snapshot_id, start_usec, duration_usec, channel_indices)?;
        debug!(
            rows = block.rows(),
            columns = block.columns(),
            sample_rate = block.sample_rate(),
            "fetched samples"
        );
        Ok(block)
    }

    /// Fetch a single bounded page of a layer's annotations.
    ///
    /// `first_result` is a zero-based offset and `max_results` caps the page
    /// size; either may be left to the server's default. This does not loop;
    /// see [`all_annotations`](Self::all_annotations) for the whole layer.
    #[instrument(skip(self), fields(snapshot = %self.snapshot_id))]
    pub fn get_annotations(
        &self,
        layer_name: &str,
        first_result: Option<u64>,
        max_results: Option<u64>,
    ) -> Result<Vec<Annotation>, Error> {
        self.client
            .fetch_annotations(&self.snapshot_id, layer_name, first_result, max_results)
    }

    /// A pager over the whole of one layer.
    pub fn pager<'d>(&'d self, layer_name: &str) -> AnnotationPager<'d, 's> {
        AnnotationPager::new(self, layer_name)
    }

    /// Fetch every annotation of a layer with default paging.
    pub fn all_annotations(&self, layer_name: &str) -> Result<PagedAnnotations, Error> {
        self.pager(layer_name).fetch_all()
    }

    /// Add/move/delete operations against this dataset's layers.
    pub fn mutator<'d>(&'d self) -> AnnotationMutator<'d, 's> {
        AnnotationMutator::new(self)
    }
}

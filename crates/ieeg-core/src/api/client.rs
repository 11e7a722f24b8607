//! Domain-level REST calls over a [`Transport`].

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::annotations::{Annotation, LayerCounts};
use crate::config::ConnectionConfig;
use crate::credentials::Credentials;
use crate::dataset::metadata::{TimeSeriesDetails, parse_time_series_details};
use crate::dataset::samples::{RawSampleBlock, parse_sample_matrix};
use crate::error::{DecodeError, Error};

use super::endpoints::*;
use super::mapper::{Operation, map_response};
use super::transport::{ApiRequest, Method, Transport};

/// Issues the repository's REST calls for one logical connection.
///
/// Owns the connection configuration and credentials. Every call is
/// synchronous, is sent exactly once, and its outcome is classified by
/// [`map_response`].
pub struct ApiClient {
    config: ConnectionConfig,
    credentials: Credentials,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    /// Create a client. Fails if the configuration cannot form a URL.
    pub fn new(
        config: ConnectionConfig,
        credentials: Credentials,
        transport: impl Transport + 'static,
    ) -> Result<Self, Error> {
        config.base_url()?;
        Ok(Self {
            config,
            credentials,
            transport: Box::new(transport),
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Release the transport's connections.
    pub fn close(&self) {
        self.transport.close();
    }

    /// Resolve a dataset name to its snapshot id.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn resolve_dataset_id(&self, name: &str) -> Result<String, Error> {
        let operation = Operation::ResolveDatasetId {
            name: name.to_string(),
        };
        let request = self.request(Method::Get, &[GET_ID_BY_NAME, name], Vec::new(), None)?;
        self.execute(&operation, &request)
    }

    /// Fetch and parse the channel/layer/montage document of a snapshot.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn fetch_time_series_details(&self, snapshot_id: &str) -> Result<TimeSeriesDetails, Error> {
        let request = self.request(
            Method::Get,
            &[GET_TIME_SERIES_DETAILS, snapshot_id],
            Vec::new(),
            None,
        )?;
        let body = self.execute(&Operation::TimeSeriesDetails, &request)?;
        Ok(parse_time_series_details(&body)?)
    }

    /// Fetch the current layer directory.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn fetch_layer_counts(&self, snapshot_id: &str) -> Result<LayerCounts, Error> {
        let request = self.request(
            Method::Get,
            &[GET_COUNTS_BY_LAYER, snapshot_id],
            Vec::new(),
            None,
        )?;
        let response: CountsByLayerResponse = self.execute_json(&Operation::LayerCounts, &request)?;
        Ok(response.counts_by_layer)
    }

    /// Fetch a window of raw samples for the given channels.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn fetch_samples(
        &self,
        snapshot_id: &str,
        start_usec: u64,
        duration_usec: u64,
        channel_indices: &[usize],
    ) -> Result<RawSampleBlock, Error> {
        let channels = channel_indices
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let query = vec![
            (START.to_string(), start_usec.to_string()),
            (DURATION.to_string(), duration_usec.to_string()),
            (CHANNELS.to_string(), channels),
        ];
        let request = self.request(Method::Get, &[GET_SAMPLES, snapshot_id], query, None)?;
        let body = self.execute(&Operation::Samples, &request)?;

        let values = parse_sample_matrix(&body, channel_indices.len())?;
        trace!(values = values.len(), "parsed sample matrix");
        Ok(RawSampleBlock::new(
            start_usec,
            duration_usec,
            channel_indices.to_vec(),
            values,
        )?)
    }

    /// Fetch one bounded page of a layer's annotations.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn fetch_annotations(
        &self,
        snapshot_id: &str,
        layer_name: &str,
        first_result: Option<u64>,
        max_results: Option<u64>,
    ) -> Result<Vec<Annotation>, Error> {
        let mut query = Vec::new();
        if let Some(first) = first_result {
            query.push((FIRST_RESULT.to_string(), first.to_string()));
        }
        if let Some(max) = max_results {
            query.push((MAX_RESULTS.to_string(), max.to_string()));
        }
        let request = self.request(
            Method::Get,
            &[GET_ANNOTATIONS, snapshot_id, layer_name],
            query,
            None,
        )?;
        let operation = Operation::Annotations {
            layer: layer_name.to_string(),
        };
        let response: AnnotationsBody = self.execute_json(&operation, &request)?;
        Ok(response.annotations)
    }

    /// Submit a batch of annotations as one server operation.
    #[instrument(skip(self, batch), fields(host = %self.config, batch = batch.len()))]
    pub fn add_annotations(&self, snapshot_id: &str, batch: &[Annotation]) -> Result<u64, Error> {
        let body = serde_json::to_value(AnnotationsBody {
            annotations: batch.to_vec(),
        })
        .map_err(DecodeError::from)?;
        let request = self.request(
            Method::Post,
            &[ADD_ANNOTATIONS, snapshot_id],
            Vec::new(),
            Some(body),
        )?;
        let response: AddAnnotationsResponse =
            self.execute_json(&Operation::AddAnnotations, &request)?;
        Ok(response.added)
    }

    /// Relabel every annotation of `from` as `to`. Returns the number moved.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn move_annotation_layer(
        &self,
        snapshot_id: &str,
        from: &str,
        to: &str,
    ) -> Result<u64, Error> {
        let query = vec![
            (FROM_LAYER_NAME.to_string(), from.to_string()),
            (TO_LAYER_NAME.to_string(), to.to_string()),
        ];
        let request = self.request(Method::Post, &[MOVE_ANNOTATIONS, snapshot_id], query, None)?;
        let operation = Operation::MoveLayer {
            from: from.to_string(),
        };
        let response: MoveAnnotationsResponse = self.execute_json(&operation, &request)?;
        Ok(response.moved)
    }

    /// Remove a layer and all its annotations. Returns the number deleted.
    #[instrument(skip(self), fields(host = %self.config))]
    pub fn delete_annotation_layer(
        &self,
        snapshot_id: &str,
        layer_name: &str,
    ) -> Result<u64, Error> {
        let request = self.request(
            Method::Post,
            &[REMOVE_ANNOTATIONS_BY_LAYER, snapshot_id, layer_name],
            Vec::new(),
            None,
        )?;
        let operation = Operation::DeleteLayer {
            layer: layer_name.to_string(),
        };
        let response: RemoveAnnotationsResponse = self.execute_json(&operation, &request)?;
        Ok(response.deleted)
    }

    fn request(
        &self,
        method: Method,
        endpoint: &[&str],
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiRequest, Error> {
        let segments: Vec<String> = std::iter::once(TIMESERIES)
            .chain(endpoint.iter().copied())
            .map(String::from)
            .collect();

        let mut url = self.config.endpoint_url(&segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        Ok(ApiRequest {
            method,
            url,
            segments,
            query,
            body,
        })
    }

    fn execute(&self, operation: &Operation, request: &ApiRequest) -> Result<String, Error> {
        debug!(%operation, method = %request.method, url = %request.url, "API request");

        let outcome = self.transport.send(request, &self.credentials);
        if let Ok(response) = &outcome {
            trace!(status = response.status, bytes = response.body.len(), "API response");
        }

        map_response(operation, outcome)
    }

    fn execute_json<R: DeserializeOwned>(
        &self,
        operation: &Operation,
        request: &ApiRequest,
    ) -> Result<R, Error> {
        let body = self.execute(operation, request)?;
        serde_json::from_str(&body).map_err(|e| DecodeError::from(e).into())
    }
}

// Transport is opaque; Credentials already omits the password.
impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

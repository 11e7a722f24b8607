//! Endpoint definitions and request/response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::Annotation;

// ============================================================================
// Endpoint Names
// ============================================================================

/// Service group every endpoint lives under.
pub const TIMESERIES: &str = "timeseries";

/// timeseries/getIdByDataSnapshotName/{name}
pub const GET_ID_BY_NAME: &str = "getIdByDataSnapshotName";

/// timeseries/getDataSnapshotTimeSeriesDetails/{id}
pub const GET_TIME_SERIES_DETAILS: &str = "getDataSnapshotTimeSeriesDetails";

/// timeseries/getCountsByLayer/{id}
pub const GET_COUNTS_BY_LAYER: &str = "getCountsByLayer";

/// timeseries/getTsAnnotations/{id}/{layer}
pub const GET_ANNOTATIONS: &str = "getTsAnnotations";

/// timeseries/getTimeSeriesSetRaw/{id}
pub const GET_SAMPLES: &str = "getTimeSeriesSetRaw";

/// timeseries/addAnnotationsToDataSnapshot/{id}
pub const ADD_ANNOTATIONS: &str = "addAnnotationsToDataSnapshot";

/// timeseries/moveTsAnnotations/{id}
pub const MOVE_ANNOTATIONS: &str = "moveTsAnnotations";

/// timeseries/removeTsAnnotationsByLayer/{id}/{layer}
pub const REMOVE_ANNOTATIONS_BY_LAYER: &str = "removeTsAnnotationsByLayer";

// Query parameter names
pub const FIRST_RESULT: &str = "firstResult";
pub const MAX_RESULTS: &str = "maxResults";
pub const START: &str = "start";
pub const DURATION: &str = "duration";
pub const CHANNELS: &str = "channels";
pub const FROM_LAYER_NAME: &str = "fromLayerName";
pub const TO_LAYER_NAME: &str = "toLayerName";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from getCountsByLayer.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsByLayerResponse {
    #[serde(default)]
    pub counts_by_layer: BTreeMap<String, u64>,
}

/// Response from getTsAnnotations; also the body of addAnnotationsToDataSnapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotationsBody {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Response from addAnnotationsToDataSnapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddAnnotationsResponse {
    pub added: u64,
}

/// Response from moveTsAnnotations.
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveAnnotationsResponse {
    pub moved: u64,
}

/// Response from removeTsAnnotationsByLayer.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveAnnotationsResponse {
    pub deleted: u64,
}

//! In-memory repository used by the integration tests.
//!
//! `FakeRepository` implements `Transport` and answers the same endpoints as
//! the real service from state held in memory. It records every request so
//! tests can assert how many calls were made and with which cursors.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ieeg_core::{
    Annotation, ApiRequest, ApiResponse, ConnectionConfig, Credentials, Method, Session,
    Transport, TransportError,
};
use serde_json::json;

pub const USER: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const DATASET: &str = "Study 005";
pub const SNAPSHOT_ID: &str = "a1b2c3d4-0005";
pub const SAMPLE_RATE_HZ: u64 = 500;
/// Longest window the fake accepts, mirroring the transport limit of the real service.
pub const MAX_WINDOW_USEC: u64 = 600_000_000;

pub const CHANNELS: [&str; 4] = ["LEFT_01", "LEFT_02", "LEFT_03", "LEFT_04"];

/// A write another client makes while we are paging.
#[derive(Clone, Debug)]
pub enum ConcurrentWrite {
    /// Append this many annotations to the layer after the first page is served.
    Append { layer: String, count: usize },
    /// Remove this many annotations from the end of the layer after the first page.
    Truncate { layer: String, count: usize },
}

#[derive(Default)]
struct State {
    layers: BTreeMap<String, Vec<Annotation>>,
    concurrent_write: Option<ConcurrentWrite>,
    fail_next: Option<(String, ApiResponse)>,
}

#[derive(Default)]
pub struct FakeRepository {
    state: Mutex<State>,
    requests: Mutex<Vec<ApiRequest>>,
    closes: AtomicUsize,
    unreachable: AtomicBool,
}

impl FakeRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fill a layer with `count` one-second annotations, one per second.
    pub fn with_layer(self: &Arc<Self>, layer: &str, count: usize) -> Arc<Self> {
        let annotations = (0..count)
            .map(|i| {
                let start = i as i64 * 1_000_000;
                Annotation::new(
                    "seed",
                    "Event",
                    format!("event {}", i),
                    layer,
                    start,
                    start + 500_000,
                )
            })
            .collect();
        self.state
            .lock()
            .unwrap()
            .layers
            .insert(layer.to_string(), annotations);
        Arc::clone(self)
    }

    pub fn set_concurrent_write(&self, write: ConcurrentWrite) {
        self.state.lock().unwrap().concurrent_write = Some(write);
    }

    /// The next request to `endpoint` gets this response instead.
    pub fn fail_next(&self, endpoint: &str, status: u16, body: &str) {
        self.state.lock().unwrap().fail_next =
            Some((endpoint.to_string(), ApiResponse::new(status, body)));
    }

    /// Every request from now on fails without a response.
    pub fn go_offline(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.segments.get(1).map(String::as_str) == Some(endpoint))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn layer(&self, name: &str) -> Option<Vec<Annotation>> {
        self.state.lock().unwrap().layers.get(name).cloned()
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let mut state = self.state.lock().unwrap();

        if let Some((endpoint, _)) = &state.fail_next
            && segments.get(1) == Some(&endpoint.as_str())
        {
            let (_, response) = state.fail_next.take().unwrap();
            return response;
        }

        match (request.method, segments.as_slice()) {
            (Method::Get, ["timeseries", "getIdByDataSnapshotName", name]) => {
                if *name == DATASET {
                    ApiResponse::new(200, SNAPSHOT_ID)
                } else {
                    ApiResponse::new(404, format!("No data snapshot named {}", name))
                }
            }
            (Method::Get, ["timeseries", "getDataSnapshotTimeSeriesDetails", id]) => {
                if *id == SNAPSHOT_ID {
                    ApiResponse::new(200, details_xml(&state.layers))
                } else {
                    ApiResponse::new(404, "unknown snapshot")
                }
            }
            (Method::Get, ["timeseries", "getCountsByLayer", SNAPSHOT_ID]) => {
                let counts: BTreeMap<&String, usize> =
                    state.layers.iter().map(|(k, v)| (k, v.len())).collect();
                ApiResponse::new(200, json!({ "countsByLayer": counts }).to_string())
            }
            (Method::Get, ["timeseries", "getTsAnnotations", SNAPSHOT_ID, layer]) => {
                let first = param(request, "firstResult").unwrap_or(0) as usize;
                let max = param(request, "maxResults").map(|m| m as usize);
                let all = state.layers.get(*layer).cloned().unwrap_or_default();
                let page: Vec<Annotation> = all
                    .into_iter()
                    .skip(first)
                    .take(max.unwrap_or(usize::MAX))
                    .collect();

                if let Some(write) = state.concurrent_write.take() {
                    apply_write(&mut state.layers, write);
                }

                ApiResponse::new(200, json!({ "annotations": page }).to_string())
            }
            (Method::Get, ["timeseries", "getTimeSeriesSetRaw", SNAPSHOT_ID]) => samples(request),
            (Method::Post, ["timeseries", "addAnnotationsToDataSnapshot", SNAPSHOT_ID]) => {
                let body = request.body.clone().unwrap_or_default();
                let batch: Vec<Annotation> =
                    serde_json::from_value(body["annotations"].clone()).unwrap();
                let added = batch.len();
                for annotation in batch {
                    state
                        .layers
                        .entry(annotation.layer.clone())
                        .or_default()
                        .push(annotation);
                }
                ApiResponse::new(200, json!({ "added": added }).to_string())
            }
            (Method::Post, ["timeseries", "moveTsAnnotations", SNAPSHOT_ID]) => {
                let from = request.query_param("fromLayerName").unwrap_or_default();
                let to = request.query_param("toLayerName").unwrap_or_default();
                let moved = state.layers.remove(from).unwrap_or_default();
                let count = moved.len();
                let target = state.layers.entry(to.to_string()).or_default();
                target.extend(moved.into_iter().map(|mut a| {
                    a.layer = to.to_string();
                    a
                }));
                ApiResponse::new(200, json!({ "moved": count }).to_string())
            }
            (Method::Post, ["timeseries", "removeTsAnnotationsByLayer", SNAPSHOT_ID, layer]) => {
                match state.layers.remove(*layer) {
                    Some(removed) => {
                        ApiResponse::new(200, json!({ "deleted": removed.len() }).to_string())
                    }
                    None => ApiResponse::new(404, "no such layer"),
                }
            }
            _ => ApiResponse::new(400, format!("unsupported request {:?}", request.segments)),
        }
    }
}

impl Transport for FakeRepository {
    fn send(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(TransportError::Connection {
                message: "connection refused".to_string(),
            });
        }
        if credentials.username() != USER || credentials.password() != PASSWORD {
            return Ok(ApiResponse::new(401, "Authorization failed"));
        }

        Ok(self.handle(request))
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A session against `repo` with the right credentials.
pub fn session(repo: &Arc<FakeRepository>) -> Session {
    Session::with_transport(
        ConnectionConfig::default(),
        Credentials::new(USER, PASSWORD),
        Arc::clone(repo),
    )
    .unwrap()
}

/// Value of channel `channel` at row `row` in every sample window.
pub fn sample_value(channel: usize, row: usize) -> f64 {
    channel as f64 * 1000.0 + row as f64 + 0.25
}

fn param(request: &ApiRequest, name: &str) -> Option<u64> {
    request.query_param(name).map(|v| v.parse().unwrap())
}

fn apply_write(layers: &mut BTreeMap<String, Vec<Annotation>>, write: ConcurrentWrite) {
    match write {
        ConcurrentWrite::Append { layer, count } => {
            let existing = layers.entry(layer.clone()).or_default();
            let base = existing.len() as i64;
            for i in 0..count as i64 {
                let start = (base + i) * 1_000_000;
                existing.push(Annotation::new(
                    "other", "Event", "", &layer, start, start + 1,
                ));
            }
        }
        ConcurrentWrite::Truncate { layer, count } => {
            if let Some(existing) = layers.get_mut(&layer) {
                let keep = existing.len().saturating_sub(count);
                existing.truncate(keep);
            }
        }
    }
}

fn samples(request: &ApiRequest) -> ApiResponse {
    let duration = param(request, "duration").unwrap_or(0);
    if duration > MAX_WINDOW_USEC {
        return ApiResponse::new(500, "Requested duration exceeds the maximum window");
    }
    let channels: Vec<usize> = request
        .query_param("channels")
        .unwrap_or_default()
        .split(',')
        .map(|c| c.parse().unwrap())
        .collect();

    let rows = (duration * SAMPLE_RATE_HZ / 1_000_000) as usize;
    let body = (0..rows)
        .map(|row| {
            channels
                .iter()
                .map(|&c| sample_value(c, row).to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");
    ApiResponse::new(200, body)
}

fn details_xml(layers: &BTreeMap<String, Vec<Annotation>>) -> String {
    let details: String = CHANNELS
        .iter()
        .map(|label| {
            format!(
                "<detail><channelLabel>{}</channelLabel><sampleRate>{}.0</sampleRate>\
                 <unit>uV</unit><numberOfSamples>1800000</numberOfSamples></detail>",
                label, SAMPLE_RATE_HZ
            )
        })
        .collect();
    let layer_entries: String = layers
        .iter()
        .map(|(name, items)| format!("<layer name=\"{}\" count=\"{}\"/>", name, items.len()))
        .collect();

    format!(
        "<dataSnapshot><details>{}</details>\
         <annotationLayers>{}</annotationLayers>\
         <montage name=\"Referential\"><pair channel=\"LEFT_01\" ref=\"LEFT_02\"/>\
         <pair channel=\"LEFT_03\" ref=\"LEFT_04\"/></montage></dataSnapshot>",
        details, layer_entries
    )
}

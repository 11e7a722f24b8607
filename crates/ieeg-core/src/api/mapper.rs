//! Classification of raw responses into payloads or typed errors.
//!
//! Every call made by [`ApiClient`](super::ApiClient) passes through
//! [`map_response`], so all components share one error taxonomy:
//!
//! | outcome                         | result                      |
//! |---------------------------------|-----------------------------|
//! | no response                     | [`Error::Connection`]       |
//! | 2xx                             | body                        |
//! | 401, 403                        | [`Error::Authentication`]   |
//! | 404                             | [`Error::NotFound`]         |
//! | 2xx empty/invalid id on resolve | [`Error::NotFound`]         |
//! | anything else                   | [`Error::Api`] (body kept)  |

use std::fmt;

use crate::error::{ApiError, Error, NotFoundError, TransportError};

use super::transport::ApiResponse;

/// The domain operation a response belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    ResolveDatasetId { name: String },
    TimeSeriesDetails,
    LayerCounts,
    Samples,
    Annotations { layer: String },
    AddAnnotations,
    MoveLayer { from: String },
    DeleteLayer { layer: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ResolveDatasetId { name } => write!(f, "resolve dataset '{}'", name),
            Operation::TimeSeriesDetails => f.write_str("fetch time-series details"),
            Operation::LayerCounts => f.write_str("fetch annotation layer counts"),
            Operation::Samples => f.write_str("fetch samples"),
            Operation::Annotations { layer } => write!(f, "fetch annotations of '{}'", layer),
            Operation::AddAnnotations => f.write_str("add annotations"),
            Operation::MoveLayer { from } => write!(f, "move annotation layer '{}'", from),
            Operation::DeleteLayer { layer } => write!(f, "delete annotation layer '{}'", layer),
        }
    }
}

/// Turn a transport outcome into the success body or exactly one error.
pub fn map_response(
    operation: &Operation,
    outcome: Result<ApiResponse, TransportError>,
) -> Result<String, Error> {
    let ApiResponse { status, body } = outcome?;

    match status {
        200..=299 => match operation {
            Operation::ResolveDatasetId { name } => resolved_id(name, body),
            _ => Ok(body),
        },
        401 | 403 => Err(Error::Authentication {
            status,
            message: body,
        }),
        404 => Err(not_found(operation, body).into()),
        _ => Err(ApiError::new(status, body).into()),
    }
}

fn not_found(operation: &Operation, body: String) -> NotFoundError {
    match operation {
        Operation::ResolveDatasetId { name } => NotFoundError::Dataset { name: name.clone() },
        Operation::Annotations { layer }
        | Operation::DeleteLayer { layer }
        | Operation::MoveLayer { from: layer } => NotFoundError::Layer {
            name: layer.clone(),
        },
        other => NotFoundError::Resource {
            operation: other.to_string(),
            message: body,
        },
    }
}

/// A snapshot id is opaque, but a body that is empty or contains anything
/// beyond ASCII alphanumerics, '-', '_' and '.' is not one.
fn resolved_id(name: &str, body: String) -> Result<String, Error> {
    let id = body.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(id.to_string())
    } else {
        Err(NotFoundError::Dataset {
            name: name.to_string(),
        }
        .into())
    }
}

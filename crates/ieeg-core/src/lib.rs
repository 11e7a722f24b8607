//! ieeg-core - client core for the IEEG time-series repository.
//!
//! All access flows through a [`Session`]: open a [`Dataset`] by name, read
//! its channel metadata and montage, pull windows of raw samples, and read
//! or rewrite its annotation layers.
//!
//! The HTTP stack is not part of this crate. A session sends its requests
//! through any [`Transport`]; the `ieeg-http` crate provides the network one.
//!
//! # Example
//!
//! ```no_run
//! use ieeg_core::{ConnectionConfig, Credentials, Session, Transport};
//!
//! # fn example(transport: impl Transport + 'static) -> Result<(), ieeg_core::Error> {
//! let session = Session::with_transport(
//!     ConnectionConfig::default(),
//!     Credentials::new("alice", "secret"),
//!     transport,
//! )?;
//!
//! let dataset = session.open("Study 005")?;
//! for (layer, count) in dataset.annotation_layers()? {
//!     let paged = dataset.all_annotations(&layer)?;
//!     println!("{layer}: {count} expected, {} fetched", paged.annotations.len());
//! }
//!
//! let block = dataset.get_data(0, 1_000_000, &[0, 1])?;
//! println!("{} samples at {} Hz", block.rows(), block.sample_rate());
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod api;
pub mod compat;
pub mod config;
pub mod credentials;
pub mod dataset;
pub mod error;
pub mod session;

// Re-export primary types at crate root for convenience
pub use annotations::{
    Annotation, AnnotationMutator, AnnotationPager, LayerCounts, PagedAnnotations,
};
pub use api::{ApiClient, ApiRequest, ApiResponse, Method, Transport};
pub use config::{ConnectionConfig, Scheme};
pub use credentials::Credentials;
pub use dataset::{Channel, Dataset, Montage, MontagePair, RawSampleBlock};
pub use error::{ApiError, DecodeError, Error, NotFoundError, TransportError, ValidationError};
pub use session::Session;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

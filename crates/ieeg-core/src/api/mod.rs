//! REST client for the repository.
//!
//! [`ApiClient`] builds requests, hands them to a [`Transport`], and passes
//! every outcome through [`map_response`].

mod client;
pub mod endpoints;
mod mapper;
mod transport;

pub use client::ApiClient;
pub use mapper::{Operation, map_response};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};

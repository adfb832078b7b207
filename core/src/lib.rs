//! Synchronous core for posting a JSON payload with a bearer token.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies a
//! `Transport` that performs the single TLS round-trip.
//!
//! # Design
//! - `PostClient` is stateless; it holds only `base_url`.
//! - Sending is split into `build_post` and `interpret`, so the I/O boundary
//!   is explicit and `post` only wires them to a `Transport`.
//! - Transport failures are a typed `TransportError`, never a pair of empty
//!   values.
//! - `StatusPolicy` decides whether a non-200 status is a failure.

pub mod client;
pub mod error;
pub mod http;
pub mod payload;
pub mod types;

pub use client::{post, PostClient};
pub use error::{PostError, TransportError};
pub use http::{HttpRequest, HttpResponse, Scheme, Transport};
pub use payload::parse_payload;
pub use types::{PostRequest, Reply, StatusPolicy};

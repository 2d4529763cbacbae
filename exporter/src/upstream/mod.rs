//! Clients for the node status endpoint.
//!
//! This module provides concrete implementations of the
//! [`crate::poller::StatusSource`] trait. The stock client talks to a
//! nodeos-style chain API over HTTP and translates responses into
//! [`crate::types::StatusRecord`] values.

pub mod http;

pub use http::HttpStatusClient;

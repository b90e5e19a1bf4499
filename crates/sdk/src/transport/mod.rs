//! Transport layer for the Haven SDK.

pub mod http;

pub use http::HttpTransport;

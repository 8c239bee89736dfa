//! Vector search service gateway

pub mod http_gateway;

pub use http_gateway::HttpVectorSearch;

//! Language model gateways

pub mod xai;

pub use xai::XaiGenerator;

// =============================================================================
// API Module — HTTP transport for the market bias service
// =============================================================================

pub mod rest;

pub use rest::{direction_icon, router};

//! Fixed-window request counting per identifier

mod service;

pub use service::RateLimiter;

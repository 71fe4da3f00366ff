//! Opaque server-side sessions with sliding expiry

mod service;

pub use service::SessionService;

//! Periodic background sweep over every expiring store

mod service;

pub use service::{Janitor, JanitorHandle, JanitorReport};

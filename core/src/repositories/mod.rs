//! Interfaces to collaborators the auth core consumes but does not own.

pub mod user;

pub use user::{InMemoryUserRepository, UserRepository};

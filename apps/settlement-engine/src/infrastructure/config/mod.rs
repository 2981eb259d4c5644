//! Dependency injection.

mod container;

pub use container::{Container, InMemoryContainer};

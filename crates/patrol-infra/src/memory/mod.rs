//! In-memory repositories - used when no database is configured and in tests.

mod store;

#[cfg(test)]
mod tests;

pub use store::InMemoryStore;

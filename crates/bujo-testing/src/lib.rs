//! Testing infrastructure for bujo integration tests.
//!
//! - `JournalWorld`: fluent tempdir builder for journal trees

pub mod world;

pub use world::JournalWorld;

// Issue records — loading, normalization, and version-scoped queries.

pub mod loader;
pub mod models;
pub mod repository;

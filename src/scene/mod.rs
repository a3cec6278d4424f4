//! Persisted documents and the live scene built from them.

/// Serialized theme documents.
pub mod document;
/// Live node arena and load bookkeeping.
pub mod graph;
/// Document validation and scene construction.
pub mod load;
/// Upgrades for documents saved under older conventions.
pub mod migrate;
/// Visual primitives.
pub mod node;

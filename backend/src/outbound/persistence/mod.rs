//! Persistence adapters for the repository ports.
//!
//! The production document database is an external collaborator; this module
//! ships the in-memory reference adapters the server wires by default and
//! the endpoint tests run against.

mod memory;

pub use memory::{
    MemoryCollectionRepository, MemoryFavouriteRepository, MemoryResourceRepository,
    MemoryVocabularyRepository,
};

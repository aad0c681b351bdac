// Resource traits (CRUD + search pipeline) and the booking lifecycle

pub mod booking;
pub mod traits;

// Re-export commonly used items
pub use traits::{CreatableResource, MergeIntoActiveModel, Resource, SearchResource, WritableResource};

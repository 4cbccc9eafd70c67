//! Typed post model and metadata records.

pub mod metadata;
pub mod post;

pub use metadata::{PostMetadata, PostRecord, ProfileMetadata};
pub use post::{FormatDescriptor, Post, PostType, Thumbnail};

//! AlgoVerse Domain Layer
//!
//! Core value types shared by every AlgoVerse crate. Apart from UUID
//! generation this crate has no external dependencies.
//!
//! ## Key Concepts
//!
//! - **Topic**: the algorithm a teaching page is generated for, validated so
//!   it can safely become part of a filename
//! - **Artifact**: the sanitized source file produced from a model response
//! - **RequestId**: UUIDv7 identifier attached to each generation request
//! - **ArtifactSink**: the boundary that stores artifacts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod request;
pub mod topic;
pub mod traits;

// Re-exports for convenience
pub use artifact::Artifact;
pub use request::RequestId;
pub use topic::{Topic, TopicError, MAX_TOPIC_LEN};
pub use traits::ArtifactSink;

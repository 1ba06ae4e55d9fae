pub mod clustering;
pub mod config;
pub mod course_code;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod host;
pub mod naming;
pub mod processing;
pub mod subject;
pub mod types;

// Re-export primary types for convenience
pub use config::{AutoStage, FeatureMode, GroupingConfig};
pub use engine::GroupingEngine;
pub use error::{ErrorKind, GroupingError};
pub use grouping::{GroupingMode, GroupingRequest};
pub use host::{
    organize, GroupColor, GroupMaterialization, OrganizeOptions, OrganizeReport, TabGroupSink,
    TabSnapshot, TabSource,
};
pub use types::{Group, GroupOrigin, GroupingResult, Tab};

pub mod artifact;
pub mod error;
pub mod tool;
pub mod traits;

pub use artifact::{ArtifactKind, ArtifactName, ALLOWED_ARTIFACTS};
pub use error::NurseError;
pub use tool::{Tool, ToolInvocation};
pub use traits::ToolExecutor;

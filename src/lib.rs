pub mod extract;
pub mod local;
pub mod matching;
pub mod models;
pub mod online;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod verify;

pub use models::{ResolutionResult, ResolutionSource, ResolutionStatus};
pub use registry::Registry;
pub use resolver::Resolver;

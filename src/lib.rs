//! binderpack - buildpack selection and build planning for interactive-computing images
//!
//! Given a source repository, binderpack picks exactly one buildpack from an
//! ordered registry (first `detect` wins) and linearizes that buildpack's
//! build, assemble and post-build steps into the sequence an image builder
//! runs, together with the image's default command.
//!
//! # Example
//!
//! ```no_run
//! use binderpack::{BuildPlan, Dispatcher, Repository};
//!
//! let repo = Repository::open("/path/to/repo");
//! let plan = BuildPlan::for_repository(&Dispatcher::default(), &repo)?;
//!
//! for step in &plan.steps {
//!     println!("# as {}\n{}", step.user, step.script);
//! }
//! # Ok::<(), binderpack::BuildPackError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`buildpack`]: the capability set every buildpack implements
//! - [`buildpacks`]: concrete buildpacks, layered by composition
//! - [`registry`]: ordered registry and first-match dispatcher
//! - [`plan`]: step assembly and the executor interface
//! - [`repository`]: configuration file access

pub mod buildpack;
pub mod buildpacks;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod plan;
pub mod registry;
pub mod repository;
pub mod util;

pub use buildpack::{BuildPack, BuildPackId, ExecutionUser, Step};
pub use config::{BinderpackConfig, ConfigError};
pub use error::BuildPackError;
pub use plan::{BuildPlan, Executor};
pub use registry::{BuildPackRegistry, Dispatcher};
pub use repository::{ConfigFile, Repository};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

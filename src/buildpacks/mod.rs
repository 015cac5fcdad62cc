//! Concrete buildpacks
//!
//! Layering, most generic first:
//!
//! ```text
//! base ─┬─ python ─┬─ r
//!       │          └─ haskell
//!       └─ conda ──── julia
//! ```
//!
//! `docker` stands alone: it defers to the repository's own Dockerfile.

pub mod base;
pub mod conda;
pub mod docker;
pub mod haskell;
pub mod julia;
pub mod python;
pub mod r;

pub use base::BaseBuildPack;
pub use conda::CondaBuildPack;
pub use docker::DockerBuildPack;
pub use haskell::HaskellBuildPack;
pub use julia::JuliaBuildPack;
pub use python::PythonBuildPack;
pub use r::RBuildPack;

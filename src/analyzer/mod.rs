//! Repository Snapshot Collaborator
//!
//! Turns a local checkout into the profiler's input contract:
//! - File listing with gitignore support and exclude globs
//! - Dependency manifests (npm, pip, Poetry, Cargo, Go, Bundler)
//! - A bounded sample of manifest and route-file contents

pub mod manifest;
pub mod scanner;
pub mod snapshot;

pub use manifest::ManifestKind;
pub use scanner::FileScanner;
pub use snapshot::SnapshotBuilder;

//! Per-user file tree: path sandboxing and the GET/POST transfers.

pub mod path;
pub mod transfer;

pub use path::{ResolveError, SandboxedPath, resolve};
pub use transfer::UploadMode;

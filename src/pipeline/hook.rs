use std::path::{Path, PathBuf};

use anyhow::Result;

/// A hook invoked between embedding and extraction in a [`roundtrip`](super::roundtrip).
///
/// Implement this trait to put the marked file through whatever it will
/// meet in practice before it is read back, for example a transcode or an
/// upload/download cycle.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use anyhow::Result;
/// use lumamark::PipelineHook;
///
/// struct CopyHook;
///
/// impl PipelineHook for CopyHook {
///     fn after_embed(&self, marked_path: &Path) -> Result<PathBuf> {
///         let copy = marked_path.with_extension("copy.png");
///         std::fs::copy(marked_path, &copy)?;
///         Ok(copy)
///     }
/// }
/// ```
pub trait PipelineHook {
    /// Called after embedding completes. Return the path the extractor
    /// should read from.
    fn after_embed(&self, marked_path: &Path) -> Result<PathBuf>;
}

/// A no-op hook that passes the marked path through unchanged.
pub struct NoopHook;

impl PipelineHook for NoopHook {
    fn after_embed(&self, marked_path: &Path) -> Result<PathBuf> {
        Ok(marked_path.to_path_buf())
    }
}

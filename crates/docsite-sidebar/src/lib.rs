//! Sidebar generation from documentation folders.
//!
//! The sidebar is derived from the file system on every build: each configured
//! section lists the markdown files found directly inside its folder.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use docsite_sidebar::build_sidebar;
//!
//! let documents = build_sidebar(Path::new("docs"))?;
//! for name in &documents {
//!     println!("{name}");
//! }
//! # Ok::<(), docsite_sidebar::SidebarError>(())
//! ```

mod group;
mod scanner;

use std::path::{Path, PathBuf};

pub use group::{SidebarGroup, SidebarMap, build_sidebar_map, page_file_name, page_url};
pub use scanner::build_sidebar;

/// Sidebar generation error.
#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    /// The folder or one of its entries could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Filesystem {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SidebarError {
    pub(crate) fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

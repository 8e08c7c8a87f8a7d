//! Document discovery for a single sidebar folder.

use std::fs;
use std::path::Path;

use crate::SidebarError;

/// Extension a file must carry to appear in the sidebar (case-sensitive).
const DOCUMENT_EXTENSION: &str = "md";

/// List the documents in `folder` that belong in the sidebar.
///
/// Returns the names of the regular files directly inside `folder` whose
/// extension is exactly `.md`, in the order the filesystem enumerates them.
/// Subdirectories are neither listed nor descended into. Symlinks are
/// followed, so a link to a markdown file counts as a document.
///
/// # Errors
///
/// Returns [`SidebarError::Filesystem`] if the folder cannot be listed or an
/// entry's metadata cannot be read.
pub fn build_sidebar(folder: &Path) -> Result<Vec<String>, SidebarError> {
    let entries = fs::read_dir(folder).map_err(|e| SidebarError::filesystem(folder, e))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SidebarError::filesystem(folder, e))?;
        let path = entry.path();

        // fs::metadata follows symlinks, entry.file_type() would not
        let metadata = fs::metadata(&path).map_err(|e| SidebarError::filesystem(&path, e))?;
        if !metadata.is_file() || path.extension().is_none_or(|ext| ext != DOCUMENT_EXTENSION) {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => documents.push(name),
            Err(name) => {
                tracing::warn!(name = ?name, folder = %folder.display(), "Skipping non UTF-8 file name");
            }
        }
    }

    tracing::debug!(folder = %folder.display(), count = documents.len(), "Sidebar folder scanned");
    Ok(documents)
}

//! Destination resolution for `move` commands.
//!
//! Turns a destination link plus the moving file's name into a folder, a
//! proposed file name, and whether the destination is already taken.

use std::io;

use serde::Serialize;

use notemv_core::config::CollisionCheck;
use notemv_core::path::{join_path, normalize_path};
use notemv_core::sanitize::{base_name, note_file_name};
use notemv_vault::NoteStore;

/// Where a `move` should put the file, before collision policy applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationPlan {
    /// Link target with any alias removed, unsanitized.
    pub link_path: String,
    /// Normalized folder; `""` is the vault root.
    pub folder_path: String,
    /// Sanitized file name, always ending in `.md`.
    pub proposed_file_name: String,
}

/// A [`DestinationPlan`] plus the collision lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDestination {
    pub folder_path: String,
    pub proposed_file_name: String,
    /// Whether a file already answers to the destination link.
    pub target_exists: bool,
}

impl ResolvedDestination {
    /// Final path for a file currently named `current_file_name`.
    ///
    /// When the destination is taken the file keeps its own name and only
    /// changes folder.
    pub fn target_path(&self, current_file_name: &str) -> String {
        if self.target_exists {
            join_path(&self.folder_path, current_file_name)
        } else {
            join_path(&self.folder_path, &self.proposed_file_name)
        }
    }
}

/// Split a destination link into folder and proposed file name.
///
/// The last `/` segment names the file; if it is empty the current file's
/// base name is kept. A link without folder segments targets the vault
/// root.
pub fn plan_destination(destination_link: &str, current_file_name: &str) -> DestinationPlan {
    let link_path = destination_link
        .split('|')
        .next()
        .unwrap_or_default()
        .to_string();

    let (folder, name) = match link_path.rsplit_once('/') {
        Some((folder, name)) => (folder, name),
        None => ("", link_path.as_str()),
    };
    let name = if name.is_empty() {
        base_name(current_file_name)
    } else {
        name
    };

    DestinationPlan {
        folder_path: normalize_path(folder),
        proposed_file_name: note_file_name(name),
        link_path,
    }
}

/// Plan the destination and look up whether it is already taken.
///
/// With [`CollisionCheck::LinkResolution`] the unsanitized link is resolved
/// the way note links are, so `[[Note]]` collides with `Deep/Note.md`.
/// With [`CollisionCheck::LiteralPath`] only the exact proposed path counts.
///
/// # Errors
///
/// Propagates I/O errors from the store lookup.
pub async fn resolve<S: NoteStore>(
    store: &S,
    destination_link: &str,
    current_file_name: &str,
    collision: CollisionCheck,
) -> io::Result<ResolvedDestination> {
    let plan = plan_destination(destination_link, current_file_name);
    let target_exists = match collision {
        CollisionCheck::LinkResolution => store.resolve_link(&plan.link_path).await?.is_some(),
        CollisionCheck::LiteralPath => {
            store
                .file_exists(&join_path(&plan.folder_path, &plan.proposed_file_name))
                .await?
        }
    };
    tracing::debug!(
        link = %plan.link_path,
        folder = %plan.folder_path,
        proposed = %plan.proposed_file_name,
        target_exists,
        "resolved destination"
    );

    Ok(ResolvedDestination {
        folder_path: plan.folder_path,
        proposed_file_name: plan.proposed_file_name,
        target_exists,
    })
}

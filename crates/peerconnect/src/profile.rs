//! The user's profile and the profile manager view.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::store::Store;

/// The current user's profile.
///
/// Skills and projects are free-form comma-separated strings, stored exactly
/// as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name. An empty name means no profile has been created.
    pub name: String,
    /// College identifier.
    pub college_id: String,
    /// Year of study.
    pub year: String,
    /// Department.
    pub department: String,
    /// Picture as a data URI; may be empty.
    pub profile_pic: String,
    /// Comma-separated skills and interests.
    pub skills: String,
    /// Comma-separated project areas.
    pub projects: String,
}

impl UserProfile {
    /// Whether the profile has never been filled in.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }

    /// Skills as individual tags.
    #[must_use]
    pub fn skill_tags(&self) -> Vec<&str> {
        split_tags(&self.skills)
    }

    /// Project areas as individual tags.
    #[must_use]
    pub fn project_tags(&self) -> Vec<&str> {
        split_tags(&self.projects)
    }
}

/// Split a comma-separated field into trimmed, non-empty tags.
#[must_use]
pub fn split_tags(field: &str) -> Vec<&str> {
    field
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Encode a picture file as a `data:` URI.
///
/// The MIME type is guessed from the file extension. Neither size nor
/// content is checked.
///
/// # Errors
///
/// Returns [`Error::PictureRead`] if the file cannot be read.
pub fn picture_data_uri(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::PictureRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Encoding {} byte picture {}", bytes.len(), path.display());
    Ok(format!(
        "data:{};base64,{}",
        mime_for(path),
        BASE64.encode(bytes)
    ))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Whether the profile view shows the form or the saved profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    /// The form is shown, bound to the draft.
    Editing,
    /// The saved profile is shown.
    Display,
}

/// View over the persisted profile with an editable draft.
#[derive(Debug)]
pub struct ProfileManager<'a> {
    store: &'a mut Store,
    draft: UserProfile,
    mode: ProfileMode,
}

impl<'a> ProfileManager<'a> {
    /// Open the view. Starts in editing mode when no name has been saved.
    pub fn new(store: &'a mut Store) -> Self {
        let draft = store.profile().clone();
        let mode = if draft.is_blank() {
            ProfileMode::Editing
        } else {
            ProfileMode::Display
        };
        Self { store, draft, mode }
    }

    /// The persisted profile, or the all-empty default.
    #[must_use]
    pub fn load(&self) -> &UserProfile {
        self.store.profile()
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> ProfileMode {
        self.mode
    }

    /// Whether the form is shown.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode == ProfileMode::Editing
    }

    /// Switch to editing, starting the draft from the saved profile.
    pub fn edit(&mut self) {
        self.draft = self.store.profile().clone();
        self.mode = ProfileMode::Editing;
    }

    /// The form's current values.
    #[must_use]
    pub fn draft(&self) -> &UserProfile {
        &self.draft
    }

    /// Mutable access to the form's values.
    pub fn draft_mut(&mut self) -> &mut UserProfile {
        &mut self.draft
    }

    /// Read a picture file into the draft as a data URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PictureRead`] if the file cannot be read.
    pub fn upload_picture(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.draft.profile_pic = picture_data_uri(path)?;
        Ok(())
    }

    /// Overwrite the persisted profile with `profile` and show it.
    ///
    /// If the write fails the view stays in editing mode with `profile` as
    /// the draft, and an error notice is returned.
    pub fn save(&mut self, profile: UserProfile) -> Notice {
        self.draft = profile.clone();
        match self.store.save_profile(profile) {
            Ok(()) => {
                self.mode = ProfileMode::Display;
                Notice::success("Profile saved.")
            }
            Err(e) => {
                warn!("profile not saved: {e}");
                self.mode = ProfileMode::Editing;
                Notice::error(format!("Could not save your profile: {e}"))
            }
        }
    }

    /// Save the current draft.
    pub fn submit(&mut self) -> Notice {
        let draft = self.draft.clone();
        self.save(draft)
    }
}

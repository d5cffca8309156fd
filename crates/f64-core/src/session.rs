//! Editor session state.
//!
//! Tracks the loaded photos and their parameter sets, the active photo, the
//! parameter clipboard, saved presets, and the "edited" list with its
//! dismiss/undo. Decoded images are not held here; they live with the caller
//! and are looked up by [`PhotoId`] at render/export time.
//!
//! Every edit replaces the active photo's [`EditParams`] wholesale. Presets
//! and pasted parameters are never merged into the existing set.

use crate::transform::CropError;
use crate::{is_edited, Crop, EditParams, DEFAULT_PARAMS};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identity of a photo within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u64);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "photo-{}", self.0)
    }
}

/// Identity of a saved preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetId(pub u64);

/// A loaded photo and its current edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    /// Original file name, used when exporting.
    pub name: String,
    pub params: EditParams,
    /// Dismissed from the edited list until edited again.
    pub hidden_from_edited: bool,
    /// Session-wide sequence number of the last edit, 0 if never edited.
    pub last_edited: u64,
}

impl Photo {
    pub fn new(id: PhotoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            params: DEFAULT_PARAMS,
            hidden_from_edited: false,
            last_edited: 0,
        }
    }

    /// Whether this photo's parameters differ from the neutral set.
    pub fn is_edited(&self) -> bool {
        is_edited(&self.params)
    }
}

/// A named, stored copy of a parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub params: EditParams,
}

impl Preset {
    /// Name given to presets saved without one.
    pub const DEFAULT_NAME: &'static str = "New Preset";

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("No photo is active")]
    NoActivePhoto,

    #[error("Unknown photo: {0}")]
    UnknownPhoto(PhotoId),

    #[error("Unknown preset: {0:?}")]
    UnknownPreset(PresetId),

    #[error("Nothing has been copied")]
    EmptyClipboard,

    #[error(transparent)]
    InvalidCrop(#[from] CropError),
}

/// All editor state for one browsing session.
#[derive(Debug, Default)]
pub struct Session {
    photos: Vec<Photo>,
    active: Option<PhotoId>,
    presets: Vec<Preset>,
    clipboard: Option<EditParams>,
    last_dismissed: Option<PhotoId>,
    next_id: u64,
    edit_clock: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Add a photo with neutral parameters and make it active.
    pub fn add_photo(&mut self, name: impl Into<String>) -> PhotoId {
        let id = PhotoId(self.allocate_id());
        self.photos.push(Photo::new(id, name));
        self.active = Some(id);
        log::debug!("added {id}");
        id
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    fn photo_mut(&mut self, id: PhotoId) -> Result<&mut Photo, SessionError> {
        self.photos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SessionError::UnknownPhoto(id))
    }

    /// Make `id` the active photo.
    pub fn select(&mut self, id: PhotoId) -> Result<(), SessionError> {
        if self.photo(id).is_none() {
            return Err(SessionError::UnknownPhoto(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn active_id(&self) -> Option<PhotoId> {
        self.active
    }

    pub fn active_photo(&self) -> Option<&Photo> {
        self.active.and_then(|id| self.photo(id))
    }

    /// Parameters the sidebar should show: the active photo's, or neutral.
    pub fn active_params(&self) -> EditParams {
        self.active_photo().map_or(DEFAULT_PARAMS, |p| p.params)
    }

    /// Replace the active photo's parameters wholesale.
    ///
    /// The crop is validated here so an invalid set never reaches the
    /// render path. Editing a photo brings it back onto the edited list.
    pub fn update_params(&mut self, params: EditParams) -> Result<(), SessionError> {
        params.crop.validate()?;
        let id = self.active.ok_or(SessionError::NoActivePhoto)?;
        self.edit_clock += 1;
        let clock = self.edit_clock;

        let photo = self.photo_mut(id)?;
        photo.params = params;
        photo.last_edited = clock;
        photo.hidden_from_edited = false;
        Ok(())
    }

    /// Replace only the crop, keeping every other control.
    pub fn update_crop(&mut self, crop: Crop) -> Result<(), SessionError> {
        let params = EditParams {
            crop,
            ..self.active_params()
        };
        self.update_params(params)
    }

    /// Put the active photo back to the neutral parameter set.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.update_params(DEFAULT_PARAMS)
    }

    /// Copy the active photo's parameters to the clipboard.
    pub fn copy_params(&mut self) -> Result<(), SessionError> {
        let params = self
            .active_photo()
            .ok_or(SessionError::NoActivePhoto)?
            .params;
        self.clipboard = Some(params);
        Ok(())
    }

    pub fn can_paste(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Replace the active photo's parameters with the clipboard contents.
    pub fn paste_params(&mut self) -> Result<(), SessionError> {
        let params = self.clipboard.ok_or(SessionError::EmptyClipboard)?;
        self.update_params(params)
    }

    /// Save the active photo's parameters as a preset.
    ///
    /// An empty name falls back to [`Preset::DEFAULT_NAME`].
    pub fn save_preset(&mut self, name: &str) -> Result<PresetId, SessionError> {
        let params = self
            .active_photo()
            .ok_or(SessionError::NoActivePhoto)?
            .params;
        let id = PresetId(self.allocate_id());
        let name = match name.trim() {
            "" => Preset::DEFAULT_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };
        self.presets.push(Preset { id, name, params });
        Ok(id)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Apply a saved preset to the active photo, replacing all parameters.
    pub fn apply_preset(&mut self, id: PresetId) -> Result<(), SessionError> {
        let params = self
            .presets
            .iter()
            .find(|p| p.id == id)
            .ok_or(SessionError::UnknownPreset(id))?
            .params;
        self.update_params(params)
    }

    /// Photos that carry edits and have not been dismissed, in load order.
    pub fn edited_photos(&self) -> Vec<&Photo> {
        self.photos
            .iter()
            .filter(|p| p.is_edited() && !p.hidden_from_edited)
            .collect()
    }

    /// Hide a photo from the edited list. Its parameters are kept.
    pub fn dismiss(&mut self, id: PhotoId) -> Result<(), SessionError> {
        self.photo_mut(id)?.hidden_from_edited = true;
        self.last_dismissed = Some(id);
        Ok(())
    }

    pub fn can_undo_dismiss(&self) -> bool {
        self.last_dismissed.is_some()
    }

    /// Restore the most recently dismissed photo, if any.
    pub fn undo_dismiss(&mut self) -> Option<PhotoId> {
        let id = self.last_dismissed.take()?;
        if let Ok(photo) = self.photo_mut(id) {
            photo.hidden_from_edited = false;
        }
        Some(id)
    }
}

//! Form assemblers
//!
//! Each workflow validates its scalar fields before any I/O, uploads media one
//! file at a time through the [`UploadCoordinator`], then issues exactly one
//! create or update call. Nothing is compensated when a later step fails.

mod audition;
mod board;
mod notice;

use zigg_api_client::ApiClient;
use zigg_core::constants::MAX_ATTACHMENTS;
use zigg_core::models::MediaFile;
use zigg_core::ConsoleError;

use crate::upload::{UploadCoordinator, UploadTrail};

pub use audition::AuditionForm;
pub use board::{PostEditForm, PostForm};
pub use notice::{NoticeEditForm, NoticeForm};

/// Edit state of a single-media field.
#[derive(Debug, Clone, Default)]
pub enum MediaSlot {
    /// Leave the current media as it is
    #[default]
    Keep,
    Remove,
    Replace(MediaFile),
}

/// One entry of an ordered image gallery being edited.
#[derive(Debug, Clone)]
pub enum GalleryItem {
    /// Existing media key, sent back unchanged
    Keep(String),
    Upload(MediaFile),
}

pub(crate) fn check_attachment_count(count: usize) -> Result<(), ConsoleError> {
    if count > MAX_ATTACHMENTS {
        return Err(ConsoleError::validation(format!(
            "At most {} images/videos can be attached, got {}",
            MAX_ATTACHMENTS, count
        )));
    }
    Ok(())
}

/// Log orphaned uploads when a workflow fails part way.
fn settle<T>(trail: &UploadTrail, result: Result<T, ConsoleError>) -> Result<T, ConsoleError> {
    if let Err(e) = &result {
        trail.abandon(e);
    }
    result
}

pub struct FormAssembler {
    uploads: UploadCoordinator,
}

impl FormAssembler {
    pub fn new(uploads: UploadCoordinator) -> Self {
        Self { uploads }
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    fn client(&self) -> &ApiClient {
        self.uploads.client()
    }
}

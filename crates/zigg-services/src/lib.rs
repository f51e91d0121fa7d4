//! ZIGG Services Library
//!
//! Media workflows of the admin console:
//! - Upload coordination: probe, normalize, grant, PUT (upload)
//! - Form assembly for auditions, board posts and notices (forms)

pub mod forms;
pub mod upload;

// Re-export commonly used types
pub use forms::{
    AuditionForm, FormAssembler, GalleryItem, MediaSlot, NoticeEditForm, NoticeForm,
    PostEditForm, PostForm,
};
pub use upload::{UploadCoordinator, UploadedMedia, UploadedVideo};

//! # obra-media
//!
//! Receipt photo handling for the obra budget tracker.
//!
//! - [`photo`]: the upload policy (image content type, size limit)
//! - [`store`]: the media store seam, with a hosted implementation speaking
//!   the Cloudinary upload API and an in-memory one for tests

pub mod photo;
pub mod store;

pub use photo::{human_size, PhotoError, PhotoPolicy, PhotoUpload, ValidatedPhoto};
pub use store::{
    generate_photo_key, HostedMediaStore, MediaError, MediaResult, MediaStore, MemoryMediaStore,
    StoredMedia,
};

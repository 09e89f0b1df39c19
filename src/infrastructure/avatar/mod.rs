//! Avatar infrastructure module
//!
//! Derives avatar URLs from email addresses without contacting the avatar
//! service; the image is resolved lazily when a client fetches the URL.

mod gravatar;

pub use gravatar::{AvatarOptions, AvatarUrlProvider, GravatarUrlBuilder};

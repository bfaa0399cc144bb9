//! Profile page model

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chat_core::User;

/// What the avatar slot shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Initial(char),
    Placeholder,
}

/// Display values for the profile page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub avatar: Avatar,
    pub full_name: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub member_since: String,
    pub account_status: &'static str,
    pub status_line: &'static str,
}

impl ProfileView {
    /// `pending_image` is an image chosen but not yet confirmed by the server;
    /// it takes precedence over the stored picture.
    pub fn new(user: &User, pending_image: Option<&str>, is_updating: bool) -> Self {
        let avatar = match pending_image.filter(|s| !s.is_empty()) {
            Some(image) => Avatar::Image(image.to_string()),
            None if user.has_profile_pic() => Avatar::Image(user.profile_pic.clone()),
            None => user
                .email
                .trim()
                .chars()
                .next()
                .map_or(Avatar::Placeholder, Avatar::Initial),
        };

        Self {
            avatar,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            member_since: user.created_at.format("%Y-%m-%d").to_string(),
            account_status: "Active",
            status_line: if is_updating {
                "Uploading..."
            } else {
                "Click the camera icon to update your photo"
            },
        }
    }
}

/// Encode image bytes as a `data:` URL
pub fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

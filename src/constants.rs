use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const WELCOME_HTML: &str = concat!(
    "<h1>Welcome to QAsset</h1>",
    "<p>QAsset is a simple and easy to use asset management system.</p>",
    "<p>It allows you to upload and manage images and files.</p>",
    "<p>For more information, please visit <a href='https://github.com/nugrhrizki/qasset'><strong>QAsset</strong></a>.</p>",
);

pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /";

pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// Length of a textual UUID, the only accepted idempotency key shape.
pub const IDEMPOTENCY_KEY_LEN: usize = 36;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".gif", ".jpeg"];

/// Upper bound for plain text multipart fields such as `path`.
pub const MAX_TEXT_FIELD_BYTES: usize = 4 * 1024;

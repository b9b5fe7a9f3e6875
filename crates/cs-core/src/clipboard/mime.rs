use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Clipboard targets in the order they are probed. The first target that
/// yields bytes wins.
pub const MIME_PRIORITY: [&str; 11] = [
    MimeType::TEXT_UTF8,
    MimeType::X11_UTF8_STRING,
    "text/plain",
    MimeType::X11_STRING,
    "image/gif",
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/webp",
    "image/svg+xml",
    "text/html",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MimeType(pub String);

impl MimeType {
    pub const TEXT_UTF8: &'static str = "text/plain;charset=utf-8";
    pub const X11_UTF8_STRING: &'static str = "UTF8_STRING";
    pub const X11_STRING: &'static str = "STRING";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn text_utf8() -> Self {
        Self(Self::TEXT_UTF8.into())
    }

    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }

    pub fn image_png() -> Self {
        Self("image/png".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }

    /// X11 atom names are not MIME types; `UTF8_STRING` is stored under its
    /// MIME equivalent so writes go back out as UTF-8 text.
    pub fn normalized(self) -> Self {
        if self.0 == Self::X11_UTF8_STRING {
            Self::text_utf8()
        } else {
            self
        }
    }

    pub fn priority_list() -> Vec<MimeType> {
        MIME_PRIORITY.iter().map(|m| MimeType::new(*m)).collect()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MimeType(s.to_string()))
    }
}

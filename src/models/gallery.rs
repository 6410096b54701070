use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gallery {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<GalleryImage>,
    pub published: bool,
    pub created_at: NaiveDateTime,
}

/// A stored image: the public URL plus the object path inside the bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryImage {
    pub url: String,
    pub path: String,
}

/// Editor payload for create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<GalleryImage>,
    #[serde(default)]
    pub published: bool,
}

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::types::{Collection, Fields};

/// A typed payload stored in one collection.
pub trait Resource: DeserializeOwned + Serialize + Send + 'static {
    const COLLECTION: Collection;

    fn into_fields(self) -> anyhow::Result<Fields> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => anyhow::bail!("{} payload is not an object: {other}", Self::COLLECTION),
        }
    }
}

/// Clothing item. PUT replaces exactly these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Clothes {
    pub image: String,
    pub title: String,
    pub category: String,
    pub size: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Donation {
    pub name: String,
    pub email: String,
    pub category: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Testimonial {
    pub name: String,
    pub testimonial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GalleryImage {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Comment {
    pub name: String,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Volunteer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl Resource for Clothes {
    const COLLECTION: Collection = Collection::Clothes;
}
impl Resource for Donation {
    const COLLECTION: Collection = Collection::Donations;
}
impl Resource for Testimonial {
    const COLLECTION: Collection = Collection::Testimonials;
}
impl Resource for GalleryImage {
    const COLLECTION: Collection = Collection::Gallery;
}
impl Resource for Comment {
    const COLLECTION: Collection = Collection::Comments;
}
impl Resource for Volunteer {
    const COLLECTION: Collection = Collection::Volunteers;
}

use serde::{Deserialize, Serialize};

/// Image shown for a dish that carries no image reference of its own.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// A dish returned by a recommendation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishRecommendation {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub rating: f32,
}

impl DishRecommendation {
    pub fn new(name: impl Into<String>, description: impl Into<String>, rating: f32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image_ref: None,
            rating,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Image to display, falling back to [`PLACEHOLDER_IMAGE`] when unset or blank.
    pub fn image_or_placeholder(&self) -> &str {
        match self.image_ref.as_deref() {
            Some(image) if !image.trim().is_empty() => image,
            _ => PLACEHOLDER_IMAGE,
        }
    }
}

//! # Evidence

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::model::relation::take_relation;
use crate::model::{unsupported_shorthand, Model, Relation};
use crate::schema::{Construction, ModelSchema, PropertySpec};
use crate::types::{EntityKind, Primitive};

/// Media type as the review service understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Link,
}

impl MediaType {
    /// Collapse a MIME-like string: `image/*` becomes `Image`, everything
    /// else `Link`.
    pub fn collapse(media_type: &str) -> Self {
        let top_level = media_type.split('/').next().unwrap_or_default();
        if top_level.trim().eq_ignore_ascii_case("image") {
            MediaType::Image
        } else {
            MediaType::Link
        }
    }
}

/// A piece of evidence attached to an application.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub media_type: String,
    pub description: Option<String>,
    pub url: Relation<String>,
}

impl Evidence {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            description: None,
            url: Relation::Absent,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Relation::Value(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Resolve the evidence URL, if any.
    pub async fn url(&self) -> Result<Option<String>, CoreError> {
        self.url.get_optional("Evidence", "url", None).await
    }

    /// The `image`/`link` type used in submissions.
    pub fn submission_media_type(&self) -> MediaType {
        MediaType::collapse(&self.media_type)
    }
}

impl Model for Evidence {
    const KIND: EntityKind = EntityKind::Evidence;

    fn schema() -> &'static ModelSchema {
        static SCHEMA: OnceLock<ModelSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ModelSchema::new(
                "Evidence",
                vec![
                    PropertySpec::optional("description", Primitive::String),
                    PropertySpec::required("mediaType", Primitive::String),
                    PropertySpec::optional("url", Primitive::String),
                    PropertySpec::optional("getUrl", Primitive::Function),
                ],
            )
        })
    }

    fn from_construction(construction: Construction) -> Result<Self, ValidationError> {
        let mut props = match construction {
            Construction::Properties(props) => props,
            Construction::Default { property, .. } => {
                return Err(unsupported_shorthand("Evidence", property))
            }
        };
        let url = take_relation(&mut props, "Evidence", "url", "getUrl")?;
        let media_type = props
            .take_string("mediaType")?
            .ok_or_else(|| ValidationError::MissingRequiredProperty {
                model: "Evidence",
                property: "mediaType".to_string(),
            })?;
        Ok(Self {
            media_type,
            description: props.take_string("description")?,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Accessor, Value};
    use serde_json::json;

    #[test]
    fn media_types_collapse_to_image_or_link() {
        assert_eq!(MediaType::collapse("image/png"), MediaType::Image);
        assert_eq!(MediaType::collapse("image"), MediaType::Image);
        assert_eq!(MediaType::collapse("IMAGE/JPEG"), MediaType::Image);
        assert_eq!(MediaType::collapse("video/mp4"), MediaType::Link);
        assert_eq!(MediaType::collapse("imagery/x"), MediaType::Link);
        assert_eq!(MediaType::collapse("text/html"), MediaType::Link);
        assert_eq!(MediaType::collapse(""), MediaType::Link);
    }

    #[test]
    fn media_type_is_required() {
        let err = Evidence::from_value(Value::from(json!({"url": "https://x"}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredProperty {
                model: "Evidence",
                property: "mediaType".into()
            }
        );
    }

    #[tokio::test]
    async fn url_resolves_from_value_or_accessor() {
        let inline = Evidence::from_value(Value::from(
            json!({"mediaType": "image/png", "url": "https://x/1.png", "description": "shot"}),
        ))
        .unwrap();
        assert_eq!(inline.url().await.unwrap().as_deref(), Some("https://x/1.png"));
        assert_eq!(inline.description.as_deref(), Some("shot"));

        let computed = Evidence::from_value(Value::object([
            ("mediaType", Value::from("text/html")),
            ("getUrl", Value::from(Accessor::constant("https://x/page"))),
        ]))
        .unwrap();
        assert_eq!(computed.url().await.unwrap().as_deref(), Some("https://x/page"));

        let bare = Evidence::new("image/gif");
        assert_eq!(bare.url().await.unwrap(), None);
    }
}

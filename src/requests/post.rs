use serde::Deserialize;
use validator::Validate;

use super::{SLUG_RE, double_option};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Başlık zorunludur"))]
    pub title: String,
    #[validate(length(min = 1, message = "İçerik zorunludur"))]
    pub content: String,
    #[validate(url(message = "Geçerli bir görsel adresi girin"))]
    pub image: Option<String>,
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = "SLUG_RE",
            message = "Slug sadece küçük harf, rakam ve tire içerebilir"
        )
    )]
    pub slug: String,
    #[serde(default)]
    pub published: bool,
}

/// Partial update: absent fields are left untouched; `image` distinguishes
/// absent from explicit null.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Başlık zorunludur"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "İçerik zorunludur"))]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = "SLUG_RE",
            message = "Slug sadece küçük harf, rakam ve tire içerebilir"
        )
    )]
    pub slug: Option<String>,
    pub published: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_uppercase_slug() {
        let request = CreatePostRequest {
            title: "Haber".to_string(),
            content: "İçerik".to_string(),
            image: None,
            slug: "Yeni-Haber".to_string(),
            published: false,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn accepts_hyphenated_slug() {
        let request = CreatePostRequest {
            title: "Haber".to_string(),
            content: "İçerik".to_string(),
            image: None,
            slug: "ramazan-kumanyasi-2025".to_string(),
            published: true,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn image_null_clears_image_missing_keeps() {
        let cleared: UpdatePostRequest = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(cleared.image, Some(None));

        let untouched: UpdatePostRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(untouched.image, None);
    }
}

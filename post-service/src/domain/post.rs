use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) views: i64,
    pub(crate) owner_id: Uuid,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) owner_id: Uuid,
}

impl CreatePost {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            category: self.category.trim().to_string(),
            owner_id: self.owner_id,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UpdatePost {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
}

impl UpdatePost {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            id: self.id,
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            category: self.category.trim().to_string(),
        })
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.len() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{CreatePost, DomainError, UpdatePost};

    #[test]
    fn create_post_rejects_empty_title() {
        let input = CreatePost {
            title: "   ".to_string(),
            content: "valid content".to_string(),
            category: "tech".to_string(),
            owner_id: Uuid::new_v4(),
        };

        let err = input.validate().expect_err("title must be rejected");
        assert!(matches!(
            err,
            DomainError::Validation { field: "title", .. }
        ));
    }

    #[test]
    fn update_post_normalizes_fields() {
        let input = UpdatePost {
            id: Uuid::new_v4(),
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            category: "  tech  ".to_string(),
        };

        let validated = input.validate().expect("must validate");
        assert_eq!(validated.title, "title");
        assert_eq!(validated.content, "content");
        assert_eq!(validated.category, "tech");
    }
}

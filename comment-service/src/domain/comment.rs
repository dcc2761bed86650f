use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) post_id: Uuid,
    pub(crate) owner_id: Uuid,
    pub(crate) views: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreateComment {
    pub(crate) content: String,
    pub(crate) post_id: Uuid,
    pub(crate) owner_id: Uuid,
}

impl CreateComment {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            content: normalize_content(&self.content)?,
            post_id: self.post_id,
            owner_id: self.owner_id,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateComment {
    pub(crate) id: Uuid,
    pub(crate) content: String,
}

impl UpdateComment {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            id: self.id,
            content: normalize_content(&self.content)?,
        })
    }
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() || content.len() > 4096 {
        return Err(DomainError::Validation {
            field: "content",
            message: "must be 1..4096 chars",
        });
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{CreateComment, UpdateComment};

    #[test]
    fn create_comment_rejects_blank_content() {
        let input = CreateComment {
            content: "   ".to_string(),
            post_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_comment_trims_content() {
        let input = UpdateComment {
            id: Uuid::new_v4(),
            content: "  fixed  ".to_string(),
        };
        let validated = input.validate().expect("must validate");
        assert_eq!(validated.content, "fixed");
    }
}

//! Allow-lists mapping caller-supplied keys to column references.
//! Anything not listed here never reaches SQL text.

pub(crate) fn filter_column(name: &str) -> Option<&'static str> {
    match name {
        "id" => Some("id"),
        "name" => Some("name"),
        "last_name" => Some("last_name"),
        "username" => Some("username"),
        "email" => Some("email"),
        _ => None,
    }
}

pub(crate) fn sort_column(name: &str) -> Option<&'static str> {
    match name {
        "created_at" => Some("created_at"),
        "updated_at" => Some("updated_at"),
        "name" => Some("name"),
        "username" => Some("username"),
        "email" => Some("email"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_column, sort_column};

    #[test]
    fn known_filter_keys_resolve() {
        for key in ["id", "name", "last_name", "username", "email"] {
            assert!(filter_column(key).is_some(), "{key} must be allowed");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(filter_column("password_hash").is_none());
        assert!(filter_column("1; DROP TABLE users").is_none());
        assert!(sort_column("deleted_at").is_none());
    }
}

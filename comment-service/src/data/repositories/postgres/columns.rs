pub(crate) fn filter_column(name: &str) -> Option<&'static str> {
    match name {
        "id" => Some("id"),
        "post_id" => Some("post_id"),
        "owner_id" => Some("owner_id"),
        _ => None,
    }
}

pub(crate) fn sort_column(name: &str) -> Option<&'static str> {
    match name {
        "created_at" => Some("created_at"),
        "updated_at" => Some("updated_at"),
        "views" => Some("views"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_column, sort_column};

    #[test]
    fn only_listed_columns_are_accepted() {
        assert_eq!(filter_column("post_id"), Some("post_id"));
        assert!(filter_column("content").is_none());
        assert!(sort_column("deleted_at").is_none());
    }
}

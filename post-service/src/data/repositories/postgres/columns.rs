pub(crate) fn filter_column(name: &str) -> Option<&'static str> {
    match name {
        "id" => Some("id"),
        "title" => Some("title"),
        "category" => Some("category"),
        "owner_id" => Some("owner_id"),
        _ => None,
    }
}

pub(crate) fn sort_column(name: &str) -> Option<&'static str> {
    match name {
        "created_at" => Some("created_at"),
        "updated_at" => Some("updated_at"),
        "title" => Some("title"),
        "views" => Some("views"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_column, sort_column};

    #[test]
    fn only_listed_columns_are_accepted() {
        assert_eq!(filter_column("category"), Some("category"));
        assert!(filter_column("content; --").is_none());
        assert_eq!(sort_column("views"), Some("views"));
        assert!(sort_column("deleted_at").is_none());
    }
}

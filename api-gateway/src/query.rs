//! Translates a raw multi-valued query string into a structured list
//! request. Parse failures are collected rather than raised so the caller
//! decides whether to abort; the result always carries usable defaults.

const CONTROL_KEYS: [&str; 7] = [
    "page",
    "limit",
    "field",
    "value",
    "sort_by",
    "started_at",
    "ended_at",
];

pub(crate) const DEFAULT_PAGE: i64 = 1;
pub(crate) const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone)]
pub(crate) struct QueryParams {
    pub(crate) page: i64,
    pub(crate) limit: i64,
    pub(crate) field: String,
    pub(crate) value: String,
    pub(crate) sort_by: String,
    pub(crate) started_at: String,
    pub(crate) ended_at: String,
    pub(crate) filters: Vec<(String, String)>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            field: String::new(),
            value: String::new(),
            sort_by: String::new(),
            started_at: String::new(),
            ended_at: String::new(),
            filters: Vec::new(),
        }
    }
}

pub(crate) fn parse_query(pairs: &[(String, String)]) -> (QueryParams, Vec<String>) {
    let mut params = QueryParams::default();
    let mut errors = Vec::new();

    if let Some(raw) = first(pairs, "page") {
        match raw.parse::<i64>() {
            Ok(parsed) => params.page = parsed,
            Err(_) => errors.push("invalid `page` param".to_string()),
        }
    }
    if let Some(raw) = first(pairs, "limit") {
        match raw.parse::<i64>() {
            Ok(parsed) => params.limit = parsed,
            Err(_) => errors.push("invalid `limit` param".to_string()),
        }
    }
    if let Some(raw) = first(pairs, "field") {
        params.field = raw.to_string();
    }
    if let Some(raw) = first(pairs, "value") {
        params.value = raw.to_string();
    }
    if let Some(raw) = first(pairs, "sort_by") {
        params.sort_by = raw.to_string();
    }
    if let Some(raw) = first(pairs, "started_at") {
        params.started_at = raw.to_string();
    }
    if let Some(raw) = first(pairs, "ended_at") {
        params.ended_at = raw.to_string();
    }

    for (key, value) in pairs {
        if !CONTROL_KEYS.contains(&key.as_str()) {
            params.filters.push((key.clone(), value.clone()));
        }
    }

    (params, errors)
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::parse_query;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn recognized_keys_are_split_from_residual_filters() {
        let (params, errors) = parse_query(&pairs(&[
            ("page", "2"),
            ("limit", "5"),
            ("color", "red"),
        ]));

        assert!(errors.is_empty());
        assert_eq!(params.page, 2);
        assert_eq!(params.limit, 5);
        assert_eq!(
            params.filters,
            vec![("color".to_string(), "red".to_string())]
        );
    }

    #[test]
    fn parse_failures_are_collected_and_defaults_kept() {
        let (params, errors) = parse_query(&pairs(&[("page", "abc")]));

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("page"));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert!(params.filters.is_empty());
    }

    #[test]
    fn first_occurrence_of_a_control_key_wins() {
        let (params, errors) = parse_query(&pairs(&[("page", "3"), ("page", "7")]));

        assert!(errors.is_empty());
        assert_eq!(params.page, 3);
    }

    #[test]
    fn control_fields_and_ranges_are_assigned() {
        let (params, errors) = parse_query(&pairs(&[
            ("field", "username"),
            ("value", "max"),
            ("sort_by", "created_at"),
            ("started_at", "2024-01-01"),
            ("ended_at", "2024-12-31"),
        ]));

        assert!(errors.is_empty());
        assert_eq!(params.field, "username");
        assert_eq!(params.value, "max");
        assert_eq!(params.sort_by, "created_at");
        assert_eq!(params.started_at, "2024-01-01");
        assert_eq!(params.ended_at, "2024-12-31");
    }
}

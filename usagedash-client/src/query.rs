use usagedash_protocol::prelude::FilterParams;

/// Encodes filters as `/events/search` query pairs.
///
/// Lists are comma joined. Absent values, empty strings, empty lists and
/// zero `limit`/`offset` are left out entirely.
pub fn search_query(filters: &FilterParams) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();

    if let Some(start) = non_empty(&filters.start_date) {
        pairs.push(("start_date", start.to_string()));
    }
    if let Some(end) = non_empty(&filters.end_date) {
        pairs.push(("end_date", end.to_string()));
    }
    if let Some(ids) = non_empty_list(&filters.company_ids) {
        pairs.push(("company_ids", ids.join(",")));
    }
    if let Some(types) = non_empty_list(&filters.event_types) {
        pairs.push(("event_types", types.join(",")));
    }
    if let Some(text) = non_empty(&filters.search_text) {
        pairs.push(("search", text.to_string()));
    }
    if let Some(limit) = filters.limit.filter(|limit| *limit > 0) {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(offset) = filters.offset.filter(|offset| *offset > 0) {
        pairs.push(("offset", offset.to_string()));
    }

    pairs
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn non_empty_list(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|values| !values.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(&'static str, String)]) -> Vec<&'static str> {
        pairs.iter().map(|(key, _)| *key).collect()
    }

    #[test]
    fn encodes_example_scenario() {
        let filters = FilterParams {
            company_ids: Some(vec!["acme".into()]),
            event_types: Some(vec!["Action".into(), "Metric".into()]),
            search_text: Some("login".into()),
            ..FilterParams::first_page(10)
        };
        assert_eq!(
            search_query(&filters),
            vec![
                ("company_ids", "acme".to_string()),
                ("event_types", "Action,Metric".to_string()),
                ("search", "login".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn omits_empty_lists_and_strings() {
        let filters = FilterParams {
            company_ids: Some(Vec::new()),
            event_types: None,
            search_text: Some(String::new()),
            start_date: Some(String::new()),
            ..FilterParams::default()
        };
        assert!(search_query(&filters).is_empty());
    }

    #[test]
    fn forwards_inverted_dates_verbatim() {
        let filters = FilterParams {
            start_date: Some("2025-06-01".into()),
            end_date: Some("2025-05-01".into()),
            offset: Some(100),
            ..FilterParams::default()
        };
        let pairs = search_query(&filters);
        assert_eq!(keys(&pairs), vec!["start_date", "end_date", "offset"]);
        assert_eq!(pairs[0].1, "2025-06-01");
        assert_eq!(pairs[1].1, "2025-05-01");
    }
}

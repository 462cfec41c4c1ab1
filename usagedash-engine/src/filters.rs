use usagedash_protocol::prelude::{FilterParams, FilterPatch, DEFAULT_PAGE_SIZE};

/// Owner of the user-controlled filter parameters.
///
/// Every edit except pagination resets `offset` to 0, since a new filter
/// invalidates the previous cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    params: FilterParams,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(FilterParams::first_page(DEFAULT_PAGE_SIZE))
    }
}

impl FilterState {
    pub fn new(params: FilterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Merges `patch`, then forces `offset = 0`. An empty patch only resets
    /// the cursor.
    pub fn set_filters(&mut self, patch: FilterPatch) {
        self.params.apply(patch);
        self.params.offset = Some(0);
    }

    /// Drops every filter so the unfiltered universe shows; `limit` stays.
    pub fn clear(&mut self) {
        self.params = FilterParams {
            limit: self.params.limit,
            offset: Some(0),
            ..FilterParams::default()
        };
    }

    /// Advances the cursor by one page without touching anything else.
    pub fn load_more(&mut self) {
        let next = self.params.offset().saturating_add(self.params.page_size());
        self.params.offset = Some(next);
    }

    /// Raw (not yet debounced) search text edit.
    pub fn set_search_text(&mut self, text: Option<String>) {
        let patch = match text {
            Some(text) => FilterPatch::new().search_text(text),
            None => FilterPatch::new().clear_search_text(),
        };
        self.set_filters(patch);
    }

    /// Adds or removes a company from the selection.
    pub fn toggle_company(&mut self, company_id: &str, selected: bool) {
        let ids = toggled(self.params.company_ids.as_deref(), company_id, selected);
        self.set_filters(FilterPatch::new().company_ids(ids));
    }

    /// Adds or removes an event type from the selection.
    pub fn toggle_event_type(&mut self, event_type: &str, selected: bool) {
        let types = toggled(self.params.event_types.as_deref(), event_type, selected);
        self.set_filters(FilterPatch::new().event_types(types));
    }

    /// Whether anything narrows the result set (pagination does not count).
    pub fn has_active_filters(&self) -> bool {
        let params = &self.params;
        params.start_date.is_some()
            || params.end_date.is_some()
            || params.company_ids.as_ref().is_some_and(|ids| !ids.is_empty())
            || params.event_types.as_ref().is_some_and(|types| !types.is_empty())
            || params.search_text.as_ref().is_some_and(|text| !text.is_empty())
    }
}

fn toggled(current: Option<&[String]>, value: &str, selected: bool) -> Vec<String> {
    let mut values: Vec<String> = current.map(<[String]>::to_vec).unwrap_or_default();
    let present = values.iter().any(|existing| existing == value);
    if selected && !present {
        values.push(value.to_string());
    } else if !selected {
        values.retain(|existing| existing != value);
    }
    values
}

/// The filters a query is actually issued with: the current filters with the
/// raw search text replaced by its debounced value.
///
/// Search and export both go through here so they never disagree.
pub fn effective_filters(filters: &FilterParams, debounced_text: Option<&str>) -> FilterParams {
    FilterParams {
        search_text: debounced_text
            .filter(|text| !text.is_empty())
            .map(str::to_string),
        ..filters.clone()
    }
}

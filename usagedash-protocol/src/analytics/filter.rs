use serde::{Deserialize, Serialize};

/// Page size used when the filters carry no explicit limit.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Query parameters forwarded to the search and export endpoints.
///
/// Dates are kept as the strings the user typed; ordering and format are
/// validated by the backend only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl FilterParams {
    /// The initial filter set of a search session: first page, default size.
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(0),
            ..Self::default()
        }
    }

    /// Current page size, falling back to [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(&self) -> u32 {
        match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Merges a partial update. Pagination is untouched here; callers that
    /// need the offset reset go through the filter controller.
    pub fn apply(&mut self, patch: FilterPatch) {
        let FilterPatch {
            start_date,
            end_date,
            company_ids,
            event_types,
            search_text,
            limit,
        } = patch;

        if let Some(value) = start_date {
            self.start_date = value;
        }
        if let Some(value) = end_date {
            self.end_date = value;
        }
        if let Some(value) = company_ids {
            self.company_ids = value;
        }
        if let Some(value) = event_types {
            self.event_types = value;
        }
        if let Some(value) = search_text {
            self.search_text = value;
        }
        if let Some(value) = limit {
            self.limit = value;
        }
    }
}

/// Partial update for [`FilterParams`].
///
/// Every field is `None` when untouched, `Some(None)` when cleared and
/// `Some(Some(_))` when set. Empty strings and empty lists normalise to
/// "cleared".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    start_date: Option<Option<String>>,
    end_date: Option<Option<String>>,
    company_ids: Option<Option<Vec<String>>>,
    event_types: Option<Option<Vec<String>>>,
    search_text: Option<Option<String>>,
    limit: Option<Option<u32>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(non_empty(date.into()));
        self
    }

    pub fn clear_start_date(mut self) -> Self {
        self.start_date = Some(None);
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(non_empty(date.into()));
        self
    }

    pub fn clear_end_date(mut self) -> Self {
        self.end_date = Some(None);
        self
    }

    pub fn company_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.company_ids = Some(non_empty_list(ids));
        self
    }

    pub fn clear_company_ids(mut self) -> Self {
        self.company_ids = Some(None);
        self
    }

    pub fn event_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types = Some(non_empty_list(types));
        self
    }

    pub fn clear_event_types(mut self) -> Self {
        self.event_types = Some(None);
        self
    }

    pub fn search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(non_empty(text.into()));
        self
    }

    pub fn clear_search_text(mut self) -> Self {
        self.search_text = Some(None);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(Some(limit));
        self
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty_list<I, S>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

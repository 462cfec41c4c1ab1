use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::UsageEvent;
use super::nullable::null_as_default;

/// Point-in-time aggregate view served by `/dashboard/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_events: u64,
    pub unique_companies: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_types: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_events: Vec<UsageEvent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_range: TimeRange,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_series_data: Vec<TimeSeriesPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_companies: Vec<CompanyAnalytics>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_trends: BTreeMap<String, Vec<TimeSeriesPoint>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_filters: AvailableFilters,
}

impl DashboardSummary {
    /// Event type with the highest count; ties resolve to the first name.
    pub fn top_event_type(&self) -> Option<(&str, u64)> {
        self.event_types
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (name, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((name.as_str(), *count)),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

/// Daily event count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub count: u64,
}

/// Activity breakdown for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyAnalytics {
    pub company_id: String,
    pub event_count: u64,
    #[serde(default)]
    pub last_activity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_types: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
}

/// Values the filter controls can offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFilters {
    #[serde(default, deserialize_with = "null_as_default")]
    pub companies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub date_range: DateRange,
}

impl AvailableFilters {
    /// Derives the selectable values from a summary: the top companies, the
    /// histogram's event types, and the date span of the recent events.
    pub fn from_summary(summary: &DashboardSummary) -> Self {
        let companies = summary
            .top_companies
            .iter()
            .map(|company| company.company_id.clone())
            .collect();
        let event_types = summary.event_types.keys().cloned().collect();

        let dates: Vec<String> = summary
            .recent_events
            .iter()
            .map(UsageEvent::created_on)
            .collect();
        let date_range = DateRange {
            min: dates.iter().min().cloned().unwrap_or_default(),
            max: dates.iter().max().cloned().unwrap_or_default(),
        };

        Self {
            companies,
            event_types,
            date_range,
        }
    }
}

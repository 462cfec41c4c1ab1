use std::path::Path;

use colored::*;
use usagedash_engine::view::{
    format_timestamp, highlight_matches, results_header, selection_label, ALL_COMPANIES,
    ALL_EVENT_TYPES, NO_COMPANIES, NO_DASHBOARD_DATA, NO_EVENT_TYPES, NO_RECENT_EVENTS,
    NO_RESULTS, NO_TIME_SERIES,
};
use usagedash_engine::{Overview, SearchSnapshot};
use usagedash_protocol::prelude::{ExportFile, UsageEvent};

pub fn print_overview(overview: &Overview) {
    let summary = &overview.summary;
    if summary.total_events == 0 && summary.recent_events.is_empty() {
        println!("{}", NO_DASHBOARD_DATA.dimmed());
        return;
    }

    println!("{}", "📊 Usage overview".bold());
    println!("  Total events: {}", summary.total_events.to_string().bold());
    println!("  Companies: {}", summary.unique_companies);
    println!("  Event types: {}", summary.event_types.len());
    match overview.top_event_type() {
        Some((name, count)) => println!("  Top event type: {name} ({count})"),
        None => println!("  Top event type: -"),
    }
    if let (Some(start), Some(end)) = (summary.time_range.start, summary.time_range.end) {
        println!(
            "  Time range: {} → {}",
            format_timestamp(&start),
            format_timestamp(&end)
        );
    }

    println!();
    println!("{}", "Event types".bold());
    if summary.event_types.is_empty() {
        println!("  {}", NO_EVENT_TYPES.dimmed());
    }
    for (name, count) in &summary.event_types {
        println!("  {name:<24} {count:>8}");
    }

    println!();
    println!("{}", "Daily activity".bold());
    if summary.time_series_data.is_empty() {
        println!("  {}", NO_TIME_SERIES.dimmed());
    }
    for point in &summary.time_series_data {
        println!("  {:<12} {:>8}", point.date, point.count);
    }

    println!();
    println!("{}", "Top companies".bold());
    if summary.top_companies.is_empty() {
        println!("  {}", NO_COMPANIES.dimmed());
    }
    for company in &summary.top_companies {
        println!(
            "  {:<24} {:>8}  last activity {}",
            company.company_id, company.event_count, company.last_activity
        );
    }

    println!();
    println!("{}", "Recent events".bold());
    if summary.recent_events.is_empty() {
        println!("  {}", NO_RECENT_EVENTS.dimmed());
    }
    for event in &summary.recent_events {
        print_event(event, None);
    }

    let filters = &overview.available_filters;
    if !filters.date_range.min.is_empty() {
        println!();
        println!(
            "Data spans {} to {}",
            filters.date_range.min, filters.date_range.max
        );
    }
}

pub fn print_event(event: &UsageEvent, search: Option<&str>) {
    let content = highlight_matches(&event.content, search, |hit| {
        hit.black().on_yellow().to_string()
    });
    println!(
        "  {} {}  {}  {}",
        format!("[{}]", event.event_type).cyan(),
        format_timestamp(&event.created_at).dimmed(),
        event.company_id.bold(),
        content
    );
    if event.has_value() {
        println!("      {} = {}", event.attribute, event.value);
    }
}

/// Header line followed by the events of the current page.
pub fn print_results(snapshot: &SearchSnapshot) {
    let header = results_header(snapshot);
    if snapshot.error.is_some() {
        println!("{} {}", "⚠".yellow(), header.red());
    } else {
        println!("{}", header.bold());
    }

    let Some(results) = &snapshot.results else {
        return;
    };
    if results.events.is_empty() {
        println!("  {}", NO_RESULTS.dimmed());
        return;
    }
    for event in &results.events {
        print_event(event, snapshot.debounced_search.as_deref());
    }
}

pub fn print_filters(snapshot: &SearchSnapshot) {
    let filters = &snapshot.filters;
    println!("{}", "Filters".bold());
    println!(
        "  Dates: {} → {}",
        filters.start_date.as_deref().unwrap_or("-"),
        filters.end_date.as_deref().unwrap_or("-")
    );
    println!(
        "  Companies: {}",
        selection_label(filters.company_ids.as_deref(), ALL_COMPANIES)
    );
    println!(
        "  Event types: {}",
        selection_label(filters.event_types.as_deref(), ALL_EVENT_TYPES)
    );
    println!(
        "  Search: {}",
        filters.search_text.as_deref().unwrap_or("-")
    );
    println!(
        "  Page: limit {} offset {}",
        filters.page_size(),
        filters.offset()
    );
}

pub fn print_export(file: &ExportFile, path: &Path, records: Option<usize>) {
    let detail = match records {
        Some(count) => format!("{count} records, {} bytes", file.len()),
        None => format!("{} bytes", file.len()),
    };
    println!(
        "{} {} ({detail})",
        "✔ Exported to".green().bold(),
        path.display()
    );
}

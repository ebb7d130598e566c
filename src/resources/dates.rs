//! Important dates (calendar events)

use chrono::{DateTime, Utc};
use placetrack_protocol::{EventType, ImportantDate, ImportantDateDraft};

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;
use crate::resource::{contains_ci, Filter, Resource};

impl Resource for ImportantDate {
    type Draft = ImportantDateDraft;
    const COLLECTION: &'static str = "/important-dates/";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Upcoming/past split relative to a fixed reference instant. The instant
/// is part of the filter state so filtering stays a pure function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Upcoming,
    Past,
}

/// Client-side filter state for the events list.
#[derive(Debug, Clone, Default)]
pub struct DateFilter {
    pub search: String,
    pub event_type: Option<EventType>,
    pub window: Option<(DateWindow, DateTime<Utc>)>,
}

impl Filter<ImportantDate> for DateFilter {
    fn matches(&self, event: &ImportantDate) -> bool {
        let matches_search = self.search.is_empty()
            || contains_ci(&event.title, &self.search)
            || contains_ci(&event.description, &self.search);

        let matches_type = self.event_type.map_or(true, |t| event.event_type == t);

        let matches_window = self.window.map_or(true, |(window, reference)| match window {
            DateWindow::Upcoming => event.event_date > reference,
            DateWindow::Past => event.event_date <= reference,
        });

        matches_search && matches_type && matches_window
    }
}

/// Server-side upcoming listing.
pub async fn upcoming<C: ApiClient>(client: &C) -> Result<Vec<ImportantDate>> {
    fetch_list(client, "/important-dates/upcoming/").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::apply_filters;
    use chrono::TimeZone;

    fn event(id: i64, title: &str, kind: EventType, when: DateTime<Utc>) -> ImportantDate {
        ImportantDate {
            id,
            title: title.to_string(),
            description: String::new(),
            event_type: kind,
            company: None,
            event_date: when,
            location: String::new(),
            link: String::new(),
            is_active: true,
            company_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn window_split_is_relative_to_reference() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let events = vec![
            event(1, "Past drive", EventType::Drive, reference - chrono::Duration::days(3)),
            event(2, "Future test", EventType::Test, reference + chrono::Duration::days(3)),
        ];

        let upcoming = DateFilter {
            window: Some((DateWindow::Upcoming, reference)),
            ..Default::default()
        };
        assert_eq!(apply_filters(&events, &upcoming)[0].id, 2);

        let past = DateFilter {
            window: Some((DateWindow::Past, reference)),
            ..Default::default()
        };
        assert_eq!(apply_filters(&events, &past)[0].id, 1);
    }

    #[test]
    fn type_filter_and_search() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let events = vec![
            event(1, "Nimbus aptitude test", EventType::Test, reference),
            event(2, "Result announcement", EventType::Result, reference),
        ];

        let tests_only = DateFilter {
            event_type: Some(EventType::Test),
            ..Default::default()
        };
        assert_eq!(apply_filters(&events, &tests_only)[0].id, 1);

        let search = DateFilter {
            search: "RESULT".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&events, &search)[0].id, 2);
    }
}

//! Role-specific dashboard aggregation
//!
//! Composes the placement, company and event collections into the two
//! summary views: per-student KPIs and the admin statistics overview.
//! All data is pulled fresh on entry; nothing here subscribes to updates.

use chrono::{DateTime, Utc};

use placetrack_protocol::{Company, ImportantDate, PlacementRecord, PlacementStatistics};

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;
use crate::resources::{companies, progress};

/// KPI summary for the signed-in student.
#[derive(Debug)]
pub struct StudentDashboard {
    pub applications: usize,
    pub selected: usize,
    pub pending: usize,
    pub my_placements: Vec<PlacementRecord>,
    pub open_companies: Vec<Company>,
    pub upcoming_events: Vec<ImportantDate>,
}

/// Statistics overview for admins.
#[derive(Debug)]
pub struct AdminDashboard {
    pub statistics: PlacementStatistics,
    pub recent: Vec<PlacementRecord>,
    pub upcoming_events: Vec<ImportantDate>,
}

/// Application counts: (total, selected-or-accepted, still-pending).
pub fn summarize_applications(records: &[PlacementRecord]) -> (usize, usize, usize) {
    let selected = records.iter().filter(|r| r.status.is_success()).count();
    let pending = records.iter().filter(|r| r.status.is_pending()).count();
    (records.len(), selected, pending)
}

/// Active events strictly after the reference instant, soonest first.
pub fn upcoming_active(events: Vec<ImportantDate>, now: DateTime<Utc>) -> Vec<ImportantDate> {
    let mut upcoming: Vec<ImportantDate> = events
        .into_iter()
        .filter(|e| e.is_active && e.event_date > now)
        .collect();
    upcoming.sort_by_key(|e| e.event_date);
    upcoming
}

pub async fn student_dashboard<C: ApiClient>(
    client: &C,
    now: DateTime<Utc>,
) -> Result<StudentDashboard> {
    let my_placements: Vec<PlacementRecord> = fetch_list(client, progress::MY_PROGRESS).await?;
    let open_companies = companies::active_companies(client).await?;
    let events: Vec<ImportantDate> = fetch_list(client, "/important-dates/").await?;

    let (applications, selected, pending) = summarize_applications(&my_placements);
    let upcoming_events = upcoming_active(events, now);

    Ok(StudentDashboard {
        applications,
        selected,
        pending,
        my_placements,
        open_companies,
        upcoming_events,
    })
}

pub async fn admin_dashboard<C: ApiClient>(
    client: &C,
    now: DateTime<Utc>,
) -> Result<AdminDashboard> {
    let statistics = progress::statistics(client).await?;
    let recent = progress::recent_updates(client).await?;
    let events: Vec<ImportantDate> = fetch_list(client, "/important-dates/").await?;

    Ok(AdminDashboard {
        statistics,
        recent,
        upcoming_events: upcoming_active(events, now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use placetrack_protocol::{EventType, PlacementStatus};

    fn record(id: i64, status: PlacementStatus) -> PlacementRecord {
        PlacementRecord {
            id,
            student: 1,
            company: id,
            current_stage: None,
            status,
            application_date: None,
            notes: String::new(),
            student_name: None,
            student_enrollment: None,
            company_name: None,
            current_stage_name: None,
            status_display: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn kpi_counts_by_status_family() {
        let records = vec![
            record(1, PlacementStatus::Applied),
            record(2, PlacementStatus::InProgress),
            record(3, PlacementStatus::Selected),
            record(4, PlacementStatus::OfferAccepted),
            record(5, PlacementStatus::Rejected),
        ];
        let (total, selected, pending) = summarize_applications(&records);
        assert_eq!(total, 5);
        assert_eq!(selected, 2);
        assert_eq!(pending, 2);
    }

    #[test]
    fn upcoming_drops_past_and_inactive_and_sorts() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mk = |id: i64, days: i64, active: bool| ImportantDate {
            id,
            title: format!("event-{}", id),
            description: String::new(),
            event_type: EventType::Drive,
            company: None,
            event_date: now + chrono::Duration::days(days),
            location: String::new(),
            link: String::new(),
            is_active: active,
            company_name: None,
            created_at: None,
            updated_at: None,
        };

        let events = vec![mk(1, -2, true), mk(2, 5, true), mk(3, 1, true), mk(4, 3, false)];
        let upcoming = upcoming_active(events, now);
        let ids: Vec<i64> = upcoming.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}

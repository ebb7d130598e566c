//! Placement progress operations

use placetrack_protocol::{PlacementDraft, PlacementRecord, PlacementStatistics, PlacementStatus};

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;
use crate::resource::{contains_ci, Filter, Resource};

impl Resource for PlacementRecord {
    type Draft = PlacementDraft;
    const COLLECTION: &'static str = "/placement-progress/";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Student-scoped variant of the collection; admins get everything, a
/// student only their own records.
pub const MY_PROGRESS: &str = "/placement-progress/my_progress/";

/// Client-side filter state for placement records. Search runs over the
/// joined display fields; records without them simply don't match a
/// non-empty search.
#[derive(Debug, Clone, Default)]
pub struct ProgressFilter {
    pub search: String,
    pub status: Option<PlacementStatus>,
}

impl Filter<PlacementRecord> for ProgressFilter {
    fn matches(&self, record: &PlacementRecord) -> bool {
        let matches_search = self.search.is_empty()
            || [
                record.student_name.as_deref(),
                record.company_name.as_deref(),
                record.student_enrollment.as_deref(),
            ]
            .iter()
            .any(|field| field.map_or(false, |f| contains_ci(f, &self.search)));

        let matches_status = self.status.map_or(true, |s| record.status == s);

        matches_search && matches_status
    }
}

pub async fn statistics<C: ApiClient>(client: &C) -> Result<PlacementStatistics> {
    client
        .request(reqwest::Method::GET, "/placement-progress/statistics/", None::<&()>)
        .await
}

/// Ten most recently updated records.
pub async fn recent_updates<C: ApiClient>(client: &C) -> Result<Vec<PlacementRecord>> {
    fetch_list(client, "/placement-progress/recent_updates/").await
}

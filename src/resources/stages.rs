//! Selection-process stage catalogue and per-application stage results

use placetrack_protocol::{PlacementStage, StageProgress, StageProgressDraft};

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;
use crate::resource::Resource;

impl Resource for StageProgress {
    type Draft = StageProgressDraft;
    const COLLECTION: &'static str = "/stage-progress/";

    fn id(&self) -> i64 {
        self.id
    }
}

/// The stage catalogue, ordered by sequence on the backend.
pub async fn stages<C: ApiClient>(client: &C) -> Result<Vec<PlacementStage>> {
    fetch_list(client, "/stages/").await
}

pub async fn stage_progress<C: ApiClient>(client: &C) -> Result<Vec<StageProgress>> {
    fetch_list(client, "/stage-progress/").await
}

//! Generic resource list controller
//!
//! Every CRUD family (students, companies, placement records, events,
//! users) runs the same interaction loop: fetch the collection, filter it
//! client-side, stage a draft, submit, refetch. This module holds that loop
//! once, parameterized by a `Resource` binding and an `ApiClient`.

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;

/// Binding of an entity family to its REST collection.
pub trait Resource: DeserializeOwned + Clone {
    /// The editable staging payload sent on create/update.
    type Draft: Serialize + Sync;

    /// Collection path, e.g. `/students/`.
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    fn detail_path(id: i64) -> String {
        format!("{}{}/", Self::COLLECTION, id)
    }
}

/// Client-side filter over one resource family. Implementations must be
/// pure: same filter + same item always gives the same answer.
pub trait Filter<R> {
    fn matches(&self, item: &R) -> bool;
}

/// Apply a filter, preserving the original order. Filtering is idempotent
/// and an all-pass filter returns the collection unchanged.
pub fn apply_filters<'a, R, F: Filter<R>>(items: &'a [R], filter: &F) -> Vec<&'a R> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Case-insensitive containment, the match rule for every search box.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// What a successful submit did.
#[derive(Debug)]
pub enum SubmitOutcome<R> {
    Created(R),
    Updated(R),
}

impl<R> SubmitOutcome<R> {
    pub fn record(&self) -> &R {
        match self {
            SubmitOutcome::Created(r) | SubmitOutcome::Updated(r) => r,
        }
    }
}

/// Cached collection plus the create/edit interaction state.
///
/// `load` replaces the cache wholesale. Each load carries a monotonically
/// increasing generation; a response belonging to a superseded generation
/// is discarded instead of overwriting newer data.
#[derive(Debug)]
pub struct ListController<R: Resource, C: ApiClient> {
    client: Arc<C>,
    items: Vec<R>,
    generation: u64,
    edit_id: Option<i64>,
}

impl<R: Resource, C: ApiClient> ListController<R, C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            items: Vec::new(),
            generation: 0,
            edit_id: None,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: i64) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Fetch the default collection.
    pub async fn load(&mut self) -> Result<usize> {
        self.load_from(R::COLLECTION).await
    }

    /// Fetch from an alternate endpoint (scoped variants like `mine`).
    pub async fn load_from(&mut self, endpoint: &str) -> Result<usize> {
        let generation = self.begin_load();
        let items = fetch_list(self.client.as_ref(), endpoint).await?;
        self.finish_load(generation, items);
        Ok(self.items.len())
    }

    /// Issue a new request generation.
    pub(crate) fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply a completed fetch unless a newer load was issued meanwhile.
    /// Returns whether the response was applied.
    pub(crate) fn finish_load(&mut self, generation: u64, items: Vec<R>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                latest = self.generation,
                "discarding stale collection response"
            );
            return false;
        }
        self.items = items;
        true
    }

    /// Start editing an existing entity; returns it so the caller can copy
    /// its fields into a draft.
    pub fn begin_edit(&mut self, id: i64) -> Option<&R> {
        if self.items.iter().any(|item| item.id() == id) {
            self.edit_id = Some(id);
            self.find(id)
        } else {
            None
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_id = None;
    }

    pub fn editing(&self) -> Option<i64> {
        self.edit_id
    }

    /// Create or update from a draft, then refetch.
    ///
    /// The mutation settles before its own refetch starts; the two never
    /// overlap. On failure the edit state is left intact so the caller can
    /// correct the draft and resubmit.
    pub async fn submit(&mut self, draft: &R::Draft) -> Result<SubmitOutcome<R>> {
        let outcome = match self.edit_id {
            Some(id) => {
                let saved: R = self
                    .client
                    .request(Method::PUT, &R::detail_path(id), Some(draft))
                    .await?;
                SubmitOutcome::Updated(saved)
            }
            None => {
                let saved: R = self
                    .client
                    .request(Method::POST, R::COLLECTION, Some(draft))
                    .await?;
                SubmitOutcome::Created(saved)
            }
        };

        self.edit_id = None;
        self.load().await?;
        Ok(outcome)
    }

    /// Delete by id, then refetch. Confirmation is the caller's job and
    /// must happen before this is invoked; on failure the cached list is
    /// left as-is.
    pub async fn remove(&mut self, id: i64) -> Result<()> {
        self.client
            .execute(Method::DELETE, &R::detail_path(id), None::<&()>)
            .await?;
        self.load().await?;
        Ok(())
    }
}

/// A value that can be observed exactly once.
///
/// Used for generated credentials: after `consume`, the value is gone from
/// every retained state, not just hidden.
#[derive(Debug)]
pub struct OneShot<T> {
    value: Option<T>,
}

impl<T> OneShot<T> {
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Take the value. Subsequent calls get nothing.
    pub fn consume(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn is_consumed(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_yields_exactly_once() {
        let mut secret = OneShot::new("asha1042".to_string());
        assert!(!secret.is_consumed());
        assert_eq!(secret.consume().as_deref(), Some("asha1042"));
        assert!(secret.is_consumed());
        assert_eq!(secret.consume(), None);
    }

    #[test]
    fn contains_ci_ignores_case() {
        assert!(contains_ci("Asha Verma", "verma"));
        assert!(contains_ci("CS2021042", "cs2021"));
        assert!(!contains_ci("Asha", "verma"));
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::{FilterCriteria, Report, ReportScope};
use crate::features::reports::view::ReportView;
use crate::modules::platform::ReportBackend;
use crate::shared::constants::MAX_BULK_DELETE;
use crate::shared::types::PaginationQuery;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ViewKey {
    user: String,
    scope: ReportScope,
}

#[derive(Debug, Default)]
struct ViewSlot {
    view: ReportView,
    fetched_at: Option<Instant>,
}

impl ViewSlot {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.map_or(true, |at| at.elapsed() >= ttl)
    }
}

/// How many TTLs a view may sit unused before it is dropped, unless configured
const DEFAULT_IDLE_TTLS: u32 = 10;

struct SlotEntry {
    slot: Arc<Mutex<ViewSlot>>,
    /// Milliseconds since the service's epoch
    last_used: AtomicU64,
}

impl SlotEntry {
    fn new(now_ms: u64) -> Self {
        Self {
            slot: Arc::default(),
            last_used: AtomicU64::new(now_ms),
        }
    }

    fn touch(&self, now_ms: u64) {
        self.last_used.fetch_max(now_ms, Ordering::Relaxed);
    }

    /// Unused for `idle_ms` and not held by any in-flight request
    fn is_idle(&self, now_ms: u64, idle_ms: u64) -> bool {
        Arc::strong_count(&self.slot) == 1
            && now_ms.saturating_sub(self.last_used.load(Ordering::Relaxed)) >= idle_ms
    }
}

/// One page of a derived view
#[derive(Debug)]
pub struct ViewPage {
    pub items: Vec<Report>,
    pub total_items: usize,
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelete {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDelete>,
}

/// Per-user report views kept in memory between requests.
///
/// Each (user, scope) pair has its own slot behind its own mutex, so fetches
/// for one view are serialised while other views proceed independently. The
/// outer map lock is only held long enough to look up or insert a slot.
/// Slots left unused longer than the idle bound are dropped whenever a new
/// slot is created.
pub struct ReportViewService {
    backend: Arc<dyn ReportBackend>,
    ttl: Duration,
    idle_after: Duration,
    epoch: Instant,
    views: RwLock<HashMap<ViewKey, SlotEntry>>,
}

impl ReportViewService {
    pub fn new(backend: Arc<dyn ReportBackend>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            idle_after: ttl.saturating_mul(DEFAULT_IDLE_TTLS),
            epoch: Instant::now(),
            views: RwLock::new(HashMap::new()),
        }
    }

    pub fn evict_idle_after(mut self, idle_after: Duration) -> Self {
        self.idle_after = idle_after;
        self
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    async fn slot(&self, user: &AuthenticatedUser, scope: ReportScope) -> Arc<Mutex<ViewSlot>> {
        let key = ViewKey {
            user: user.sub.clone(),
            scope,
        };
        let now = self.now_ms();

        if let Some(entry) = self.views.read().await.get(&key) {
            entry.touch(now);
            return Arc::clone(&entry.slot);
        }

        let idle_ms = u64::try_from(self.idle_after.as_millis()).unwrap_or(u64::MAX);
        let mut views = self.views.write().await;
        let before = views.len();
        views.retain(|_, entry| !entry.is_idle(now, idle_ms));
        if views.len() < before {
            tracing::debug!("Evicted {} idle report views", before - views.len());
        }

        let entry = views.entry(key).or_insert_with(|| SlotEntry::new(now));
        entry.touch(now);
        Arc::clone(&entry.slot)
    }

    #[cfg(test)]
    async fn cached_views(&self) -> usize {
        self.views.read().await.len()
    }

    /// Slots matching `filter`, collected so no slot is locked under the map lock
    async fn slots_where<F>(&self, filter: F) -> Vec<(ReportScope, Arc<Mutex<ViewSlot>>)>
    where
        F: Fn(&ViewKey) -> bool,
    {
        self.views
            .read()
            .await
            .iter()
            .filter(|(key, _)| filter(key))
            .map(|(key, entry)| (key.scope, Arc::clone(&entry.slot)))
            .collect()
    }

    async fn fetch(
        &self,
        slot: &mut ViewSlot,
        user: &AuthenticatedUser,
        scope: ReportScope,
    ) -> Result<()> {
        let reports = self
            .backend
            .list_reports(user.access_token(), scope)
            .await?;

        tracing::info!(
            "Fetched {} '{}' reports for user {}",
            reports.len(),
            scope,
            user.sub
        );

        slot.view.replace_collection(reports);
        slot.fetched_at = Some(Instant::now());
        Ok(())
    }

    async fn ensure_loaded(
        &self,
        slot: &mut ViewSlot,
        user: &AuthenticatedUser,
        scope: ReportScope,
    ) -> Result<()> {
        if slot.fetched_at.is_none() {
            self.fetch(slot, user, scope).await?;
        }
        Ok(())
    }

    /// Filtered, sorted and paginated view.
    ///
    /// The collection is re-fetched when the caller asks for it or when it is
    /// older than the configured TTL.
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        scope: ReportScope,
        criteria: FilterCriteria,
        pagination: &PaginationQuery,
        refresh: bool,
    ) -> Result<ViewPage> {
        scope.authorize(user)?;

        let handle = self.slot(user, scope).await;
        let mut slot = handle.lock().await;

        if refresh || slot.is_expired(self.ttl) {
            self.fetch(&mut slot, user, scope).await?;
        }

        if slot.view.set_criteria(criteria) {
            tracing::debug!("Criteria changed for '{}' view of {}", scope, user.sub);
        }

        let (items, total_items) = slot.view.page(pagination);
        Ok(ViewPage {
            items,
            total_items,
            selected: slot.view.selection().ids().to_vec(),
        })
    }

    /// Force a re-fetch. Returns the collection size.
    pub async fn refresh(&self, user: &AuthenticatedUser, scope: ReportScope) -> Result<usize> {
        scope.authorize(user)?;

        let handle = self.slot(user, scope).await;
        let mut slot = handle.lock().await;
        self.fetch(&mut slot, user, scope).await?;
        Ok(slot.view.collection().len())
    }

    pub async fn selection(
        &self,
        user: &AuthenticatedUser,
        scope: ReportScope,
    ) -> Result<Vec<String>> {
        scope.authorize(user)?;

        let handle = self.slot(user, scope).await;
        let mut slot = handle.lock().await;
        self.ensure_loaded(&mut slot, user, scope).await?;
        Ok(slot.view.selection().ids().to_vec())
    }

    /// Toggle one id. Returns whether it is now selected plus the full selection.
    pub async fn toggle_selection(
        &self,
        user: &AuthenticatedUser,
        scope: ReportScope,
        id: &str,
    ) -> Result<(bool, Vec<String>)> {
        scope.authorize(user)?;

        let handle = self.slot(user, scope).await;
        let mut slot = handle.lock().await;
        self.ensure_loaded(&mut slot, user, scope).await?;

        let selected = slot.view.toggle(id).ok_or_else(|| {
            AppError::NotFound(format!("Report {} is not in the '{}' list", id, scope))
        })?;

        Ok((selected, slot.view.selection().ids().to_vec()))
    }

    pub async fn clear_selection(&self, user: &AuthenticatedUser, scope: ReportScope) -> Result<()> {
        scope.authorize(user)?;

        let handle = self.slot(user, scope).await;
        handle.lock().await.view.clear_selection();
        Ok(())
    }

    /// Delete every selected report on the platform.
    ///
    /// Only ids the platform confirmed are dropped from the views. The selection
    /// is cleared either way; when anything failed the view is re-fetched so it
    /// matches the platform again.
    pub async fn bulk_delete(
        &self,
        user: &AuthenticatedUser,
        scope: ReportScope,
    ) -> Result<BulkDeleteOutcome> {
        scope.authorize(user)?;

        let handle = self.slot(user, scope).await;
        let outcome = {
            let mut slot = handle.lock().await;
            self.ensure_loaded(&mut slot, user, scope).await?;

            let ids = slot.view.selection().ids().to_vec();
            if ids.is_empty() {
                return Err(AppError::BadRequest("No reports selected".to_string()));
            }
            if ids.len() > MAX_BULK_DELETE {
                return Err(AppError::BadRequest(format!(
                    "Cannot delete more than {} reports at once",
                    MAX_BULK_DELETE
                )));
            }

            let results = join_all(
                ids.iter()
                    .map(|id| self.backend.delete_report(user.access_token(), id)),
            )
            .await;

            let mut outcome = BulkDeleteOutcome::default();
            for (id, result) in ids.into_iter().zip(results) {
                match result {
                    Ok(()) => outcome.deleted.push(id),
                    Err(e) => {
                        tracing::warn!("Bulk delete of report {} failed: {}", id, e);
                        outcome.failed.push(FailedDelete {
                            id,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            slot.view.remove(&outcome.deleted);
            slot.view.clear_selection();

            if !outcome.failed.is_empty() {
                if let Err(e) = self.fetch(&mut slot, user, scope).await {
                    tracing::warn!("Re-fetch after partial bulk delete failed: {}", e);
                    slot.fetched_at = None;
                }
            }

            outcome
        };

        tracing::info!(
            "Bulk delete by {}: {} deleted, {} failed",
            user.sub,
            outcome.deleted.len(),
            outcome.failed.len()
        );

        self.forget_everywhere(&outcome.deleted).await;
        Ok(outcome)
    }

    /// Delete one report. Views change only after the platform confirms.
    pub async fn delete_report(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        match self.backend.delete_report(user.access_token(), id).await {
            Ok(()) => {
                tracing::info!("Report {} deleted by {}", id, user.sub);
                self.forget_everywhere(&[id.to_string()]).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Delete of report {} failed: {}", id, e);
                self.refetch_views_containing(user, id).await;
                Err(e)
            }
        }
    }

    /// Drop deleted reports from every cached view
    pub async fn forget_everywhere(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        for (_, slot) in self.slots_where(|_| true).await {
            slot.lock().await.view.remove(ids);
        }
    }

    /// Replace an updated report in every cached view that holds it
    pub async fn upsert_everywhere(&self, report: &Report) {
        for (_, slot) in self.slots_where(|_| true).await {
            slot.lock().await.view.upsert(report);
        }
    }

    async fn refetch_views_containing(&self, user: &AuthenticatedUser, id: &str) {
        for (scope, slot) in self.slots_where(|key| key.user == user.sub).await {
            let mut slot = slot.lock().await;
            if !slot.view.contains(id) {
                continue;
            }
            if let Err(e) = self.fetch(&mut slot, user, scope).await {
                tracing::warn!("Re-fetch of '{}' view failed: {}", scope, e);
                slot.fetched_at = None;
            }
        }
    }
}

//! Delegation index
//!
//! Holds the last successfully collected delegator list with its derived
//! totals. A failed refresh is logged and leaves the previous snapshot in
//! place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::breakdown::{
    delegators_chart, delegators_for, project_totals, totals_chart, Delegator, DelegatorAccount,
    PieChart, ProjectDelegation,
};
use super::error::DelegationResult;
use super::source::{collect_all, DelegationSource};

/// Collected accounts plus derived project totals
#[derive(Debug, Clone)]
pub struct DelegationSnapshot {
    pub accounts: Vec<DelegatorAccount>,
    pub totals: Vec<ProjectDelegation>,
    pub fetched_at: DateTime<Utc>,
}

impl DelegationSnapshot {
    pub fn new(accounts: Vec<DelegatorAccount>) -> Self {
        let totals = project_totals(&accounts);
        Self {
            accounts,
            totals,
            fetched_at: Utc::now(),
        }
    }

    /// First project in the totals, the default selection
    pub fn default_project(&self) -> Option<&str> {
        self.totals.first().map(|t| t.project_id.as_str())
    }
}

/// Everything the delegation panel draws
#[derive(Debug, Clone, Serialize)]
pub struct DelegationView {
    pub projects: Vec<ProjectDelegation>,
    pub selected: Option<String>,
    pub totals_chart: PieChart,
    pub delegators: Vec<Delegator>,
    pub delegators_chart: PieChart,
    pub fetched_at: DateTime<Utc>,
}

pub struct DelegationIndex {
    source: Arc<dyn DelegationSource>,
    snapshot: RwLock<Option<DelegationSnapshot>>,
}

impl DelegationIndex {
    pub fn new(source: Arc<dyn DelegationSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
        }
    }

    /// Collect every page and replace the snapshot.
    ///
    /// Returns the number of accounts collected.
    pub async fn refresh(&self) -> DelegationResult<usize> {
        match collect_all(self.source.as_ref()).await {
            Ok(accounts) => {
                let snapshot = DelegationSnapshot::new(accounts);
                let count = snapshot.accounts.len();
                tracing::info!(
                    accounts = count,
                    projects = snapshot.totals.len(),
                    "Delegation snapshot refreshed"
                );
                *self.snapshot.write().await = Some(snapshot);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Delegation refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    pub async fn snapshot(&self) -> Option<DelegationSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Build the panel for `project`, or the default project when `None`.
    ///
    /// Returns `None` until the first successful refresh.
    pub async fn view(&self, project: Option<&str>) -> Option<DelegationView> {
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;

        let selected = project
            .map(str::to_string)
            .or_else(|| snapshot.default_project().map(str::to_string));

        let delegators = selected
            .as_deref()
            .map(|p| delegators_for(&snapshot.accounts, p))
            .unwrap_or_default();

        Some(DelegationView {
            totals_chart: totals_chart(&snapshot.totals),
            projects: snapshot.totals.clone(),
            selected,
            delegators_chart: delegators_chart(&delegators),
            delegators,
            fetched_at: snapshot.fetched_at,
        })
    }
}

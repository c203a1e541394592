//! Delegation Breakdown
//!
//! Which projects wallets delegate to, and how much:
//!
//! - **breakdown**: Per-project totals, delegator lists, pie charts
//! - **source**: Paged delegator collaborator
//! - **index**: Last good snapshot and panel views

mod breakdown;
mod error;
mod index;
mod source;

pub use breakdown::{
    delegators_chart, delegators_for, project_totals, totals_chart, truncate_address,
    DelegationPreference, Delegator, DelegatorAccount, PieChart, ProjectDelegation,
    WINSTON_PER_AR,
};
pub use error::{DelegationError, DelegationResult};
pub use index::{DelegationIndex, DelegationSnapshot, DelegationView};
pub use source::{collect_all, DelegationPage, DelegationSource, HttpDelegationSource};

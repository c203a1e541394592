//! Delegation breakdown
//!
//! Pure transforms from delegator accounts to per-project totals and the
//! pie-chart shapes the dashboard draws.

use serde::{Deserialize, Serialize};

/// Winston per AR
pub const WINSTON_PER_AR: f64 = 1_000_000_000_000.0;

/// Share of a wallet's balance delegated to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationPreference {
    #[serde(alias = "wallet_to")]
    pub wallet_to: String,
    pub factor: f64,
}

/// A delegating wallet with its balance (winston) and preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegatorAccount {
    pub wallet: String,
    pub balance: f64,
    #[serde(default, alias = "delegation_prefs")]
    pub delegation_prefs: Vec<DelegationPreference>,
}

impl DelegatorAccount {
    pub fn delegates_to(&self, project_id: &str) -> bool {
        self.delegation_prefs
            .iter()
            .any(|p| p.wallet_to == project_id)
    }
}

/// Total delegated to one project, in AR
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDelegation {
    pub project_id: String,
    pub amount: f64,
}

/// A delegator of one project, balance in AR
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delegator {
    pub wallet: String,
    pub balance: f64,
}

/// Labels and values for a pie chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PieChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Sum `factor * balance / 1e12` per target project.
///
/// Projects appear in the order they are first seen.
pub fn project_totals(accounts: &[DelegatorAccount]) -> Vec<ProjectDelegation> {
    let mut totals: Vec<ProjectDelegation> = Vec::new();

    for account in accounts {
        for pref in &account.delegation_prefs {
            let amount = pref.factor * account.balance / WINSTON_PER_AR;

            match totals.iter_mut().find(|t| t.project_id == pref.wallet_to) {
                Some(total) => total.amount += amount,
                None => totals.push(ProjectDelegation {
                    project_id: pref.wallet_to.clone(),
                    amount,
                }),
            }
        }
    }

    totals
}

/// Accounts delegating any share to `project_id`
pub fn delegators_for(accounts: &[DelegatorAccount], project_id: &str) -> Vec<Delegator> {
    accounts
        .iter()
        .filter(|a| a.delegates_to(project_id))
        .map(|a| Delegator {
            wallet: a.wallet.clone(),
            balance: a.balance / WINSTON_PER_AR,
        })
        .collect()
}

/// Shorten an address to `abcdef...wxyz`
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Pie of totals per project. Non-finite amounts are drawn as zero.
pub fn totals_chart(totals: &[ProjectDelegation]) -> PieChart {
    PieChart {
        labels: totals
            .iter()
            .map(|t| truncate_address(&t.project_id))
            .collect(),
        values: totals
            .iter()
            .map(|t| if t.amount.is_finite() { t.amount } else { 0.0 })
            .collect(),
    }
}

/// Pie of delegator balances for one project
pub fn delegators_chart(delegators: &[Delegator]) -> PieChart {
    PieChart {
        labels: delegators
            .iter()
            .map(|d| truncate_address(&d.wallet))
            .collect(),
        values: delegators.iter().map(|d| d.balance).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(wallet: &str, balance: f64, prefs: &[(&str, f64)]) -> DelegatorAccount {
        DelegatorAccount {
            wallet: wallet.to_string(),
            balance,
            delegation_prefs: prefs
                .iter()
                .map(|(to, factor)| DelegationPreference {
                    wallet_to: to.to_string(),
                    factor: *factor,
                })
                .collect(),
        }
    }

    #[test]
    fn test_project_totals() {
        let accounts = vec![
            account("w1", 2.0 * WINSTON_PER_AR, &[("proj-b", 0.5), ("proj-a", 0.5)]),
            account("w2", 4.0 * WINSTON_PER_AR, &[("proj-a", 1.0)]),
        ];

        let totals = project_totals(&accounts);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].project_id, "proj-b");
        assert_eq!(totals[0].amount, 1.0);
        assert_eq!(totals[1].project_id, "proj-a");
        assert_eq!(totals[1].amount, 5.0);
    }

    #[test]
    fn test_project_totals_empty() {
        assert!(project_totals(&[]).is_empty());
        assert!(project_totals(&[account("w", 10.0, &[])]).is_empty());
    }

    #[test]
    fn test_delegators_for() {
        let accounts = vec![
            account("w1", 3.0 * WINSTON_PER_AR, &[("proj-a", 0.1)]),
            account("w2", 1.0 * WINSTON_PER_AR, &[("proj-b", 1.0)]),
        ];

        let delegators = delegators_for(&accounts, "proj-a");

        assert_eq!(
            delegators,
            vec![Delegator {
                wallet: "w1".to_string(),
                balance: 3.0
            }]
        );
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(
            truncate_address("0123456789abcdefghij"),
            "012345...ghij"
        );
        assert_eq!(truncate_address("abc"), "abc...abc");
        assert_eq!(truncate_address(""), "...");
    }

    #[test]
    fn test_totals_chart_zeroes_nan() {
        let totals = vec![
            ProjectDelegation {
                project_id: "aaaaaaaaaaaa".to_string(),
                amount: f64::NAN,
            },
            ProjectDelegation {
                project_id: "bbbbbbbbbbbb".to_string(),
                amount: 2.5,
            },
        ];

        let chart = totals_chart(&totals);

        assert_eq!(chart.values, vec![0.0, 2.5]);
        assert_eq!(chart.labels[1], "bbbbbb...bbbb");
    }

    #[test]
    fn test_account_deserializes_camel_case() {
        let json = r#"{
            "wallet": "w",
            "balance": 1000000000000,
            "delegationPrefs": [{ "walletTo": "p", "factor": 0.25 }]
        }"#;

        let acc: DelegatorAccount = serde_json::from_str(json).unwrap();
        assert!(acc.delegates_to("p"));
        assert_eq!(acc.delegation_prefs[0].factor, 0.25);
    }
}

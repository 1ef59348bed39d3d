use chrono::{DateTime, Utc};

use crate::types::AccountInfo;

/// Cumulative counters and reward totals for a single account.
///
/// Counters only ever grow for the lifetime of the process; a restart is the
/// only reset. The connected-node aggregates are recomputed from scratch on
/// every `apply_account_info` call.
#[derive(Debug, Clone)]
pub struct AccountStats {
    pub connect_count: u64,
    pub liveness_count: u64,
    pub stats_checks: u64,
    pub total_points: f64,
    pub referral_points: f64,
    pub earnings_total: f64,
    pub connected_nodes_rewards: f64,
    pub connected_nodes_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub started_at: DateTime<Utc>,
}

impl AccountStats {
    pub fn new() -> Self {
        Self {
            connect_count: 0,
            liveness_count: 0,
            stats_checks: 0,
            total_points: 0.0,
            referral_points: 0.0,
            earnings_total: 0.0,
            connected_nodes_rewards: 0.0,
            connected_nodes_count: 0,
            last_updated: None,
            started_at: Utc::now(),
        }
    }

    /// Fold a fresh `/account/web/me` payload into the record.
    ///
    /// Point and earning totals are replaced by the payload's values (absent
    /// fields read as zero). The connected-node aggregates are reset, then
    /// summed over nodes whose status is exactly `"Connected"`; a node without
    /// a usable reward figure still counts as connected but contributes
    /// nothing. Stamps `last_updated`.
    pub fn apply_account_info(&mut self, info: &AccountInfo) {
        self.total_points = info.points.unwrap_or(0.0);
        self.referral_points = info.referral_points.unwrap_or(0.0);
        self.earnings_total = info
            .earnings_total
            .as_ref()
            .and_then(|amount| amount.as_f64())
            .unwrap_or(0.0);

        self.connected_nodes_rewards = 0.0;
        self.connected_nodes_count = 0;
        if let Some(nodes) = &info.network_nodes {
            for node in nodes {
                if node.status.as_deref() == Some("Connected") {
                    self.connected_nodes_rewards += node
                        .total_rewards
                        .as_ref()
                        .and_then(|amount| amount.as_f64())
                        .unwrap_or(0.0);
                    self.connected_nodes_count += 1;
                }
            }
        }

        self.last_updated = Some(Utc::now());
    }

    /// Elapsed time since this record (and the process) started.
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

impl Default for AccountStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountInfo;
    use serde_json::json;

    fn info(value: serde_json::Value) -> AccountInfo {
        serde_json::from_value(value).expect("valid account info JSON")
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sums_rewards_over_connected_nodes_only() {
        let mut stats = AccountStats::new();
        stats.apply_account_info(&info(json!({
            "points": 100,
            "referralPoints": 10,
            "earningsTotal": "5.25",
            "networkNodes": [
                { "status": "Connected", "totalRewards": "1.5" },
                { "status": "Disconnected", "totalRewards": "100" },
                { "status": "Connected", "totalRewards": 2.5 },
                { "status": "connected", "totalRewards": "100" },
            ]
        })));

        assert!(approx_eq(stats.total_points, 100.0));
        assert!(approx_eq(stats.referral_points, 10.0));
        assert!(approx_eq(stats.earnings_total, 5.25));
        assert!(approx_eq(stats.connected_nodes_rewards, 4.0));
        assert_eq!(stats.connected_nodes_count, 2);
        assert!(stats.last_updated.is_some());
    }

    #[test]
    fn aggregates_reset_between_applications() {
        let mut stats = AccountStats::new();
        stats.apply_account_info(&info(json!({
            "networkNodes": [
                { "status": "Connected", "totalRewards": "3.0" },
                { "status": "Connected", "totalRewards": "4.0" },
            ]
        })));
        assert!(approx_eq(stats.connected_nodes_rewards, 7.0));
        assert_eq!(stats.connected_nodes_count, 2);

        // A second payload replaces the aggregates instead of adding to them.
        stats.apply_account_info(&info(json!({
            "networkNodes": [
                { "status": "Connected", "totalRewards": "1.0" },
            ]
        })));
        assert!(approx_eq(stats.connected_nodes_rewards, 1.0));
        assert_eq!(stats.connected_nodes_count, 1);
    }

    #[test]
    fn missing_fields_read_as_zero() {
        let mut stats = AccountStats::new();
        stats.apply_account_info(&info(json!({})));
        assert!(approx_eq(stats.total_points, 0.0));
        assert!(approx_eq(stats.referral_points, 0.0));
        assert!(approx_eq(stats.earnings_total, 0.0));
        assert_eq!(stats.connected_nodes_count, 0);
    }

    #[test]
    fn node_without_reward_counts_but_contributes_nothing() {
        let mut stats = AccountStats::new();
        stats.apply_account_info(&info(json!({
            "networkNodes": [
                { "status": "Connected" },
                { "status": "Connected", "totalRewards": "garbage" },
                { "status": "Connected", "totalRewards": "2.0" },
            ]
        })));
        assert!(approx_eq(stats.connected_nodes_rewards, 2.0));
        assert_eq!(stats.connected_nodes_count, 3);
    }

    #[test]
    fn counters_survive_info_refreshes() {
        let mut stats = AccountStats::new();
        stats.connect_count = 3;
        stats.liveness_count = 12;
        stats.stats_checks = 3;
        stats.apply_account_info(&info(json!({ "points": 1 })));
        assert_eq!(stats.connect_count, 3);
        assert_eq!(stats.liveness_count, 12);
        assert_eq!(stats.stats_checks, 3);
    }
}

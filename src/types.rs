use serde::{Deserialize, Serialize};

/// Response from the public IP lookup: `{"ip":"203.0.113.9"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IpResponse {
    pub ip: String,
}

/// Envelope for `GET /account/web/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    pub data: Option<AccountInfo>,
}

/// Account payload of `/account/web/me`.
///
/// Every field is optional; absence is handled explicitly at the aggregation
/// site rather than coerced to zero during parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub points: Option<f64>,
    pub referral_points: Option<f64>,
    /// Arrives as a decimal string; bare numbers are tolerated too.
    pub earnings_total: Option<Amount>,
    pub network_nodes: Option<Vec<NetworkNode>>,
}

/// One node row of the account payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    pub status: Option<String>,
    pub total_rewards: Option<Amount>,
}

/// A numeric field the API serializes as either a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Num(f64),
    Text(String),
}

impl Amount {
    /// Float value; `None` when a text amount does not parse as one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Num(n) => Some(*n),
            Amount::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Body of `POST /extension/stats` and `POST /extension/liveness`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionPayload<'a> {
    pub extension_id: &'a str,
}

/// Body of `POST /extension/connect`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectPayload<'a> {
    pub ip: &'a str,
    pub extension_id: &'a str,
}

use serde::{Deserialize, Serialize};

/// Vault share token held by a user: a claim on part of one AI vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpPosition {
    pub object_id: String,
    /// Contract model id, e.g. "CLAUDE".
    pub ai_name: String,
    pub display_name: String,
    /// Share amount, 6 decimals like the USDC deposited for it.
    pub shares: f64,
    pub shares_display: String,
    /// Vault in the loaded season this share belongs to, if that season
    /// lists the model.
    pub vault_id: Option<String>,
}

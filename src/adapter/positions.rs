use serde_json::Value;
use tracing::warn;

use crate::adapter::season::{as_u128, vault_id};
use crate::adapter::units::{Token, format_amount, from_base_units};
use crate::adapter::model_display_name;
use crate::models::{LpPosition, Season};

/// Read vault share objects as returned by an owned-objects query. Objects
/// without a model name are skipped; shares are linked to a vault when the
/// loaded season lists their model.
pub fn parse_vault_shares(objects: &[Value], season: Option<&Season>) -> Vec<LpPosition> {
    objects
        .iter()
        .filter_map(|object| {
            let object_id = object.get("objectId").and_then(Value::as_str).unwrap_or_default();
            let fields = object.pointer("/content/fields");

            let Some(ai_name) = fields
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
            else {
                warn!("Skipping vault share {} without a model name", object_id);
                return None;
            };

            let raw_shares = fields
                .and_then(|f| f.get("value"))
                .and_then(as_u128)
                .unwrap_or(0);

            let vault_id = season
                .filter(|season| season.ai_models.iter().any(|m| m.name == ai_name))
                .map(|season| vault_id(season.season_number, ai_name));

            Some(LpPosition {
                object_id: object_id.to_string(),
                ai_name: ai_name.to_string(),
                display_name: model_display_name(ai_name).to_string(),
                shares: from_base_units(raw_shares, Token::Usdc),
                shares_display: format_amount(raw_shares, Token::Usdc),
                vault_id,
            })
        })
        .collect()
}

//! Ads API entity types.
//!
//! Entities pass advertising-domain fields through opaquely; the client
//! never interprets budgets or bids beyond carrying their micro values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Accounts & funding
// ─────────────────────────────────────────────────────────────────────────────

/// An accessible ad account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdAccount {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub approval_status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A funding instrument (payment method).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingInstrument {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub credit_limit_local_micro: Option<i64>,
    #[serde(default)]
    pub funded_amount_local_micro: Option<i64>,
    #[serde(default)]
    pub credit_remaining_local_micro: Option<i64>,
    #[serde(default)]
    pub able_to_fund: Option<bool>,
    #[serde(default)]
    pub deleted: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Campaigns & line items
// ─────────────────────────────────────────────────────────────────────────────

/// A campaign: budget container under one funding instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub funding_instrument_id: Option<String>,
    #[serde(default)]
    pub entity_status: Option<String>,
    #[serde(default)]
    pub daily_budget_amount_local_micro: Option<i64>,
    #[serde(default)]
    pub total_budget_amount_local_micro: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub servable: Option<bool>,
    #[serde(default)]
    pub reasons_not_servable: Vec<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A line item: targeting container with an objective, under a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub placements: Vec<String>,
    #[serde(default)]
    pub entity_status: Option<String>,
    #[serde(default)]
    pub bid_amount_local_micro: Option<i64>,
    #[serde(default)]
    pub automatically_select_bid: Option<bool>,
    #[serde(default)]
    pub bid_type: Option<String>,
    #[serde(default)]
    pub total_budget_amount_local_micro: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub servable: Option<bool>,
    #[serde(default)]
    pub reasons_not_servable: Vec<String>,
    #[serde(default)]
    pub deleted: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Promoted tweets, cards, audiences
// ─────────────────────────────────────────────────────────────────────────────

/// A tweet promoted onto a line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotedTweet {
    pub id: String,
    #[serde(default)]
    pub line_item_id: Option<String>,
    #[serde(default)]
    pub tweet_id: Option<String>,
    #[serde(default)]
    pub entity_status: Option<String>,
    #[serde(default)]
    pub approval_status: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A website card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteCard {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website_title: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub card_uri: Option<String>,
    #[serde(default)]
    pub media_key: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A tailored audience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredAudience {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub audience_type: Option<String>,
    #[serde(default)]
    pub list_type: Option<String>,
    #[serde(default)]
    pub audience_size: Option<i64>,
    #[serde(default)]
    pub targetable: Option<bool>,
    #[serde(default)]
    pub reasons_not_targetable: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Targeting
// ─────────────────────────────────────────────────────────────────────────────

/// Targeting values are strings for most types and numbers for a few
/// discovery endpoints (platforms); both decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TargetingValue {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for TargetingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// A targeting criterion attached to a line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingCriterion {
    pub id: String,
    #[serde(default)]
    pub line_item_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub targeting_type: Option<String>,
    #[serde(default)]
    pub targeting_value: Option<TargetingValue>,
    #[serde(default)]
    pub deleted: bool,
}

/// A location from targeting discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub targeting_value: Option<TargetingValue>,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// An interest from targeting discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingInterest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub targeting_value: Option<TargetingValue>,
    #[serde(default)]
    pub partner_source: Option<String>,
}

/// A conversation topic from targeting discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingConversation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub targeting_value: Option<TargetingValue>,
    #[serde(default)]
    pub topic_type: Option<String>,
    #[serde(default)]
    pub conversation_type: Option<String>,
}

/// A device platform from targeting discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingPlatform {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub targeting_value: Option<TargetingValue>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics
// ─────────────────────────────────────────────────────────────────────────────

/// Entity kinds the stats endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsEntity {
    Campaign,
    LineItem,
    PromotedTweet,
}

impl StatsEntity {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Campaign => "CAMPAIGN",
            Self::LineItem => "LINE_ITEM",
            Self::PromotedTweet => "PROMOTED_TWEET",
        }
    }

    /// Listing path segment for this entity kind.
    #[must_use]
    pub const fn list_path(self) -> &'static str {
        match self {
            Self::Campaign => "campaigns",
            Self::LineItem => "line_items",
            Self::PromotedTweet => "promoted_tweets",
        }
    }
}

impl std::str::FromStr for StatsEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CAMPAIGN" => Ok(Self::Campaign),
            "LINE_ITEM" => Ok(Self::LineItem),
            "PROMOTED_TWEET" => Ok(Self::PromotedTweet),
            other => Err(format!("unknown stats entity: {other}")),
        }
    }
}

/// Stats granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Total,
    Day,
    Hour,
}

impl Granularity {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Total => "TOTAL",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TOTAL" => Ok(Self::Total),
            "DAY" => Ok(Self::Day),
            "HOUR" => Ok(Self::Hour),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// A metric value: the API returns scalars for TOTAL granularity and
/// per-period arrays for DAY/HOUR, with nulls for missing periods.
/// Conversion defaults to zero at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Series(Vec<Option<i64>>),
    Scalar(Option<i64>),
}

impl Default for MetricValue {
    fn default() -> Self {
        Self::Scalar(None)
    }
}

impl MetricValue {
    /// Sum across periods (a scalar is its own sum); missing data is zero.
    #[must_use]
    pub fn total(&self) -> i64 {
        match self {
            Self::Scalar(value) => value.unwrap_or(0),
            Self::Series(values) => values.iter().map(|v| v.unwrap_or(0)).sum(),
        }
    }

    /// Value for one period; out-of-range or null is zero.
    #[must_use]
    pub fn at(&self, period: usize) -> i64 {
        match self {
            Self::Scalar(value) => {
                if period == 0 {
                    value.unwrap_or(0)
                } else {
                    0
                }
            }
            Self::Series(values) => values.get(period).copied().flatten().unwrap_or(0),
        }
    }

    /// Number of periods carried.
    #[must_use]
    pub fn periods(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Series(values) => values.len(),
        }
    }
}

/// The metrics this client reads; everything else the API returns is
/// carried in `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub impressions: MetricValue,
    #[serde(default)]
    pub clicks: MetricValue,
    #[serde(default)]
    pub url_clicks: MetricValue,
    #[serde(default)]
    pub engagements: MetricValue,
    #[serde(default)]
    pub follows: MetricValue,
    #[serde(default)]
    pub billed_charge_local_micro: MetricValue,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Per-segment stats data for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsIdData {
    #[serde(default)]
    pub segment: Option<serde_json::Value>,
    #[serde(default)]
    pub metrics: Metrics,
}

/// Stats for one entity id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsEntry {
    pub id: String,
    #[serde(default)]
    pub id_data: Vec<StatsIdData>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tweets
// ─────────────────────────────────────────────────────────────────────────────

/// A created tweet (public API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metric_values_decode_every_shape() {
        let metrics: Metrics = serde_json::from_value(json!({
            "impressions": 1200,
            "clicks": [3, null, 7],
            "url_clicks": null,
            "billed_charge_local_micro": [1_000_000]
        }))
        .unwrap();

        assert_eq!(metrics.impressions.total(), 1200);
        assert_eq!(metrics.clicks.total(), 10);
        assert_eq!(metrics.clicks.at(1), 0);
        assert_eq!(metrics.clicks.at(2), 7);
        assert_eq!(metrics.url_clicks.total(), 0);
        assert_eq!(metrics.engagements.total(), 0);
        assert_eq!(metrics.billed_charge_local_micro.total(), 1_000_000);
    }

    #[test]
    fn stats_entry_decodes_nested_shape() {
        let entry: StatsEntry = serde_json::from_value(json!({
            "id": "c1",
            "id_data": [{"segment": null, "metrics": {"impressions": [10, 20]}}]
        }))
        .unwrap();

        assert_eq!(entry.id_data.len(), 1);
        assert_eq!(entry.id_data[0].metrics.impressions.total(), 30);
        assert_eq!(entry.id_data[0].metrics.impressions.periods(), 2);
    }

    #[test]
    fn targeting_value_decodes_text_and_number() {
        let text: TargetingValue = serde_json::from_value(json!("96683cc9126741d1")).unwrap();
        assert_eq!(text.to_string(), "96683cc9126741d1");

        let number: TargetingValue = serde_json::from_value(json!(4)).unwrap();
        assert_eq!(number.to_string(), "4");
    }

    #[test]
    fn entity_enums_round_trip_wire_names() {
        assert_eq!("CAMPAIGN".parse::<StatsEntity>().unwrap(), StatsEntity::Campaign);
        assert_eq!(StatsEntity::LineItem.list_path(), "line_items");
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!(Granularity::Hour.as_str(), "HOUR");
    }
}

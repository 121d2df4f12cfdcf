//! Typed endpoint surface.
//!
//! Thin verbs over the Ads API resources; each method builds parameters,
//! drives [`AdsClient::execute`]/[`AdsClient::fetch_all`], and decodes
//! `data` into the matching entity type. Advertising semantics stay
//! opaque; fields pass through as the server sent them.

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::AdsClient;
use crate::error::{AdsError, AdsResult};
use crate::types::{
    AdAccount, Campaign, CreatedTweet, FundingInstrument, LineItem, PromotedTweet, StatsEntity,
    StatsEntry, TailoredAudience, TargetingConversation, TargetingCriterion, TargetingInterest,
    TargetingLocation, TargetingPlatform, WebsiteCard,
};
use crate::Granularity;

/// The stats endpoint accepts at most this many entity ids per request.
const STATS_BATCH_SIZE: usize = 20;

/// Flatten a params struct into form pairs. Nulls are skipped, scalars
/// stringified, arrays comma-joined: the shapes the form-encoded API
/// accepts.
fn form_pairs<T: Serialize>(params: &T) -> AdsResult<Vec<(String, String)>> {
    let value = serde_json::to_value(params)?;
    let Value::Object(map) = value else {
        return Err(AdsError::Config("params must serialize to an object".into()));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::String(s) => pairs.push((key, s)),
            Value::Bool(b) => pairs.push((key, b.to_string())),
            Value::Number(n) => pairs.push((key, n.to_string())),
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        Value::Number(n) => Ok(n.to_string()),
                        other => Err(AdsError::Config(format!(
                            "unsupported array element for {key}: {other}"
                        ))),
                    })
                    .collect::<AdsResult<Vec<_>>>()?
                    .join(",");
                pairs.push((key, joined));
            }
            other => {
                return Err(AdsError::Config(format!(
                    "unsupported form value for {key}: {other}"
                )));
            }
        }
    }
    Ok(pairs)
}

fn typed_vec<T: serde::de::DeserializeOwned>(items: Vec<Value>) -> AdsResult<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(AdsError::from))
        .collect()
}

fn list_query(extra: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut query = vec![("with_deleted".to_string(), "false".to_string())];
    query.extend(
        extra
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
    );
    query
}

// ─────────────────────────────────────────────────────────────────────────────
// Create/update parameter sets
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for campaign creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignParams {
    pub name: String,
    pub funding_instrument_id: String,
    pub entity_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_budget_amount_local_micro: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget_amount_local_micro: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Partial campaign update; absent fields stay untouched remotely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_budget_amount_local_micro: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget_amount_local_micro: Option<i64>,
}

impl CampaignUpdate {
    /// True when no field is set; the API rejects empty updates anyway.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.entity_status.is_none()
            && self.daily_budget_amount_local_micro.is_none()
            && self.total_budget_amount_local_micro.is_none()
    }
}

/// Parameters for line item creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LineItemParams {
    pub campaign_id: String,
    pub name: String,
    pub objective: String,
    pub product_type: String,
    pub placements: String,
    pub entity_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_amount_local_micro: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatically_select_bid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget_amount_local_micro: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Partial line item update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LineItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_amount_local_micro: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatically_select_bid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget_amount_local_micro: Option<i64>,
}

/// Partial website card update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// A stats request before batching.
#[derive(Debug, Clone)]
pub struct StatsQuery {
    pub entity: StatsEntity,
    pub entity_ids: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub granularity: Granularity,
    pub metric_groups: String,
}

impl AdsClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Accounts & funding
    // ─────────────────────────────────────────────────────────────────────────

    /// List every accessible ad account.
    pub async fn list_accounts(&self) -> AdsResult<Vec<AdAccount>> {
        let items = self
            .fetch_all(Method::GET, &self.ads_url("accounts"), &list_query(&[]))
            .await?;
        typed_vec(items)
    }

    /// List funding instruments for an account.
    pub async fn list_funding_instruments(
        &self,
        account: &str,
    ) -> AdsResult<Vec<FundingInstrument>> {
        let url = self.ads_url(&format!("accounts/{account}/funding_instruments"));
        let items = self.fetch_all(Method::GET, &url, &list_query(&[])).await?;
        typed_vec(items)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Campaigns
    // ─────────────────────────────────────────────────────────────────────────

    /// List campaigns for an account.
    pub async fn list_campaigns(&self, account: &str) -> AdsResult<Vec<Campaign>> {
        let url = self.ads_url(&format!("accounts/{account}/campaigns"));
        let items = self.fetch_all(Method::GET, &url, &list_query(&[])).await?;
        typed_vec(items)
    }

    /// Create a campaign.
    pub async fn create_campaign(
        &self,
        account: &str,
        params: &CampaignParams,
    ) -> AdsResult<Campaign> {
        let url = self.ads_url(&format!("accounts/{account}/campaigns"));
        let form = form_pairs(params)?;
        let response = self.execute(Method::POST, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Update a campaign.
    pub async fn update_campaign(
        &self,
        account: &str,
        campaign_id: &str,
        update: &CampaignUpdate,
    ) -> AdsResult<Campaign> {
        let url = self.ads_url(&format!("accounts/{account}/campaigns/{campaign_id}"));
        let form = form_pairs(update)?;
        let response = self.execute(Method::PUT, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Pause a campaign.
    pub async fn pause_campaign(&self, account: &str, campaign_id: &str) -> AdsResult<Campaign> {
        let update = CampaignUpdate {
            entity_status: Some("PAUSED".to_string()),
            ..CampaignUpdate::default()
        };
        self.update_campaign(account, campaign_id, &update).await
    }

    /// Remove (soft-delete) a campaign.
    pub async fn delete_campaign(&self, account: &str, campaign_id: &str) -> AdsResult<()> {
        let url = self.ads_url(&format!("accounts/{account}/campaigns/{campaign_id}"));
        self.execute(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line items
    // ─────────────────────────────────────────────────────────────────────────

    /// List line items, optionally filtered to one campaign.
    pub async fn list_line_items(
        &self,
        account: &str,
        campaign_id: Option<&str>,
    ) -> AdsResult<Vec<LineItem>> {
        let url = self.ads_url(&format!("accounts/{account}/line_items"));
        let query = match campaign_id {
            Some(id) => list_query(&[("campaign_ids", id)]),
            None => list_query(&[]),
        };
        let items = self.fetch_all(Method::GET, &url, &query).await?;
        typed_vec(items)
    }

    /// Create a line item.
    pub async fn create_line_item(
        &self,
        account: &str,
        params: &LineItemParams,
    ) -> AdsResult<LineItem> {
        let url = self.ads_url(&format!("accounts/{account}/line_items"));
        let form = form_pairs(params)?;
        let response = self.execute(Method::POST, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Update a line item.
    pub async fn update_line_item(
        &self,
        account: &str,
        line_item_id: &str,
        update: &LineItemUpdate,
    ) -> AdsResult<LineItem> {
        let url = self.ads_url(&format!("accounts/{account}/line_items/{line_item_id}"));
        let form = form_pairs(update)?;
        let response = self.execute(Method::PUT, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Pause a line item.
    pub async fn pause_line_item(&self, account: &str, line_item_id: &str) -> AdsResult<LineItem> {
        let update = LineItemUpdate {
            entity_status: Some("PAUSED".to_string()),
            ..LineItemUpdate::default()
        };
        self.update_line_item(account, line_item_id, &update).await
    }

    /// Remove (soft-delete) a line item.
    pub async fn delete_line_item(&self, account: &str, line_item_id: &str) -> AdsResult<()> {
        let url = self.ads_url(&format!("accounts/{account}/line_items/{line_item_id}"));
        self.execute(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Promoted tweets
    // ─────────────────────────────────────────────────────────────────────────

    /// List promoted tweets, optionally filtered to one line item.
    pub async fn list_promoted_tweets(
        &self,
        account: &str,
        line_item_id: Option<&str>,
    ) -> AdsResult<Vec<PromotedTweet>> {
        let url = self.ads_url(&format!("accounts/{account}/promoted_tweets"));
        let query = match line_item_id {
            Some(id) => list_query(&[("line_item_ids", id)]),
            None => list_query(&[]),
        };
        let items = self.fetch_all(Method::GET, &url, &query).await?;
        typed_vec(items)
    }

    /// Promote tweets onto a line item. The API answers with one object
    /// for a single tweet and an array for several; both decode.
    pub async fn promote_tweets(
        &self,
        account: &str,
        line_item_id: &str,
        tweet_ids: &[String],
    ) -> AdsResult<Vec<PromotedTweet>> {
        let url = self.ads_url(&format!("accounts/{account}/promoted_tweets"));
        let form = vec![
            ("line_item_id".to_string(), line_item_id.to_string()),
            ("tweet_ids".to_string(), tweet_ids.join(",")),
        ];
        let response = self.execute(Method::POST, &url, &[], Some(&form)).await?;
        typed_vec(response.items())
    }

    /// Remove (un-promote) a promoted tweet.
    pub async fn delete_promoted_tweet(
        &self,
        account: &str,
        promoted_tweet_id: &str,
    ) -> AdsResult<()> {
        let url = self.ads_url(&format!("accounts/{account}/promoted_tweets/{promoted_tweet_id}"));
        self.execute(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Website cards
    // ─────────────────────────────────────────────────────────────────────────

    /// List website cards for an account.
    pub async fn list_website_cards(&self, account: &str) -> AdsResult<Vec<WebsiteCard>> {
        let url = self.ads_url(&format!("accounts/{account}/cards/website"));
        let items = self.fetch_all(Method::GET, &url, &list_query(&[])).await?;
        typed_vec(items)
    }

    /// Create a website card around an uploaded media key.
    pub async fn create_website_card(
        &self,
        account: &str,
        name: &str,
        website_title: &str,
        website_url: &str,
        media_key: &str,
    ) -> AdsResult<WebsiteCard> {
        let url = self.ads_url(&format!("accounts/{account}/cards/website"));
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("website_title".to_string(), website_title.to_string()),
            ("website_url".to_string(), website_url.to_string()),
            ("media_key".to_string(), media_key.to_string()),
        ];
        let response = self.execute(Method::POST, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Update a website card.
    pub async fn update_website_card(
        &self,
        account: &str,
        card_id: &str,
        update: &CardUpdate,
    ) -> AdsResult<WebsiteCard> {
        let url = self.ads_url(&format!("accounts/{account}/cards/website/{card_id}"));
        let form = form_pairs(update)?;
        let response = self.execute(Method::PUT, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Delete a website card.
    pub async fn delete_website_card(&self, account: &str, card_id: &str) -> AdsResult<()> {
        let url = self.ads_url(&format!("accounts/{account}/cards/website/{card_id}"));
        self.execute(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tailored audiences
    // ─────────────────────────────────────────────────────────────────────────

    /// List tailored audiences for an account.
    pub async fn list_audiences(&self, account: &str) -> AdsResult<Vec<TailoredAudience>> {
        let url = self.ads_url(&format!("accounts/{account}/tailored_audiences"));
        let items = self.fetch_all(Method::GET, &url, &list_query(&[])).await?;
        typed_vec(items)
    }

    /// Create an (empty) tailored audience.
    pub async fn create_audience(
        &self,
        account: &str,
        name: &str,
        list_type: &str,
    ) -> AdsResult<TailoredAudience> {
        let url = self.ads_url(&format!("accounts/{account}/tailored_audiences"));
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("list_type".to_string(), list_type.to_string()),
        ];
        let response = self.execute(Method::POST, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Delete a tailored audience.
    pub async fn delete_audience(&self, account: &str, audience_id: &str) -> AdsResult<()> {
        let url = self.ads_url(&format!("accounts/{account}/tailored_audiences/{audience_id}"));
        self.execute(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Targeting
    // ─────────────────────────────────────────────────────────────────────────

    /// Search targetable locations.
    pub async fn search_targeting_locations(
        &self,
        query: &str,
        location_type: &str,
    ) -> AdsResult<Vec<TargetingLocation>> {
        let url = self.ads_url("targeting_criteria/locations");
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("location_type".to_string(), location_type.to_string()),
        ];
        let response = self.execute(Method::GET, &url, &params, None).await?;
        typed_vec(response.items())
    }

    /// List targetable interests.
    pub async fn list_targeting_interests(&self) -> AdsResult<Vec<TargetingInterest>> {
        let url = self.ads_url("targeting_criteria/interests");
        let response = self.execute(Method::GET, &url, &[], None).await?;
        typed_vec(response.items())
    }

    /// Search targetable conversation topics.
    pub async fn search_targeting_conversations(
        &self,
        query: &str,
    ) -> AdsResult<Vec<TargetingConversation>> {
        let url = self.ads_url("targeting_criteria/conversations");
        let params = vec![("q".to_string(), query.to_string())];
        let response = self.execute(Method::GET, &url, &params, None).await?;
        typed_vec(response.items())
    }

    /// List targetable device platforms.
    pub async fn list_targeting_platforms(&self) -> AdsResult<Vec<TargetingPlatform>> {
        let url = self.ads_url("targeting_criteria/platforms");
        let response = self.execute(Method::GET, &url, &[], None).await?;
        typed_vec(response.items())
    }

    /// List targeting criteria attached to a line item.
    pub async fn list_targeting_criteria(
        &self,
        account: &str,
        line_item_id: &str,
    ) -> AdsResult<Vec<TargetingCriterion>> {
        let url = self.ads_url(&format!("accounts/{account}/targeting_criteria"));
        let query = list_query(&[("line_item_ids", line_item_id)]);
        let items = self.fetch_all(Method::GET, &url, &query).await?;
        typed_vec(items)
    }

    /// Attach one targeting criterion to a line item.
    pub async fn add_targeting_criterion(
        &self,
        account: &str,
        line_item_id: &str,
        targeting_type: &str,
        targeting_value: &str,
    ) -> AdsResult<TargetingCriterion> {
        let url = self.ads_url(&format!("accounts/{account}/targeting_criteria"));
        let form = vec![
            ("line_item_id".to_string(), line_item_id.to_string()),
            ("targeting_type".to_string(), targeting_type.to_string()),
            ("targeting_value".to_string(), targeting_value.to_string()),
        ];
        let response = self.execute(Method::POST, &url, &[], Some(&form)).await?;
        response.data_as()
    }

    /// Remove a targeting criterion.
    pub async fn remove_targeting_criterion(
        &self,
        account: &str,
        criterion_id: &str,
    ) -> AdsResult<()> {
        let url = self.ads_url(&format!("accounts/{account}/targeting_criteria/{criterion_id}"));
        self.execute(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Analytics
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch stats for a set of entity ids, batching to the endpoint's
    /// per-request id limit.
    pub async fn fetch_stats(&self, account: &str, query: &StatsQuery) -> AdsResult<Vec<StatsEntry>> {
        let url = self.ads_url(&format!("stats/accounts/{account}"));
        let mut entries = Vec::with_capacity(query.entity_ids.len());

        for batch in query.entity_ids.chunks(STATS_BATCH_SIZE) {
            let params = vec![
                ("entity".to_string(), query.entity.as_str().to_string()),
                ("entity_ids".to_string(), batch.join(",")),
                ("start_time".to_string(), query.start_time.clone()),
                ("end_time".to_string(), query.end_time.clone()),
                ("granularity".to_string(), query.granularity.as_str().to_string()),
                ("metric_groups".to_string(), query.metric_groups.clone()),
            ];
            let response = self.execute(Method::GET, &url, &params, None).await?;
            entries.extend(typed_vec::<StatsEntry>(response.items())?);
        }

        Ok(entries)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tweets (public API)
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a tweet, optionally attaching a card or uploaded media.
    /// Does not promote it.
    pub async fn create_tweet(
        &self,
        text: &str,
        card_uri: Option<&str>,
        media_ids: &[String],
    ) -> AdsResult<CreatedTweet> {
        let mut body = json!({ "text": text });
        if let Some(card_uri) = card_uri {
            body["card_uri"] = json!(card_uri);
        }
        if !media_ids.is_empty() {
            body["media"] = json!({ "media_ids": media_ids });
        }

        let url = self.api_url("2/tweets");
        let response = self.execute_json(Method::POST, &url, &[], &body).await?;
        response.data_as()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdsConfig, RetryPolicy};
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xads_oauth::Credentials;

    fn test_client(server: &MockServer) -> AdsClient {
        let credentials = Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        };
        let mut config = AdsConfig::new(credentials).with_base_url(server.uri());
        config.retry = RetryPolicy::immediate(2);
        AdsClient::new(config).unwrap()
    }

    #[test]
    fn form_pairs_flatten_scalars_and_arrays() {
        #[derive(Serialize)]
        struct Params {
            name: String,
            count: i64,
            auto: bool,
            tags: Vec<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            absent: Option<String>,
        }

        let pairs = form_pairs(&Params {
            name: "n".into(),
            count: 7,
            auto: true,
            tags: vec!["a".into(), "b".into()],
            absent: None,
        })
        .unwrap();

        assert!(pairs.contains(&("name".to_string(), "n".to_string())));
        assert!(pairs.contains(&("count".to_string(), "7".to_string())));
        assert!(pairs.contains(&("auto".to_string(), "true".to_string())));
        assert!(pairs.contains(&("tags".to_string(), "a,b".to_string())));
        assert_eq!(pairs.len(), 4);
    }

    #[tokio::test]
    async fn list_campaigns_decodes_entities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/accounts/x1/campaigns"))
            .and(query_param("with_deleted", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "c1",
                    "name": "Spring",
                    "entity_status": "ACTIVE",
                    "daily_budget_amount_local_micro": 50_000_000,
                    "servable": true
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let campaigns = client.list_campaigns("x1").await.unwrap();

        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].name.as_deref(), Some("Spring"));
        assert_eq!(campaigns[0].daily_budget_amount_local_micro, Some(50_000_000));
    }

    #[tokio::test]
    async fn promote_tweets_accepts_single_object_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/12/accounts/x1/promoted_tweets"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "pt1", "line_item_id": "li1", "tweet_id": "t1"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let promoted = client
            .promote_tweets("x1", "li1", &["t1".to_string()])
            .await
            .unwrap();

        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted[0].tweet_id.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn stats_batches_entity_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/stats/accounts/x1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "e", "id_data": [{"metrics": {"impressions": 5}}]}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let ids: Vec<String> = (0..25).map(|i| format!("c{i}")).collect();
        let entries = client
            .fetch_stats(
                "x1",
                &StatsQuery {
                    entity: StatsEntity::Campaign,
                    entity_ids: ids,
                    start_time: "2026-08-01T00:00:00Z".into(),
                    end_time: "2026-08-07T23:59:59Z".into(),
                    granularity: Granularity::Total,
                    metric_groups: "ENGAGEMENT,BILLING".into(),
                },
            )
            .await
            .unwrap();

        // 25 ids at 20 per request: two batches, each answered once.
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id_data[0].metrics.impressions.total(), 5);
    }

    #[tokio::test]
    async fn create_tweet_posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(body_partial_json(serde_json::json!({
                "text": "hello",
                "media": {"media_ids": ["m1"]}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "t9", "text": "hello"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let tweet = client
            .create_tweet("hello", None, &["m1".to_string()])
            .await
            .unwrap();

        assert_eq!(tweet.id, "t9");
    }

    #[tokio::test]
    async fn delete_campaign_issues_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/12/accounts/x1/campaigns/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": "c1", "deleted": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_campaign("x1", "c1").await.unwrap();
    }
}

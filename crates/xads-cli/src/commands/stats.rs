//! `x-ads stats`: analytics over campaigns, line items, and promoted
//! tweets.
//!
//! The stats endpoint wants explicit entity ids, so when none are given
//! the command first lists the entities (which also supplies display
//! names), then fetches metrics in batches.

use anyhow::Context as _;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use clap::Args;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use xads_client::{Granularity, StatsEntity, StatsQuery};

use super::AccountArg;
use crate::context;
use crate::output;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Entity type: CAMPAIGN, LINE_ITEM, or PROMOTED_TWEET.
    #[arg(long)]
    pub entity: Option<String>,

    /// Entity ID(s), comma-separated. Defaults to every entity of the type.
    #[arg(long)]
    pub ids: Option<String>,

    /// Date range preset or YYYY-MM-DD..YYYY-MM-DD.
    #[arg(long = "date-range", default_value = "last_7d")]
    pub date_range: String,

    /// Granularity: TOTAL, DAY, or HOUR.
    #[arg(long, default_value = "TOTAL")]
    pub granularity: String,

    /// Shortcut: stats for one campaign.
    #[arg(long)]
    pub campaign: Option<String>,

    /// Shortcut: stats for one line item.
    #[arg(long = "line-item")]
    pub line_item: Option<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(args: StatsArgs, cancel: &CancellationToken) -> anyhow::Result<()> {
    let account = context::require_account(args.account.account)?;

    // Shortcut options pin both the entity type and the id.
    let (entity, pinned_ids): (StatsEntity, Option<Vec<String>>) =
        if let Some(campaign) = &args.campaign {
            (StatsEntity::Campaign, Some(vec![campaign.clone()]))
        } else if let Some(line_item) = &args.line_item {
            (StatsEntity::LineItem, Some(vec![line_item.clone()]))
        } else {
            let entity = args
                .entity
                .as_deref()
                .unwrap_or("CAMPAIGN")
                .parse::<StatsEntity>()
                .map_err(|e| anyhow::anyhow!(e))?;
            (entity, None)
        };

    let granularity = args
        .granularity
        .parse::<Granularity>()
        .map_err(|e| anyhow::anyhow!(e))?;

    let (start_time, end_time) = parse_date_range(&args.date_range, Utc::now().date_naive())?;

    let client = context::build_client(cancel)?;

    // Entity listing supplies display names and, when no ids were given,
    // the id set itself.
    let listing = client
        .fetch_all(
            reqwest::Method::GET,
            &client.ads_url(&format!("accounts/{account}/{}", entity.list_path())),
            &[("with_deleted".to_string(), "false".to_string())],
        )
        .await?;

    let names: std::collections::HashMap<String, String> = listing
        .iter()
        .filter_map(|item| {
            let id = item["id"].as_str()?.to_string();
            let name = item["name"]
                .as_str()
                .or_else(|| item["tweet_id"].as_str())
                .unwrap_or(&id)
                .to_string();
            Some((id, name))
        })
        .collect();

    let entity_ids: Vec<String> = match (&pinned_ids, &args.ids) {
        (_, Some(ids)) => ids
            .split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect(),
        (Some(ids), None) => ids.clone(),
        (None, None) => names.keys().cloned().collect(),
    };

    if entity_ids.is_empty() {
        output::print_ok(&Vec::<serde_json::Value>::new());
        return Ok(());
    }

    let entries = client
        .fetch_stats(
            &account,
            &StatsQuery {
                entity,
                entity_ids,
                start_time: start_time.clone(),
                end_time,
                granularity,
                metric_groups: "ENGAGEMENT,BILLING".to_string(),
            },
        )
        .await?;

    // Flatten to rows: one per entity for TOTAL, one per entity/period
    // for DAY and HOUR.
    let mut rows = Vec::new();
    for entry in &entries {
        let name = names.get(&entry.id).cloned().unwrap_or_else(|| entry.id.clone());
        for id_data in &entry.id_data {
            let metrics = &id_data.metrics;
            match granularity {
                Granularity::Total => {
                    rows.push(json!({
                        "id": entry.id,
                        "name": name,
                        "impressions": metrics.impressions.total(),
                        "clicks": metrics.clicks.total(),
                        "url_clicks": metrics.url_clicks.total(),
                        "engagements": metrics.engagements.total(),
                        "follows": metrics.follows.total(),
                        "spend_micros": metrics.billed_charge_local_micro.total(),
                    }));
                }
                Granularity::Day | Granularity::Hour => {
                    let periods = [
                        metrics.impressions.periods(),
                        metrics.clicks.periods(),
                        metrics.url_clicks.periods(),
                        metrics.engagements.periods(),
                        metrics.follows.periods(),
                        metrics.billed_charge_local_micro.periods(),
                    ]
                    .into_iter()
                    .max()
                    .unwrap_or(1);

                    for period in 0..periods {
                        rows.push(json!({
                            "id": entry.id,
                            "name": name,
                            "date": period_label(&start_time, granularity, period)?,
                            "impressions": metrics.impressions.at(period),
                            "clicks": metrics.clicks.at(period),
                            "url_clicks": metrics.url_clicks.at(period),
                            "engagements": metrics.engagements.at(period),
                            "follows": metrics.follows.at(period),
                            "spend_micros": metrics.billed_charge_local_micro.at(period),
                        }));
                    }
                }
            }
        }
    }

    output::print_ok(&rows);
    Ok(())
}

/// Label for one DAY/HOUR period counted from the range start.
fn period_label(start_time: &str, granularity: Granularity, period: usize) -> anyhow::Result<String> {
    let start = DateTime::parse_from_rfc3339(start_time)
        .with_context(|| format!("bad start time {start_time}"))?
        .with_timezone(&Utc);
    let offset = i64::try_from(period).unwrap_or(i64::MAX);

    Ok(match granularity {
        Granularity::Hour => {
            let at = start + chrono::Duration::hours(offset);
            at.format("%Y-%m-%d %H:%M").to_string()
        }
        _ => {
            let at = start + chrono::Duration::days(offset);
            at.format("%Y-%m-%d").to_string()
        }
    })
}

fn range_strings(start: NaiveDate, end: NaiveDate) -> (String, String) {
    (
        format!("{}T00:00:00Z", start.format("%Y-%m-%d")),
        format!("{}T23:59:59Z", end.format("%Y-%m-%d")),
    )
}

/// Parse a date-range preset or a custom `YYYY-MM-DD..YYYY-MM-DD` span
/// into inclusive UTC day bounds.
fn parse_date_range(input: &str, today: NaiveDate) -> anyhow::Result<(String, String)> {
    if let Some((start_str, end_str)) = input.split_once("..") {
        let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
            .with_context(|| format!("invalid date range start {start_str:?}"))?;
        let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
            .with_context(|| format!("invalid date range end {end_str:?}"))?;
        return Ok(range_strings(start, end));
    }

    let days_back = |n: u64| {
        today
            .checked_sub_days(Days::new(n))
            .unwrap_or(today)
    };

    Ok(match input {
        "today" => range_strings(today, today),
        "yesterday" => range_strings(days_back(1), days_back(1)),
        "last_7d" => range_strings(days_back(7), today),
        "last_14d" => range_strings(days_back(14), today),
        "last_30d" => range_strings(days_back(30), today),
        "this_month" => {
            let first = today.with_day(1).unwrap_or(today);
            range_strings(first, today)
        }
        "last_month" => {
            let first_of_this = today.with_day(1).unwrap_or(today);
            let last_of_prev = first_of_this
                .checked_sub_days(Days::new(1))
                .unwrap_or(today);
            let first_of_prev = last_of_prev.with_day(1).unwrap_or(last_of_prev);
            range_strings(first_of_prev, last_of_prev)
        }
        other => anyhow::bail!(
            "unknown date range {other:?}: use today, yesterday, last_7d, last_14d, \
             last_30d, this_month, last_month, or YYYY-MM-DD..YYYY-MM-DD"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn presets_compute_utc_day_bounds() {
        let today = day(2026, 8, 7);

        let (start, end) = parse_date_range("today", today).unwrap();
        assert_eq!(start, "2026-08-07T00:00:00Z");
        assert_eq!(end, "2026-08-07T23:59:59Z");

        let (start, end) = parse_date_range("yesterday", today).unwrap();
        assert_eq!(start, "2026-08-06T00:00:00Z");
        assert_eq!(end, "2026-08-06T23:59:59Z");

        let (start, _) = parse_date_range("last_7d", today).unwrap();
        assert_eq!(start, "2026-07-31T00:00:00Z");

        let (start, end) = parse_date_range("last_month", today).unwrap();
        assert_eq!(start, "2026-07-01T00:00:00Z");
        assert_eq!(end, "2026-07-31T23:59:59Z");
    }

    #[test]
    fn custom_range_parses_both_ends() {
        let (start, end) =
            parse_date_range("2026-01-05..2026-01-09", day(2026, 8, 7)).unwrap();
        assert_eq!(start, "2026-01-05T00:00:00Z");
        assert_eq!(end, "2026-01-09T23:59:59Z");
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(parse_date_range("fortnight", day(2026, 8, 7)).is_err());
        assert!(parse_date_range("2026-99-01..2026-01-02", day(2026, 8, 7)).is_err());
    }

    #[test]
    fn period_labels_step_by_granularity() {
        let label = period_label("2026-08-01T00:00:00Z", Granularity::Day, 2).unwrap();
        assert_eq!(label, "2026-08-03");

        let label = period_label("2026-08-01T00:00:00Z", Granularity::Hour, 5).unwrap();
        assert_eq!(label, "2026-08-01 05:00");
    }
}

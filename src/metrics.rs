//! Aggregates activity, deal, and role counts over filtered entity sets.
//!
//! Deals and pull-outs come from two independent sources that are summed
//! without double-counting: legacy counters on activity entries (always
//! written as zero by this tool) and the deal log itself.

use std::collections::BTreeMap;

use crate::dates::{Calendar, RangeFilter, month_key};
use crate::models::{
    ActivityEntry, Client, DEAL_STATUS_DEAL, DEAL_STATUS_PULLED_OUT, DealRecord, Recruiter, Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Submissions,
    Interviews,
    Deals,
    Pullouts,
    Roles,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Submissions => "submissions",
            Metric::Interviews => "interviews",
            Metric::Deals => "deals",
            Metric::Pullouts => "pull outs",
            Metric::Roles => "roles",
        }
    }

    /// Whether the deal log contributes to this metric on top of entry counters.
    pub fn draws_on_deal_log(&self) -> bool {
        matches!(self, Metric::Deals | Metric::Pullouts)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeskTotals {
    pub submissions: i64,
    pub interviews: i64,
    pub deals: i64,
    pub pullouts: i64,
}

/// Recruiter focus resolution: a focused id is honored only while that
/// recruiter still exists; a stale focus silently falls back to all active.
pub fn selected_recruiter_ids(recruiters: &[Recruiter], focus: Option<i64>) -> Vec<i64> {
    if let Some(id) = focus {
        if recruiters.iter().any(|recruiter| recruiter.id == id) {
            return vec![id];
        }
    }
    recruiters
        .iter()
        .filter(|recruiter| recruiter.active)
        .map(|recruiter| recruiter.id)
        .collect()
}

pub fn selected_client_names(clients: &[Client], focus: Option<&str>) -> Vec<String> {
    if let Some(name) = focus {
        if clients.iter().any(|client| client.name == name) {
            return vec![name.to_string()];
        }
    }
    clients
        .iter()
        .filter(|client| client.active)
        .map(|client| client.name.clone())
        .collect()
}

fn entry_metric_value(entry: &ActivityEntry, metric: Metric) -> i64 {
    match metric {
        Metric::Submissions => entry.submissions,
        Metric::Interviews => entry.interviews,
        Metric::Deals => entry.deals,
        Metric::Pullouts => entry.pullouts,
        Metric::Roles => 0,
    }
}

fn deal_matches_metric(record: &DealRecord, metric: Metric) -> bool {
    match metric {
        Metric::Deals => record.status == DEAL_STATUS_DEAL,
        Metric::Pullouts => record.status == DEAL_STATUS_PULLED_OUT,
        _ => false,
    }
}

/// Range-filtered desk totals for a recruiter selection. Dangling recruiter
/// ids in the selection simply contribute nothing.
pub fn desk_totals(
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    recruiter_ids: &[i64],
    filter: &RangeFilter,
    calendar: &Calendar,
) -> DeskTotals {
    let mut totals = DeskTotals::default();

    for entry in entries {
        if !recruiter_ids.contains(&entry.recruiter_id) {
            continue;
        }
        if !filter.matches(&entry.date, calendar) {
            continue;
        }
        totals.submissions += entry.submissions;
        totals.interviews += entry.interviews;
        totals.deals += entry.deals;
        totals.pullouts += entry.pullouts;
    }

    for record in deals {
        if !recruiter_ids.contains(&record.recruiter_id) {
            continue;
        }
        if !filter.matches(&record.date, calendar) {
            continue;
        }
        if record.status == DEAL_STATUS_DEAL {
            totals.deals += 1;
        } else if record.status == DEAL_STATUS_PULLED_OUT {
            totals.pullouts += 1;
        }
    }

    totals
}

/// Counts roles assigned to the recruiter selection. A role without a released
/// date is always in range: absence of a date means "unfiltered".
pub fn assigned_roles_count(
    roles: &[Role],
    recruiter_ids: &[i64],
    filter: &RangeFilter,
    calendar: &Calendar,
) -> usize {
    roles
        .iter()
        .filter(|role| {
            role.recruiter_id
                .map(|id| recruiter_ids.contains(&id))
                .unwrap_or(false)
        })
        .filter(|role| role_in_range(role, filter, calendar))
        .count()
}

pub fn role_in_range(role: &Role, filter: &RangeFilter, calendar: &Calendar) -> bool {
    match role.released_date.as_deref() {
        Some(date) => filter.matches(date, calendar),
        None => true,
    }
}

/// Buckets an activity metric by YYYY-MM. The BTreeMap keeps month keys in
/// ascending order so the highest-month scan is deterministic. Zero values
/// and unparseable dates create no bucket.
pub fn per_month(
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    metric: Metric,
    recruiter_id: Option<i64>,
    client_name: Option<&str>,
) -> BTreeMap<String, i64> {
    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();

    for entry in entries {
        if let Some(id) = recruiter_id {
            if entry.recruiter_id != id {
                continue;
            }
        }
        let Some(key) = month_key(&entry.date) else {
            continue;
        };
        let value = entry_metric_value(entry, metric);
        if value == 0 {
            continue;
        }
        *buckets.entry(key).or_insert(0) += value;
    }

    if metric.draws_on_deal_log() {
        for record in deals {
            if let Some(id) = recruiter_id {
                if record.recruiter_id != id {
                    continue;
                }
            }
            // Entries carry no client reference, so a client focus narrows the
            // deal-log side only.
            if let Some(name) = client_name {
                if record.client_name != name {
                    continue;
                }
            }
            if !deal_matches_metric(record, metric) {
                continue;
            }
            let Some(key) = month_key(&record.date) else {
                continue;
            };
            *buckets.entry(key).or_insert(0) += 1;
        }
    }

    buckets
}

/// Buckets roles by release month, defaulting a missing released date to the
/// injected processing-date key.
pub fn roles_per_month(roles: &[&Role], fallback_key: &str) -> BTreeMap<String, i64> {
    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();

    for role in roles {
        let date = role.released_date.as_deref().unwrap_or(fallback_key);
        let Some(key) = month_key(date) else {
            continue;
        };
        *buckets.entry(key).or_insert(0) += 1;
    }

    buckets
}

/// Scans buckets in ascending key order, replacing the running best only on a
/// strictly greater value; ties keep the earliest month.
pub fn highest_month(buckets: &BTreeMap<String, i64>) -> Option<(&str, i64)> {
    let mut best: Option<(&str, i64)> = None;

    for (key, value) in buckets {
        match best {
            None => best = Some((key, *value)),
            Some((_, best_value)) if *value > best_value => best = Some((key, *value)),
            Some(_) => {}
        }
    }

    best
}

/// Average across populated months only; a month with zero activity is not a
/// bucket and does not depress the average. None when there are no buckets.
pub fn average_per_month(buckets: &BTreeMap<String, i64>) -> Option<f64> {
    if buckets.is_empty() {
        return None;
    }
    let total: i64 = buckets.values().sum();
    Some(total as f64 / buckets.len() as f64)
}

/// All-time total for a metric. Submissions and interviews come from entries
/// alone; deals and pull-outs add the matching deal-log records on top of the
/// legacy entry counters.
pub fn all_time_total(
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    metric: Metric,
    recruiter_id: Option<i64>,
    client_name: Option<&str>,
) -> i64 {
    let mut total = 0;

    for entry in entries {
        if let Some(id) = recruiter_id {
            if entry.recruiter_id != id {
                continue;
            }
        }
        total += entry_metric_value(entry, metric);
    }

    if metric.draws_on_deal_log() {
        for record in deals {
            if let Some(id) = recruiter_id {
                if record.recruiter_id != id {
                    continue;
                }
            }
            if let Some(name) = client_name {
                if record.client_name != name {
                    continue;
                }
            }
            if deal_matches_metric(record, metric) {
                total += 1;
            }
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::RangeKind;
    use chrono::NaiveDate;

    fn calendar(key: &str) -> Calendar {
        Calendar::for_reference(NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap())
    }

    fn recruiter(id: i64, name: &str, active: bool) -> Recruiter {
        Recruiter {
            id,
            name: name.to_string(),
            active,
        }
    }

    fn entry(id: i64, date: &str, recruiter_id: i64, submissions: i64, interviews: i64) -> ActivityEntry {
        ActivityEntry {
            id,
            date: date.to_string(),
            recruiter_id,
            submissions,
            interviews,
            deals: 0,
            pullouts: 0,
        }
    }

    fn deal(id: i64, date: &str, recruiter_id: i64, client: &str, status: &str) -> DealRecord {
        DealRecord {
            id,
            recruiter_id,
            candidate_name: "Sam".to_string(),
            client_name: client.to_string(),
            role_id: 1,
            role_name: "Backend Engineer".to_string(),
            date: date.to_string(),
            status: status.to_string(),
            pulled_out_date: None,
        }
    }

    fn role(id: i64, client: &str, recruiter_id: Option<i64>, released: Option<&str>, status: &str) -> Role {
        Role {
            id,
            name: format!("Role {id}"),
            client: client.to_string(),
            recruiter_id,
            released_date: released.map(str::to_string),
            status: status.to_string(),
            sub_status: if status == "Active" { "Open" } else { "Lost" }.to_string(),
            remarks: None,
        }
    }

    #[test]
    fn stale_recruiter_focus_falls_back_to_all_active() {
        let recruiters = vec![recruiter(1, "Alex", true), recruiter(2, "Jordan", false)];
        assert_eq!(selected_recruiter_ids(&recruiters, Some(1)), vec![1]);
        // Focused id 9 no longer exists, inactive recruiter 2 stays excluded.
        assert_eq!(selected_recruiter_ids(&recruiters, Some(9)), vec![1]);
        assert_eq!(selected_recruiter_ids(&recruiters, None), vec![1]);
    }

    #[test]
    fn deal_totals_sum_both_sources_without_double_counting() {
        // Entry deal counters stay zero, the deal log contributes one.
        let entries = vec![entry(1, "2024-03-05", 1, 4, 2)];
        let deals = vec![deal(1, "2024-03-10", 1, "Acme Corp", DEAL_STATUS_DEAL)];
        let cal = calendar("2024-03-20");

        let totals = desk_totals(&entries, &deals, &[1], &RangeFilter::ALL, &cal);
        assert_eq!(totals.submissions, 4);
        assert_eq!(totals.interviews, 2);
        assert_eq!(totals.deals, 1);
        assert_eq!(totals.pullouts, 0);
    }

    #[test]
    fn legacy_entry_counters_still_add_on_top_of_the_deal_log() {
        let mut legacy = entry(1, "2024-03-05", 1, 0, 0);
        legacy.deals = 2;
        let deals = vec![deal(1, "2024-03-10", 1, "Acme Corp", DEAL_STATUS_DEAL)];
        let cal = calendar("2024-03-20");

        let totals = desk_totals(&[legacy], &deals, &[1], &RangeFilter::ALL, &cal);
        assert_eq!(totals.deals, 3);
    }

    #[test]
    fn dangling_recruiter_ids_contribute_nothing() {
        let entries = vec![entry(1, "2024-03-05", 42, 9, 0)];
        let cal = calendar("2024-03-20");
        let totals = desk_totals(&entries, &[], &[1], &RangeFilter::ALL, &cal);
        assert_eq!(totals, DeskTotals::default());
    }

    #[test]
    fn range_partition_sums_to_all_time_total() {
        let entries = vec![
            entry(1, "2024-03-20", 1, 3, 0), // reference day
            entry(2, "2024-03-21", 1, 5, 0), // same week and month
            entry(3, "2024-03-01", 1, 7, 0), // same month only
            entry(4, "2024-01-15", 1, 11, 0), // outside
        ];
        let cal = calendar("2024-03-20");
        let filter_for = |kind| RangeFilter::new(kind, None, None);

        let all = desk_totals(&entries, &[], &[1], &filter_for(RangeKind::All), &cal);
        let this_month = desk_totals(&entries, &[], &[1], &filter_for(RangeKind::Month), &cal);
        let rest = desk_totals(
            &entries,
            &[],
            &[1],
            &RangeFilter::new(RangeKind::Custom, None, Some("2024-02-29")),
            &cal,
        );

        assert_eq!(all.submissions, 26);
        assert_eq!(this_month.submissions + rest.submissions, all.submissions);
    }

    #[test]
    fn roles_without_release_dates_are_always_in_range() {
        let roles = vec![
            role(1, "Acme Corp", Some(1), Some("2024-01-10"), "Active"),
            role(2, "Acme Corp", Some(1), None, "Active"),
        ];
        let cal = calendar("2024-03-20");
        let filter = RangeFilter::new(RangeKind::Month, None, None);
        assert_eq!(assigned_roles_count(&roles, &[1], &filter, &cal), 1);
    }

    #[test]
    fn month_buckets_skip_zero_values_and_bad_dates() {
        let entries = vec![
            entry(1, "2024-01-10", 1, 3, 0),
            entry(2, "2024-02-02", 1, 0, 4), // zero submissions: no bucket
            entry(3, "not-a-date", 1, 9, 0), // dropped, not an error
            entry(4, "2024-01-20", 1, 2, 0),
        ];
        let buckets = per_month(&entries, &[], Metric::Submissions, None, None);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get("2024-01"), Some(&5));
    }

    #[test]
    fn highest_month_prefers_earliest_on_ties() {
        let entries = vec![
            entry(1, "2024-02-10", 1, 7, 0),
            entry(2, "2024-01-10", 1, 7, 0),
            entry(3, "2024-03-10", 1, 3, 0),
        ];
        let buckets = per_month(&entries, &[], Metric::Submissions, None, None);
        assert_eq!(highest_month(&buckets), Some(("2024-01", 7)));
    }

    #[test]
    fn highest_month_replaces_only_on_strictly_greater() {
        let entries = vec![
            entry(1, "2024-01-10", 1, 3, 0),
            entry(2, "2024-02-10", 1, 7, 0),
        ];
        let buckets = per_month(&entries, &[], Metric::Submissions, None, None);
        assert_eq!(highest_month(&buckets), Some(("2024-02", 7)));
    }

    #[test]
    fn average_divides_by_populated_months_only() {
        // A single month holding 10 averages 10.0, not 10 / elapsed months.
        let entries = vec![entry(1, "2023-06-10", 1, 10, 0)];
        let buckets = per_month(&entries, &[], Metric::Submissions, None, None);
        assert_eq!(average_per_month(&buckets), Some(10.0));
        assert_eq!(average_per_month(&BTreeMap::new()), None);
    }

    #[test]
    fn client_focus_narrows_the_deal_log_only() {
        let deals = vec![
            deal(1, "2024-03-10", 1, "Acme Corp", DEAL_STATUS_DEAL),
            deal(2, "2024-03-11", 1, "BlueSky Tech", DEAL_STATUS_DEAL),
        ];
        let buckets = per_month(&[], &deals, Metric::Deals, None, Some("Acme Corp"));
        assert_eq!(buckets.get("2024-03"), Some(&1));
    }

    #[test]
    fn pullouts_count_pulled_out_records_only() {
        let deals = vec![
            deal(1, "2024-03-10", 1, "Acme Corp", DEAL_STATUS_DEAL),
            deal(2, "2024-03-11", 1, "Acme Corp", DEAL_STATUS_PULLED_OUT),
        ];
        assert_eq!(all_time_total(&[], &deals, Metric::Pullouts, None, None), 1);
        assert_eq!(all_time_total(&[], &deals, Metric::Deals, None, None), 1);
    }

    #[test]
    fn roles_per_month_uses_fallback_for_missing_dates() {
        let owned = vec![
            role(1, "Acme Corp", None, Some("2024-01-05"), "Active"),
            role(2, "Acme Corp", None, None, "Active"),
        ];
        let refs: Vec<&Role> = owned.iter().collect();
        let buckets = roles_per_month(&refs, "2024-03-20");
        assert_eq!(buckets.get("2024-01"), Some(&1));
        assert_eq!(buckets.get("2024-03"), Some(&1));
    }
}

//! Deterministic question answering over the desk collections. No learned
//! model: entity, metric, and temporal resolution are all ordered substring
//! checks, and every branch renders a fixed sentence template.

use crate::dates::{Calendar, month_label};
use crate::metrics::{self, Metric};
use crate::models::{ActivityEntry, Client, DealRecord, Recruiter, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    HighestMonth,
    AverageMonthly,
    ThisMonth,
    AllTime,
}

#[derive(Debug)]
pub struct Intent<'a> {
    pub recruiter: Option<&'a Recruiter>,
    pub client: Option<&'a Client>,
    pub metric: Option<Metric>,
    pub temporal: Temporal,
}

// Scanned in order; the first group with a substring hit wins, so a question
// naming two metrics only honors the earlier-declared one.
const METRIC_KEYWORDS: &[(Metric, &[&str])] = &[
    (
        Metric::Submissions,
        &["submission", "submissions", "submittal", "submittals"],
    ),
    (Metric::Interviews, &["interview", "interviews"]),
    (
        Metric::Deals,
        &["deal", "deals", "closure", "closures", "offer", "offers"],
    ),
    (
        Metric::Pullouts,
        &["pull out", "pullout", "pull outs", "pullouts", "drop off", "drop-off"],
    ),
    (Metric::Roles, &["role", "roles", "mandate", "mandates"]),
];

const HELP_BLANK: &str =
    "Ask about a recruiter, client, or metrics like submissions, interviews, deals, pull outs, or roles.";
const HELP_NO_MATCH: &str =
    "Ask about a recruiter or client, or mention a metric like submissions, interviews, deals, pull outs, or roles.";
const HELP_NOT_UNDERSTOOD: &str =
    "I could not understand this question. Try asking about submissions, interviews, deals, pull outs, or roles with a recruiter, client, or your overall desk.";

pub fn parse_intent<'a>(
    question: &str,
    recruiters: &'a [Recruiter],
    clients: &'a [Client],
) -> Intent<'a> {
    let normalized = question.to_lowercase();

    let recruiter = recruiters
        .iter()
        .find(|recruiter| normalized.contains(&recruiter.name.to_lowercase()));
    let client = clients
        .iter()
        .find(|client| normalized.contains(&client.name.to_lowercase()));

    let mut metric = None;
    for (candidate, words) in METRIC_KEYWORDS {
        if words.iter().any(|word| normalized.contains(word)) {
            metric = Some(*candidate);
            break;
        }
    }

    Intent {
        recruiter,
        client,
        metric,
        temporal: parse_temporal(&normalized),
    }
}

fn parse_temporal(normalized: &str) -> Temporal {
    let asks_highest = (normalized.contains("highest")
        || normalized.contains("max")
        || normalized.contains("peak"))
        && normalized.contains("month");
    let asks_average = normalized.contains("average monthly")
        || normalized.contains("avg monthly")
        || normalized.contains("average per month")
        || normalized.contains("per month")
        || normalized.contains("monthly");
    let asks_this_month = normalized.contains("this month")
        || normalized.contains("current month")
        || normalized.contains("in this month")
        || normalized.contains("so far this month");

    if asks_highest {
        Temporal::HighestMonth
    } else if asks_average {
        Temporal::AverageMonthly
    } else if asks_this_month {
        Temporal::ThisMonth
    } else {
        Temporal::AllTime
    }
}

/// Answers a raw question end to end: trim, parse, compose.
pub fn answer_question(
    question: &str,
    recruiters: &[Recruiter],
    clients: &[Client],
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    roles: &[Role],
    calendar: &Calendar,
) -> String {
    let text = question.trim();
    if text.is_empty() {
        return HELP_BLANK.to_string();
    }
    let intent = parse_intent(text, recruiters, clients);
    answer(&intent, entries, deals, roles, calendar)
}

/// Composes a parsed intent with the aggregator into one sentence. Every
/// branch answers missing data with an explicit sentence, never a bare "0"
/// for a desk it knows nothing about.
pub fn answer(
    intent: &Intent,
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    roles: &[Role],
    calendar: &Calendar,
) -> String {
    let Some(metric) = intent.metric else {
        if let Some(recruiter) = intent.recruiter {
            return recruiter_summary(recruiter, entries, deals);
        }
        if let Some(client) = intent.client {
            return client_summary(client, roles);
        }
        return HELP_NO_MATCH.to_string();
    };

    if metric == Metric::Roles {
        return roles_answer(intent.client, roles, intent.temporal, calendar);
    }

    if intent.recruiter.is_none() && intent.client.is_none() {
        if intent.temporal != Temporal::AllTime {
            return global_metric_answer(metric, intent.temporal, entries, deals, calendar);
        }
        let total = metrics::all_time_total(entries, deals, metric, None, None);
        return format!(
            "Across your desk you have {total} {} in total across all time.",
            metric.label()
        );
    }

    // Recruiter focus outranks a client mention once a metric is present.
    if let Some(recruiter) = intent.recruiter {
        return recruiter_metric_answer(recruiter, metric, intent.temporal, entries, deals, calendar);
    }

    if let Some(client) = intent.client {
        return client_metric_answer(client, metric, intent.temporal, entries, deals, roles, calendar);
    }

    HELP_NOT_UNDERSTOOD.to_string()
}

fn recruiter_summary(
    recruiter: &Recruiter,
    entries: &[ActivityEntry],
    deals: &[DealRecord],
) -> String {
    let has_entries = entries.iter().any(|entry| entry.recruiter_id == recruiter.id);
    let has_deals = deals.iter().any(|record| record.recruiter_id == recruiter.id);
    if !has_entries && !has_deals {
        return format!("I do not have any activity logged for {} yet.", recruiter.name);
    }

    let id = Some(recruiter.id);
    let submissions = metrics::all_time_total(entries, deals, Metric::Submissions, id, None);
    let interviews = metrics::all_time_total(entries, deals, Metric::Interviews, id, None);
    let deal_count = metrics::all_time_total(entries, deals, Metric::Deals, id, None);
    let pullouts = metrics::all_time_total(entries, deals, Metric::Pullouts, id, None);

    format!(
        "{} has {submissions} submissions, {interviews} interviews, {deal_count} deals, and {pullouts} pull outs across all time.",
        recruiter.name
    )
}

fn client_summary(client: &Client, roles: &[Role]) -> String {
    let for_client: Vec<&Role> = roles.iter().filter(|role| role.client == client.name).collect();
    if for_client.is_empty() {
        return format!("I do not have any roles logged for {} yet.", client.name);
    }
    let active = for_client.iter().filter(|role| role.status == "Active").count();
    let closed = for_client.iter().filter(|role| role.status == "Closed").count();
    format!(
        "{} has {active} active role(s) and {closed} closed role(s) on your desk.",
        client.name
    )
}

fn global_metric_answer(
    metric: Metric,
    temporal: Temporal,
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    calendar: &Calendar,
) -> String {
    let buckets = metrics::per_month(entries, deals, metric, None, None);
    let no_data = "I do not have enough data yet to calculate monthly stats for this metric.";
    if buckets.is_empty() {
        return no_data.to_string();
    }
    let label = metric.label();

    match temporal {
        Temporal::HighestMonth => {
            let Some((key, value)) = metrics::highest_month(&buckets) else {
                return no_data.to_string();
            };
            format!(
                "Your highest {label} month overall was {} with {value} {label}.",
                month_label(key)
            )
        }
        Temporal::AverageMonthly => {
            let Some(average) = metrics::average_per_month(&buckets) else {
                return no_data.to_string();
            };
            format!(
                "Across your desk you average {average:.1} {label} per month based on {} month(s) of data.",
                buckets.len()
            )
        }
        Temporal::ThisMonth => {
            let value = buckets.get(&calendar.month_key()).copied().unwrap_or(0);
            format!("In the current month so far you have {value} {label} across your desk.")
        }
        Temporal::AllTime => {
            let total = metrics::all_time_total(entries, deals, metric, None, None);
            format!("Across your desk you have {total} {label} in total across all time.")
        }
    }
}

fn recruiter_metric_answer(
    recruiter: &Recruiter,
    metric: Metric,
    temporal: Temporal,
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    calendar: &Calendar,
) -> String {
    let has_entries = entries.iter().any(|entry| entry.recruiter_id == recruiter.id);
    let has_deals = deals.iter().any(|record| record.recruiter_id == recruiter.id);
    if !has_entries && !has_deals {
        return format!("I do not have any activity logged for {} yet.", recruiter.name);
    }

    let label = metric.label();
    let id = Some(recruiter.id);

    match temporal {
        Temporal::HighestMonth => {
            let buckets = metrics::per_month(entries, deals, metric, id, None);
            let Some((key, value)) = metrics::highest_month(&buckets) else {
                return format!(
                    "I have entries for {}, but not enough date information to calculate monthly peaks.",
                    recruiter.name
                );
            };
            format!(
                "{}'s highest {label} month was {} with {value} {label}.",
                recruiter.name,
                month_label(key)
            )
        }
        Temporal::AverageMonthly => {
            let buckets = metrics::per_month(entries, deals, metric, id, None);
            let Some(average) = metrics::average_per_month(&buckets) else {
                return format!(
                    "I have entries for {}, but not enough date information to calculate monthly averages.",
                    recruiter.name
                );
            };
            format!(
                "{} averages {average:.1} {label} per month based on {} month(s) of data.",
                recruiter.name,
                buckets.len()
            )
        }
        Temporal::ThisMonth => {
            let buckets = metrics::per_month(entries, deals, metric, id, None);
            let value = buckets.get(&calendar.month_key()).copied().unwrap_or(0);
            format!(
                "{} has {value} {label} in the current month so far.",
                recruiter.name
            )
        }
        Temporal::AllTime => {
            let total = metrics::all_time_total(entries, deals, metric, id, None);
            format!(
                "{} has {total} {label} in total across all time.",
                recruiter.name
            )
        }
    }
}

fn client_metric_answer(
    client: &Client,
    metric: Metric,
    temporal: Temporal,
    entries: &[ActivityEntry],
    deals: &[DealRecord],
    roles: &[Role],
    calendar: &Calendar,
) -> String {
    let role_count = roles.iter().filter(|role| role.client == client.name).count();
    let has_roles = role_count > 0;
    let label = metric.label();

    if temporal != Temporal::AllTime {
        let buckets = metrics::per_month(entries, deals, metric, None, Some(&client.name));
        let no_monthly_data = if has_roles {
            format!(
                "{} has roles on your desk, but not enough dated activity to calculate monthly {label}.",
                client.name
            )
        } else {
            format!(
                "I have some data for your desk, but not enough date information to calculate monthly {label} for {}.",
                client.name
            )
        };
        match temporal {
            Temporal::HighestMonth => {
                let Some((key, value)) = metrics::highest_month(&buckets) else {
                    return no_monthly_data;
                };
                return format!(
                    "{}'s highest {label} month on your desk was {} with {value} {label}.",
                    client.name,
                    month_label(key)
                );
            }
            Temporal::AverageMonthly => {
                let Some(average) = metrics::average_per_month(&buckets) else {
                    return no_monthly_data;
                };
                return format!(
                    "{} averages {average:.1} {label} per month on your desk based on {} month(s) of data.",
                    client.name,
                    buckets.len()
                );
            }
            Temporal::ThisMonth => {
                if buckets.is_empty() {
                    return no_monthly_data;
                }
                let value = buckets.get(&calendar.month_key()).copied().unwrap_or(0);
                return format!(
                    "{} has {value} {label} in the current month so far on your desk.",
                    client.name
                );
            }
            Temporal::AllTime => {}
        }
    }

    // Submissions and interviews are not recorded per client, so the all-time
    // view reports the whole desk alongside the client's role count.
    let total = metrics::all_time_total(entries, deals, metric, None, Some(&client.name));
    if total == 0 && !has_roles {
        return format!(
            "I do not have enough data yet to answer this for {}.",
            client.name
        );
    }
    format!(
        "{} has {total} {label} in total across your desk, with {role_count} roles associated with this client.",
        client.name
    )
}

fn roles_answer(
    client: Option<&Client>,
    roles: &[Role],
    temporal: Temporal,
    calendar: &Calendar,
) -> String {
    let relevant: Vec<&Role> = match client {
        Some(target) => roles.iter().filter(|role| role.client == target.name).collect(),
        None => roles.iter().collect(),
    };

    if relevant.is_empty() {
        return match client {
            Some(target) => format!("I do not have any roles logged for {} yet.", target.name),
            None => "I do not have any roles logged yet.".to_string(),
        };
    }

    let buckets = metrics::roles_per_month(&relevant, &calendar.today_key);
    if buckets.is_empty() {
        return match client {
            Some(target) => format!(
                "I have roles for {}, but not enough date information to calculate monthly stats.",
                target.name
            ),
            None => "I have roles in the system, but not enough date information to calculate monthly stats."
                .to_string(),
        };
    }

    let total = relevant.len();
    match temporal {
        Temporal::HighestMonth => {
            let Some((key, value)) = metrics::highest_month(&buckets) else {
                return "I have roles in the system, but not enough date information to calculate monthly stats."
                    .to_string();
            };
            let month = month_label(key);
            match client {
                Some(target) => format!(
                    "{}'s highest roles month was {month} with {value} roles opened.",
                    target.name
                ),
                None => format!(
                    "Your highest roles month overall was {month} with {value} roles opened."
                ),
            }
        }
        Temporal::AverageMonthly => {
            let average = total as f64 / buckets.len() as f64;
            let months = buckets.len();
            match client {
                Some(target) => format!(
                    "{} has an average of {average:.1} roles per month based on {months} month(s) of data, with {total} roles in total.",
                    target.name
                ),
                None => format!(
                    "Across all clients there is an average of {average:.1} roles per month based on {months} month(s) of data, with {total} roles in total."
                ),
            }
        }
        Temporal::ThisMonth => {
            let value = buckets.get(&calendar.month_key()).copied().unwrap_or(0);
            match client {
                Some(target) => format!(
                    "{} has {value} roles opened in the current month so far.",
                    target.name
                ),
                None => format!(
                    "In the current month so far you have {value} roles opened across all clients."
                ),
            }
        }
        Temporal::AllTime => match client {
            Some(target) => format!("{} has {total} roles in total on your desk.", target.name),
            None => format!("Across all clients you have {total} roles in total on your desk."),
        },
    }
}

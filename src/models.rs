use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recruiter {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String, // unique among clients
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub client: String, // client name, not id
    pub recruiter_id: Option<i64>,
    pub released_date: Option<String>, // YYYY-MM-DD
    pub status: String,                // "Active", "Closed"
    pub sub_status: String,            // see role_sub_status_options
    pub remarks: Option<String>,       // latest free text
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub date: String, // YYYY-MM-DD
    pub recruiter_id: i64,
    pub submissions: i64,
    pub interviews: i64,
    // Legacy counters. This tool always writes them as zero; actual deal and
    // pull-out facts live in DealRecord, but historical data may carry values
    // here so aggregates sum both sources.
    pub deals: i64,
    pub pullouts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: i64,
    pub recruiter_id: i64,
    pub candidate_name: String,
    pub client_name: String,
    pub role_id: i64,
    pub role_name: String, // snapshot at deal time
    pub date: String,
    pub status: String, // "deal", "pulled-out"
    pub pulled_out_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleIssueInsight {
    pub id: i64,
    pub role_id: i64,
    pub client: String, // client name snapshot
    pub status: String,
    pub sub_status: String,
    pub date: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub severity: i64, // 1..=5
    pub is_risk: bool, // severity >= 3
    pub remark: String,
}

pub const ROLE_STATUSES: [&str; 2] = ["Active", "Closed"];

pub fn role_sub_status_options(status: &str) -> &'static [&'static str] {
    match status {
        "Active" => &["Open", "Feedback Pending"],
        "Closed" => &["Lost", "Deal", "On hold", "No answer"],
        _ => &[],
    }
}

pub const DEAL_STATUS_DEAL: &str = "deal";
pub const DEAL_STATUS_PULLED_OUT: &str = "pulled-out";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_statuses_depend_on_status() {
        assert_eq!(
            role_sub_status_options("Active"),
            ["Open", "Feedback Pending"]
        );
        assert!(role_sub_status_options("Closed").contains(&"Deal"));
        assert!(role_sub_status_options("Unknown").is_empty());
    }
}

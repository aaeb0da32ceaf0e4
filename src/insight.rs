//! Rule-based classifier that turns a free-text status remark into issue
//! categories, matched tags, and a 1-5 severity score.

pub struct CategoryDef {
    pub key: &'static str,
    pub label: &'static str,
    pub triggers: &'static [&'static str],
}

// Declaration order matters: categories are scanned top to bottom and matched
// tags keep first-seen order across that scan.
pub const ISSUE_CATEGORIES: &[CategoryDef] = &[
    CategoryDef {
        key: "CLIENT_RESPONSIVENESS",
        label: "Client responsiveness",
        triggers: &[
            "waiting feedback",
            "no feedback",
            "slow feedback",
            "delayed feedback",
            "client not responding",
            "not responding",
            "no response",
            "unresponsive",
            "reschedule",
            "rescheduled",
            "cancelled call",
            "canceled call",
            "cancelled interview",
            "canceled interview",
        ],
    },
    CategoryDef {
        key: "COMPENSATION_MISMATCH",
        label: "Compensation mismatch",
        triggers: &[
            "budget issue",
            "budget is low",
            "low budget",
            "low salary",
            "below market",
            "salary too low",
            "compensation",
            "package",
            "offer too low",
            "ctc",
        ],
    },
    CategoryDef {
        key: "ROLE_CLARITY",
        label: "Role clarity",
        triggers: &[
            "unclear jd",
            "unclear role",
            "unclear requirement",
            "requirements keep changing",
            "changing jd",
            "change requirement",
            "change in requirement",
            "new requirements came up",
            "scope changed",
        ],
    },
    CategoryDef {
        key: "CANDIDATE_QUALITY",
        label: "Candidate quality",
        triggers: &[
            "no suitable",
            "no relevant profiles",
            "no relevant candidates",
            "lack of experience",
            "quality issue",
            "not a good fit",
            "not good fit",
            "overqualified",
            "underqualified",
        ],
    },
    CategoryDef {
        key: "INTERNAL_PROCESS",
        label: "Internal process",
        triggers: &[
            "internal approval",
            "approval pending",
            "internal delay",
            "headcount freeze",
            "hiring freeze",
            "sign off pending",
            "signoff pending",
            "internal process",
        ],
    },
    CategoryDef {
        key: "MARKET_CONDITIONS",
        label: "Market conditions",
        triggers: &[
            "market is tough",
            "tough market",
            "shortage",
            "niche skill",
            "niche skills",
            "location constraint",
            "location issue",
            "few candidates available",
            "limited pool",
        ],
    },
    CategoryDef {
        key: "TIMELINE_URGENCY",
        label: "Timeline urgency",
        triggers: &[
            "urgent",
            "critical",
            "high priority",
            "tight timeline",
            "tight timelines",
            "aggressive timeline",
            "deadline",
            "need to close quickly",
            "close asap",
        ],
    },
];

pub const SEVERE_TERMS: &[&str] = &[
    "stuck",
    "blocked",
    "frustrated",
    "escalated",
    "escalation",
    "at risk",
    "might lose",
    "may lose",
    "lost candidate",
    "lost the candidate",
    "role on hold",
    "role cancelled",
    "role canceled",
];

/// Sentinel for remarks that match no category but still carry text.
pub const OTHER_CATEGORY: &str = "OTHER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemarkAnalysis {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub severity: i64,
    pub is_risk: bool,
}

pub fn category_label(key: &str) -> &str {
    ISSUE_CATEGORIES
        .iter()
        .find(|definition| definition.key == key)
        .map(|definition| definition.label)
        .unwrap_or(key)
}

/// Classifies a status remark. Substring matching, no word boundaries ("ctc"
/// matches inside any containing word). Pure: identical input always yields
/// identical output.
pub fn classify(remark: &str) -> RemarkAnalysis {
    let normalized = remark.to_lowercase();
    let mut categories: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();

    for definition in ISSUE_CATEGORIES {
        let mut matched = false;

        for trigger in definition.triggers {
            if normalized.contains(trigger) {
                matched = true;
                if !tags.iter().any(|tag| tag == trigger) {
                    tags.push((*trigger).to_string());
                }
            }
        }

        if matched {
            categories.push(definition.key.to_string());
        }
    }

    let mut severity: i64 = 1;

    if categories.len() >= 2 {
        severity += 1;
    }

    // Stacks with the >=2 bonus, so three categories add +2 in total.
    if categories.len() >= 3 {
        severity += 1;
    }

    if SEVERE_TERMS.iter().any(|term| normalized.contains(term)) {
        severity += 1;
    }

    if categories.is_empty() && !remark.trim().is_empty() {
        categories.push(OTHER_CATEGORY.to_string());
    }

    let severity = severity.clamp(1, 5);
    let is_risk = severity >= 3;

    RemarkAnalysis {
        categories,
        tags,
        severity,
        is_risk,
    }
}

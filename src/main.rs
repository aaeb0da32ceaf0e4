mod dates;
mod db;
mod insight;
mod metrics;
mod models;
mod query;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dates::{Calendar, RangeFilter, RangeKind};
use db::Database;
use models::{ROLE_STATUSES, role_sub_status_options};

#[derive(Parser)]
#[command(name = "desk")]
#[command(about = "Recruiting desk tracker - recruiters, clients, roles, and insights")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Manage recruiters
    Recruiter {
        #[command(subcommand)]
        command: RecruiterCommands,
    },

    /// Manage clients
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Manage roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Log daily activity for a recruiter
    Log {
        /// Recruiter ID
        #[arg(short, long)]
        recruiter: i64,

        /// Entry date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Submissions made
        #[arg(short, long, default_value = "0")]
        submissions: i64,

        /// Interviews held
        #[arg(short, long, default_value = "0")]
        interviews: i64,
    },

    /// Manage the deal log
    Deal {
        #[command(subcommand)]
        command: DealCommands,
    },

    /// Show role-issue insights
    Insights {
        /// Filter by client name
        #[arg(short, long)]
        client: Option<String>,

        /// Show only risk notes (severity >= 3)
        #[arg(long)]
        risk_only: bool,

        /// Date range
        #[arg(short, long, value_enum, default_value = "all")]
        range: RangeKind,

        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Reference date for range checks (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show desk statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },

    /// Ask a question about your desk
    Ask {
        /// The question, e.g. "What is Jordan's highest submission month?"
        question: String,

        /// Reference date for range checks (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
enum RecruiterCommands {
    /// Add a recruiter
    Add {
        /// Recruiter name
        name: String,
    },

    /// List recruiters
    List {
        /// Include inactive recruiters
        #[arg(long)]
        all: bool,
    },

    /// Rename a recruiter
    Rename {
        /// Recruiter ID
        id: i64,

        /// New name
        name: String,
    },

    /// Toggle a recruiter between active and inactive
    Toggle {
        /// Recruiter ID
        id: i64,
    },

    /// Delete a recruiter (history keeps the orphaned id)
    Delete {
        /// Recruiter ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Add a client (duplicate names are ignored)
    Add {
        /// Client name
        name: String,
    },

    /// List clients
    List {
        /// Include inactive clients
        #[arg(long)]
        all: bool,
    },

    /// Rename a client
    Rename {
        /// Client ID
        id: i64,

        /// New name
        name: String,
    },

    /// Toggle a client between active and inactive
    Toggle {
        /// Client ID
        id: i64,
    },

    /// Delete a client
    Delete {
        /// Client ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// Add a role
    Add {
        /// Role name
        #[arg(short, long)]
        name: String,

        /// Client name
        #[arg(short, long)]
        client: String,

        /// Assigned recruiter ID
        #[arg(short, long)]
        recruiter: Option<i64>,

        /// Release date (YYYY-MM-DD)
        #[arg(long)]
        released: Option<String>,

        /// Free-text remarks
        #[arg(long)]
        remarks: Option<String>,
    },

    /// List roles
    List {
        /// Filter by status (Active, Closed)
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by client name
        #[arg(short, long)]
        client: Option<String>,
    },

    /// Show role details
    Show {
        /// Role ID
        id: i64,
    },

    /// Update role status; non-empty remarks are classified into an insight
    Status {
        /// Role ID
        id: i64,

        /// New status (Active, Closed)
        #[arg(short, long)]
        status: String,

        /// New sub-status (depends on status)
        #[arg(long)]
        sub_status: String,

        /// Free-text remarks
        #[arg(long)]
        remarks: Option<String>,

        /// Date stamped on the generated insight (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
enum DealCommands {
    /// Record a deal and close the role
    Add {
        /// Recruiter ID
        #[arg(short, long)]
        recruiter: i64,

        /// Candidate name
        #[arg(long)]
        candidate: String,

        /// Client name
        #[arg(short, long)]
        client: String,

        /// Role ID
        #[arg(long)]
        role: i64,

        /// Deal date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Mark a deal as pulled out and reopen the role
    Pullout {
        /// Deal ID
        id: i64,

        /// Pull-out date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List the deal log
    List,
}

#[derive(Subcommand)]
enum StatsCommands {
    /// Totals for one recruiter or the whole active desk
    Recruiter {
        /// Focus on one recruiter (falls back to all active if missing)
        #[arg(long)]
        id: Option<i64>,

        /// Date range
        #[arg(short, long, value_enum, default_value = "all")]
        range: RangeKind,

        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Reference date for range checks (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Role and risk overview for one client or all active clients
    Client {
        /// Focus on one client by name (falls back to all active if missing)
        #[arg(long)]
        name: Option<String>,

        /// Date range
        #[arg(short, long, value_enum, default_value = "all")]
        range: RangeKind,

        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Reference date for range checks (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

fn calendar_for(today: Option<&str>) -> Result<Calendar> {
    let reference = match today {
        Some(value) => parse_date(value)?,
        None => chrono::Local::now().date_naive(),
    };
    Ok(Calendar::for_reference(reference))
}

fn date_or_today(date: Option<&str>) -> Result<String> {
    match date {
        Some(value) => {
            parse_date(value)?;
            Ok(value.to_string())
        }
        None => Ok(chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut db = Database::open()?;

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Recruiter { command } => {
            db.ensure_initialized()?;
            match command {
                RecruiterCommands::Add { name } => {
                    let id = db.add_recruiter(&name)?;
                    println!("Added recruiter '{}' (ID: {})", name, id);
                }

                RecruiterCommands::List { all } => {
                    let recruiters = db.list_recruiters(all)?;
                    if recruiters.is_empty() {
                        println!("No recruiters found.");
                    } else {
                        println!("{:<6} {:<10} {:<30}", "ID", "STATUS", "NAME");
                        println!("{}", "-".repeat(46));
                        for recruiter in recruiters {
                            println!(
                                "{:<6} {:<10} {:<30}",
                                recruiter.id,
                                if recruiter.active { "active" } else { "inactive" },
                                truncate(&recruiter.name, 28)
                            );
                        }
                    }
                }

                RecruiterCommands::Rename { id, name } => {
                    db.rename_recruiter(id, &name)?;
                    println!("Renamed recruiter #{} to '{}'", id, name);
                }

                RecruiterCommands::Toggle { id } => {
                    let active = db.toggle_recruiter(id)?;
                    println!(
                        "Recruiter #{} is now {}.",
                        id,
                        if active { "active" } else { "inactive" }
                    );
                }

                RecruiterCommands::Delete { id } => {
                    db.delete_recruiter(id)?;
                    println!("Deleted recruiter #{}. Logged history keeps its id.", id);
                }
            }
        }

        Commands::Client { command } => {
            db.ensure_initialized()?;
            match command {
                ClientCommands::Add { name } => match db.add_client(&name)? {
                    Some(id) => println!("Added client '{}' (ID: {})", name, id),
                    None => println!("Client '{}' already exists. Nothing added.", name),
                },

                ClientCommands::List { all } => {
                    let clients = db.list_clients(all)?;
                    if clients.is_empty() {
                        println!("No clients found.");
                    } else {
                        println!("{:<6} {:<10} {:<30}", "ID", "STATUS", "NAME");
                        println!("{}", "-".repeat(46));
                        for client in clients {
                            println!(
                                "{:<6} {:<10} {:<30}",
                                client.id,
                                if client.active { "active" } else { "inactive" },
                                truncate(&client.name, 28)
                            );
                        }
                    }
                }

                ClientCommands::Rename { id, name } => {
                    db.rename_client(id, &name)?;
                    println!("Renamed client #{} to '{}'", id, name);
                }

                ClientCommands::Toggle { id } => {
                    let active = db.toggle_client(id)?;
                    println!(
                        "Client #{} is now {}.",
                        id,
                        if active { "active" } else { "inactive" }
                    );
                }

                ClientCommands::Delete { id } => {
                    db.delete_client(id)?;
                    println!("Deleted client #{}.", id);
                }
            }
        }

        Commands::Role { command } => {
            db.ensure_initialized()?;
            match command {
                RoleCommands::Add {
                    name,
                    client,
                    recruiter,
                    released,
                    remarks,
                } => {
                    if let Some(date) = released.as_deref() {
                        parse_date(date)?;
                    }
                    db.get_client_by_name(&client)?.ok_or_else(|| {
                        anyhow!("Client '{}' not found. Add it with 'desk client add'", client)
                    })?;
                    let id = db.add_role(
                        &name,
                        &client,
                        recruiter,
                        released.as_deref(),
                        remarks.as_deref(),
                    )?;
                    println!("Added role '{}' for {} (ID: {})", name, client, id);
                }

                RoleCommands::List { status, client } => {
                    let roles = db.list_roles(status.as_deref(), client.as_deref())?;
                    if roles.is_empty() {
                        println!("No roles found.");
                    } else {
                        println!(
                            "{:<6} {:<25} {:<20} {:<8} {:<18} {:<12}",
                            "ID", "ROLE", "CLIENT", "STATUS", "SUB-STATUS", "RELEASED"
                        );
                        println!("{}", "-".repeat(89));
                        for role in roles {
                            println!(
                                "{:<6} {:<25} {:<20} {:<8} {:<18} {:<12}",
                                role.id,
                                truncate(&role.name, 23),
                                truncate(&role.client, 18),
                                role.status,
                                role.sub_status,
                                role.released_date.unwrap_or_else(|| "-".to_string())
                            );
                        }
                    }
                }

                RoleCommands::Show { id } => match db.get_role(id)? {
                    Some(role) => {
                        println!("Role #{}", role.id);
                        println!("Name: {}", role.name);
                        println!("Client: {}", role.client);
                        if let Some(recruiter_id) = role.recruiter_id {
                            match db.get_recruiter(recruiter_id)? {
                                Some(recruiter) => println!("Recruiter: {} (#{})", recruiter.name, recruiter.id),
                                None => println!("Recruiter: #{} (deleted)", recruiter_id),
                            }
                        }
                        if let Some(released) = &role.released_date {
                            println!("Released: {}", released);
                        }
                        println!("Status: {} / {}", role.status, role.sub_status);
                        if let Some(remarks) = &role.remarks {
                            println!("Remarks: {}", remarks);
                        }
                    }
                    None => {
                        println!("Role #{} not found.", id);
                    }
                },

                RoleCommands::Status {
                    id,
                    status,
                    sub_status,
                    remarks,
                    today,
                } => {
                    if !ROLE_STATUSES.contains(&status.as_str()) {
                        return Err(anyhow!(
                            "Unknown status '{}'. Expected one of: {}",
                            status,
                            ROLE_STATUSES.join(", ")
                        ));
                    }
                    let allowed = role_sub_status_options(&status);
                    if !allowed.contains(&sub_status.as_str()) {
                        return Err(anyhow!(
                            "Sub-status '{}' is not valid for status '{}'. Expected one of: {}",
                            sub_status,
                            status,
                            allowed.join(", ")
                        ));
                    }

                    let role = db
                        .get_role(id)?
                        .ok_or_else(|| anyhow!("Role #{} not found", id))?;
                    db.update_role_status(id, &status, &sub_status, remarks.as_deref())?;
                    println!("Role #{} is now {} / {}.", id, status, sub_status);

                    let remark_text = remarks.as_deref().unwrap_or("").trim().to_string();
                    if !remark_text.is_empty() {
                        let calendar = calendar_for(today.as_deref())?;
                        let analysis = insight::classify(&remark_text);
                        db.add_insight(
                            id,
                            &role.client,
                            &status,
                            &sub_status,
                            &calendar.today_key,
                            &analysis,
                            &remark_text,
                        )?;
                        let labels: Vec<&str> = analysis
                            .categories
                            .iter()
                            .map(|key| insight::category_label(key))
                            .collect();
                        println!(
                            "Logged insight: {} (severity {}{})",
                            labels.join(", "),
                            analysis.severity,
                            if analysis.is_risk { ", RISK" } else { "" }
                        );
                    }
                }
            }
        }

        Commands::Log {
            recruiter,
            date,
            submissions,
            interviews,
        } => {
            db.ensure_initialized()?;
            parse_date(&date)?;
            if submissions == 0 && interviews == 0 {
                return Err(anyhow!(
                    "Nothing to log: submissions and interviews are both zero"
                ));
            }
            if submissions < 0 || interviews < 0 {
                return Err(anyhow!("Counts cannot be negative"));
            }
            db.get_recruiter(recruiter)?
                .ok_or_else(|| anyhow!("Recruiter #{} not found", recruiter))?;
            let id = db.add_entry(&date, recruiter, submissions, interviews)?;
            println!(
                "Logged entry #{}: {} submissions, {} interviews on {}",
                id, submissions, interviews, date
            );
        }

        Commands::Deal { command } => {
            db.ensure_initialized()?;
            match command {
                DealCommands::Add {
                    recruiter,
                    candidate,
                    client,
                    role,
                    date,
                } => {
                    let date = date_or_today(date.as_deref())?;
                    db.get_recruiter(recruiter)?
                        .ok_or_else(|| anyhow!("Recruiter #{} not found", recruiter))?;
                    db.get_client_by_name(&client)?.ok_or_else(|| {
                        anyhow!("Client '{}' not found. Add it with 'desk client add'", client)
                    })?;
                    let id = db.add_deal(recruiter, &candidate, &client, role, &date)?;
                    println!(
                        "Recorded deal #{} for {} at {}. Role #{} closed as Deal.",
                        id, candidate, client, role
                    );
                }

                DealCommands::Pullout { id, date } => {
                    let date = date_or_today(date.as_deref())?;
                    let record = db.mark_deal_pulled_out(id, &date)?;
                    println!(
                        "Deal #{} marked pulled out on {}. Role #{} reopened.",
                        record.id, date, record.role_id
                    );
                }

                DealCommands::List => {
                    let deals = db.list_deals()?;
                    if deals.is_empty() {
                        println!("No deals recorded.");
                    } else {
                        println!(
                            "{:<6} {:<18} {:<18} {:<22} {:<12} {:<12}",
                            "ID", "CANDIDATE", "CLIENT", "ROLE", "DATE", "STATUS"
                        );
                        println!("{}", "-".repeat(88));
                        for record in deals {
                            println!(
                                "{:<6} {:<18} {:<18} {:<22} {:<12} {:<12}",
                                record.id,
                                truncate(&record.candidate_name, 16),
                                truncate(&record.client_name, 16),
                                truncate(&record.role_name, 20),
                                record.date,
                                record.status
                            );
                        }
                    }
                }
            }
        }

        Commands::Insights {
            client,
            risk_only,
            range,
            from,
            to,
            today,
        } => {
            db.ensure_initialized()?;
            let calendar = calendar_for(today.as_deref())?;
            let filter = RangeFilter::new(range, from.as_deref(), to.as_deref());

            let insights: Vec<_> = db
                .list_insights()?
                .into_iter()
                .filter(|insight| {
                    client.as_deref().is_none_or(|name| insight.client == name)
                })
                .filter(|insight| !risk_only || insight.is_risk)
                .filter(|insight| filter.matches(&insight.date, &calendar))
                .collect();

            if insights.is_empty() {
                println!("No insights found.");
            } else {
                for insight in insights {
                    let labels: Vec<&str> = insight
                        .categories
                        .iter()
                        .map(|key| insight::category_label(key))
                        .collect();
                    println!(
                        "[{}] {} - role #{} ({} / {}){}",
                        insight.date,
                        insight.client,
                        insight.role_id,
                        insight.status,
                        insight.sub_status,
                        if insight.is_risk { " RISK" } else { "" }
                    );
                    println!("  Severity {}: {}", insight.severity, labels.join(", "));
                    println!("  \"{}\"", insight.remark);
                }
            }
        }

        Commands::Stats { command } => {
            db.ensure_initialized()?;
            match command {
                StatsCommands::Recruiter {
                    id,
                    range,
                    from,
                    to,
                    today,
                } => {
                    let calendar = calendar_for(today.as_deref())?;
                    let filter = RangeFilter::new(range, from.as_deref(), to.as_deref());

                    let recruiters = db.list_recruiters(true)?;
                    let entries = db.list_entries()?;
                    let deals = db.list_deals()?;
                    let roles = db.list_roles(None, None)?;

                    let ids = metrics::selected_recruiter_ids(&recruiters, id);
                    let totals = metrics::desk_totals(&entries, &deals, &ids, &filter, &calendar);
                    let role_count =
                        metrics::assigned_roles_count(&roles, &ids, &filter, &calendar);

                    let scope = match id.and_then(|focused| {
                        recruiters.iter().find(|recruiter| recruiter.id == focused)
                    }) {
                        Some(recruiter) => recruiter.name.clone(),
                        None => "All active recruiters".to_string(),
                    };

                    println!("{}", scope);
                    println!("{}", "-".repeat(scope.len().max(20)));
                    println!("Submissions:    {}", totals.submissions);
                    println!("Interviews:     {}", totals.interviews);
                    println!("Deals:          {}", totals.deals);
                    println!("Pull outs:      {}", totals.pullouts);
                    println!("Assigned roles: {}", role_count);
                }

                StatsCommands::Client {
                    name,
                    range,
                    from,
                    to,
                    today,
                } => {
                    let calendar = calendar_for(today.as_deref())?;
                    let filter = RangeFilter::new(range, from.as_deref(), to.as_deref());

                    let recruiters = db.list_recruiters(true)?;
                    let clients = db.list_clients(true)?;
                    let entries = db.list_entries()?;
                    let deals = db.list_deals()?;
                    let roles = db.list_roles(None, None)?;
                    let insights = db.list_insights()?;

                    let names = metrics::selected_client_names(&clients, name.as_deref());
                    let selected: Vec<_> = roles
                        .iter()
                        .filter(|role| names.contains(&role.client))
                        .filter(|role| metrics::role_in_range(role, &filter, &calendar))
                        .collect();
                    let active = selected.iter().filter(|role| role.status == "Active").count();
                    let closed = selected.iter().filter(|role| role.status == "Closed").count();

                    // Submissions and interviews are logged per recruiter, not
                    // per client, so the desk-wide totals accompany the client
                    // role view.
                    let ids = metrics::selected_recruiter_ids(&recruiters, None);
                    let totals = metrics::desk_totals(&entries, &deals, &ids, &filter, &calendar);

                    let risk_notes = insights
                        .iter()
                        .filter(|insight| names.contains(&insight.client))
                        .filter(|insight| filter.matches(&insight.date, &calendar))
                        .filter(|insight| insight.is_risk)
                        .count();

                    let scope = match name.as_deref() {
                        Some(focused) if names == vec![focused.to_string()] => focused.to_string(),
                        _ => "All active clients".to_string(),
                    };

                    println!("{}", scope);
                    println!("{}", "-".repeat(scope.len().max(20)));
                    println!("Active roles:    {}", active);
                    println!("Closed roles:    {}", closed);
                    println!("Desk interviews: {}", totals.interviews);
                    println!("Desk deals:      {}", totals.deals);
                    println!("Risk notes:      {}", risk_notes);
                }
            }
        }

        Commands::Ask { question, today } => {
            db.ensure_initialized()?;
            let calendar = calendar_for(today.as_deref())?;

            let recruiters = db.list_recruiters(true)?;
            let clients = db.list_clients(true)?;
            let entries = db.list_entries()?;
            let deals = db.list_deals()?;
            let roles = db.list_roles(None, None)?;

            let reply = query::answer_question(
                &question,
                &recruiters,
                &clients,
                &entries,
                &deals,
                &roles,
                &calendar,
            );
            println!("{}", reply);
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use std::path::PathBuf;

use crate::insight::RemarkAnalysis;
use crate::models::{
    ActivityEntry, Client, DEAL_STATUS_DEAL, DEAL_STATUS_PULLED_OUT, DealRecord, Recruiter, Role,
    RoleIssueInsight,
};

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        Ok(Self { conn, path })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "desk") {
            Ok(proj_dirs.data_dir().join("desk.db"))
        } else {
            Ok(PathBuf::from("desk.db"))
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS recruiters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                client TEXT NOT NULL,
                recruiter_id INTEGER,
                released_date TEXT,
                status TEXT NOT NULL DEFAULT 'Active' CHECK (status IN ('Active', 'Closed')),
                sub_status TEXT NOT NULL DEFAULT 'Open',
                remarks TEXT
            );

            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                recruiter_id INTEGER NOT NULL,
                submissions INTEGER NOT NULL DEFAULT 0,
                interviews INTEGER NOT NULL DEFAULT 0,
                deals INTEGER NOT NULL DEFAULT 0,
                pullouts INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS deals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recruiter_id INTEGER NOT NULL,
                candidate_name TEXT NOT NULL,
                client_name TEXT NOT NULL,
                role_id INTEGER NOT NULL REFERENCES roles(id),
                role_name TEXT NOT NULL,
                date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'deal' CHECK (status IN ('deal', 'pulled-out')),
                pulled_out_date TEXT
            );

            CREATE TABLE IF NOT EXISTS insights (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role_id INTEGER NOT NULL,
                client TEXT NOT NULL,
                status TEXT NOT NULL,
                sub_status TEXT NOT NULL,
                date TEXT NOT NULL,
                categories TEXT NOT NULL,
                tags TEXT NOT NULL,
                severity INTEGER NOT NULL CHECK (severity BETWEEN 1 AND 5),
                is_risk INTEGER NOT NULL,
                remark TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_recruiter ON entries(recruiter_id);
            CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
            CREATE INDEX IF NOT EXISTS idx_deals_recruiter ON deals(recruiter_id);
            CREATE INDEX IF NOT EXISTS idx_roles_client ON roles(client);
            CREATE INDEX IF NOT EXISTS idx_insights_client ON insights(client);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='roles'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!("Database not initialized. Run 'desk init' first."));
        }
        Ok(())
    }

    // --- Recruiter operations ---

    pub fn add_recruiter(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO recruiters (name) VALUES (?1)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_recruiters(&self, include_inactive: bool) -> Result<Vec<Recruiter>> {
        let sql = if include_inactive {
            "SELECT id, name, active FROM recruiters ORDER BY id"
        } else {
            "SELECT id, name, active FROM recruiters WHERE active = 1 ORDER BY id"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], Self::row_to_recruiter)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list recruiters")
    }

    pub fn get_recruiter(&self, id: i64) -> Result<Option<Recruiter>> {
        let result = self.conn.query_row(
            "SELECT id, name, active FROM recruiters WHERE id = ?1",
            [id],
            Self::row_to_recruiter,
        );
        match result {
            Ok(recruiter) => Ok(Some(recruiter)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn rename_recruiter(&self, id: i64, name: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE recruiters SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Recruiter #{} not found", id));
        }
        Ok(())
    }

    /// Flips the active flag and returns the new state.
    pub fn toggle_recruiter(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE recruiters SET active = 1 - active WHERE id = ?1",
            [id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Recruiter #{} not found", id));
        }
        let active: i64 =
            self.conn
                .query_row("SELECT active FROM recruiters WHERE id = ?1", [id], |row| {
                    row.get(0)
                })?;
        Ok(active == 1)
    }

    /// Removes the recruiter row only. Historical entries, deals, and role
    /// assignments keep the orphaned id; aggregates tolerate it.
    pub fn delete_recruiter(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM recruiters WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(anyhow!("Recruiter #{} not found", id));
        }
        Ok(())
    }

    fn row_to_recruiter(row: &rusqlite::Row) -> rusqlite::Result<Recruiter> {
        Ok(Recruiter {
            id: row.get(0)?,
            name: row.get(1)?,
            active: row.get::<_, i64>(2)? == 1,
        })
    }

    // --- Client operations ---

    /// Returns None when a client with this name already exists.
    pub fn add_client(&self, name: &str) -> Result<Option<i64>> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM clients WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .ok();
        if existing.is_some() {
            return Ok(None);
        }
        self.conn
            .execute("INSERT INTO clients (name) VALUES (?1)", [name])?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    pub fn list_clients(&self, include_inactive: bool) -> Result<Vec<Client>> {
        let sql = if include_inactive {
            "SELECT id, name, active FROM clients ORDER BY id"
        } else {
            "SELECT id, name, active FROM clients WHERE active = 1 ORDER BY id"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], Self::row_to_client)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list clients")
    }

    pub fn get_client_by_name(&self, name: &str) -> Result<Option<Client>> {
        let result = self.conn.query_row(
            "SELECT id, name, active FROM clients WHERE name = ?1",
            [name],
            Self::row_to_client,
        );
        match result {
            Ok(client) => Ok(Some(client)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn rename_client(&self, id: i64, name: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE clients SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Client #{} not found", id));
        }
        Ok(())
    }

    pub fn toggle_client(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("UPDATE clients SET active = 1 - active WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(anyhow!("Client #{} not found", id));
        }
        let active: i64 =
            self.conn
                .query_row("SELECT active FROM clients WHERE id = ?1", [id], |row| {
                    row.get(0)
                })?;
        Ok(active == 1)
    }

    pub fn delete_client(&self, id: i64) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM clients WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(anyhow!("Client #{} not found", id));
        }
        Ok(())
    }

    fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
        Ok(Client {
            id: row.get(0)?,
            name: row.get(1)?,
            active: row.get::<_, i64>(2)? == 1,
        })
    }

    // --- Role operations ---

    pub fn add_role(
        &self,
        name: &str,
        client: &str,
        recruiter_id: Option<i64>,
        released_date: Option<&str>,
        remarks: Option<&str>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO roles (name, client, recruiter_id, released_date, status, sub_status, remarks)
             VALUES (?1, ?2, ?3, ?4, 'Active', 'Open', ?5)",
            params![name, client, recruiter_id, released_date, remarks],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_roles(&self, status: Option<&str>, client: Option<&str>) -> Result<Vec<Role>> {
        let mut sql = String::from(
            "SELECT id, name, client, recruiter_id, released_date, status, sub_status, remarks
             FROM roles WHERE 1=1",
        );
        let mut params: Vec<String> = vec![];

        if let Some(s) = status {
            sql.push_str(&format!(" AND status = ?{}", params.len() + 1));
            params.push(s.to_string());
        }
        if let Some(c) = client {
            sql.push_str(&format!(" AND client = ?{}", params.len() + 1));
            params.push(c.to_string());
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match params.len() {
            0 => stmt.query_map([], Self::row_to_role)?,
            1 => stmt.query_map([&params[0]], Self::row_to_role)?,
            2 => stmt.query_map([&params[0], &params[1]], Self::row_to_role)?,
            _ => return Err(anyhow!("Too many parameters")),
        };
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list roles")
    }

    pub fn get_role(&self, id: i64) -> Result<Option<Role>> {
        let result = self.conn.query_row(
            "SELECT id, name, client, recruiter_id, released_date, status, sub_status, remarks
             FROM roles WHERE id = ?1",
            [id],
            Self::row_to_role,
        );
        match result {
            Ok(role) => Ok(Some(role)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Updates status and sub-status; remarks replace the stored text only
    /// when provided.
    pub fn update_role_status(
        &self,
        id: i64,
        status: &str,
        sub_status: &str,
        remarks: Option<&str>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE roles SET status = ?1, sub_status = ?2,
                 remarks = COALESCE(?3, remarks)
             WHERE id = ?4",
            params![status, sub_status, remarks, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Role #{} not found", id));
        }
        Ok(())
    }

    fn row_to_role(row: &rusqlite::Row) -> rusqlite::Result<Role> {
        Ok(Role {
            id: row.get(0)?,
            name: row.get(1)?,
            client: row.get(2)?,
            recruiter_id: row.get(3)?,
            released_date: row.get(4)?,
            status: row.get(5)?,
            sub_status: row.get(6)?,
            remarks: row.get(7)?,
        })
    }

    // --- Activity entry operations ---

    /// Appends a daily activity entry. Deal and pull-out counters are always
    /// written as zero; those facts live in the deal log.
    pub fn add_entry(
        &self,
        date: &str,
        recruiter_id: i64,
        submissions: i64,
        interviews: i64,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO entries (date, recruiter_id, submissions, interviews, deals, pullouts)
             VALUES (?1, ?2, ?3, ?4, 0, 0)",
            params![date, recruiter_id, submissions, interviews],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_entries(&self) -> Result<Vec<ActivityEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, recruiter_id, submissions, interviews, deals, pullouts
             FROM entries ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], Self::row_to_entry)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list entries")
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<ActivityEntry> {
        Ok(ActivityEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            recruiter_id: row.get(2)?,
            submissions: row.get(3)?,
            interviews: row.get(4)?,
            deals: row.get(5)?,
            pullouts: row.get(6)?,
        })
    }

    // --- Deal operations ---

    /// Records a deal against a role and closes that role as a deal, in one
    /// transaction. The role name is denormalized into the record.
    pub fn add_deal(
        &mut self,
        recruiter_id: i64,
        candidate_name: &str,
        client_name: &str,
        role_id: i64,
        date: &str,
    ) -> Result<i64> {
        let role = self
            .get_role(role_id)?
            .ok_or_else(|| anyhow!("Role #{} not found", role_id))?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO deals (recruiter_id, candidate_name, client_name, role_id, role_name, date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                recruiter_id,
                candidate_name,
                client_name,
                role_id,
                role.name,
                date,
                DEAL_STATUS_DEAL
            ],
        )?;
        let deal_id = tx.last_insert_rowid();
        tx.execute(
            "UPDATE roles SET status = 'Closed', sub_status = 'Deal' WHERE id = ?1",
            [role_id],
        )?;
        tx.commit()?;
        Ok(deal_id)
    }

    /// Flips a deal to pulled-out in place (same record, not a new one) and
    /// reopens the associated role.
    pub fn mark_deal_pulled_out(&mut self, deal_id: i64, date: &str) -> Result<DealRecord> {
        let deal = self
            .get_deal(deal_id)?
            .ok_or_else(|| anyhow!("Deal #{} not found", deal_id))?;
        if deal.status == DEAL_STATUS_PULLED_OUT {
            return Err(anyhow!("Deal #{} is already pulled out", deal_id));
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE deals SET status = ?1, pulled_out_date = ?2 WHERE id = ?3",
            params![DEAL_STATUS_PULLED_OUT, date, deal_id],
        )?;
        tx.execute(
            "UPDATE roles SET status = 'Active', sub_status = 'Open' WHERE id = ?1",
            [deal.role_id],
        )?;
        tx.commit()?;

        self.get_deal(deal_id)?
            .ok_or_else(|| anyhow!("Deal #{} not found", deal_id))
    }

    pub fn list_deals(&self) -> Result<Vec<DealRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recruiter_id, candidate_name, client_name, role_id, role_name, date, status, pulled_out_date
             FROM deals ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], Self::row_to_deal)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list deals")
    }

    pub fn get_deal(&self, id: i64) -> Result<Option<DealRecord>> {
        let result = self.conn.query_row(
            "SELECT id, recruiter_id, candidate_name, client_name, role_id, role_name, date, status, pulled_out_date
             FROM deals WHERE id = ?1",
            [id],
            Self::row_to_deal,
        );
        match result {
            Ok(deal) => Ok(Some(deal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn row_to_deal(row: &rusqlite::Row) -> rusqlite::Result<DealRecord> {
        Ok(DealRecord {
            id: row.get(0)?,
            recruiter_id: row.get(1)?,
            candidate_name: row.get(2)?,
            client_name: row.get(3)?,
            role_id: row.get(4)?,
            role_name: row.get(5)?,
            date: row.get(6)?,
            status: row.get(7)?,
            pulled_out_date: row.get(8)?,
        })
    }

    // --- Insight operations ---

    /// Appends a role-issue insight from a classified remark. Insights are
    /// append-only; nothing updates or deletes them.
    pub fn add_insight(
        &self,
        role_id: i64,
        client: &str,
        status: &str,
        sub_status: &str,
        date: &str,
        analysis: &RemarkAnalysis,
        remark: &str,
    ) -> Result<i64> {
        let categories = serde_json::to_string(&analysis.categories)?;
        let tags = serde_json::to_string(&analysis.tags)?;
        self.conn.execute(
            "INSERT INTO insights (role_id, client, status, sub_status, date, categories, tags, severity, is_risk, remark)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                role_id,
                client,
                status,
                sub_status,
                date,
                categories,
                tags,
                analysis.severity,
                analysis.is_risk as i64,
                remark
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_insights(&self) -> Result<Vec<RoleIssueInsight>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role_id, client, status, sub_status, date, categories, tags, severity, is_risk, remark
             FROM insights ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::row_to_insight)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list insights")
    }

    fn row_to_insight(row: &rusqlite::Row) -> rusqlite::Result<RoleIssueInsight> {
        let categories: String = row.get(6)?;
        let tags: String = row.get(7)?;
        Ok(RoleIssueInsight {
            id: row.get(0)?,
            role_id: row.get(1)?,
            client: row.get(2)?,
            status: row.get(3)?,
            sub_status: row.get(4)?,
            date: row.get(5)?,
            categories: serde_json::from_str(&categories).unwrap_or_default(),
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            severity: row.get(8)?,
            is_risk: row.get::<_, i64>(9)? == 1,
            remark: row.get(10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::classify;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    #[test]
    fn recruiter_lifecycle_roundtrips() {
        let db = test_db();
        let id = db.add_recruiter("Alex").unwrap();
        db.rename_recruiter(id, "Alexandra").unwrap();
        assert!(!db.toggle_recruiter(id).unwrap());

        let all = db.list_recruiters(true).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alexandra");
        assert!(db.list_recruiters(false).unwrap().is_empty());
    }

    #[test]
    fn clients_resolve_by_exact_name_only() {
        let db = test_db();
        db.add_client("Acme Corp").unwrap();
        assert!(db.get_client_by_name("Acme Corp").unwrap().is_some());
        assert!(db.get_client_by_name("acme corp").unwrap().is_none());
        assert!(db.get_client_by_name("Acme").unwrap().is_none());
    }

    #[test]
    fn duplicate_client_names_are_rejected_quietly() {
        let db = test_db();
        assert!(db.add_client("Acme Corp").unwrap().is_some());
        assert!(db.add_client("Acme Corp").unwrap().is_none());
        assert_eq!(db.list_clients(true).unwrap().len(), 1);
    }

    #[test]
    fn deleting_a_recruiter_orphans_history_instead_of_cascading() {
        let db = test_db();
        let id = db.add_recruiter("Alex").unwrap();
        db.add_entry("2024-03-05", id, 4, 2).unwrap();
        db.delete_recruiter(id).unwrap();

        // The entry survives with a dangling recruiter id.
        let entries = db.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].recruiter_id, id);
    }

    #[test]
    fn deal_closes_the_role_and_pullout_reopens_it() {
        let mut db = test_db();
        let recruiter_id = db.add_recruiter("Alex").unwrap();
        let role_id = db
            .add_role(
                "Backend Engineer",
                "Acme Corp",
                Some(recruiter_id),
                Some("2024-03-01"),
                None,
            )
            .unwrap();

        let deal_id = db
            .add_deal(recruiter_id, "Sam", "Acme Corp", role_id, "2024-03-10")
            .unwrap();
        let role = db.get_role(role_id).unwrap().unwrap();
        assert_eq!(role.status, "Closed");
        assert_eq!(role.sub_status, "Deal");

        let record = db.mark_deal_pulled_out(deal_id, "2024-03-15").unwrap();
        assert_eq!(record.status, DEAL_STATUS_PULLED_OUT);
        assert_eq!(record.pulled_out_date.as_deref(), Some("2024-03-15"));
        // Same record mutated in place, not replaced.
        assert_eq!(db.list_deals().unwrap().len(), 1);

        let role = db.get_role(role_id).unwrap().unwrap();
        assert_eq!(role.status, "Active");
        assert_eq!(role.sub_status, "Open");
    }

    #[test]
    fn pulling_out_twice_is_an_error() {
        let mut db = test_db();
        let recruiter_id = db.add_recruiter("Alex").unwrap();
        let role_id = db
            .add_role("Backend Engineer", "Acme Corp", Some(recruiter_id), None, None)
            .unwrap();
        let deal_id = db
            .add_deal(recruiter_id, "Sam", "Acme Corp", role_id, "2024-03-10")
            .unwrap();
        db.mark_deal_pulled_out(deal_id, "2024-03-15").unwrap();
        assert!(db.mark_deal_pulled_out(deal_id, "2024-03-16").is_err());
    }

    #[test]
    fn insights_roundtrip_their_category_and_tag_lists() {
        let db = test_db();
        let role_id = db
            .add_role("Backend Engineer", "Acme Corp", None, Some("2024-03-01"), None)
            .unwrap();
        let remark = "Client is not responding, budget is low, role is stuck";
        let analysis = classify(remark);
        db.add_insight(
            role_id,
            "Acme Corp",
            "Active",
            "Feedback Pending",
            "2024-03-20",
            &analysis,
            remark,
        )
        .unwrap();

        let insights = db.list_insights().unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].categories, analysis.categories);
        assert_eq!(insights[0].tags, analysis.tags);
        assert_eq!(insights[0].severity, 3);
        assert!(insights[0].is_risk);
        assert_eq!(insights[0].remark, remark);
    }

    #[test]
    fn role_status_update_keeps_old_remarks_when_none_given() {
        let db = test_db();
        let role_id = db
            .add_role(
                "Backend Engineer",
                "Acme Corp",
                None,
                None,
                Some("kickoff done"),
            )
            .unwrap();
        db.update_role_status(role_id, "Active", "Feedback Pending", None)
            .unwrap();
        let role = db.get_role(role_id).unwrap().unwrap();
        assert_eq!(role.remarks.as_deref(), Some("kickoff done"));

        db.update_role_status(role_id, "Closed", "Lost", Some("lost to competitor"))
            .unwrap();
        let role = db.get_role(role_id).unwrap().unwrap();
        assert_eq!(role.remarks.as_deref(), Some("lost to competitor"));
        assert_eq!(role.status, "Closed");
    }
}

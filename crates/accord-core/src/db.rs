use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

use crate::types::{ChatMessage, Dispute, DisputeStatus, NewDispute, Parties};

const SCHEMA_SQL: &str = include_str!("../../../schema.sql");

pub struct Db {
    conn: Mutex<Connection>,
}

// ── Timestamp helpers ─────────────────────────────────────────────────────

fn parse_ts(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn now_str() -> String {
    fmt_ts(Utc::now())
}

// ── Row mappers ───────────────────────────────────────────────────────────

fn parse_texts(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn row_to_dispute(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dispute> {
    let evidence_json: String = row.get(7)?;
    let status_str: String = row.get(8)?;
    let suggestions_json: String = row.get(10)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;
    Ok(Dispute {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        parties: Parties {
            plaintiff: row.get(5)?,
            defendant: row.get(6)?,
        },
        evidence_texts: parse_texts(&evidence_json),
        status: DisputeStatus::parse(&status_str).unwrap_or(DisputeStatus::Submitted),
        ai_analysis: row.get(9)?,
        settlement_suggestions: parse_texts(&suggestions_json),
        created_at: parse_ts(&created_at_str),
        updated_at: parse_ts(&updated_at_str),
    })
}

fn row_to_chat_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let ts_str: String = row.get(4)?;
    Ok(ChatMessage {
        id: row.get(0)?,
        dispute_id: row.get(1)?,
        user_message: row.get(2)?,
        ai_response: row.get(3)?,
        timestamp: parse_ts(&ts_str),
    })
}

const DISPUTE_COLS: &str = "id, title, description, category, amount, plaintiff, defendant, \
     evidence_texts, status, ai_analysis, settlement_suggestions, created_at, updated_at";

// ── Db impl ───────────────────────────────────────────────────────────────

impl Db {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open SQLite database at {path:?}"))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("failed to set PRAGMAs")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn migrate(&mut self) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute_batch(SCHEMA_SQL)
            .context("failed to apply schema migrations")?;
        Ok(())
    }

    // ── Disputes ──────────────────────────────────────────────────────────

    pub fn insert_dispute(&self, new: &NewDispute) -> Result<Dispute> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let now = now_str();
        let evidence_json = serde_json::to_string(&new.evidence_texts)?;
        conn.execute(
            "INSERT INTO disputes \
             (title, description, category, amount, plaintiff, defendant, \
              evidence_texts, status, ai_analysis, settlement_suggestions, \
              created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, '[]', ?9, ?9)",
            params![
                new.title,
                new.description,
                new.category,
                new.amount,
                new.parties.plaintiff,
                new.parties.defendant,
                evidence_json,
                DisputeStatus::Submitted.as_str(),
                now,
            ],
        )
        .context("insert_dispute")?;
        let id = conn.last_insert_rowid();
        let ts = parse_ts(&now);
        Ok(Dispute {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category.clone(),
            amount: new.amount,
            parties: new.parties.clone(),
            evidence_texts: new.evidence_texts.clone(),
            status: DisputeStatus::Submitted,
            ai_analysis: None,
            settlement_suggestions: Vec::new(),
            created_at: ts,
            updated_at: ts,
        })
    }

    pub fn get_dispute(&self, id: i64) -> Result<Option<Dispute>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let result = conn
            .query_row(
                &format!("SELECT {DISPUTE_COLS} FROM disputes WHERE id = ?1"),
                params![id],
                row_to_dispute,
            )
            .optional()
            .context("get_dispute")?;
        Ok(result)
    }

    /// All disputes, newest first.
    pub fn list_disputes(&self) -> Result<Vec<Dispute>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(&format!(
            "SELECT {DISPUTE_COLS} FROM disputes ORDER BY created_at DESC, id DESC"
        ))?;
        let disputes = stmt
            .query_map([], row_to_dispute)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("list_disputes")?;
        Ok(disputes)
    }

    /// Persist a mediation result and move the dispute to `mediated`.
    pub fn update_mediation(
        &self,
        id: i64,
        analysis: &str,
        suggestions: &[String],
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let suggestions_json = serde_json::to_string(suggestions)?;
        let updated = conn
            .execute(
                "UPDATE disputes SET ai_analysis = ?1, settlement_suggestions = ?2, \
                 status = ?3, updated_at = ?4 WHERE id = ?5",
                params![
                    analysis,
                    suggestions_json,
                    DisputeStatus::Mediated.as_str(),
                    now_str(),
                    id
                ],
            )
            .context("update_mediation")?;
        Ok(updated > 0)
    }

    /// Returns false when no dispute with `id` exists.
    pub fn update_status(&self, id: i64, status: DisputeStatus) -> Result<bool> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let updated = conn
            .execute(
                "UPDATE disputes SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now_str(), id],
            )
            .context("update_status")?;
        Ok(updated > 0)
    }

    // ── Chat messages ─────────────────────────────────────────────────────

    pub fn insert_chat_message(
        &self,
        dispute_id: i64,
        user_message: &str,
        ai_response: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO chat_messages (dispute_id, user_message, ai_response, timestamp) \
             VALUES (?1, ?2, ?3, ?4)",
            params![dispute_id, user_message, ai_response, now_str()],
        )
        .context("insert_chat_message")?;
        Ok(conn.last_insert_rowid())
    }

    /// Chat history for a dispute, oldest first.
    pub fn list_chat_messages(&self, dispute_id: i64) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT id, dispute_id, user_message, ai_response, timestamp \
             FROM chat_messages WHERE dispute_id = ?1 \
             ORDER BY timestamp ASC, id ASC",
        )?;
        let messages = stmt
            .query_map(params![dispute_id], row_to_chat_message)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("list_chat_messages")?;
        Ok(messages)
    }
}

//! SQLite persistence for queries and their insights.
//!
//! Two tables, `queries` and `insights`, joined by a foreign key with
//! cascading delete. Every mutation runs in a single transaction, so a
//! failed operation never leaves partial rows behind.

use crate::{Result, ScoutError};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use scout_types::{Impact, Insight, NewInsight, Query};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const INSIGHT_COLUMNS: &str =
    "id, query_id, title, category, content, source, impact, confidence, entity, created_at";

/// Open a connection with foreign keys enforced.
///
/// Creates the parent directory if needed. Shared by every store that
/// lives in the same database file.
pub(crate) fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    prepare_connection(&conn)?;
    Ok(conn)
}

pub(crate) fn prepare_connection(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Current time at the precision the database keeps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

pub(crate) fn parse_uuid(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Map an unrecognised stored enum value to a conversion error.
pub(crate) fn parse_variant<T>(idx: usize, value: &str, parsed: Option<T>) -> rusqlite::Result<T> {
    parsed.ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognised value {:?}", value).into(),
        )
    })
}

/// Reject blank text fields.
pub fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScoutError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Boundary checks for client-supplied insight fields.
pub fn validate_new_insight(insight: &NewInsight) -> Result<()> {
    validate_text("title", &insight.title)?;
    validate_text("content", &insight.content)?;
    if !insight.confidence.is_finite() || !(0.0..=1.0).contains(&insight.confidence) {
        return Err(ScoutError::Validation(format!(
            "confidence must be between 0 and 1, got {}",
            insight.confidence
        )));
    }
    Ok(())
}

/// SQLite-backed store for queries and insights.
pub struct QueryStore {
    conn: Mutex<Connection>,
}

impl QueryStore {
    /// Open or create the store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(open_connection(path)?)
    }

    /// Create a store from an existing connection.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        prepare_connection(&conn)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS queries (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_queries_created_at ON queries(created_at);

            CREATE TABLE IF NOT EXISTS insights (
                id TEXT PRIMARY KEY,
                query_id TEXT NOT NULL,
                title TEXT NOT NULL,
                category TEXT NOT NULL,
                content TEXT NOT NULL,
                source TEXT NOT NULL,
                impact TEXT NOT NULL,
                confidence REAL NOT NULL CHECK (confidence >= 0.0 AND confidence <= 1.0),
                entity TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (query_id) REFERENCES queries(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_insights_query_id ON insights(query_id);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_insights_natural_key
                ON insights(query_id, title, source);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ScoutError::LockPoisoned)
    }

    /// Create a query, persisting `seed` as its initial insights.
    pub fn create_query(&self, content: &str, seed: Vec<NewInsight>) -> Result<(Query, Vec<Insight>)> {
        validate_text("query", content)?;
        for new in &seed {
            validate_new_insight(new)?;
        }

        let mut query = Query::new(content.trim().to_string());
        let ts = now();
        query.created_at = ts;
        query.updated_at = ts;

        let insights: Vec<Insight> = seed
            .into_iter()
            .map(|new| normalize(Insight::from_new(query.id, new)))
            .collect();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO queries (id, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                query.id.to_string(),
                query.content,
                format_ts(&query.created_at),
                format_ts(&query.updated_at),
            ],
        )?;
        for insight in &insights {
            insert_insight(&tx, insight)?;
        }
        tx.commit()?;

        debug!(target: "scout::store", "Created query {} with {} insights", query.id, insights.len());
        Ok((query, insights))
    }

    /// Append an insight to an existing query and advance its `updated_at`.
    pub fn append_insight(&self, query_id: Uuid, new: NewInsight) -> Result<Insight> {
        validate_new_insight(&new)?;
        let insight = normalize(Insight::from_new(query_id, new));

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        if !query_exists(&tx, query_id)? {
            return Err(ScoutError::QueryNotFound(query_id));
        }
        insert_insight(&tx, &insight)?;
        touch_query(&tx, query_id)?;
        tx.commit()?;

        debug!(target: "scout::store", "Appended insight {} to query {}", insight.id, query_id);
        Ok(insight)
    }

    /// Fetch a query together with its insights.
    pub fn fetch_query(&self, query_id: Uuid) -> Result<(Query, Vec<Insight>)> {
        let conn = self.conn()?;
        let query = get_query(&conn, query_id)?.ok_or(ScoutError::QueryNotFound(query_id))?;
        let insights = insights_for(&conn, query_id)?;
        Ok((query, insights))
    }

    /// Insights of an existing query.
    pub fn list_insights(&self, query_id: Uuid) -> Result<Vec<Insight>> {
        let conn = self.conn()?;
        if !query_exists(&conn, query_id)? {
            return Err(ScoutError::QueryNotFound(query_id));
        }
        insights_for(&conn, query_id)
    }

    /// Whether a query with this id exists.
    pub fn exists(&self, query_id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        query_exists(&conn, query_id)
    }

    /// Replace a query's content. The insight set is left as it is.
    pub fn update_query_content(&self, query_id: Uuid, new_content: &str) -> Result<Vec<Insight>> {
        validate_text("query", new_content)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE queries SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![new_content.trim(), format_ts(&now()), query_id.to_string()],
        )?;
        if changed == 0 {
            return Err(ScoutError::QueryNotFound(query_id));
        }
        let insights = insights_for(&tx, query_id)?;
        tx.commit()?;

        debug!(target: "scout::store", "Updated content of query {}", query_id);
        Ok(insights)
    }

    /// Delete a query; its insights go with it.
    pub fn delete_query(&self, query_id: Uuid) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM queries WHERE id = ?1", params![query_id.to_string()])?;
        if changed == 0 {
            return Err(ScoutError::QueryNotFound(query_id));
        }
        debug!(target: "scout::store", "Deleted query {}", query_id);
        Ok(())
    }

    /// List queries, most recently created first.
    pub fn list_queries(&self, limit: u32, offset: u32) -> Result<Vec<Query>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, content, created_at, updated_at FROM queries
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let queries = stmt
            .query_map(params![limit, offset], row_to_query)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(queries)
    }

    /// Total number of stored queries.
    pub fn count_queries(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM queries", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Get a single insight.
    pub fn get_insight(&self, insight_id: Uuid) -> Result<Insight> {
        let conn = self.conn()?;
        get_insight(&conn, insight_id)?.ok_or(ScoutError::InsightNotFound(insight_id))
    }

    /// Replace the fields of an insight, keeping its id and owner.
    pub fn update_insight(&self, insight_id: Uuid, new: NewInsight) -> Result<Insight> {
        validate_new_insight(&new)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let existing = get_insight(&tx, insight_id)?.ok_or(ScoutError::InsightNotFound(insight_id))?;

        let created_at = new.created_at.unwrap_or(existing.created_at);
        let mut updated = Insight::from_new(existing.query_id, new);
        updated.id = existing.id;
        updated.created_at = created_at;
        let updated = normalize(updated);

        tx.execute(
            "UPDATE insights SET title = ?1, category = ?2, content = ?3, source = ?4,
                impact = ?5, confidence = ?6, entity = ?7, created_at = ?8
             WHERE id = ?9",
            params![
                updated.title,
                updated.category,
                updated.content,
                updated.source,
                updated.impact.as_str(),
                updated.confidence,
                updated.entity,
                format_ts(&updated.created_at),
                updated.id.to_string(),
            ],
        )?;
        touch_query(&tx, updated.query_id)?;
        tx.commit()?;

        debug!(target: "scout::store", "Updated insight {}", insight_id);
        Ok(updated)
    }

    /// Remove a single insight.
    pub fn delete_insight(&self, insight_id: Uuid) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let existing = get_insight(&tx, insight_id)?.ok_or(ScoutError::InsightNotFound(insight_id))?;
        tx.execute("DELETE FROM insights WHERE id = ?1", params![insight_id.to_string()])?;
        touch_query(&tx, existing.query_id)?;
        tx.commit()?;

        debug!(target: "scout::store", "Deleted insight {}", insight_id);
        Ok(())
    }
}

fn normalize(mut insight: Insight) -> Insight {
    insight.created_at = insight.created_at.trunc_subsecs(6);
    insight
}

fn insert_insight(tx: &Transaction<'_>, insight: &Insight) -> Result<()> {
    tx.execute(
        &format!(
            "INSERT INTO insights ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            INSIGHT_COLUMNS
        ),
        params![
            insight.id.to_string(),
            insight.query_id.to_string(),
            insight.title,
            insight.category,
            insight.content,
            insight.source,
            insight.impact.as_str(),
            insight.confidence,
            insight.entity,
            format_ts(&insight.created_at),
        ],
    )?;
    Ok(())
}

fn touch_query(conn: &Connection, query_id: Uuid) -> Result<()> {
    conn.execute(
        "UPDATE queries SET updated_at = ?1 WHERE id = ?2",
        params![format_ts(&now()), query_id.to_string()],
    )?;
    Ok(())
}

fn query_exists(conn: &Connection, query_id: Uuid) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM queries WHERE id = ?1",
            params![query_id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn get_query(conn: &Connection, query_id: Uuid) -> Result<Option<Query>> {
    let query = conn
        .query_row(
            "SELECT id, content, created_at, updated_at FROM queries WHERE id = ?1",
            params![query_id.to_string()],
            row_to_query,
        )
        .optional()?;
    Ok(query)
}

fn get_insight(conn: &Connection, insight_id: Uuid) -> Result<Option<Insight>> {
    let insight = conn
        .query_row(
            &format!("SELECT {} FROM insights WHERE id = ?1", INSIGHT_COLUMNS),
            params![insight_id.to_string()],
            row_to_insight,
        )
        .optional()?;
    Ok(insight)
}

fn insights_for(conn: &Connection, query_id: Uuid) -> Result<Vec<Insight>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM insights WHERE query_id = ?1 ORDER BY created_at, id",
        INSIGHT_COLUMNS
    ))?;
    let insights = stmt
        .query_map(params![query_id.to_string()], row_to_insight)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(insights)
}

fn row_to_query(row: &rusqlite::Row) -> rusqlite::Result<Query> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;
    Ok(Query {
        id: parse_uuid(0, &id)?,
        content: row.get(1)?,
        created_at: parse_ts(2, &created_at)?,
        updated_at: parse_ts(3, &updated_at)?,
    })
}

fn row_to_insight(row: &rusqlite::Row) -> rusqlite::Result<Insight> {
    let id: String = row.get(0)?;
    let query_id: String = row.get(1)?;
    let impact: String = row.get(6)?;
    let created_at: String = row.get(9)?;
    Ok(Insight {
        id: parse_uuid(0, &id)?,
        query_id: parse_uuid(1, &query_id)?,
        title: row.get(2)?,
        category: row.get(3)?,
        content: row.get(4)?,
        source: row.get(5)?,
        impact: parse_variant(6, &impact, Impact::from_db(&impact))?,
        confidence: row.get(7)?,
        entity: row.get(8)?,
        created_at: parse_ts(9, &created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FixtureInsightSource, InsightSource};
    use tempfile::TempDir;

    fn create_test_store() -> (QueryStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = QueryStore::open(&temp_dir.path().join("test.db")).unwrap();
        (store, temp_dir)
    }

    fn sample_insight(title: &str) -> NewInsight {
        NewInsight {
            title: title.to_string(),
            category: "Company Overview".to_string(),
            content: "Amazon runs a large logistics network.".to_string(),
            source: "https://www.amazon.com/".to_string(),
            impact: Impact::High,
            confidence: 0.9,
            entity: "Amazon".to_string(),
            created_at: None,
        }
    }

    fn total_insight_rows(store: &QueryStore) -> i64 {
        let conn = store.conn().unwrap();
        conn.query_row("SELECT COUNT(*) FROM insights", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_create_then_fetch_round_trip() {
        let (store, _dir) = create_test_store();
        let seed = FixtureInsightSource.generate("Who is Bezos");

        let (query, created) = store.create_query("Who is Bezos", seed.clone()).unwrap();
        let (fetched, insights) = store.fetch_query(query.id).unwrap();

        assert_eq!(fetched, query);
        assert_eq!(insights, created);
        assert_eq!(insights.len(), seed.len());
        for (stored, original) in insights.iter().zip(&seed) {
            assert_eq!(stored.query_id, query.id);
            assert_eq!(stored.title, original.title);
            assert_eq!(stored.category, original.category);
            assert_eq!(stored.content, original.content);
            assert_eq!(stored.source, original.source);
            assert_eq!(stored.impact, original.impact);
            assert_eq!(stored.confidence, original.confidence);
            assert_eq!(stored.entity, original.entity);
        }
    }

    #[test]
    fn test_create_empty_query() {
        let (store, _dir) = create_test_store();
        let (query, insights) = store.create_query("What does Acme sell?", Vec::new()).unwrap();
        assert!(insights.is_empty());
        assert!(store.list_insights(query.id).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_blank_content() {
        let (store, _dir) = create_test_store();
        let err = store.create_query("   ", Vec::new()).unwrap_err();
        assert!(matches!(err, ScoutError::Validation(_)));
        assert_eq!(store.count_queries().unwrap(), 0);
    }

    #[test]
    fn test_append_to_missing_query_persists_nothing() {
        let (store, _dir) = create_test_store();
        let missing = Uuid::now_v7();

        let err = store.append_insight(missing, sample_insight("Orphan")).unwrap_err();
        assert!(matches!(err, ScoutError::QueryNotFound(id) if id == missing));
        assert_eq!(total_insight_rows(&store), 0);
    }

    #[test]
    fn test_append_advances_updated_at() {
        let (store, _dir) = create_test_store();
        let (query, _) = store.create_query("Who is Bezos", Vec::new()).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let insight = store.append_insight(query.id, sample_insight("Cloud leader")).unwrap();
        let (fetched, insights) = store.fetch_query(query.id).unwrap();

        assert!(fetched.updated_at > query.updated_at);
        assert!(fetched.updated_at >= fetched.created_at);
        assert_eq!(insights, vec![insight]);
    }

    #[test]
    fn test_duplicate_natural_key_is_conflict() {
        let (store, _dir) = create_test_store();
        let (query, _) = store.create_query("Who is Bezos", Vec::new()).unwrap();
        store.append_insight(query.id, sample_insight("Same")).unwrap();

        let err = store.append_insight(query.id, sample_insight("Same")).unwrap_err();
        assert!(matches!(err, ScoutError::Conflict));
        assert_eq!(err.to_string(), crate::DUPLICATE_RECORD_MESSAGE);
        assert_eq!(store.list_insights(query.id).unwrap().len(), 1);
    }

    #[test]
    fn test_same_title_on_other_query_is_allowed() {
        let (store, _dir) = create_test_store();
        let (a, _) = store.create_query("A", Vec::new()).unwrap();
        let (b, _) = store.create_query("B", Vec::new()).unwrap();
        store.append_insight(a.id, sample_insight("Same")).unwrap();
        store.append_insight(b.id, sample_insight("Same")).unwrap();
        assert_eq!(total_insight_rows(&store), 2);
    }

    #[test]
    fn test_confidence_bounds_rejected() {
        let (store, _dir) = create_test_store();
        let (query, _) = store.create_query("Who is Bezos", Vec::new()).unwrap();

        for bad in [1.5, -0.1, f64::NAN, f64::INFINITY] {
            let mut insight = sample_insight("Bad confidence");
            insight.confidence = bad;
            let err = store.append_insight(query.id, insight).unwrap_err();
            assert!(matches!(err, ScoutError::Validation(_)), "accepted {}", bad);
        }

        for good in [0.0, 1.0] {
            let mut insight = sample_insight(&format!("Edge {}", good));
            insight.confidence = good;
            store.append_insight(query.id, insight).unwrap();
        }
        assert_eq!(total_insight_rows(&store), 2);
    }

    #[test]
    fn test_invalid_seed_creates_nothing() {
        let (store, _dir) = create_test_store();
        let mut bad = sample_insight("Bad");
        bad.confidence = 2.0;

        assert!(store.create_query("Who is Bezos", vec![bad]).is_err());
        assert_eq!(store.count_queries().unwrap(), 0);
    }

    #[test]
    fn test_delete_cascades_to_insights() {
        let (store, _dir) = create_test_store();
        let seed = FixtureInsightSource.generate("Who is Bezos");
        let (query, _) = store.create_query("Who is Bezos", seed).unwrap();
        let (other, _) = store.create_query("Other", vec![sample_insight("Keep me")]).unwrap();

        store.delete_query(query.id).unwrap();

        assert!(matches!(store.fetch_query(query.id), Err(ScoutError::QueryNotFound(_))));
        assert_eq!(total_insight_rows(&store), 1);
        assert_eq!(store.list_insights(other.id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_query() {
        let (store, _dir) = create_test_store();
        assert!(matches!(
            store.delete_query(Uuid::now_v7()),
            Err(ScoutError::QueryNotFound(_))
        ));
    }

    #[test]
    fn test_update_content_keeps_insights() {
        let (store, _dir) = create_test_store();
        let seed = FixtureInsightSource.generate("Who is Bezos");
        let (query, created) = store.create_query("Who is Bezos", seed).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let insights = store
            .update_query_content(query.id, "What is Amazon's business model?")
            .unwrap();
        let (fetched, _) = store.fetch_query(query.id).unwrap();

        assert_eq!(insights, created);
        assert_eq!(fetched.content, "What is Amazon's business model?");
        assert_eq!(fetched.created_at, query.created_at);
        assert!(fetched.updated_at > query.updated_at);
    }

    #[test]
    fn test_update_missing_query() {
        let (store, _dir) = create_test_store();
        assert!(matches!(
            store.update_query_content(Uuid::now_v7(), "new"),
            Err(ScoutError::QueryNotFound(_))
        ));
    }

    #[test]
    fn test_update_and_delete_single_insight() {
        let (store, _dir) = create_test_store();
        let (query, _) = store.create_query("Who is Bezos", Vec::new()).unwrap();
        let insight = store.append_insight(query.id, sample_insight("Draft")).unwrap();

        let mut edit = sample_insight("Final");
        edit.impact = Impact::Low;
        edit.confidence = 0.4;
        let updated = store.update_insight(insight.id, edit).unwrap();
        assert_eq!(updated.id, insight.id);
        assert_eq!(updated.created_at, insight.created_at);
        assert_eq!(store.get_insight(insight.id).unwrap(), updated);

        store.delete_insight(insight.id).unwrap();
        assert!(matches!(
            store.get_insight(insight.id),
            Err(ScoutError::InsightNotFound(_))
        ));
        assert!(store.list_insights(query.id).unwrap().is_empty());
    }

    #[test]
    fn test_update_insight_into_duplicate_is_conflict() {
        let (store, _dir) = create_test_store();
        let (query, _) = store.create_query("Who is Bezos", Vec::new()).unwrap();
        store.append_insight(query.id, sample_insight("One")).unwrap();
        let two = store.append_insight(query.id, sample_insight("Two")).unwrap();

        let err = store.update_insight(two.id, sample_insight("One")).unwrap_err();
        assert!(matches!(err, ScoutError::Conflict));
        assert_eq!(store.get_insight(two.id).unwrap().title, "Two");
    }

    #[test]
    fn test_list_queries_newest_first() {
        let (store, _dir) = create_test_store();
        let (first, _) = store.create_query("first", Vec::new()).unwrap();
        let (second, _) = store.create_query("second", Vec::new()).unwrap();

        let listed = store.list_queries(10, 0).unwrap();
        assert_eq!(listed.iter().map(|q| q.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert_eq!(store.list_queries(1, 1).unwrap()[0].id, first.id);
        assert_eq!(store.count_queries().unwrap(), 2);
    }

    #[test]
    fn test_unknown_impact_is_a_read_error() {
        let (store, _dir) = create_test_store();
        let (query, _) = store.create_query("Who is Bezos", vec![sample_insight("Cloud leader")]).unwrap();
        store
            .conn()
            .unwrap()
            .execute("UPDATE insights SET impact = 'Severe'", [])
            .unwrap();

        assert!(matches!(store.list_insights(query.id), Err(ScoutError::DatabaseError(_))));
    }
}

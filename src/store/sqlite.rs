// SQLite-backed distance relation over the segment alignment tables

use super::{DistanceStore, SegmentId};
use crate::clustering::Feature;
use crate::error::{ClusterError, Result};
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::BTreeSet;
use std::path::Path;

/// Alignment database holding segments and their pairwise distance scores.
///
/// Wraps Connection in a parking_lot::Mutex since rusqlite::Connection is not
/// Sync. Using parking_lot instead of std::sync::Mutex to avoid mutex
/// poisoning on panic, which would make all subsequent database operations
/// fail.
///
/// Alignment rows are stored in canonical orientation
/// (`segment_id_1 = min(a, b)`), so every symmetric query checks both
/// orientations.
pub struct AlignmentDb {
    conn: Mutex<Connection>,
}

impl AlignmentDb {
    /// Open an existing alignment database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;

        Ok(db)
    }

    /// Open an in-memory database (fixtures and tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Segment (
                segment_id INTEGER PRIMARY KEY,
                score_id INTEGER,
                start_note INTEGER,
                end_note INTEGER
            );

            CREATE TABLE IF NOT EXISTS SegmentAlignment (
                segment_id_1 INTEGER NOT NULL,
                segment_id_2 INTEGER NOT NULL,
                diatonic_score REAL,
                chromatic_score REAL,
                rhythmic_score REAL,
                diatonic_rhythmic_score REAL,
                chromatic_rhythmic_score REAL,
                PRIMARY KEY (segment_id_1, segment_id_2)
            );

            CREATE INDEX IF NOT EXISTS idx_alignment_segment_2
                ON SegmentAlignment(segment_id_2);
        "#,
        )?;

        Ok(())
    }

    /// Insert segments in a single transaction, ignoring existing ids.
    pub fn insert_segments(&self, ids: &[SegmentId]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        for id in ids {
            tx.execute(
                "INSERT OR IGNORE INTO Segment (segment_id) VALUES (?1)",
                params![id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Insert or update one score for a segment pair.
    ///
    /// The pair is stored in canonical orientation regardless of argument
    /// order, matching the alignment pipeline's output.
    pub fn insert_score(
        &self,
        a: SegmentId,
        b: SegmentId,
        feature: Feature,
        score: f64,
    ) -> Result<()> {
        let column = feature.score_column();
        let (low, high) = (a.min(b), a.max(b));

        let conn = self.conn.lock();
        conn.execute(
            &format!(
                r#"
                INSERT INTO SegmentAlignment (segment_id_1, segment_id_2, {column})
                VALUES (?1, ?2, ?3)
                ON CONFLICT(segment_id_1, segment_id_2) DO UPDATE SET
                    {column} = excluded.{column}
                "#
            ),
            params![low, high, score],
        )?;

        Ok(())
    }

    /// Build the `(segment_id_1 IN a AND segment_id_2 IN b) OR (...)` filter
    /// covering both orientations, plus its bound parameters.
    fn cross_pair_filter(
        a: &BTreeSet<SegmentId>,
        b: &BTreeSet<SegmentId>,
    ) -> (String, Vec<Value>) {
        let holes = |set: &BTreeSet<SegmentId>| {
            vec!["?"; set.len()].join(",")
        };
        let clause = format!(
            "((segment_id_1 IN ({a_in}) AND segment_id_2 IN ({b_in})) \
             OR (segment_id_1 IN ({b_in}) AND segment_id_2 IN ({a_in})))",
            a_in = holes(a),
            b_in = holes(b),
        );

        let mut values = Vec::with_capacity(2 * (a.len() + b.len()));
        for set in [a, b, b, a] {
            values.extend(set.iter().map(|id| Value::Integer(*id)));
        }

        (clause, values)
    }
}

impl DistanceStore for AlignmentDb {
    fn all_segments(&self) -> Result<BTreeSet<SegmentId>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT segment_id FROM Segment")?;

        let mut segments = BTreeSet::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            segments.insert(row.get(0)?);
        }
        Ok(segments)
    }

    fn zero_distance_pairs(&self, feature: Feature) -> Result<Vec<(SegmentId, SegmentId)>> {
        let column = feature.score_column();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT segment_id_1, segment_id_2 FROM SegmentAlignment WHERE {column} = 0"
        ))?;

        let mut pairs = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            pairs.push((row.get(0)?, row.get(1)?));
        }
        Ok(pairs)
    }

    fn neighbors_within(
        &self,
        feature: Feature,
        segment: SegmentId,
        threshold: f64,
    ) -> Result<BTreeSet<SegmentId>> {
        let column = feature.score_column();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT segment_id_2 FROM SegmentAlignment
            WHERE segment_id_1 = ?1 AND {column} IS NOT NULL AND {column} <= ?2
            UNION
            SELECT segment_id_1 FROM SegmentAlignment
            WHERE segment_id_2 = ?1 AND {column} IS NOT NULL AND {column} <= ?2
            "#
        ))?;

        let mut neighbors = BTreeSet::new();
        let mut rows = stmt.query(params![segment, threshold])?;
        while let Some(row) = rows.next()? {
            neighbors.insert(row.get(0)?);
        }
        Ok(neighbors)
    }

    fn all_distances(&self, feature: Feature) -> Result<Vec<f64>> {
        let column = feature.score_column();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {column} FROM SegmentAlignment WHERE {column} IS NOT NULL ORDER BY {column}"
        ))?;

        let mut distances = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            distances.push(row.get(0)?);
        }

        if distances.is_empty() {
            return Err(ClusterError::EmptyDistribution(feature));
        }
        Ok(distances)
    }

    fn any_cross_pair_exceeds(
        &self,
        feature: Feature,
        a: &BTreeSet<SegmentId>,
        b: &BTreeSet<SegmentId>,
        threshold: f64,
    ) -> Result<bool> {
        if a.is_empty() || b.is_empty() {
            return Ok(false);
        }

        let column = feature.score_column();
        let (filter, values) = Self::cross_pair_filter(a, b);
        let mut params: Vec<Value> = vec![Value::Real(threshold)];
        params.extend(values);

        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM SegmentAlignment \
                 WHERE {column} IS NOT NULL AND {column} > ? AND {filter}"
            ),
            params_from_iter(params),
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn average_cross_distance(
        &self,
        feature: Feature,
        a: &BTreeSet<SegmentId>,
        b: &BTreeSet<SegmentId>,
    ) -> Result<Option<f64>> {
        if a.is_empty() || b.is_empty() {
            return Ok(None);
        }

        let column = feature.score_column();
        let (filter, values) = Self::cross_pair_filter(a, b);

        let conn = self.conn.lock();
        let average: Option<f64> = conn.query_row(
            &format!(
                "SELECT AVG({column}) FROM SegmentAlignment \
                 WHERE {column} IS NOT NULL AND {filter}"
            ),
            params_from_iter(values),
            |row| row.get(0),
        )?;

        Ok(average)
    }
}

mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Handle to the transaction store. Created once by the caller and passed
/// into every operation; the connection closes when the handle drops.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        log::info!("Opened transaction store at {}", path.display());
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database, or one written before versioning existed. The
            // schema uses IF NOT EXISTS so an older transactions table is kept.
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            log::info!("Initialised schema version {}", schema::CURRENT_VERSION);
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                log::info!("Applying migration from version {from_version}");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&mut self, txn: &Transaction) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (date, amount, category) VALUES (?1, ?2, ?3)",
            params![
                txn.date.format(DATE_FORMAT).to_string(),
                txn.amount.to_string(),
                txn.category.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        log::info!("Inserted transaction {id}");
        Ok(id)
    }

    /// Scan the table, applying whichever filter criteria are set. Rows come
    /// back in date order, ties broken by insertion order.
    pub(crate) fn get_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let mut sql =
            String::from("SELECT id, date, amount, category FROM transactions WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(start) = filter.start {
            sql.push_str(&format!(" AND date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = filter.end {
            sql.push_str(&format!(" AND date <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(end.format(DATE_FORMAT).to_string()));
        }
        if let Some(category) = &filter.category {
            sql.push_str(&format!(" AND LOWER(category) = ?{}", param_values.len() + 1));
            param_values.push(Box::new(category.to_lowercase()));
        }

        sql.push_str(" ORDER BY date ASC, id ASC");
        log::debug!("Querying transactions with {filter:?}");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        let mut txns = Vec::new();
        for row in rows {
            txns.extend(row?);
        }
        Ok(txns)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT id, date, amount, category FROM transactions WHERE id = ?1",
            params![id],
            row_to_transaction,
        );
        match result {
            Ok(t) => Ok(t),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// Overwrite date, amount and category of an existing row. The id is
    /// never changed.
    pub(crate) fn update_transaction(&mut self, txn: &Transaction) -> Result<()> {
        let id = txn.id.ok_or_else(|| {
            anyhow::anyhow!("Cannot update a transaction that was never stored")
        })?;
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE transactions SET date = ?1, amount = ?2, category = ?3 WHERE id = ?4",
            params![
                txn.date.format(DATE_FORMAT).to_string(),
                txn.amount.to_string(),
                txn.category.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Transaction {id} not found");
        }
        tx.commit()?;
        log::info!("Updated transaction {id}");
        Ok(())
    }

    pub(crate) fn delete_transaction(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if changed == 0 {
            anyhow::bail!("Transaction {id} not found");
        }
        tx.commit()?;
        log::info!("Deleted transaction {id}");
        Ok(())
    }
}

/// Rows whose date is not `YYYY-MM-DD` (older versions of the tool stored
/// edited dates unchecked) are skipped with a warning rather than failing the
/// whole scan.
fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Option<Transaction>> {
    let id: i64 = row.get(0)?;
    let date = match row.get_ref(1)? {
        ValueRef::Text(bytes) => {
            let date_str = String::from_utf8_lossy(bytes);
            match NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT) {
                Ok(date) => date,
                Err(e) => {
                    log::warn!("Skipping transaction {id}: unreadable date '{date_str}' ({e})");
                    return Ok(None);
                }
            }
        }
        other => {
            log::warn!("Skipping transaction {id}: date stored as {}", other.data_type());
            return Ok(None);
        }
    };
    let category: String = row.get(3)?;
    Ok(Some(Transaction {
        id: Some(id),
        date,
        amount: amount_from_sql(row.get_ref(2)?),
        category: Category::parse(&category),
    }))
}

/// Amounts are written as decimal text, but tables created by older versions
/// of the tool hold REAL or INTEGER values.
fn amount_from_sql(value: ValueRef<'_>) -> Decimal {
    let parsed = match value {
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::from_str(&f.to_string()),
        ValueRef::Text(bytes) => Decimal::from_str(String::from_utf8_lossy(bytes).trim()),
        ValueRef::Null | ValueRef::Blob(_) => Ok(Decimal::ZERO),
    };
    parsed.unwrap_or_else(|e| {
        log::warn!("Unreadable stored amount ({e}); treating it as zero");
        Decimal::ZERO
    })
}

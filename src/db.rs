use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::model::{ExtractedMessage, RawMessage};

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating database directory {}", dir.display()))?;
    }
    let conn = Connection::open(path).with_context(|| format!("opening database {}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS messages (
            id         INTEGER PRIMARY KEY,
            role       TEXT NOT NULL CHECK(role IN ('user','assistant')),
            content    TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS segments (
            message_id   INTEGER PRIMARY KEY REFERENCES messages(id),
            before_text  TEXT NOT NULL,
            has_products BOOLEAN NOT NULL,
            after_text   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY,
            message_id  INTEGER NOT NULL REFERENCES messages(id),
            position    INTEGER NOT NULL,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            price       TEXT NOT NULL,
            link        TEXT,
            image       TEXT,
            CHECK(link IS NOT NULL OR image IS NOT NULL),
            UNIQUE(message_id, position)
        );
        CREATE INDEX IF NOT EXISTS idx_products_message ON products(message_id);
        ",
    )?;
    Ok(())
}

/// Store one chunk of messages with their extraction results.
pub fn save_extracted(
    conn: &Connection,
    rows: &[(RawMessage, ExtractedMessage)],
) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut products = 0;
    {
        let mut m_stmt = tx.prepare("INSERT INTO messages (role, content) VALUES (?1, ?2)")?;
        let mut s_stmt = tx.prepare(
            "INSERT INTO segments (message_id, before_text, has_products, after_text)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut p_stmt = tx.prepare(
            "INSERT INTO products
             (message_id, position, name, description, price, link, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for (raw, extracted) in rows {
            m_stmt.execute(rusqlite::params![raw.role.as_str(), raw.content])?;
            let message_id = tx.last_insert_rowid();
            let p = &extracted.parsed;
            s_stmt.execute(rusqlite::params![message_id, p.before, p.has_products, p.after])?;
            for (position, r) in extracted.products.iter().enumerate() {
                p_stmt.execute(rusqlite::params![
                    message_id,
                    position as i64,
                    r.name,
                    r.description,
                    r.price,
                    r.link,
                    r.image,
                ])?;
                products += 1;
            }
        }
    }
    tx.commit()?;
    Ok(products)
}

pub struct Stats {
    pub messages: i64,
    pub assistant: i64,
    pub with_products: i64,
    pub products: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };
    Ok(Stats {
        messages: count("SELECT COUNT(*) FROM messages")?,
        assistant: count("SELECT COUNT(*) FROM messages WHERE role = 'assistant'")?,
        with_products: count("SELECT COUNT(*) FROM segments WHERE has_products = 1")?,
        products: count("SELECT COUNT(*) FROM products")?,
    })
}

//! Scenario database schema and operations
//!
//! Named parameter sets persist in SQLite so alternative business cases can
//! be saved and compared from the CLI. A scenario stores only the parameters
//! as (name, value) rows; metrics are always recomputed.

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;

use crate::models::PlantConfig;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Named scenarios
        CREATE TABLE IF NOT EXISTS scenarios (
            name TEXT PRIMARY KEY,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per configuration parameter of a scenario
        CREATE TABLE IF NOT EXISTS scenario_params (
            scenario TEXT NOT NULL,
            param TEXT NOT NULL,
            value REAL NOT NULL,
            PRIMARY KEY (scenario, param)
        );

        CREATE INDEX IF NOT EXISTS idx_scenario_params_scenario
            ON scenario_params(scenario);
        "#,
    )?;
    Ok(())
}

/// Insert or replace a scenario with the full parameter set of `config`
pub fn save_scenario(conn: &Connection, name: &str, config: &PlantConfig) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO scenarios (name) VALUES (?1)",
        [name],
    )?;
    conn.execute("DELETE FROM scenario_params WHERE scenario = ?1", [name])?;

    let mut stmt = conn.prepare(
        "INSERT INTO scenario_params (scenario, param, value) VALUES (?1, ?2, ?3)",
    )?;
    for (param, value) in config.params() {
        stmt.execute((name, param, value))?;
    }
    Ok(())
}

/// Load a scenario: defaults overlaid with every stored parameter row
pub fn load_scenario(conn: &Connection, name: &str) -> Result<PlantConfig> {
    if !scenario_exists(conn, name)? {
        return Err(anyhow!("scenario '{}' not found", name));
    }

    let mut stmt = conn.prepare(
        "SELECT param, value FROM scenario_params WHERE scenario = ?1",
    )?;
    let rows = stmt.query_map([name], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;

    let mut config = PlantConfig::default();
    for row in rows {
        let (param, value) = row?;
        config
            .set(&param, value)
            .with_context(|| format!("scenario '{}' holds a stale parameter", name))?;
    }
    Ok(config)
}

/// Whether a scenario of this name has been saved
pub fn scenario_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM scenarios WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// List all saved scenarios as (name, created_at)
pub fn list_scenarios(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt =
        conn.prepare("SELECT name, created_at FROM scenarios ORDER BY name")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Delete a scenario; returns false when nothing was stored under the name
pub fn delete_scenario(conn: &Connection, name: &str) -> Result<bool> {
    conn.execute("DELETE FROM scenario_params WHERE scenario = ?1", [name])?;
    let deleted = conn.execute("DELETE FROM scenarios WHERE name = ?1", [name])?;
    Ok(deleted > 0)
}

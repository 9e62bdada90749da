//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database. The whole farm state
//! serializes to one JSON record under a single versioned key; the
//! wallet balance lives under its own key so other site modules can
//! share it.
//!
//! Persistence failure is non-fatal by design: save errors are logged
//! and swallowed, the in-memory state stays authoritative for the
//! session. Game operations never see a storage error.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::FarmResult;
use crate::state::FarmState;
use crate::wallet::DEFAULT_BALANCE;

pub const STATE_KEY: &str = "susfarm.state.v1";
pub const WALLET_KEY: &str = "sus.wallet.suscoin";

pub struct FarmStore {
    conn: Connection,
}

impl FarmStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> FarmResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> FarmResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> FarmResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
             );",
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> FarmResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> FarmResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Farm state ─────────────────────────────────────────────

    /// Load the farm record. Missing record: fresh default state.
    /// Corrupt record: discarded with a warning, fresh default state.
    /// Partial record from an older version: healed field-by-field
    /// by the serde defaults on `FarmState`.
    pub fn load_state(&self) -> FarmState {
        let raw = match self.get(STATE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("failed to read farm state: {e}");
                return FarmState::default();
            }
        };
        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("corrupt farm state record, starting fresh: {e}");
                    FarmState::default()
                }
            },
            None => FarmState::default(),
        }
    }

    /// Write-through save. Errors are logged, never propagated.
    pub fn save_state(&self, state: &FarmState) {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to serialize farm state: {e}");
                return;
            }
        };
        if let Err(e) = self.put(STATE_KEY, &json) {
            log::warn!("failed to save farm state: {e}");
        }
    }

    // ── Wallet ─────────────────────────────────────────────────

    pub fn load_wallet(&self) -> u64 {
        match self.get(WALLET_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or(DEFAULT_BALANCE),
            Ok(None) => DEFAULT_BALANCE,
            Err(e) => {
                log::warn!("failed to read wallet: {e}");
                DEFAULT_BALANCE
            }
        }
    }

    pub fn save_wallet(&self, balance: u64) {
        if let Err(e) = self.put(WALLET_KEY, &balance.to_string()) {
            log::warn!("failed to save wallet: {e}");
        }
    }
}

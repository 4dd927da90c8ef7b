//! Database session: the single point of contact with the target.
//!
//! One session wraps one autocommit connection and normalizes the three
//! execution shapes (read query, DDL, plain/procedural statement) into one
//! failure and audit model. Every mutating statement is appended to the DDL
//! history, including failing ones and the ones simulate mode skipped, so the
//! caller can always report what was (or would have been) changed. Sessions
//! are not thread-safe and are not meant to outlive one top-level operation.

use std::collections::HashMap;

use oracle::sql_type::{Collection, OracleType, ToSql};
use oracle::{Connection, Connector, Privilege, Row};

use crate::client;
use crate::config::ConnectionConfig;
use crate::error::{vendor_parts, Error, Result};

/// Prefix marking a history entry that was recorded but not executed.
pub const SKIP_MARKER: &str = "--";

/// Procedural-output call that triggers output capture.
const PUT_LINE_CALL: &str = "dbms_output.put_line";

/// Lines fetched per round trip when draining procedural output.
const OUTPUT_BATCH_SIZE: usize = 100;

const ENABLE_OUTPUT: &str = "begin dbms_output.enable(null); end;";
const GET_LINES: &str = "begin dbms_output.get_lines(:lines, :numlines); end;";
const OUTPUT_LINES_TYPE: &str = "SYS.DBMSOUTPUT_LINESARRAY";

/// Vendor code for "invalid username/password; logon denied".
const INVALID_CREDENTIALS_CODE: i32 = 1017;

/// Outcome of an authentication probe. Probe failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The credentials opened a connection.
    Valid,
    /// The target recognizably rejected the credentials (ORA-01017).
    InvalidCredential,
    /// The probe failed for an unrelated reason.
    Failed { code: i32, message: String },
}

/// Append-only record of every mutating statement submitted.
#[derive(Debug, Default)]
struct DdlLog {
    entries: Vec<String>,
}

impl DdlLog {
    fn record_executed(&mut self, statement: &str) {
        self.entries.push(statement.to_string());
    }

    fn record_skipped(&mut self, statement: &str) {
        self.entries.push(format!("{}{}", SKIP_MARKER, statement));
    }

    fn entries(&self) -> &[String] {
        &self.entries
    }

    fn snapshot(&self) -> Vec<String> {
        self.entries.clone()
    }
}

/// One live connection plus its audit state.
#[derive(Debug)]
pub struct Session {
    conn: Connection,
    descriptor: String,
    server_version: String,
    simulate: bool,
    ddl_log: DdlLog,
}

impl Session {
    /// Opens a session.
    ///
    /// # Arguments
    /// * `config` - Target, credentials and privilege mode
    /// * `simulate` - When true, mutating statements are recorded but never
    ///   sent to the database
    ///
    /// # Returns
    /// An open session with autocommit enabled and the server version
    /// resolved, or `Error::Connection` carrying the vendor code and message.
    pub fn open(config: &ConnectionConfig, simulate: bool) -> Result<Session> {
        config.validate()?;
        client::prime(config.oracle_home.as_deref()).map_err(Error::InvalidConfig)?;

        let descriptor = config.connect_descriptor();
        log::info!("Attempting to connect to Oracle database: {}", descriptor);

        let mut connector = Connector::new(
            config.username.as_deref().unwrap_or(""),
            config.password.as_deref().unwrap_or(""),
            &descriptor,
        );
        if config.sysdba {
            connector.privilege(Privilege::Sysdba);
        }
        if config.uses_wallet() {
            connector.external_auth(true);
        }

        let mut conn = connector.connect().map_err(|e| {
            let (code, message) = vendor_parts(&e);
            Error::Connection { code, message }
        })?;
        conn.set_autocommit(true);

        let (version, _banner) = conn.server_version().map_err(|e| {
            let (code, message) = vendor_parts(&e);
            Error::Connection { code, message }
        })?;
        let server_version = version.to_string();

        log::info!(
            "Successfully connected to {} (server version {})",
            descriptor,
            server_version
        );

        Ok(Session {
            conn,
            descriptor,
            server_version,
            simulate,
            ddl_log: DdlLog::default(),
        })
    }

    /// Resolved server version, for callers gating version-dependent DDL.
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn is_simulate(&self) -> bool {
        self.simulate
    }

    /// Every mutating statement submitted so far, in order. Skip-marked
    /// entries were recorded in simulate mode and never executed.
    pub fn ddl_history(&self) -> &[String] {
        self.ddl_log.entries()
    }

    /// Runs a read-only statement with named binds and fetches all rows.
    pub fn query(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Row>> {
        log::debug!("Executing query: {}", sql);
        let binds = named_binds(params);
        let rows = self
            .conn
            .query_named(sql, &binds)
            .map_err(|e| self.query_failure(e, sql, params))?;

        let mut fetched = Vec::new();
        for row_result in rows {
            let row = row_result.map_err(|e| self.query_failure(e, sql, params))?;
            fetched.push(row);
        }
        Ok(fetched)
    }

    /// Like `query`, but stops at the first row. An empty result is `None`,
    /// not an error.
    pub fn query_one(&self, sql: &str, params: &[(&str, &str)]) -> Result<Option<Row>> {
        log::debug!("Executing query: {}", sql);
        let binds = named_binds(params);
        let mut rows = self
            .conn
            .query_named(sql, &binds)
            .map_err(|e| self.query_failure(e, sql, params))?;

        match rows.next() {
            Some(row_result) => {
                let row = row_result.map_err(|e| self.query_failure(e, sql, params))?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// Runs a read-only statement and returns one map per row, keyed by the
    /// lower-cased column names.
    pub fn query_as_maps(
        &self,
        sql: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        log::debug!("Executing query: {}", sql);
        let binds = named_binds(params);
        let rows = self
            .conn
            .query_named(sql, &binds)
            .map_err(|e| self.query_failure(e, sql, params))?;

        let columns: Vec<(String, OracleType)> = rows
            .column_info()
            .iter()
            .map(|col| (col.name().to_lowercase(), col.oracle_type().clone()))
            .collect();

        let mut fetched = Vec::new();
        for row_result in rows {
            let row = row_result.map_err(|e| self.query_failure(e, sql, params))?;
            let mut record = HashMap::with_capacity(columns.len());
            for (idx, (name, oracle_type)) in columns.iter().enumerate() {
                record.insert(name.clone(), cell_to_json(&row, idx, oracle_type));
            }
            fetched.push(record);
        }
        Ok(fetched)
    }

    /// Executes one structural-change statement. No binds on this path: the
    /// target does not support bind parameters on DDL, so the statement must
    /// arrive fully rendered.
    pub fn execute_ddl(&mut self, statement: &str) -> Result<()> {
        if self.simulate {
            log::debug!("Simulate mode, recording without execution: {}", statement);
            self.ddl_log.record_skipped(statement);
            return Ok(());
        }

        log::debug!("Executing ddl: {}", statement);
        let outcome = self.conn.execute(statement, &[]);
        self.ddl_log.record_executed(statement);
        match outcome {
            Ok(_) => Ok(()),
            Err(e) => Err(self.ddl_failure(e, statement)),
        }
    }

    /// Executes a plain statement or a procedural block, returning captured
    /// output lines.
    ///
    /// A statement mentioning the print-line call gets output capture: enable
    /// the buffer, execute, then drain in batches of `OUTPUT_BATCH_SIZE`
    /// lines per round trip until a short batch signals the end. Statements
    /// without it execute directly and return no lines.
    pub fn execute_statement(&mut self, statement: &str) -> Result<Vec<String>> {
        if self.simulate {
            log::debug!("Simulate mode, recording without execution: {}", statement);
            self.ddl_log.record_skipped(statement);
            return Ok(Vec::new());
        }

        log::debug!("Executing statement: {}", statement);
        let outcome = self.run_statement(statement);
        self.ddl_log.record_executed(statement);
        outcome.map_err(|e| self.statement_failure(e, statement))
    }

    /// Probes alternate credentials against this session's target with a
    /// throwaway connection.
    pub fn try_authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        match Connector::new(username, password, &self.descriptor).connect() {
            Ok(_) => {
                log::debug!("Authentication probe succeeded for {}", username);
                AuthOutcome::Valid
            }
            Err(e) => {
                let (code, message) = vendor_parts(&e);
                if code == INVALID_CREDENTIALS_CODE {
                    log::debug!("Authentication probe rejected for {}", username);
                    AuthOutcome::InvalidCredential
                } else {
                    log::debug!("Authentication probe failed for {}: {}", username, message);
                    AuthOutcome::Failed { code, message }
                }
            }
        }
    }

    fn run_statement(&self, statement: &str) -> std::result::Result<Vec<String>, oracle::Error> {
        if !captures_output(statement) {
            self.conn.execute(statement, &[])?;
            return Ok(Vec::new());
        }

        self.conn.execute(ENABLE_OUTPUT, &[])?;
        self.conn.execute(statement, &[])?;
        self.drain_output()
    }

    /// Fetches buffered procedural output. The protocol returns capped
    /// chunks with no explicit end marker; a batch shorter than the
    /// requested size is the only "no more lines" signal.
    fn drain_output(&self) -> std::result::Result<Vec<String>, oracle::Error> {
        let lines_type = self.conn.object_type(OUTPUT_LINES_TYPE)?;
        let mut stmt = self.conn.statement(GET_LINES).build()?;
        stmt.bind("lines", &OracleType::Object(lines_type))?;
        stmt.bind("numlines", &(OUTPUT_BATCH_SIZE as i64))?;

        // A full batch leaves the in/out count equal to the batch size, so
        // the next call requests the same amount again.
        collect_batches(OUTPUT_BATCH_SIZE, |batch_size| {
            stmt.execute(&[])?;
            let returned: i64 = stmt.bind_value("numlines")?;
            let lines: Collection = stmt.bind_value("lines")?;

            let count = returned.clamp(0, batch_size as i64) as i32;
            let mut batch = Vec::with_capacity(count as usize);
            for index in 0..count {
                let line: Option<String> = lines.get(index)?;
                batch.push(line.unwrap_or_default());
            }
            Ok(batch)
        })
    }

    fn query_failure(&self, err: oracle::Error, sql: &str, params: &[(&str, &str)]) -> Error {
        let (code, message) = vendor_parts(&err);
        Error::Query {
            code,
            message,
            statement: sql.to_string(),
            params: params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            ddl_history: self.ddl_log.snapshot(),
        }
    }

    fn ddl_failure(&self, err: oracle::Error, statement: &str) -> Error {
        let (code, message) = vendor_parts(&err);
        Error::Ddl {
            code,
            message,
            statement: statement.to_string(),
            ddl_history: self.ddl_log.snapshot(),
        }
    }

    fn statement_failure(&self, err: oracle::Error, statement: &str) -> Error {
        let (code, message) = vendor_parts(&err);
        Error::Statement {
            code,
            message,
            statement: statement.to_string(),
            ddl_history: self.ddl_log.snapshot(),
        }
    }
}

fn named_binds<'a>(params: &'a [(&'a str, &'a str)]) -> Vec<(&'a str, &'a dyn ToSql)> {
    params
        .iter()
        .map(|(name, value)| (*name, value as &dyn ToSql))
        .collect()
}

fn captures_output(statement: &str) -> bool {
    statement.to_lowercase().contains(PUT_LINE_CALL)
}

/// Polls `next_batch` until it returns fewer lines than the batch size,
/// concatenating everything retrieved in order.
fn collect_batches<E, F>(
    batch_size: usize,
    mut next_batch: F,
) -> std::result::Result<Vec<String>, E>
where
    F: FnMut(usize) -> std::result::Result<Vec<String>, E>,
{
    let mut lines = Vec::new();
    loop {
        let batch = next_batch(batch_size)?;
        let done = batch.len() < batch_size;
        lines.extend(batch);
        if done {
            return Ok(lines);
        }
    }
}

/// Converts one cell by column type: numbers stay numeric when they fit,
/// everything else goes through the driver's string conversion, SQL NULL
/// becomes JSON null.
fn cell_to_json(row: &Row, idx: usize, oracle_type: &OracleType) -> serde_json::Value {
    match oracle_type {
        OracleType::Number(_, _)
        | OracleType::Float(_)
        | OracleType::BinaryFloat
        | OracleType::BinaryDouble
        | OracleType::Int64
        | OracleType::UInt64 => {
            if let Ok(Some(value)) = row.get::<usize, Option<i64>>(idx) {
                return serde_json::Value::from(value);
            }
            if let Ok(Some(value)) = row.get::<usize, Option<f64>>(idx) {
                return serde_json::Number::from_f64(value)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null);
            }
            match row.get::<usize, Option<String>>(idx) {
                Ok(Some(text)) => serde_json::Value::String(text),
                _ => serde_json::Value::Null,
            }
        }
        _ => match row.get::<usize, Option<String>>(idx) {
            Ok(Some(text)) => serde_json::Value::String(text),
            _ => serde_json::Value::Null,
        },
    }
}

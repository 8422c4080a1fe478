//! Data-access facade shared by both services.
//!
//! Statements are built with sea-query and rendered for the connected
//! backend, so every value travels as a bound parameter. Each call checks a
//! connection out of the pool and hands it back when the future completes,
//! whether the statement succeeded or not.

use std::time::Duration;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr,
    FromQueryResult, SqlErr, StatementBuilder,
};
use tracing::{debug, info};

/// Result of a write statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecOutcome {
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// Constraint failures the services translate into domain errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique(String),
    ForeignKey(String),
}

/// Classify a driver error by its structured SQL error code.
pub fn constraint_violation(err: &DbErr) -> Option<ConstraintViolation> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(msg) => Some(ConstraintViolation::Unique(msg)),
        SqlErr::ForeignKeyConstraintViolation(msg) => Some(ConstraintViolation::ForeignKey(msg)),
        _ => None,
    }
}

pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    opt
}

/// Shared handle over the connection pool.
#[derive(Clone, Debug)]
pub struct Db {
    conn: DatabaseConnection,
}

impl Db {
    pub fn new(conn: DatabaseConnection) -> Self { Self { conn } }

    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(connect_options(cfg)).await?;
        let db = Self::new(conn);
        info!(backend = ?db.backend(), "database connected");
        if cfg.run_migrations {
            db.migrate().await?;
        }
        Ok(db)
    }

    pub async fn migrate(&self) -> Result<(), DbErr> {
        migration::Migrator::up(&self.conn, None).await?;
        info!("migrations applied");
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection { &self.conn }

    pub fn backend(&self) -> DbBackend { self.conn.get_database_backend() }

    /// Run a SELECT and map every row.
    pub async fn query<T, S>(&self, stmt: &S) -> Result<Vec<T>, DbErr>
    where
        T: FromQueryResult,
        S: StatementBuilder,
    {
        let statement = self.backend().build(stmt);
        debug!(sql = %statement, "query");
        T::find_by_statement(statement).all(&self.conn).await
    }

    /// Run a SELECT and map the first row, if any.
    pub async fn query_one<T, S>(&self, stmt: &S) -> Result<Option<T>, DbErr>
    where
        T: FromQueryResult,
        S: StatementBuilder,
    {
        let statement = self.backend().build(stmt);
        debug!(sql = %statement, "query_one");
        T::find_by_statement(statement).one(&self.conn).await
    }

    /// Run an INSERT/UPDATE/DELETE.
    pub async fn execute<S>(&self, stmt: &S) -> Result<ExecOutcome, DbErr>
    where
        S: StatementBuilder,
    {
        let statement = self.backend().build(stmt);
        debug!(sql = %statement, "execute");
        let res = self.conn.execute(statement).await?;
        Ok(ExecOutcome { last_insert_id: res.last_insert_id(), rows_affected: res.rows_affected() })
    }
}

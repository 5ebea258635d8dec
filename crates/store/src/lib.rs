//! PostgreSQL adapters for the checkout ports.
//!
//! Each adapter wraps a shared [`PgPool`] and converts every `sqlx` failure
//! into a [`checkout::PortError`].

mod cart;
mod customer;
mod product;

pub use cart::PostgresCartRepository;
pub use customer::PostgresCustomerGateway;
pub use product::PostgresProductGateway;

use checkout::PortError;
use sqlx::PgPool;

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Returns a mapper that wraps a `sqlx` error with what was being attempted.
pub(crate) fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| {
        tracing::warn!(error = %e, action, "database operation failed");
        PortError::with_source(format!("failed to {action}"), e)
    }
}

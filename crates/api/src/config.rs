//! Application configuration loaded from environment variables.

use std::fmt;

use checkout::Product;
use common::{CustomerId, ProductId};
use domain::Money;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `AUTH_ACCESS_TOKEN`: HMAC secret for bearer tokens (required)
/// - `DATABASE_URL`: PostgreSQL connection string; in-memory adapters are
///   used when unset
/// - `SEED_CUSTOMER_IDS`: comma-separated customer UUIDs registered in the
///   in-memory customer directory
/// - `SEED_PRODUCTS`: comma-separated `<uuid>:<price in cents>` entries
///   loaded into the in-memory catalog
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub auth_access_token: String,
    pub database_url: Option<String>,
    pub seed_customers: Vec<CustomerId>,
    pub seed_products: Vec<Product>,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// optional settings.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let auth_access_token = lookup("AUTH_ACCESS_TOKEN")
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing("AUTH_ACCESS_TOKEN"))?;

        let seed_customers = list_entries(lookup("SEED_CUSTOMER_IDS"))
            .into_iter()
            .map(|entry| {
                parse_uuid(&entry)
                    .map(CustomerId::from_uuid)
                    .ok_or_else(|| invalid("SEED_CUSTOMER_IDS", entry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let seed_products = list_entries(lookup("SEED_PRODUCTS"))
            .into_iter()
            .map(|entry| parse_product(&entry).ok_or_else(|| invalid("SEED_PRODUCTS", entry)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            auth_access_token,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            seed_customers,
            seed_products,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn list_entries(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

fn invalid(name: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { name, value }
}

fn parse_uuid(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn parse_product(entry: &str) -> Option<Product> {
    let (id, price) = entry.split_once(':')?;
    let id = parse_uuid(id.trim())?;
    let cents = price.trim().parse::<i64>().ok()?;
    let unit_price = Money::new(cents).ok()?;

    Some(Product {
        id: ProductId::from_uuid(id),
        unit_price,
    })
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("auth_access_token", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("seed_customers", &self.seed_customers.len())
            .field("seed_products", &self.seed_products.len())
            .finish()
    }
}

//! Configuration
//!
//! All settings come from environment variables (a `.env` file is honored):
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/cafe-server | database + receipt storage root |
//! | RESERVATION_FEE | 0 | table fee charged per reservation |
//! | STORE_NAME | CAFE | receipt header line |
//! | STORE_ADDRESS | (empty) | receipt address line |
//!
//! A missing or malformed `RESERVATION_FEE` falls back to 0 rather than
//! failing startup; reservations are then created without a fee.

use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the embedded database and receipt files
    pub work_dir: String,
    /// Fee charged when a reservation is created
    pub reservation_fee: Decimal,
    /// Receipt header line
    pub store_name: String,
    /// Receipt address line; omitted when empty
    pub store_address: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cafe-server".into()),
            reservation_fee: parse_fee(std::env::var("RESERVATION_FEE").ok().as_deref()),
            store_name: std::env::var("STORE_NAME").unwrap_or_else(|_| "CAFE".into()),
            store_address: std::env::var("STORE_ADDRESS").unwrap_or_default(),
        }
    }

    /// Override configuration with explicit values, mainly for tests
    pub fn with_overrides(work_dir: impl Into<String>, reservation_fee: Decimal) -> Self {
        Self {
            work_dir: work_dir.into(),
            reservation_fee,
            store_name: "CAFE".into(),
            store_address: String::new(),
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("receipts")
    }

    /// Make sure the working directory layout exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.receipts_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse the reservation fee, falling back to 0 on missing/malformed input
fn parse_fee(raw: Option<&str>) -> Decimal {
    match raw {
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("RESERVATION_FEE '{}' is not a number, using 0", v);
            Decimal::ZERO
        }),
        None => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_parses_decimal() {
        assert_eq!(parse_fee(Some("50000")), Decimal::from(50000));
        assert_eq!(parse_fee(Some("12.50")), "12.50".parse().unwrap());
    }

    #[test]
    fn fee_falls_back_to_zero() {
        assert_eq!(parse_fee(None), Decimal::ZERO);
        assert_eq!(parse_fee(Some("banana")), Decimal::ZERO);
        assert_eq!(parse_fee(Some("")), Decimal::ZERO);
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use secrecy::Secret;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub paystack: PaystackConfig,
    pub checkout: CheckoutConfig,
    pub smtp: SmtpConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PaystackConfig {
    pub public_key: String,
    pub secret_key: Secret<String>,
    pub api_base_url: String,
    /// Base URL the customer is sent back to after checkout.
    pub callback_base_url: String,
}

/// Checkout pricing knobs. Defaults match the kitchen's standing policy:
/// a flat 5,000 NGN delivery fee and 7.5% VAT.
#[derive(Deserialize, Clone, Debug)]
pub struct CheckoutConfig {
    pub flat_shipping_fee: Decimal,
    pub tax_rate: Decimal,
    pub currency: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SmtpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
    pub from_email: String,
    pub from_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("STOREFRONT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("STOREFRONT_PORT")
            .unwrap_or_else(|_| "3005".to_string())
            .parse()
            .context("STOREFRONT_PORT must be a port number")?;

        let db_url =
            env::var("STOREFRONT_DATABASE_URL").context("STOREFRONT_DATABASE_URL must be set")?;
        let max_connections = env::var("STOREFRONT_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);
        let min_connections = env::var("STOREFRONT_DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .unwrap_or(1);

        let paystack_public_key = env::var("PAYSTACK_PUBLIC_KEY").unwrap_or_default();
        let paystack_secret_key = env::var("PAYSTACK_SECRET_KEY").unwrap_or_default();
        let paystack_base_url = env::var("PAYSTACK_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.paystack.co".to_string());
        let callback_base_url = env::var("STOREFRONT_CALLBACK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let flat_shipping_fee = decimal_env("STOREFRONT_FLAT_SHIPPING_FEE", "5000.00")?;
        let tax_rate = decimal_env("STOREFRONT_TAX_RATE", "0.075")?;
        let currency = env::var("STOREFRONT_CURRENCY").unwrap_or_else(|_| "NGN".to_string());

        let smtp_enabled = env::var("STOREFRONT_SMTP_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);
        let smtp_host = env::var("STOREFRONT_SMTP_HOST").unwrap_or_default();
        let smtp_port = env::var("STOREFRONT_SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587);
        let smtp_user = env::var("STOREFRONT_SMTP_USER").unwrap_or_default();
        let smtp_password = env::var("STOREFRONT_SMTP_PASSWORD").unwrap_or_default();
        let from_email = env::var("STOREFRONT_SMTP_FROM_EMAIL")
            .unwrap_or_else(|_| "orders@localhost".to_string());
        let from_name =
            env::var("STOREFRONT_SMTP_FROM_NAME").unwrap_or_else(|_| "The Kitchen".to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                max_connections,
                min_connections,
            },
            paystack: PaystackConfig {
                public_key: paystack_public_key,
                secret_key: Secret::new(paystack_secret_key),
                api_base_url: paystack_base_url,
                callback_base_url,
            },
            checkout: CheckoutConfig {
                flat_shipping_fee,
                tax_rate,
                currency,
            },
            smtp: SmtpConfig {
                enabled: smtp_enabled,
                host: smtp_host,
                port: smtp_port,
                user: smtp_user,
                password: Secret::new(smtp_password),
                from_email,
                from_name,
            },
            service_name: "storefront-service".to_string(),
        })
    }
}

fn decimal_env(key: &str, default: &str) -> Result<Decimal> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Decimal::from_str(&raw).with_context(|| format!("{} must be a decimal number", key))
}

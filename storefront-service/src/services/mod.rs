pub mod database;
pub mod mailer;
pub mod metrics;
pub mod paystack;

pub use database::Database;
pub use mailer::Mailer;
pub use metrics::{get_metrics, init_metrics};
pub use paystack::PaystackClient;

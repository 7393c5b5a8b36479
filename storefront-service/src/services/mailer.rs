//! Transactional email over SMTP.
//!
//! Mail is best-effort: callers fire notifications in a background task
//! and a send failure never fails the originating request.

use crate::config::SmtpConfig;
use crate::models::{CateringEnquiry, Order};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;

#[derive(Clone)]
pub struct Mailer {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Result<Self, AppError> {
        if !config.enabled {
            return Ok(Self {
                config,
                transport: None,
            });
        }

        let creds = Credentials::new(
            config.user.clone(),
            config.password.expose_secret().clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::EmailError(format!("Failed to create SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            config,
            transport: Some(transport),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send_order_confirmation(&self, order: &Order) -> Result<(), AppError> {
        let body = format!(
            "Hello {},\n\nThank you for your order {}.\n\n\
             Subtotal: {} {}\nDelivery: {} {}\nVAT: {} {}\nTotal: {} {}\n\n\
             We will confirm your delivery date once payment is received.\n",
            order.shipping_name,
            order.order_number,
            order.subtotal,
            "NGN",
            order.shipping_fee,
            "NGN",
            order.tax,
            "NGN",
            order.total,
            "NGN",
        );
        self.send(
            &order.shipping_email,
            &format!("Order confirmation - {}", order.order_number),
            body,
        )
        .await
    }

    pub async fn send_enquiry_acknowledgement(
        &self,
        enquiry: &CateringEnquiry,
    ) -> Result<(), AppError> {
        let body = format!(
            "Hello {},\n\nWe received your catering enquiry for {} guests on {}.\n\
             Our team will get back to you shortly.\n",
            enquiry.name, enquiry.number_of_guests, enquiry.event_date,
        );
        self.send(&enquiry.email, "We received your enquiry", body)
            .await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), AppError> {
        let Some(transport) = self.transport.as_ref() else {
            tracing::debug!(to = %to, subject = %subject, "SMTP disabled, skipping email");
            return Ok(());
        };

        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| AppError::EmailError(format!("Invalid from address: {}", e)))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::EmailError(format!("Invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::EmailError(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::EmailError(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

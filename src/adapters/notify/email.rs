//! Email notifier using lettre. Sends the full plain-text report over SMTP (STARTTLS).

use crate::domain::format::format as render_report;
use crate::domain::{DomainError, GroupedShoppingList, WeeklyPlan};
use crate::ports::NotifierPort;
use chrono::{Datelike, Local, NaiveDate};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

const CHANNEL: &str = "email";

/// SMTP settings, resolved from `AppConfig` by the caller.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub recipient: String,
    pub household_size: u32,
}

/// Email delivery channel.
#[derive(Clone)]
pub struct EmailNotifier {
    mailer: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
    household_size: u32,
}

impl EmailNotifier {
    /// Build the SMTP transport. The sender address doubles as SMTP login.
    pub fn new(settings: &EmailSettings) -> Result<Self, DomainError> {
        let from: Mailbox = settings
            .username
            .parse()
            .map_err(|e| DomainError::Config(format!("invalid EMAIL_ADDRESS: {}", e)))?;
        let to: Mailbox = settings
            .recipient
            .parse()
            .map_err(|e| DomainError::Config(format!("invalid RECIPIENT_EMAIL: {}", e)))?;

        let creds = Credentials::new(settings.username.clone(), settings.password.clone());
        let mailer = SmtpTransport::starttls_relay(&settings.smtp_server)
            .map_err(|e| DomainError::Config(format!("invalid SMTP_SERVER: {}", e)))?
            .port(settings.smtp_port)
            .credentials(creds)
            .build();

        info!(
            smtp_host = %settings.smtp_server,
            smtp_port = settings.smtp_port,
            to = %to,
            "Email notifier initialized"
        );

        Ok(Self {
            mailer,
            from,
            to,
            household_size: settings.household_size,
        })
    }

    fn build_message(
        &self,
        plan: &WeeklyPlan,
        shopping_list: &GroupedShoppingList,
        today: NaiveDate,
    ) -> Result<Message, DomainError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(self.household_size, today))
            .header(ContentType::TEXT_PLAIN)
            .body(render_report(plan, shopping_list))
            .map_err(|e| DomainError::delivery(CHANNEL, format!("Email building error: {}", e)))
    }
}

/// Monday of the week being planned: today if Monday, else the coming Monday.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let offset = (7 - today.weekday().num_days_from_monday()) % 7;
    today + chrono::Days::new(u64::from(offset))
}

pub fn subject(household_size: u32, today: NaiveDate) -> String {
    format!(
        "Weekly Meal Plan & Shopping List ({} People) - week of {}",
        household_size,
        week_start(today).format("%Y-%m-%d")
    )
}

#[async_trait::async_trait]
impl NotifierPort for EmailNotifier {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn deliver(
        &self,
        plan: &WeeklyPlan,
        shopping_list: &GroupedShoppingList,
    ) -> Result<(), DomainError> {
        let email = self.build_message(plan, shopping_list, Local::now().date_naive())?;
        let mailer = self.mailer.clone();

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| DomainError::delivery(CHANNEL, format!("send task failed: {}", e)))?
            .map_err(|e| DomainError::delivery(CHANNEL, format!("SMTP error: {}", e)))?;

        info!(to = %self.to, "Email sent");
        Ok(())
    }
}

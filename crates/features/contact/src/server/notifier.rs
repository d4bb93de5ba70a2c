use super::error::ContactError;
use crate::model::ContactRecord;
use agency_domain::config::{NotifyConfig, SmtpConfig};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Announces new submissions to the site owner.
#[derive(Debug)]
pub enum Notifier {
    Disabled,
    Log,
    Smtp(SmtpNotifier),
}

#[derive(Debug)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Notifier {
    /// # Errors
    /// Returns an error if SMTP addresses don't parse or the relay cannot be configured.
    pub fn from_config(cfg: &NotifyConfig) -> Result<Self, ContactError> {
        Ok(match cfg {
            NotifyConfig::Disabled => Self::Disabled,
            NotifyConfig::Log => Self::Log,
            NotifyConfig::Smtp(smtp) => Self::Smtp(SmtpNotifier::from_config(smtp)?),
        })
    }

    /// Delivers the announcement; `Ok(true)` means an email went out.
    ///
    /// # Errors
    /// Returns an error if the message cannot be built or the relay rejects it.
    pub async fn notify(&self, record: &ContactRecord) -> Result<bool, ContactError> {
        match self {
            Self::Disabled => Ok(false),
            Self::Log => {
                info!(
                    id = record.id,
                    name = %record.name,
                    email = %record.email,
                    "New contact form submission"
                );
                Ok(false)
            },
            Self::Smtp(smtp) => smtp.send(record).await.map(|()| true),
        }
    }
}

impl SmtpNotifier {
    fn from_config(cfg: &SmtpConfig) -> Result<Self, ContactError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .map_err(|source| ContactError::Smtp {
                source,
                context: Some(format!("relay {}", cfg.host).into()),
            })?
            .port(cfg.port)
            .timeout(Some(SMTP_TIMEOUT));
        if !cfg.username.is_empty() {
            builder = builder.credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: mailbox(&cfg.from, "from mailbox")?,
            to: mailbox(&cfg.to, "to mailbox")?,
        })
    }

    async fn send(&self, record: &ContactRecord) -> Result<(), ContactError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New Contact Form Submission from {}", record.name))
            .header(ContentType::TEXT_PLAIN)
            .body(notification_body(record))
            .map_err(|source| ContactError::Mail {
                source,
                context: Some(format!("submission {}", record.id).into()),
            })?;

        self.transport.send(email).await.map_err(|source| ContactError::Smtp {
            source,
            context: Some(format!("delivery of submission {}", record.id).into()),
        })?;
        Ok(())
    }
}

fn mailbox(address: &str, role: &'static str) -> Result<Mailbox, ContactError> {
    address.parse().map_err(|source| ContactError::Address { source, context: Some(role.into()) })
}

fn notification_body(record: &ContactRecord) -> String {
    format!(
        "New contact form submission received:\n\n\
         Name: {}\nEmail: {}\nMessage:\n{}\n\n---\nSubmission ID: {}\n",
        record.name, record.email, record.message, record.id
    )
}

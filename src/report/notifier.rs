//! Battle report delivery
//!
//! Delivery is attempted exactly once. A failed delivery is reported to the
//! caller and never retried.

use crate::core::config::MailConfig;
use crate::core::error::DeliveryError;
use reqwest::Client;
use std::future::Future;
use tracing::{info, warn};

const MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";

/// A finished report ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl Report {
    /// Subject line for a report produced on `date`
    pub fn dated_subject(date: chrono::NaiveDate) -> String {
        format!("Superhero Battle Results - {}", date.format("%Y-%m-%d"))
    }

    pub fn today(text: String, html: String) -> Self {
        Self {
            subject: Self::dated_subject(chrono::Utc::now().date_naive()),
            text,
            html,
        }
    }
}

/// Anything that can hand a report to a recipient
pub trait ReportChannel {
    fn deliver(
        &self,
        recipient: &str,
        report: &Report,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// Sends reports through the Mailgun messages endpoint
pub struct MailgunNotifier {
    client: Client,
    api_key: String,
    domain: String,
    sender: String,
}

impl MailgunNotifier {
    pub fn new(config: &MailConfig) -> Result<Self, DeliveryError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(DeliveryError::NotConfigured("MAILGUN_API_KEY"))?;
        let domain = config
            .domain
            .clone()
            .filter(|domain| !domain.is_empty())
            .ok_or(DeliveryError::NotConfigured("MAILGUN_DOMAIN_NAME"))?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            domain,
            sender: config.sender.clone(),
        })
    }

    pub fn messages_url(&self) -> String {
        format!("{}/{}/messages", MAILGUN_API_BASE, self.domain)
    }
}

impl ReportChannel for MailgunNotifier {
    async fn deliver(&self, recipient: &str, report: &Report) -> Result<(), DeliveryError> {
        validate_recipient(recipient)?;

        let form = [
            ("from", self.sender.as_str()),
            ("to", recipient),
            ("subject", report.subject.as_str()),
            ("text", report.text.as_str()),
            ("html", report.html.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), recipient, "Mailgun rejected the report");
            return Err(DeliveryError::Rejected(status.as_u16()));
        }

        info!(recipient, "Battle report sent");
        Ok(())
    }
}

/// Minimal address check: one `@`, a local part, and a dotted domain
pub fn validate_recipient(address: &str) -> Result<(), DeliveryError> {
    let invalid = || DeliveryError::InvalidRecipient(address.to_string());

    if address.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = address.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_recipients() {
        assert!(validate_recipient("bruce@wayne.com").is_ok());
        assert!(validate_recipient("peter.parker+web@daily.bugle.co").is_ok());
    }

    #[test]
    fn test_invalid_recipients() {
        for address in [
            "",
            "nobody",
            "@wayne.com",
            "bruce@",
            "bruce@wayne",
            "bruce@@wayne.com",
            "bruce@wayne..com",
            "bruce wayne@wayne.com",
        ] {
            assert!(
                matches!(validate_recipient(address), Err(DeliveryError::InvalidRecipient(_))),
                "{:?} should be rejected",
                address
            );
        }
    }

    #[test]
    fn test_subject_is_dated() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Report::dated_subject(date), "Superhero Battle Results - 2024-03-09");
    }

    #[test]
    fn test_notifier_requires_credentials() {
        let mut config = MailConfig::default();
        assert!(matches!(
            MailgunNotifier::new(&config),
            Err(DeliveryError::NotConfigured("MAILGUN_API_KEY"))
        ));

        config.api_key = Some("key-123".into());
        assert!(matches!(
            MailgunNotifier::new(&config),
            Err(DeliveryError::NotConfigured("MAILGUN_DOMAIN_NAME"))
        ));

        config.domain = Some("mg.example.com".into());
        let notifier = MailgunNotifier::new(&config).unwrap();
        assert_eq!(
            notifier.messages_url(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected_before_sending() {
        let config = MailConfig {
            api_key: Some("key-123".into()),
            domain: Some("mg.example.com".into()),
            ..MailConfig::default()
        };
        let notifier = MailgunNotifier::new(&config).unwrap();
        let report = Report::today("text".into(), "<p>html</p>".into());
        assert!(matches!(
            notifier.deliver("not-an-address", &report).await,
            Err(DeliveryError::InvalidRecipient(_))
        ));
    }
}

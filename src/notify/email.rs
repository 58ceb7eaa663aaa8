use lettre::{
    message::{header::ContentType, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};

use crate::config::SmtpConfig;
use crate::error::ApiError;

/// Sends one message over a STARTTLS relay session. No retry, no queueing.
pub async fn send_email(
    cfg: &SmtpConfig,
    to: &str,
    subject: &str,
    body: &str,
    html: bool,
) -> Result<(), ApiError> {
    let content_type = if html {
        ContentType::TEXT_HTML
    } else {
        ContentType::TEXT_PLAIN
    };

    let email = Message::builder()
        .from(cfg
            .username
            .parse()
            .map_err(|e| ApiError::Delivery(format!("Invalid from address: {e}")))?)
        .to(to
            .parse()
            .map_err(|e| ApiError::Delivery(format!("Invalid to address: {e}")))?)
        .subject(subject)
        .header(content_type)
        .body(body.to_string())
        .map_err(|e| ApiError::Delivery(format!("Failed to build email: {e}")))?;

    let mailer = SmtpTransport::starttls_relay(&cfg.host)
        .map_err(|e| ApiError::Delivery(format!("SMTP relay error: {e}")))?
        .port(cfg.port)
        .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
        .build();

    // The SMTP transport is blocking; keep it off the async executor.
    tokio::task::spawn_blocking(move || mailer.send(&email))
        .await
        .map_err(|e| ApiError::Internal(format!("Mail task failed: {e}")))?
        .map_err(|e| ApiError::Delivery(format!("Failed to send email: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "support@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_connecting() {
        let err = send_email(&test_smtp_config(), "not-an-address", "Hi", "Body", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_sender_fails_before_connecting() {
        let mut cfg = test_smtp_config();
        cfg.username = String::new();
        let err = send_email(&cfg, "user@example.com", "Hi", "Body", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Delivery(_)));
    }
}

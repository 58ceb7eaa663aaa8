use std::time::Duration;

use serde_json::Value;

use crate::config::SmsConfig;
use crate::error::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delegates one message to the provider and returns its identifier.
pub async fn send_sms(cfg: &SmsConfig, to: &str, body: &str) -> Result<String, ApiError> {
    if cfg.account_sid.is_empty() || cfg.auth_token.is_empty() {
        return Err(ApiError::Configuration(
            "SMS provider not configured".to_string(),
        ));
    }

    let url = format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        cfg.base_url, cfg.account_sid
    );
    let params = [("To", to), ("From", cfg.from_number.as_str()), ("Body", body)];

    let response = reqwest::Client::new()
        .post(&url)
        .timeout(REQUEST_TIMEOUT)
        .basic_auth(&cfg.account_sid, Some(&cfg.auth_token))
        .form(&params)
        .send()
        .await
        .map_err(|e| ApiError::Delivery(format!("SMS request failed: {e}")))?;

    let status = response.status();
    let data: Value = response.json().await.map_err(|_| {
        ApiError::Delivery(format!("SMS provider returned non-JSON response ({status})"))
    })?;

    if !status.is_success() {
        let detail = data
            .get("message")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| data.to_string());
        return Err(ApiError::Delivery(format!("SMS provider error: {detail}")));
    }

    data.get("sid")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| ApiError::Delivery("SMS provider response missing sid".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_sms_config(base_url: String) -> SmsConfig {
        SmsConfig {
            account_sid: "AC_test".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550100".to_string(),
            base_url,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails_fast() {
        let cfg = SmsConfig {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            base_url: "https://api.twilio.com".to_string(),
        };
        let err = send_sms(&cfg, "+15550123", "hello").await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_send_returns_sid() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2010-04-01/Accounts/AC_test/Messages.json")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({"sid": "SM123", "status": "queued"}).to_string())
            .create_async()
            .await;

        let cfg = test_sms_config(server.url());
        let sid = send_sms(&cfg, "+15550123", "hello")
            .await
            .expect("send failed");
        assert_eq!(sid, "SM123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/2010-04-01/Accounts/AC_test/Messages.json")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": 21211, "message": "Invalid 'To' number"}).to_string())
            .create_async()
            .await;

        let cfg = test_sms_config(server.url());
        let err = send_sms(&cfg, "bogus", "hello").await.unwrap_err();
        match err {
            ApiError::Delivery(msg) => assert!(msg.contains("Invalid 'To' number")),
            other => panic!("expected delivery error, got {other:?}"),
        }
    }
}

//! HTTP client for a Stripe-style hosted checkout API.

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::checkout::{
    CheckoutGateway, CheckoutSession, CreateSessionRequest, CreatedSession, GatewayError,
};

/// Talks to the hosted checkout API: form-encoded writes, JSON reads, bearer
/// secret on every request.
pub struct HttpCheckoutGateway {
    http: Client,
    base_url: String,
    secret_key: String,
}

impl HttpCheckoutGateway {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
            secret_key: secret_key.into(),
        }
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    #[serde(default)]
    message: String,
}

#[async_trait::async_trait]
impl CheckoutGateway for HttpCheckoutGateway {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CreatedSession, GatewayError> {
        let form = session_form(request);

        let response = self
            .http
            .post(self.sessions_url())
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let response = reject_on_error_status(response).await?;
        let envelope: SessionEnvelope = response.json().await?;
        let url = envelope.url.ok_or(GatewayError::MalformedResponse("url"))?;

        Ok(CreatedSession {
            id: envelope.id,
            url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError> {
        let response = self
            .http
            .get(format!("{}/{}", self.sessions_url(), session_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::SessionNotFound);
        }
        let response = reject_on_error_status(response).await?;

        Ok(response.json::<CheckoutSession>().await?)
    }
}

/// Flattens a session request into the bracket-notation form fields the
/// gateway expects (`line_items[0][price_data][currency]` and friends).
fn session_form(request: CreateSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".into(), "payment".into()),
        (
            "line_items[0][price_data][currency]".into(),
            request.line_item.currency,
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            request.line_item.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".into(),
            request.line_item.product_name,
        ),
        ("line_items[0][quantity]".into(), "1".into()),
        ("customer_email".into(), request.customer_email),
        ("success_url".into(), request.success_url),
        ("cancel_url".into(), request.cancel_url),
    ];
    for (key, value) in request.metadata {
        form.push((format!("metadata[{key}]"), value));
    }
    form
}

async fn reject_on_error_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<GatewayErrorBody>().await {
        Ok(body) if !body.error.message.is_empty() => body.error.message,
        _ => format!("http status {status}"),
    };
    Err(GatewayError::Rejected(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::LineItem;
    use std::collections::HashMap;

    #[test]
    fn session_form_uses_bracket_notation() {
        let form = session_form(CreateSessionRequest {
            line_item: LineItem {
                currency: "usd".into(),
                unit_amount: 5000,
                product_name: "Logo Sprint".into(),
            },
            customer_email: "buyer@example.com".into(),
            metadata: HashMap::from([("contestId".to_string(), "7".to_string())]),
            success_url: "https://app.test/payment-success?session_id={CHECKOUT_SESSION_ID}"
                .into(),
            cancel_url: "https://app.test/payment-cancelled".into(),
        });

        let field = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(field("mode"), Some("payment"));
        assert_eq!(field("line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(field("line_items[0][price_data][unit_amount]"), Some("5000"));
        assert_eq!(
            field("line_items[0][price_data][product_data][name]"),
            Some("Logo Sprint")
        );
        assert_eq!(field("line_items[0][quantity]"), Some("1"));
        assert_eq!(field("metadata[contestId]"), Some("7"));
        assert_eq!(field("customer_email"), Some("buyer@example.com"));
    }

    #[test]
    fn trailing_slashes_are_dropped_from_the_base_url() {
        let client = HttpCheckoutGateway::new("https://gateway.test///", "sk_test");
        assert_eq!(
            client.sessions_url(),
            "https://gateway.test/v1/checkout/sessions"
        );
    }

    #[test]
    fn sessions_deserialize_from_gateway_json() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{
                "id": "cs_test_1",
                "payment_intent": "pi_123",
                "payment_status": "paid",
                "amount_total": 5000,
                "currency": "usd",
                "customer_email": "buyer@example.com",
                "metadata": {"contestId": "7"}
            }"#,
        )
        .expect("session parses");

        assert_eq!(session.payment_intent.as_deref(), Some("pi_123"));
        assert!(session.payment_status.is_paid());
        assert_eq!(session.amount_total, 5000);
        assert_eq!(session.metadata.get("contestId").map(String::as_str), Some("7"));
    }

    #[test]
    fn metadata_defaults_to_empty_when_absent() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{
                "id": "cs_test_2",
                "payment_intent": null,
                "payment_status": "unpaid",
                "amount_total": 0,
                "currency": "usd",
                "customer_email": null
            }"#,
        )
        .expect("session parses");

        assert!(session.metadata.is_empty());
        assert!(!session.payment_status.is_paid());
    }
}

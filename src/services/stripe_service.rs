//! Cliente del proveedor de pagos (checkout alojado estilo Stripe)
//!
//! Crea sesiones de checkout contra la API REST del proveedor y
//! verifica la firma HMAC-SHA256 de los webhooks entrantes.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;
use tracing::error;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::dto::payment_dto::ProviderEvent;
use crate::utils::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Tolerancia máxima entre el timestamp firmado y el reloj local
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Timeout de las llamadas al proveedor
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct CheckoutSession {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: Option<String>,
}

pub struct StripeService {
    http_client: reqwest::Client,
    api_base: String,
    secret_key: String,
    webhook_secret: String,
}

impl StripeService {
    pub fn new(config: &EnvironmentConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            api_base: config.payment_api_base.clone(),
            secret_key: config.payment_secret_key.clone(),
            webhook_secret: config.payment_webhook_secret.clone(),
        }
    }

    /// Crear una sesión de checkout alojado para una reserva.
    ///
    /// `amount_cents` va en unidades menores de moneda; `booking_id`
    /// viaja en metadata para correlacionar el webhook asíncrono.
    pub async fn create_checkout_session(
        &self,
        booking_id: Uuid,
        product_name: &str,
        amount_cents: i64,
        success_url: &str,
        cancel_url: &str,
    ) -> AppResult<String> {
        let booking_id = booking_id.to_string();
        let amount = amount_cents.to_string();

        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price_data][currency]", "usd"),
            ("line_items[0][price_data][product_data][name]", product_name),
            ("line_items[0][price_data][unit_amount]", &amount),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("metadata[booking_id]", &booking_id),
        ];

        let response = self
            .http_client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .timeout(REQUEST_TIMEOUT)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("Payment provider request failed: {}", e);
                AppError::ExternalApi(format!("checkout session request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ProviderErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| format!("provider returned status {}", status));
            return Err(AppError::ExternalApi(message));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("invalid provider response: {}", e)))?;

        Ok(session.id)
    }

    /// Verificar la firma del webhook y parsear el evento.
    ///
    /// Payload malformado y firma inválida fallan por el mismo camino;
    /// el emisor no puede distinguirlos.
    pub fn construct_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> AppResult<ProviderEvent> {
        self.verify_signature(payload, signature_header)?;

        serde_json::from_slice(payload)
            .map_err(|e| AppError::InvalidSignature(format!("malformed payload: {}", e)))
    }

    /// Esquema de firma del proveedor: header `t=<ts>,v1=<hex>` donde
    /// v1 = HMAC-SHA256(secret, "<ts>.<payload>")
    fn verify_signature(&self, payload: &[u8], signature_header: &str) -> AppResult<()> {
        let mut timestamp: Option<i64> = None;
        let mut candidates: Vec<Vec<u8>> = Vec::new();

        for part in signature_header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = value.parse().ok(),
                Some(("v1", value)) => {
                    if let Ok(bytes) = hex::decode(value) {
                        candidates.push(bytes);
                    }
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| AppError::InvalidSignature("missing timestamp".to_string()))?;

        let age = (chrono::Utc::now().timestamp() - timestamp).abs();
        if age > SIGNATURE_TOLERANCE_SECS {
            return Err(AppError::InvalidSignature("timestamp outside tolerance".to_string()));
        }

        if candidates.is_empty() {
            return Err(AppError::InvalidSignature("missing v1 signature".to_string()));
        }

        for candidate in candidates {
            let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
                .map_err(|e| AppError::Internal(format!("invalid webhook secret: {}", e)))?;
            mac.update(timestamp.to_string().as_bytes());
            mac.update(b".");
            mac.update(payload);

            // verify_slice compara en tiempo constante
            if mac.verify_slice(&candidate).is_ok() {
                return Ok(());
            }
        }

        Err(AppError::InvalidSignature("signature mismatch".to_string()))
    }
}

/// Firmar un payload con el esquema del webhook; usado por los tests
/// y por herramientas de desarrollo para simular al proveedor
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={},v1={}", timestamp, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> StripeService {
        StripeService {
            http_client: reqwest::Client::new(),
            api_base: "http://localhost:0".to_string(),
            secret_key: "sk_test_123".to_string(),
            webhook_secret: secret.to_string(),
        }
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let svc = service("whsec_test");
        let payload = br#"{"type":"checkout.session.completed","data":{"object":{}}}"#;
        let header = sign_payload("whsec_test", chrono::Utc::now().timestamp(), payload);

        let event = svc.construct_event(payload, &header).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let svc = service("whsec_test");
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let header = sign_payload("whsec_test", chrono::Utc::now().timestamp(), payload);

        let tampered = br#"{"type":"checkout.session.expired"}"#;
        assert!(matches!(
            svc.construct_event(tampered, &header),
            Err(AppError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let svc = service("whsec_real");
        let payload = br#"{"type":"ping"}"#;
        let header = sign_payload("whsec_other", chrono::Utc::now().timestamp(), payload);

        assert!(matches!(
            svc.construct_event(payload, &header),
            Err(AppError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let svc = service("whsec_test");
        let payload = br#"{"type":"ping"}"#;

        for header in ["", "garbage", "t=notanumber,v1=00", "v1=00"] {
            assert!(matches!(
                svc.construct_event(payload, header),
                Err(AppError::InvalidSignature(_))
            ));
        }
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let svc = service("whsec_test");
        let payload = br#"{"type":"ping"}"#;
        let stale = chrono::Utc::now().timestamp() - SIGNATURE_TOLERANCE_SECS - 60;
        let header = sign_payload("whsec_test", stale, payload);

        assert!(matches!(
            svc.construct_event(payload, &header),
            Err(AppError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_malformed_json_with_valid_signature_is_rejected() {
        let svc = service("whsec_test");
        let payload = b"not json at all";
        let header = sign_payload("whsec_test", chrono::Utc::now().timestamp(), payload);

        assert!(matches!(
            svc.construct_event(payload, &header),
            Err(AppError::InvalidSignature(_))
        ));
    }
}

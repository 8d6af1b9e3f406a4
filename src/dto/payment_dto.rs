//! DTOs del gateway de pagos
//!
//! Incluye el parseo de eventos del webhook a una enum cerrada:
//! los tipos de evento desconocidos se reconocen y se ignoran en vez
//! de compararse como strings abiertos por todo el código.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// Request para iniciar el checkout de una reserva
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub booking_id: Uuid,
}

// Response con el identificador de sesión del proveedor
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Evento crudo tal como lo entrega el proveedor de pagos
#[derive(Debug, Deserialize)]
pub struct ProviderEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: ProviderEventData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderEventData {
    #[serde(default)]
    pub object: ProviderCheckoutSession,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderCheckoutSession {
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

/// Evento de webhook ya clasificado
#[derive(Debug, PartialEq)]
pub enum WebhookEvent {
    /// Checkout completado: confirma la reserva referida en metadata.
    /// `booking_id` puede faltar o no parsear; en ese caso el evento
    /// se reconoce igualmente y no produce cambios.
    CheckoutCompleted {
        booking_id: Option<Uuid>,
        payment_reference: String,
    },
    /// Cualquier otro tipo de evento se reconoce y se ignora
    Ignored { event_type: String },
}

impl From<ProviderEvent> for WebhookEvent {
    fn from(event: ProviderEvent) -> Self {
        match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session = event.data.object;
                WebhookEvent::CheckoutCompleted {
                    booking_id: session
                        .metadata
                        .get("booking_id")
                        .and_then(|id| id.parse().ok()),
                    payment_reference: session.payment_intent.unwrap_or_default(),
                }
            }
            _ => WebhookEvent::Ignored {
                event_type: event.event_type,
            },
        }
    }
}

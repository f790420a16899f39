use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ORDER_ID: &str = "unnumbered";
pub const DEFAULT_CLIENT_FIELD: &str = "not specified";

/// Who ordered the cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order_id: String,
    pub client_name: String,
    pub client_phone: String,
}

impl Default for OrderDetails {
    fn default() -> Self {
        Self {
            order_id: DEFAULT_ORDER_ID.to_string(),
            client_name: DEFAULT_CLIENT_FIELD.to_string(),
            client_phone: DEFAULT_CLIENT_FIELD.to_string(),
        }
    }
}

impl OrderDetails {
    /// Build details from optional values, substituting defaults for
    /// missing or blank ones
    pub fn from_parts(
        order_id: Option<String>,
        client_name: Option<String>,
        client_phone: Option<String>,
    ) -> Self {
        let or_default = |value: Option<String>, default: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            order_id: or_default(order_id, DEFAULT_ORDER_ID),
            client_name: or_default(client_name, DEFAULT_CLIENT_FIELD),
            client_phone: or_default(client_phone, DEFAULT_CLIENT_FIELD),
        }
    }
}

/// Request body accepted by the submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Encoded image as plain base64, without a data-URL prefix
    pub image_base64: String,
    pub order_id: String,
    pub client_name: String,
    pub client_phone: String,
}

impl OrderPayload {
    /// Base64-encode raw image bytes for `details`
    pub fn new(image: &[u8], details: &OrderDetails) -> Self {
        Self {
            image_base64: BASE64_STANDARD.encode(image),
            order_id: details.order_id.clone(),
            client_name: details.client_name.clone(),
            client_phone: details.client_phone.clone(),
        }
    }

    /// Use an already-encoded image, which may still carry a data-URL prefix
    pub fn from_encoded(encoded: &str, details: &OrderDetails) -> Self {
        Self {
            image_base64: strip_data_url_prefix(encoded).to_string(),
            order_id: details.order_id.clone(),
            client_name: details.client_name.clone(),
            client_phone: details.client_phone.clone(),
        }
    }
}

/// Strip a leading `data:image/<type>;base64,` from `encoded`.
///
/// Anything else is returned unchanged.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    let Some(rest) = encoded.strip_prefix("data:image/") else {
        return encoded;
    };
    let Some((kind, data)) = rest.split_once(";base64,") else {
        return encoded;
    };
    if !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        data
    } else {
        encoded
    }
}

/// Response body of the submission endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

//! Entitlement gate client
//!
//! One async check at widget startup, never on the simulation's critical
//! path. The result only decides whether the watermark is shown; every
//! failure mode (network, HTTP status, malformed body) fails open to
//! "unlicensed" so gameplay always proceeds.

use serde::Deserialize;

/// Default entitlement endpoint.
pub const LICENSE_SERVER: &str =
    "https://cdn.jsdelivr.net/gh/clonegarden/squarespaceplugins@latest/_shared/licenses.json";

/// Outcome of the entitlement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Entitlement {
    pub licensed: bool,
}

impl Entitlement {
    pub const UNLICENSED: Self = Self { licensed: false };
}

/// Parse an entitlement response body. Anything that is not a well-formed
/// `{"licensed": bool}` document resolves to unlicensed.
pub fn entitlement_from_json(body: &str) -> Entitlement {
    serde_json::from_str(body).unwrap_or(Entitlement::UNLICENSED)
}

/// Query the entitlement server once. Wasm only; any failure is unlicensed.
#[cfg(target_arch = "wasm32")]
pub async fn check_entitlement(plugin_id: &str, version: &str, server_url: &str) -> Entitlement {
    log::info!("{plugin_id} v{version} - checking entitlement");
    match fetch_text(server_url).await {
        Ok(body) => entitlement_from_json(&body),
        Err(_) => {
            log::warn!("entitlement check failed, running unlicensed");
            Entitlement::UNLICENSED
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: &str) -> Result<String, wasm_bindgen::JsValue> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response_value = JsFuture::from(window.fetch_with_str(url)).await?;
    let response: web_sys::Response = response_value.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str("entitlement server unavailable"));
    }
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("non-text response"))
}

/// Native stub: no entitlement server to consult, no watermark to show.
#[cfg(not(target_arch = "wasm32"))]
pub async fn check_entitlement(_plugin_id: &str, _version: &str, _server_url: &str) -> Entitlement {
    Entitlement { licensed: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_responses_parse() {
        assert!(entitlement_from_json(r#"{"licensed": true}"#).licensed);
        assert!(!entitlement_from_json(r#"{"licensed": false}"#).licensed);
        // Extra fields are fine
        assert!(entitlement_from_json(r#"{"licensed": true, "type": "site"}"#).licensed);
    }

    #[test]
    fn failures_resolve_to_unlicensed() {
        assert!(!entitlement_from_json("").licensed);
        assert!(!entitlement_from_json("<html>502</html>").licensed);
        assert!(!entitlement_from_json(r#"{"licensed": "yes"}"#).licensed);
        assert!(!entitlement_from_json("null").licensed);
    }
}

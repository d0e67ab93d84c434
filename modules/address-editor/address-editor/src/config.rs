//! Address editor configuration.

use serde::{Deserialize, Serialize};

/// Default path of the address-update endpoint (`alterar_endereço`).
pub const DEFAULT_ENDPOINT_PATH: &str = "/backend/api/carrinho/alterar_endere\u{e7}o";

/// What happens to the draft when a closed editor is opened again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPolicy {
    /// Keep whatever was typed before closing.
    #[default]
    Preserve,
    /// Start from an empty address on every reopen.
    Reset,
}

/// Where trusted TLS root certificates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsRoots {
    /// Bundled Mozilla roots.
    #[default]
    Webpki,
    /// The operating system's certificate store.
    Native,
}

/// User-facing messages shown in the editor's error slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorMessages {
    pub required_fields: String,
    pub invalid_postal_code: String,
    pub no_response: String,
}

impl Default for EditorMessages {
    fn default() -> Self {
        Self {
            required_fields: "Please fill in all required fields.".to_owned(),
            invalid_postal_code: "Please enter a valid postal code.".to_owned(),
            no_response: "No response received from the server.".to_owned(),
        }
    }
}

/// Configuration for the `address-editor` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AddressEditorConfig {
    /// Origin of the storefront backend, e.g. `https://loja.example.com`.
    pub base_url: String,
    pub endpoint_path: String,
    /// Query parameter carrying the customer identifier.
    pub identifier_param: String,
    pub request_timeout_ms: u64,
    pub user_agent: Option<String>,
    /// Permit `http://` backends (local development and mock servers).
    pub allow_insecure_http: bool,
    pub tls_roots: TlsRoots,
    /// Cap on how much of an error response body is read for its `detail`.
    pub max_error_body_size: usize,
    pub draft_policy: DraftPolicy,
    /// Optional regex the postal code must match, e.g. `^[0-9]{5}-[0-9]{3}$`.
    pub postal_code_pattern: Option<String>,
    pub messages: EditorMessages,
}

impl Default for AddressEditorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_owned(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_owned(),
            identifier_param: "CPF".to_owned(),
            request_timeout_ms: 30_000,
            user_agent: None,
            allow_insecure_http: false,
            tls_roots: TlsRoots::default(),
            max_error_body_size: 64 * 1024, // 64 KiB
            draft_policy: DraftPolicy::default(),
            postal_code_pattern: None,
            messages: EditorMessages::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AddressEditorConfig::default();
        assert_eq!(cfg.identifier_param, "CPF");
        assert_eq!(cfg.request_timeout_ms, 30_000);
        assert!(!cfg.allow_insecure_http);
        assert_eq!(cfg.tls_roots, TlsRoots::Webpki);
        assert_eq!(cfg.draft_policy, DraftPolicy::Preserve);
        assert_eq!(cfg.messages.required_fields, "Please fill in all required fields.");
        assert_eq!(cfg.messages.no_response, "No response received from the server.");
        assert!(cfg.endpoint_path.ends_with("alterar_endere\u{e7}o"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AddressEditorConfig = serde_json::from_value(serde_json::json!({
            "base_url": "https://loja.example.com",
            "draft_policy": "reset",
            "tls_roots": "native",
            "messages": { "no_response": "Sem resposta do servidor." }
        }))
        .unwrap();

        assert_eq!(cfg.base_url, "https://loja.example.com");
        assert_eq!(cfg.draft_policy, DraftPolicy::Reset);
        assert_eq!(cfg.tls_roots, TlsRoots::Native);
        assert_eq!(cfg.messages.no_response, "Sem resposta do servidor.");
        assert_eq!(
            cfg.messages.required_fields,
            EditorMessages::default().required_fields
        );
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<AddressEditorConfig, _> =
            serde_json::from_value(serde_json::json!({ "retries": 3 }));
        assert!(result.is_err());
    }
}

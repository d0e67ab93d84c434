use std::sync::Arc;
use std::time::Duration;

use storefront_http::{HttpClient, HttpError, TlsRootConfig, TransportSecurity};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use address_editor_sdk::{AddressUpdateApi, CustomerId};

use crate::config::{AddressEditorConfig, TlsRoots};
use crate::domain::editor::{AddressEditor, EditorSettings};
use crate::domain::validation::ValidationRules;
use crate::infra::HttpAddressClient;

/// Why the module could not be built from its configuration.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("invalid base_url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid endpoint_path '{path}': {source}")]
    InvalidEndpointPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid postal_code_pattern: {0}")]
    InvalidPostalCodePattern(#[from] regex::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] HttpError),
}

/// Composition root: one backend adapter shared by every editor it hands out.
#[derive(Clone)]
pub struct AddressEditorModule {
    api: Arc<dyn AddressUpdateApi>,
    settings: EditorSettings,
}

impl AddressEditorModule {
    /// Build the HTTP adapter and editor settings from `config`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`InitError`] for a malformed URL or postal code pattern, or
    /// when the HTTP client cannot be initialized.
    pub fn init(config: &AddressEditorConfig) -> Result<Self, InitError> {
        info!("Initializing address_editor module");

        let endpoint = endpoint_from(config)?;
        debug!(%endpoint, "address update endpoint");

        let mut builder = HttpClient::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .max_body_size(config.max_error_body_size)
            .tls_roots(tls_roots_from(config.tls_roots));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if config.allow_insecure_http {
            warn!("plain HTTP allowed for the address backend");
            builder = builder.transport(TransportSecurity::AllowInsecureHttp);
        }
        let client = builder.build()?;

        let api: Arc<dyn AddressUpdateApi> = Arc::new(HttpAddressClient::new(
            client,
            endpoint,
            config.identifier_param.clone(),
            config.max_error_body_size,
        ));

        Ok(Self::with_api(api, settings_from(config)?))
    }

    /// Use a caller-provided port instead of the HTTP adapter.
    #[must_use]
    pub fn with_api(api: Arc<dyn AddressUpdateApi>, settings: EditorSettings) -> Self {
        Self { api, settings }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn AddressUpdateApi> {
        self.api.clone()
    }

    /// A new closed editor for `customer_id`.
    #[must_use]
    pub fn editor(
        &self,
        customer_id: CustomerId,
        on_change: impl Fn() + Send + Sync + 'static,
    ) -> AddressEditor {
        AddressEditor::new(
            self.api.clone(),
            customer_id,
            self.settings.clone(),
            on_change,
        )
    }
}

fn endpoint_from(config: &AddressEditorConfig) -> Result<Url, InitError> {
    let base = Url::parse(&config.base_url).map_err(|source| InitError::InvalidBaseUrl {
        url: config.base_url.clone(),
        source,
    })?;
    base.join(&config.endpoint_path)
        .map_err(|source| InitError::InvalidEndpointPath {
            path: config.endpoint_path.clone(),
            source,
        })
}

fn tls_roots_from(roots: TlsRoots) -> TlsRootConfig {
    match roots {
        TlsRoots::Webpki => TlsRootConfig::WebPki,
        TlsRoots::Native => TlsRootConfig::Native,
    }
}

fn settings_from(config: &AddressEditorConfig) -> Result<EditorSettings, InitError> {
    let mut rules = ValidationRules::new();
    if let Some(pattern) = &config.postal_code_pattern {
        rules = rules.with_postal_code_pattern(pattern)?;
    }
    Ok(EditorSettings {
        rules,
        messages: config.messages.clone(),
        draft_policy: config.draft_policy,
    })
}

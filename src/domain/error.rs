//! Domain error types.

/// Failure reported by an external collaborator (market data, news, scoring).
///
/// Adapters map transport and payload problems onto these variants; only the
/// pipeline orchestrator decides what each one means for a symbol.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider}: credentials not configured")]
    NotConfigured { provider: String },

    #[error("{provider}: symbol {symbol} not found")]
    NotFound { provider: String, symbol: String },

    #[error("{provider}: no data returned for {symbol}")]
    Empty { provider: String, symbol: String },

    #[error("{provider}: rate limited")]
    RateLimited { provider: String },

    #[error("{provider}: request timed out")]
    Timeout { provider: String },

    #[error("{provider}: network error: {reason}")]
    Network { provider: String, reason: String },

    #[error("{provider}: read error: {reason}")]
    Io { provider: String, reason: String },

    #[error("{provider}: HTTP {status}")]
    Http { provider: String, status: u16 },

    #[error("{provider}: malformed response: {reason}")]
    Malformed { provider: String, reason: String },
}

impl ProviderError {
    /// True when the failure means "nothing to analyse" rather than a fault.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            ProviderError::NotFound { .. }
                | ProviderError::Empty { .. }
                | ProviderError::NotConfigured { .. }
        )
    }

    pub fn malformed(provider: &str, reason: impl Into<String>) -> Self {
        ProviderError::Malformed {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(provider: &str, symbol: &str, status: u16) -> Self {
        match status {
            401 | 403 => ProviderError::NotConfigured {
                provider: provider.to_string(),
            },
            404 => ProviderError::NotFound {
                provider: provider.to_string(),
                symbol: symbol.to_string(),
            },
            429 => ProviderError::RateLimited {
                provider: provider.to_string(),
            },
            _ => ProviderError::Http {
                provider: provider.to_string(),
                status,
            },
        }
    }
}

/// Top-level error type for hedgebox.
#[derive(Debug, thiserror::Error)]
pub enum HedgeboxError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    SymbolList(#[from] crate::domain::universe::SymbolListError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HedgeboxError> for std::process::ExitCode {
    fn from(err: &HedgeboxError) -> Self {
        let code: u8 = match err {
            HedgeboxError::Io(_) => 1,
            HedgeboxError::ConfigParse { .. }
            | HedgeboxError::ConfigMissing { .. }
            | HedgeboxError::ConfigInvalid { .. } => 2,
            HedgeboxError::SymbolList(_) => 3,
            HedgeboxError::Provider(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}

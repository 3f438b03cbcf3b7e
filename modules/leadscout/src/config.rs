use crate::error::{LeadScoutError, Result};
use crate::proxy::{ProxyPolicy, SessionMode, DEFAULT_PROXY_GROUP};

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Apify
    pub apify_token: String,

    // Proxy
    pub proxy: ProxyPolicy,
}

impl Config {
    /// Load `.env.local` and `.env` (if present), then read the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Missing credential is fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let apify_token = first_set(&lookup, &["APIFY_TOKEN", "APIFY_API_TOKEN"]).ok_or_else(|| {
            LeadScoutError::Configuration(
                "APIFY_TOKEN environment variable must be set for Apify access".into(),
            )
        })?;

        Ok(Self {
            apify_token,
            proxy: proxy_policy(&lookup),
        })
    }

    pub fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  APIFY_TOKEN: {}", preview(&self.apify_token));
        tracing::info!("  APIFY_USE_PROXY: {}", self.proxy.enabled);
        tracing::info!("  APIFY_PROXY_GROUPS: {}", self.proxy.groups.join(","));
        tracing::info!(
            "  APIFY_PROXY_COUNTRY_CODE: {}",
            self.proxy.country_code.as_deref().unwrap_or("<not set>")
        );
        tracing::info!("  APIFY_PROXY_SESSION_MODE: {:?}", self.proxy.session_mode);
    }
}

fn proxy_policy<F>(lookup: &F) -> ProxyPolicy
where
    F: Fn(&str) -> Option<String>,
{
    let enabled = match lookup("APIFY_USE_PROXY") {
        Some(raw) => !matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => true,
    };

    // An explicitly empty list disables the proxy; unset means the default group.
    let groups = match lookup("APIFY_PROXY_GROUPS") {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|group| !group.is_empty())
            .map(String::from)
            .collect(),
        None => vec![DEFAULT_PROXY_GROUP.to_string()],
    };

    let country_code = first_set(lookup, &["APIFY_PROXY_COUNTRY_CODE", "APIFY_PROXY_COUNTRY"])
        .map(|code| code.to_uppercase());

    let session_mode = lookup("APIFY_PROXY_SESSION_MODE")
        .map(|raw| SessionMode::parse(&raw))
        .unwrap_or_default();

    let session_prefix = first_set(lookup, &["APIFY_PROXY_SESSION_PREFIX"]);

    ProxyPolicy {
        enabled,
        groups,
        country_code,
        session_mode,
        session_prefix,
    }
}

/// First key with a non-blank value, trimmed.
fn first_set<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(*key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

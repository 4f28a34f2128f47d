use crate::{ConfigError, Platform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Page access for the Facebook Graph `/{page-id}/posts` edge.
#[derive(Clone, PartialEq, Eq)]
pub struct FacebookCredentials {
    pub access_token: String,
    pub page_id: String,
}

/// Business-account access for the Instagram Graph `/{user-id}/media` edge.
#[derive(Clone, PartialEq, Eq)]
pub struct InstagramCredentials {
    pub access_token: String,
    pub user_id: String,
}

/// Validated credentials for one selected platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCredentials {
    Facebook(FacebookCredentials),
    Instagram(InstagramCredentials),
}

impl PlatformCredentials {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            PlatformCredentials::Facebook(_) => Platform::Facebook,
            PlatformCredentials::Instagram(_) => Platform::Instagram,
        }
    }
}

impl std::fmt::Debug for FacebookCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookCredentials")
            .field("access_token", &"[redacted]")
            .field("page_id", &self.page_id)
            .finish()
    }
}

impl std::fmt::Debug for InstagramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstagramCredentials")
            .field("access_token", &"[redacted]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub graph_api_version: String,
    pub graph_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub upsert_delay_ms: u64,
    pub default_limit: usize,
    /// Platforms collected when none are selected explicitly. May be empty.
    pub default_platforms: Vec<Platform>,
    pub fb_access_token: Option<String>,
    pub fb_page_id: Option<String>,
    pub ig_access_token: Option<String>,
    pub ig_user_id: Option<String>,
}

impl AppConfig {
    /// Facebook credentials, or an error naming every missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] if `FB_ACCESS_TOKEN` or
    /// `FB_PAGE_ID` is unset.
    pub fn facebook_credentials(&self) -> Result<FacebookCredentials, ConfigError> {
        match (&self.fb_access_token, &self.fb_page_id) {
            (Some(access_token), Some(page_id)) => Ok(FacebookCredentials {
                access_token: access_token.clone(),
                page_id: page_id.clone(),
            }),
            (token, page) => Err(ConfigError::MissingCredentials {
                platform: Platform::Facebook,
                vars: missing_vars(&[
                    ("FB_ACCESS_TOKEN", token.is_none()),
                    ("FB_PAGE_ID", page.is_none()),
                ]),
            }),
        }
    }

    /// Instagram credentials, or an error naming every missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] if `IG_ACCESS_TOKEN` or
    /// `IG_USER_ID` is unset.
    pub fn instagram_credentials(&self) -> Result<InstagramCredentials, ConfigError> {
        match (&self.ig_access_token, &self.ig_user_id) {
            (Some(access_token), Some(user_id)) => Ok(InstagramCredentials {
                access_token: access_token.clone(),
                user_id: user_id.clone(),
            }),
            (token, user) => Err(ConfigError::MissingCredentials {
                platform: Platform::Instagram,
                vars: missing_vars(&[
                    ("IG_ACCESS_TOKEN", token.is_none()),
                    ("IG_USER_ID", user.is_none()),
                ]),
            }),
        }
    }

    /// Credentials for `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] if any required variable
    /// for that platform is unset.
    pub fn credentials_for(&self, platform: Platform) -> Result<PlatformCredentials, ConfigError> {
        match platform {
            Platform::Facebook => self
                .facebook_credentials()
                .map(PlatformCredentials::Facebook),
            Platform::Instagram => self
                .instagram_credentials()
                .map(PlatformCredentials::Instagram),
        }
    }

    /// Resolves the platforms to collect for one run.
    ///
    /// An explicit selection wins; otherwise the configured defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformsSelected`] when nothing was selected
    /// and no defaults are configured.
    pub fn resolve_platforms(&self, selected: &[Platform]) -> Result<Vec<Platform>, ConfigError> {
        let source = if selected.is_empty() {
            &self.default_platforms
        } else {
            selected
        };

        let mut platforms: Vec<Platform> = Vec::with_capacity(source.len());
        for p in source {
            if !platforms.contains(p) {
                platforms.push(*p);
            }
        }

        if platforms.is_empty() {
            return Err(ConfigError::NoPlatformsSelected);
        }
        Ok(platforms)
    }
}

fn missing_vars(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(var, _)| *var)
        .collect()
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("graph_api_version", &self.graph_api_version)
            .field("graph_base_url", &self.graph_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("upsert_delay_ms", &self.upsert_delay_ms)
            .field("default_limit", &self.default_limit)
            .field("default_platforms", &self.default_platforms)
            .field(
                "fb_access_token",
                &self.fb_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("fb_page_id", &self.fb_page_id)
            .field(
                "ig_access_token",
                &self.ig_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("ig_user_id", &self.ig_user_id)
            .finish()
    }
}

//! Deployment configuration.
//!
//! Loaded from a JSON file at startup. Invalid configuration is fatal: the
//! process must not reach serving state with empty credentials or a
//! zero-length window.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};

/// Endpoints permitted to appear verbatim in redacted public summaries.
///
/// This is the default deployment allow-list; `allowed_endpoints` in the
/// config file overrides it.
pub const DEFAULT_ALLOWED_ENDPOINTS: &[&str] = &[
    "processReload",
    "processJob",
    "driveNotification",
    "play",
    "ensureDataLiveliness",
    "appBeacon",
    "getAppSnapshot",
    "generateAppFromDescription",
    "uploadAppFileV2",
    "app",
    "getOAuth2TokensForGoogleSheets",
    "authenticateIntercom",
    "getAppUserForAuthenticatedUser",
    "reloadPublishedAppDataFromSheet",
    "modifySyntheticColumns",
    "getManifest",
    "getPreviewAsUser",
    "getPasswordForOAuth2Token",
    "sendPinForEmail",
    "registerForPushNotifications",
    "getCustomTokenForApp",
    "reportGeocodesInApp",
    "previewCharges",
    "geocodeAddresses",
    "setOrUpdateUser",
    "getUnsplashImages",
    "signInWith",
    "createAppFromTemplate",
    "triggerZap",
    "getFavicon",
    "generatePublishedAppDataFromSheet",
    "deleteApp",
    "setShortName",
    "testIframeEmbeddable",
    "listStripeSubscriptions",
    "duplicateApp",
    "pingUnsplashDownload",
    "setEmailOwnersColumns",
    "sendShareSMS",
    "addTableToApp",
    "triggerAppWebhookAction",
    "getPasswordForEmailPin",
    "getOrganizationMembers",
    "checkDomainConfigured",
    "renameTable",
    "removeTableFromApp",
    "listTables",
    "getOrganizationBilling",
    "prepareReplaceGoogleSheetInApp",
    "inAppPurchase",
    "setAppPlanUnified",
    "exportAppData",
    "inviteToOrganization",
    "createOrganization",
    "integrateWithStripe",
    "sendAppFeedback",
    "makeSupportCodeForApp",
    "setCustomDomain",
    "getTaxInfo",
    "transferAppToOrganization",
    "acceptOrganizationInvite",
    "setAdditionalBillingInfo",
    "addWebhook",
    "requestDownloadLinkForExport",
    "syncTables",
    "linkTablesToApp",
    "accessSupportCode",
    "acquireStripeSessionForTemplatePurchase",
    "removeFromOrganization",
    "applyPromoCode",
    "submitTemplate",
    "deliverEmailFromAction",
    "setTaxInfo",
    "reportApp",
    "stripeInAppPurchaseConfirmIntent",
    "deleteAppUserForApp",
    "inviteUserToTransferApp",
    "acceptAppInvite",
    "setBoostsForOwner",
    "updateUnifiedPaymentInformation",
    "deleteOrganization",
    "createTemplateFromApp",
    "legacyUpgrade",
];

fn default_staging_window_secs() -> u64 {
    300
}

fn default_prod_window_secs() -> u64 {
    5
}

fn default_allowed_endpoints() -> Vec<String> {
    DEFAULT_ALLOWED_ENDPOINTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Deployment configuration schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Basic-auth username for the authenticated summary routes
    pub username: String,
    /// Basic-auth password for the authenticated summary routes
    pub password: String,
    /// Port the HTTP summary server binds
    pub http_port: u16,
    /// UDP port feeding the staging counter
    pub staging_ingress_port: u16,
    /// UDP port feeding the prod/public counter pair
    pub prod_ingress_port: u16,
    /// Staging window length in seconds
    #[serde(default = "default_staging_window_secs")]
    pub staging_window_secs: u64,
    /// Prod/public window length in seconds
    #[serde(default = "default_prod_window_secs")]
    pub prod_window_secs: u64,
    /// Allow-list for the public redacting policy
    #[serde(default = "default_allowed_endpoints")]
    pub allowed_endpoints: Vec<String>,
}

/// Error returned when loading or validating configuration fails.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read
    Io(io::Error),
    /// The config file is not valid JSON or is missing required fields
    Parse(serde_json::Error),
    /// The config file parsed but holds an unusable value
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config file: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&text)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::Invalid("username must not be empty"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Invalid("password must not be empty"));
        }
        if self.staging_window_secs == 0 {
            return Err(ConfigError::Invalid(
                "staging_window_secs must be greater than 0",
            ));
        }
        if self.prod_window_secs == 0 {
            return Err(ConfigError::Invalid(
                "prod_window_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Staging window length.
    pub fn staging_window(&self) -> Duration {
        Duration::from_secs(self.staging_window_secs)
    }

    /// Prod/public window length.
    pub fn prod_window(&self) -> Duration {
        Duration::from_secs(self.prod_window_secs)
    }
}

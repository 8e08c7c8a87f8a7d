//! Consent-gated analytics for docsite pages.
//!
//! Analytics starts disabled. A page carries a bootstrap script that knows how
//! to load the configured provider, but nothing is loaded until the visitor
//! opts in through the consent banner (or the site enables analytics by
//! default).
//!
//! # Example
//!
//! ```
//! use docsite_analytics::{AnalyticsConsentProvider, AnalyticsPlugin, ConsentBanner};
//!
//! let plugin = AnalyticsPlugin::Ga4 { id: "G-QVHYG93PE3".to_owned() };
//! let mut banner = ConsentBanner::new();
//! assert!(!banner.is_enabled());
//!
//! banner.enable();
//! let markup = banner.render(&plugin);
//! assert!(markup.head.contains("googletagmanager.com/gtag/js"));
//! ```

mod banner;
mod plugin;

pub use banner::{AnalyticsMarkup, ConsentBanner};
pub use plugin::AnalyticsPlugin;

/// Name of the client-side function that loads the analytics provider.
pub const ENABLE_FUNCTION: &str = "docsiteEnableAnalytics";

/// `localStorage` key holding the visitor's consent decision.
pub const CONSENT_STORAGE_KEY: &str = "docsite-analytics-consent";

/// Capability to query and grant analytics consent.
pub trait AnalyticsConsentProvider {
    /// Whether analytics may run.
    fn is_enabled(&self) -> bool;

    /// Grant consent. Calling this more than once has no further effect.
    fn enable(&mut self);
}

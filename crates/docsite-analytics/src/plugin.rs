//! Analytics provider bootstrap scripts.

use docsite_config::{AnalyticsConfig, AnalyticsProvider};

use crate::ENABLE_FUNCTION;

/// The analytics integration a site uses.
///
/// GA4 and GTM are alternatives; exactly one is configured per site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsPlugin {
    /// Google Analytics 4 via `gtag.js`.
    Ga4 {
        /// Measurement ID (`G-...`).
        id: String,
    },
    /// Google Tag Manager.
    Gtm {
        /// Container ID (`GTM-...`).
        id: String,
    },
}

impl From<&AnalyticsConfig> for AnalyticsPlugin {
    fn from(config: &AnalyticsConfig) -> Self {
        let id = config.id.clone();
        match config.provider {
            AnalyticsProvider::Ga4 => Self::Ga4 { id },
            AnalyticsProvider::Gtm => Self::Gtm { id },
        }
    }
}

impl AnalyticsPlugin {
    /// Provider identifier as used in configuration.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Ga4 { .. } => "ga4",
            Self::Gtm { .. } => "gtm",
        }
    }

    /// Measurement or container ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Ga4 { id } | Self::Gtm { id } => id,
        }
    }

    /// Script defining `window.docsiteEnableAnalytics()`.
    ///
    /// The provider's tag is only requested when that function is called, and
    /// only once per page.
    #[must_use]
    pub fn bootstrap_script(&self) -> String {
        // JSON string literals are valid JavaScript string literals
        let id = serde_json::Value::from(self.id())
            .to_string()
            .replace("</", "<\\/");
        let load = match self {
            Self::Ga4 { .. } => format!(
                "  function gtag(){{window.dataLayer.push(arguments);}}\n  \
                 gtag('js', new Date());\n  \
                 gtag('config', {id}, {{ anonymize_ip: true }});\n  \
                 load('https://www.googletagmanager.com/gtag/js?id=' + encodeURIComponent({id}));\n"
            ),
            Self::Gtm { .. } => format!(
                "  window.dataLayer.push({{ 'gtm.start': new Date().getTime(), event: 'gtm.js' }});\n  \
                 load('https://www.googletagmanager.com/gtm.js?id=' + encodeURIComponent({id}));\n"
            ),
        };

        format!(
            "<script>\n\
             window.dataLayer = window.dataLayer || [];\n\
             window.{ENABLE_FUNCTION} = function () {{\n  \
             if (window.{ENABLE_FUNCTION}.done) return;\n  \
             window.{ENABLE_FUNCTION}.done = true;\n  \
             function load(src) {{\n    \
             var s = document.createElement('script');\n    \
             s.async = true;\n    \
             s.src = src;\n    \
             document.head.appendChild(s);\n  \
             }}\n\
             {load}\
             }};\n\
             </script>\n"
        )
    }
}

//! Consent banner.

use docsite_config::AnalyticsConfig;

use crate::{AnalyticsConsentProvider, AnalyticsPlugin, CONSENT_STORAGE_KEY, ENABLE_FUNCTION};

/// Banner asking visitors to opt in to analytics.
///
/// While disabled, rendered pages show the banner and load analytics only
/// after the visitor accepts; the decision is remembered in `localStorage`.
/// Once enabled (site-wide consent), pages load analytics immediately and no
/// banner is shown.
#[derive(Debug, Default, Clone)]
pub struct ConsentBanner {
    enabled: bool,
}

impl ConsentBanner {
    /// Create a banner with analytics disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a banner honouring the configured default consent.
    #[must_use]
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let mut banner = Self::new();
        if config.consent_by_default {
            banner.enable();
        }
        banner
    }

    /// Render the bootstrap script for `<head>` and, unless enabled, the
    /// banner for `<body>`.
    #[must_use]
    pub fn render(&self, plugin: &AnalyticsPlugin) -> AnalyticsMarkup {
        let mut head = plugin.bootstrap_script();
        let body = if self.enabled {
            head.push_str(&format!("<script>window.{ENABLE_FUNCTION}();</script>\n"));
            String::new()
        } else {
            banner_markup()
        };
        tracing::debug!(
            provider = plugin.provider_name(),
            enabled = self.enabled,
            "Analytics rendered"
        );
        AnalyticsMarkup { head, body }
    }
}

/// Rendered analytics markup, split by where it goes in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsMarkup {
    /// Scripts for the end of `<head>`.
    pub head: String,
    /// Banner for the start of `<body>`; empty once consent is given.
    pub body: String,
}

impl AnalyticsConsentProvider for ConsentBanner {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
    }
}

fn banner_markup() -> String {
    format!(
        r#"<div class="consent-banner" id="docsite-consent" hidden>
<p>This site uses analytics cookies to learn how the documentation is used.</p>
<button type="button" data-consent="accept">Accept</button>
<button type="button" data-consent="decline">Decline</button>
</div>
<script>
(function () {{
  var key = '{CONSENT_STORAGE_KEY}';
  var banner = document.getElementById('docsite-consent');
  var stored = window.localStorage.getItem(key);
  if (stored === 'granted') {{ window.{ENABLE_FUNCTION}(); return; }}
  if (stored === 'denied') return;
  banner.hidden = false;
  banner.addEventListener('click', function (event) {{
    var choice = event.target.getAttribute('data-consent');
    if (!choice) return;
    window.localStorage.setItem(key, choice === 'accept' ? 'granted' : 'denied');
    banner.hidden = true;
    if (choice === 'accept') window.{ENABLE_FUNCTION}();
  }});
}})();
</script>
"#
    )
}

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::amount::DonationAmount;
use crate::error::SiteError;

/// Hosted payment page visitors are sent to when they choose to donate.
/// Override at compile time via the `SHOWTOOLS_PAYMENT_LINK` env var.
pub const PAYMENT_LINK: &str = match option_env!("SHOWTOOLS_PAYMENT_LINK") {
    Some(url) => url,
    None => "https://donate.stripe.com/3cI6oz7o7ekJaTb59V8g001",
};

/// Release asset handed to the browser's native download handling.
pub const DOWNLOAD_URL: &str = match option_env!("SHOWTOOLS_DOWNLOAD_URL") {
    Some(url) => url,
    None => "https://github.com/kermitarmstrong/resolume-hud/releases/latest/download/ResolumeHud.exe",
};

/// Recipient of review drafts.
pub const REVIEW_EMAIL: &str = match option_env!("SHOWTOOLS_REVIEW_EMAIL") {
    Some(addr) => addr,
    None => "reviews@example.com",
};

/// Smallest donation the payment page accepts, in cents ($2.50).
pub const MIN_DONATION_CENTS: u64 = 250;

/// Quick-amount buttons shown in the gate, in cents.
pub const PRESET_AMOUNTS: [u64; 3] = [300, 500, 1000];

/// Delay between the thank-you banner appearing and the download starting.
pub const RETURN_DELAY_MS: u64 = 1000;

/// Time between characters of the terminal typing effect.
pub const TYPING_INTERVAL_MS: u64 = 50;

/// How long the typing cursor lingers after the last character.
pub const TYPING_LINGER_MS: u64 = 1000;

/// Query parameter the payment page reads the amount (in cents) from.
pub const PREFILLED_AMOUNT_PARAM: &str = "prefilled_amount";

/// Return marker: `?thanks=true` on the way back from the payment page.
pub const RETURN_PARAM: &str = "thanks";
pub const RETURN_VALUE: &str = "true";

/// Label of the confirm button; the amount is appended once one is selected.
pub const CONFIRM_LABEL: &str = "Buy Me A Beer";

/// Id of the optional `<script type="application/json">` block holding
/// runtime overrides for [`SiteConfig`].
pub const CONFIG_ELEMENT_ID: &str = "showtools-config";

/// Runtime site configuration. Every field falls back to the compile-time
/// constant above when absent from the JSON overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub payment_link: String,
    pub download_url: String,
    pub review_email: String,
    pub min_donation_cents: u64,
    pub preset_amounts: Vec<u64>,
    pub return_delay_ms: u64,
    pub typing_interval_ms: u64,
    pub typing_linger_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            payment_link: PAYMENT_LINK.to_string(),
            download_url: DOWNLOAD_URL.to_string(),
            review_email: REVIEW_EMAIL.to_string(),
            min_donation_cents: MIN_DONATION_CENTS,
            preset_amounts: PRESET_AMOUNTS.to_vec(),
            return_delay_ms: RETURN_DELAY_MS,
            typing_interval_ms: TYPING_INTERVAL_MS,
            typing_linger_ms: TYPING_LINGER_MS,
        }
    }
}

impl SiteConfig {
    /// Parse JSON overrides and validate the result.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SiteError> {
        Url::parse(&self.payment_link)?;
        Url::parse(&self.download_url)?;
        if self.min_donation_cents == 0 {
            return Err(SiteError::Config(
                "minDonationCents must be greater than zero".to_string(),
            ));
        }
        if !self.review_email.contains('@') {
            return Err(SiteError::Config(format!(
                "reviewEmail is not an address: {}",
                self.review_email
            )));
        }
        Ok(())
    }

    /// Payment page URL with the amount (in cents) prefilled.
    pub fn payment_url(&self, amount: DonationAmount) -> Result<Url, SiteError> {
        let mut url = Url::parse(&self.payment_link)?;
        url.query_pairs_mut()
            .append_pair(PREFILLED_AMOUNT_PARAM, &amount.cents().to_string());
        Ok(url)
    }

    pub fn return_delay(&self) -> Duration {
        Duration::from_millis(self.return_delay_ms)
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn typing_linger(&self) -> Duration {
        Duration::from_millis(self.typing_linger_ms)
    }

    /// Preset amounts that clear the minimum. Anything below it would be a
    /// button that can never enable the confirm action.
    pub fn presets(&self) -> Vec<DonationAmount> {
        self.preset_amounts
            .iter()
            .map(|&cents| DonationAmount::from_cents(cents, self.min_donation_cents))
            .filter(|amount| amount.is_selected())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn test_from_json_overrides_some_fields() {
        let config = SiteConfig::from_json(
            r#"{"paymentLink": "https://pay.example.com/link", "returnDelayMs": 250}"#,
        )
        .unwrap();
        assert_eq!(config.payment_link, "https://pay.example.com/link");
        assert_eq!(config.return_delay(), Duration::from_millis(250));
        assert_eq!(config.download_url, DOWNLOAD_URL);
        assert_eq!(config.min_donation_cents, MIN_DONATION_CENTS);
    }

    #[test]
    fn test_from_json_rejects_bad_url() {
        let err = SiteConfig::from_json(r#"{"downloadUrl": "not a url"}"#).unwrap_err();
        assert!(matches!(err, SiteError::InvalidUrl(_)));
    }

    #[test]
    fn test_from_json_rejects_zero_minimum() {
        let err = SiteConfig::from_json(r#"{"minDonationCents": 0}"#).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn test_from_json_rejects_malformed_json() {
        let err = SiteConfig::from_json("{").unwrap_err();
        assert!(matches!(err, SiteError::SerdeError(_)));
    }

    #[test]
    fn test_payment_url_appends_amount() {
        let config = SiteConfig::default();
        let url = config
            .payment_url(DonationAmount::from_cents(500, MIN_DONATION_CENTS))
            .unwrap();
        assert_eq!(url.as_str(), format!("{}?prefilled_amount=500", PAYMENT_LINK));
    }

    #[test]
    fn test_presets_drop_sub_minimum_values() {
        let config = SiteConfig {
            preset_amounts: vec![100, 300, 250],
            ..SiteConfig::default()
        };
        let cents: Vec<u64> = config.presets().iter().map(|a| a.cents()).collect();
        assert_eq!(cents, vec![300, 250]);
    }
}

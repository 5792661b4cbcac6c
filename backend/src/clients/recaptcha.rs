//! reCAPTCHA token verification.
//!
//! Every failure mode (empty token, missing keys, unreachable provider,
//! malformed response) answers `false`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::RecaptchaConfig;

const ENTERPRISE_BASE_URL: &str = "https://recaptchaenterprise.googleapis.com/v1";
const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
/// Score threshold applied to classic v3 answers when none is configured
const DEFAULT_V3_THRESHOLD: f64 = 0.5;

#[async_trait]
pub trait ChallengeVerifier: Send + Sync {
    /// Whether auth flows must present a token at all
    fn is_enabled(&self) -> bool;

    async fn verify(&self, token: &str) -> bool;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Assessment {
    #[serde(default)]
    token_properties: Option<TokenProperties>,
    #[serde(default)]
    risk_analysis: Option<RiskAnalysis>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenProperties {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    invalid_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RiskAnalysis {
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    error_codes: Vec<String>,
}

fn accept_assessment(assessment: &Assessment, min_score: Option<f64>) -> bool {
    let valid = assessment.token_properties.as_ref().map(|p| p.valid).unwrap_or(false);
    if !valid {
        let reason = assessment
            .token_properties
            .as_ref()
            .and_then(|p| p.invalid_reason.clone())
            .unwrap_or_else(|| "No reason provided".to_string());
        warn!("reCAPTCHA assessment failed: {}", reason);
        return false;
    }
    let score = assessment.risk_analysis.as_ref().and_then(|r| r.score);
    match min_score {
        Some(threshold) => score.map(|s| s >= threshold).unwrap_or(false),
        None => true,
    }
}

fn accept_siteverify(response: &SiteVerifyResponse, min_score: Option<f64>) -> bool {
    if !response.success {
        warn!("reCAPTCHA siteverify failed: {:?}", response.error_codes);
        return false;
    }
    match (response.score, min_score) {
        (Some(score), threshold) => score >= threshold.unwrap_or(DEFAULT_V3_THRESHOLD),
        // v2 answers carry no score
        (None, Some(_)) => false,
        (None, None) => true,
    }
}

pub struct RecaptchaVerifier {
    http: reqwest::Client,
    config: RecaptchaConfig,
    enterprise_base_url: String,
    siteverify_url: String,
}

impl RecaptchaVerifier {
    pub fn new(http: reqwest::Client, config: RecaptchaConfig) -> Self {
        Self {
            http,
            config,
            enterprise_base_url: ENTERPRISE_BASE_URL.to_string(),
            siteverify_url: SITEVERIFY_URL.to_string(),
        }
    }

    async fn verify_enterprise(
        &self,
        token: &str,
        project_id: &str,
        site_key: &str,
        api_key: &str,
        min_score: Option<f64>,
    ) -> bool {
        if project_id.is_empty() || site_key.is_empty() || api_key.is_empty() {
            error!("reCAPTCHA Enterprise is enabled but project id, site key or api key is missing");
            return false;
        }
        let url = format!(
            "{}/projects/{}/assessments?key={}",
            self.enterprise_base_url, project_id, api_key
        );
        let body = json!({ "event": { "token": token, "siteKey": site_key } });

        let response = match self.http.post(url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error during reCAPTCHA assessment request: {}", e);
                return false;
            }
        };
        if !response.status().is_success() {
            warn!("reCAPTCHA assessment returned HTTP {}", response.status());
            return false;
        }
        match response.json::<Assessment>().await {
            Ok(assessment) => {
                let accepted = accept_assessment(&assessment, min_score);
                if accepted {
                    info!(
                        "reCAPTCHA assessment successful. Score: {:?}",
                        assessment.risk_analysis.and_then(|r| r.score)
                    );
                }
                accepted
            }
            Err(e) => {
                error!("Malformed reCAPTCHA assessment: {}", e);
                false
            }
        }
    }

    async fn verify_classic(&self, token: &str, secret_key: &str, min_score: Option<f64>) -> bool {
        if secret_key.is_empty() {
            error!("reCAPTCHA is enabled but no secret key is configured");
            return false;
        }
        let form = [("secret", secret_key), ("response", token)];
        let response = match self.http.post(&self.siteverify_url).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error during reCAPTCHA siteverify request: {}", e);
                return false;
            }
        };
        match response.json::<SiteVerifyResponse>().await {
            Ok(body) => accept_siteverify(&body, min_score),
            Err(e) => {
                error!("Malformed reCAPTCHA siteverify response: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl ChallengeVerifier for RecaptchaVerifier {
    fn is_enabled(&self) -> bool {
        !matches!(self.config, RecaptchaConfig::Disabled)
    }

    async fn verify(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            warn!("reCAPTCHA verification attempted with no token.");
            return false;
        }
        match &self.config {
            RecaptchaConfig::Disabled => {
                warn!("reCAPTCHA verification requested but no provider is configured");
                false
            }
            RecaptchaConfig::Enterprise {
                project_id,
                site_key,
                api_key,
                min_score,
            } => self.verify_enterprise(token, project_id, site_key, api_key, *min_score).await,
            RecaptchaConfig::Classic { secret_key, min_score } => {
                self.verify_classic(token, secret_key, *min_score).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(valid: bool, score: Option<f64>) -> Assessment {
        Assessment {
            token_properties: Some(TokenProperties {
                valid,
                invalid_reason: None,
            }),
            risk_analysis: Some(RiskAnalysis { score }),
        }
    }

    #[test]
    fn test_enterprise_acceptance() {
        assert!(accept_assessment(&assessment(true, Some(0.9)), None));
        assert!(accept_assessment(&assessment(true, Some(0.9)), Some(0.5)));
        assert!(!accept_assessment(&assessment(true, Some(0.3)), Some(0.5)));
        assert!(!accept_assessment(&assessment(false, Some(0.9)), None));
        assert!(!accept_assessment(&Assessment::default(), None));
    }

    #[test]
    fn test_enterprise_response_parsing() {
        let parsed: Assessment = serde_json::from_value(json!({
            "tokenProperties": { "valid": false, "invalidReason": "EXPIRED" },
            "riskAnalysis": { "score": 0.1 }
        }))
        .unwrap();
        assert!(!accept_assessment(&parsed, None));
    }

    #[test]
    fn test_classic_acceptance() {
        let v3 = |success, score| SiteVerifyResponse {
            success,
            score,
            error_codes: vec![],
        };
        assert!(accept_siteverify(&v3(true, Some(0.7)), None));
        assert!(!accept_siteverify(&v3(true, Some(0.4)), None));
        assert!(accept_siteverify(&v3(true, Some(0.4)), Some(0.3)));
        assert!(accept_siteverify(&v3(true, None), None));
        assert!(!accept_siteverify(&v3(true, None), Some(0.3)));
        assert!(!accept_siteverify(&v3(false, Some(0.9)), None));
    }

    #[tokio::test]
    async fn test_fails_closed_without_network() {
        let verifier = RecaptchaVerifier::new(
            reqwest::Client::new(),
            RecaptchaConfig::Classic {
                secret_key: String::new(),
                min_score: None,
            },
        );
        assert!(verifier.is_enabled());
        assert!(!verifier.verify("").await);
        assert!(!verifier.verify("some-token").await);

        let disabled = RecaptchaVerifier::new(reqwest::Client::new(), RecaptchaConfig::Disabled);
        assert!(!disabled.is_enabled());
        assert!(!disabled.verify("token").await);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_rejected() {
        let mut verifier = RecaptchaVerifier::new(
            reqwest::Client::new(),
            RecaptchaConfig::Enterprise {
                project_id: "p".to_string(),
                site_key: "s".to_string(),
                api_key: "k".to_string(),
                min_score: None,
            },
        );
        verifier.enterprise_base_url = "http://127.0.0.1:9".to_string();
        assert!(!verifier.verify("token").await);
    }
}

//! # Clients Module
//!
//! HTTP clients for the hosted providers the backend depends on:
//!
//! - **Identity**: credential creation and sign-in ([`identity`])
//! - **Language model**: JSON-mode text generation for suggestions ([`gemini`])
//! - **Verification**: reCAPTCHA token checks ([`recaptcha`])
//!
//! Each provider sits behind a trait so services can be tested with fakes.

use anyhow::Result;
use std::time::Duration;

pub mod gemini;
pub mod identity;
pub mod recaptcha;

pub use gemini::{GeminiClient, GenerationRequest, LanguageModel, LanguageModelError};
pub use identity::{AuthError, AuthErrorCode, AuthenticatedUser, FirebaseIdentityClient, IdentityProvider};
pub use recaptcha::{ChallengeVerifier, RecaptchaVerifier};

const UA: &str = concat!("budgetwise/", env!("CARGO_PKG_VERSION"));

pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder().timeout(timeout).user_agent(UA).build()?;
    Ok(client)
}

// * Environment configuration for the triage gateway. All runtime
// * wiring (backend endpoints, tokens, database, bind address) comes
// * from environment variables with sensible fallbacks.

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{Context, Result};
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7860; // Port the container listens on
const DEFAULT_MAX_BODY_SIZE: usize = 26_214_400; // 25MB, audio/image uploads
const DEFAULT_TIMEOUT: u64 = 310; // Outlives the slowest backend call (300s)
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 3306; // Default MySQL port
const DEFAULT_DB_USER: &str = "root";
const DEFAULT_DB_NAME: &str = "triage";

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,

    // Inference backends: URL + bearer token per model
    pub medreason_url: Cow<'static, str>,
    pub medreason_token: Cow<'static, str>,
    pub whisper_url: Cow<'static, str>,
    pub whisper_token: Cow<'static, str>,
    pub nllb_url: Cow<'static, str>,
    pub nllb_token: Cow<'static, str>,
    pub medgemma_url: Cow<'static, str>,
    pub medgemma_token: Cow<'static, str>,

    // Triage record store (MySQL)
    pub db_host: Cow<'static, str>,
    pub db_port: u16,
    pub db_user: Cow<'static, str>,
    pub db_password: Cow<'static, str>,
    pub db_name: Cow<'static, str>,
}

impl EnvironmentVariables {
    // * Loads environment variables once.
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| vars.get(key).map(String::as_str);

        // * Backend endpoints default to empty strings; the health
        // * endpoint reports them as unconfigured rather than failing here.
        let get_endpoint = |key: &str| -> Cow<'static, str> {
            get_var(key)
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing {key}, backend will be unconfigured");
                    Cow::Borrowed("")
                })
        };
        let get_token = |key: &str| -> Cow<'static, str> {
            get_var(key)
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(""))
        };

        // * Build our EnvironmentVariables, providing defaults if missing
        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            medreason_url: get_endpoint("MEDREASON_URL"),
            medreason_token: get_token("MEDREASON_TOKEN"),
            whisper_url: get_endpoint("WHISPER_URL"),
            whisper_token: get_token("WHISPER_TOKEN"),
            nllb_url: get_endpoint("NLLB_URL"),
            nllb_token: get_token("NLLB_TOKEN"),
            medgemma_url: get_endpoint("MEDGEMMA_URL"),
            medgemma_token: get_token("MEDGEMMA_TOKEN"),

            db_host: get_var("DB_HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_HOST, defaulting to '{DEFAULT_DB_HOST}'");
                    Cow::Borrowed(DEFAULT_DB_HOST)
                }),

            db_port: get_var("DB_PORT")
                .map(|s| s.parse().context("Invalid DB_PORT"))
                .transpose()?
                .unwrap_or(DEFAULT_DB_PORT),

            db_user: get_var("DB_USER")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_USER, defaulting to '{DEFAULT_DB_USER}'");
                    Cow::Borrowed(DEFAULT_DB_USER)
                }),

            db_password: get_var("DB_PASSWORD")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_PASSWORD, defaulting to empty password");
                    Cow::Borrowed("")
                }),

            db_name: get_var("DB_NAME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_NAME, defaulting to '{DEFAULT_DB_NAME}'");
                    Cow::Borrowed(DEFAULT_DB_NAME)
                }),
        })
    }
}

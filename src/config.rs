// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything has a sensible default so a bare `cargo run` starts a working
//! dev server; production deployments override via env vars or a `.env`
//! file.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Daily challenge distance goal in kilometers (must be positive)
    pub target_distance_km: f64,
    /// Period of the simulated-GPS distance tick in milliseconds
    pub distance_tick_ms: u64,
    /// Name of the session cookie
    pub session_cookie_name: String,
}

impl Default for Config {
    /// Default config for local development and tests.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            target_distance_km: 2.0,
            distance_tick_ms: 100,
            session_cookie_name: "snapfit_session".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if one is present. Unset variables fall back to
    /// the dev defaults; set-but-unparseable variables are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            Err(_) => defaults.port,
        };

        let frontend_url = env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url);

        let target_distance_km = match env::var("TARGET_DISTANCE_KM") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "TARGET_DISTANCE_KM",
                value: raw,
            })?,
            Err(_) => defaults.target_distance_km,
        };
        if target_distance_km <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "TARGET_DISTANCE_KM",
                value: target_distance_km.to_string(),
            });
        }

        let distance_tick_ms = match env::var("DISTANCE_TICK_MS") {
            Ok(raw) => {
                let ms: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    key: "DISTANCE_TICK_MS",
                    value: raw.clone(),
                })?;
                if ms == 0 {
                    return Err(ConfigError::Invalid {
                        key: "DISTANCE_TICK_MS",
                        value: raw,
                    });
                }
                ms
            }
            Err(_) => defaults.distance_tick_ms,
        };

        let session_cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.session_cookie_name);

        Ok(Self {
            port,
            frontend_url,
            target_distance_km,
            distance_tick_ms,
            session_cookie_name,
        })
    }

    /// Config used by the test harness. Same as the dev defaults.
    pub fn test_default() -> Self {
        Self::default()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

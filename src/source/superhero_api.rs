//! HTTP client for the public Superhero API
//!
//! `GET {base_url}/{api_key}/{id}` returns a JSON document whose
//! `powerstats` values are strings, with `"null"` standing in for unknown
//! attributes. Unknown or unparsable values are coerced to zero.

use crate::character::AttributeSet;
use crate::core::config::ApiConfig;
use crate::core::error::{ConfigError, FetchError};
use crate::core::types::CharacterId;
use crate::source::{CharacterRecord, CharacterSource};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Async client for the Superhero API
pub struct SuperheroApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SuperheroApiClient {
    /// Create a client; the request timeout bounds every fetch attempt
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Invalid("SUPERHERO_API_KEY not set".into()))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn character_url(&self, id: CharacterId) -> String {
        format!("{}/{}/{}", self.base_url, self.api_key, id)
    }
}

impl CharacterSource for SuperheroApiClient {
    async fn fetch(&self, id: CharacterId) -> Result<CharacterRecord, FetchError> {
        let response = self.client.get(self.character_url(id)).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_character(id, &body)
    }
}

#[derive(Deserialize)]
struct ApiCharacter {
    response: Option<String>,
    error: Option<String>,
    name: Option<String>,
    biography: Option<Biography>,
    powerstats: Option<Powerstats>,
}

#[derive(Deserialize)]
struct Biography {
    alignment: Option<String>,
}

#[derive(Deserialize, Default)]
struct Powerstats {
    intelligence: Option<Value>,
    strength: Option<Value>,
    speed: Option<Value>,
    durability: Option<Value>,
    power: Option<Value>,
    combat: Option<Value>,
}

/// Decode a Superhero API response body into a record
pub fn parse_character(id: CharacterId, body: &str) -> Result<CharacterRecord, FetchError> {
    let payload: ApiCharacter =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if payload.response.as_deref() == Some("error") {
        return Err(FetchError::Rejected {
            id,
            reason: payload.error.unwrap_or_else(|| "unknown error".into()),
        });
    }

    let name = payload
        .name
        .ok_or_else(|| FetchError::Malformed(format!("character {} has no name", id)))?;
    let alignment = payload
        .biography
        .and_then(|bio| bio.alignment)
        .ok_or_else(|| FetchError::Malformed(format!("character {} has no alignment", id)))?;

    let stats = payload.powerstats.unwrap_or_default();
    let base = AttributeSet {
        intelligence: coerce_stat(stats.intelligence.as_ref()),
        strength: coerce_stat(stats.strength.as_ref()),
        speed: coerce_stat(stats.speed.as_ref()),
        durability: coerce_stat(stats.durability.as_ref()),
        power: coerce_stat(stats.power.as_ref()),
        combat: coerce_stat(stats.combat.as_ref()),
    };

    Ok(CharacterRecord {
        id,
        name,
        alignment,
        base,
    })
}

/// Missing, `"null"` and non-numeric values become 0; negatives clamp to 0
fn coerce_stat(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

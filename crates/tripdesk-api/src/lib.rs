// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use tripdesk_app::{CollectionKind, LoginInput, Record, RecordId, Session};
use url::Url;

/// Which of the accepted list-response layouts a body used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `[ {...}, ... ]`
    Array,
    /// `{ "<collection>": [ ... ] }`, for example `{"hotels": [...]}`
    Wrapped,
    /// `{ "data": [ ... ] }`
    Data,
    /// Anything else. Treated as an empty collection.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub shape: ResponseShape,
    /// Array elements skipped because they were not objects with an id.
    pub dropped: usize,
}

/// Turns a list-endpoint body into records.
///
/// A bare array is used as-is; otherwise the array is taken from
/// `wrapper_key`, then from `data`. Any other layout yields an empty
/// collection tagged [`ResponseShape::Unrecognized`] so the caller can report
/// it; it never falls back to guessing at other keys.
pub fn normalize_records(body: Value, wrapper_key: &str) -> Normalized {
    let (items, shape) = match body {
        Value::Array(items) => (items, ResponseShape::Array),
        Value::Object(mut object) => {
            if let Some(items) = take_array(&mut object, wrapper_key) {
                (items, ResponseShape::Wrapped)
            } else if let Some(items) = take_array(&mut object, "data") {
                (items, ResponseShape::Data)
            } else {
                (Vec::new(), ResponseShape::Unrecognized)
            }
        }
        _ => (Vec::new(), ResponseShape::Unrecognized),
    };

    let total = items.len();
    let records = items
        .into_iter()
        .filter_map(Record::from_value)
        .collect::<Vec<_>>();
    Normalized {
        dropped: total - records.len(),
        records,
        shape,
    }
}

fn take_array(object: &mut Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    if !object.get(key).is_some_and(Value::is_array) {
        return None;
    }
    match object.remove(key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    token: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed =
            Url::parse(&base_url).with_context(|| format!("parse api.base_url {base_url:?}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            token: None,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn fetch_records(&self, kind: CollectionKind) -> Result<Vec<Record>> {
        let path = kind.list_path();
        debug!(collection = kind.as_str(), path, "fetching records");
        let response = self
            .request(Method::GET, path)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body: Value = response
            .json()
            .with_context(|| format!("decode {} list", kind.singular()))?;
        let normalized = normalize_records(body, kind.wrapper_key());
        match normalized.shape {
            ResponseShape::Unrecognized => warn!(
                collection = kind.as_str(),
                path, "unexpected list response shape; showing an empty collection"
            ),
            shape => debug!(collection = kind.as_str(), ?shape, "list response shape"),
        }
        if normalized.dropped > 0 {
            warn!(
                collection = kind.as_str(),
                dropped = normalized.dropped,
                "skipped list entries without an identifier"
            );
        }
        info!(
            collection = kind.as_str(),
            count = normalized.records.len(),
            "fetched records"
        );
        Ok(normalized.records)
    }

    pub fn delete_record(&self, kind: CollectionKind, id: &RecordId) -> Result<()> {
        let path = kind.delete_path(id);
        let response = self
            .request(Method::DELETE, &path)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let error = clean_error_response(status, &body);
            warn!(collection = kind.as_str(), id = %id, %error, "delete rejected");
            return Err(error);
        }

        info!(collection = kind.as_str(), id = %id, "deleted record");
        Ok(())
    }

    pub fn login(&self, input: &LoginInput) -> Result<Session> {
        input.validate()?;

        let response = self
            .request(Method::POST, "/user/login")
            .json(input)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            bail!("invalid email or password");
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: LoginResponse = response.json().context("decode login response")?;
        let token = parsed
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow!("login response carried no token"))?;
        let user = parsed.user.unwrap_or_default();
        info!(email = %input.email, "signed in");
        Ok(Session::start(
            token,
            &user.full_name,
            if user.email.is_empty() {
                input.email.clone()
            } else {
                user.email
            },
            user.id,
            OffsetDateTime::now_utc(),
        ))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check [api].base_url and that the booking API is running ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body) {
        if let Some(message) = parsed.message.filter(|message| !message.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
        if let Some(error) = parsed.error.filter(|error| !error.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), error);
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') && !trimmed.contains('<')
    {
        return anyhow!("server error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
    user: Option<LoginUser>,
}

#[derive(Default, Deserialize)]
struct LoginUser {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(rename = "_id", default)]
    id: String,
}

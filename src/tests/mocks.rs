//! Mock implementations for testing

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Result, TrackError};

/// One recorded call: method, endpoint and the serialized payload, if any.
pub type RecordedCall = (Method, String, Option<serde_json::Value>);

/// Simple canned-response API client for testing
#[derive(Debug, Clone)]
pub struct MockApiClient {
    pub config: Config,
    /// Responses keyed by method + endpoint
    responses: Arc<Mutex<Vec<(Method, String, serde_json::Value)>>>,
    /// Endpoints that answer with an error instead
    failures: Arc<Mutex<Vec<(Method, String)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            responses: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_response(&self, method: Method, endpoint: &str, response: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push((method, endpoint.to_string(), response));
    }

    pub fn fail_on(&self, method: Method, endpoint: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((method, endpoint.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made to the given endpoint, any method.
    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|(_, e, _)| e == endpoint)
            .collect()
    }

    fn record<T: Serialize>(&self, method: &Method, endpoint: &str, payload: Option<&T>) {
        let value = payload.and_then(|p| serde_json::to_value(p).ok());
        self.calls
            .lock()
            .unwrap()
            .push((method.clone(), endpoint.to_string(), value));
    }

    fn check_failure(&self, method: &Method, endpoint: &str) -> Result<()> {
        let failing = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(m, e)| m == method && e == endpoint);
        if failing {
            Err(TrackError::api(500, "mock failure"))
        } else {
            Ok(())
        }
    }

    fn lookup(&self, method: &Method, endpoint: &str) -> Option<serde_json::Value> {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .find(|(m, e, _)| m == method && e == endpoint)
            .map(|(_, _, v)| v.clone())
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient for MockApiClient {
    fn config(&self) -> &Config {
        &self.config
    }

    fn is_authenticated(&self) -> bool {
        true
    }

    async fn request<T, R>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.record(&method, endpoint, payload);
        self.check_failure(&method, endpoint)?;

        let value = self
            .lookup(&method, endpoint)
            .ok_or_else(|| TrackError::not_found(format!("no mock response for {}", endpoint)))?;
        serde_json::from_value(value).map_err(TrackError::from)
    }

    async fn execute<T>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<()>
    where
        T: Serialize + Sync,
    {
        self.record(&method, endpoint, payload);
        self.check_failure(&method, endpoint)
    }

    async fn upload<R>(
        &self,
        endpoint: &str,
        _field: &str,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.record(
            &Method::POST,
            endpoint,
            Some(&serde_json::json!({ "file": file_name })),
        );
        self.check_failure(&Method::POST, endpoint)?;

        let value = self
            .lookup(&Method::POST, endpoint)
            .ok_or_else(|| TrackError::not_found(format!("no mock response for {}", endpoint)))?;
        serde_json::from_value(value).map_err(TrackError::from)
    }
}

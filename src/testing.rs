//! Scripted in-memory transport for unit tests

use crate::error::Result;
use crate::http::{RequestConfig, Transport};
use crate::types::{JsonValue, Method, StringMap};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A request as seen by the fake transport
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: StringMap,
    pub body: Option<JsonValue>,
}

impl RecordedRequest {
    /// Page number from the query string or the body, if any
    pub fn page(&self, param: &str) -> Option<i64> {
        if let Some(p) = self.query.get(param) {
            return p.parse().ok();
        }
        self.body.as_ref()?.get(param)?.as_i64()
    }
}

type Responder = Box<dyn Fn(&RecordedRequest) -> Result<JsonValue> + Send + Sync>;
type Delay = Box<dyn Fn(&RecordedRequest) -> Duration + Send + Sync>;

pub(crate) struct FakeTransport {
    responder: Responder,
    delay: Delay,
    requests: Mutex<Vec<RecordedRequest>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<JsonValue> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Box::new(|_| Duration::ZERO),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Delay each response by a request-dependent amount
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Box::new(delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<JsonValue> {
        let recorded = RecordedRequest {
            method,
            endpoint: endpoint.to_string(),
            query: config.query,
            body: config.body,
        };
        self.requests.lock().unwrap().push(recorded.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = (self.delay)(&recorded);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.responder)(&recorded)
    }
}

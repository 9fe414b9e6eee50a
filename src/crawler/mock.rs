//! Scripted in-memory transport for unit tests

use crate::crawler::transport::{HttpResponse, Transport, TransportError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use tokio::time::Instant;

type Reply = Result<HttpResponse, TransportError>;

/// Transport that answers from a per-URL script and records every call
///
/// Each URL maps to a list of replies; call `n` gets reply `n`, and the last
/// reply repeats once the list runs out. Unscripted URLs answer 404.
/// With a barrier set, every request waits on it before answering, which
/// keeps concurrent requests in flight together.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Vec<Reply>>>,
    calls: Mutex<Vec<(String, Instant)>>,
    barrier: Option<Arc<Barrier>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200
    pub fn page(self, url: &str, body: &str) -> Self {
        self.sequence(url, vec![Ok(HttpResponse::new(200, body))])
    }

    /// Serves an empty body with `status`
    pub fn status(self, url: &str, status: u16) -> Self {
        self.sequence(url, vec![Ok(HttpResponse::new(status, ""))])
    }

    /// Fails every request to `url`
    pub fn fail(self, url: &str, error: TransportError) -> Self {
        self.sequence(url, vec![Err(error)])
    }

    /// Serves `replies` in order, repeating the last one
    pub fn sequence(self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), replies);
        self
    }

    /// Holds each request until `parties` requests are waiting
    pub fn barrier(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// URLs requested so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Number of requests made for `url`
    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .count()
    }

    /// When each request for `url` was made
    pub fn call_times(&self, url: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .map(|(_, at)| *at)
            .collect()
    }

    fn reply(&self, url: &str) -> Reply {
        let previous = {
            let mut calls = self.calls.lock().unwrap();
            let previous = calls.iter().filter(|(called, _)| called == url).count();
            calls.push((url.to_string(), Instant::now()));
            previous
        };

        let routes = self.routes.lock().unwrap();
        match routes.get(url) {
            Some(replies) if !replies.is_empty() => {
                replies[previous.min(replies.len() - 1)].clone()
            }
            _ => Ok(HttpResponse::new(404, "")),
        }
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let reply = self.reply(url);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        reply
    }
}

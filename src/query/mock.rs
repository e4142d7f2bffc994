use crate::error::{AxtopError, AxtopResult};
use crate::query::{QueryClient, QueryResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Scripted {
    Result(QueryResult),
    Failure(String),
}

// In-memory query client that replays scripted responses, for testing
#[derive(Clone, Default)]
pub struct MockQueryClient {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    fallback: Arc<Mutex<Option<QueryResult>>>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockQueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client that answers every query with the same result.
    pub fn always(result: QueryResult) -> Self {
        let client = Self::new();
        *client.fallback.lock().unwrap() = Some(result);
        client
    }

    pub fn push_result(&self, result: QueryResult) {
        self.responses.lock().unwrap().push_back(Scripted::Result(result));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Scripted::Failure(message.into()));
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryClient for MockQueryClient {
    async fn query(&self, apl: &str) -> AxtopResult<QueryResult> {
        self.received.lock().unwrap().push(apl.to_string());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Result(result)) => Ok(result),
            Some(Scripted::Failure(message)) => Err(AxtopError::Network(message)),
            None => self
                .fallback
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AxtopError::Network("no scripted response".to_string())),
        }
    }
}

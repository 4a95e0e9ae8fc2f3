use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::page::Activation;

/// Fixed relative path of the fragment endpoint.
pub const MODAL_FRAGMENT_PATH: &str = "/load_wallpaper_modal";

/// Query parameters for one fragment request. Both identifiers are
/// optional passthrough; an absent identifier is omitted from the query
/// string rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalQuery {
    pub wallpaper_id: Option<String>,
    pub collection_id: Option<String>,
}

impl ModalQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.wallpaper_id.as_deref() {
            pairs.push(("wallpaper_id", id));
        }
        if let Some(id) = self.collection_id.as_deref() {
            pairs.push(("collection_id", id));
        }
        pairs
    }
}

impl From<Activation> for ModalQuery {
    fn from(activation: Activation) -> Self {
        ModalQuery {
            wallpaper_id: activation.wallpaper_id,
            collection_id: activation.collection_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("modal fragment request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

// --- FragmentApi Trait Definition ---
//
// `Send + Sync` because the event loop hands the api to blocking fetch tasks.
pub trait FragmentApi: Send + Sync {
    fn load_modal_fragment(&self, query: &ModalQuery) -> Result<String, FragmentError>;
}

// --- HttpFragmentApi Implementation ---

pub struct HttpFragmentApi {
    base_url: String,
    timeout: Duration,
}

impl HttpFragmentApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        HttpFragmentApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

impl FragmentApi for HttpFragmentApi {
    // Runs on a blocking task, never on the event loop itself.
    fn load_modal_fragment(&self, query: &ModalQuery) -> Result<String, FragmentError> {
        let url = format!("{}{}", self.base_url, MODAL_FRAGMENT_PATH);
        let client = reqwest::blocking::Client::new();
        let response = client
            .get(&url)
            .timeout(self.timeout)
            .query(&query.query_pairs())
            .send()?;

        if response.status().is_success() {
            Ok(response.text()?)
        } else {
            let status = response.status().as_u16();
            let body = response
                .text()
                .unwrap_or_else(|_| "could not read error body".to_string());
            Err(FragmentError::Status { status, body })
        }
    }
}

// --- MockFragmentApi Implementation ---

/// Scripted fragment source for tests. Responses are consumed in the order
/// they were pushed; every received query is recorded for assertions.
#[derive(Default)]
pub struct MockFragmentApi {
    responses: Mutex<VecDeque<Result<String, (u16, String)>>>,
    queries: Mutex<Vec<ModalQuery>>,
}

impl MockFragmentApi {
    pub fn new() -> Self {
        MockFragmentApi::default()
    }

    pub fn push_success(&mut self, body: &str) {
        self.responses
            .get_mut()
            .expect("mock lock poisoned")
            .push_back(Ok(body.to_string()));
    }

    pub fn push_failure(&mut self, status: u16, body: &str) {
        self.responses
            .get_mut()
            .expect("mock lock poisoned")
            .push_back(Err((status, body.to_string())));
    }

    pub fn recorded_queries(&self) -> Vec<ModalQuery> {
        self.queries.lock().expect("mock lock poisoned").clone()
    }
}

impl FragmentApi for MockFragmentApi {
    fn load_modal_fragment(&self, query: &ModalQuery) -> Result<String, FragmentError> {
        self.queries
            .lock()
            .expect("mock lock poisoned")
            .push(query.clone());

        let next = self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front();
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err((status, body))) => Err(FragmentError::Status { status, body }),
            None => Err(FragmentError::Status {
                status: 500,
                body: "MockFragmentApi: no scripted response left".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_omit_absent_identifiers() {
        let query = ModalQuery {
            wallpaper_id: Some("42".to_string()),
            collection_id: None,
        };
        assert_eq!(query.query_pairs(), vec![("wallpaper_id", "42")]);
        assert!(ModalQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn mock_serves_responses_in_order_and_records_queries() {
        let mut mock = MockFragmentApi::new();
        mock.push_success("<div>one</div>");
        mock.push_failure(502, "bad gateway");

        let query = ModalQuery {
            wallpaper_id: Some("42".to_string()),
            collection_id: Some("7".to_string()),
        };
        assert_eq!(mock.load_modal_fragment(&query).unwrap(), "<div>one</div>");
        match mock.load_modal_fragment(&ModalQuery::default()) {
            Err(FragmentError::Status { status, .. }) => assert_eq!(status, 502),
            other => panic!("expected status error, got {:?}", other.map(|_| ())),
        }
        assert_eq!(mock.recorded_queries().len(), 2);
        assert_eq!(mock.recorded_queries()[0], query);
    }

    #[test]
    fn exhausted_mock_reports_itself() {
        let mock = MockFragmentApi::new();
        let err = mock.load_modal_fragment(&ModalQuery::default()).unwrap_err();
        assert!(err.to_string().contains("no scripted response left"));
    }
}

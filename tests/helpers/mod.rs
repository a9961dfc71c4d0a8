#![allow(dead_code)]

use async_trait::async_trait;
use image_search_client::api::backend::SearchBackend;
use image_search_client::api::search_structs::{
    BaseMatch, BasePage, SearchParameters, SearchResponse,
};
use image_search_client::common::api_client::ApiClientError;
use image_search_client::common::selected_file::SelectedFile;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn png_file(name: &str) -> SelectedFile {
    SelectedFile::new(name, Some(mime::IMAGE_PNG), vec![0x89, b'P', b'N', b'G'])
}

pub fn base_search_body(patent_ids: &[&str]) -> Value {
    let results: Vec<Value> = patent_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let score = 0.9 - 0.1 * i as f64;
            json!({
                "patent_id": id,
                "max_score": score,
                "pages": [{
                    "id": i,
                    "file_name": format!("{id}_0001.png"),
                    "page_num": "001",
                    "score": score,
                    "thumbnail_url": format!("/api/image/{id}_0001.png"),
                }],
            })
        })
        .collect();

    json!({
        "code": 0,
        "message": "success",
        "data": {
            "results": results,
            "timing": {
                "feature_extraction_ms": 12.5,
                "milvus_search_ms": 3.25,
                "post_process_ms": 0.1,
                "total_ms": 15.85,
            },
            "query_info": {
                "top_k": 10,
                "min_score": 0.4,
                "total_matched": patent_ids.len(),
                "model": "dinov2-base",
                "embedding_dim": 768,
            },
        },
    })
}

pub fn design_search_body() -> Value {
    json!({
        "code": 0,
        "message": "success",
        "data": {
            "results": [{
                "patent_id": "USD123456",
                "max_score": 0.87,
                "pages": [
                    {"id": 11, "image_index": 0, "file_name": "USD1234560001.TIF",
                     "file_path": "http://minio:9000/patents/design_patents/USD123456/USD1234560001.TIF",
                     "score": 0.87},
                    {"id": 12, "image_index": 1, "file_name": "USD1234560002.TIF",
                     "file_path": "http://minio:9000/patents/design_patents/USD123456/USD1234560002.TIF",
                     "score": 0.61}
                ],
                "title": "Table lamp",
                "loc_class": "26-05",
                "pub_date": 20230314,
                "filing_date": 20210902,
                "applicant_name": "ACME Lighting",
                "applicant_country": "US",
                "inventor_names": "Jane Doe",
                "claim_text": "The ornamental design for a table lamp, as shown.",
                "image_count": 2
            }],
            "timing": {"feature_extraction_ms": 10.0, "milvus_search_ms": 2.0,
                       "post_process_ms": 0.2, "total_ms": 12.2},
            "query_info": {"top_k": 10, "min_score": 0.4, "keyword": "lamp",
                           "loc_class": null, "applicant": null, "total_matched": 2}
        }
    })
}

pub fn error_body(message: &str) -> Value {
    json!({"code": 1, "message": message, "data": null})
}

pub fn base_response(patent_ids: &[&str]) -> SearchResponse<BaseMatch> {
    serde_json::from_value(base_search_body(patent_ids)).expect("valid fixture")
}

pub fn base_error(message: &str) -> SearchResponse<BaseMatch> {
    serde_json::from_value(error_body(message)).expect("valid fixture")
}

pub fn base_match(patent_id: &str) -> BaseMatch {
    BaseMatch {
        patent_id: patent_id.to_string(),
        max_score: 0.5,
        pages: vec![BasePage {
            id: 1,
            file_name: format!("{patent_id}.png"),
            page_num: "001".to_string(),
            score: 0.5,
            thumbnail_url: format!("/api/image/{patent_id}.png"),
        }],
    }
}

/// One scripted reply of [`FakeBackend`].
pub struct Reply<R> {
    pub result: Result<SearchResponse<R>, ApiClientError>,
    pub delay: Option<Duration>,
    pub gate: Option<Arc<Notify>>,
}

impl<R> Reply<R> {
    pub fn ok(response: SearchResponse<R>) -> Self {
        Self {
            result: Ok(response),
            delay: None,
            gate: None,
        }
    }

    pub fn err(error: ApiClientError) -> Self {
        Self {
            result: Err(error),
            delay: None,
            gate: None,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hold the reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// In-process backend replaying scripted replies in call order and recording
/// every request it gets.
pub struct FakeBackend<R> {
    replies: Mutex<VecDeque<Reply<R>>>,
    pub requests: Arc<Mutex<Vec<(String, SearchParameters)>>>,
}

impl<R> FakeBackend<R> {
    pub fn new(replies: Vec<Reply<R>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn request_log(&self) -> Arc<Mutex<Vec<(String, SearchParameters)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl<R: Clone + Send + Sync + 'static> SearchBackend for FakeBackend<R> {
    type Match = R;

    async fn search(
        &self,
        file: &SelectedFile,
        params: &SearchParameters,
    ) -> Result<SearchResponse<R>, ApiClientError> {
        self.requests
            .lock()
            .expect("request log")
            .push((file.file_name.clone(), params.clone()));
        let reply = self
            .replies
            .lock()
            .expect("replies")
            .pop_front()
            .expect("a scripted reply for every request");

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        reply.result
    }
}

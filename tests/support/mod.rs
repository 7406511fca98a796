//! Shared test support: fixtures and a scripted in-process transport.
#![allow(dead_code)] // each test binary uses a different slice of this module

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use brezza::client::{ApiError, PostsApi};
use brezza_api_types::{Post, PostDraft, PostPatch};
use tokio::sync::oneshot;

pub fn post(id: i64, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        body: format!("body of {title}"),
        user_id: 1,
        liked: None,
    }
}

pub fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        body: format!("body of {title}"),
        user_id: 1,
    }
}

/// A scripted reply, optionally gated on a oneshot so a test can observe
/// the cache mid-flight before the "network" resolves.
struct Reply<T> {
    result: Result<T, ApiError>,
    gate: Option<oneshot::Receiver<()>>,
}

struct Script<T> {
    replies: Mutex<VecDeque<Reply<T>>>,
}

impl<T> Script<T> {
    fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
        }
    }

    fn push(&self, result: Result<T, ApiError>, gate: Option<oneshot::Receiver<()>>) {
        self.replies
            .lock()
            .expect("script lock")
            .push_back(Reply { result, gate });
    }

    async fn next(&self, call: &str) -> Result<T, ApiError> {
        let reply = self
            .replies
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted transport call: {call}"));
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply.result
    }
}

/// In-process `PostsApi` that pops scripted replies per endpoint and records
/// every call it served.
pub struct ScriptedApi {
    list: Script<Vec<Post>>,
    get: Script<Post>,
    create: Script<Post>,
    update: Script<Post>,
    delete: Script<()>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            list: Script::new(),
            get: Script::new(),
            create: Script::new(),
            update: Script::new(),
            delete: Script::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push_list(&self, result: Result<Vec<Post>, ApiError>) {
        self.list.push(result, None);
    }

    pub fn push_list_gated(&self, result: Result<Vec<Post>, ApiError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.list.push(result, Some(gate));
        release
    }

    pub fn push_get(&self, result: Result<Post, ApiError>) {
        self.get.push(result, None);
    }

    pub fn push_create(&self, result: Result<Post, ApiError>) {
        self.create.push(result, None);
    }

    pub fn push_create_gated(&self, result: Result<Post, ApiError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.create.push(result, Some(gate));
        release
    }

    pub fn push_update(&self, result: Result<Post, ApiError>) {
        self.update.push(result, None);
    }

    pub fn push_update_gated(&self, result: Result<Post, ApiError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.update.push(result, Some(gate));
        release
    }

    pub fn push_delete(&self, result: Result<(), ApiError>) {
        self.delete.push(result, None);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl PostsApi for ScriptedApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.record("GET /posts".to_string());
        self.list.next("GET /posts").await
    }

    async fn get_post(&self, id: i64) -> Result<Post, ApiError> {
        self.record(format!("GET /posts/{id}"));
        self.get.next(&format!("GET /posts/{id}")).await
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let body = serde_json::to_string(draft).expect("draft should serialize");
        self.record(format!("POST /posts {body}"));
        self.create.next("POST /posts").await
    }

    async fn update_post(&self, id: i64, patch: &PostPatch) -> Result<Post, ApiError> {
        let body = serde_json::to_string(patch).expect("patch should serialize");
        self.record(format!("PATCH /posts/{id} {body}"));
        self.update.next(&format!("PATCH /posts/{id}")).await
    }

    async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        self.record(format!("DELETE /posts/{id}"));
        self.delete.next(&format!("DELETE /posts/{id}")).await
    }
}

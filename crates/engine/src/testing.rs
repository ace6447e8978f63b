//! In-memory recording gateways for unit tests.
#![allow(clippy::unwrap_used)]

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
};

use crate::{
    error::{GatewayError, Result},
    gateway::{ChatGateway, Channel, MemoryGateway, MemoryItem, MemoryUser, Message,
              RetrievalQuery, RetrievalScope},
};

/// Scripted chat gateway that records every call.
///
/// Scripted responses are consumed in order; once a queue is empty the
/// gateway answers with an empty success, so multi-cycle tests terminate
/// quietly.
#[derive(Default)]
pub(crate) struct RecordingChat {
    channel_script: Mutex<VecDeque<Result<Vec<Channel>>>>,
    history_script: Mutex<HashMap<String, VecDeque<Result<Vec<Message>>>>>,
    history_calls: Mutex<Vec<(String, DateTime<Utc>, u32)>>,
    posts: Mutex<Vec<(String, String)>>,
    post_attempts: AtomicUsize,
    failing_posts: AtomicUsize,
}

impl RecordingChat {
    pub(crate) fn script_channels(&self, response: Result<Vec<Channel>>) {
        self.channel_script.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_history(&self, channel_id: &str, response: Result<Vec<Message>>) {
        self.history_script
            .lock()
            .unwrap()
            .entry(channel_id.to_string())
            .or_default()
            .push_back(response);
    }

    pub(crate) fn fail_next_post(&self) {
        self.failing_posts.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn history_calls(&self) -> Vec<(String, DateTime<Utc>, u32)> {
        self.history_calls.lock().unwrap().clone()
    }

    pub(crate) fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }

    pub(crate) fn post_attempts(&self) -> usize {
        self.post_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for RecordingChat {
    async fn list_channels(&self) -> Result<Vec<Channel>> {
        self.channel_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn fetch_history(
        &self,
        channel_id: &str,
        oldest: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Message>> {
        self.history_calls
            .lock()
            .unwrap()
            .push((channel_id.to_string(), oldest, limit));
        self.history_script
            .lock()
            .unwrap()
            .get_mut(channel_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<()> {
        self.post_attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_posts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(GatewayError::api("post rejected"));
        }
        self.posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// One recorded `memorize` invocation, with the artifact content captured
/// while the file still existed.
#[derive(Debug, Clone)]
pub(crate) struct MemorizeCall {
    pub resource: PathBuf,
    pub content: String,
    pub modality: String,
    pub user: MemoryUser,
}

/// Scripted memory gateway that records every call.
#[derive(Default)]
pub(crate) struct RecordingMemory {
    memorize_calls: Mutex<Vec<MemorizeCall>>,
    failing_memorizes: AtomicUsize,
    retrieve_script: Mutex<VecDeque<Result<Vec<MemoryItem>>>>,
    retrieve_calls: Mutex<Vec<(Vec<RetrievalQuery>, RetrievalScope)>>,
}

impl RecordingMemory {
    pub(crate) fn fail_next_memorize(&self) {
        self.failing_memorizes.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn script_retrieve(&self, response: Result<Vec<MemoryItem>>) {
        self.retrieve_script.lock().unwrap().push_back(response);
    }

    pub(crate) fn memorize_calls(&self) -> Vec<MemorizeCall> {
        self.memorize_calls.lock().unwrap().clone()
    }

    pub(crate) fn retrieve_calls(&self) -> Vec<(Vec<RetrievalQuery>, RetrievalScope)> {
        self.retrieve_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemoryGateway for RecordingMemory {
    async fn memorize(&self, resource: &Path, modality: &str, user: &MemoryUser) -> Result<()> {
        let content = std::fs::read_to_string(resource).unwrap_or_default();
        self.memorize_calls.lock().unwrap().push(MemorizeCall {
            resource: resource.to_path_buf(),
            content,
            modality: modality.to_string(),
            user: user.clone(),
        });
        if self
            .failing_memorizes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(GatewayError::api("memorize rejected"));
        }
        Ok(())
    }

    async fn retrieve(
        &self,
        queries: &[RetrievalQuery],
        scope: &RetrievalScope,
    ) -> Result<Vec<MemoryItem>> {
        self.retrieve_calls
            .lock()
            .unwrap()
            .push((queries.to_vec(), scope.clone()));
        self.retrieve_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]))
    }
}

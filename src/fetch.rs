use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::hn_client::{FetchError, StorySource};
use crate::models::SearchResponse;
use crate::stories::{StoriesAction, StoriesState};

struct Completion {
    seq: u64,
    url: String,
    result: Result<SearchResponse, FetchError>,
}

/// Runs each search on a worker thread and feeds the outcome back into
/// [`StoriesState`] from the UI thread.
///
/// Every request gets a sequence number. Only the newest request is allowed
/// to land; anything older that finishes late is dropped.
pub struct FetchController {
    source: Arc<dyn StorySource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    latest_seq: u64,
}

impl FetchController {
    pub fn new(source: Arc<dyn StorySource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            latest_seq: 0,
        }
    }

    pub fn fetch(&mut self, stories: &mut StoriesState, url: String) {
        stories.dispatch(StoriesAction::FetchInit);

        self.latest_seq += 1;
        let seq = self.latest_seq;
        let source = self.source.clone();
        let tx = self.tx.clone();

        log::info!("Fetching {} (request #{})", url, seq);
        thread::spawn(move || {
            let result = source.fetch(&url);
            // The controller may be gone by now; nothing left to update then.
            let _ = tx.send(Completion { seq, url, result });
        });
    }

    /// Applies every finished request without blocking. Returns true if the
    /// state changed.
    pub fn poll(&mut self, stories: &mut StoriesState) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(stories, completion);
        }
        changed
    }

    /// Like [`poll`](Self::poll) but waits up to `timeout` for one completion.
    #[allow(dead_code)]
    pub fn wait(&mut self, stories: &mut StoriesState, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => self.apply(stories, completion),
            Err(_) => false,
        }
    }

    fn apply(&self, stories: &mut StoriesState, completion: Completion) -> bool {
        if completion.seq != self.latest_seq {
            log::debug!(
                "Dropping stale response for {} (request #{}, latest #{})",
                completion.url,
                completion.seq,
                self.latest_seq
            );
            return false;
        }

        match completion.result {
            Ok(response) => {
                log::info!(
                    "Loaded {} stories for page {} of {}",
                    response.hits.len(),
                    response.page,
                    completion.url
                );
                stories.dispatch(StoriesAction::FetchSuccess {
                    list: response.hits,
                    page: response.page,
                    page_count: response.page_count,
                });
            }
            Err(e) => {
                log::error!("Fetching {} failed: {}", completion.url, e);
                stories.dispatch(StoriesAction::FetchFailure);
            }
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::hn_client::extract_search_term;
    use crate::models::Story;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::{Condvar, Mutex};

    const WAIT: Duration = Duration::from_secs(5);

    pub(crate) fn story(id: &str) -> Story {
        Story {
            id: id.to_string(),
            title: format!("Story {}", id),
            url: format!("https://example.com/{}", id),
            author: "author".to_string(),
            comment_count: 0,
            point_count: 0,
        }
    }

    /// Answers each URL with one story named after the search term. URLs
    /// listed in `held` block until [`FakeSource::release`] is called.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        failing: Mutex<Vec<String>>,
        held: Mutex<HashMap<String, bool>>,
        released: Condvar,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub(crate) fn hold(&self, url: &str) {
            self.held.lock().unwrap().insert(url.to_string(), false);
        }

        pub(crate) fn release(&self, url: &str) {
            self.held.lock().unwrap().insert(url.to_string(), true);
            self.released.notify_all();
        }

        pub(crate) fn fail(&self, url: &str) {
            self.failing.lock().unwrap().push(url.to_string());
        }
    }

    impl StorySource for FakeSource {
        fn fetch(&self, url: &str) -> Result<SearchResponse, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());

            let mut held = self.held.lock().unwrap();
            while held.get(url) == Some(&false) {
                held = self.released.wait(held).unwrap();
            }
            drop(held);

            if self.failing.lock().unwrap().iter().any(|u| u == url) {
                return Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }

            let term = extract_search_term(url).unwrap_or_default();
            let page = reqwest::Url::parse(url)
                .ok()
                .and_then(|u| u.query_pairs().find(|(k, _)| k == "page").map(|(_, v)| v.into_owned()))
                .and_then(|p| p.parse().ok())
                .unwrap_or(0);

            Ok(SearchResponse {
                hits: vec![story(&format!("{}-{}", term, page))],
                page,
                page_count: Some(10),
            })
        }
    }

    fn url(term: &str, page: usize) -> String {
        crate::hn_client::search_url("http://hn.test", term, page)
    }

    fn ids(stories: &StoriesState) -> Vec<&str> {
        stories.items.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn fetch_marks_loading_then_applies_success() {
        let mut controller = FetchController::new(Arc::new(FakeSource::default()));
        let mut stories = StoriesState::default();

        controller.fetch(&mut stories, url("rust", 0));
        assert!(stories.is_loading);

        assert!(controller.wait(&mut stories, WAIT));
        assert!(!stories.is_loading);
        assert!(!stories.is_error);
        assert_eq!(ids(&stories), vec!["rust-0"]);
        assert_eq!(stories.page_count, Some(10));
    }

    #[test]
    fn failure_sets_error_and_keeps_items() {
        let source = Arc::new(FakeSource::default());
        let mut controller = FetchController::new(source.clone());
        let mut stories = StoriesState::default();

        controller.fetch(&mut stories, url("rust", 0));
        controller.wait(&mut stories, WAIT);

        source.fail(&url("rust", 1));
        controller.fetch(&mut stories, url("rust", 1));
        assert!(controller.wait(&mut stories, WAIT));

        assert!(stories.is_error);
        assert!(!stories.is_loading);
        assert_eq!(ids(&stories), vec!["rust-0"]);
    }

    #[test]
    fn pages_accumulate() {
        let mut controller = FetchController::new(Arc::new(FakeSource::default()));
        let mut stories = StoriesState::default();

        for page in 0..3 {
            controller.fetch(&mut stories, url("rust", page));
            controller.wait(&mut stories, WAIT);
        }
        assert_eq!(ids(&stories), vec!["rust-0", "rust-1", "rust-2"]);
        assert_eq!(stories.page, 2);
    }

    #[test]
    fn stale_response_is_dropped() {
        let source = Arc::new(FakeSource::default());
        let mut controller = FetchController::new(source.clone());
        let mut stories = StoriesState::default();

        let slow = url("slow", 0);
        source.hold(&slow);
        controller.fetch(&mut stories, slow.clone());
        controller.fetch(&mut stories, url("fast", 0));

        assert!(controller.wait(&mut stories, WAIT));
        assert_eq!(ids(&stories), vec!["fast-0"]);

        source.release(&slow);
        assert!(!controller.wait(&mut stories, WAIT));
        assert_eq!(ids(&stories), vec!["fast-0"]);
        assert!(!stories.is_loading);
    }

    #[test]
    fn stays_loading_until_latest_request_lands() {
        let source = Arc::new(FakeSource::default());
        let mut controller = FetchController::new(source.clone());
        let mut stories = StoriesState::default();

        let newest = url("new", 0);
        source.hold(&newest);
        controller.fetch(&mut stories, url("old", 0));
        controller.fetch(&mut stories, newest.clone());

        // The old response arrives first and is ignored.
        assert!(!controller.wait(&mut stories, WAIT));
        assert!(stories.is_loading);
        assert!(stories.items.is_empty());

        source.release(&newest);
        assert!(controller.wait(&mut stories, WAIT));
        assert_eq!(ids(&stories), vec!["new-0"]);
    }

    #[test]
    fn poll_without_completions_changes_nothing() {
        let mut controller = FetchController::new(Arc::new(FakeSource::default()));
        let mut stories = StoriesState::default();
        assert!(!controller.poll(&mut stories));
        assert_eq!(stories, StoriesState::default());
    }

    #[test]
    fn one_request_per_fetch() {
        let source = Arc::new(FakeSource::default());
        let mut controller = FetchController::new(source.clone());
        let mut stories = StoriesState::default();

        controller.fetch(&mut stories, url("a", 0));
        controller.wait(&mut stories, WAIT);
        controller.fetch(&mut stories, url("b", 0));
        controller.wait(&mut stories, WAIT);

        assert_eq!(*source.requests.lock().unwrap(), vec![url("a", 0), url("b", 0)]);
    }
}

use std::sync::Arc;

use crate::db::KeyValueStore;
use crate::fetch::FetchController;
use crate::history::UrlHistory;
use crate::hn_client::{extract_search_term, search_url, StorySource};
use crate::models::Story;
use crate::search::SearchState;
use crate::sort::{SortKey, SortState};
use crate::stories::{StoriesAction, StoriesState};

/// Everything the window shows, minus the widgets.
pub struct HackerStories {
    api_base: String,
    search: SearchState,
    urls: UrlHistory,
    stories: StoriesState,
    fetcher: FetchController,
    sort: SortState,
}

impl HackerStories {
    /// Restores the saved search term and immediately searches for it.
    pub fn new(
        api_base: &str,
        source: Arc<dyn StorySource>,
        store: Arc<dyn KeyValueStore>,
        storage_key: &str,
        default_term: &str,
    ) -> Self {
        let mut app = Self {
            api_base: api_base.to_string(),
            search: SearchState::new(store, storage_key, default_term),
            urls: UrlHistory::new(),
            stories: StoriesState::default(),
            fetcher: FetchController::new(source),
            sort: SortState::default(),
        };

        let term = app.search.term().to_string();
        app.handle_search(&term, 0);
        app
    }

    pub fn search_term(&self) -> &str {
        self.search.term()
    }

    pub fn stories(&self) -> &StoriesState {
        &self.stories
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn sorted_stories(&self) -> Vec<&Story> {
        self.sort.apply(&self.stories.items)
    }

    pub fn last_searches(&self) -> Vec<String> {
        self.urls.last_searches()
    }

    /// Drains finished fetches; returns true when something changed.
    pub fn poll(&mut self) -> bool {
        self.fetcher.poll(&mut self.stories)
    }

    pub fn handle_search_input(&mut self, term: &str) {
        self.search.set(term);
    }

    pub fn handle_search_submit(&mut self) {
        if self.search.term().is_empty() {
            return;
        }
        let term = self.search.term().to_string();
        self.handle_search(&term, 0);
    }

    pub fn handle_more(&mut self) {
        let Some(last_url) = self.urls.last() else {
            return;
        };
        let term = extract_search_term(last_url).unwrap_or_default();
        let page = self.stories.page + 1;
        self.handle_search(&term, page);
    }

    pub fn handle_last_search(&mut self, term: &str) {
        self.handle_search(term, 0);
        self.search.set(term);
    }

    pub fn handle_remove_story(&mut self, story: &Story) {
        self.stories.dispatch(StoriesAction::RemoveStory(story.clone()));
    }

    pub fn handle_sort(&mut self, key: SortKey) {
        self.sort.select(key);
    }

    fn handle_search(&mut self, term: &str, page: usize) {
        let url = search_url(&self.api_base, term, page);
        self.urls.push(url.clone());
        self.fetcher.fetch(&mut self.stories, url);
    }

    #[cfg(test)]
    fn wait(&mut self) -> bool {
        self.fetcher.wait(&mut self.stories, std::time::Duration::from_secs(5))
    }
}

use std::collections::VecDeque;

use crate::hn_client::extract_search_term;

/// Most recent searches offered as shortcuts.
pub const MAX_LAST_SEARCHES: usize = 5;
// Displayed terms, one spliced-out repeat, and the current URL.
const URL_WINDOW: usize = MAX_LAST_SEARCHES + 2;

/// Query URLs in the order they were issued, oldest first.
#[derive(Debug, Clone, Default)]
pub struct UrlHistory {
    urls: VecDeque<String>,
}

impl UrlHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: String) {
        self.urls.push_back(url);
        while self.urls.len() > URL_WINDOW {
            self.urls.pop_front();
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.urls.back().map(String::as_str)
    }

    pub fn last_searches(&self) -> Vec<String> {
        let urls: Vec<&str> = self.urls.iter().map(String::as_str).collect();
        last_searches(&urls)
    }
}

/// Derives the recent-search shortcuts from issued URLs.
///
/// The newest URL is the current search and never shows up. If the search
/// right before it used the same term it is dropped too, so repeating a
/// search (or loading another page of it) doesn't offer a no-op shortcut.
/// Returns at most [`MAX_LAST_SEARCHES`] terms, oldest first.
pub fn last_searches<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    let mut terms: Vec<String> = urls
        .iter()
        .map(|url| extract_search_term(url.as_ref()).unwrap_or_default())
        .collect();

    let Some(current) = terms.pop() else {
        return Vec::new();
    };

    if terms.last() == Some(&current) {
        terms.pop();
    }

    let skip = terms.len().saturating_sub(MAX_LAST_SEARCHES);
    terms.split_off(skip)
}

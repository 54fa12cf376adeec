use crate::models::Story;

/// Accumulated search results plus fetch status.
///
/// Only [`StoriesState::dispatch`] (or [`reduce`]) changes it. The item order is
/// the order the API returned; sorting is done at display time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoriesState {
    pub items: Vec<Story>,
    pub page: usize,
    pub page_count: Option<usize>,
    pub is_loading: bool,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoriesAction {
    FetchInit,
    FetchSuccess {
        list: Vec<Story>,
        page: usize,
        page_count: Option<usize>,
    },
    FetchFailure,
    RemoveStory(Story),
}

impl StoriesState {
    pub fn dispatch(&mut self, action: StoriesAction) {
        match action {
            StoriesAction::FetchInit => {
                self.is_loading = true;
                self.is_error = false;
            }
            StoriesAction::FetchSuccess { list, page, page_count } => {
                self.is_loading = false;
                self.is_error = false;
                if page == 0 {
                    self.items = list;
                } else {
                    self.items.extend(list);
                }
                self.page = page;
                self.page_count = page_count;
            }
            StoriesAction::FetchFailure => {
                self.is_loading = false;
                self.is_error = true;
            }
            StoriesAction::RemoveStory(story) => {
                self.items.retain(|item| item.id != story.id);
            }
        }
    }

    /// False only once the API has told us the current page is the last one.
    pub fn has_more(&self) -> bool {
        match self.page_count {
            Some(count) => self.page + 1 < count,
            None => true,
        }
    }
}

#[allow(dead_code)]
pub fn reduce(mut state: StoriesState, action: StoriesAction) -> StoriesState {
    state.dispatch(action);
    state
}

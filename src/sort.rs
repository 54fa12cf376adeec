use crate::models::Story;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Comments,
    Points,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::None => "Fetched",
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::Comments => "Comments",
            SortKey::Points => "Points",
        }
    }

    fn sort(&self, list: &mut Vec<&Story>) {
        match self {
            SortKey::None => {}
            SortKey::Title => list.sort_by(|a, b| a.title.cmp(&b.title)),
            SortKey::Author => list.sort_by(|a, b| a.author.cmp(&b.author)),
            // Counts rank highest first: ascending stable sort, then flipped
            SortKey::Comments => {
                list.sort_by_key(|s| s.comment_count);
                list.reverse();
            }
            SortKey::Points => {
                list.sort_by_key(|s| s.point_count);
                list.reverse();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub is_reverse: bool,
}

impl SortState {
    /// Clicking the active column flips direction, any other column starts fresh.
    pub fn select(&mut self, key: SortKey) {
        self.is_reverse = self.key == key && !self.is_reverse;
        self.key = key;
    }

    pub fn apply<'a>(&self, stories: &'a [Story]) -> Vec<&'a Story> {
        let mut list: Vec<&Story> = stories.iter().collect();
        self.key.sort(&mut list);
        if self.is_reverse {
            list.reverse();
        }
        list
    }
}

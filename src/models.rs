use serde::{Deserialize, Deserializer};

/// A single search hit. The search API sends `null` for missing fields,
/// which decode to empty strings and zero counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Story {
    #[serde(rename = "objectID")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(rename = "num_comments", default, deserialize_with = "null_as_default")]
    pub comment_count: u32,
    #[serde(rename = "points", default, deserialize_with = "null_as_default")]
    pub point_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<Story>,
    pub page: usize,
    // Absent on some API mirrors
    #[serde(rename = "nbPages", default)]
    pub page_count: Option<usize>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

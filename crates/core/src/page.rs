//! One page of values from a paged producer

use serde::{Deserialize, Serialize};

/// A page of values plus the token for fetching the next one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub values: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl<T> Page<T> {
    /// The final page
    pub fn last(values: Vec<T>) -> Self {
        Self {
            values,
            continuation_token: None,
        }
    }

    /// A page that has more after it
    pub fn with_continuation(values: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            values,
            continuation_token: Some(token.into()),
        }
    }

    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    /// Transform every value, keeping the continuation token
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            values: self.values.into_iter().map(f).collect(),
            continuation_token: self.continuation_token,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::last(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::with_continuation(vec![1, 2], "next-2");
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["continuationToken"], "next-2");
        assert!(page.has_more());

        let last: Page<i32> = serde_json::from_str(r#"{"values": [3]}"#).unwrap();
        assert!(!last.has_more());
        assert_eq!(last.map(|v| v * 2).values, vec![6]);
    }
}

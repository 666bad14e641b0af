/// Sound id lists parsed from configuration text
///
/// Configuration stores ids as comma-separated text ("123, 456,789").
/// Parsing is tolerant: blank entries are ignored and malformed entries are
/// logged and skipped, never failing the whole list.
use std::collections::HashSet;

use crate::error::IdParseError;

/// Parse one trimmed, non-empty token as a sound id.
pub fn parse_id(token: &str) -> Result<u32, IdParseError> {
    token.parse::<u32>().map_err(|_| IdParseError {
        token: token.to_string(),
    })
}

/// Parse comma-separated ids, keeping order and duplicates exactly as written.
pub fn parse_id_list(text: &str) -> Vec<u32> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match parse_id(token) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!("{} (in {:?}), skipping", err, text);
                None
            }
        })
        .collect()
}

/// Ordered set of unique sound ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet {
    order: Vec<u32>,
    members: HashSet<u32>,
}

impl IdSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration text; the first occurrence of a duplicate wins.
    pub fn parse(text: &str) -> Self {
        parse_id_list(text).into_iter().collect()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.contains(&id)
    }

    /// Insert an id, returning false if it was already present
    pub fn insert(&mut self, id: u32) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.order.iter().copied()
    }
}

impl FromIterator<u32> for IdSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

use serde::{Deserialize, Serialize};

/// Structure representing a single saved link
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub name: String,
    pub url: String,
    pub favorite: bool,
}

/// A link as submitted by the user, before an id is assigned
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    pub favorite: bool,
}

impl NewLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            favorite: false,
        }
    }

    pub fn with_id(self, id: String) -> Link {
        Link {
            id,
            name: self.name,
            url: self.url,
            favorite: self.favorite,
        }
    }
}

impl Link {
    /// One-line rendering used by the link listing
    pub fn display_line(&self) -> String {
        let star = if self.favorite { '★' } else { '☆' };
        format!("{} [{}] {} <{}>", star, self.id, self.name, self.url)
    }
}

/// Custom error type for link operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    NotFound(String),
    EmptyName,
    EmptyUrl,
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::NotFound(_) => write!(f, "Link not found"),
            LinkError::EmptyName => write!(f, "Link name is required"),
            LinkError::EmptyUrl => write!(f, "Link URL is required"),
        }
    }
}

impl std::error::Error for LinkError {}

/// Form-level check applied before adding or editing a link
pub fn validate_link_input(name: &str, url: &str) -> Result<(), LinkError> {
    if name.trim().is_empty() {
        return Err(LinkError::EmptyName);
    }
    if url.trim().is_empty() {
        return Err(LinkError::EmptyUrl);
    }
    Ok(())
}

/// Pick an id for a new link: the current millisecond, bumped past any
/// numeric id already present so back-to-back adds never collide
pub fn next_link_id(existing: &[Link], now_ms: u64) -> String {
    let highest = existing
        .iter()
        .filter_map(|link| link.id.parse::<u64>().ok())
        .max();

    let id = match highest {
        Some(max) if max >= now_ms => max.saturating_add(1),
        _ => now_ms,
    };
    id.to_string()
}

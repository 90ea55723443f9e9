use log::{debug, error, warn};

use super::model::{next_link_id, Link, LinkError, NewLink};
use crate::modules::storage::StorageBackend;
use crate::modules::utils::logging::log_data_operation;
use crate::modules::utils::time::current_timestamp_millis;
use crate::LINKS_STORAGE_KEY;

/// Owns the persisted link collection stored under `LINKS_STORAGE_KEY`.
///
/// Reads never fail: an unavailable backend, missing key, unparseable text or
/// a single malformed record all load as an empty list. Writes are
/// best-effort and only logged on failure.
pub struct LinkStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> LinkStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load every saved link, all-or-nothing on shape validation
    pub fn load(&self) -> Vec<Link> {
        if !self.backend.is_available() {
            return Vec::new();
        }

        let raw = match self.backend.get(LINKS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to load links from storage: {}", e);
                return Vec::new();
            }
        };

        let parsed: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to load links from storage: {}", e);
                return Vec::new();
            }
        };

        // One bad element discards the whole collection
        match serde_json::from_value::<Vec<Link>>(parsed) {
            Ok(links) => links,
            Err(e) => {
                error!("Invalid data format in storage: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the stored collection; failures are logged, never returned
    pub fn save(&self, links: &[Link]) {
        if !self.backend.is_available() {
            log_data_operation("save_links", LINKS_STORAGE_KEY, false, Some("backend unavailable"));
            return;
        }

        let data = match serde_json::to_string(links) {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to serialize links: {}", e);
                return;
            }
        };

        match self.backend.set(LINKS_STORAGE_KEY, &data) {
            Ok(()) => debug!("Saved {} links", links.len()),
            Err(e) => {
                let details = e.to_string();
                log_data_operation("save_links", LINKS_STORAGE_KEY, false, Some(&details));
            }
        }
    }

    pub fn get_link(&self, id: &str) -> Option<Link> {
        self.load().into_iter().find(|link| link.id == id)
    }

    pub fn add_link(&self, new_link: NewLink) -> Link {
        self.add_link_at(new_link, current_timestamp_millis())
    }

    /// Append a link whose id is derived from `now_ms`
    pub fn add_link_at(&self, new_link: NewLink, now_ms: u64) -> Link {
        let mut links = self.load();
        let link = new_link.with_id(next_link_id(&links, now_ms));

        links.push(link.clone());
        self.save(&links);

        log_data_operation("add_link", &link.id, true, None);
        link
    }

    pub fn delete_link(&self, id: &str) {
        let mut links = self.load();
        let before = links.len();
        links.retain(|link| link.id != id);

        if links.len() == before {
            warn!("Delete requested for unknown link id {}", id);
        }
        self.save(&links);
        log_data_operation("delete_link", id, true, None);
    }

    /// Flip the favorite flag; unknown ids leave the collection untouched
    pub fn toggle_favorite(&self, id: &str) {
        let mut links = self.load();
        for link in links.iter_mut().filter(|link| link.id == id) {
            link.favorite = !link.favorite;
        }
        self.save(&links);
        log_data_operation("toggle_favorite", id, true, None);
    }

    /// Overwrite name and url of an existing link in place
    pub fn edit_link(&self, id: &str, name: &str, url: &str) -> Result<Link, LinkError> {
        let mut links = self.load();
        let link = match links.iter_mut().find(|link| link.id == id) {
            Some(link) => link,
            None => {
                log_data_operation("edit_link", id, false, Some("not found"));
                return Err(LinkError::NotFound(id.to_string()));
            }
        };

        link.name = name.to_string();
        link.url = url.to_string();
        let updated = link.clone();

        self.save(&links);
        log_data_operation("edit_link", id, true, None);
        Ok(updated)
    }
}

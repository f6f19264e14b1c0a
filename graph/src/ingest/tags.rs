//! Tag attachment: commit hash -> tags, local tags winning over remote.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::Tag;
use crate::port::RepositoryPort;

/// Map full commit hash to the tags pointing at it.
///
/// Remote tags are displayed with an `origin/` prefix but deduplicated
/// against local tags by bare name, so a tag pushed to the remote does not
/// show twice.
pub(crate) fn tag_map(port: &dyn RepositoryPort, include_remote: bool) -> HashMap<String, Vec<Tag>> {
    let mut map: HashMap<String, Vec<Tag>> = HashMap::new();

    match port.list_tags() {
        Ok(tags) => {
            for raw in tags {
                map.entry(raw.target_hash).or_default().push(Tag {
                    name: raw.name,
                    is_remote: false,
                    message: raw.message.unwrap_or_default(),
                });
            }
        }
        Err(e) => warn!(error = %e, "failed to list tags"),
    }

    if include_remote {
        match port.list_remote_tags() {
            Ok(tags) => {
                for raw in tags {
                    let entry = map.entry(raw.target_hash).or_default();
                    let already_local = entry.iter().any(|t| t.name == raw.name);
                    if !already_local {
                        entry.push(Tag {
                            name: format!("origin/{}", raw.name),
                            is_remote: true,
                            message: raw.message.unwrap_or_default(),
                        });
                    }
                }
            }
            Err(e) => debug!(error = %e, "no remote tags available"),
        }
    }

    map
}

//! Network: resolves link identifiers carried by events to links of the
//! transport network. Populated by the host scenario before event delivery
//! starts.

use std::collections::HashMap;
use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// A directed link of the transport network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
}

#[derive(Debug, Default, Resource)]
pub struct Network {
    links: HashMap<LinkId, Link>,
}

impl Network {
    pub fn insert(&mut self, link: Link) {
        self.links.insert(link.id, link);
    }

    /// Resolves a link identifier; `None` when the id is not part of the
    /// network.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

use shared::domain::{Server, ServerId};
use tracing::debug;

use crate::error::NotFoundError;

// `selected_id` is either unset or names a server present in `servers`.
#[derive(Debug, Clone, Default)]
pub struct ServerRegistry {
    servers: Vec<Server>,
    selected_id: Option<ServerId>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, servers: Vec<Server>) {
        for server in &servers {
            let metrics = &server.metrics;
            if metrics.memory.is_overcommitted() || metrics.storage.is_overcommitted() {
                debug!(server_id = %server.id, "server reports used above total");
            }
        }

        self.servers = servers;
        if let Some(selected) = &self.selected_id {
            if self.get(selected).is_none() {
                debug!(server_id = %selected, "selection cleared after refresh");
                self.selected_id = None;
            }
        }
    }

    pub fn select(&mut self, id: &ServerId) -> Result<&Server, NotFoundError> {
        let index = self
            .servers
            .iter()
            .position(|server| &server.id == id)
            .ok_or_else(|| NotFoundError { id: id.clone() })?;
        self.selected_id = Some(id.clone());
        Ok(&self.servers[index])
    }

    pub fn current(&self) -> Option<&Server> {
        self.selected_id.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &ServerId) -> Option<&Server> {
        self.servers.iter().find(|server| &server.id == id)
    }

    pub fn selected_id(&self) -> Option<&ServerId> {
        self.selected_id.as_ref()
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;

use super::traits::SiteAdapter;
use crate::listing::JobBoard;

/// Registry of site adapters, one per board.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Register an adapter, replacing any earlier one for the same board.
    pub fn register(&mut self, adapter: Box<dyn SiteAdapter>) {
        let board = adapter.board();
        self.adapters.retain(|a| a.board() != board);
        self.adapters.push(adapter);
    }

    /// Find the adapter for a board.
    #[must_use]
    pub fn find(&self, board: JobBoard) -> Option<&dyn SiteAdapter> {
        self.adapters
            .iter()
            .find(|a| a.board() == board)
            .map(AsRef::as_ref)
    }

    /// Get all registered adapters.
    #[must_use]
    pub fn adapters(&self) -> &[Box<dyn SiteAdapter>] {
        &self.adapters
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

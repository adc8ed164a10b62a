//! Node source trait

use crate::error::SourceError;
use crate::types::Node;

/// Supplies the candidate nodes for matching and picking
///
/// Implementations return nodes sorted by case-insensitive name. The order
/// is the tie-break for the matcher, so it must not depend on discovery
/// timing or storage order.
pub trait NodeSource {
    /// Short name used in log lines and error messages
    fn kind(&self) -> &'static str;

    /// Read the current node set
    fn load(&self) -> Result<Vec<Node>, SourceError>;

    /// Store a new node durably
    fn append(&self, node: &Node) -> Result<(), SourceError>;

    /// Like [`load`](Self::load), but an absent source is an empty set
    fn load_or_empty(&self) -> Result<Vec<Node>, SourceError> {
        match self.load() {
            Err(SourceError::NoConfig(path)) => {
                tracing::debug!("No {} source at {:?}, starting empty", self.kind(), path);
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

//! Link storage for the graph.
//!
//! A link always lives on its output end: [`LinkTable`] maps each linked
//! output to the input it feeds. Several outputs may feed the same input, so
//! the reverse index maps an input to the set of outputs pointing at it. The
//! reverse index is maintained on every mutation and is never the source of
//! truth; it only saves a scan over every output in the graph.

use std::collections::{HashMap, HashSet};

use crate::id::ConnectionId;

#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    /// output -> input
    forward: HashMap<ConnectionId, ConnectionId>,
    /// input -> outputs
    reverse: HashMap<ConnectionId, HashSet<ConnectionId>>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `output` at `input`, replacing any previous target of `output`.
    ///
    /// Callers are responsible for checking sides and owners.
    pub fn link(&mut self, output: ConnectionId, input: ConnectionId) {
        self.unlink_output(output);
        self.forward.insert(output, input);
        self.reverse.entry(input).or_default().insert(output);
    }

    /// Drop the link stored on `output`. Returns the input it pointed at.
    pub fn unlink_output(&mut self, output: ConnectionId) -> Option<ConnectionId> {
        let input = self.forward.remove(&output)?;
        if let Some(sources) = self.reverse.get_mut(&input) {
            sources.remove(&output);
            if sources.is_empty() {
                self.reverse.remove(&input);
            }
        }
        Some(input)
    }

    /// Drop every link that targets `input`. Returns the outputs that were cleared.
    pub fn unlink_input(&mut self, input: ConnectionId) -> Vec<ConnectionId> {
        let sources = self.reverse.remove(&input).unwrap_or_default();
        for output in &sources {
            self.forward.remove(output);
        }
        sources.into_iter().collect()
    }

    /// The input an output is linked to.
    pub fn target(&self, output: ConnectionId) -> Option<ConnectionId> {
        self.forward.get(&output).copied()
    }

    /// Every output linked to `input`.
    pub fn sources(&self, input: ConnectionId) -> impl Iterator<Item = ConnectionId> + '_ {
        self.reverse.get(&input).into_iter().flatten().copied()
    }

    pub fn is_linked(&self, connection: ConnectionId) -> bool {
        self.forward.contains_key(&connection) || self.reverse.contains_key(&connection)
    }

    /// All `(output, input)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, ConnectionId)> + '_ {
        self.forward.iter().map(|(&output, &input)| (output, input))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_and_target() {
        let mut links = LinkTable::new();
        let (out, inp) = (ConnectionId::new(), ConnectionId::new());

        links.link(out, inp);
        assert_eq!(links.target(out), Some(inp));
        assert_eq!(links.target(inp), None);
        assert_eq!(links.sources(inp).collect::<Vec<_>>(), vec![out]);
        assert!(links.is_linked(out));
        assert!(links.is_linked(inp));
    }

    #[test]
    fn test_relink_replaces_previous_target() {
        let mut links = LinkTable::new();
        let (out, a, b) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

        links.link(out, a);
        links.link(out, b);

        assert_eq!(links.target(out), Some(b));
        assert_eq!(links.sources(a).count(), 0);
        assert!(!links.is_linked(a));
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_many_outputs_can_feed_one_input() {
        let mut links = LinkTable::new();
        let (o1, o2, inp) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

        links.link(o1, inp);
        links.link(o2, inp);

        let mut sources: Vec<_> = links.sources(inp).collect();
        sources.sort();
        let mut expected = vec![o1, o2];
        expected.sort();
        assert_eq!(sources, expected);
    }

    #[test]
    fn test_unlink_output_keeps_other_sources() {
        let mut links = LinkTable::new();
        let (o1, o2, inp) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        links.link(o1, inp);
        links.link(o2, inp);

        assert_eq!(links.unlink_output(o1), Some(inp));
        assert_eq!(links.sources(inp).collect::<Vec<_>>(), vec![o2]);
        assert_eq!(links.unlink_output(o1), None);
    }

    #[test]
    fn test_unlink_input_clears_every_source() {
        let mut links = LinkTable::new();
        let (o1, o2, inp) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        links.link(o1, inp);
        links.link(o2, inp);

        let cleared = links.unlink_input(inp);
        assert_eq!(cleared.len(), 2);
        assert!(links.is_empty());
        assert_eq!(links.target(o1), None);
        assert_eq!(links.target(o2), None);
    }

    #[test]
    fn test_unlink_unlinked_input_is_noop() {
        let mut links = LinkTable::new();
        assert!(links.unlink_input(ConnectionId::new()).is_empty());
    }
}

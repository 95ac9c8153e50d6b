use alloc::vec::Vec;

/// Interaction handle ↔ grabbed data index.
///
/// Expected cardinality is tiny (one entry per input device), so lookups are linear scans.
#[derive(Clone, Debug)]
pub(crate) struct GrabTracker<Ix, G> {
    rows: Vec<(Ix, G)>,
}

impl<Ix: PartialEq, G: PartialEq> GrabTracker<Ix, G> {
    pub(crate) fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// `grabbed == true` binds `handle` to `index`, replacing whatever either side held before.
    /// `grabbed == false` forgets the grab on `index`.
    pub(crate) fn set(&mut self, index: Ix, handle: G, grabbed: bool) {
        if grabbed {
            self.rows.retain(|(ix, h)| *h != handle && *ix != index);
            self.rows.push((index, handle));
        } else {
            self.rows.retain(|(ix, _)| *ix != index);
        }
    }

    pub(crate) fn index_for(&self, handle: &G) -> Option<&Ix> {
        self.rows
            .iter()
            .find(|(_, h)| h == handle)
            .map(|(ix, _)| ix)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

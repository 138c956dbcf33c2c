use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{CentralityError, Result};
use crate::graph::{VertexId, VertexIndex};

/// Bidirectional index between external vertex ids and dense internal indices.
///
/// Built once per graph. Keys are unique: registering the same id twice via
/// `insert_unique` fails, so a lookup can never be ambiguous.
#[derive(Debug, Clone, Default)]
pub struct RenumberMap {
    to_index: HashMap<VertexId, VertexIndex>,
    to_id: Vec<VertexId>,
}

impl RenumberMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            to_index: HashMap::with_capacity(vertex_count),
            to_id: Vec::with_capacity(vertex_count),
        }
    }

    /// Build a map from an explicit vertex list. Duplicates are rejected.
    pub fn from_ids<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = VertexId>,
    {
        let ids = ids.into_iter();
        let mut map = Self::with_capacity(ids.size_hint().0);
        for id in ids {
            map.insert_unique(id)?;
        }
        Ok(map)
    }

    /// Register a new id. Fails with `DuplicateVertex` if it is already mapped.
    pub fn insert_unique(&mut self, id: VertexId) -> Result<VertexIndex> {
        let next = self.next_index()?;
        match self.to_index.entry(id) {
            Entry::Occupied(_) => Err(CentralityError::DuplicateVertex(id)),
            Entry::Vacant(slot) => {
                slot.insert(next);
                self.to_id.push(id);
                Ok(next)
            }
        }
    }

    /// Return the index for `id`, assigning the next free index if unseen.
    pub fn get_or_insert(&mut self, id: VertexId) -> Result<VertexIndex> {
        if let Some(&idx) = self.to_index.get(&id) {
            return Ok(idx);
        }
        self.insert_unique(id)
    }

    pub fn index_of(&self, id: VertexId) -> Option<VertexIndex> {
        self.to_index.get(&id).copied()
    }

    pub fn id_of(&self, index: VertexIndex) -> Option<VertexId> {
        self.to_id.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_id.is_empty()
    }

    fn next_index(&self) -> Result<VertexIndex> {
        VertexIndex::try_from(self.to_id.len()).map_err(|_| {
            CentralityError::InvalidArgument(format!(
                "graph exceeds {} vertices",
                VertexIndex::MAX
            ))
        })
    }
}

/// How external ids relate to internal indices for one graph.
#[derive(Debug, Clone)]
pub enum Renumbering {
    /// Ids are already dense: id `i` is index `i`.
    Identity { vertex_count: usize },
    /// Ids are sparse or arbitrary and go through a hash index.
    Map(RenumberMap),
}

impl Renumbering {
    pub fn vertex_count(&self) -> usize {
        match self {
            Renumbering::Identity { vertex_count } => *vertex_count,
            Renumbering::Map(map) => map.len(),
        }
    }

    pub fn is_renumbered(&self) -> bool {
        matches!(self, Renumbering::Map(_))
    }

    /// Look up the internal index of one external id.
    pub fn index_of(&self, id: VertexId) -> Result<VertexIndex> {
        match self {
            Renumbering::Identity { vertex_count } => {
                if (id as u128) < (*vertex_count as u128) {
                    Ok(id as VertexIndex)
                } else {
                    Err(CentralityError::NotFound(id))
                }
            }
            Renumbering::Map(map) => map.index_of(id).ok_or(CentralityError::NotFound(id)),
        }
    }

    /// External id for an internal index. Panics on an out-of-range index,
    /// which would mean a corrupted graph.
    pub fn external_id(&self, index: VertexIndex) -> VertexId {
        match self {
            Renumbering::Identity { .. } => index as VertexId,
            Renumbering::Map(map) => map.to_id[index as usize],
        }
    }

    /// Translate caller-supplied ids, preserving order and length.
    ///
    /// Repeated ids in `ids` are kept; each occurrence becomes one source.
    pub fn translate(&self, ids: &[VertexId]) -> Result<Vec<VertexIndex>> {
        ids.iter().map(|&id| self.index_of(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_assigns_dense_indices() {
        let map = RenumberMap::from_ids([100, 7, 42]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of(100), Some(0));
        assert_eq!(map.index_of(7), Some(1));
        assert_eq!(map.index_of(42), Some(2));
        assert_eq!(map.id_of(2), Some(42));
        assert_eq!(map.id_of(3), None);
    }

    #[test]
    fn test_map_rejects_duplicates() {
        let err = RenumberMap::from_ids([1, 2, 1]).unwrap_err();
        assert_eq!(err, CentralityError::DuplicateVertex(1));
    }

    #[test]
    fn test_get_or_insert_is_idempotent() {
        let mut map = RenumberMap::new();
        assert_eq!(map.get_or_insert(9).unwrap(), 0);
        assert_eq!(map.get_or_insert(3).unwrap(), 1);
        assert_eq!(map.get_or_insert(9).unwrap(), 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_identity_translate() {
        let r = Renumbering::Identity { vertex_count: 5 };
        assert_eq!(r.translate(&[4, 0, 2]).unwrap(), vec![4, 0, 2]);
        assert_eq!(r.external_id(3), 3);
        assert!(!r.is_renumbered());
    }

    #[test]
    fn test_identity_out_of_range() {
        let r = Renumbering::Identity { vertex_count: 5 };
        assert_eq!(r.translate(&[1, 5]).unwrap_err(), CentralityError::NotFound(5));
    }

    #[test]
    fn test_map_translate_preserves_order_and_repeats() {
        let r = Renumbering::Map(RenumberMap::from_ids([10, 20, 30]).unwrap());
        assert_eq!(r.translate(&[30, 10, 30]).unwrap(), vec![2, 0, 2]);
        assert_eq!(r.external_id(1), 20);
    }

    #[test]
    fn test_map_translate_missing() {
        let r = Renumbering::Map(RenumberMap::from_ids([10, 20]).unwrap());
        assert_eq!(r.translate(&[10, 15]).unwrap_err(), CentralityError::NotFound(15));
    }
}

//! Designation manager: queued player orders keyed by kind and anchor.

use std::collections::BTreeMap;

use cellwise_core::{DesignationAnchor, DesignationId, DesignationSnapshot, OrderKind, ThingId};

#[derive(Debug, Default)]
pub(crate) struct DesignationRegistry {
    entries: BTreeMap<DesignationId, DesignationSnapshot>,
    next_designation_id: u32,
}

impl DesignationRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn find(&self, kind: OrderKind, anchor: DesignationAnchor) -> Option<DesignationId> {
        self.entries
            .values()
            .find(|entry| entry.kind == kind && entry.anchor == anchor)
            .map(|entry| entry.id)
    }

    pub(crate) fn insert(&mut self, kind: OrderKind, anchor: DesignationAnchor) -> DesignationId {
        let id = DesignationId::new(self.next_designation_id);
        self.next_designation_id = self.next_designation_id.saturating_add(1);
        let _ = self
            .entries
            .insert(id, DesignationSnapshot { id, kind, anchor });
        id
    }

    pub(crate) fn remove(&mut self, id: DesignationId) -> Option<DesignationSnapshot> {
        self.entries.remove(&id)
    }

    /// Drops every designation attached to the thing, returning their identifiers.
    pub(crate) fn remove_for_thing(&mut self, thing: ThingId) -> Vec<DesignationId> {
        let doomed: Vec<DesignationId> = self
            .entries
            .values()
            .filter(|entry| entry.anchor == DesignationAnchor::Thing(thing))
            .map(|entry| entry.id)
            .collect();
        for id in &doomed {
            let _ = self.entries.remove(id);
        }
        doomed
    }

    pub(crate) fn get(&self, id: DesignationId) -> Option<DesignationSnapshot> {
        self.entries.get(&id).copied()
    }

    pub(crate) fn all(&self) -> Vec<DesignationSnapshot> {
        self.entries.values().copied().collect()
    }
}

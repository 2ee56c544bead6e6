//! Two-corner placement state machine.

use cellwise_core::{
    Announcer, BlockedCell, Cell, HostMap, PlacementResult, Priority, Rotation, Settings,
    ShapeKind,
};
use cellwise_system_announcement::{
    capitalize, enter_announcement, first_corner_announcement, preview_announcement, rotation_announcement,
    second_corner_announcement, shape_announcement,
};
use cellwise_system_preview::{PreviewChange, ShapePreview};
use cellwise_system_undo::{UndoLedger, UndoTracker};
use tracing::{debug, warn};

use crate::target::{Acceptance, DesignationTarget};

const OFF_MAP: &str = "Selection is off the map.";

/// Phase of the placement state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementPhase {
    /// No session is running.
    Inactive,
    /// Waiting for the first corner, or for a manual placement.
    SettingFirstCorner,
    /// First corner anchored; the cursor drives the preview.
    SettingSecondCorner,
    /// Both corners fixed; waiting for confirmation.
    Previewing,
}

/// Drives a shape selection from the first corner to a confirmed placement.
#[derive(Clone, Debug)]
pub struct PlacementEngine {
    phase: PlacementPhase,
    target: Option<DesignationTarget>,
    preview: ShapePreview,
    settings: Settings,
}

impl PlacementEngine {
    /// Creates an inactive engine.
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self {
            phase: PlacementPhase::Inactive,
            target: None,
            preview: ShapePreview::new(ShapeKind::Manual),
            settings,
        }
    }

    /// Starts a selection for `target`.
    ///
    /// Shapes the target does not offer fall back to its first offered shape.
    pub fn enter(
        &mut self,
        target: DesignationTarget,
        shape: ShapeKind,
        announcer: &mut dyn Announcer,
    ) {
        let offered = target.available_shapes();
        let shape = if offered.contains(&shape) {
            shape
        } else {
            offered.first().copied().unwrap_or(ShapeKind::Manual)
        };
        announcer.speak(&enter_announcement(&target.label(), shape), Priority::Normal);
        debug!(label = %target.label(), %shape, "placement entered");
        self.preview.set_shape(shape);
        self.target = Some(target);
        self.phase = PlacementPhase::SettingFirstCorner;
    }

    /// Anchors the selection. Ignored outside [`PlacementPhase::SettingFirstCorner`]
    /// and for the manual shape.
    pub fn set_first_corner(&mut self, cell: Cell, announcer: &mut dyn Announcer) -> bool {
        if self.phase != PlacementPhase::SettingFirstCorner || !self.shape().is_two_point() {
            return false;
        }
        self.preview.set_first_corner(cell);
        self.phase = PlacementPhase::SettingSecondCorner;
        announcer.speak(&first_corner_announcement(cell), Priority::Normal);
        debug!(%cell, "first corner set");
        true
    }

    /// Moves the free corner to `cursor`.
    ///
    /// Live dimensions are spoken at low priority, and only when the number
    /// of covered cells changes.
    pub fn update_preview(
        &mut self,
        cursor: Cell,
        announcer: &mut dyn Announcer,
    ) -> Option<PreviewChange> {
        if self.phase != PlacementPhase::SettingSecondCorner {
            return None;
        }
        let change = self.preview.update(cursor)?;
        if self.settings.announce_preview {
            announcer.speak(
                &preview_announcement(change.width, change.height),
                Priority::Low,
            );
        }
        Some(change)
    }

    /// Fixes the second corner and moves to [`PlacementPhase::Previewing`].
    pub fn set_second_corner(&mut self, cell: Cell, announcer: &mut dyn Announcer) -> bool {
        if self.phase != PlacementPhase::SettingSecondCorner {
            return false;
        }
        let Some(count) = self.preview.set_second_corner(cell).map(<[Cell]>::len) else {
            return false;
        };
        let size = self.preview.size_label().unwrap_or_default();
        announcer.speak(&second_corner_announcement(&size, count), Priority::Normal);
        self.phase = PlacementPhase::Previewing;
        debug!(%cell, cells = count, "second corner set");
        true
    }

    /// Places the previewed cells and returns to [`PlacementPhase::Inactive`].
    ///
    /// `Inactive` after a confirmation means "between segments": the target
    /// is kept so that [`PlacementEngine::restart`] can begin another one.
    /// A corner off the map aborts the placement with an empty result.
    pub fn confirm<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        ledger: Option<&mut UndoLedger>,
    ) -> PlacementResult
    where
        H: HostMap + ?Sized,
    {
        if self.phase != PlacementPhase::Previewing {
            announcer.speak("Nothing selected.", Priority::High);
            return PlacementResult::empty();
        }
        let corners = [self.preview.first_corner(), self.preview.second_corner()];
        if corners.into_iter().flatten().any(|corner| !host.in_bounds(corner)) {
            announcer.speak(OFF_MAP, Priority::High);
            self.preview.clear();
            self.phase = PlacementPhase::SettingFirstCorner;
            return PlacementResult::empty();
        }
        let result = self.place_designations(host, announcer, ledger);
        self.preview.clear();
        self.phase = PlacementPhase::Inactive;
        result
    }

    /// Applies the target to every previewed cell.
    pub fn place_designations<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        ledger: Option<&mut UndoLedger>,
    ) -> PlacementResult
    where
        H: HostMap + ?Sized,
    {
        let cells = self.preview.cells().to_vec();
        self.place_cells(host, announcer, &cells, ledger)
    }

    /// Applies the target to `cells`, one undo segment for the whole call.
    ///
    /// Zone targets filter the cells and submit one batch; every other target
    /// goes cell by cell. A refused or failing cell is recorded as blocked and
    /// never stops the rest. Cells off the map are a caller error: nothing is
    /// placed, no undo segment is opened and the failure is spoken once.
    pub fn place_cells<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        cells: &[Cell],
        mut ledger: Option<&mut UndoLedger>,
    ) -> PlacementResult
    where
        H: HostMap + ?Sized,
    {
        let Some(target) = self.target.as_mut() else {
            announcer.speak("No placement target.", Priority::High);
            return PlacementResult::empty();
        };
        if let Some(cell) = cells.iter().find(|cell| !host.in_bounds(**cell)) {
            warn!(%cell, "placement requested off the map");
            announcer.speak(OFF_MAP, Priority::High);
            return PlacementResult::empty();
        }

        if let Some(ledger) = ledger.as_deref_mut() {
            ledger.capture_before_state(&*host);
        }

        let mut placed = Vec::new();
        let mut blocked = Vec::new();
        let mut created = Vec::new();

        if target.is_batched() {
            let mut accepted = Vec::new();
            for cell in cells {
                match target.can_apply(&*host, *cell) {
                    Acceptance::Accepted => accepted.push(*cell),
                    Acceptance::Rejected(reason) => blocked.push(BlockedCell {
                        cell: *cell,
                        reason,
                    }),
                }
            }
            if !accepted.is_empty() {
                match target.apply_batch(host, &accepted) {
                    Ok(outcome) => {
                        placed = outcome.applied;
                        blocked.extend(outcome.rejected);
                    }
                    Err(error) => {
                        warn!(%error, cells = accepted.len(), "batch designation failed");
                        let reason = error.blocker_label();
                        blocked.extend(accepted.into_iter().map(|cell| BlockedCell {
                            cell,
                            reason: reason.clone(),
                        }));
                    }
                }
            }
        } else {
            for cell in cells {
                if let Acceptance::Rejected(reason) = target.can_apply(&*host, *cell) {
                    blocked.push(BlockedCell {
                        cell: *cell,
                        reason,
                    });
                    continue;
                }
                match target.apply(host, *cell) {
                    Ok(thing) => {
                        placed.push(*cell);
                        if let Some(thing) = thing {
                            created.push(thing);
                            if let Some(ledger) = ledger.as_deref_mut() {
                                ledger.record_created(thing);
                            }
                        }
                    }
                    Err(error) => {
                        warn!(%cell, %error, "designation failed");
                        blocked.push(BlockedCell {
                            cell: *cell,
                            reason: error.blocker_label(),
                        });
                    }
                }
            }
        }

        if !placed.is_empty() {
            target.finalize(host);
        }

        if let Some(ledger) = ledger {
            ledger.capture_after_state(&*host);
            let _ = ledger.add_segment();
        }

        let (total_cost, resource_label) = match target.unit_cost() {
            Some((per_unit, label)) => {
                let units = u32::try_from(placed.len()).unwrap_or(u32::MAX);
                (per_unit.saturating_mul(units), Some(label.to_owned()))
            }
            None => (0, None),
        };

        debug!(
            placed = placed.len(),
            blocked = blocked.len(),
            total_cost,
            "placement applied"
        );
        PlacementResult::new(placed, blocked, total_cost, resource_label, created)
    }

    /// Places the target at `cell` when the manual shape is active.
    pub fn place_single<H>(
        &mut self,
        host: &mut H,
        cell: Cell,
        announcer: &mut dyn Announcer,
        ledger: Option<&mut UndoLedger>,
    ) -> Option<PlacementResult>
    where
        H: HostMap + ?Sized,
    {
        if self.phase != PlacementPhase::SettingFirstCorner || self.shape().is_two_point() {
            return None;
        }
        Some(self.place_cells(host, announcer, &[cell], ledger))
    }

    /// Drops any corners and waits for a new first corner.
    pub fn clear_selection_and_stay(&mut self, announcer: &mut dyn Announcer) {
        if self.target.is_none() {
            return;
        }
        self.preview.clear();
        self.phase = PlacementPhase::SettingFirstCorner;
        announcer.speak("Selection cleared.", Priority::Normal);
    }

    /// Begins another segment with the same target and shape.
    pub fn restart(&mut self, announcer: &mut dyn Announcer) {
        let Some(target) = &self.target else {
            return;
        };
        announcer.speak(
            &enter_announcement(&target.label(), self.shape()),
            Priority::Normal,
        );
        self.preview.clear();
        self.phase = PlacementPhase::SettingFirstCorner;
    }

    /// Leaves placement, announcing it.
    pub fn cancel(&mut self, announcer: &mut dyn Announcer) {
        if self.target.is_some() {
            announcer.speak("Placement cancelled.", Priority::Normal);
        }
        self.reset();
    }

    /// Leaves placement silently.
    pub fn reset(&mut self) {
        debug!("placement reset");
        self.target = None;
        self.preview.clear();
        self.phase = PlacementPhase::Inactive;
    }

    /// Steps to the next or previous offered shape. Only between selections.
    pub fn cycle_shape(
        &mut self,
        forward: bool,
        announcer: &mut dyn Announcer,
    ) -> Option<ShapeKind> {
        if self.phase != PlacementPhase::SettingFirstCorner {
            return None;
        }
        let offered = self.target.as_ref()?.available_shapes();
        if offered.len() < 2 {
            announcer.speak(&shape_announcement(self.shape()), Priority::Normal);
            return None;
        }
        let current = offered
            .iter()
            .position(|shape| *shape == self.shape())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % offered.len()
        } else {
            (current + offered.len() - 1) % offered.len()
        };
        let shape = offered[next];
        self.preview.set_shape(shape);
        announcer.speak(&shape_announcement(shape), Priority::Normal);
        Some(shape)
    }

    /// Turns a rotatable placeable a quarter turn.
    pub fn rotate(&mut self, clockwise: bool, announcer: &mut dyn Announcer) -> Option<Rotation> {
        let target = self.target.as_mut()?;
        match target.rotate(clockwise) {
            Some(rotation) => {
                announcer.speak(&rotation_announcement(rotation), Priority::Normal);
                Some(rotation)
            }
            None => {
                announcer.speak(
                    &format!("{} cannot be rotated.", capitalize(&target.label())),
                    Priority::Normal,
                );
                None
            }
        }
    }

    /// Reports whether a selection is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != PlacementPhase::Inactive
    }

    /// Reports whether a target is loaded, including between segments.
    #[must_use]
    pub const fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PlacementPhase {
        self.phase
    }

    /// Active selection shape.
    #[must_use]
    pub const fn shape(&self) -> ShapeKind {
        self.preview.shape()
    }

    /// Cells covered by the current selection.
    #[must_use]
    pub fn preview_cells(&self) -> &[Cell] {
        self.preview.cells()
    }

    /// Loaded target.
    #[must_use]
    pub const fn target(&self) -> Option<&DesignationTarget> {
        self.target.as_ref()
    }

    /// Tunables in use.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }
}

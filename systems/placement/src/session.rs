//! Keyboard-driven placement session: engine, undo ledger and review together.

use cellwise_core::{
    Announcer, Cell, Enclosure, HostMap, MapView, PlacementResult, Priority, Settings, ShapeKind,
};
use cellwise_system_announcement::{
    confirm_announcement, count_phrase, enclosure_summary, placement_summary, review_hint, undo_all_summary,
    undo_summary,
};
use cellwise_system_enclosure::EnclosureDetector;
use cellwise_system_undo::{UndoLedger, UndoTracker};
use tracing::debug;

use crate::{
    engine::{PlacementEngine, PlacementPhase},
    input::{Key, KeyPress},
    review::ReviewSession,
    target::DesignationTarget,
};

/// One open placement session for a single target.
///
/// The session owns the cursor. Every confirmed placement becomes an undo
/// segment; segments accumulate until the player confirms them all with
/// Enter or rolls them all back with Escape from the review.
#[derive(Clone, Debug)]
pub struct PlacementSession {
    engine: PlacementEngine,
    ledger: UndoLedger,
    review: Option<ReviewSession>,
    cursor: Cell,
    placed_segments: Vec<PlacementResult>,
    redo: Vec<Vec<Cell>>,
    open: bool,
}

impl PlacementSession {
    /// Opens a session and announces the target.
    pub fn new<M>(
        map: &M,
        target: DesignationTarget,
        shape: ShapeKind,
        settings: Settings,
        cursor: Cell,
        announcer: &mut dyn Announcer,
    ) -> Self
    where
        M: MapView + ?Sized,
    {
        let ledger = UndoLedger::new(target.ledger_kind());
        let mut engine = PlacementEngine::new(settings);
        engine.enter(target, shape, announcer);
        Self {
            engine,
            ledger,
            review: None,
            cursor: map.bounds().clamp(cursor),
            placed_segments: Vec::new(),
            redo: Vec::new(),
            open: true,
        }
    }

    /// Reports whether the session still accepts keys.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Cell under the cursor.
    #[must_use]
    pub const fn cursor(&self) -> Cell {
        self.cursor
    }

    /// Placement state machine.
    #[must_use]
    pub const fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// Review in progress, if any.
    #[must_use]
    pub const fn review(&self) -> Option<&ReviewSession> {
        self.review.as_ref()
    }

    /// Undo segments currently on the stack.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.ledger.segment_count()
    }

    /// Undone segments waiting to be redone.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    /// Dispatches one key press. Returns whether the session consumed it.
    pub fn handle_key<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        press: KeyPress,
    ) -> bool
    where
        H: HostMap + ?Sized,
    {
        if !self.open {
            return false;
        }
        debug!(key = %press, phase = ?self.engine.phase(), reviewing = self.review.is_some(), "key");
        if self.review.is_some() {
            self.handle_review_key(host, announcer, press)
        } else {
            self.handle_placement_key(host, announcer, press)
        }
    }

    fn handle_placement_key<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        press: KeyPress,
    ) -> bool
    where
        H: HostMap + ?Sized,
    {
        let phase = self.engine.phase();
        let ctrl = press.modifiers.ctrl;
        match press.key {
            Key::Up | Key::Down | Key::Left | Key::Right => {
                self.move_cursor(&*host, press.key);
                if phase == PlacementPhase::SettingSecondCorner {
                    let _ = self.engine.update_preview(self.cursor, announcer);
                } else {
                    announcer.speak(&describe_cell(&*host, self.cursor), Priority::Low);
                }
                true
            }
            Key::Space if !ctrl => {
                if !self.engine.shape().is_two_point() {
                    self.place_here(host, announcer);
                    return true;
                }
                match phase {
                    PlacementPhase::SettingFirstCorner => {
                        self.engine.set_first_corner(self.cursor, announcer)
                    }
                    PlacementPhase::SettingSecondCorner => {
                        self.engine.set_second_corner(self.cursor, announcer)
                    }
                    PlacementPhase::Previewing => {
                        self.confirm_selection(host, announcer);
                        true
                    }
                    PlacementPhase::Inactive => false,
                }
            }
            Key::Enter if !ctrl => match phase {
                PlacementPhase::Previewing => {
                    self.confirm_selection(host, announcer);
                    true
                }
                PlacementPhase::SettingSecondCorner => {
                    if self.engine.set_second_corner(self.cursor, announcer) {
                        self.confirm_selection(host, announcer);
                    }
                    true
                }
                PlacementPhase::SettingFirstCorner => {
                    self.finish(announcer);
                    true
                }
                PlacementPhase::Inactive => false,
            },
            Key::Escape => {
                if phase == PlacementPhase::SettingFirstCorner {
                    announcer.speak(
                        &format!(
                            "Placement closed. {} kept.",
                            count_phrase(self.ledger.segment_count(), "segment")
                        ),
                        Priority::Normal,
                    );
                    self.close();
                } else {
                    self.engine.clear_selection_and_stay(announcer);
                }
                true
            }
            Key::Tab if !ctrl => self
                .engine
                .cycle_shape(!press.modifiers.shift, announcer)
                .is_some(),
            Key::R if !ctrl => {
                let _ = self.engine.rotate(!press.modifiers.shift, announcer);
                true
            }
            Key::Z if ctrl && phase == PlacementPhase::SettingFirstCorner => {
                self.undo_last(host, announcer);
                true
            }
            Key::Y if ctrl && phase == PlacementPhase::SettingFirstCorner => {
                self.redo_last(host, announcer, false);
                true
            }
            _ => false,
        }
    }

    fn handle_review_key<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        press: KeyPress,
    ) -> bool
    where
        H: HostMap + ?Sized,
    {
        let shift = press.modifiers.shift;
        let ctrl = press.modifiers.ctrl;
        match press.key {
            Key::Tab | Key::N | Key::P if !ctrl => {
                let forward = match press.key {
                    Key::Tab => !shift,
                    key => key == Key::N,
                };
                if let Some(review) = self.review.as_mut() {
                    let _ = if forward {
                        review.next_obstacle(announcer)
                    } else {
                        review.previous_obstacle(announcer)
                    };
                }
                true
            }
            Key::Z if ctrl => {
                self.undo_last(host, announcer);
                match self.placed_segments.last().cloned() {
                    Some(result) => {
                        let enclosures = self.detect_enclosures(&*host, &result);
                        self.review =
                            Some(ReviewSession::new(&*host, result, enclosures, self.cursor));
                    }
                    None => {
                        self.review = None;
                        self.engine.restart(announcer);
                    }
                }
                true
            }
            Key::Y if ctrl => {
                self.redo_last(host, announcer, true);
                true
            }
            Key::Space if !ctrl => {
                self.review = None;
                self.engine.restart(announcer);
                true
            }
            Key::Enter if !ctrl => {
                self.finish(announcer);
                true
            }
            Key::Escape => {
                let noun = self.noun();
                let report = self.ledger.undo_all(host);
                announcer.speak(&undo_all_summary(&report, &noun), Priority::Normal);
                self.close();
                true
            }
            Key::Up | Key::Down | Key::Left | Key::Right => {
                self.move_cursor(&*host, press.key);
                announcer.speak(&describe_cell(&*host, self.cursor), Priority::Low);
                true
            }
            _ => false,
        }
    }

    fn move_cursor<M>(&mut self, map: &M, key: Key)
    where
        M: MapView + ?Sized,
    {
        if let Some((dx, dz)) = key.direction() {
            self.cursor = map.bounds().clamp(self.cursor.offset(dx, dz));
        }
    }

    fn place_here<H>(&mut self, host: &mut H, announcer: &mut dyn Announcer)
    where
        H: HostMap + ?Sized,
    {
        let before = self.ledger.segment_count();
        if let Some(result) =
            self.engine
                .place_single(host, self.cursor, announcer, Some(&mut self.ledger))
        {
            self.after_placement(host, announcer, result, before, false, false);
        }
    }

    fn confirm_selection<H>(&mut self, host: &mut H, announcer: &mut dyn Announcer)
    where
        H: HostMap + ?Sized,
    {
        let before = self.ledger.segment_count();
        let result = self.engine.confirm(host, announcer, Some(&mut self.ledger));
        self.after_placement(host, announcer, result, before, false, true);
    }

    /// Announces a placement, detects sealed rooms and optionally opens a review.
    fn after_placement<H>(
        &mut self,
        host: &mut H,
        announcer: &mut dyn Announcer,
        result: PlacementResult,
        segments_before: usize,
        redoing: bool,
        review: bool,
    ) where
        H: HostMap + ?Sized,
    {
        if self.ledger.segment_count() > segments_before {
            self.placed_segments.push(result.clone());
            if !redoing {
                self.redo.clear();
            }
        }

        let Some(target) = self.engine.target() else {
            return;
        };
        let settings = self.engine.settings();
        announcer.speak(
            &placement_summary(
                &result,
                target.verb(),
                &target.noun(),
                settings.obstacle_group_limit,
            ),
            Priority::Normal,
        );

        let enclosures = self.detect_enclosures(&*host, &result);
        if let Some(summary) = enclosure_summary(
            &enclosures,
            settings.obstacle_group_limit,
            settings.gap_listing_limit,
        ) {
            announcer.speak(&summary, Priority::Normal);
        }

        if review {
            let session = ReviewSession::new(&*host, result, enclosures, self.cursor);
            announcer.speak(&review_hint(session.obstacles().len()), Priority::Normal);
            self.review = Some(session);
        }
    }

    /// Rooms sealed by the walls a placement created.
    fn detect_enclosures<M>(&self, map: &M, result: &PlacementResult) -> Vec<Enclosure>
    where
        M: MapView + ?Sized,
    {
        let walls = self.engine.target().is_some_and(DesignationTarget::is_wall_type);
        if !walls || result.created_things().is_empty() {
            return Vec::new();
        }
        let failed: Vec<Cell> = result.obstacle_cells().collect();
        EnclosureDetector::from_settings(self.engine.settings()).detect(
            map,
            result.created_things(),
            &failed,
        )
    }

    fn undo_last<H>(&mut self, host: &mut H, announcer: &mut dyn Announcer)
    where
        H: HostMap + ?Sized,
    {
        let noun = self.noun();
        match self.ledger.undo_last_segment(host) {
            Some(report) => {
                if let Some(result) = self.placed_segments.pop() {
                    self.redo.push(result.placed_cells().to_vec());
                }
                announcer.speak(
                    &undo_summary(&report, &noun, self.ledger.segment_count()),
                    Priority::Normal,
                );
            }
            None => announcer.speak("Nothing to undo.", Priority::Normal),
        }
    }

    fn redo_last<H>(&mut self, host: &mut H, announcer: &mut dyn Announcer, review: bool)
    where
        H: HostMap + ?Sized,
    {
        let Some(cells) = self.redo.pop() else {
            announcer.speak("Nothing to redo.", Priority::Normal);
            return;
        };
        let before = self.ledger.segment_count();
        let result = self
            .engine
            .place_cells(host, announcer, &cells, Some(&mut self.ledger));
        self.after_placement(host, announcer, result, before, true, review);
    }

    fn finish(&mut self, announcer: &mut dyn Announcer) {
        announcer.speak(
            &confirm_announcement(self.ledger.segment_count()),
            Priority::Normal,
        );
        self.close();
    }

    fn close(&mut self) {
        self.ledger.clear();
        self.engine.reset();
        self.review = None;
        self.placed_segments.clear();
        self.redo.clear();
        self.open = false;
    }

    fn noun(&self) -> String {
        self.engine
            .target()
            .map_or_else(|| "change".to_owned(), DesignationTarget::noun)
    }
}

/// Short description of the cell under the cursor.
fn describe_cell<M>(map: &M, cell: Cell) -> String
where
    M: MapView + ?Sized,
{
    let label = map
        .things_at(cell)
        .into_iter()
        .next()
        .map(|thing| thing.label)
        .or_else(|| map.zone_at(cell).and_then(|zone| map.zone(zone)).map(|zone| zone.label))
        .or_else(|| map.terrain(cell).map(|terrain| terrain.label().to_owned()))
        .unwrap_or_default();
    format!("{label}, {cell}")
}

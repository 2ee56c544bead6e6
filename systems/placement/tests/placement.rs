use cellwise_core::{
    BuildTraits, BuildableDef, Cell, Command, DesignationId, DesignationSnapshot, Event,
    HostMap, MapBounds, MapView, MaterialCost, OrderKind, Priority, RecordingAnnouncer,
    Settings, ShapeKind, TerrainKind, ThingId, ThingKind, ThingSnapshot, ZoneId, ZoneKind,
    ZoneSnapshot,
};
use cellwise_system_announcement::placement_summary;
use cellwise_system_placement::{
    ApplyError, DesignationTarget, Key, KeyPress, PlacementEngine, PlacementPhase,
    PlacementSession,
};
use cellwise_system_undo::{LedgerKind, UndoLedger, UndoTracker};
use cellwise_world::{query, World};

fn wooden_wall() -> BuildableDef {
    BuildableDef::wall("wooden wall", MaterialCost::new("wood", 5))
}

fn open_map(width: usize, height: usize, features: &[(usize, usize, char)]) -> World {
    let mut rows = vec![vec!['.'; width]; height];
    for (x, z, glyph) in features {
        rows[*z][*x] = *glyph;
    }
    let layout: Vec<String> = rows.into_iter().map(|row| row.into_iter().collect()).collect();
    World::from_layout(&layout.join("\n")).expect("layout")
}

fn press(
    session: &mut PlacementSession,
    world: &mut World,
    speech: &mut RecordingAnnouncer,
    keys: &[KeyPress],
) {
    for key in keys {
        let _ = session.handle_key(world, speech, *key);
    }
}

fn repeat(key: Key, times: usize) -> Vec<KeyPress> {
    vec![KeyPress::new(key); times]
}

/// Host that accepts some commands without doing anything.
struct SilentHost {
    world: World,
    ignore_blueprint_at: Option<Cell>,
    ignore_zone_creation: bool,
}

impl SilentHost {
    fn new(world: World) -> Self {
        Self {
            world,
            ignore_blueprint_at: None,
            ignore_zone_creation: false,
        }
    }
}

impl MapView for SilentHost {
    fn bounds(&self) -> MapBounds {
        self.world.bounds()
    }

    fn terrain(&self, cell: Cell) -> Option<TerrainKind> {
        self.world.terrain(cell)
    }

    fn things_at(&self, cell: Cell) -> Vec<ThingSnapshot> {
        self.world.things_at(cell)
    }

    fn thing(&self, id: ThingId) -> Option<ThingSnapshot> {
        self.world.thing(id)
    }

    fn zone_at(&self, cell: Cell) -> Option<ZoneId> {
        self.world.zone_at(cell)
    }

    fn zone(&self, id: ZoneId) -> Option<ZoneSnapshot> {
        self.world.zone(id)
    }

    fn zone_ids(&self) -> Vec<ZoneId> {
        self.world.zone_ids()
    }

    fn designations(&self) -> Vec<DesignationSnapshot> {
        self.world.designations()
    }

    fn designation(&self, id: DesignationId) -> Option<DesignationSnapshot> {
        self.world.designation(id)
    }
}

impl HostMap for SilentHost {
    fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        match &command {
            Command::SpawnBlueprint { cell, .. } if Some(*cell) == self.ignore_blueprint_at => {
                return
            }
            Command::CreateZone { .. } if self.ignore_zone_creation => return,
            _ => {}
        }
        HostMap::apply(&mut self.world, command, out_events);
    }
}

#[test]
fn partially_blocked_rectangle_places_the_rest() {
    let mut world = open_map(20, 15, &[(12, 10, '#'), (13, 11, 'T'), (15, 12, '#')]);
    let mut speech = RecordingAnnouncer::new();
    let mut engine = PlacementEngine::new(Settings::default());
    let mut ledger = UndoLedger::new(LedgerKind::Build);

    engine.enter(
        DesignationTarget::place(wooden_wall()),
        ShapeKind::FilledRectangle,
        &mut speech,
    );
    assert!(engine.set_first_corner(Cell::new(10, 10), &mut speech));
    let change = engine
        .update_preview(Cell::new(15, 12), &mut speech)
        .expect("cell count changed");
    assert_eq!(change.cell_count, 18);
    assert_eq!(
        speech.last().map(|line| (line.text.as_str(), line.priority)),
        Some(("6 by 3", Priority::Low)),
        "live dimensions are spoken at low priority"
    );
    assert!(engine.set_second_corner(Cell::new(15, 12), &mut speech));
    assert_eq!(engine.phase(), PlacementPhase::Previewing);

    let result = engine.confirm(&mut world, &mut speech, Some(&mut ledger));

    assert_eq!(result.placed_count(), 15);
    assert_eq!(result.obstacle_count(), 3);
    assert_eq!(result.total_cost(), 75);
    assert_eq!(result.created_things().len(), 15);
    assert_eq!(engine.phase(), PlacementPhase::Inactive);
    assert!(!engine.is_active(), "confirmation ends the selection");
    assert!(engine.has_target(), "the target survives confirmation");
    assert_eq!(ledger.segment_count(), 1);
    assert_eq!(
        placement_summary(&result, "Placed", "wooden wall", 3),
        "Placed 15 of 18 wooden walls, 3 blocked by 2 granite and 1 oak tree. Cost: 75 wood.",
    );
}

#[test]
fn every_attempted_cell_is_placed_or_blocked() {
    for shape in ShapeKind::ALL.into_iter().filter(|shape| shape.is_two_point()) {
        let mut world = open_map(
            12,
            10,
            &[(3, 3, '#'), (5, 4, 'T'), (7, 6, 'i'), (4, 7, '+'), (6, 2, '@')],
        );
        let mut speech = RecordingAnnouncer::new();
        let mut engine = PlacementEngine::new(Settings::default());
        engine.enter(DesignationTarget::place(wooden_wall()), shape, &mut speech);
        assert!(engine.set_first_corner(Cell::new(2, 1), &mut speech));
        assert!(engine.set_second_corner(Cell::new(9, 8), &mut speech));
        let attempted = engine.preview_cells().len();

        let result = engine.confirm(&mut world, &mut speech, None);

        assert_eq!(
            result.placed_count() + result.obstacle_count(),
            attempted,
            "accounting broken for {shape}"
        );
        assert_eq!(result.attempted_count(), attempted);
    }
}

#[test]
fn missing_target_is_reported_once() {
    let mut world = World::new(4, 4);
    let mut speech = RecordingAnnouncer::new();
    let mut engine = PlacementEngine::new(Settings::default());

    let result = engine.place_cells(&mut world, &mut speech, &[Cell::new(0, 0)], None);

    assert!(result.is_empty());
    assert_eq!(speech.lines().len(), 1);
    assert_eq!(speech.last().map(|line| line.priority), Some(Priority::High));
}

#[test]
fn cells_off_the_map_place_nothing() {
    let mut world = World::new(4, 4);
    let mut speech = RecordingAnnouncer::new();
    let mut engine = PlacementEngine::new(Settings::default());
    let mut ledger = UndoLedger::new(LedgerKind::Build);
    engine.enter(
        DesignationTarget::place(wooden_wall()),
        ShapeKind::Manual,
        &mut speech,
    );
    let _ = speech.take();

    let result = engine
        .place_single(&mut world, Cell::new(-1, -1), &mut speech, Some(&mut ledger))
        .expect("manual placement runs");

    assert!(result.is_empty());
    assert_eq!(speech.lines().len(), 1);
    assert_eq!(speech.last().map(|line| line.priority), Some(Priority::High));
    assert_eq!(ledger.segment_count(), 0, "no segment for a rejected call");

    let _ = speech.take();
    let mixed = [Cell::new(0, 0), Cell::new(4, 0)];
    let result = engine.place_cells(&mut world, &mut speech, &mixed, Some(&mut ledger));
    assert!(result.is_empty());
    assert_eq!(speech.lines().len(), 1);
    assert_eq!(query::thing_count(&world), 0, "in-bounds cells are not placed either");
    assert_eq!(ledger.segment_count(), 0);
}

#[test]
fn host_failures_block_the_cell_and_the_batch_continues() {
    let mut host = SilentHost::new(World::new(6, 1));
    host.ignore_blueprint_at = Some(Cell::new(2, 0));
    let mut speech = RecordingAnnouncer::new();
    let mut engine = PlacementEngine::new(Settings::default());
    engine.enter(
        DesignationTarget::place(wooden_wall()),
        ShapeKind::Line,
        &mut speech,
    );
    assert!(engine.set_first_corner(Cell::new(0, 0), &mut speech));
    assert!(engine.set_second_corner(Cell::new(5, 0), &mut speech));

    let result = engine.confirm(&mut host, &mut speech, None);

    assert_eq!(result.placed_count(), 5);
    assert_eq!(result.obstacle_count(), 1);
    assert_eq!(
        result.placed_count() + result.obstacle_count(),
        result.attempted_count()
    );
    let blocked = &result.blocked()[0];
    assert_eq!(blocked.cell, Cell::new(2, 0));
    assert_eq!(blocked.reason, "error");
    assert_eq!(query::thing_count(&host.world), 5);
}

#[test]
fn zone_creation_without_a_zone_is_an_error() {
    let mut host = SilentHost::new(World::new(3, 3));
    host.ignore_zone_creation = true;
    let mut target = DesignationTarget::zone_add(ZoneKind::Growing);

    let error = target
        .apply_batch(&mut host, &[Cell::new(0, 0), Cell::new(1, 0)])
        .expect_err("no zone to grow");

    assert_eq!(error, ApplyError::ZoneNotCreated(ZoneKind::Growing));
    assert_eq!(error.blocker_label(), "error");
    assert!(host.zone_ids().is_empty());
}

#[test]
fn zone_cells_are_added_in_one_batch_and_undone_exactly() {
    let mut world = World::from_layout("S.....\n......\n......\n").expect("layout");
    let before = query::zone_layout(&world);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::zone_add(ZoneKind::Growing),
        ShapeKind::FilledRectangle,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    let mut keys = vec![KeyPress::new(Key::Space)];
    keys.extend(repeat(Key::Right, 2));
    keys.push(KeyPress::new(Key::Down));
    keys.push(KeyPress::new(Key::Space));
    keys.push(KeyPress::new(Key::Enter));
    press(&mut session, &mut world, &mut speech, &keys);

    assert!(
        speech.contains("Added 5 of 6 growing zone cells, 1 blocked by 1 stockpile 1."),
        "summary missing: {:?}",
        speech.lines()
    );
    assert!(session.review().is_some());
    assert_eq!(world.zone_ids().len(), 2);

    press(&mut session, &mut world, &mut speech, &[KeyPress::ctrl(Key::Z)]);

    assert_eq!(query::zone_layout(&world), before, "undo restores the zones exactly");
    assert!(speech.contains("Undid 5 growing zone cells. 1 zone removed. No segments remaining."));
    assert!(session.review().is_none(), "an empty stack ends the review");
    assert_eq!(session.engine().phase(), PlacementPhase::SettingFirstCorner);
    assert_eq!(session.redo_count(), 1);

    press(&mut session, &mut world, &mut speech, &[KeyPress::ctrl(Key::Y)]);

    assert_eq!(world.zone_ids().len(), 2, "redo grows a fresh zone");
    assert_eq!(session.segment_count(), 1);
    assert_eq!(session.redo_count(), 0);
}

#[test]
fn zone_deletion_splits_and_undo_reunites() {
    let mut world = World::from_layout("SSSSS\n").expect("layout");
    let before = query::zone_layout(&world);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::zone_delete(),
        ShapeKind::Manual,
        Settings::default(),
        Cell::new(2, 0),
        &mut speech,
    );

    press(&mut session, &mut world, &mut speech, &[KeyPress::new(Key::Space)]);
    assert_eq!(world.zone_ids().len(), 2, "removing the middle cell splits the stockpile");
    assert!(speech.contains("Removed 1 zone cell."));

    press(&mut session, &mut world, &mut speech, &[KeyPress::ctrl(Key::Z)]);
    assert_eq!(query::zone_layout(&world), before);
}

#[test]
fn manual_placement_places_under_the_cursor() {
    let mut world = World::new(5, 5);
    let mut speech = RecordingAnnouncer::new();
    let table = BuildableDef::new("wooden table", BuildTraits::SOLID);
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(table),
        ShapeKind::FilledRectangle,
        Settings::default(),
        Cell::new(1, 1),
        &mut speech,
    );
    assert_eq!(
        session.engine().shape(),
        ShapeKind::Manual,
        "single-cell furniture only offers manual placement"
    );

    press(&mut session, &mut world, &mut speech, &[KeyPress::new(Key::Space)]);
    assert!(speech.contains("Placed 1 wooden table."));
    let things = world.things_at(Cell::new(1, 1));
    assert_eq!(things.len(), 1);
    assert_eq!(things[0].kind, ThingKind::Blueprint);

    press(&mut session, &mut world, &mut speech, &[KeyPress::new(Key::Space)]);
    assert!(speech.contains("1 blocked by 1 wooden table blueprint"));
    assert_eq!(session.segment_count(), 1, "a placement that changed nothing adds no segment");
    assert_eq!(session.engine().phase(), PlacementPhase::SettingFirstCorner);
}

#[test]
fn rotation_is_forwarded_to_blueprints() {
    let mut world = World::new(3, 3);
    let mut speech = RecordingAnnouncer::new();
    let bench = BuildableDef::new("bench", BuildTraits::OPEN).rotatable();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(bench),
        ShapeKind::Manual,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    press(
        &mut session,
        &mut world,
        &mut speech,
        &[KeyPress::new(Key::R), KeyPress::new(Key::Space)],
    );

    assert!(speech.contains("Facing east."));
    let bench = world.things_at(Cell::new(0, 0))[0].id;
    assert_eq!(
        query::thing_rotation(&world, bench),
        Some(cellwise_core::Rotation::East)
    );
}

#[test]
fn review_steps_through_obstacles_nearest_first() {
    let mut world = World::from_layout("..#.i\n.....\n").expect("layout");
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(wooden_wall()),
        ShapeKind::Line,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    let mut keys = vec![KeyPress::new(Key::Space)];
    keys.extend(repeat(Key::Right, 4));
    keys.push(KeyPress::new(Key::Space));
    keys.push(KeyPress::new(Key::Enter));
    press(&mut session, &mut world, &mut speech, &keys);

    let review = session.review().expect("review after confirmation");
    assert_eq!(review.obstacles().len(), 2);
    assert!(speech.contains("Tab to step through obstacles"));

    let expected = [
        (KeyPress::new(Key::Tab), "steel at 4, 0. 1 of 2."),
        (KeyPress::new(Key::Tab), "granite at 2, 0. 2 of 2."),
        (KeyPress::new(Key::N), "steel at 4, 0. 1 of 2."),
        (KeyPress::shift(Key::Tab), "granite at 2, 0. 2 of 2."),
        (KeyPress::new(Key::P), "steel at 4, 0. 1 of 2."),
    ];
    for (key, line) in expected {
        assert!(session.handle_key(&mut world, &mut speech, key));
        assert_eq!(speech.last_text(), Some(line));
    }
}

#[test]
fn undo_during_review_reviews_the_previous_segment() {
    let mut world = World::from_layout("..#..\n.i...\n").expect("layout");
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(wooden_wall()),
        ShapeKind::Line,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    let mut first = vec![KeyPress::new(Key::Space)];
    first.extend(repeat(Key::Right, 4));
    first.extend([KeyPress::new(Key::Space), KeyPress::new(Key::Enter)]);
    press(&mut session, &mut world, &mut speech, &first);

    let mut second = vec![KeyPress::new(Key::Space), KeyPress::new(Key::Down)];
    second.push(KeyPress::new(Key::Space));
    second.extend(repeat(Key::Left, 4));
    second.extend([KeyPress::new(Key::Space), KeyPress::new(Key::Enter)]);
    press(&mut session, &mut world, &mut speech, &second);

    let review = session.review().expect("review of the second segment");
    assert_eq!(review.obstacles()[0].cell, Cell::new(1, 1));

    press(&mut session, &mut world, &mut speech, &[KeyPress::ctrl(Key::Z)]);

    assert_eq!(session.segment_count(), 1);
    assert_eq!(query::thing_count(&world), 4);
    let review = session.review().expect("review of the first segment");
    assert_eq!(review.obstacles().len(), 1);
    assert_eq!(review.result().placed_count(), 4);
    assert!(session.handle_key(&mut world, &mut speech, KeyPress::new(Key::Tab)));
    assert_eq!(speech.last_text(), Some("granite at 2, 0. 1 of 1."));
}

#[test]
fn escape_clears_the_selection_before_leaving() {
    let mut world = World::new(6, 6);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(wooden_wall()),
        ShapeKind::FilledRectangle,
        Settings::default(),
        Cell::new(1, 1),
        &mut speech,
    );

    press(
        &mut session,
        &mut world,
        &mut speech,
        &[KeyPress::new(Key::Space), KeyPress::new(Key::Right)],
    );
    assert_eq!(session.engine().phase(), PlacementPhase::SettingSecondCorner);

    press(&mut session, &mut world, &mut speech, &[KeyPress::new(Key::Escape)]);
    assert!(session.is_open(), "the first escape only clears the selection");
    assert_eq!(speech.last_text(), Some("Selection cleared."));
    assert_eq!(session.engine().phase(), PlacementPhase::SettingFirstCorner);

    press(&mut session, &mut world, &mut speech, &[KeyPress::new(Key::Escape)]);
    assert!(!session.is_open());
    assert!(!session.handle_key(&mut world, &mut speech, KeyPress::new(Key::Space)));
}

#[test]
fn escape_during_review_rolls_back_every_segment() {
    let mut world = World::new(8, 3);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(wooden_wall()),
        ShapeKind::Line,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    let mut first = vec![KeyPress::new(Key::Space)];
    first.extend(repeat(Key::Right, 2));
    first.extend([KeyPress::new(Key::Space), KeyPress::new(Key::Enter)]);
    press(&mut session, &mut world, &mut speech, &first);

    let mut second = vec![KeyPress::new(Key::Space), KeyPress::new(Key::Down)];
    second.push(KeyPress::new(Key::Space));
    second.extend(repeat(Key::Left, 2));
    second.extend([KeyPress::new(Key::Space), KeyPress::new(Key::Enter)]);
    press(&mut session, &mut world, &mut speech, &second);

    assert_eq!(session.segment_count(), 2);
    assert_eq!(query::thing_count(&world), 6);

    press(&mut session, &mut world, &mut speech, &[KeyPress::new(Key::Escape)]);

    assert_eq!(query::thing_count(&world), 0);
    assert_eq!(speech.last_text(), Some("Undid 2 segments, 6 wooden walls reverted."));
    assert!(!session.is_open());
}

#[test]
fn enter_during_review_keeps_everything() {
    let mut world = World::new(6, 2);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(wooden_wall()),
        ShapeKind::Line,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    let mut keys = vec![KeyPress::new(Key::Space)];
    keys.extend(repeat(Key::Right, 3));
    keys.extend([KeyPress::new(Key::Space), KeyPress::new(Key::Enter)]);
    keys.push(KeyPress::new(Key::Enter));
    press(&mut session, &mut world, &mut speech, &keys);

    assert_eq!(speech.last_text(), Some("Confirmed 1 segment."));
    assert!(!session.is_open());
    assert_eq!(query::thing_count(&world), 4);
}

#[test]
fn closing_a_wall_ring_announces_the_room() {
    let mut world = World::new(9, 8);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::place(wooden_wall()),
        ShapeKind::EmptyRectangle,
        Settings::default(),
        Cell::new(2, 2),
        &mut speech,
    );

    let mut keys = vec![KeyPress::new(Key::Space)];
    keys.extend(repeat(Key::Right, 4));
    keys.extend(repeat(Key::Down, 3));
    keys.extend([KeyPress::new(Key::Space), KeyPress::new(Key::Enter)]);
    press(&mut session, &mut world, &mut speech, &keys);

    assert!(speech.contains("Placed 14 wooden walls. Cost: 70 wood."));
    assert!(
        speech.contains("Enclosed a room: 6 cells."),
        "room not announced: {:?}",
        speech.lines()
    );
    let review = session.review().expect("review after confirmation");
    assert_eq!(review.result().placed_count(), 14);
}

#[test]
fn cell_orders_skip_cells_without_a_target() {
    let mut world = World::from_layout("##.\n...\n").expect("layout");
    let mut speech = RecordingAnnouncer::new();
    let mut engine = PlacementEngine::new(Settings::default());
    let mut ledger = UndoLedger::new(LedgerKind::Order);
    engine.enter(
        DesignationTarget::order(OrderKind::Mine),
        ShapeKind::FilledRectangle,
        &mut speech,
    );
    assert!(engine.set_first_corner(Cell::new(0, 0), &mut speech));
    assert!(engine.set_second_corner(Cell::new(2, 0), &mut speech));

    let result = engine.confirm(&mut world, &mut speech, Some(&mut ledger));

    assert_eq!(result.placed_count(), 2);
    assert_eq!(result.blocked()[0].reason, "nothing to mine");
    assert_eq!(world.designations().len(), 2);

    let report = ledger.undo_last_segment(&mut world).expect("segment to undo");
    assert_eq!(report.reverted, 2);
    assert!(world.designations().is_empty());
}

#[test]
fn thing_orders_follow_the_animal() {
    let mut world = World::from_layout(".d.\n.d.\n").expect("layout");
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::order(OrderKind::Hunt),
        ShapeKind::FilledRectangle,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    let keys = [
        KeyPress::new(Key::Space),
        KeyPress::new(Key::Right),
        KeyPress::new(Key::Right),
        KeyPress::new(Key::Down),
        KeyPress::new(Key::Space),
        KeyPress::new(Key::Enter),
    ];
    press(&mut session, &mut world, &mut speech, &keys);

    assert_eq!(world.designations().len(), 2, "one hunt per deer");
    assert!(speech.contains("Designated 2 of 6 hunting designations"));

    press(&mut session, &mut world, &mut speech, &[KeyPress::ctrl(Key::Z)]);
    assert!(world.designations().is_empty());
}

#[test]
fn shapes_cycle_only_between_selections() {
    let mut world = World::new(4, 4);
    let mut speech = RecordingAnnouncer::new();
    let mut session = PlacementSession::new(
        &world,
        DesignationTarget::zone_add(ZoneKind::Stockpile),
        ShapeKind::FilledRectangle,
        Settings::default(),
        Cell::new(0, 0),
        &mut speech,
    );

    assert!(session.handle_key(&mut world, &mut speech, KeyPress::new(Key::Tab)));
    assert_eq!(session.engine().shape(), ShapeKind::EmptyRectangle);
    assert_eq!(speech.last_text(), Some("Empty rectangle."));
    assert!(session.handle_key(&mut world, &mut speech, KeyPress::shift(Key::Tab)));
    assert!(session.handle_key(&mut world, &mut speech, KeyPress::shift(Key::Tab)));
    assert_eq!(session.engine().shape(), ShapeKind::Manual);

    assert!(session.handle_key(&mut world, &mut speech, KeyPress::new(Key::Tab)));
    assert!(session.handle_key(&mut world, &mut speech, KeyPress::new(Key::Space)));
    assert!(
        !session.handle_key(&mut world, &mut speech, KeyPress::new(Key::Tab)),
        "no shape change mid-selection"
    );
}

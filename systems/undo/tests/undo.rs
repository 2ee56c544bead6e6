use cellwise_core::{
    BuildableDef, Cell, Command, DesignationAnchor, Event, HostMap, MapView, MaterialCost,
    OrderKind, Rotation, ThingId, ZoneId, ZoneKind,
};
use cellwise_system_undo::{
    BuildTracker, LedgerKind, OrderTracker, UndoLedger, UndoTracker, ZoneTracker,
};
use cellwise_world::{query, World};

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world.apply(command, &mut events);
    events
}

fn stockpile_at(world: &World, cell: Cell) -> ZoneId {
    world.zone_at(cell).expect("stockpile present")
}

fn zone_segment<F>(tracker: &mut ZoneTracker, world: &mut World, edit: F) -> bool
where
    F: FnOnce(&mut World),
{
    tracker.capture_before_state(&*world);
    edit(world);
    tracker.capture_after_state(&*world);
    tracker.add_segment()
}

#[test]
fn zone_expansion_round_trips_exactly() {
    let mut world = World::from_layout("SS....\n......\n").expect("layout");
    let zone = stockpile_at(&world, Cell::new(0, 0));
    let before = query::zone_layout(&world);
    let mut tracker = ZoneTracker::new();

    let pushed = zone_segment(&mut tracker, &mut world, |world| {
        let _ = apply(
            world,
            Command::AddZoneCells {
                zone,
                cells: vec![Cell::new(2, 0), Cell::new(3, 0), Cell::new(2, 1)],
            },
        );
        let _ = apply(world, Command::CheckZoneContiguity { zone });
    });
    assert!(pushed, "expansion should produce a segment");
    assert_eq!(query::zone_cells(&world, zone).len(), 5);

    let report = tracker.undo_last_segment(&mut world).expect("segment to undo");

    assert_eq!(query::zone_layout(&world), before, "undo must restore the exact layout");
    assert_eq!(report.reverted, 3);
    assert_eq!(report.zones_removed, 0);
    assert_eq!(tracker.segment_count(), 0);
}

#[test]
fn undoing_a_split_removes_the_spawned_zone() {
    let mut world = World::from_layout("SSSSS\n").expect("layout");
    let zone = stockpile_at(&world, Cell::new(0, 0));
    let before = query::zone_layout(&world);
    let mut tracker = ZoneTracker::new();

    let _ = zone_segment(&mut tracker, &mut world, |world| {
        let _ = apply(
            world,
            Command::RemoveZoneCells {
                zone,
                cells: vec![Cell::new(2, 0)],
            },
        );
        let _ = apply(world, Command::CheckZoneContiguity { zone });
    });
    assert_eq!(world.zone_ids().len(), 2, "removing the middle cell splits the zone");

    let report = tracker.undo_last_segment(&mut world).expect("segment to undo");

    assert_eq!(query::zone_layout(&world), before);
    assert_eq!(report.zones_removed, 1);
    assert_eq!(world.zone_ids(), vec![zone], "no split artifacts survive the undo");
}

#[test]
fn zone_segments_undo_in_reverse_order() {
    let mut world = World::from_layout("S.......\n").expect("layout");
    let zone = stockpile_at(&world, Cell::new(0, 0));
    let mut tracker = ZoneTracker::new();
    let mut history = vec![query::zone_layout(&world)];

    for x in 1..4 {
        let _ = zone_segment(&mut tracker, &mut world, |world| {
            let _ = apply(
                world,
                Command::AddZoneCells {
                    zone,
                    cells: vec![Cell::new(x, 0)],
                },
            );
        });
        history.push(query::zone_layout(&world));
    }
    assert_eq!(tracker.segment_count(), 3);

    let _ = history.pop();
    while let Some(expected) = history.pop() {
        let _ = tracker.undo_last_segment(&mut world).expect("segment to undo");
        assert_eq!(query::zone_layout(&world), expected, "intermediate state mismatch");
    }
    assert!(tracker.undo_last_segment(&mut world).is_none());
}

#[test]
fn unchanged_zones_produce_no_segment() {
    let mut world = World::from_layout("SS\n").expect("layout");
    let mut tracker = ZoneTracker::new();
    assert!(!zone_segment(&mut tracker, &mut world, |_| {}));
    assert_eq!(tracker.segment_count(), 0);
}

#[test]
fn new_zone_is_deleted_on_undo() {
    let mut world = World::new(4, 4);
    let mut tracker = ZoneTracker::new();

    let _ = zone_segment(&mut tracker, &mut world, |world| {
        let events = apply(world, Command::CreateZone { kind: ZoneKind::Growing });
        let Some(Event::ZoneCreated { zone, .. }) = events.first().cloned() else {
            panic!("zone not created");
        };
        let _ = apply(
            world,
            Command::AddZoneCells {
                zone,
                cells: vec![Cell::new(0, 0), Cell::new(1, 0)],
            },
        );
    });

    let report = tracker.undo_last_segment(&mut world).expect("segment to undo");
    assert!(world.zone_ids().is_empty());
    assert_eq!(report.reverted, 2);
}

fn spawn_wall(world: &mut World, cell: Cell) -> ThingId {
    let events = apply(
        world,
        Command::SpawnBlueprint {
            buildable: BuildableDef::wall("wooden wall", MaterialCost::new("wood", 5)),
            cell,
            rotation: Rotation::North,
        },
    );
    match events.as_slice() {
        [Event::ThingSpawned { thing, .. }] => *thing,
        other => panic!("blueprint rejected: {other:?}"),
    }
}

#[test]
fn build_undo_skips_things_destroyed_elsewhere() {
    let mut world = World::new(5, 1);
    let mut tracker = BuildTracker::new();

    tracker.capture_before_state(&world);
    let walls: Vec<ThingId> = (0..3).map(|x| spawn_wall(&mut world, Cell::new(x, 0))).collect();
    for wall in &walls {
        tracker.record_created(*wall);
    }
    tracker.capture_after_state(&world);
    assert!(tracker.add_segment());

    let _ = apply(&mut world, Command::DestroyThing { thing: walls[1] });

    let report = tracker.undo_last_segment(&mut world).expect("segment to undo");
    assert_eq!(report.reverted, 2);
    assert_eq!(report.already_gone, 1);
    assert_eq!(query::thing_count(&world), 0);
}

#[test]
fn order_undo_removes_only_new_designations() {
    let mut world = World::from_layout("#d#\n").expect("layout");
    let deer = world.things_at(Cell::new(1, 0))[0].id;
    let _ = apply(
        &mut world,
        Command::AddDesignation {
            kind: OrderKind::Mine,
            anchor: DesignationAnchor::Cell(Cell::new(0, 0)),
        },
    );
    let mut tracker = OrderTracker::new();

    tracker.capture_before_state(&world);
    let _ = apply(
        &mut world,
        Command::AddDesignation {
            kind: OrderKind::Mine,
            anchor: DesignationAnchor::Cell(Cell::new(2, 0)),
        },
    );
    let _ = apply(
        &mut world,
        Command::AddDesignation {
            kind: OrderKind::Hunt,
            anchor: DesignationAnchor::Thing(deer),
        },
    );
    tracker.capture_after_state(&world);
    assert!(tracker.add_segment());

    let _ = apply(&mut world, Command::DestroyThing { thing: deer });
    let report = tracker.undo_last_segment(&mut world).expect("segment to undo");

    assert_eq!(report.reverted, 1);
    assert_eq!(report.already_gone, 1, "the hunt vanished with the deer");
    let remaining: Vec<DesignationAnchor> =
        world.designations().iter().map(|d| d.anchor).collect();
    assert_eq!(remaining, vec![DesignationAnchor::Cell(Cell::new(0, 0))]);
}

#[test]
fn ledger_undo_all_reports_every_segment() {
    let mut world = World::new(4, 1);
    let mut ledger = UndoLedger::new(LedgerKind::Build);
    assert_eq!(ledger.kind(), LedgerKind::Build);

    for x in 0..2 {
        ledger.capture_before_state(&world);
        let wall = spawn_wall(&mut world, Cell::new(x, 0));
        ledger.record_created(wall);
        ledger.capture_after_state(&world);
        assert!(ledger.add_segment());
    }

    let report = ledger.undo_all(&mut world);
    assert_eq!(report.segments, 2);
    assert_eq!(report.reverted, 2);
    assert_eq!(ledger.segment_count(), 0);
    assert_eq!(query::thing_count(&world), 0);
}

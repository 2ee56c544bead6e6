#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Obstacle classification and nearest-first obstacle scans.

use std::collections::BTreeSet;

use cellwise_core::{Cell, MapView, ScannerItem, ThingKind, ThingSnapshot};

/// Reports whether the thing blocks a requested designation at its cell.
///
/// Plans were placed on purpose, pawns walk away and filth is cleaned on its
/// own, so none of those count. Rock, trees, buildings and ground items do.
#[must_use]
pub fn is_obstacle(thing: &ThingSnapshot) -> bool {
    match thing.kind {
        ThingKind::Blueprint
        | ThingKind::Frame
        | ThingKind::Pawn { .. }
        | ThingKind::Filth
        | ThingKind::Plant => false,
        ThingKind::NaturalRock | ThingKind::Tree | ThingKind::Building | ThingKind::Item => true,
    }
}

/// The obstacle occupying the cell, if any.
///
/// Natural rock fills the whole cell and wins over anything else listed there.
pub fn obstacle_at<M>(map: &M, cell: Cell) -> Option<ThingSnapshot>
where
    M: MapView + ?Sized,
{
    if let Some(rock) = map
        .edifice(cell)
        .filter(|edifice| edifice.kind == ThingKind::NaturalRock)
    {
        return Some(rock);
    }
    map.things_at(cell).into_iter().find(is_obstacle)
}

/// Collects the distinct obstacles standing on `cells`, nearest to `cursor` first.
///
/// Ties are broken in row-major order so the result is stable.
pub fn find_obstacles<M>(map: &M, cells: &[Cell], cursor: Cell) -> Vec<ScannerItem>
where
    M: MapView + ?Sized,
{
    let mut seen = BTreeSet::new();
    let mut found: Vec<ScannerItem> = cells
        .iter()
        .filter_map(|cell| obstacle_at(map, *cell))
        .filter(|thing| seen.insert(thing.id))
        .map(|thing| ScannerItem {
            distance: thing.cell.distance(cursor),
            label: thing.label,
            cell: thing.cell,
            thing: Some(thing.id),
        })
        .collect();

    found.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.cell.row_major_key().cmp(&b.cell.row_major_key()))
    });
    found
}

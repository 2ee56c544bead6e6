#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure formatting layer that turns placement outcomes into spoken English.
//!
//! Nothing here talks to the announcer; callers decide when and at which
//! priority each line is spoken.

use cellwise_core::{Cell, Enclosure, PlacementResult, Rotation, ScannerItem, ShapeKind};
use cellwise_system_undo::UndoReport;

mod plural;

pub use plural::{capitalize, count_phrase, group_labels, join_list, pluralize};

/// Announced when a session starts.
#[must_use]
pub fn enter_announcement(target_label: &str, shape: ShapeKind) -> String {
    let instruction = if shape.is_two_point() {
        "Press Space to set the first corner."
    } else {
        "Press Space to place at the cursor."
    };
    format!("{}, {}. {instruction}", capitalize(target_label), shape.label())
}

/// Announced when the first corner is anchored.
#[must_use]
pub fn first_corner_announcement(cell: Cell) -> String {
    format!("First corner at {cell}. Move to the opposite corner and press Space.")
}

/// Live dimensions spoken while the second corner moves.
#[must_use]
pub fn preview_announcement(width: u32, height: u32) -> String {
    format!("{width} by {height}")
}

/// Announced when the second corner is fixed.
#[must_use]
pub fn second_corner_announcement(size_label: &str, cell_count: usize) -> String {
    if size_label.ends_with("cells") || size_label.ends_with("cell") {
        format!("Selected {size_label}. Press Enter to confirm or Escape to clear.")
    } else {
        format!(
            "Selected {size_label}, {}. Press Enter to confirm or Escape to clear.",
            count_phrase(cell_count, "cell")
        )
    }
}

/// Announced after cycling the selection shape.
#[must_use]
pub fn shape_announcement(shape: ShapeKind) -> String {
    format!("{}.", capitalize(shape.label()))
}

/// Announced after rotating a placeable.
#[must_use]
pub fn rotation_announcement(rotation: Rotation) -> String {
    format!("Facing {}.", rotation.label())
}

/// Summarises one confirmed placement.
///
/// `verb` and `noun` describe the action, for example `Placed` and
/// `wooden wall`. Blockers are grouped by label with at most `group_limit`
/// groups before the rest collapse.
#[must_use]
pub fn placement_summary(
    result: &PlacementResult,
    verb: &str,
    noun: &str,
    group_limit: usize,
) -> String {
    let attempted = result.attempted_count();
    if attempted == 0 {
        return "Nothing to place.".to_owned();
    }

    let placed = result.placed_count();
    let mut summary = if placed == attempted {
        format!("{verb} {}.", count_phrase(placed, noun))
    } else {
        let blockers = group_labels(
            result.blocked().iter().map(|blocked| blocked.reason.as_str()),
            group_limit,
        );
        format!(
            "{verb} {placed} of {attempted} {}, {} blocked by {blockers}.",
            pluralize(noun, attempted),
            result.obstacle_count(),
        )
    };

    if let Some(resource) = result.resource_label() {
        if result.total_cost() > 0 {
            let cost = result.total_cost();
            let amount = usize::try_from(cost).unwrap_or(usize::MAX);
            summary.push_str(&format!(" Cost: {cost} {}.", pluralize(resource, amount)));
        }
    }
    summary
}

fn room_detail(enclosure: &Enclosure, group_limit: usize, gap_limit: usize) -> String {
    let mut detail = count_phrase(enclosure.cell_count(), "cell");
    if !enclosure.obstacles.is_empty() {
        let inside = group_labels(
            enclosure.obstacles.iter().map(|item| item.label.as_str()),
            group_limit,
        );
        detail.push_str(&format!(", inside {inside}"));
    }
    if !enclosure.gap_cells.is_empty() {
        let gap_limit = gap_limit.max(1);
        let mut listed: Vec<String> = enclosure
            .gap_cells
            .iter()
            .take(gap_limit)
            .map(ToString::to_string)
            .collect();
        let hidden = enclosure.gap_cells.len().saturating_sub(gap_limit);
        if hidden > 0 {
            listed.push(format!("{hidden} more"));
        }
        detail.push_str(&format!(
            ", {} at {}",
            count_phrase(enclosure.gap_cells.len(), "gap"),
            listed.join("; ")
        ));
    }
    detail
}

/// Describes the rooms sealed by a wall placement, or `None` when there are none.
#[must_use]
pub fn enclosure_summary(
    enclosures: &[Enclosure],
    group_limit: usize,
    gap_limit: usize,
) -> Option<String> {
    match enclosures {
        [] => None,
        [room] => Some(format!(
            "Enclosed a room: {}.",
            room_detail(room, group_limit, gap_limit)
        )),
        rooms => {
            let details: Vec<String> = rooms
                .iter()
                .enumerate()
                .map(|(index, room)| {
                    format!(
                        "Room {}: {}.",
                        index + 1,
                        room_detail(room, group_limit, gap_limit)
                    )
                })
                .collect();
            Some(format!("Enclosed {} rooms. {}", rooms.len(), details.join(" ")))
        }
    }
}

fn remaining_phrase(remaining: usize) -> String {
    match remaining {
        0 => "No segments remaining.".to_owned(),
        count => format!("{} remaining.", count_phrase(count, "segment")),
    }
}

/// Announced after undoing the most recent segment.
#[must_use]
pub fn undo_summary(report: &UndoReport, noun: &str, remaining: usize) -> String {
    let mut summary = if report.reverted == 0 && report.already_gone > 0 {
        "Nothing left to undo in that segment.".to_owned()
    } else {
        format!("Undid {}.", count_phrase(report.reverted, noun))
    };
    if report.already_gone > 0 {
        summary.push_str(&format!(" {} already gone.", report.already_gone));
    }
    if report.zones_removed > 0 {
        summary.push_str(&format!(
            " {} removed.",
            capitalize(&count_phrase(report.zones_removed, "zone"))
        ));
    }
    summary.push(' ');
    summary.push_str(&remaining_phrase(remaining));
    summary
}

/// Announced when every segment is rolled back at once.
#[must_use]
pub fn undo_all_summary(report: &UndoReport, noun: &str) -> String {
    if report.segments == 0 {
        return "Nothing to undo.".to_owned();
    }
    format!(
        "Undid {}, {} reverted.",
        count_phrase(report.segments, "segment"),
        count_phrase(report.reverted, noun)
    )
}

/// Announced when stepping onto an obstacle during review.
#[must_use]
pub fn obstacle_announcement(item: &ScannerItem, index: usize, total: usize) -> String {
    format!("{} at {}. {} of {total}.", item.label, item.cell, index + 1)
}

/// Announced when the player accepts every segment.
#[must_use]
pub fn confirm_announcement(segments: usize) -> String {
    format!("Confirmed {}.", count_phrase(segments, "segment"))
}

/// Key reminder spoken at the start of a review.
#[must_use]
pub fn review_hint(obstacle_count: usize) -> String {
    let browse = if obstacle_count > 0 {
        "Tab to step through obstacles, "
    } else {
        ""
    };
    format!("{browse}Control Z to undo, Space for another segment, Enter to confirm.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_announcement_mentions_the_first_step() {
        assert_eq!(
            enter_announcement("wooden wall", ShapeKind::FilledRectangle),
            "Wooden wall, filled rectangle. Press Space to set the first corner."
        );
        assert!(enter_announcement("mine", ShapeKind::Manual).ends_with("at the cursor."));
    }

    #[test]
    fn irregular_selections_are_not_counted_twice() {
        assert_eq!(
            second_corner_announcement("21 cells", 21),
            "Selected 21 cells. Press Enter to confirm or Escape to clear."
        );
        assert_eq!(
            second_corner_announcement("6 by 3", 18),
            "Selected 6 by 3, 18 cells. Press Enter to confirm or Escape to clear."
        );
    }

    #[test]
    fn undo_summary_reports_remaining_segments() {
        let report = UndoReport {
            reverted: 4,
            already_gone: 1,
            zones_removed: 0,
            segments: 1,
        };
        assert_eq!(
            undo_summary(&report, "wooden wall", 2),
            "Undid 4 wooden walls. 1 already gone. 2 segments remaining."
        );
    }
}

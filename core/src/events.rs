//! Messages handed to the presentation layer after each mutation.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// An existing occupant dropped to a lower row.
    Fall,
    /// A new occupant entered from above the board.
    Spawn,
}

/// Relocation of one occupant within a column.
///
/// Spawned occupants report `from_row = height + i` for the `i`-th spawn of the column, so a
/// renderer feeding them from one point above the board drops them in sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMove {
    pub column: Coord,
    pub from_row: CellCount,
    pub to_row: Coord,
    pub color: ColorToken,
    pub kind: MoveKind,
}

impl CellMove {
    pub const fn to(&self) -> Coord2 {
        (self.column, self.to_row)
    }

    pub const fn is_spawn(&self) -> bool {
        matches!(self.kind, MoveKind::Spawn)
    }
}

/// Current content and display tier of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub occupant: Option<ColorToken>,
    /// `None` for empty cells.
    pub tier: Option<Tier>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoardEvent {
    Removed(Vec<Coord2>),
    Moved(Vec<CellMove>),
    CellsChanged(Vec<CellChange>),
    DeadlockResolved(Resolution),
    Unresolvable,
}

/// Receiver for board events, passed explicitly to each mutating call.
pub trait BoardObserver {
    fn on_event(&mut self, event: &BoardEvent);
}

impl BoardObserver for () {
    fn on_event(&mut self, _event: &BoardEvent) {}
}

/// Records every event, mostly useful for tests and replay.
impl BoardObserver for Vec<BoardEvent> {
    fn on_event(&mut self, event: &BoardEvent) {
        self.push(event.clone());
    }
}

impl<F: FnMut(&BoardEvent)> BoardObserver for F {
    fn on_event(&mut self, event: &BoardEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_observe_events() {
        let mut removed = 0;
        let mut other = 0;
        let mut observer = |event: &BoardEvent| match event {
            BoardEvent::Removed(cells) => removed += cells.len(),
            _ => other += 1,
        };

        observer.on_event(&BoardEvent::Removed(alloc::vec![(0, 0), (0, 1)]));
        observer.on_event(&BoardEvent::Unresolvable);
        observer.on_event(&BoardEvent::DeadlockResolved(Resolution::Shuffled));

        assert_eq!(removed, 2);
        assert_eq!(other, 2);
    }

    #[test]
    fn recorder_keeps_event_order() {
        let mut events: Vec<BoardEvent> = Vec::new();
        events.on_event(&BoardEvent::Unresolvable);
        events.on_event(&BoardEvent::Moved(Vec::new()));
        assert_eq!(events, [BoardEvent::Unresolvable, BoardEvent::Moved(Vec::new())]);
    }
}

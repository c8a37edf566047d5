use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Index of a cell on the shared circular track.
pub type Cell = u16;

/// Cumulative steps a piece has taken since leaving the yard.
pub type Distance = u16;

/// Index of a seat around the board (0-based, clockwise).
pub type Seat = usize;

/// Cells on the standard shared track.
pub const STANDARD_TRACK_LENGTH: u16 = 52;
/// Number of seats on the standard board.
pub const STANDARD_SEATS: usize = 4;
/// Private lane slots including the final "finished" slot.
pub const STANDARD_HOME_LANE_LENGTH: u16 = 6;
/// Star cells on the standard board, 8 cells past each entry cell.
pub const STANDARD_STAR_CELLS: [Cell; 4] = [8, 21, 34, 47];

/// Where a piece currently is, as seen from the board.
///
/// Lane slots are private to the owning seat, so two pieces of different
/// players reporting the same `InHomeLane` slot never share a cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum PiecePosition {
    /// Off the board, waiting for a six
    InYard,
    /// On the shared track
    OnTrack(Cell),
    /// On the owner's private home lane (slot 0 is the first lane cell)
    InHomeLane(u16),
    /// Reached the end of the home lane
    Finished,
}

impl PiecePosition {
    pub fn track_cell(self) -> Option<Cell> {
        match self {
            PiecePosition::OnTrack(cell) => Some(cell),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Board needs at least 2 seats, got {0}")]
    TooFewSeats(usize),
    #[error("Track length {track_length} is not divisible by {seats} seats")]
    UnevenTrack { track_length: u16, seats: usize },
    #[error("Home lane must have at least one slot")]
    EmptyHomeLane,
    #[error("Cell {cell} is outside a track of {track_length} cells")]
    CellOutOfRange { cell: Cell, track_length: u16 },
}

/// Static board layout: the shared track, per-seat entry and turning cells,
/// the home lanes and the cells where pieces cannot be captured.
///
/// Every seat sees the same shape rotated by `track_length / seats` cells.
/// A piece enters at distance 0 on its seat's entry cell, walks
/// `track_steps` cells around the track (the last one is the seat's
/// home-stretch entry) and then turns into its private lane, finishing at
/// [`total_path`](BoardGeometry::total_path).
///
/// # Examples
///
/// ```
/// use ludo_engine::board::{BoardGeometry, PiecePosition};
///
/// let board = BoardGeometry::standard();
/// assert_eq!(board.entry_cell(1), 13);
/// assert_eq!(board.project(1, 3), PiecePosition::OnTrack(16));
/// assert_eq!(board.project(0, board.total_path()), PiecePosition::Finished);
/// assert!(board.is_safe(26));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGeometry {
    track_length: u16,
    seats: usize,
    track_steps: Distance,
    home_lane_length: u16,
    entry_cells: Vec<Cell>,
    safe_cells: BTreeSet<Cell>,
    star_cells: BTreeSet<Cell>,
}

impl BoardGeometry {
    /// The classic 4-seat, 52-cell board with 6-slot home lanes.
    pub fn standard() -> Self {
        Self::build(
            STANDARD_TRACK_LENGTH,
            STANDARD_SEATS,
            STANDARD_HOME_LANE_LENGTH,
            STANDARD_STAR_CELLS.into_iter().collect(),
        )
    }

    /// Builds a custom board. Entry cells are spaced evenly and double as the
    /// safe cells; `star_cells` adds further capture-free cells.
    pub fn new(
        track_length: u16,
        seats: usize,
        home_lane_length: u16,
        star_cells: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, GeometryError> {
        if seats < 2 {
            return Err(GeometryError::TooFewSeats(seats));
        }
        if track_length == 0 || track_length as usize % seats != 0 {
            return Err(GeometryError::UnevenTrack {
                track_length,
                seats,
            });
        }
        if home_lane_length == 0 {
            return Err(GeometryError::EmptyHomeLane);
        }
        let star_cells: BTreeSet<Cell> = star_cells.into_iter().collect();
        if let Some(&cell) = star_cells.iter().find(|&&c| c >= track_length) {
            return Err(GeometryError::CellOutOfRange { cell, track_length });
        }
        Ok(Self::build(track_length, seats, home_lane_length, star_cells))
    }

    fn build(
        track_length: u16,
        seats: usize,
        home_lane_length: u16,
        star_cells: BTreeSet<Cell>,
    ) -> Self {
        let spacing = track_length / seats as u16;
        let entry_cells: Vec<Cell> = (0..seats as u16).map(|s| s * spacing).collect();
        Self {
            track_length,
            seats,
            // the piece stops one cell short of its own entry before turning in
            track_steps: track_length.saturating_sub(2),
            home_lane_length,
            safe_cells: entry_cells.iter().copied().collect(),
            entry_cells,
            star_cells,
        }
    }

    pub fn track_length(&self) -> u16 {
        self.track_length
    }

    pub fn seats(&self) -> usize {
        self.seats
    }

    pub fn home_lane_length(&self) -> u16 {
        self.home_lane_length
    }

    /// Distance of the last track cell before a piece turns into its lane.
    pub fn track_steps(&self) -> Distance {
        self.track_steps
    }

    /// Distance at which a piece is finished.
    pub fn total_path(&self) -> Distance {
        self.track_steps + self.home_lane_length
    }

    pub fn entry_cell(&self, seat: Seat) -> Cell {
        self.entry_cells[seat % self.seats]
    }

    /// Track cell after which a piece of `seat` leaves the shared track.
    pub fn home_stretch_entry(&self, seat: Seat) -> Cell {
        (self.entry_cell(seat) + self.track_steps) % self.track_length
    }

    /// Distance of the first lane slot; identical for every seat.
    pub fn home_lane_start(&self, _seat: Seat) -> Distance {
        self.track_steps + 1
    }

    pub fn safe_cells(&self) -> &BTreeSet<Cell> {
        &self.safe_cells
    }

    pub fn star_cells(&self) -> &BTreeSet<Cell> {
        &self.star_cells
    }

    pub fn is_safe(&self, cell: Cell) -> bool {
        self.safe_cells.contains(&cell)
    }

    pub fn is_star(&self, cell: Cell) -> bool {
        self.star_cells.contains(&cell)
    }

    /// A piece on a protected cell can never be captured.
    pub fn is_protected(&self, cell: Cell) -> bool {
        self.is_safe(cell) || self.is_star(cell)
    }

    /// Position of a piece of `seat` that has travelled `distance` steps since
    /// leaving the yard. Distances beyond the path end report `Finished`.
    pub fn project(&self, seat: Seat, distance: Distance) -> PiecePosition {
        if distance <= self.track_steps {
            PiecePosition::OnTrack((self.entry_cell(seat) + distance) % self.track_length)
        } else if distance < self.total_path() {
            PiecePosition::InHomeLane(distance - self.home_lane_start(seat))
        } else {
            PiecePosition::Finished
        }
    }

    /// Seats used for a game of `players` players. Two players sit opposite
    /// each other; otherwise seats fill clockwise from 0.
    pub fn seats_for(&self, players: usize) -> Option<Vec<Seat>> {
        match players {
            0 | 1 => None,
            2 => Some(vec![0, self.seats / 2]),
            n if n <= self.seats => Some((0..n).collect()),
            _ => None,
        }
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

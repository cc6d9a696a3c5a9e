use bevy::prelude::*;
use fastrand::Rng;

use crate::config::BoardLayout;

/// One grid cell of the sliced picture, draggable as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Row-major grid index; the tile's identity regardless of paint order
    pub index: usize,
    pub image: Handle<Image>,
    /// Top-left corner in canvas space
    pub current: IVec2,
    pub correct: IVec2,
}

impl Tile {
    /// Hit-test against the tile's box, inclusive on the top/left edges only.
    pub fn contains(&self, point: IVec2, size: IVec2) -> bool {
        let max = self.current + size;
        point.cmpge(self.current).all() && point.cmplt(max).all()
    }

    pub fn is_placed(&self) -> bool {
        self.current == self.correct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// The topmost tile follows the pointer, keeping `grab_offset` between
    /// its corner and the pointer.
    Dragging { grab_offset: IVec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub index: usize,
    pub snapped: bool,
}

/// Tiles in paint order (last is topmost) plus the pointer interaction state.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PuzzleSession {
    layout: BoardLayout,
    snap_threshold: i32,
    tiles: Vec<Tile>,
    drag: DragState,
    won: bool,
}

impl PuzzleSession {
    pub const fn new(layout: BoardLayout, snap_threshold: i32) -> Self {
        Self {
            layout,
            snap_threshold,
            tiles: Vec::new(),
            drag: DragState::Idle,
            won: false,
        }
    }

    /// Replaces every tile with a fresh one per image, scattered at random.
    pub fn initialize(&mut self, images: Vec<Handle<Image>>, rng: &mut Rng) {
        let layout = self.layout;
        self.tiles = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| Tile {
                index,
                image,
                current: layout.random_position(rng),
                correct: layout.correct_position(index),
            })
            .collect();
        self.drag = DragState::Idle;
        self.won = false;
    }

    /// Grabs the topmost tile under `pointer` and brings it to the front.
    ///
    /// Re-evaluates even while another tile is held. Returns the grabbed tile's index.
    pub fn pick_up(&mut self, pointer: IVec2) -> Option<usize> {
        let piece = self.layout.piece;
        let hit = self
            .tiles
            .iter()
            .rposition(|tile| tile.contains(pointer, piece))?;

        let tile = self.tiles.remove(hit);
        let index = tile.index;
        self.drag = DragState::Dragging {
            grab_offset: pointer - tile.current,
        };
        self.tiles.push(tile);
        Some(index)
    }

    /// Moves the held tile with the pointer. Returns false when nothing is held.
    pub fn drag(&mut self, pointer: IVec2) -> bool {
        let DragState::Dragging { grab_offset } = self.drag else {
            return false;
        };
        let Some(tile) = self.tiles.last_mut() else {
            return false;
        };
        tile.current = pointer - grab_offset;
        true
    }

    /// Drops the held tile, snapping it home when it is close enough, then re-checks the win.
    pub fn release(&mut self) -> Option<Release> {
        if self.drag == DragState::Idle {
            return None;
        }
        self.drag = DragState::Idle;

        let threshold = self.snap_threshold;
        let tile = self.tiles.last_mut()?;
        let distance = (tile.current - tile.correct).abs();
        let snapped = distance.x < threshold && distance.y < threshold;
        if snapped {
            tile.current = tile.correct;
        }
        let index = tile.index;

        self.won = self.tiles.iter().all(Tile::is_placed);
        Some(Release { index, snapped })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn held_tile(&self) -> Option<&Tile> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging { .. } => self.tiles.last(),
        }
    }

    pub const fn drag_state(&self) -> DragState {
        self.drag
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub const fn is_won(&self) -> bool {
        self.won
    }

    pub const fn layout(&self) -> &BoardLayout {
        &self.layout
    }
}

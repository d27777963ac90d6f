//! Backtracking construction of the room graph.
//!
//! Rooms are placed one grid cell at a time by a depth-first walk over floor
//! cells. The walk keeps a stack of placed rooms (the frontier): each step either
//! extends the room on top of the stack into a random free floor neighbor, or
//! pops it when it has none. Because every new room is connected only to the room
//! it grew from, the resulting graph is a tree rooted at the start room.
//!
//! ```text
//! frontier top has free floor neighbors?
//!     yes → place room there, open doorway, push      (BuildStep::Placed)
//!     no  → pop                                       (BuildStep::Backtracked)
//! frontier empty before the count is reached → BuildOutcome::Exhausted
//! ```
//!
//! The builder only mutates its own [`Grid`] and [`RoomGraph`]; instantiating
//! rooms in a scene is done afterwards by walking [`RoomGraph::rooms`].

use std::{
    collections::{HashMap, VecDeque},
    iter::FusedIterator,
    ops::Index,
};

use arrayvec::ArrayVec;
use rand::{Rng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use tracing::{debug, warn};

use crate::{
    cancel::{self, CancelFlag},
    core::{Cell, Direction, Grid, Position, Seed},
};

use super::{config::LevelLimits, partition::FeatureParameters};

/// Index of a room inside its [`RoomGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct RoomId(usize);

impl RoomId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum RoomKind {
    Start,
    Interior,
    End,
}

impl RoomKind {
    /// Start and end rooms are special and never carry features.
    #[must_use]
    pub const fn is_special(self) -> bool {
        !matches!(self, RoomKind::Interior)
    }
}

/// A placed room.
#[derive(Debug, Clone)]
pub struct RoomNode {
    id: RoomId,
    position: Position,
    kind: RoomKind,
    seed: Option<Seed>,
    features: FeatureParameters,
    neighbors: [Option<RoomId>; Direction::LEN],
    doors: [bool; Direction::LEN],
}

impl RoomNode {
    #[must_use]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    #[must_use]
    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    /// Seed the room's features were partitioned from (`None` for special rooms).
    #[must_use]
    pub fn seed(&self) -> Option<Seed> {
        self.seed
    }

    #[must_use]
    pub fn features(&self) -> &FeatureParameters {
        &self.features
    }

    /// Room on the adjacent grid cell, whether or not a doorway leads there.
    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<RoomId> {
        self.neighbors[direction.index()]
    }

    #[must_use]
    pub fn is_door_open(&self, direction: Direction) -> bool {
        self.doors[direction.index()]
    }

    /// Rooms reachable through an open doorway.
    pub fn connected(&self) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
        Direction::ALL.into_iter().filter_map(|dir| {
            self.neighbor(dir)
                .filter(|_| self.is_door_open(dir))
                .map(|id| (dir, id))
        })
    }
}

/// Rooms of one dungeon level, connected as a tree rooted at the start room.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    rooms: Vec<RoomNode>,
    by_position: HashMap<Position, RoomId>,
    start: RoomId,
    end: Option<RoomId>,
}

impl RoomGraph {
    fn with_start(position: Position) -> Self {
        let mut graph = Self {
            rooms: vec![],
            by_position: HashMap::new(),
            start: RoomId(0),
            end: None,
        };
        graph.push(position, RoomKind::Start, None, FeatureParameters::EMPTY);
        graph
    }

    fn push(
        &mut self,
        position: Position,
        kind: RoomKind,
        seed: Option<Seed>,
        features: FeatureParameters,
    ) -> RoomId {
        let id = RoomId(self.rooms.len());
        self.rooms.push(RoomNode {
            id,
            position,
            kind,
            seed,
            features,
            neighbors: [None; Direction::LEN],
            doors: [false; Direction::LEN],
        });
        self.by_position.insert(position, id);
        if kind.is_end() {
            self.end = Some(id);
        }
        id
    }

    /// Opens a doorway between two rooms and returns its direction as seen from `from`.
    fn connect(&mut self, from: RoomId, to: RoomId) -> Direction {
        let a = self.rooms[from.0].position;
        let b = self.rooms[to.0].position;
        let direction = Direction::from_delta(b.x - a.x, b.y - a.y);
        let opposite = direction.opposite();

        let from_node = &mut self.rooms[from.0];
        from_node.neighbors[direction.index()] = Some(to);
        from_node.doors[direction.index()] = true;

        let to_node = &mut self.rooms[to.0];
        to_node.neighbors[opposite.index()] = Some(from);
        to_node.doors[opposite.index()] = true;

        direction
    }

    /// Records every grid-adjacent room as a neighbor, leaving doorways untouched.
    fn link_adjacent(&mut self) {
        for room in &mut self.rooms {
            for dir in Direction::ALL {
                if let Some(&other) = self.by_position.get(&room.position.step(dir)) {
                    room.neighbors[dir.index()] = Some(other);
                }
            }
        }
    }

    #[must_use]
    pub fn rooms(&self) -> &[RoomNode] {
        &self.rooms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RoomId) -> Option<&RoomNode> {
        self.rooms.get(id.0)
    }

    #[must_use]
    pub fn start(&self) -> &RoomNode {
        &self.rooms[self.start.0]
    }

    #[must_use]
    pub fn end(&self) -> Option<&RoomNode> {
        self.end.map(|id| &self.rooms[id.0])
    }

    #[must_use]
    pub fn room_at(&self, position: Position) -> Option<&RoomNode> {
        self.by_position.get(&position).map(|id| &self.rooms[id.0])
    }

    #[must_use]
    pub fn interior_count(&self) -> usize {
        self.rooms.iter().filter(|r| !r.is_special()).count()
    }

    /// Number of open doorways (tree edges).
    #[must_use]
    pub fn door_count(&self) -> usize {
        self.rooms.iter().map(|r| r.connected().count()).sum::<usize>() / 2
    }

    /// Breadth-first walk from the start room through open doorways.
    ///
    /// Returns the parent of every reached room; unreached rooms map to `None`,
    /// and the start room maps to itself.
    fn parents(&self) -> Vec<Option<RoomId>> {
        let mut parents = vec![None; self.rooms.len()];
        parents[self.start.0] = Some(self.start);
        let mut queue = VecDeque::from([self.start]);
        while let Some(id) = queue.pop_front() {
            for (_, next) in self.rooms[id.0].connected() {
                if parents[next.0].is_none() {
                    parents[next.0] = Some(id);
                    queue.push_back(next);
                }
            }
        }
        parents
    }

    /// Doorway chain from `id` back to the start room, both ends included.
    ///
    /// Returns `None` if `id` is not part of this graph or is unreachable.
    #[must_use]
    pub fn path_to_start(&self, id: RoomId) -> Option<Vec<RoomId>> {
        let parents = self.parents();
        let mut path = vec![id];
        let mut current = id;
        while current != self.start {
            current = (*parents.get(current.0)?)?;
            path.push(current);
        }
        Some(path)
    }

    /// Whether every room is reachable from the start room and doorways form a tree.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let all_reached = self.parents().iter().all(Option::is_some);
        all_reached && self.door_count() + 1 == self.rooms.len()
    }
}

impl Index<RoomId> for RoomGraph {
    type Output = RoomNode;

    fn index(&self, id: RoomId) -> &Self::Output {
        &self.rooms[id.0]
    }
}

/// Inputs of the room graph builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomGraphParams {
    /// Interior rooms to place (start and end rooms not included).
    pub room_count: usize,
    pub start: Option<Position>,
    pub end_room: bool,
    pub limits: LevelLimits,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("start position {position} is outside the {width}x{height} grid")]
    StartOutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    #[display("start position {position} is not a floor cell ({cell:?})")]
    StartNotFloor { position: Position, cell: Cell },
    #[display("grid has no floor cell for the start room")]
    NoFloor,
}

/// One observable step of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BuildStep {
    Placed {
        room: RoomId,
        from: RoomId,
        direction: Direction,
    },
    Backtracked {
        room: RoomId,
    },
    EndPlaced {
        room: RoomId,
        from: RoomId,
        direction: Direction,
    },
}

/// How construction ended.
///
/// Only [`Complete`](Self::Complete) means every requested room exists; the
/// other outcomes leave a valid but partial graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BuildOutcome {
    Complete,
    /// The frontier emptied before the requested count was placed.
    Exhausted { placed: usize, requested: usize },
    /// All interior rooms were placed but no floor was left for the end room.
    EndUnplaced,
    Cancelled { placed: usize, requested: usize },
}

/// Result of running a builder to completion.
#[derive(Debug, Clone)]
pub struct RoomLayout {
    /// Grid with every placed room marked as [`Cell::Room`].
    pub grid: Grid,
    pub graph: RoomGraph,
    pub outcome: BuildOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Interior,
    End,
    Done(BuildOutcome),
}

/// Step-wise room graph builder.
///
/// Iterating yields one [`BuildStep`] per placement or backtrack, so callers can
/// observe intermediate states at whatever pace they like. [`finish`](Self::finish)
/// drives the remaining steps and returns the layout.
///
/// # Example
///
/// ```
/// use cavern_engine::{
///     Cell, Grid, Seed,
///     generation::{LevelLimits, RoomGraphBuilder, RoomGraphParams},
/// };
///
/// let params = RoomGraphParams {
///     room_count: 6,
///     start: None,
///     end_room: true,
///     limits: LevelLimits::default(),
/// };
/// let builder = RoomGraphBuilder::new(Grid::filled(4, 4, Cell::Floor), params, Seed::new(1))?;
/// let layout = builder.finish();
///
/// assert!(layout.outcome.is_complete());
/// assert_eq!(layout.graph.interior_count(), 6);
/// assert!(layout.graph.end().is_some());
/// assert!(layout.graph.is_connected());
/// # Ok::<(), cavern_engine::generation::PlacementError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RoomGraphBuilder {
    grid: Grid,
    graph: RoomGraph,
    frontier: Vec<RoomId>,
    params: RoomGraphParams,
    remaining: usize,
    rng: Pcg32,
    phase: Phase,
    cancel: Option<CancelFlag>,
}

impl RoomGraphBuilder {
    /// Places the start room and prepares the walk.
    ///
    /// A fixed start must be an in-bounds floor cell; otherwise the start is a
    /// uniformly random floor cell.
    pub fn new(mut grid: Grid, params: RoomGraphParams, seed: Seed) -> Result<Self, PlacementError> {
        let mut rng = seed.rng();
        let start = match params.start {
            Some(position) => match grid.get(position) {
                Some(Cell::Floor) => position,
                Some(cell) => return Err(PlacementError::StartNotFloor { position, cell }),
                None => {
                    return Err(PlacementError::StartOutOfBounds {
                        position,
                        width: grid.width(),
                        height: grid.height(),
                    });
                }
            },
            None => {
                let floors = grid
                    .cells()
                    .filter(|(_, cell)| cell.is_floor())
                    .map(|(pos, _)| pos)
                    .collect::<Vec<_>>();
                *floors.choose(&mut rng).ok_or(PlacementError::NoFloor)?
            }
        };
        grid.set(start, Cell::Room);
        let graph = RoomGraph::with_start(start);
        debug!(%start, room_count = params.room_count, "placed start room");
        Ok(Self {
            grid,
            frontier: vec![graph.start],
            graph,
            params,
            remaining: params.room_count,
            rng,
            phase: Phase::Interior,
            cancel: None,
        })
    }

    /// Polls `flag` once per step and stops with [`BuildOutcome::Cancelled`] once set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    #[must_use]
    pub fn frontier(&self) -> &[RoomId] {
        &self.frontier
    }

    /// Interior rooms still to be placed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns the outcome once construction has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<BuildOutcome> {
        match self.phase {
            Phase::Done(outcome) => Some(outcome),
            Phase::Interior | Phase::End => None,
        }
    }

    fn placed(&self) -> usize {
        self.params.room_count - self.remaining
    }

    fn eligible_neighbors(&self, id: RoomId) -> ArrayVec<Position, { Direction::LEN }> {
        let origin = self.graph[id].position;
        Direction::ALL
            .into_iter()
            .map(|dir| origin.step(dir))
            .filter(|pos| self.grid.get(*pos).is_some_and(Cell::is_floor))
            .collect()
    }

    fn place(&mut self, position: Position, kind: RoomKind, from: RoomId) -> (RoomId, Direction) {
        let (seed, features) = if kind.is_special() {
            (None, FeatureParameters::EMPTY)
        } else {
            let seed: Seed = self.rng.random();
            let LevelLimits {
                max_enemies,
                max_obstacles,
            } = self.params.limits;
            (
                Some(seed),
                FeatureParameters::partition(seed, max_enemies, max_obstacles),
            )
        };
        self.grid.set(position, Cell::Room);
        let id = self.graph.push(position, kind, seed, features);
        let direction = self.graph.connect(from, id);
        self.frontier.push(id);
        debug!(room = %id, %position, %kind, %direction, "placed room");
        (id, direction)
    }

    /// Pops `top` from the frontier if it cannot grow, or grows it by one room.
    fn grow(&mut self, top: RoomId, kind: RoomKind) -> Result<(RoomId, Direction), RoomId> {
        let candidates = self.eligible_neighbors(top);
        let Some(&position) = candidates.choose(&mut self.rng) else {
            self.frontier.pop();
            return Err(top);
        };
        Ok(self.place(position, kind, top))
    }

    /// Performs a single placement or backtrack.
    ///
    /// Returns `None` once construction has ended; see [`outcome`](Self::outcome).
    pub fn step(&mut self) -> Option<BuildStep> {
        loop {
            match self.phase {
                Phase::Done(_) => return None,
                _ if cancel::is_cancelled(self.cancel.as_ref()) => {
                    self.phase = Phase::Done(BuildOutcome::Cancelled {
                        placed: self.placed(),
                        requested: self.params.room_count,
                    });
                }
                Phase::Interior if self.remaining == 0 => {
                    self.phase = if self.params.end_room {
                        Phase::End
                    } else {
                        Phase::Done(BuildOutcome::Complete)
                    };
                }
                Phase::Interior => {
                    let Some(&top) = self.frontier.last() else {
                        warn!(
                            placed = self.placed(),
                            requested = self.params.room_count,
                            "frontier exhausted before all rooms were placed"
                        );
                        self.phase = Phase::Done(BuildOutcome::Exhausted {
                            placed: self.placed(),
                            requested: self.params.room_count,
                        });
                        continue;
                    };
                    return Some(match self.grow(top, RoomKind::Interior) {
                        Ok((room, direction)) => {
                            self.remaining -= 1;
                            BuildStep::Placed {
                                room,
                                from: top,
                                direction,
                            }
                        }
                        Err(room) => BuildStep::Backtracked { room },
                    });
                }
                Phase::End => {
                    let Some(&top) = self.frontier.last() else {
                        warn!("no free floor cell left for the end room");
                        self.phase = Phase::Done(BuildOutcome::EndUnplaced);
                        continue;
                    };
                    return Some(match self.grow(top, RoomKind::End) {
                        Ok((room, direction)) => {
                            self.phase = Phase::Done(BuildOutcome::Complete);
                            BuildStep::EndPlaced {
                                room,
                                from: top,
                                direction,
                            }
                        }
                        Err(room) => BuildStep::Backtracked { room },
                    });
                }
            }
        }
    }

    /// Runs the remaining steps and returns the finished layout.
    #[must_use]
    pub fn finish(mut self) -> RoomLayout {
        let outcome = loop {
            if let Phase::Done(outcome) = self.phase {
                break outcome;
            }
            self.step();
        };
        self.graph.link_adjacent();
        RoomLayout {
            grid: self.grid,
            graph: self.graph,
            outcome,
        }
    }
}

impl Iterator for RoomGraphBuilder {
    type Item = BuildStep;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

impl FusedIterator for RoomGraphBuilder {}

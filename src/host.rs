//! Host collaborator interfaces.
//!
//! The scheduler never touches engine internals directly; everything it needs
//! from the host game comes through the traits in this module. Implement
//! [`WorldQuery`] over your tile/entity storage, [`Announcer`] over your
//! speech or toast channel, and [`ExplorationRegistry`] over whatever UI lets
//! the player cycle through nearby targets.

use crate::math::Vec2;
use crate::sources::TrackedKey;

/// One tile as seen by the scanners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileInfo {
    /// Whether the tile holds a solid feature at all.
    pub active: bool,
    pub type_id: u16,
    /// Frame coordinates within a multi-tile object's sprite sheet.
    /// `(0, 0)` is the canonical top-left cell.
    pub frame_x: i16,
    pub frame_y: i16,
    /// Liquid amount in the tile, 0 = dry.
    pub liquid: u8,
}

/// One slot of the host's active-entity array.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub slot: usize,
    pub type_id: i32,
    /// World position in pixels.
    pub position: Vec2,
    pub active: bool,
    pub hidden: bool,
    pub defeated: bool,
    /// Display name; empty when the entity has none.
    pub name: String,
}

/// One slot of the host's active dropped-item array.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInfo {
    pub slot: usize,
    pub type_id: i32,
    /// World position in pixels.
    pub position: Vec2,
    pub active: bool,
}

/// Axis-aligned pixel rectangle, used for the off-screen filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ViewRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn around(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// A rectangle containing every position; disables screen culling.
    pub fn everywhere() -> Self {
        Self {
            min: Vec2::splat(f32::NEG_INFINITY),
            max: Vec2::splat(f32::INFINITY),
        }
    }

    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.y >= self.min.y
            && position.y <= self.max.y
    }
}

/// The listener's state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    /// World position in pixels.
    pub position: Vec2,
    /// Master output volume, 0..1. Zero disables the whole subsystem.
    pub master_volume: f32,
    /// Current screen rectangle in world pixels.
    pub view: ViewRect,
}

impl Listener {
    pub fn new(position: Vec2, master_volume: f32) -> Self {
        Self {
            position,
            master_volume,
            view: ViewRect::everywhere(),
        }
    }

    pub fn with_view(mut self, view: ViewRect) -> Self {
        self.view = view;
        self
    }
}

/// Read access to the host's world state.
///
/// All queries are bounded: `tile_at` returns `None` outside the world
/// extents, and the entity/item slices expose the host's fixed-capacity
/// active arrays as-is (inactive slots included; the scanners filter them).
///
/// # Example
///
/// ```
/// use tilesonic::host::{EntityInfo, ItemInfo, TileInfo, WorldQuery};
///
/// struct EmptyWorld;
///
/// impl WorldQuery for EmptyWorld {
///     fn bounds(&self) -> (u32, u32) {
///         (0, 0)
///     }
///     fn tile_at(&self, _x: i32, _y: i32) -> Option<TileInfo> {
///         None
///     }
///     fn light_level_at(&self, _x: i32, _y: i32) -> f32 {
///         0.0
///     }
///     fn entities(&self) -> &[EntityInfo] {
///         &[]
///     }
///     fn items(&self) -> &[ItemInfo] {
///         &[]
///     }
/// }
/// ```
pub trait WorldQuery {
    /// World size in tiles, `(width, height)`.
    fn bounds(&self) -> (u32, u32);

    /// The tile at the given coordinates, or `None` outside the world.
    fn tile_at(&self, x: i32, y: i32) -> Option<TileInfo>;

    /// Light level at the given tile, 0..1.
    fn light_level_at(&self, x: i32, y: i32) -> f32;

    /// The host's active-entity array.
    fn entities(&self) -> &[EntityInfo];

    /// The host's active dropped-item array.
    fn items(&self) -> &[ItemInfo];
}

/// Fire-and-forget speech/notification output for arrival announcements.
pub trait Announcer {
    fn announce(&mut self, text: &str, interrupt: bool);
}

/// One row of the exploration snapshot handed to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationTarget {
    pub key: TrackedKey,
    pub label: String,
    pub position: Vec2,
    pub distance_tiles: f32,
}

/// The target the user picked by cycling through the exploration UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedTarget {
    pub key: TrackedKey,
    pub position: Vec2,
}

/// The UI-side registry of currently tracked candidates.
///
/// The scheduler pushes a fresh snapshot every tick and narrows its sweep to
/// the selected target while one is set; a selection that can no longer be
/// matched is cleared through [`clear_selected_target`].
///
/// [`clear_selected_target`]: ExplorationRegistry::clear_selected_target
pub trait ExplorationRegistry {
    fn update_targets(&mut self, targets: &[ExplorationTarget]);

    fn selected_target(&self) -> Option<SelectedTarget>;

    fn clear_selected_target(&mut self);
}

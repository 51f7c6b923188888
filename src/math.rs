//! Math types and tick arithmetic for TileSonic

pub use glam::Vec2;

/// Converts a pixel length to tile units.
pub fn px_to_tiles(px: f32, tile_size_px: f32) -> f32 {
    px / tile_size_px
}

/// World-space pixel position of a tile's top-left corner.
pub fn tile_origin_px(x: i32, y: i32, tile_size_px: f32) -> Vec2 {
    Vec2::new(x as f32 * tile_size_px, y as f32 * tile_size_px)
}

/// Tile coordinates containing a world-space pixel position.
pub fn px_to_tile(position: Vec2, tile_size_px: f32) -> (i32, i32) {
    (
        (position.x / tile_size_px).floor() as i32,
        (position.y / tile_size_px).floor() as i32,
    )
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Number of ticks elapsed since `then`, valid across counter wraparound.
///
/// Tick counters wrap at the `u32` bound; modular distance keeps age
/// computations correct as long as `then` is less than one full wrap cycle
/// in the past.
pub fn tick_age(now: u32, then: u32) -> u32 {
    now.wrapping_sub(then)
}

/// Whether the counter `now` has reached the target tick `target`.
///
/// Treats the counter as a modular clock: `target` counts as reached when it
/// lies within half the counter range behind `now`.
pub fn tick_reached(now: u32, target: u32) -> bool {
    now.wrapping_sub(target) < u32::MAX / 2
}

//! Runtime configuration for TileSonic

/// Tuning knobs shared by the scheduler, the spatial math, and synthesis.
///
/// All distance-flavored values are in tile units unless the name says
/// otherwise; the `tile_size_px` factor converts between the host's pixel
/// coordinates and tiles.
#[derive(Debug, Clone)]
pub struct TileSonicConfig {
    /// Edge length of one tile in world pixels.
    pub tile_size_px: f32,
    /// Cadence at which discovery sources are re-queried, in ticks.
    pub scan_interval_ticks: u32,
    /// Distance at which a candidate counts as "arrived".
    pub arrival_radius_tiles: f32,
    /// Candidates in tiles darker than this are filtered out.
    pub min_light_level: f32,
    /// Position-match tolerance for the selected-target fallback.
    pub selected_target_tolerance_tiles: f32,
    /// Exponent of the distance-falloff shaping curve.
    pub falloff_exponent: f32,
    /// Minimum factor the falloff curve can reduce volume to.
    pub falloff_floor: f32,
    /// Output scale applied to every world cue after master volume.
    pub world_cue_scale: f32,
    /// Sample rate used for tone synthesis.
    pub sample_rate: u32,
}

impl Default for TileSonicConfig {
    fn default() -> Self {
        Self {
            tile_size_px: 16.0,
            scan_interval_ticks: 30,
            arrival_radius_tiles: 1.5,
            min_light_level: 0.05,
            selected_target_tolerance_tiles: 2.0,
            falloff_exponent: 2.0,
            falloff_floor: 0.1,
            world_cue_scale: 0.7,
            sample_rate: 44100,
        }
    }
}

impl TileSonicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_size_px(mut self, size: f32) -> Self {
        self.tile_size_px = size;
        self
    }

    pub fn scan_interval_ticks(mut self, ticks: u32) -> Self {
        self.scan_interval_ticks = ticks.max(1);
        self
    }

    pub fn arrival_radius_tiles(mut self, radius: f32) -> Self {
        self.arrival_radius_tiles = radius;
        self
    }

    pub fn min_light_level(mut self, level: f32) -> Self {
        self.min_light_level = level;
        self
    }

    pub fn selected_target_tolerance_tiles(mut self, tolerance: f32) -> Self {
        self.selected_target_tolerance_tiles = tolerance;
        self
    }

    pub fn falloff(mut self, exponent: f32, floor: f32) -> Self {
        self.falloff_exponent = exponent;
        self.falloff_floor = floor.clamp(0.0, 1.0);
        self
    }

    pub fn world_cue_scale(mut self, scale: f32) -> Self {
        self.world_cue_scale = scale;
        self
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = TileSonicConfig::new()
            .tile_size_px(8.0)
            .scan_interval_ticks(0)
            .falloff(1.5, 2.0);
        assert_eq!(config.tile_size_px, 8.0);
        // Zero interval is clamped so the scheduler always rebuilds.
        assert_eq!(config.scan_interval_ticks, 1);
        assert_eq!(config.falloff_floor, 1.0);
    }
}

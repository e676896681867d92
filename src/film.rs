use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

use crate::math::{Bounds2, Point2, Spectrum, Vec2};

/// The settings for a `Film`.
#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
pub struct FilmSettings {
    /// The total film resolution.
    pub res: Vec2<u16>,
    /// The tile size to be used.
    pub tile_dim: u16,
    /// `true` if pixels need to be cleared even if the buffer is not resized.
    pub clear: bool,
}

impl Default for FilmSettings {
    fn default() -> Self {
        Self {
            res: Vec2::new(640, 480),
            tile_dim: 16,
            clear: true,
        }
    }
}

/// A film tile used for rendering.
///
/// Exclusively owned by one worker until published back through
/// [`Film::update_tile`].
#[derive(Debug, Clone)]
pub struct FilmTile {
    /// The [Film] pixel bounds for this tile.
    pub bb: Bounds2<u16>,
    /// Pixel values in this tile stored in row-major order.
    pub pixels: Vec<Spectrum>,
    /// Index of the progressive sample pass this tile belongs to.
    pub sample: u32,
    // Generation of this tile. Used to verify inputs in update_tile.
    generation: u64,
}

impl FilmTile {
    pub fn new(bb: Bounds2<u16>, generation: u64) -> Self {
        Self {
            bb,
            pixels: vec![Spectrum::zeros(); bb.area() as usize],
            sample: 0,
            generation,
        }
    }
}

/// Pixel wrapper for rendering through [FilmTile]s.
pub struct Film {
    // Resolution of the stored pixel buffer.
    res: Vec2<u16>,
    // Pixel values.
    pixels: Vec<Spectrum>,
    // Indicator for changed pixel values.
    dirty: bool,
    // Generation of the pixel buffer and tiles in flight. Used to verify
    // inputs in update_tile.
    generation: u64,
}

impl Default for Film {
    fn default() -> Self {
        Self {
            res: Vec2::new(4, 4),
            pixels: vec![Spectrum::zeros(); 4 * 4],
            dirty: true,
            generation: 0,
        }
    }
}

impl Film {
    /// Returns the resolution of the currently stored pixels of this `Film`.
    pub fn res(&self) -> Vec2<u16> {
        self.res
    }

    /// Returns the generation of the current pixel buffer and corresponding
    /// tiles.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns a reference to the pixels of this `Film`.
    pub fn pixels(&self) -> &Vec<Spectrum> {
        &self.pixels
    }

    /// Clears the indicator for changed pixel values in this `Film`.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Returns `true` if this `Film`s pixels have been written to since the
    /// last call to [`Film::clear_dirty`].
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` if `tile` belongs to the current pixel buffer.
    pub fn matches(&self, tile: &FilmTile) -> bool {
        tile.generation == self.generation
    }

    /// Resizes this `Film` according to `settings`.
    /// Note that this invalidates any tiles still held to the `Film`.
    fn resize(&mut self, settings: &FilmSettings) {
        // Bump generation for tile verification.
        self.generation += 1;

        self.res = settings.res;
        let pixel_count = (settings.res.x as usize) * (settings.res.y as usize);

        if self.pixels.len() != pixel_count || settings.clear {
            self.pixels = vec![Spectrum::zeros(); pixel_count];
            self.dirty = true;
        }
    }

    /// Updates this `Film` with the pixel values in a [FilmTile].
    ///
    /// The tile's pass index drives progressive accumulation: pass 0
    /// overwrites, later passes blend with the running per-pixel average.
    /// Tiles from a stale generation are rejected.
    pub fn update_tile(&mut self, tile: &FilmTile) {
        if !self.matches(tile) {
            vermeer_error!(
                "Tile generation {} doesn't match film generation {}",
                tile.generation,
                self.generation
            );
            return;
        }

        let tile_min = tile.bb.p_min;
        let tile_max = tile.bb.p_max;

        if tile_max.x > self.res.x || tile_max.y > self.res.y {
            vermeer_error!("Tile doesn't fit film ({:?} {:?})", self.res, tile.bb);
            return;
        }

        let tile_width = tile.bb.width() as usize;
        let lerp_t = 1.0 / (tile.sample + 1) as f32;

        for (tile_row, film_row) in ((tile_min.y as usize)..(tile_max.y as usize)).enumerate() {
            let film_row_offset = film_row * (self.res.x as usize);

            let film_slice_start = film_row_offset + (tile_min.x as usize);
            let film_slice_end = film_row_offset + (tile_max.x as usize);

            let tile_slice_start = tile_row * tile_width;
            let tile_slice_end = (tile_row + 1) * tile_width;

            let film_slice = &mut self.pixels[film_slice_start..film_slice_end];
            let tile_slice = &tile.pixels[tile_slice_start..tile_slice_end];

            if tile.sample == 0 {
                film_slice.copy_from_slice(tile_slice);
            } else {
                for (film_px, tile_px) in film_slice.iter_mut().zip(tile_slice.iter()) {
                    *film_px = film_px.lerp(*tile_px, lerp_t);
                }
            }
        }
        self.dirty = true;
    }
}

/// Resizes the `Film` according to current `settings` if necessary and
/// returns [FilmTile]s for rendering in row-major order.
/// [FilmTile]s from previous calls should no longer be used.
pub fn film_tiles(film: &Arc<Mutex<Film>>, settings: &FilmSettings) -> VecDeque<FilmTile> {
    // Only lock the film for the duration of resizing
    let film_gen = {
        vermeer_debug!("Resizing film");
        let mut film = film.lock().unwrap();
        film.resize(settings);
        film.generation()
    };

    vermeer_debug!("Generating tiles");
    let mut tiles = VecDeque::new();
    let dim = settings.tile_dim.max(1);
    for j in (0..settings.res.y).step_by(dim as usize) {
        for i in (0..settings.res.x).step_by(dim as usize) {
            // Limit tiles to film dimensions
            let max_x = (i + dim).min(settings.res.x);
            let max_y = (j + dim).min(settings.res.y);

            tiles.push_back(FilmTile::new(
                Bounds2::new(Point2::new(i, j), Point2::new(max_x, max_y)),
                film_gen,
            ));
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_settings() -> FilmSettings {
        FilmSettings {
            res: Vec2::new(32, 24),
            tile_dim: 16,
            clear: true,
        }
    }

    #[test]
    fn tiles_cover_the_film_in_row_major_order() {
        let film = Arc::new(Mutex::new(Film::default()));
        let tiles = film_tiles(&film, &test_settings());

        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0].bb.p_min, Point2::new(0, 0));
        assert_eq!(tiles[1].bb.p_min, Point2::new(16, 0));
        assert_eq!(tiles[2].bb.p_min, Point2::new(0, 16));
        // Edge tiles are clamped to the resolution
        assert_eq!(tiles[2].bb.p_max, Point2::new(16, 24));
        let area: u32 = tiles.iter().map(|t| t.bb.area() as u32).sum();
        assert_eq!(area, 32 * 24);
    }

    #[test]
    fn films_smaller_than_a_tile_get_one_clamped_tile() {
        let film = Arc::new(Mutex::new(Film::default()));
        let settings = FilmSettings {
            res: Vec2::new(8, 8),
            tile_dim: 16,
            clear: true,
        };
        let tiles = film_tiles(&film, &settings);

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].bb.p_min, Point2::new(0, 0));
        assert_eq!(tiles[0].bb.p_max, Point2::new(8, 8));
        assert_eq!(film.lock().unwrap().res(), Vec2::new(8, 8));
    }

    #[test]
    fn stale_tiles_are_rejected() {
        let film = Arc::new(Mutex::new(Film::default()));
        let mut stale = film_tiles(&film, &test_settings()).pop_front().unwrap();
        stale.pixels.fill(Spectrum::ones());

        // Resize bumps the generation, invalidating held tiles
        let _ = film_tiles(&film, &test_settings());

        let mut film = film.lock().unwrap();
        film.clear_dirty();
        film.update_tile(&stale);
        assert!(!film.dirty());
        assert!(film.pixels().iter().all(Spectrum::is_black));
    }

    #[test]
    fn progressive_passes_average() {
        let film = Arc::new(Mutex::new(Film::default()));
        let mut tiles = film_tiles(&film, &test_settings());
        let mut tile = tiles.pop_front().unwrap();

        tile.pixels.fill(Spectrum::from(1.0));
        tile.sample = 0;
        film.lock().unwrap().update_tile(&tile);

        tile.pixels.fill(Spectrum::from(0.0));
        tile.sample = 1;
        film.lock().unwrap().update_tile(&tile);

        let film = film.lock().unwrap();
        assert_abs_diff_eq!(film.pixels()[0], Spectrum::from(0.5));
        assert!(film.dirty());
    }
}

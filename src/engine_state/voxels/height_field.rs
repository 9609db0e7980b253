//! # Height Field Module
//!
//! Deterministic 2D terrain height functions. A height field maps a world
//! column `(x, z)` to a signed offset from sea level; the same inputs always
//! yield the same height, so chunks generated on different threads or at
//! different times agree on their shared borders.
//!
//! ## Strategies
//!
//! * [`SineHeightField`]: product of two sines, no randomness
//! * [`PerlinHeightField`]: 2D gradient noise over a permutation table shuffled
//!   once from a seed
//! * [`FbmHeightField`]: multi-octave Perlin noise from the `noise` crate
//!
//! Any `Fn(i32, i32) -> i32` closure is also a height field, which is handy
//! for hand-shaped test terrain.

use std::sync::Arc;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::{HeightStrategy, WorldConfig};

/// A pure function from world column to height offset.
pub trait HeightField: Send + Sync {
    fn height(&self, world_x: i32, world_z: i32) -> i32;
}

impl<F> HeightField for F
where
    F: Fn(i32, i32) -> i32 + Send + Sync,
{
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        self(world_x, world_z)
    }
}

/// `trunc(amplitude * sin(f*x) * sin(f*z))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineHeightField {
    pub amplitude: f64,
    pub frequency: f64,
}

impl Default for SineHeightField {
    fn default() -> Self {
        Self {
            amplitude: 5.0,
            frequency: 0.1,
        }
    }
}

impl HeightField for SineHeightField {
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let y = self.amplitude
            * (self.frequency * world_x as f64).sin()
            * (self.frequency * world_z as f64).sin();
        y as i32
    }
}

/// Classic 2D gradient noise with its own permutation table.
///
/// The 256-entry table is shuffled once from the seed and stored twice so
/// that corner hashes never need wrapping.
#[derive(Clone)]
pub struct PerlinHeightField {
    permutation: [u8; 512],
    amplitude: f64,
    frequency: f64,
}

impl PerlinHeightField {
    pub fn new(seed: u64, amplitude: f64, frequency: f64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut table: Vec<u8> = (0..=255).collect();
        rng.shuffle(&mut table);

        let mut permutation = [0u8; 512];
        for (i, entry) in permutation.iter_mut().enumerate() {
            *entry = table[i & 255];
        }

        Self {
            permutation,
            amplitude,
            frequency,
        }
    }

    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        match hash & 3 {
            0 => x + y,
            1 => -x + y,
            2 => x - y,
            _ => -x - y,
        }
    }

    #[inline]
    fn hash(&self, x: usize, y: usize) -> u8 {
        self.permutation[self.permutation[x] as usize + y]
    }

    /// Raw noise in roughly `-1.0..=1.0`. Integer lattice points are always 0.
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let (x0, y0) = (x.floor(), y.floor());
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let (xf, yf) = (x - x0, y - y0);
        let (u, v) = (Self::fade(xf), Self::fade(yf));

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let bottom = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let top = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        Self::lerp(bottom, top, v)
    }
}

impl HeightField for PerlinHeightField {
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self.noise(
            world_x as f64 * self.frequency,
            world_z as f64 * self.frequency,
        );
        (self.amplitude * sample) as i32
    }
}

/// Fractal Brownian motion over Perlin noise.
pub struct FbmHeightField {
    fbm: Fbm<Perlin>,
    amplitude: f64,
    frequency: f64,
}

impl FbmHeightField {
    pub const OCTAVES: usize = 4;

    pub fn new(seed: u32, amplitude: f64, frequency: f64) -> Self {
        Self {
            fbm: Fbm::<Perlin>::new(seed).set_octaves(Self::OCTAVES),
            amplitude,
            frequency,
        }
    }
}

impl HeightField for FbmHeightField {
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self.fbm.get([
            world_x as f64 * self.frequency,
            world_z as f64 * self.frequency,
        ]);
        (self.amplitude * sample) as i32
    }
}

/// Builds the height field selected by `config.height_strategy`.
pub fn height_field_from_config(config: &WorldConfig) -> Arc<dyn HeightField> {
    log::info!(
        "Height field: {:?} (amplitude {}, frequency {}, seed {})",
        config.height_strategy,
        config.height_amplitude,
        config.height_frequency,
        config.seed
    );
    match config.height_strategy {
        HeightStrategy::Sine => Arc::new(SineHeightField {
            amplitude: config.height_amplitude,
            frequency: config.height_frequency,
        }),
        HeightStrategy::Perlin => Arc::new(PerlinHeightField::new(
            config.seed,
            config.height_amplitude,
            config.height_frequency,
        )),
        HeightStrategy::Fbm => Arc::new(FbmHeightField::new(
            config.seed as u32,
            config.height_amplitude,
            config.height_frequency,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_matches_the_closed_form() {
        let field = SineHeightField::default();
        assert_eq!(field.height(0, 0), 0);
        // 5 * sin(1.6) * sin(1.6) = 4.98
        assert_eq!(field.height(16, 16), 4);
        assert_eq!(field.height(16, -16), -4);
    }

    #[test]
    fn perlin_is_seeded_and_deterministic() {
        let a = PerlinHeightField::new(7, 20.0, 0.05);
        let b = PerlinHeightField::new(7, 20.0, 0.05);
        let c = PerlinHeightField::new(8, 20.0, 0.05);

        let sample = |f: &PerlinHeightField| {
            (-40..40)
                .step_by(3)
                .flat_map(|x| (-40..40).step_by(5).map(move |z| (x, z)))
                .map(|(x, z)| f.height(x, z))
                .collect::<Vec<_>>()
        };
        assert_eq!(sample(&a), sample(&b));
        assert_ne!(sample(&a), sample(&c));
    }

    #[test]
    fn perlin_vanishes_on_lattice_points_and_stays_bounded() {
        let field = PerlinHeightField::new(3, 1.0, 1.0);
        assert_eq!(field.noise(4.0, -9.0), 0.0);
        for i in 0..200 {
            let v = field.noise(i as f64 * 0.37, i as f64 * -0.61);
            assert!((-1.01..=1.01).contains(&v), "{v}");
        }
    }

    #[test]
    fn fbm_is_deterministic() {
        let a = FbmHeightField::new(11, 10.0, 0.02);
        let b = FbmHeightField::new(11, 10.0, 0.02);
        for (x, z) in [(0, 0), (17, -3), (-250, 999)] {
            assert_eq!(a.height(x, z), b.height(x, z));
        }
    }

    #[test]
    fn closures_are_height_fields() {
        let step = |x: i32, _z: i32| if x < 16 { 0 } else { 3 };
        assert_eq!(step.height(15, 0), 0);
        assert_eq!(step.height(16, 0), 3);
    }
}

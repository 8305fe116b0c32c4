//! Deterministic unit-interval generator keyed by strings.
//!
//! World generation never draws from a stateful RNG. Every decision is a pure function of a key
//! derived from the cell coordinates, so the same cell spawns the same cache on every run and
//! platform. Implement [`LuckSource`] to plug in a different generator; [`HashLuck`] is the
//! default.
use crate::grid::CellCoord;

/// Discriminator appended to a cell key when drawing its initial coin count.
pub const INITIAL_VALUE_KEY: &str = "initialValue";

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Pure mapping from a key to a reproducible value in `[0, 1)`.
pub trait LuckSource {
    fn luck(&self, key: &str) -> f64;
}

impl<F> LuckSource for F
where
    F: Fn(&str) -> f64,
{
    #[inline]
    fn luck(&self, key: &str) -> f64 {
        self(key)
    }
}

/// Builds the key for a cell: `"lat,lng"`, or `"lat,lng,discriminator"` when one is given.
pub fn cell_key(coord: CellCoord, discriminator: Option<&str>) -> String {
    match discriminator {
        Some(d) => format!("{},{},{}", coord.lat, coord.lng, d),
        None => format!("{},{}", coord.lat, coord.lng),
    }
}

/// Hash-based [`LuckSource`]: FNV-1a over the key bytes, finalized with a 64-bit mixer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashLuck {
    salt: u64,
}

impl HashLuck {
    pub fn new() -> Self {
        Self { salt: 0 }
    }

    /// A generator whose outputs are decorrelated from the unsalted one.
    pub fn with_salt(salt: u64) -> Self {
        Self { salt }
    }

    pub fn salt(&self) -> u64 {
        self.salt
    }
}

impl LuckSource for HashLuck {
    fn luck(&self, key: &str) -> f64 {
        unit_from_bits(mix_u64(fnv1a(key.as_bytes()) ^ self.salt))
    }
}

/// Maps the top 53 bits of `bits` onto `[0, 1)`.
#[inline]
pub fn unit_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

#[inline]
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        (h ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

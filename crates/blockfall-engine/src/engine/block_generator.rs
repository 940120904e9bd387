use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{BlockColor, ShapeKind};

use super::{block_controller::Block, color_bag::ColorBag};

/// Produces new blocks: a uniformly random catalog shape and the next color
/// from a [`ColorBag`].
///
/// All randomness comes from a single PCG generator seeded with a
/// [`GameSeed`], so two generators built from the same seed and colors
/// produce the same blocks.
///
/// # Example
///
/// ```
/// use blockfall_engine::{BlockColor, BlockGenerator, GameSeed};
///
/// let colors: Vec<BlockColor> = ["red", "blue"].map(BlockColor::from).to_vec();
/// let seed: GameSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
///
/// let mut a = BlockGenerator::with_seed(colors.clone(), seed);
/// let mut b = BlockGenerator::with_seed(colors, seed);
/// assert_eq!(a.generate(), b.generate());
/// ```
#[derive(Debug, Clone)]
pub struct BlockGenerator {
    seed: GameSeed,
    rng: Pcg32,
    color_bag: ColorBag,
}

impl BlockGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new(colors: Vec<BlockColor>) -> Self {
        Self::with_seed(colors, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(colors: Vec<BlockColor>, seed: GameSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
            color_bag: ColorBag::new(colors),
        }
    }

    #[must_use]
    pub fn seed(&self) -> GameSeed {
        self.seed
    }

    #[must_use]
    pub fn color_bag(&self) -> &ColorBag {
        &self.color_bag
    }

    /// Generates the next block.
    ///
    /// # Panics
    ///
    /// Panics if the generator was built with an empty color list.
    /// [`EngineConfig::validate`](crate::EngineConfig::validate) rules that out.
    pub fn generate(&mut self) -> Block {
        let kind: ShapeKind = self.rng.random();
        let color = self
            .color_bag
            .pop(&mut self.rng)
            .expect("color set should never be empty");
        Block {
            shape: kind.shape(),
            color,
        }
    }

    /// Throws away the colors left in the bag, so the next block starts a new cycle.
    pub fn discard_color_bag(&mut self) {
        self.color_bag.discard();
    }
}

/// Seed for deterministic block generation.
///
/// A 128-bit value, written as 32 hexadecimal digits both in its
/// [`Display`](fmt::Display)/[`FromStr`] form and when serialized.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameSeed;
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    reason: String,
}

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParseSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

//! Routing key to partition mapping
//!
//! A router is a pure function of the key and the partition count, so the
//! same key always lands in the same partition for the life of a queue.
//! Producers use this to keep related items (one flow, one resource) in a
//! single FIFO.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied routing value
///
/// The queue never interprets the key beyond routing. Signed integers are
/// reinterpreted as two's-complement so zero and negative keys are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RoutingKey(pub u64);

impl RoutingKey {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! routing_key_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for RoutingKey {
            fn from(value: $t) -> Self {
                RoutingKey(value as u64)
            }
        })*
    };
}

macro_rules! routing_key_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for RoutingKey {
            fn from(value: $t) -> Self {
                RoutingKey(value as i64 as u64)
            }
        })*
    };
}

routing_key_from_unsigned!(u8, u16, u32, u64, usize);
routing_key_from_signed!(i8, i16, i32, i64, isize);

/// Maps a routing key onto a partition index in `[0, partitions)`
///
/// Implementations must be deterministic and total. `partitions` is always at
/// least 1; the queue validates that at construction.
pub trait Router: Send + Sync + fmt::Debug {
    fn route(&self, key: RoutingKey, partitions: usize) -> usize;
}

/// `key mod partitions`
///
/// Evenly spreads sequential keys, which is what decoders produce when keying
/// by flow or agent id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloRouter;

impl Router for ModuloRouter {
    fn route(&self, key: RoutingKey, partitions: usize) -> usize {
        (key.0 % partitions as u64) as usize
    }
}

/// Scrambles the key before the modulo
///
/// Useful when keys share low bits (e.g. aligned addresses) and plain modulo
/// would pile them onto a few partitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixRouter;

impl MixRouter {
    // splitmix64 finaliser
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^ (x >> 31)
    }
}

impl Router for MixRouter {
    fn route(&self, key: RoutingKey, partitions: usize) -> usize {
        (Self::mix(key.0) % partitions as u64) as usize
    }
}

/// Router selection as it appears in configuration files
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RouterKind {
    #[default]
    Modulo,
    Mix,
}

impl RouterKind {
    pub fn build(self) -> Box<dyn Router> {
        match self {
            RouterKind::Modulo => Box::new(ModuloRouter),
            RouterKind::Mix => Box::new(MixRouter),
        }
    }
}

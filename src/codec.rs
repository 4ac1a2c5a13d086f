//! Voter identifier generation and display masking.
//!
//! Identifiers are `prefix + unix_millis + random`, where `random` is drawn
//! from `[0, 10000)` and rendered without padding. Uniqueness is heuristic:
//! two calls in the same millisecond that draw the same random value produce
//! the same identifier, and because the random suffix is variable-width,
//! different `(millis, random)` pairs can also concatenate to the same string.
//! Nothing here detects or retries on collision.

use rand::Rng;

use crate::types::{TimestampMs, VoterId};

/// Placeholder for an absent identifier.
pub const MISSING_PLACEHOLDER: &str = "N/A";
/// Glyph substituted for each hidden character.
pub const MASK_GLYPH: char = '\u{2022}';
/// Exclusive upper bound of the random suffix.
pub const RANDOM_SUFFIX_BOUND: u32 = 10_000;

const VISIBLE_HEAD: usize = 6;
const VISIBLE_TAIL: usize = 4;

/// Mints and formats voter identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterIdCodec {
    prefix: String,
}

impl Default for VoterIdCodec {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_VOTER_ID_PREFIX)
    }
}

impl VoterIdCodec {
    /// Creates a codec emitting identifiers with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Generates an identifier for `now_ms` with a fresh random suffix.
    pub fn generate(&self, now_ms: TimestampMs) -> VoterId {
        let random = rand::thread_rng().gen_range(0..RANDOM_SUFFIX_BOUND);
        self.compose(now_ms, random)
    }

    /// Builds an identifier from explicit parts.
    pub fn compose(&self, now_ms: TimestampMs, random: u32) -> VoterId {
        format!("{}{now_ms}{random}", self.prefix)
    }

    /// Returns true when `id` has this codec's prefix followed only by digits.
    pub fn is_well_formed(&self, id: &str) -> bool {
        id.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Obscures all but the first six and last four characters.
    ///
    /// Absent or empty input yields [`MISSING_PLACEHOLDER`]; input of ten
    /// characters or fewer is returned unchanged. Output length always equals
    /// input length, counted in chars.
    pub fn mask(voter_id: Option<&str>) -> String {
        let Some(id) = voter_id.filter(|id| !id.is_empty()) else {
            return MISSING_PLACEHOLDER.to_string();
        };

        let len = id.chars().count();
        if len <= VISIBLE_HEAD + VISIBLE_TAIL {
            return id.to_string();
        }

        id.chars()
            .enumerate()
            .map(|(idx, ch)| {
                if idx < VISIBLE_HEAD || idx >= len - VISIBLE_TAIL {
                    ch
                } else {
                    MASK_GLYPH
                }
            })
            .collect()
    }

    /// Returns the identifier unchanged.
    pub fn unmask(voter_id: &str) -> &str {
        voter_id
    }

    /// Full identifier when `visible`, masked otherwise.
    pub fn render(voter_id: &str, visible: bool) -> String {
        if visible {
            Self::unmask(voter_id).to_string()
        } else {
            Self::mask(Some(voter_id))
        }
    }
}

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Gameplay modifiers active during a play, as stored in the score database.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Mods: u32 {
        const NO_FAIL = 1;
        const EASY = 1 << 1;
        const TOUCH_DEVICE = 1 << 2;
        const HIDDEN = 1 << 3;
        const HARD_ROCK = 1 << 4;
        const SUDDEN_DEATH = 1 << 5;
        const DOUBLE_TIME = 1 << 6;
        const RELAX = 1 << 7;
        const HALF_TIME = 1 << 8;
        /// Always stored together with `DOUBLE_TIME`.
        const NIGHTCORE = 1 << 9;
        const FLASHLIGHT = 1 << 10;
        const AUTOPLAY = 1 << 11;
        const SPUN_OUT = 1 << 12;
        const AUTOPILOT = 1 << 13;
        /// Always stored together with `SUDDEN_DEATH`.
        const PERFECT = 1 << 14;
        const KEY4 = 1 << 15;
        const KEY5 = 1 << 16;
        const KEY6 = 1 << 17;
        const KEY7 = 1 << 18;
        const KEY8 = 1 << 19;
        const FADE_IN = 1 << 20;
        const RANDOM = 1 << 21;
        const CINEMA = 1 << 22;
        const TARGET = 1 << 23;
        const KEY9 = 1 << 24;
        const KEY_COOP = 1 << 25;
        const KEY1 = 1 << 26;
        const KEY3 = 1 << 27;
        const KEY2 = 1 << 28;
        const SCORE_V2 = 1 << 29;
        const MIRROR = 1 << 30;
    }
}

/// Short display names in bit order.
const SHORT_NAMES: &[(Mods, &str)] = &[
    (Mods::NO_FAIL, "NF"),
    (Mods::EASY, "EZ"),
    (Mods::TOUCH_DEVICE, "TD"),
    (Mods::HIDDEN, "HD"),
    (Mods::HARD_ROCK, "HR"),
    (Mods::SUDDEN_DEATH, "SD"),
    (Mods::DOUBLE_TIME, "DT"),
    (Mods::RELAX, "RX"),
    (Mods::HALF_TIME, "HT"),
    (Mods::NIGHTCORE, "NC"),
    (Mods::FLASHLIGHT, "FL"),
    (Mods::AUTOPLAY, "AU"),
    (Mods::SPUN_OUT, "SO"),
    (Mods::AUTOPILOT, "AP"),
    (Mods::PERFECT, "PF"),
    (Mods::KEY4, "4K"),
    (Mods::KEY5, "5K"),
    (Mods::KEY6, "6K"),
    (Mods::KEY7, "7K"),
    (Mods::KEY8, "8K"),
    (Mods::FADE_IN, "FI"),
    (Mods::RANDOM, "RD"),
    (Mods::CINEMA, "CN"),
    (Mods::TARGET, "TP"),
    (Mods::KEY9, "9K"),
    (Mods::KEY_COOP, "CO"),
    (Mods::KEY1, "1K"),
    (Mods::KEY3, "3K"),
    (Mods::KEY2, "2K"),
    (Mods::SCORE_V2, "V2"),
    (Mods::MIRROR, "MR"),
];

impl Mods {
    /// Builds a mod set from the raw signed value stored on disk, keeping unknown bits.
    pub fn from_raw(value: i32) -> Self {
        Self::from_bits_retain(value as u32)
    }

    /// Raw signed value as stored on disk.
    pub fn to_raw(self) -> i32 {
        self.bits() as i32
    }

    /// Concatenated short names, e.g. `HDHR`. No mods renders as an empty string.
    ///
    /// `NC` and `PF` hide the `DT` and `SD` bits they always carry.
    pub fn short_names(self) -> String {
        let mut out = String::new();
        for &(flag, name) in SHORT_NAMES {
            if !self.contains(flag) {
                continue;
            }
            if flag == Mods::DOUBLE_TIME && self.contains(Mods::NIGHTCORE) {
                continue;
            }
            if flag == Mods::SUDDEN_DEATH && self.contains(Mods::PERFECT) {
                continue;
            }
            out.push_str(name);
        }
        out
    }
}

impl Default for Mods {
    fn default() -> Self {
        Mods::empty()
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_names())
    }
}

/// Returned when a mod string contains an unknown two-letter code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mod code: {0}")]
pub struct ParseModsError(pub String);

impl FromStr for Mods {
    type Err = ParseModsError;

    /// Parses concatenated short names (`HDHR`, `hd hr`, `HD,DT`). `NC` and `PF`
    /// also set the bits they imply.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',' && *c != '+')
            .collect::<String>()
            .to_ascii_uppercase();
        if compact.is_empty() || compact == "NM" {
            return Ok(Mods::empty());
        }
        if compact.len() % 2 != 0 {
            return Err(ParseModsError(compact));
        }

        let mut mods = Mods::empty();
        for chunk in compact.as_bytes().chunks(2) {
            let code = std::str::from_utf8(chunk).map_err(|_| ParseModsError(compact.clone()))?;
            let flag = SHORT_NAMES
                .iter()
                .find(|(_, name)| *name == code)
                .map(|(flag, _)| *flag)
                .ok_or_else(|| ParseModsError(code.to_string()))?;
            mods |= flag;
        }
        if mods.contains(Mods::NIGHTCORE) {
            mods |= Mods::DOUBLE_TIME;
        }
        if mods.contains(Mods::PERFECT) {
            mods |= Mods::SUDDEN_DEATH;
        }
        Ok(mods)
    }
}

/// Renders a mod set for use in collection names.
pub trait ModTranslator: Send + Sync {
    fn mods_to_string(&self, mods: Mods) -> String;
}

/// Default translator: concatenated short names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortModNames;

impl ModTranslator for ShortModNames {
    fn mods_to_string(&self, mods: Mods) -> String {
        mods.short_names()
    }
}

impl<F> ModTranslator for F
where
    F: Fn(Mods) -> String + Send + Sync,
{
    fn mods_to_string(&self, mods: Mods) -> String {
        self(mods)
    }
}

/// Serde adapter storing mods as short names in configuration files.
pub mod short_names {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Mods;

    pub fn serialize<S: Serializer>(mods: &Mods, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&mods.short_names())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mods, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

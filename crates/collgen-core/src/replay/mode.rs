use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// Ruleset a score was set in. Decides which accuracy formula applies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, IntoStaticStr,
)]
pub enum PlayMode {
    #[default]
    #[strum(serialize = "osu!")]
    Osu,
    #[strum(serialize = "osu!taiko")]
    Taiko,
    #[strum(serialize = "osu!catch")]
    CatchTheBeat,
    #[strum(serialize = "osu!mania")]
    OsuMania,
    /// Mode byte outside the known range, kept so the record re-encodes unchanged.
    #[strum(serialize = "unknown")]
    Unknown(u8),
}

impl PlayMode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Osu,
            1 => Self::Taiko,
            2 => Self::CatchTheBeat,
            3 => Self::OsuMania,
            other => Self::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Osu => 0,
            Self::Taiko => 1,
            Self::CatchTheBeat => 2,
            Self::OsuMania => 3,
            Self::Unknown(value) => value,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for PlayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

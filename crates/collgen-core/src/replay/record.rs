use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::binary::{ByteBuffer, ByteWriter};
use crate::config::database::ONLINE_SCORE_ID_VERSION;
use crate::error::Result;
use crate::score::Mods;

use super::mode::PlayMode;
use super::ticks::ticks_to_datetime;

/// Sentinel for scores without an online identifier.
pub const NO_ONLINE_SCORE_ID: i64 = -1;

/// Judgement counts of a play. Meaning of `geki`/`katu` depends on the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounts {
    pub c300: i16,
    pub c100: i16,
    pub c50: i16,
    pub geki: i16,
    pub katu: i16,
    pub miss: i16,
}

impl HitCounts {
    fn clamped(&self) -> [f64; 6] {
        [
            self.c300, self.c100, self.c50, self.geki, self.katu, self.miss,
        ]
        .map(|v| f64::from(v.max(0)))
    }

    /// Accuracy in `[0, 1]` for the given mode.
    ///
    /// Returns `0.0` for unknown modes and whenever no judgements were recorded.
    pub fn accuracy(&self, mode: PlayMode) -> f64 {
        let [c300, c100, c50, geki, katu, miss] = self.clamped();
        let (achieved, possible) = match mode {
            PlayMode::Osu => (
                300.0 * c300 + 100.0 * c100 + 50.0 * c50,
                300.0 * (c300 + c100 + c50 + miss),
            ),
            PlayMode::Taiko => (c300 + 0.5 * c100, c300 + c100 + miss),
            PlayMode::CatchTheBeat => (c300 + c100 + c50, c300 + c100 + c50 + katu + miss),
            PlayMode::OsuMania => (
                300.0 * (c300 + geki) + 200.0 * katu + 100.0 * c100 + 50.0 * c50,
                300.0 * (c300 + c100 + c50 + geki + katu + miss),
            ),
            PlayMode::Unknown(_) => return 0.0,
        };
        if possible == 0.0 {
            return 0.0;
        }
        achieved / possible
    }
}

/// A single play on a beatmap as kept by the score store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub mode: PlayMode,
    pub map_hash: String,
    pub player_name: String,
    pub hits: HitCounts,
    pub total_score: i32,
    pub max_combo: i16,
    pub perfect: bool,
    #[serde(with = "crate::score::mods::short_names")]
    pub mods: Mods,
    /// `None` when the stored tick count was not a valid date.
    pub played_at: Option<DateTime<Utc>>,
    pub online_score_id: i64,
}

impl Score {
    /// Accuracy according to this score's mode.
    pub fn accuracy(&self) -> f64 {
        self.hits.accuracy(self.mode)
    }

    pub fn has_online_id(&self) -> bool {
        self.online_score_id != NO_ONLINE_SCORE_ID
    }
}

impl Default for Score {
    fn default() -> Self {
        Self {
            mode: PlayMode::default(),
            map_hash: String::new(),
            player_name: String::new(),
            hits: HitCounts::default(),
            total_score: 0,
            max_combo: 0,
            perfect: false,
            mods: Mods::empty(),
            played_at: None,
            online_score_id: NO_ONLINE_SCORE_ID,
        }
    }
}

bitflags! {
    /// String fields of a [`Replay`] that were stored as absent (`0x00`) rather
    /// than as a present, possibly empty, string.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AbsentStrings: u8 {
        const MAP_HASH = 1;
        const PLAYER_NAME = 1 << 1;
        const REPLAY_HASH = 1 << 2;
        const REPLAY_DATA = 1 << 3;
    }
}

impl Default for AbsentStrings {
    fn default() -> Self {
        AbsentStrings::empty()
    }
}

/// A decoded replay/score entry, including the fields only needed to re-encode it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Replay {
    pub score: Score,
    pub version: i32,
    pub replay_hash: String,
    pub replay_data: String,
    /// Empty strings in this set are written back as absent.
    pub absent_strings: AbsentStrings,
    pub date_ticks: i64,
    /// Length as stored; may be zero or negative for "no payload".
    pub compressed_replay_length: i32,
    /// Payload bytes; `None` when read with `minimal_load`.
    pub compressed_replay: Option<Vec<u8>>,
}

impl Replay {
    /// Decodes one record and advances `buf` exactly past it.
    ///
    /// With `minimal_load` the compressed payload is skipped rather than copied.
    /// On error `buf` is left where it was.
    pub fn read(buf: &mut ByteBuffer<'_>, minimal_load: bool) -> Result<Self> {
        let mut cursor = buf.clone();
        let replay = Self::read_fields(&mut cursor, minimal_load)?;
        *buf = cursor;
        Ok(replay)
    }

    fn read_fields(buf: &mut ByteBuffer<'_>, minimal_load: bool) -> Result<Self> {
        let mut absent_strings = AbsentStrings::empty();

        let mode = PlayMode::from_u8(buf.read_u8()?);
        let version = buf.read_i32()?;
        let map_hash = read_marked(buf, &mut absent_strings, AbsentStrings::MAP_HASH)?;
        let player_name = read_marked(buf, &mut absent_strings, AbsentStrings::PLAYER_NAME)?;
        let replay_hash = read_marked(buf, &mut absent_strings, AbsentStrings::REPLAY_HASH)?;
        let hits = HitCounts {
            c300: buf.read_i16()?,
            c100: buf.read_i16()?,
            c50: buf.read_i16()?,
            geki: buf.read_i16()?,
            katu: buf.read_i16()?,
            miss: buf.read_i16()?,
        };
        let total_score = buf.read_i32()?;
        let max_combo = buf.read_i16()?;
        let perfect = buf.read_bool()?;
        let mods = Mods::from_raw(buf.read_i32()?);
        let replay_data = read_marked(buf, &mut absent_strings, AbsentStrings::REPLAY_DATA)?;
        let date_ticks = buf.read_i64()?;
        let compressed_replay_length = buf.read_i32()?;

        let payload_len = usize::try_from(compressed_replay_length).unwrap_or(0);
        let compressed_replay = if minimal_load {
            buf.skip(payload_len)?;
            None
        } else {
            Some(buf.read_bytes(payload_len)?.to_vec())
        };

        let online_score_id = if version >= ONLINE_SCORE_ID_VERSION {
            buf.read_i64()?
        } else {
            NO_ONLINE_SCORE_ID
        };

        trace!(
            "Decoded score by {} on {} ({} bytes payload)",
            player_name, map_hash, payload_len
        );

        Ok(Self {
            score: Score {
                mode,
                map_hash,
                player_name,
                hits,
                total_score,
                max_combo,
                perfect,
                mods,
                played_at: ticks_to_datetime(date_ticks),
                online_score_id,
            },
            version,
            replay_hash,
            replay_data,
            absent_strings,
            date_ticks,
            compressed_replay_length,
            compressed_replay,
        })
    }

    /// Encodes the record in the same layout `read` consumes.
    ///
    /// A record whose payload was skipped is written with a zero length.
    pub fn write(&self, w: &mut ByteWriter) {
        let score = &self.score;
        w.write_u8(score.mode.as_u8());
        w.write_i32(self.version);
        w.write_optional_string(self.stored(&score.map_hash, AbsentStrings::MAP_HASH));
        w.write_optional_string(self.stored(&score.player_name, AbsentStrings::PLAYER_NAME));
        w.write_optional_string(self.stored(&self.replay_hash, AbsentStrings::REPLAY_HASH));
        w.write_i16(score.hits.c300);
        w.write_i16(score.hits.c100);
        w.write_i16(score.hits.c50);
        w.write_i16(score.hits.geki);
        w.write_i16(score.hits.katu);
        w.write_i16(score.hits.miss);
        w.write_i32(score.total_score);
        w.write_i16(score.max_combo);
        w.write_bool(score.perfect);
        w.write_i32(score.mods.to_raw());
        w.write_optional_string(self.stored(&self.replay_data, AbsentStrings::REPLAY_DATA));
        w.write_i64(self.date_ticks);

        match &self.compressed_replay {
            Some(payload) if !payload.is_empty() => {
                w.write_count(payload.len());
                w.write_bytes(payload);
            }
            // keep a stored zero/negative length as-is
            Some(_) => w.write_i32(self.compressed_replay_length.min(0)),
            None => w.write_i32(0),
        }

        if self.version >= ONLINE_SCORE_ID_VERSION {
            w.write_i64(score.online_score_id);
        }
    }

    /// `value` as it was read: `None` only for an empty string that was absent.
    fn stored<'a>(&self, value: &'a str, field: AbsentStrings) -> Option<&'a str> {
        if value.is_empty() && self.absent_strings.contains(field) {
            None
        } else {
            Some(value)
        }
    }

    pub fn into_score(self) -> Score {
        self.score
    }
}

fn read_marked(
    buf: &mut ByteBuffer<'_>,
    absent: &mut AbsentStrings,
    field: AbsentStrings,
) -> Result<String> {
    let value = buf.read_optional_string()?;
    absent.set(field, value.is_none());
    Ok(value.unwrap_or_default())
}

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::binary::{ByteBuffer, ByteWriter};
use crate::config::database::SCORES_DB_VERSION;
use crate::error::{Error, Result};
use crate::replay::Replay;

/// Replays recorded on one beatmap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatmapScores {
    pub map_hash: String,
    pub replays: Vec<Replay>,
}

/// Contents of a `scores.db` file.
///
/// Layout: `i32 version`, `i32 beatmap count`, then per beatmap a hash string,
/// `i32 score count` and that many replay records.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoresDb {
    pub version: i32,
    pub beatmaps: Vec<BeatmapScores>,
}

impl Default for ScoresDb {
    fn default() -> Self {
        Self {
            version: SCORES_DB_VERSION,
            beatmaps: Vec::new(),
        }
    }
}

impl ScoresDb {
    pub fn read<P: AsRef<Path>>(path: P, minimal_load: bool) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes, minimal_load)
    }

    pub fn parse(bytes: &[u8], minimal_load: bool) -> Result<Self> {
        let mut buf = ByteBuffer::new(bytes);
        let version = buf.read_i32()?;
        let beatmap_count = buf.read_count()?;
        debug!(
            "scores.db version {} with {} beatmaps",
            version, beatmap_count
        );

        let mut beatmaps = Vec::with_capacity(beatmap_count.min(buf.remaining()));
        for _ in 0..beatmap_count {
            let map_hash = buf.read_string()?;
            let score_count = buf.read_count()?;
            let mut replays = Vec::with_capacity(score_count.min(buf.remaining()));
            for _ in 0..score_count {
                replays.push(Replay::read(&mut buf, minimal_load)?);
            }
            beatmaps.push(BeatmapScores { map_hash, replays });
        }

        if buf.remaining() > 0 {
            return Err(Error::decode(
                buf.position(),
                format!("{} trailing bytes after last beatmap", buf.remaining()),
            ));
        }

        Ok(Self { version, beatmaps })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write_i32(self.version);
        w.write_count(self.beatmaps.len());
        for beatmap in &self.beatmaps {
            w.write_string(&beatmap.map_hash);
            w.write_count(beatmap.replays.len());
            for replay in &beatmap.replays {
                replay.write(w);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        self.write(&mut w);
        w.into_inner()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn score_count(&self) -> usize {
        self.beatmaps.iter().map(|b| b.replays.len()).sum()
    }
}

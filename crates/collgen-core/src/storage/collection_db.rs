use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::binary::{ByteBuffer, ByteWriter};
use crate::collection::{BeatmapCatalog, Collection, Collections};
use crate::error::{Error, Result};

/// Parsed `collection.db`: format version plus collections of beatmap hashes.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDb {
    pub version: i32,
    pub collections: Collections,
}

/// Read a `collection.db` file, resolving hashes through `catalog`.
///
/// Hashes the catalog does not know are dropped.
pub fn read_collection_db<P: AsRef<Path>>(
    path: P,
    catalog: &dyn BeatmapCatalog,
) -> Result<CollectionDb> {
    let bytes = fs::read(path)?;
    parse_collection_db(&bytes, catalog)
}

/// Layout: `i32 version`, `i32 collection count`, then per collection a name
/// string, `i32 beatmap count` and that many hash strings.
pub fn parse_collection_db(bytes: &[u8], catalog: &dyn BeatmapCatalog) -> Result<CollectionDb> {
    let mut buf = ByteBuffer::new(bytes);
    let version = buf.read_i32()?;
    let count = buf.read_count()?;

    let mut collections = Collections::with_capacity(count.min(buf.remaining()));
    let mut unresolved = 0usize;
    for _ in 0..count {
        let mut collection = Collection::new(buf.read_string()?);
        let beatmap_count = buf.read_count()?;
        for _ in 0..beatmap_count {
            match catalog.lookup(&buf.read_string()?) {
                Some(beatmap) => {
                    collection.add_beatmap(beatmap);
                }
                None => unresolved += 1,
            }
        }
        collections.push(collection);
    }

    if buf.remaining() > 0 {
        return Err(Error::decode(
            buf.position(),
            format!("{} trailing bytes after last collection", buf.remaining()),
        ));
    }

    if unresolved > 0 {
        warn!("{} collection entries reference unknown beatmaps", unresolved);
    }
    debug!(
        "collection.db version {} with {} collections",
        version,
        collections.len()
    );

    Ok(CollectionDb {
        version,
        collections,
    })
}

pub fn write_collection_db(collections: &[Collection], version: i32, w: &mut ByteWriter) {
    w.write_i32(version);
    w.write_count(collections.len());
    for collection in collections {
        w.write_string(&collection.name);
        w.write_count(collection.len());
        for hash in collection.hashes() {
            w.write_string(hash);
        }
    }
}

pub fn collection_db_bytes(collections: &[Collection], version: i32) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_collection_db(collections, version, &mut w);
    w.into_inner()
}

pub fn save_collection_db<P: AsRef<Path>>(
    path: P,
    collections: &[Collection],
    version: i32,
) -> Result<()> {
    fs::write(path, collection_db_bytes(collections, version))?;
    Ok(())
}

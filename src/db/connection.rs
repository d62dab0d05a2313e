use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

/// Every statement the schema needs, in dependency order. Each one is
/// idempotent so opening an existing catalog is a no-op.
const SCHEMA: &[(&str, &str)] = &[
    (
        "artists",
        "CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (trim(name) <> '')
        )",
    ),
    (
        "genres",
        "CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (trim(name) <> '')
        )",
    ),
    (
        "albums",
        "CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (trim(name) <> ''),
            release_year INTEGER,
            compilation INTEGER NOT NULL DEFAULT 0
        )",
    ),
    (
        "tracks",
        "CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (trim(name) <> ''),
            duration INTEGER NOT NULL CHECK (duration >= 0),
            track_number INTEGER NOT NULL,
            album_id INTEGER NOT NULL,
            genre_id INTEGER,
            FOREIGN KEY(album_id) REFERENCES albums(id) ON DELETE CASCADE,
            FOREIGN KEY(genre_id) REFERENCES genres(id) ON DELETE SET NULL
        )",
    ),
    (
        "artist_albums",
        "CREATE TABLE IF NOT EXISTS artist_albums (
            artist_id INTEGER NOT NULL,
            album_id INTEGER NOT NULL,
            PRIMARY KEY (artist_id, album_id),
            FOREIGN KEY(artist_id) REFERENCES artists(id) ON DELETE CASCADE,
            FOREIGN KEY(album_id) REFERENCES albums(id) ON DELETE CASCADE
        )",
    ),
    (
        "artist_tracks",
        "CREATE TABLE IF NOT EXISTS artist_tracks (
            artist_id INTEGER NOT NULL,
            track_id INTEGER NOT NULL,
            PRIMARY KEY (artist_id, track_id),
            FOREIGN KEY(artist_id) REFERENCES artists(id) ON DELETE CASCADE,
            FOREIGN KEY(track_id) REFERENCES tracks(id) ON DELETE CASCADE
        )",
    ),
    (
        "tracks_album_index",
        "CREATE INDEX IF NOT EXISTS tracks_album_index ON tracks (album_id)",
    ),
];

/// Open (or create) the catalog file at `path`, enable foreign keys, and make
/// sure every table exists. The parent directory must already exist.
pub fn open_catalog(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    tracing::info!(path = %path.display(), "opened catalog");
    Ok(conn)
}

/// In-memory catalog with the full schema. Used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Turn on referential integrity for this connection and create any missing
/// table. `PRAGMA foreign_keys` is per-connection, so it runs on every open.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    for (name, statement) in SCHEMA {
        conn.execute(statement, [])?;
        tracing::debug!(table = name, "schema statement applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('artists', 'genres', 'albums', 'tracks', 'artist_albums', 'artist_tracks')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn foreign_keys_are_enabled() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn open_catalog_creates_file_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.sqlite");
        open_catalog(&path).unwrap();
        assert!(path.exists());
        open_catalog(&path).unwrap();
    }

    #[test]
    fn missing_directory_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("catalog.sqlite");
        let err = open_catalog(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CatalogError::StorageUnavailable(_)
        ));
    }
}

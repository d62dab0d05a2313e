use rusqlite::{params, Connection, OptionalExtension};

use crate::db::records::Record;
use crate::error::Result;
use crate::models::{Album, Artist, NewAlbum};

/// Insert a new album row and return it with its assigned id.
pub fn create_album(conn: &Connection, album: &NewAlbum) -> Result<Album> {
    conn.execute(
        "INSERT INTO albums (name, release_year, compilation) VALUES (?1, ?2, ?3)",
        params![album.name, album.release_year, album.compilation],
    )?;

    let created = Album {
        id: conn.last_insert_rowid(),
        name: album.name.clone(),
        release_year: album.release_year,
        compilation: album.compilation,
    };
    tracing::info!(
        id = created.id,
        name = %created.name,
        compilation = created.compilation,
        "album created"
    );
    Ok(created)
}

/// Persist every field of `album`. Returns `false` when the row is gone.
pub fn update_album(conn: &Connection, album: &Album) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE albums SET name = ?1, release_year = ?2, compilation = ?3 WHERE id = ?4",
        params![album.name, album.release_year, album.compilation, album.id],
    )?;
    Ok(updated > 0)
}

/// Link an artist to an album. `INSERT OR IGNORE` keeps repeated links
/// idempotent; the return value says whether a new row was written.
pub fn link_artist_to_album(conn: &Connection, artist_id: i64, album_id: i64) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO artist_albums (artist_id, album_id) VALUES (?1, ?2)",
        params![artist_id, album_id],
    )?;
    Ok(inserted > 0)
}

/// Artists linked to an album, in the order the links were made.
pub fn artists_for_album(conn: &Connection, album_id: i64) -> Result<Vec<Artist>> {
    let mut stmt = conn.prepare(
        "SELECT ar.id, ar.name
         FROM artists ar
         INNER JOIN artist_albums aa ON aa.artist_id = ar.id
         WHERE aa.album_id = ?1
         ORDER BY aa.rowid",
    )?;

    let artists = stmt
        .query_map([album_id], |row| Artist::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(artists)
}

/// The earliest-linked artist of an album, which is the album's single artist
/// for regular releases.
pub fn first_artist_for_album(conn: &Connection, album_id: i64) -> Result<Option<Artist>> {
    let artist = conn
        .query_row(
            "SELECT ar.id, ar.name
             FROM artists ar
             INNER JOIN artist_albums aa ON aa.artist_id = ar.id
             WHERE aa.album_id = ?1
             ORDER BY aa.rowid
             LIMIT 1",
            [album_id],
            |row| Artist::from_row(row),
        )
        .optional()?;
    Ok(artist)
}

/// Albums flagged as compilations, in storage order.
pub fn compilation_albums(conn: &Connection) -> Result<Vec<Album>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, release_year, compilation
         FROM albums
         WHERE compilation = 1
         ORDER BY id",
    )?;

    let albums = stmt
        .query_map([], |row| Album::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(albums)
}

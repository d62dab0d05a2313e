use rusqlite::{params, Connection};

use crate::db::records::Record;
use crate::error::Result;
use crate::models::{Album, Artist};

/// Insert a new artist and echo back the hydrated row.
pub fn create_artist(conn: &Connection, name: &str) -> Result<Artist> {
    conn.execute("INSERT INTO artists (name) VALUES (?1)", params![name])?;

    let artist = Artist {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    };
    tracing::info!(id = artist.id, name = %artist.name, "artist created");
    Ok(artist)
}

/// Persist every field of `artist`. Returns `false` when the row is gone.
pub fn update_artist(conn: &Connection, artist: &Artist) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE artists SET name = ?1 WHERE id = ?2",
        params![artist.name, artist.id],
    )?;
    Ok(updated > 0)
}

/// Albums linked to an artist, in album storage order.
pub fn albums_for_artist(conn: &Connection, artist_id: i64) -> Result<Vec<Album>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name, a.release_year, a.compilation
         FROM albums a
         INNER JOIN artist_albums aa ON aa.album_id = a.id
         WHERE aa.artist_id = ?1
         ORDER BY a.id",
    )?;

    let albums = stmt
        .query_map([artist_id], |row| Album::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(albums)
}

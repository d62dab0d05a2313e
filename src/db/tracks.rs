use rusqlite::{params, Connection};

use crate::db::records::Record;
use crate::error::Result;
use crate::models::{Artist, NewTrack, Track};

/// Insert a track under its album. A dangling `album_id` or `genre_id` is
/// refused by the foreign keys and surfaces as a constraint violation.
pub fn create_track(conn: &Connection, track: &NewTrack) -> Result<Track> {
    conn.execute(
        "INSERT INTO tracks (name, duration, track_number, album_id, genre_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            track.name,
            track.duration_secs,
            track.track_number,
            track.album_id,
            track.genre_id
        ],
    )?;

    let created = Track {
        id: conn.last_insert_rowid(),
        name: track.name.clone(),
        duration_secs: track.duration_secs,
        track_number: track.track_number,
        album_id: track.album_id,
        genre_id: track.genre_id,
    };
    tracing::info!(
        id = created.id,
        album_id = created.album_id,
        name = %created.name,
        "track created"
    );
    Ok(created)
}

/// Persist every field of `track`. Returns `false` when the row is gone.
pub fn update_track(conn: &Connection, track: &Track) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE tracks
         SET name = ?1, duration = ?2, track_number = ?3, album_id = ?4, genre_id = ?5
         WHERE id = ?6",
        params![
            track.name,
            track.duration_secs,
            track.track_number,
            track.album_id,
            track.genre_id,
            track.id
        ],
    )?;
    Ok(updated > 0)
}

/// Link an artist to a track. Repeating a link leaves the association set
/// unchanged and returns `false`.
pub fn link_artist_to_track(conn: &Connection, artist_id: i64, track_id: i64) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO artist_tracks (artist_id, track_id) VALUES (?1, ?2)",
        params![artist_id, track_id],
    )?;
    Ok(inserted > 0)
}

/// Artists credited on a track, in the order they were linked.
pub fn artists_for_track(conn: &Connection, track_id: i64) -> Result<Vec<Artist>> {
    let mut stmt = conn.prepare(
        "SELECT ar.id, ar.name
         FROM artists ar
         INNER JOIN artist_tracks art ON art.artist_id = ar.id
         WHERE art.track_id = ?1
         ORDER BY art.rowid",
    )?;

    let artists = stmt
        .query_map([track_id], |row| Artist::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(artists)
}

/// Tracks owned by an album, in storage order.
pub fn tracks_for_album(conn: &Connection, album_id: i64) -> Result<Vec<Track>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, duration, track_number, album_id, genre_id
         FROM tracks
         WHERE album_id = ?1
         ORDER BY id",
    )?;

    let tracks = stmt
        .query_map([album_id], |row| Track::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tracks)
}

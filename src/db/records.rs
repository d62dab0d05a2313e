use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{Album, Artist, Genre, Track};

/// A row type with its own table. Implementors describe how to select and
/// hydrate themselves; the generic helpers below do the rest.
pub trait Record: Sized {
    /// Singular name used in messages ("Album 3 not found").
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Column list in the order `from_row` reads it.
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn id(&self) -> i64;
}

impl Record for Artist {
    const ENTITY: &'static str = "Artist";
    const TABLE: &'static str = "artists";
    const COLUMNS: &'static str = "id, name";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Genre {
    const ENTITY: &'static str = "Genre";
    const TABLE: &'static str = "genres";
    const COLUMNS: &'static str = "id, name";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Album {
    const ENTITY: &'static str = "Album";
    const TABLE: &'static str = "albums";
    const COLUMNS: &'static str = "id, name, release_year, compilation";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Album {
            id: row.get(0)?,
            name: row.get(1)?,
            release_year: row.get(2)?,
            compilation: row.get(3)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Track {
    const ENTITY: &'static str = "Track";
    const TABLE: &'static str = "tracks";
    const COLUMNS: &'static str = "id, name, duration, track_number, album_id, genre_id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Track {
            id: row.get(0)?,
            name: row.get(1)?,
            duration_secs: row.get(2)?,
            track_number: row.get(3)?,
            album_id: row.get(4)?,
            genre_id: row.get(5)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Every row of `T` in storage order (ascending id), unfiltered.
pub fn fetch_all<T: Record>(conn: &Connection) -> Result<Vec<T>> {
    let sql = format!("SELECT {} FROM {} ORDER BY id", T::COLUMNS, T::TABLE);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| T::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    tracing::debug!(table = T::TABLE, rows = rows.len(), "fetched all rows");
    Ok(rows)
}

/// Look up one row. A missing id is a normal outcome and yields `None`.
pub fn fetch_by_id<T: Record>(conn: &Connection, id: i64) -> Result<Option<T>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", T::COLUMNS, T::TABLE);
    let record = conn
        .query_row(&sql, params![id], |row| T::from_row(row))
        .optional()?;
    Ok(record)
}

/// Remove a row by id. Returns `false` (and changes nothing) when the id does
/// not exist. Album tracks and association rows go with it through the
/// schema's `ON DELETE` rules.
pub fn delete<T: Record>(conn: &Connection, id: i64) -> Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
    let deleted = conn.execute(&sql, params![id])?;
    if deleted > 0 {
        tracing::info!(entity = T::ENTITY, id, "deleted");
    }
    Ok(deleted > 0)
}

/// Row count of one entity table.
pub fn count<T: Record>(conn: &Connection) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

/// True only when none of the four entity tables has a row.
pub fn is_empty(conn: &Connection) -> Result<bool> {
    Ok(count::<Artist>(conn)? == 0
        && count::<Album>(conn)? == 0
        && count::<Track>(conn)? == 0
        && count::<Genre>(conn)? == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_album, create_artist, create_genre, create_track, open_in_memory};
    use crate::models::{NewAlbum, NewTrack};

    fn album(conn: &Connection, name: &str) -> Album {
        create_album(
            conn,
            &NewAlbum {
                name: name.into(),
                release_year: Some(2001),
                compilation: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn fetch_all_returns_storage_order() {
        let conn = open_in_memory().unwrap();
        create_artist(&conn, "Bjork").unwrap();
        create_artist(&conn, "Autechre").unwrap();

        let names: Vec<String> = fetch_all::<Artist>(&conn)
            .unwrap()
            .into_iter()
            .map(|artist| artist.name)
            .collect();
        assert_eq!(names, ["Bjork", "Autechre"]);
    }

    #[test]
    fn fetch_by_id_missing_is_none() {
        let conn = open_in_memory().unwrap();
        assert!(fetch_by_id::<Genre>(&conn, 42).unwrap().is_none());

        let genre = create_genre(&conn, "Jazz").unwrap();
        assert_eq!(fetch_by_id::<Genre>(&conn, genre.id).unwrap(), Some(genre));
    }

    #[test]
    fn delete_missing_id_reports_false() {
        let conn = open_in_memory().unwrap();
        create_artist(&conn, "Nina Simone").unwrap();
        assert!(!delete::<Artist>(&conn, 999).unwrap());
        assert_eq!(count::<Artist>(&conn).unwrap(), 1);
    }

    #[test]
    fn deleting_album_cascades_to_tracks() {
        let conn = open_in_memory().unwrap();
        let kept = album(&conn, "Kept");
        let doomed = album(&conn, "Doomed");
        for (album_id, name) in [(kept.id, "Stays"), (doomed.id, "Goes"), (doomed.id, "Also goes")] {
            create_track(
                &conn,
                &NewTrack {
                    name: name.into(),
                    duration_secs: 60,
                    track_number: 1,
                    album_id,
                    genre_id: None,
                },
            )
            .unwrap();
        }

        assert!(delete::<Album>(&conn, doomed.id).unwrap());
        let remaining = fetch_all::<Track>(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].album_id, kept.id);
    }

    #[test]
    fn is_empty_flips_after_any_insert() {
        let conn = open_in_memory().unwrap();
        assert!(is_empty(&conn).unwrap());
        create_genre(&conn, "Ambient").unwrap();
        assert!(!is_empty(&conn).unwrap());
    }
}

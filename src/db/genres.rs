use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::Genre;

/// Insert a new genre and echo back the hydrated row.
pub fn create_genre(conn: &Connection, name: &str) -> Result<Genre> {
    conn.execute("INSERT INTO genres (name) VALUES (?1)", params![name])?;

    let genre = Genre {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    };
    tracing::info!(id = genre.id, name = %genre.name, "genre created");
    Ok(genre)
}

/// Persist a renamed genre. Returns `false` when the row is gone.
pub fn update_genre(conn: &Connection, genre: &Genre) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE genres SET name = ?1 WHERE id = ?2",
        params![genre.name, genre.id],
    )?;
    Ok(updated > 0)
}

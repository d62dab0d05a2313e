//! Persistence module split across logical submodules. Every function takes
//! the caller's connection; nothing here holds a global handle.

mod albums;
mod artists;
mod connection;
mod genres;
mod records;
mod tracks;

pub use albums::{
    artists_for_album, compilation_albums, create_album, first_artist_for_album,
    link_artist_to_album, update_album,
};
pub use artists::{albums_for_artist, create_artist, update_artist};
pub use connection::{ensure_schema, open_catalog, open_in_memory};
pub use genres::{create_genre, update_genre};
pub use records::{count, delete, fetch_all, fetch_by_id, is_empty, Record};
pub use tracks::{
    artists_for_track, create_track, link_artist_to_track, tracks_for_album, update_track,
};

//! Catalog operations: the rules that sit on top of the raw tables.
//!
//! The interesting rule is artist attribution. A regular album has exactly one
//! artist, linked to the album once and reused for every track. A compilation
//! has no album-level artist; each track names its own. Every workflow here
//! runs inside one SQLite transaction, so a failure halfway through (say, the
//! artist link after the track insert) leaves nothing behind.
//!
//! Callers hand in already-typed values. Terminal parsing belongs to the
//! front-end.

pub mod views;

use rusqlite::Connection;

use crate::db::{self, Record};
use crate::error::{require_name, CatalogError, Result};
use crate::models::{Album, Artist, Genre, NewAlbum, NewTrack, Track};

/// Which artist to attach: one that exists already, or a new one to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistChoice {
    Existing(i64),
    New(String),
}

/// Which genre a track gets. `NoGenre` stores NULL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreChoice {
    #[default]
    NoGenre,
    Existing(i64),
    New(String),
}

/// Everything needed to add one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDraft {
    pub name: String,
    pub track_number: i64,
    pub duration_secs: i64,
    pub genre: GenreChoice,
    /// Only read for compilation albums; regular albums use their own artist.
    pub artist: Option<ArtistChoice>,
}

/// An album plus the tracks to create with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDraft {
    pub name: String,
    pub release_year: Option<i64>,
    pub compilation: bool,
    /// Required for regular albums, ignored for compilations.
    pub artist: Option<ArtistChoice>,
    pub tracks: Vec<TrackDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTrack {
    pub track: Track,
    pub artist: Artist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAlbum {
    pub album: Album,
    /// The album-level artist. Always `None` for compilations.
    pub artist: Option<Artist>,
    pub tracks: Vec<CreatedTrack>,
}

/// Result of adding a track to an album that already exists. The two misses
/// are expected outcomes for the caller to report, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTrackOutcome {
    Added(CreatedTrack),
    AlbumNotFound,
    /// A regular album with no linked artist; nothing was written.
    NoAlbumArtist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Partial update for an artist. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistChanges {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreChanges {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumChanges {
    pub name: Option<String>,
    pub release_year: Option<i64>,
    /// Adds one more artist link; existing links are never replaced.
    pub add_artist: Option<ArtistChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackChanges {
    pub name: Option<String>,
    pub duration_secs: Option<i64>,
    pub track_number: Option<i64>,
    /// `Some(GenreChoice::NoGenre)` clears the genre.
    pub genre: Option<GenreChoice>,
    pub add_artist: Option<ArtistChoice>,
}

/// The four entity kinds, for front-ends that switch between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Genre,
    Artist,
    Album,
    Track,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Genre => Genre::ENTITY,
            EntityKind::Artist => Artist::ENTITY,
            EntityKind::Album => Album::ENTITY,
            EntityKind::Track => Track::ENTITY,
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Genre => "Genres",
            EntityKind::Artist => "Artists",
            EntityKind::Album => "Albums",
            EntityKind::Track => "Tracks",
        }
    }
}

/// Create an artist from a trimmed, non-blank name.
pub fn add_artist(conn: &Connection, name: &str) -> Result<Artist> {
    let name = require_name(Artist::ENTITY, name)?;
    db::create_artist(conn, &name)
}

/// Create a genre from a trimmed, non-blank name.
pub fn add_genre(conn: &Connection, name: &str) -> Result<Genre> {
    let name = require_name(Genre::ENTITY, name)?;
    db::create_genre(conn, &name)
}

/// Create an album and its tracks as one unit.
///
/// A regular album must name an artist; it is linked to the album and to
/// every track. A compilation needs an artist on every track instead. Pass an
/// empty `tracks` list to create the album alone.
pub fn create_album_with_tracks(conn: &mut Connection, draft: &AlbumDraft) -> Result<CreatedAlbum> {
    let tx = conn.transaction()?;
    let created = insert_album_with_tracks(&tx, draft)?;
    tx.commit()?;

    tracing::info!(
        album_id = created.album.id,
        tracks = created.tracks.len(),
        compilation = created.album.compilation,
        "album saved"
    );
    Ok(created)
}

fn insert_album_with_tracks(conn: &Connection, draft: &AlbumDraft) -> Result<CreatedAlbum> {
    let name = require_name(Album::ENTITY, &draft.name)?;

    let album_artist = if draft.compilation {
        None
    } else {
        let choice = draft
            .artist
            .as_ref()
            .ok_or_else(|| CatalogError::constraint("A regular album needs an artist."))?;
        Some(resolve_artist(conn, choice)?)
    };

    let album = db::create_album(
        conn,
        &NewAlbum {
            name,
            release_year: draft.release_year,
            compilation: draft.compilation,
        },
    )?;

    if let Some(artist) = &album_artist {
        db::link_artist_to_album(conn, artist.id, album.id)?;
    }

    let mut tracks = Vec::with_capacity(draft.tracks.len());
    for track in &draft.tracks {
        let artist = match &album_artist {
            Some(artist) => artist.clone(),
            None => resolve_track_artist(conn, track)?,
        };
        tracks.push(insert_track(conn, album.id, track, artist)?);
    }

    Ok(CreatedAlbum {
        album,
        artist: album_artist,
        tracks,
    })
}

/// Add one track to an existing album.
///
/// Compilations take the artist from the draft. Regular albums reuse their
/// first linked artist and report `NoAlbumArtist` when there is none.
pub fn add_track_to_album(
    conn: &mut Connection,
    album_id: i64,
    draft: &TrackDraft,
) -> Result<AddTrackOutcome> {
    let tx = conn.transaction()?;

    let Some(album) = db::fetch_by_id::<Album>(&tx, album_id)? else {
        tracing::warn!(album_id, "track not added: album not found");
        return Ok(AddTrackOutcome::AlbumNotFound);
    };

    let artist = if album.compilation {
        resolve_track_artist(&tx, draft)?
    } else {
        match db::first_artist_for_album(&tx, album.id)? {
            Some(artist) => artist,
            None => {
                tracing::warn!(album_id, "track not added: album has no artist");
                return Ok(AddTrackOutcome::NoAlbumArtist);
            }
        }
    };

    let created = insert_track(&tx, album.id, draft, artist)?;
    tx.commit()?;
    Ok(AddTrackOutcome::Added(created))
}

fn insert_track(
    conn: &Connection,
    album_id: i64,
    draft: &TrackDraft,
    artist: Artist,
) -> Result<CreatedTrack> {
    let name = require_name(Track::ENTITY, &draft.name)?;
    let genre = resolve_genre(conn, &draft.genre)?;

    let track = db::create_track(
        conn,
        &NewTrack {
            name,
            duration_secs: draft.duration_secs,
            track_number: draft.track_number,
            album_id,
            genre_id: genre.map(|genre| genre.id),
        },
    )?;
    db::link_artist_to_track(conn, artist.id, track.id)?;

    Ok(CreatedTrack { track, artist })
}

fn resolve_track_artist(conn: &Connection, draft: &TrackDraft) -> Result<Artist> {
    let choice = draft.artist.as_ref().ok_or_else(|| {
        CatalogError::constraint(format!(
            "Track '{}' on a compilation needs an artist.",
            draft.name.trim()
        ))
    })?;
    resolve_artist(conn, choice)
}

/// Look up an existing artist or create a new one. A missing id aborts the
/// surrounding workflow.
pub fn resolve_artist(conn: &Connection, choice: &ArtistChoice) -> Result<Artist> {
    match choice {
        ArtistChoice::Existing(id) => db::fetch_by_id::<Artist>(conn, *id)?
            .ok_or_else(|| CatalogError::not_found(Artist::ENTITY, *id)),
        ArtistChoice::New(name) => add_artist(conn, name),
    }
}

/// `NoGenre` resolves to `None`; a missing id aborts the surrounding workflow.
pub fn resolve_genre(conn: &Connection, choice: &GenreChoice) -> Result<Option<Genre>> {
    match choice {
        GenreChoice::NoGenre => Ok(None),
        GenreChoice::Existing(id) => db::fetch_by_id::<Genre>(conn, *id)?
            .map(Some)
            .ok_or_else(|| CatalogError::not_found(Genre::ENTITY, *id)),
        GenreChoice::New(name) => add_genre(conn, name).map(Some),
    }
}

/// Rename an artist when a new name is supplied. Links are untouched.
pub fn update_artist(
    conn: &Connection,
    id: i64,
    changes: &ArtistChanges,
) -> Result<UpdateOutcome<Artist>> {
    let Some(mut artist) = db::fetch_by_id::<Artist>(conn, id)? else {
        return Ok(UpdateOutcome::NotFound);
    };
    if let Some(name) = &changes.name {
        artist.name = require_name(Artist::ENTITY, name)?;
    }
    db::update_artist(conn, &artist)?;
    tracing::info!(id, "artist updated");
    Ok(UpdateOutcome::Updated(artist))
}

/// Rename a genre when a new name is supplied; tracks keep pointing at it.
pub fn update_genre(
    conn: &Connection,
    id: i64,
    changes: &GenreChanges,
) -> Result<UpdateOutcome<Genre>> {
    let Some(mut genre) = db::fetch_by_id::<Genre>(conn, id)? else {
        return Ok(UpdateOutcome::NotFound);
    };
    if let Some(name) = &changes.name {
        genre.name = require_name(Genre::ENTITY, name)?;
    }
    db::update_genre(conn, &genre)?;
    tracing::info!(id, "genre updated");
    Ok(UpdateOutcome::Updated(genre))
}

/// Apply the supplied album fields and optionally link one more artist.
/// The compilation flag is fixed at creation and cannot be changed here.
pub fn update_album(
    conn: &mut Connection,
    id: i64,
    changes: &AlbumChanges,
) -> Result<UpdateOutcome<Album>> {
    let tx = conn.transaction()?;
    let Some(mut album) = db::fetch_by_id::<Album>(&tx, id)? else {
        return Ok(UpdateOutcome::NotFound);
    };

    if let Some(name) = &changes.name {
        album.name = require_name(Album::ENTITY, name)?;
    }
    if let Some(year) = changes.release_year {
        album.release_year = Some(year);
    }
    db::update_album(&tx, &album)?;

    if let Some(choice) = &changes.add_artist {
        let artist = resolve_artist(&tx, choice)?;
        if db::link_artist_to_album(&tx, artist.id, album.id)? {
            tracing::info!(album_id = album.id, artist_id = artist.id, "artist linked to album");
        }
    }

    tx.commit()?;
    tracing::info!(id, "album updated");
    Ok(UpdateOutcome::Updated(album))
}

/// Apply the supplied track fields and optionally link one more artist.
pub fn update_track(
    conn: &mut Connection,
    id: i64,
    changes: &TrackChanges,
) -> Result<UpdateOutcome<Track>> {
    let tx = conn.transaction()?;
    let Some(mut track) = db::fetch_by_id::<Track>(&tx, id)? else {
        return Ok(UpdateOutcome::NotFound);
    };

    if let Some(name) = &changes.name {
        track.name = require_name(Track::ENTITY, name)?;
    }
    if let Some(duration) = changes.duration_secs {
        track.duration_secs = duration;
    }
    if let Some(number) = changes.track_number {
        track.track_number = number;
    }
    if let Some(choice) = &changes.genre {
        track.genre_id = resolve_genre(&tx, choice)?.map(|genre| genre.id);
    }
    db::update_track(&tx, &track)?;

    if let Some(choice) = &changes.add_artist {
        let artist = resolve_artist(&tx, choice)?;
        if db::link_artist_to_track(&tx, artist.id, track.id)? {
            tracing::info!(track_id = track.id, artist_id = artist.id, "artist linked to track");
        }
    }

    tx.commit()?;
    tracing::info!(id, "track updated");
    Ok(UpdateOutcome::Updated(track))
}

/// Delete by id. Deleting an album takes its tracks with it; deleting a genre
/// leaves its tracks with no genre.
pub fn delete_record<T: Record>(conn: &Connection, id: i64) -> Result<DeleteOutcome> {
    if db::delete::<T>(conn, id)? {
        Ok(DeleteOutcome::Deleted)
    } else {
        tracing::warn!(entity = T::ENTITY, id, "delete skipped: not found");
        Ok(DeleteOutcome::NotFound)
    }
}

/// Delete whichever kind the front-end has selected.
pub fn delete_kind(conn: &Connection, kind: EntityKind, id: i64) -> Result<DeleteOutcome> {
    match kind {
        EntityKind::Genre => delete_record::<Genre>(conn, id),
        EntityKind::Artist => delete_record::<Artist>(conn, id),
        EntityKind::Album => delete_record::<Album>(conn, id),
        EntityKind::Track => delete_record::<Track>(conn, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn track(name: &str, number: i64, artist: Option<ArtistChoice>) -> TrackDraft {
        TrackDraft {
            name: name.into(),
            track_number: number,
            duration_secs: 200,
            genre: GenreChoice::NoGenre,
            artist,
        }
    }

    fn regular_draft(artist: Option<ArtistChoice>, tracks: Vec<TrackDraft>) -> AlbumDraft {
        AlbumDraft {
            name: "Homogenic".into(),
            release_year: Some(1997),
            compilation: false,
            artist,
            tracks,
        }
    }

    #[test]
    fn regular_album_shares_single_artist() {
        let mut conn = open_in_memory().unwrap();
        let bjork = add_artist(&conn, "Bjork").unwrap();
        let stray = add_artist(&conn, "Stray").unwrap();

        let draft = regular_draft(
            Some(ArtistChoice::Existing(bjork.id)),
            vec![
                track("Hunter", 1, None),
                track("Joga", 2, Some(ArtistChoice::Existing(stray.id))),
            ],
        );
        let created = create_album_with_tracks(&mut conn, &draft).unwrap();

        assert_eq!(created.artist, Some(bjork.clone()));
        assert_eq!(db::artists_for_album(&conn, created.album.id).unwrap(), vec![bjork.clone()]);
        for created_track in &created.tracks {
            assert_eq!(
                db::artists_for_track(&conn, created_track.track.id).unwrap(),
                vec![bjork.clone()]
            );
        }
    }

    #[test]
    fn regular_album_without_artist_writes_nothing() {
        let mut conn = open_in_memory().unwrap();
        let err = create_album_with_tracks(&mut conn, &regular_draft(None, vec![])).unwrap_err();
        assert!(matches!(err, CatalogError::ConstraintViolation(_)));
        assert!(db::is_empty(&conn).unwrap());
    }

    #[test]
    fn new_artist_choice_creates_artist() {
        let mut conn = open_in_memory().unwrap();
        let draft = regular_draft(Some(ArtistChoice::New("Air".into())), vec![track("La femme d'argent", 1, None)]);
        let created = create_album_with_tracks(&mut conn, &draft).unwrap();
        assert_eq!(created.artist.map(|artist| artist.name).as_deref(), Some("Air"));
        assert_eq!(db::count::<Artist>(&conn).unwrap(), 1);
    }

    #[test]
    fn compilation_tracks_keep_their_own_artists() {
        let mut conn = open_in_memory().unwrap();
        let draft = AlbumDraft {
            name: "Late Night Tales".into(),
            release_year: None,
            compilation: true,
            artist: None,
            tracks: vec![
                track("One", 1, Some(ArtistChoice::New("Nightmares on Wax".into()))),
                track("Two", 2, Some(ArtistChoice::New("Bonobo".into()))),
            ],
        };
        let created = create_album_with_tracks(&mut conn, &draft).unwrap();

        assert!(created.artist.is_none());
        assert!(db::artists_for_album(&conn, created.album.id).unwrap().is_empty());
        let names: Vec<String> = created
            .tracks
            .iter()
            .map(|t| db::artists_for_track(&conn, t.track.id).unwrap()[0].name.clone())
            .collect();
        assert_eq!(names, ["Nightmares on Wax", "Bonobo"]);
    }

    #[test]
    fn compilation_track_without_artist_rolls_back() {
        let mut conn = open_in_memory().unwrap();
        let draft = AlbumDraft {
            name: "Broken".into(),
            release_year: None,
            compilation: true,
            artist: None,
            tracks: vec![
                track("Fine", 1, Some(ArtistChoice::New("Someone".into()))),
                track("Missing", 2, None),
            ],
        };
        assert!(create_album_with_tracks(&mut conn, &draft).is_err());
        assert!(db::is_empty(&conn).unwrap());
    }

    #[test]
    fn unknown_artist_id_is_not_found_and_rolls_back() {
        let mut conn = open_in_memory().unwrap();
        let err = create_album_with_tracks(
            &mut conn,
            &regular_draft(Some(ArtistChoice::Existing(404)), vec![]),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "Artist", id: 404 }));
        assert_eq!(db::count::<Album>(&conn).unwrap(), 0);
    }

    #[test]
    fn add_track_uses_album_artist() {
        let mut conn = open_in_memory().unwrap();
        let created = create_album_with_tracks(
            &mut conn,
            &regular_draft(Some(ArtistChoice::New("Moby".into())), vec![]),
        )
        .unwrap();

        let outcome = add_track_to_album(&mut conn, created.album.id, &track("Porcelain", 5, None)).unwrap();
        let AddTrackOutcome::Added(added) = outcome else {
            panic!("expected track to be added, got {outcome:?}");
        };
        assert_eq!(Some(added.artist), created.artist);
    }

    #[test]
    fn add_track_reports_missing_album_and_missing_artist() {
        let mut conn = open_in_memory().unwrap();
        assert_eq!(
            add_track_to_album(&mut conn, 9, &track("Nowhere", 1, None)).unwrap(),
            AddTrackOutcome::AlbumNotFound
        );

        let album = db::create_album(
            &conn,
            &NewAlbum {
                name: "Orphan".into(),
                release_year: None,
                compilation: false,
            },
        )
        .unwrap();
        assert_eq!(
            add_track_to_album(&mut conn, album.id, &track("Lonely", 1, None)).unwrap(),
            AddTrackOutcome::NoAlbumArtist
        );
        assert!(db::tracks_for_album(&conn, album.id).unwrap().is_empty());
    }

    #[test]
    fn new_genre_choice_is_created_and_assigned() {
        let mut conn = open_in_memory().unwrap();
        let mut draft_track = track("Teardrop", 3, None);
        draft_track.genre = GenreChoice::New("Trip hop".into());
        let created = create_album_with_tracks(
            &mut conn,
            &regular_draft(Some(ArtistChoice::New("Massive Attack".into())), vec![draft_track]),
        )
        .unwrap();

        let genre_id = created.tracks[0].track.genre_id.unwrap();
        let genre = db::fetch_by_id::<Genre>(&conn, genre_id).unwrap().unwrap();
        assert_eq!(genre.name, "Trip hop");
    }

    #[test]
    fn empty_changes_keep_values() {
        let mut conn = open_in_memory().unwrap();
        let created = create_album_with_tracks(
            &mut conn,
            &regular_draft(Some(ArtistChoice::New("Bjork".into())), vec![track("Bachelorette", 4, None)]),
        )
        .unwrap();
        let track_id = created.tracks[0].track.id;

        let outcome = update_track(&mut conn, track_id, &TrackChanges::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated(created.tracks[0].track.clone()));

        let outcome = update_album(&mut conn, created.album.id, &AlbumChanges::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated(created.album.clone()));
    }

    #[test]
    fn supplied_changes_overwrite_and_add_links() {
        let mut conn = open_in_memory().unwrap();
        let created = create_album_with_tracks(
            &mut conn,
            &regular_draft(Some(ArtistChoice::New("Bjork".into())), vec![track("Alarm Call", 6, None)]),
        )
        .unwrap();
        let track_id = created.tracks[0].track.id;

        let changes = TrackChanges {
            name: Some("Alarm Call (remix)".into()),
            duration_secs: Some(301),
            genre: Some(GenreChoice::New("Electronic".into())),
            add_artist: Some(ArtistChoice::New("Mark Bell".into())),
            ..TrackChanges::default()
        };
        let UpdateOutcome::Updated(updated) = update_track(&mut conn, track_id, &changes).unwrap() else {
            panic!("track should exist");
        };
        assert_eq!(updated.name, "Alarm Call (remix)");
        assert_eq!(updated.duration_secs, 301);
        assert_eq!(updated.track_number, 6);
        assert!(updated.genre_id.is_some());
        assert_eq!(db::artists_for_track(&conn, track_id).unwrap().len(), 2);

        let album_changes = AlbumChanges {
            release_year: Some(1998),
            add_artist: created.artist.as_ref().map(|artist| ArtistChoice::Existing(artist.id)),
            ..AlbumChanges::default()
        };
        let UpdateOutcome::Updated(album) =
            update_album(&mut conn, created.album.id, &album_changes).unwrap()
        else {
            panic!("album should exist");
        };
        assert_eq!(album.release_year, Some(1998));
        assert_eq!(album.name, "Homogenic");
        assert_eq!(db::artists_for_album(&conn, album.id).unwrap().len(), 1);
    }

    #[test]
    fn album_edits_keep_compilation_credits() {
        let mut conn = open_in_memory().unwrap();
        let created = create_album_with_tracks(
            &mut conn,
            &AlbumDraft {
                name: "Mixed".into(),
                release_year: None,
                compilation: true,
                artist: None,
                tracks: vec![
                    track("Side A", 1, Some(ArtistChoice::New("X".into()))),
                    track("Side B", 2, Some(ArtistChoice::New("Y".into()))),
                ],
            },
        )
        .unwrap();

        let changes = AlbumChanges {
            name: Some("Mixed Up".into()),
            release_year: Some(2001),
            ..AlbumChanges::default()
        };
        let UpdateOutcome::Updated(album) = update_album(&mut conn, created.album.id, &changes).unwrap() else {
            panic!("album should exist");
        };
        assert!(album.compilation);
        assert!(db::artists_for_album(&conn, album.id).unwrap().is_empty());

        let outcome = add_track_to_album(
            &mut conn,
            album.id,
            &track("Side C", 3, Some(ArtistChoice::New("Z".into()))),
        )
        .unwrap();
        let AddTrackOutcome::Added(added) = outcome else {
            panic!("compilation should accept a per-track artist, got {outcome:?}");
        };
        assert_eq!(added.artist.name, "Z");
    }

    #[test]
    fn blank_supplied_name_is_rejected() {
        let conn = open_in_memory().unwrap();
        let artist = add_artist(&conn, "Tricky").unwrap();
        let err = update_artist(
            &conn,
            artist.id,
            &ArtistChanges {
                name: Some("   ".into()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ConstraintViolation(_)));
    }

    #[test]
    fn updates_and_deletes_report_not_found() {
        let mut conn = open_in_memory().unwrap();
        assert_eq!(
            update_genre(&conn, 3, &GenreChanges::default()).unwrap(),
            UpdateOutcome::NotFound
        );
        assert_eq!(
            update_album(&mut conn, 3, &AlbumChanges::default()).unwrap(),
            UpdateOutcome::NotFound
        );
        assert_eq!(delete_kind(&conn, EntityKind::Track, 3).unwrap(), DeleteOutcome::NotFound);
    }

    #[test]
    fn delete_kind_removes_row() {
        let conn = open_in_memory().unwrap();
        let genre = add_genre(&conn, "Soul").unwrap();
        assert_eq!(delete_kind(&conn, EntityKind::Genre, genre.id).unwrap(), DeleteOutcome::Deleted);
        assert!(db::is_empty(&conn).unwrap());
    }
}

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::catalog::{AlbumChanges, AlbumDraft, EntityKind, TrackChanges, TrackDraft};
use crate::db;
use crate::models::{Album, Artist, Genre};

use super::forms::Form;

/// Top-level tabs. The collection tab renders the grouped text view; every
/// other tab is a table of one entity kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tab {
    Collection,
    Entity(EntityKind),
}

pub(crate) const TABS: [Tab; 5] = [
    Tab::Collection,
    Tab::Entity(EntityKind::Genre),
    Tab::Entity(EntityKind::Artist),
    Tab::Entity(EntityKind::Album),
    Tab::Entity(EntityKind::Track),
];

impl Tab {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Collection => "Collection",
            Tab::Entity(kind) => kind.plural(),
        }
    }

    pub(crate) fn index(self) -> usize {
        TABS.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub(crate) fn offset(self, delta: isize) -> Tab {
        let len = TABS.len() as isize;
        let index = (self.index() as isize + delta).rem_euclid(len);
        TABS[index as usize]
    }
}

/// Entries shown in a picker list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PickItem {
    CreateNew,
    NoGenre,
    KeepCurrent,
    Existing { id: i64, label: String },
}

impl PickItem {
    pub(crate) fn label(&self, noun: &str) -> String {
        match self {
            PickItem::CreateNew => format!("New {noun}…"),
            PickItem::NoGenre => "No genre".to_string(),
            PickItem::KeepCurrent => format!("Keep current {noun}s"),
            PickItem::Existing { id, label } => format!("{id:>3}  {label}"),
        }
    }
}

/// What the user chose in a picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Picked {
    CreateNew,
    NoGenre,
    KeepCurrent,
    Existing(i64),
}

/// Backing state for the selection palette used by every "choose an
/// artist / genre / album" prompt.
#[derive(Clone, Debug)]
pub(crate) struct Picker {
    pub(crate) title: String,
    pub(crate) noun: &'static str,
    pub(crate) items: Vec<PickItem>,
    pub(crate) selected: usize,
}

impl Picker {
    fn new(title: impl Into<String>, noun: &'static str, items: Vec<PickItem>) -> Self {
        Self {
            title: title.into(),
            noun,
            items,
            selected: 0,
        }
    }

    /// Existing artists plus "New artist…". Edit flows also get a leading
    /// "Keep current artists" entry.
    pub(crate) fn artists(conn: &Connection, title: impl Into<String>, keep_current: bool) -> Result<Self> {
        let mut items = Vec::new();
        if keep_current {
            items.push(PickItem::KeepCurrent);
        }
        items.push(PickItem::CreateNew);
        let artists = db::fetch_all::<Artist>(conn).context("failed to load artists")?;
        items.extend(artists.into_iter().map(|artist| PickItem::Existing {
            id: artist.id,
            label: artist.name,
        }));
        Ok(Self::new(title, "artist", items))
    }

    /// "No genre", "New genre…" and every stored genre.
    pub(crate) fn genres(conn: &Connection, title: impl Into<String>, keep_current: bool) -> Result<Self> {
        let mut items = Vec::new();
        if keep_current {
            items.push(PickItem::KeepCurrent);
        }
        items.push(PickItem::NoGenre);
        items.push(PickItem::CreateNew);
        let genres = db::fetch_all::<Genre>(conn).context("failed to load genres")?;
        items.extend(genres.into_iter().map(|genre| PickItem::Existing {
            id: genre.id,
            label: genre.name,
        }));
        Ok(Self::new(title, "genre", items))
    }

    /// Existing albums only; a track cannot create its album. Returns `None`
    /// when there is nothing to pick.
    pub(crate) fn albums(conn: &Connection) -> Result<Option<Self>> {
        let albums = db::fetch_all::<Album>(conn).context("failed to load albums")?;
        if albums.is_empty() {
            return Ok(None);
        }
        let items = albums
            .into_iter()
            .map(|album| PickItem::Existing {
                id: album.id,
                label: format!("{album} [{}]", album.kind_label()),
            })
            .collect();
        Ok(Some(Self::new("Add Track: choose album", "album", items)))
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.selected = self.items.len() - 1;
        }
    }

    pub(crate) fn current_item(&self) -> Option<&PickItem> {
        self.items.get(self.selected)
    }

    pub(crate) fn pick(&self) -> Option<Picked> {
        let picked = match self.current_item()? {
            PickItem::CreateNew => Picked::CreateNew,
            PickItem::NoGenre => Picked::NoGenre,
            PickItem::KeepCurrent => Picked::KeepCurrent,
            PickItem::Existing { id, .. } => Picked::Existing(*id),
        };
        Some(picked)
    }
}

/// Yes/no dialog.
#[derive(Clone, Debug)]
pub(crate) struct Confirm {
    pub(crate) title: String,
    pub(crate) lines: Vec<String>,
}

impl Confirm {
    pub(crate) fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

/// The prompt currently on screen inside a flow.
#[derive(Clone, Debug)]
pub(crate) enum Step {
    Form(Form),
    Picker(Picker),
    Confirm(Confirm),
}

/// A finished prompt.
#[derive(Clone, Debug)]
pub(crate) enum Answer {
    Submitted(Form),
    Picked(Picked),
    Confirmed(bool),
}

/// Which question the current step answers. The flow decides what comes
/// next from the pair of purpose and answer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Purpose {
    Name,
    AlbumDetails,
    TrackDetails,
    ChooseAlbum,
    Artist,
    NewArtist,
    Genre,
    NewGenre,
    AnotherTrack,
    Delete,
}

/// Album wizard state: the draft being assembled plus the track currently
/// being described, if any.
#[derive(Clone, Debug)]
pub(crate) struct AlbumWizard {
    pub(crate) draft: AlbumDraft,
    pub(crate) track: Option<TrackDraft>,
}

impl AlbumWizard {
    pub(crate) fn new() -> Self {
        Self {
            draft: AlbumDraft {
                name: String::new(),
                release_year: None,
                compilation: false,
                artist: None,
                tracks: Vec::new(),
            },
            track: None,
        }
    }

    /// True while the wizard is asking about the album itself rather than a
    /// track.
    pub(crate) fn at_album_level(&self) -> bool {
        self.track.is_none()
    }
}

/// Multi-step interaction in progress.
#[derive(Clone, Debug)]
pub(crate) enum Flow {
    AddName(EntityKind),
    EditName { kind: EntityKind, id: i64 },
    NewAlbum(AlbumWizard),
    NewTrack { album: Option<Album>, draft: Option<TrackDraft> },
    EditAlbum { id: i64, changes: AlbumChanges },
    EditTrack { id: i64, changes: TrackChanges },
    Delete { kind: EntityKind, id: i64 },
}

use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Tabs, Wrap,
};
use ratatui::Frame;
use rusqlite::Connection;

use crate::catalog::views::{self, Listing, NO_INFORMATION};
use crate::catalog::{
    self, AddTrackOutcome, AlbumChanges, AlbumDraft, ArtistChanges, ArtistChoice, DeleteOutcome,
    EntityKind, GenreChanges, GenreChoice, TrackChanges, TrackDraft, UpdateOutcome,
};
use crate::cli::collection_lines;
use crate::db;
use crate::error::CatalogError;
use crate::models::{Album, Artist, Genre, Track};

use super::forms::{Form, COMPILATION, DURATION, NAME, TRACK_NUMBER, YEAR};
use super::helpers::{centered_rect, column_constraints, surface_error};
use super::screens::{
    AlbumWizard, Answer, Confirm, Flow, Picked, Picker, Purpose, Step, Tab, TABS,
};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const TABS_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE: isize = 10;

/// Either browsing, or answering one step of a multi-step flow.
enum Mode {
    Normal,
    Flow {
        flow: Flow,
        purpose: Purpose,
        step: Step,
    },
}

/// Result of feeding one key to the step on screen.
enum StepEvent {
    Pending(Step),
    Cancelled,
    Done(Answer),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the catalog connection for the whole
/// session; dropping the app closes the store.
pub struct App {
    conn: Connection,
    tab: Tab,
    listing: Listing,
    collection: Vec<String>,
    selected: usize,
    scroll: u16,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection) -> Result<Self> {
        let mut app = Self {
            conn,
            tab: Tab::Collection,
            listing: Listing {
                headers: Vec::new(),
                rows: Vec::new(),
            },
            collection: Vec::new(),
            selected: 0,
            scroll: 0,
            mode: Mode::Normal,
            status: None,
        };
        app.reload(None)?;
        Ok(app)
    }

    /// Feed one key press to the app. Returns `true` when the user asked to
    /// quit. Errors are fatal: only storage failures reach the caller.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Flow {
                flow,
                purpose,
                step,
            } => match step_event(step, code) {
                StepEvent::Pending(step) => Mode::Flow {
                    flow,
                    purpose,
                    step,
                },
                StepEvent::Cancelled => self.cancel(flow, purpose)?,
                StepEvent::Done(answer) => self.advance(flow, purpose, answer)?,
            },
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Left | KeyCode::BackTab => self.switch_tab(self.tab.offset(-1))?,
            KeyCode::Right | KeyCode::Tab => self.switch_tab(self.tab.offset(1))?,
            KeyCode::Char(ch @ '1'..='5') => {
                let index = ch as usize - '1' as usize;
                self.switch_tab(TABS[index])?;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE),
            KeyCode::PageDown => self.move_selection(PAGE),
            KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::Char('r') => {
                self.reload(None)?;
                self.set_status("Reloaded.", StatusKind::Info);
            }
            KeyCode::Char('a') => return self.start_add(),
            KeyCode::Char('e') => return self.start_edit(),
            KeyCode::Char('d') => return self.start_delete(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn start_add(&mut self) -> Result<Mode> {
        self.clear_status();
        let Tab::Entity(kind) = self.tab else {
            self.set_status("Pick a table tab (2-5) to add records.", StatusKind::Error);
            return Ok(Mode::Normal);
        };

        let mode = match kind {
            EntityKind::Genre | EntityKind::Artist => Mode::Flow {
                flow: Flow::AddName(kind),
                purpose: Purpose::Name,
                step: Step::Form(Form::name(format!("Add {}", kind.label()))),
            },
            EntityKind::Album => Mode::Flow {
                flow: Flow::NewAlbum(AlbumWizard::new()),
                purpose: Purpose::AlbumDetails,
                step: Step::Form(Form::album()),
            },
            EntityKind::Track => match Picker::albums(&self.conn)? {
                Some(picker) => Mode::Flow {
                    flow: Flow::NewTrack {
                        album: None,
                        draft: None,
                    },
                    purpose: Purpose::ChooseAlbum,
                    step: Step::Picker(picker),
                },
                None => {
                    self.set_status("No albums available. Add an album first.", StatusKind::Error);
                    Mode::Normal
                }
            },
        };
        Ok(mode)
    }

    fn start_edit(&mut self) -> Result<Mode> {
        self.clear_status();
        let Some((kind, id)) = self.current_target() else {
            self.set_status("Nothing selected.", StatusKind::Error);
            return Ok(Mode::Normal);
        };

        let step = match kind {
            EntityKind::Genre => db::fetch_by_id::<Genre>(&self.conn, id)?
                .map(|genre| Form::edit_name(format!("Edit Genre {id}"), &genre.name)),
            EntityKind::Artist => db::fetch_by_id::<Artist>(&self.conn, id)?
                .map(|artist| Form::edit_name(format!("Edit Artist {id}"), &artist.name)),
            EntityKind::Album => {
                db::fetch_by_id::<Album>(&self.conn, id)?.map(|album| Form::edit_album(&album))
            }
            EntityKind::Track => {
                db::fetch_by_id::<Track>(&self.conn, id)?.map(|track| Form::edit_track(&track))
            }
        };
        let Some(form) = step else {
            self.set_status(not_found(kind, id), StatusKind::Error);
            return Ok(Mode::Normal);
        };

        let (flow, purpose) = match kind {
            EntityKind::Genre | EntityKind::Artist => (Flow::EditName { kind, id }, Purpose::Name),
            EntityKind::Album => (
                Flow::EditAlbum {
                    id,
                    changes: AlbumChanges::default(),
                },
                Purpose::AlbumDetails,
            ),
            EntityKind::Track => (
                Flow::EditTrack {
                    id,
                    changes: TrackChanges::default(),
                },
                Purpose::TrackDetails,
            ),
        };
        Ok(Mode::Flow {
            flow,
            purpose,
            step: Step::Form(form),
        })
    }

    fn start_delete(&mut self) -> Result<Mode> {
        self.clear_status();
        let Some((kind, id)) = self.current_target() else {
            self.set_status("Nothing selected.", StatusKind::Error);
            return Ok(Mode::Normal);
        };

        let mut lines = vec![format!("Delete {} {id}?", kind.label())];
        match kind {
            EntityKind::Album => lines.push("Its tracks will be deleted too.".to_string()),
            EntityKind::Genre => lines.push("Its tracks will be left without a genre.".to_string()),
            EntityKind::Artist | EntityKind::Track => {}
        }
        Ok(Mode::Flow {
            flow: Flow::Delete { kind, id },
            purpose: Purpose::Delete,
            step: Step::Confirm(Confirm::new("Confirm Delete", lines)),
        })
    }

    /// Esc on a step. The album wizard keeps whatever tracks were completed
    /// once the album itself has been described.
    fn cancel(&mut self, flow: Flow, purpose: Purpose) -> Result<Mode> {
        let message = match flow {
            Flow::NewAlbum(wizard) => {
                let album_level = purpose == Purpose::AlbumDetails
                    || (matches!(purpose, Purpose::Artist | Purpose::NewArtist)
                        && wizard.at_album_level());
                if !album_level {
                    return self.commit_album(wizard.draft);
                }
                "Add album cancelled.".to_string()
            }
            Flow::AddName(kind) => format!("Add {} cancelled.", kind.label().to_lowercase()),
            Flow::NewTrack { .. } => "Add track cancelled.".to_string(),
            Flow::EditName { .. } | Flow::EditAlbum { .. } | Flow::EditTrack { .. } => {
                "Edit cancelled.".to_string()
            }
            Flow::Delete { .. } => "Deletion cancelled.".to_string(),
        };
        self.set_status(message, StatusKind::Info);
        Ok(Mode::Normal)
    }

    /// Move a flow forward with the answer to its current step.
    fn advance(&mut self, flow: Flow, purpose: Purpose, answer: Answer) -> Result<Mode> {
        match (purpose, answer) {
            (Purpose::Name, Answer::Submitted(form)) => self.save_name(flow, form),
            (Purpose::AlbumDetails, Answer::Submitted(form)) => self.album_details(flow, form),
            (Purpose::TrackDetails, Answer::Submitted(form)) => self.track_details(flow, form),
            (Purpose::ChooseAlbum, Answer::Picked(Picked::Existing(id))) => {
                self.album_chosen(id)
            }
            (Purpose::Artist, Answer::Picked(picked)) => match picked {
                Picked::Existing(id) => self.artist_chosen(flow, Some(ArtistChoice::Existing(id))),
                Picked::CreateNew => Ok(Mode::Flow {
                    flow,
                    purpose: Purpose::NewArtist,
                    step: Step::Form(Form::name("New Artist")),
                }),
                Picked::KeepCurrent | Picked::NoGenre => self.artist_chosen(flow, None),
            },
            (Purpose::NewArtist, Answer::Submitted(form)) => {
                self.artist_chosen(flow, Some(ArtistChoice::New(form.text(NAME))))
            }
            (Purpose::Genre, Answer::Picked(picked)) => match picked {
                Picked::Existing(id) => self.genre_chosen(flow, Some(GenreChoice::Existing(id))),
                Picked::NoGenre => self.genre_chosen(flow, Some(GenreChoice::NoGenre)),
                Picked::KeepCurrent => self.genre_chosen(flow, None),
                Picked::CreateNew => Ok(Mode::Flow {
                    flow,
                    purpose: Purpose::NewGenre,
                    step: Step::Form(Form::name("New Genre")),
                }),
            },
            (Purpose::NewGenre, Answer::Submitted(form)) => {
                self.genre_chosen(flow, Some(GenreChoice::New(form.text(NAME))))
            }
            (Purpose::AnotherTrack, Answer::Confirmed(more)) => match flow {
                Flow::NewAlbum(wizard) if more => Ok(track_step(Flow::NewAlbum(wizard))),
                Flow::NewAlbum(wizard) => self.commit_album(wizard.draft),
                _ => Ok(Mode::Normal),
            },
            (Purpose::Delete, Answer::Confirmed(confirmed)) => self.confirm_delete(flow, confirmed),
            (purpose, _) => {
                tracing::warn!(?purpose, "unexpected answer, flow dropped");
                Ok(Mode::Normal)
            }
        }
    }

    fn save_name(&mut self, flow: Flow, form: Form) -> Result<Mode> {
        let outcome = match &flow {
            Flow::AddName(EntityKind::Artist) => catalog::add_artist(&self.conn, &form.text(NAME))
                .map(|artist| (format!("Artist '{}' added.", artist.name), Some(artist.id))),
            Flow::AddName(_) => catalog::add_genre(&self.conn, &form.text(NAME))
                .map(|genre| (format!("Genre '{}' added.", genre.name), Some(genre.id))),
            Flow::EditName {
                kind: EntityKind::Artist,
                id,
            } => catalog::update_artist(
                &self.conn,
                *id,
                &ArtistChanges {
                    name: form.changed(NAME),
                },
            )
            .map(|outcome| updated_message(outcome, EntityKind::Artist, *id)),
            Flow::EditName { kind, id } => catalog::update_genre(
                &self.conn,
                *id,
                &GenreChanges {
                    name: form.changed(NAME),
                },
            )
            .map(|outcome| updated_message(outcome, *kind, *id)),
            _ => return Ok(Mode::Normal),
        };

        match outcome {
            Ok((message, Some(id))) => {
                self.set_status(message, StatusKind::Info);
                self.reload(Some(id))?;
                Ok(Mode::Normal)
            }
            Ok((message, None)) => {
                self.set_status(message, StatusKind::Error);
                self.reload(None)?;
                Ok(Mode::Normal)
            }
            Err(err) => {
                let message = self.recover(err)?;
                Ok(reopen(flow, Purpose::Name, form, message))
            }
        }
    }

    fn album_details(&mut self, flow: Flow, form: Form) -> Result<Mode> {
        match flow {
            Flow::NewAlbum(mut wizard) => {
                let year = match form.number(YEAR) {
                    Ok(year) => year,
                    Err(err) => {
                        let message = surface_error(&err);
                        return Ok(reopen(Flow::NewAlbum(wizard), Purpose::AlbumDetails, form, message));
                    }
                };
                wizard.draft.name = form.text(NAME);
                wizard.draft.release_year = year;
                wizard.draft.compilation = form.yes(COMPILATION);

                if wizard.draft.compilation {
                    return Ok(track_step(Flow::NewAlbum(wizard)));
                }
                let picker =
                    Picker::artists(&self.conn, format!("Artist for '{}'", wizard.draft.name), false)?;
                Ok(Mode::Flow {
                    flow: Flow::NewAlbum(wizard),
                    purpose: Purpose::Artist,
                    step: Step::Picker(picker),
                })
            }
            Flow::EditAlbum { id, mut changes } => {
                let year = match form.changed_number(YEAR) {
                    Ok(year) => year,
                    Err(err) => {
                        let message = surface_error(&err);
                        return Ok(reopen(
                            Flow::EditAlbum { id, changes },
                            Purpose::AlbumDetails,
                            form,
                            message,
                        ));
                    }
                };
                changes.name = form.changed(NAME);
                changes.release_year = year;

                let picker = Picker::artists(&self.conn, format!("Add an artist to album {id}"), true)?;
                Ok(Mode::Flow {
                    flow: Flow::EditAlbum { id, changes },
                    purpose: Purpose::Artist,
                    step: Step::Picker(picker),
                })
            }
            _ => Ok(Mode::Normal),
        }
    }

    fn track_details(&mut self, flow: Flow, form: Form) -> Result<Mode> {
        if let Flow::EditTrack { id, mut changes } = flow {
            let numbers = form
                .changed_number(TRACK_NUMBER)
                .and_then(|number| Ok((number, form.changed_number(DURATION)?)));
            let (track_number, duration) = match numbers {
                Ok(numbers) => numbers,
                Err(err) => {
                    let message = surface_error(&err);
                    return Ok(reopen(
                        Flow::EditTrack { id, changes },
                        Purpose::TrackDetails,
                        form,
                        message,
                    ));
                }
            };
            changes.name = form.changed(NAME);
            changes.track_number = track_number;
            changes.duration_secs = duration;

            let picker = Picker::genres(&self.conn, format!("Genre for track {id}"), true)?;
            return Ok(Mode::Flow {
                flow: Flow::EditTrack { id, changes },
                purpose: Purpose::Genre,
                step: Step::Picker(picker),
            });
        }

        let draft = match read_track(&form) {
            Ok(draft) => draft,
            Err(err) => {
                let message = surface_error(&err);
                return Ok(reopen(flow, Purpose::TrackDetails, form, message));
            }
        };
        let title = format!("Genre for '{}'", draft.name);
        let flow = match flow {
            Flow::NewAlbum(mut wizard) => {
                wizard.track = Some(draft);
                Flow::NewAlbum(wizard)
            }
            Flow::NewTrack { album, .. } => Flow::NewTrack {
                album,
                draft: Some(draft),
            },
            other => other,
        };
        let picker = Picker::genres(&self.conn, title, false)?;
        Ok(Mode::Flow {
            flow,
            purpose: Purpose::Genre,
            step: Step::Picker(picker),
        })
    }

    fn album_chosen(&mut self, id: i64) -> Result<Mode> {
        match db::fetch_by_id::<Album>(&self.conn, id)? {
            Some(album) => Ok(track_step(Flow::NewTrack {
                album: Some(album),
                draft: None,
            })),
            None => {
                self.set_status(not_found(EntityKind::Album, id), StatusKind::Error);
                Ok(Mode::Normal)
            }
        }
    }

    /// `None` means "keep the current artists" in edit flows.
    fn artist_chosen(&mut self, flow: Flow, artist: Option<ArtistChoice>) -> Result<Mode> {
        match flow {
            Flow::NewAlbum(mut wizard) => match wizard.track.take() {
                None => {
                    wizard.draft.artist = artist;
                    Ok(track_step(Flow::NewAlbum(wizard)))
                }
                Some(mut track) => {
                    track.artist = artist;
                    wizard.draft.tracks.push(track);
                    Ok(another_track_step(wizard))
                }
            },
            Flow::NewTrack {
                album: Some(album),
                draft: Some(mut draft),
            } => {
                draft.artist = artist;
                self.commit_track(album, draft)
            }
            Flow::EditAlbum { id, mut changes } => {
                changes.add_artist = artist;
                self.commit_album_edit(id, changes)
            }
            Flow::EditTrack { id, mut changes } => {
                changes.add_artist = artist;
                self.commit_track_edit(id, changes)
            }
            _ => Ok(Mode::Normal),
        }
    }

    /// `None` means "keep the current genre" in edit flows.
    fn genre_chosen(&mut self, flow: Flow, genre: Option<GenreChoice>) -> Result<Mode> {
        match flow {
            Flow::NewAlbum(mut wizard) => {
                let Some(track) = wizard.track.as_mut() else {
                    return Ok(Mode::Normal);
                };
                track.genre = genre.unwrap_or_default();
                let title = format!("Artist for '{}'", track.name);

                if !wizard.draft.compilation {
                    if let Some(track) = wizard.track.take() {
                        wizard.draft.tracks.push(track);
                    }
                    return Ok(another_track_step(wizard));
                }
                let picker = Picker::artists(&self.conn, title, false)?;
                Ok(Mode::Flow {
                    flow: Flow::NewAlbum(wizard),
                    purpose: Purpose::Artist,
                    step: Step::Picker(picker),
                })
            }
            Flow::NewTrack {
                album: Some(album),
                draft: Some(mut draft),
            } => {
                draft.genre = genre.unwrap_or_default();
                if !album.compilation {
                    return self.commit_track(album, draft);
                }
                let picker = Picker::artists(&self.conn, format!("Artist for '{}'", draft.name), false)?;
                Ok(Mode::Flow {
                    flow: Flow::NewTrack {
                        album: Some(album),
                        draft: Some(draft),
                    },
                    purpose: Purpose::Artist,
                    step: Step::Picker(picker),
                })
            }
            Flow::EditTrack { id, mut changes } => {
                changes.genre = genre;
                let picker = Picker::artists(&self.conn, format!("Add an artist to track {id}"), true)?;
                Ok(Mode::Flow {
                    flow: Flow::EditTrack { id, changes },
                    purpose: Purpose::Artist,
                    step: Step::Picker(picker),
                })
            }
            _ => Ok(Mode::Normal),
        }
    }

    fn commit_album(&mut self, draft: AlbumDraft) -> Result<Mode> {
        match catalog::create_album_with_tracks(&mut self.conn, &draft) {
            Ok(created) => {
                let message = format!(
                    "Album '{}' saved with {} track(s).",
                    created.album.name,
                    created.tracks.len()
                );
                self.set_status(message, StatusKind::Info);
                self.reload(Some(created.album.id))?;
            }
            Err(err) => {
                self.recover(err)?;
            }
        }
        Ok(Mode::Normal)
    }

    fn commit_track(&mut self, album: Album, draft: TrackDraft) -> Result<Mode> {
        match catalog::add_track_to_album(&mut self.conn, album.id, &draft) {
            Ok(AddTrackOutcome::Added(created)) => {
                let message = format!(
                    "Track '{}' added to '{}' by {}.",
                    created.track.name, album.name, created.artist.name
                );
                self.set_status(message, StatusKind::Info);
                self.reload(Some(created.track.id))?;
            }
            Ok(AddTrackOutcome::AlbumNotFound) => {
                self.set_status(not_found(EntityKind::Album, album.id), StatusKind::Error);
            }
            Ok(AddTrackOutcome::NoAlbumArtist) => {
                let message = format!("Album '{}' has no artist; track not added.", album.name);
                self.set_status(message, StatusKind::Error);
            }
            Err(err) => {
                self.recover(err)?;
            }
        }
        Ok(Mode::Normal)
    }

    fn commit_album_edit(&mut self, id: i64, changes: AlbumChanges) -> Result<Mode> {
        match catalog::update_album(&mut self.conn, id, &changes) {
            Ok(outcome) => {
                let (message, focus) = updated_message(outcome, EntityKind::Album, id);
                self.finish_update(message, focus)?;
            }
            Err(err) => {
                self.recover(err)?;
            }
        }
        Ok(Mode::Normal)
    }

    fn commit_track_edit(&mut self, id: i64, changes: TrackChanges) -> Result<Mode> {
        match catalog::update_track(&mut self.conn, id, &changes) {
            Ok(outcome) => {
                let (message, focus) = updated_message(outcome, EntityKind::Track, id);
                self.finish_update(message, focus)?;
            }
            Err(err) => {
                self.recover(err)?;
            }
        }
        Ok(Mode::Normal)
    }

    fn finish_update(&mut self, message: String, focus: Option<i64>) -> Result<()> {
        let kind = if focus.is_some() {
            StatusKind::Info
        } else {
            StatusKind::Error
        };
        self.set_status(message, kind);
        self.reload(focus)
    }

    fn confirm_delete(&mut self, flow: Flow, confirmed: bool) -> Result<Mode> {
        let Flow::Delete { kind, id } = flow else {
            return Ok(Mode::Normal);
        };
        if !confirmed {
            self.set_status("Deletion cancelled.", StatusKind::Info);
            return Ok(Mode::Normal);
        }

        match catalog::delete_kind(&self.conn, kind, id) {
            Ok(DeleteOutcome::Deleted) => {
                self.set_status(format!("{} {id} deleted.", kind.label()), StatusKind::Info);
                self.reload(None)?;
            }
            Ok(DeleteOutcome::NotFound) => {
                self.set_status(not_found(kind, id), StatusKind::Error);
            }
            Err(err) => {
                self.recover(err)?;
            }
        }
        Ok(Mode::Normal)
    }

    /// Turn a rejected operation into a footer message. Storage failures are
    /// not recoverable and end the session.
    fn recover(&mut self, err: CatalogError) -> Result<String> {
        if matches!(err, CatalogError::StorageUnavailable(_)) {
            return Err(anyhow::Error::new(err).context("catalog storage failed"));
        }
        tracing::warn!(error = %err, "operation rejected");
        let message = err.to_string();
        self.set_status(message.clone(), StatusKind::Error);
        Ok(message)
    }

    fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        if tab != self.tab {
            self.tab = tab;
            self.selected = 0;
            self.scroll = 0;
            self.reload(None)?;
        }
        Ok(())
    }

    /// Re-read the current tab from storage, optionally moving the cursor onto
    /// the row with id `focus`.
    fn reload(&mut self, focus: Option<i64>) -> Result<()> {
        match self.tab {
            Tab::Collection => {
                let view = views::collection_view(&self.conn)?;
                self.collection = collection_lines(&view);
                let max = self.max_scroll();
                self.scroll = self.scroll.min(max);
            }
            Tab::Entity(kind) => {
                self.listing = views::listing(&self.conn, kind)?;
                if let Some(row) = focus.and_then(|id| {
                    (0..self.listing.rows.len()).find(|row| self.listing.id_at(*row) == Some(id))
                }) {
                    self.selected = row;
                }
                self.selected = self.selected.min(self.listing.rows.len().saturating_sub(1));
            }
        }
        Ok(())
    }

    fn current_target(&self) -> Option<(EntityKind, i64)> {
        match self.tab {
            Tab::Collection => None,
            Tab::Entity(kind) => self.listing.id_at(self.selected).map(|id| (kind, id)),
        }
    }

    fn move_selection(&mut self, offset: isize) {
        match self.tab {
            Tab::Collection => {
                let max = self.max_scroll() as isize;
                self.scroll = (self.scroll as isize).saturating_add(offset).clamp(0, max) as u16;
            }
            Tab::Entity(_) => {
                let len = self.listing.rows.len() as isize;
                if len == 0 {
                    return;
                }
                self.selected = (self.selected as isize).saturating_add(offset).clamp(0, len - 1) as usize;
            }
        }
    }

    fn max_scroll(&self) -> u16 {
        self.collection.len().saturating_sub(1).min(u16::MAX as usize) as u16
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Collection => self.draw_collection(frame, chunks[1]),
            Tab::Entity(kind) => self.draw_listing(frame, chunks[1], kind),
        }
        self.draw_footer(frame, chunks[2]);

        if let Mode::Flow { step, .. } = &self.mode {
            match step {
                Step::Form(form) => self.draw_form(frame, area, form),
                Step::Picker(picker) => self.draw_picker(frame, area, picker),
                Step::Confirm(confirm) => self.draw_confirm(frame, area, confirm),
            }
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = TABS
            .iter()
            .enumerate()
            .map(|(index, tab)| format!("{} {}", index + 1, tab.title()))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Music Catalog"))
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_collection(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .collection
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Collection"))
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_listing(&self, frame: &mut Frame, area: Rect, kind: EntityKind) {
        let block = Block::default().borders(Borders::ALL).title(kind.plural());
        if self.listing.is_empty() {
            let paragraph = Paragraph::new(NO_INFORMATION)
                .block(block)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(self.listing.headers.iter().map(|header| Cell::from(*header))).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.listing.rows.iter().map(|row| {
            Row::new(row.iter().map(|value| Cell::from(value.to_string())))
        });
        let table = Table::new(rows, column_constraints(&self.listing))
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[←→/1-5]", " Tabs   "),
                ("[↑↓]", " Select   "),
                ("[a]", " Add   "),
                ("[e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[q]", " Quit"),
            ],
            Mode::Flow {
                step: Step::Form(_), ..
            } => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Flow {
                step: Step::Picker(_),
                ..
            } => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Choose   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Flow {
                step: Step::Confirm(_),
                ..
            } => &[("[Y]", " Yes   "), ("[N]", " No   "), ("[Esc]", " Cancel")],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| [Span::styled(*key, key_style), Span::raw(*label)])
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &Form) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.title.clone())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len())
            .map(|index| form.build_line(index))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = form.cursor_offset();
        frame.set_cursor_position((inner.x + cursor_x, inner.y + cursor_y));
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &Picker) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(picker.title.clone())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let items: Vec<ListItem> = picker
            .items
            .iter()
            .map(|item| ListItem::new(item.label(picker.noun)))
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.selected));
        frame.render_stateful_widget(list, inner, &mut list_state);
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, confirm: &Confirm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(confirm.title.clone())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = confirm
            .lines
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Apply one key to the step on screen.
fn step_event(step: Step, code: KeyCode) -> StepEvent {
    match step {
        Step::Form(mut form) => match code {
            KeyCode::Esc => StepEvent::Cancelled,
            KeyCode::Enter => match form.validate() {
                Ok(()) => StepEvent::Done(Answer::Submitted(form)),
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    StepEvent::Pending(Step::Form(form))
                }
            },
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                StepEvent::Pending(Step::Form(form))
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.previous_field();
                StepEvent::Pending(Step::Form(form))
            }
            KeyCode::Backspace => {
                form.backspace();
                StepEvent::Pending(Step::Form(form))
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                StepEvent::Pending(Step::Form(form))
            }
            _ => StepEvent::Pending(Step::Form(form)),
        },
        Step::Picker(mut picker) => {
            match code {
                KeyCode::Esc => return StepEvent::Cancelled,
                KeyCode::Enter => {
                    if let Some(picked) = picker.pick() {
                        return StepEvent::Done(Answer::Picked(picked));
                    }
                }
                KeyCode::Up => picker.move_selection(-1),
                KeyCode::Down => picker.move_selection(1),
                KeyCode::PageUp => picker.move_selection(-PAGE),
                KeyCode::PageDown => picker.move_selection(PAGE),
                KeyCode::Home => picker.select_first(),
                KeyCode::End => picker.select_last(),
                _ => {}
            }
            StepEvent::Pending(Step::Picker(picker))
        }
        Step::Confirm(confirm) => match code {
            KeyCode::Esc => StepEvent::Cancelled,
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                StepEvent::Done(Answer::Confirmed(true))
            }
            KeyCode::Char('n') | KeyCode::Char('N') => StepEvent::Done(Answer::Confirmed(false)),
            _ => StepEvent::Pending(Step::Confirm(confirm)),
        },
    }
}

/// Show `message` on the form and keep it open.
fn reopen(flow: Flow, purpose: Purpose, mut form: Form, message: String) -> Mode {
    form.error = Some(message);
    Mode::Flow {
        flow,
        purpose,
        step: Step::Form(form),
    }
}

/// Ask for the next track's details.
fn track_step(flow: Flow) -> Mode {
    let title = match &flow {
        Flow::NewAlbum(wizard) => format!(
            "Track {} of '{}' (Esc when done)",
            wizard.draft.tracks.len() + 1,
            wizard.draft.name
        ),
        Flow::NewTrack {
            album: Some(album), ..
        } => format!("Add Track to '{}'", album.name),
        _ => "Add Track".to_string(),
    };
    Mode::Flow {
        flow,
        purpose: Purpose::TrackDetails,
        step: Step::Form(Form::track(title)),
    }
}

fn another_track_step(wizard: AlbumWizard) -> Mode {
    let lines = vec![
        format!(
            "{} track(s) ready for '{}'.",
            wizard.draft.tracks.len(),
            wizard.draft.name
        ),
        "Add another track?".to_string(),
    ];
    Mode::Flow {
        flow: Flow::NewAlbum(wizard),
        purpose: Purpose::AnotherTrack,
        step: Step::Confirm(Confirm::new("Add Album", lines)),
    }
}

fn read_track(form: &Form) -> Result<TrackDraft> {
    Ok(TrackDraft {
        name: form.text(NAME),
        track_number: form.required_number(TRACK_NUMBER)?,
        duration_secs: form.required_number(DURATION)?,
        genre: GenreChoice::NoGenre,
        artist: None,
    })
}

fn not_found(kind: EntityKind, id: i64) -> String {
    format!("{} {id} not found.", kind.label())
}

/// Footer text for an update plus the id to focus; `None` when the record was
/// gone.
fn updated_message<T>(outcome: UpdateOutcome<T>, kind: EntityKind, id: i64) -> (String, Option<i64>) {
    match outcome {
        UpdateOutcome::Updated(_) => (format!("{} {id} updated.", kind.label()), Some(id)),
        UpdateOutcome::NotFound => (not_found(kind, id), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{artists_for_album, artists_for_track, count, fetch_all, open_in_memory};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        App::new(open_in_memory().unwrap()).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        assert!(!app.handle_key(code).unwrap(), "unexpected exit on {code:?}");
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn status(app: &App) -> (&str, StatusKind) {
        let status = app.status.as_ref().expect("status message");
        (status.text.as_str(), status.kind)
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    /// Album details form → new artist → one track → no genre → done.
    fn add_regular_album(app: &mut App, album: &str, artist: &str, track: &str) {
        press(app, KeyCode::Char('4'));
        press(app, KeyCode::Char('a'));
        type_text(app, album);
        press(app, KeyCode::Tab);
        type_text(app, "1969");
        press(app, KeyCode::Enter);

        // Artist picker: "New artist…" is the first entry.
        press(app, KeyCode::Enter);
        type_text(app, artist);
        press(app, KeyCode::Enter);

        type_text(app, track);
        press(app, KeyCode::Tab);
        type_text(app, "1");
        press(app, KeyCode::Tab);
        type_text(app, "245");
        press(app, KeyCode::Enter);

        // Genre picker: "No genre" is the first entry.
        press(app, KeyCode::Enter);
        press(app, KeyCode::Char('n'));
    }

    #[test]
    fn quit_keys_exit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn adding_a_genre_updates_listing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert!(app.listing.is_empty());

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Bossa nova");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.listing.rows.len(), 1);
        assert_eq!(status(&app), ("Genre 'Bossa nova' added.", StatusKind::Info));
    }

    #[test]
    fn blank_name_keeps_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        let Mode::Flow {
            step: Step::Form(form),
            ..
        } = &app.mode
        else {
            panic!("form should stay open");
        };
        assert_eq!(form.error.as_deref(), Some("Name is required."));
        assert_eq!(count::<Artist>(&app.conn).unwrap(), 0);
    }

    #[test]
    fn album_wizard_links_artist_to_album_and_tracks() {
        let mut app = app();
        add_regular_album(&mut app, "Tropicalia", "Gal Costa", "Baby");

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            status(&app),
            ("Album 'Tropicalia' saved with 1 track(s).", StatusKind::Info)
        );
        let album = &fetch_all::<Album>(&app.conn).unwrap()[0];
        assert_eq!(album.release_year, Some(1969));
        let artists = artists_for_album(&app.conn, album.id).unwrap();
        assert_eq!(artists[0].name, "Gal Costa");
        let track = &fetch_all::<Track>(&app.conn).unwrap()[0];
        assert_eq!(track.genre_id, None);
        assert_eq!(artists_for_track(&app.conn, track.id).unwrap(), artists);
    }

    #[test]
    fn escaping_album_details_writes_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Never saved");
        press(&mut app, KeyCode::Esc);

        assert_eq!(status(&app), ("Add album cancelled.", StatusKind::Info));
        assert!(db::is_empty(&app.conn).unwrap());
    }

    #[test]
    fn escaping_track_form_saves_album_alone() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Various");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Enter);

        // Compilations go straight to the first track.
        press(&mut app, KeyCode::Esc);
        assert_eq!(status(&app), ("Album 'Various' saved with 0 track(s).", StatusKind::Info));
        let albums = fetch_all::<Album>(&app.conn).unwrap();
        assert!(albums[0].compilation);
        assert!(artists_for_album(&app.conn, albums[0].id).unwrap().is_empty());
    }

    #[test]
    fn adding_track_without_albums_reports_message() {
        let mut app = app();
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            status(&app),
            ("No albums available. Add an album first.", StatusKind::Error)
        );
    }

    #[test]
    fn adding_track_to_regular_album_reuses_its_artist() {
        let mut app = app();
        add_regular_album(&mut app, "Gal", "Gal Costa", "Cinema Olympia");

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Tuareg");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "180");
        press(&mut app, KeyCode::Enter);

        // New genre.
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "MPB");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            status(&app),
            ("Track 'Tuareg' added to 'Gal' by Gal Costa.", StatusKind::Info)
        );
        assert_eq!(app.listing.rows.len(), 2);
        assert_eq!(app.listing.rows[1][6].to_string(), "MPB");
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn editing_with_untouched_fields_keeps_values() {
        let mut app = app();
        add_regular_album(&mut app, "Araca Azul", "Caetano", "Eu quero essa mulher");

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "0");
        press(&mut app, KeyCode::Enter);
        // Keep current genre, keep current artists.
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert_eq!(status(&app), ("Track 1 updated.", StatusKind::Info));
        let track = &fetch_all::<Track>(&app.conn).unwrap()[0];
        assert_eq!(track.name, "Eu quero essa mulher");
        assert_eq!(track.duration_secs, 240);
        assert_eq!(track.track_number, 1);
    }

    #[test]
    fn editing_compilation_keeps_it_a_compilation() {
        let mut app = app();
        catalog::create_album_with_tracks(
            &mut app.conn,
            &AlbumDraft {
                name: "Mixed".into(),
                release_year: None,
                compilation: true,
                artist: None,
                tracks: vec![TrackDraft {
                    name: "Side A".into(),
                    track_number: 1,
                    duration_secs: 200,
                    genre: GenreChoice::NoGenre,
                    artist: Some(ArtistChoice::New("X".into())),
                }],
            },
        )
        .unwrap();

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2001");
        // Tab wraps back to the name: there is no third field to flip.
        press(&mut app, KeyCode::Tab);
        let Mode::Flow {
            step: Step::Form(form),
            ..
        } = &app.mode
        else {
            panic!("edit form should be open");
        };
        assert_eq!(form.active, NAME);
        press(&mut app, KeyCode::Enter);
        // Keep current artists.
        press(&mut app, KeyCode::Enter);

        assert_eq!(status(&app), ("Album 1 updated.", StatusKind::Info));
        let album = &fetch_all::<Album>(&app.conn).unwrap()[0];
        assert!(album.compilation);
        assert_eq!(album.release_year, Some(2001));
        assert!(artists_for_album(&app.conn, album.id).unwrap().is_empty());
    }

    #[test]
    fn deleting_album_asks_first_and_cascades() {
        let mut app = app();
        add_regular_album(&mut app, "Expresso 2222", "Gilberto Gil", "Back in Bahia");

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(status(&app), ("Deletion cancelled.", StatusKind::Info));
        assert_eq!(count::<Album>(&app.conn).unwrap(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(status(&app), ("Album 1 deleted.", StatusKind::Info));
        assert_eq!(count::<Track>(&app.conn).unwrap(), 0);
        assert!(app.listing.is_empty());
    }

    #[test]
    fn collection_tab_rejects_edits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(status(&app), ("Nothing selected.", StatusKind::Error));
    }

    #[test]
    fn empty_tabs_render_placeholder() {
        let mut app = app();
        assert!(screen_text(&app).contains(NO_INFORMATION));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.tab, Tab::Entity(EntityKind::Genre));
        assert!(screen_text(&app).contains(NO_INFORMATION));
    }

    #[test]
    fn populated_collection_renders_sections() {
        let mut app = app();
        add_regular_album(&mut app, "Construcao", "Chico Buarque", "Deus lhe pague");
        press(&mut app, KeyCode::Char('1'));

        let text = screen_text(&app);
        assert!(text.contains("Artist: Chico Buarque"));
        assert!(text.contains("Deus lhe pague"));
    }
}

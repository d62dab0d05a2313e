//! Command-line surface: argument parsing and the non-interactive commands
//! that print the catalog as plain text.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;

use crate::catalog::views::{self, CollectionView, Listing, NO_INFORMATION};
use crate::catalog::EntityKind;

/// Terminal music catalog
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to open instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file to read instead of ~/.music-catalog/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run one command and exit; without one the interactive UI starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the whole collection: artists with their albums and tracks, then
    /// compilations
    Show,
    /// Print every record of one kind as a table
    List {
        #[arg(value_enum)]
        kind: ListKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Genres,
    Artists,
    Albums,
    Tracks,
}

impl From<ListKind> for EntityKind {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Genres => EntityKind::Genre,
            ListKind::Artists => EntityKind::Artist,
            ListKind::Albums => EntityKind::Album,
            ListKind::Tracks => EntityKind::Track,
        }
    }
}

pub fn run_command(conn: &Connection, command: &Command, out: &mut impl Write) -> Result<()> {
    let lines = match command {
        Command::Show => {
            let view = views::collection_view(conn).context("failed to load the collection")?;
            collection_lines(&view)
        }
        Command::List { kind } => {
            let kind = EntityKind::from(*kind);
            let listing = views::listing(conn, kind)
                .with_context(|| format!("failed to list {}", kind.plural().to_lowercase()))?;
            table_lines(&listing)
        }
    };

    for line in lines {
        writeln!(out, "{line}").context("failed to write output")?;
    }
    Ok(())
}

/// The collection as indented text, one entry per line.
pub fn collection_lines(view: &CollectionView) -> Vec<String> {
    let CollectionView::Populated(collection) = view else {
        return vec![NO_INFORMATION.to_string()];
    };

    let mut lines = Vec::new();
    if collection.artists.is_empty() {
        lines.push("No artists available.".to_string());
    }
    for section in &collection.artists {
        lines.push(format!("Artist: {}", section.artist.name));
        if section.albums.is_empty() {
            lines.push("  No albums linked to this artist.".to_string());
        }
        for album in &section.albums {
            lines.push(format!("  Album: {} - {}", album.album, album.album.kind_label()));
            if album.tracks.is_empty() {
                lines.push("    No tracks on this album.".to_string());
            }
            for track in &album.tracks {
                lines.push(format!(
                    "    Track {}: {} - {} seconds (Genre: {})",
                    track.track_number, track.name, track.duration_secs, track.genre
                ));
            }
        }
    }

    if !collection.compilations.is_empty() {
        lines.push(String::new());
        lines.push("Compilations:".to_string());
    }
    for compilation in &collection.compilations {
        lines.push(format!("  Album: {} - Compilation", compilation.album));
        if compilation.tracks.is_empty() {
            lines.push("    No tracks on this compilation.".to_string());
        }
        for track in &compilation.tracks {
            lines.push(format!(
                "    Track {}: {} - {} (Duration: {}, Genre: {})",
                track.track_number, track.name, track.artists, track.duration, track.genre
            ));
        }
    }
    lines
}

/// Character width of every column: the widest of its header and cells.
pub fn column_widths(listing: &Listing) -> Vec<usize> {
    let mut widths: Vec<usize> = listing
        .headers
        .iter()
        .map(|header| header.chars().count())
        .collect();
    for row in &listing.rows {
        for (index, value) in row.iter().enumerate() {
            let width = value.to_string().chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }
    widths
}

/// A listing as a bordered text table. Numbers are right-aligned.
pub fn table_lines(listing: &Listing) -> Vec<String> {
    if listing.is_empty() {
        return vec![NO_INFORMATION.to_string()];
    }

    let widths = column_widths(listing);
    let border = {
        let parts: Vec<String> = widths.iter().map(|width| "-".repeat(width + 2)).collect();
        format!("+{}+", parts.join("+"))
    };
    let header: Vec<String> = listing
        .headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!(" {header:<width$} "))
        .collect();

    let mut lines = vec![border.clone(), format!("|{}|", header.join("|")), border.clone()];
    for row in &listing.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| match value {
                views::Value::Int(_) => format!(" {:>width$} ", value.to_string()),
                _ => format!(" {:<width$} ", value.to_string()),
            })
            .collect();
        lines.push(format!("|{}|", cells.join("|")));
    }
    lines.push(border);
    lines
}

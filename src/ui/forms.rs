use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Album, Track};

/// How a field accepts keystrokes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    /// Digits only.
    Number,
    /// A single `y` or `n`.
    YesNo,
}

#[derive(Clone, Debug)]
pub(crate) struct Field {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    /// Value the field was seeded with when editing. Unchanged or cleared
    /// fields map to "keep the stored value".
    pub(crate) original: Option<String>,
}

impl Field {
    fn new(label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            label,
            value: String::new(),
            kind,
            required,
            original: None,
        }
    }

    fn seeded(mut self, value: String) -> Self {
        self.value = value.clone();
        self.original = Some(value);
        self
    }
}

/// Modal form state: a column of labelled inputs with one focused field.
#[derive(Clone, Debug)]
pub(crate) struct Form {
    pub(crate) title: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
    /// Editing forms treat blank input as "keep current value".
    pub(crate) editing: bool,
}

pub(crate) const NAME: usize = 0;
pub(crate) const YEAR: usize = 1;
pub(crate) const COMPILATION: usize = 2;
pub(crate) const TRACK_NUMBER: usize = 1;
pub(crate) const DURATION: usize = 2;

impl Form {
    fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            active: 0,
            error: None,
            editing: false,
        }
    }

    /// Single "Name" field, used for artists and genres.
    pub(crate) fn name(title: impl Into<String>) -> Self {
        Self::new(title, vec![Field::new("Name", FieldKind::Text, true)])
    }

    pub(crate) fn edit_name(title: impl Into<String>, current: &str) -> Self {
        let mut form = Self::new(
            title,
            vec![Field::new("Name", FieldKind::Text, true).seeded(current.to_string())],
        );
        form.editing = true;
        form
    }

    pub(crate) fn album() -> Self {
        let mut form = Self::new(
            "Add Album",
            vec![
                Field::new("Name", FieldKind::Text, true),
                Field::new("Year", FieldKind::Number, false),
                Field::new("Compilation (y/n)", FieldKind::YesNo, false),
            ],
        );
        form.fields[COMPILATION].value = "n".into();
        form
    }

    /// Name and year only; whether the album is a compilation is settled when
    /// it is created.
    pub(crate) fn edit_album(album: &Album) -> Self {
        let year = album.release_year.map(|y| y.to_string()).unwrap_or_default();
        let mut form = Self::new(
            format!("Edit {} Album {}", album.kind_label(), album.id),
            vec![
                Field::new("Name", FieldKind::Text, true).seeded(album.name.clone()),
                Field::new("Year", FieldKind::Number, false).seeded(year),
            ],
        );
        form.editing = true;
        form
    }

    pub(crate) fn track(title: impl Into<String>) -> Self {
        Self::new(
            title,
            vec![
                Field::new("Name", FieldKind::Text, true),
                Field::new("Track number", FieldKind::Number, true),
                Field::new("Duration (seconds)", FieldKind::Number, true),
            ],
        )
    }

    pub(crate) fn edit_track(track: &Track) -> Self {
        let mut form = Self::new(
            format!("Edit Track {}", track.id),
            vec![
                Field::new("Name", FieldKind::Text, true).seeded(track.name.clone()),
                Field::new("Track number", FieldKind::Number, true)
                    .seeded(track.track_number.to_string()),
                Field::new("Duration (seconds)", FieldKind::Number, true)
                    .seeded(track.duration_secs.to_string()),
            ],
        );
        form.editing = true;
        form
    }

    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields.get_mut(self.active) else {
            return false;
        };
        match field.kind {
            FieldKind::Text => {
                if ch.is_control() {
                    return false;
                }
                field.value.push(ch);
            }
            FieldKind::Number => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                field.value.push(ch);
            }
            FieldKind::YesNo => match ch.to_ascii_lowercase() {
                'y' | 'n' => field.value = ch.to_ascii_lowercase().to_string(),
                _ => return false,
            },
        }
        self.error = None;
        true
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    /// Check required fields. Editing forms allow blanks, which keep the
    /// stored value.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.editing {
            return Ok(());
        }
        for field in &self.fields {
            if field.required && field.value.trim().is_empty() {
                return Err(anyhow!("{} is required.", field.label));
            }
        }
        Ok(())
    }

    pub(crate) fn text(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|field| field.value.trim().to_string())
            .unwrap_or_default()
    }

    /// Parse a numeric field; blank yields `None`.
    pub(crate) fn number(&self, index: usize) -> Result<Option<i64>> {
        let raw = self.text(index);
        if raw.is_empty() {
            return Ok(None);
        }
        let label = self.fields.get(index).map_or("Value", |field| field.label);
        let value = raw
            .parse::<i64>()
            .with_context(|| format!("{label} must be a whole number."))?;
        Ok(Some(value))
    }

    /// Numeric field that must be present.
    pub(crate) fn required_number(&self, index: usize) -> Result<i64> {
        let label = self.fields.get(index).map_or("Value", |field| field.label);
        self.number(index)?
            .ok_or_else(|| anyhow!("{label} is required."))
    }

    pub(crate) fn yes(&self, index: usize) -> bool {
        self.text(index) == "y"
    }

    /// The field's new value when the user actually changed it. Blank input
    /// or the original text both mean "no change".
    pub(crate) fn changed(&self, index: usize) -> Option<String> {
        let field = self.fields.get(index)?;
        let value = field.value.trim();
        if value.is_empty() || field.original.as_deref().map(str::trim) == Some(value) {
            None
        } else {
            Some(value.to_string())
        }
    }

    pub(crate) fn changed_number(&self, index: usize) -> Result<Option<i64>> {
        if self.changed(index).is_none() {
            return Ok(None);
        }
        self.number(index)
    }

    /// Render one field as a `Label: value` line, highlighting the focus.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.fields.get(index) else {
            return Line::from("");
        };
        let is_active = index == self.active;

        let display = if field.value.is_empty() {
            if self.editing {
                "<keep current>".to_string()
            } else if field.required {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Column where the cursor sits inside the active field's line.
    pub(crate) fn cursor_offset(&self) -> (u16, u16) {
        let Some(field) = self.fields.get(self.active) else {
            return (0, 0);
        };
        let x = field.label.len() + 2 + field.value.chars().count();
        (
            u16::try_from(x).unwrap_or(u16::MAX),
            u16::try_from(self.active).unwrap_or(u16::MAX),
        )
    }
}

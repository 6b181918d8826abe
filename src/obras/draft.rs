//! Form drafts and their validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::obras::types::{Obra, ObraPayload};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Preencha campos obrigatórios: Nome, Diretor e Data.";
pub const INVALID_DATE_MESSAGE: &str = "Formato de data inválido. Use YYYY-MM-DD ou DD/MM/YYYY";

pub const DEFAULT_DESCRIPTION: &str = "Sem descrição adicional";
pub const DEFAULT_VENUE: &str = "Teatro Principal";
pub const DEFAULT_CAST: &str = "Elenco a definir";
pub const DEFAULT_RATING: i32 = 5;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid ISO date pattern"));
static BR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("valid DD/MM/YYYY pattern")
});

/// Editable copy of an obra, kept as the user typed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObraDraft {
    pub name: String,
    pub director: String,
    pub date: String,
    pub venue: String,
    pub cast: String,
    pub description: String,
    pub rating: String,
}

impl Default for ObraDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            director: String::new(),
            date: String::new(),
            venue: String::new(),
            cast: String::new(),
            description: String::new(),
            rating: DEFAULT_RATING.to_string(),
        }
    }
}

impl ObraDraft {
    /// Draft pre-filled from an existing record
    pub fn from_obra(obra: &Obra) -> Self {
        Self {
            name: obra.name.clone(),
            director: obra.director.clone(),
            date: obra.date.clone(),
            venue: obra.venue.clone(),
            cast: obra.cast.clone(),
            description: obra.description.clone().unwrap_or_default(),
            rating: obra.rating.to_string(),
        }
    }

    /// Validate the draft and turn it into a request body.
    ///
    /// Required fields must be non-blank, the date must be ISO or
    /// `DD/MM/YYYY`. Blank optional fields get their default text.
    pub fn to_payload(&self) -> Result<ObraPayload> {
        let name = self.name.trim();
        let director = self.director.trim();
        let date = self.date.trim();

        if name.is_empty() || director.is_empty() || date.is_empty() {
            return Err(Error::validation(REQUIRED_FIELDS_MESSAGE));
        }

        Ok(ObraPayload {
            name: name.to_string(),
            director: director.to_string(),
            date: normalize_date(date)?,
            description: or_default(&self.description, DEFAULT_DESCRIPTION),
            venue: or_default(&self.venue, DEFAULT_VENUE),
            cast: or_default(&self.cast, DEFAULT_CAST),
            rating: clamp_rating(&self.rating),
        })
    }
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        value => value.to_string(),
    }
}

/// Bring a date into `YYYY-MM-DD` form.
///
/// Only the shape is checked; the backend rejects impossible dates.
pub fn normalize_date(input: &str) -> Result<String> {
    let input = input.trim();

    if ISO_DATE.is_match(input) {
        return Ok(input.to_string());
    }

    if let Some(caps) = BR_DATE.captures(input) {
        return Ok(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]));
    }

    Err(Error::validation(INVALID_DATE_MESSAGE))
}

/// Parse a rating and clamp it into 1..=10. Blank or non-numeric input
/// yields the default rating; infinities clamp like any other number.
pub fn clamp_rating(input: &str) -> i32 {
    match input.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => value.round().clamp(1.0, 10.0) as i32,
        _ => DEFAULT_RATING,
    }
}

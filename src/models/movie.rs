//! Catalog records as returned by the OMDb API.
//!
//! Field names follow the remote JSON (`Title`, `imdbID`, ...). The API uses
//! the string `"N/A"` for values it intentionally leaves out.

use serde::{Deserialize, Serialize};

/// Sentinel the catalog uses for an intentionally absent value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns the value when it carries real content.
pub fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

/// Abbreviated catalog entry used in search result grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
}

impl MovieSummary {
    /// Poster URL, or `None` when the catalog has no artwork.
    pub fn poster(&self) -> Option<&str> {
        present(Some(&self.poster_url))
    }
}

/// Complete catalog entry with descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Rated", default)]
    pub rated: Option<String>,
    #[serde(rename = "Released", default)]
    pub released: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Writer", default)]
    pub writer: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Awards", default)]
    pub awards: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "BoxOffice", default)]
    pub box_office: Option<String>,
}

/// A labelled attribute of a detail record that has a real value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact<'a> {
    pub label: &'static str,
    pub value: &'a str,
}

impl MovieDetail {
    /// Genres split into individual entries; empty when the catalog has none.
    pub fn genres(&self) -> Vec<&str> {
        present(self.genre.as_deref())
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Short tags shown next to the title (year, runtime, rating).
    pub fn badges(&self) -> Vec<&str> {
        [
            Some(self.summary.year.as_str()),
            self.runtime.as_deref(),
            self.rated.as_deref(),
        ]
        .into_iter()
        .filter_map(present)
        .collect()
    }

    /// Credits and other descriptive attributes, skipping absent ones.
    pub fn facts(&self) -> Vec<Fact<'_>> {
        [
            ("Director", &self.director),
            ("Cast", &self.actors),
            ("Writer", &self.writer),
            ("Language", &self.language),
            ("Country", &self.country),
            ("Released", &self.released),
            ("Awards", &self.awards),
            ("Box Office", &self.box_office),
        ]
        .into_iter()
        .filter_map(|(label, value)| present(value.as_deref()).map(|value| Fact { label, value }))
        .collect()
    }

    pub fn rating(&self) -> Option<&str> {
        present(self.imdb_rating.as_deref())
    }

    pub fn plot(&self) -> Option<&str> {
        present(self.plot.as_deref())
    }
}

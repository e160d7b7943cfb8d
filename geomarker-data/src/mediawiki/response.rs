//! Action API response types.
//!
//! Only the fields the crawler reads are modelled; everything else in the
//! payload is ignored by serde.
//!
//! See: <https://www.mediawiki.org/wiki/API:Allpages> and
//! <https://www.mediawiki.org/wiki/Extension:GeoData#prop=coordinates>

use std::collections::HashMap;

use serde::Deserialize;

/// Error envelope returned in place of a result.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

/// `list=allpages` response.
#[derive(Debug, Deserialize)]
pub struct AllPagesResponse {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default, rename = "continue")]
    pub continuation: Option<AllPagesContinue>,
    #[serde(default)]
    pub query: Option<AllPagesQuery>,
}

/// Continuation block; `apcontinue` feeds the next `apfrom`.
#[derive(Debug, Deserialize)]
pub struct AllPagesContinue {
    #[serde(default)]
    pub apcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AllPagesQuery {
    #[serde(default)]
    pub allpages: Vec<AllPagesEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AllPagesEntry {
    pub pageid: u64,
    pub title: String,
}

/// `prop=coordinates` response.
#[derive(Debug, Deserialize)]
pub struct CoordinatesResponse {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub query: Option<CoordinatesQuery>,
}

/// Pages keyed by the page id rendered as a string, as the API returns them.
#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    #[serde(default)]
    pub pages: HashMap<String, CoordinatesPage>,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesPage {
    #[serde(default)]
    pub coordinates: Vec<CoordinateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CoordinateEntry {
    pub lat: f64,
    pub lon: f64,
}

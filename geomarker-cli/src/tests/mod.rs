//! Unit tests for the geomarker CLI.

use super::*;

mod crawl_unit;
mod unit;

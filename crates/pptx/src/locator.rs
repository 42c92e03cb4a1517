//! Finds the slide parts of a package and assigns their page numbers.

use pagenum_core::{Package, SlidePart};
use regex::Regex;
use std::sync::LazyLock;

/// Directory holding slide parts.
pub const SLIDES_DIR: &str = "ppt/slides/";

/// `slide<N>.xml`, nothing more.
static SLIDE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^slide[0-9]+\.xml$").unwrap());

/// Whether `name` (a bare file name) is a slide part name.
pub fn is_slide_name(name: &str) -> bool {
    SLIDE_NAME_REGEX.is_match(name)
}

/// List the slide parts directly under [`SLIDES_DIR`], numbered 1..N.
///
/// Slides are ordered by file name as strings, so `slide10.xml` comes
/// before `slide2.xml`. The number in the file name is not used.
pub fn locate(package: &Package) -> Vec<SlidePart> {
    let mut paths: Vec<&str> = package
        .entries()
        .iter()
        .filter(|e| !e.is_dir())
        .filter_map(|e| {
            let name = e.path.strip_prefix(SLIDES_DIR)?;
            is_slide_name(name).then_some(e.path.as_str())
        })
        .collect();

    // Every candidate shares SLIDES_DIR, so path order is file name order.
    paths.sort_unstable();

    let slides: Vec<SlidePart> = paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| SlidePart {
            path: path.to_string(),
            index: i + 1,
        })
        .collect();

    log::debug!("Located {} slide parts", slides.len());

    slides
}

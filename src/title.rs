/// Canonical "Title (Year)" derivation from raw release names
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Runs of release-name separators
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._\-]+").expect("separator pattern"));

/// First year-like token; deliberately not word-bounded
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20)\d{2}").expect("year pattern"));

/// Bracketed, parenthesized and braced groups, shortest match
static GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]|\(.*?\)|\{.*?\}").expect("group pattern"));

/// A raw name split into its title and year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTitle {
    pub title: String,
    pub year: Option<String>,
}

impl ParsedTitle {
    /// `"<title> (<year>)"`, or the bare title without a year
    pub fn display(&self) -> String {
        match &self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

/// Normalize a raw file or folder name to `"Title (Year)"` or `"Title"`
pub fn normalize(raw_name: &str) -> String {
    parse(raw_name).display()
}

/// Split a raw file or folder name into title and year.
///
/// The year is the first `19xx`/`20xx` token after separators are collapsed;
/// the title is everything before it with bracket groups removed. An empty
/// title is kept as is when a year was found.
pub fn parse(raw_name: &str) -> ParsedTitle {
    let base = strip_extension(basename(raw_name));
    let base = SEPARATOR_RE.replace_all(base, " ");

    let year_match = YEAR_RE.find(&base);
    let title_part = match year_match {
        Some(m) => base[..m.start()].trim(),
        None => base.trim(),
    };

    let title = GROUP_RE.replace_all(title_part, "");
    let title = title.trim();
    // "Movie (2010)" leaves a dangling "(" once the year is cut off
    let title = match year_match {
        Some(_) => title.trim_end_matches(|c: char| matches!(c, '(' | '[' | '{') || c.is_whitespace()),
        None => title,
    }
    .to_string();

    ParsedTitle {
        title,
        year: year_match.map(|m| m.as_str().to_string()),
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Drop the final extension; leading dots never start one (".hidden" stays)
fn strip_extension(name: &str) -> &str {
    let stem_start = match name.find(|c: char| c != '.') {
        Some(idx) => idx,
        None => return name,
    };

    match name.rfind('.') {
        Some(dot) if dot > stem_start => &name[..dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_name_with_year() {
        assert_eq!(normalize("Spirited.Away.2001.mkv"), "Spirited Away (2001)");
        assert_eq!(normalize("The.Great.Voyage.2015.1080p.BluRay.mkv"), "The Great Voyage (2015)");
        assert_eq!(normalize("How_to_Train-Your--Dragon_2010.mp4"), "How to Train Your Dragon (2010)");
    }

    #[test]
    fn test_path_prefix_is_stripped() {
        assert_eq!(normalize("/data/(2010)/MovieX/MovieX.2010.mkv"), "MovieX (2010)");
        assert_eq!(normalize("MovieX/MovieX.2010.mkv"), "MovieX (2010)");
    }

    #[test]
    fn test_no_year_returns_bare_title() {
        assert_eq!(normalize("Some.Short.Film.mkv"), "Some Short Film");
        assert_eq!(normalize("[Group] Some Short Film [x264].mkv"), "Some Short Film");
        assert!(!normalize("Untitled.Project.avi").contains('('));
    }

    #[test]
    fn test_open_bracket_kept_without_year() {
        assert_eq!(normalize("Film ("), "Film (");
        assert_eq!(normalize("Film.[Director's.Cut.mkv"), "Film [Director's Cut");
        assert_eq!(normalize(&normalize("Film (")), "Film (");
    }

    #[test]
    fn test_bracket_groups_removed_before_year() {
        assert_eq!(normalize("[Group] Coco {Extended} 2017.mkv"), "Coco (2017)");
        assert_eq!(normalize("Up (Pixar) [Remux] 2009 [1080p].mkv"), "Up (2009)");
    }

    #[test]
    fn test_year_in_parentheses() {
        assert_eq!(normalize("Spirited Away (2001).mkv"), "Spirited Away (2001)");
        assert_eq!(normalize("Coco [2017] [BluRay].mp4"), "Coco (2017)");
    }

    #[test]
    fn test_empty_title_with_year_is_preserved() {
        assert_eq!(normalize("[Group].2012.mkv"), " (2012)");
        assert_eq!(normalize("2001.A.Space.Odyssey.1968.mkv"), " (2001)");
    }

    #[test]
    fn test_first_year_like_token_wins() {
        // not word-bounded: digits inside a longer number still count
        assert_eq!(normalize("Movie 120045.mkv"), "Movie 1 (2004)");
        assert_eq!(normalize("Blade Runner 2049 2017.mkv"), "Blade Runner (2049)");
    }

    #[test]
    fn test_folder_name_with_dotted_year_loses_year_as_extension() {
        // the last dotted token of a folder name is treated as an extension
        assert_eq!(normalize("Movie.2010"), "Movie");
        assert_eq!(normalize(".hidden"), "hidden");
    }

    #[test]
    fn test_idempotent_on_normalized_titles() {
        for raw in [
            "Spirited.Away.2001.mkv",
            "[Group] Coco {Extended} 2017.mkv",
            "Toy_Story_3_2010_BluRay.mp4",
            "Spirited Away (2001).mkv",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_single_year_token_ends_output() {
        for year in [1900, 1950, 1999, 2000, 2015, 2099] {
            let raw = format!("Some.Movie.{}.WEB.mkv", year);
            assert!(normalize(&raw).ends_with(&format!("({})", year)));
        }
    }

    #[test]
    fn test_parse_exposes_year() {
        let parsed = parse("Wolfwalkers.2020.mkv");
        assert_eq!(parsed.title, "Wolfwalkers");
        assert_eq!(parsed.year.as_deref(), Some("2020"));
        assert_eq!(parse("Wolfwalkers.mkv").year, None);
    }
}

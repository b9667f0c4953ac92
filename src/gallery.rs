use crate::config::SiteSettings;
use crate::constants::{
    GALLERY_PROXY_FORMAT, IMAGE_EXTENSIONS, IMAGE_PROXY_BASE, PROXIED_EXTENSION, RAW_CONTENT_BASE,
};
use crate::error::{Error, Result};
use crate::fetcher::{ContentSource, RemoteEntry};
use crate::semester::Semester;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One photo matched from the remote folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub filename: String,
    pub raw_url: String,
    /// Browser-renderable URL, proxied through a converter for HEIC
    pub display_url: String,
    pub ext: String,
}

impl GalleryItem {
    /// Filename without its extension
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.filename)
    }
}

// ============================================================================
// Filename Matching
// ============================================================================

/// Build the `<prefix>[-_]<semester>[-_...].<ext>` pattern for one topic
fn topic_pattern(prefix: &str, semester: &str) -> Result<Regex> {
    let pattern = format!(
        r"^{}[-_]{}(?:[-_].*)?\.({})$",
        regex::escape(prefix),
        regex::escape(semester),
        IMAGE_EXTENSIONS.join("|")
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Config(format!("invalid gallery pattern for {prefix}: {e}")))
}

/// Filter a folder listing down to the photos for one topic and semester,
/// sorted with numeric-aware ordering and mapped to raw/display URLs.
pub fn match_gallery_files(
    prefix: &str,
    semester: &str,
    entries: &[RemoteEntry],
    settings: &SiteSettings,
) -> Result<Vec<GalleryItem>> {
    let pattern = topic_pattern(prefix, semester)?;

    let mut matching: Vec<&RemoteEntry> = entries
        .iter()
        .filter(|entry| entry.is_file() && pattern.is_match(&entry.name))
        .collect();
    matching.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    Ok(matching
        .into_iter()
        .map(|entry| build_item(&entry.name, settings))
        .collect())
}

fn build_item(filename: &str, settings: &SiteSettings) -> GalleryItem {
    let raw_url = format!(
        "{}/{}/{}/{}/{}/{}",
        RAW_CONTENT_BASE,
        settings.repo_owner,
        settings.repo_name,
        settings.branch,
        settings.photos_folder,
        urlencoding::encode(filename)
    );
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    let display_url = if ext == PROXIED_EXTENSION {
        proxy_url(&raw_url, GALLERY_PROXY_FORMAT)
    } else {
        raw_url.clone()
    };

    GalleryItem {
        filename: filename.to_string(),
        raw_url,
        display_url,
        ext,
    }
}

/// Wrap a source URL in the image conversion proxy
pub fn proxy_url(source: &str, output: &str) -> String {
    format!(
        "{}?url={}&output={}",
        IMAGE_PROXY_BASE,
        urlencoding::encode(source),
        output
    )
}

/// Punctuation and symbols in root collation order; all of them sort before
/// digits, and digits before letters.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Compare names the way a numeric-aware locale collation does, so that
/// `ws-s26-2.jpg` sorts before `ws-s26-10.jpg` and `_` sorts before `-`.
///
/// Primary weights decide first (case-insensitive, digit runs by value).
/// Ties fall back to lowercase-before-uppercase, then byte order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let primary = cmp_tokens(&tokens(a), &tokens(b));
    if primary != Ordering::Equal {
        return primary;
    }

    let case = |s: &str| {
        s.chars()
            .filter(|c| c.is_alphabetic())
            .map(char::is_uppercase)
            .collect::<Vec<_>>()
    };
    case(a).cmp(&case(b)).then_with(|| a.cmp(b))
}

/// Collation element: a whole run of ASCII digits, or one other character
#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Number(&'a str),
    Char(char),
}

impl Token<'_> {
    fn group(&self) -> u8 {
        match self {
            Token::Number(_) => DIGIT_GROUP,
            Token::Char(ch) => primary_weight(*ch).0,
        }
    }

    fn cmp_primary(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number(x), Token::Number(y)) => cmp_numeric(x, y),
            (Token::Char(x), Token::Char(y)) => primary_weight(*x).cmp(&primary_weight(*y)),
            _ => self.group().cmp(&other.group()),
        }
    }
}

fn cmp_tokens<'a>(a: &[Token<'a>], b: &[Token<'a>]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.cmp_primary(y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

const DIGIT_GROUP: u8 = 2;

/// (group, rank) with groups ordered whitespace, punctuation, digits,
/// letters, then everything else
fn primary_weight(ch: char) -> (u8, u32) {
    if ch.is_whitespace() {
        (0, ch as u32)
    } else if let Some(rank) = PUNCTUATION_ORDER.find(ch) {
        (1, rank as u32)
    } else if ch.is_ascii_digit() {
        (DIGIT_GROUP, ch as u32)
    } else if ch.is_alphabetic() {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        (3, lower as u32)
    } else {
        (4, ch as u32)
    }
}

/// Split into digit runs and single non-digit characters
fn tokens(s: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut digits_start: Option<usize> = None;

    for (idx, ch) in s.char_indices() {
        if ch.is_ascii_digit() {
            digits_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = digits_start.take() {
            out.push(Token::Number(&s[start..idx]));
        }
        out.push(Token::Char(ch));
    }
    if let Some(start) = digits_start {
        out.push(Token::Number(&s[start..]));
    }
    out
}

fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

// ============================================================================
// Fetching
// ============================================================================

/// List the photos folder and match it against one topic/semester pair
pub async fn fetch_images_by_topic_and_semester<S: ContentSource>(
    source: &S,
    prefix: &str,
    semester: &str,
    settings: &SiteSettings,
) -> Result<Vec<GalleryItem>> {
    let entries = source.list_folder().await?;
    let items = match_gallery_files(prefix, semester, &entries, settings)?;
    log::debug!("{}-{}: {} matching images", prefix, semester, items.len());
    Ok(items)
}

/// Photos for a topic prefix, current semester first.
///
/// Falls back to the past semester exactly once when the current one has no
/// matches. Every failure is logged and collapses to an empty list.
pub async fn fetch_gallery_images<S: ContentSource>(
    source: &S,
    prefix: &str,
    current: Semester,
    past: Semester,
    settings: &SiteSettings,
) -> Vec<GalleryItem> {
    let mut images =
        match fetch_images_by_topic_and_semester(source, prefix, &current.label(), settings).await {
            Ok(images) => images,
            Err(e) => {
                log::error!("Error fetching images for {}-{}: {}", prefix, current, e);
                Vec::new()
            }
        };

    if images.is_empty() {
        images = fetch_images_by_topic_and_semester(source, prefix, &past.label(), settings)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Fallback fetch for {}-{} failed: {}", prefix, past, e);
                Vec::new()
            });
    }

    images.truncate(settings.max_images);
    images
}

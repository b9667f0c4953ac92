/// Top-level page sections with the gallery topic prefixes that belong to each.
/// Order matches the hero carousel slides.
pub const SECTION_TOPICS: &[(&str, &str, &[&str])] = &[
    ("workshops", "Workshops", &["ws"]),
    ("projects", "Projects", &["mm", "bb"]),
    ("committee", "Committee", &["csd", "cco"]),
    ("get-involved", "Get Involved", &["pwm"]),
];

/// Find the top-level section that owns a gallery topic prefix
pub fn section_for_prefix(prefix: &str) -> Option<&'static str> {
    SECTION_TOPICS
        .iter()
        .find(|&&(_, _, prefixes)| prefixes.contains(&prefix))
        .map(|&(section, _, _)| section)
}

/// Default subsection id -> topic prefix mapping for gallery lookups
pub const DEFAULT_TOPICS: &[(&str, &str)] = &[
    ("past-workshops", "ws"),
    ("upcoming-workshops", "ws"),
    ("circuit-speed-dating", "csd"),
    ("micromouse", "mm"),
    ("battlebots", "bb"),
    ("chill-cook-off", "cco"),
    ("pw-weekly-schedule", "pwm"),
];

// ============================================================================
// Remote Endpoints
// ============================================================================

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";
pub const IMAGE_PROXY_BASE: &str = "https://images.weserv.nl/";
pub const USER_AGENT: &str = concat!("pw-page/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_REPO_OWNER: &str = "IEEE-UniversityOfHouston";
pub const DEFAULT_REPO_NAME: &str = "media";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_PHOTOS_FOLDER: &str = "photographs";
pub const DEFAULT_MAX_IMAGES: usize = 20;
pub const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTtut0Ug7UwTi91_mkpFk48TSY_1iZJ3DAwGPioT7-ORsXmjqszaRcv8suV1L1UeMkESGTLhZLJapOA/pub?gid=847868819&single=true&output=csv";

pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Gallery Rules
// ============================================================================

/// Extensions accepted by the gallery filename pattern
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

/// Extension that browsers cannot display and must go through the image proxy
pub const PROXIED_EXTENSION: &str = "heic";

/// Output format requested from the proxy for gallery images
pub const GALLERY_PROXY_FORMAT: &str = "jpeg";

/// Output format requested from the proxy for member portraits
pub const PORTRAIT_PROXY_FORMAT: &str = "webp";

// ============================================================================
// Member Roster Rules
// ============================================================================

/// Case-insensitive substring rules mapping sheet column labels to canonical
/// keys. Evaluated in order; the first hit wins.
pub const HEADER_RULES: &[(&str, &[&str])] = &[
    ("full_name", &["full name"]),
    ("nickname", &["nickname"]),
    ("graduating_semester", &["graduating"]),
    ("years", &["years in ieee p"]),
    ("image_url", &["image url"]),
    ("display_image", &["display image"]),
    ("pw_statement", &["pw statement", "p&w statement", "what you enjoy"]),
    ("subteam", &["subteams", "sub-team", "sub team"]),
    ("github", &["github"]),
    ("linkedin", &["linkedin"]),
    (
        "co_chair_years",
        &["years of co-chair", "years of cochair", "co-chair years"],
    ),
    ("is_co_chair", &["co-chair?"]),
    ("email", &["email"]),
    ("timestamp", &["timestamp"]),
];

pub const DEFAULT_MEMBER_NAME: &str = "Member";
pub const DEFAULT_MEMBER_STATEMENT: &str = "Active in P&W Committee";
pub const DEFAULT_MEMBER_IMAGE: &str =
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=300&h=300&fit=crop";

// ============================================================================
// Page Rendering
// ============================================================================

pub const MEMBERS_SUBSECTION: &str = "meet-members";
pub const SCHEDULE_SUBSECTION: &str = "pw-weekly-schedule";
pub const CAROUSEL_AUTOPLAY_MS: u64 = 5000;
pub const EMPTY_GALLERY_TITLE: &str = "Nothing to display yet.";
pub const EMPTY_GALLERY_DESCRIPTION: &str = "Check back soon for photos from upcoming events!";

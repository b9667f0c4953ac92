use crate::constants::{
    DEFAULT_MEMBER_IMAGE, DEFAULT_MEMBER_NAME, DEFAULT_MEMBER_STATEMENT, PORTRAIT_PROXY_FORMAT,
};
use crate::fetcher::ContentSource;
use crate::gallery::proxy_url;
use crate::sheet::{parse_csv, CsvRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Committee member as shown on the "Meet The Members" panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub name: String,
    pub nickname: Option<String>,
    pub subteam: Option<String>,
    pub years: Vec<String>,
    pub statement: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    /// Browser-displayable portrait URL
    pub image: String,
    /// Image URL exactly as submitted on the form
    pub image_url: Option<String>,
    pub graduating_semester: Option<String>,
    pub is_co_chair: bool,
    pub co_chair_years: Vec<String>,
}

fn field<'a>(record: &'a CsvRecord, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Split a multi-valued answer such as `2024, 2025` or `2024;2025`
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

impl Member {
    pub fn from_record(record: &CsvRecord) -> Self {
        let submitted_image = field(record, "image_url");
        let image = submitted_image
            .or_else(|| field(record, "image"))
            .or_else(|| field(record, "display_image"))
            .map(displayable_image_url)
            .unwrap_or_else(|| DEFAULT_MEMBER_IMAGE.to_string());

        Self {
            name: field(record, "full_name")
                .or_else(|| field(record, "name"))
                .unwrap_or(DEFAULT_MEMBER_NAME)
                .to_string(),
            nickname: field(record, "nickname").map(str::to_string),
            subteam: field(record, "subteam").map(str::to_string),
            years: split_list(field(record, "years")),
            statement: field(record, "pw_statement")
                .unwrap_or(DEFAULT_MEMBER_STATEMENT)
                .to_string(),
            github: field(record, "github")
                .or_else(|| field(record, "github_profile_link"))
                .map(str::to_string),
            linkedin: field(record, "linkedin")
                .or_else(|| field(record, "linkedin_profile_link"))
                .map(str::to_string),
            image,
            image_url: submitted_image.map(str::to_string),
            graduating_semester: field(record, "graduating_semester").map(str::to_string),
            is_co_chair: field(record, "is_co_chair")
                .is_some_and(|v| v.to_lowercase().contains("yes")),
            co_chair_years: split_list(field(record, "co_chair_years")),
        }
    }
}

fn drive_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"drive\.google\.com/open\?id=([^&]+)").unwrap())
}

fn drive_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"drive\.google\.com/file/d/([^/]+)").unwrap())
}

/// Rewrite share links into direct image links a browser can render.
///
/// Google Drive `open?id=` and `file/d/` links become `uc?export=view`
/// links; HEIC images are routed through the conversion proxy.
pub fn displayable_image_url(url: &str) -> String {
    let drive_id = drive_open_re()
        .captures(url)
        .or_else(|| drive_file_re().captures(url))
        .map(|caps| caps[1].to_string());

    let url = match drive_id {
        Some(id) => format!("https://drive.google.com/uc?export=view&id={}", id),
        None => url.to_string(),
    };

    if url.to_lowercase().contains(".heic") {
        proxy_url(&url, PORTRAIT_PROXY_FORMAT)
    } else {
        url
    }
}

/// Parse roster CSV into members, dropping rows that repeat the form prompt
pub fn members_from_csv(text: &str) -> Vec<Member> {
    parse_csv(text)
        .iter()
        .map(Member::from_record)
        .filter(|m| !m.name.eq_ignore_ascii_case("full name"))
        .collect()
}

/// Fetch and parse the roster. Any failure yields an empty list.
pub async fn fetch_members<S: ContentSource>(source: &S) -> Vec<Member> {
    match source.fetch_member_csv().await {
        Ok(text) => {
            let members = members_from_csv(&text);
            log::info!("Loaded {} members from sheet", members.len());
            members
        }
        Err(e) => {
            log::error!("Error fetching members from sheet: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
Timestamp,Full Name,Nickname,Committee Sub-Teams,Years in IEEE P&W,Graduating Semester,PW Statement,GitHub,LinkedIn,Image URL,Co-Chair?,Years of Co-Chair
1/2/2026,Ada Lovelace,Ada,Firmware,\"2025, 2026\",Spring 2027,I like engines,https://github.com/ada,,https://drive.google.com/open?id=abc123&usp=sharing,Yes,2026
1/3/2026,Alan Turing,,,2026,,,,https://linkedin.com/in/alan,https://example.com/alan.HEIC,No,
,Full Name,,,,,,,,,,
";

    #[test]
    fn test_members_from_csv() {
        let members = members_from_csv(ROSTER);
        assert_eq!(members.len(), 2);

        let ada = &members[0];
        assert_eq!(ada.name, "Ada Lovelace");
        assert_eq!(ada.nickname.as_deref(), Some("Ada"));
        assert_eq!(ada.subteam.as_deref(), Some("Firmware"));
        assert_eq!(ada.years, vec!["2025", "2026"]);
        assert_eq!(ada.graduating_semester.as_deref(), Some("Spring 2027"));
        assert_eq!(ada.statement, "I like engines");
        assert_eq!(ada.github.as_deref(), Some("https://github.com/ada"));
        assert_eq!(ada.linkedin, None);
        assert_eq!(ada.image, "https://drive.google.com/uc?export=view&id=abc123");
        assert_eq!(
            ada.image_url.as_deref(),
            Some("https://drive.google.com/open?id=abc123&usp=sharing")
        );
        assert!(ada.is_co_chair);
        assert_eq!(ada.co_chair_years, vec!["2026"]);
    }

    #[test]
    fn test_member_defaults() {
        let members = members_from_csv(ROSTER);
        let alan = &members[1];
        assert_eq!(alan.nickname, None);
        assert_eq!(alan.statement, DEFAULT_MEMBER_STATEMENT);
        assert!(!alan.is_co_chair);
        assert!(alan.co_chair_years.is_empty());
        assert!(alan.image.starts_with("https://images.weserv.nl/?url="));
        assert!(alan.image.ends_with("&output=webp"));
    }

    #[test]
    fn test_missing_name_and_image() {
        let record: CsvRecord = [("nickname".to_string(), "Zed".to_string())]
            .into_iter()
            .collect();
        let member = Member::from_record(&record);
        assert_eq!(member.name, DEFAULT_MEMBER_NAME);
        assert_eq!(member.image, DEFAULT_MEMBER_IMAGE);
        assert_eq!(member.image_url, None);
    }

    #[test]
    fn test_drive_file_link() {
        assert_eq!(
            displayable_image_url("https://drive.google.com/file/d/XYZ_9/view?usp=drive_link"),
            "https://drive.google.com/uc?export=view&id=XYZ_9"
        );
        assert_eq!(
            displayable_image_url("https://example.com/me.png"),
            "https://example.com/me.png"
        );
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("2024; 2025,\n2026, ")), vec!["2024", "2025", "2026"]);
        assert!(split_list(None).is_empty());
    }
}

use crate::error::{Error, Result};
use crate::models::SiteData;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Data table shipped with the binary
const BUILTIN_SITE_DATA: &str = include_str!("../data/site.toml");

/// Load the page data table from `path`, or the built-in table when no path
/// is given. TOML and YAML files are accepted, picked by extension.
pub fn load_site_data(path: Option<&Path>) -> Result<SiteData> {
    let data = match path {
        None => parse_toml(BUILTIN_SITE_DATA)?,
        Some(path) => {
            let content = fs::read_to_string(path)?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => parse_toml(&content)?,
                Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
                _ => {
                    return Err(Error::Config(format!(
                        "unsupported data table format: {}",
                        path.display()
                    )))
                }
            }
        }
    };
    validate(data)
}

fn parse_toml(content: &str) -> Result<SiteData> {
    Ok(toml::from_str(content)?)
}

/// Subsection ids must be unique: each enrichment writes into exactly one
/// subsection, found by id.
fn validate(data: SiteData) -> Result<SiteData> {
    let mut seen = HashSet::new();
    for sub in &data.subsections {
        if sub.id.is_empty() {
            return Err(Error::Config(format!(
                "subsection '{}' has no id",
                sub.title
            )));
        }
        if !seen.insert(sub.id.as_str()) {
            return Err(Error::Config(format!("duplicate subsection id '{}'", sub.id)));
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEMBERS_SUBSECTION;

    #[test]
    fn test_builtin_table() {
        let data = load_site_data(None).unwrap();
        assert_eq!(data.workshops.len(), 2);
        assert_eq!(data.get_involved.len(), 4);
        assert!(data.subsection(MEMBERS_SUBSECTION).is_some());
        assert_eq!(
            data.subsection("upcoming-workshops").unwrap().workshops.len(),
            5
        );
        let cco = data.subsection("chill-cook-off").unwrap();
        assert!(cco.edition_groups.as_ref().unwrap().this_year.is_some());
        assert_eq!(data.parent_section("micromouse"), Some("projects"));
    }

    #[test]
    fn test_yaml_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.yaml");
        fs::write(
            &path,
            "workshops:\n  - id: past-workshops\n    name: Past Workshops\n    description: Old ones\n\
             subsections:\n  - id: past-workshops\n    title: Past Workshops\n",
        )
        .unwrap();
        let data = load_site_data(Some(&path)).unwrap();
        assert_eq!(data.workshops[0].name, "Past Workshops");
        assert_eq!(data.subsections.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = parse_toml(
            "[[subsections]]\nid = \"a\"\ntitle = \"A\"\n[[subsections]]\nid = \"a\"\ntitle = \"B\"\n",
        )
        .and_then(validate)
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.csv");
        fs::write(&path, "").unwrap();
        assert!(matches!(load_site_data(Some(&path)), Err(Error::Config(_))));
    }
}

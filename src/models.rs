use crate::gallery::GalleryItem;
use crate::members::Member;
use serde::{Deserialize, Serialize};

// ============================================================================
// Data Table
// ============================================================================

/// Everything the page renders. Loaded once from the data table, then
/// replaced wholesale by enrichment snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    pub workshops: Vec<Card>,
    pub projects: Vec<Card>,
    pub committee: Vec<Card>,
    pub get_involved: Vec<InvolvementCard>,
    pub subsections: Vec<Subsection>,
}

impl SiteData {
    pub fn subsection(&self, id: &str) -> Option<&Subsection> {
        self.subsections.iter().find(|s| s.id == id)
    }

    /// Top-level section that links to a subsection, if any
    pub fn parent_section(&self, subsection_id: &str) -> Option<&'static str> {
        let in_cards = |cards: &[Card]| cards.iter().any(|c| c.id == subsection_id);
        if in_cards(&self.workshops) {
            Some("workshops")
        } else if in_cards(&self.projects) {
            Some("projects")
        } else if in_cards(&self.committee) {
            Some("committee")
        } else if self.get_involved.iter().any(|c| c.id == subsection_id) {
            Some("get-involved")
        } else {
            None
        }
    }
}

/// Clickable card in the workshops, projects, or committee lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub picture: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvolvementCard {
    pub id: String,
    pub title: String,
    pub picture: Option<String>,
    pub description: String,
    pub link: String,
    pub link_text: String,
}

/// Detail panel shown when a card is opened.
///
/// `description` is trusted HTML from the data table; everything else that
/// ends up in markup is escaped by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subsection {
    pub id: String,
    pub title: String,
    pub picture: Option<String>,
    pub description: String,
    pub workshops: Vec<WorkshopEntry>,
    pub members: Vec<Member>,
    pub edition_groups: Option<EditionGroups>,
    pub form_url: Option<String>,
    pub gallery: Option<Gallery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopEntry {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub picture: Option<String>,
    pub description: String,
}

/// "This year" and "past" editions of a recurring event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditionGroups {
    pub this_year: Option<Edition>,
    pub past: Vec<Edition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edition {
    pub id: String,
    pub year: Option<String>,
    pub date: Option<String>,
    pub title: String,
    pub picture: Option<String>,
    pub description: String,
}

// ============================================================================
// Gallery
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    /// Topic prefix the images were matched against
    pub topic: String,
    pub items: Vec<GalleryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GalleryEntry {
    Image {
        id: String,
        title: String,
        item: GalleryItem,
    },
    Placeholder {
        title: String,
        description: String,
    },
}

impl Gallery {
    /// Build a subsection gallery from matched items. An empty match list
    /// becomes a single placeholder entry.
    pub fn from_items(subsection_id: &str, topic: &str, items: &[GalleryItem]) -> Self {
        let entries = if items.is_empty() {
            vec![GalleryEntry::Placeholder {
                title: crate::constants::EMPTY_GALLERY_TITLE.to_string(),
                description: crate::constants::EMPTY_GALLERY_DESCRIPTION.to_string(),
            }]
        } else {
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| GalleryEntry::Image {
                    id: format!("gallery-{}-{}", subsection_id, idx),
                    title: item.stem().to_string(),
                    item: item.clone(),
                })
                .collect()
        };

        Self {
            topic: topic.to_string(),
            items: entries,
        }
    }

    /// Displayable images, skipping placeholders
    pub fn images(&self) -> impl Iterator<Item = (&str, &GalleryItem)> {
        self.items.iter().filter_map(|entry| match entry {
            GalleryEntry::Image { id, item, .. } => Some((id.as_str(), item)),
            GalleryEntry::Placeholder { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> GalleryItem {
        GalleryItem {
            filename: name.to_string(),
            raw_url: format!("https://raw.example/{name}"),
            display_url: format!("https://raw.example/{name}"),
            ext: "jpg".to_string(),
        }
    }

    #[test]
    fn test_empty_gallery_is_placeholder() {
        let gallery = Gallery::from_items("micromouse", "mm", &[]);
        assert_eq!(gallery.items.len(), 1);
        assert!(matches!(gallery.items[0], GalleryEntry::Placeholder { .. }));
        assert_eq!(gallery.images().count(), 0);
    }

    #[test]
    fn test_gallery_entry_ids_and_titles() {
        let gallery = Gallery::from_items("micromouse", "mm", &[item("mm-s26-1.jpg"), item("mm-s26-2.jpg")]);
        let ids: Vec<_> = gallery.images().map(|(id, _)| id.to_string()).collect();
        assert_eq!(ids, vec!["gallery-micromouse-0", "gallery-micromouse-1"]);
        match &gallery.items[1] {
            GalleryEntry::Image { title, .. } => assert_eq!(title, "mm-s26-2"),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_parent_section() {
        let data = SiteData {
            projects: vec![Card {
                id: "battlebots".into(),
                ..Default::default()
            }],
            get_involved: vec![InvolvementCard {
                id: "contact-info".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(data.parent_section("battlebots"), Some("projects"));
        assert_eq!(data.parent_section("contact-info"), Some("get-involved"));
        assert_eq!(data.parent_section("nope"), None);
    }
}

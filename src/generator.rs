use crate::constants::{
    section_for_prefix, CAROUSEL_AUTOPLAY_MS, EMPTY_GALLERY_TITLE, SCHEDULE_SUBSECTION,
    SECTION_TOPICS,
};
use crate::error::Result;
use crate::members::Member;
use crate::models::{Card, Edition, EditionGroups, InvolvementCard, SiteData, Subsection};
use std::fs;
use std::path::Path;

/// Values the renderer needs that do not come from the data table
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Four-digit year used to pick the default member year filter
    pub current_year: String,
    pub semester_label: String,
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn image_tag(src: Option<&str>, alt: &str, class: &str) -> String {
    match src {
        Some(src) if !src.is_empty() => format!(
            r#"<img src="{}" alt="{}" class="{}" loading="lazy">"#,
            escape_html(src),
            escape_html(alt),
            class
        ),
        _ => String::new(),
    }
}

// ============================================================================
// Page Generation
// ============================================================================

/// Render the complete page for one data-table snapshot
pub fn render_page(data: &SiteData, ctx: &PageContext) -> String {
    let body = [
        render_carousel(),
        render_card_section("workshops", "Workshops", &data.workshops, false),
        render_card_section("projects", "Projects", &data.projects, true),
        render_card_section("committee", "Committee", &data.committee, true),
        render_get_involved(&data.get_involved),
        render_subsections(data, ctx),
        render_gallery(data),
    ]
    .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="generator" content="pw-page {version}">
<meta name="semester" content="{semester}">
<title>Projects &amp; Workshops</title>
<link rel="stylesheet" href="css/styles.css">
</head>
<body>
{body}
</body>
</html>
"#,
        version = env!("CARGO_PKG_VERSION"),
        semester = escape_html(&ctx.semester_label),
        body = body
    )
}

/// Write a rendered page, creating parent directories as needed
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}

/// Hero carousel: one slide per top-level section. Slide `i` maps to the
/// `i`-th section button.
fn render_carousel() -> String {
    let mut lines = vec![format!(
        r#"<header class="carousel" data-autoplay-ms="{}">"#,
        CAROUSEL_AUTOPLAY_MS
    )];

    for (idx, (section, title, _)) in SECTION_TOPICS.iter().enumerate() {
        let active = if idx == 0 { " active" } else { "" };
        lines.push(format!(
            r#"  <div class="carousel-slide{}" data-section="{}"><h2>{}</h2></div>"#,
            active, section, title
        ));
    }

    lines.push(r#"  <button id="carousel-prev" class="carousel-control">&#8249;</button>"#.to_string());
    lines.push(r#"  <button id="carousel-next" class="carousel-control">&#8250;</button>"#.to_string());

    lines.push(r#"  <div class="carousel-indicators">"#.to_string());
    for idx in 0..SECTION_TOPICS.len() {
        let active = if idx == 0 { " active" } else { "" };
        lines.push(format!(
            r#"    <span class="indicator{}" data-slide="{}"></span>"#,
            active, idx
        ));
    }
    lines.push("  </div>".to_string());

    lines.push(r#"  <nav class="section-nav">"#.to_string());
    for (idx, (section, title, _)) in SECTION_TOPICS.iter().enumerate() {
        let active = if idx == 0 { " active" } else { "" };
        lines.push(format!(
            r#"    <button class="section-btn{}" data-section="{}">{}</button>"#,
            active, section, title
        ));
    }
    lines.push("  </nav>".to_string());
    lines.push("</header>".to_string());

    lines.join("\n")
}

fn render_card_section(id: &str, title: &str, cards: &[Card], with_pictures: bool) -> String {
    let active = if id == "workshops" { " active-section" } else { "" };
    let items: Vec<String> = cards
        .iter()
        .map(|card| {
            let picture = if with_pictures {
                image_tag(card.picture.as_deref(), &card.name, "card-image")
            } else {
                String::new()
            };
            format!(
                r#"    <div class="item-card" data-section="{}">{}<h4>{}</h4><p>{}</p></div>"#,
                escape_html(&card.id),
                picture,
                escape_html(&card.name),
                card.description
            )
        })
        .collect();

    format!(
        "<section id=\"{id}\" class=\"content-section{active}\">\n  <h2>{title}</h2>\n  <div id=\"{id}-list\" class=\"item-list\">\n{}\n  </div>\n</section>",
        items.join("\n")
    )
}

fn render_get_involved(items: &[InvolvementCard]) -> String {
    let cards: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                r#"    <div class="involvement-card" data-section="{}">{}<h3>{}</h3><p>{}</p><a href="{}" class="card-link">{}</a></div>"#,
                escape_html(&item.id),
                image_tag(item.picture.as_deref(), &item.title, "card-image"),
                escape_html(&item.title),
                item.description,
                escape_html(&item.link),
                escape_html(&item.link_text)
            )
        })
        .collect();

    format!(
        "<section id=\"get-involved\" class=\"content-section\">\n  <h2>Get Involved</h2>\n  <div id=\"get-involved-grid\" class=\"involvement-grid\">\n{}\n  </div>\n</section>",
        cards.join("\n")
    )
}

// ============================================================================
// Subsections
// ============================================================================

fn render_subsections(data: &SiteData, ctx: &PageContext) -> String {
    let rendered: Vec<String> = data
        .subsections
        .iter()
        .map(|sub| render_subsection(sub, data.parent_section(&sub.id), ctx))
        .collect();
    format!(
        "<div id=\"subsections-container\">\n{}\n</div>",
        rendered.join("\n")
    )
}

/// One detail panel. `parent` is the top-level section whose card opens it.
pub fn render_subsection(sub: &Subsection, parent: Option<&str>, ctx: &PageContext) -> String {
    let mut parts = Vec::new();

    // Weekly schedule puts the tall flyer beside the text
    if sub.id == SCHEDULE_SUBSECTION && sub.picture.is_some() {
        parts.push(format!(
            "<div class=\"subsection-side-by-side\"><div class=\"subsection-image-wrap\">{}</div><div class=\"subsection-side-content\"><h3>{}</h3><p>{}</p></div></div>",
            image_tag(
                sub.picture.as_deref(),
                &sub.title,
                "subsection-image subsection-image-vertical"
            ),
            escape_html(&sub.title),
            sub.description
        ));
    } else {
        if sub.id != SCHEDULE_SUBSECTION {
            parts.push(image_tag(sub.picture.as_deref(), &sub.title, "subsection-image"));
        }
        parts.push(format!("<h3>{}</h3>", escape_html(&sub.title)));
        parts.push(format!("<p>{}</p>", sub.description));
    }

    if !sub.workshops.is_empty() {
        parts.push(render_workshop_grid(sub));
    }
    if let Some(groups) = &sub.edition_groups {
        parts.push(render_edition_groups(&sub.id, groups));
    }
    if !sub.members.is_empty() {
        parts.push(render_members(&sub.members, &ctx.current_year));
    }
    if let Some(url) = sub.form_url.as_deref().filter(|u| !u.is_empty()) {
        parts.push(render_form_embed(url, &sub.title));
    }

    let body: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    let parent_attr = parent
        .map(|p| format!(" data-parent=\"{}\"", p))
        .unwrap_or_default();
    format!(
        "<section id=\"{}\" class=\"subsection-item\"{}>\n  {}\n</section>",
        escape_html(&sub.id),
        parent_attr,
        body.join("\n  ")
    )
}

fn render_workshop_grid(sub: &Subsection) -> String {
    let cards: Vec<String> = sub
        .workshops
        .iter()
        .map(|w| {
            format!(
                r#"<article class="workshop-card" id="{}" data-section="{}">{}<div class="workshop-body"><h4 class="workshop-title">{}</h4><p class="workshop-date">{}</p><p class="workshop-desc">{}</p></div></article>"#,
                escape_html(&w.id),
                escape_html(&sub.id),
                image_tag(w.picture.as_deref(), &w.title, "workshop-image"),
                escape_html(&w.title),
                escape_html(w.date.as_deref().unwrap_or("")),
                w.description
            )
        })
        .collect();
    format!("<div class=\"workshop-grid\">{}</div>", cards.join(""))
}

fn render_edition_card(edition: &Edition) -> String {
    let when = edition
        .year
        .as_deref()
        .or(edition.date.as_deref())
        .unwrap_or("");
    format!(
        r#"<article class="edition-card">{}<div class="workshop-body"><h4 class="workshop-title">{}</h4><p class="workshop-date">{}</p><p class="workshop-desc">{}</p></div></article>"#,
        image_tag(edition.picture.as_deref(), &edition.title, "workshop-image"),
        escape_html(&edition.title),
        escape_html(when),
        edition.description
    )
}

fn render_edition_groups(subsection_id: &str, groups: &EditionGroups) -> String {
    let id = escape_html(subsection_id);
    let this_year = groups
        .this_year
        .as_ref()
        .map(render_edition_card)
        .unwrap_or_else(|| "<p>No current edition available.</p>".to_string());
    let past = if groups.past.is_empty() {
        "<p>No projects available</p>".to_string()
    } else {
        groups.past.iter().map(render_edition_card).collect::<Vec<_>>().join("")
    };

    format!(
        r#"<div class="edition-block"><div class="edition-tabs"><button class="edition-btn active" data-target="this-year-{id}">This Year</button><button class="edition-btn" data-target="past-{id}">Past</button></div><div class="edition-contents"><div class="edition-content" data-edition="this-year-{id}">{this_year}</div><div class="edition-content hidden" data-edition="past-{id}">{past}</div></div></div>"#
    )
}

/// Embed a form. Short `forms.gle` links often refuse to load in a frame,
/// so they also get an open-in-new-tab fallback.
fn render_form_embed(url: &str, title: &str) -> String {
    if url.contains("forms.gle") {
        let url = escape_html(url);
        return format!(
            r#"<div class="form-embed"><iframe src="{url}" title="{}" frameborder="0" loading="lazy"></iframe><div class="form-embed-fallback text-center mt-1">If the form does not display, <a href="{url}" target="_blank" rel="noopener">open it in a new tab</a>.</div></div>"#,
            escape_html(title)
        );
    }

    format!(
        r#"<div class="form-embed"><iframe src="{}" title="{}" frameborder="0" loading="lazy"></iframe></div>"#,
        escape_html(&embeddable_form_url(url)),
        escape_html(title)
    )
}

/// Append `embedded=true` to Google Forms links that lack it
pub fn embeddable_form_url(url: &str) -> String {
    if url.contains("docs.google.com/forms") && !url.contains("embedded=true") {
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{}{}embedded=true", url, sep)
    } else {
        url.to_string()
    }
}

// ============================================================================
// Members
// ============================================================================

/// Years offered by the member filter, newest first
pub fn member_years(members: &[Member]) -> Vec<String> {
    let mut years: Vec<String> = members.iter().flat_map(|m| m.years.iter().cloned()).collect();
    years.sort();
    years.dedup();
    years.reverse();
    years
}

/// Filter year selected on load: the current year when present, else the newest
pub fn default_member_year<'a>(years: &'a [String], current_year: &str) -> Option<&'a str> {
    years
        .iter()
        .find(|y| *y == current_year)
        .or_else(|| years.first())
        .map(String::as_str)
}

fn render_members(members: &[Member], current_year: &str) -> String {
    let years = member_years(members);
    let default_year = default_member_year(&years, current_year);

    let filter = if years.len() > 1 {
        let buttons: Vec<String> = years
            .iter()
            .map(|y| {
                let active = if Some(y.as_str()) == default_year { " active" } else { "" };
                format!(
                    r#"<button class="year-filter-btn{}" data-year="{}">{}</button>"#,
                    active,
                    escape_html(y),
                    escape_html(y)
                )
            })
            .collect();
        format!(
            r#"<div class="members-year-filter"><label>Filter by year:</label><div class="year-filter-buttons">{}</div></div>"#,
            buttons.join("")
        )
    } else {
        String::new()
    };

    let (co_chairs, regular): (Vec<&Member>, Vec<&Member>) =
        members.iter().partition(|m| m.is_co_chair);

    let regular_cards: Vec<String> = regular.iter().map(|m| render_member_card(m, false)).collect();
    let mut html = format!(
        r#"<div class="members-section">{}<div class="members-grid" data-member-type="regular">{}</div>"#,
        filter,
        regular_cards.join("")
    );

    if !co_chairs.is_empty() {
        let cards: Vec<String> = co_chairs.iter().map(|m| render_member_card(m, true)).collect();
        html.push_str(&format!(
            r#"<div class="co-chairs-section"><h3>Co-Chairs</h3><div class="co-chairs-grid">{}</div></div>"#,
            cards.join("")
        ));
    }
    html.push_str("</div>");
    html
}

fn render_member_card(member: &Member, as_co_chair: bool) -> String {
    let name = escape_html(&member.name);
    let optional = |class: &str, value: &Option<String>, label: &str| match value {
        Some(v) => format!(r#"<p class="{}">{}{}</p>"#, class, label, escape_html(v)),
        None => String::new(),
    };

    let (card_class, years) = if as_co_chair {
        ("co-chair-card", &member.co_chair_years)
    } else {
        ("member-card", &member.years)
    };

    let mut info = vec![
        format!(r#"<h4 class="member-name">{}</h4>"#, name),
        optional("member-nickname", &member.nickname, ""),
        optional("member-subteam", &member.subteam, ""),
        optional("member-grad", &member.graduating_semester, "Graduating: "),
    ];
    if as_co_chair {
        info.push(format!(
            r#"<p class="co-chair-years">Co-Chair: {}</p>"#,
            escape_html(&member.co_chair_years.join(", "))
        ));
    }
    if !member.statement.is_empty() {
        info.push(format!(
            r#"<p class="member-statement">{}</p>"#,
            escape_html(&member.statement)
        ));
    }
    if let Some(url) = &member.image_url {
        info.push(format!(
            r#"<div class="member-image-url">{}</div>"#,
            image_tag(
                Some(url.as_str()),
                &format!("{} image url", member.name),
                "member-image-alt"
            )
        ));
    }

    let mut links = Vec::new();
    if let Some(github) = &member.github {
        links.push(format!(
            r#"<a href="{}" target="_blank" rel="noopener" title="GitHub">GitHub</a>"#,
            escape_html(github)
        ));
    }
    if let Some(linkedin) = &member.linkedin {
        links.push(format!(
            r#"<a href="{}" target="_blank" rel="noopener" title="LinkedIn">LinkedIn</a>"#,
            escape_html(linkedin)
        ));
    }
    info.push(format!(r#"<div class="member-links">{}</div>"#, links.join("")));

    format!(
        r#"<div class="{}" data-years="{}">{}<div class="member-info">{}</div></div>"#,
        card_class,
        escape_html(&years.join(",")),
        image_tag(Some(member.image.as_str()), &member.name, "member-image"),
        info.concat()
    )
}

// ============================================================================
// Gallery
// ============================================================================

/// Global gallery: every subsection's images in one grid, each tagged with
/// the top-level section its topic belongs to.
pub fn render_gallery(data: &SiteData) -> String {
    let images: Vec<String> = data
        .subsections
        .iter()
        .filter_map(|sub| sub.gallery.as_ref())
        .flat_map(|gallery| {
            let section = section_for_prefix(&gallery.topic).unwrap_or("");
            gallery.images().map(move |(id, item)| {
                format!(
                    r#"<img class="gallery-img" data-id="{}" data-section="{}" data-raw="{}" src="{}" loading="lazy" alt="{}">"#,
                    escape_html(id),
                    section,
                    escape_html(&item.raw_url),
                    escape_html(&item.display_url),
                    escape_html(item.stem())
                )
            })
        })
        .collect();

    let inner = if images.is_empty() {
        format!(r#"<p class="text-center">{}</p>"#, EMPTY_GALLERY_TITLE)
    } else {
        format!(
            r#"<div class="gallery-heading">Gallery</div><div class="gallery-grid simple">{}</div>"#,
            images.join("\n")
        )
    };

    format!(
        r#"<div id="gallery-container"><div class="gallery-container">{}</div></div>"#,
        inner
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::GalleryItem;
    use crate::models::Gallery;

    fn ctx() -> PageContext {
        PageContext {
            current_year: "2026".to_string(),
            semester_label: "f26".to_string(),
        }
    }

    fn member(name: &str, years: &[&str], co_chair: bool) -> Member {
        Member {
            name: name.to_string(),
            years: years.iter().map(|y| y.to_string()).collect(),
            statement: "hi".to_string(),
            image: "https://example.com/p.png".to_string(),
            is_co_chair: co_chair,
            co_chair_years: if co_chair { vec!["2026".into()] } else { Vec::new() },
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#39;Neil &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn test_embeddable_form_url() {
        assert_eq!(
            embeddable_form_url("https://docs.google.com/forms/d/e/abc/viewform"),
            "https://docs.google.com/forms/d/e/abc/viewform?embedded=true"
        );
        assert_eq!(
            embeddable_form_url("https://docs.google.com/forms/d/e/abc/viewform?usp=sf_link"),
            "https://docs.google.com/forms/d/e/abc/viewform?usp=sf_link&embedded=true"
        );
        assert_eq!(
            embeddable_form_url("https://forms.gle/short"),
            "https://forms.gle/short"
        );
    }

    #[test]
    fn test_member_years_and_default() {
        let members = vec![member("a", &["2025", "2026"], false), member("b", &["2024"], false)];
        let years = member_years(&members);
        assert_eq!(years, vec!["2026", "2025", "2024"]);
        assert_eq!(default_member_year(&years, "2026"), Some("2026"));
        assert_eq!(default_member_year(&years, "2030"), Some("2026"));
        assert_eq!(default_member_year(&[], "2026"), None);
    }

    #[test]
    fn test_members_split_co_chairs() {
        let html = render_members(
            &[member("Ada", &["2026"], true), member("<Bob>", &["2025"], false)],
            "2026",
        );
        assert!(html.contains("year-filter-btn active\" data-year=\"2026\""));
        assert!(html.contains("&lt;Bob&gt;"));
        let grid = html.find("members-grid").unwrap();
        let chairs = html.find("co-chairs-section").unwrap();
        assert!(grid < chairs);
        assert!(html[chairs..].contains("Ada"));
        assert!(html.contains("Co-Chair: 2026"));
    }

    #[test]
    fn test_submitted_image_link_on_both_card_kinds() {
        let mut chair = member("Ada", &["2026"], true);
        chair.image_url = Some("https://drive.google.com/open?id=A1".to_string());
        let mut plain = member("Bob", &["2026"], false);
        plain.statement.clear();

        let html = render_members(&[chair.clone(), plain], "2026");
        let chairs = html.find("co-chairs-section").unwrap();
        assert!(html[chairs..].contains(r#"<div class="member-image-url">"#));
        assert!(html[chairs..].contains(r#"alt="Ada image url""#));
        assert!(!html[..chairs].contains("member-image-url"));
        assert!(!html[..chairs].contains("member-statement"));

        let card = render_member_card(&chair, false);
        assert!(card.contains(r#"class="member-image-alt""#));
        assert!(card.contains("https://drive.google.com/open?id=A1"));
    }

    #[test]
    fn test_single_year_has_no_filter() {
        let html = render_members(&[member("Ada", &["2026"], false)], "2026");
        assert!(!html.contains("members-year-filter"));
    }

    #[test]
    fn test_empty_gallery_placeholder() {
        let html = render_gallery(&SiteData::default());
        assert!(html.contains(EMPTY_GALLERY_TITLE));
        assert!(!html.contains("gallery-img"));
    }

    #[test]
    fn test_gallery_tags_sections() {
        let item = GalleryItem {
            filename: "mm-s26-1.heic".into(),
            raw_url: "https://raw.example/mm-s26-1.heic".into(),
            display_url: "https://proxy.example/?url=x&output=jpeg".into(),
            ext: "heic".into(),
        };
        let data = SiteData {
            subsections: vec![Subsection {
                id: "micromouse".into(),
                gallery: Some(Gallery::from_items("micromouse", "mm", &[item])),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render_gallery(&data);
        assert!(html.contains(r#"data-section="projects""#));
        assert!(html.contains(r#"data-raw="https://raw.example/mm-s26-1.heic""#));
        assert!(html.contains(r#"src="https://proxy.example/?url=x&amp;output=jpeg""#));
    }

    #[test]
    fn test_schedule_side_by_side() {
        let sub = Subsection {
            id: SCHEDULE_SUBSECTION.into(),
            title: "Schedule".into(),
            picture: Some("https://example.com/flyer.png".into()),
            description: "Weekly".into(),
            ..Default::default()
        };
        let html = render_subsection(&sub, Some("get-involved"), &ctx());
        assert!(html.contains("subsection-side-by-side"));
        assert_eq!(html.matches("<h3>").count(), 1);
        assert!(html.contains(r#"data-parent="get-involved""#));
    }

    #[test]
    fn test_edition_groups_without_past() {
        let groups = EditionGroups {
            this_year: None,
            past: Vec::new(),
        };
        let html = render_edition_groups("cco", &groups);
        assert!(html.contains("No current edition available."));
        assert!(html.contains("No projects available"));
    }

    #[test]
    fn test_render_page_is_complete() {
        let data = crate::loader::load_site_data(None).unwrap();
        let html = render_page(&data, &ctx());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"data-autoplay-ms="5000""#));
        assert!(html.contains(r#"<section id="micromouse" class="subsection-item" data-parent="projects">"#));
        assert!(html.contains("forms.gle/hvs63LwkjzV9FWDK7"));
        assert!(html.contains(EMPTY_GALLERY_TITLE));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_write_page_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/index.html");
        write_page(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}

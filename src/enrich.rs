//! Network enrichment of the data table.
//!
//! Every topic gallery and the member roster is fetched as its own future.
//! Results are folded into fresh [`SiteData`] snapshots in completion order
//! and each new snapshot is handed to a callback, so callers can re-render
//! whenever data arrives instead of racing the renderer.

use crate::config::SiteSettings;
use crate::constants::MEMBERS_SUBSECTION;
use crate::fetcher::ContentSource;
use crate::gallery::{fetch_gallery_images, GalleryItem};
use crate::members::{fetch_members, Member};
use crate::models::{Gallery, SiteData};
use crate::semester::Semester;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};

/// Result of one completed fetch. Each variant owns a distinct key of the
/// data table.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Gallery {
        subsection_id: String,
        topic: String,
        items: Vec<GalleryItem>,
    },
    Members(Vec<Member>),
}

impl SiteData {
    /// New snapshot with one enrichment applied; `self` is left untouched.
    /// Updates for subsections missing from the table are dropped.
    pub fn apply(&self, update: &Enrichment) -> SiteData {
        let mut next = self.clone();
        match update {
            Enrichment::Gallery {
                subsection_id,
                topic,
                items,
            } => {
                if let Some(sub) = next.subsections.iter_mut().find(|s| &s.id == subsection_id) {
                    sub.gallery = Some(Gallery::from_items(subsection_id, topic, items));
                }
            }
            Enrichment::Members(members) => {
                if let Some(sub) = next
                    .subsections
                    .iter_mut()
                    .find(|s| s.id == MEMBERS_SUBSECTION)
                {
                    sub.members = members.clone();
                }
            }
        }
        next
    }
}

/// Fetch galleries for every configured topic plus the member roster.
///
/// `on_update` runs once per completed fetch with the latest snapshot.
/// Returns the fully enriched snapshot.
pub async fn enrich_site<S, F>(
    snapshot: SiteData,
    source: &S,
    settings: &SiteSettings,
    (current, past): (Semester, Semester),
    mut on_update: F,
) -> SiteData
where
    S: ContentSource,
    F: FnMut(&SiteData),
{
    let mut pending: FuturesUnordered<LocalBoxFuture<'_, Enrichment>> = FuturesUnordered::new();

    for topic in &settings.topics {
        if snapshot.subsection(&topic.subsection).is_none() {
            log::warn!(
                "No subsection '{}' for topic '{}', skipping",
                topic.subsection,
                topic.prefix
            );
            continue;
        }
        pending.push(
            async move {
                let items =
                    fetch_gallery_images(source, &topic.prefix, current, past, settings).await;
                Enrichment::Gallery {
                    subsection_id: topic.subsection.clone(),
                    topic: topic.prefix.clone(),
                    items,
                }
            }
            .boxed_local(),
        );
    }

    if snapshot.subsection(MEMBERS_SUBSECTION).is_some() {
        pending.push(async move { Enrichment::Members(fetch_members(source).await) }.boxed_local());
    }

    let mut latest = snapshot;
    while let Some(update) = pending.next().await {
        latest = latest.apply(&update);
        on_update(&latest);
    }

    log::info!("Enrichment finished");
    latest
}

// Plex library endpoints
//
// Section listing, title lookups, on-deck and episode listings, and
// play-queue creation.

use tracing::debug;

use super::client::PlexClient;
use super::models::{LibrarySection, Metadata, MetadataContainer, PlayQueue, SectionContainer};
use crate::error::Error;

impl PlexClient {
    /// List all library sections.
    ///
    /// `GET /library/sections`
    pub async fn sections(&self) -> Result<Vec<LibrarySection>, Error> {
        debug!("listing library sections");
        let container: SectionContainer = self.get("/library/sections", &[]).await?;
        Ok(container.directories)
    }

    /// List items in a section whose title matches `title`.
    ///
    /// `GET /library/sections/{key}/all?title={title}`
    ///
    /// The server does a case-insensitive substring match, so this doubles
    /// as the search used by card registration.
    pub async fn section_items(
        &self,
        section_key: &str,
        title: &str,
    ) -> Result<Vec<Metadata>, Error> {
        let path = format!("/library/sections/{section_key}/all");
        debug!(section_key, title, "searching section");
        let container: MetadataContainer = self.get(&path, &[("title", title)]).await?;
        Ok(container.metadata)
    }

    /// Fetch the show's on-deck episode, if the server tracks one.
    ///
    /// `GET /library/metadata/{ratingKey}?includeOnDeck=1`
    pub async fn on_deck(&self, rating_key: &str) -> Result<Option<Metadata>, Error> {
        let path = format!("/library/metadata/{rating_key}");
        debug!(rating_key, "fetching on-deck episode");
        let container: MetadataContainer = self.get(&path, &[("includeOnDeck", "1")]).await?;
        Ok(container
            .metadata
            .into_iter()
            .next()
            .and_then(|show| show.on_deck)
            .and_then(|deck| deck.metadata.into_iter().next()))
    }

    /// List every episode of a show.
    ///
    /// `GET /library/metadata/{ratingKey}/allLeaves`
    ///
    /// Returned in server order; callers that need canonical
    /// (season, episode) order must sort.
    pub async fn all_leaves(&self, rating_key: &str) -> Result<Vec<Metadata>, Error> {
        let path = format!("/library/metadata/{rating_key}/allLeaves");
        debug!(rating_key, "listing episodes");
        let container: MetadataContainer = self.get(&path, &[]).await?;
        Ok(container.metadata)
    }

    /// Create a play queue for the item with `rating_key`, optionally shuffled.
    ///
    /// `POST /playQueues?type=video&uri=server://{machine}/com.plexapp.plugins.library/library/metadata/{ratingKey}`
    pub async fn create_play_queue(
        &self,
        rating_key: &str,
        shuffle: bool,
    ) -> Result<PlayQueue, Error> {
        let uri = format!(
            "server://{}/com.plexapp.plugins.library/library/metadata/{rating_key}",
            self.endpoint().machine_id,
        );
        debug!(rating_key, shuffle, "creating play queue");
        let shuffle = if shuffle { "1" } else { "0" };
        self.post(
            "/playQueues",
            &[
                ("type", "video"),
                ("uri", &uri),
                ("shuffle", shuffle),
                ("continuous", "0"),
                ("repeat", "0"),
            ],
        )
        .await
    }
}

//! # Leisure
//!
//! Quotes and memes. Stateless pass-through to the content sources; picks one
//! postable meme at random.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::{MemeSource, QuoteSource};
use crate::domain::types::{MemePost, MemeQuery, Quote};

pub const MEME_FETCH_LIMIT: u32 = 30;

pub struct LeisureService {
    quotes: Arc<dyn QuoteSource>,
    memes: Arc<dyn MemeSource>,
}

impl LeisureService {
    pub fn new(quotes: Arc<dyn QuoteSource>, memes: Arc<dyn MemeSource>) -> Self {
        Self { quotes, memes }
    }

    pub async fn quote(&self) -> BotResult<Quote> {
        self.quotes.random_quote().await
    }

    pub async fn meme(&self, query: &MemeQuery) -> BotResult<MemePost> {
        let posts = self.memes.fetch_posts(query, MEME_FETCH_LIMIT).await?;
        pick_meme(posts, &mut rand::thread_rng())
    }
}

/// Chooses one postable entry; none left is an external-service failure.
pub fn pick_meme<R: Rng + ?Sized>(posts: Vec<MemePost>, rng: &mut R) -> BotResult<MemePost> {
    let candidates: Vec<MemePost> = posts.into_iter().filter(MemePost::is_postable).collect();
    candidates
        .choose(rng)
        .cloned()
        .ok_or_else(|| BotError::external("reddit", "no postable memes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticMemes, StaticQuotes};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn post(url: &str, author: Option<&str>) -> MemePost {
        MemePost {
            url: url.to_string(),
            over_18: false,
            author: author.map(str::to_string),
            title: String::new(),
        }
    }

    #[test]
    fn test_pick_meme_only_returns_postable() {
        let mut rng = StdRng::seed_from_u64(7);
        let posts = vec![
            post("https://v.redd.it/clip", Some("a")),
            post("https://i.redd.it/ok.gif", Some("b")),
            post("https://i.redd.it/anon.png", None),
        ];
        for _ in 0..10 {
            let picked = pick_meme(posts.clone(), &mut rng).unwrap();
            assert_eq!(picked.url, "https://i.redd.it/ok.gif");
        }
    }

    #[test]
    fn test_pick_meme_without_candidates_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = pick_meme(vec![post("https://v.redd.it/clip", Some("a"))], &mut rng).unwrap_err();
        assert!(matches!(err, BotError::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_service_passes_through_sources() {
        let service = LeisureService::new(
            Arc::new(StaticQuotes::new("Keep going.", "Anon")),
            Arc::new(StaticMemes::new(vec![post("https://i.redd.it/m.jpg", Some("ann"))])),
        );
        assert_eq!(service.quote().await.unwrap().author, "Anon");
        assert_eq!(service.meme(&MemeQuery::Hot).await.unwrap().url, "https://i.redd.it/m.jpg");
    }
}

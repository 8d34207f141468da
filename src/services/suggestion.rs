//! Movie suggestion generation: prompt the chat model with the resolved
//! categories and keep asking until it produces valid JSON for a movie whose
//! country lies inside the requested region, up to a configurable attempt
//! cap.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{catalog, CategorySelections, MovieInfo},
    services::{
        providers::{ChatModel, ChatRequest, PosterLookup},
        reviews,
    },
};

const SUGGESTION_MAX_TOKENS: u32 = 350;
const SUGGESTION_TEMPERATURE: f32 = 0.7;

pub struct SuggestionService {
    model: Arc<dyn ChatModel>,
    posters: Option<Arc<dyn PosterLookup>>,
    max_attempts: u32,
}

impl SuggestionService {
    pub fn new(
        model: Arc<dyn ChatModel>,
        posters: Option<Arc<dyn PosterLookup>>,
        max_attempts: u32,
    ) -> Self {
        Self {
            model,
            posters,
            max_attempts,
        }
    }

    /// Generates a movie for the given (possibly partial) category picks.
    ///
    /// Replies that fail to parse as JSON, or whose country contains no name
    /// from the region's country list, are discarded and the model is asked
    /// again. Transport errors abort immediately; running out of attempts is
    /// an explicit error rather than a hang.
    pub async fn generate(&self, picked: &CategorySelections) -> AppResult<MovieInfo> {
        let selections = catalog::resolve(picked)?;
        let countries = catalog::region_countries(&selections.region).ok_or_else(|| {
            AppError::Internal(format!("no country list for region {}", selections.region))
        })?;

        let prompt = build_prompt(&selections);

        let mut accepted = None;
        for attempt in 1..=self.max_attempts {
            let content = self
                .model
                .complete(ChatRequest {
                    system: None,
                    prompt: prompt.clone(),
                    max_tokens: SUGGESTION_MAX_TOKENS,
                    temperature: SUGGESTION_TEMPERATURE,
                })
                .await?;

            if content.is_empty() {
                continue;
            }

            let candidate: MovieInfo = match serde_json::from_str(&content) {
                Ok(movie) => movie,
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "discarding unparseable suggestion");
                    continue;
                }
            };

            // Substring containment, matching the prompt contract. Known to
            // false-positive on shared place-name fragments ("Georgia").
            if countries.iter().any(|c| candidate.country.contains(c)) {
                accepted = Some(candidate);
                break;
            }

            tracing::debug!(
                attempt,
                country = %candidate.country,
                region = %selections.region,
                "discarding suggestion outside region"
            );
        }

        let mut movie = accepted.ok_or_else(|| {
            AppError::ExternalApi(format!(
                "model produced no movie in region {} within {} attempts",
                selections.region, self.max_attempts
            ))
        })?;

        movie.release_year = Some(movie.year.clone());
        movie.code = Some(reviews::generate_movie_code(&movie.title, &movie.year));
        movie.region = Some(selections.region);
        movie.genre = Some(selections.genre);
        movie.decade = Some(selections.decade);
        movie.budget = Some(selections.budget);

        if let Some(posters) = &self.posters {
            match posters.poster_url(&movie.title).await {
                Ok(Some(url)) => movie.poster_url = url,
                Ok(None) => {}
                Err(e) => {
                    // Posters are decoration; the suggestion stands without one.
                    tracing::warn!(error = %e, title = %movie.title, "poster lookup failed");
                }
            }
        }

        tracing::info!(
            title = %movie.title,
            region = movie.region.as_deref().unwrap_or(""),
            "movie suggestion accepted"
        );

        Ok(movie)
    }
}

fn build_prompt(selections: &catalog::Selections) -> String {
    format!(
        "You are a helpful assistant that suggests a movie strictly based on:\n\
         - Region: {}\n\
         - Genre: {}\n\
         - Decade: {}\n\
         - Budget: {}\n\n\
         Reply with a JSON object containing:\n\
         {{\n  \"title\": string,\n  \"year\": string,\n  \"country\": string,\n  \"director\": string,\n  \"description\": string,\n  \"watch_info\": string\n}}\n\n\
         Return only valid JSON.",
        selections.region, selections.genre, selections.decade, selections.budget_range
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{MockChatModel, MockPosterLookup};
    use mockall::Sequence;

    fn service(model: MockChatModel, max_attempts: u32) -> SuggestionService {
        SuggestionService::new(Arc::new(model), None, max_attempts)
    }

    fn asia_picks() -> CategorySelections {
        CategorySelections {
            region: Some("Asia".to_string()),
            genre: Some("Drama".to_string()),
            decade: Some("1990s".to_string()),
            budget: Some("Indie".to_string()),
        }
    }

    const JAPAN_MOVIE: &str = r#"{
        "title": "After Life",
        "year": "1998",
        "country": "Japan",
        "director": "Hirokazu Kore-eda",
        "description": "The recently deceased pick one memory to keep.",
        "watch_info": "Criterion Channel"
    }"#;

    fn scripted(responses: &[&str]) -> MockChatModel {
        let mut model = MockChatModel::new();
        let mut seq = Sequence::new();
        for response in responses {
            let response = response.to_string();
            model
                .expect_complete()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(response.clone()));
        }
        model
    }

    #[tokio::test]
    async fn accepts_first_matching_movie() {
        let movie = service(scripted(&[JAPAN_MOVIE]), 8)
            .generate(&asia_picks())
            .await
            .unwrap();

        assert_eq!(movie.title, "After Life");
        assert_eq!(movie.country, "Japan");
        assert_eq!(movie.region.as_deref(), Some("Asia"));
        assert_eq!(movie.genre.as_deref(), Some("Drama"));
        assert_eq!(movie.release_year.as_deref(), Some("1998"));
        assert_eq!(movie.code.as_ref().map(|c| c.len()), Some(6));
    }

    #[tokio::test]
    async fn retries_past_unparseable_and_mismatched_replies() {
        let french_movie = r#"{"title": "Playtime", "year": "1967", "country": "France"}"#;
        let model = scripted(&["definitely not json", french_movie, "", JAPAN_MOVIE]);

        let movie = service(model, 8).generate(&asia_picks()).await.unwrap();
        assert_eq!(movie.country, "Japan");
    }

    #[tokio::test]
    async fn never_returns_a_movie_outside_the_region() {
        let french_movie = r#"{"title": "Playtime", "year": "1967", "country": "France"}"#;
        let model = scripted(&[french_movie, french_movie, french_movie]);

        let result = service(model, 3).generate(&asia_picks()).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn attempt_cap_bounds_model_calls() {
        let mut model = MockChatModel::new();
        // Exactly max_attempts calls, never more.
        model
            .expect_complete()
            .times(2)
            .returning(|_| Ok("not json".to_string()));

        let result = service(model, 2).generate(&asia_picks()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transport_errors_abort_immediately() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("upstream down".to_string())));

        let result = service(model, 8).generate(&asia_picks()).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn unknown_region_is_invalid_input() {
        let model = MockChatModel::new();
        let picked = CategorySelections {
            region: Some("Atlantis".to_string()),
            ..Default::default()
        };

        let result = service(model, 8).generate(&picked).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn poster_enrichment_fills_the_url() {
        let mut posters = MockPosterLookup::new();
        posters
            .expect_poster_url()
            .times(1)
            .returning(|_| Ok(Some("https://img/afterlife.jpg".to_string())));

        let service = SuggestionService::new(
            Arc::new(scripted(&[JAPAN_MOVIE])),
            Some(Arc::new(posters)),
            8,
        );
        let movie = service.generate(&asia_picks()).await.unwrap();
        assert_eq!(movie.poster_url, "https://img/afterlife.jpg");
    }

    #[tokio::test]
    async fn poster_failure_does_not_fail_the_suggestion() {
        let mut posters = MockPosterLookup::new();
        posters
            .expect_poster_url()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("omdb down".to_string())));

        let service = SuggestionService::new(
            Arc::new(scripted(&[JAPAN_MOVIE])),
            Some(Arc::new(posters)),
            8,
        );
        let movie = service.generate(&asia_picks()).await.unwrap();
        assert_eq!(movie.poster_url, "");
    }
}

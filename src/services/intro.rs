//! One-sentence witty intro for a pick, with a templated fallback so the
//! weekly announcement never blocks on the model being up.

use crate::{
    error::AppResult,
    models::MovieInfo,
    services::providers::{ChatModel, ChatRequest},
};

const INTRO_MAX_TOKENS: u32 = 80;
const INTRO_TEMPERATURE: f32 = 0.9;
const INTRO_SYSTEM: &str = "You are a witty movie club host.";

const ANNOUNCEMENT_MAX_TOKENS: u32 = 150;
const ANNOUNCEMENT_TEMPERATURE: f32 = 0.7;
const ANNOUNCEMENT_SYSTEM: &str = "You are a witty and creative movie club announcer.";

/// Generates the intro line for a movie. Model failures fall back to a
/// templated string; an empty model reply is returned as-is.
pub async fn witty_intro(model: &dyn ChatModel, movie: &MovieInfo) -> String {
    let details = serde_json::to_string(movie).unwrap_or_default();
    let prompt = format!(
        "You are a witty, funny movie club host. Write a very short, clever, and playful \
         one-sentence intro (max 20 words) for this week's movie club pick, based on the \
         following movie details. Make it extremely witty, surprising, and memorable—use \
         wordplay, puns, or clever references. Channel your inner late-night talk show host \
         or stand-up comedian. The intro should make the recipient smile or laugh. Never be \
         generic or bland. Reference the movie's genre, decade, or any notable details if \
         possible. Do NOT mention the movie title in the intro.\n\n\
         Movie details: {details}\n\n\
         Intro:"
    );

    match model
        .complete(ChatRequest {
            system: Some(INTRO_SYSTEM.to_string()),
            prompt,
            max_tokens: INTRO_MAX_TOKENS,
            temperature: INTRO_TEMPERATURE,
        })
        .await
    {
        Ok(intro) => intro,
        Err(e) => {
            tracing::warn!(error = %e, title = %movie.title, "intro generation failed, using fallback");
            fallback_intro(movie)
        }
    }
}

/// Intro for the weekly announcement SMS. No templated fallback here; the
/// weekly job aborts on model failure instead of sending a bland blast.
pub async fn announcement_intro(model: &dyn ChatModel, movie: &MovieInfo) -> AppResult<String> {
    let prompt = format!(
        "Create a short, engaging intro for a movie night SMS. Use a friendly tone and \
         highlight genre, region, and vibe. Here are the details:\n\
         Title: {}\n\
         Genre: {}\n\
         Region: {}\n\
         Release Year: {}",
        movie.title,
        movie.genre.as_deref().unwrap_or(""),
        movie.region.as_deref().unwrap_or(""),
        movie.release_year.as_deref().unwrap_or(""),
    );

    model
        .complete(ChatRequest {
            system: Some(ANNOUNCEMENT_SYSTEM.to_string()),
            prompt,
            max_tokens: ANNOUNCEMENT_MAX_TOKENS,
            temperature: ANNOUNCEMENT_TEMPERATURE,
        })
        .await
}

fn fallback_intro(movie: &MovieInfo) -> String {
    let genre = movie
        .genre
        .as_deref()
        .filter(|g| !g.is_empty())
        .map(|g| format!("a {} film", g.to_lowercase()))
        .unwrap_or_else(|| "a film".to_string());
    let decade = movie
        .release_year
        .as_deref()
        .and_then(|y| y.get(..3))
        .map(|prefix| format!("from the {prefix}0s"))
        .unwrap_or_default();
    let year = movie.release_year.as_deref().unwrap_or("");

    format!(
        "🎬 This week's pick is \"{}\" ({}) — {} {}. Get ready for a wild ride!",
        movie.title, year, genre, decade
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockChatModel;

    fn pick() -> MovieInfo {
        MovieInfo {
            title: "After Life".to_string(),
            genre: Some("Drama".to_string()),
            release_year: Some("1998".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn uses_the_model_reply() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Ok("A memory worth keeping.".to_string()));

        let intro = witty_intro(&model, &pick()).await;
        assert_eq!(intro, "A memory worth keeping.");
    }

    #[tokio::test]
    async fn empty_model_reply_is_returned_as_is() {
        let mut model = MockChatModel::new();
        model.expect_complete().times(1).returning(|_| Ok(String::new()));

        let intro = witty_intro(&model, &pick()).await;
        assert_eq!(intro, "");
    }

    #[tokio::test]
    async fn model_failure_falls_back_to_template() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("model down".to_string())));

        let intro = witty_intro(&model, &pick()).await;
        assert!(intro.contains("After Life"));
        assert!(intro.contains("a drama film"));
        assert!(intro.contains("from the 1990s"));
    }

    #[tokio::test]
    async fn announcement_intro_propagates_model_failure() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("model down".to_string())));

        let result = announcement_intro(&model, &pick()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fallback_tolerates_missing_metadata() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("model down".to_string())));

        let movie = MovieInfo {
            title: "Mystery".to_string(),
            ..Default::default()
        };
        let intro = witty_intro(&model, &movie).await;
        assert!(intro.contains("Mystery"));
        assert!(intro.contains("a film"));
    }
}

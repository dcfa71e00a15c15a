//! Sentiment engine: one external scoring call per symbol, strict parsing,
//! neutral fallback on anything unexpected.

use crate::domain::config::SentimentConfig;
use crate::domain::news::NewsItem;
use crate::ports::scoring_port::ScoringPort;
use serde::Deserialize;

pub const INSUFFICIENT_DATA: &str = "insufficient data";
pub const SCORING_UNAVAILABLE: &str = "scoring unavailable";

const INSTRUCTIONS: &str = "You are an equity market analyst. Read the news snippets below and \
rate their overall sentiment on a scale from -1.0 (very negative) to 1.0 (very positive).\n\
Respond with ONLY a JSON object with exactly two fields: \
{\"score\": <number between -1.0 and 1.0>, \"reason\": \"<one short sentence>\"}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentStatus {
    Scored,
    /// No news, or no scorer configured.
    InsufficientData,
    /// The scorer failed or broke the output contract.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    /// In [-1, 1]; exactly 0.0 unless `status` is `Scored`.
    pub score: f64,
    pub rationale: String,
    pub status: SentimentStatus,
}

impl SentimentResult {
    pub fn insufficient_data() -> Self {
        Self {
            score: 0.0,
            rationale: INSUFFICIENT_DATA.to_string(),
            status: SentimentStatus::InsufficientData,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            score: 0.0,
            rationale: SCORING_UNAVAILABLE.to_string(),
            status: SentimentStatus::Unavailable,
        }
    }
}

/// The only record shape accepted from the scorer.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoreRecord {
    score: f64,
    reason: String,
}

pub struct SentimentEngine<'a> {
    config: SentimentConfig,
    scorer: Option<&'a dyn ScoringPort>,
}

impl<'a> SentimentEngine<'a> {
    pub fn new(config: SentimentConfig, scorer: Option<&'a dyn ScoringPort>) -> Self {
        Self { config, scorer }
    }

    pub fn analyze(&self, snippets: &[NewsItem]) -> SentimentResult {
        let Some(scorer) = self.scorer else {
            tracing::info!("no scorer configured, sentiment is neutral");
            return SentimentResult::insufficient_data();
        };
        let Some(prompt) = self.build_prompt(snippets) else {
            tracing::info!("no news content, sentiment is neutral");
            return SentimentResult::insufficient_data();
        };

        tracing::info!(scorer = scorer.name(), "scoring sentiment");
        let raw = match scorer.score(&prompt) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("scoring call failed: {e}");
                return SentimentResult::unavailable();
            }
        };

        match parse_response(&raw) {
            Ok((score, reason)) => SentimentResult {
                score,
                rationale: truncate_chars(reason.trim(), self.config.max_rationale_chars)
                    .to_string(),
                status: SentimentStatus::Scored,
            },
            Err(reason) => {
                tracing::warn!("rejected scorer output: {reason}");
                tracing::debug!(raw = raw.as_str(), "raw scorer output");
                SentimentResult::unavailable()
            }
        }
    }

    /// Instructions plus one `- <content>` line per snippet, the news block
    /// capped at `max_context_chars`. `None` when no snippet has content.
    pub fn build_prompt(&self, snippets: &[NewsItem]) -> Option<String> {
        let context = snippets
            .iter()
            .filter(|n| n.has_content())
            .map(|n| format!("- {}", n.content.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        if context.is_empty() {
            return None;
        }

        let context = truncate_chars(&context, self.config.max_context_chars);
        Some(format!("{INSTRUCTIONS}\n\nNEWS:\n{context}"))
    }
}

/// Strip code fences and surrounding prose, then parse the score record.
pub fn parse_response(raw: &str) -> Result<(f64, String), String> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) else {
        return Err("no JSON object in response".to_string());
    };
    if end < start {
        return Err("no JSON object in response".to_string());
    }

    let record: ScoreRecord =
        serde_json::from_str(&cleaned[start..=end]).map_err(|e| e.to_string())?;

    if !record.score.is_finite() || !(-1.0..=1.0).contains(&record.score) {
        return Err(format!("score {} outside [-1, 1]", record.score));
    }
    Ok((record.score, record.reason))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ProviderError;
    use std::cell::RefCell;

    struct StubScorer {
        reply: Result<String, ProviderError>,
        prompts: RefCell<Vec<String>>,
    }

    impl StubScorer {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self {
                reply: Err(err),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ScoringPort for StubScorer {
        fn score(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn news(texts: &[&str]) -> Vec<NewsItem> {
        texts.iter().map(|t| NewsItem::new(*t)).collect()
    }

    #[test]
    fn empty_snippets_are_insufficient_data() {
        let scorer = StubScorer::replying(r#"{"score": 0.9, "reason": "x"}"#);
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        let result = engine.analyze(&[]);

        assert_eq!(result.score, 0.0);
        assert_eq!(result.rationale, "insufficient data");
        assert_eq!(result.status, SentimentStatus::InsufficientData);
        assert!(scorer.prompts.borrow().is_empty());
    }

    #[test]
    fn blank_snippets_are_insufficient_data() {
        let scorer = StubScorer::replying(r#"{"score": 0.9, "reason": "x"}"#);
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        let result = engine.analyze(&news(&["   ", ""]));
        assert_eq!(result, SentimentResult::insufficient_data());
        assert!(scorer.prompts.borrow().is_empty());
    }

    #[test]
    fn no_scorer_is_insufficient_data() {
        let engine = SentimentEngine::new(SentimentConfig::default(), None);
        let result = engine.analyze(&news(&["Record quarter"]));
        assert_eq!(result, SentimentResult::insufficient_data());
    }

    #[test]
    fn well_formed_reply_is_scored() {
        let scorer = StubScorer::replying(r#"{"score": 0.5, "reason": "Strong earnings beat."}"#);
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        let result = engine.analyze(&news(&["Earnings beat estimates"]));

        assert_eq!(result.score, 0.5);
        assert_eq!(result.rationale, "Strong earnings beat.");
        assert_eq!(result.status, SentimentStatus::Scored);
        assert_eq!(scorer.prompts.borrow().len(), 1);
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let reply = "```json\n{\"score\": -0.3, \"reason\": \"Guidance cut.\"}\n```";
        let scorer = StubScorer::replying(reply);
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        let result = engine.analyze(&news(&["Guidance lowered"]));
        assert_eq!(result.score, -0.3);
        assert_eq!(result.status, SentimentStatus::Scored);
    }

    #[test]
    fn non_json_reply_falls_back() {
        let scorer = StubScorer::replying("The news looks fairly positive overall.");
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        let result = engine.analyze(&news(&["Something happened"]));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.rationale, "scoring unavailable");
        assert_eq!(result.status, SentimentStatus::Unavailable);
    }

    #[test]
    fn out_of_range_score_falls_back() {
        let scorer = StubScorer::replying(r#"{"score": 5.0, "reason": "Euphoria"}"#);
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        assert_eq!(
            engine.analyze(&news(&["Stock up 40%"])),
            SentimentResult::unavailable()
        );
    }

    #[test]
    fn scorer_error_falls_back() {
        let scorer = StubScorer::failing(ProviderError::Timeout {
            provider: "stub".into(),
        });
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        assert_eq!(
            engine.analyze(&news(&["Anything"])),
            SentimentResult::unavailable()
        );
    }

    #[test]
    fn prompt_lists_snippets_and_skips_blank_ones() {
        let engine = SentimentEngine::new(SentimentConfig::default(), None);
        let prompt = engine
            .build_prompt(&news(&["First headline", "  ", "Second headline"]))
            .unwrap();
        assert!(prompt.starts_with(INSTRUCTIONS));
        assert!(prompt.ends_with("NEWS:\n- First headline\n- Second headline"));
    }

    #[test]
    fn prompt_context_is_capped() {
        let config = SentimentConfig {
            max_context_chars: 10,
            ..SentimentConfig::default()
        };
        let engine = SentimentEngine::new(config, None);
        let prompt = engine.build_prompt(&news(&["ąćęłńóśźż ąćęłńóśźż"])).unwrap();
        let context = prompt.split("NEWS:\n").nth(1).unwrap();
        assert_eq!(context.chars().count(), 10);
    }

    #[test]
    fn rationale_is_capped() {
        let long_reason = "x".repeat(1000);
        let reply = format!(r#"{{"score": 0.1, "reason": "{long_reason}"}}"#);
        let scorer = StubScorer::replying(&reply);
        let engine = SentimentEngine::new(SentimentConfig::default(), Some(&scorer));
        let result = engine.analyze(&news(&["headline"]));
        assert_eq!(result.rationale.chars().count(), 280);
    }

    mod parsing {
        use super::*;

        #[test]
        fn accepts_surrounding_prose() {
            let (score, reason) =
                parse_response("Here you go: {\"score\": 1.0, \"reason\": \"ok\"} Thanks!")
                    .unwrap();
            assert_eq!(score, 1.0);
            assert_eq!(reason, "ok");
        }

        #[test]
        fn accepts_boundary_scores() {
            assert!(parse_response(r#"{"score": -1.0, "reason": "r"}"#).is_ok());
            assert!(parse_response(r#"{"score": 1, "reason": "r"}"#).is_ok());
        }

        #[test]
        fn rejects_extra_fields() {
            assert!(parse_response(r#"{"score": 0.2, "reason": "r", "confidence": 0.9}"#).is_err());
        }

        #[test]
        fn rejects_missing_fields() {
            assert!(parse_response(r#"{"score": 0.2}"#).is_err());
            assert!(parse_response(r#"{"reason": "r"}"#).is_err());
        }

        #[test]
        fn rejects_wrong_types() {
            assert!(parse_response(r#"{"score": "high", "reason": "r"}"#).is_err());
        }

        #[test]
        fn rejects_out_of_range() {
            assert!(parse_response(r#"{"score": -1.01, "reason": "r"}"#).is_err());
        }

        #[test]
        fn rejects_garbage() {
            assert!(parse_response("").is_err());
            assert!(parse_response("} nothing {").is_err());
            assert!(parse_response("```json\n```").is_err());
        }
    }
}

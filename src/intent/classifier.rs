//! The intent classifier.

use super::{Intent, IntentClassification};
use crate::conversation::domain::{ChatMessage, ChatRole};
use crate::external::{CallError, CallGuard};
use crate::extraction::parse_json_payload;
use crate::model::domain::{ModelMessage, ModelRequest};
use crate::model::ports::ModelProvider;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const CLASSIFIER_INSTRUCTIONS: &str = "Classify the user's latest message for a project \
assistant. Choose exactly one intent:\n\
- interview: describing the project itself (name, mission, users, stack, phase, features, \
competitors, voice, metrics)\n\
- query: asking about existing tasks, documents or sprints\n\
- idea: brainstorming features or capturing loose ideas\n\
- document: writing or revising a document\n\
- compile: turning a document into engineering tasks\n\
- plan: organising work into sprints\n\
- execute: any other concrete change to tasks, documents or sprints\n\
- analyze: reviewing progress, risks or priorities\n\
- unclear: a short or ambiguous reply that only makes sense in context\n\
Reply with JSON only: {\"intent\": \"...\", \"confidence\": 0.0, \"reasoning\": \"...\"}.";

#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Maps a user turn onto an [`Intent`] with one model call.
#[derive(Clone)]
pub struct IntentClassifier {
    model: Arc<dyn ModelProvider>,
    history_window: usize,
}

impl IntentClassifier {
    /// Creates a classifier that shows the model the last `history_window`
    /// messages.
    #[must_use]
    pub const fn new(model: Arc<dyn ModelProvider>, history_window: usize) -> Self {
        Self {
            model,
            history_window,
        }
    }

    /// Classifies `input` in the context of recent `history`.
    ///
    /// Transport failures, timeouts and unparseable replies yield `fallback`
    /// with zero confidence, so classification noise never fails a turn.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Cancelled`] when the turn is cancelled.
    #[instrument(skip_all, fields(history = history.len()))]
    pub async fn classify(
        &self,
        history: &[ChatMessage],
        input: &str,
        fallback: Intent,
        guard: &CallGuard,
    ) -> Result<IntentClassification, CallError> {
        let request = ModelRequest::new(vec![
            ModelMessage::system(CLASSIFIER_INSTRUCTIONS),
            ModelMessage::user(self.render_input(history, input)),
        ])
        .json();

        let response = match guard.run(self.model.invoke(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(error = %err, %fallback, "intent classification failed, using fallback intent");
                return Ok(IntentClassification::fallback(fallback, format!("model error: {err}")));
            }
            Err(CallError::Cancelled) => return Err(CallError::Cancelled),
            Err(err) => {
                warn!(error = %err, %fallback, "intent classification timed out, using fallback intent");
                return Ok(IntentClassification::fallback(fallback, err.to_string()));
            }
        };

        let classification = parse_classification(&response.content, fallback);
        debug!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "intent classified"
        );
        Ok(classification)
    }

    fn render_input(&self, history: &[ChatMessage], input: &str) -> String {
        let skip = history.len().saturating_sub(self.history_window);
        let mut rendered = String::from("Recent conversation:\n");
        let window: Vec<&ChatMessage> = history.iter().skip(skip).collect();
        if window.is_empty() {
            rendered.push_str("(none)\n");
        }
        for message in window {
            let speaker = match message.role() {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            rendered.push_str(speaker);
            rendered.push_str(": ");
            rendered.push_str(message.content());
            rendered.push('\n');
        }
        rendered.push_str("\nLatest message:\n");
        rendered.push_str(input);
        rendered
    }
}

fn parse_classification(content: &str, fallback: Intent) -> IntentClassification {
    let raw = match parse_json_payload::<RawClassification>(content) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(error = %err, %fallback, "classifier reply was not JSON, using fallback intent");
            return IntentClassification::fallback(fallback, "unparseable classifier output");
        }
    };
    Intent::try_from(raw.intent.as_str()).map_or_else(
        |err| {
            warn!(error = %err, %fallback, "classifier chose an unknown intent, using fallback intent");
            IntentClassification::fallback(fallback, err.to_string())
        },
        |intent| {
            IntentClassification::new(
                intent,
                raw.confidence.unwrap_or(0.5),
                raw.reasoning.unwrap_or_default(),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::adapters::ScriptedModelProvider;
    use crate::model::ports::ModelError;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[fixture]
    fn guard() -> CallGuard {
        CallGuard::new(CancellationToken::new(), Duration::from_secs(5))
    }

    async fn classify_with(model: ScriptedModelProvider, guard: &CallGuard) -> IntentClassification {
        IntentClassifier::new(Arc::new(model), 5)
            .classify(&[], "Let's build a recipe app", Intent::DEFAULT, guard)
            .await
            .expect("not cancelled")
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn parses_fenced_json(guard: CallGuard) {
        let model = ScriptedModelProvider::new().then_text(
            "```json\n{\"intent\": \"interview\", \"confidence\": 0.92, \"reasoning\": \"new project\"}\n```",
        );

        let classification = classify_with(model, &guard).await;

        assert_eq!(classification.intent, Intent::Interview);
        assert_eq!(classification.reasoning, "new project");
    }

    #[rstest]
    #[case::prose(ScriptedModelProvider::new().then_text("I think they want to plan."))]
    #[case::unknown_label(ScriptedModelProvider::new().then_text("{\"intent\": \"dance\"}"))]
    #[case::model_error(ScriptedModelProvider::new().then_fail(ModelError::InvalidResponse("boom".to_owned())))]
    #[tokio::test(flavor = "multi_thread")]
    async fn falls_back_to_default_intent(#[case] model: ScriptedModelProvider, guard: CallGuard) {
        let classification = classify_with(model, &guard).await;

        assert_eq!(classification.intent, Intent::DEFAULT);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn unusable_reply_yields_the_requested_fallback(guard: CallGuard) {
        let classifier = IntentClassifier::new(
            Arc::new(ScriptedModelProvider::new().then_text("not sure")),
            5,
        );

        let classification = classifier
            .classify(&[], "those ones", Intent::Unclear, &guard)
            .await
            .expect("not cancelled");

        assert_eq!(classification.intent, Intent::Unclear);
        assert_eq!(classification.confidence.to_bits(), 0.0_f64.to_bits());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_propagates() {
        let token = CancellationToken::new();
        token.cancel();
        let guard = CallGuard::new(token, Duration::from_secs(5));
        let classifier = IntentClassifier::new(Arc::new(ScriptedModelProvider::new()), 5);

        let outcome = classifier.classify(&[], "hello", Intent::DEFAULT, &guard).await;

        assert_eq!(outcome.err(), Some(CallError::Cancelled));
    }

    #[rstest]
    fn prompt_shows_only_the_history_window() {
        let clock = DefaultClock;
        let history: Vec<ChatMessage> = (0..8)
            .map(|index| ChatMessage::user(format!("message {index}"), &clock))
            .collect();
        let classifier = IntentClassifier::new(Arc::new(ScriptedModelProvider::new()), 5);

        let rendered = classifier.render_input(&history, "next");

        assert!(!rendered.contains("message 2"));
        assert!(rendered.contains("message 3"));
        assert!(rendered.ends_with("Latest message:\nnext"));
    }
}

//! Per-record selection between the text model and the emoji model.

use crate::types::{ContentSignal, Enrichment, NormalizedSentiment, Reconciled, SelectedModel};

/// Pick the authoritative model for a record.
///
/// The emoji model wins only when the text has at least one emoji and strictly
/// more emoji than ASCII alphanumerics; ties and emoji-free text go to the
/// text model.
#[must_use]
pub fn select_model(signal: ContentSignal) -> SelectedModel {
    if signal.emoji_count > 0 && signal.emoji_count > signal.letter_count {
        SelectedModel::Emoji
    } else {
        SelectedModel::Text
    }
}

/// Keep exactly one of the two normalized outputs, tagged with its source.
#[must_use]
pub fn reconcile(
    text: &NormalizedSentiment,
    emoji: &NormalizedSentiment,
    signal: ContentSignal,
) -> Reconciled {
    let selected_model = select_model(signal);
    let chosen = match selected_model {
        SelectedModel::Text => text,
        SelectedModel::Emoji => emoji,
    };

    Reconciled {
        sentiment: chosen.category,
        stars: chosen.stars,
        confidence: chosen.confidence,
        selected_model,
    }
}

impl Enrichment {
    /// Build the full enrichment row from both normalized outputs and the
    /// record's content signal.
    #[must_use]
    pub fn from_outputs(
        text: &NormalizedSentiment,
        emoji: &NormalizedSentiment,
        signal: ContentSignal,
    ) -> Self {
        let chosen = reconcile(text, emoji, signal);
        Self {
            sentiment_text: text.category,
            stars_text: text.stars,
            confidence_text: text.confidence,
            sentiment_emoji: emoji.category,
            stars_emoji: emoji.stars,
            confidence_emoji: emoji.confidence,
            final_sentiment: chosen.sentiment,
            final_stars: chosen.stars,
            final_confidence: chosen.confidence,
            selected_model: chosen.selected_model,
        }
    }
}

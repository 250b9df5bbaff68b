//! Emoji-vs-letter content signal used to route reconciliation.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::ContentSignal;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Count emoji and remaining ASCII alphanumerics in `text`.
///
/// Emoji are matched per extended grapheme cluster against the Unicode emoji
/// table, so ZWJ sequences, flags and skin-tone variants count once each.
#[must_use]
pub fn content_signal(text: &str) -> ContentSignal {
    let mut signal = ContentSignal::default();

    for grapheme in text.graphemes(true) {
        if is_emoji(grapheme) {
            signal.emoji_count += 1;
        } else {
            signal.letter_count += grapheme
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .count();
        }
    }

    signal
}

fn is_emoji(grapheme: &str) -> bool {
    // Plain digits, `#` and `*` carry the Emoji property but are not emoji
    // unless followed by a keycap, which makes the cluster non-ASCII.
    if grapheme.is_ascii() {
        return false;
    }

    if emojis::get(grapheme).is_some() {
        return true;
    }

    let unqualified: String = grapheme
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR_16)
        .collect();
    if unqualified != grapheme && emojis::get(&unqualified).is_some() {
        return true;
    }

    // Fall back to the leading scalar so a base emoji carrying combining marks,
    // a text-presentation selector (U+FE0E) or no selector at all still counts.
    grapheme
        .chars()
        .next()
        .filter(|base| !base.is_ascii())
        .is_some_and(|base| {
            let mut buf = [0u8; 4];
            let base = base.encode_utf8(&mut buf);
            emojis::get(base).is_some()
                || emojis::get(&format!("{base}{VARIATION_SELECTOR_16}")).is_some()
        })
}

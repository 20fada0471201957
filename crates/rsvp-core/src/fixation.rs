//! Fixation point (optimal recognition point) selection.

/// Index of the character the reader's eye should land on.
///
/// Length is counted in `char`s. Coarse bands keep the highlighted glyph from
/// jumping around between neighbouring words of similar length.
pub fn resolve_fixation(word: &str) -> usize {
    match word.chars().count() {
        0..=1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// A word cut around its fixation character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixationParts<'a> {
    pub before: &'a str,
    pub pivot: &'a str,
    pub after: &'a str,
}

pub fn split_at_fixation(word: &str) -> FixationParts<'_> {
    let pivot_char = resolve_fixation(word);
    let mut boundaries = word.char_indices().map(|(offset, _)| offset).skip(pivot_char);
    let Some(start) = boundaries.next() else {
        return FixationParts {
            before: word,
            pivot: "",
            after: "",
        };
    };
    let end = boundaries.next().unwrap_or(word.len());
    FixationParts {
        before: &word[..start],
        pivot: &word[start..end],
        after: &word[end..],
    }
}

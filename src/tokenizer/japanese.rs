use super::patterns::{
    ASCII_LETTERS, EMOJI_SEQUENCE, FULLWIDTH_LATIN, HALFWIDTH_KATAKANA, JA_RUN,
};
use super::{Step, TokenKind, single_char, special_at};
use crate::dictionary::Dictionary;
use crate::unicode::{is_emoji_glue, is_separator_space};

/// One scanning step for Japanese: specials first, then half-width kana,
/// full-width Latin, dictionary longest-prefix over kanji/kana (falling back
/// to the whole kanji/kana run), ASCII words, and finally single characters.
pub(super) fn step(rest: &str, dict: &Dictionary) -> Option<Step> {
    let ch = rest.chars().next()?;

    if let Some(len) = EMOJI_SEQUENCE.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Emoji, len));
    }
    if let Some(special) = special_at(rest) {
        return Some(special);
    }
    if is_separator_space(ch) || is_emoji_glue(ch) {
        return Some(Step::Skip(ch.len_utf8()));
    }
    if let Some(len) = HALFWIDTH_KATAKANA.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Word, len));
    }
    if let Some(len) = FULLWIDTH_LATIN.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Word, len));
    }
    let mut buf = [0u8; 4];
    if JA_RUN.is_full(ch.encode_utf8(&mut buf)) {
        let len = match dict.longest_prefix(rest) {
            Some(word) => word.len(),
            None => JA_RUN.prefix_len(rest).unwrap_or(ch.len_utf8()),
        };
        return Some(Step::Emit(TokenKind::Word, len));
    }
    if let Some(len) = ASCII_LETTERS.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Word, len));
    }
    Some(single_char(ch))
}

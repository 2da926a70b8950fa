//! Text statistics computed once per detection call and shared by every
//! candidate's scoring pass.

use crate::lang::{LangEntry, Script};
use crate::model::ngram::{
    GramCounts, count_affix_ngrams, count_char_ngrams, letter_ngrams, words,
};
use crate::model::{KeyBuf, Model, OOV};
use crate::unicode::is_letter;
use crate::lang::data::is_vietnamese_diacritic;
use std::collections::{BTreeMap, HashMap, HashSet};

/// N-gram orders contributing to the base quality.
pub const ORDERS: [usize; 4] = [2, 3, 4, 5];
/// Inputs shorter than this many chars use the short-text weights.
pub const SHORT_CHARS: usize = 60;
pub const ULTRA_SHORT_LETTERS: usize = 8;
/// A single word up to this many chars gets no affix grams.
const SINGLE_TOKEN_MAX_CHARS: usize = 6;

const SIG_MIN_HITS: usize = 3;
const SIG_CAP: f64 = 5.0;

#[derive(Debug)]
pub struct TextFeatures<'t> {
    pub text: &'t str,
    pub short: bool,
    pub letters: usize,
    pub ultra_short: bool,
    pub tokens: Vec<&'t str>,
    /// Padded char grams per order, in [`ORDERS`] order.
    pub char_grams: Vec<(usize, GramCounts)>,
    /// Affix grams per order; empty when the text is one short token.
    pub affix_grams: Vec<(usize, GramCounts)>,
    pub letter_bigrams: GramCounts,
    pub letter_hist: BTreeMap<char, usize>,
    pub word_pairs: BTreeMap<(&'t str, &'t str), usize>,
    pub bigram_entropy: f64,
    pub bigram_n80: usize,
    pub hiragana_share: f64,
    pub katakana_share: f64,
    pub hangul_share: f64,
    pub vi_density: f64,
}

impl<'t> TextFeatures<'t> {
    pub fn new(text: &'t str) -> Self {
        let tokens: Vec<&str> = words(text).collect();
        let single_short =
            tokens.len() == 1 && tokens[0].chars().count() <= SINGLE_TOKEN_MAX_CHARS;

        let char_grams = ORDERS.iter().map(|&n| (n, count_char_ngrams(text, n))).collect();
        let affix_grams = if single_short {
            Vec::new()
        } else {
            ORDERS
                .iter()
                .map(|&n| (n, count_affix_ngrams(tokens.iter().copied(), n)))
                .filter(|(_, c)| !c.is_empty())
                .collect()
        };

        let mut letter_hist: BTreeMap<char, usize> = BTreeMap::new();
        let (mut hira, mut kata, mut hangul, mut vi) = (0usize, 0usize, 0usize, 0usize);
        for c in text.chars().filter(|&c| is_letter(c)) {
            *letter_hist.entry(c).or_default() += 1;
            if c.is_ascii() {
                continue;
            }
            hira += usize::from(Script::Hiragana.contains(c));
            kata += usize::from(Script::Katakana.contains(c));
            hangul += usize::from(Script::Hangul.contains(c));
            vi += usize::from(is_vietnamese_diacritic(c));
        }
        let letters: usize = letter_hist.values().sum();
        let denom = letters.max(1) as f64;

        let mut word_pairs = BTreeMap::new();
        for pair in tokens.windows(2) {
            *word_pairs.entry((pair[0], pair[1])).or_default() += 1;
        }

        let (bigram_entropy, bigram_n80) = bigram_entropy_n80(text);

        Self {
            text,
            short: text.chars().count() < SHORT_CHARS,
            letters,
            ultra_short: letters <= ULTRA_SHORT_LETTERS,
            tokens,
            char_grams,
            affix_grams,
            letter_bigrams: letter_ngrams(text, 2),
            letter_hist,
            word_pairs,
            bigram_entropy,
            bigram_n80,
            hiragana_share: hira as f64 / denom,
            katakana_share: kata as f64 / denom,
            hangul_share: hangul as f64 / denom,
            vi_density: if letters == 0 { 0.0 } else { vi as f64 / denom },
        }
    }

    #[inline]
    pub fn pair_total(&self) -> usize {
        self.word_pairs.values().sum()
    }

    /// Tokens ending with one of `lang`'s morphological suffixes.
    pub fn morph_hits(&self, entry: &LangEntry) -> usize {
        if entry.morph_suffixes.is_empty() {
            return 0;
        }
        self.tokens
            .iter()
            .filter(|w| entry.morph_suffixes.iter().any(|s| w.ends_with(s)))
            .count()
    }
}

/// Entropy (bits) of the unpadded char-bigram distribution and the number of
/// most frequent bigrams covering 80% of all occurrences.
pub fn bigram_entropy_n80(text: &str) -> (f64, usize) {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 {
        return (0.0, 0);
    }
    let mut counts: BTreeMap<(char, char), usize> = BTreeMap::new();
    for w in chars.windows(2) {
        *counts.entry((w[0], w[1])).or_default() += 1;
    }
    let total = (chars.len() - 1) as f64;
    let entropy = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();

    let mut sorted: Vec<usize> = counts.into_values().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let target = 0.80 * total;
    let mut cum = 0usize;
    let mut n80 = 0;
    for (i, c) in sorted.iter().enumerate() {
        cum += c;
        if cum as f64 >= target {
            n80 = i + 1;
            break;
        }
    }
    (entropy, n80)
}

/// Share of letter-only `n`-grams (by occurrence) known to `lang`.
pub fn coverage_ratio(model: &Model, grams: &GramCounts, lang: &str, n: usize) -> f64 {
    let mut key = KeyBuf::default();
    let (mut seen, mut hit) = (0usize, 0usize);
    for (g, &c) in grams {
        seen += c;
        if model.quality_with(&mut key, lang, g, n) != OOV {
            hit += c;
        }
    }
    hit as f64 / seen.max(1) as f64
}

/// Distinct non-ASCII chars of `text` found in each language's diacritic
/// set. Languages without a hit are absent.
pub fn diacritic_hits<'m>(
    text: &str,
    diacritics: &'m HashMap<String, HashSet<char>>,
) -> HashMap<&'m str, usize> {
    if diacritics.is_empty() {
        return HashMap::new();
    }
    let present: HashSet<char> = text.chars().filter(|c| !c.is_ascii()).collect();
    diacritics
        .iter()
        .filter_map(|(lang, set)| {
            let n = present.iter().filter(|c| set.contains(c)).count();
            (n > 0).then_some((lang.as_str(), n))
        })
        .collect()
}

/// Distinct signature letters present, per language (zero counts kept).
pub fn signature_letter_hits<'m>(
    text: &str,
    signatures: &'m HashMap<String, HashSet<char>>,
) -> HashMap<&'m str, usize> {
    if signatures.is_empty() {
        return HashMap::new();
    }
    let present: HashSet<char> = text.chars().collect();
    signatures
        .iter()
        .map(|(lang, set)| (lang.as_str(), set.iter().filter(|c| present.contains(c)).count()))
        .collect()
}

/// Mean positive log-odds of signature-trie hits per language over `orders`.
///
/// Values are stored as `(lo + 100) * 100`. Fewer than three hits yields 0;
/// the mean is capped at 5.
pub fn signature_bonus(
    model: &Model,
    text: &str,
    langs: &[&str],
    orders: &[usize],
) -> HashMap<String, f64> {
    if !model.has_signatures() {
        return HashMap::new();
    }
    let mut sum: HashMap<&str, f64> = langs.iter().map(|&l| (l, 0.0)).collect();
    let mut hits: HashMap<&str, usize> = langs.iter().map(|&l| (l, 0)).collect();
    for &n in orders {
        for (g, &c) in &letter_ngrams(text, n) {
            for &lang in langs {
                let Some(qv) = model.signature_value(lang, g, n) else {
                    continue;
                };
                let lo = qv as f64 / 100.0 - 100.0;
                if lo > 0.0 {
                    *sum.entry(lang).or_default() += lo * c as f64;
                    *hits.entry(lang).or_default() += 1;
                }
            }
        }
    }
    langs
        .iter()
        .map(|&l| {
            let h = hits[l];
            let bonus = if h < SIG_MIN_HITS {
                0.0
            } else {
                (sum[l] / h as f64).min(SIG_CAP)
            };
            (l.to_owned(), bonus)
        })
        .collect()
}

/// Pearson chi-square distance of the text letter histogram from a
/// language's expected frequencies. Letters the language never uses add a
/// flat 0.4.
pub fn chi_square(hist: &BTreeMap<char, usize>, freq: &HashMap<char, f64>) -> f64 {
    let n = hist.values().sum::<usize>().max(1) as f64;
    hist.iter()
        .map(|(c, &obs)| {
            let exp = n * freq.get(c).copied().unwrap_or(0.0);
            if exp > 0.0 {
                let d = obs as f64 - exp;
                d * d / exp
            } else {
                0.4
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LangEntry;

    #[test]
    fn short_and_ultra_short() {
        let f = TextFeatures::new("ciao");
        assert!(f.short && f.ultra_short);
        assert_eq!(f.letters, 4);
        assert!(f.affix_grams.is_empty());

        let long = "la ".repeat(30);
        let f = TextFeatures::new(long.trim());
        assert!(!f.short);
        assert!(!f.ultra_short);
    }

    #[test]
    fn affixes_need_more_than_one_short_token() {
        let f = TextFeatures::new("bonjour");
        assert!(!f.affix_grams.is_empty());
        let f = TextFeatures::new("le chat");
        assert_eq!(f.affix_grams.len(), ORDERS.len());
    }

    #[test]
    fn word_pairs_and_morphology() {
        let f = TextFeatures::new("a b a b");
        assert_eq!(f.word_pairs[&("a", "b")], 2);
        assert_eq!(f.pair_total(), 3);
        let f = TextFeatures::new("kitaplar evler");
        assert_eq!(f.morph_hits(LangEntry::lookup("tr")), 2);
        assert_eq!(f.morph_hits(LangEntry::lookup("en")), 0);
    }

    #[test]
    fn script_shares() {
        let f = TextFeatures::new("ひらがなカタ");
        assert!((f.hiragana_share - 4.0 / 6.0).abs() < 1e-9);
        assert!((f.katakana_share - 2.0 / 6.0).abs() < 1e-9);
        let f = TextFeatures::new("한국어 text");
        assert!((f.hangul_share - 3.0 / 7.0).abs() < 1e-9);
        let f = TextFeatures::new("tiếng việt");
        assert!(f.vi_density > 0.12);
    }

    #[test]
    fn entropy_and_n80() {
        assert_eq!(bigram_entropy_n80("a"), (0.0, 0));
        let (h, n80) = bigram_entropy_n80("aaaa");
        assert_eq!(h, 0.0);
        assert_eq!(n80, 1);
        let (h, n80) = bigram_entropy_n80("abcd");
        assert!((h - 3f64.log2()).abs() < 1e-9);
        assert_eq!(n80, 3);
    }

    #[test]
    fn chi_square_distance() {
        let hist: BTreeMap<char, usize> = [('a', 2), ('b', 2)].into();
        let freq: HashMap<char, f64> = [('a', 0.5), ('b', 0.5)].into();
        assert_eq!(chi_square(&hist, &freq), 0.0);
        let freq: HashMap<char, f64> = [('a', 1.0)].into();
        assert!((chi_square(&hist, &freq) - (1.0 + 0.4)).abs() < 1e-9);
    }

    #[test]
    fn diacritic_and_signature_letters() {
        let map: HashMap<String, HashSet<char>> = [
            ("fr".to_string(), "éèà".chars().collect()),
            ("de".to_string(), "äöü".chars().collect()),
        ]
        .into();
        let hits = diacritic_hits("été à", &map);
        assert_eq!(hits.get("fr"), Some(&2));
        assert!(!hits.contains_key("de"));

        let sig: HashMap<String, HashSet<char>> = [("fa".to_string(), "پچ".chars().collect())].into();
        assert_eq!(signature_letter_hits("پپ", &sig)["fa"], 1);
        assert_eq!(signature_letter_hits("x", &sig)["fa"], 0);
    }
}

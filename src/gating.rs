//! Candidate gating: prune the model's language list to the languages a
//! text can plausibly be written in before any n-gram lookups happen.

use crate::calibration::hints::{iberian_hints, south_slavic_hints};
use crate::lang::script::line_script_share;
use crate::lang::{ARABIC_GROUP, IBERIAN, LangEntry, SOUTH_SLAVIC, Script, TIBETAN_PAIR, Tier, in_group};
use crate::model::{Model, SIGNATURE_ORDERS};
use crate::scoring::features::{diacritic_hits, signature_bonus};
use crate::unicode::is_letter;
use std::collections::HashMap;

/// Below this many letters only the core languages of the dominant script
/// are considered.
const SHORTLIST_LETTERS: usize = 20;
const SHORTLIST_SHARE: f64 = 0.6;
/// Below this many letters lexical hints may re-admit family members.
const HINT_READMIT_LETTERS: usize = 30;
const DIACRITIC_MIN_HITS: usize = 2;
/// Languages whose hard diacritics count as diacritic hits.
const HARD_DIACRITIC_LANGS: [&str; 4] = ["mh", "kr", "kv", "nv"];
const MARSHALLESE_MARKS: [&str; 4] = ["ṃ", "n\u{304}", "m\u{327}", "ō"];
const MARSHALLESE_LOOKALIKES: [&str; 3] = ["lv", "ty", "to"];
const TIBETAN_MIN_BONUS: f64 = 0.12;
const TIBETAN_MIN_MARGIN: f64 = 0.08;

/// Narrow `model`'s languages to the plausible candidates for `text`
/// (already detection-normalized). Never returns an empty list while the
/// model has languages.
pub fn candidate_langs<'m>(model: &'m Model, text: &str) -> Vec<&'m str> {
    let all: Vec<&'m str> = model.langs().iter().map(String::as_str).collect();
    let letters: Vec<char> = text.chars().filter(|&c| is_letter(c)).collect();
    let base = shortlist(&all, &letters);

    let mut cand: Vec<&'m str> = base
        .iter()
        .copied()
        .filter(|l| {
            let e = LangEntry::lookup(l);
            line_script_share(text, e.scripts, e.neutral_extra) >= e.min_line_script_share
        })
        .collect();
    tracing::trace!(base = base.len(), after_script = cand.len(), "gating");

    let unique: HashMap<&'m str, usize> = all
        .iter()
        .filter_map(|&l| {
            let n = LangEntry::lookup(l).unique_signature_hits(text);
            (n > 0).then_some((l, n))
        })
        .collect();
    for &l in &all {
        if unique.contains_key(l) {
            admit(&mut cand, l);
        }
    }

    if letters.len() < HINT_READMIT_LETTERS {
        readmit_by_hints(&mut cand, &all, text);
    }

    narrow_by_diacritics(&mut cand, model, text, &unique);

    let mh_strong = unique.get("mh").is_some_and(|&n| n >= 2)
        || MARSHALLESE_MARKS.iter().any(|m| text.contains(m));
    if mh_strong {
        let kept: Vec<&'m str> = cand
            .iter()
            .copied()
            .filter(|l| !MARSHALLESE_LOOKALIKES.contains(l))
            .collect();
        if !kept.is_empty() {
            cand = kept;
        }
    }

    tibetan_tiebreak(&mut cand, model, text);

    tracing::trace!(candidates = cand.len(), "gating done");
    if cand.is_empty() { base } else { cand }
}

fn admit<'m>(cand: &mut Vec<&'m str>, lang: &'m str) {
    if !cand.contains(&lang) {
        cand.push(lang);
    }
}

/// Short inputs dominated by Latin or Cyrillic letters start from that
/// script's core languages.
fn shortlist<'m>(all: &[&'m str], letters: &[char]) -> Vec<&'m str> {
    if letters.len() >= SHORTLIST_LETTERS {
        return all.to_vec();
    }
    let thr = ((SHORTLIST_SHARE * letters.len() as f64) as usize).max(1);
    let count = |s: Script| letters.iter().filter(|&&c| s.contains(c)).count();
    let tier = if count(Script::Latin) >= thr {
        Tier::CoreLatin
    } else if count(Script::Cyrillic) >= thr {
        Tier::CoreCyrillic
    } else {
        return all.to_vec();
    };
    let core: Vec<&'m str> = all
        .iter()
        .copied()
        .filter(|l| LangEntry::lookup(l).tier == tier)
        .collect();
    if core.is_empty() { all.to_vec() } else { core }
}

fn readmit_by_hints<'m>(cand: &mut Vec<&'m str>, all: &[&'m str], text: &str) {
    let known = |code: &str| all.iter().copied().find(|l| *l == code);
    if text.contains('·')
        && let Some(l) = known("ca")
    {
        admit(cand, l);
    }
    if text.contains('ñ')
        && let Some(l) = known("es")
    {
        admit(cand, l);
    }
    let ib = iberian_hints(text);
    for code in IBERIAN {
        if ib.get(code) > 0
            && let Some(l) = known(code)
        {
            admit(cand, l);
        }
    }
    let sl = south_slavic_hints(text);
    for code in SOUTH_SLAVIC {
        if sl.get(code) > 0
            && let Some(l) = known(code)
        {
            admit(cand, l);
        }
    }
}

/// Keep only languages with repeated diacritic support (or a unique
/// signature) when that subset is small enough to be meaningful.
fn narrow_by_diacritics(
    cand: &mut Vec<&str>,
    model: &Model,
    text: &str,
    unique: &HashMap<&str, usize>,
) {
    let mut hits = diacritic_hits(text, &model.addons.diacritics);
    if hits.is_empty() {
        return;
    }
    for l in HARD_DIACRITIC_LANGS {
        let hh = LangEntry::lookup(l).hard_diacritic_hits(text);
        if hh > 0 {
            *hits.entry(l).or_default() += hh;
        }
    }
    let diac: Vec<&str> = cand
        .iter()
        .copied()
        .filter(|l| hits.get(l).is_some_and(|&n| n >= DIACRITIC_MIN_HITS) || unique.contains_key(l))
        .collect();
    if diac.is_empty() {
        return;
    }
    if cand.iter().any(|l| in_group(ARABIC_GROUP, l)) {
        let keeps_arabic = diac.len() <= 2 && !diac.contains(&"ar") && cand.contains(&"ar");
        if !keeps_arabic && diac.len() < cand.len() {
            *cand = diac;
        }
    } else if diac.len() <= (cand.len() / 3).max(5) {
        *cand = diac;
    }
}

fn tibetan_tiebreak(cand: &mut Vec<&str>, model: &Model, text: &str) {
    if !model.has_signatures() || !TIBETAN_PAIR.iter().all(|l| cand.contains(l)) {
        return;
    }
    let sig = signature_bonus(model, text, TIBETAN_PAIR, &SIGNATURE_ORDERS);
    let dz = sig.get("dz").copied().unwrap_or(0.0);
    let bo = sig.get("bo").copied().unwrap_or(0.0);
    if dz < TIBETAN_MIN_BONUS && bo < TIBETAN_MIN_BONUS {
        return;
    }
    let loser = if dz - bo >= TIBETAN_MIN_MARGIN {
        "bo"
    } else if bo - dz >= TIBETAN_MIN_MARGIN {
        "dz"
    } else {
        return;
    };
    tracing::trace!(loser, dz, bo, "tibetan signature tiebreak");
    cand.retain(|l| *l != loser);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::ModelFixture;

    #[test]
    fn script_share_filters() {
        let m = ModelFixture::new().langs(&["en", "ru", "ja"]).build();
        let c = candidate_langs(&m, "this sentence is long enough to skip the shortlist");
        assert_eq!(c, ["en"]);
        let c = candidate_langs(&m, "это предложение достаточно длинное для проверки");
        assert_eq!(c, ["ru"]);
    }

    #[test]
    fn short_latin_input_uses_core_languages() {
        let m = ModelFixture::new().langs(&["en", "fy", "de"]).build();
        assert_eq!(candidate_langs(&m, "hallo"), ["en", "de"]);
        // Without core languages the full list is kept.
        let m = ModelFixture::new().langs(&["fy", "lb"]).build();
        assert_eq!(candidate_langs(&m, "hallo"), ["fy", "lb"]);
    }

    #[test]
    fn unique_signature_readmits() {
        let m = ModelFixture::new().langs(&["en", "kv", "ru"]).build();
        let c = candidate_langs(&m, "мӧй тайӧ");
        assert!(c.contains(&"kv"));
    }

    #[test]
    fn iberian_hints_readmit_on_short_text() {
        let m = ModelFixture::new().langs(&["es", "gl", "pt"]).build();
        let c = candidate_langs(&m, "niño");
        assert!(c.contains(&"es"));
    }

    #[test]
    fn never_empty() {
        let m = ModelFixture::new().langs(&["en", "de"]).build();
        assert_eq!(candidate_langs(&m, "ไทย ภาษา"), ["en", "de"]);
        assert_eq!(candidate_langs(&m, ""), ["en", "de"]);
    }

    #[test]
    fn diacritic_narrowing() {
        let m = ModelFixture::new()
            .langs(&["de", "en", "fr", "it", "nl", "es", "pt"])
            .addon("diacritic_map.json", r#"{"de": "äöüß", "fr": "éèàç"}"#)
            .build();
        let c = candidate_langs(&m, "über größe und schön, der müde bär läuft");
        assert_eq!(c, ["de"]);
    }

    #[test]
    fn marshallese_marks_drop_lookalikes() {
        let m = ModelFixture::new().langs(&["mh", "lv", "ty"]).build();
        let c = candidate_langs(&m, "kōjeraan ṃōṃō");
        assert!(c.contains(&"mh"));
        assert!(!c.contains(&"lv") && !c.contains(&"ty"));
    }
}

//! Lexical hint detectors for confusable language families.
//!
//! Two kinds of hints live here:
//!
//! - integer family scores ([`iberian_hints`], [`south_slavic_hints`]) used by
//!   gating to re-admit short-text candidates and by scoring as a bonus;
//! - log-linear features ([`LogLinearHints`]) added to calibration logits when
//!   two or more candidates share a confusion cluster.

use crate::model::ngram::words;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::LazyLock;

macro_rules! rx {
    ($($name:ident = $re:literal;)*) => {
        $(static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());)*
    };
}

rx! {
    GL_XVOW = r"\bx[aeiouáéíóú]\w*";
    GL_HAI = r"\bhai\b";
    GL_DIAC = r"[áéíóúñ]";
    AN_YE = r"\bye\b";
    AN_EN_OA = r"\ben\s+[oa]\b";
    AN_DART = r"\bd['’]\s?(?:o|a|os|as)\b";
    AN_LUENGA = r"\bluenga\b";
    AN_ARAGON = r"\barag[oó]n(?:és)?\b";
    CA_NY = r"\b\p{L}+ny[aeiouáéíóúàèìòùäëïöü]\p{L}*\b";

    SL_SCINA = r"\b\w+ščina\b";
    SL_NAME = r"\bslovenij[aeo]\b|\bslovensk\w*";
    SL_KI = r"\bki\b";
    CS_STINA = r"\b\w+ština\b";
    CS_STRONG_DIAC = r"[ěřůťďň]";
    HR_AUTONYM = r"\bhrvatsk\w*\b";
    HR_REPUBLIC = r"\brepublik[ae]\s+hrvatsk[aeio]\b";
    HR_GEONYM = r"\b(?:zagreb|dalmat\w*|dubrova\w*)\b";
    HR_STO = r"\bšto\b";
    BS_ADJ = r"\bbosansk\w*\b|\bbošnja\w*\b";
    BS_GEO = r"\bbosn[aeiouy]\b|\bhercegovin\w*\b";
    STA = r"\bšta\b";
    SR_CYR = r"[ђћјљњџ]";
    SR_DALI = r"\bda\s+li\b";
    SR_EKAV = r"\b(?:mleko|lepo|vreme|sreć\w*|beograd\w*)\b";

    ID_INDONESIA = r"\bindonesi\w*\b";
    ID_SEDANGKAN = r"\bsedangkan\b";
    ID_KARENA = r"\bkarena\b";
    MS_MALAYSIA = r"\bmalaysi\w*\b";
    MS_KERANA = r"\bkerana\b";
    TY_TAHITI = r"\btahiti\b|\bmā’ohi\b|\bfenua\b";
    MI_WH = r"\bwh\w+";
    NN_NYNORSK = r"\bnynorsk\b";
    NN_IKKJE = r"\bikkje\b|\bikkji\b";
    NN_EIN_DEI = r"\bein\b.*\bdei\b";
    NO_IKKE = r"\bikke\b";
    OC_TOKENS = r"\boccitan\b|\bl[’']occitan\b|\blenga\b|\bdins\b|\bòc\b";
    PT_CAO = r"(?:\b|\w)(?:ção|ções)\b";
    PT_TOKENS = r"\b(?:e|de|que|do|da|dos|das)\b";
    RN_BURUNDI = r"\bburundi\b|\buburundi\b|\bikirundi\b";
    RW_RWANDA = r"\brwanda\b|\bkinyarwanda\b|\babanyarwanda\b";
    AA_AFAR = r"\bafar(?:-ta)?\b|\bqafar\b";
    KG_KIKONGO = r"\bkikongo\b";
    LU_KILUBA = r"\bkiluba\b|\bluba\b";
    NV_DINE = r"\bdiné\b|\bdiné bizaad\b";
}

const CA_STRONG: &[&str] = &[
    "els", "les", "amb", "fins", "sóc", "ets", "és", "som", "sou", "són", "aquest", "aquesta",
    "aquests", "aquestes", "això", "aquí", "dels", "als", "pels", "pel",
];
const ES_STRONG: &[&str] = &[
    "del", "al", "los", "las", "una", "unos", "unas", "este", "esta", "estos", "estas", "está",
    "están", "hay",
];
const GL_STRONG: &[&str] = &["unha", "xente", "xeral", "xornal"];
const CS_WORDS: &[&str] = &["český", "čeština", "praha", "praze", "který", "protože", "neboť"];
const SL_DUAL: &[&str] = &["sva", "sta"];
const SL_AUX: &[&str] = &["sem", "si", "je", "smo", "ste", "so"];

/// Family scores are capped so that a single keyword-dense sentence cannot
/// dominate the n-gram evidence.
const HINT_CAP: i32 = 6;
/// Texts at least this many chars long get a bonus for mixed evidence kinds.
const MIX_MIN_CHARS: usize = 60;

// ────────────────────────────────────────────────────────────────────────────
// Family scores
// ────────────────────────────────────────────────────────────────────────────

/// Per-language integer hint scores for one family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintScores(SmallVec<[(&'static str, i32); 5]>);

impl HintScores {
    fn new(langs: &[&'static str]) -> Self {
        Self(langs.iter().map(|&l| (l, 0)).collect())
    }

    fn add(&mut self, lang: &str, n: i32) {
        if let Some(slot) = self.0.iter_mut().find(|(l, _)| *l == lang) {
            slot.1 += n;
        }
    }

    fn set(&mut self, lang: &str, n: i32) {
        if let Some(slot) = self.0.iter_mut().find(|(l, _)| *l == lang) {
            slot.1 = n;
        }
    }

    /// Add one point per language whose evidence spans two or more kinds.
    fn mix(&mut self, text: &str, kinds: &[(&str, usize)]) {
        if text.chars().count() < MIX_MIN_CHARS {
            return;
        }
        for &(lang, n) in kinds {
            if n >= 2 {
                self.add(lang, 1);
            }
        }
    }

    fn capped(mut self) -> Self {
        for slot in &mut self.0 {
            slot.1 = slot.1.min(HINT_CAP);
        }
        self
    }

    pub fn get(&self, lang: &str) -> i32 {
        self.0.iter().find(|(l, _)| *l == lang).map_or(0, |(_, n)| *n)
    }

    /// Languages with a positive score, in family order.
    pub fn positive(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().filter(|(_, n)| *n > 0).map(|(l, _)| *l)
    }
}

fn token_set(text: &str) -> HashSet<&str> {
    words(text).collect()
}

fn kinds(flags: &[bool]) -> usize {
    flags.iter().filter(|&&f| f).count()
}

fn any_of(tokens: &HashSet<&str>, list: &[&str]) -> bool {
    list.iter().any(|w| tokens.contains(w))
}

/// Spanish, Galician, Aragonese and Catalan cues.
pub fn iberian_hints(text: &str) -> HintScores {
    let toks = token_set(text);
    let mut h = HintScores::new(&["es", "gl", "an", "ca"]);

    let es_strong = any_of(&toks, ES_STRONG);
    let gl_strong = any_of(&toks, GL_STRONG);
    let gl_xvow = GL_XVOW.is_match(text);
    let gl_hai = GL_HAI.is_match(text);
    let gl_diac = GL_DIAC.is_match(text);
    let an_ye = AN_YE.is_match(text);
    let an_en_oa = AN_EN_OA.is_match(text);
    let an_dart = AN_DART.is_match(text);
    let an_luenga = AN_LUENGA.is_match(text);
    let an_aragon = AN_ARAGON.is_match(text);
    let ca_strong = any_of(&toks, CA_STRONG);
    let ca_ny = CA_NY.is_match(text);

    for (hit, lang, n) in [
        (es_strong, "es", 1),
        (gl_strong, "gl", 2),
        (gl_xvow, "gl", 1),
        (gl_hai, "gl", 1),
        (gl_diac, "gl", 1),
        (an_ye, "an", 3),
        (an_en_oa, "an", 2),
        (an_dart, "an", 2),
        (an_luenga, "an", 1),
        (an_aragon, "an", 1),
        (ca_strong, "ca", 2),
        (ca_ny, "ca", 1),
    ] {
        if hit {
            h.add(lang, n);
        }
    }

    h.mix(
        text,
        &[
            ("es", kinds(&[es_strong])),
            ("gl", kinds(&[gl_strong, gl_xvow, gl_diac, gl_hai])),
            ("an", kinds(&[an_ye, an_en_oa || an_dart, an_luenga || an_aragon])),
            ("ca", kinds(&[ca_strong, ca_ny])),
        ],
    );
    h.capped()
}

/// Bosnian, Croatian, Serbian, Slovenian and Czech cues.
pub fn south_slavic_hints(text: &str) -> HintScores {
    let toks = token_set(text);
    let mut h = HintScores::new(&["bs", "hr", "sr", "sl", "cs"]);

    let cs_stina = CS_STINA.is_match(text);
    let cs_diac = CS_STRONG_DIAC.is_match(text);
    let sl_scina = SL_SCINA.is_match(text);
    let sl_dual = any_of(&toks, SL_DUAL);
    let sl_aux = any_of(&toks, SL_AUX);
    let hr_autonym = HR_AUTONYM.is_match(text);
    let hr_republic = HR_REPUBLIC.is_match(text);
    let hr_geonym = HR_GEONYM.is_match(text);
    let hr_sto = HR_STO.is_match(text);
    let bs_adj = BS_ADJ.is_match(text);
    let bs_geo = BS_GEO.is_match(text);
    let sta = STA.is_match(text);
    let sr_cyr = SR_CYR.is_match(text);
    let sr_dali = SR_DALI.is_match(text);
    let sr_ekav = SR_EKAV.is_match(text);

    for (hit, lang, n) in [
        (cs_stina, "cs", 2),
        (cs_diac, "cs", 3),
        (any_of(&toks, CS_WORDS), "cs", 1),
        (sl_scina, "sl", 4),
        (sl_dual, "sl", 3),
        (sl_aux, "sl", 1),
        (SL_NAME.is_match(text), "sl", 2),
        (SL_KI.is_match(text), "sl", 1),
        (hr_autonym, "hr", 5),
        (hr_republic, "hr", 2),
        (hr_geonym, "hr", 1),
        (hr_sto, "hr", 2),
        (bs_adj, "bs", 4),
        (bs_geo, "bs", 1),
        (sta, "bs", 1),
        (sr_cyr, "sr", 3),
        (sr_dali, "sr", 2),
        (sr_ekav, "sr", 2),
        (sta, "sr", 1),
    ] {
        if hit {
            h.add(lang, n);
        }
    }

    h.mix(
        text,
        &[
            ("cs", kinds(&[cs_stina, cs_diac])),
            ("sl", kinds(&[sl_scina, sl_dual, sl_aux])),
            ("hr", kinds(&[hr_autonym, hr_republic || hr_geonym, hr_sto])),
            ("bs", kinds(&[bs_adj, bs_geo, sta])),
            ("sr", kinds(&[sr_cyr, sr_dali, sr_ekav])),
        ],
    );

    if h.get("hr") >= 5 && bs_geo {
        h.set("bs", (h.get("bs") - 2).max(0));
    }
    if sl_scina && h.get("cs") >= 2 {
        h.add("cs", -1);
    }
    h.capped()
}

// ────────────────────────────────────────────────────────────────────────────
// Log-linear cluster features
// ────────────────────────────────────────────────────────────────────────────

/// Logit weight of every cluster feature.
#[derive(Debug, Clone, PartialEq)]
pub struct HintWeights {
    pub scina: f64,
    pub stina: f64,
    pub dual: f64,
    pub sto: f64,
    pub sta: f64,
    pub cs_diac: f64,
    pub hr_autonym: f64,
    pub sr_dali: f64,
    pub sl_aux: f64,
    pub id_indonesia: f64,
    pub id_sedangkan: f64,
    pub id_karena: f64,
    pub ms_malaysia: f64,
    pub ms_kerana: f64,
    pub ty_tahiti: f64,
    pub mi_wh: f64,
    pub nn_nynorsk: f64,
    pub nn_ikkje: f64,
    pub nn_ein_dei: f64,
    pub no_ikke: f64,
    pub oc_tokens: f64,
    pub pt_tokens: f64,
    pub rn_burundi: f64,
    pub rw_rwanda: f64,
    pub aa_autonym: f64,
    pub kg_autonym: f64,
    pub lu_autonym: f64,
    pub nv_autonym: f64,
}

impl Default for HintWeights {
    fn default() -> Self {
        Self {
            scina: 0.9,
            stina: 0.6,
            dual: 0.8,
            sto: 0.7,
            sta: 0.5,
            cs_diac: 1.1,
            hr_autonym: 1.2,
            sr_dali: 0.7,
            sl_aux: 0.3,
            id_indonesia: 1.0,
            id_sedangkan: 0.6,
            id_karena: 0.5,
            ms_malaysia: 1.0,
            ms_kerana: 0.6,
            ty_tahiti: 1.1,
            mi_wh: 0.7,
            nn_nynorsk: 1.2,
            nn_ikkje: 0.9,
            nn_ein_dei: 0.5,
            no_ikke: 0.8,
            oc_tokens: 1.2,
            pt_tokens: 0.6,
            rn_burundi: 1.2,
            rw_rwanda: 1.2,
            aa_autonym: 1.0,
            kg_autonym: 1.0,
            lu_autonym: 0.8,
            nv_autonym: 1.0,
        }
    }
}

/// Every detector evaluated once per text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintFlags {
    pub sl_scina: bool,
    pub sl_dual: bool,
    pub sl_aux: bool,
    pub cs_stina: bool,
    pub cs_diac: bool,
    pub hr_autonym: bool,
    pub hr_sto: bool,
    pub sta: bool,
    pub sr_cyr_or_dali: bool,
    pub id_indonesia: bool,
    pub id_sedangkan: bool,
    pub id_karena: bool,
    pub ms_malaysia: bool,
    pub ms_kerana: bool,
    pub ty_tahiti: bool,
    pub mi_wh: bool,
    pub nn_nynorsk: bool,
    pub nn_ikkje: bool,
    pub nn_ein_dei: bool,
    pub no_ikke: bool,
    pub oc_tokens: bool,
    pub pt_tokens: bool,
    pub rn_burundi: bool,
    pub rw_rwanda: bool,
    pub aa_autonym: bool,
    pub kg_autonym: bool,
    pub lu_autonym: bool,
    pub nv_autonym: bool,
}

impl HintFlags {
    pub fn detect(text: &str) -> Self {
        let toks = token_set(text);
        Self {
            sl_scina: SL_SCINA.is_match(text),
            sl_dual: any_of(&toks, SL_DUAL),
            sl_aux: toks.contains("ki") || any_of(&toks, SL_AUX),
            cs_stina: CS_STINA.is_match(text),
            cs_diac: CS_STRONG_DIAC.is_match(text),
            hr_autonym: HR_AUTONYM.is_match(text),
            hr_sto: HR_STO.is_match(text),
            sta: STA.is_match(text),
            sr_cyr_or_dali: SR_CYR.is_match(text) || SR_DALI.is_match(text),
            id_indonesia: ID_INDONESIA.is_match(text),
            id_sedangkan: ID_SEDANGKAN.is_match(text),
            id_karena: ID_KARENA.is_match(text),
            ms_malaysia: MS_MALAYSIA.is_match(text),
            ms_kerana: MS_KERANA.is_match(text),
            ty_tahiti: TY_TAHITI.is_match(text),
            mi_wh: MI_WH.is_match(text),
            nn_nynorsk: NN_NYNORSK.is_match(text),
            nn_ikkje: NN_IKKJE.is_match(text),
            nn_ein_dei: NN_EIN_DEI.is_match(text),
            no_ikke: NO_IKKE.is_match(text),
            oc_tokens: OC_TOKENS.is_match(text),
            pt_tokens: PT_CAO.is_match(text) || PT_TOKENS.is_match(text),
            rn_burundi: RN_BURUNDI.is_match(text),
            rw_rwanda: RW_RWANDA.is_match(text),
            aa_autonym: AA_AFAR.is_match(text),
            kg_autonym: KG_KIKONGO.is_match(text),
            lu_autonym: LU_KILUBA.is_match(text),
            nv_autonym: NV_DINE.is_match(text),
        }
    }
}

/// One feature: when `fires` holds for a text, `weight` is added to the
/// logit of `lang`.
struct HintRule {
    lang: &'static str,
    fires: fn(&HintFlags) -> bool,
    weight: fn(&HintWeights) -> f64,
}

macro_rules! rules {
    ($($lang:literal : $flag:ident => $w:ident),* $(,)?) => {
        &[$(HintRule { lang: $lang, fires: |f| f.$flag, weight: |w| w.$w }),*]
    };
}

static RULES: &[HintRule] = rules![
    "sl": sl_scina => scina,
    "sl": sl_dual => dual,
    "sl": sl_aux => sl_aux,
    "cs": cs_stina => stina,
    "cs": cs_diac => cs_diac,
    "hr": hr_autonym => hr_autonym,
    "hr": hr_sto => sto,
    "sr": sta => sta,
    "sr": sr_cyr_or_dali => sr_dali,
    "bs": sta => sta,
    "id": id_indonesia => id_indonesia,
    "id": id_sedangkan => id_sedangkan,
    "id": id_karena => id_karena,
    "ms": ms_malaysia => ms_malaysia,
    "ms": ms_kerana => ms_kerana,
    "ty": ty_tahiti => ty_tahiti,
    "mi": mi_wh => mi_wh,
    "nn": nn_nynorsk => nn_nynorsk,
    "nn": nn_ikkje => nn_ikkje,
    "nn": nn_ein_dei => nn_ein_dei,
    "no": no_ikke => no_ikke,
    "oc": oc_tokens => oc_tokens,
    "pt": pt_tokens => pt_tokens,
    "rn": rn_burundi => rn_burundi,
    "rw": rw_rwanda => rw_rwanda,
    "aa": aa_autonym => aa_autonym,
    "kg": kg_autonym => kg_autonym,
    "lu": lu_autonym => lu_autonym,
    "nv": nv_autonym => nv_autonym,
];

/// Sum of cluster-feature weights per language.
#[derive(Debug, Clone, Default)]
pub struct LogLinearHints {
    pub weights: HintWeights,
}

impl LogLinearHints {
    pub fn new(weights: HintWeights) -> Self {
        Self { weights }
    }

    pub fn features(&self, flags: &HintFlags, lang: &str) -> f64 {
        RULES
            .iter()
            .filter(|r| r.lang == lang && (r.fires)(flags))
            .map(|r| (r.weight)(&self.weights))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iberian_family_scores() {
        let h = iberian_hints("els nens i les nenes");
        assert_eq!(h.get("ca"), 2);
        assert_eq!(h.get("es"), 0);
        assert_eq!(h.positive().collect::<Vec<_>>(), ["ca"]);

        let h = iberian_hints("hai unha xente");
        assert_eq!(h.get("gl"), 4);

        let h = iberian_hints("ye en o lugar");
        assert_eq!(h.get("an"), 5);

        assert_eq!(iberian_hints("los perros").get("es"), 1);
        assert_eq!(iberian_hints("").positive().count(), 0);
    }

    #[test]
    fn catalan_ny_cluster() {
        assert_eq!(iberian_hints("la companyia").get("ca"), 1);
        assert_eq!(iberian_hints("nyc").get("ca"), 0);
    }

    #[test]
    fn south_slavic_family_scores() {
        let h = south_slavic_hints("hrvatski jezik");
        assert_eq!(h.get("hr"), 5);
        let h = south_slavic_hints("slovenščina");
        assert_eq!(h.get("sl"), 4);
        let h = south_slavic_hints("řeka");
        assert_eq!(h.get("cs"), 3);
        let h = south_slavic_hints("šta je");
        assert_eq!(h.get("bs"), 1);
        assert_eq!(h.get("sr"), 1);
        assert_eq!(h.get("sl"), 1);
    }

    #[test]
    fn croatian_autonym_demotes_bosnian_geonym() {
        let h = south_slavic_hints("hrvatska i bosna");
        assert_eq!(h.get("hr"), 5);
        assert_eq!(h.get("bs"), 0);
    }

    #[test]
    fn scores_are_capped() {
        let h = south_slavic_hints("hrvatska republika hrvatska zagreb što");
        assert_eq!(h.get("hr"), HINT_CAP);
    }

    #[test]
    fn mixed_evidence_bonus_needs_long_text() {
        let short = "hai unha";
        assert_eq!(iberian_hints(short).get("gl"), 3);
        let long = format!("hai unha {}", "palabra ".repeat(8));
        assert_eq!(iberian_hints(&long).get("gl"), 4);
    }

    #[test]
    fn log_linear_features() {
        let hints = LogLinearHints::default();
        let f = HintFlags::detect("eg veit ikkje kva nynorsk er");
        assert!((hints.features(&f, "nn") - 2.1).abs() < 1e-9);
        assert_eq!(hints.features(&f, "no"), 0.0);
        let f = HintFlags::detect("ini karena indonesia");
        assert!((hints.features(&f, "id") - 1.5).abs() < 1e-9);
        assert_eq!(hints.features(&f, "en"), 0.0);
    }

    #[test]
    fn weights_are_overridable() {
        let hints = LogLinearHints::new(HintWeights {
            no_ikke: 3.0,
            ..HintWeights::default()
        });
        let f = HintFlags::detect("det er ikke sant");
        assert_eq!(hints.features(&f, "no"), 3.0);
    }
}

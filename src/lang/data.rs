use crate::lang::script::{ARABIC_NEUTRAL, HEBREW_NEUTRAL};
use crate::lang::{Lang, LangEntry, Script, Tier};

use paste::paste;
use phf::{Map, phf_map};

/// ---------------------------------------------------------------------------
///    Macro – generates everything from a single table
/// ---------------------------------------------------------------------------
/// Each row names the ISO 639-1 code, the English name, the scripts, and any
/// field that differs from [`LangEntry::BASE`].
macro_rules! define_languages {
    ($(
        $code:ident, $code_str:literal, $name:literal, [ $($script:ident),+ $(,)? ]
        $(, $field:ident : $value:expr)* ;
    )*) => {
        // Public `Lang` constants
        $(
            pub const $code: Lang = Lang { code: $code_str, name: $name };
        )*

        // Per-language entries
        $(
            paste! {
                const [<$code _ENTRY>]: LangEntry = LangEntry {
                    code: $code_str,
                    name: $name,
                    scripts: &[$(Script::$script),+],
                    $($field: $value,)*
                    ..LangEntry::BASE
                };
            }
        )*

        // Global lookup table (public)
        paste! {
            pub static LANG_TABLE: Map<&'static str, LangEntry> = phf_map! {
                $(
                    $code_str => [<$code _ENTRY>],
                )*
            };
        }

        pub static ALL_LANGS: &[Lang] = &[$($code),*];

        // Helper: `Lang::from_code`
        pub fn from_code(code: &str) -> Option<Lang> {
            let lower = code.to_lowercase();
            match lower.as_str() {
                $(
                    $code_str => Some($code),
                )*
                _ => None,
            }
        }
    };
}

const VI_DIACRITICS: &[char] = &[
    'ă', 'â', 'ê', 'ô', 'ơ', 'ư', 'Ă', 'Â', 'Ê', 'Ô', 'Ơ', 'Ư', 'à', 'ả', 'ã', 'á', 'ạ', 'ằ', 'ẳ',
    'ẵ', 'ắ', 'ặ', 'ầ', 'ẩ', 'ẫ', 'ấ', 'ậ', 'è', 'ẻ', 'ẽ', 'é', 'ẹ', 'ề', 'ể', 'ễ', 'ế', 'ệ', 'ì',
    'ỉ', 'ĩ', 'í', 'ị', 'ò', 'ỏ', 'õ', 'ó', 'ọ', 'ồ', 'ổ', 'ỗ', 'ố', 'ộ', 'ờ', 'ở', 'ỡ', 'ớ', 'ợ',
    'ù', 'ủ', 'ũ', 'ú', 'ụ', 'ừ', 'ử', 'ữ', 'ứ', 'ự', 'ỳ', 'ỷ', 'ỹ', 'ý', 'ỵ', 'đ',
];

/// Vietnamese tone and vowel marks, used for the diacritic-density bonus.
pub fn is_vietnamese_diacritic(c: char) -> bool {
    VI_DIACRITICS.contains(&c)
}

const SOUTH_SLAVIC_HARD: &[&str] = &["ć", "č", "đ", "ž", "š"];
const POLYNESIAN_NEGATIVE: &[&str] = &["\u{327}", "m\u{327}", "l\u{304}", "n\u{304}", "ṃ", "ļ", "ō"];

// ---------------------------------------------------------------------------
//    Language definitions (single source of truth)
//    Every ISO 639-1 code is listed; unlisted fields come from `LangEntry::BASE`.
// ---------------------------------------------------------------------------
define_languages! {
    AA, "aa", "Afar", [Latin];
    AB, "ab", "Abkhazian", [Cyrillic], prior: 0.4, tier: Tier::RareCyrillic,
        hard_diacritics: &["ә", "ҽ", "ӡ", "ҵ", "қ", "ҳ", "ԥ", "ҭ"];
    AE, "ae", "Avestan", [Latin];
    AF, "af", "Afrikaans", [Latin];
    AK, "ak", "Akan", [Latin];
    AM, "am", "Amharic", [Ethiopic];
    AN, "an", "Aragonese", [Latin], prior: 0.2;
    AR, "ar", "Arabic", [Arabic], prior: 2.5, neutral_extra: ARABIC_NEUTRAL;
    AS, "as", "Assamese", [Bengali];
    AV, "av", "Avaric", [Cyrillic], prior: 0.2, tier: Tier::RareCyrillic,
        hard_diacritics: &["Ӏ", "ӏ"];
    AY, "ay", "Aymara", [Latin];
    AZ, "az", "Azerbaijani", [Latin];
    BA, "ba", "Bashkir", [Cyrillic], prior: 0.4, tier: Tier::RareCyrillic,
        hard_diacritics: &["ә", "ө", "ү", "ҙ", "ҫ", "ғ", "ҡ", "ң"];
    BE, "be", "Belarusian", [Cyrillic], tier: Tier::CoreCyrillic,
        exclusive_letters: &['ў', 'і', 'ё', 'э'];
    BG, "bg", "Bulgarian", [Cyrillic], tier: Tier::CoreCyrillic,
        exclusive_letters: &['ъ', 'щ', 'ѝ'];
    BH, "bh", "Bihari", [Latin];
    BI, "bi", "Bislama", [Latin];
    BM, "bm", "Bambara", [Latin];
    BN, "bn", "Bengali", [Bengali], prior: 1.6;
    BO, "bo", "Tibetan", [Tibetan], min_line_script_share: 0.65, enable_affixes: false;
    BR, "br", "Breton", [Latin];
    BS, "bs", "Bosnian", [Latin], hard_diacritics: SOUTH_SLAVIC_HARD;
    CA, "ca", "Catalan", [Latin];
    CE, "ce", "Chechen", [Cyrillic], prior: 0.35, tier: Tier::RareCyrillic,
        hard_diacritics: &["Ӏ", "ӏ"];
    CH, "ch", "Chamorro", [Latin];
    CO, "co", "Corsican", [Latin];
    CR, "cr", "Cree", [Latin];
    CS, "cs", "Czech", [Latin], tier: Tier::CoreLatin,
        hard_diacritics: &["ě", "ř", "ů", "ť", "ď", "ň"];
    CU, "cu", "Church Slavic", [Latin];
    CV, "cv", "Chuvash", [Cyrillic];
    CY, "cy", "Welsh", [Latin];
    DA, "da", "Danish", [Latin], tier: Tier::CoreLatin;
    DE, "de", "German", [Latin], prior: 2.5, tier: Tier::CoreLatin;
    DV, "dv", "Divehi", [Thaana], min_line_script_share: 0.70, enable_affixes: false;
    DZ, "dz", "Dzongkha", [Tibetan], min_line_script_share: 0.65, enable_affixes: false;
    EE, "ee", "Ewe", [Latin];
    EL, "el", "Greek", [Greek];
    EN, "en", "English", [Latin], prior: 3.0, tier: Tier::CoreLatin;
    EO, "eo", "Esperanto", [Latin];
    ES, "es", "Spanish", [Latin], prior: 2.5, tier: Tier::CoreLatin;
    ET, "et", "Estonian", [Latin];
    EU, "eu", "Basque", [Latin];
    FA, "fa", "Persian", [Arabic], neutral_extra: ARABIC_NEUTRAL, keep_zwnj: true;
    FF, "ff", "Fulah", [Latin];
    FI, "fi", "Finnish", [Latin], tier: Tier::CoreLatin;
    FJ, "fj", "Fijian", [Latin];
    FO, "fo", "Faroese", [Latin];
    FR, "fr", "French", [Latin], prior: 2.5, tier: Tier::CoreLatin;
    FY, "fy", "Western Frisian", [Latin], tier: Tier::RareLatin;
    GA, "ga", "Irish", [Latin], tier: Tier::RareLatin;
    GD, "gd", "Scottish Gaelic", [Latin], tier: Tier::RareLatin;
    GL, "gl", "Galician", [Latin], prior: 0.2;
    GN, "gn", "Guarani", [Latin];
    GU, "gu", "Gujarati", [Gujarati];
    GV, "gv", "Manx", [Latin];
    HA, "ha", "Hausa", [Latin];
    HE, "he", "Hebrew", [Hebrew], neutral_extra: HEBREW_NEUTRAL;
    HI, "hi", "Hindi", [Devanagari], prior: 1.6;
    HO, "ho", "Hiri Motu", [Latin];
    HR, "hr", "Croatian", [Latin], hard_diacritics: SOUTH_SLAVIC_HARD;
    HT, "ht", "Haitian", [Latin], tier: Tier::RareLatin;
    HU, "hu", "Hungarian", [Latin], tier: Tier::CoreLatin;
    HY, "hy", "Armenian", [Armenian];
    HZ, "hz", "Herero", [Latin];
    IA, "ia", "Interlingua", [Latin];
    ID, "id", "Indonesian", [Latin];
    IE, "ie", "Interlingue", [Latin];
    IG, "ig", "Igbo", [Latin];
    II, "ii", "Sichuan Yi", [Yi], min_line_script_share: 0.70, enable_affixes: false;
    IK, "ik", "Inupiaq", [Latin];
    IO, "io", "Ido", [Latin];
    IS, "is", "Icelandic", [Latin];
    IT, "it", "Italian", [Latin], prior: 2.5, tier: Tier::CoreLatin;
    IU, "iu", "Inuktitut", [Latin, CanadianAboriginal];
    JA, "ja", "Japanese", [Han, Hiragana, Katakana], prior: 2.5,
        min_line_script_share: 0.55, enable_affixes: false;
    JV, "jv", "Javanese", [Latin];
    KA, "ka", "Georgian", [Georgian];
    KG, "kg", "Kongo", [Latin];
    KI, "ki", "Kikuyu", [Latin], tier: Tier::RareLatin;
    KJ, "kj", "Kuanyama", [Latin];
    KK, "kk", "Kazakh", [Cyrillic, Latin];
    KL, "kl", "Kalaallisut", [Latin];
    KM, "km", "Khmer", [Khmer];
    KN, "kn", "Kannada", [Kannada];
    KO, "ko", "Korean", [Hangul, Han], prior: 2.5, enable_affixes: false;
    KR, "kr", "Kanuri", [Latin, Arabic], neutral_extra: ARABIC_NEUTRAL,
        hard_diacritics: &["ƙ", "Ƙ"], unique_signature: &["ƙ", "Ƙ"];
    KS, "ks", "Kashmiri", [Arabic, Devanagari], keep_zwnj: true;
    KU, "ku", "Kurdish", [Latin, Arabic], neutral_extra: ARABIC_NEUTRAL, keep_zwnj: true,
        hard_diacritics: &["î", "û", "ê", "Î", "Û", "Ê"];
    KV, "kv", "Komi", [Cyrillic], prior: 0.3, tier: Tier::RareCyrillic,
        hard_diacritics: &["ӧ", "Ӧ", "ї", "ӧ̈"], exclusive_letters: &['ӧ'],
        unique_signature: &["ӧ"];
    KW, "kw", "Cornish", [Latin];
    KY, "ky", "Kyrgyz", [Cyrillic];
    LA, "la", "Latin", [Latin];
    LB, "lb", "Luxembourgish", [Latin], tier: Tier::RareLatin;
    LG, "lg", "Ganda", [Latin];
    LI, "li", "Limburgish", [Latin], prior: 0.3, tier: Tier::RareLatin;
    LN, "ln", "Lingala", [Latin];
    LO, "lo", "Lao", [Lao];
    LT, "lt", "Lithuanian", [Latin];
    LU, "lu", "Luba-Katanga", [Latin];
    LV, "lv", "Latvian", [Latin],
        negative_chars: &["m\u{327}", "l\u{304}", "n\u{304}", "ṃ", "ō", "ḷ"];
    MG, "mg", "Malagasy", [Latin], tier: Tier::RareLatin;
    MH, "mh", "Marshallese", [Latin],
        hard_diacritics: &[
            "M\u{327}", "\u{327}", "ā", "ē", "ī", "ō", "ū", "ļ", "l\u{304}", "n\u{304}",
            "m\u{304}", "ṃ", "ḷ", "ņ",
        ],
        unique_signature: &["M\u{327}", "m\u{327}", "\u{327}", "ṃ", "l\u{304}", "n\u{304}", "ō", "ḷ"];
    MI, "mi", "Maori", [Latin];
    MK, "mk", "Macedonian", [Cyrillic], tier: Tier::CoreCyrillic,
        exclusive_letters: &['ѓ', 'ќ', 'ѕ', 'љ', 'њ', 'ј', 'џ'];
    ML, "ml", "Malayalam", [Malayalam];
    MN, "mn", "Mongolian", [Cyrillic];
    MR, "mr", "Marathi", [Devanagari];
    MS, "ms", "Malay", [Latin];
    MT, "mt", "Maltese", [Latin], tier: Tier::RareLatin;
    MY, "my", "Burmese", [Myanmar];
    NA, "na", "Nauru", [Latin];
    NB, "nb", "Norwegian Bokmål", [Latin];
    ND, "nd", "North Ndebele", [Latin];
    NE, "ne", "Nepali", [Devanagari];
    NG, "ng", "Ndonga", [Latin];
    NL, "nl", "Dutch", [Latin], prior: 1.6, tier: Tier::CoreLatin;
    NN, "nn", "Norwegian Nynorsk", [Latin];
    NO, "no", "Norwegian", [Latin], tier: Tier::CoreLatin;
    NR, "nr", "South Ndebele", [Latin];
    NV, "nv", "Navajo", [Latin], unique_signature: &["ł", "ʼ", "ą", "į", "ń"];
    NY, "ny", "Chichewa", [Latin];
    OC, "oc", "Occitan", [Latin];
    OJ, "oj", "Ojibwa", [Latin];
    OM, "om", "Oromo", [Latin];
    OR, "or", "Oriya", [Oriya];
    OS, "os", "Ossetian", [Cyrillic], prior: 0.4, tier: Tier::RareCyrillic,
        hard_diacritics: &["ӕ", "Ӕ"];
    PA, "pa", "Punjabi", [Gurmukhi];
    PI, "pi", "Pali", [Latin];
    PL, "pl", "Polish", [Latin], prior: 1.6, tier: Tier::CoreLatin,
        morph_suffixes: &["owie", "ami", "ego", "ych"], morph_bonus: 0.25;
    PS, "ps", "Pashto", [Arabic], neutral_extra: ARABIC_NEUTRAL, keep_zwnj: true;
    PT, "pt", "Portuguese", [Latin], prior: 2.0, tier: Tier::CoreLatin,
        morph_suffixes: &["ções", "mente"], morph_bonus: 0.20;
    QU, "qu", "Quechua", [Latin];
    RM, "rm", "Romansh", [Latin], tier: Tier::RareLatin;
    RN, "rn", "Rundi", [Latin];
    RO, "ro", "Romanian", [Latin], tier: Tier::CoreLatin,
        morph_suffixes: &["ului", "elor", "ilor", "ate", "ele"], morph_bonus: 0.30;
    RU, "ru", "Russian", [Cyrillic], prior: 2.5, tier: Tier::CoreCyrillic,
        exclusive_letters: &['ы', 'э', 'ъ', 'ё'];
    RW, "rw", "Kinyarwanda", [Latin], tier: Tier::RareLatin;
    SA, "sa", "Sanskrit", [Devanagari];
    SC, "sc", "Sardinian", [Latin];
    SD, "sd", "Sindhi", [Arabic], neutral_extra: ARABIC_NEUTRAL, keep_zwnj: true;
    SE, "se", "Northern Sami", [Latin];
    SG, "sg", "Sango", [Latin];
    SI, "si", "Sinhala", [Sinhala];
    SK, "sk", "Slovak", [Latin];
    SL, "sl", "Slovenian", [Latin], negative_chars: &["ć", "đ"];
    SM, "sm", "Samoan", [Latin];
    SN, "sn", "Shona", [Latin], tier: Tier::RareLatin;
    SO, "so", "Somali", [Latin];
    SQ, "sq", "Albanian", [Latin];
    SR, "sr", "Serbian", [Latin, Cyrillic], tier: Tier::CoreCyrillic,
        exclusive_letters: &['ђ', 'ћ', 'ј', 'љ', 'њ', 'џ'];
    SS, "ss", "Swati", [Latin], tier: Tier::RareLatin;
    ST, "st", "Southern Sotho", [Latin], tier: Tier::RareLatin;
    SU, "su", "Sundanese", [Latin];
    SV, "sv", "Swedish", [Latin], tier: Tier::CoreLatin;
    SW, "sw", "Swahili", [Latin], tier: Tier::RareLatin;
    TA, "ta", "Tamil", [Tamil];
    TE, "te", "Telugu", [Telugu];
    TG, "tg", "Tajik", [Cyrillic];
    TH, "th", "Thai", [Thai];
    TI, "ti", "Tigrinya", [Ethiopic];
    TK, "tk", "Turkmen", [Latin];
    TL, "tl", "Tagalog", [Latin];
    TN, "tn", "Tswana", [Latin], tier: Tier::RareLatin;
    TO, "to", "Tonga", [Latin], negative_chars: POLYNESIAN_NEGATIVE;
    TR, "tr", "Turkish", [Latin], prior: 1.6, tier: Tier::CoreLatin,
        morph_suffixes: &["lar", "ler", "dır", "dir", "tır", "tir", "dur", "dür"],
        morph_bonus: 0.20;
    TS, "ts", "Tsonga", [Latin], tier: Tier::RareLatin;
    TT, "tt", "Tatar", [Cyrillic, Latin], prior: 0.4, tier: Tier::RareCyrillic,
        hard_diacritics: &["ә", "ө", "ү", "җ", "ң", "ҥ"];
    TW, "tw", "Twi", [Latin];
    TY, "ty", "Tahitian", [Latin], negative_chars: POLYNESIAN_NEGATIVE;
    UG, "ug", "Uyghur", [Arabic], neutral_extra: ARABIC_NEUTRAL, keep_zwnj: true;
    UK, "uk", "Ukrainian", [Cyrillic], prior: 1.6, tier: Tier::CoreCyrillic,
        exclusive_letters: &['і', 'ї', 'є', 'ґ'];
    UR, "ur", "Urdu", [Arabic], neutral_extra: ARABIC_NEUTRAL, keep_zwnj: true;
    UZ, "uz", "Uzbek", [Latin, Cyrillic];
    VE, "ve", "Venda", [Latin];
    VI, "vi", "Vietnamese", [Latin];
    VO, "vo", "Volapük", [Latin];
    WA, "wa", "Walloon", [Latin], prior: 0.4, tier: Tier::RareLatin;
    WO, "wo", "Wolof", [Latin];
    XH, "xh", "Xhosa", [Latin];
    YI, "yi", "Yiddish", [Hebrew], neutral_extra: HEBREW_NEUTRAL;
    YO, "yo", "Yoruba", [Latin], tier: Tier::RareLatin;
    ZA, "za", "Zhuang", [Latin];
    ZH, "zh", "Chinese", [Han], prior: 2.5, enable_affixes: false;
    ZU, "zu", "Zulu", [Latin], tier: Tier::RareLatin;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_iso_639_1() {
        assert_eq!(ALL_LANGS.len(), 184);
        assert_eq!(LANG_TABLE.len(), ALL_LANGS.len());
        for lang in ALL_LANGS {
            let e = LANG_TABLE.get(lang.code()).unwrap();
            assert_eq!(e.code, lang.code());
            assert!(!e.scripts.is_empty());
        }
    }

    #[test]
    fn from_code_is_case_insensitive() {
        assert_eq!(from_code("EN"), Some(EN));
        assert_eq!(from_code("ja"), Some(JA));
        assert_eq!(from_code("xx"), None);
    }

    #[test]
    fn defaults_and_overrides() {
        let de = LANG_TABLE.get("de").unwrap();
        assert_eq!(de.prior, 2.5);
        assert_eq!(de.min_line_script_share, 0.60);
        assert!(de.enable_affixes);

        let ja = LANG_TABLE.get("ja").unwrap();
        assert_eq!(ja.min_line_script_share, 0.55);
        assert!(!ja.enable_affixes);

        assert!(LANG_TABLE.get("fa").unwrap().keep_zwnj);
        assert!(!LANG_TABLE.get("ar").unwrap().keep_zwnj);
        assert_eq!(LANG_TABLE.get("ro").unwrap().morph_bonus, 0.30);
    }

    #[test]
    fn vietnamese_marks() {
        assert!(is_vietnamese_diacritic('ơ'));
        assert!(is_vietnamese_diacritic('đ'));
        assert!(!is_vietnamese_diacritic('e'));
    }
}

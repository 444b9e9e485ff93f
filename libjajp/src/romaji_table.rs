//! Romaji transliteration tables.
//!
//! The hiragana table is the source of truth; the katakana tables are derived
//! from it once through the kana width table. Characters without a katakana
//! form (pending consonants in "っk", punctuation) pass through unchanged.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::kana_table::{to_full_katakana_lenient, to_half_katakana_lenient};

/// Longest key in the romaji tables.
pub const MAX_KEY_LENGTH: usize = 4;

/// lower-case romaji -> hiragana
pub static ROMAJI_HIRAGANA: phf::Map<&'static str, &'static str> = phf_map! {
    "!" => "！",
    "," => "、",
    "-" => "ー",
    "." => "。",
    "/" => "・",
    "?" => "？",
    "[" => "「",
    "]" => "」",
    "a" => "あ",
    "ba" => "ば",
    "bb" => "っb",
    "be" => "べ",
    "bi" => "び",
    "bo" => "ぼ",
    "bu" => "ぶ",
    "bya" => "びゃ",
    "bye" => "びぇ",
    "byi" => "びぃ",
    "byo" => "びょ",
    "byu" => "びゅ",
    "ca" => "か",
    "cc" => "っc",
    "ce" => "せ",
    "cha" => "ちゃ",
    "che" => "ちぇ",
    "chi" => "ち",
    "cho" => "ちょ",
    "chu" => "ちゅ",
    "ci" => "し",
    "co" => "こ",
    "cu" => "く",
    "cya" => "ちゃ",
    "cye" => "ちぇ",
    "cyi" => "ちぃ",
    "cyo" => "ちょ",
    "cyu" => "ちゅ",
    "da" => "だ",
    "dd" => "っd",
    "de" => "で",
    "dha" => "でゃ",
    "dhe" => "でぇ",
    "dhi" => "でぃ",
    "dho" => "でょ",
    "dhu" => "でゅ",
    "di" => "ぢ",
    "do" => "ど",
    "du" => "づ",
    "dwu" => "どぅ",
    "dya" => "ぢゃ",
    "dye" => "ぢぇ",
    "dyi" => "ぢぃ",
    "dyo" => "ぢょ",
    "dyu" => "ぢゅ",
    "e" => "え",
    "fa" => "ふぁ",
    "fe" => "ふぇ",
    "ff" => "っf",
    "fi" => "ふぃ",
    "fo" => "ふぉ",
    "fu" => "ふ",
    "fya" => "ふゃ",
    "fyo" => "ふょ",
    "fyu" => "ふゅ",
    "ga" => "が",
    "ge" => "げ",
    "gg" => "っg",
    "gi" => "ぎ",
    "go" => "ご",
    "gu" => "ぐ",
    "gwa" => "ぐぁ",
    "gya" => "ぎゃ",
    "gye" => "ぎぇ",
    "gyi" => "ぎぃ",
    "gyo" => "ぎょ",
    "gyu" => "ぎゅ",
    "ha" => "は",
    "he" => "へ",
    "hh" => "っh",
    "hi" => "ひ",
    "ho" => "ほ",
    "hu" => "ふ",
    "hya" => "ひゃ",
    "hye" => "ひぇ",
    "hyi" => "ひぃ",
    "hyo" => "ひょ",
    "hyu" => "ひゅ",
    "i" => "い",
    "ja" => "じゃ",
    "je" => "じぇ",
    "ji" => "じ",
    "jj" => "っj",
    "jo" => "じょ",
    "ju" => "じゅ",
    "jya" => "じゃ",
    "jye" => "じぇ",
    "jyi" => "じぃ",
    "jyo" => "じょ",
    "jyu" => "じゅ",
    "ka" => "か",
    "ke" => "け",
    "ki" => "き",
    "kk" => "っk",
    "ko" => "こ",
    "ku" => "く",
    "kwa" => "くぁ",
    "kya" => "きゃ",
    "kye" => "きぇ",
    "kyi" => "きぃ",
    "kyo" => "きょ",
    "kyu" => "きゅ",
    "la" => "ぁ",
    "le" => "ぇ",
    "li" => "ぃ",
    "lka" => "ゕ",
    "lke" => "ゖ",
    "ll" => "っl",
    "lo" => "ぉ",
    "ltsu" => "っ",
    "ltu" => "っ",
    "lu" => "ぅ",
    "lwa" => "ゎ",
    "lya" => "ゃ",
    "lye" => "ぇ",
    "lyi" => "ぃ",
    "lyo" => "ょ",
    "lyu" => "ゅ",
    "ma" => "ま",
    "me" => "め",
    "mi" => "み",
    "mm" => "っm",
    "mo" => "も",
    "mu" => "む",
    "mya" => "みゃ",
    "mye" => "みぇ",
    "myi" => "みぃ",
    "myo" => "みょ",
    "myu" => "みゅ",
    "n'" => "ん",
    "na" => "な",
    "nb" => "んb",
    "nc" => "んc",
    "nd" => "んd",
    "ne" => "ね",
    "nf" => "んf",
    "ng" => "んg",
    "nh" => "んh",
    "ni" => "に",
    "nj" => "んj",
    "nk" => "んk",
    "nl" => "んl",
    "nm" => "んm",
    "nn" => "ん",
    "no" => "の",
    "np" => "んp",
    "nq" => "んq",
    "nr" => "んr",
    "ns" => "んs",
    "nt" => "んt",
    "nu" => "ぬ",
    "nv" => "んv",
    "nw" => "んw",
    "nx" => "んx",
    "nya" => "にゃ",
    "nye" => "にぇ",
    "nyi" => "にぃ",
    "nyo" => "にょ",
    "nyu" => "にゅ",
    "nz" => "んz",
    "o" => "お",
    "pa" => "ぱ",
    "pe" => "ぺ",
    "pi" => "ぴ",
    "po" => "ぽ",
    "pp" => "っp",
    "pu" => "ぷ",
    "pya" => "ぴゃ",
    "pye" => "ぴぇ",
    "pyi" => "ぴぃ",
    "pyo" => "ぴょ",
    "pyu" => "ぴゅ",
    "qa" => "くぁ",
    "qe" => "くぇ",
    "qi" => "くぃ",
    "qo" => "くぉ",
    "qq" => "っq",
    "qu" => "く",
    "ra" => "ら",
    "re" => "れ",
    "ri" => "り",
    "ro" => "ろ",
    "rr" => "っr",
    "ru" => "る",
    "rya" => "りゃ",
    "rye" => "りぇ",
    "ryi" => "りぃ",
    "ryo" => "りょ",
    "ryu" => "りゅ",
    "sa" => "さ",
    "se" => "せ",
    "sha" => "しゃ",
    "she" => "しぇ",
    "shi" => "し",
    "sho" => "しょ",
    "shu" => "しゅ",
    "si" => "し",
    "so" => "そ",
    "ss" => "っs",
    "su" => "す",
    "sya" => "しゃ",
    "sye" => "しぇ",
    "syi" => "しぃ",
    "syo" => "しょ",
    "syu" => "しゅ",
    "ta" => "た",
    "te" => "て",
    "tha" => "てゃ",
    "the" => "てぇ",
    "thi" => "てぃ",
    "tho" => "てょ",
    "thu" => "てゅ",
    "ti" => "ち",
    "to" => "と",
    "tsa" => "つぁ",
    "tse" => "つぇ",
    "tsi" => "つぃ",
    "tso" => "つぉ",
    "tsu" => "つ",
    "tt" => "っt",
    "tu" => "つ",
    "twu" => "とぅ",
    "tya" => "ちゃ",
    "tye" => "ちぇ",
    "tyi" => "ちぃ",
    "tyo" => "ちょ",
    "tyu" => "ちゅ",
    "u" => "う",
    "va" => "ゔぁ",
    "ve" => "ゔぇ",
    "vi" => "ゔぃ",
    "vo" => "ゔぉ",
    "vu" => "ゔ",
    "vv" => "っv",
    "vyu" => "ゔゅ",
    "wa" => "わ",
    "we" => "うぇ",
    "wha" => "うぁ",
    "whe" => "うぇ",
    "whi" => "うぃ",
    "who" => "うぉ",
    "whu" => "う",
    "wi" => "うぃ",
    "wo" => "を",
    "wu" => "う",
    "ww" => "っw",
    "wye" => "ゑ",
    "wyi" => "ゐ",
    "xa" => "ぁ",
    "xe" => "ぇ",
    "xi" => "ぃ",
    "xka" => "ゕ",
    "xke" => "ゖ",
    "xn" => "ん",
    "xo" => "ぉ",
    "xtsu" => "っ",
    "xtu" => "っ",
    "xu" => "ぅ",
    "xwa" => "ゎ",
    "xya" => "ゃ",
    "xye" => "ぇ",
    "xyi" => "ぃ",
    "xyo" => "ょ",
    "xyu" => "ゅ",
    "ya" => "や",
    "ye" => "いぇ",
    "yi" => "い",
    "yo" => "よ",
    "yu" => "ゆ",
    "yy" => "っy",
    "z," => "‥",
    "z-" => "〜",
    "z." => "…",
    "z/" => "・",
    "z[" => "『",
    "z]" => "』",
    "za" => "ざ",
    "ze" => "ぜ",
    "zh" => "←",
    "zi" => "じ",
    "zj" => "↓",
    "zk" => "↑",
    "zl" => "→",
    "zo" => "ぞ",
    "zu" => "ず",
    "zya" => "じゃ",
    "zye" => "じぇ",
    "zyi" => "じぃ",
    "zyo" => "じょ",
    "zyu" => "じゅ",
    "zz" => "っz",
    "~" => "〜",
};

static ROMAJI_FULL_KATAKANA: Lazy<AHashMap<&'static str, String>> = Lazy::new(|| {
    ROMAJI_HIRAGANA
        .entries()
        .map(|(key, kana)| (*key, to_full_katakana_lenient(kana)))
        .collect()
});

static ROMAJI_HALF_KATAKANA: Lazy<AHashMap<&'static str, String>> = Lazy::new(|| {
    ROMAJI_HIRAGANA
        .entries()
        .map(|(key, kana)| (*key, to_half_katakana_lenient(kana)))
        .collect()
});

/// Output script of a romaji table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RomajiTable {
    #[default]
    Hiragana,
    FullKatakana,
    HalfKatakana,
}

impl RomajiTable {
    /// Look up a lower-case romaji key.
    pub fn lookup(self, key: &str) -> Option<&'static str> {
        match self {
            RomajiTable::Hiragana => ROMAJI_HIRAGANA.get(key).copied(),
            RomajiTable::FullKatakana => ROMAJI_FULL_KATAKANA.get(key).map(String::as_str),
            RomajiTable::HalfKatakana => ROMAJI_HALF_KATAKANA.get(key).map(String::as_str),
        }
    }
}

//! Kana width table.
//!
//! Maps every hiragana (and the kana punctuation that goes with it) to its
//! full-width katakana and half-width katakana forms. Half-width voiced kana
//! take two characters (ｶﾞ).

use phf::phf_map;

const FULL_KATAKANA: usize = 0;
const HALF_KATAKANA: usize = 1;

/// hiragana -> [full-width katakana, half-width katakana]
pub static KANA_WIDTH: phf::Map<char, [&'static str; 2]> = phf_map! {
    'ぁ' => ["ァ", "ｧ"],
    'あ' => ["ア", "ｱ"],
    'ぃ' => ["ィ", "ｨ"],
    'い' => ["イ", "ｲ"],
    'ぅ' => ["ゥ", "ｩ"],
    'う' => ["ウ", "ｳ"],
    'ぇ' => ["ェ", "ｪ"],
    'え' => ["エ", "ｴ"],
    'ぉ' => ["ォ", "ｫ"],
    'お' => ["オ", "ｵ"],
    'か' => ["カ", "ｶ"],
    'が' => ["ガ", "ｶﾞ"],
    'き' => ["キ", "ｷ"],
    'ぎ' => ["ギ", "ｷﾞ"],
    'く' => ["ク", "ｸ"],
    'ぐ' => ["グ", "ｸﾞ"],
    'け' => ["ケ", "ｹ"],
    'げ' => ["ゲ", "ｹﾞ"],
    'こ' => ["コ", "ｺ"],
    'ご' => ["ゴ", "ｺﾞ"],
    'さ' => ["サ", "ｻ"],
    'ざ' => ["ザ", "ｻﾞ"],
    'し' => ["シ", "ｼ"],
    'じ' => ["ジ", "ｼﾞ"],
    'す' => ["ス", "ｽ"],
    'ず' => ["ズ", "ｽﾞ"],
    'せ' => ["セ", "ｾ"],
    'ぜ' => ["ゼ", "ｾﾞ"],
    'そ' => ["ソ", "ｿ"],
    'ぞ' => ["ゾ", "ｿﾞ"],
    'た' => ["タ", "ﾀ"],
    'だ' => ["ダ", "ﾀﾞ"],
    'ち' => ["チ", "ﾁ"],
    'ぢ' => ["ヂ", "ﾁﾞ"],
    'っ' => ["ッ", "ｯ"],
    'つ' => ["ツ", "ﾂ"],
    'づ' => ["ヅ", "ﾂﾞ"],
    'て' => ["テ", "ﾃ"],
    'で' => ["デ", "ﾃﾞ"],
    'と' => ["ト", "ﾄ"],
    'ど' => ["ド", "ﾄﾞ"],
    'な' => ["ナ", "ﾅ"],
    'に' => ["ニ", "ﾆ"],
    'ぬ' => ["ヌ", "ﾇ"],
    'ね' => ["ネ", "ﾈ"],
    'の' => ["ノ", "ﾉ"],
    'は' => ["ハ", "ﾊ"],
    'ば' => ["バ", "ﾊﾞ"],
    'ぱ' => ["パ", "ﾊﾟ"],
    'ひ' => ["ヒ", "ﾋ"],
    'び' => ["ビ", "ﾋﾞ"],
    'ぴ' => ["ピ", "ﾋﾟ"],
    'ふ' => ["フ", "ﾌ"],
    'ぶ' => ["ブ", "ﾌﾞ"],
    'ぷ' => ["プ", "ﾌﾟ"],
    'へ' => ["ヘ", "ﾍ"],
    'べ' => ["ベ", "ﾍﾞ"],
    'ぺ' => ["ペ", "ﾍﾟ"],
    'ほ' => ["ホ", "ﾎ"],
    'ぼ' => ["ボ", "ﾎﾞ"],
    'ぽ' => ["ポ", "ﾎﾟ"],
    'ま' => ["マ", "ﾏ"],
    'み' => ["ミ", "ﾐ"],
    'む' => ["ム", "ﾑ"],
    'め' => ["メ", "ﾒ"],
    'も' => ["モ", "ﾓ"],
    'ゃ' => ["ャ", "ｬ"],
    'や' => ["ヤ", "ﾔ"],
    'ゅ' => ["ュ", "ｭ"],
    'ゆ' => ["ユ", "ﾕ"],
    'ょ' => ["ョ", "ｮ"],
    'よ' => ["ヨ", "ﾖ"],
    'ら' => ["ラ", "ﾗ"],
    'り' => ["リ", "ﾘ"],
    'る' => ["ル", "ﾙ"],
    'れ' => ["レ", "ﾚ"],
    'ろ' => ["ロ", "ﾛ"],
    'ゎ' => ["ヮ", "ﾜ"],
    'わ' => ["ワ", "ﾜ"],
    'ゐ' => ["ヰ", "ｲ"],
    'ゑ' => ["ヱ", "ｴ"],
    'を' => ["ヲ", "ｦ"],
    'ん' => ["ン", "ﾝ"],
    'ゔ' => ["ヴ", "ｳﾞ"],
    'ゕ' => ["ヵ", "ｶ"],
    'ゖ' => ["ヶ", "ｹ"],
    'ー' => ["ー", "ｰ"],
    '、' => ["、", "､"],
    '。' => ["。", "｡"],
    '「' => ["「", "｢"],
    '」' => ["」", "｣"],
    '・' => ["・", "･"],
    '゛' => ["゛", "ﾞ"],
    '゜' => ["゜", "ﾟ"],
    '〜' => ["〜", "~"],
    '！' => ["！", "!"],
    '？' => ["？", "?"],
};

fn convert(text: &str, column: usize) -> Option<String> {
    text.chars()
        .map(|ch| KANA_WIDTH.get(&ch).map(|forms| forms[column]))
        .collect()
}

fn convert_lenient(text: &str, column: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match KANA_WIDTH.get(&ch) {
            Some(forms) => out.push_str(forms[column]),
            None => out.push(ch),
        }
    }
    out
}

/// Full-width katakana form of `text`, or `None` if a character has none.
pub fn to_full_katakana(text: &str) -> Option<String> {
    convert(text, FULL_KATAKANA)
}

/// Half-width katakana form of `text`, or `None` if a character has none.
pub fn to_half_katakana(text: &str) -> Option<String> {
    convert(text, HALF_KATAKANA)
}

/// Like [`to_full_katakana`], keeping characters without a katakana form.
pub fn to_full_katakana_lenient(text: &str) -> String {
    convert_lenient(text, FULL_KATAKANA)
}

/// Like [`to_half_katakana`], keeping characters without a katakana form.
pub fn to_half_katakana_lenient(text: &str) -> String {
    convert_lenient(text, HALF_KATAKANA)
}

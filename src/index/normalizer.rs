use unicode_normalization::UnicodeNormalization;

const KATAKANA_FIRST: char = '\u{30A1}'; // ァ
const KATAKANA_LAST: char = '\u{30F6}'; // ヶ
const KANA_OFFSET: u32 = 0x60;

/// NFKC, lowercase, NFKC again, katakana -> hiragana.
///
/// NFKC runs first so half-width katakana (including split voicing marks such as
/// `ｶﾞ`) are composed into full-width forms before the script fold sees them.
/// Lowercasing can leave combining sequences unnormalized (`Ϊ\u{301}` becomes
/// `ϊ\u{301}`, which composes to `ΐ`), hence the second NFKC pass.
pub fn normalize(s: &str) -> String {
    let lower = s.nfkc().collect::<String>().to_lowercase();
    lower.nfkc().map(fold_kana).collect()
}

/// Katakana letters and the two iteration marks map onto their hiragana
/// counterparts; everything else passes through.
pub fn fold_kana(c: char) -> char {
    match c {
        KATAKANA_FIRST..=KATAKANA_LAST | '\u{30FD}' | '\u{30FE}' => {
            char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c)
        }
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("ＡＢＣ"), "abc");
        assert_eq!(normalize("Tokyo"), "tokyo");
    }

    #[test]
    fn katakana_folds_to_hiragana() {
        assert_eq!(normalize("トウキョウト"), "とうきょうと");
        assert_eq!(normalize("ヴ"), "ゔ");
        assert_eq!(normalize("ヽヾ"), "ゝゞ");
    }

    #[test]
    fn halfwidth_katakana_with_voicing_marks() {
        assert_eq!(normalize("ｼﾌﾞﾔ"), "しぶや");
        assert_eq!(normalize("ｼﾌﾞﾔ"), normalize("シブヤ"));
    }

    #[test]
    fn kanji_and_prolonged_mark_untouched() {
        assert_eq!(normalize("東京都"), "東京都");
        assert_eq!(normalize("ビル"), "びる");
        assert_eq!(normalize("センター"), "せんたー");
    }

    #[test]
    fn fullwidth_digits_collapse() {
        assert_eq!(normalize("１丁目２－３"), "1丁目2-3");
    }

    #[test]
    fn idempotent_on_mixed_input() {
        let s = "ｼﾌﾞﾔ区 ＡＢＣビル３Ｆ ﾄｳｷｮｳ";
        let once = normalize(s);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn lowercase_output_is_recomposed() {
        assert_eq!(normalize("Ϊ\u{301}"), "\u{390}");
        assert_eq!(normalize("Ϋ\u{301}"), "\u{3B0}");
        for s in ["İ\u{3099}", "Ϊ\u{301}", "Ϋ\u{301}", "ᾼ\u{301}", "Aİ", "Σ\u{301}"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "{s:?}");
        }
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
    }
}

use addrgram::index::gram::generate_grams;
use addrgram::index::normalizer::normalize;
use addrgram::query::search_hits;
use addrgram::{build_inverted_index, Field, Record};
use proptest::prelude::*;

fn to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn address_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            '東', '京', '都', '渋', '谷', '区', 'ト', 'ウ', 'キ', 'ョ', 'と', 'う', 'き', 'ょ',
            'ｶ', 'ﾞ', 'Ａ', 'b', 'C', '１', '2', '－', ' ', 'ー',
        ]),
        0..12,
    )
    .prop_map(|cs| cs.into_iter().collect())
}

fn hiragana_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['あ', 'か', 'が', 'し', 'ぶ', 'や', 'と', 'う', 'ょ', 'ん']),
        0..10,
    )
    .prop_map(|cs| cs.into_iter().collect())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in address_text()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_any_text(s in "\\PC{0,16}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_with_trailing_marks(
        c in any::<char>(),
        marks in prop::collection::vec(
            prop::sample::select(vec!['\u{300}', '\u{301}', '\u{307}', '\u{308}', '\u{345}', '\u{3099}', '\u{309A}']),
            1..4,
        ),
    ) {
        let s: String = std::iter::once(c).chain(marks).collect();
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn kana_scripts_fold_together(s in hiragana_text()) {
        prop_assert_eq!(normalize(&s), normalize(&to_katakana(&s)));
    }

    #[test]
    fn gram_count_follows_length(s in address_text()) {
        let n = normalize(&s).chars().count();
        prop_assert_eq!(generate_grams(&s).len(), n.saturating_sub(1));
    }

    #[test]
    fn index_is_complete(fields in prop::collection::vec((address_text(), address_text()), 0..8)) {
        let records: Vec<Record> = fields
            .iter()
            .enumerate()
            .map(|(i, (a, b))| Record::new(i.to_string()).with(Field::City, a.as_str()).with(Field::OrgName, b.as_str()))
            .collect();
        let idx = build_inverted_index(&records);
        for (i, r) in records.iter().enumerate() {
            for (_, v) in r.searchable_fields() {
                for g in generate_grams(v) {
                    prop_assert!(idx.get(&g).map(|bm| bm.contains(i as u32)).unwrap_or(false));
                }
            }
        }
    }

    #[test]
    fn ranking_is_stable_and_narrowing(
        fields in prop::collection::vec(address_text(), 1..10),
        q in address_text(),
    ) {
        let records: Vec<Record> = fields
            .iter()
            .enumerate()
            .map(|(i, a)| Record::new(i.to_string()).with(Field::Town, a.as_str()))
            .collect();
        let idx = build_inverted_index(&records);
        let hits = search_hits(&q, &idx, &records);

        let present: Vec<String> = generate_grams(&q).into_iter().filter(|g| idx.contains(g)).collect();
        for h in &hits {
            for g in &present {
                prop_assert!(idx.get(g).unwrap().contains(h.id));
            }
        }
        for w in hits.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
            if w[0].score == w[1].score {
                prop_assert!(w[0].id < w[1].id);
            }
        }
        if present.is_empty() {
            prop_assert!(hits.is_empty());
        }
    }
}

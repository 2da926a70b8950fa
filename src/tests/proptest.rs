#[cfg(test)]
mod prop_tests {
    use crate::testing::fixtures::sample_model;
    use crate::{CorrectnessAnalyzer, Dictionary, Model, Tokenizer, detect_language};
    use proptest::prelude::*;
    use std::sync::{Arc, LazyLock};

    const WORDS: [&str; 8] = [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
    ];

    static MODEL: LazyLock<Model> = LazyLock::new(sample_model);

    fn analyzer() -> CorrectnessAnalyzer {
        let dict = Dictionary::from_words("en", WORDS).unwrap();
        CorrectnessAnalyzer::new("en", Arc::new(dict))
    }

    proptest! {
        #[test]
        fn probabilities_form_a_distribution(s in "[a-zA-Zàéèüößç ,.]{0,120}", k in 1usize..6) {
            let out = detect_language(&MODEL, &s, k).unwrap();
            prop_assert!(out.len() <= k);
            if !out.is_empty() {
                let sum: f64 = out.iter().map(|(_, p)| p).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
                prop_assert!(out.iter().all(|(_, p)| *p >= 0.0));
                prop_assert!(out.windows(2).all(|w| w[0].1 >= w[1].1));
            }
        }

        #[test]
        fn detection_never_panics(s in ".{0,200}") {
            let _ = detect_language(&MODEL, &s, 3).unwrap();
        }

        #[test]
        fn dictionary_words_are_clean(picks in prop::collection::vec(0usize..WORDS.len(), 1..30)) {
            let text: Vec<&str> = picks.iter().map(|&i| WORDS[i]).collect();
            let report = analyzer().run(&text.join(" ")).unwrap();
            prop_assert_eq!(report.errors_count, 0);
        }

        #[test]
        fn each_corrupted_word_is_one_error(
            picks in prop::collection::vec((0usize..WORDS.len(), any::<bool>()), 1..30)
        ) {
            let mut corrupted = 0;
            let text: Vec<String> = picks
                .iter()
                .map(|&(i, bad)| {
                    if bad {
                        corrupted += 1;
                        format!("{}ccc", WORDS[i])
                    } else {
                        WORDS[i].to_string()
                    }
                })
                .collect();
            let report = analyzer().run(&text.join(" ")).unwrap();
            prop_assert_eq!(report.errors_count, corrupted);
            prop_assert!(report.errors.iter().all(|e| e.ends_with("ccc")));
        }

        #[test]
        fn tokens_are_ordered_slices(s in "[a-z0-9 .,:@#/'-]{0,200}") {
            let tokenizer = Tokenizer::new();
            let mut last = None;
            for token in tokenizer.tokenize(&s, "en", None).unwrap() {
                prop_assert_eq!(&s[token.start..token.start + token.text.len()], token.text);
                prop_assert!(last.is_none_or(|prev| token.start > prev));
                last = Some(token.start);
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use crate::testing::fixtures::{self, ModelFixture, sample_model};
    use crate::{
        AdjustmentRegistry, CorrectnessReport, Glotta, GlottaError, LanguageDetector, StoreConfig,
        correctness, detect_language, detect_top1,
    };
    use std::sync::Arc;

    #[test]
    fn empty_text_detects_nothing() {
        let m = sample_model();
        assert!(detect_language(&m, "", 3).unwrap().is_empty());
        assert!(detect_language(&m, "  \u{200B} ", 3).unwrap().is_empty());
        assert_eq!(detect_top1(&m, "").unwrap(), None);
    }

    #[test]
    fn top_k_bounds_the_result() {
        let m = sample_model();
        let text = "the weather in the north is cold and wet";
        assert_eq!(detect_language(&m, text, 1).unwrap().len(), 1);
        assert!(detect_language(&m, text, 10).unwrap().len() <= 4);
        assert!(detect_language(&m, text, 0).unwrap().is_empty());
    }

    #[test]
    fn model_without_languages() {
        let m = ModelFixture::new().build();
        assert!(detect_language(&m, "hello", 3).unwrap().is_empty());
    }

    #[test]
    fn detector_matches_free_function() {
        let m = Arc::new(sample_model());
        let detector = LanguageDetector::new(Arc::clone(&m));
        let text = "die Kinder spielen im Garten";
        assert_eq!(detector.detect(text, 3).unwrap(), detect_language(&m, text, 3).unwrap());
        assert_eq!(detector.detect_top1(text).unwrap().as_deref(), Some("de"));
    }

    #[test]
    fn custom_registry_is_used() {
        let m = Arc::new(sample_model());
        let detector = LanguageDetector::builder(m)
            .adjustments(AdjustmentRegistry::empty())
            .build();
        let out = detector.detect("il gatto dorme sul divano", 2).unwrap();
        assert_eq!(out[0].0, "it");
    }

    #[test]
    fn empty_correctness_needs_no_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let report = correctness("", "en", Some(dir.path()), false).unwrap();
        assert_eq!(report, CorrectnessReport::default());
    }

    #[test]
    fn missing_dictionary_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let err = correctness("hello", "en", Some(dir.path()), false).unwrap_err();
        assert!(matches!(
            err,
            GlottaError::Dictionary(crate::DictionaryError::DictionaryMissing(_))
        ));
        let err = correctness("hello", "xx", Some(dir.path()), false).unwrap_err();
        assert!(matches!(
            err,
            GlottaError::Dictionary(crate::DictionaryError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn glotta_without_model() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_dictionary(dir.path(), "en", &["hello"]);
        let g = Glotta::builder()
            .store_config(StoreConfig::builder().data_dir(dir.path()).allow_network(false))
            .build();
        assert!(matches!(g.detect("hello", 3), Err(GlottaError::NoModel)));
        assert!(g.correctness("hello", "en").unwrap().is_clean());
        assert!(g.store().is_cached("en"));
    }
}

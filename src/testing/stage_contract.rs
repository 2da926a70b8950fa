use crate::{lang::Lang, stage::Stage};

/// Trait that stages implement to opt into the universal test suite.
pub trait StageTestConfig: Stage + Sized {
    /// Languages the stage is exercised under.
    fn one_to_one_languages() -> &'static [Lang];

    /// General test samples (may or may not trigger changes)
    fn samples(_lang: Lang) -> &'static [&'static str] {
        &["Hello World 123", " déjà-vu ", "TEST", ""]
    }

    /// Samples that should pass through unchanged (zero-copy test).
    fn should_pass_through(_lang: Lang) -> &'static [&'static str] {
        &[
            "hello",   // Simple lowercase
            "world",   // Another simple word
            "test123", // Alphanumeric
            "abc def", // Simple phrase with space
            "",        // Empty string
        ]
    }

    /// Input/output pairs that verify correct transformations.
    fn should_transform(_lang: Lang) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

/// Assert that a stage satisfies the universal stage contracts:
///
/// 1. `zero_copy_when_no_changes` → no allocation when input == output
/// 2. `stage_is_idempotent` → applying twice yields same result as once
/// 3. `needs_apply_is_accurate` → predicts exactly whether apply() changes text
/// 4. `handles_empty_string_and_ascii` → graceful on edge cases
/// 5. `no_panic_on_mixed_scripts` → survives mixed-script input
#[macro_export]
macro_rules! assert_stage_contract {
    ($stage:expr) => {
        $crate::testing::stage_contract::zero_copy_when_no_changes($stage);
        $crate::testing::stage_contract::stage_is_idempotent($stage);
        $crate::testing::stage_contract::needs_apply_is_accurate($stage);
        $crate::testing::stage_contract::handles_empty_string_and_ascii($stage);
        $crate::testing::stage_contract::no_panic_on_mixed_scripts($stage);
    };
}

// ============================================================================
// Universal contract tests
// ============================================================================

#[cfg(test)]
use crate::{context::Context, lang::data::EN};
#[cfg(test)]
use std::borrow::Cow;

#[cfg(test)]
pub fn zero_copy_when_no_changes<S: StageTestConfig>(stage: S) {
    for &lang in S::one_to_one_languages() {
        let ctx = Context::new(lang);

        for &input in S::samples(lang) {
            let mut text = Cow::Borrowed(input);

            // First pass – respect needs_apply
            if stage.needs_apply(&text, &ctx).unwrap() {
                let old_ptr = text.as_ref() as *const str;
                text = stage.apply(text, &ctx).unwrap();
                assert_ne!(old_ptr, text.as_ref() as *const str);
            } else {
                assert_eq!(input as *const str, text.as_ref() as *const str);
            }

            // Second pass – must never allocate again
            let old_ptr = text.as_ref() as *const str;
            if stage.needs_apply(&text, &ctx).unwrap() {
                text = stage.apply(text, &ctx).unwrap();
            }
            assert_eq!(
                old_ptr,
                text.as_ref() as *const str,
                "zero-copy violated on second pass in `{}` (lang: {lang:?}, input: `{input}`)",
                stage.name()
            );
        }

        for &pass_through in S::should_pass_through(lang) {
            let mut text = Cow::Borrowed(pass_through);
            let original_ptr = pass_through as *const str;

            if stage.needs_apply(&text, &ctx).unwrap() {
                text = stage.apply(text, &ctx).unwrap();
            }

            assert_eq!(text.as_ref(), pass_through);
            assert_eq!(
                original_ptr,
                text.as_ref() as *const str,
                "zero-copy violated on pass-through sample (lang: {lang:?}, input: `{pass_through}`)"
            );
        }

        for &(input, expected) in S::should_transform(lang) {
            let mut text = Cow::Borrowed(input);
            if stage.needs_apply(&text, &ctx).unwrap() {
                text = stage.apply(text, &ctx).unwrap();
            }
            assert_eq!(text.as_ref(), expected);
        }
    }
}

#[cfg(test)]
pub fn stage_is_idempotent<S: StageTestConfig>(stage: S) {
    for &lang in S::one_to_one_languages() {
        let ctx = Context::new(lang);
        for &input in S::samples(lang) {
            let once = stage.apply(Cow::Borrowed(input), &ctx).unwrap();
            let twice = stage.apply(once.clone(), &ctx).unwrap();
            assert_eq!(
                once,
                twice,
                "`{}` not idempotent in {lang:?} on `{input}`",
                stage.name()
            );
        }
    }
}

#[cfg(test)]
pub fn needs_apply_is_accurate<S: StageTestConfig>(stage: S) {
    for &lang in S::one_to_one_languages() {
        let ctx = Context::new(lang);
        for &sample in S::samples(lang) {
            check_accuracy(&stage, sample, &ctx);
        }
        for &clean in &["", "hello", "world123", " !@#"] {
            check_accuracy(&stage, clean, &ctx);
        }
    }
}

#[cfg(test)]
#[inline(always)]
fn check_accuracy<S: Stage>(stage: &S, input: &str, ctx: &Context) {
    let predicted = stage.needs_apply(input, ctx).expect("needs_apply errored");
    let output = stage
        .apply(Cow::Owned(input.to_owned()), ctx)
        .expect("apply errored");
    let actually_changes = output != input;
    assert_eq!(
        predicted,
        actually_changes,
        "needs_apply() mismatch for stage `{}` in {lang:?} on `{input}`\n\
         predicted: {predicted}\n\
         actual   : {actually_changes} (output = {output:?})",
        stage.name(),
        lang = ctx.lang
    );
}

#[cfg(test)]
pub fn handles_empty_string_and_ascii<S: StageTestConfig>(stage: S) {
    let ctx = Context::new(EN);
    let empty: &str = "";
    let result_empty = if stage.needs_apply(empty, &ctx).unwrap() {
        stage.apply(Cow::Borrowed(empty), &ctx).unwrap()
    } else {
        Cow::Borrowed(empty)
    };
    assert_eq!(result_empty.as_ref(), "");
    let ascii = "hello world 123 !@#";
    let result_ascii = stage.apply(Cow::Borrowed(ascii), &ctx).unwrap();
    assert_eq!(result_ascii.as_ref(), ascii);
}

#[cfg(test)]
pub fn no_panic_on_mixed_scripts<S: StageTestConfig>(stage: S) {
    let ctx = Context::new(EN);
    let _ = stage.apply(
        Cow::Borrowed("Hello 世界 русский Türkçe العربية 简体中文 \u{200D}\u{2060}\u{00AD}"),
        &ctx,
    );
}

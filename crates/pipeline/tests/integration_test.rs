//! Integration tests for the pipeline.
//!
//! These tests run realistic bios through the same pipeline the agent
//! builds at startup.

use pipeline::filters::*;
use pipeline::{FilterPipeline, RejectReason};

fn create_test_pipeline(min_length: usize, forbidden: &[&str]) -> FilterPipeline {
    FilterPipeline::new()
        .add_filter(RelevanceFilter::new(min_length))
        .add_filter(ForbiddenContentFilter::new(ForbiddenStringSet::new(
            forbidden.iter().copied(),
        )))
}

#[test]
fn test_realistic_bio_passes() {
    let pipeline = create_test_pipeline(
        40,
        &["fumadora", "smoker"],
    );

    let bio = "Me encanta la montaña, leer novelas de misterio y \
               probar restaurantes nuevos los fines de semana.";

    assert!(pipeline.screen(bio).is_clear());
}

#[test]
fn test_accented_forbidden_word_in_bio() {
    let pipeline = create_test_pipeline(10, &["política"]);

    let bio = "Hablo mucho de POLITICA y de fútbol, avisado quedas.";
    let screening = pipeline.screen(bio);

    assert!(!screening.is_clear());
    assert!(screening.has_forbidden_content());
    assert_eq!(screening.rejections.len(), 1);
}

#[test]
fn test_instagram_only_bio() {
    let pipeline = create_test_pipeline(20, &[]);

    let screening = pipeline.screen("IG: some.handle_123");
    assert_eq!(screening.rejections.len(), 1);
    assert_eq!(screening.rejections[0].reason, RejectReason::NoTextAfterHandle);
}

#[test]
fn test_emoji_padded_bio() {
    let pipeline = create_test_pipeline(20, &[]);

    let bio = format!("just vibes {}", "\u{2728}\u{1F33B}".repeat(10));
    let screening = pipeline.screen(&bio);

    assert_eq!(screening.rejections.len(), 1);
    assert_eq!(screening.rejections[0].reason, RejectReason::TooShortAfterEmoji);
}

#[test]
fn test_short_and_forbidden_reports_both() {
    let pipeline = create_test_pipeline(200, &["crypto"]);

    let screening = pipeline.screen("Into CRYPTO");
    let reasons: Vec<_> = screening.rejections.iter().map(|r| r.reason.clone()).collect();

    assert_eq!(reasons, vec![RejectReason::TooShort, RejectReason::Forbidden]);
}

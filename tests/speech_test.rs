//! Speech backends and the fallback chain


use emotion_recognition::{
    speech::{CachedSpeech, CommandSpeech, FallbackSpeech, Language, SpeechBackend},
    Error,
};
use std::time::Duration;
use test_helpers::{entries, RecordingSpeech};

#[test]
fn test_fallback_used_when_primary_fails() {
    let fallback = RecordingSpeech::default();
    let said = fallback.said.clone();
    let mut speech = FallbackSpeech::new(Box::new(RecordingSpeech::failing()), Box::new(fallback));

    speech.say("What went wrong?", Language::English).unwrap();

    assert_eq!(entries(&said), vec![("What went wrong?".to_string(), Language::English)]);
}

#[test]
fn test_fallback_skipped_when_primary_works() {
    let primary = RecordingSpeech::default();
    let primary_said = primary.said.clone();
    let fallback = RecordingSpeech::default();
    let fallback_said = fallback.said.clone();
    let mut speech = FallbackSpeech::new(Box::new(primary), Box::new(fallback));

    speech.say("Das ist eine Ueberraschung, nicht wahr?", Language::German).unwrap();

    assert_eq!(entries(&primary_said).len(), 1);
    assert!(entries(&fallback_said).is_empty());
}

#[test]
fn test_both_backends_failing_reports_error() {
    let mut speech = FallbackSpeech::new(
        Box::new(RecordingSpeech::failing()),
        Box::new(RecordingSpeech::failing()),
    );
    assert!(matches!(speech.say("Hello", Language::English), Err(Error::Speech(_))));
}

#[test]
fn test_cached_phrase_plays_without_download() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens on the discard port, so any download attempt fails
    let mut speech = CachedSpeech::new(
        dir.path(),
        "http://127.0.0.1:9/translate_tts",
        vec!["true".to_string()],
        Duration::from_millis(500),
    )
    .unwrap();

    let path = speech.cache_path("I am angry as well!", Language::English);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"ID3").unwrap();

    speech.say("I am angry as well!", Language::English).unwrap();
}

#[test]
fn test_uncached_phrase_with_unreachable_service_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let online = CachedSpeech::new(
        dir.path(),
        "http://127.0.0.1:9/translate_tts",
        vec!["true".to_string()],
        Duration::from_millis(500),
    )
    .unwrap();
    let offline = RecordingSpeech::default();
    let said = offline.said.clone();
    let mut speech = FallbackSpeech::new(Box::new(online), Box::new(offline));

    speech.say("What a nice day, right?", Language::English).unwrap();

    assert_eq!(entries(&said).len(), 1);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_cache_is_separated_by_language() {
    let speech = CachedSpeech::new(
        "wav_cache",
        "http://127.0.0.1:9/translate_tts",
        vec!["mpg123".to_string()],
        Duration::from_secs(1),
    )
    .unwrap();
    assert_ne!(
        speech.cache_path("Hallo", Language::English),
        speech.cache_path("Hallo", Language::German)
    );
}

#[test]
fn test_missing_offline_engine_reports_error() {
    let mut speech = CommandSpeech::new(&["no-such-speech-engine".to_string()]).unwrap();
    assert!(matches!(speech.say("Hello", Language::English), Err(Error::Speech(_))));
    assert_eq!(speech.name(), "no-such-speech-engine");
}

#[test]
fn test_failing_player_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let online = CachedSpeech::new(
        dir.path(),
        "http://127.0.0.1:9/translate_tts",
        vec!["false".to_string()],
        Duration::from_millis(500),
    )
    .unwrap();
    let path = online.cache_path("Oh, you look surprised!", Language::English);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"ID3").unwrap();

    let offline = RecordingSpeech::default();
    let said = offline.said.clone();
    let mut speech = FallbackSpeech::new(Box::new(online), Box::new(offline));

    speech.say("Oh, you look surprised!", Language::English).unwrap();

    assert_eq!(entries(&said), vec![("Oh, you look surprised!".to_string(), Language::English)]);
}

#[test]
fn test_offline_engine_exit_status_reported() {
    let mut failing = CommandSpeech::new(&["false".to_string()]).unwrap();
    assert!(matches!(failing.say("Hello", Language::English), Err(Error::Speech(_))));

    let mut working = CommandSpeech::new(&["true".to_string()]).unwrap();
    working.say("Hello", Language::English).unwrap();
}

// Integration tests for the multi-track audio overlay
// These drive the public command surface end to end against a recording backend

use std::time::Duration;

use multitrack_audio::audio_system::{
    AudioCategory, BackendCall, ChannelId, MultiTrackAudio, RecordingBackend, FADE_STEPS,
};
use multitrack_audio::messaging::{
    dispatch, dispatch_line, parse_arguments, AudioEvent, CommandResult, EventBus,
};
use multitrack_audio::AudioError;

const EPSILON: f32 = 1e-5;

fn manager() -> MultiTrackAudio<RecordingBackend> {
    MultiTrackAudio::new(RecordingBackend::new())
}

fn id(category: AudioCategory, track: u32) -> ChannelId {
    ChannelId::new(category, track)
}

fn volume(audio: &MultiTrackAudio<RecordingBackend>, channel: ChannelId) -> f32 {
    audio.channel(channel).map(|c| c.volume()).unwrap_or(f32::NAN)
}

#[test]
fn test_identity_uniqueness() {
    let mut audio = manager();
    let bgm1 = id(AudioCategory::Bgm, 1);

    for line in ["play-bgm Field", "play-bgm1 Town", "PLAY-BGM1 Dungeon"] {
        assert!(dispatch_line(&mut audio, line).is_executed());
    }
    dispatch_line(&mut audio, "play-bgs1 Rain");

    assert_eq!(audio.active_count(), 2);
    assert_eq!(audio.channel(bgm1).unwrap().asset(), "Dungeon");
    assert_eq!(audio.backend().playing_count(), 2);

    // Each replaced handle is stopped before its successor exists
    let calls = audio.backend().calls();
    for (old, new) in [(0, 1), (1, 2)] {
        let stop = calls
            .iter()
            .position(|c| *c == BackendCall::Stop { handle: old })
            .unwrap();
        let create = calls
            .iter()
            .position(|c| matches!(c, BackendCall::Create { handle, .. } if *handle == new))
            .unwrap();
        assert!(stop < create);
    }
}

#[test]
fn test_fade_linearity_and_convergence() {
    let mut audio = manager();
    let bgm = id(AudioCategory::Bgm, 1);
    dispatch_line(&mut audio, "play-bgm Theme 100");
    dispatch_line(&mut audio, "fade-bgm 40 3");

    let tick = Duration::from_secs(3) / FADE_STEPS;
    for k in 1..=FADE_STEPS {
        audio.advance(tick);
        let expected = 1.0 + (0.4 - 1.0) * (k as f32 / FADE_STEPS as f32);
        assert!(
            (volume(&audio, bgm) - expected).abs() < EPSILON,
            "step {}: {} != {}",
            k,
            volume(&audio, bgm),
            expected
        );
    }

    assert_eq!(volume(&audio, bgm), 0.4);
    assert!(audio.fades().is_empty());

    // No writes after completion
    let writes = audio.backend().handle_state(0).unwrap().volume_writes;
    audio.advance(Duration::from_secs(10));
    assert_eq!(audio.backend().handle_state(0).unwrap().volume_writes, writes);
}

#[test]
fn test_fade_converges_when_duration_splits_unevenly() {
    let mut audio = manager();
    let bgm = id(AudioCategory::Bgm, 1);
    dispatch_line(&mut audio, "play-bgm Theme 100");
    dispatch_line(&mut audio, "fade-bgm 0 1");

    let tick = Duration::from_secs(1) / FADE_STEPS;
    audio.advance(tick);
    assert!((volume(&audio, bgm) - (1.0 - 1.0 / FADE_STEPS as f32)).abs() < EPSILON);

    for _ in 1..FADE_STEPS {
        audio.advance(tick);
    }
    assert_eq!(volume(&audio, bgm), 0.0);
    assert!(audio.fades().is_empty());
}

#[test]
fn test_fade_does_not_cancel_fading_stop() {
    let mut audio = manager();
    dispatch_line(&mut audio, "play-bgm Theme");
    dispatch_line(&mut audio, "stop-bgm 2");
    dispatch_line(&mut audio, "fade-bgm 50 1");

    audio.advance(Duration::from_secs(10));
    assert!(!audio.is_active(id(AudioCategory::Bgm, 1)));
    assert_eq!(audio.backend().playing_count(), 0);
}

#[test]
fn test_stop_removes_channel() {
    let mut audio = manager();
    let me = id(AudioCategory::Me, 4);
    dispatch_line(&mut audio, "play-me4 Fanfare");
    dispatch_line(&mut audio, "stop-me4 0");

    assert!(audio.channel(me).is_none());
    assert!(!audio.backend().handle_state(0).unwrap().playing);
}

#[test]
fn test_crossfade_composition() {
    let mut audio = manager();
    let a = id(AudioCategory::Bgm, 2);
    let b = id(AudioCategory::Bgm, 3);
    dispatch_line(&mut audio, "play-bgm2 Scene1");

    assert!(dispatch_line(&mut audio, "crossfade-bgm2 bgm3 clip 5").is_executed());
    assert_eq!(audio.channel(b).unwrap().asset(), "clip");
    assert_eq!(volume(&audio, b), 0.0);

    audio.advance(Duration::from_secs(4));
    assert!(audio.is_active(a));

    audio.advance(Duration::from_secs(1));
    assert!((volume(&audio, b) - 0.9).abs() < EPSILON);
    assert!(!audio.is_active(a));
    assert_eq!(audio.active_count(), 1);
}

#[test]
fn test_crossfade_without_source_issues_no_stop() {
    let mut audio = manager();
    dispatch_line(&mut audio, "crossfade-bgm2 bgm3 clip 5");

    assert!(audio.is_active(id(AudioCategory::Bgm, 3)));
    assert!(!audio
        .backend()
        .calls()
        .iter()
        .any(|c| matches!(c, BackendCall::Stop { .. })));
}

#[test]
fn test_malformed_crossfade_has_no_side_effects() {
    let mut audio = manager();
    dispatch_line(&mut audio, "play-bgm2 Scene1");

    let result = dispatch(&mut audio, "crossfade-bgm2", "9x Scene2 5");
    assert!(matches!(
        result,
        CommandResult::Rejected(AudioError::MalformedCrossfadeTarget(_))
    ));
    assert_eq!(audio.backend().created_count(), 1);
    assert!(audio.fades().is_empty());
    assert!(audio.is_active(id(AudioCategory::Bgm, 2)));
}

#[test]
fn test_argument_tokenization() {
    assert_eq!(
        parse_arguments(r#""Title Music" 90 3"#),
        vec!["Title Music", "90", "3"]
    );
    assert_eq!(
        parse_arguments("Scene1 90 5 -30 120"),
        vec!["Scene1", "90", "5", "-30", "120"]
    );
}

#[test]
fn test_category_validation() {
    let bus = EventBus::new();
    let (rx, _id) = bus.subscribe();
    let mut audio = manager().with_event_bus(bus);

    let result = dispatch(&mut audio, "play-xyz1", "foo");
    assert!(matches!(
        result,
        CommandResult::Rejected(AudioError::UnknownCategory(_))
    ));
    assert_eq!(audio.active_count(), 0);
    assert_eq!(audio.backend().created_count(), 0);
    assert!(matches!(
        rx.try_recv().unwrap(),
        AudioEvent::CommandRejected { .. }
    ));
}

#[test]
fn test_default_track_number() {
    let mut audio = manager();
    dispatch_line(&mut audio, "play-bgm1 Theme");
    assert!(dispatch_line(&mut audio, "stop-bgm").is_executed());
    assert!(!audio.is_active(id(AudioCategory::Bgm, 1)));
}

#[test]
fn test_missing_channel_is_a_warning_not_a_failure() {
    let mut audio = manager();
    let result = dispatch_line(&mut audio, "fade-bgs9 0 2");
    match result {
        CommandResult::Rejected(err) => assert!(err.is_warning()),
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[test]
fn test_unrelated_commands_pass_through() {
    let mut audio = manager();
    assert!(matches!(
        dispatch_line(&mut audio, "ShowText Hello"),
        CommandResult::Ignored
    ));
}

#[test]
fn test_session_teardown() {
    let mut audio = manager();
    dispatch_line(&mut audio, "play-bgm Theme 90 3");
    dispatch_line(&mut audio, "play-se12 Click");

    assert_eq!(audio.on_load_game(), 2);
    assert_eq!(audio.active_count(), 0);
    assert!(audio.fades().is_empty());
    assert_eq!(audio.backend().playing_count(), 0);
}

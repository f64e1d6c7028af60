use chrono::{TimeZone, Utc};
use uuid::Uuid;

use kuching::application::services::{ContextLimits, assemble};
use kuching::domain::{CallId, CallRecord, UserId};

fn record(filename: &str) -> CallRecord {
    CallRecord {
        id: CallId::from_uuid(Uuid::new_v4()),
        user_id: UserId::from_uuid(Uuid::new_v4()),
        filename: filename.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
        storage_path: None,
        file_size: None,
        transcript: None,
        summary: None,
        duration_minutes: None,
        participant_count: None,
        sentiment: None,
        key_aspects: None,
    }
}

#[test]
fn given_no_records_when_assembled_then_context_is_empty() {
    let context = assemble(&[], None, &ContextLimits::default());
    assert_eq!(context, "");
}

#[test]
fn given_selected_record_when_assembled_then_it_renders_first_with_all_metadata() {
    let mut selected = record("selected.wav");
    selected.transcript = Some("the transcript body".to_string());
    selected.summary = Some("Discussed pricing".to_string());
    selected.duration_minutes = Some(42);
    selected.participant_count = Some(3);
    selected.sentiment = Some("positive".to_string());
    selected.key_aspects = Some(vec!["pricing".to_string(), "renewal".to_string()]);
    let selected_id = selected.id;

    let mut other = record("other.wav");
    other.transcript = Some("other call".to_string());

    let context = assemble(
        &[other, selected],
        Some(selected_id),
        &ContextLimits::default(),
    );

    let selected_block = context.find("CURRENTLY SELECTED CALL").unwrap();
    let other_block = context.find("OTHER RECENT CALLS").unwrap();
    assert!(selected_block < other_block);

    assert!(context.contains("Filename: selected.wav"));
    assert!(context.contains("Summary: Discussed pricing"));
    assert!(context.contains("Duration: 42 minutes"));
    assert!(context.contains("Participants: 3"));
    assert!(context.contains("Sentiment: positive"));
    assert!(context.contains("Key Points: pricing, renewal"));
}

#[test]
fn given_absent_metadata_when_assembled_then_no_placeholders_appear() {
    let mut call = record("sparse.wav");
    call.transcript = Some("just a transcript".to_string());

    let context = assemble(&[call], None, &ContextLimits::default());

    assert!(!context.contains("Summary:"));
    assert!(!context.contains("Duration:"));
    assert!(!context.contains("Participants:"));
    assert!(!context.contains("Sentiment:"));
    assert!(!context.contains("Key Points:"));
    assert!(!context.contains("None"));
    assert!(!context.contains("null"));
}

#[test]
fn given_long_transcripts_when_assembled_then_caps_hold_at_and_past_boundary() {
    let limits = ContextLimits::default();

    for transcript_len in [5000, 5001] {
        let mut selected = record("selected.wav");
        selected.transcript = Some("a".repeat(transcript_len));
        let selected_id = selected.id;

        let context = assemble(&[selected], Some(selected_id), &limits);
        let longest_run = context
            .split(|c| c != 'a')
            .map(str::len)
            .max()
            .unwrap_or(0);
        assert_eq!(longest_run, 5000.min(transcript_len));
    }

    for transcript_len in [1000, 1001] {
        let mut other = record("other.wav");
        other.transcript = Some("b".repeat(transcript_len));

        let context = assemble(&[other], None, &limits);
        let longest_run = context
            .split(|c| c != 'b')
            .map(str::len)
            .max()
            .unwrap_or(0);
        assert_eq!(longest_run, 1000.min(transcript_len));
    }
}

#[test]
fn given_multibyte_transcript_when_truncated_then_no_code_point_splits() {
    let mut other = record("other.wav");
    other.transcript = Some("é".repeat(1500));

    let context = assemble(&[other], None, &ContextLimits::default());
    assert_eq!(context.matches('é').count(), 1000);
}

#[test]
fn given_many_records_when_assembled_then_at_most_five_others_render() {
    let records: Vec<CallRecord> = (0..9).map(|i| record(&format!("call-{}.wav", i))).collect();

    let context = assemble(&records, None, &ContextLimits::default());

    assert_eq!(context.matches("--- Call:").count(), 5);
    // First five in input order survive the cap.
    for i in 0..5 {
        assert!(context.contains(&format!("call-{}.wav", i)));
    }
    assert!(!context.contains("call-5.wav"));
}

#[test]
fn given_selected_id_without_match_when_assembled_then_only_other_blocks_render() {
    let call = record("call.wav");

    let context = assemble(
        &[call],
        Some(CallId::from_uuid(Uuid::new_v4())),
        &ContextLimits::default(),
    );

    assert!(!context.contains("CURRENTLY SELECTED CALL"));
    assert!(context.contains("--- Call: call.wav ---"));
}

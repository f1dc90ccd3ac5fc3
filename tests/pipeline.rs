use kf2_demo_analytics::analyze;
use kf2_demo_analytics::demo::{decode, DecodeError, HeaderError};
use kf2_demo_analytics::record::Wave;

fn header(session_id: i32) -> Vec<u8> {
    let mut buf = b"kf2rec".to_vec();
    buf.push(1);
    buf.extend_from_slice(&session_id.to_be_bytes());
    buf.push(0);
    buf
}

fn push_event(buf: &mut Vec<u8>, tick: i32, tag: u8, body: &[u8]) {
    buf.extend_from_slice(&tick.to_be_bytes());
    buf.push(tag);
    buf.extend_from_slice(body);
    buf.push(0);
}

/// One wave of 50 zeds, a single cyst kill, last event at tick 500
fn single_wave_record() -> Vec<u8> {
    let mut buf = header(42);
    let mut wave_start = vec![1];
    wave_start.extend_from_slice(&50i32.to_be_bytes());
    push_event(&mut buf, 100, 5, &wave_start);
    push_event(&mut buf, 150, 7, &[2, 1]);
    push_event(&mut buf, 500, 6, &49i32.to_be_bytes());
    buf
}

#[test]
fn single_wave_end_to_end() {
    let raw = single_wave_record();

    let record = decode(&raw).expect("valid record");
    assert_eq!(record.session_id(), 42);
    assert_eq!(
        record.waves,
        vec![Wave {
            wave: 1,
            attempt: 1,
            start_tick: 100,
            end_tick: 500,
        }]
    );

    let session = analyze(&raw).expect("valid record");
    let summary = &session.waves[0].summary;
    assert_eq!(summary.total_kills, 1);
    assert_eq!(summary.trash_percent, 1.0);
    assert_eq!(summary.duration, 4.0);
    assert_eq!(summary.wave_size, 50);
}

#[test]
fn analysis_is_deterministic() {
    let raw = single_wave_record();
    let first = serde_json::to_string(&analyze(&raw).expect("valid")).expect("json");
    let second = serde_json::to_string(&analyze(&raw).expect("valid")).expect("json");
    assert_eq!(first, second);
}

#[test]
fn corrupt_buffers_are_rejected() {
    let mut raw = single_wave_record();
    raw[0] = b'K';
    assert!(matches!(
        decode(&raw),
        Err(DecodeError::Header(HeaderError::BadMagic { .. }))
    ));

    let mut raw = single_wave_record();
    raw.pop();
    assert!(matches!(
        decode(&raw),
        Err(DecodeError::TruncatedEvent { .. })
    ));
}

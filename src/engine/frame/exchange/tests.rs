use std::sync::Arc;

use dpi::PhysicalSize;

use super::super::BUFFER_SLOT_COUNT;
use super::FrameExchange;

fn ready(_fence: u64) -> bool {
    true
}

fn never_ready(_fence: u64) -> bool {
    false
}

/// Renders one frame the way the producer path does: pick, then publish with `fence`.
fn produce(exchange: &FrameExchange, fence: u64) -> (usize, u64) {
    let slot = exchange.select_write_slot();
    let _ = exchange.take_slot_fence(slot);
    let seq = exchange.publish(slot, fence);
    (slot, seq)
}

fn setup() -> FrameExchange {
    let exchange = FrameExchange::new();
    for slot in 0..BUFFER_SLOT_COUNT {
        exchange.set_slot_size(slot, PhysicalSize::new(640, 360));
        exchange.set_slot_image(slot, 0x1000 + slot as u64);
    }
    exchange
}

#[test]
fn cold_start_has_no_display_frame() {
    let exchange = setup();
    assert!(exchange.select_display_frame(ready, |_| {}).is_none());
    assert!(exchange.current_display_frame().is_none());
}

#[test]
fn consumer_skips_over_stale_frames_to_the_latest() {
    let exchange = setup();
    for _ in 0..5 {
        produce(&exchange, 0);
    }

    let frame = exchange
        .select_display_frame(ready, |_| {})
        .expect("a complete frame is available");
    assert_eq!(frame.seq, 5);
    assert_eq!(exchange.consumer_seq_value(), 5);
    assert_eq!(exchange.display_seq_value(), 5);
}

#[test]
fn display_seq_jumps_without_sampling_intermediate_frames() {
    let exchange = setup();

    produce(&exchange, 0);
    let first = exchange
        .select_display_frame(ready, |_| {})
        .expect("first frame");
    assert_eq!(first.seq, 1);
    assert_eq!(exchange.display_seq_value(), 1);

    produce(&exchange, 0);
    produce(&exchange, 0);
    let third = exchange
        .select_display_frame(ready, |_| {})
        .expect("latest frame");
    assert_eq!(third.seq, 3);
    assert_eq!(exchange.display_seq_value(), 3);
}

#[test]
fn producer_never_selects_the_displayed_slot() {
    let exchange = setup();

    produce(&exchange, 0);
    let displayed = exchange
        .select_display_frame(ready, |_| {})
        .expect("frame displayed");

    for _ in 0..32 {
        let slot = exchange.select_write_slot();
        assert_ne!(slot, displayed.slot);
        let _ = exchange.take_slot_fence(slot);
        exchange.publish(slot, 0);
    }
}

#[test]
fn producer_overwrites_the_oldest_undisplayed_slot() {
    let exchange = setup();

    let (slot_a, _) = produce(&exchange, 0);
    let (slot_b, _) = produce(&exchange, 0);
    let (slot_c, _) = produce(&exchange, 0);
    assert_ne!(slot_a, slot_b);
    assert_ne!(slot_b, slot_c);
    assert_ne!(slot_a, slot_c);

    // Nothing displayed: the next victim is the slot carrying seq 1.
    assert_eq!(exchange.select_write_slot(), slot_a);
}

#[test]
fn unsignaled_fence_is_not_displayed() {
    let exchange = setup();
    produce(&exchange, 0xdead);

    assert!(exchange.select_display_frame(never_ready, |_| {}).is_none());
    assert_eq!(exchange.consumer_seq_value(), 0);

    let mut destroyed = Vec::new();
    let frame = exchange
        .select_display_frame(ready, |f| destroyed.push(f))
        .expect("signaled frame");
    assert_eq!(frame.seq, 1);
    assert_eq!(destroyed, vec![0xdead]);
    assert_eq!(exchange.slot_fence(frame.slot), 0);
}

#[test]
fn in_flight_overwrite_is_never_displayed() {
    let exchange = setup();

    produce(&exchange, 0);
    let shown = exchange
        .select_display_frame(ready, |_| {})
        .expect("first frame");
    assert_eq!(shown.seq, 1);

    produce(&exchange, 0xb);
    produce(&exchange, 0xc);

    // The producer starts overwriting the oldest undisplayed frame (seq 2) and is mid-render:
    // slot reserved, fence taken, the old sequence still stored.
    let victim = exchange.select_write_slot();
    assert_eq!(exchange.take_slot_fence(victim), 0xb);

    // Seq 3's fence has not signaled, and the in-flight slot must not be offered despite its
    // zero fence and stale sequence.
    assert!(exchange.select_display_frame(|f| f != 0xc, |_| {}).is_none());
    let kept = exchange
        .current_display_frame()
        .expect("previous frame still displayable");
    assert_eq!(kept.seq, shown.seq);

    // Publishing completes the overwrite and makes the slot selectable again.
    assert_eq!(exchange.publish(victim, 0), 4);
    let frame = exchange
        .select_display_frame(ready, |_| {})
        .expect("overwritten slot republished");
    assert_eq!(frame.seq, 4);
    assert_eq!(frame.slot, victim);
}

#[test]
fn aborted_render_leaves_the_slot_empty() {
    let exchange = setup();

    produce(&exchange, 0);
    let shown = exchange
        .select_display_frame(ready, |_| {})
        .expect("first frame");

    let victim = exchange.select_write_slot();
    let _ = exchange.take_slot_fence(victim);
    exchange.abort_write(victim);

    // The discarded frame neither advances the sequence nor becomes visible.
    assert_eq!(exchange.producer_seq_value(), 2);
    assert!(exchange.select_display_frame(ready, |_| {}).is_none());
    let kept = exchange
        .current_display_frame()
        .expect("previous frame still displayable");
    assert_eq!(kept.seq, shown.seq);

    let (_, seq) = produce(&exchange, 0);
    assert_eq!(seq, 2);
}

#[test]
fn consumer_keeps_the_previous_frame_when_nothing_newer_is_ready() {
    let exchange = setup();
    produce(&exchange, 0);
    let shown = exchange
        .select_display_frame(ready, |_| {})
        .expect("first frame");

    // Newer frame published but its fence has not signaled yet.
    produce(&exchange, 0xbeef);
    assert!(exchange.select_display_frame(never_ready, |_| {}).is_none());

    let kept = exchange
        .current_display_frame()
        .expect("previous frame still displayable");
    assert_eq!(kept.slot, shown.slot);
    assert_eq!(kept.seq, shown.seq);
    assert_eq!(exchange.display_seq_value(), shown.seq);
}

#[test]
fn epoch_reset_restarts_sequences_and_bumps_the_cache_generation() {
    let exchange = setup();
    produce(&exchange, 0);
    produce(&exchange, 0);
    let _ = exchange.select_display_frame(ready, |_| {});

    let epoch_before = exchange.epoch();
    exchange.set_resizing(true);
    exchange.epoch_reset();

    // Concurrent polls during the resize must yield nothing.
    assert!(exchange.select_display_frame(ready, |_| {}).is_none());
    assert!(exchange.current_display_frame().is_none());

    exchange.set_resizing(false);
    assert_eq!(exchange.producer_seq_value(), 1);
    assert_eq!(exchange.consumer_seq_value(), 0);
    assert_eq!(exchange.display_seq_value(), 0);
    assert_eq!(exchange.epoch(), epoch_before + 1);

    let (_, seq) = produce(&exchange, 0);
    assert_eq!(seq, 1);
}

#[test]
fn consumer_sequence_is_monotonic_under_concurrent_production() {
    let exchange = Arc::new(setup());
    let frames = 10_000u64;

    let producer = {
        let exchange = Arc::clone(&exchange);
        std::thread::spawn(move || {
            for _ in 0..frames {
                produce(&exchange, 0);
            }
        })
    };

    let mut last = 0u64;
    loop {
        if let Some(frame) = exchange.select_display_frame(ready, |_| {}) {
            assert!(frame.seq > last, "consumer_seq went backwards");
            last = frame.seq;
        }
        if last == frames {
            break;
        }
        if producer.is_finished() && last < frames {
            // Producer done; polling must now reach the final frame.
            while last < frames {
                if let Some(frame) = exchange.select_display_frame(ready, |_| {}) {
                    assert!(frame.seq > last, "consumer_seq went backwards");
                    last = frame.seq;
                }
            }
            assert_eq!(last, frames);
            break;
        }
    }

    producer.join().expect("producer thread");
}

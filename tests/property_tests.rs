//! Property tests for the core data structures.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use smarthouse::devices::buzzer::Buzzer;
use smarthouse::devices::led::LedState;
use smarthouse::events::{DeviceEvent, EventQueue, EventSource, StateSnapshot, EVENT_QUEUE_CAP};
use smarthouse::melody;

fn led_event(tag: u64) -> DeviceEvent {
    DeviceEvent {
        source: EventSource::Led,
        state: StateSnapshot::Led(LedState {
            active: tag % 2 == 0,
            timestamp: tag,
        }),
    }
}

fn event_tag(event: &DeviceEvent) -> u64 {
    match event.state {
        StateSnapshot::Led(s) => s.timestamp,
        _ => unreachable!("only LED events are enqueued here"),
    }
}

proptest! {
    /// The queue never exceeds its capacity and overflow always evicts
    /// the oldest entries, keeping the newest.
    #[test]
    fn queue_is_bounded_and_drops_oldest(n in 0usize..50) {
        let mut queue = EventQueue::new();
        for tag in 0..n as u64 {
            queue.push(led_event(tag));
        }

        prop_assert!(queue.len() <= EVENT_QUEUE_CAP);
        prop_assert_eq!(queue.len(), n.min(EVENT_QUEUE_CAP));
        prop_assert_eq!(queue.dropped() as usize, n.saturating_sub(EVENT_QUEUE_CAP));

        if n > 0 {
            let expect_first = n.saturating_sub(EVENT_QUEUE_CAP) as u64;
            let first = queue.pop().unwrap();
            prop_assert_eq!(event_tag(&first), expect_first);

            let mut last = first;
            while let Some(event) = queue.pop() {
                last = event;
            }
            prop_assert_eq!(event_tag(&last), n as u64 - 1);
        }
    }

    /// Under capacity the queue is strictly FIFO.
    #[test]
    fn queue_preserves_fifo_order(n in 1usize..=EVENT_QUEUE_CAP) {
        let mut queue = EventQueue::new();
        for tag in 0..n as u64 {
            queue.push(led_event(tag));
        }
        for tag in 0..n as u64 {
            let event = queue.pop().unwrap();
            prop_assert_eq!(event_tag(&event), tag);
        }
        prop_assert!(queue.pop().is_none());
    }

    /// The melody cursor wraps instead of running past the end, no matter
    /// how many note deadlines elapse.
    #[test]
    fn melody_cursor_stays_in_range(advances in 0u64..500) {
        let mut buzzer = Buzzer::new(melody::THEME, 512);
        buzzer.start_melody(0, 0);

        let mut now_ms = 0;
        for _ in 0..advances {
            // Jump far past any note duration so each poll advances.
            now_ms += 10_000;
            buzzer.poll(now_ms);
            prop_assert!(buzzer.note_index() < melody::THEME.len());
        }

        buzzer.stop_melody(now_ms);
        prop_assert_eq!(buzzer.note_index(), 0);
        prop_assert!(!buzzer.state().active);
    }
}

//! Property-based tests for queue policy
//!
//! Drives the pure queue transitions with seeded generators so the
//! invariants hold across arbitrary playlist shapes, not just the
//! hand-picked cases in the unit tests.

use jukebox_rs::queue::{self, EndedOutcome};
use jukebox_rs::RepeatMode;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===== Strategies =====

/// A playlist length together with a cursor that is either absent or in
/// range.
fn len_and_cursor() -> impl Strategy<Value = (usize, Option<usize>)> {
    (1usize..50).prop_flat_map(|len| {
        (
            Just(len),
            prop_oneof![Just(None), (0..len).prop_map(Some)],
        )
    })
}

/// A playlist of at least two tracks with an in-range cursor.
fn len_and_index() -> impl Strategy<Value = (usize, usize)> {
    (2usize..50).prop_flat_map(|len| (Just(len), 0..len))
}

// ===== Properties =====

proptest! {
    /// Property: without shuffle the successor is (cursor + 1) mod len,
    /// with an absent cursor treated as the slot before the first track.
    #[test]
    fn sequential_advance_is_a_modular_increment(
        (len, cursor) in len_and_cursor(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let expected = match cursor {
            Some(index) => (index + 1) % len,
            None => 0,
        };
        prop_assert_eq!(queue::advance(len, cursor, false, &mut rng), Some(expected));
    }

    /// Property: a shuffled draw lands in range and never on the cursor
    /// when another track exists.
    #[test]
    fn shuffled_advance_avoids_the_current_track(
        (len, index) in len_and_index(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let next = queue::advance(len, Some(index), true, &mut rng);
        prop_assert!(matches!(next, Some(n) if n < len && n != index));
    }

    /// Property: a single-track playlist is its own shuffle successor.
    #[test]
    fn shuffled_advance_on_one_track_is_fixed(
        seed in any::<u64>(),
        from_start in any::<bool>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let cursor = if from_start { None } else { Some(0) };
        prop_assert_eq!(queue::advance(1, cursor, true, &mut rng), Some(0));
    }

    /// Property: stepping back is always sequential, wrapping to the last
    /// track from the front, shuffle or not.
    #[test]
    fn retreat_is_sequential_with_wraparound((len, cursor) in len_and_cursor()) {
        let expected = match cursor {
            Some(index) if index > 0 => index - 1,
            _ => len - 1,
        };
        prop_assert_eq!(queue::retreat(len, cursor), Some(expected));
    }

    /// Property: repeat-one replays regardless of cursor or shuffle.
    #[test]
    fn repeat_one_always_replays(
        (len, cursor) in len_and_cursor(),
        shuffle in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = queue::resolve_ended(len, cursor, shuffle, RepeatMode::One, &mut rng);
        prop_assert_eq!(outcome, EndedOutcome::Replay);
    }

    /// Property: with repeat off, playback stops exactly on the last
    /// track and advances sequentially everywhere else.
    #[test]
    fn repeat_off_stops_only_on_the_last_track(
        (len, index) in (1usize..50).prop_flat_map(|len| (Just(len), 0..len)),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = queue::resolve_ended(len, Some(index), false, RepeatMode::Off, &mut rng);
        if index + 1 == len {
            prop_assert_eq!(outcome, EndedOutcome::Stop);
        } else {
            prop_assert_eq!(outcome, EndedOutcome::Advance(index + 1));
        }
    }

    /// Property: repeat-all always lands on a valid next index, honoring
    /// shuffle's no-repeat rule when it applies.
    #[test]
    fn repeat_all_always_advances_in_range(
        (len, cursor) in len_and_cursor(),
        shuffle in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = queue::resolve_ended(len, cursor, shuffle, RepeatMode::All, &mut rng);
        match outcome {
            EndedOutcome::Advance(next) => {
                prop_assert!(next < len);
                if shuffle && len > 1 {
                    prop_assert!(cursor != Some(next));
                }
            }
            other => prop_assert!(false, "expected an advance, got {:?}", other),
        }
    }
}

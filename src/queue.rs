//! Queue advancement policy
//!
//! Pure functions over (playlist length, cursor, shuffle, repeat). The
//! coordinator owns all state and the rng, so every transition here is a
//! plain computation the tests can drive with a seeded generator.

use rand::Rng;

use crate::model::RepeatMode;

/// Resolution of a track-ended report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndedOutcome {
    /// Re-seek the current track to 0 and resume; cursor unchanged.
    Replay,
    /// Load and play the track at this index.
    Advance(usize),
    /// Playlist exhausted: stop until a manual selection restarts playback.
    Stop,
}

/// Forward step.
///
/// Under shuffle the successor is drawn uniformly from the other indices;
/// a single-track playlist is its own successor (explicit base case, no
/// rejection loop on one element). Without shuffle the cursor advances
/// sequentially and wraps, with an absent cursor treated as the position
/// before the first track.
pub fn advance<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    shuffle: bool,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    if shuffle {
        if len == 1 {
            return Some(0);
        }
        loop {
            let candidate = rng.gen_range(0..len);
            if current != Some(candidate) {
                return Some(candidate);
            }
        }
    } else {
        match current {
            Some(index) => Some((index + 1) % len),
            None => Some(0),
        }
    }
}

/// Backward step: always sequential with wraparound from the first track
/// to the last. Shuffle deliberately does not apply in this direction.
pub fn retreat(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(index) if index > 0 => Some(index - 1),
        _ => Some(len - 1),
    }
}

/// Policy applied when the device reports the current track finished.
pub fn resolve_ended<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> EndedOutcome {
    if len == 0 {
        return EndedOutcome::Stop;
    }

    match repeat {
        RepeatMode::One => EndedOutcome::Replay,
        RepeatMode::All => match advance(len, current, shuffle, rng) {
            Some(index) => EndedOutcome::Advance(index),
            None => EndedOutcome::Stop,
        },
        RepeatMode::Off => {
            // An absent cursor sits before the first track, so anything
            // short of the final index keeps advancing.
            let before_last = match current {
                Some(index) => index + 1 < len,
                None => true,
            };
            if !before_last {
                return EndedOutcome::Stop;
            }
            match advance(len, current, shuffle, rng) {
                Some(index) => EndedOutcome::Advance(index),
                None => EndedOutcome::Stop,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x6a75_6b65)
    }

    #[test]
    fn sequential_advance_wraps_around() {
        let mut rng = rng();
        let mut index = None;
        let mut visited = Vec::new();
        for _ in 0..7 {
            index = advance(3, index, false, &mut rng);
            visited.push(index.unwrap());
        }
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn advance_from_no_cursor_starts_at_zero() {
        assert_eq!(advance(5, None, false, &mut rng()), Some(0));
    }

    #[test]
    fn advance_on_empty_playlist_is_none() {
        assert_eq!(advance(0, None, false, &mut rng()), None);
        assert_eq!(advance(0, None, true, &mut rng()), None);
    }

    #[test]
    fn shuffle_single_track_is_a_fixpoint() {
        // Must terminate and return the only index, never loop.
        for _ in 0..100 {
            assert_eq!(advance(1, Some(0), true, &mut rng()), Some(0));
        }
    }

    #[test]
    fn shuffle_never_repeats_current_and_covers_the_rest() {
        let mut rng = rng();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let next = advance(5, Some(2), true, &mut rng).unwrap();
            assert_ne!(next, 2, "shuffle returned the current index");
            assert!(next < 5);
            seen.insert(next);
        }
        // 1000 draws over 4 candidates: all of {0, 1, 3, 4} show up.
        assert_eq!(seen, HashSet::from([0, 1, 3, 4]));
    }

    #[test]
    fn retreat_steps_back_and_wraps_from_zero() {
        assert_eq!(retreat(4, Some(3)), Some(2));
        assert_eq!(retreat(4, Some(1)), Some(0));
        assert_eq!(retreat(4, Some(0)), Some(3));
        assert_eq!(retreat(4, None), Some(3));
        assert_eq!(retreat(0, None), None);
    }

    #[test]
    fn ended_with_repeat_one_replays_regardless_of_position() {
        for index in [None, Some(0), Some(2), Some(4)] {
            let outcome = resolve_ended(5, index, false, RepeatMode::One, &mut rng());
            assert_eq!(outcome, EndedOutcome::Replay);
        }
    }

    #[test]
    fn ended_with_repeat_all_wraps_past_the_end() {
        let outcome = resolve_ended(3, Some(2), false, RepeatMode::All, &mut rng());
        assert_eq!(outcome, EndedOutcome::Advance(0));
    }

    #[test]
    fn ended_with_repeat_all_honors_shuffle() {
        let mut rng = rng();
        for _ in 0..200 {
            match resolve_ended(5, Some(2), true, RepeatMode::All, &mut rng) {
                EndedOutcome::Advance(index) => {
                    assert_ne!(index, 2);
                    assert!(index < 5);
                }
                other => panic!("expected advance, got {:?}", other),
            }
        }
    }

    #[test]
    fn ended_without_repeat_advances_until_the_last_track() {
        let outcome = resolve_ended(3, Some(1), false, RepeatMode::Off, &mut rng());
        assert_eq!(outcome, EndedOutcome::Advance(2));
        // A cleared cursor sits before the first track and advances to it.
        let outcome = resolve_ended(3, None, false, RepeatMode::Off, &mut rng());
        assert_eq!(outcome, EndedOutcome::Advance(0));
    }

    #[test]
    fn ended_without_repeat_stops_on_the_last_track() {
        let outcome = resolve_ended(3, Some(2), false, RepeatMode::Off, &mut rng());
        assert_eq!(outcome, EndedOutcome::Stop);
        let outcome = resolve_ended(1, Some(0), false, RepeatMode::Off, &mut rng());
        assert_eq!(outcome, EndedOutcome::Stop);
    }

    #[test]
    fn ended_on_empty_playlist_stops() {
        for repeat in [RepeatMode::Off, RepeatMode::One, RepeatMode::All] {
            let outcome = resolve_ended(0, None, false, repeat, &mut rng());
            assert_eq!(outcome, EndedOutcome::Stop);
        }
    }
}

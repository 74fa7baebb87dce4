//! # Motion classification

use crate::detector::Blob;
use log::debug;
use nalgebra as na;

/// Horizontal travel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Classified motion of the tracked target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// No target acquired this cycle.
    Starting,
    /// Target displaced beyond the move tolerance.
    Moving(Direction),
    /// Target displacement within the move tolerance.
    Stopped,
}

/// Result of a single decision-tick classification.
#[derive(Clone, Debug)]
pub struct Classification {
    pub state: MotionState,
    /// The blob the decision was made on, if any.
    pub blob: Option<Blob>,
    /// True when `state` differs from the previously announced state.
    pub transition: bool,
}

/// Stateful classifier for the dominant moving region.
///
/// The per-cycle state is recomputed from scratch on every decision tick, while the
/// announcement check compares against the state carried over from the previous
/// transition. Keeping the two apart is what makes a transition fire exactly once per
/// contiguous run of identical classifications.
pub struct MotionClassifier {
    move_tolerance: f32,
    last_announced: MotionState,
    last_position: na::Point2<f32>,
}

impl MotionClassifier {
    /// Create a classifier with no target acquired.
    ///
    /// # Arguments
    ///
    /// * `move_tolerance` - horizontal displacement (in pixels) below which the target
    ///   counts as stopped.
    pub fn new(move_tolerance: f32) -> Self {
        Self {
            move_tolerance,
            last_announced: MotionState::Starting,
            last_position: na::Point2::new(0.0, 0.0),
        }
    }

    /// Classify the current decision tick.
    ///
    /// The biggest blob by pixel count is selected (first in detector order on ties)
    /// and its horizontal displacement from the last known position decides the state.
    /// An empty blob list yields [`MotionState::Starting`] without touching the
    /// announced state or the last position, so a direction resuming after a momentary
    /// blob dropout is not re-announced.
    pub fn classify(&mut self, blobs: &[Blob]) -> Classification {
        let blob = match biggest_blob(blobs) {
            Some(blob) => blob,
            None => {
                return Classification {
                    state: MotionState::Starting,
                    blob: None,
                    transition: false,
                }
            }
        };

        let x_change = (self.last_position.x - blob.centroid.x).abs();

        let state = if x_change > self.move_tolerance {
            if blob.centroid.x < self.last_position.x {
                MotionState::Moving(Direction::Left)
            } else {
                MotionState::Moving(Direction::Right)
            }
        } else {
            MotionState::Stopped
        };

        let transition = state != self.last_announced;
        if transition {
            self.last_announced = state;
        }

        // The position baseline always follows the selected blob, whichever branch ran.
        self.last_position = blob.centroid;

        debug!(
            "x change {:.1}, state {:?}, transition {}",
            x_change, state, transition
        );

        Classification {
            state,
            blob: Some(blob.clone()),
            transition,
        }
    }

    /// Last selected blob centroid.
    pub fn last_position(&self) -> na::Point2<f32> {
        self.last_position
    }

    /// State set by the most recent announcement.
    pub fn last_announced(&self) -> MotionState {
        self.last_announced
    }
}

/// Pick the blob with the most pixels, keeping the first one on ties.
fn biggest_blob(blobs: &[Blob]) -> Option<&Blob> {
    blobs.iter().fold(None, |best: Option<&Blob>, blob| match best {
        Some(b) if b.pixels >= blob.pixels => Some(b),
        _ => Some(blob),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Rect;

    fn blob_at(x: f32, pixels: usize) -> Blob {
        Blob {
            centroid: na::Point2::new(x, 10.0),
            pixels,
            rect: Rect::default(),
        }
    }

    fn classify_one(classifier: &mut MotionClassifier, x: f32) -> Classification {
        classifier.classify(&[blob_at(x, 2500)])
    }

    #[test]
    fn empty_blobs_report_starting() {
        let mut classifier = MotionClassifier::new(80.0);

        let c = classifier.classify(&[]);

        assert_eq!(c.state, MotionState::Starting);
        assert!(c.blob.is_none());
        assert!(!c.transition);
    }

    #[test]
    fn large_negative_displacement_moves_left() {
        let mut classifier = MotionClassifier::new(80.0);

        // Establish the baseline at x = 200.
        classify_one(&mut classifier, 200.0);

        let c = classify_one(&mut classifier, 48.0);

        assert_eq!(c.state, MotionState::Moving(Direction::Left));
        assert!(c.transition);
        assert_eq!(classifier.last_position().x, 48.0);
    }

    #[test]
    fn large_positive_displacement_moves_right() {
        let mut classifier = MotionClassifier::new(80.0);

        let c = classify_one(&mut classifier, 300.0);

        assert_eq!(c.state, MotionState::Moving(Direction::Right));
        assert!(c.transition);
    }

    #[test]
    fn transition_fires_once_per_contiguous_run() {
        let mut classifier = MotionClassifier::new(80.0);

        // Three consecutive leftward jumps, each beyond tolerance.
        classify_one(&mut classifier, 500.0);
        let first = classify_one(&mut classifier, 400.0);
        let second = classify_one(&mut classifier, 300.0);
        let third = classify_one(&mut classifier, 200.0);

        assert!(first.transition);
        assert!(!second.transition);
        assert!(!third.transition);
    }

    #[test]
    fn reversal_reannounces_direction() {
        let mut classifier = MotionClassifier::new(80.0);

        classify_one(&mut classifier, 500.0);
        classify_one(&mut classifier, 400.0);
        let right = classify_one(&mut classifier, 490.0);
        let left = classify_one(&mut classifier, 400.0);

        assert_eq!(right.state, MotionState::Moving(Direction::Right));
        assert!(right.transition);
        assert_eq!(left.state, MotionState::Moving(Direction::Left));
        assert!(left.transition);
    }

    #[test]
    fn settling_within_tolerance_stops_once() {
        let mut classifier = MotionClassifier::new(80.0);

        classify_one(&mut classifier, 300.0);
        let stop = classify_one(&mut classifier, 299.0);
        let still = classify_one(&mut classifier, 300.0);

        assert_eq!(stop.state, MotionState::Stopped);
        assert!(stop.transition);
        assert_eq!(still.state, MotionState::Stopped);
        assert!(!still.transition);
    }

    #[test]
    fn no_blobs_keeps_announced_state() {
        let mut classifier = MotionClassifier::new(80.0);

        classify_one(&mut classifier, 500.0);
        classify_one(&mut classifier, 400.0);

        // Momentary dropout, then the same direction resumes.
        let dropout = classifier.classify(&[]);
        let resumed = classify_one(&mut classifier, 300.0);

        assert_eq!(dropout.state, MotionState::Starting);
        assert_eq!(classifier.last_announced(), MotionState::Moving(Direction::Left));
        assert_eq!(classifier.last_position().x, 400.0);
        assert_eq!(resumed.state, MotionState::Moving(Direction::Left));
        assert!(!resumed.transition);
    }

    #[test]
    fn biggest_blob_wins_and_ties_keep_first() {
        let mut classifier = MotionClassifier::new(80.0);

        let c = classifier.classify(&[
            blob_at(100.0, 3000),
            blob_at(200.0, 5000),
            blob_at(300.0, 5000),
        ]);

        assert_eq!(c.blob.unwrap().centroid.x, 200.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let script = [vec![blob_at(300.0, 2500)], vec![], vec![blob_at(301.0, 2500)]];

        let mut a = MotionClassifier::new(80.0);
        let mut b = MotionClassifier::new(80.0);

        for blobs in &script {
            let ca = a.classify(blobs);
            let cb = b.classify(blobs);
            assert_eq!(ca.state, cb.state);
            assert_eq!(ca.transition, cb.transition);
        }
    }
}

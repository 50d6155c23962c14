//! Append-only altitude sample storage.

use std::{
    ops::Deref,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// One recorded point of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeSample {
    /// Meters above sea level.
    pub altitude: f32,

    /// Cumulative distance from the first sample (meters).
    pub distance: f32,
}

/// Shared, growable sequence of [AltitudeSample]s.
///
/// Clones are handles to the same sequence, so a track producer and a
/// renderer can each own one. Ordering and value ranges are not
/// validated; callers are expected to append in recording order.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Arc<Mutex<Vec<AltitudeSample>>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample to the end of the sequence.
    pub fn append(&self, altitude: f32, distance: f32) {
        self.lock().push(AltitudeSample { altitude, distance });
    }

    /// Removes all samples.
    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a copy of the current sequence.
    ///
    /// The lock is only held for the duration of the copy; the
    /// returned [Snapshot] is unaffected by later appends or resets.
    pub fn snapshot(&self) -> Snapshot {
        let samples = self.lock().as_slice().into();
        Snapshot(samples)
    }
}

/// Private API.
impl SampleStore {
    fn lock(&self) -> MutexGuard<'_, Vec<AltitudeSample>> {
        // Samples are plain values, a panicking writer can not leave
        // the vector half-updated.
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Immutable copy of a [SampleStore] at a point in time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot(Box<[AltitudeSample]>);

impl Snapshot {
    pub fn samples(&self) -> &[AltitudeSample] {
        &self.0
    }
}

impl Deref for Snapshot {
    type Target = [AltitudeSample];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<AltitudeSample>> for Snapshot {
    fn from(samples: Vec<AltitudeSample>) -> Self {
        Self(samples.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::{AltitudeSample, SampleStore};
    use std::thread;

    #[test]
    fn test_append_preserves_order() {
        let store = SampleStore::new();
        store.append(100.0, 0.0);
        store.append(120.0, 60.0);
        store.append(90.0, 130.0);
        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.samples(),
            &[
                AltitudeSample {
                    altitude: 100.0,
                    distance: 0.0
                },
                AltitudeSample {
                    altitude: 120.0,
                    distance: 60.0
                },
                AltitudeSample {
                    altitude: 90.0,
                    distance: 130.0
                },
            ]
        );
    }

    #[test]
    fn test_snapshot_is_decoupled() {
        let store = SampleStore::new();
        store.append(1.0, 0.0);
        store.append(2.0, 10.0);
        let snapshot = store.snapshot();

        store.append(3.0, 20.0);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.len(), 3);

        store.reset();
        assert!(store.is_empty());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].altitude, 2.0);
    }

    #[test]
    fn test_clones_share_samples() {
        let store = SampleStore::new();
        let producer = store.clone();
        producer.append(5.0, 0.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_during_concurrent_appends() {
        const N: usize = 2_000;
        let store = SampleStore::new();
        let producer = store.clone();

        let writer = thread::spawn(move || {
            for i in 0..N {
                #[allow(clippy::cast_precision_loss)]
                producer.append(i as f32, i as f32 * 10.0);
            }
        });

        let mut last_len = 0;
        while last_len < N {
            let snapshot = store.snapshot();
            // Every snapshot is a complete prefix of the final series.
            assert!(snapshot.len() >= last_len);
            for (i, sample) in snapshot.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let expected = i as f32;
                assert_eq!(sample.altitude, expected);
            }
            last_len = snapshot.len();
        }

        writer.join().unwrap();
        assert_eq!(store.snapshot().len(), N);
    }
}

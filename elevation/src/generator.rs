use crate::{rasterize, PixelBuffer, ProfileStats, SampleStore, Size, Theme};
use log::{debug, error};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Fewest samples that describe a profile.
const MIN_SAMPLES: usize = 2;

/// What became of a [ProfileGenerator::request_image] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// A render was started; the callback will be invoked once.
    Scheduled,

    /// Another render is in flight; the request was dropped.
    Busy,

    /// Fewer than two samples; the request was dropped.
    Insufficient,
}

/// Renders profile images of a [SampleStore] on a background thread.
///
/// At most one render is in flight at any time. Requests arriving
/// while one is running are dropped, not queued, so callers must not
/// count on one image per request.
#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    store: SampleStore,
    theme: Arc<Theme>,
    rendering: Arc<AtomicBool>,
}

impl Default for ProfileGenerator {
    fn default() -> Self {
        Self::new(SampleStore::new())
    }
}

impl ProfileGenerator {
    pub fn new(store: SampleStore) -> Self {
        Self {
            store,
            theme: Arc::new(Theme::default()),
            rendering: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Arc::new(theme);
        self
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Appends one sample; see [SampleStore::append].
    pub fn append(&self, altitude: f32, distance: f32) {
        self.store.append(altitude, distance);
    }

    /// Removes all samples.
    pub fn reset(&self) {
        self.store.reset();
    }

    /// Returns `true` while a render is in flight.
    pub fn is_rendering(&self) -> bool {
        self.rendering.load(Ordering::Acquire)
    }

    /// Renders the current samples into a `size` image.
    ///
    /// Returns immediately. The image is passed to `callback` on a
    /// worker thread, or `None` if rasterization failed. Nothing is
    /// rendered, and `callback` is dropped uncalled, when a render is
    /// already in flight or fewer than two samples exist.
    pub fn request_image<F>(&self, size: Size, callback: F) -> Request
    where
        F: FnOnce(Option<PixelBuffer>) + Send + 'static,
    {
        if self.is_rendering() {
            return Request::Busy;
        }

        let snapshot = self.store.snapshot();
        if snapshot.len() < MIN_SAMPLES {
            return Request::Insufficient;
        }
        let stats = ProfileStats::from_samples(&snapshot);

        let Some(guard) = InFlight::acquire(&self.rendering) else {
            return Request::Busy;
        };

        let theme = Arc::clone(&self.theme);
        rayon::spawn(move || {
            let _guard = guard;
            let now = std::time::Instant::now();
            let image = match rasterize(&snapshot, &stats, size, &theme) {
                Ok(image) => Some(image),
                Err(e) => {
                    error!("profile render {size:?}: {e}");
                    None
                }
            };
            debug!(
                "profile render; samples: {}, size: {size:?}, exec: {:?}",
                snapshot.len(),
                now.elapsed()
            );
            callback(image);
        });
        Request::Scheduled
    }
}

/// Holds the in-flight flag; clears it when dropped.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// Remote collection snapshot
//
// Holds the last successful fetch of one collection plus a generation counter.
// Every load bumps the counter; a result is only applied when it carries the
// latest generation, so a slow response can never overwrite a newer one.

#[derive(Debug, Clone, Default)]
pub struct Remote<T> {
    data: T,
    generation: u64,
    loading: bool,
    loaded: bool,
    error: Option<String>,
}

impl<T: Default> Remote<T> {
    /// Start a load, returning the generation it must settle with
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Apply a load result. Returns false when the result was stale.
    pub fn settle(&mut self, generation: u64, result: Result<T, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.loaded = true;
                self.error = None;
            }
            // Keep the previous snapshot on failure
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Drop the snapshot and invalidate any in-flight load
    pub fn reset(&mut self) {
        self.generation += 1;
        self.data = T::default();
        self.loading = false;
        self.loaded = false;
        self.error = None;
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_result_is_ignored() {
        let mut remote: Remote<Vec<u32>> = Remote::default();
        let old = remote.begin();
        let new = remote.begin();

        assert!(remote.settle(new, Ok(vec![1, 2])));
        assert!(!remote.settle(old, Ok(vec![9])));
        assert_eq!(remote.data(), &vec![1, 2]);
        assert!(!remote.is_loading());
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut remote: Remote<Vec<u32>> = Remote::default();
        let g = remote.begin();
        remote.settle(g, Ok(vec![1]));

        let g = remote.begin();
        remote.settle(g, Err("boom".to_string()));
        assert_eq!(remote.data(), &vec![1]);
        assert_eq!(remote.error(), Some("boom"));
        assert!(remote.is_loaded());
    }

    #[test]
    fn reset_invalidates_in_flight_loads() {
        let mut remote: Remote<Vec<u32>> = Remote::default();
        let g = remote.begin();
        remote.reset();
        assert!(!remote.settle(g, Ok(vec![1])));
        assert!(remote.data().is_empty());
        assert!(!remote.is_loaded());
    }
}

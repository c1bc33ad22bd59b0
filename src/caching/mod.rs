//! # Fitness Caching
//!
//! Evaluator wrappers that remember the fitness of genomes they have already
//! scored. Useful when the fitness function is expensive and the same genomes
//! keep reappearing, as happens when crossover is skipped and parents pass
//! through unchanged.
//!
//! [`CachedEvaluator`] shares one map between all worker threads.
//! [`ThreadLocalCachedEvaluator`] keeps one map per worker thread, which
//! avoids lock contention during parallel evaluation at the cost of
//! evaluating a genome once per thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use thread_local::ThreadLocal;
use tracing::warn;

use crate::error::Result;
use crate::fitness::{EvaluationMode, FitnessEvaluator};
use crate::genome::Genome;

/// A genome that can be used as a cache key.
///
/// Genomes that would receive the same fitness must produce the same key.
pub trait CacheKey: Genome {
    type Key: Eq + Hash + Clone + Debug + Send + Sync;

    fn cache_key(&self) -> Self::Key;
}

/// Wraps an evaluator with a cache shared across threads.
///
/// Evaluation errors are never cached.
#[derive(Debug)]
pub struct CachedEvaluator<G, E>
where
    G: CacheKey,
{
    evaluator: E,
    cache: Arc<Mutex<HashMap<G::Key, f64>>>,
    _marker: PhantomData<fn(&G)>,
}

impl<G, E> Clone for CachedEvaluator<G, E>
where
    G: CacheKey,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            evaluator: self.evaluator.clone(),
            cache: Arc::clone(&self.cache),
            _marker: PhantomData,
        }
    }
}

impl<G, E> CachedEvaluator<G, E>
where
    G: CacheKey,
    E: FitnessEvaluator<G>,
{
    pub fn new(evaluator: E) -> Self {
        Self::with_cache(evaluator, HashMap::new())
    }

    /// Creates a cached evaluator with a pre-populated cache.
    pub fn with_cache(evaluator: E, cache: HashMap<G::Key, f64>) -> Self {
        Self {
            evaluator,
            cache: Arc::new(Mutex::new(cache)),
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    /// Returns a copy of the cache.
    pub fn get_cache(&self) -> HashMap<G::Key, f64> {
        self.lock().clone()
    }

    // A poisoned lock only means another thread panicked between two map
    // operations; the map itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<G::Key, f64>> {
        self.cache.lock().unwrap_or_else(|poisoned| {
            warn!("Fitness cache lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

impl<G, E> FitnessEvaluator<G> for CachedEvaluator<G, E>
where
    G: CacheKey,
    E: FitnessEvaluator<G>,
{
    fn evaluate(&self, genome: &G) -> Result<f64> {
        let key = genome.cache_key();
        if let Some(&score) = self.lock().get(&key) {
            return Ok(score);
        }

        // The lock is not held while evaluating so other workers keep going.
        let score = self.evaluator.evaluate(genome)?;
        self.lock().insert(key, score);
        Ok(score)
    }

    fn evaluation_mode(&self) -> EvaluationMode {
        self.evaluator.evaluation_mode()
    }
}

/// A cache with one map per thread.
pub struct ThreadLocalCache<K: Send> {
    cache: ThreadLocal<RefCell<HashMap<K, f64>>>,
}

impl<K> ThreadLocalCache<K>
where
    K: Eq + Hash + Send,
{
    pub fn new() -> Self {
        Self {
            cache: ThreadLocal::new(),
        }
    }

    fn local(&self) -> &RefCell<HashMap<K, f64>> {
        self.cache.get_or(|| RefCell::new(HashMap::new()))
    }

    /// Looks up `key` in the current thread's map.
    pub fn get(&self, key: &K) -> Option<f64> {
        self.local()
            .try_borrow()
            .ok()
            .and_then(|cache| cache.get(key).copied())
    }

    pub fn insert(&self, key: K, value: f64) {
        if let Ok(mut cache) = self.local().try_borrow_mut() {
            cache.insert(key, value);
        }
    }

    /// Clears the current thread's map.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.local().try_borrow_mut() {
            cache.clear();
        }
    }

    /// Number of entries in the current thread's map.
    pub fn len(&self) -> usize {
        self.cache
            .get()
            .and_then(|cell| cell.try_borrow().ok())
            .map_or(0, |cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for ThreadLocalCache<K>
where
    K: Eq + Hash + Send,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Send> Debug for ThreadLocalCache<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadLocalCache").finish_non_exhaustive()
    }
}

/// Wraps an evaluator with a per-thread cache.
#[derive(Debug)]
pub struct ThreadLocalCachedEvaluator<G, E>
where
    G: CacheKey,
{
    evaluator: E,
    cache: Arc<ThreadLocalCache<G::Key>>,
    _marker: PhantomData<fn(&G)>,
}

impl<G, E> Clone for ThreadLocalCachedEvaluator<G, E>
where
    G: CacheKey,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            evaluator: self.evaluator.clone(),
            cache: Arc::clone(&self.cache),
            _marker: PhantomData,
        }
    }
}

impl<G, E> ThreadLocalCachedEvaluator<G, E>
where
    G: CacheKey,
    E: FitnessEvaluator<G>,
{
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            cache: Arc::new(ThreadLocalCache::new()),
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    /// Clears the cache of the current thread.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached evaluations of the current thread.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl<G, E> FitnessEvaluator<G> for ThreadLocalCachedEvaluator<G, E>
where
    G: CacheKey,
    E: FitnessEvaluator<G>,
{
    fn evaluate(&self, genome: &G) -> Result<f64> {
        let key = genome.cache_key();
        if let Some(score) = self.cache.get(&key) {
            return Ok(score);
        }

        let score = self.evaluator.evaluate(genome)?;
        self.cache.insert(key, score);
        Ok(score)
    }

    fn evaluation_mode(&self) -> EvaluationMode {
        self.evaluator.evaluation_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct Point(i32);

    impl CacheKey for Point {
        type Key = i32;

        fn cache_key(&self) -> Self::Key {
            self.0
        }
    }

    #[derive(Debug, Clone)]
    struct DistanceEvaluator {
        target: i32,
        evaluations: Arc<AtomicUsize>,
    }

    impl DistanceEvaluator {
        fn new(target: i32) -> Self {
            Self {
                target,
                evaluations: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn evaluations(&self) -> usize {
            self.evaluations.load(Ordering::SeqCst)
        }
    }

    impl FitnessEvaluator<Point> for DistanceEvaluator {
        fn evaluate(&self, genome: &Point) -> Result<f64> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            if genome.0 < 0 {
                return Err(GeneticError::FitnessCalculation("negative point".to_string()));
            }
            Ok((genome.0 - self.target).abs() as f64)
        }

        fn evaluation_mode(&self) -> EvaluationMode {
            EvaluationMode::Minimize
        }
    }

    #[test]
    fn test_cached_evaluator() {
        let evaluator = DistanceEvaluator::new(50);
        let cached = CachedEvaluator::new(evaluator.clone());

        let first = cached.evaluate(&Point(10)).unwrap();
        assert_eq!(evaluator.evaluations(), 1);

        let second = cached.evaluate(&Point(10)).unwrap();
        assert_eq!(evaluator.evaluations(), 1);
        assert_eq!(first, second);

        cached.evaluate(&Point(20)).unwrap();
        assert_eq!(evaluator.evaluations(), 2);
        assert_eq!(cached.cache_size(), 2);
        assert_eq!(cached.evaluation_mode(), EvaluationMode::Minimize);

        cached.clear_cache();
        assert_eq!(cached.cache_size(), 0);
        cached.evaluate(&Point(10)).unwrap();
        assert_eq!(evaluator.evaluations(), 3);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let evaluator = DistanceEvaluator::new(0);
        let cached = CachedEvaluator::new(evaluator.clone());

        assert!(cached.evaluate(&Point(-1)).is_err());
        assert!(cached.evaluate(&Point(-1)).is_err());
        assert_eq!(evaluator.evaluations(), 2);
        assert_eq!(cached.cache_size(), 0);
    }

    #[test]
    fn test_with_cache() {
        let evaluator = DistanceEvaluator::new(50);
        let mut cache = HashMap::new();
        cache.insert(10, 0.5);

        let cached = CachedEvaluator::with_cache(evaluator.clone(), cache);
        assert_eq!(cached.evaluate(&Point(10)).unwrap(), 0.5);
        assert_eq!(evaluator.evaluations(), 0);
        assert_eq!(cached.get_cache().get(&10), Some(&0.5));
    }

    #[test]
    fn test_thread_local_cached_evaluator() {
        let evaluator = DistanceEvaluator::new(50);
        let cached = ThreadLocalCachedEvaluator::new(evaluator.clone());

        let first = cached.evaluate(&Point(10)).unwrap();
        let second = cached.evaluate(&Point(10)).unwrap();
        assert_eq!(first, second);
        assert_eq!(evaluator.evaluations(), 1);

        cached.evaluate(&Point(20)).unwrap();
        assert_eq!(cached.cache_size(), 2);

        cached.clear_cache();
        assert_eq!(cached.cache_size(), 0);
        cached.evaluate(&Point(10)).unwrap();
        assert_eq!(evaluator.evaluations(), 3);
    }

    #[test]
    fn test_thread_local_cache_is_per_thread() {
        let cached = Arc::new(ThreadLocalCachedEvaluator::new(DistanceEvaluator::new(0)));
        cached.evaluate(&Point(3)).unwrap();

        let other = Arc::clone(&cached);
        let size_elsewhere = std::thread::spawn(move || other.cache_size())
            .join()
            .unwrap();

        assert_eq!(size_elsewhere, 0);
        assert_eq!(cached.cache_size(), 1);
    }
}

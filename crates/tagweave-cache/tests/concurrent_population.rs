//! Concurrent first-access tests for `KeyedCache`
//!
//! Many threads race on the same missing key; the miss handler must run
//! exactly once and every reader must see the value it produced.

use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tagweave_cache::KeyedCache;

#[rstest]
#[case(2)]
#[case(16)]
#[case(64)]
fn test_concurrent_miss_invokes_handler_once(#[case] readers: usize) {
	// Arrange
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let cache: Arc<KeyedCache<String, String>> =
		Arc::new(KeyedCache::with_on_missing(move |key: &String| {
			let n = counter.fetch_add(1, Ordering::SeqCst);
			// Widen the race window so late arrivals pile up on the lock.
			thread::sleep(Duration::from_millis(5));
			Ok(format!("{}#{}", key, n))
		}));
	let barrier = Arc::new(Barrier::new(readers));

	// Act
	let handles: Vec<_> = (0..readers)
		.map(|_| {
			let cache = Arc::clone(&cache);
			let barrier = Arc::clone(&barrier);
			thread::spawn(move || {
				barrier.wait();
				cache.get(&"shared".to_string()).unwrap()
			})
		})
		.collect();
	let observed: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

	// Assert
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert!(observed.iter().all(|v| v == "shared#0"));
	assert_eq!(cache.len(), 1);
}

#[rstest]
fn test_distinct_keys_populate_independently() {
	// Arrange
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let cache: Arc<KeyedCache<usize, usize>> =
		Arc::new(KeyedCache::with_on_missing(move |key: &usize| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(key * key)
		}));
	let barrier = Arc::new(Barrier::new(8));

	// Act
	thread::scope(|scope| {
		for _ in 0..8 {
			let cache = Arc::clone(&cache);
			let barrier = Arc::clone(&barrier);
			scope.spawn(move || {
				barrier.wait();
				for key in 0..4 {
					assert_eq!(cache.get(&key).unwrap(), key * key);
				}
			});
		}
	});

	// Assert
	assert_eq!(calls.load(Ordering::SeqCst), 4);
	assert_eq!(cache.keys().len(), 4);
}

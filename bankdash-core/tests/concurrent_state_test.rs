//! Concurrent state file access tests
//!
//! Several CLI invocations can write `state.json` at the same time. Writes
//! are serialized by a lock file and land through a rename, so readers must
//! only ever see a complete file.
//!
//! Run with: cargo test --test concurrent_state_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use bankdash_core::adapters::state_store::{JsonStateStore, STATE_FILE};
use bankdash_core::domain::{AccountMode, AppState};
use bankdash_core::ports::StateStore;

/// Number of concurrent threads, roughly a few CLI processes at once
const THREAD_COUNT: usize = 6;

/// Number of writes per thread
const ITERATIONS_PER_THREAD: usize = 10;

#[test]
fn test_concurrent_writers_never_tear_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let error_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        let error_count = Arc::clone(&error_count);

        handles.push(thread::spawn(move || {
            // Each thread gets its own store, like separate processes
            let store = JsonStateStore::new(&data_dir);
            barrier.wait();

            for i in 0..ITERATIONS_PER_THREAD {
                let mode = if (thread_id + i) % 2 == 0 {
                    AccountMode::Banking
                } else {
                    AccountMode::Crypto
                };
                let email = format!("user{}@example.com", thread_id);
                let result = store.update(&mut |state: &mut AppState| {
                    state.account_mode = mode;
                    state.log_in(email.clone());
                });
                if result.is_err() {
                    error_count.fetch_add(1, Ordering::SeqCst);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(error_count.load(Ordering::SeqCst), 0);

    let content = std::fs::read_to_string(temp_dir.path().join(STATE_FILE)).unwrap();
    let state: AppState = serde_json::from_str(&content).expect("state file should be valid JSON");
    assert!(state.is_logged_in);
    assert!(state
        .user_email
        .as_deref()
        .is_some_and(|e| e.starts_with("user") && e.ends_with("@example.com")));
}

#[test]
fn test_readers_during_writes_see_whole_states() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    JsonStateStore::new(&data_dir).save(&AppState::default()).unwrap();

    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        thread::spawn(move || {
            let store = JsonStateStore::new(&data_dir);
            barrier.wait();
            for i in 0..50 {
                let mut state = AppState::default();
                state.user_pin = format!("{:04}", i);
                store.save(&state).unwrap();
            }
        })
    };

    let reader = {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..50 {
                let content = std::fs::read_to_string(data_dir.join(STATE_FILE)).unwrap();
                let state: AppState = serde_json::from_str(&content).unwrap();
                assert_eq!(state.user_pin.len(), 4);
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
}

#[test]
fn test_overlapping_updates_keep_both_changes() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    JsonStateStore::new(&data_dir).save(&AppState::default()).unwrap();

    let barrier = Arc::new(Barrier::new(2));

    // Holds its update open long enough for the other thread to start one
    let slow_mode_switch = {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        thread::spawn(move || {
            let store = JsonStateStore::new(&data_dir);
            barrier.wait();
            store
                .update(&mut |state: &mut AppState| {
                    thread::sleep(Duration::from_millis(300));
                    state.account_mode = AccountMode::Crypto;
                })
                .unwrap();
        })
    };

    let pin_change = {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        thread::spawn(move || {
            let store = JsonStateStore::new(&data_dir);
            barrier.wait();
            thread::sleep(Duration::from_millis(50));
            store
                .update(&mut |state: &mut AppState| state.user_pin = "9999".to_string())
                .unwrap();
        })
    };

    slow_mode_switch.join().unwrap();
    pin_change.join().unwrap();

    let state = JsonStateStore::new(&data_dir).load().unwrap();
    assert_eq!(state.account_mode, AccountMode::Crypto);
    assert_eq!(state.user_pin, "9999", "PIN change was lost");
}

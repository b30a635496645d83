//! Mock implementations for testing the verification cache

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rand::{CryptoRng, RngCore};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{SubjectKey, VerificationEntry};
use crate::errors::{VerificationError, VerificationResult};
use crate::services::verification::{Clock, CodeGenerator, EntryStore, ManualClock};

/// Fixed start time for deterministic tests
pub fn test_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 7, 0, 0).unwrap())
}

// Mock entry store for testing
pub struct MockEntryStore {
    pub entries: Arc<Mutex<HashMap<String, VerificationEntry>>>,
    pub clock: ManualClock,
    pub should_fail: bool,
    pub purge_calls: Arc<AtomicUsize>,
}

impl MockEntryStore {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
            should_fail: false,
            purge_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(clock: ManualClock) -> Self {
        Self {
            should_fail: true,
            ..Self::new(clock)
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn purge_count(&self) -> usize {
        self.purge_calls.load(Ordering::SeqCst)
    }

    fn fail_if_configured(&self) -> VerificationResult<()> {
        if self.should_fail {
            return Err(VerificationError::storage_unavailable("mock store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl EntryStore for MockEntryStore {
    async fn put(&self, subject: &SubjectKey, code: &str, ttl: Duration) -> VerificationResult<()> {
        self.fail_if_configured()?;
        let entry = VerificationEntry::new(code, self.clock.now(), ttl);
        self.entries
            .lock()
            .unwrap()
            .insert(subject.as_str().to_string(), entry);
        Ok(())
    }

    async fn check(&self, subject: &SubjectKey, candidate: &str) -> VerificationResult<bool> {
        self.fail_if_configured()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(subject.as_str())
            .map(|entry| !entry.is_expired_at(self.clock.now()) && entry.matches(candidate))
            .unwrap_or(false))
    }

    async fn clear(&self, subject: &SubjectKey) -> VerificationResult<()> {
        self.fail_if_configured()?;
        self.entries.lock().unwrap().remove(subject.as_str());
        Ok(())
    }

    async fn remaining_ttl(&self, subject: &SubjectKey) -> VerificationResult<Option<Duration>> {
        self.fail_if_configured()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(subject.as_str())
            .and_then(|entry| entry.remaining_at(self.clock.now())))
    }

    async fn purge_expired(&self) -> VerificationResult<usize> {
        self.purge_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_configured()?;
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        Ok(before - entries.len())
    }
}

// Code generator handing out a scripted sequence of codes
pub struct ScriptedCodeGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl ScriptedCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted generator ran out of codes")
    }

    fn code_length(&self) -> usize {
        6
    }
}

// RNG that only ever yields zero bits
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        dest.fill(0);
        Ok(())
    }
}

impl CryptoRng for ZeroRng {}

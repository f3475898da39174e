//! Nonce search: sequential and multi-threaded proof-of-work mining

use crate::constants::DEADLINE_CHECK_INTERVAL;
use crate::error::{BuilderError, Result};
use crate::pow::{header_hash_hex, serialize_header_prefix, serialize_nonce, Target};
use crate::types::*;
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation hook for a nonce search.
///
/// Clones share the same flag, so any clone can stop every search holding
/// one. An optional deadline stops the search once it has passed.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that also fires once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.stop();
                true
            }
            _ => false,
        }
    }
}

/// MineHeader: ℋ × 𝒯 → ℕ × ℍ
///
/// Starting from nonce 0:
/// 1. Set header.nonce = nonce
/// 2. Hash the encoded header
/// 3. If hash < target: return (nonce, hash)
/// 4. Otherwise nonce += 1 and repeat
///
/// The search ends early with `Aborted` when `stop` fires or after
/// `max_attempts` attempts, and with `Exhausted` past the last nonce.
pub fn mine_header(
    header: &mut BlockHeader,
    target: &Target,
    stop: &StopSignal,
    max_attempts: Option<Natural>,
) -> MiningResult {
    info!("Mining header against target {}", target);
    let midstate = Sha256::new_with_prefix(serialize_header_prefix(header));
    let mut attempts: Natural = 0;
    let mut nonce: Natural = 0;

    loop {
        if max_attempts.is_some_and(|max| attempts >= max)
            || (attempts % DEADLINE_CHECK_INTERVAL == 0 && stop.is_stopped())
        {
            warn!("Mining aborted after {} attempts", attempts);
            return MiningResult::Aborted { attempts };
        }

        header.nonce = nonce;
        let hash = hash_nonce(&midstate, nonce);
        attempts += 1;

        if target.is_met_by(&hash) {
            let hash = hex::encode(hash);
            info!("Found nonce {} after {} attempts: {}", nonce, attempts, hash);
            return MiningResult::Found(Solution { nonce, hash });
        }

        nonce = match nonce.checked_add(1) {
            Some(next) => next,
            None => return MiningResult::Exhausted,
        };
    }
}

/// Multi-threaded variant of [`mine_header`].
///
/// Worker `i` of `n` tries nonces i, i+n, i+2n, ... in increasing order.
/// Winners are merged with an atomic minimum and each worker keeps going
/// until its next nonce is above the best winner, so every smaller nonce has
/// been tried and the result is the lowest winning nonce, the same one the
/// sequential search returns. Once a winner is known, workers ignore `stop`
/// and finish the nonces below it. A worker stopped before that records how
/// far it got, and a winner above that point is reported as `Aborted` since
/// a lower nonce may be untried.
pub fn mine_header_parallel(
    header: &mut BlockHeader,
    target: &Target,
    stop: &StopSignal,
    threads: usize,
) -> Result<MiningResult> {
    if threads <= 1 {
        return Ok(mine_header(header, target, stop, None));
    }

    info!("Mining header against target {} on {} threads", target, threads);
    let midstate = Sha256::new_with_prefix(serialize_header_prefix(header));
    let search = SharedSearch::new();
    let stride = threads as Natural;

    std::thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(threads);
        for worker in 0..threads {
            let handle = std::thread::Builder::new()
                .name(format!("miner-{}", worker))
                .spawn_scoped(scope, {
                    let midstate = &midstate;
                    let search = &search;
                    move || search_stride(midstate, target, worker as Natural, stride, stop, search)
                })
                .map_err(|e| {
                    // Already running workers must not outlive the failed search
                    stop.stop();
                    BuilderError::Io(e)
                })?;
            handles.push(handle);
        }
        for handle in handles {
            handle
                .join()
                .map_err(|_| BuilderError::Mining("mining worker panicked".to_string()))?;
        }
        Ok(())
    })?;

    Ok(search.finish(header))
}

/// State shared by the workers of one parallel search
struct SharedSearch {
    found: AtomicBool,
    best: AtomicU64,
    aborted: AtomicBool,
    /// Lowest nonce a stopped worker did not try
    frontier: AtomicU64,
    attempts: AtomicU64,
}

impl SharedSearch {
    fn new() -> Self {
        Self {
            found: AtomicBool::new(false),
            best: AtomicU64::new(Natural::MAX),
            aborted: AtomicBool::new(false),
            frontier: AtomicU64::new(Natural::MAX),
            attempts: AtomicU64::new(0),
        }
    }

    /// Best winner, provided every smaller nonce has been tried
    fn winner(&self) -> Option<Natural> {
        if !self.found.load(Ordering::Acquire) {
            return None;
        }
        let best = self.best.load(Ordering::Acquire);
        (best < self.frontier.load(Ordering::Acquire)).then_some(best)
    }

    /// Combine the workers' outcome, setting the header's nonce on success
    fn finish(&self, header: &mut BlockHeader) -> MiningResult {
        let attempts = self.attempts.load(Ordering::Relaxed);
        if let Some(nonce) = self.winner() {
            header.nonce = nonce;
            let hash = header_hash_hex(header);
            info!("Found nonce {} after {} attempts: {}", nonce, attempts, hash);
            return MiningResult::Found(Solution { nonce, hash });
        }
        if self.found.load(Ordering::Acquire) || self.aborted.load(Ordering::Relaxed) {
            warn!("Mining aborted after {} attempts", attempts);
            return MiningResult::Aborted { attempts };
        }
        MiningResult::Exhausted
    }
}

fn search_stride(
    midstate: &Sha256,
    target: &Target,
    start: Natural,
    stride: Natural,
    stop: &StopSignal,
    search: &SharedSearch,
) {
    let mut nonce = start;
    let mut attempts: Natural = 0;

    loop {
        if search.found.load(Ordering::Acquire) && nonce > search.best.load(Ordering::Acquire) {
            break;
        }
        if attempts % DEADLINE_CHECK_INTERVAL == 0
            && !search.found.load(Ordering::Acquire)
            && stop.is_stopped()
        {
            search.frontier.fetch_min(nonce, Ordering::AcqRel);
            search.aborted.store(true, Ordering::Relaxed);
            break;
        }

        let hash = hash_nonce(midstate, nonce);
        attempts += 1;

        if target.is_met_by(&hash) {
            debug!("Worker starting at {} found nonce {}", start, nonce);
            search.best.fetch_min(nonce, Ordering::AcqRel);
            search.found.store(true, Ordering::Release);
            break;
        }

        nonce = match nonce.checked_add(stride) {
            Some(next) => next,
            None => break,
        };
    }

    search.attempts.fetch_add(attempts, Ordering::Relaxed);
}

/// Finish a hash of the header prefix with the nonce line
fn hash_nonce(midstate: &Sha256, nonce: Natural) -> Hash {
    let mut hasher = midstate.clone();
    hasher.update(serialize_nonce(nonce));
    hasher.finalize().into()
}

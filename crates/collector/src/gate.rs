// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Counting gate bounding how many sub-queries run at once.
///
/// A slot is an owned permit: it travels into the spawned task and is
/// returned when dropped, whether the task finishes, panics or is aborted.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Waits for a free slot. Returns `None` once `cancel` fires.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Option<OwnedSemaphorePermit> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = self.semaphore.clone().acquire_owned() => permit.ok(),
        }
    }

    /// Waits until every slot has been returned.
    pub async fn drain(&self) {
        let permits = u32::try_from(self.capacity).unwrap_or(u32::MAX);
        if let Ok(all) = self.semaphore.acquire_many(permits).await {
            drop(all);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let gate = ConcurrencyGate::new(2);
        let cancel = CancellationToken::new();
        let first = gate.acquire(&cancel).await.unwrap();
        let second = gate.acquire(&cancel).await.unwrap();
        assert_eq!(gate.in_flight(), 2);

        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.acquire(&cancel)).await;
        assert!(blocked.is_err());

        drop(first);
        assert_eq!(gate.in_flight(), 1);
        drop(second);
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_acquire_observes_cancellation() {
        let gate = ConcurrencyGate::new(1);
        let cancel = CancellationToken::new();
        let _held = gate.acquire(&cancel).await.unwrap();

        let waiter = {
            let gate = gate.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { gate.acquire(&cancel).await.is_none() })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_drain_waits_for_outstanding_slots() {
        let gate = ConcurrencyGate::new(3);
        let cancel = CancellationToken::new();
        let permit = gate.acquire(&cancel).await.unwrap();

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            drop(permit);
        });

        gate.drain().await;
        assert_eq!(gate.in_flight(), 0);
        task.await.unwrap();
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(ConcurrencyGate::new(0).capacity(), 1);
    }
}

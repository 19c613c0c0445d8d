// Copyright 2025 eraflo
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

//! Process-wide reference count on the windowing platform.

use std::sync::atomic::{AtomicUsize, Ordering};

static ACTIVE_LEASES: AtomicUsize = AtomicUsize::new(0);

/// A scoped claim on the windowing platform.
///
/// The first lease brings the platform up, dropping the last one tears it
/// down. Every window holds one for its whole lifetime.
#[derive(Debug)]
#[must_use = "the platform is released as soon as the lease is dropped"]
pub struct PlatformLease {
    _private: (),
}

impl PlatformLease {
    /// Acquires a lease.
    pub fn acquire() -> Self {
        if ACTIVE_LEASES.fetch_add(1, Ordering::SeqCst) == 0 {
            log::info!("Windowing platform acquired.");
        }
        Self { _private: () }
    }

    /// Number of leases currently held in this process.
    pub fn active() -> usize {
        ACTIVE_LEASES.load(Ordering::SeqCst)
    }
}

impl Drop for PlatformLease {
    fn drop(&mut self) {
        if ACTIVE_LEASES.fetch_sub(1, Ordering::SeqCst) == 1 {
            log::info!("Windowing platform released.");
        }
    }
}

//! Local time with opportunistic network sync.

use super::civil::{to_epoch, CivilDateTime};
use super::{Network, WallClock};
use crate::config::{TIME_SYNC_INTERVAL_S, TIME_SYNC_RETRY_S, UTC_OFFSET_S};
use crate::error::Error;

/// Wall clock plus network sync policy.
///
/// Syncs at most once per `update_interval_s`. A failed sync is retried
/// `retry_interval_s` later instead of on every query, so a dead network
/// costs one blocking call per retry interval.
pub struct TimeSource<N, W> {
    network: N,
    wall_clock: W,
    update_interval_s: i64,
    retry_interval_s: i64,
    utc_offset_s: i64,
    /// UTC epoch seconds of the last sync, shifted forward on failure.
    last_update: Option<i64>,
}

impl<N: Network, W: WallClock> TimeSource<N, W> {
    pub fn new(network: N, wall_clock: W) -> Self {
        Self::with_intervals(network, wall_clock, TIME_SYNC_INTERVAL_S, TIME_SYNC_RETRY_S)
    }

    pub fn with_intervals(
        network: N,
        wall_clock: W,
        update_interval_s: i64,
        retry_interval_s: i64,
    ) -> Self {
        Self {
            network,
            wall_clock,
            update_interval_s,
            retry_interval_s,
            utc_offset_s: UTC_OFFSET_S,
            last_update: None,
        }
    }

    /// Current local civil time, syncing first if a sync is due.
    pub fn local_now(&mut self) -> CivilDateTime {
        self.sync_if_due();

        let utc = self.wall_clock.utc_now();
        utc.checked_add_seconds(self.utc_offset_s).unwrap_or(utc)
    }

    /// UTC epoch seconds of the last sync attempt baseline, if any.
    pub fn last_update(&self) -> Option<i64> {
        self.last_update
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn wall_clock_mut(&mut self) -> &mut W {
        &mut self.wall_clock
    }

    fn sync_if_due(&mut self) {
        if !self.network.is_connected() {
            return;
        }

        let now = to_epoch(self.wall_clock.utc_now());
        let due = match self.last_update {
            None => true,
            Some(last) => now - last >= self.update_interval_s,
        };
        if !due {
            return;
        }

        match self.network.sync_time() {
            Ok(()) => {
                // The sync moved the wall clock; stamp with the corrected time.
                let synced = to_epoch(self.wall_clock.utc_now());
                self.last_update = Some(synced);
                info!("Time synced at {}", synced);
            }
            Err(_) => {
                // Next attempt one retry interval from now.
                self.last_update = Some(now - self.update_interval_s + self.retry_interval_s);
                warn!("{}, retry in {} s", Error::TimeSync, self.retry_interval_s);
            }
        }
    }
}

/*
 *  screensaver.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Composition root: one layout per display, redraws driven by timers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use log::{debug, info, trace, warn};

use crate::config::LayoutSpec;
use crate::display::{DisplayError, Region, SurfaceHost, SurfaceId};
use crate::layouts::{AnyLayout, Layout, LayoutKind, LayoutState};
use crate::scheduler::{Scheduler, TimerHandle};

/// Owns the layouts and their redraw timers.
///
/// Layouts are bound to displays in enumeration order. Every periodic
/// layout has at most one pending timer; destroying a layout cancels it.
pub struct Screensaver<L = AnyLayout> {
    layouts: Vec<L>,
    timers: Scheduler<usize>,
    pending: Vec<Option<TimerHandle>>,
    shut_down: bool,
}

impl Screensaver<AnyLayout> {
    pub fn from_specs(specs: &[LayoutSpec]) -> Self {
        Self::new(specs.iter().map(AnyLayout::from_spec).collect())
    }
}

impl<L: Layout> Screensaver<L> {
    pub fn new(layouts: Vec<L>) -> Self {
        let pending = vec![None; layouts.len()];
        Self {
            layouts,
            timers: Scheduler::new(),
            pending,
            shut_down: false,
        }
    }

    pub fn layouts(&self) -> &[L] {
        &self.layouts
    }

    /// Surfaces of the configured layouts, in layout order
    pub fn surfaces(&self) -> Vec<(SurfaceId, LayoutKind)> {
        self.layouts
            .iter()
            .filter_map(|l| l.surface_id().map(|id| (id, l.kind())))
            .collect()
    }

    /// Bind layout `i` to display `i`. Surplus layouts stay unconfigured,
    /// surplus displays are left alone. Returns how many were configured.
    pub fn configure(
        &mut self,
        displays: &[Region],
        host: &mut dyn SurfaceHost,
        instant: Instant,
        now: &DateTime<Local>,
    ) -> Result<usize, DisplayError> {
        if displays.len() != self.layouts.len() {
            warn!(
                "{} display(s) for {} layout(s), binding the first {}",
                displays.len(),
                self.layouts.len(),
                displays.len().min(self.layouts.len())
            );
        }

        let mut configured = 0;
        for (index, (layout, region)) in self.layouts.iter_mut().zip(displays).enumerate() {
            let first = layout.configure(host, *region, now)?;
            configured += 1;
            if let Some(delay) = first {
                self.pending[index] = Some(self.timers.schedule(instant, delay, index));
                debug!("{} on display {} redraws in {:?}", layout.kind(), index, delay);
            }
        }
        info!("screensaver running {} layout(s)", configured);
        Ok(configured)
    }

    /// Run every redraw that is due and re-arm the ones that continue.
    /// Returns the number of redraws performed.
    ///
    /// A failing redraw does not stop the batch: every due layout still runs
    /// and re-arms, the failed one is left without a timer, and the first
    /// error is returned once the batch is done.
    pub fn tick(&mut self, instant: Instant, now: &DateTime<Local>) -> Result<usize, DisplayError> {
        if self.shut_down {
            return Ok(0);
        }

        let mut redraws = 0;
        let mut failure = None;
        for (handle, index) in self.timers.drain_due(instant) {
            if self.pending.get(index).copied().flatten() != Some(handle) {
                continue;
            }
            self.pending[index] = None;

            let layout = &mut self.layouts[index];
            match layout.redraw(now) {
                Ok(Some(delay)) => {
                    redraws += 1;
                    self.pending[index] = Some(self.timers.schedule(instant, delay, index));
                }
                Ok(None) => {
                    redraws += 1;
                    trace!("{} on display {} stopped redrawing", layout.kind(), index);
                }
                Err(err) => {
                    warn!("{} on display {} failed to redraw: {}", layout.kind(), index, err);
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(redraws),
        }
    }

    /// When the next redraw is due, None when nothing animates
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Time until the next redraw, zero if one is overdue
    pub fn time_to_next(&self, instant: Instant) -> Option<Duration> {
        self.next_deadline().map(|deadline| deadline.saturating_duration_since(instant))
    }

    /// At least one layout still holds a surface
    pub fn is_running(&self) -> bool {
        !self.shut_down && self.layouts.iter().any(|l| l.state() == LayoutState::Configured)
    }

    /// Destroy one layout and cancel its timer
    pub fn destroy_layout(&mut self, index: usize) {
        if let Some(handle) = self.pending.get_mut(index).and_then(Option::take) {
            self.timers.cancel(handle);
        }
        if let Some(layout) = self.layouts.get_mut(index) {
            layout.destroy();
        }
    }

    /// Exit gesture: tear every surface down. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        for index in 0..self.layouts.len() {
            self.destroy_layout(index);
        }
        self.timers.clear();
        self.shut_down = true;
        info!("screensaver shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Color, HeadlessHost};
    use crate::layouts::{DigitalClockLayout, SolidColorLayout};

    const SECOND: Duration = Duration::from_secs(1);

    /// Ticks every second; the failing one reports a render error
    struct Ticker {
        state: LayoutState,
        fails: bool,
        redraws: usize,
    }

    impl Ticker {
        fn new(fails: bool) -> Self {
            Self { state: LayoutState::Unconfigured, fails, redraws: 0 }
        }
    }

    impl Layout for Ticker {
        fn kind(&self) -> LayoutKind {
            LayoutKind::DigitalClock
        }

        fn state(&self) -> LayoutState {
            self.state
        }

        fn surface_id(&self) -> Option<SurfaceId> {
            None
        }

        fn configure(
            &mut self,
            _host: &mut dyn SurfaceHost,
            _region: Region,
            _now: &DateTime<Local>,
        ) -> Result<Option<Duration>, DisplayError> {
            self.state = LayoutState::Configured;
            Ok(Some(SECOND))
        }

        fn redraw(&mut self, _now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
            if self.fails {
                return Err(DisplayError::Render("device lost".into()));
            }
            self.redraws += 1;
            Ok(Some(SECOND))
        }

        fn destroy(&mut self) {
            self.state = LayoutState::Destroyed;
        }
    }

    fn two_layouts() -> Screensaver {
        Screensaver::new(vec![
            AnyLayout::SolidColor(SolidColorLayout::new(Color::Black)),
            AnyLayout::DigitalClock(DigitalClockLayout::new(Color::Black, Color::White)),
        ])
    }

    const DISPLAYS: [Region; 2] = [Region::new(64, 32, 0, 0), Region::new(64, 32, 64, 0)];

    #[test]
    fn only_periodic_layouts_get_timers() {
        let mut host = HeadlessHost::new();
        let mut saver = two_layouts();
        let t0 = Instant::now();

        assert_eq!(saver.configure(&DISPLAYS, &mut host, t0, &Local::now()).unwrap(), 2);
        assert_eq!(saver.next_deadline(), Some(t0 + Duration::from_millis(1000)));
        assert_eq!(saver.time_to_next(t0), Some(Duration::from_millis(1000)));

        assert_eq!(saver.tick(t0, &Local::now()).unwrap(), 0);
        assert_eq!(saver.tick(t0 + Duration::from_secs(1), &Local::now()).unwrap(), 1);
        assert_eq!(saver.next_deadline(), Some(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn surplus_layouts_stay_unconfigured() {
        let mut host = HeadlessHost::new();
        let mut saver = two_layouts();
        let n = saver.configure(&DISPLAYS[..1], &mut host, Instant::now(), &Local::now()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(saver.layouts()[1].state(), LayoutState::Unconfigured);
        assert!(saver.next_deadline().is_none());
        assert_eq!(saver.surfaces(), vec![(SurfaceId(0), LayoutKind::SolidColor)]);
    }

    #[test]
    fn surplus_displays_are_ignored() {
        let mut host = HeadlessHost::new();
        let mut saver = Screensaver::new(vec![AnyLayout::SolidColor(SolidColorLayout::new(Color::Red))]);
        let n = saver.configure(&DISPLAYS, &mut host, Instant::now(), &Local::now()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(host.surfaces().len(), 1);
    }

    #[test]
    fn shutdown_cancels_and_is_idempotent() {
        let mut host = HeadlessHost::new();
        let mut saver = two_layouts();
        let t0 = Instant::now();
        saver.configure(&DISPLAYS, &mut host, t0, &Local::now()).unwrap();
        assert!(saver.is_running());

        saver.shutdown();
        saver.shutdown();
        assert!(!saver.is_running());
        assert!(saver.next_deadline().is_none());
        assert_eq!(host.open_count(), 0);
        assert_eq!(saver.tick(t0 + Duration::from_secs(5), &Local::now()).unwrap(), 0);
    }

    #[test]
    fn host_teardown_stops_redraws() {
        let mut host = HeadlessHost::new();
        let mut saver = two_layouts();
        let t0 = Instant::now();
        saver.configure(&DISPLAYS, &mut host, t0, &Local::now()).unwrap();

        host.invalidate(SurfaceId(1));
        assert_eq!(saver.tick(t0 + Duration::from_secs(1), &Local::now()).unwrap(), 1);
        assert!(saver.next_deadline().is_none());
        assert_eq!(saver.layouts()[1].state(), LayoutState::Destroyed);
        assert!(saver.is_running());
    }

    #[test]
    fn failed_redraw_finishes_the_batch() {
        let mut host = HeadlessHost::new();
        let mut saver = Screensaver::new(vec![Ticker::new(true), Ticker::new(false), Ticker::new(false)]);
        let displays = [Region::new(8, 8, 0, 0), Region::new(8, 8, 8, 0), Region::new(8, 8, 16, 0)];
        let t0 = Instant::now();
        saver.configure(&displays, &mut host, t0, &Local::now()).unwrap();

        let err = saver.tick(t0 + SECOND, &Local::now()).unwrap_err();
        assert!(matches!(err, DisplayError::Render(_)));

        // the healthy layouts ran and re-armed, the failed one did not
        assert_eq!(saver.layouts()[1].redraws, 1);
        assert_eq!(saver.layouts()[2].redraws, 1);
        assert_eq!(saver.timers.len(), 2);
        assert_eq!(saver.pending[0], None);
        assert_eq!(saver.next_deadline(), Some(t0 + 2 * SECOND));

        assert_eq!(saver.tick(t0 + 2 * SECOND, &Local::now()).unwrap(), 2);
        assert_eq!(saver.layouts()[2].redraws, 2);
    }
}

/*
 *  layouts/calendar.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Month calendar: 5 weeks by 7 days, weekend and today highlighting
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

use std::time::Duration;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Weekday};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use crate::display::{Color, DisplayError, Region, Surface, SurfaceHost, SurfaceId};
use crate::draw::{draw_text_centered, fill_region};
use crate::layouts::{Layout, LayoutBase, LayoutKind, LayoutState};
use crate::scaled_font::ScaledFont;

pub const ROWS: usize = 5;
pub const COLUMNS: usize = 7;
pub const CELLS: usize = ROWS * COLUMNS;

/// Share of the surface height the grid aims for
const HEIGHT_FILL: f32 = 0.7;

/// Labels are sized for two digits
const LABEL_CHARS: u32 = 2;

/// How often the layout checks whether the date changed
pub const ROLLOVER_CHECK: Duration = Duration::from_secs(60);

/// Which day starts a row and which days get weekend colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekConvention {
    pub week_start: Weekday,
    pub accent_day: Weekday,
    pub muted_day: Weekday,
}

impl Default for WeekConvention {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            accent_day: Weekday::Sun,
            muted_day: Weekday::Sat,
        }
    }
}

impl WeekConvention {
    pub fn is_weekend(&self, day: Weekday) -> bool {
        day == self.accent_day || day == self.muted_day
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarPalette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub muted: Color,
    pub today_foreground: Color,
    pub today_background: Color,
}

impl CalendarPalette {
    /// Labels in the color that reads on `background`; today swaps the pair
    pub fn on(background: Color) -> Self {
        let foreground = background.contrasting();
        Self {
            background,
            foreground,
            accent: Color::Red,
            muted: Color::Grey,
            today_foreground: background,
            today_background: foreground,
        }
    }
}

impl Default for CalendarPalette {
    fn default() -> Self {
        Self::on(Color::Black)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub foreground: Color,
    pub background: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub label: String,
    pub in_month: bool,
    pub is_weekend: bool,
    pub is_today: bool,
    pub style: CellStyle,
}

/// Day 1 of today's month
pub fn first_day_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// The week start on or before the first of the month
pub fn first_date_to_display(today: NaiveDate, week_start: Weekday) -> NaiveDate {
    let first = first_day_of_month(today);
    let back = (first.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    first - Days::new(u64::from(back))
}

fn cell_style(date: NaiveDate, month: u32, today: NaiveDate, week: &WeekConvention, palette: &CalendarPalette) -> CellStyle {
    let mut style = CellStyle {
        foreground: palette.foreground,
        background: palette.background,
    };
    let weekday = date.weekday();
    if weekday == week.muted_day {
        style.foreground = palette.muted;
    }
    if weekday == week.accent_day {
        style.foreground = palette.accent;
    }
    if date.month() != month {
        style.foreground = palette.muted;
    }
    if date == today {
        style.foreground = palette.today_foreground;
        style.background = palette.today_background;
    }
    style
}

/// The 35 dates on screen, row-major from the first date to display.
/// Built fresh for every configure or date change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub today: NaiveDate,
    pub month_start: NaiveDate,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    pub fn build(today: NaiveDate, week: &WeekConvention, palette: &CalendarPalette) -> Self {
        let month_start = first_day_of_month(today);
        let first = first_date_to_display(today, week.week_start);

        let cells = (0..CELLS as u64)
            .map(|i| {
                let date = first + Days::new(i);
                CalendarCell {
                    date,
                    label: date.day().to_string(),
                    in_month: date.month() == month_start.month(),
                    is_weekend: week.is_weekend(date.weekday()),
                    is_today: date == today,
                    style: cell_style(date, month_start.month(), today, week, palette),
                }
            })
            .collect();

        Self { today, month_start, cells }
    }

    pub fn row(&self, row: usize) -> &[CalendarCell] {
        &self.cells[row * COLUMNS..(row + 1) * COLUMNS]
    }
}

/// Pixel layout of the grid on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMetrics {
    pub origin: Point,
    pub cell: Size,
    pub padding: u32,
}

impl GridMetrics {
    /// Font height so that the grid takes about 70% of the height,
    /// padding half of that around every label.
    pub fn fit(font: &mut ScaledFont, size: Size) -> Self {
        let label_height = size.height as f32 * HEIGHT_FILL / 2.0 / ROWS as f32;
        font.set_pixel_height(label_height as u32);
        let padding = (label_height / 2.0) as u32;

        let glyph = font.measure("0");
        let cell = Size::new(
            glyph.width * LABEL_CHARS + 2 * padding,
            font.linespace() + 2 * padding,
        );
        let grid = Size::new(cell.width * COLUMNS as u32, cell.height * ROWS as u32);
        let origin = Point::new(
            (size.width as i32 - grid.width as i32) / 2,
            (size.height as i32 - grid.height as i32) / 2,
        );
        Self { origin, cell, padding }
    }

    pub fn cell_rect(&self, index: usize) -> Rectangle {
        let (row, col) = ((index / COLUMNS) as i32, (index % COLUMNS) as i32);
        Rectangle::new(
            self.origin + Point::new(col * self.cell.width as i32, row * self.cell.height as i32),
            self.cell,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CalendarOptions {
    pub background: Color,
    pub week: WeekConvention,
    /// Rebuild when the date changes
    pub follow_date: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            background: Color::Black,
            week: WeekConvention::default(),
            follow_date: true,
        }
    }
}

#[derive(Debug)]
pub struct CalendarLayout {
    base: LayoutBase,
    options: CalendarOptions,
    palette: CalendarPalette,
    font: ScaledFont,
    metrics: Option<GridMetrics>,
    grid: Option<CalendarGrid>,
}

impl CalendarLayout {
    pub fn new(options: CalendarOptions) -> Self {
        Self {
            base: LayoutBase::new(LayoutKind::Calendar, options.background),
            palette: CalendarPalette::on(options.background),
            options,
            font: ScaledFont::default(),
            metrics: None,
            grid: None,
        }
    }

    pub fn grid(&self) -> Option<&CalendarGrid> {
        self.grid.as_ref()
    }

    pub fn metrics(&self) -> Option<GridMetrics> {
        self.metrics
    }

    fn paint(surface: &mut Surface, grid: &CalendarGrid, metrics: &GridMetrics, font: &ScaledFont, background: Color) -> Result<(), DisplayError> {
        surface.clear(background.to_rgb888())?;
        for (i, cell) in grid.cells.iter().enumerate() {
            let rect = metrics.cell_rect(i);
            if cell.style.background != background {
                fill_region(surface, rect, cell.style.background.to_rgb888())?;
            }
            draw_text_centered(surface, &cell.label, rect, font, cell.style.foreground.to_rgb888())?;
        }
        Ok(())
    }

    /// Build a fresh grid for `today` and put it on screen
    fn rebuild(&mut self, today: NaiveDate) -> Result<Option<Duration>, DisplayError> {
        let grid = CalendarGrid::build(today, &self.options.week, &self.palette);
        let background = self.base.background();
        let Some(metrics) = self.metrics else {
            return Ok(None);
        };
        let Some(surface) = self.base.live_surface() else {
            return Ok(None);
        };
        Self::paint(surface, &grid, &metrics, &self.font, background)?;
        debug!("calendar for {} starting {}", grid.month_start.format("%B %Y"), grid.cells[0].date);
        self.grid = Some(grid);

        let shown = self.base.present()?;
        Ok((shown && self.options.follow_date).then_some(ROLLOVER_CHECK))
    }
}

impl Layout for CalendarLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Calendar
    }

    fn state(&self) -> LayoutState {
        self.base.state()
    }

    fn surface_id(&self) -> Option<SurfaceId> {
        self.base.surface_id()
    }

    fn configure(
        &mut self,
        host: &mut dyn SurfaceHost,
        region: Region,
        now: &DateTime<Local>,
    ) -> Result<Option<Duration>, DisplayError> {
        self.base.attach(host, region)?;
        let metrics = GridMetrics::fit(&mut self.font, region.size());
        debug!(
            "calendar font scale {}, cell {}x{}, padding {}",
            self.font.scale(),
            metrics.cell.width,
            metrics.cell.height,
            metrics.padding
        );
        self.metrics = Some(metrics);
        self.rebuild(now.date_naive())
    }

    fn redraw(&mut self, now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
        if self.base.state() != LayoutState::Configured || !self.options.follow_date {
            return Ok(None);
        }
        let today = now.date_naive();
        if self.grid.as_ref().is_some_and(|g| g.today == today) {
            // nothing to repaint, but notice a surface the host dropped
            return Ok(self.base.live_surface().map(|_| ROLLOVER_CHECK));
        }
        info!("date changed to {}, rebuilding calendar", today);
        self.rebuild(today)
    }

    fn destroy(&mut self) {
        self.base.destroy();
        self.grid = None;
    }
}

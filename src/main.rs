/*
 *  main.rs
 *
 *  idlewall - full-screen idle displays
 *	(c) 2026 idlewall contributors
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use idlewall::config::{self, Cli, Config, DisplaySource};
use idlewall::display::{DisplayEnumerator, FixedDisplays, HeadlessHost, Region, XrandrEnumerator, save_to_ppm};
use idlewall::screensaver::Screensaver;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Enumerator for the configured source; None means "ask the window system"
fn configured_enumerator(cfg: &Config) -> Option<Box<dyn DisplayEnumerator>> {
    if let Some(displays) = cfg.displays.clone() {
        return Some(Box::new(FixedDisplays(displays)));
    }
    match cfg.display_source() {
        DisplaySource::Xrandr => Some(Box::new(XrandrEnumerator::new())),
        #[cfg(feature = "windowed")]
        DisplaySource::Auto => None,
        #[cfg(not(feature = "windowed"))]
        DisplaySource::Auto => Some(Box::new(XrandrEnumerator::new())),
    }
}

fn enumerate(cfg: &Config) -> Result<Vec<Region>> {
    let regions = match configured_enumerator(cfg) {
        Some(enumerator) => enumerator.displays()?,
        None => window_system_displays()?,
    };
    Ok(regions)
}

#[cfg(feature = "windowed")]
fn window_system_displays() -> Result<Vec<Region>> {
    let event_loop = winit::event_loop::EventLoop::new();
    Ok(idlewall::display::WinitEnumerator::new(&event_loop).displays()?)
}

#[cfg(not(feature = "windowed"))]
fn window_system_displays() -> Result<Vec<Region>> {
    bail!("built without window support; give --display WxH+X+Y or use --xrandr")
}

/// Render every layout once into `dir`, one PPM per display
fn snapshot(cfg: &Config, dir: &Path) -> Result<()> {
    let regions = enumerate(cfg)?;
    if regions.is_empty() {
        bail!("no displays to render (try --display WxH+X+Y)");
    }
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

    let mut host = HeadlessHost::new();
    let mut saver = Screensaver::from_specs(&cfg.layouts());
    saver.configure(&regions, &mut host, Instant::now(), &Local::now())?;

    for (id, kind) in saver.surfaces() {
        let Some(state) = host.surface(id) else { continue };
        let path = dir.join(format!("surface-{}-{}.ppm", id.0, kind));
        save_to_ppm(&state.borrow(), &path).with_context(|| format!("cannot write {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    saver.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_from(&cli)?;

    // Initialize the logger with the configured level
    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {} ({})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE, BUILD_PROFILE);

    if cli.dump_config {
        print!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    if cli.list_displays {
        let regions = enumerate(&cfg)?;
        if regions.is_empty() {
            warn!("no displays found");
        }
        for (i, region) in regions.iter().enumerate() {
            println!("{}: {}", i, region);
        }
        return Ok(());
    }

    if let Some(dir) = cli.snapshot.as_deref() {
        return snapshot(&cfg, dir);
    }

    run_windowed(&cfg)
}

#[cfg(feature = "windowed")]
fn run_windowed(cfg: &Config) -> Result<()> {
    let saver = Screensaver::from_specs(&cfg.layouts());
    let enumerator = configured_enumerator(cfg);
    idlewall::display::window::run(saver, enumerator.as_deref())?;
    Ok(())
}

#[cfg(not(feature = "windowed"))]
fn run_windowed(_cfg: &Config) -> Result<()> {
    bail!("built without window support; use --snapshot DIR to render to files")
}

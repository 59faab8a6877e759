/*
 *  tests/screensaver_integration.rs
 *
 *  Integration tests: configuration through composition to pixels
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 */

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use idlewall::config::{self, LayoutSpec};
use idlewall::display::enumerator::parse_xrandr_connected;
use idlewall::display::{HeadlessHost, Region, SurfaceId, save_to_ppm};
use idlewall::{Layout, LayoutKind, LayoutState, Screensaver};

const XRANDR: &str = "Screen 0: minimum 320 x 200, current 2400 x 600, maximum 16384 x 16384
DP-0 connected primary 800x600+0+0 (normal left inverted right x axis y axis) 480mm x 270mm
   800x600     60.00*+
HDMI-0 connected 800x600+800+0 (normal left inverted right x axis y axis) 480mm x 270mm
   800x600     60.00*+
DVI-0 connected 800x600+1600+0 (normal left inverted right x axis y axis) 480mm x 270mm
   800x600     60.00*+
";

fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2023, 2, 2, h, m, s).earliest().unwrap()
}

#[test]
fn default_layouts_on_three_monitors() {
    let displays = parse_xrandr_connected(XRANDR);
    assert_eq!(displays.len(), 3);

    let mut host = HeadlessHost::new();
    let mut saver = Screensaver::from_specs(&config::default_layouts());
    let t0 = Instant::now();
    assert_eq!(saver.configure(&displays, &mut host, t0, &at(10, 0, 0)).unwrap(), 3);

    assert_eq!(
        saver.surfaces(),
        vec![
            (SurfaceId(0), LayoutKind::SolidColor),
            (SurfaceId(1), LayoutKind::DigitalClock),
            (SurfaceId(2), LayoutKind::Calendar),
        ]
    );
    for (state, region) in host.surfaces().iter().zip(&displays) {
        let state = state.borrow();
        assert_eq!(state.region, *region);
        assert!(state.options.fullscreen && state.options.hide_cursor);
        assert_eq!(state.frame_count, 1);
    }

    // solid color never redraws; the clock ticks every second
    for second in 1..=5 {
        saver.tick(t0 + Duration::from_secs(second), &at(10, 0, second as u32)).unwrap();
    }
    assert_eq!(host.surfaces()[0].borrow().frame_count, 1);
    assert_eq!(host.surfaces()[1].borrow().frame_count, 6);
    assert_eq!(host.surfaces()[2].borrow().frame_count, 1);
}

#[test]
fn yaml_driven_analog_clock_sweeps() {
    let cfg = config::parse_yaml("layouts:\n  - kind: analog_clock\n    interval_ms: 20\n    dial: true\n").unwrap();
    let mut host = HeadlessHost::new();
    let mut saver = Screensaver::from_specs(&cfg.layouts());
    let t0 = Instant::now();
    saver.configure(&[Region::new(400, 300, 0, 0)], &mut host, t0, &at(8, 0, 0)).unwrap();

    let mut redraws = 0;
    let mut t = t0;
    for _ in 0..10 {
        t += Duration::from_millis(20);
        redraws += saver.tick(t, &Local::now()).unwrap();
    }
    assert_eq!(redraws, 10);
    assert_eq!(host.surfaces()[0].borrow().frame_count, 11);
    assert_eq!(saver.next_deadline(), Some(t + Duration::from_millis(20)));
}

#[test]
fn exit_gesture_tears_everything_down() {
    let mut host = HeadlessHost::new();
    let specs = vec![
        LayoutSpec::of_kind(LayoutKind::DigitalClock),
        LayoutSpec::of_kind(LayoutKind::AnalogClock),
    ];
    let mut saver = Screensaver::from_specs(&specs);
    let t0 = Instant::now();
    saver
        .configure(&[Region::new(200, 200, 0, 0), Region::new(200, 200, 200, 0)], &mut host, t0, &Local::now())
        .unwrap();
    assert_eq!(host.open_count(), 2);

    saver.shutdown();
    saver.shutdown();
    assert_eq!(host.open_count(), 0);
    assert!(saver.layouts().iter().all(|l| l.state() == LayoutState::Destroyed));
    assert_eq!(saver.tick(t0 + Duration::from_secs(10), &Local::now()).unwrap(), 0);
}

#[test]
fn more_layouts_than_displays() {
    let mut host = HeadlessHost::new();
    let mut saver = Screensaver::from_specs(&config::default_layouts());
    let n = saver
        .configure(&[Region::new(320, 240, 0, 0)], &mut host, Instant::now(), &Local::now())
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(saver.layouts()[1].state(), LayoutState::Unconfigured);
    assert_eq!(saver.layouts()[2].state(), LayoutState::Unconfigured);
}

#[test]
fn snapshot_files() {
    let mut host = HeadlessHost::new();
    let cfg = config::parse_yaml("layouts:\n  - kind: solid_color\n    color: red\n").unwrap();
    let mut saver = Screensaver::from_specs(&cfg.layouts());
    saver.configure(&[Region::new(4, 2, 0, 0)], &mut host, Instant::now(), &Local::now()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    for (id, kind) in saver.surfaces() {
        let path = dir.path().join(format!("surface-{}-{}.ppm", id.0, kind));
        save_to_ppm(&host.surface(id).unwrap().borrow(), &path).unwrap();
    }

    let bytes = std::fs::read(dir.path().join("surface-0-solid_color.ppm")).unwrap();
    let header = b"P6\n4 2\n255\n";
    assert_eq!(&bytes[..header.len()], header);
    let red = Rgb888::RED;
    assert!(bytes[header.len()..].chunks(3).all(|px| px == [red.r(), red.g(), red.b()]));
}

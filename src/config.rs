use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use chrono::Weekday;
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::{Color, Region};
use crate::layouts::LayoutKind;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every field is optional so files and
/// command line can be layered.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General options
    pub log_level: Option<String>,     // e.g., "info" | "debug"

    /// Where the monitor list comes from when `displays` is not given
    pub display_source: Option<DisplaySource>,

    /// Fixed monitor list, "WxH+X+Y" each
    pub displays: Option<Vec<Region>>,

    /// One entry per display, in enumeration order
    pub layouts: Option<Vec<LayoutSpec>>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn display_source(&self) -> DisplaySource {
        self.display_source.unwrap_or_default()
    }

    /// Configured layouts, or black solid color, digital clock, calendar
    pub fn layouts(&self) -> Vec<LayoutSpec> {
        self.layouts.clone().unwrap_or_else(default_layouts)
    }
}

pub fn default_layouts() -> Vec<LayoutSpec> {
    vec![
        LayoutSpec::of_kind(LayoutKind::SolidColor),
        LayoutSpec::of_kind(LayoutKind::DigitalClock),
        LayoutSpec::of_kind(LayoutKind::Calendar),
    ]
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySource {
    /// Window system monitors when built with windows, xrandr otherwise
    #[default]
    Auto,
    Xrandr,
}

/// One layout with its parameters, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutSpec {
    SolidColor {
        #[serde(default = "black")]
        color: Color,
    },
    DigitalClock {
        #[serde(default = "black")]
        background: Color,
        #[serde(default = "white")]
        foreground: Color,
    },
    AnalogClock {
        #[serde(default = "black")]
        background: Color,
        #[serde(default)]
        dial: bool,
        #[serde(default = "analog_interval_ms")]
        interval_ms: u64,
    },
    Calendar {
        #[serde(default = "black")]
        background: Color,
        #[serde(default = "sunday")]
        week_start: Weekday,
        #[serde(default = "sunday")]
        accent_day: Weekday,
        #[serde(default = "saturday")]
        muted_day: Weekday,
        #[serde(default = "yes")]
        follow_date: bool,
    },
}

fn black() -> Color { Color::Black }
fn white() -> Color { Color::White }
fn sunday() -> Weekday { Weekday::Sun }
fn saturday() -> Weekday { Weekday::Sat }
fn yes() -> bool { true }
fn analog_interval_ms() -> u64 { 10 }

impl LayoutSpec {
    /// Defaults for a kind, as if only `kind:` was written
    pub fn of_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::SolidColor => LayoutSpec::SolidColor { color: black() },
            LayoutKind::DigitalClock => LayoutSpec::DigitalClock { background: black(), foreground: white() },
            LayoutKind::AnalogClock => LayoutSpec::AnalogClock {
                background: black(),
                dial: false,
                interval_ms: analog_interval_ms(),
            },
            LayoutKind::Calendar => LayoutSpec::Calendar {
                background: black(),
                week_start: sunday(),
                accent_day: sunday(),
                muted_day: saturday(),
                follow_date: yes(),
            },
        }
    }

    pub fn kind(&self) -> LayoutKind {
        match self {
            LayoutSpec::SolidColor { .. } => LayoutKind::SolidColor,
            LayoutSpec::DigitalClock { .. } => LayoutKind::DigitalClock,
            LayoutSpec::AnalogClock { .. } => LayoutKind::AnalogClock,
            LayoutSpec::Calendar { .. } => LayoutKind::Calendar,
        }
    }

    /// Background (the fill color for solid color layouts)
    pub fn set_background(&mut self, bg: Color) {
        match self {
            LayoutSpec::SolidColor { color } => *color = bg,
            LayoutSpec::DigitalClock { background, .. }
            | LayoutSpec::AnalogClock { background, .. }
            | LayoutSpec::Calendar { background, .. } => *background = bg,
        }
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "idlewall", version, about = "Full-screen idle displays, one layout per monitor")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Shorthand for --log-level debug
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Layout for the next display (repeatable, replaces the configured list)
    #[arg(long = "layout", value_name = "KIND")]
    pub layouts: Vec<LayoutKind>,
    /// Background color for every layout
    #[arg(long, value_name = "COLOR")]
    pub background: Option<Color>,
    /// First day of the calendar week
    #[arg(long, value_name = "DAY")]
    pub week_start: Option<Weekday>,
    /// Fixed display geometry WxH+X+Y (repeatable)
    #[arg(long = "display", value_name = "GEOMETRY")]
    pub displays: Vec<Region>,
    /// Enumerate displays with xrandr
    #[arg(long, action = ArgAction::SetTrue)]
    pub xrandr: bool,
    /// print the enumerated displays and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub list_displays: bool,
    /// render one frame per display into DIR as PPM files and exit
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub snapshot: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: read YAML, merge the parsed CLI over it, validate.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        log::debug!("using config file {}", p.display());
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of effective config (nice for debugging)
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    let mut effective = cfg.clone();
    effective.log_level = Some(cfg.log_level().to_string());
    effective.display_source = Some(cfg.display_source());
    effective.layouts = Some(cfg.layouts());
    Ok(serde_yaml::to_string(&effective)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/idlewall/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/idlewall/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/idlewall.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["idlewall.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option. Lists replace.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()       { dst.log_level = src.log_level; }
    if src.display_source.is_some()  { dst.display_source = src.display_source; }
    if src.displays.is_some()        { dst.displays = src.displays; }
    if src.layouts.is_some()         { dst.layouts = src.layouts; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()  { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                { cfg.log_level = Some("debug".to_string()); }
    if cli.xrandr               { cfg.display_source = Some(DisplaySource::Xrandr); }
    if !cli.displays.is_empty() { cfg.displays = Some(cli.displays.clone()); }

    if !cli.layouts.is_empty() {
        cfg.layouts = Some(cli.layouts.iter().copied().map(LayoutSpec::of_kind).collect());
    }

    let any_layout = cli.background.is_some() || cli.week_start.is_some();
    if any_layout && cfg.layouts.is_none() {
        cfg.layouts = Some(default_layouts());
    }
    if let Some(layouts) = cfg.layouts.as_mut() {
        for spec in layouts.iter_mut() {
            if let Some(bg) = cli.background { spec.set_background(bg); }
            if let (Some(day), LayoutSpec::Calendar { week_start, .. }) = (cli.week_start, &mut *spec) {
                *week_start = day;
            }
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(displays) = cfg.displays.as_ref() {
        if let Some(bad) = displays.iter().find(|d| d.is_empty()) {
            return Err(ConfigError::Validation(format!("display {} must have width/height > 0", bad)));
        }
    }
    if let Some(layouts) = cfg.layouts.as_ref() {
        if layouts.is_empty() {
            return Err(ConfigError::Validation("at least one layout is required".into()));
        }
        for spec in layouts {
            if let LayoutSpec::AnalogClock { interval_ms: 0, .. } = spec {
                return Err(ConfigError::Validation("analog_clock interval_ms must be > 0".into()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const EXAMPLE: &str = r##"
log_level: info
display_source: xrandr
displays: ["1920x1080+0+0", "1920x1080+1920+0"]
layouts:
  - kind: solid_color
    color: navy
  - kind: digital_clock
    background: black
    foreground: "#00ff00"
  - kind: analog_clock
    dial: true
  - kind: calendar
    week_start: monday
    muted_day: sunday
    accent_day: saturday
"##;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("idlewall").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_without_file() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.display_source(), DisplaySource::Auto);
        let kinds: Vec<_> = cfg.layouts().iter().map(LayoutSpec::kind).collect();
        assert_eq!(kinds, vec![LayoutKind::SolidColor, LayoutKind::DigitalClock, LayoutKind::Calendar]);
    }

    #[test]
    fn parses_full_example() {
        let cfg = parse_yaml(EXAMPLE).unwrap();
        assert_eq!(cfg.display_source, Some(DisplaySource::Xrandr));
        assert_eq!(cfg.displays.as_ref().unwrap()[1], Region::new(1920, 1080, 1920, 0));

        let layouts = cfg.layouts.unwrap();
        assert_eq!(layouts[0], LayoutSpec::SolidColor { color: Color::Navy });
        assert_eq!(
            layouts[1],
            LayoutSpec::DigitalClock { background: Color::Black, foreground: Color::Rgb(0, 255, 0) }
        );
        assert_eq!(
            layouts[2],
            LayoutSpec::AnalogClock { background: Color::Black, dial: true, interval_ms: 10 }
        );
        assert_eq!(
            layouts[3],
            LayoutSpec::Calendar {
                background: Color::Black,
                week_start: Weekday::Mon,
                accent_day: Weekday::Sat,
                muted_day: Weekday::Sun,
                follow_date: true,
            }
        );
    }

    #[test]
    fn unknown_kind_is_a_yaml_error() {
        let err = parse_yaml("layouts:\n  - kind: starfield\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn explicit_file_then_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idlewall.yaml");
        fs::write(&path, EXAMPLE).unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let cfg = load_from(&cli(&["--config", &path_arg, "--background", "red", "-v"])).unwrap();
        assert_eq!(cfg.log_level(), "debug");
        for spec in cfg.layouts() {
            match spec {
                LayoutSpec::SolidColor { color } => assert_eq!(color, Color::Red),
                LayoutSpec::DigitalClock { background, .. }
                | LayoutSpec::AnalogClock { background, .. }
                | LayoutSpec::Calendar { background, .. } => assert_eq!(background, Color::Red),
            }
        }
    }

    #[test]
    fn missing_explicit_file() {
        let err = load_from(&cli(&["--config", "/nonexistent/idlewall.yaml"])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn cli_layouts_replace_list() {
        let mut cfg = parse_yaml(EXAMPLE).unwrap();
        apply_cli_overrides(
            &mut cfg,
            &cli(&["--layout", "analog_clock", "--layout", "calendar", "--week-start", "mon", "--xrandr"]),
        );
        let layouts = cfg.layouts();
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].kind(), LayoutKind::AnalogClock);
        assert!(matches!(layouts[1], LayoutSpec::Calendar { week_start: Weekday::Mon, .. }));
        assert_eq!(cfg.display_source(), DisplaySource::Xrandr);
    }

    #[test]
    fn cli_displays() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--display", "800x600+0+0", "--display", "800x600+800+0"]));
        assert_eq!(
            cfg.displays,
            Some(vec![Region::new(800, 600, 0, 0), Region::new(800, 600, 800, 0)])
        );
        assert!(Cli::try_parse_from(["idlewall", "--display", "800x600"]).is_err());
        assert!(Cli::try_parse_from(["idlewall", "--layout", "starfield"]).is_err());
    }

    #[test]
    fn validation() {
        let zero_interval = parse_yaml("layouts:\n  - kind: analog_clock\n    interval_ms: 0\n").unwrap();
        assert!(matches!(validate(&zero_interval), Err(ConfigError::Validation(_))));

        let empty = Config { layouts: Some(vec![]), ..Default::default() };
        assert!(validate(&empty).is_err());

        let zero_display = Config { displays: Some(vec![Region::new(0, 600, 0, 0)]), ..Default::default() };
        assert!(validate(&zero_display).is_err());

        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn dump_round_trips() {
        let cfg = parse_yaml(EXAMPLE).unwrap();
        let text = dump(&cfg).unwrap();
        assert_eq!(parse_yaml(&text).unwrap().layouts, cfg.layouts);

        let text = dump(&Config::default()).unwrap();
        assert!(text.contains("kind: calendar"));
        assert!(text.contains("display_source: auto"));
    }
}

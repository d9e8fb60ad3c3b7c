use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::str::FromStr;
use supports_color::Stream;

const CONFIG_FILE: &str = "config.toml";

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get path to a specific config file
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string with comments.
    /// All fields are commented out so defaults are used, but users can uncomment to override
    pub fn generate_default_config(&self) -> String {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config)
            .unwrap_or_else(|e| panic!("Failed to serialize default config: {}", e));

        Self::comment_all_fields(toml_str, Self::collect_all_comments())
    }

    fn collect_all_comments() -> HashMap<String, String> {
        let mut comments = HashMap::new();
        let sections: &[(&str, &[(&str, &str)])] = &[
            ("", APP_COMMENTS),
            ("data", DATA_COMMENTS),
            ("dashboard", DASHBOARD_COMMENTS),
            ("chart", CHART_COMMENTS),
            ("theme.colors", COLOR_COMMENTS),
            ("debug", DEBUG_COMMENTS),
        ];
        for (section, fields) in sections {
            for (field, comment) in fields.iter() {
                let key = if section.is_empty() {
                    field.to_string()
                } else {
                    format!("{}.{}", section, field)
                };
                comments.insert(key, comment.to_string());
            }
        }
        comments
    }

    /// Comment out all fields in TOML and add comments.
    /// Also adds missing Option fields as commented-out `# field = null`
    fn comment_all_fields(toml: String, comments: HashMap<String, String>) -> String {
        let mut result = String::new();
        result.push_str("# moviedash configuration file\n");
        result
            .push_str("# This file uses TOML format. See https://toml.io/ for syntax reference.\n");
        result.push('\n');

        let mut current_section = String::new();
        let mut seen_fields: HashSet<String> = HashSet::new();

        for line in toml.lines() {
            if let Some(section) = Self::extract_section_name(line) {
                current_section = section.clone();
                if let Some(header) = SECTION_HEADERS.iter().find(|(s, _)| *s == section) {
                    result.push_str(header.1);
                    result.push('\n');
                }
                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
                continue;
            }

            if let Some(field_path) = Self::extract_field_path(line, &current_section) {
                if let Some(comment) = comments.get(&field_path) {
                    for comment_line in comment.lines() {
                        result.push_str("# ");
                        result.push_str(comment_line);
                        result.push('\n');
                    }
                }
                seen_fields.insert(field_path);
                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }

        Self::add_missing_option_fields(result, &comments, &seen_fields)
    }

    /// Add Option fields that weren't serialized because they are None
    fn add_missing_option_fields(
        mut result: String,
        comments: &HashMap<String, String>,
        seen_fields: &HashSet<String>,
    ) -> String {
        let option_fields = [
            "data.path",
            "data.delimiter",
            "data.has_header",
            "data.infer_schema_length",
        ];

        let mut missing_by_section: Vec<(String, Vec<&str>)> = Vec::new();
        for field_path in option_fields {
            if seen_fields.contains(field_path) || !comments.contains_key(field_path) {
                continue;
            }
            if let Some((section, _)) = field_path.split_once('.') {
                match missing_by_section.iter_mut().find(|(s, _)| s == section) {
                    Some((_, fields)) => fields.push(field_path),
                    None => missing_by_section.push((section.to_string(), vec![field_path])),
                }
            }
        }

        for (section, fields) in &missing_by_section {
            let section_header = format!("[{}]", section);
            let Some(section_pos) = result.find(&section_header) else {
                continue;
            };
            let after_header_start = section_pos + section_header.len();
            let newline_pos = result[after_header_start..].find('\n').unwrap_or(0);
            let insert_pos = after_header_start + newline_pos + 1;

            let mut new_content = String::new();
            for field_path in fields {
                if let Some(comment) = comments.get(*field_path) {
                    for comment_line in comment.lines() {
                        new_content.push_str("# ");
                        new_content.push_str(comment_line);
                        new_content.push('\n');
                    }
                }
                let field_name = field_path.rsplit('.').next().unwrap_or(field_path);
                new_content.push_str(&format!("# {} = null\n\n", field_name));
            }
            result.insert_str(insert_pos, &new_content);
        }

        result
    }

    /// Extract section name from TOML line like "[chart]" or "[theme.colors]"
    fn extract_section_name(line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            Some(trimmed[1..trimmed.len() - 1].to_string())
        } else {
            None
        }
    }

    fn extract_field_path(line: &str, current_section: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let (field_name, _) = trimmed.split_once('=')?;
        let field_name = field_name.trim();
        if current_section.is_empty() {
            Some(field_name.to_string())
        } else {
            Some(format!("{}.{}", current_section, field_name))
        }
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path(CONFIG_FILE);

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, self.generate_default_config())?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub data: DataConfig,
    pub dashboard: DashboardConfig,
    pub chart: ChartConfig,
    pub theme: ThemeConfig,
    pub debug: DebugConfig,
}

const APP_COMMENTS: &[(&str, &str)] = &[(
    "version",
    "Configuration format version (for future compatibility)",
)];

const SECTION_HEADERS: &[(&str, &str)] = &[
    (
        "data",
        "# ============================================================================\n# Dataset\n# ============================================================================",
    ),
    (
        "dashboard",
        "# ============================================================================\n# Dashboard\n# ============================================================================",
    ),
    (
        "chart",
        "# ============================================================================\n# Charts\n# ============================================================================",
    ),
    (
        "theme.colors",
        "# ============================================================================\n# Color Theme\n# ============================================================================\n# Supported formats:\n#   - Named colors: \"red\", \"blue\", \"bright_red\", \"dark_gray\", etc. (case-insensitive)\n#   - Hex colors: \"#ff0000\"\n#   - Indexed colors: \"indexed(0-255)\"",
    ),
    (
        "debug",
        "# ============================================================================\n# Debug Settings\n# ============================================================================",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DataConfig {
    /// Movies CSV used when no path is given on the command line
    pub path: Option<String>,
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub infer_schema_length: Option<usize>,
}

const DATA_COMMENTS: &[(&str, &str)] = &[
    (
        "path",
        "Movies CSV to open when no PATH is given on the command line",
    ),
    (
        "delimiter",
        "Delimiter for the CSV file (as ASCII value, e.g., 44 for comma)",
    ),
    (
        "has_header",
        "Whether the file has a header row\nnull = reader default (true)",
    ),
    (
        "infer_schema_length",
        "Number of rows used to infer column types\nnull = reader default",
    ),
];

impl DataConfig {
    pub fn merge(&mut self, other: Self) {
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.delimiter.is_some() {
            self.delimiter = other.delimiter;
        }
        if other.has_header.is_some() {
            self.has_header = other.has_header;
        }
        if other.infer_schema_length.is_some() {
            self.infer_schema_length = other.infer_schema_length;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    pub top_n: usize,
    pub preview_rows: usize,
    pub rating_bins: usize,
}

const DASHBOARD_COMMENTS: &[(&str, &str)] = &[
    (
        "top_n",
        "Number of languages and production companies in the top lists",
    ),
    ("preview_rows", "Rows shown in the data preview"),
    (
        "rating_bins",
        "Number of equal-width bins in the rating histogram (0-10 scale)",
    ),
];

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            preview_rows: 20,
            rating_bins: 20,
        }
    }
}

impl DashboardConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DashboardConfig::default();
        if other.top_n != default.top_n {
            self.top_n = other.top_n;
        }
        if other.preview_rows != default.preview_rows {
            self.preview_rows = other.preview_rows;
        }
        if other.rating_bins != default.rating_bins {
            self.rating_bins = other.rating_bins;
        }
    }
}

/// Default maximum points used for the budget/revenue scatter.
pub const DEFAULT_CHART_ROW_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum points in the scatter chart. None = unlimited.
    pub row_limit: Option<usize>,
    pub export_width: u32,
    pub export_height: u32,
    /// Directory used by the export key in the dashboard
    pub export_dir: String,
}

const CHART_COMMENTS: &[(&str, &str)] = &[
    (
        "row_limit",
        "Maximum points drawn in the budget vs revenue scatter.\nSet to null for unlimited.",
    ),
    ("export_width", "Width of exported PNG charts in pixels"),
    ("export_height", "Height of exported PNG charts in pixels"),
    (
        "export_dir",
        "Directory the dashboard writes charts to when 'e' is pressed",
    ),
];

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            row_limit: Some(DEFAULT_CHART_ROW_LIMIT),
            export_width: 1200,
            export_height: 600,
            export_dir: "charts".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ChartConfig::default();
        if other.row_limit != default.row_limit {
            self.row_limit = other.row_limit;
        }
        if other.export_width != default.export_width {
            self.export_width = other.export_width;
        }
        if other.export_height != default.export_height {
            self.export_height = other.export_height;
        }
        if other.export_dir != default.export_dir {
            self.export_dir = other.export_dir;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        self.colors.merge(other.colors);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorConfig {
    pub accent: String,
    pub bar: String,
    pub peak_marker: String,
    pub dimmed: String,
    pub sidebar_border: String,
    pub controls_bg: String,
    pub text_primary: String,
}

const COLOR_COMMENTS: &[(&str, &str)] = &[
    ("accent", "Selected genre, active tab and keybind hints"),
    ("bar", "Bars in the yearly, rating, language and company charts"),
    ("peak_marker", "Highlight for the year with the most releases"),
    ("dimmed", "Secondary text"),
    ("sidebar_border", "Border of the genre sidebar"),
    ("controls_bg", "Background of the control bar"),
    ("text_primary", "Main text"),
];

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            accent: "cyan".to_string(),
            bar: "#6baed6".to_string(),
            peak_marker: "red".to_string(),
            dimmed: "dark_gray".to_string(),
            sidebar_border: "indexed(240)".to_string(),
            controls_bg: "indexed(235)".to_string(),
            text_primary: "default".to_string(),
        }
    }
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("accent", &self.accent),
            ("bar", &self.bar),
            ("peak_marker", &self.peak_marker),
            ("dimmed", &self.dimmed),
            ("sidebar_border", &self.sidebar_border),
            ("controls_bg", &self.controls_bg),
            ("text_primary", &self.text_primary),
        ]
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();
        if other.accent != default.accent {
            self.accent = other.accent;
        }
        if other.bar != default.bar {
            self.bar = other.bar;
        }
        if other.peak_marker != default.peak_marker {
            self.peak_marker = other.peak_marker;
        }
        if other.dimmed != default.dimmed {
            self.dimmed = other.dimmed;
        }
        if other.sidebar_border != default.sidebar_border {
            self.sidebar_border = other.sidebar_border;
        }
        if other.controls_bg != default.controls_bg {
            self.controls_bg = other.controls_bg;
        }
        if other.text_primary != default.text_primary {
            self.text_primary = other.text_primary;
        }
    }

    fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in self.entries() {
            parser
                .parse(value)
                .map_err(|e| eyre!("Invalid color value for '{}': {}", name, e))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level for batch runs (error, warn, info, debug, trace, off). RUST_LOG overrides it.
    pub log_level: String,
}

const DEBUG_COMMENTS: &[(&str, &str)] = &[(
    "log_level",
    "Log level for --report/--export-charts runs: off, error, warn, info, debug, trace\nRUST_LOG takes precedence. The dashboard only logs with --debug.",
)];

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        if other.log_level != DebugConfig::default().log_level {
            self.log_level = other.log_level;
        }
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        log::LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| eyre!("Unknown log level '{}'", self.log_level))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            data: DataConfig::default(),
            dashboard: DashboardConfig::default(),
            chart: ChartConfig::default(),
            theme: ThemeConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load defaults merged with the config file managed by `manager`, if it exists
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let config_path = manager.config_path(CONFIG_FILE);
        let mut config = AppConfig::default();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                eyre!(
                    "Failed to read config file at {}: {}",
                    config_path.display(),
                    e
                )
            })?;
            let user: AppConfig = toml::from_str(&content).map_err(|e| {
                eyre!(
                    "Failed to parse config file at {}: {}",
                    config_path.display(),
                    e
                )
            })?;
            config.merge(user);
        }

        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_path.display(), e))?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }
        self.data.merge(other.data);
        self.dashboard.merge(other.dashboard);
        self.chart.merge(other.chart);
        self.theme.merge(other.theme);
        self.debug.merge(other.debug);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if self.dashboard.top_n == 0 {
            return Err(eyre!("dashboard.top_n must be greater than 0"));
        }
        if self.dashboard.preview_rows == 0 {
            return Err(eyre!("dashboard.preview_rows must be greater than 0"));
        }
        if !(1..=100).contains(&self.dashboard.rating_bins) {
            return Err(eyre!(
                "dashboard.rating_bins must be between 1 and 100, got {}",
                self.dashboard.rating_bins
            ));
        }

        if self.chart.row_limit == Some(0) {
            return Err(eyre!("chart.row_limit must be greater than 0 when set"));
        }
        for (name, value) in [
            ("export_width", self.chart.export_width),
            ("export_height", self.chart.export_height),
        ] {
            if !(200..=8000).contains(&value) {
                return Err(eyre!(
                    "chart.{} must be between 200 and 8000 pixels, got {}",
                    name,
                    value
                ));
            }
        }

        self.debug.level_filter()?;

        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;

        Ok(())
    }
}

/// What the terminal on stdout can display. `NO_COLOR` maps to `Monochrome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    TrueColor,
    Palette256,
    Basic,
    Monochrome,
}

impl ColorSupport {
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            return ColorSupport::Monochrome;
        }
        match supports_color::on(Stream::Stdout) {
            Some(level) if level.has_16m => ColorSupport::TrueColor,
            Some(level) if level.has_256 => ColorSupport::Palette256,
            _ => ColorSupport::Basic,
        }
    }

    /// Downsample `color` to something this terminal can show.
    pub fn adapt(self, color: Color) -> Color {
        match (self, color) {
            (ColorSupport::Monochrome, _) => Color::Reset,
            (ColorSupport::Palette256, Color::Rgb(r, g, b)) => {
                Color::Indexed(palette_index(r, g, b))
            }
            (ColorSupport::Basic, Color::Rgb(r, g, b)) => nearest_ansi(r, g, b),
            (_, other) => other,
        }
    }
}

/// Theme color names. Separators and the `grey` spelling are normalized before lookup.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("gray", Color::Indexed(8)),
    ("dark_gray", Color::Indexed(8)),
    ("light_gray", Color::Indexed(7)),
    ("bright_red", Color::Indexed(9)),
    ("bright_green", Color::Indexed(10)),
    ("bright_yellow", Color::Indexed(11)),
    ("bright_blue", Color::Indexed(12)),
    ("bright_magenta", Color::Indexed(13)),
    ("bright_cyan", Color::Indexed(14)),
    ("default", Color::Reset),
    ("reset", Color::Reset),
    ("none", Color::Reset),
];

/// Parses theme color strings: a name, `#rrggbb` or `indexed(N)`.
pub struct ColorParser {
    support: ColorSupport,
}

impl ColorParser {
    pub fn new() -> Self {
        Self::with_support(ColorSupport::detect())
    }

    pub fn with_support(support: ColorSupport) -> Self {
        Self { support }
    }

    /// Parse and adapt to the terminal.
    pub fn parse(&self, s: &str) -> Result<Color> {
        Ok(self.support.adapt(Self::parse_raw(s)?))
    }

    /// Parse without adapting. Hex colors stay `Color::Rgb`.
    pub fn parse_raw(s: &str) -> Result<Color> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .map(|(r, g, b)| Color::Rgb(r, g, b))
                .ok_or_else(|| eyre!("Invalid hex color '{}', expected #rrggbb", s));
        }

        let key = s.to_lowercase().replace([' ', '-'], "_").replace("grey", "gray");
        if let Some(index) = key.strip_prefix("indexed(").and_then(|r| r.strip_suffix(')')) {
            return index
                .trim()
                .parse::<u8>()
                .map(Color::Indexed)
                .map_err(|_| eyre!("Invalid indexed color '{}', expected indexed(0-255)", s));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, color)| *color)
            .ok_or_else(|| {
                eyre!(
                    "Unknown color '{}'. Use a color name (red, bright_cyan, dark_gray, default), \
                     #rrggbb or indexed(0-255)",
                    s
                )
            })
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// xterm palette index: the 24-step gray ramp for near-grays, the 6x6x6 cube otherwise.
fn palette_index(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (r as u16, g as u16, b as u16);
    if r.max(g).max(b) - r.min(g).min(b) < 10 {
        let level = (r + g + b) / 3;
        return if level < 8 {
            16
        } else if level > 238 {
            231
        } else {
            232 + ((level - 8) / 10) as u8
        };
    }
    let step = |v: u16| ((v * 5 + 127) / 255) as u8;
    16 + 36 * step(r) + 6 * step(g) + step(b)
}

/// Closest of the eight basic ANSI colors by squared distance to their xterm defaults.
fn nearest_ansi(r: u8, g: u8, b: u8) -> Color {
    const ANSI: [(Color, [i32; 3]); 8] = [
        (Color::Black, [0, 0, 0]),
        (Color::Red, [205, 0, 0]),
        (Color::Green, [0, 205, 0]),
        (Color::Yellow, [205, 205, 0]),
        (Color::Blue, [0, 0, 238]),
        (Color::Magenta, [205, 0, 205]),
        (Color::Cyan, [0, 205, 205]),
        (Color::White, [229, 229, 229]),
    ];
    let rgb = [r as i32, g as i32, b as i32];
    ANSI.iter()
        .min_by_key(|(_, c)| (0..3).map(|i| (c[i] - rgb[i]).pow(2)).sum::<i32>())
        .map(|(color, _)| *color)
        .unwrap_or(Color::Reset)
}

/// Theme containing parsed colors ready for use
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Get a color by name, returns Reset if not found
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default()).unwrap_or_else(|_| Self {
            colors: HashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_raw_named_hex_indexed() {
        assert_eq!(ColorParser::parse_raw("Cyan").unwrap(), Color::Cyan);
        assert_eq!(
            ColorParser::parse_raw("#6baed6").unwrap(),
            Color::Rgb(0x6b, 0xae, 0xd6)
        );
        assert_eq!(
            ColorParser::parse_raw("indexed(240)").unwrap(),
            Color::Indexed(240)
        );
        assert!(ColorParser::parse_raw("indexed(300)").is_err());
        assert!(ColorParser::parse_raw("chartreuse-ish").is_err());
    }

    #[test]
    fn rgb_is_downsampled_per_terminal() {
        let bar = Color::Rgb(0x6b, 0xae, 0xd6);
        assert_eq!(ColorSupport::TrueColor.adapt(bar), bar);
        assert_eq!(ColorSupport::Palette256.adapt(bar), Color::Indexed(110));
        assert_eq!(ColorSupport::Basic.adapt(bar), Color::Cyan);
        assert_eq!(ColorSupport::Monochrome.adapt(Color::Red), Color::Reset);
        // named and indexed colors pass through
        assert_eq!(ColorSupport::Basic.adapt(Color::Indexed(240)), Color::Indexed(240));
    }

    #[test]
    fn palette_index_grays_and_cube() {
        assert_eq!(palette_index(0, 0, 0), 16);
        assert_eq!(palette_index(255, 255, 255), 231);
        assert_eq!(palette_index(128, 128, 128), 244);
        assert_eq!(palette_index(255, 0, 0), 196);
        assert_eq!(nearest_ansi(200, 10, 10), Color::Red);
    }

    #[test]
    fn parser_with_fixed_support() {
        let parser = ColorParser::with_support(ColorSupport::Palette256);
        assert_eq!(parser.parse(" #ff0000 ").unwrap(), Color::Indexed(196));
        assert_eq!(parser.parse("Light Grey").unwrap(), Color::Indexed(7));
        assert!(parser.parse("#ff00").is_err());
    }

    #[test]
    fn level_filter_parses() {
        let debug = DebugConfig {
            log_level: "debug".into(),
        };
        assert_eq!(debug.level_filter().unwrap(), log::LevelFilter::Debug);
        let bad = DebugConfig {
            log_level: "loud".into(),
        };
        assert!(bad.level_filter().is_err());
    }
}

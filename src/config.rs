use std::env;

pub const GLYPHS_VAR: &str = "CHESS_GLYPHS";
pub const OUTPUT_VAR: &str = "CHESS_OUTPUT";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GlyphStyle {
    #[default]
    Unicode,
    Ascii,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

/// Settings of the terminal shell, read from the environment.
/// The log filter is read by `env_logger` itself from `LOG_LEVEL`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ShellConfig {
    pub glyphs: GlyphStyle,
    pub output: OutputMode,
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let glyphs = match lookup(GLYPHS_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("unicode") => GlyphStyle::Unicode,
            Some("ascii") => GlyphStyle::Ascii,
            Some(other) => {
                log::warn!("Unknown {} value {:?}, using unicode", GLYPHS_VAR, other);
                GlyphStyle::Unicode
            }
        };
        let output = match lookup(OUTPUT_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("text") => OutputMode::Text,
            Some("json") => OutputMode::Json,
            Some(other) => {
                log::warn!("Unknown {} value {:?}, using text", OUTPUT_VAR, other);
                OutputMode::Text
            }
        };
        ShellConfig { glyphs, output }
    }
}

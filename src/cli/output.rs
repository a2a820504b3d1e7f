#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

/// Resolve the output format from the CLI flags, falling back to the
/// configured default. `--json` beats `--format`.
pub fn resolve_format(json_flag: bool, format_flag: Option<&str>, config_default: &str) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    match format_flag.unwrap_or(config_default) {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

pub fn detect_color(color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty_stdout()
}

fn atty_stdout() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}

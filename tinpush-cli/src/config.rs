//! Load config from file and environment.

use serde::Deserialize;
use std::path::PathBuf;

/// Client configuration. File: ~/.config/tinpush/config.toml or
/// /etc/tinpush/config.toml.
/// Env overrides: TINPUSH_VENDOR_ID, TINPUSH_PRODUCT_ID, TINPUSH_EXTENSION.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// USB vendor id of the console (default 0x057E, Nintendo).
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    /// USB product id of the console (default 0x3000, Switch).
    #[serde(default = "default_product_id")]
    pub product_id: u16,
    /// Package file extension to announce, without the dot (default "nsp").
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_vendor_id() -> u16 {
    0x057E
}
fn default_product_id() -> u16 {
    0x3000
}
fn default_extension() -> String {
    "nsp".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            extension: default_extension(),
        }
    }
}

/// Load config: merge default, then config file (if present), then env vars.
pub fn load() -> Config {
    let mut c = load_file().unwrap_or_default();
    if let Ok(s) = std::env::var("TINPUSH_VENDOR_ID") {
        if let Some(id) = parse_id(&s) {
            c.vendor_id = id;
        }
    }
    if let Ok(s) = std::env::var("TINPUSH_PRODUCT_ID") {
        if let Some(id) = parse_id(&s) {
            c.product_id = id;
        }
    }
    if let Ok(s) = std::env::var("TINPUSH_EXTENSION") {
        if !s.is_empty() {
            c.extension = s.trim_start_matches('.').to_string();
        }
    }
    c
}

/// USB ids are conventionally written in hex; accept "0x3000" and "12288".
fn parse_id(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/tinpush/config.toml"));
    }
    out.push(PathBuf::from("/etc/tinpush/config.toml"));
    out
}

fn load_file() -> Option<Config> {
    for p in config_paths() {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(c) = toml::from_str::<Config>(&s) {
                    return Some(c);
                }
            }
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_known_console() {
        let c = Config::default();
        assert_eq!(c.vendor_id, 0x057E);
        assert_eq!(c.product_id, 0x3000);
        assert_eq!(c.extension, "nsp");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c: Config = toml::from_str("extension = \"xci\"").unwrap();
        assert_eq!(c.extension, "xci");
        assert_eq!(c.vendor_id, 0x057E);
    }

    #[test]
    fn hex_ids_in_file() {
        let c: Config = toml::from_str("vendor_id = 0x057E\nproduct_id = 0x3000").unwrap();
        assert_eq!(c.vendor_id, 0x057E);
        assert_eq!(c.product_id, 0x3000);
    }

    #[test]
    fn parse_id_accepts_hex_and_decimal() {
        assert_eq!(parse_id("0x3000"), Some(0x3000));
        assert_eq!(parse_id("12288"), Some(12288));
        assert_eq!(parse_id("bogus"), None);
    }
}

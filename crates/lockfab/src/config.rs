// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use rune_cfg::RuneConfig;

pub const DEFAULT_PAGE_URL: &str = "https://www.reddit.com/r/wallpaper/";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfabConfig {
    /// Composite a freshly fetched wallpaper; otherwise lock on the raw cached one.
    pub random_pic: bool,
    /// Page scraped for candidate wallpaper links.
    pub url: String,
    pub show_failed_attempts: bool,
    pub no_unlock_indicator: bool,
    pub proxies: ProxyConfig,
}

impl Default for LockfabConfig {
    fn default() -> Self {
        Self {
            random_pic: true,
            url: DEFAULT_PAGE_URL.to_string(),
            show_failed_attempts: true,
            no_unlock_indicator: false,
            proxies: ProxyConfig::default(),
        }
    }
}

pub fn load(path: &Path) -> Result<LockfabConfig, String> {
    if !path.exists() {
        return Ok(LockfabConfig::default());
    }

    let rc = RuneConfig::from_file(path).map_err(|e| format!("failed to read config: {e}"))?;

    parse_config(&rc)
}

fn parse_config(rc: &RuneConfig) -> Result<LockfabConfig, String> {
    let mut cfg = LockfabConfig::default();

    if !rc.has("lockfab") {
        return Ok(cfg);
    }

    if let Some(v) = get_bool(rc, "lockfab.random_pic")? {
        cfg.random_pic = v;
    }

    if let Some(url) = get_string(rc, "lockfab.url")? {
        let url = url.trim();
        if !url.is_empty() {
            cfg.url = url.to_string();
        }
    }

    if let Some(v) = get_bool(rc, "lockfab.show_failed_attempts")? {
        cfg.show_failed_attempts = v;
    }

    if let Some(v) = get_bool(rc, "lockfab.no_unlock_indicator")? {
        cfg.no_unlock_indicator = v;
    }

    cfg.proxies.http = get_string(rc, "lockfab.proxies.http")?.and_then(non_empty);
    cfg.proxies.https = get_string(rc, "lockfab.proxies.https")?.and_then(non_empty);

    Ok(cfg)
}

fn get_bool(rc: &RuneConfig, key: &str) -> Result<Option<bool>, String> {
    rc.get_optional::<bool>(key)
        .map_err(|e| format!("config error at {key}: {e}"))
}

fn get_string(rc: &RuneConfig, key: &str) -> Result<Option<String>, String> {
    rc.get_optional::<String>(key)
        .map_err(|e| format!("config error at {key}: {e}"))
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// The config written on first run: every key, at its default.
pub fn default_config_text() -> String {
    let cfg = LockfabConfig::default();
    format!(
        "\
lockfab:
  random_pic {random_pic}
  url \"{url}\"
  show_failed_attempts {show_failed_attempts}
  no_unlock_indicator {no_unlock_indicator}

  proxies:
    http \"\"
    https \"\"
  end
end
",
        random_pic = cfg.random_pic,
        url = cfg.url,
        show_failed_attempts = cfg.show_failed_attempts,
        no_unlock_indicator = cfg.no_unlock_indicator,
    )
}

/// Write the default config unless one already exists. Returns whether it wrote.
pub fn write_default_if_missing(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    crate::paths::ensure_parent_dir(path)?;
    std::fs::write(path, default_config_text())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(&dir.path().join("nope.rune")).unwrap();
        assert_eq!(cfg, LockfabConfig::default());
        assert!(cfg.random_pic);
        assert!(cfg.show_failed_attempts);
        assert!(!cfg.no_unlock_indicator);
        assert_eq!(cfg.url, DEFAULT_PAGE_URL);
        assert_eq!(cfg.proxies, ProxyConfig::default());
    }

    #[test]
    fn default_text_mentions_every_key() {
        let text = default_config_text();
        for key in [
            "random_pic true",
            "url \"https://www.reddit.com/r/wallpaper/\"",
            "show_failed_attempts true",
            "no_unlock_indicator false",
            "proxies:",
            "http \"\"",
            "https \"\"",
        ] {
            assert!(text.contains(key), "missing {key:?} in:\n{text}");
        }
    }

    #[test]
    fn default_file_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockfab").join("lockfab.rune");

        assert!(write_default_if_missing(&path).unwrap());
        std::fs::write(&path, "# edited").unwrap();
        assert!(!write_default_if_missing(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited");
    }

    #[test]
    fn default_file_loads_back_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockfab.rune");
        assert!(write_default_if_missing(&path).unwrap());

        assert_eq!(load(&path).unwrap(), LockfabConfig::default());
    }

    #[test]
    fn edited_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockfab.rune");
        std::fs::write(
            &path,
            "\
lockfab:
  random_pic false
  url \"https://example.org/walls/\"
  show_failed_attempts false
  no_unlock_indicator true

  proxies:
    http \"http://127.0.0.1:3128\"
    https \"\"
  end
end
",
        )
        .unwrap();

        let cfg = load(&path).unwrap();
        assert_eq!(
            cfg,
            LockfabConfig {
                random_pic: false,
                url: "https://example.org/walls/".into(),
                show_failed_attempts: false,
                no_unlock_indicator: true,
                proxies: ProxyConfig {
                    http: Some("http://127.0.0.1:3128".into()),
                    https: None,
                },
            }
        );
    }

    #[test]
    fn omitted_keys_keep_their_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockfab.rune");
        std::fs::write(&path, "lockfab:\n  no_unlock_indicator true\nend\n").unwrap();

        let cfg = load(&path).unwrap();
        assert!(cfg.no_unlock_indicator);
        assert!(cfg.random_pic);
        assert_eq!(cfg.url, DEFAULT_PAGE_URL);
        assert_eq!(cfg.proxies, ProxyConfig::default());
    }

    #[test]
    fn blank_proxies_are_unset() {
        assert_eq!(non_empty("   ".into()), None);
        assert_eq!(
            non_empty(" http://127.0.0.1:3128 ".into()),
            Some("http://127.0.0.1:3128".into())
        );
    }
}

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub target: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "site_root")]
    pub site: Option<String>,
    pub records: Option<String>,
    pub location: Option<String>,
    pub default_page: Option<String>,
    pub person_param: Option<String>,
    pub pages: Option<Vec<String>>,
    pub nav: Option<Vec<NavEntry>>,
    pub steps: Option<Vec<String>>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".recordbook").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Recordbook config
#
# Location (default):
#   ~/.recordbook/config.yml

# Site root; images resolve under <site>/Assets/
site: http://localhost/

# Records resource (URL or file path). Defaults to <site>/Assets/records.json
# records: ./Assets/records.json

# Page URL the session starts from (hash = page, ?person= = profile)
# location: http://localhost/#people

# Navigation
default_page: home
pages:
  - home
  - records
  - former
  - people
# Nav triggers; defaults to one tab per page
# nav:
#   - target: home
#     role: tab
#   - target: people

# Query parameter carrying the profile name
person_param: person

# Scripted steps replayed after the records load
# steps:
#   - click:people
#   - open:Ada
#   - back
#   - history-back

# Output (optional)
# output: ./board.html
# output_format: html

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

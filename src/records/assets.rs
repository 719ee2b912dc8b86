use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;
use thiserror::Error;

pub const ASSET_DIR: &str = "Assets/";
pub const RECORDS_PATH: &str = "Assets/records.json";
pub const PLACEHOLDER_IMAGE_PATH: &str = "Assets/images/placeholder.png";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid site root: {url}")]
    InvalidSiteRoot { url: String },
}

fn absolute_http_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^https?://").expect("static regex"))
}

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("static regex"))
}

fn is_passthrough(raw: &str) -> bool {
    absolute_http_re().is_match(raw) || raw.starts_with('/')
}

/// Footage references: absolute http(s) and root-relative pass through, other
/// references pass through unresolved. References carrying any other scheme
/// (`javascript:`, `data:`, ...) are dropped.
pub fn footage_href(value: Option<&str>) -> Option<String> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    if is_passthrough(raw) {
        return Some(raw.to_string());
    }
    if scheme_re().is_match(raw) {
        return None;
    }
    Some(raw.to_string())
}

/// Resolves image references against the site's asset directory.
#[derive(Clone, Debug)]
pub struct AssetResolver {
    site_root: Url,
    asset_root: Url,
    placeholder: Url,
}

impl AssetResolver {
    pub fn new(site_root: Url) -> Result<Self, AssetError> {
        let mut site_root = site_root;
        if !site_root.path().ends_with('/') {
            let path = format!("{}/", site_root.path());
            site_root.set_path(&path);
        }
        site_root.set_query(None);
        site_root.set_fragment(None);

        let invalid = || AssetError::InvalidSiteRoot {
            url: site_root.to_string(),
        };
        let asset_root = site_root.join(ASSET_DIR).map_err(|_| invalid())?;
        let placeholder = site_root
            .join(PLACEHOLDER_IMAGE_PATH)
            .map_err(|_| invalid())?;
        Ok(Self {
            site_root,
            asset_root,
            placeholder,
        })
    }

    pub fn parse(site_root: &str) -> Result<Self, AssetError> {
        let url = Url::parse(site_root.trim()).map_err(|_| AssetError::InvalidSiteRoot {
            url: site_root.to_string(),
        })?;
        Self::new(url)
    }

    pub fn site_root(&self) -> &Url {
        &self.site_root
    }

    pub fn records_url(&self) -> Url {
        self.site_root
            .join(RECORDS_PATH)
            .unwrap_or_else(|_| self.asset_root.clone())
    }

    pub fn placeholder_href(&self) -> &str {
        self.placeholder.as_str()
    }

    pub fn image_href(&self, value: Option<&str>) -> String {
        let raw = match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw,
            None => return self.placeholder_href().to_string(),
        };
        if is_passthrough(raw) {
            return raw.to_string();
        }

        // "./" keeps a name like `photo:1.png` from parsing as a scheme
        let resolved = if raw.starts_with(ASSET_DIR) {
            self.site_root.join(&format!("./{raw}"))
        } else {
            let bare = raw.strip_prefix("./").unwrap_or(raw);
            self.asset_root.join(&format!("./{bare}"))
        };
        match resolved {
            Ok(url) => url.to_string(),
            Err(_) => self.placeholder_href().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AssetResolver {
        AssetResolver::parse("https://example.com/site").unwrap()
    }

    #[test]
    fn site_root_is_treated_as_a_directory() {
        let r = resolver();
        assert_eq!(r.site_root().as_str(), "https://example.com/site/");
        assert_eq!(
            r.records_url().as_str(),
            "https://example.com/site/Assets/records.json"
        );
    }

    #[test]
    fn missing_image_resolves_to_placeholder() {
        let r = resolver();
        let placeholder = "https://example.com/site/Assets/images/placeholder.png";
        assert_eq!(r.image_href(None), placeholder);
        assert_eq!(r.image_href(Some("   ")), placeholder);
    }

    #[test]
    fn absolute_and_root_relative_images_pass_through() {
        let r = resolver();
        assert_eq!(
            r.image_href(Some("HTTPS://cdn.example.com/a.png")),
            "HTTPS://cdn.example.com/a.png"
        );
        assert_eq!(r.image_href(Some("/img/a.png")), "/img/a.png");
    }

    #[test]
    fn asset_rooted_and_bare_images_resolve_under_assets() {
        let r = resolver();
        assert_eq!(
            r.image_href(Some("Assets/images/a.png")),
            "https://example.com/site/Assets/images/a.png"
        );
        assert_eq!(
            r.image_href(Some("images/b.png")),
            "https://example.com/site/Assets/images/b.png"
        );
        assert_eq!(
            r.image_href(Some("./c.png")),
            "https://example.com/site/Assets/c.png"
        );
    }

    #[test]
    fn scheme_like_image_names_stay_under_assets() {
        let r = resolver();
        assert_eq!(
            r.image_href(Some("photo:1.png")),
            "https://example.com/site/Assets/photo:1.png"
        );
        for raw in ["javascript:alert(1)", "data:image/png;base64,AA", "a:b.png"] {
            let href = r.image_href(Some(raw));
            assert!(
                href.starts_with("https://example.com/site/Assets/"),
                "{raw} -> {href}"
            );
        }
    }

    #[test]
    fn footage_is_not_asset_rooted() {
        assert_eq!(footage_href(Some("clip.mp4")).as_deref(), Some("clip.mp4"));
        assert_eq!(
            footage_href(Some("http://v.example.com/x")).as_deref(),
            Some("http://v.example.com/x")
        );
        assert_eq!(footage_href(Some("/v/x.mp4")).as_deref(), Some("/v/x.mp4"));
        assert_eq!(footage_href(Some("")), None);
        assert_eq!(footage_href(Some("data:text/html,hi")), None);
        assert_eq!(footage_href(None), None);
    }
}

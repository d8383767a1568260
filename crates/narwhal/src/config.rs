use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Calibration for the box heuristics.
///
/// The defaults reproduce the browser-less fallback Mermaid renders were tuned against:
/// 8 user units per character and a 16-unit line box for any text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub char_width: f64,
    pub line_height: f64,
    /// Namespaced text tags (e.g. `svg:text`) are matched by suffix; plain `text` always is.
    pub text_tag_suffixes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            text_tag_suffixes: vec![":text".to_string()],
        }
    }
}

impl ResolverConfig {
    /// Parses a (possibly partial) JSON object; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("charWidth", self.char_width), ("lineHeight", self.line_height)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("`{name}` must be a positive finite number, got {v}"),
                });
            }
        }
        Ok(())
    }

    pub fn is_text_tag(&self, tag: &str) -> bool {
        let tag = tag.to_ascii_lowercase();
        tag == "text"
            || self
                .text_tag_suffixes
                .iter()
                .any(|s| tag.ends_with(&s.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ResolverConfig::from_json_str(r#"{"charWidth": 7.5}"#).expect("config");
        assert_eq!(cfg.char_width, 7.5);
        assert_eq!(cfg.line_height, 16.0);
        assert_eq!(cfg.text_tag_suffixes, vec![":text".to_string()]);
    }

    #[test]
    fn rejects_non_positive_metrics() {
        let err = ResolverConfig::from_json_str(r#"{"lineHeight": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }), "{err}");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ResolverConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err}");
    }

    #[test]
    fn text_tag_matching_is_case_insensitive() {
        let cfg = ResolverConfig::default();
        assert!(cfg.is_text_tag("text"));
        assert!(cfg.is_text_tag("TEXT"));
        assert!(cfg.is_text_tag("svg:text"));
        assert!(!cfg.is_text_tag("textPath"));
        assert!(!cfg.is_text_tag("tspan"));
    }
}

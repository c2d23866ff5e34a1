//! Response formats a version can respond to.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A named representation with its media type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Format {
    name: &'static str,
    mime: &'static str,
}

// name, media type, extra media types accepted in `Accept`
const KNOWN: &[(&str, &str, &[&str])] = &[
    ("json",  "application/json",          &["text/json"]),
    ("jsonp", "application/javascript",    &["text/javascript"]),
    ("xml",   "application/xml",           &["text/xml"]),
    ("html",  "text/html; charset=utf-8",  &[]),
    ("text",  "text/plain; charset=utf-8", &[]),
    ("csv",   "text/csv",                  &[]),
    ("rss",   "application/rss+xml",       &[]),
    ("atom",  "application/atom+xml",      &[]),
    ("yaml",  "application/x-yaml",        &["text/yaml"]),
];

impl Format {
    pub const JSON: Format = Format { name: "json", mime: "application/json" };
    pub const JSONP: Format = Format { name: "jsonp", mime: "application/javascript" };

    /// The formats used when nothing was declared.
    pub const DEFAULTS: [Format; 2] = [Format::JSON, Format::JSONP];

    pub fn name(self) -> &'static str { self.name }
    pub fn mime(self) -> &'static str { self.mime }

    /// Maps a media type (parameters ignored) to a known format.
    pub fn from_media_type(media: &str) -> Option<Format> {
        let media = media.split(';').next().unwrap_or_default().trim();
        KNOWN.iter()
            .find(|(_, mime, aliases)| {
                let base = mime.split(';').next().unwrap_or_default();
                base.eq_ignore_ascii_case(media) || aliases.iter().any(|a| a.eq_ignore_ascii_case(media))
            })
            .map(|&(name, mime, _)| Format { name, mime })
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start_matches('.');
        KNOWN.iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(s))
            .map(|&(name, mime, _)| Format { name, mime })
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_owned()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_extensions() {
        assert_eq!("json".parse::<Format>(), Ok(Format::JSON));
        assert_eq!(".JSONP".parse::<Format>(), Ok(Format::JSONP));
        assert_eq!("xml".parse::<Format>().map(Format::mime), Ok("application/xml"));
        assert_eq!("docx".parse::<Format>(), Err(ConfigError::UnknownFormat("docx".into())));
    }

    #[test]
    fn media_types_ignore_parameters_and_aliases() {
        assert_eq!(Format::from_media_type("application/json; charset=utf-8"), Some(Format::JSON));
        assert_eq!(Format::from_media_type("text/xml").map(Format::name), Some("xml"));
        assert_eq!(Format::from_media_type("text/html").map(Format::name), Some("html"));
        assert_eq!(Format::from_media_type("image/png"), None);
    }
}

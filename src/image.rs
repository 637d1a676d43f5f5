//! Container image reference parsing and normalisation.
//!
//! References have the shape `[host/]path[:tag][@digest]`. Parsing applies
//! the registry defaulting rules: a missing host becomes the public Docker
//! Hub host, a bare single-segment repository gains the `library/`
//! namespace, and a missing tag becomes `latest`. Two references point at
//! the same repository iff host and repository are equal after defaulting.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Registry host assumed when a reference carries none
pub const DEFAULT_REGISTRY_HOST: &str = "index.docker.io";

/// Namespace prepended to single-segment repositories on the default host
pub const DEFAULT_NAMESPACE: &str = "library";

fn is_valid_host(host: &str) -> bool {
    static RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?(:[0-9]+)?$").ok()
    });
    RE.as_ref().is_some_and(|re| re.is_match(host))
}

fn is_valid_repository(path: &str) -> bool {
    static RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
        Regex::new(r"^[a-z0-9]+([._-][a-z0-9]+)*(/[a-z0-9]+([._-][a-z0-9]+)*)*$").ok()
    });
    RE.as_ref().is_some_and(|re| re.is_match(path))
}

fn is_valid_tag(tag: &str) -> bool {
    static RE: LazyLock<Option<Regex>> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").ok());
    RE.as_ref().is_some_and(|re| re.is_match(tag))
}

fn is_valid_digest(digest: &str) -> bool {
    static RE: LazyLock<Option<Regex>> =
        LazyLock::new(|| Regex::new(r"^[a-z0-9]+([-_+.][a-z0-9]+)*:[0-9a-fA-F]{32,}$").ok());
    RE.as_ref().is_some_and(|re| re.is_match(digest))
}

/// A parsed, normalised container image reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    host: String,
    repository: String,
    tag: String,
    digest: Option<String>,
}

impl ImageRef {
    /// Parse a reference string, applying the defaulting rules.
    ///
    /// Fails with [`Error::MalformedReference`] on an empty string, an
    /// invalid tag, an invalid repository path or a malformed digest.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::MalformedReference("empty reference".to_string()));
        }

        let (rest, digest) = match s.split_once('@') {
            Some((before, after)) => {
                if !is_valid_digest(after) {
                    return Err(Error::MalformedReference(format!(
                        "invalid digest {after:?} in {s:?}"
                    )));
                }
                (before, Some(after.to_string()))
            }
            None => (s, None),
        };

        // A colon only delimits a tag when nothing after it looks like a
        // path; otherwise it belongs to a host port.
        let (rest, tag) = match rest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => {
                if !is_valid_tag(after) {
                    return Err(Error::MalformedReference(format!(
                        "invalid tag {after:?} in {s:?}"
                    )));
                }
                (before, after.to_string())
            }
            _ => (rest, String::new()),
        };

        let (host, mut repository) = match rest.split_once('/') {
            Some((first, path))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (first.to_string(), path.to_string())
            }
            _ => (DEFAULT_REGISTRY_HOST.to_string(), rest.to_string()),
        };

        if !is_valid_host(&host) {
            return Err(Error::MalformedReference(format!(
                "invalid registry host {host:?} in {s:?}"
            )));
        }

        // `library/` only exists on the default registry
        if host == DEFAULT_REGISTRY_HOST && !repository.contains('/') {
            repository = format!("{DEFAULT_NAMESPACE}/{repository}");
        }

        if !is_valid_repository(&repository) {
            return Err(Error::MalformedReference(format!(
                "invalid repository {repository:?} in {s:?}"
            )));
        }

        let tag = if tag.is_empty() {
            "latest".to_string()
        } else {
            tag
        };

        Ok(Self {
            host,
            repository,
            tag,
            digest,
        })
    }

    /// Build a reference from the parts a registry event carries.
    ///
    /// `repository` may itself embed a host (`gcr.io/ns/app`) when `host`
    /// is `None`. An empty `tag` stays empty: digest-push events have no
    /// tag, and the engine rejects such candidates.
    pub fn from_parts(host: Option<&str>, repository: &str, tag: &str) -> Result<Self> {
        let mut raw = String::new();
        if let Some(host) = host {
            raw.push_str(host);
            raw.push('/');
        }
        raw.push_str(repository);
        if !tag.is_empty() {
            raw.push(':');
            raw.push_str(tag);
        }
        let mut parsed = Self::parse(&raw)?;
        if tag.is_empty() {
            parsed.tag = String::new();
        }
        Ok(parsed)
    }

    /// Registry host (always set after defaulting)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository path (always set after defaulting)
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Tag; `latest` when the source string had none, empty only for
    /// digest-push candidates built via [`ImageRef::from_parts`]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Digest, if the reference carried one
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Canonical `host/repository:tag` rendering, digest omitted.
    pub fn canonical(&self) -> String {
        if self.tag.is_empty() {
            format!("{}/{}", self.host, self.repository)
        } else {
            format!("{}/{}:{}", self.host, self.repository, self.tag)
        }
    }

    /// Whether two references point at the same repository.
    pub fn same_repository(&self, other: &Self) -> bool {
        self.host == other.host && self.repository == other.repository
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())?;
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

impl FromStr for ImageRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reference() {
        let r = ImageRef::parse("gcr.io/v2-namespace/hello-world:1.1.1").unwrap();
        assert_eq!(r.host(), "gcr.io");
        assert_eq!(r.repository(), "v2-namespace/hello-world");
        assert_eq!(r.tag(), "1.1.1");
        assert_eq!(r.digest(), None);
    }

    #[test]
    fn test_parse_defaults_host() {
        let r = ImageRef::parse("karolisr/bow:latest").unwrap();
        assert_eq!(r.host(), DEFAULT_REGISTRY_HOST);
        assert_eq!(r.repository(), "karolisr/bow");
    }

    #[test]
    fn test_parse_defaults_namespace() {
        let r = ImageRef::parse("redis").unwrap();
        assert_eq!(r.host(), DEFAULT_REGISTRY_HOST);
        assert_eq!(r.repository(), "library/redis");
        assert_eq!(r.tag(), "latest");
        assert_eq!(r.canonical(), "index.docker.io/library/redis:latest");
    }

    #[test]
    fn test_parse_defaults_tag() {
        let r = ImageRef::parse("gcr.io/v2-namespace/hello-world").unwrap();
        assert_eq!(r.tag(), "latest");
    }

    #[test]
    fn test_parse_localhost_with_port() {
        let r = ImageRef::parse("localhost:5000/app:dev").unwrap();
        assert_eq!(r.host(), "localhost:5000");
        // no library/ outside the default registry
        assert_eq!(r.repository(), "app");
        assert_eq!(r.tag(), "dev");
    }

    #[test]
    fn test_parse_digest() {
        let digest = "sha256:b17f5eba27a558548e1312e97d96bc429ef84d6e0823e6feff6ab66e1b848b8b";
        let r = ImageRef::parse(&format!("gcr.io/ns/app:1.0.0@{digest}")).unwrap();
        assert_eq!(r.tag(), "1.0.0");
        assert_eq!(r.digest(), Some(digest));
        // canonical form drops the digest, Display keeps it
        assert_eq!(r.canonical(), "gcr.io/ns/app:1.0.0");
        assert_eq!(r.to_string(), format!("gcr.io/ns/app:1.0.0@{digest}"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ImageRef::parse("").is_err());
        assert!(ImageRef::parse("gcr.io/ns/app:").is_err());
        assert!(ImageRef::parse("gcr.io/ns/app:-bad").is_err());
        assert!(ImageRef::parse(&format!("app:{}", "x".repeat(129))).is_err());
        assert!(ImageRef::parse("gcr.io/ns//app").is_err());
        assert!(ImageRef::parse("gcr.io/NS/app").is_err());
        assert!(ImageRef::parse("gcr.io/ns/app@sha256:nothex").is_err());
        assert!(ImageRef::parse("gcr.io/ns/app@deadbeef").is_err());
    }

    #[test]
    fn test_canonical_round_trip() {
        for raw in [
            "gcr.io/v2-namespace/hello-world:1.1.1",
            "karolisr/bow",
            "redis:7.2.4",
            "localhost:5000/app:dev",
            "eu.gcr.io/karolisr/bow:release-1",
        ] {
            let parsed = ImageRef::parse(raw).unwrap();
            let reparsed = ImageRef::parse(&parsed.canonical()).unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {raw}");
        }
    }

    #[test]
    fn test_same_repository() {
        let a = ImageRef::parse("karolisr/bow:1.0.0").unwrap();
        let b = ImageRef::parse("index.docker.io/karolisr/bow:2.0.0").unwrap();
        let c = ImageRef::parse("eu.gcr.io/karolisr/bow:1.0.0").unwrap();
        assert!(a.same_repository(&b));
        assert!(!a.same_repository(&c));
    }

    #[test]
    fn test_from_parts() {
        let r = ImageRef::from_parts(Some("eu.gcr.io"), "karolisr/bow", "latest-staging").unwrap();
        assert_eq!(r.canonical(), "eu.gcr.io/karolisr/bow:latest-staging");

        let r = ImageRef::from_parts(None, "gcr.io/v2-namespace/hello-world", "1.1.2").unwrap();
        assert_eq!(r.host(), "gcr.io");
        assert_eq!(r.repository(), "v2-namespace/hello-world");
    }

    #[test]
    fn test_from_parts_empty_tag_stays_empty() {
        let r = ImageRef::from_parts(None, "karolisr/bow", "").unwrap();
        assert_eq!(r.tag(), "");
        assert_eq!(r.canonical(), "index.docker.io/karolisr/bow");
    }
}

//! Route classification.
//!
//! # Responsibilities
//! - Resolve a request identifier against the page origin
//! - Map the resolved path onto one of the catalog route classes
//! - Report unresolvable identifiers and treat them as non-target

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::constants::route;
use crate::observability::{DiagnosticEvent, Diagnostics};
use crate::routing::matcher::{HyphenatedIdMatcher, Matcher, PathPrefixMatcher};

/// Catalog endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    UserLocation,
    ReleaseLatest,
    ReleaseRandom,
    ReleaseOther,
    VideoEpisode,
    NonTarget,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::UserLocation => "user_location",
            RouteClass::ReleaseLatest => "release_latest",
            RouteClass::ReleaseRandom => "release_random",
            RouteClass::ReleaseOther => "release_other",
            RouteClass::VideoEpisode => "video_episode",
            RouteClass::NonTarget => "non_target",
        }
    }

    pub fn is_target(&self) -> bool {
        *self != RouteClass::NonTarget
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifier could not be resolved against the origin.
#[derive(Debug, Error)]
#[error("cannot resolve '{url}' against origin: {source}")]
pub struct ClassifyError {
    url: String,
    #[source]
    source: url::ParseError,
}

/// Ordered, immutable set of path rules for the catalog API.
pub struct RouteClassifier {
    origin: Url,
    rules: Vec<(Box<dyn Matcher>, RouteClass)>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl fmt::Debug for RouteClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteClassifier")
            .field("origin", &self.origin.as_str())
            .field("rules", &self.rules)
            .finish()
    }
}

impl RouteClassifier {
    /// Build the catalog rule table for the given page origin.
    pub fn new(origin: Url, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let rules: Vec<(Box<dyn Matcher>, RouteClass)> = vec![
            (Box::new(PathPrefixMatcher::new(route::USER_LOCATION)), RouteClass::UserLocation),
            (Box::new(PathPrefixMatcher::new(route::RELEASES_LATEST)), RouteClass::ReleaseLatest),
            (Box::new(PathPrefixMatcher::new(route::RELEASES_RANDOM)), RouteClass::ReleaseRandom),
            (Box::new(HyphenatedIdMatcher::new(route::EPISODES, 5)), RouteClass::VideoEpisode),
            (Box::new(PathPrefixMatcher::new(route::RELEASES)), RouteClass::ReleaseOther),
        ];

        Self {
            origin,
            rules,
            diagnostics,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve an identifier the way a page would: relative to its origin.
    pub fn resolve(&self, url: &str) -> Result<Url, ClassifyError> {
        self.origin.join(url).map_err(|source| ClassifyError {
            url: url.to_string(),
            source,
        })
    }

    /// Classify by path. Never fails; unresolvable identifiers are
    /// reported and treated as `NonTarget`.
    pub fn classify(&self, url: &str) -> RouteClass {
        if url.is_empty() {
            return RouteClass::NonTarget;
        }
        match self.resolve(url) {
            Ok(resolved) => self.classify_path(resolved.path()),
            Err(e) => {
                self.diagnostics.error(DiagnosticEvent::ClassificationFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                RouteClass::NonTarget
            }
        }
    }

    /// Classify an already-resolved path. First match wins.
    pub fn classify_path(&self, path: &str) -> RouteClass {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(path))
            .map(|(_, class)| *class)
            .unwrap_or(RouteClass::NonTarget)
    }
}

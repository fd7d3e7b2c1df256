use crate::domain::entities::process::ProcessSample;

/// Tokens that mark a process as a helper spawned by an application bundle.
pub const DEFAULT_HELPER_TOKENS: &[&str] = &[
    "helper",
    "renderer",
    "plugin",
    "gpu",
    "utility",
    "webcontent",
    "networking",
];

/// Directory fragments under which application bundles are recognised.
pub const DEFAULT_APP_DIRS: &[&str] = &[
    "/Applications/",
    "~/Applications/",
    "/System/Applications/",
];

const BUNDLE_SUFFIX: &str = ".app";

/// Recognises helper/renderer/plugin processes living inside an app bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMatcher {
    app_dirs: Vec<String>,
    helper_tokens: Vec<String>,
}

impl Default for BundleMatcher {
    fn default() -> Self {
        Self::new(
            DEFAULT_APP_DIRS.iter().map(ToString::to_string).collect(),
            DEFAULT_HELPER_TOKENS.iter().map(ToString::to_string).collect(),
        )
    }
}

impl BundleMatcher {
    #[must_use]
    pub fn new(app_dirs: Vec<String>, helper_tokens: Vec<String>) -> Self {
        Self {
            app_dirs,
            helper_tokens: helper_tokens.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Group membership: helper naming inside a recognised bundle directory.
    #[must_use]
    pub fn is_helper(&self, sample: &ProcessSample) -> bool {
        let identity = sample.identity.as_str();
        let lowered = identity.to_lowercase();
        let in_app_dir = self.app_dirs.iter().any(|dir| identity.contains(dir.as_str()));
        let helper_named = self
            .helper_tokens
            .iter()
            .any(|token| lowered.contains(token.as_str()));
        in_app_dir && helper_named && outer_bundle_name(identity).is_some()
    }

    /// Logical owner of a helper: the outermost `.app` bundle name.
    #[must_use]
    pub fn owner(&self, sample: &ProcessSample) -> String {
        outer_bundle_name(&sample.identity)
            .map_or_else(|| sample.executable_name().to_string(), ToString::to_string)
    }
}

/// Name of the first `*.app` path component, without the extension.
///
/// `/Applications/Slack.app/Contents/Frameworks/Slack Helper.app/...` gives `Slack`.
#[must_use]
pub fn outer_bundle_name(identity: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = identity[search_from..].find(BUNDLE_SUFFIX) {
        let end = search_from + offset;
        let after = end + BUNDLE_SUFFIX.len();
        let terminated = identity[after..]
            .chars()
            .next()
            .map_or(true, |c| c == '/' || c.is_whitespace());
        if terminated {
            let start = identity[..end].rfind('/').map_or(0, |i| i + 1);
            let name = &identity[start..end];
            if !name.is_empty() {
                return Some(name);
            }
        }
        search_from = after;
    }
    None
}

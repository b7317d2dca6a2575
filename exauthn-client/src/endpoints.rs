use url::{ParseError, Url};

/// Where the begin and finish requests of a registration are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEndpoints {
    begin: Url,
    finish: Url,
}

impl RegistrationEndpoints {
    /// Path of the begin endpoint used by [`RegistrationEndpoints::with_default_paths`].
    pub const DEFAULT_BEGIN_PATH: &'static str = "/begin_registration";

    /// Path of the finish endpoint used by [`RegistrationEndpoints::with_default_paths`].
    pub const DEFAULT_FINISH_PATH: &'static str = "/finish_registration";

    /// Resolve `begin` and `finish` against `base`, the way a browser resolves a link.
    ///
    /// Absolute paths replace the path of `base`, relative ones are appended to its last
    /// directory, and full URLs ignore `base` entirely.
    pub fn new(base: &Url, begin: &str, finish: &str) -> Result<Self, ParseError> {
        Ok(Self {
            begin: base.join(begin)?,
            finish: base.join(finish)?,
        })
    }

    /// The endpoints at [`Self::DEFAULT_BEGIN_PATH`] and [`Self::DEFAULT_FINISH_PATH`] of `base`.
    pub fn with_default_paths(base: &Url) -> Result<Self, ParseError> {
        Self::new(base, Self::DEFAULT_BEGIN_PATH, Self::DEFAULT_FINISH_PATH)
    }

    /// Use two already resolved URLs.
    pub fn from_urls(begin: Url, finish: Url) -> Self {
        Self { begin, finish }
    }

    /// The URL receiving the begin registration request.
    pub fn begin(&self) -> &Url {
        &self.begin
    }

    /// The URL receiving the finish registration request.
    pub fn finish(&self) -> &Url {
        &self.finish
    }
}

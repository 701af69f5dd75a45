use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Platform details needed to lay out generated and compiled files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Path separator used when composing target paths.
    pub file_sep: String,
    /// Extension (including the dot) of a compiled loadable module.
    pub dynlib_ext: String,
}

impl Platform {
    pub fn new(file_sep: impl Into<String>, dynlib_ext: impl Into<String>) -> Self {
        Self {
            file_sep: file_sep.into(),
            dynlib_ext: dynlib_ext.into(),
        }
    }

    /// The platform this process runs on.
    pub fn host() -> Self {
        Self::new(MAIN_SEPARATOR_STR, std::env::consts::DLL_SUFFIX)
    }

    /// Join `base` with one or more relative segments using `file_sep`.
    ///
    /// Segments may themselves contain `/`, which is rewritten to the
    /// platform separator so layout settings stay portable.
    pub fn join<'a>(&self, base: &Path, segments: impl IntoIterator<Item = &'a str>) -> PathBuf {
        let mut out = base.to_string_lossy().into_owned();
        for segment in segments
            .into_iter()
            .flat_map(|s| s.split('/'))
            .filter(|s| !s.is_empty())
        {
            if !out.is_empty() && !out.ends_with(self.file_sep.as_str()) {
                out.push_str(&self.file_sep);
            }
            out.push_str(segment);
        }
        PathBuf::from(out)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_uses_separator() {
        let platform = Platform::new("/", ".so");
        let path = platform.join(Path::new("/pkg"), ["inst/include", "pkg.hpp"]);
        assert_eq!(path, PathBuf::from("/pkg/inst/include/pkg.hpp"));
    }

    #[test]
    fn test_join_does_not_double_separator() {
        let platform = Platform::new("/", ".so");
        let path = platform.join(Path::new("/tmp/"), ["a"]);
        assert_eq!(path, PathBuf::from("/tmp/a"));
    }

    #[test]
    fn test_join_with_foreign_separator() {
        let platform = Platform::new("\\", ".dll");
        let path = platform.join(Path::new("C:\\pkg"), ["src", "BridgeExports.cpp"]);
        assert_eq!(path, PathBuf::from("C:\\pkg\\src\\BridgeExports.cpp"));
    }

    #[test]
    fn test_host_has_dynlib_ext() {
        assert!(Platform::host().dynlib_ext.starts_with('.'));
    }
}

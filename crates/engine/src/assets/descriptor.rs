use super::types::{AssetError, AssetKind};

/// A validated request for the asset at `path`, to be loaded as `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetDescriptor {
    path: String,
    kind: AssetKind,
}

impl AssetDescriptor {
    /// Rejects blank paths and paths whose extension does not match `kind`.
    /// Comparison ignores ASCII case; a path without extension is accepted.
    pub fn new(path: &str, kind: AssetKind) -> Result<Self, AssetError> {
        if path.trim().is_empty() {
            return Err(AssetError::EmptyPath);
        }

        let found = file_extension(path);
        let expected = kind.extension();
        if !found.trim().is_empty() && !found.eq_ignore_ascii_case(expected) {
            return Err(AssetError::ExtensionMismatch {
                path: path.to_string(),
                expected,
                found: found.to_string(),
            });
        }

        Ok(Self {
            path: path.to_string(),
            kind,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }
}

/// Text after the last `.` of the final path component, or `""`.
pub(crate) fn file_extension(path: &str) -> &str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(dot) => &file_name[dot + 1..],
        None => "",
    }
}

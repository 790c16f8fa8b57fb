use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::types::{AssetError, AssetKind};

/// UI skin resources keyed by style type, then by resource name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Skin {
    resources: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Skin {
    pub fn resource(&self, style_type: &str, name: &str) -> Option<&Value> {
        self.resources.get(style_type)?.get(name)
    }

    pub fn style_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn resource_names(&self, style_type: &str) -> impl Iterator<Item = &str> {
        self.resources
            .get(style_type)
            .into_iter()
            .flat_map(|by_name| by_name.keys().map(String::as_str))
    }
}

pub(crate) fn load_skin(path: &Path) -> Result<Skin, AssetError> {
    let raw = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str::<Skin>(&raw).map_err(|error| AssetError::Decode {
        path: path.to_path_buf(),
        kind: AssetKind::Skin,
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn loads_styles_by_type_and_name() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("uiskin.json");
        let raw = json!({
            "Color": { "white": { "r": 1, "g": 1, "b": 1, "a": 1 } },
            "LabelStyle": {
                "default": { "font": "default-font", "fontColor": "white" },
                "title": { "font": "title-font" }
            }
        });
        fs::write(&path, raw.to_string()).expect("write");

        let skin = load_skin(&path).expect("load");
        assert_eq!(skin.style_types().collect::<Vec<_>>(), ["Color", "LabelStyle"]);
        assert_eq!(
            skin.resource("LabelStyle", "default"),
            Some(&json!({ "font": "default-font", "fontColor": "white" }))
        );
        assert_eq!(
            skin.resource_names("LabelStyle").collect::<Vec<_>>(),
            ["default", "title"]
        );
        assert!(skin.resource("LabelStyle", "missing").is_none());
        assert_eq!(skin.resource_names("Missing").count(), 0);
    }

    #[test]
    fn non_object_styles_fail_to_decode() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("bad.json");
        fs::write(&path, r#"{ "LabelStyle": [1, 2] }"#).expect("write");
        let error = load_skin(&path).expect_err("bad skin");
        assert!(matches!(
            error,
            AssetError::Decode {
                kind: AssetKind::Skin,
                ..
            }
        ));
    }
}

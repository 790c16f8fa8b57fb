use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use super::types::{AssetError, AssetKind};

#[derive(Debug, Clone, PartialEq)]
pub struct TiledMap {
    pub orientation: String,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: Vec<TilesetRef>,
    pub layers: Vec<TileLayer>,
    pub object_groups: Vec<ObjectGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetRef {
    pub first_gid: u32,
    pub name: Option<String>,
    /// External `.tsx` file, relative to the map.
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major global tile ids, 0 meaning empty.
    pub gids: Vec<u32>,
}

impl TileLayer {
    pub fn gid_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.gids.get((y * self.width + x) as usize).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TiledMap {
    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn object_group(&self, name: &str) -> Option<&ObjectGroup> {
        self.object_groups.iter().find(|group| group.name == name)
    }

    /// First object with the given name across all object groups.
    pub fn find_object(&self, name: &str) -> Option<&MapObject> {
        self.object_groups
            .iter()
            .flat_map(|group| group.objects.iter())
            .find(|object| object.name == name)
    }
}

pub(crate) fn load_tiled_map(path: &Path) -> Result<TiledMap, AssetError> {
    let raw = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tiled_map(&raw).map_err(|message| AssetError::Decode {
        path: path.to_path_buf(),
        kind: AssetKind::TiledMap,
        message,
    })
}

fn parse_tiled_map(raw: &str) -> Result<TiledMap, String> {
    let doc = Document::parse(raw).map_err(|error| format!("invalid xml: {error}"))?;
    let root = doc.root_element();
    if root.tag_name().name() != "map" {
        return Err(format!(
            "expected root <map>, found <{}>",
            root.tag_name().name()
        ));
    }

    let mut map = TiledMap {
        orientation: root
            .attribute("orientation")
            .unwrap_or("orthogonal")
            .to_string(),
        width: required_u32(root, "width")?,
        height: required_u32(root, "height")?,
        tile_width: required_u32(root, "tilewidth")?,
        tile_height: required_u32(root, "tileheight")?,
        tilesets: Vec::new(),
        layers: Vec::new(),
        object_groups: Vec::new(),
    };

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "tileset" => map.tilesets.push(TilesetRef {
                first_gid: required_u32(child, "firstgid")?,
                name: child.attribute("name").map(ToString::to_string),
                source: child.attribute("source").map(ToString::to_string),
            }),
            "layer" => map.layers.push(parse_layer(child)?),
            "objectgroup" => map.object_groups.push(parse_object_group(child)?),
            _ => {}
        }
    }

    Ok(map)
}

fn parse_layer(node: Node<'_, '_>) -> Result<TileLayer, String> {
    let name = node.attribute("name").unwrap_or_default().to_string();
    let width = required_u32(node, "width")?;
    let height = required_u32(node, "height")?;
    let data = node
        .children()
        .find(|child| child.has_tag_name("data"))
        .ok_or_else(|| format!("layer '{name}' has no <data>"))?;

    let gids = match data.attribute("encoding") {
        Some("csv") => parse_csv_gids(data.text().unwrap_or_default())
            .map_err(|error| format!("layer '{name}': {error}"))?,
        None => data
            .children()
            .filter(|child| child.has_tag_name("tile"))
            .map(|tile| optional_u32(tile, "gid").map(Option::unwrap_or_default))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(format!("layer '{name}': unsupported encoding '{other}'"));
        }
    };

    let expected = width as usize * height as usize;
    if gids.len() != expected {
        return Err(format!(
            "layer '{name}': expected {expected} tiles, found {}",
            gids.len()
        ));
    }

    Ok(TileLayer {
        name,
        width,
        height,
        gids,
    })
}

fn parse_csv_gids(text: &str) -> Result<Vec<u32>, String> {
    text.split(',')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            cell.parse::<u32>()
                .map_err(|_| format!("invalid tile id '{cell}'"))
        })
        .collect()
}

fn parse_object_group(node: Node<'_, '_>) -> Result<ObjectGroup, String> {
    let mut objects = Vec::new();
    for object in node.children().filter(|child| child.has_tag_name("object")) {
        objects.push(MapObject {
            id: required_u32(object, "id")?,
            name: object.attribute("name").unwrap_or_default().to_string(),
            class: object
                .attribute("class")
                .or_else(|| object.attribute("type"))
                .unwrap_or_default()
                .to_string(),
            x: optional_f32(object, "x")?.unwrap_or_default(),
            y: optional_f32(object, "y")?.unwrap_or_default(),
            width: optional_f32(object, "width")?.unwrap_or_default(),
            height: optional_f32(object, "height")?.unwrap_or_default(),
        });
    }
    Ok(ObjectGroup {
        name: node.attribute("name").unwrap_or_default().to_string(),
        objects,
    })
}

fn required_u32(node: Node<'_, '_>, attribute: &str) -> Result<u32, String> {
    optional_u32(node, attribute)?.ok_or_else(|| {
        format!(
            "<{}> is missing attribute '{attribute}'",
            node.tag_name().name()
        )
    })
}

fn optional_u32(node: Node<'_, '_>, attribute: &str) -> Result<Option<u32>, String> {
    node.attribute(attribute)
        .map(|value| {
            value.trim().parse::<u32>().map_err(|_| {
                format!(
                    "<{}> attribute '{attribute}' is not an unsigned integer: '{value}'",
                    node.tag_name().name()
                )
            })
        })
        .transpose()
}

fn optional_f32(node: Node<'_, '_>, attribute: &str) -> Result<Option<f32>, String> {
    node.attribute(attribute)
        .map(|value| {
            value.trim().parse::<f32>().map_err(|_| {
                format!(
                    "<{}> attribute '{attribute}' is not a number: '{value}'",
                    node.tag_name().name()
                )
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const TOWN_TMX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" width="3" height="2" tilewidth="16" tileheight="16">
 <tileset firstgid="1" source="terrain.tsx"/>
 <layer id="1" name="ground" width="3" height="2">
  <data encoding="csv">
1,2,3,
4,0,6
</data>
 </layer>
 <objectgroup id="2" name="spawns">
  <object id="7" name="player" type="spawn" x="16" y="8.5"/>
 </objectgroup>
</map>"#;

    #[test]
    fn parses_csv_layers_tilesets_and_objects() {
        let map = parse_tiled_map(TOWN_TMX).expect("parse");
        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!((map.tile_width, map.tile_height), (16, 16));
        assert_eq!(map.tilesets[0].first_gid, 1);
        assert_eq!(map.tilesets[0].source.as_deref(), Some("terrain.tsx"));

        let ground = map.layer("ground").expect("ground");
        assert_eq!(ground.gids, vec![1, 2, 3, 4, 0, 6]);
        assert_eq!(ground.gid_at(2, 1), Some(6));
        assert_eq!(ground.gid_at(3, 0), None);

        let spawn = map.find_object("player").expect("player spawn");
        assert_eq!(spawn.class, "spawn");
        assert_eq!((spawn.x, spawn.y), (16.0, 8.5));
        assert_eq!(map.object_group("spawns").expect("group").objects.len(), 1);
    }

    #[test]
    fn parses_xml_tile_elements() {
        let raw = r#"<map width="2" height="1" tilewidth="8" tileheight="8">
<layer name="l" width="2" height="1"><data><tile gid="5"/><tile/></data></layer></map>"#;
        let map = parse_tiled_map(raw).expect("parse");
        assert_eq!(map.layers[0].gids, vec![5, 0]);
        assert_eq!(map.orientation, "orthogonal");
    }

    #[test]
    fn rejects_wrong_root_and_bad_layers() {
        assert!(parse_tiled_map("<tileset/>").is_err());
        assert!(parse_tiled_map("not xml").is_err());

        let short = r#"<map width="2" height="2" tilewidth="8" tileheight="8">
<layer name="l" width="2" height="2"><data encoding="csv">1,2,3</data></layer></map>"#;
        let error = parse_tiled_map(short).expect_err("short layer");
        assert!(error.contains("expected 4 tiles"), "{error}");

        let base64 = r#"<map width="1" height="1" tilewidth="8" tileheight="8">
<layer name="l" width="1" height="1"><data encoding="base64">AQAAAA==</data></layer></map>"#;
        let error = parse_tiled_map(base64).expect_err("base64");
        assert!(error.contains("unsupported encoding"), "{error}");
    }

    #[test]
    fn missing_dimension_is_reported() {
        let error = parse_tiled_map(r#"<map height="1" tilewidth="8" tileheight="8"/>"#)
            .expect_err("missing width");
        assert!(error.contains("'width'"), "{error}");
    }

    #[test]
    fn load_reports_path_on_decode_failure() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("broken.tmx");
        fs::write(&path, "<map/>").expect("write");
        let error = load_tiled_map(&path).expect_err("broken");
        let AssetError::Decode {
            path: error_path,
            kind,
            ..
        } = error
        else {
            panic!("expected decode error");
        };
        assert_eq!(error_path, path);
        assert_eq!(kind, AssetKind::TiledMap);
    }
}

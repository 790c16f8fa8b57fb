use std::fs;
use std::path::Path;

use super::types::{AssetError, AssetKind};

/// Packed texture atlas description in the libGDX text format. Page images
/// are referenced by file name and are not loaded with the atlas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureAtlas {
    pub pages: Vec<AtlasPage>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtlasPage {
    pub texture_file: String,
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
    pub min_filter: Option<String>,
    pub mag_filter: Option<String>,
    pub repeat: Option<String>,
    pub regions: Vec<AtlasRegion>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtlasRegion {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// -1 when the region is not part of an indexed sequence.
    pub index: i32,
    pub rotate: bool,
}

impl TextureAtlas {
    pub fn regions(&self) -> impl Iterator<Item = &AtlasRegion> {
        self.pages.iter().flat_map(|page| page.regions.iter())
    }

    pub fn find_region(&self, name: &str) -> Option<&AtlasRegion> {
        self.regions().find(|region| region.name == name)
    }
}

pub(crate) fn load_texture_atlas(path: &Path) -> Result<TextureAtlas, AssetError> {
    let raw = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_texture_atlas(&raw).map_err(|message| AssetError::Decode {
        path: path.to_path_buf(),
        kind: AssetKind::TextureAtlas,
        message,
    })
}

/// Blank lines separate pages. Within a page the first line names the image,
/// `key: value` lines right after it are page fields, and every further line
/// without `:` opens a region whose fields follow it.
fn parse_texture_atlas(raw: &str) -> Result<TextureAtlas, String> {
    let mut atlas = TextureAtlas::default();
    let mut page: Option<AtlasPage> = None;

    for (line_idx, raw_line) in raw.lines().enumerate() {
        let line_number = line_idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            if let Some(done) = page.take() {
                atlas.pages.push(done);
            }
            continue;
        }

        if page.is_none() {
            page = Some(AtlasPage {
                texture_file: line.to_string(),
                ..AtlasPage::default()
            });
            continue;
        }
        let Some(current) = page.as_mut() else {
            continue;
        };

        match line.split_once(':') {
            None => current.regions.push(AtlasRegion {
                name: line.to_string(),
                index: -1,
                ..AtlasRegion::default()
            }),
            Some((key, value)) => {
                let key = key.trim();
                let value = value.trim();
                let applied = match current.regions.last_mut() {
                    Some(region) => apply_region_field(region, key, value),
                    None => apply_page_field(current, key, value),
                };
                applied.map_err(|error| format!("line {line_number}: {error}"))?;
            }
        }
    }

    if let Some(done) = page.take() {
        atlas.pages.push(done);
    }
    Ok(atlas)
}

fn apply_page_field(page: &mut AtlasPage, key: &str, value: &str) -> Result<(), String> {
    match key {
        "size" => {
            let [width, height] = parse_tuple::<u32, 2>(key, value)?;
            page.width = width;
            page.height = height;
        }
        "format" => page.format = Some(value.to_string()),
        "filter" => {
            let (min, mag) = value
                .split_once(',')
                .ok_or_else(|| format!("filter expects two values, got '{value}'"))?;
            page.min_filter = Some(min.trim().to_string());
            page.mag_filter = Some(mag.trim().to_string());
        }
        "repeat" => page.repeat = Some(value.to_string()),
        _ => {}
    }
    Ok(())
}

fn apply_region_field(region: &mut AtlasRegion, key: &str, value: &str) -> Result<(), String> {
    match key {
        "xy" => {
            let [x, y] = parse_tuple::<u32, 2>(key, value)?;
            region.x = x;
            region.y = y;
        }
        "size" => {
            let [width, height] = parse_tuple::<u32, 2>(key, value)?;
            region.width = width;
            region.height = height;
        }
        "bounds" => {
            let [x, y, width, height] = parse_tuple::<u32, 4>(key, value)?;
            region.x = x;
            region.y = y;
            region.width = width;
            region.height = height;
        }
        "orig" => {
            let [width, height] = parse_tuple::<u32, 2>(key, value)?;
            region.original_width = width;
            region.original_height = height;
        }
        "offset" => {
            let [x, y] = parse_tuple::<i32, 2>(key, value)?;
            region.offset_x = x;
            region.offset_y = y;
        }
        "offsets" => {
            let [x, y, width, height] = parse_tuple::<i32, 4>(key, value)?;
            region.offset_x = x;
            region.offset_y = y;
            region.original_width = width.max(0) as u32;
            region.original_height = height.max(0) as u32;
        }
        "index" => region.index = parse_tuple::<i32, 1>(key, value)?[0],
        "rotate" => region.rotate = value == "true" || value == "90",
        _ => {}
    }
    Ok(())
}

fn parse_tuple<T, const N: usize>(key: &str, value: &str) -> Result<[T; N], String>
where
    T: std::str::FromStr + Copy + Default,
{
    let mut out = [T::default(); N];
    let mut parts = value.split(',').map(str::trim);
    for slot in &mut out {
        let part = parts
            .next()
            .ok_or_else(|| format!("'{key}' expects {N} values, got '{value}'"))?;
        *slot = part
            .parse::<T>()
            .map_err(|_| format!("'{key}' has invalid number '{part}'"))?;
    }
    if parts.next().is_some() {
        return Err(format!("'{key}' expects {N} values, got '{value}'"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_ATLAS: &str = "
marty.png
size: 64, 32
format: RGBA8888
filter: Nearest, Nearest
repeat: none
walk_up
  rotate: false
  xy: 0, 0
  size: 16, 16
  orig: 16, 16
  offset: 0, 0
  index: 0
walk_down
  rotate: true
  xy: 16, 0
  size: 16, 16
  orig: 18, 18
  offset: 1, -1
  index: -1

items.png
size: 32, 32
potion
  xy: 8, 8
  size: 8, 8
";

    const MODERN_ATLAS: &str = "page.png
size:128,64
filter:Linear,Nearest
hero
bounds:4,8,20,24
offsets:1,2,22,26
";

    #[test]
    fn parses_legacy_format_with_multiple_pages() {
        let atlas = parse_texture_atlas(LEGACY_ATLAS).expect("parse");
        assert_eq!(atlas.pages.len(), 2);

        let page = &atlas.pages[0];
        assert_eq!(page.texture_file, "marty.png");
        assert_eq!((page.width, page.height), (64, 32));
        assert_eq!(page.format.as_deref(), Some("RGBA8888"));
        assert_eq!(page.min_filter.as_deref(), Some("Nearest"));
        assert_eq!(page.regions.len(), 2);

        let walk_down = atlas.find_region("walk_down").expect("walk_down");
        assert!(walk_down.rotate);
        assert_eq!((walk_down.x, walk_down.y), (16, 0));
        assert_eq!((walk_down.offset_x, walk_down.offset_y), (1, -1));
        assert_eq!(walk_down.original_width, 18);
        assert_eq!(walk_down.index, -1);

        let potion = atlas.find_region("potion").expect("potion");
        assert_eq!((potion.width, potion.height), (8, 8));
        assert_eq!(potion.index, -1);
        assert_eq!(atlas.regions().count(), 3);
    }

    #[test]
    fn parses_bounds_and_offsets_fields() {
        let atlas = parse_texture_atlas(MODERN_ATLAS).expect("parse");
        let hero = atlas.find_region("hero").expect("hero");
        assert_eq!((hero.x, hero.y, hero.width, hero.height), (4, 8, 20, 24));
        assert_eq!((hero.offset_x, hero.offset_y), (1, 2));
        assert_eq!((hero.original_width, hero.original_height), (22, 26));
        assert_eq!(atlas.pages[0].mag_filter.as_deref(), Some("Nearest"));
    }

    #[test]
    fn malformed_numbers_report_line() {
        let error = parse_texture_atlas("p.png\nsize: 4, x\n").expect_err("bad size");
        assert!(error.starts_with("line 2:"), "{error}");

        let error = parse_texture_atlas("p.png\nr\nxy: 1, 2, 3\n").expect_err("bad xy");
        assert!(error.contains("expects 2 values"), "{error}");
    }

    #[test]
    fn empty_input_is_an_empty_atlas() {
        let atlas = parse_texture_atlas("\n\n").expect("parse");
        assert!(atlas.pages.is_empty());
        assert!(atlas.find_region("anything").is_none());
    }
}

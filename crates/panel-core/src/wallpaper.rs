use serde::{Deserialize, Serialize};

use crate::{error::PanelError, types::ListEntry};

/// Fill color given to pattern wallpapers opened without an explicit color.
pub const DEFAULT_PATTERN_COLOR: u32 = 0x00d6_e2ee;
/// Pattern intensity paired with [`DEFAULT_PATTERN_COLOR`].
pub const DEFAULT_PATTERN_INTENSITY: i32 = 50;

const PATTERN_MIME_TYPES: [&str; 3] = ["image/png", "image/svg+xml", "application/x-tgwallpattern"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallpaperFile {
    pub media_id: i64,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl WallpaperFile {
    /// Patterns are tinted with a fill color instead of shown as-is.
    pub fn is_pattern(&self) -> bool {
        PATTERN_MIME_TYPES.contains(&self.mime_type.as_str())
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.ends_with(".svgbg"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallpaperSettings {
    pub colors: Vec<u32>,
    pub intensity: Option<i32>,
    pub rotation: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Wallpaper {
    Color(u32),
    File {
        id: i64,
        slug: String,
        file: WallpaperFile,
        is_pattern: bool,
        settings: WallpaperSettings,
    },
}

/// Presentation toggles offered in the gallery.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallpaperOptions {
    pub blur: bool,
    pub motion: bool,
}

/// Colors and pattern parameters requested by a link or preview.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorOverrides {
    pub first_color: Option<u32>,
    pub second_color: Option<u32>,
    pub intensity: Option<i32>,
    pub rotation: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WallpaperListKind {
    Wallpapers(Option<WallpaperOptions>),
    Colors,
}

/// Where a wallpaper gallery was opened from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WallpaperSource {
    /// Browsing a list, starting at `central`.
    List {
        wallpapers: Vec<Wallpaper>,
        central: Wallpaper,
        kind: WallpaperListKind,
    },
    /// A single known wallpaper, e.g. from a message preview.
    Wallpaper {
        wallpaper: Wallpaper,
        options: Option<WallpaperOptions>,
        overrides: ColorOverrides,
        message_id: Option<i64>,
    },
    /// A wallpaper link; `file` is `None` until the slug is resolved.
    Slug {
        slug: String,
        file: Option<WallpaperFile>,
        options: Option<WallpaperOptions>,
        overrides: ColorOverrides,
        message_id: Option<i64>,
    },
    /// A photo from the device library.
    Asset { local_id: String },
    /// An inline bot result.
    ContextResult { result_id: String },
    /// The color picker; black when no color is given.
    CustomColor(Option<u32>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WallpaperGalleryEntry {
    Wallpaper {
        wallpaper: Wallpaper,
        message_id: Option<i64>,
    },
    Asset {
        local_id: String,
    },
    ContextResult {
        result_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WallpaperEntryId {
    Color(u32),
    File(String),
    Asset(String),
    ContextResult(String),
}

impl ListEntry for WallpaperGalleryEntry {
    type Id = WallpaperEntryId;

    fn stable_id(&self) -> WallpaperEntryId {
        match self {
            Self::Wallpaper {
                wallpaper: Wallpaper::Color(color),
                ..
            } => WallpaperEntryId::Color(*color),
            Self::Wallpaper {
                wallpaper: Wallpaper::File { slug, .. },
                ..
            } => WallpaperEntryId::File(slug.clone()),
            Self::Asset { local_id } => WallpaperEntryId::Asset(local_id.clone()),
            Self::ContextResult { result_id } => WallpaperEntryId::ContextResult(result_id.clone()),
        }
    }
}

/// Entries a gallery opens with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallpaperGallery {
    pub entries: Vec<WallpaperGalleryEntry>,
    /// `None` only when there is nothing to show yet.
    pub central_index: Option<usize>,
    pub initial_options: Option<WallpaperOptions>,
}

impl WallpaperGallery {
    pub fn central(&self) -> Option<&WallpaperGalleryEntry> {
        self.entries.get(self.central_index?)
    }

    fn single(entry: WallpaperGalleryEntry, initial_options: Option<WallpaperOptions>) -> Self {
        Self {
            entries: vec![entry],
            central_index: Some(0),
            initial_options,
        }
    }
}

/// Resolve a gallery source into its entries and starting position.
///
/// A list whose central wallpaper is not part of it is rejected.
pub fn gallery_for_source(source: WallpaperSource) -> Result<WallpaperGallery, PanelError> {
    let gallery = match source {
        WallpaperSource::List {
            wallpapers,
            central,
            kind,
        } => {
            let central_index = wallpapers
                .iter()
                .position(|wallpaper| *wallpaper == central)
                .ok_or_else(PanelError::missing_central_wallpaper)?;
            let initial_options = match kind {
                WallpaperListKind::Wallpapers(options) => options,
                WallpaperListKind::Colors => None,
            };
            WallpaperGallery {
                entries: wallpapers
                    .into_iter()
                    .map(|wallpaper| WallpaperGalleryEntry::Wallpaper {
                        wallpaper,
                        message_id: None,
                    })
                    .collect(),
                central_index: Some(central_index),
                initial_options,
            }
        }
        WallpaperSource::Wallpaper {
            wallpaper,
            options,
            overrides,
            message_id,
        } => WallpaperGallery::single(
            WallpaperGalleryEntry::Wallpaper {
                wallpaper: with_overrides(wallpaper, overrides),
                message_id,
            },
            options,
        ),
        WallpaperSource::Slug {
            slug,
            file: Some(file),
            options,
            overrides,
            message_id,
        } => WallpaperGallery::single(
            WallpaperGalleryEntry::Wallpaper {
                wallpaper: file_wallpaper(0, slug, file, overrides),
                message_id,
            },
            options,
        ),
        WallpaperSource::Slug { file: None, .. } => WallpaperGallery::default(),
        WallpaperSource::Asset { local_id } => {
            WallpaperGallery::single(WallpaperGalleryEntry::Asset { local_id }, None)
        }
        WallpaperSource::ContextResult { result_id } => {
            WallpaperGallery::single(WallpaperGalleryEntry::ContextResult { result_id }, None)
        }
        WallpaperSource::CustomColor(color) => WallpaperGallery::single(
            WallpaperGalleryEntry::Wallpaper {
                wallpaper: Wallpaper::Color(color.unwrap_or(0)),
                message_id: None,
            },
            None,
        ),
    };
    Ok(gallery)
}

/// Re-derive a file wallpaper's settings from `overrides`; colors pass through.
pub fn with_overrides(wallpaper: Wallpaper, overrides: ColorOverrides) -> Wallpaper {
    match wallpaper {
        Wallpaper::File { id, slug, file, .. } => file_wallpaper(id, slug, file, overrides),
        color => color,
    }
}

fn file_wallpaper(id: i64, slug: String, file: WallpaperFile, overrides: ColorOverrides) -> Wallpaper {
    let is_pattern = file.is_pattern();
    let (first_color, intensity) = match overrides.first_color {
        Some(color) => (Some(color), overrides.intensity),
        None if is_pattern => (Some(DEFAULT_PATTERN_COLOR), Some(DEFAULT_PATTERN_INTENSITY)),
        None => (None, None),
    };
    let colors = first_color
        .into_iter()
        .chain(overrides.second_color)
        .collect();

    Wallpaper::File {
        id,
        slug,
        file,
        is_pattern,
        settings: WallpaperSettings {
            colors,
            intensity,
            rotation: overrides.rotation,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelErrorCategory;

    fn pattern_file() -> WallpaperFile {
        WallpaperFile {
            media_id: 11,
            mime_type: "application/x-tgwallpattern".into(),
            file_name: None,
        }
    }

    fn photo_file() -> WallpaperFile {
        WallpaperFile {
            media_id: 12,
            mime_type: "image/jpeg".into(),
            file_name: Some("beach.jpg".into()),
        }
    }

    fn file(slug: &str, file: WallpaperFile) -> Wallpaper {
        Wallpaper::File {
            id: 7,
            slug: slug.into(),
            is_pattern: file.is_pattern(),
            file,
            settings: WallpaperSettings::default(),
        }
    }

    #[test]
    fn detects_patterns_by_mime_type_or_extension() {
        assert!(pattern_file().is_pattern());
        assert!(!photo_file().is_pattern());

        let svg = WallpaperFile {
            mime_type: "application/octet-stream".into(),
            file_name: Some("dots.svgbg".into()),
            ..photo_file()
        };
        assert!(svg.is_pattern());
    }

    #[test]
    fn list_starts_at_central_wallpaper() {
        let options = WallpaperOptions {
            blur: false,
            motion: true,
        };
        let wallpapers = vec![
            Wallpaper::Color(0xff0000),
            file("beach", photo_file()),
            Wallpaper::Color(0x00ff00),
        ];

        let gallery = gallery_for_source(WallpaperSource::List {
            central: wallpapers[1].clone(),
            wallpapers,
            kind: WallpaperListKind::Wallpapers(Some(options)),
        })
        .expect("central wallpaper is in the list");

        assert_eq!(gallery.entries.len(), 3);
        assert_eq!(gallery.central_index, Some(1));
        assert_eq!(gallery.initial_options, Some(options));
        assert_eq!(
            gallery.central().map(ListEntry::stable_id),
            Some(WallpaperEntryId::File("beach".into()))
        );
    }

    #[test]
    fn color_list_has_no_initial_options() {
        let gallery = gallery_for_source(WallpaperSource::List {
            wallpapers: vec![Wallpaper::Color(1), Wallpaper::Color(2)],
            central: Wallpaper::Color(2),
            kind: WallpaperListKind::Colors,
        })
        .expect("central wallpaper is in the list");
        assert_eq!(gallery.central_index, Some(1));
        assert_eq!(gallery.initial_options, None);
    }

    #[test]
    fn rejects_list_without_its_central_wallpaper() {
        let err = gallery_for_source(WallpaperSource::List {
            wallpapers: vec![Wallpaper::Color(1)],
            central: Wallpaper::Color(2),
            kind: WallpaperListKind::Colors,
        })
        .expect_err("missing central wallpaper should fail");
        assert_eq!(err.category, PanelErrorCategory::InvalidInput);
        assert_eq!(err.code, "central_wallpaper_missing");
    }

    #[test]
    fn unresolved_slug_opens_empty() {
        let gallery = gallery_for_source(WallpaperSource::Slug {
            slug: "pending".into(),
            file: None,
            options: None,
            overrides: ColorOverrides::default(),
            message_id: None,
        })
        .expect("slug source never fails");
        assert!(gallery.entries.is_empty());
        assert_eq!(gallery.central_index, None);
        assert!(gallery.central().is_none());
    }

    #[test]
    fn resolved_pattern_slug_gets_default_fill() {
        let options = WallpaperOptions {
            blur: true,
            motion: false,
        };
        let gallery = gallery_for_source(WallpaperSource::Slug {
            slug: "dots".into(),
            file: Some(pattern_file()),
            options: Some(options),
            overrides: ColorOverrides {
                rotation: Some(45),
                ..ColorOverrides::default()
            },
            message_id: Some(99),
        })
        .expect("slug source never fails");

        assert_eq!(gallery.central_index, Some(0));
        assert_eq!(gallery.initial_options, Some(options));
        match &gallery.entries[0] {
            WallpaperGalleryEntry::Wallpaper {
                wallpaper:
                    Wallpaper::File {
                        id,
                        is_pattern,
                        settings,
                        ..
                    },
                message_id,
            } => {
                assert_eq!(*id, 0);
                assert!(*is_pattern);
                assert_eq!(settings.colors, vec![DEFAULT_PATTERN_COLOR]);
                assert_eq!(settings.intensity, Some(DEFAULT_PATTERN_INTENSITY));
                assert_eq!(settings.rotation, Some(45));
                assert_eq!(*message_id, Some(99));
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn explicit_colors_override_the_pattern_default() {
        let wallpaper = with_overrides(
            file("dots", pattern_file()),
            ColorOverrides {
                first_color: Some(0x112233),
                second_color: Some(0x445566),
                intensity: Some(30),
                rotation: None,
            },
        );
        match wallpaper {
            Wallpaper::File { id, settings, .. } => {
                assert_eq!(id, 7);
                assert_eq!(settings.colors, vec![0x112233, 0x445566]);
                assert_eq!(settings.intensity, Some(30));
            }
            other => panic!("unexpected wallpaper: {other:?}"),
        }
    }

    #[test]
    fn intensity_without_first_color_is_dropped_for_photos() {
        let wallpaper = with_overrides(
            file("beach", photo_file()),
            ColorOverrides {
                second_color: Some(0x445566),
                intensity: Some(30),
                ..ColorOverrides::default()
            },
        );
        match wallpaper {
            Wallpaper::File { settings, .. } => {
                assert_eq!(settings.colors, vec![0x445566]);
                assert_eq!(settings.intensity, None);
            }
            other => panic!("unexpected wallpaper: {other:?}"),
        }
    }

    #[test]
    fn single_sources_open_one_central_entry() {
        let color = gallery_for_source(WallpaperSource::CustomColor(None))
            .expect("color source never fails");
        assert_eq!(
            color.central(),
            Some(&WallpaperGalleryEntry::Wallpaper {
                wallpaper: Wallpaper::Color(0),
                message_id: None,
            })
        );

        let asset = gallery_for_source(WallpaperSource::Asset {
            local_id: "IMG_0001".into(),
        })
        .expect("asset source never fails");
        assert_eq!(asset.central_index, Some(0));
        assert_eq!(asset.initial_options, None);

        let shared = gallery_for_source(WallpaperSource::Wallpaper {
            wallpaper: Wallpaper::Color(0xabcdef),
            options: Some(WallpaperOptions::default()),
            overrides: ColorOverrides {
                first_color: Some(1),
                ..ColorOverrides::default()
            },
            message_id: Some(5),
        })
        .expect("wallpaper source never fails");
        assert_eq!(
            shared.central().map(ListEntry::stable_id),
            Some(WallpaperEntryId::Color(0xabcdef))
        );
        assert_eq!(shared.initial_options, Some(WallpaperOptions::default()));
    }
}

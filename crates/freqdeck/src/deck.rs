use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::theme;
use crate::trim::{TrimWindow, leading_number, parse_offset};

/// A presentation loaded from a YAML deck file.
#[derive(Debug, Clone, Deserialize)]
pub struct Deck {
    pub title: String,

    #[serde(default)]
    pub footer: Option<String>,

    /// Background track (WAV), relative to the deck file
    #[serde(default)]
    pub music: Option<PathBuf>,

    #[serde(default = "default_loop_music")]
    pub loop_music: bool,

    #[serde(default)]
    pub clip: Option<ClipSpec>,

    pub slides: Vec<SlideSpec>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideSpec {
    pub heading: String,

    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub body: Vec<String>,

    /// `#RRGGBB` background colour
    #[serde(default)]
    pub background: Option<String>,
}

/// Video clip shown on one slide, confined to a trim window.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipSpec {
    /// 1-indexed slide the clip belongs to
    pub slide: usize,

    #[serde(default)]
    pub poster: Option<PathBuf>,

    #[serde(default)]
    pub caption: Option<String>,

    /// Full clip length in seconds
    pub duration: f64,

    #[serde(default)]
    pub trim_start: Option<TrimValue>,

    #[serde(default)]
    pub trim_end: Option<TrimValue>,
}

/// A trim offset as written in the deck: a number, or text with a leading
/// number (`"2.5s"`). Anything else counts as zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TrimValue {
    Number(f64),
    Text(String),
}

impl TrimValue {
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Number(v) if v.is_finite() => *v,
            Self::Number(_) => 0.0,
            Self::Text(s) => parse_offset(Some(s)),
        }
    }

    /// True when the value is text without a usable leading number.
    fn is_malformed(&self) -> bool {
        match self {
            Self::Number(v) => !v.is_finite(),
            Self::Text(s) => leading_number(s).is_none(),
        }
    }
}

fn default_loop_music() -> bool {
    true
}

impl ClipSpec {
    pub fn trim_window(&self) -> TrimWindow {
        let seconds = |v: &Option<TrimValue>| v.as_ref().map_or(0.0, TrimValue::seconds);
        TrimWindow::new(seconds(&self.trim_start), seconds(&self.trim_end))
    }

    /// Zero-based slide index.
    pub fn slide_index(&self) -> usize {
        self.slide.saturating_sub(1)
    }
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("Deck not found: {}", path.display())
            } else {
                anyhow::anyhow!("Failed to read deck {}: {e}", path.display())
            }
        })?;
        let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::from_yaml(&content, base_dir)
            .with_context(|| format!("Invalid deck {}", path.display()))
    }

    pub fn from_yaml(content: &str, base_dir: PathBuf) -> Result<Self> {
        let mut deck: Deck = serde_yaml::from_str(content)?;
        deck.base_dir = base_dir;

        if deck.slides.is_empty() {
            anyhow::bail!("No slides found");
        }
        if let Some(clip) = &deck.clip {
            if clip.slide == 0 || clip.slide > deck.slides.len() {
                anyhow::bail!(
                    "Clip slide {} is out of range (deck has {} slides)",
                    clip.slide,
                    deck.slides.len()
                );
            }
            if !(clip.duration.is_finite() && clip.duration > 0.0) {
                anyhow::bail!("Clip duration must be a positive number of seconds");
            }
        }
        Ok(deck)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn music_path(&self) -> Option<PathBuf> {
        self.music.as_deref().map(|p| self.resolve(p))
    }

    pub fn poster_path(&self) -> Option<PathBuf> {
        self.clip
            .as_ref()
            .and_then(|c| c.poster.as_deref())
            .map(|p| self.resolve(p))
    }

    /// Problems that do not stop the deck from running but are worth reporting.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(music) = self.music_path() {
            if !music.exists() {
                warnings.push(format!("Music file not found: {}", music.display()));
            }
        } else {
            warnings.push("No music configured; the deck will play silently".to_string());
        }

        for (i, slide) in self.slides.iter().enumerate() {
            if let Some(bg) = &slide.background {
                if theme::parse_hex_color(bg).is_none() {
                    warnings.push(format!(
                        "Slide {}: invalid background colour '{bg}', using theme default",
                        i + 1
                    ));
                }
            }
        }

        if let Some(clip) = &self.clip {
            if let Some(poster) = self.poster_path() {
                if !poster.exists() {
                    warnings.push(format!("Clip poster not found: {}", poster.display()));
                }
            }
            for (name, value) in [("trim_start", &clip.trim_start), ("trim_end", &clip.trim_end)] {
                if value.as_ref().is_some_and(TrimValue::is_malformed) {
                    warnings.push(format!("Clip {name} is not a number, using 0"));
                }
            }
            let window = clip.trim_window();
            if window.stop_point(clip.duration) <= window.start {
                warnings.push(format!(
                    "Clip trim window [{}, {}) is empty",
                    window.start,
                    window.stop_point(clip.duration)
                ));
            }
        }

        warnings
    }
}

use std::fmt;
use std::path::Path;

use anyhow::{Result, anyhow};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Subtitle parsing and serialization

// @const: SRT/VTT timing line ("00:00:01,000 --> 00:00:04,000")
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}[,.]\d{3}\s+-->\s+\d{2}:\d{2}:\d{2}[,.]\d{3}").unwrap()
});

// @const: LRC time tags at the start of a line ("[00:12.34][00:15.00]")
static LRC_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\[\d{1,3}:\d{2}(?:\.\d{1,3})?\])+").unwrap()
});

/// Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Lrc,
}

impl SubtitleFormat {
    /// Extensions the discovery step looks for
    pub const EXTENSIONS: [&'static str; 3] = ["srt", "vtt", "lrc"];

    /// Determine the format from a file path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "lrc" => Ok(Self::Lrc),
            _ => Err(anyhow!("Unsupported subtitle format: {:?}", path.as_ref())),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Srt => write!(f, "srt"),
            Self::Vtt => write!(f, "vtt"),
            Self::Lrc => write!(f, "lrc"),
        }
    }
}

/// Tag distinguishing translatable dialogue from structural entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionKind {
    /// A timed dialogue line whose text may be translated
    Dialogue,
    /// Headers, notes, styles, metadata tags, passed through untouched
    Meta,
}

/// One entry in a subtitle file.
///
/// `index` is the position in the parsed sequence and stays stable for the
/// whole run; the pipeline uses it to merge batch results back in order.
/// `timing` holds the raw timing block (for VTT this includes an optional cue
/// identifier line) so serialization reproduces the file structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    // @field: Position in the parsed sequence
    pub index: usize,

    // @field: Dialogue or structural entry
    pub kind: CaptionKind,

    // @field: Raw timing block / metadata line
    pub timing: String,

    // @field: Caption text
    pub text: String,
}

impl Caption {
    pub fn dialogue(index: usize, timing: &str, text: &str) -> Self {
        Caption {
            index,
            kind: CaptionKind::Dialogue,
            timing: timing.to_string(),
            text: text.to_string(),
        }
    }

    pub fn meta(index: usize, text: &str) -> Self {
        Caption {
            index,
            kind: CaptionKind::Meta,
            timing: String::new(),
            text: text.to_string(),
        }
    }
}

/// Parse subtitle file content into an ordered caption sequence
pub fn parse(content: &str, format: SubtitleFormat) -> Result<Vec<Caption>> {
    let captions = match format {
        SubtitleFormat::Srt => parse_srt(content),
        SubtitleFormat::Vtt => parse_vtt(content),
        SubtitleFormat::Lrc => parse_lrc(content),
    };

    if captions.is_empty() {
        return Err(anyhow!("No entries found in {} content", format));
    }
    Ok(captions)
}

/// Serialize a caption sequence back to file content
pub fn build(captions: &[Caption], format: SubtitleFormat) -> String {
    match format {
        SubtitleFormat::Srt => build_srt(captions),
        SubtitleFormat::Vtt => build_vtt(captions),
        SubtitleFormat::Lrc => build_lrc(captions),
    }
}

/// Parse SRT content into captions.
///
/// Blocks are separated by blank lines: a sequence number, a timing line,
/// then text lines. The original sequence numbers are not kept; SRT players
/// only require them to be sequential, and serialization renumbers.
fn parse_srt(content: &str) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut timing: Option<String> = None;
    let mut text = String::new();
    let mut pending_seq = false;

    let finalize =
        |captions: &mut Vec<Caption>, timing: &mut Option<String>, text: &mut String| {
            if let Some(t) = timing.take() {
                if text.trim().is_empty() {
                    warn!("Skipping SRT block with empty text at {}", t);
                } else {
                    let index = captions.len();
                    captions.push(Caption::dialogue(index, &t, text.trim_end()));
                }
            }
            text.clear();
        };

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            finalize(&mut captions, &mut timing, &mut text);
            pending_seq = false;
            continue;
        }

        if timing.is_none() {
            if TIMING_REGEX.is_match(trimmed) {
                timing = Some(trimmed.to_string());
            } else if !pending_seq && trimmed.parse::<usize>().is_ok() {
                pending_seq = true;
            } else {
                warn!("Unexpected SRT line outside a block: {}", trimmed);
            }
            continue;
        }

        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(trimmed);
    }
    finalize(&mut captions, &mut timing, &mut text);

    captions
}

fn build_srt(captions: &[Caption]) -> String {
    let mut out = String::new();
    let mut seq = 0;
    for caption in captions {
        if caption.kind != CaptionKind::Dialogue {
            continue;
        }
        seq += 1;
        out.push_str(&format!("{}\n{}\n{}\n\n", seq, caption.timing, caption.text));
    }
    out
}

/// Parse WebVTT content.
///
/// The WEBVTT header and NOTE/STYLE/REGION blocks become meta captions so the
/// serialized file keeps its structure. A non-timing line directly before a
/// timing line is a cue identifier and is kept as part of the timing block.
fn parse_vtt(content: &str) -> Vec<Caption> {
    let mut captions = Vec::new();

    for block in split_blocks(content) {
        let index = captions.len();
        let lines: Vec<&str> = block.lines().collect();

        let timing_pos = lines.iter().position(|l| TIMING_REGEX.is_match(l.trim()));
        match timing_pos {
            // Cue identifier, if any, occupies exactly the lines above the timing line
            Some(pos) if pos <= 1 => {
                let timing = lines[..=pos].join("\n");
                let text = lines[pos + 1..].join("\n");
                if text.trim().is_empty() {
                    warn!("Skipping VTT cue with empty text at {}", lines[pos].trim());
                    continue;
                }
                captions.push(Caption::dialogue(index, &timing, text.trim_end()));
            }
            _ => captions.push(Caption::meta(index, &block)),
        }
    }

    captions
}

fn build_vtt(captions: &[Caption]) -> String {
    let mut blocks = Vec::with_capacity(captions.len());
    for caption in captions {
        match caption.kind {
            CaptionKind::Dialogue => {
                blocks.push(format!("{}\n{}", caption.timing, caption.text));
            }
            CaptionKind::Meta => blocks.push(caption.text.clone()),
        }
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Parse LRC (timed lyrics) content.
///
/// `[mm:ss.xx]text` lines are dialogue; a line may carry several time tags.
/// `[ti:..]`-style metadata tags and anything unrecognized pass through as
/// meta entries.
fn parse_lrc(content: &str) -> Vec<Caption> {
    let mut captions = Vec::new();

    for line in content.lines() {
        let index = captions.len();
        if let Some(m) = LRC_TIME_REGEX.find(line) {
            let text = &line[m.end()..];
            if text.trim().is_empty() {
                captions.push(Caption::meta(index, line));
            } else {
                captions.push(Caption::dialogue(index, m.as_str(), text.trim()));
            }
        } else if !line.trim().is_empty() {
            captions.push(Caption::meta(index, line));
        }
    }

    captions
}

fn build_lrc(captions: &[Caption]) -> String {
    let mut out = String::new();
    for caption in captions {
        match caption.kind {
            CaptionKind::Dialogue => {
                out.push_str(&format!("{}{}\n", caption.timing, caption.text));
            }
            CaptionKind::Meta => {
                out.push_str(&caption.text);
                out.push('\n');
            }
        }
    }
    out
}

/// Split content into blank-line separated blocks, preserving inner newlines
fn split_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

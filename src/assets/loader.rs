use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::{
    assets::{decode::PreparedImage, fit::FitToCanvas, media},
    config::{CanvasConfig, SlideshowConfig},
    foundation::error::{ReelError, ReelResult},
    report::QualityWarning,
};

/// Photo file extensions picked up from the photos directory (case-insensitive).
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
/// Audio bed file stems/extensions probed in order.
pub const AUDIO_CANDIDATES: &[&str] = &["bgm.mp3", "bgm.m4a", "bgm.wav", "bgm.ogg", "bgm.flac"];
/// Font file extensions picked up from the fonts directory. Collections (`.ttc`) are left out
/// since only one face is shaped and drawn.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

const PHOTOS_DIR: &str = "photos";
const CAPTIONS_FILE: &str = "text.txt";
const FONTS_DIR: &str = "fonts";
const PROCESSED_DIR: &str = "processed_photos";

/// An audio bed on disk together with its probed length.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioSource {
    /// Audio file.
    pub path: PathBuf,
    /// Probed duration in seconds (> 0).
    pub duration_secs: f64,
}

/// Caption font bytes, read once at load time.
#[derive(Clone, Debug)]
pub struct CaptionFont {
    /// Where the font came from.
    pub source: PathBuf,
    /// Raw font file contents.
    pub bytes: Arc<Vec<u8>>,
}

/// Everything discovered in an input directory, before any photo is decoded.
#[derive(Clone, Debug)]
pub struct AssetManifest {
    /// Photos in slide order (sorted by file name).
    pub photos: Vec<PathBuf>,
    /// Non-empty, trimmed caption lines in file order.
    pub captions: Vec<String>,
    /// Optional audio bed.
    pub audio: Option<AudioSource>,
    /// Optional caption font file.
    pub font_path: Option<PathBuf>,
    /// Problems found while discovering assets that did not stop the load.
    pub warnings: Vec<QualityWarning>,
}

/// Options for [`AssetManifest::discover`].
#[derive(Clone, Copy, Debug)]
pub struct DiscoverOpts {
    /// Look for and probe an audio bed.
    pub with_audio: bool,
}

impl Default for DiscoverOpts {
    fn default() -> Self {
        Self { with_audio: true }
    }
}

impl AssetManifest {
    /// Scan `input_dir` using the conventional layout:
    /// `photos/`, `text.txt`, `bgm.*` and `fonts/`.
    #[tracing::instrument(skip(cfg))]
    pub fn discover(
        input_dir: &Path,
        cfg: &SlideshowConfig,
        opts: DiscoverOpts,
    ) -> ReelResult<Self> {
        let photos = list_photos(&input_dir.join(PHOTOS_DIR))?;
        if photos.is_empty() {
            return Err(ReelError::invalid_input(format!(
                "no photos found in '{}'",
                input_dir.join(PHOTOS_DIR).display()
            )));
        }
        let captions = read_caption_lines(&input_dir.join(CAPTIONS_FILE))?;

        let mut warnings = Vec::new();
        let audio = if opts.with_audio {
            match find_audio(input_dir) {
                None => None,
                Some(path) => match media::probe_duration_secs(&path) {
                    Ok(d) if d > 0.0 => Some(AudioSource {
                        path,
                        duration_secs: d,
                    }),
                    Ok(_) => None,
                    Err(e) => {
                        let w = QualityWarning::AudioMissing {
                            reason: format!("'{}': {e}", path.display()),
                        };
                        w.log();
                        warnings.push(w);
                        None
                    }
                },
            }
        } else {
            None
        };

        let font_path = match &cfg.caption.font_path {
            Some(p) => Some(p.clone()),
            None => find_font(&input_dir.join(FONTS_DIR)),
        };

        tracing::info!(
            photos = photos.len(),
            captions = captions.len(),
            audio = audio.is_some(),
            font = font_path.is_some(),
            "discovered assets"
        );
        Ok(Self {
            photos,
            captions,
            audio,
            font_path,
            warnings,
        })
    }

    /// Decode and fit every photo onto the configured canvas, in slide order.
    #[tracing::instrument(skip(self, canvas), fields(photos = self.photos.len()))]
    pub fn load_images(&self, canvas: &CanvasConfig) -> ReelResult<Vec<PreparedImage>> {
        use rayon::prelude::*;

        let fitter = FitToCanvas::new(canvas)?;
        self.photos
            .par_iter()
            .map(|p| fitter.prepare_file(p))
            .collect()
    }

    /// Read the caption font, if one was found. A configured font that cannot be read is an
    /// error; captions then degrade per slide when no font is available at all.
    pub fn load_font(&self) -> ReelResult<Option<CaptionFont>> {
        let Some(path) = &self.font_path else {
            return Ok(None);
        };
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Some(CaptionFont {
            source: path.clone(),
            bytes: Arc::new(bytes),
        }))
    }
}

/// Sorted list of photo files in `dir`. A missing directory yields an empty list.
pub fn list_photos(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    list_files_with_ext(dir, PHOTO_EXTENSIONS)
}

fn list_files_with_ext(dir: &Path, exts: &[&str]) -> ReelResult<Vec<PathBuf>> {
    let rd = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("read directory '{}'", dir.display()))
                .into());
        }
    };

    let mut out = Vec::new();
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if exts.contains(&ext.as_str()) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Split caption text into trimmed, non-empty lines.
pub fn parse_caption_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read caption lines from `path`. A missing file means "no captions".
pub fn read_caption_lines(path: &Path) -> ReelResult<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_caption_lines(text.trim_start_matches('\u{feff}'))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("read captions '{}'", path.display()))
            .into()),
    }
}

/// First audio bed candidate present in `input_dir`.
pub fn find_audio(input_dir: &Path) -> Option<PathBuf> {
    AUDIO_CANDIDATES
        .iter()
        .map(|name| input_dir.join(name))
        .find(|p| p.is_file())
}

/// First font file (sorted by name) in `dir`.
pub fn find_font(dir: &Path) -> Option<PathBuf> {
    list_files_with_ext(dir, FONT_EXTENSIONS)
        .ok()
        .and_then(|fonts| fonts.into_iter().next())
}

/// Outcome of [`prepare_photos`].
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct PrepareReport {
    /// Files written, in slide order.
    pub written: Vec<PathBuf>,
    /// Photos that could not be processed, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Fit every photo under `<input_dir>/photos` onto the canvas and write it as a JPEG
/// (`photo_0001.jpg`, quality 60) into `<output_dir>/processed_photos`.
///
/// Photos that fail are skipped and reported; if none succeed the call fails. Output numbers are
/// contiguous and zero-padded so the written set lists back in slide order.
#[tracing::instrument(skip(canvas))]
pub fn prepare_photos(
    input_dir: &Path,
    output_dir: &Path,
    canvas: &CanvasConfig,
) -> ReelResult<PrepareReport> {
    let fitter = FitToCanvas::new(canvas)?;
    let photos = list_photos(&input_dir.join(PHOTOS_DIR))?;
    let out_dir = output_dir.join(PROCESSED_DIR);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output directory '{}'", out_dir.display()))?;

    let mut report = PrepareReport::default();
    for photo in &photos {
        let out_path = out_dir.join(prepared_photo_name(report.written.len() + 1));
        match write_fitted_jpeg(&fitter, photo, &out_path) {
            Ok(()) => {
                tracing::debug!(src = %photo.display(), dst = %out_path.display(), "prepared photo");
                report.written.push(out_path);
            }
            Err(e) => {
                tracing::warn!(src = %photo.display(), error = %e, "skipping photo");
                report.skipped.push((photo.clone(), e.to_string()));
            }
        }
    }

    if report.written.is_empty() {
        return Err(ReelError::invalid_input(format!(
            "no photos could be prepared from '{}'",
            input_dir.join(PHOTOS_DIR).display()
        )));
    }
    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "photo preparation finished"
    );
    Ok(report)
}

/// File name of the `n`th (1-based) prepared photo.
pub fn prepared_photo_name(n: usize) -> String {
    format!("photo_{n:04}.jpg")
}

fn write_fitted_jpeg(fitter: &FitToCanvas, src: &Path, dst: &Path) -> ReelResult<()> {
    let bytes = std::fs::read(src).with_context(|| format!("read photo '{}'", src.display()))?;
    let img = crate::assets::decode::decode_oriented(&bytes)?;
    let fitted = image::DynamicImage::ImageRgba8(fitter.fit(&img)).to_rgb8();

    let file = std::fs::File::create(dst)
        .with_context(|| format!("create '{}'", dst.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, 60);
    fitted
        .write_with_encoder(encoder)
        .with_context(|| format!("encode jpeg '{}'", dst.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;

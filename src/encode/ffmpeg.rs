use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::{
    assets::media::is_tool_on_path,
    config::EncodeSettings,
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
    foundation::math::mul_div255_u16,
    render::raster::FrameRGBA,
};

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (straight RGBA8).
    pub bg_rgba: [u8; 4],
    /// Codec, bitrate, preset, threads and container, passed through verbatim.
    pub settings: EncodeSettings,
}

impl FfmpegSinkOpts {
    /// Options writing to `out_path` with the given encoder settings.
    pub fn new(out_path: impl Into<PathBuf>, settings: EncodeSettings) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            settings,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned in `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    fn fail(&self, msg: impl Into<String>) -> ReelError {
        ReelError::encode(&self.opts.out_path, msg)
    }

    /// Tear down after a failed write, preferring ffmpeg's own stderr as the message.
    fn abort_with_stderr(&mut self, fallback: String) -> ReelError {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        let stderr = self
            .stderr_drain
            .take()
            .and_then(|h| h.join().ok())
            .and_then(Result::ok)
            .map(|b| String::from_utf8_lossy(&b).trim().to_string())
            .unwrap_or_default();
        self.cfg = None;
        if stderr.is_empty() {
            self.fail(fallback)
        } else {
            self.fail(stderr)
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // Closing stdin lets an abandoned ffmpeg exit on its own.
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
    }
}

/// Build the full `ffmpeg` argument list for `cfg`.
pub fn ffmpeg_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let s = &opts.settings;
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |v: &str| args.push(OsString::from(v));

    push(if opts.overwrite { "-y" } else { "-n" });
    // Raw frames are flattened to opaque RGBA in push_frame.
    for a in [
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
        "-r",
        &cfg.fps.0.to_string(),
        "-i",
        "pipe:0",
    ] {
        push(a);
    }

    if let Some(audio) = cfg.audio.as_ref() {
        for a in [
            "-f",
            "f32le",
            "-ar",
            &audio.sample_rate.to_string(),
            "-ac",
            &audio.channels.to_string(),
            "-i",
        ] {
            push(a);
        }
        args.push(audio.path.clone().into_os_string());
    }

    let mut push = |v: &str| args.push(OsString::from(v));
    for a in [
        "-c:v",
        &s.video_codec,
        "-preset",
        &s.preset,
        "-b:v",
        &s.bitrate,
        "-threads",
        &s.threads.to_string(),
        "-pix_fmt",
        "yuv420p",
    ] {
        push(a);
    }
    if cfg.audio.is_some() {
        push("-c:a");
        push(s.audio_codec.as_str());
    } else {
        push("-an");
    }
    if matches!(s.container.as_str(), "mp4" | "mov") {
        push("-movflags");
        push("+faststart");
    }
    push("-f");
    push(s.container.as_str());
    args.push(opts.out_path.clone().into_os_string());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        crate::foundation::core::Canvas {
            width: cfg.width,
            height: cfg.height,
        }
        .validate()?;
        if let Some(audio) = cfg.audio.as_ref()
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(ReelError::invalid_input(
                "audio sample_rate/channels must be non-zero when audio is enabled",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(self.fail("output file already exists"));
        }
        if !is_tool_on_path("ffmpeg") {
            return Err(self.fail("ffmpeg is required for encoding, but was not found on PATH"));
        }

        let args = ffmpeg_args(&self.opts, &cfg);
        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.fail(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.fail("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.fail("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self.cfg.as_ref().ok_or_else(|| self.fail("sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(self.fail("out-of-order frame index"));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::invalid_input(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);

        flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(self.fail("sink is already finalized"));
        };
        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&self.scratch) {
            return Err(self.abort_with_stderr(format!("failed to write frame to ffmpeg: {e}")));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self.child.take().ok_or_else(|| self.fail("sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| self.fail(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| self.fail("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| self.fail(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(self.fail(format!("ffmpeg exited with {status}: {}", stderr.trim())));
        }
        tracing::info!(out = %self.opts.out_path.display(), "encode finished");
        Ok(())
    }
}

/// Composite premultiplied RGBA8 over an opaque background.
pub(crate) fn flatten_premul_over_bg(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::invalid_input(
            "frame data must be width*height*4 bytes",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;

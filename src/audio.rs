//! Sound capability.
//!
//! States talk to an [`AudioPort`]; every call is fire-and-forget and must be
//! harmless when no device is available. [`SoundBoard`] is the host
//! implementation on top of rodio: cues are decoded once from the sounds
//! directory and played on detached sinks, music runs on its own sink, and
//! fades are a single replaceable operation evaluated against the wall clock
//! and pushed to the music sink's volume.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};

pub const SOUND_KEYS: [&str; 10] = [
    "shoot",
    "explosion_large",
    "explosion_medium",
    "explosion_small",
    "player_death",
    "extra_life",
    "menu_select",
    "menu_navigate",
    "pause",
    "unpause",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Music,
    Effects,
}

pub trait AudioPort {
    fn play_sound(&mut self, key: &str);
    fn play_music(&mut self, path: &Path, looped: bool);
    fn pause_music(&mut self);
    fn unpause_music(&mut self);
    fn stop_music(&mut self);
    /// Clamped to 0.0..=1.0; non-finite values mute.
    fn set_volume(&mut self, channel: Channel, volume: f64);
    fn volume(&self, channel: Channel) -> f64;
    fn fade_out(&mut self, ms: u64);
    fn fade_in(&mut self, path: &Path, ms: u64, looped: bool);
    /// Fade the current track out over `ms`, then fade `path` in over `ms`.
    fn crossfade(&mut self, path: &Path, ms: u64, looped: bool);
    fn is_music_playing(&self) -> bool;

    /// Called once per frame so fades progress between other calls.
    fn update(&mut self) {}
}

/// Used when audio is switched off entirely.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioPort for SilentAudio {
    fn play_sound(&mut self, _key: &str) {}
    fn play_music(&mut self, _path: &Path, _looped: bool) {}
    fn pause_music(&mut self) {}
    fn unpause_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn set_volume(&mut self, _channel: Channel, _volume: f64) {}
    fn volume(&self, _channel: Channel) -> f64 {
        0.0
    }
    fn fade_out(&mut self, _ms: u64) {}
    fn fade_in(&mut self, _path: &Path, _ms: u64, _looped: bool) {}
    fn crossfade(&mut self, _path: &Path, _ms: u64, _looped: bool) {}
    fn is_music_playing(&self) -> bool {
        false
    }
}

type Clip = Buffered<Decoder<BufReader<File>>>;

fn decode(path: &Path) -> GameResult<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| {
        GameError::ResourceUnavailable(format!("cannot open {}: {}", path.display(), e))
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| {
        GameError::ResourceUnavailable(format!("cannot decode {}: {}", path.display(), e))
    })
}

fn unit(volume: f64) -> f64 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Track {
    path: PathBuf,
    looped: bool,
    paused: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum FadeKind {
    In,
    Out,
    Cross { next: PathBuf, looped: bool },
}

#[derive(Debug, Clone)]
struct Fade {
    kind: FadeKind,
    started: Instant,
    duration: Duration,
}

impl Fade {
    fn new(kind: FadeKind, ms: u64) -> Self {
        Self {
            kind,
            started: Instant::now(),
            duration: Duration::from_millis(ms),
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (now.duration_since(self.started).as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

pub struct SoundBoard {
    enabled: bool,
    stream: Option<OutputStream>,
    music_sink: Option<Sink>,
    sounds: HashMap<String, Clip>,
    music_volume: f64,
    sound_volume: f64,
    track: Option<Track>,
    fade: Option<Fade>,
    warned: HashSet<String>,
}

impl SoundBoard {
    pub fn open(config: &GameConfig) -> Self {
        Self::new(&config.sounds_dir, config.music_volume, config.sound_volume)
    }

    /// Open the default output device. Without one the board stays silent.
    pub fn new(sounds_dir: &Path, music_volume: f64, sound_volume: f64) -> Self {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => Self::build(Some(stream), true, sounds_dir, music_volume, sound_volume),
            Err(e) => {
                let err = GameError::ResourceUnavailable(format!("audio output: {}", e));
                warn!("{}, continuing without audio", err);
                Self::build(None, false, sounds_dir, music_volume, sound_volume)
            }
        }
    }

    fn build(
        stream: Option<OutputStream>,
        enabled: bool,
        sounds_dir: &Path,
        music_volume: f64,
        sound_volume: f64,
    ) -> Self {
        let mut board = Self {
            enabled,
            stream,
            music_sink: None,
            sounds: HashMap::new(),
            music_volume: unit(music_volume),
            sound_volume: unit(sound_volume),
            track: None,
            fade: None,
            warned: HashSet::new(),
        };
        if !enabled {
            return board;
        }
        if !sounds_dir.is_dir() {
            warn!("Sound directory {} not found", sounds_dir.display());
            return board;
        }

        for key in SOUND_KEYS {
            let path = sounds_dir.join(format!("{}.wav", key));
            match decode(&path) {
                Ok(source) => {
                    debug!("Loaded sound {} from {}", key, path.display());
                    board.sounds.insert(key.to_string(), source.buffered());
                }
                Err(e) => debug!("Sound {} skipped: {}", key, e),
            }
        }
        info!("Sound system ready with {} cues", board.sounds.len());
        board
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.sounds.contains_key(key)
    }

    pub fn current_music(&self) -> Option<&Path> {
        if self.fade_out_finished(Instant::now()) {
            return None;
        }
        self.track.as_ref().map(|t| t.path.as_path())
    }

    /// Music volume after any fade in progress.
    pub fn effective_music_volume(&self) -> f64 {
        let now = Instant::now();
        let factor = match &self.fade {
            None => 1.0,
            Some(fade) => {
                let p = fade.progress(now);
                match fade.kind {
                    FadeKind::In => p,
                    FadeKind::Out | FadeKind::Cross { .. } => 1.0 - p,
                }
            }
        };
        if self.track.is_some() {
            self.music_volume * factor
        } else {
            0.0
        }
    }

    fn fade_out_finished(&self, now: Instant) -> bool {
        matches!(&self.fade, Some(f) if f.kind == FadeKind::Out && f.progress(now) >= 1.0)
    }

    fn apply_music_volume(&self) {
        if let Some(sink) = &self.music_sink {
            sink.set_volume(self.effective_music_volume() as f32);
        }
    }

    /// Resolve a finished fade or track into its end state.
    fn settle(&mut self) {
        if matches!(&self.track, Some(t) if !t.looped)
            && self.music_sink.as_ref().is_some_and(Sink::empty)
        {
            self.track = None;
            self.music_sink = None;
        }

        let now = Instant::now();
        let Some(fade) = self.fade.take() else { return };
        if fade.progress(now) < 1.0 {
            self.fade = Some(fade);
            return;
        }
        match fade.kind {
            FadeKind::In => {}
            FadeKind::Out => {
                self.track = None;
                self.music_sink = None;
            }
            FadeKind::Cross { next, looped } => {
                if self.start_track(&next, looped) {
                    self.fade = Some(Fade {
                        kind: FadeKind::In,
                        started: fade.started + fade.duration,
                        duration: fade.duration,
                    });
                } else {
                    self.track = None;
                    self.music_sink = None;
                }
            }
        }
    }

    fn warn_once(&mut self, key: &str, message: impl FnOnce() -> String) {
        if self.warned.insert(key.to_string()) {
            warn!("{}", message());
        }
    }

    /// Decode `path` and put it on a fresh music sink, replacing the old one.
    fn start_track(&mut self, path: &Path, looped: bool) -> bool {
        let source = match decode(path) {
            Ok(source) => source,
            Err(e) => {
                self.warn_once(&path.display().to_string(), move || e.to_string());
                return false;
            }
        };
        self.music_sink = None;
        if let Some(stream) = &self.stream {
            let sink = Sink::connect_new(stream.mixer());
            sink.set_volume(self.music_volume as f32);
            if looped {
                sink.append(source.repeat_infinite());
            } else {
                sink.append(source);
            }
            self.music_sink = Some(sink);
        }
        self.track = Some(Track {
            path: path.to_path_buf(),
            looped,
            paused: false,
        });
        true
    }
}

impl AudioPort for SoundBoard {
    fn play_sound(&mut self, key: &str) {
        if !self.enabled {
            return;
        }
        if !self.sounds.contains_key(key) {
            self.warn_once(key, || format!("Sound '{}' not loaded", key));
            return;
        }
        if let (Some(stream), Some(clip)) = (&self.stream, self.sounds.get(key)) {
            let sink = Sink::connect_new(stream.mixer());
            sink.set_volume(self.sound_volume as f32);
            sink.append(clip.clone());
            sink.detach();
        }
        debug!("Sound cue {} at volume {:.2}", key, self.sound_volume);
    }

    fn play_music(&mut self, path: &Path, looped: bool) {
        if !self.enabled {
            return;
        }
        if self.start_track(path, looped) {
            self.fade = None;
            self.apply_music_volume();
            debug!("Playing music {} (loop={})", path.display(), looped);
        }
    }

    fn pause_music(&mut self) {
        self.settle();
        if let Some(track) = self.track.as_mut() {
            track.paused = true;
        }
        if let Some(sink) = &self.music_sink {
            sink.pause();
        }
    }

    fn unpause_music(&mut self) {
        self.settle();
        if let Some(track) = self.track.as_mut() {
            track.paused = false;
        }
        if let Some(sink) = &self.music_sink {
            sink.play();
        }
    }

    fn stop_music(&mut self) {
        self.track = None;
        self.fade = None;
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, channel: Channel, volume: f64) {
        let volume = unit(volume);
        match channel {
            Channel::Music => {
                self.music_volume = volume;
                self.apply_music_volume();
            }
            Channel::Effects => self.sound_volume = volume,
        }
    }

    fn volume(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Music => self.music_volume,
            Channel::Effects => self.sound_volume,
        }
    }

    fn fade_out(&mut self, ms: u64) {
        if !self.enabled {
            return;
        }
        self.settle();
        if self.track.is_some() {
            self.fade = Some(Fade::new(FadeKind::Out, ms));
            self.apply_music_volume();
        }
    }

    fn fade_in(&mut self, path: &Path, ms: u64, looped: bool) {
        if !self.enabled {
            return;
        }
        if self.start_track(path, looped) {
            self.fade = Some(Fade::new(FadeKind::In, ms));
            self.apply_music_volume();
        }
    }

    fn crossfade(&mut self, path: &Path, ms: u64, looped: bool) {
        if !self.enabled {
            return;
        }
        self.settle();
        if !self.is_music_playing() {
            self.fade_in(path, ms, looped);
            return;
        }
        if let Err(e) = decode(path) {
            self.warn_once(&path.display().to_string(), move || e.to_string());
            return;
        }
        self.fade = Some(Fade::new(
            FadeKind::Cross {
                next: path.to_path_buf(),
                looped,
            },
            ms,
        ));
        self.apply_music_volume();
    }

    fn is_music_playing(&self) -> bool {
        if self.fade_out_finished(Instant::now()) {
            return false;
        }
        if self.music_sink.as_ref().is_some_and(Sink::empty) {
            return false;
        }
        matches!(&self.track, Some(t) if !t.paused)
    }

    fn update(&mut self) {
        if !self.enabled {
            return;
        }
        self.settle();
        self.apply_music_volume();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Logs every call; clones share the log so a test can keep a handle
    /// after boxing the port into a context.
    #[derive(Clone, Default)]
    pub struct RecordingAudio {
        pub log: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingAudio {
        pub fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        pub fn contains(&self, call: &str) -> bool {
            self.log.borrow().iter().any(|c| c == call)
        }

        fn push(&self, call: String) {
            self.log.borrow_mut().push(call);
        }
    }

    impl AudioPort for RecordingAudio {
        fn play_sound(&mut self, key: &str) {
            self.push(format!("sound:{}", key));
        }
        fn play_music(&mut self, path: &Path, looped: bool) {
            self.push(format!("music:{}:{}", path.display(), looped));
        }
        fn pause_music(&mut self) {
            self.push("pause_music".into());
        }
        fn unpause_music(&mut self) {
            self.push("unpause_music".into());
        }
        fn stop_music(&mut self) {
            self.push("stop_music".into());
        }
        fn set_volume(&mut self, channel: Channel, volume: f64) {
            self.push(format!("volume:{:?}:{}", channel, volume));
        }
        fn volume(&self, _channel: Channel) -> f64 {
            1.0
        }
        fn fade_out(&mut self, ms: u64) {
            self.push(format!("fade_out:{}", ms));
        }
        fn fade_in(&mut self, path: &Path, ms: u64, _looped: bool) {
            self.push(format!("fade_in:{}:{}", path.display(), ms));
        }
        fn crossfade(&mut self, path: &Path, ms: u64, _looped: bool) {
            self.push(format!("crossfade:{}:{}", path.display(), ms));
        }
        fn is_music_playing(&self) -> bool {
            false
        }
    }
}

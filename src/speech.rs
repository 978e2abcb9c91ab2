//! Spoken commentary on sustained emotions.
//!
//! The phrase tables hold what the robot says; the backends turn a phrase
//! into sound. [`CachedSpeech`] downloads each phrase once from an online
//! text-to-speech service and plays the cached file, [`CommandSpeech`] runs
//! an offline engine, and [`FallbackSpeech`] chains the two.

use crate::{constants::PLAYER_STARTUP_WAIT_MS, emotion::Emotion, Error, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::{Duration, Instant};

/// Language of the spoken phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    German,
}

impl Language {
    /// Language code sent to the online synthesis service
    #[must_use]
    pub const fn tts_code(self) -> &'static str {
        match self {
            Self::English => "en-au",
            Self::German => "de",
        }
    }

    /// Voice name for the offline engine
    #[must_use]
    pub const fn voice(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::German => "de",
        }
    }
}

const HAPPINESS_EN: &[&str] = &[
    "I am happy, if YOU are happy.",
    "What a nice day, right?",
    "You are happy right now, are you?",
];
const HAPPINESS_DE: &[&str] = &[
    "Ich bin froehlich, wenn Du es auch bist!",
    "Was fuer ein schoener Tag heute ist, nicht wahr?",
    "Du bist gerade gluecklich, stimmts?",
];
const SURPRISE_EN: &[&str] = &[
    "You look surprised. Is everything alright?",
    "Are you surprised, what a smart robot I am?",
    "This is a surprise, right?",
];
const SURPRISE_DE: &[&str] = &[
    "Du siehst ueberrascht aus. Was ist denn los?",
    "Bist Du ueberrascht, was fuer ein smarter Roboter ich bin?",
    "Das ist eine Ueberraschung, nicht wahr?",
];
const ANGER_EN: &[&str] = &[
    "You look angry. Is everything alright?",
    "I am angry as well!",
    "What went wrong?",
];
const ANGER_DE: &[&str] = &[
    "Du siehst so aergerlich aus, ist alles in Ordnung?",
    "aeh Digga, ich bin auch sauer!",
    "Was ist Dir denn ueber die Leber gelaufen?",
];
const FEAR_EN: &[&str] = &[
    "Do you fear something?. What is dangerous here?",
    "I am harmless! You do not have to fear me",
    "You look like you have seen a ghost, but that is only me!",
];
const FEAR_DE: &[&str] = &[
    "Hast Du vor etwas Angst? Was ist denn hier gefaehrlich?",
    "Ich bin ganz harmlos! Du musst keine Angst vor mir haben!",
    "Du siehst aus, als haettest Du einen Geist gesehen! Da bekomme ich auch Angst",
];

/// Phrases for an emotion; empty for emotions the robot does not comment on
#[must_use]
pub const fn phrases(emotion: Emotion, language: Language) -> &'static [&'static str] {
    match (emotion, language) {
        (Emotion::Happiness, Language::English) => HAPPINESS_EN,
        (Emotion::Happiness, Language::German) => HAPPINESS_DE,
        (Emotion::Surprise, Language::English) => SURPRISE_EN,
        (Emotion::Surprise, Language::German) => SURPRISE_DE,
        (Emotion::Anger, Language::English) => ANGER_EN,
        (Emotion::Anger, Language::German) => ANGER_DE,
        (Emotion::Fear, Language::English) => FEAR_EN,
        (Emotion::Fear, Language::German) => FEAR_DE,
        _ => &[],
    }
}

/// Something that can speak a sentence
pub trait SpeechBackend {
    fn say(&mut self, text: &str, language: Language) -> Result<()>;

    fn name(&self) -> &str;
}

/// Speaks through `primary`, falling back to `fallback` on any error
pub struct FallbackSpeech {
    primary: Box<dyn SpeechBackend>,
    fallback: Box<dyn SpeechBackend>,
}

impl FallbackSpeech {
    #[must_use]
    pub fn new(primary: Box<dyn SpeechBackend>, fallback: Box<dyn SpeechBackend>) -> Self {
        Self { primary, fallback }
    }
}

impl SpeechBackend for FallbackSpeech {
    fn say(&mut self, text: &str, language: Language) -> Result<()> {
        match self.primary.say(text, language) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    "{} speech failed: {}. Falling back to {}",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                self.fallback.say(text, language)
            }
        }
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Child processes playing audio; finished ones are reaped on each play
#[derive(Default)]
struct Players {
    running: Vec<Child>,
}

impl Players {
    /// Start `command` and wait up to `PLAYER_STARTUP_WAIT_MS` for it to
    /// fail. A non-zero exit within that window is an error.
    fn play(&mut self, command: &mut Command) -> Result<()> {
        self.running.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .spawn()
            .map_err(|e| Error::Speech(format!("Failed to start {program}: {e}")))?;

        let deadline = Instant::now() + Duration::from_millis(PLAYER_STARTUP_WAIT_MS);
        loop {
            match child.try_wait()? {
                Some(status) if status.success() => return Ok(()),
                Some(status) => return Err(Error::Speech(format!("{program} exited with {status}"))),
                None if Instant::now() >= deadline => {
                    debug!("{} still playing, leaving it in the background", program);
                    self.running.push(child);
                    return Ok(());
                }
                None => std::thread::sleep(Duration::from_millis(10)),
            }
        }
    }
}

/// Online synthesis with an on-disk cache, played by an external player
pub struct CachedSpeech {
    client: reqwest::blocking::Client,
    cache_dir: PathBuf,
    tts_url: String,
    player: Vec<String>,
    players: Players,
}

impl CachedSpeech {
    /// Create a cached speech backend
    ///
    /// # Errors
    ///
    /// Returns an error if the player command is empty or the HTTP client
    /// cannot be built
    pub fn new(cache_dir: impl Into<PathBuf>, tts_url: impl Into<String>, player: Vec<String>, timeout: Duration) -> Result<Self> {
        if player.is_empty() {
            return Err(Error::ConfigError("Speech player command must not be empty".to_string()));
        }
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            cache_dir: cache_dir.into(),
            tts_url: tts_url.into(),
            player,
            players: Players::default(),
        })
    }

    /// Cache location of a sentence
    #[must_use]
    pub fn cache_path(&self, text: &str, language: Language) -> PathBuf {
        let name: String = text
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == ' ' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(language.tts_code()).join(format!("{}.mp3", name.trim()))
    }

    fn download(&self, text: &str, language: Language, path: &Path) -> Result<()> {
        info!("Synthesizing speech for \"{}\"", text);
        let audio = self
            .client
            .get(&self.tts_url)
            .query(&[("ie", "UTF-8"), ("q", text), ("tl", language.tts_code()), ("client", "tw-ob")])
            .send()?
            .error_for_status()?
            .bytes()?;

        if audio.is_empty() {
            return Err(Error::Speech("Speech service returned no audio".to_string()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &audio)?;
        Ok(())
    }
}

impl SpeechBackend for CachedSpeech {
    fn say(&mut self, text: &str, language: Language) -> Result<()> {
        let path = self.cache_path(text, language);
        if path.is_file() {
            debug!("Using cached speech {}", path.display());
        } else {
            self.download(text, language, &path)?;
        }

        let mut command = Command::new(&self.player[0]);
        command.args(&self.player[1..]).arg(&path);
        self.players.play(&mut command)
    }

    fn name(&self) -> &str {
        "cached"
    }
}

/// Offline speech engine invoked as `<program> <args> -v <voice> <text>`
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
    players: Players,
}

impl CommandSpeech {
    /// Create from a command line such as `["espeak-ng"]`
    ///
    /// # Errors
    ///
    /// Returns an error if the command is empty
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::ConfigError("Offline speech command must not be empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            players: Players::default(),
        })
    }
}

impl SpeechBackend for CommandSpeech {
    fn say(&mut self, text: &str, language: Language) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg("-v").arg(language.voice()).arg(text);
        self.players.play(&mut command)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

//! Emotion recognition application: camera in, robot reactions out.

use anyhow::{Context, Result};
use clap::Parser;
use emotion_recognition::{
    app::{Collaborators, EmotionRecognition, StartOptions},
    classification::EmotionClassifiers,
    config::{Config, EXAMPLE_CONFIG},
    console::{ConsoleExpression, ConsoleHead},
    onnx::OnnxClassifier,
    overlay::ScoreOverlay,
    policy::ReactionPolicy,
    random::ThreadRandom,
    speech::{CachedSpeech, CommandSpeech, FallbackSpeech, Language},
    vision::{HaarFaceLocator, HighGuiDisplay, OpenCvCapture, VideoSource},
};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Camera index to use (overrides the config)
    #[arg(long)]
    cam: Option<i32>,

    /// Video file to process instead of a camera
    #[arg(short, long)]
    video: Option<PathBuf>,

    /// Run without the display window
    #[arg(long)]
    no_gui: bool,

    /// Follow the face with the head (moves are logged)
    #[arg(long)]
    tracking: bool,

    /// Mirror the recognized emotion (expressions are logged)
    #[arg(long)]
    mirror: bool,

    /// Comment on sustained emotions
    #[arg(long)]
    voice: bool,

    /// Speak German instead of English
    #[arg(long)]
    german: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Visual Emotion Recognition");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?
    } else {
        Config::default()
    };

    if let Some(cam) = args.cam {
        config.capture.device = cam;
    }
    if args.voice {
        config.speech.enabled = true;
    }
    if args.german {
        config.speech.language = Language::German;
    }
    config.validate()?;
    config.validate_model_paths()?;

    let source = args
        .video
        .clone()
        .map_or(VideoSource::Camera(config.capture.device), VideoSource::File);
    let options = StartOptions {
        show_display: !args.no_gui,
        face_tracking: args.tracking,
        mirror_emotion: args.mirror,
    };

    let mut recognition = build_pipeline(&config, source)?;
    recognition.start(options).context("Failed to start emotion recognition")?;
    recognition.run()?;

    Ok(())
}

fn build_pipeline(config: &Config, source: VideoSource) -> Result<EmotionRecognition> {
    let models = &config.models;
    let face_size = config.pipeline.face_size;

    let categorical = OnnxClassifier::new(&models.categorical_model, models.categorical_classes.clone(), face_size)?
        .with_output_scale(models.categorical_output_scale);
    let dimensional = OnnxClassifier::new(&models.dimensional_model, models.dimensional_classes.clone(), face_size)?;

    let collaborators = Collaborators::new(
        Box::new(OpenCvCapture::new(
            source,
            (config.capture.frame_width, config.capture.frame_height),
        )),
        Box::new(HaarFaceLocator::new(&models.face_cascade)?),
        EmotionClassifiers::new(Box::new(categorical), Box::new(dimensional)),
    )
    .with_display(Box::new(HighGuiDisplay::new(config.display.window_title.clone())))
    .with_overlay(Box::new(ScoreOverlay::new(&config.display, config.capture.frame_width)));

    let mut policy = ReactionPolicy::new(config, Box::new(ThreadRandom))
        .with_robot(Box::new(ConsoleHead::new()))
        .with_expression(Box::new(ConsoleExpression));
    if config.speech.enabled {
        let speech = &config.speech;
        let online = CachedSpeech::new(
            speech.cache_dir.clone(),
            speech.tts_url.clone(),
            speech.player.clone(),
            speech.request_timeout(),
        )?;
        let offline = CommandSpeech::new(&speech.fallback)?;
        policy = policy.with_speech(Box::new(FallbackSpeech::new(Box::new(online), Box::new(offline))));
    }

    Ok(EmotionRecognition::new(config, collaborators, policy))
}

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};

use sound_swapper::audio_system::cache;
use sound_swapper::config::{self, SwapperConfig};
use sound_swapper::error::AppResult;
use sound_swapper::ids::IdSet;
use sound_swapper::{
    CueCategory, CueEvent, HostAudio, RodioPlayer, ScenePoint, SoundSwapper,
};

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/SoundSwapper/logs/`, one file per day
/// (`sound-swapper.YYYY-MM-DD.log`). Debug builds also log to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = config::log_dir();

    // Create log directory if it doesn't exist
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "sound-swapper.log");

    // Configure filter (info level by default)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

/// Stand-in for the host: replacement cues are only logged and printed
struct LoggingHost;

impl HostAudio for LoggingHost {
    fn play_sound_effect(&self, sound_id: u32, volume: Option<u8>) {
        tracing::info!("Host plays sound effect {} (volume {:?})", sound_id, volume);
        println!("  host plays {}", sound_id);
    }

    fn request_scene_reload(&self) {
        tracing::info!("Host scene reload requested");
        println!("  host reloads scene");
    }

    fn clear_ambient_sounds(&self) {
        tracing::info!("Host ambient sounds cleared");
        println!("  host clears ambient sounds");
    }
}

fn main() -> AppResult<()> {
    initialize_tracing();

    tracing::info!("Sound Swapper v{}", env!("CARGO_PKG_VERSION"));

    let config = SwapperConfig::load().context("Failed to load configuration")?;

    let args: Vec<String> = std::env::args().collect();
    if args.iter().skip(1).any(|arg| arg == "--check") {
        run_check(&config);
        return Ok(());
    }

    run_simulator(config)
}

/// Print the configuration and which clips would load
fn run_check(config: &SwapperConfig) {
    println!("=== Config ===");
    match SwapperConfig::config_path() {
        Ok(path) => println!("  Config file: {}", path.display()),
        Err(e) => println!("  Config file: unavailable ({})", e),
    }
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("✗ Failed to print config: {}", e),
    }
    println!();

    let sound_dir = config.sound_dir();
    println!("=== Sounds ({}) ===", sound_dir.display());
    for category in CueCategory::ALL {
        let ids = IdSet::parse(config.custom_sound_ids(category));
        println!("{}: {} ids", category, ids.len());

        for id in ids.iter() {
            match cache::load_clip(&sound_dir, id) {
                Some(clip) => println!(
                    "  ✓ {} ({} Hz, {} ch, {:.2}s)",
                    id,
                    clip.format().sample_rate,
                    clip.format().channels,
                    clip.duration().as_secs_f32()
                ),
                None => println!("  ✗ {} (missing or unreadable)", id),
            }
        }
    }
}

fn run_simulator(config: SwapperConfig) -> AppResult<()> {
    let player = Arc::new(RodioPlayer::spawn());
    let swapper = SoundSwapper::start(config, player.clone(), Arc::new(LoggingHost));

    println!("Commands: point <id> | area <id> <ox> <oy> <lx> <ly> <range> | set <key> <value> | scene | stop | quit");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        if line == "stop" {
            player.stop_all();
            continue;
        }

        if let Err(e) = run_command(&swapper, line) {
            eprintln!("✗ {}", e);
        }
        io::stdout().flush().ok();
    }

    swapper.shutdown();
    Ok(())
}

fn run_command(swapper: &SoundSwapper, line: &str) -> AppResult<()> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "point" | "area" => {
            let event = parse_cue(command, &args)?;
            let outcome = swapper.on_cue(&event);
            println!(
                "{} -> {}{}",
                event.sound_id,
                outcome.decision.description(),
                if outcome.consumed { " (consumed)" } else { "" }
            );
        }
        "set" => {
            let [key, value @ ..] = args.as_slice() else {
                bail!("usage: set <key> <value>");
            };
            let value = value.join(" ");
            if let Some(ticket) = swapper.on_config_changed(key, &value) {
                println!("  rebuilding sounds (pass #{})", ticket.generation());
            }
        }
        "scene" => swapper.on_scene_loaded(),
        other => bail!("unknown command: {}", other),
    }

    for report in swapper.debug_lines() {
        println!("  | {}", report);
    }
    Ok(())
}

fn parse_cue(command: &str, args: &[&str]) -> AppResult<CueEvent> {
    let number = |index: usize| -> AppResult<i64> {
        let token = args
            .get(index)
            .with_context(|| format!("missing argument {}", index + 1))?;
        token
            .parse::<i64>()
            .with_context(|| format!("not a number: {}", token))
    };

    let sound_id = u32::try_from(number(0)?).context("sound id out of range")?;

    if command == "point" {
        return Ok(CueEvent::point(sound_id));
    }

    let coordinate = |index: usize| -> AppResult<i32> {
        i32::try_from(number(index)?).context("coordinate out of range")
    };
    let origin = ScenePoint::new(coordinate(1)?, coordinate(2)?);
    let listener = ScenePoint::new(coordinate(3)?, coordinate(4)?);
    let range = u32::try_from(number(5)?).context("range out of range")?;

    Ok(CueEvent::area(sound_id, origin, listener, range))
}

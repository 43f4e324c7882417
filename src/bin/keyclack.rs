// Keyclack CLI
// Plays a mechanical keyboard sample for every key press

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use keyclack_core::input::{list_keyboards, locate_keyboard, open_keyboard, KeyboardDevice};
use keyclack_core::playback::missing_assets;
use keyclack_core::{
    default_config_content, CommandPlayer, Config, EventLoop, LoopExit, ShutdownToken,
};

/// Mechanical keyboard sounds for any keyboard
#[derive(Parser, Debug)]
#[command(name = "keyclack")]
#[command(version)]
#[command(about = "Plays a key click sample on every key press", long_about = None)]
struct Args {
    /// TOML configuration file (default: ~/.config/keyclack/config.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Use this event device instead of the first udev keyboard
    #[arg(short, long, value_name = "DEVICE")]
    device: Option<PathBuf>,

    /// Directory containing the sound samples
    #[arg(short, long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Player binary used for each sample
    #[arg(short, long, value_name = "PLAYER")]
    player: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and assets, then exit
    #[arg(long)]
    check_config: bool,

    /// List keyboard devices known to udev
    #[arg(long)]
    list_devices: bool,

    /// Print a starter config file and exit
    #[arg(long)]
    print_default_config: bool,
}

impl Args {
    /// CLI flags take precedence over the config file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref device) = self.device {
            config.device = Some(device.clone());
        }
        if let Some(ref assets) = self.assets {
            config.assets_dir = assets.clone();
        }
        if let Some(ref player) = self.player {
            config.player = player.clone();
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Cancel `token` on SIGINT or SIGTERM.
fn install_signal_handler(token: ShutdownToken) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handler")?;

    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::debug!("Received signal {}", signal);
            println!("\nExiting...");
            token.cancel();
        }
    });
    Ok(())
}

fn list_devices() -> anyhow::Result<()> {
    let devices = list_keyboards().context("Error finding keyboard devices")?;
    if devices.is_empty() {
        bail!("Could not find keyboard device");
    }

    println!("Found {} keyboard device(s):", devices.len());
    for device in &devices {
        match (&device.name, &device.error) {
            (Some(name), _) => println!("  {}: {} ({})", device.index, name, device.path.display()),
            (None, Some(error)) => println!(
                "  {}: {} (cannot open: {})",
                device.index,
                device.path.display(),
                error
            ),
            (None, None) => println!("  {}: {}", device.index, device.path.display()),
        }
    }
    Ok(())
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    match config.source_path() {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: built-in defaults"),
    }
    println!("Player: {}", config.player);
    println!("Assets: {}", config.assets_dir.display());
    println!("Mapped keys: {}", config.sounds.len());

    let missing = missing_assets(&config.sounds, &config.assets_dir);
    if !missing.is_empty() {
        bail!(
            "Missing samples in {}: {}",
            config.assets_dir.display(),
            missing.join(", ")
        );
    }
    println!("Configuration is valid");
    Ok(())
}

fn open_device(config: &Config) -> anyhow::Result<KeyboardDevice> {
    let device = match config.device {
        Some(ref path) => open_keyboard(path)?,
        None => locate_keyboard()?,
    };
    Ok(device)
}

fn run(config: Config) -> anyhow::Result<()> {
    let token = ShutdownToken::new();
    install_signal_handler(token.clone())?;

    let device = open_device(&config)?;

    let session = config.session_env();
    for (key, value) in session.vars() {
        log::debug!("Player environment: {}={}", key, value);
    }
    for file in missing_assets(&config.sounds, &config.assets_dir) {
        log::warn!("Sample not found: {}", config.assets_dir.join(file).display());
    }

    let player = CommandPlayer::new(config.player.clone(), config.assets_dir.clone(), session);
    let mut event_loop = EventLoop::new(device, player, config.sounds, config.exit_chord);

    println!("Listening for key events. Press Ctrl+C to exit.");
    let exit = event_loop.run(&token);

    let stats = event_loop.stats();
    log::info!(
        "Played {} sample(s) for {} key event(s)",
        stats.played,
        stats.key_events
    );
    if stats.malformed_reads + stats.failed_reads > 0 {
        log::debug!(
            "Skipped {} short read(s) and {} failed read(s)",
            stats.malformed_reads,
            stats.failed_reads
        );
    }

    match exit {
        LoopExit::ExitChord => println!("\nExiting..."),
        LoopExit::Cancelled => {}
        LoopExit::EndOfStream => log::warn!("Keyboard device closed"),
    }
    // Dropping the loop closes the device; running players are left alone.
    drop(event_loop);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.print_default_config {
        print!("{}", default_config_content());
        return Ok(());
    }

    if args.list_devices {
        return list_devices();
    }

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    args.apply_overrides(&mut config);

    if args.check_config {
        return check_config(&config);
    }

    run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["keyclack"]);

        assert_eq!(args.config, None);
        assert_eq!(args.device, None);
        assert!(!args.verbose);
        assert!(!args.check_config);
        assert!(!args.list_devices);
        assert!(!args.print_default_config);
    }

    #[test]
    fn test_args_with_options() {
        let args = Args::parse_from([
            "keyclack",
            "--config",
            "/tmp/keyclack.toml",
            "--device",
            "/dev/input/event4",
            "--assets",
            "/opt/clack",
            "--player",
            "aplay",
            "--verbose",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("/tmp/keyclack.toml")));
        assert_eq!(args.device, Some(PathBuf::from("/dev/input/event4")));
        assert_eq!(args.assets, Some(PathBuf::from("/opt/clack")));
        assert_eq!(args.player.as_deref(), Some("aplay"));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_list_devices() {
        let args = Args::parse_from(["keyclack", "--list-devices"]);
        assert!(args.list_devices);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::from_toml(
            r#"
[general]
player = "paplay"
assets_dir = "/from/config"
"#,
        )
        .unwrap();
        let args = Args::parse_from(["keyclack", "--assets", "/from/cli", "-d", "/dev/input/event2"]);
        args.apply_overrides(&mut config);

        assert_eq!(config.assets_dir, PathBuf::from("/from/cli"));
        assert_eq!(config.player, "paplay");
        assert_eq!(config.device, Some(PathBuf::from("/dev/input/event2")));
    }
}

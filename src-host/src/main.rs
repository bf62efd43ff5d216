mod autoplay;

use anyhow::Result;
use clap::{Parser, Subcommand};
use duolane_infra_storage_fs::{FsSongLibrary, FsStorage};
use duolane_ports::library::SongLibraryPort;
use duolane_ports::storage::StoragePort;
use duolane_ports::types::SongId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "duolane-host", about = "Headless Duolane runner")]
struct Cli {
    /// Directory holding musicInfo.json, the audio files and `<id>.json` charts
    #[arg(long, global = true, default_value = "songs")]
    songs: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the song catalog as JSON
    List,
    /// Play a chart on a virtual clock, pressing every note, and print the summary
    Autoplay {
        /// Song id; defaults to the last song played
        #[arg(long)]
        song: Option<String>,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Press this far off the note time, alternating early and late
        #[arg(long, default_value_t = 0)]
        jitter_ms: u32,
        /// Clock offset; defaults to the saved setting
        #[arg(long, allow_hyphen_values = true)]
        offset_ms: Option<i32>,
        /// Where the song clock comes from
        #[arg(long, value_enum, default_value_t = autoplay::AudioBackend::Virtual)]
        audio: autoplay::AudioBackend,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let library = FsSongLibrary::new(cli.songs);

    match cli.command {
        Commands::List => {
            let songs = library.list_songs()?;
            println!("{}", serde_json::to_string_pretty(&songs)?);
        }
        Commands::Autoplay {
            song,
            fps,
            jitter_ms,
            offset_ms,
            audio,
        } => {
            let settings = FsStorage::default().load_settings().unwrap_or_else(|err| {
                log::warn!("failed to load settings, using defaults: {}", err);
                Default::default()
            });
            let song = match song.map(SongId).or(settings.last_song) {
                Some(song) => song,
                None => anyhow::bail!("no --song given and no last song saved"),
            };
            let options = autoplay::AutoplayOptions {
                fps,
                jitter_sec: jitter_ms as f64 / 1000.0,
                offset_ms: offset_ms.unwrap_or(settings.clock_offset_ms),
                audio,
            };
            let summary = autoplay::run(library, &song, &options)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoplay_defaults_to_the_virtual_clock() {
        let cli = Cli::try_parse_from(["duolane-host", "autoplay", "--song", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Autoplay {
                audio: autoplay::AudioBackend::Virtual,
                fps: 60,
                ..
            }
        ));
    }

    #[test]
    fn autoplay_can_run_on_cpal() {
        let cli = Cli::try_parse_from([
            "duolane-host",
            "--songs",
            "charts",
            "autoplay",
            "--audio",
            "cpal",
            "--offset-ms",
            "-30",
        ])
        .unwrap();
        assert_eq!(cli.songs, PathBuf::from("charts"));
        assert!(matches!(
            cli.command,
            Commands::Autoplay {
                audio: autoplay::AudioBackend::Cpal,
                offset_ms: Some(-30),
                song: None,
                ..
            }
        ));
    }
}

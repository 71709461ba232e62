//! savegame command line
//!
//! Inspect and edit save records from a shell:
//!
//! ```text
//! savegame --dir ./saves save slot1.sav '{"wave": 3}'
//! savegame --dir ./saves --password pw save secret.sav '"hidden"'
//! savegame --dir ./saves load slot1.sav
//! savegame --dir ./saves ls
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::{Parser, Subcommand, ValueEnum};
    use serde_json::Value;

    use savegame::{
        BasePath, JsonCodec, MsgPackCodec, Result, SaveConfig, SaveGame, SaveOptions, TextEncoding,
    };

    #[derive(Parser)]
    #[command(name = "savegame", version, about = "Save/load records from the command line")]
    struct Cli {
        /// Base directory (defaults to the platform data directory)
        #[arg(long, global = true)]
        dir: Option<PathBuf>,

        /// Application name used for the platform data directory
        #[arg(long, global = true, default_value = "savegame")]
        app: String,

        /// Encrypt/decrypt records with this password
        #[arg(long, global = true)]
        password: Option<String>,

        #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Text encoding label for JSON records
        #[arg(long, global = true, default_value = "utf-8")]
        encoding: String,

        /// Use the preference store instead of files
        #[arg(long, global = true)]
        prefs: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Clone, Copy, ValueEnum)]
    enum Format {
        Json,
        Pretty,
        Msgpack,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Save a JSON value under an identifier
        Save { identifier: String, json: String },
        /// Print the value stored under an identifier
        Load { identifier: String },
        /// Exit 0 if the record exists, 1 otherwise
        Exists { identifier: String },
        /// Delete a record (ignored files are kept)
        Delete { identifier: String },
        /// List files and directories
        Ls {
            #[arg(default_value = "")]
            directory: String,
        },
    }

    pub fn run() -> ExitCode {
        let cli = Cli::parse();
        match execute(cli) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        }
    }

    fn execute(cli: Cli) -> Result<ExitCode> {
        let mut config = SaveConfig::new(&cli.app)
            .with_encoding(TextEncoding::for_label(&cli.encoding)?)
            .with_preferences(cli.prefs);
        if let Some(dir) = &cli.dir {
            config = config.with_base_path(BasePath::custom(dir));
        }
        if let Some(password) = &cli.password {
            config = config.with_encryption(password.clone());
        }

        let save_game = SaveGame::new(config);
        let save_game = match cli.format {
            Format::Json => save_game,
            Format::Pretty => save_game.with_codec(JsonCodec::pretty()),
            Format::Msgpack => save_game.with_codec(MsgPackCodec),
        };

        match cli.command {
            Command::Save { identifier, json } => {
                let value: Value = serde_json::from_str(&json)?;
                save_game.save_with(&identifier, &value, &SaveOptions::default())?;
                log::info!("Saved '{}'", identifier);
            }
            Command::Load { identifier } => match load_record(&save_game, &identifier)? {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => {
                    eprintln!("no record '{}'", identifier);
                    return Ok(ExitCode::FAILURE);
                }
            },
            Command::Exists { identifier } => {
                if !save_game.exists(&identifier)? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Delete { identifier } => save_game.delete(&identifier)?,
            Command::Ls { directory } => {
                for name in save_game.get_directories(&directory)? {
                    println!("{}/", name);
                }
                for name in save_game.get_files(&directory)? {
                    println!("{}", name);
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    /// `None` only when there is no record; a stored `null` is `Some`
    fn load_record(save_game: &SaveGame, identifier: &str) -> Result<Option<Value>> {
        if !save_game.exists(identifier)? {
            return Ok(None);
        }
        save_game.load(identifier).map(Some)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_load_record_null_is_present() {
            let tmp = tempfile::tempdir().unwrap();
            let config = SaveConfig::new("savegame").with_base_path(BasePath::custom(tmp.path()));
            let save_game = SaveGame::new(config);

            save_game.save("null.sav", &Value::Null).unwrap();
            assert_eq!(load_record(&save_game, "null.sav").unwrap(), Some(Value::Null));
            assert_eq!(load_record(&save_game, "missing.sav").unwrap(), None);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm entry point; the CLI is native only
}

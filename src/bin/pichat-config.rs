//! Manage persisted pichat configuration.
//!
//! # Usage
//!
//! ```bash
//! # Store an API key
//! pichat-config --set-key sk-...
//!
//! # Change the interface language
//! pichat-config --set-language zh
//!
//! # Show the current configuration
//! pichat-config --show
//! ```

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use pichat::ConfigStore;

/// Command-line arguments for the pichat-config tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct ConfigArgs {
    /// Store an API key.
    #[arrrg(optional, "Store the given API key", "KEY")]
    set_key: Option<String>,

    /// Store an interface language.
    #[arrrg(optional, "Store the given language code (e.g., en, zh)", "LANG")]
    set_language: Option<String>,

    /// Print the current configuration.
    #[arrrg(flag, "Show the current configuration")]
    show: bool,

    /// Use a config file other than ~/.pichat/config.yaml.
    #[arrrg(optional, "Path to the config file", "PATH")]
    config_path: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = ConfigArgs::from_command_line_relaxed("pichat-config [OPTIONS]");
    if !free.is_empty() {
        eprintln!("unexpected arguments: {}", free.join(" "));
        std::process::exit(1);
    }

    let store = match &args.config_path {
        Some(path) => ConfigStore::at(path.clone()),
        None => ConfigStore::open_default(),
    };

    let mut acted = false;

    if let Some(key) = &args.set_key {
        if key.is_empty() {
            eprintln!("refusing to store an empty API key");
            std::process::exit(1);
        }
        store.set_api_key(key)?;
        println!("API key saved to {}", store.path().display());
        acted = true;
    }

    if let Some(language) = &args.set_language {
        store.set_language(language)?;
        println!("Language set to: {}", language);
        acted = true;
    }

    if args.show || !acted {
        println!("Config file: {}", store.path().display());
        match store.api_key() {
            // Never echo the credential itself.
            Some(_) => println!("API key: (set)"),
            None => println!("API key: (not set)"),
        }
        println!("Language: {}", store.language());
    }

    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "modelchat")]
#[command(
    about = "Terminal chat front-end for several language models",
    long_about = "Terminal chat front-end for several language models\n\nOnly gemini-pro calls a live API; the other models answer with a demo placeholder.\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default lookup path when --config is not provided:\n    1. $XDG_CONFIG_HOME/modelchat/config.toml\n    2. ~/.config/modelchat/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start with this model selected (identifier or display label).
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Print the model catalog and exit.
    #[arg(long)]
    pub list_models: bool,
}

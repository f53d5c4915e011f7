use crate::search::SortKey;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeAction {
    Light,
    Dark,
    /// Switch between light and dark
    Toggle,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start watchtube as a service.
    Daemon {},

    /// Save a video to watch later
    Add {
        /// A youtube link (watch, youtu.be or embed)
        #[clap(allow_hyphen_values = true)]
        url: String,

        /// Video name. Taken from the video title when omitted.
        #[clap(short, long)]
        name: Option<String>,

        /// Video description
        #[clap(short, long)]
        description: Option<String>,

        /// Don't look the title up
        #[clap(long, default_value = "false")]
        no_preview: bool,
    },

    /// List saved videos
    List {
        /// Case-insensitive text matched against name, title and description
        query: Option<String>,

        /// recent or alphabetical
        #[clap(short, long, default_value = "recent")]
        sort: SortKey,

        /// Print the count
        #[clap(short = 'c', long, default_value = "false")]
        count: bool,
    },

    /// Delete a saved video
    Delete {
        id: String,

        /// Auto confirm
        #[clap(short, long, default_value = "false")]
        yes: bool,
    },

    /// Pick the video to play, or show the current one
    Watch { id: Option<String> },

    /// Show the title and thumbnail of a youtube link
    Preview {
        #[clap(allow_hyphen_values = true)]
        url: String,
    },

    /// Show or change the color theme
    Theme {
        #[clap(subcommand)]
        action: Option<ThemeAction>,
    },
}

// Copyright 2025 The studylight Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use studylight_core::error::Fallible;
use studylight_core::services::gateway::GatewayClient;
use studylight_core::types::profile::LearningFormat;

use crate::cmd::catalog::list_content;
use crate::cmd::catalog::list_videos;
use crate::cmd::history::clear_history;
use crate::cmd::history::complete;
use crate::cmd::history::show_history;
use crate::cmd::onboard::run_questionnaire;
use crate::cmd::profile::ProfileChanges;
use crate::cmd::profile::reset_profile;
use crate::cmd::profile::set_profile;
use crate::cmd::profile::show_profile;
use crate::cmd::remote;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::files::DataDirectory;
use crate::serve::server::ServeOptions;
use crate::serve::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the profile, history and `studylight.toml`.
    /// Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the content library in the browser.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Directory with the wasm bundle, served under `/pkg`.
        #[arg(long)]
        assets: Option<String>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Show or change the learning profile.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Set up the profile by answering four questions.
    Onboard,
    /// Show or clear the activity history.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Record a completed lesson.
    Complete {
        /// Id of the lesson in the library.
        content_id: String,
        /// Score, 0 to 100.
        #[arg(long)]
        score: u8,
        /// Minutes spent.
        #[arg(long)]
        minutes: u32,
    },
    /// Ask for a personalised recommendation.
    Recommend,
    /// Take a quiz on a lesson. The score is recorded.
    Quiz {
        /// Id of the lesson in the library.
        content_id: String,
    },
    /// Analyse recent performance.
    Analyze,
    /// Talk to the virtual tutor.
    Chat,
    /// Print progress statistics.
    Stats {
        /// Which format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// List the content library.
    Catalog {
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        format: Option<LearningFormat>,
    },
    /// List the video lessons.
    Videos {
        #[arg(long)]
        subject: Option<String>,
        /// Case-insensitive search over titles, descriptions and tags.
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the profile.
    Show,
    /// Change some preferences.
    Set(ProfileChanges),
    /// Restore the defaults and clear the history.
    Reset,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Print the history, newest first.
    Show,
    /// Delete the history.
    Clear,
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    match cli.command {
        Command::Catalog { topic, format } => list_content(topic.as_deref(), format, &mut stdout()),
        Command::Videos { subject, search } => {
            list_videos(subject.as_deref(), search.as_deref(), &mut stdout())
        }
        Command::Serve {
            port,
            host,
            assets,
            no_open,
        } => {
            let directory = DataDirectory::open(cli.directory)?;
            let config = directory.config()?;
            let options = ServeOptions {
                host,
                port,
                assets: assets.map(PathBuf::from),
                open_browser: !no_open,
            };
            start_server(&config, options).await
        }
        command => {
            let directory = DataDirectory::open(cli.directory)?;
            log::debug!("Using data directory {}", directory.path().display());
            let config = directory.config()?;
            let mut store = directory.store(&config);
            let gateway = GatewayClient::new(&config.gateway);
            match command {
                Command::Profile { command } => match command {
                    ProfileCommand::Show => show_profile(&store, &mut stdout()),
                    ProfileCommand::Set(changes) => set_profile(&mut store, changes),
                    ProfileCommand::Reset => reset_profile(&mut store),
                },
                Command::Onboard => {
                    let stdin = std::io::stdin();
                    match run_questionnaire(&mut stdin.lock(), &mut stdout())? {
                        Some(update) => {
                            store.update_profile(update)?;
                            println!("Profile set up successfully!");
                        }
                        None => println!("Onboarding cancelled; nothing was saved."),
                    }
                    Ok(())
                }
                Command::History { command } => match command {
                    HistoryCommand::Show => show_history(store.history(), &mut stdout()),
                    HistoryCommand::Clear => clear_history(&mut store),
                },
                Command::Complete {
                    content_id,
                    score,
                    minutes,
                } => complete(&mut store, &content_id, score, minutes),
                Command::Recommend => remote::recommend(&gateway, &store).await,
                Command::Quiz { content_id } => remote::quiz(&gateway, &mut store, &content_id).await,
                Command::Analyze => remote::analyze(&gateway, &store).await,
                Command::Chat => remote::chat(&gateway, &store).await,
                Command::Stats { format } => print_stats(store.history(), format, &mut stdout()),
                Command::Serve { .. } | Command::Catalog { .. } | Command::Videos { .. } => Ok(()),
            }
        }
    }
}

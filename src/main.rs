use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use inquire::error::InquireResult;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod eid;
mod form;
mod preview;
mod search;
mod storage;
mod theme;
mod toast;
mod validation;
mod videos;
mod web;
#[cfg(test)]
mod tests;

use app::{App, AppError};
use cli::ThemeAction;
use config::Config;
use form::VideoForm;
use preview::PreviewFetcher;

fn print_toasts(app: &mut App) {
    for toast in app.toasts().drain() {
        eprintln!("[{}] {}", toast.kind, toast.message);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let base_path = config::base_path()?;
    let config = Config::load_with(&base_path)?;
    let storage_mgr = Arc::new(storage::BackendLocal::new(&base_path)?);
    let fetcher = PreviewFetcher::oembed(&config.preview);

    let mut app = App::new(&config, storage_mgr, fetcher)?;

    match args.command {
        cli::Command::Daemon {} => {
            log::info!("starting daemon, base path {base_path}");
            web::start_daemon(app, &config.listen_addr)
        }

        cli::Command::Add {
            url,
            name,
            description,
            no_preview,
        } => {
            let mut form = VideoForm::new();
            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(description) = description {
                form.set_description(description);
            }

            if no_preview {
                let _ = form.set_url(url);
            } else {
                form.autofill_from(url, app.preview_fetcher());
            }

            match app.add_video(&mut form) {
                Ok(video) => {
                    println!("{}", serde_json::to_string_pretty(&video)?);
                    print_toasts(&mut app);
                    Ok(())
                }
                Err(AppError::Validation(errors)) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    bail!("video was not added")
                }
                Err(err) => {
                    print_toasts(&mut app);
                    Err(err.into())
                }
            }
        }

        cli::Command::List { query, sort, count } => {
            let videos = app.view(query.as_deref().unwrap_or_default(), sort);

            if count {
                println!("{} videos found", videos.len());
                return Ok(());
            }

            println!("{}", serde_json::to_string_pretty(&videos)?);
            Ok(())
        }

        cli::Command::Delete { id, yes } => {
            let Some(video) = app.store().get(&id) else {
                println!("no video with id {id}");
                return Ok(());
            };

            if !yes {
                match inquire::prompt_confirmation(format!(
                    "Are you sure you want to delete \"{}\"?",
                    video.display_name()
                )) {
                    InquireResult::Ok(true) => {}
                    InquireResult::Ok(false) => return Ok(()),
                    InquireResult::Err(err) => bail!("An error occurred: {}", err),
                }
            }

            app.delete_video(&id)?;
            print_toasts(&mut app);
            Ok(())
        }

        cli::Command::Watch { id } => {
            let video = match id {
                Some(id) => app.watch(&id)?,
                None => app.now_playing().clone(),
            };

            println!("{}", serde_json::to_string_pretty(&video)?);
            Ok(())
        }

        cli::Command::Preview { url } => {
            let url = url.trim();
            if let Some(message) = validation::validate_video_url(url) {
                bail!(message);
            }

            let Some(video_id) = validation::extract_video_id(url) else {
                bail!("Please enter a valid YouTube URL");
            };

            let preview = app.preview_fetcher().fetch(video_id);
            println!("{}", serde_json::to_string_pretty(&preview)?);
            Ok(())
        }

        cli::Command::Theme { action } => {
            let theme = match action {
                None => app.theme(),
                Some(ThemeAction::Light) => app.set_theme(theme::Theme::Light)?,
                Some(ThemeAction::Dark) => app.set_theme(theme::Theme::Dark)?,
                Some(ThemeAction::Toggle) => app.toggle_theme()?,
            };

            println!("{theme}");
            Ok(())
        }
    }
}

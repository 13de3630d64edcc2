use crate::{AppState, Company, Effect, Msg};

pub const FETCH_ERROR_PREFIX: &str = "Fetch Error: ";
pub const SCRAPE_ERROR_PREFIX: &str = "Scrape failed: ";
pub const CLEANUP_ERROR_PREFIX: &str = "Cleanup Error: ";

/// Pure update function: applies a message to state and returns any effects.
///
/// Whenever the error or success message changes and at least one of them is
/// showing, a fresh message timer is requested. Only the timer carrying the
/// latest generation may clear the messages.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let messages_before = state.messages();
    let expiring = matches!(msg, Msg::MessagesExpired { .. });

    let mut effects = match msg {
        Msg::RefreshRequested => vec![begin_fetch(&mut state, None)],
        Msg::ScrapeClicked(company) => {
            state.set_scraping(company, true);
            state.set_error(None);
            vec![Effect::Scrape { company }]
        }
        Msg::CleanupClicked => {
            state.set_loading(true);
            state.set_error(None);
            vec![Effect::Cleanup]
        }
        Msg::JobsLoaded {
            after_scrape,
            result,
        } => {
            if let Some(company) = after_scrape {
                state.set_scraping(company, false);
            }
            match result {
                Ok(jobs) => state.replace_jobs(jobs),
                Err(reason) => state.set_error(Some(format!("{FETCH_ERROR_PREFIX}{reason}"))),
            }
            state.set_loading(false);
            Vec::new()
        }
        // A successful scrape keeps its control busy until the refresh it
        // triggers has landed.
        Msg::ScrapeFinished { company, result } => match result {
            Ok(added) => {
                state.set_success(Some(format!("Added {added} {company} jobs")));
                vec![begin_fetch(&mut state, Some(company))]
            }
            Err(reason) => {
                state.set_scraping(company, false);
                state.set_error(Some(format!("{SCRAPE_ERROR_PREFIX}{reason}")));
                Vec::new()
            }
        },
        Msg::CleanupFinished(result) => match result {
            Ok(deleted) => {
                state.set_success(Some(format!("Cleaned up {deleted} old jobs")));
                vec![begin_fetch(&mut state, None)]
            }
            Err(reason) => {
                state.set_error(Some(format!("{CLEANUP_ERROR_PREFIX}{reason}")));
                state.set_loading(false);
                Vec::new()
            }
        },
        Msg::MessagesExpired { generation } => {
            if generation == state.message_generation() {
                state.set_error(None);
                state.set_success(None);
            }
            Vec::new()
        }
    };

    if !expiring && state.messages() != messages_before && state.has_messages() {
        let generation = state.next_message_generation();
        effects.push(Effect::ArmMessageExpiry { generation });
    }

    (state, effects)
}

fn begin_fetch(state: &mut AppState, after_scrape: Option<Company>) -> Effect {
    state.set_loading(true);
    state.set_error(None);
    Effect::FetchJobs { after_scrape }
}

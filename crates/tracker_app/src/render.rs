use std::fmt::Write;

use colored::{Color, Colorize};
use tracker_core::{AppViewModel, ControlTarget, ControlView, JobCardView, ListView};

const SPINNER_TEXT: &str = "Loading jobs...";

/// Renders the whole screen as terminal text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, view);
    out
}

fn write_screen(out: &mut String, view: &AppViewModel) -> std::fmt::Result {
    writeln!(out, "{}", view.title.bold().cyan())?;
    writeln!(out, "{}", view.subtitle.dimmed())?;
    writeln!(out)?;

    for control in &view.controls {
        write_control(out, control)?;
    }
    writeln!(out)?;

    if let Some(error) = &view.error {
        writeln!(out, "{} {}", "!".red().bold(), error.red())?;
    }
    if let Some(success) = &view.success {
        writeln!(out, "{} {}", "*".green().bold(), success.green())?;
    }

    match &view.body {
        ListView::Loading => writeln!(out, "{}", SPINNER_TEXT.yellow())?,
        ListView::Empty => writeln!(out, "{}", tracker_core::EMPTY_STATE_TEXT.dimmed())?,
        ListView::Cards(cards) => {
            writeln!(out, "{} jobs", cards.len())?;
            for card in cards {
                write_card(out, card)?;
            }
        }
    }
    Ok(())
}

fn write_control(out: &mut String, control: &ControlView) -> std::fmt::Result {
    let hint = match control.target {
        ControlTarget::Scrape(company) => format!("scrape {}", company.id()),
        ControlTarget::Cleanup => "cleanup".to_string(),
    };
    let button = format!("[ {} ]", control.label);
    if control.enabled {
        writeln!(out, "  {:<34} {}", button, hint.dimmed())
    } else {
        writeln!(out, "  {}", button.dimmed())
    }
}

fn write_card(out: &mut String, card: &JobCardView) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(
        out,
        "{}  {}",
        card.title.bold(),
        format!("[{}]", card.company).color(badge_color(&card.company_class))
    )?;
    writeln!(out, "    Location: {}", card.location)?;
    writeln!(out, "    Posted: {}", card.posted)?;
    if let Some(link) = &card.link {
        writeln!(out, "    View Job: {}", link.underline())?;
    }
    Ok(())
}

fn badge_color(company_class: &str) -> Color {
    match company_class {
        "microsoft" => Color::Blue,
        "brex" => Color::Yellow,
        "jobber" => Color::Green,
        "notion" => Color::White,
        "intercom" => Color::Cyan,
        "zoominfo" => Color::Red,
        "circleci" => Color::Magenta,
        _ => Color::BrightBlack,
    }
}

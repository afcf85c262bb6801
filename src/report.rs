//! Plain text rendering of API records, for the non-interactive commands.

use std::fmt::Write;

use crate::aggregate::{EgotProgress, EgotStatus, compute_egot_status, group_awards_by_type};
use crate::api::ApiError;
use crate::model::{Award, AwardType, Celebrity, CelebrityBasic, CelebrityWithProgress, OscarCeremony};

const ABSENT: char = '·';

fn badges(won: impl Fn(AwardType) -> bool) -> String {
    AwardType::EGOT_ORDER
        .into_iter()
        .map(|k| if won(k) { k.letter() } else { ABSENT })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line summary of an EGOT status, e.g. `E G · T  3/4  missing Oscar`
pub fn status_line(status: &EgotStatus) -> String {
    let mut line = format!("{}  {}/4", badges(|k| status.has(k)), status.count);
    match EgotProgress::classify(status) {
        EgotProgress::Egot => line.push_str("  EGOT"),
        EgotProgress::CloseToEgot { missing } => {
            let _ = write!(line, "  missing {missing}");
        }
        EgotProgress::Partial(_) | EgotProgress::NoWins => {}
    }
    line
}

fn award_line(award: &Award) -> String {
    let year = match award.known_year() {
        Some(year) => year.to_string(),
        None => String::from("----"),
    };
    let badge = if award.is_winner { "Winner" } else { "Nominee" };
    let mut line = format!("  {year}  {badge:<7}  {}", award.category);
    if let Some(work) = &award.work {
        let _ = write!(line, " - {work}");
    }
    if award.is_upcoming == Some(true) {
        line.push_str(" (upcoming)");
    }
    line
}

/// A celebrity's status followed by their awards, grouped by type
pub fn celebrity_report(celebrity: &Celebrity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", celebrity.name);
    let _ = writeln!(out, "{}", status_line(&compute_egot_status(&celebrity.awards)));
    if let Some(summary) = celebrity.summary.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "{summary}");
    }

    let groups = group_awards_by_type(&celebrity.awards);
    if groups.is_empty() {
        let _ = writeln!(out, "\nNo awards recorded");
    }
    for (kind, awards) in groups.iter() {
        let wins = awards.iter().filter(|a| a.is_winner).count();
        let _ = writeln!(out, "\n{kind} ({wins}/{} won)", awards.len());
        for award in awards {
            let _ = writeln!(out, "{}", award_line(award));
        }
    }
    out
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0)
}

/// Celebrities with their won types, one per line
pub fn progress_listing(celebrities: &[CelebrityWithProgress]) -> String {
    let width = name_width(celebrities.iter().map(|c| c.name.as_str()));
    let mut out = String::new();
    for celebrity in celebrities {
        let _ = write!(
            out,
            "{:<width$}  {}  {}/4",
            celebrity.name,
            badges(|k| celebrity.has_won(k)),
            celebrity.egot_win_count
        );
        if let Some(missing) = celebrity.missing_award() {
            let _ = write!(out, "  missing {missing}");
        }
        out.push('\n');
    }
    out
}

/// Celebrities without wins, one per line
pub fn basic_listing(celebrities: &[CelebrityBasic]) -> String {
    let mut out = String::new();
    for celebrity in celebrities {
        let _ = writeln!(out, "{}", celebrity.name);
    }
    out
}

/// A ceremony with its categories, winners marked with `*`
pub fn ceremony_report(ceremony: &OscarCeremony) -> String {
    let mut out = ceremony.title();
    if let Some(date) = ceremony.ceremony_date {
        let _ = write!(out, "  {}", date.format("%B %-d, %Y"));
    }
    out.push_str(if ceremony.is_complete {
        "  (complete)\n"
    } else {
        "  (in progress)\n"
    });

    for category in ceremony.sorted_categories() {
        let _ = writeln!(out, "\n{}", category.name);
        let mut nominees: Vec<_> = category.nominees.iter().collect();
        nominees.sort_by_key(|n| n.display_order);
        for nominee in nominees {
            let mark = if nominee.is_winner { '*' } else { ' ' };
            let _ = write!(out, "  {mark} {}", nominee.name);
            if let Some(work) = nominee.work_title.as_deref().filter(|w| !w.is_empty()) {
                let _ = write!(out, " - {work}");
            }
            out.push('\n');
        }
    }
    out
}

/// Ceremony years, most recent first
pub fn years_listing(years: &[i32]) -> String {
    let mut years = years.to_vec();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years.iter().map(|y| format!("{y}\n")).collect()
}

/// An error with the hint telling the user what to do
pub fn error_report(error: &ApiError) -> String {
    format!("{error}\n{}\n", error.user_hint())
}

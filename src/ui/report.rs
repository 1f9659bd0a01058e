//! Turns engine outcomes into sink messages.

use crate::core::attendance::{
    Progress, ToggleOutcome, Toggled, Weekly, WeeklyReport, weekday_label,
};
use crate::core::sweep::SweepReport;
use crate::db::ledger::Stamp;
use crate::models::country::greeting;
use crate::ui::sink::{Emphasis, Sink};
use crate::utils::formatting::hm;
use chrono::{Duration, NaiveDateTime};

pub const START_MESSAGE: &str = "Waiting for input from the RFID reader.\n";
pub const GOOD_NIGHT_MESSAGE: &str = "Closed for the night. Sleep tight. Zzz...\n";
pub const AUTO_LOGOUT_NOTICE: &str = "Seems like you were automatically logged out last time.\n";
pub const NOT_ASSIGNED: &str = "This tag isn't assigned to anyone.\n";
pub const COUNTRY_WARNING: &str = "Faulty country entry in the database.\n";
pub const OUTSIDE_HOURS: &str = "You're not allowed to log in in the middle of the night.\n";

pub fn progress_emphasis(p: Progress) -> Emphasis {
    match p {
        Progress::Ahead => Emphasis::Success,
        Progress::OnTrack => Emphasis::Warning,
        Progress::Behind => Emphasis::Error,
    }
}

pub fn progress_label(p: Progress) -> &'static str {
    match p {
        Progress::Ahead => "ahead",
        Progress::OnTrack => "on track",
        Progress::Behind => "behind",
    }
}

/// Date line plus the waiting message, after a screen clear.
pub fn render_start<S: Sink>(sink: &mut S, now: NaiveDateTime) {
    sink.say(Emphasis::Time, format!("{}\n", now.format("%A %-d %B %Y %H:%M")));
    sink.say(Emphasis::Normal, START_MESSAGE);
}

pub fn render_outside_hours<S: Sink>(sink: &mut S) {
    sink.say(Emphasis::Error, format!("\n{OUTSIDE_HOURS}"));
}

pub fn render_toggle<S: Sink>(sink: &mut S, outcome: &ToggleOutcome) {
    sink.say(Emphasis::Normal, "\n");

    match outcome {
        ToggleOutcome::UnknownTag {
            serial, inserted, ..
        } => {
            if *inserted {
                sink.say(
                    Emphasis::Normal,
                    "Previously unknown tag inserted into database.\nAssigned serial number: ",
                );
                sink.say(Emphasis::Name, format!("{serial}\n\n"));
            }
            sink.say(Emphasis::Error, NOT_ASSIGNED);
        }
        ToggleOutcome::Unassigned { .. } => {
            sink.say(Emphasis::Error, NOT_ASSIGNED);
        }
        ToggleOutcome::Toggled(t) => render_toggled(sink, t),
    }
}

fn render_toggled<S: Sink>(sink: &mut S, t: &Toggled) {
    let greet = greeting(t.country, t.logged_in());

    sink.say(Emphasis::Name, t.name.clone());
    match t.stamp {
        Stamp::Ledger(at) => {
            sink.say(Emphasis::Normal, format!(" logged {} on ", t.status.in_or_out()));
            sink.say(Emphasis::Time, format!("{}.", at.format("%H:%M:%S")));
            sink.say(Emphasis::Normal, format!(" {greet}\n"));
        }
        Stamp::Local(_) => {
            sink.say(
                Emphasis::Normal,
                format!(" logged {}. {greet}\n", t.status.in_or_out()),
            );
            sink.say(
                Emphasis::Error,
                "Somehow failed to get time and date from the database.\n",
            );
        }
    }

    render_week_outcome(sink, &t.weekly);

    if t.auto_logout_notice {
        sink.say(Emphasis::Error, AUTO_LOGOUT_NOTICE);
    }
}

/// Weekly report, or why there is none.
pub fn render_week_outcome<S: Sink>(sink: &mut S, weekly: &Weekly) {
    match weekly {
        Weekly::UnknownCountry(_) => {
            sink.say(Emphasis::Error, COUNTRY_WARNING);
        }
        Weekly::Failed(reason) => {
            sink.say(
                Emphasis::Error,
                format!("Could not compute your week so far: {reason}\n"),
            );
        }
        Weekly::Report(report) => {
            sink.say(Emphasis::Normal, "Your week so far:\n\n");
            render_weekly(sink, report);
        }
    }
}

fn cell(d: Duration) -> String {
    format!("{:>7}", hm(d))
}

/// Monday–Friday grid (goal / done) followed by the week summary.
pub fn render_weekly<S: Sink>(sink: &mut S, report: &WeeklyReport) {
    let mut header = String::from("      |");
    let mut rule = String::from("------+");
    for d in &report.days {
        header.push_str(&format!("   {}   |", weekday_label(d.day)));
        rule.push_str("---------+");
    }
    header.push_str(" Total\n");
    rule.push_str("---------\n");
    sink.say(Emphasis::Normal, header);
    sink.say(Emphasis::Normal, rule);

    let mut goal = String::from(" Goal ");
    for d in &report.days {
        goal.push_str(&format!("| {} ", cell(d.norm)));
    }
    goal.push_str(&format!("| {}\n", cell(report.week_norm)));
    sink.say(Emphasis::Normal, goal);

    sink.say(Emphasis::Normal, " Done ");
    for d in &report.days {
        sink.say(Emphasis::Normal, "|");
        let mark = if d.kicked { '"' } else { ' ' };
        let text = format!("{mark}{}{mark}", cell(d.done));
        let emphasis = d.progress.map(progress_emphasis).unwrap_or(Emphasis::Normal);
        sink.say(emphasis, text);
    }
    sink.say(Emphasis::Normal, "|");
    sink.say(
        progress_emphasis(report.progress),
        format!(" {}\n\n", cell(report.accumulated)),
    );

    sink.say(Emphasis::Normal, "Worked ");
    sink.say(progress_emphasis(report.progress), hm(report.accumulated));
    sink.say(
        Emphasis::Normal,
        format!(
            " of {} this week ({} so far: {}).\n",
            hm(report.week_norm),
            progress_label(report.progress),
            hm(report.norm_to_date)
        ),
    );
}

pub fn render_sweep<S: Sink>(sink: &mut S, report: &SweepReport) {
    sink.say(Emphasis::Highlight, "Closing time!\n\n");

    for f in &report.logged_out {
        sink.say(Emphasis::Name, f.name.clone());
        sink.say(Emphasis::Normal, " was automatically logged out on ");
        sink.say(
            Emphasis::Time,
            format!("{}.\n", f.stamp.time().format("%Y-%m-%d %H:%M:%S")),
        );
    }

    if !report.skipped.is_empty() {
        sink.say(
            Emphasis::Warning,
            format!(
                "{} user(s) changed status during the sweep and were left alone.\n",
                report.skipped.len()
            ),
        );
    }

    sink.say(Emphasis::Normal, "\n");
    sink.say(Emphasis::Highlight, GOOD_NIGHT_MESSAGE);
}

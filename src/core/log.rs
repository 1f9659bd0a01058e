use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use std::sync::OnceLock;

const OP_TARGET_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<regex::Regex> = OnceLock::new();
    let re = ANSI.get_or_init(|| {
        regex::Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern is valid")
    });
    re.replace_all(s, "").into_owned()
}

/// Color of the operation column
fn color_for_operation(op: &str) -> Colour {
    match op {
        "toggle" => Colour::Green,
        "sweep" => Colour::Red,
        "admin" => Colour::Yellow,
        "tag" | "user" => Colour::Cyan,
        "holiday" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `op (target)`, cut to `width` visible characters.
fn op_target_cell(operation: &str, target: &str, width: usize) -> String {
    let visible = if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    };

    let truncated = if visible.chars().count() > width {
        let mut s: String = visible.chars().take(width.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    // only the operation word is colored
    let colour = color_for_operation(operation);
    let colored = match truncated.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", colour.paint(op_word), rest),
        None => colour.paint(truncated.as_str()).to_string(),
    };

    let padding = " ".repeat(width.saturating_sub(strip_ansi(&colored).chars().count()));
    format!("{colored}{padding}")
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool, limit: Option<usize>) -> AppResult<()> {
        let entries = load_log(&pool.conn, limit)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| {
                let extra = if e.target.is_empty() { 0 } else { e.target.len() + 3 };
                e.operation.len() + extra
            })
            .max()
            .unwrap_or(10)
            .min(OP_TARGET_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");

        for e in entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(e.date);

            println!(
                "{:>id_w$}: {:<19} | {} => {}",
                e.id,
                date,
                op_target_cell(&e.operation, &e.target, op_w),
                e.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}

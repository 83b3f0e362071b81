use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI colour for each audited operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "login" => Colour::Green,
        "logout" => Colour::Red,
        "break_start" | "break_end" => Colour::Yellow,
        "send" => Colour::Cyan,
        "export" => Colour::Blue,
        "register" => Colour::RGB(255, 153, 51),
        "init" | "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn load(pool: &mut DbPool) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    /// Print the audit trail, optionally limited to the `last` newest lines.
    pub fn print_log(pool: &mut DbPool, last: Option<usize>) -> AppResult<()> {
        let mut entries = Self::load(pool)?;
        if let Some(n) = last {
            let skip = entries.len().saturating_sub(n);
            entries.drain(..skip);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let painted: Vec<String> = entries
            .iter()
            .map(|e| {
                let op = color_for_operation(&e.operation).paint(e.operation.as_str());
                if e.target.is_empty() {
                    op.to_string()
                } else {
                    format!("{} ({})", op, e.target)
                }
            })
            .collect();

        let op_w = painted
            .iter()
            .map(|p| strip_ansi(p).chars().count())
            .max()
            .unwrap_or(10)
            .min(60);
        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (e, op_target) in entries.iter().zip(painted) {
            let visible = strip_ansi(&op_target).chars().count();
            let padding = " ".repeat(op_w.saturating_sub(visible));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                op_target,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

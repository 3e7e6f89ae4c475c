//! Terminal output for tasks and notifications

use colored::*;
use tracing::debug;

use crate::domain::{Filter, FilterCounts, Task};
use crate::notify::{Level, Notification};

/// Colours for the selected light/dark preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub dark: bool,
}

impl Palette {
    pub fn for_theme(dark: bool) -> Self {
        Self { dark }
    }

    fn accent(&self, text: &str) -> ColoredString {
        if self.dark { text.bright_cyan() } else { text.blue() }
    }

    fn muted(&self, text: &str) -> ColoredString {
        if self.dark { text.bright_black() } else { text.dimmed() }
    }

    fn done(&self, text: &str) -> ColoredString {
        if self.dark {
            text.bright_green()
        } else {
            text.green()
        }
    }
}

/// One line per task: check box, id, title
pub fn task_line(task: &Task, palette: &Palette) -> String {
    let check = if task.completed {
        palette.done("[x]").to_string()
    } else {
        "[ ]".to_string()
    };
    let title = if task.completed {
        palette.muted(&task.title).strikethrough().to_string()
    } else {
        task.title.clone()
    };
    format!("{} {:>4}  {}", check, palette.accent(&task.id.to_string()), title)
}

/// Full view of one task
pub fn task_detail(task: &Task, palette: &Palette) -> String {
    let status = if task.completed {
        palette.done("completed").to_string()
    } else {
        "active".to_string()
    };
    let mut out = format!(
        "{} {}\n  {} {}\n  {} {}\n",
        palette.accent(&format!("#{}", task.id)),
        task.title.bold(),
        palette.muted("status: "),
        status,
        palette.muted("created:"),
        task.created_at.format("%Y-%m-%d %H:%M UTC"),
    );
    if let Some(description) = &task.description {
        out.push('\n');
        for line in description.lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}

/// Filter tabs with their counts; the active one is highlighted
pub fn counts_line(counts: &FilterCounts, active: Filter, palette: &Palette) -> String {
    debug!(?counts, %active, "counts_line: called");
    [Filter::All, Filter::Active, Filter::Completed]
        .into_iter()
        .map(|filter| {
            let label = format!("{} ({})", capitalize(&filter.to_string()), counts.get(filter));
            if filter == active {
                palette.accent(&label).bold().to_string()
            } else {
                palette.muted(&label).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn notification_line(notification: &Notification) -> String {
    match notification.level {
        Level::Success => format!("{} {}", "✓".green(), notification.message.green()),
        Level::Error => format!("{} {}", "✗".red(), notification.message.red()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use chrono::{TimeZone, Utc};

    fn plain() {
        colored::control::set_override(false);
    }

    fn task(id: u64, completed: bool) -> Task {
        Task {
            id: TaskId::Number(id),
            title: "Buy milk".to_string(),
            description: Some("2 liters\nsemi-skimmed".to_string()),
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_task_line() {
        plain();
        let palette = Palette::for_theme(false);
        assert_eq!(task_line(&task(7, false), &palette), "[ ]    7  Buy milk");
        assert_eq!(task_line(&task(12, true), &palette), "[x]   12  Buy milk");
    }

    #[test]
    fn test_task_detail_includes_description() {
        plain();
        let detail = task_detail(&task(7, true), &Palette::for_theme(true));
        assert!(detail.starts_with("#7 Buy milk\n"));
        assert!(detail.contains("completed"));
        assert!(detail.contains("2024-03-05 09:30 UTC"));
        assert!(detail.contains("  semi-skimmed\n"));
    }

    #[test]
    fn test_counts_line() {
        plain();
        let tasks = vec![task(1, false), task(2, true), task(3, false)];
        let line = counts_line(&FilterCounts::of(&tasks), Filter::Active, &Palette::for_theme(false));
        assert_eq!(line, "All (3)  Active (2)  Completed (1)");
    }

    #[test]
    fn test_notification_line() {
        plain();
        assert_eq!(
            notification_line(&Notification::error("Task not found")),
            "✗ Task not found"
        );
        assert_eq!(
            notification_line(&Notification::success("Task deleted successfully")),
            "✓ Task deleted successfully"
        );
    }
}

//! Digest rendering: subject line, plain text, and HTML bodies.

use std::fmt::Write;

use crate::model::Task;

use super::{Digest, Urgency};

/// Reminder banner course, named in the Monday subject and banner.
const REMINDER_COURSE: &str = "BioE 210";

impl Digest {
    pub fn subject(&self) -> String {
        let day = self.now.strftime("%a %b %d");
        let soon = self.due_within_day();
        if self.is_monday && !self.due_today.is_empty() {
            format!("Monday reminder: {REMINDER_COURSE} due today! {day}")
        } else if soon > 0 {
            format!("{soon} assignment(s) due within 24h - {day}")
        } else {
            format!("Daily DDL Digest - {day} ({} pending)", self.tasks.len())
        }
    }

    pub fn render_text(&self, dashboard_url: Option<&str>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Daily DDL Digest - {}", self.now.strftime("%A, %b %d"));
        let _ = writeln!(
            out,
            "{} pending, {} due within 24h",
            self.tasks.len(),
            self.due_within_day()
        );

        if self.is_monday {
            out.push('\n');
            let _ = writeln!(out, "** It's Monday: {REMINDER_COURSE} work is due today. **");
            if self.due_today.is_empty() {
                let _ = writeln!(out, "   (nothing outstanding)");
            }
            for task in &self.due_today {
                let _ = writeln!(out, "   - {} ({})", task.title, self.due_label(task));
            }
        }

        for (heading, tasks) in self.sections() {
            out.push('\n');
            let _ = writeln!(out, "{heading}");
            if tasks.is_empty() {
                let _ = writeln!(out, "  Nothing here!");
            }
            for task in tasks {
                let _ = writeln!(
                    out,
                    "  [{}] {}  {}  {}  ({})  {}",
                    task.course,
                    task.title,
                    self.due_label(task),
                    self.urgency(task).label(),
                    task.platform,
                    task.id
                );
            }
        }

        out.push('\n');
        let _ = writeln!(out, "Done with something? Run `ddl complete <id>`.");
        if let Some(url) = dashboard_url {
            let _ = writeln!(
                out,
                "Dashboard: {url} (check-offs there stay in your browser)"
            );
        }
        out
    }

    pub fn render_html(&self, dashboard_url: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head>\n");
        out.push_str("<body style=\"font-family:-apple-system,'Segoe UI',sans-serif;\">\n");
        let _ = writeln!(
            out,
            "<h1>Daily DDL Digest - {}</h1>",
            escape(&self.now.strftime("%A, %b %d").to_string())
        );
        let _ = writeln!(
            out,
            "<p>{} pending &middot; {} due within 24h</p>",
            self.tasks.len(),
            self.due_within_day()
        );

        if self.is_monday {
            out.push_str(
                "<div style=\"background:#fff5f5;border-left:4px solid #e53e3e;padding:12px;\">\n",
            );
            let _ = writeln!(
                out,
                "<strong>It's Monday!</strong> {REMINDER_COURSE} work is due today.",
            );
            if !self.due_today.is_empty() {
                out.push_str("<ul>\n");
                for task in &self.due_today {
                    let _ = writeln!(
                        out,
                        "<li>{} ({})</li>",
                        escape(&task.title),
                        self.due_label(task)
                    );
                }
                out.push_str("</ul>\n");
            }
            out.push_str("</div>\n");
        }

        for (heading, tasks) in self.sections() {
            let _ = writeln!(out, "<h2>{heading}</h2>");
            if tasks.is_empty() {
                out.push_str("<p style=\"color:#a0aec0;\">Nothing here!</p>\n");
                continue;
            }
            out.push_str("<table style=\"width:100%;border-collapse:collapse;\">\n");
            out.push_str(
                "<tr><th align=\"left\">Assignment</th><th align=\"left\">Course</th>\
                 <th align=\"left\">Urgency</th><th align=\"left\">Due (CT)</th>\
                 <th align=\"left\">Platform</th></tr>\n",
            );
            for task in tasks {
                let urgency = self.urgency(task);
                let _ = writeln!(
                    out,
                    "<tr><td>{}<br><code style=\"color:#a0aec0;\">{}</code></td><td>{}</td>\
                     <td style=\"color:{};font-weight:600;\">{}</td><td>{}</td><td>{}</td></tr>",
                    title_cell(task),
                    escape(&task.id),
                    task.course,
                    color(urgency),
                    urgency.label(),
                    self.due_label(task),
                    task.platform
                );
            }
            out.push_str("</table>\n");
        }

        out.push_str("<p>Done with something? Run <code>ddl complete &lt;id&gt;</code>.</p>\n");
        if let Some(url) = dashboard_url {
            let _ = writeln!(
                out,
                "<p>Open the <a href=\"{}\">dashboard</a>. Check-offs there stay in your browser.</p>",
                escape(url)
            );
        }
        out.push_str("</body></html>\n");
        out
    }

    fn sections(&self) -> Vec<(&'static str, Vec<&Task>)> {
        let mut sections = Vec::new();
        let overdue = self.overdue();
        if !overdue.is_empty() {
            sections.push(("Overdue", overdue));
        }
        sections.push(("Due this week", self.this_week()));
        sections.push(("Coming up later", self.later()));
        sections
    }

    fn urgency(&self, task: &Task) -> Urgency {
        Urgency::between(task.due_at, self.now.timestamp())
    }

    fn due_label(&self, task: &Task) -> String {
        task.due_at
            .to_zoned(self.now.time_zone().clone())
            .strftime("%b %d, %H:%M")
            .to_string()
    }
}

fn color(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Overdue | Urgency::Hours(_) => "#e53e3e",
        Urgency::Tomorrow | Urgency::Days(..=3) => "#dd6b20",
        Urgency::Days(4..=7) => "#d69e2e",
        Urgency::Days(_) => "#38a169",
    }
}

/// The task title, linked to its submission page when it has one.
fn title_cell(task: &Task) -> String {
    match &task.url {
        Some(url) => format!(
            "<a href=\"{}\" style=\"color:#3182ce;text-decoration:none;\">{}</a>",
            escape(url),
            escape(&task.title)
        ),
        None => escape(&task.title),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

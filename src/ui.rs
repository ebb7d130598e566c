use console::{strip_ansi_codes, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::error::{Result, TrackError};

/// Enhanced UI utilities
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    /// Print a success message (color only if supported)
    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    /// Print an error message (color only if supported)
    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    /// Print a warning message (color only if supported)
    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    /// Print an info message (color only if supported)
    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    /// Format authentication status with appropriate color (if supported)
    pub fn format_auth_status(&self, authenticated: bool, expired: bool) -> String {
        let text = if authenticated {
            "Authenticated"
        } else if expired {
            "Session expired"
        } else {
            "Not authenticated"
        };

        if self.supports_color() {
            if authenticated {
                text.green().to_string()
            } else if expired {
                text.yellow().to_string()
            } else {
                text.red().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Format a possibly-missing field with a dash fallback
    pub fn format_user_field(&self, value: Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => "-".to_string(),
        }
    }

    /// Print a blank line for spacing
    pub fn blank_line(&self) {
        println!();
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        let term_width = self.width();
        let title_len = title.len() + 4; // 2 spaces on each side
        let line_len = if term_width > title_len {
            (term_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len.min(30));
        let supports_color = self.supports_color();

        println!();
        if supports_color {
            println!("{} {} {}", line.cyan(), title.cyan().bold(), line.cyan());
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    /// Print a separator line
    pub fn separator(&self) {
        let width = self.width();
        let line = "─".repeat(width.min(80));
        if self.supports_color() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    /// Print a status with colored indicator (no icons, color only if supported)
    pub fn status(&self, label: &str, status: &str, is_good: bool) {
        if self.supports_color() {
            if is_good {
                println!("{}: {}", label.bold(), status.green());
            } else {
                println!("{}: {}", label.bold(), status.red());
            }
        } else {
            println!("{}: {}", label, status);
        }
    }

    /// Create a card-style display for information
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let term_width = self.width();
        let card_width = term_width
            .saturating_sub(4) // Leave more space for terminal margins
            .clamp(50, 80); // Minimum and maximum width

        let supports_color = self.supports_color();

        // Card header
        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_width = title.width();
        let title_spaces = card_width.saturating_sub(title_width + 4);
        if supports_color {
            println!("│ {} {}│", title.cyan().bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        // Card content
        for (label, value) in content {
            // Strip ANSI codes for width calculations
            let label_plain = strip_ansi_codes(label);
            let value_plain = strip_ansi_codes(&value);

            let label_width = label_plain.width();
            let value_width = value_plain.width();
            let content_width = label_width + value_width + 4; // ": " + 2 spaces padding

            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1 // At least one space
            };

            if supports_color {
                println!("│ {}: {}{}│", label.dimmed(), value, " ".repeat(spaces));
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        // Card footer
        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    /// Print a plain column-aligned table with a header row.
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(strip_ansi_codes(cell).width());
                }
            }
        }

        let render_row = |cells: Vec<String>| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let pad = widths
                        .get(i)
                        .copied()
                        .unwrap_or(0)
                        .saturating_sub(strip_ansi_codes(cell).width());
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
        };

        let header_line = render_row(headers.iter().map(|h| h.to_string()).collect());
        if self.supports_color() {
            println!("{}", header_line.bold());
        } else {
            println!("{}", header_line);
        }
        println!("{}", "─".repeat(widths.iter().sum::<usize>() + widths.len() * 2));

        for row in rows {
            println!("{}", render_row(row.clone()));
        }
        println!();
    }

    /// Proportional horizontal bar for the statistics view.
    pub fn bar(&self, label: &str, count: u32, max: u32) {
        const BAR_WIDTH: usize = 30;
        let filled = if max == 0 {
            0
        } else {
            (count as usize * BAR_WIDTH) / max as usize
        };
        let bar: String = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);

        if self.supports_color() {
            println!("{:<18} {} {}", label, bar.cyan(), count);
        } else {
            println!("{:<18} {} {}", label, bar, count);
        }
    }

    /// Ask for confirmation before a destructive action.
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| TrackError::internal(format!("confirmation prompt failed: {}", e)))
    }

    /// Prompt for a line of input.
    pub fn input(&self, prompt: &str) -> Result<String> {
        Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| TrackError::internal(format!("input prompt failed: {}", e)))
    }

    /// Prompt for a password without echo.
    pub fn password(&self, prompt: &str) -> Result<String> {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact()
            .map_err(|e| TrackError::internal(format!("password prompt failed: {}", e)))
    }

    /// Get terminal width for responsive layout
    pub fn width(&self) -> usize {
        let width = self.term.size().1 as usize;
        if width == 0 {
            80
        } else {
            width
        }
    }

    /// Check if terminal supports color
    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

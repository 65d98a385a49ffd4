//! Terminal rendering for the report CLI.

use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

pub fn get_styles() -> Styles {
    let bold = |color: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(color)));
    Styles::styled()
        .usage(bold(AnsiColor::Cyan).underline())
        .header(bold(AnsiColor::Cyan).underline())
        .literal(bold(AnsiColor::Green))
        .invalid(bold(AnsiColor::Red))
        .error(bold(AnsiColor::Red))
        .valid(bold(AnsiColor::Green))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

/// Colors by role.
pub mod colors {
    use crossterm::style::Color;

    const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::Rgb { r, g, b }
    }

    pub const FRAME: Color = rgb(0, 255, 255);
    pub const HIGHLIGHT: Color = rgb(255, 0, 255);
    pub const LABEL: Color = rgb(180, 100, 255);
    pub const OK: Color = rgb(0, 255, 136);
    pub const WARN: Color = rgb(255, 165, 0);
    pub const FAIL: Color = rgb(255, 85, 85);
    pub const MUTED: Color = rgb(128, 128, 128);
    pub const TEXT: Color = rgb(255, 255, 255);
}

const H: &str = "─";
const V: &str = "│";
const SELECTED: &str = "●";
const UNSELECTED: &str = "○";
const DIAMOND: &str = "◆";
const BAR: &str = "█";

fn print_status(mark: &str, color: CtColor, message: &str) {
    println!(" {} {}", mark.with(color).bold(), message.with(color));
}

pub fn print_success(message: &str) {
    print_status("✓", colors::OK, message);
}

pub fn print_error(message: &str) {
    print_status("✗", colors::FAIL, message);
}

pub fn print_warning(message: &str) {
    print_status("⚠", colors::WARN, message);
}

const SECTION_WIDTH: usize = 60;

/// Top border with the title centered, as wide as `section_bottom()`.
fn section_top(title: &str) -> String {
    let fill = SECTION_WIDTH.saturating_sub(title.width() + 2);
    let left = fill / 2;
    format!("╭{} {} {}╮", H.repeat(left), title, H.repeat(fill - left))
}

fn section_bottom() -> String {
    format!("╰{}╯", H.repeat(SECTION_WIDTH))
}

pub fn print_section_header(title: &str) {
    println!();
    println!(
        "{}",
        section_top(title)
            .with(colors::FRAME)
            .bold()
            .attribute(Attribute::Italic)
    );
}

pub fn print_section_footer() {
    println!("{}", section_bottom().with(colors::FRAME));
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        SELECTED.with(colors::LABEL),
        format!("{}:", key).with(colors::MUTED),
        value.with(colors::TEXT)
    );
}

/// Headline counters of a report.
pub fn print_key_value_highlight(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        DIAMOND.with(colors::HIGHLIGHT),
        format!("{}:", key).with(colors::FRAME).bold(),
        value.with(colors::OK).bold()
    );
}

/// Prints a dimension's candidates, marking the selected ones.
pub fn print_choices(label: &str, candidates: &[String], selected: &[String]) {
    println!("  {} {}", DIAMOND.with(colors::LABEL), label.with(colors::LABEL).bold());
    if candidates.is_empty() {
        print_empty_list("no values available");
        return;
    }
    for candidate in candidates {
        let (mark, color) = if selected.contains(candidate) {
            (SELECTED.with(colors::OK), colors::TEXT)
        } else {
            (UNSELECTED.with(colors::MUTED), colors::MUTED)
        };
        println!("      {} {}", mark, candidate.as_str().with(color));
    }
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        UNSELECTED.with(colors::MUTED),
        message.with(colors::MUTED).attribute(Attribute::Italic)
    );
}

const BAR_WIDTH: usize = 30;

/// Length of a bar for `count` when `max` fills the whole width.
/// Non-zero counts always get at least one cell.
pub fn bar_length(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    ((count * width) / max).max(1)
}

pub fn print_bars(entries: &[(String, usize)], color: CtColor) {
    let max = entries.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let label_width = entries.iter().map(|(label, _)| label.width()).max().unwrap_or(0);

    for (label, count) in entries {
        println!(
            "  {}{}  {} {}",
            label.as_str().with(colors::TEXT),
            " ".repeat(label_width.saturating_sub(label.width())),
            BAR.repeat(bar_length(*count, max, BAR_WIDTH)).with(color),
            count.to_string().with(colors::MUTED)
        );
    }
}

/// Boxed table, rendered as plain lines and colored when printed.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        TableBuilder {
            col_widths: headers.iter().map(|h| h.width()).collect(),
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    /// Cells past the last header are ignored.
    pub fn add_row(&mut self, mut row: Vec<String>) {
        row.truncate(self.headers.len());
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn border(&self, left: &str, junction: &str, right: &str) -> String {
        let segments: Vec<String> = self.col_widths.iter().map(|w| H.repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(junction), right)
    }

    fn line(&self, cells: &[String]) -> String {
        let padded: Vec<String> = self
            .col_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!(" {}{} ", cell, " ".repeat(width - cell.width()))
            })
            .collect();
        format!("{}{}{}", V, padded.join(V), V)
    }

    fn render(&self) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }
        let mut lines = vec![
            self.border("╭", "┬", "╮"),
            self.line(&self.headers),
            self.border("├", "┼", "┤"),
        ];
        lines.extend(self.rows.iter().map(|row| self.line(row)));
        lines.push(self.border("╰", "┴", "╯"));
        lines
    }

    pub fn print(&self) {
        let lines = self.render();
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.into_iter().enumerate() {
            match i {
                1 => println!("{}", line.with(colors::FRAME).bold()),
                0 | 2 => println!("{}", line.with(colors::FRAME)),
                _ if i == last => println!("{}", line.with(colors::FRAME)),
                _ => println!("{}", line.with(colors::TEXT)),
            }
        }
    }
}

pub fn get_prompt() -> String {
    format!(
        "{}{}{} ",
        "❯".with(colors::FRAME).bold(),
        "❯".with(colors::LABEL).bold(),
        "❯".with(colors::HIGHLIGHT).bold(),
    )
}

pub fn print_welcome(source_path: &str, records: usize) {
    print_section_header("ENGAGEMENT REPORT CLI");
    print_key_value("Source", source_path);
    print_key_value("Records", &records.to_string());
    print_key_value("Build", env!("GIT_HASH"));
    println!();
    println!("  {}", "Type 'help' for available commands".with(colors::MUTED));
    print_section_footer();
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Filters,
    Reports,
    System,
}

impl CommandGroup {
    const ALL: [CommandGroup; 3] = [CommandGroup::Filters, CommandGroup::Reports, CommandGroup::System];

    fn title(self) -> &'static str {
        match self {
            CommandGroup::Filters => "Filters",
            CommandGroup::Reports => "Reports",
            CommandGroup::System => "System",
        }
    }

    fn color(self) -> CtColor {
        match self {
            CommandGroup::Filters => colors::FRAME,
            CommandGroup::Reports => colors::HIGHLIGHT,
            CommandGroup::System => colors::WARN,
        }
    }
}

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
    pub group: CommandGroup,
}

pub fn print_help(commands: &[CommandHelp]) {
    print_section_header("Available Commands");
    println!();
    for group in CommandGroup::ALL {
        println!(
            "  {} {}",
            DIAMOND.with(group.color()),
            group.title().with(group.color()).bold()
        );
        for cmd in commands.iter().filter(|c| c.group == group) {
            println!(
                "      {} {}  {}",
                cmd.name.with(colors::OK).bold(),
                cmd.args.with(colors::MUTED),
                cmd.description.with(colors::TEXT)
            );
        }
        println!();
    }
    print_section_footer();
}

pub fn print_goodbye() {
    println!();
    println!("  {}", "Goodbye!".with(colors::LABEL).bold());
    println!();
}

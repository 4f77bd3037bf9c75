use console::style;

use crate::pipeline::report::Table;

pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold().underlined());
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold());
            println!("{}", "─".repeat(40));
        }
    }

    pub fn field(&self, label: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14} {}", style(label).dim(), value);
        }
    }

    pub fn paragraph(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    /// Plain column-aligned table
    pub fn table(&self, table: &Table) {
        if self.quiet {
            return;
        }
        println!("\n{}", style(&table.title).italic());
        for line in render_table(table) {
            println!("  {}", line);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

fn render_table(table: &Table) -> Vec<String> {
    let columns = table.headers.len();
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .take(columns)
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(format_row(&table.headers));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &table.rows {
        lines.push(format_row(row));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_aligns_columns() {
        let mut table = Table::new("Stack", &["Name", "Type"]);
        table.row(["rust", "language"]);
        table.row(["postgresql", "database"]);

        let lines = render_table(&table);
        assert_eq!(lines[0], "Name        Type");
        assert_eq!(lines[1], "----------  --------");
        assert_eq!(lines[2], "rust        language");
        assert_eq!(lines[3], "postgresql  database");
    }

    #[test]
    fn test_render_table_ignores_extra_cells() {
        let mut table = Table::new("T", &["A"]);
        table.row(["x", "overflow"]);
        assert_eq!(render_table(&table)[2], "x");
    }
}

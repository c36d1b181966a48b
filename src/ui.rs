use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a desktop-style notification banner
pub fn notify(title: &str, subtitle: Option<&str>) {
    println!();
    println!("{} {}", "●".magenta().bold(), title.bold());
    if let Some(subtitle) = subtitle {
        println!("  {}", subtitle.dimmed());
    }
}

/// Print captured tool output under a label, indented
///
/// Blank output prints nothing.
pub fn output_block(label: &str, text: &str) {
    let text = text.trim_end();
    if text.trim().is_empty() {
        return;
    }

    println!("  {}", label.dimmed());
    for line in indent_lines(text) {
        println!("{}", line);
    }
}

fn indent_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().map(|line| format!("    {}", line))
}

//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use todolink_core::TodoItem;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print one todo as a single line.
pub fn todo_line(todo: &TodoItem) {
    let mark = if todo.completed {
        "[x]".green()
    } else {
        "[ ]".normal()
    };
    println!(
        "{} {} {}",
        mark,
        format!("#{}", todo.todo_id).dimmed(),
        todo.title
    );
}

/// Print every field of one todo.
pub fn todo_detail(todo: &TodoItem) {
    field("ID", &todo.todo_id.to_string());
    field("Title", &todo.title);
    field("Description", &todo.description);
    field("Completed", if todo.completed { "yes" } else { "no" });
    if !todo.create_at.is_empty() {
        field("Created", &todo.create_at);
    }
}

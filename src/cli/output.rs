//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{Claims, GateDecision, Role};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn is_known_role(tag: &str) -> bool {
    [Role::SysAdmin, Role::Admin, Role::Owner, Role::Manager, Role::Staff]
        .iter()
        .any(|role| role.as_str() == tag)
}

/// Print decoded claims as a table
pub fn print_claims(claims: &Claims) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Claim").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    table.add_row(vec![Cell::new("sub"), Cell::new(or_dash(claims.sub.clone()))]);
    table.add_row(vec![Cell::new("email"), Cell::new(or_dash(claims.email.clone()))]);
    table.add_row(vec![
        Cell::new("iat"),
        Cell::new(or_dash(claims.iat.map(|t| t.to_string()))),
    ]);
    table.add_row(vec![
        Cell::new("exp"),
        Cell::new(or_dash(claims.exp.map(|t| t.to_string()))),
    ]);

    for tag in claims.roles.iter() {
        let color = if is_known_role(tag) {
            Color::Green
        } else {
            Color::Yellow
        };
        table.add_row(vec![Cell::new("role"), Cell::new(tag).fg(color)]);
    }

    println!("{table}");
    info(&format!("Lands on {}", claims.default_role_path().bold()));
}

/// Print a gate decision
pub fn print_decision(path: &str, decision: &GateDecision) {
    match decision {
        GateDecision::Pass => success(&format!("{} passes", path)),
        GateDecision::Redirect(target) => {
            warn(&format!("{} redirects to {}", path, target.bold()))
        }
    }
}

//! Terminal output formatting with colors and tree rendering
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::config::Settings;
use crate::domain::{Forest, TreeNode};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One-line label for a node: icon, key, name, category.
pub fn node_label(node: &TreeNode, settings: &Settings) -> String {
    format!(
        "{} {}  {} [{}]",
        settings.icon_for(&node.record.category),
        node.record.key,
        node.record.name,
        node.record.category
    )
}

fn to_tree(node: &TreeNode, settings: &Settings) -> Tree<String> {
    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|child| to_tree(child, settings))
        .collect();
    Tree::new(node_label(node, settings)).with_leaves(leaves)
}

/// Render the whole forest with one termtree per root.
pub fn print_forest(forest: &Forest, settings: &Settings) {
    for root in forest.roots() {
        print!("{}", to_tree(root, settings));
    }
}

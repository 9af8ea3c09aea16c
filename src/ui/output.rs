use crate::linker::{DanglingReference, LinkFailure};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BOLT, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

pub fn cim_type(name: &str) -> String {
    name.style(theme().class.clone()).to_string()
}

/// One line per reference whose target is outside the model
pub fn dangling(reference: &DanglingReference) {
    println!(
        "  {} {} {} {} {}",
        Icons::DANGLING,
        cim_type(reference.cim_type),
        reference.rdfid,
        dim(reference.attribute),
        muted(&format!("-> {}", reference.target))
    );
}

pub fn failure(failure: &LinkFailure) {
    eprintln!(
        "  {} {} {} {}: {}",
        Icons::CROSS,
        cim_type(failure.cim_type),
        failure.rdfid,
        dim(&failure.attribute),
        failure.error.style(theme().error.clone())
    );
}

pub fn timing(elapsed: &str) {
    println!("{} {}", Icons::CLOCK.style(theme().dim.clone()), elapsed);
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

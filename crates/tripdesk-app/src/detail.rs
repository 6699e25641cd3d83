// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::Value;
use time::Date;
use time::macros::format_description;

use crate::{CollectionKind, Record, stringify};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl DetailSection {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }
}

/// Content of the expanded sub-row for one record.
pub fn detail_sections(kind: CollectionKind, record: &Record) -> Vec<DetailSection> {
    match kind {
        CollectionKind::Hotels => hotel_sections(record),
        CollectionKind::Destinations => destination_sections(record),
        CollectionKind::Users => vec![DetailSection::new(
            "Profile",
            vec![
                format!("Email: {}", record.text("email")),
                format!("Contact: {}", record.text("contact")),
                format!("Address: {}", record.text("address")),
                format!(
                    "Date of Birth: {}",
                    record
                        .field("dob")
                        .and_then(Value::as_str)
                        .map_or_else(|| "N/A".to_owned(), format_display_date)
                ),
                format!("Gender: {}", record.text("gender")),
            ],
        )],
    }
}

fn hotel_sections(record: &Record) -> Vec<DetailSection> {
    let contact = DetailSection::new(
        "Contact Information",
        vec![
            format!("Address: {}", record.text("address")),
            format!("Email: {}", record.text("email")),
            format!("Phone: {}", record.text("phone_number")),
            format!("Website: {}", record.text("website")),
        ],
    );
    let description = DetailSection::new("Description", vec![record.text("description")]);

    let packages = record.list("hotel_packages");
    let mut package_lines = Vec::new();
    for package in packages {
        let text = |key: &str| package.get(key).map(stringify).unwrap_or_default();
        package_lines.push(format!("{} - ${}", text("package_name"), text("price")));
        let summary = text("package_description");
        if !summary.is_empty() {
            package_lines.push(format!("  {summary}"));
        }
        let valid_until = package
            .get("validity_period")
            .and_then(Value::as_str)
            .map_or_else(|| "N/A".to_owned(), format_display_date);
        package_lines.push(format!("  Valid until: {valid_until}"));
        let inclusions = string_items(package.get("inclusions"));
        if !inclusions.is_empty() {
            package_lines.push(format!("  Includes: {}", inclusions.join(", ")));
        }
    }
    if package_lines.is_empty() {
        package_lines.push("No packages available for this hotel.".to_owned());
    }

    vec![
        contact,
        description,
        DetailSection::new("Available Packages", package_lines),
    ]
}

fn destination_sections(record: &Record) -> Vec<DetailSection> {
    let list_section = |title: &'static str, key: &str| {
        let items = string_items(record.field(key));
        let line = if items.is_empty() {
            "None listed".to_owned()
        } else {
            items.join(", ")
        };
        DetailSection::new(title, vec![line])
    };

    vec![
        DetailSection::new(
            "Description",
            vec![record.text("destination_description")],
        ),
        list_section("Popular Attractions", "popular_attractions"),
        list_section("Accommodation Options", "accommodation_options"),
        list_section("Activities", "activities"),
        DetailSection::new("Travel Tips", vec![record.text("travel_tips")]),
    ]
}

fn string_items(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Formats an ISO date or timestamp as `Mar 5, 2026`. Unparseable input is
/// returned unchanged, empty input as `N/A`.
pub fn format_display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "N/A".to_owned();
    }
    let day_part = trimmed.get(..10).unwrap_or(trimmed);
    match Date::parse(day_part, format_description!("[year]-[month]-[day]")) {
        Ok(date) => date
            .format(format_description!(
                "[month repr:short] [day padding:none], [year]"
            ))
            .unwrap_or_else(|_| trimmed.to_owned()),
        Err(_) => trimmed.to_owned(),
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{CollectionKind, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn build<'a>(kind: CollectionKind, records: impl IntoIterator<Item = &'a Record>) -> Self {
        let columns = kind.report_columns();
        Self {
            title: format!("{} report", capitalized(kind.as_str())),
            columns: columns.iter().map(|column| column.label.to_owned()).collect(),
            rows: records
                .into_iter()
                .map(|record| columns.iter().map(|column| column.cell(record)).collect())
                .collect(),
        }
    }

    /// Left-aligned text table, one header row and a rule under it.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n\n", self.title);
        if self.rows.is_empty() {
            out.push_str("(no rows)\n");
            return out;
        }

        let mut widths = self
            .columns
            .iter()
            .map(|label| label.chars().count())
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        push_row(&mut out, &self.columns, &widths);
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>();
        push_row(&mut out, &rule, &widths);
        for row in &self.rows {
            push_row(&mut out, row, &widths);
        }
        out.push_str(&format!("\n{} rows\n", self.rows.len()));
        out
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;

use unicode_width::UnicodeWidthStr;

/// A column of a [`Table`], rendering one cell per row.
pub trait Column<T> {
    fn name(&self) -> &'static str;
    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;
}

/// Left-aligned rows padded to a common width per column, under a header and
/// a dashed separator line.
pub struct Table<'a, T, C: Column<T>> {
    pub columns: &'a [C],
    pub separator: &'a str,
    pub data: &'a [T],
}

impl<'a, T, C: Column<T>> Table<'a, T, C> {
    pub fn new(columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            columns,
            separator: "  ",
            data,
        }
    }
}

impl<T, C: Column<T>> fmt::Display for Table<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<Cow<'_, str>>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        let headers: Vec<Cow<'_, str>> = self.columns.iter().map(|c| c.name().into()).collect();
        let widths = get_column_max_width(&headers, &rows);
        let dashes: Vec<Cow<'_, str>> = widths.iter().map(|&w| "-".repeat(w).into()).collect();

        for cells in [&headers, &dashes].into_iter().chain(&rows) {
            self.write_row(f, cells, &widths)?;
        }
        Ok(())
    }
}

impl<T, C: Column<T>> Table<'_, T, C> {
    fn write_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        cells: &[Cow<'_, str>],
        widths: &[usize],
    ) -> fmt::Result {
        let last = self.columns.len().saturating_sub(1);
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            // last column is not padded
            if i == last {
                write!(f, "{cell}")?;
                break;
            }
            let fill = " ".repeat(width.saturating_sub(cell.width()));
            write!(f, "{cell}{fill}{}", self.separator)?;
        }
        writeln!(f)
    }
}

fn get_column_max_width(headers: &[Cow<'_, str>], rows: &[Vec<Cow<'_, str>>]) -> Vec<usize> {
    let mut max_width: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            max_width[i] = max_width[i].max(cell.width());
        }
    }
    max_width
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Col(usize, &'static str);

    impl Column<[&'static str; 2]> for Col {
        fn name(&self) -> &'static str {
            self.1
        }

        fn format<'a>(&self, data: &'a [&'static str; 2]) -> Cow<'a, str> {
            data[self.0].into()
        }
    }

    #[test]
    fn test_table_layout() {
        let columns = [Col(0, "Name"), Col(1, "Title")];
        let data = [["Work", "Standup"], ["Home calendar", "Gym"]];
        let table = Table::new(&columns, &data).to_string();
        assert_eq!(
            table,
            "\
Name           Title
-------------  -------
Work           Standup
Home calendar  Gym
"
        );
    }

    #[test]
    fn test_table_wide_chars() {
        let columns = [Col(0, "N"), Col(1, "T")];
        let data = [["会议", "a"], ["1", "b"]];
        let table = Table::new(&columns, &data).to_string();
        assert_eq!(table, "N     T\n----  -\n会议  a\n1     b\n");
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let columns = [Col(0, "Start")];
        let data: [[&str; 2]; 0] = [];
        assert_eq!(Table::new(&columns, &data).to_string(), "Start\n-----\n");
    }
}

use std::fmt::{Display, Formatter, Result as FmtResult};

use clap::ValueEnum;
use serde::Deserialize;
use secman_lib::iam::Policy;

use crate::error::{self, Context};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Table,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OutputFormat::Yaml => f.write_str("yaml"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Table => f.write_str("table"),
        }
    }
}

pub fn write_policy<O>(output: &mut O, policy: &Policy, format: OutputFormat) -> error::Result
where
    O: std::io::Write
{
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut *output, policy)
                .context("failed to write policy as yaml")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *output, policy)
                .context("failed to write policy as json")?;
            writeln!(output)?;
        }
        OutputFormat::Table => {
            write_policy_table(output, policy)?;
        }
    }

    Ok(())
}

fn write_policy_table<O>(output: &mut O, policy: &Policy) -> std::io::Result<()>
where
    O: std::io::Write
{
    if let Some(version) = policy.version {
        writeln!(output, "version: {version}")?;
    }

    if let Some(etag) = &policy.etag {
        writeln!(output, "etag: {etag}")?;
    }

    let mut table = TextTable::with_columns([
        Column::new("role"),
        Column::new("member"),
        Column::new("condition"),
    ]);

    for binding in &policy.bindings {
        let condition = binding.condition.as_ref()
            .map(|c| c.title.clone().unwrap_or_else(|| c.expression.clone()));

        if binding.members.is_empty() {
            let mut row = table.add_row();
            row.set_col(0, &binding.role);

            if let Some(cond) = &condition {
                row.set_col(2, cond);
            }

            row.finish();
            continue;
        }

        for member in &binding.members {
            let mut row = table.add_row();
            row.set_col(0, &binding.role);
            row.set_col(1, member);

            if let Some(cond) = &condition {
                row.set_col(2, cond);
            }

            row.finish();
        }
    }

    if table.is_empty() {
        writeln!(output, "no bindings")
    } else {
        table.write(output, &PRETTY_OPTIONS)
    }
}

pub struct Column {
    name: String,
    width: usize,
}

impl Column {
    pub fn new<N>(name: N) -> Column
    where
        N: Into<String>,
    {
        let name = name.into();

        Column {
            width: name.chars().count(),
            name,
        }
    }

    fn write_value<D, O>(&self, value: &D, output: &mut O) -> std::io::Result<()>
    where
        D: Display + ?Sized,
        O: std::io::Write,
    {
        write!(output, "{value:<width$}", width=self.width)
    }

    fn update_width(&mut self, width: usize) {
        if width > self.width {
            self.width = width;
        }
    }
}

pub struct HeaderSep {
    pub ch: char,
    pub col_sep: &'static str,
}

pub struct TableOptions {
    pub col_sep: &'static str,
    pub header_sep: Option<HeaderSep>,
}

pub const PRETTY_OPTIONS: TableOptions = TableOptions {
    col_sep: " | ",
    header_sep: Some(HeaderSep {
        ch: '-',
        col_sep: "-+-",
    })
};

fn write_table<O, const N: usize>(
    output: &mut O,
    rows: &[[Option<String>; N]],
    columns: &[Column; N],
    options: &TableOptions,
) -> std::io::Result<()>
where
    O: std::io::Write,
{
    let empty = "";
    // ilog10 panics on zero
    let index_width = (rows.len().max(1).ilog10() + 1) as usize;

    write!(output, "{empty:index_width$}")?;

    for col in columns {
        write!(output, "{}", options.col_sep)?;

        col.write_value(&col.name, output)?;
    }

    if let Some(header_sep) = &options.header_sep {
        writeln!(output)?;

        for _ in 0..index_width {
            write!(output, "{}", header_sep.ch)?;
        }

        for col in columns {
            write!(output, "{}", header_sep.col_sep)?;

            for _ in 0..col.width {
                write!(output, "{}", header_sep.ch)?;
            }
        }
    }

    writeln!(output)?;

    for (index, row) in rows.iter().enumerate() {
        write!(output, "{:>index_width$}", index + 1)?;

        for (col, value) in columns.iter().zip(row) {
            write!(output, "{}", options.col_sep)?;

            match value {
                Some(st) => col.write_value(st, output)?,
                None => col.write_value(empty, output)?,
            }
        }

        writeln!(output)?;
    }

    Ok(())
}

pub struct TextTable<const N: usize> {
    columns: [Column; N],
    rows: Vec<[Option<String>; N]>
}

pub struct TextRow<'a, const N: usize> {
    table: &'a mut TextTable<N>,
    row: [Option<String>; N],
}

impl<'a, const N: usize> TextRow<'a, N> {
    pub fn set_col<V>(&mut self, index: usize, value: V) -> bool
    where
        V: Display
    {
        if index >= N {
            false
        } else {
            self.row[index] = Some(value.to_string());
            true
        }
    }

    pub fn finish(self) {
        for (value, col) in self.row.iter().zip(&mut self.table.columns) {
            if let Some(st) = value {
                col.update_width(st.chars().count());
            }
        }

        self.table.rows.push(self.row);
    }
}

impl<const N: usize> TextTable<N> {
    pub fn with_columns(columns: [Column; N]) -> Self {
        TextTable {
            columns,
            rows: Vec::new()
        }
    }

    pub fn add_row(&mut self) -> TextRow<'_, N> {
        TextRow {
            table: self,
            row: std::array::from_fn(|_| None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write<O>(&self, output: &mut O, options: &TableOptions) -> std::io::Result<()>
    where
        O: std::io::Write
    {
        write_table(output, &self.rows, &self.columns, options)
    }
}

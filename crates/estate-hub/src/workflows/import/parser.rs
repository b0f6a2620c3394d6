use super::domain::RawRow;
use super::ImportError;

/// Header fragment that locates the header line of a pipe table.
pub const PIPE_HEADER_SENTINEL: &str = "Bathroom";

const PIPE_DELIMITER: char = '|';
const SEPARATOR_PREFIX: &str = "|-";
const MIN_PIPE_ROW_CHARS: usize = 10;

/// Comma-separated text with the header on the first line. Quoted cells are
/// honoured so prices like `"$ 819,990.00"` survive intact.
pub(crate) fn parse_csv(content: &str) -> Result<Vec<RawRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let values: Vec<&str> = record.iter().collect();
        let row = RawRow::from_cells(&headers, &values);
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Pipe-delimited pseudo-table as pasted from a document. The header line is
/// found by sentinel rather than position; data starts two lines below it,
/// past the `|---|` separator.
pub(crate) fn parse_pipe_table(content: &str) -> Result<Vec<RawRow>, ImportError> {
    let lines: Vec<&str> = content.lines().collect();
    let header_index = lines
        .iter()
        .position(|line| line.contains(PIPE_HEADER_SENTINEL))
        .ok_or(ImportError::MissingHeader {
            sentinel: PIPE_HEADER_SENTINEL,
        })?;

    let headers = split_pipe_line(lines[header_index]);

    let rows = lines
        .iter()
        .skip(header_index + 2)
        .map(|line| line.trim())
        .filter(|line| is_pipe_data_line(line))
        .map(|line| RawRow::from_cells(&headers, &split_pipe_line(line)))
        .collect();

    Ok(rows)
}

fn is_pipe_data_line(trimmed: &str) -> bool {
    trimmed.contains(PIPE_DELIMITER)
        && !trimmed.starts_with(SEPARATOR_PREFIX)
        && trimmed.chars().count() > MIN_PIPE_ROW_CHARS
}

fn split_pipe_line(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix(PIPE_DELIMITER).unwrap_or(trimmed);
    let inner = inner.strip_suffix(PIPE_DELIMITER).unwrap_or(inner);

    inner
        .split(PIPE_DELIMITER)
        .map(|cell| cell.trim().to_string())
        .collect()
}

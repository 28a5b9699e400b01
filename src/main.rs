//! csv-fieldmap CLI - print the rows of a delimited file as named fields

use clap::{ArgAction, Parser as ClapParser};
use csv_fieldmap::{
    Dialect, FieldMap, LineTerminator, Parser, ProjectedRow, Quote, ReadMode, Sniffer,
};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Read a delimited file and print each row as named fields.
///
/// The delimiter, quote character and header row are detected unless given.
#[derive(ClapParser, Debug)]
#[command(name = "csv-fieldmap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file
    file: PathBuf,

    /// Field assignment as NAME=INDEX (zero-based column), repeatable
    #[arg(short = 'f', long = "field", value_name = "NAME=INDEX", value_parser = parse_field)]
    fields: Vec<(String, usize)>,

    /// The first data line is a header
    #[arg(long, conflicts_with = "no_header")]
    header: bool,

    /// The first data line is not a header
    #[arg(long)]
    no_header: bool,

    /// Number of lines to skip after the keyword scan
    #[arg(short = 's', long, default_value = "0")]
    skip: usize,

    /// Skip every line before the first one whose first field is KEYWORD
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// Force specific delimiter (single character)
    #[arg(short = 'd', long)]
    delimiter: Option<char>,

    /// Force specific quote character (single character, or 'none')
    #[arg(short = 'q', long)]
    quote: Option<String>,

    /// Decode fields with the detected encoding instead of requiring UTF-8
    #[arg(long)]
    bytes: bool,

    /// Stop after this many rows
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Print the detected dialect instead of the rows
    #[arg(long)]
    sniff: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error processing {}: {}", args.file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_field(s: &str) -> Result<(String, usize), String> {
    let (name, index) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=INDEX, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("empty field name in {s:?}"));
    }
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("invalid index in {s:?}: {e}"))?;
    Ok((name.to_string(), index))
}

fn parse_quote(s: &str) -> Result<Quote, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(Quote::None);
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(Quote::Some(c as u8)),
        _ => Err(format!("quote must be a single ASCII character or 'none', got {s:?}")),
    }
}

fn delimiter_byte(c: char) -> Result<u8, String> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(format!("delimiter must be an ASCII character, got {c:?}"))
    }
}

fn configured_sniffer(args: &Args) -> Result<Sniffer, String> {
    let mut sniffer = Sniffer::new();
    if let Some(delim) = args.delimiter {
        sniffer.delimiter(delimiter_byte(delim)?);
    }
    if let Some(ref quote) = args.quote {
        sniffer.quote(parse_quote(quote)?);
    }
    Ok(sniffer)
}

/// Dialect to hand to the parser, if the user pinned any part of it.
fn forced_dialect(args: &Args) -> Result<Option<Dialect>, Box<dyn std::error::Error>> {
    let quote = args.quote.as_deref().map(parse_quote).transpose()?;
    match (args.delimiter, quote) {
        (None, None) => Ok(None),
        (Some(delim), quote) => Ok(Some(Dialect::new(
            delimiter_byte(delim)?,
            quote.unwrap_or_default(),
            LineTerminator::LF,
        ))),
        (None, Some(_)) => Ok(Some(configured_sniffer(args)?.sniff_path(&args.file)?.dialect)),
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.sniff {
        let metadata = configured_sniffer(args)?.sniff_path(&args.file)?;
        match args.format {
            OutputFormat::Text => {
                println!("File: {}", args.file.display());
                println!("  Delimiter: {:?}", metadata.dialect.delimiter as char);
                println!("  Quote: {}", metadata.dialect.quote);
                println!("  Double quote: {}", metadata.dialect.double_quote);
                println!("  Skip initial space: {}", metadata.dialect.skip_initial_space);
                println!("  Line terminator: {}", metadata.dialect.line_terminator.as_str());
                println!("  Has header: {}", metadata.has_header);
                println!("  Fields: {}", metadata.num_fields);
                println!("  Encoding: {}", metadata.encoding.encoding.name());
            }
            OutputFormat::Json => {
                let output = json!({
                    "file": args.file.display().to_string(),
                    "delimiter": (metadata.dialect.delimiter as char).to_string(),
                    "quote": metadata.dialect.quote.char().map(|q| (q as char).to_string()),
                    "double_quote": metadata.dialect.double_quote,
                    "skip_initial_space": metadata.dialect.skip_initial_space,
                    "has_header": metadata.has_header,
                    "num_fields": metadata.num_fields,
                    "encoding": metadata.encoding.encoding.name(),
                });
                println!("{output}");
            }
        }
        return Ok(());
    }

    if args.fields.is_empty() {
        return Err("at least one --field NAME=INDEX is required".into());
    }
    let field_map = FieldMap::new(args.fields.iter().map(|(n, i)| (n.as_str(), *i)))?;

    let mut builder = Parser::builder(&args.file, field_map);
    if let Some(dialect) = forced_dialect(args)? {
        builder.dialect(dialect);
    }
    if args.header {
        builder.has_header(true);
    } else if args.no_header {
        builder.has_header(false);
    }
    if let Some(ref keyword) = args.keyword {
        builder.first_row_keyword(keyword);
    }
    if args.bytes {
        builder.read_mode(ReadMode::Bytes);
    }
    let parser = builder.line_skip(args.skip).build()?;
    tracing::info!(
        dialect = %parser.dialect(),
        has_header = parser.has_header(),
        skipped = parser.skipped().total(),
        "opened {parser}"
    );

    let limit = args.limit.unwrap_or(usize::MAX);
    for (i, row) in parser.rows().take(limit).enumerate() {
        let row = row?;
        match args.format {
            OutputFormat::Text => {
                if i > 0 {
                    println!();
                }
                print_text_row(&row);
            }
            OutputFormat::Json => println!("{}", json_row(&row)),
        }
    }

    Ok(())
}

fn print_text_row(row: &ProjectedRow) {
    for (name, value) in row.iter() {
        println!("{name}: {}", value.unwrap_or("<absent>"));
    }
}

fn json_row(row: &ProjectedRow) -> Value {
    let fields: Map<String, Value> = row
        .iter()
        .map(|(name, value)| (name.to_string(), value.map_or(Value::Null, Value::from)))
        .collect();
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;

    #[test]
    fn test_json_row_escapes_and_marks_absent() {
        let map = FieldMap::new([("name", 0), ("note", 1), ("city", 5)]).unwrap();
        let row = map.project(&StringRecord::from(vec!["Ann \"A\"", "line\nbreak\\"]));

        assert_eq!(
            json_row(&row).to_string(),
            r#"{"name":"Ann \"A\"","note":"line\nbreak\\","city":null}"#
        );
    }
}

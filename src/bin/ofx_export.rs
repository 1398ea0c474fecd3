//! OFX Export - CLI tool for dumping OFX statements as CSV or a text summary.

use clap::Parser;
use ofx_statement::{
    csv_format::CsvStatement, AccountIdentity, ExportFormat, Result, StatementDocument,
};
use std::fs::File;
use std::io::{self, Read, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ofx_export")]
#[command(
    about = "Export OFX bank and credit card statements (OFX 1.x SGML or 2.x XML)",
    long_about = None
)]
struct Cli {
    /// Input file path (or stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Input encoding label, e.g. utf-8, iso-8859-1, windows-1252
    #[arg(short, long)]
    encoding: Option<String>,

    /// Output format (csv, text)
    #[arg(long = "output-format", default_value = "csv")]
    output_format: String,

    /// Output file path (or stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let output_format = cli.output_format.parse::<ExportFormat>()?;
    let encoding = cli.encoding.as_deref();

    let statement = if let Some(ref input_path) = cli.input {
        let mut file = File::open(input_path)?;
        parse_input(&mut file, encoding)?
    } else {
        let mut stdin = io::stdin();
        parse_input(&mut stdin, encoding)?
    };

    if let Some(ref output_path) = cli.output {
        let mut file = File::create(output_path)?;
        write_output(&mut file, statement, output_format)?;
    } else {
        let mut stdout = io::stdout();
        write_output(&mut stdout, statement, output_format)?;
    }

    Ok(())
}

fn parse_input<R: Read>(reader: &mut R, encoding: Option<&str>) -> Result<StatementDocument> {
    StatementDocument::from_read(reader, encoding)
}

fn write_output<W: Write>(
    writer: &mut W,
    statement: StatementDocument,
    format: ExportFormat,
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let csv = CsvStatement { statement };
            csv.write_to(writer)?;
        }
        ExportFormat::Text => write_summary(writer, &statement)?,
    }
    Ok(())
}

fn write_summary<W: Write>(writer: &mut W, statement: &StatementDocument) -> Result<()> {
    writeln!(writer, "=== OFX Statement ===")?;
    match &statement.account {
        AccountIdentity::Bank(bank) => writeln!(
            writer,
            "Account: {} (bank {}, branch {}, {:?})",
            statement.account.account_id(),
            bank.bank_id,
            bank.branch_id.as_deref().unwrap_or("-"),
            bank.kind
        )?,
        AccountIdentity::CreditCard(_) => writeln!(
            writer,
            "Account: {} (credit card)",
            statement.account.account_id()
        )?,
    }
    writeln!(writer, "Currency: {}", statement.currency)?;

    if let (Some(start), Some(end)) = (statement.statement_start, statement.statement_end) {
        writeln!(writer, "Period: {} to {}", start.date(), end.date())?;
    }

    let ledger = &statement.balance.ledger;
    writeln!(writer, "Ledger balance: {} as of {}", ledger.amount, ledger.as_of.date())?;
    if let Some(available) = &statement.balance.available {
        writeln!(
            writer,
            "Available balance: {} as of {}",
            available.amount,
            available.as_of.date()
        )?;
    }

    writeln!(writer, "\nTransactions: {}", statement.transactions.len())?;
    for transaction in &statement.transactions {
        writeln!(
            writer,
            "  {} {:>12} {:<11} {}",
            transaction.posted.date(),
            transaction.amount,
            transaction.transaction_type.code(),
            transaction
                .memo
                .as_deref()
                .or(transaction.name.as_deref())
                .unwrap_or("")
        )?;
    }

    Ok(())
}

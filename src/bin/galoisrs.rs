//! Command-line front end for finite field and Reed-Solomon operations
//!
//! Symbols are given as whitespace or comma separated integers, either as
//! trailing arguments (one word) or on stdin (one word per line).

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use galoisrs::{ExecutionConfig, FieldMatrix, GaloisField, ReedSolomon};
use std::io::{self, BufRead};

fn code_args() -> Vec<Arg> {
    vec![
        Arg::new("n")
            .short('n')
            .help("Codeword size, q - 1 for a prime power q")
            .value_name("N")
            .required(true),
        Arg::new("k")
            .short('k')
            .help("Message size")
            .value_name("K")
            .required(true),
        Arg::new("c")
            .short('c')
            .help("First consecutive root is alpha^c")
            .value_name("C")
            .default_value("1"),
        Arg::new("non-systematic")
            .long("non-systematic")
            .help("Use non-systematic encoding")
            .action(ArgAction::SetTrue),
    ]
}

fn symbols_arg() -> Arg {
    Arg::new("symbols")
        .help("Symbols of one word (read one word per line from stdin if omitted)")
        .num_args(0..)
        .index(1)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let matches = Command::new("galoisrs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Finite field arithmetic and Reed-Solomon coding")
        .arg_required_else_help(true)
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of CPU threads for computation (0 = auto-detect)")
                .value_name("N")
                .default_value("0")
                .global(true),
        )
        .arg(
            Arg::new("no-parallel")
                .long("no-parallel")
                .help("Disable all parallel processing")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("field")
                .about("Describe GF(q)")
                .arg(
                    Arg::new("order")
                        .help("Field order, a prime power")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Describe a Reed-Solomon code")
                .args(code_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the code parameters as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("encode")
                .visible_alias("e")
                .about("Encode messages into codewords")
                .args(code_args())
                .arg(symbols_arg()),
        )
        .subcommand(
            Command::new("decode")
                .visible_alias("d")
                .about("Correct codewords and recover their messages")
                .args(code_args())
                .arg(symbols_arg()),
        )
        .get_matches();

    let Some((command, sub_matches)) = matches.subcommand() else {
        anyhow::bail!("No command specified");
    };

    // Global flags propagate down, so read them from the subcommand
    let config = ExecutionConfig::from_args(sub_matches);
    config.install_global_pool();

    match command {
        "field" => handle_field(sub_matches),
        "info" => handle_info(sub_matches),
        "encode" => handle_encode(sub_matches, &config),
        "decode" => handle_decode(sub_matches, &config),
        cmd => anyhow::bail!("Unknown command: {}", cmd),
    }
}

fn parse_number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = matches
        .get_one::<String>(name)
        .with_context(|| format!("Missing argument {}", name))?;
    raw.parse()
        .with_context(|| format!("Invalid value for {}: {}", name, raw))
}

fn build_code(matches: &ArgMatches) -> Result<ReedSolomon> {
    let n: usize = parse_number(matches, "n")?;
    let k: usize = parse_number(matches, "k")?;
    let c: usize = parse_number(matches, "c")?;
    let code = ReedSolomon::builder(n, k)
        .c(c)
        .systematic(!matches.get_flag("non-systematic"))
        .build()
        .with_context(|| format!("Failed to construct RS({}, {})", n, k))?;
    Ok(code)
}

fn parse_word(line: &str) -> Result<Vec<u64>> {
    line.split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .with_context(|| format!("Invalid symbol: {}", s))
        })
        .collect()
}

/// Words from the command line, or one per non-empty stdin line
fn read_words(matches: &ArgMatches) -> Result<Vec<Vec<u64>>> {
    if let Some(symbols) = matches.get_many::<String>("symbols") {
        let joined = symbols.cloned().collect::<Vec<_>>().join(" ");
        return Ok(vec![parse_word(&joined)?]);
    }
    let mut words = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if !line.trim().is_empty() {
            words.push(parse_word(&line)?);
        }
    }
    Ok(words)
}

fn words_to_matrix(code: &ReedSolomon, words: &[Vec<u64>]) -> Result<FieldMatrix> {
    FieldMatrix::from_rows(code.field(), words).context("Malformed input words")
}

fn format_word(word: &[u64]) -> String {
    word.iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn handle_field(matches: &ArgMatches) -> Result<()> {
    let order: u64 = parse_number(matches, "order")?;
    let field = GaloisField::from_order(order).context("Failed to construct field")?;
    println!("{}", field);
    println!("  characteristic:    {}", field.characteristic());
    println!("  degree:            {}", field.degree());
    println!("  order:             {}", field.order());
    println!("  irreducible poly:  {:?}", field.irreducible_coeffs());
    println!("  primitive element: {}", field.primitive_element());
    println!("  arithmetic mode:   {}", field.mode());
    println!("  storage:           {}", field.dtype());
    Ok(())
}

fn handle_info(matches: &ArgMatches) -> Result<()> {
    let code = build_code(matches)?;
    if matches.get_flag("json") {
        println!("{}", code.parameters().to_json()?);
        return Ok(());
    }
    println!("{}", code);
    println!("  t = {}, d = {}, c = {}", code.t(), code.d(), code.c());
    println!("  systematic: {}", code.systematic());
    println!("  g(x) = {}", code.generator_poly());
    Ok(())
}

fn handle_encode(matches: &ArgMatches, config: &ExecutionConfig) -> Result<()> {
    let code = build_code(matches)?;
    let words = read_words(matches)?;
    if words.is_empty() {
        return Ok(());
    }
    let codewords = code
        .encode_batch_with_config(&words_to_matrix(&code, &words)?, config)
        .context("Failed to encode")?;
    for row in codewords.iter_rows() {
        println!("{}", format_word(row));
    }
    Ok(())
}

fn handle_decode(matches: &ArgMatches, config: &ExecutionConfig) -> Result<()> {
    let code = build_code(matches)?;
    let words = read_words(matches)?;
    if words.is_empty() {
        return Ok(());
    }
    let decoded = code
        .decode_batch_with_config(&words_to_matrix(&code, &words)?, config)
        .context("Failed to decode")?;

    for (row, errors) in decoded.messages.iter_rows().zip(&decoded.errors) {
        println!("{}  # errors: {}", format_word(row), errors);
    }
    if decoded.errors.iter().any(|e| !e.is_correctable()) {
        eprintln!("Some codewords could not be corrected");
        std::process::exit(1);
    }
    Ok(())
}

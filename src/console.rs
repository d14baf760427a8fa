//! Console presentation and the interactive menu

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::downloader::download_records;
use crate::finder::{find_blobs, FoundBlobs};
use crate::listing::HttpListingClient;
use crate::models::{BlobRecord, DownloadSummary};

const ORANGE: Color = Color::AnsiValue(214);
const LIGHT_GREY: Color = Color::AnsiValue(150);

/// What the user picked on the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Download,
    ChangeOutputDirectory,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim().chars().next() {
            Some('1') => MenuChoice::Download,
            Some('2') => MenuChoice::ChangeOutputDirectory,
            Some('3') => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

pub fn print_info(message: &str) {
    println!("{}{}", "Info: ".with(ORANGE), message);
}

pub fn print_success(message: &str) {
    println!("{}{}", "Success: ".with(Color::Green), message);
}

pub fn print_error(message: &str) {
    println!("{}", message.with(Color::Red));
}

pub fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

/// Print `message` as a prompt and read one line. `None` means stdin closed.
///
/// The blocking read runs on tokio's blocking pool.
pub async fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}{}", "User Input: ".with(Color::Blue), message);
    io::stdout().flush()?;

    tokio::task::spawn_blocking(|| read_trimmed_line(&mut io::stdin().lock()))
        .await
        .context("Stdin reader task failed")?
}

fn read_trimmed_line(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("x")
}

/// URL as shown to the user, with the dataset base removed.
pub fn display_path<'a>(url: &'a str, base_url: &str) -> &'a str {
    url.strip_prefix(base_url).unwrap_or(url)
}

pub fn print_records(records: &[BlobRecord], base_url: &str) {
    for (index, record) in records.iter().enumerate() {
        let path = display_path(&record.url, base_url);
        if index % 2 == 0 {
            println!("{}", path.with(LIGHT_GREY));
        } else {
            println!("{}", path);
        }
    }
    println!();
    print_info(&format!("{} Containers Found", records.len()));
}

pub fn print_summary(summary: &DownloadSummary) {
    if !summary.failed.is_empty() {
        for failed in &summary.failed {
            println!("  {} ({})", failed.file_name.as_str().with(Color::Red), failed.reason);
        }
        print_error("  Failed Downloads");
        println!();
    }
    print_info(&format!("{} File(s) Downloaded Successfully", summary.succeeded));
    print_info(&format!("{} File(s) Downloads Failed", summary.failed.len()));
}

pub fn print_download_instructions() {
    print_info("(x -> Enter) To Exit");
    println!();
    print_info("Enter a filepath to select with an optional start date (-sd) and end date (-ed)");
    println!();
    println!("      Note: Add only -sd or only -ed to get every file after or before that date;");
    println!("            incorrectly formatted dates are ignored.");
    println!("      Note: Paths start at \"Datasets/\", e.g. \"Datasets/Wholesale/...\"");
    println!();
    println!("      Example Input: Datasets/Wholesale/BidsAndOffers/Bids/2018/20180623_Bids.csv");
    println!("      Example Input: Datasets/Wholesale/BidsAndOffers/Bids/ -sd YYYY-MM-DD -ed YYYY-MM-DD");
    println!();
    print_info("A partial path selects every file within that tree.");
    println!();
}

/// Search the listing for `raw_query`.
pub async fn search(config: &Config, raw_query: &str) -> Result<FoundBlobs> {
    let transport = HttpListingClient::new(config)?;
    Ok(find_blobs(&transport, raw_query, config.max_pages).await)
}

/// `list` subcommand: print the matching blobs, or their JSON form.
pub async fn run_list(config: &Config, raw_query: &str, json: bool) -> Result<()> {
    let found = search(config, raw_query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found.records)?);
    } else {
        print_records(&found.records, &config.datasets_base_url);
    }
    Ok(())
}

/// `download` subcommand and menu option: search, confirm, download.
pub async fn run_download(
    config: &Config,
    output_dir: &Path,
    raw_query: &str,
    assume_yes: bool,
) -> Result<()> {
    let found = search(config, raw_query).await?;

    if found.records.is_empty() {
        print_info(&format!("No containers matching the input: {}", raw_query));
        return Ok(());
    }

    print_records(&found.records, &config.datasets_base_url);

    if !assume_yes && !confirm_download().await? {
        return Ok(());
    }

    info!(
        "Downloading {} files to {}",
        found.records.len(),
        output_dir.display()
    );
    let summary = download_records(&found.records, output_dir, config).await?;
    print_summary(&summary);
    Ok(())
}

async fn confirm_download() -> Result<bool> {
    loop {
        print_info("Would you like to download all of the above files? (y / n)");
        let Some(answer) = prompt(": ").await? else {
            return Ok(false);
        };

        match answer.to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            other => print_error(&format!("\"{}\" is not a valid input", other)),
        }
    }
}

/// Interactive main menu: download files, change the output directory, exit.
pub async fn run_menu(config: &Config, output_dir: PathBuf) -> Result<()> {
    let mut output_dir = output_dir;

    println!(
        "{}",
        "** Quickly download files from the New Zealand Electricity Authority **".with(Color::Magenta)
    );

    loop {
        println!();
        println!("  1. {}", "Download Files".with(Color::Green));
        println!("  2. {}", "Change Output Directory".with(ORANGE));
        println!("  3. {}", "Exit".with(Color::Red));
        println!();
        println!("  Output Directory : {}", output_dir.display());
        println!();

        let Some(input) = prompt("Please enter a corresponding key to continue: ").await? else {
            return Ok(());
        };

        match MenuChoice::parse(&input) {
            MenuChoice::Download => download_from_menu(config, &output_dir).await?,
            MenuChoice::ChangeOutputDirectory => {
                if let Some(new_dir) = change_output_directory().await? {
                    output_dir = new_dir;
                }
            }
            MenuChoice::Exit => return Ok(()),
            MenuChoice::Invalid => {
                clear_screen()?;
                print_error("   Invalid input, try again.");
            }
        }
    }
}

async fn download_from_menu(config: &Config, output_dir: &Path) -> Result<()> {
    let query = loop {
        clear_screen()?;
        print_download_instructions();
        match prompt(": ").await? {
            None => return Ok(()),
            Some(query) if query.is_empty() => continue,
            Some(query) => break query,
        }
    };

    if is_exit(&query) {
        clear_screen()?;
        return Ok(());
    }

    run_download(config, output_dir, &query, false).await
}

/// Ask for an existing directory. `None` when the user backs out.
async fn change_output_directory() -> Result<Option<PathBuf>> {
    clear_screen()?;

    loop {
        print_info("(x -> Enter) To Exit");
        println!();
        let Some(path) = prompt("Enter new output Directory (Full System Path): ").await? else {
            return Ok(None);
        };

        if is_exit(&path) {
            clear_screen()?;
            return Ok(None);
        }

        let candidate = PathBuf::from(&path);
        clear_screen()?;
        if candidate.is_dir() {
            print_success(&format!("Output directory changed to {}", candidate.display()));
            return Ok(Some(candidate));
        }
        print_error("Directory does not exist!");
    }
}

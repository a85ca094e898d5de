use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use pdmdemo::dbl::read_doubles;
use pdmdemo::demo::StatsSummary;
use pdmdemo::save_wav;

#[derive(Parser, Debug)]
#[command(name = "inspect_dbl")]
#[command(about = "Inspect raw double streams such as filter taps or decimated output", long_about = None)]
struct Args {
    /// Raw .dbl files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Sample rate of the streams in Hz, used for durations and WAV export
    #[arg(
        short = 'r',
        long,
        default_value_t = 44100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sample_rate: u32,

    /// Convert each stream to a float WAV file alongside it
    #[arg(long)]
    wav: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct FileInspection {
    filename: String,
    duration_secs: f64,
    sum: f64,
    peak_index: Option<usize>,
    stats: Option<StatsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wav: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let results: Vec<FileInspection> = args
        .files
        .iter()
        .map(|path| inspect_file(path, args.sample_rate, args.wav))
        .collect();

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    Ok(())
}

fn inspect_file(path: &Path, sample_rate: u32, wav: bool) -> FileInspection {
    let filename = path.display().to_string();

    match inspect_file_impl(path, sample_rate, wav) {
        Ok(inspection) => inspection,
        Err(e) => FileInspection {
            filename,
            duration_secs: 0.0,
            sum: 0.0,
            peak_index: None,
            stats: None,
            wav: None,
            error: Some(format!("{:#}", e)),
        },
    }
}

fn inspect_file_impl(path: &Path, sample_rate: u32, wav: bool) -> anyhow::Result<FileInspection> {
    let values = read_doubles(path)?;
    log::info!("{}: {} values", path.display(), values.len());

    // For a tap table the peak is the center tap; for output it is the loudest sample.
    let peak_index = values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i);

    let wav_path = if wav {
        let wav_path = path.with_extension("wav");
        save_wav(&wav_path, &values, sample_rate)?;
        Some(wav_path.display().to_string())
    } else {
        None
    };

    Ok(FileInspection {
        filename: path.display().to_string(),
        duration_secs: values.len() as f64 / sample_rate as f64,
        sum: values.iter().sum(),
        peak_index,
        stats: StatsSummary::from_samples(&values),
        wav: wav_path,
        error: None,
    })
}

fn print_text(results: &[FileInspection]) {
    println!(
        "{:<40} {:>10} {:>10} {:>12} {:>12} {:>12} {:>12}",
        "File", "Count", "Seconds", "Sum", "Mean", "Min", "Max"
    );
    println!("{}", "-".repeat(114));

    for result in results {
        if let Some(ref err) = result.error {
            println!("{:<40} ERROR: {}", result.filename, err);
            continue;
        }

        match result.stats {
            Some(ref stats) => println!(
                "{:<40} {:>10} {:>10.4} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                result.filename,
                stats.count,
                result.duration_secs,
                result.sum,
                stats.mean,
                stats.min,
                stats.max
            ),
            None => println!("{:<40} {:>10}", result.filename, 0),
        }

        if let Some(peak) = result.peak_index {
            println!("{:<40} peak magnitude at index {}", "", peak);
        }
        if let Some(ref wav) = result.wav {
            println!("{:<40} wrote {}", "", wav);
        }
    }
}

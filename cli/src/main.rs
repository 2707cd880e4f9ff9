//! pdfstruct CLI - tag PDF span dumps with document structure

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfstruct::{
    Classifier, ClassifyOptions, FontProfile, Granularity, JsonFormat, PageSelection, SizeTag,
    SizeTagMap, SpanDocument,
};

#[derive(Parser)]
#[command(name = "pdfstruct")]
#[command(version)]
#[command(
    about = "Infer titles, headings, paragraphs and footers from PDF span dumps",
    long_about = None
)]
struct Cli {
    /// Input span dump (JSON)
    #[arg(value_name = "DUMP")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a span dump and write its elements and assets
    Classify {
        /// Input span dump (JSON)
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Output directory (defaults to the input file stem)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Profile styles by size, flags, font and color
        #[arg(long)]
        granular: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Do not persist images
        #[arg(long)]
        no_images: bool,

        /// Do not persist tables
        #[arg(long)]
        no_tables: bool,

        /// Process pages one at a time
        #[arg(long)]
        sequential: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// NFC-normalize span text
        #[arg(long)]
        nfc: bool,

        /// Abort on the first image or table that cannot be written
        #[arg(long)]
        strict: bool,

        /// Do not print the elements to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the font histogram and size tags of a span dump
    Fonts {
        /// Input span dump (JSON)
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Profile styles by size, flags, font and color
        #[arg(long)]
        granular: bool,
    },

    /// Show version information
    Version,
}

struct ClassifyArgs<'a> {
    input: &'a Path,
    output: Option<&'a Path>,
    options: ClassifyOptions,
    format: JsonFormat,
    print_json: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Classify {
            input,
            output,
            granular,
            compact,
            no_images,
            no_tables,
            sequential,
            pages,
            nfc,
            strict,
            quiet,
        }) => build_options(
            granular,
            no_images,
            no_tables,
            sequential,
            pages.as_deref(),
            nfc,
            strict,
        )
        .and_then(|options| {
            cmd_classify(ClassifyArgs {
                input: &input,
                output: output.as_deref(),
                options,
                format: if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                },
                print_json: !quiet,
            })
        }),
        Some(Commands::Fonts { input, granular }) => cmd_fonts(&input, granular),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_classify(ClassifyArgs {
                    input: &input,
                    output: cli.output.as_deref(),
                    options: ClassifyOptions::default(),
                    format: JsonFormat::Pretty,
                    print_json: false,
                })
            } else {
                println!("{}", "Usage: pdfstruct <DUMP> [OUTPUT]".yellow());
                println!("       pdfstruct --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(
    granular: bool,
    no_images: bool,
    no_tables: bool,
    sequential: bool,
    pages: Option<&str>,
    nfc: bool,
    strict: bool,
) -> Result<ClassifyOptions, Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let mut options = ClassifyOptions::new()
        .with_images(!no_images)
        .with_tables(!no_tables)
        .with_pages(page_selection)
        .with_unicode_normalization(nfc);
    if granular {
        options = options.granular();
    }
    if sequential {
        options = options.sequential();
    }
    if strict {
        options = options.strict();
    }
    Ok(options)
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn cmd_classify(args: ClassifyArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    pdfstruct::detect::ensure_span_dump(args.input)?;

    let stem = input_stem(args.input);
    let output_dir = args
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&stem));
    fs::create_dir_all(&output_dir)?;

    // Keep stdout clean when the elements go there.
    let pb = if args.print_json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(3)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading span dump...");
    let doc = SpanDocument::open(args.input)?;
    pb.inc(1);

    pb.set_message("Classifying pages...");
    let result = Classifier::new()
        .with_options(args.options)
        .with_asset_dir(&output_dir)
        .classify_document(&doc)?;
    pb.inc(1);

    pb.set_message("Writing elements...");
    let json = result.to_json(args.format)?;
    let json_path = output_dir.join(format!("{}_elements.json", stem));
    fs::write(&json_path, &json)?;
    pb.inc(1);

    pb.finish_and_clear();
    log::debug!("Wrote {}", json_path.display());

    if args.print_json {
        println!("{}", json);
    } else {
        let stats = &result.stats;
        println!("{} {}", "Saved to".green(), json_path.display());
        println!(
            "  {} {} pages, {} elements",
            "├─".dimmed(),
            stats.page_count,
            stats.element_count()
        );
        println!(
            "  {} {} headings, {} paragraphs, {} footers",
            "├─".dimmed(),
            stats.heading_count + stats.sub_heading_count,
            stats.para_count,
            stats.footer_count
        );
        println!(
            "  {} {} images, {} tables",
            "└─".dimmed(),
            stats.image_count,
            stats.table_count
        );
        if stats.malformed_span_count > 0 {
            println!(
                "{} {} malformed spans skipped",
                "Warning:".yellow(),
                stats.malformed_span_count
            );
        }
    }

    Ok(())
}

fn cmd_fonts(input: &Path, granular: bool) -> Result<(), Box<dyn std::error::Error>> {
    pdfstruct::detect::ensure_span_dump(input)?;

    let doc = SpanDocument::open(input)?;
    let granularity = if granular {
        Granularity::Full
    } else {
        Granularity::SizeOnly
    };
    let profile = FontProfile::build(&doc, granularity)?;
    let tags = SizeTagMap::from_profile(&profile);

    println!("{}", "Font Usage".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for usage in profile.ranked() {
        let font = if usage.style.font.is_empty() {
            "-"
        } else {
            usage.style.font.as_str()
        };
        println!("{:>8}  {:<24} {}", usage.count, usage.key.to_string(), font.dimmed());
    }

    println!();
    println!("{}", "Size Tags".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Spans".bold(), profile.total_spans());
    println!("{}: {}", "Baseline".bold(), tags.baseline());
    println!("{}: {:.2}", "Deviation".bold(), tags.deviation());
    for (size, tag) in tags.iter() {
        let label = match tag {
            SizeTag::HeaderTitle => tag.as_str().green().bold(),
            SizeTag::SubTitle => tag.as_str().green(),
            SizeTag::Small => tag.as_str().dimmed(),
            SizeTag::Para => tag.as_str().normal(),
        };
        println!("{:>8}  {}", size.to_string(), label);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF document structure classifier");
    println!();
    println!("License: MIT");
}

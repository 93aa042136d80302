use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use prosepress::{PageConfig, PageProfile};

/// Render a rich-text editor document (ProseMirror-style JSON) to PDF.
#[derive(Parser)]
#[command(name = "prosepress", version)]
struct Args {
    /// Input document (JSON)
    input: PathBuf,

    /// Output file; defaults to the input path with a .pdf extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page profile: a4, a5, letter or legal
    #[arg(long, default_value = "a4")]
    page: String,

    /// Uniform page margin in millimeters
    #[arg(long, default_value_t = 25.4)]
    margin: f32,

    /// Line spacing multiplier
    #[arg(long, default_value_t = 1.15)]
    line_spacing: f32,

    /// Write the layout artifact as JSON instead of PDF
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(profile) = PageProfile::from_name(&args.page) else {
        return Err(format!("unknown page profile {:?}", args.page).into());
    };
    let config = PageConfig {
        profile,
        margin_mm: args.margin,
        line_spacing: args.line_spacing,
    };

    let input = std::fs::read_to_string(&args.input)?;
    let doc = prosepress::document_from_json_str(&input)?;

    let output = args.output.clone().unwrap_or_else(|| {
        args.input
            .with_extension(if args.json { "layout.json" } else { "pdf" })
    });

    if args.json {
        let artifact = prosepress::render(&doc, &config)?;
        std::fs::write(&output, serde_json::to_vec_pretty(&artifact)?)?;
    } else {
        let bytes = prosepress::render_pdf(&doc, &config)?;
        std::fs::write(&output, &bytes)?;
    }
    println!("{}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

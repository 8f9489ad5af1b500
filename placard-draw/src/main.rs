use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use eyre::WrapErr;
use serde::Deserialize;

use placard::{
    DrawConfig, DrawSurface, ImageOptions, OutputFormat, Rect, TextBox, TextParams,
    VerticalAnchor,
};

/// Composes a poster from a JSON script of draw operations
#[derive(Parser, Debug)]
#[command(name = "placard", version)]
struct Args {
    /// Script describing the background and the operations to run on it
    script: PathBuf,

    /// Where to write the result
    #[arg(short, long)]
    output: PathBuf,

    /// Output format; guessed from the output extension when omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Accept invalid TLS certificates when fetching remote images
    #[arg(long, default_value_t = false)]
    insecure_fetch: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Jpeg,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Jpeg => OutputFormat::Jpeg,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: DrawConfig,
    background: Background,
    #[serde(default)]
    ops: Vec<Op>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Background {
    Color {
        color: String,
        width: u32,
        height: u32,
    },
    File {
        file: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Op {
    Font(TextParams),
    Text {
        text: String,
        #[serde(flatten)]
        target: TextBox,
    },
    VerticalText {
        text: String,
        x: i32,
        y: i32,
        #[serde(default)]
        anchor: VerticalAnchor,
    },
    Image {
        source: String,
        #[serde(flatten)]
        dest: Rect,
        #[serde(flatten)]
        options: ImageOptions,
    },
    RoundImage {
        source: String,
        #[serde(flatten)]
        dest: Rect,
    },
    RadiusImage {
        source: String,
        radius: u32,
        #[serde(flatten)]
        dest: Rect,
    },
}

fn apply(surface: &mut DrawSurface, op: &Op) -> placard::Result<()> {
    match op {
        Op::Font(params) => surface.set_text_params(params)?,
        Op::Text { text, target } => surface.add_text(text, *target)?,
        Op::VerticalText { text, x, y, anchor } => {
            surface.add_vertical_text(text, *x, *y, *anchor)?
        }
        Op::Image {
            source,
            dest,
            options,
        } => surface.add_image(source, *dest, *options)?,
        Op::RoundImage { source, dest } => surface.add_round_image(source, *dest)?,
        Op::RadiusImage {
            source,
            radius,
            dest,
        } => surface.add_radius_image(source, *radius, *dest)?,
    };
    Ok(())
}

fn guess_format(output: &Path) -> OutputFormat {
    match output.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            OutputFormat::Jpeg
        }
        _ => OutputFormat::Png,
    }
}

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let raw = fs::read_to_string(&args.script)
        .wrap_err_with(|| format!("failed to read {}", args.script.display()))?;
    let mut script: Script = serde_json::from_str(&raw).wrap_err("malformed script")?;
    if args.insecure_fetch {
        script.config.fetch.accept_invalid_certs = true;
    }

    let mut surface = match &script.background {
        Background::Color {
            color,
            width,
            height,
        } => DrawSurface::with_color(*width, *height, color, script.config.clone()),
        Background::File { file } => DrawSurface::with_background(file, script.config.clone()),
    }
    .wrap_err("failed to set up the background")?;

    for (index, op) in script.ops.iter().enumerate() {
        match apply(&mut surface, op) {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => log::warn!("skipping op #{index}: {err}"),
            Err(err) => return Err(err).wrap_err_with(|| format!("op #{index} failed")),
        }
    }

    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| guess_format(&args.output));
    let bytes = surface.encode(format).wrap_err("failed to encode")?;
    fs::write(&args.output, &bytes)
        .wrap_err_with(|| format!("failed to write {}", args.output.display()))?;
    log::info!("wrote {} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}

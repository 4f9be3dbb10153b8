use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tsu_schedule::lesson::weekday_label;
use tsu_schedule::parser::parse;
use tsu_schedule::{render_pass, DocumentQuery, Dom, Lesson, Variant};

mod watch;

#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run one render pass over a saved schedule page.
  Render {
    #[arg(long, short, env = "TSU_REFLOW_INPUT")]
    input: PathBuf,
    /// Defaults to stdout.
    #[arg(long, short, env = "TSU_REFLOW_OUTPUT")]
    output: Option<PathBuf>,
    #[arg(long, short, env = "TSU_REFLOW_VARIANT", value_enum, default_value_t = VariantArg::HeaderTyped)]
    variant: VariantArg,
  },
  /// Print the parsed lessons as JSON.
  Dump {
    #[arg(long, short, env = "TSU_REFLOW_INPUT")]
    input: PathBuf,
    #[arg(long, short, env = "TSU_REFLOW_VARIANT", value_enum, default_value_t = VariantArg::HeaderTyped)]
    variant: VariantArg,
  },
  /// Re-render whenever the input page changes.
  Watch {
    #[arg(long, short, env = "TSU_REFLOW_INPUT")]
    input: PathBuf,
    #[arg(long, short, env = "TSU_REFLOW_OUTPUT")]
    output: PathBuf,
    #[arg(long, short, env = "TSU_REFLOW_VARIANT", value_enum, default_value_t = VariantArg::HeaderTyped)]
    variant: VariantArg,
    /// Seconds between checks.
    #[arg(long, env = "TSU_REFLOW_INTERVAL", default_value_t = 2)]
    interval: u64,
  },
  /// Write the browser manifest into the mode's build directory.
  Bundle {
    #[arg(long, short, env = "TSU_REFLOW_MODE")]
    mode: String,
    #[arg(long, short, env = "TSU_REFLOW_ROOT", default_value = ".")]
    root: PathBuf,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
  /// Header labels name the lesson types.
  #[value(name = "a")]
  HeaderTyped,
  /// Fixed lesson type columns with a syllabus link.
  #[value(name = "b")]
  SyllabusLinked,
}

impl From<VariantArg> for Variant {
  fn from(value: VariantArg) -> Self {
    match value {
      VariantArg::HeaderTyped => Variant::HeaderTyped,
      VariantArg::SyllabusLinked => Variant::SyllabusLinked,
    }
  }
}

#[derive(Serialize)]
struct Day<'a> {
  weekday: &'static str,
  lessons: &'a [Lesson],
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  match args.command {
    Command::Render {
      input,
      output,
      variant,
    } => render(&input, output.as_deref(), variant.into()).await,
    Command::Dump { input, variant } => dump(&input, variant.into()).await,
    Command::Watch {
      input,
      output,
      variant,
      interval,
    } => {
      watch::watch(
        &input,
        &output,
        variant.into(),
        Duration::from_secs(interval.max(1)),
      )
      .await
    }
    Command::Bundle { mode, root } => {
      let out_dir = root.join(tsu_manifest::build_dir(&mode));
      tsu_manifest::write_manifest(&mode, &out_dir)?;
      Ok(())
    }
  }
}

async fn render(input: &Path, output: Option<&Path>, variant: Variant) -> anyhow::Result<()> {
  let mut dom = Dom::parse(&fs::read_to_string(input).await?);

  if render_pass(&mut dom, variant)?.is_none() {
    warn!("No schedule table in {}, page left unchanged", input.display());
  }

  match output {
    None => println!("{}", dom.html()),
    Some(output) => {
      fs::write(output, dom.html()).await?;
      info!("Wrote {}", output.display());
    }
  }

  Ok(())
}

async fn dump(input: &Path, variant: Variant) -> anyhow::Result<()> {
  let dom = Dom::parse(&fs::read_to_string(input).await?);

  let grouping = dom
    .first_by_tag("table")
    .and_then(|table| parse(&dom, table, variant))
    .unwrap_or_default();

  let days = variant
    .weekdays()
    .iter()
    .filter_map(|weekday| {
      grouping.get(weekday).map(|lessons| Day {
        weekday: weekday_label(*weekday),
        lessons,
      })
    })
    .collect::<Vec<Day>>();

  println!("{}", serde_json::to_string_pretty(&days)?);

  Ok(())
}

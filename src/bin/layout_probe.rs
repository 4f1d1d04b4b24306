use bar_chart_layout::api::{ChartEngine, ChartEngineConfig};
use bar_chart_layout::core::{ChartSettings, DataPoint, Size, Viewport};
use bar_chart_layout::render::NullRenderer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
}

/// One layout scenario: everything the engine needs for a single update.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScenarioFile {
    viewport: Viewport,
    #[serde(default)]
    settings: ChartSettings,
    #[serde(default)]
    legend: Option<Size>,
    #[serde(default)]
    scroll_offset: usize,
    points: Vec<DataPoint>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = bar_chart_layout::telemetry::init_default_tracing();
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let scenario: ScenarioFile =
        serde_json::from_str(&raw).map_err(|err| format!("invalid json: {err}"))?;

    let mut config = ChartEngineConfig::new(scenario.viewport)
        .with_settings(scenario.settings)
        .with_scroll_offset(scenario.scroll_offset);
    if let Some(legend) = scenario.legend {
        config = config.with_legend(legend);
    }
    let mut engine = ChartEngine::new(NullRenderer::default(), config).map_err(|e| e.to_string())?;
    engine.set_data(scenario.points).map_err(|e| e.to_string())?;
    engine.render().map_err(|e| e.to_string())?;

    let json = engine
        .snapshot()
        .to_json_contract_v1_pretty()
        .map_err(|e| e.to_string())?;
    match args.output {
        Some(path) => fs::write(&path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            other => return Err(format!("unknown argument `{other}`")),
        }
    }

    let input = input.ok_or_else(|| {
        "usage: layout_probe --input <scenario.json> [--output <snapshot.json>]".to_owned()
    })?;
    Ok(CliArgs { input, output })
}

use chart_pipeline::api::{ApplyOutcome, Notice, PipelineController};
use chart_pipeline::core::{ChartConfigPatch, ChartKind, OutputFormat, RgbColor, SourceFile};
use chart_pipeline::render::{NullWidget, Presentation, ResultPresenter};
use chart_pipeline::telemetry;
use chart_pipeline::transport::{HttpChartService, ServiceConfig};
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: chart_pipeline_tool (--file <path> | --sample) [--sheet <name>] \
[--kind <bar|line|scatter|pie|histogram|box|area|polar|treemap>] [--x <column>] [--y <column>] \
[--title <text>] [--color <#rrggbb>] [--format <json|png|jpeg|svg|pdf|webp>] [--output <dir>] \
[--base-url <url>] [--config <path>] [--log <filter>] [--snapshot]";

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Sample,
}

#[derive(Debug)]
struct CliArgs {
    input: Input,
    sheet: Option<String>,
    patch: ChartConfigPatch,
    x_column_given: bool,
    output: Option<PathBuf>,
    base_url: Option<String>,
    config: Option<PathBuf>,
    log: Option<String>,
    snapshot: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let _ = telemetry::init_tracing_with_filter(args.log.as_deref());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to start runtime: {err}"))?;
    runtime.block_on(run_pipeline(args))
}

async fn run_pipeline(args: CliArgs) -> Result<(), String> {
    let mut service_config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            ServiceConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => ServiceConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        service_config = service_config.with_base_url(base_url.clone());
    }
    let service = HttpChartService::new(service_config).map_err(|err| err.to_string())?;
    let mut controller = PipelineController::new(service);

    let file = match &args.input {
        Input::File(path) => SourceFile::from_path(path).map_err(|err| err.to_string())?,
        Input::Sample => SourceFile::sample(),
    };
    let pending = controller.submit_file(file);
    expect_applied(&mut controller, pending).await?;

    let sheets = controller
        .session()
        .sheets()
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    let sheet = match &args.sheet {
        Some(sheet) => sheet.clone(),
        None => sheets
            .first()
            .cloned()
            .ok_or_else(|| "the file has no sheets".to_owned())?,
    };
    let pending = controller
        .select_sheet(&sheet)
        .ok_or_else(|| format!("unknown sheet `{sheet}` (available: {})", sheets.join(", ")))?;
    expect_applied(&mut controller, pending).await?;

    if !args.x_column_given {
        let columns = controller.session().columns().unwrap_or_default();
        println!("sheet `{sheet}` columns:");
        for column in columns {
            println!("  {column}");
        }
        return print_snapshot(&controller, args.snapshot);
    }

    let _ = controller.configure_chart(args.patch);
    let pending = match controller.generate() {
        Ok(pending) => pending,
        Err(err) => {
            report_notices(controller.take_notices());
            return Err(err.to_string());
        }
    };
    expect_applied(&mut controller, pending).await?;

    let mut presenter = ResultPresenter::new(NullWidget::default());
    match presenter
        .present(&controller)
        .map_err(|err| err.to_string())?
    {
        Presentation::Empty => return Err("service returned no chart".to_owned()),
        Presentation::Rendered { traces } => {
            let payload = controller
                .output()
                .and_then(|output| output.payload())
                .ok_or_else(|| "chart payload missing".to_owned())?;
            let json = payload.to_json_pretty().map_err(|err| err.to_string())?;
            match &args.output {
                Some(dir) => {
                    let path = dir.join("chart.json");
                    fs::write(&path, json)
                        .map_err(|err| format!("failed to write `{}`: {err}", path.display()))?;
                    println!("wrote {} ({traces} traces)", path.display());
                }
                None => println!("{json}"),
            }
        }
        Presentation::Download(action) => {
            let dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = action.write_to(&dir).map_err(|err| err.to_string())?;
            println!(
                "wrote {} ({} bytes, {})",
                path.display(),
                action.bytes().len(),
                action.media_type()
            );
        }
    }

    print_snapshot(&controller, args.snapshot)
}

async fn expect_applied(
    controller: &mut PipelineController<HttpChartService>,
    pending: chart_pipeline::api::PendingRequest<HttpChartService>,
) -> Result<(), String> {
    match controller.drive(pending).await {
        ApplyOutcome::Applied => Ok(()),
        ApplyOutcome::Discarded => Err("response was superseded".to_owned()),
        ApplyOutcome::Failed(err) => {
            report_notices(controller.take_notices());
            Err(err.to_string())
        }
    }
}

fn report_notices(notices: Vec<Notice>) {
    for notice in notices {
        eprintln!("{}", notice.message);
    }
}

fn print_snapshot(
    controller: &PipelineController<HttpChartService>,
    enabled: bool,
) -> Result<(), String> {
    if enabled {
        let json = controller
            .snapshot()
            .to_json_pretty()
            .map_err(|err| err.to_string())?;
        eprintln!("{json}");
    }
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);

    let mut input = None::<Input>;
    let mut sheet = None::<String>;
    let mut patch = ChartConfigPatch::new();
    let mut x_column_given = false;
    let mut output = None::<PathBuf>;
    let mut base_url = None::<String>;
    let mut config = None::<PathBuf>;
    let mut log = None::<String>;
    let mut snapshot = false;

    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--file" => input = Some(Input::File(PathBuf::from(value("--file")?))),
            "--sample" => input = Some(Input::Sample),
            "--sheet" => sheet = Some(value("--sheet")?),
            "--kind" => {
                let kind: ChartKind = value("--kind")?.parse().map_err(|e| format!("{e}"))?;
                patch = patch.kind(kind);
            }
            "--x" => {
                patch = patch.x_column(value("--x")?);
                x_column_given = true;
            }
            "--y" => patch = patch.y_column(value("--y")?),
            "--title" => patch = patch.title(value("--title")?),
            "--color" => {
                let color: RgbColor = value("--color")?.parse().map_err(|e| format!("{e}"))?;
                patch = patch.color(color);
            }
            "--format" => {
                let format: OutputFormat =
                    value("--format")?.parse().map_err(|e| format!("{e}"))?;
                patch = patch.format(format);
            }
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--base-url" => base_url = Some(value("--base-url")?),
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--log" => log = Some(value("--log")?),
            "--snapshot" => snapshot = true,
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
    }

    let input = input.ok_or_else(|| USAGE.to_owned())?;
    Ok(CliArgs {
        input,
        sheet,
        patch,
        x_column_given,
        output,
        base_url,
        config,
        log,
        snapshot,
    })
}

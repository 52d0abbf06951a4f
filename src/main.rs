//! signplan command line front-end.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use thiserror::Error;

use signplan::assets::{AssetStats, DashboardFilter, DashboardTab};
use signplan::config::{AppConfig, ConfigError, LogLevel};
use signplan::format::{ExportBundle, ExportOptions, FormatError, FormatRegistry};
use signplan::model::{AssetStatus, FloorPlan, ModelError};
use signplan::viewport::{Transform, Viewport};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0}")]
    Usage(String),
}

fn cli() -> Command {
    let filter_args = [
        Arg::new("layout")
            .long("layout")
            .help("Layout id or name (default: all layouts)"),
        Arg::new("search")
            .long("search")
            .help("Case-insensitive text filter"),
        Arg::new("status")
            .long("status")
            .value_parser(value_parser!(AssetStatus))
            .help("Only rows with items in this status"),
        Arg::new("type")
            .long("type")
            .help("Signage type (holder type for stands)"),
    ];

    Command::new("signplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Venue floor-plan signage planner")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (default: user config directory)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (repeatable)"),
        )
        .subcommand(
            Command::new("stats")
                .about("Print the assets dashboard of a bundle")
                .arg(input_arg())
                .arg(
                    Arg::new("tab")
                        .long("tab")
                        .default_value("signs")
                        .value_parser(["signs", "stands", "designs"])
                        .help("Dashboard tab to print"),
                )
                .args(filter_args.clone()),
        )
        .subcommand(
            Command::new("export")
                .about("Convert a bundle to another format")
                .arg(input_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Format id (see `signplan formats`)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file (default: export folder or current directory)"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Do not pretty-print JSON"),
                )
                .args(filter_args),
        )
        .subcommand(Command::new("formats").about("List export formats"))
        .subcommand(
            Command::new("locate")
                .about("Map a screen point on the canvas to floor-plan percentages")
                .arg(input_arg())
                .arg(
                    Arg::new("layout")
                        .long("layout")
                        .required(true)
                        .help("Layout id or name"),
                )
                .arg(float_arg("width", "Canvas width in pixels").required(true))
                .arg(float_arg("height", "Canvas height in pixels").required(true))
                .arg(float_arg("x", "Screen x").required(true))
                .arg(float_arg("y", "Screen y").required(true))
                .arg(float_arg("zoom", "Zoom level").default_value("1"))
                .arg(float_arg("pan-x", "Horizontal pan in pixels").default_value("0"))
                .arg(float_arg("pan-y", "Vertical pan in pixels").default_value("0"))
                .arg(
                    Arg::new("floor-plan")
                        .long("floor-plan")
                        .value_parser(value_parser!(PathBuf))
                        .help("Floor-plan image to read dimensions from"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a bundle against its catalog")
                .arg(input_arg()),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Bundle file (.json or .zip)")
}

fn float_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f32))
        .help(help)
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration {:?}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load_from_default_path().unwrap_or_default(),
    };

    let mut level = config.preferences.log_level;
    for _ in 0..matches.get_count("verbose") {
        level = level.more_verbose();
    }
    init_logging(level);

    let result = match matches.subcommand() {
        Some(("stats", args)) => stats(args),
        Some(("export", args)) => export(args, &config),
        Some(("formats", _)) => {
            formats();
            Ok(ExitCode::SUCCESS)
        }
        Some(("locate", args)) => locate(args, &config),
        Some(("validate", args)) => validate(args),
        _ => Err(CliError::Usage("unknown command".to_string())),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
}

/// Read a bundle with the importer matching the file extension.
fn load_bundle(path: &Path) -> Result<ExportBundle, CliError> {
    let registry = FormatRegistry::new();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let format = registry
        .by_extension(ext)
        .into_iter()
        .find(|f| f.supports_import())
        .ok_or_else(|| CliError::Usage(format!("cannot import '.{}' files", ext)))?;
    Ok(format.import(path)?)
}

fn filter_from(args: &ArgMatches) -> DashboardFilter {
    DashboardFilter {
        search: args.get_one::<String>("search").cloned(),
        status: args.get_one::<AssetStatus>("status").copied(),
        type_name: args.get_one::<String>("type").cloned(),
    }
}

fn stats(args: &ArgMatches) -> Result<ExitCode, CliError> {
    let bundle = load_bundle(required_path(args, "input")?)?;
    let layout = args.get_one::<String>("layout").map(String::as_str);
    let layouts = bundle.select_layouts(layout)?;
    let stats = AssetStats::compute(layouts, &bundle.catalog);
    let filter = filter_from(args);

    println!(
        "{}: {} signage annotations, {} faces",
        bundle.event.name, stats.total_signage, stats.total_faces
    );

    let tab = match args.get_one::<String>("tab").map(String::as_str) {
        Some("stands") => DashboardTab::Stands,
        Some("designs") => DashboardTab::Designs,
        _ => DashboardTab::Signs,
    };
    match tab {
        DashboardTab::Signs => {
            for row in filter.apply(&stats.signs) {
                let mut label = row.type_name.clone();
                if let Some(sub) = &row.sub_type_name {
                    label.push_str(&format!(" / {}", sub));
                }
                println!(
                    "{:>5}  {:<32} {:<10} {:<10} {}",
                    row.quantity,
                    label,
                    row.direction.name(),
                    row.status().label(),
                    row.notes.as_deref().unwrap_or("")
                );
            }
        }
        DashboardTab::Stands => {
            for row in filter.apply(&stats.stands) {
                println!(
                    "{:>5}  {:<32} {} sides, {} faces  {}",
                    row.quantity,
                    row.holder_name,
                    row.sides,
                    row.faces,
                    row.status().label()
                );
            }
        }
        DashboardTab::Designs => {
            for row in filter.apply(&stats.designs) {
                let mut label = row.type_name.clone();
                if let Some(sub) = &row.sub_type_name {
                    label.push_str(&format!(" / {}", sub));
                }
                println!(
                    "{:>5}  {:<32} {}  {}",
                    row.quantity,
                    label,
                    row.color,
                    row.image_url.as_deref().unwrap_or("(no artwork)")
                );
            }
        }
    }

    let totals = match tab {
        DashboardTab::Stands => stats.stand_statuses,
        _ => stats.sign_statuses,
    };
    let summary: Vec<String> = totals
        .iter()
        .map(|(status, count)| format!("{} {}", count, status))
        .collect();
    if !summary.is_empty() {
        println!("Status: {}", summary.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

fn export(args: &ArgMatches, config: &AppConfig) -> Result<ExitCode, CliError> {
    let input = required_path(args, "input")?;
    let bundle = load_bundle(input)?;

    let registry = FormatRegistry::new();
    let format_id = args
        .get_one::<String>("format")
        .cloned()
        .unwrap_or_else(|| config.preferences.default_export_format.clone());
    let format = registry
        .get(&format_id)
        .ok_or_else(|| CliError::Usage(format!("unknown format '{}'", format_id)))?;

    let mut options = ExportOptions::new()
        .filter(filter_from(args))
        .pretty(config.preferences.pretty_json && !args.get_flag("compact"));
    if let Some(layout) = args.get_one::<String>("layout") {
        options = options.layout(layout.clone());
    }

    let output = match args.get_one::<PathBuf>("output") {
        Some(path) => path.clone(),
        None => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("export");
            let name = format!("{}-{}.{}", stem, format.id(), format.extension());
            config
                .preferences
                .export_dir()
                .unwrap_or_default()
                .join(name)
        }
    };

    let result = format.export(&bundle, &output, &options)?;
    for warning in &result.warnings {
        match &warning.layout {
            Some(layout) => log::warn!("{}: {}", layout, warning.message),
            None => log::warn!("{}", warning.message),
        }
    }
    println!(
        "Wrote {:?} ({} annotations, {} rows)",
        output, result.annotations_exported, result.rows_exported
    );
    Ok(ExitCode::SUCCESS)
}

fn formats() {
    let registry = FormatRegistry::new();
    for format in registry.all() {
        println!(
            "{:<12} .{:<5} {}{}",
            format.id(),
            format.extension(),
            format.display_name(),
            if format.supports_import() {
                " (import)"
            } else {
                ""
            }
        );
    }
}

fn locate(args: &ArgMatches, config: &AppConfig) -> Result<ExitCode, CliError> {
    let bundle = load_bundle(required_path(args, "input")?)?;
    let key = args
        .get_one::<String>("layout")
        .map(String::as_str)
        .unwrap_or_default();
    let layout = bundle
        .select_layouts(Some(key))?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::Usage(format!("no layout '{}'", key)))?;

    let floor_plan = match args.get_one::<PathBuf>("floor-plan") {
        Some(path) => Some(FloorPlan::from_image_file(path)?),
        None => layout.floor_plan.clone(),
    };
    let (natural_w, natural_h) = floor_plan
        .as_ref()
        .and_then(FloorPlan::dimensions)
        .ok_or_else(|| {
            CliError::Usage(format!(
                "layout '{}' has no floor-plan dimensions; pass --floor-plan",
                layout.name
            ))
        })?;

    let float = |name: &str| args.get_one::<f32>(name).copied().unwrap_or_default();
    let transform = transform_from(args)?;
    let viewport = Viewport::new(
        (float("width"), float("height")),
        (natural_w as f32, natural_h as f32),
    )
    .with_limits(config.viewport.zoom_limits())
    .with_transform(transform);

    let (x, y) = (float("x"), float("y"));
    let Some(point) = viewport.screen_to_percent(x, y) else {
        return Err(CliError::Usage("canvas or image has no area".to_string()));
    };
    println!(
        "({}, {}) -> {:.2}%, {:.2}%{}",
        x,
        y,
        point.x,
        point.y,
        if viewport.contains_screen_point(x, y) {
            ""
        } else {
            " (outside image, clamped)"
        }
    );

    let hit = viewport.hit_test(&layout.annotations, x, y, config.viewport.hit_radius);
    if let Some(annotation) = hit.map(|idx| &layout.annotations[idx]) {
        println!(
            "Hit {} {} ({})",
            annotation.category.name(),
            annotation.kind,
            annotation.id
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Pan/zoom from `--zoom`, `--pan-x` and `--pan-y`.
fn transform_from(args: &ArgMatches) -> Result<Transform, CliError> {
    let value = |name: &str| {
        let v = args.get_one::<f32>(name).copied().unwrap_or_default();
        if v.is_finite() {
            Ok(v)
        } else {
            Err(CliError::Usage(format!("--{} must be a finite number", name)))
        }
    };
    let zoom = value("zoom")?;
    if zoom <= 0.0 {
        return Err(CliError::Usage(format!("--zoom must be positive, got {}", zoom)));
    }
    Ok(Transform::new(zoom, value("pan-x")?, value("pan-y")?))
}

fn validate(args: &ArgMatches) -> Result<ExitCode, CliError> {
    let bundle = load_bundle(required_path(args, "input")?)?;
    let issues = bundle.event.validate(&bundle.catalog);

    for issue in &issues {
        match &issue.annotation_id {
            Some(id) => println!("{} [{}]: {}", issue.layout_name, id, issue.message),
            None => println!("{}: {}", issue.layout_name, issue.message),
        }
    }

    if issues.is_empty() {
        println!("{}: no issues", bundle.event.name);
        Ok(ExitCode::SUCCESS)
    } else {
        log::info!("{} issues found", issues.len());
        Ok(ExitCode::FAILURE)
    }
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path, CliError> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .ok_or_else(|| CliError::Usage(format!("missing <{}>", name)))
}

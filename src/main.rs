// SPDX-License-Identifier: MPL-2.0
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use pico_args::Arguments;
use sr_bindings::api::{self, ProcessRequest};
use sr_bindings::config::defaults::{MAX_SCALE, MIN_SCALE};
use sr_bindings::config::{self, Config};
use sr_bindings::error::{Error, Result};
use sr_bindings::media::upscale::{ProcessReport, ProcessResult};
use sr_bindings::paths;

const HELP: &str = "\
Upscale an image with the sr_vulkan engine.

USAGE:
  sr -i <input> -o <output> [OPTIONS]
  sr --list-models
  sr --model-info <name>

OPTIONS:
  -i, --input <path>        Input image
  -o, --output <path>       Output image
  -s, --scale <factor>      Upscale factor (default: 2.0)
  -m, --model <name>        Model name (default: realesrgan_x4plus)
      --gpu-id <n>          GPU index (default: 0)
      --cpu                 Run on the CPU
      --model-path <dir>    Model directory (default: $SR_MODEL_PATH)
      --tile-size <px>      Tile size (default: 400)
      --format <ext>        Output encoding (default: webp)
      --config-dir <dir>    Config directory (default: $SR_CONFIG_DIR)
      --list-models         List available models
      --model-info <name>   Describe a model
  -v, -vv                   More logging (info, debug)
  -h, --help                Print this help
";

const EXAMPLES: &str = "\
Examples:
  sr -i photo.jpg -o photo_x4.webp -m realesrgan_x4plus -s 4
  sr -i art.png -o art_x2.png -m waifu2x_cunet_up2x --format png
  sr -i frame.png -o frame_x2.webp --cpu";

#[derive(Debug, Default, PartialEq)]
struct Cli {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    scale: Option<f32>,
    model: Option<String>,
    gpu_id: Option<i32>,
    cpu: bool,
    model_path: Option<PathBuf>,
    tile_size: Option<u32>,
    format: Option<String>,
    config_dir: Option<String>,
    verbosity: u8,
    list_models: bool,
    model_info: Option<String>,
    help: bool,
}

fn parse_args(mut args: Arguments) -> Result<Cli> {
    let verbosity = if args.contains("-vv") {
        2
    } else {
        u8::from(args.contains(["-v", "--verbose"]))
    };
    let cli = Cli {
        help: args.contains(["-h", "--help"]),
        list_models: args.contains("--list-models"),
        model_info: args.opt_value_from_str("--model-info")?,
        input: args.opt_value_from_str(["-i", "--input"])?,
        output: args.opt_value_from_str(["-o", "--output"])?,
        scale: args.opt_value_from_str(["-s", "--scale"])?,
        model: args.opt_value_from_str(["-m", "--model"])?,
        gpu_id: args.opt_value_from_str("--gpu-id")?,
        cpu: args.contains("--cpu"),
        model_path: args.opt_value_from_str("--model-path")?,
        tile_size: args.opt_value_from_str("--tile-size")?,
        format: args.opt_value_from_str("--format")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        verbosity,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(Error::Args(format!("unexpected arguments: {rest:?}")));
    }
    if let Some(scale) = cli.scale {
        check_scale(scale)?;
    }
    Ok(cli)
}

fn check_scale(scale: f32) -> Result<f32> {
    if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
        return Err(Error::Args(format!(
            "scale must be between {MIN_SCALE} and {MAX_SCALE}, got {scale}"
        )));
    }
    Ok(scale)
}

/// CLI flags override the config file, which overrides built-in defaults.
fn build_request(cli: &Cli, config: &Config) -> Result<ProcessRequest> {
    let input = cli
        .input
        .clone()
        .ok_or_else(|| Error::Args("missing input image (-i <path>)".to_string()))?;
    let output = cli
        .output
        .clone()
        .ok_or_else(|| Error::Args("missing output path (-o <path>)".to_string()))?;

    Ok(ProcessRequest {
        input_path: input,
        output_path: output,
        scale: check_scale(cli.scale.unwrap_or_else(|| config.scale_or_default()))?,
        model: cli
            .model
            .clone()
            .unwrap_or_else(|| config.model_or_default().to_string()),
        gpu_id: cli.gpu_id.unwrap_or_else(|| config.gpu_id_or_default()),
        cpu_mode: cli.cpu || config.cpu_mode_or_default(),
        model_path: paths::resolve_model_path(cli.model_path.clone(), config.model_path.clone()),
        tile_size: cli.tile_size.unwrap_or_else(|| config.tile_size_or_default()),
        output_format: cli
            .format
            .clone()
            .unwrap_or_else(|| config.output_format_or_default().to_string()),
    })
}

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env();
    match verbosity {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.init();
}

fn processing_spinner() -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸", "▪▪▪▪▪",
        ]);
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message("Processing image...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn finish(spinner: &ProgressBar, outcome: &ProcessResult<ProcessReport>) -> ExitCode {
    match outcome {
        Ok(report) => {
            log::info!("Processed on {}", report.device);
            let done = format!("Done! Time: {:.2}s", report.elapsed_secs);
            if spinner.is_hidden() {
                println!("{done}");
            }
            spinner.finish_with_message(done);
            ExitCode::SUCCESS
        }
        Err(err) => {
            spinner.finish_with_message("Failed");
            eprintln!("Processing failed: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "sr-vulkan")]
fn process(request: &ProcessRequest) -> ProcessResult<ProcessReport> {
    api::run(sr_bindings::infrastructure::SrVulkanBackend::new(), request)
}

#[cfg(not(feature = "sr-vulkan"))]
fn process(_request: &ProcessRequest) -> ProcessResult<ProcessReport> {
    use sr_bindings::application::port::BackendError;
    use sr_bindings::media::upscale::ProcessError;

    Err(ProcessError::Backend(BackendError::Unavailable(
        "no engine backend compiled in (rebuild with --features sr-vulkan)".to_string(),
    )))
}

/// Model ids come from the engine when one is compiled in.
#[cfg(feature = "sr-vulkan")]
fn load_models() {
    api::load_engine_models();
}

#[cfg(not(feature = "sr-vulkan"))]
fn load_models() {}

fn run_request(request: &ProcessRequest) -> ExitCode {
    let spinner = processing_spinner();
    let outcome = process(request);
    finish(&spinner, &outcome)
}

fn main() -> ExitCode {
    let cli = match parse_args(Arguments::from_env()) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };
    init_logging(cli.verbosity);

    if cli.help {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }
    if cli.list_models || cli.model_info.is_some() {
        load_models();
    }
    if cli.list_models {
        println!("Available models:");
        println!("{}", api::get_model_categories_formatted());
        println!("{EXAMPLES}");
        return ExitCode::SUCCESS;
    }
    if let Some(name) = &cli.model_info {
        println!("{}", api::get_model_info(name));
        return ExitCode::SUCCESS;
    }

    paths::init_cli_overrides(cli.config_dir.clone());
    let config = config::load().unwrap_or_else(|err| {
        log::warn!("Ignoring config file: {err}");
        Config::default()
    });

    match build_request(&cli, &config) {
        Ok(request) => run_request(&request),
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Cli> {
        parse_args(Arguments::from_vec(
            args.iter().map(OsString::from).collect(),
        ))
    }

    #[test]
    fn parses_full_command_line() {
        let cli = parse(&[
            "-i", "in.png", "-o", "out.webp", "-s", "4", "-m", "realcugan-pro", "--gpu-id", "1",
            "--cpu", "--tile-size", "256", "--format", "png", "-vv",
        ])
        .expect("valid arguments");

        assert_eq!(cli.input, Some(PathBuf::from("in.png")));
        assert_eq!(cli.output, Some(PathBuf::from("out.webp")));
        assert_eq!(cli.scale, Some(4.0));
        assert_eq!(cli.model.as_deref(), Some("realcugan-pro"));
        assert_eq!(cli.gpu_id, Some(1));
        assert!(cli.cpu);
        assert_eq!(cli.tile_size, Some(256));
        assert_eq!(cli.format.as_deref(), Some("png"));
        assert_eq!(cli.verbosity, 2);
    }

    #[test]
    fn rejects_out_of_range_scale() {
        assert!(matches!(parse(&["-s", "0.5"]), Err(Error::Args(_))));
        assert!(matches!(parse(&["-s", "32"]), Err(Error::Args(_))));
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(matches!(parse(&["--bogus"]), Err(Error::Args(_))));
    }

    #[test]
    fn missing_input_is_an_argument_error() {
        let cli = parse(&["-o", "out.webp"]).expect("valid arguments");
        let err = build_request(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("-i"));
    }

    #[test]
    fn out_of_range_config_scale_is_rejected() {
        let cli = parse(&["-i", "in.png", "-o", "out.png"]).expect("valid arguments");
        let config = Config {
            scale: Some(-3.0),
            ..Config::default()
        };

        let err = build_request(&cli, &config).unwrap_err();

        assert!(matches!(err, Error::Args(_)));
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn finished_spinner_reports_outcome() {
        use sr_bindings::domain::device::Device;
        use sr_bindings::media::upscale::ProcessError;

        let report = ProcessReport {
            output_path: PathBuf::from("out.webp"),
            elapsed_secs: 1.5,
            format: "webp".to_string(),
            result_id: "1".to_string(),
            device: Device::Gpu(0),
            input_dimensions: None,
        };
        let code = |code: ExitCode| format!("{code:?}");

        let spinner = ProgressBar::hidden();
        assert_eq!(code(finish(&spinner, &Ok(report))), code(ExitCode::SUCCESS));
        assert!(spinner.is_finished());

        let spinner = ProgressBar::hidden();
        assert_eq!(
            code(finish(&spinner, &Err(ProcessError::Timeout))),
            code(ExitCode::FAILURE)
        );
        assert!(spinner.is_finished());
    }

    #[test]
    fn config_fills_in_missing_flags() {
        let cli = parse(&["-i", "in.png", "-o", "out.png", "-s", "3"]).expect("valid arguments");
        let config = Config {
            model: Some("waifu2x_anime_up2x".to_string()),
            scale: Some(2.0),
            tile_size: Some(200),
            cpu_mode: Some(true),
            ..Config::default()
        };

        let request = build_request(&cli, &config).expect("request");

        assert_eq!(request.scale, 3.0);
        assert_eq!(request.model, "waifu2x_anime_up2x");
        assert_eq!(request.tile_size, 200);
        assert!(request.cpu_mode);
        assert_eq!(request.output_format, "webp");
    }
}
